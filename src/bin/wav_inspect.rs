//! wav-inspect - dump the structure and samples of a PCM WAVE file

use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use tracing::error;

use binaural_wav::{
    TracingLog, WaveFile,
    cli::{LogArgs, init_tracing},
    sinks::DEFAULT_ERROR_LOG,
};

#[derive(Parser)]
#[command(name = "wav-inspect")]
#[command(about = "Inspect a PCM RIFF/WAVE file", long_about = None)]
#[command(version)]
struct Cli {
    /// WAVE file to read
    input: PathBuf,

    /// Number of frames to print
    #[arg(short = 'n', long, default_value = "32")]
    frames: usize,

    /// Print every frame
    #[arg(long, conflicts_with = "frames")]
    all_frames: bool,

    /// File that collects error reports
    #[arg(long, default_value = DEFAULT_ERROR_LOG)]
    error_log: PathBuf,

    #[command(flatten)]
    log: LogArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log);

    let log = TracingLog::with_error_file(&cli.error_log);
    match WaveFile::open(&cli.input, &log) {
        Ok(wave) => {
            println!("{}", wave);
            let shown = if cli.all_frames { None } else { Some(cli.frames) };
            wave.log_samples(&log, shown);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}: {}", cli.input.display(), e);
            ExitCode::from(e.exit_code())
        }
    }
}
