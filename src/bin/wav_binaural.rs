//! wav-binaural - render a binaural beat job file to a WAVE file

use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use tracing::{error, info};

use binaural_wav::{
    CancelToken, TracingLog, generate_binaural_to,
    binaural::output_path_for,
    cli::{BarProgress, LogArgs, init_tracing},
    sinks::DEFAULT_ERROR_LOG,
};

#[derive(Parser)]
#[command(name = "wav-binaural")]
#[command(about = "Generate binaural beats from a job file", long_about = None)]
#[command(version)]
struct Cli {
    /// Job file with a [general] section and numbered [section N] blocks
    config: PathBuf,

    /// Output file, defaults to the job file with a .wav extension
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not draw a progress bar
    #[arg(long)]
    no_progress: bool,

    /// File that collects error reports
    #[arg(long, default_value = DEFAULT_ERROR_LOG)]
    error_log: PathBuf,

    #[command(flatten)]
    log: LogArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log);

    let output = cli.output.clone().unwrap_or_else(|| output_path_for(&cli.config));
    let log = TracingLog::with_error_file(&cli.error_log);
    let progress = if cli.no_progress {
        BarProgress::hidden()
    } else {
        BarProgress::new()
    };

    let result = generate_binaural_to(&cli.config, &output, &log, &progress, &CancelToken::new());
    progress.finish();
    match result {
        Ok(done) => {
            info!(
                "wrote {} frames to {}",
                done.report.total_frames,
                done.path.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}: {}", cli.config.display(), e);
            ExitCode::from(e.exit_code())
        }
    }
}
