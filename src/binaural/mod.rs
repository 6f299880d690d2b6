//! Binaural beat generator.
//!
//! A job file lists sections, each with a linear frequency ramp and an amplitude per
//! channel. Slightly different left and right frequencies produce the perceived beat.
//! Rendering streams frames straight into a [`WaveWriter`], so memory use does not
//! depend on the length of the job.

pub mod job;
pub mod synth;

use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

pub use job::{BinauralJob, Section, ToneSpec};
pub use synth::{ChannelReport, ChannelState, SectionReport, SynthesisReport, Synthesizer};

use crate::{
    config::KeyedConfig,
    error::{ErrorKind, WavIOResult},
    traits::{LogSink, ProgressSink},
    types::CancelToken,
    wav::streaming_writer::WaveWriter,
};

/// Label of the progress line announcing the job size.
pub const TOTAL_LABEL: &str = "total";

/// Outcome of a finished generation job.
#[derive(Debug, Clone, PartialEq)]
pub struct BinauralOutput {
    pub path: PathBuf,
    pub report: SynthesisReport,
}

/// Output path for a job file: the same path with its extension replaced by `wav`.
pub fn output_path_for<P: AsRef<Path>>(config_path: P) -> PathBuf {
    config_path.as_ref().with_extension("wav")
}

/// Reads the job file at `config_path` and writes `<config_path>.wav` next to it.
///
/// See [`generate_binaural_to`].
pub fn generate_binaural<P: AsRef<Path>>(
    config_path: P,
    log: &dyn LogSink,
    progress: &dyn ProgressSink,
    cancel: &CancelToken,
) -> WavIOResult<BinauralOutput> {
    let output = output_path_for(&config_path);
    generate_binaural_to(config_path, output, log, progress, cancel)
}

/// Reads the job file at `config_path` and writes the rendered audio to `output_path`.
///
/// Job limits are checked before the output file is created. Once the file exists it
/// is always closed, also on failure or cancellation, and left on disk.
///
/// # Errors
///
/// - [`crate::WavIOError::ConfigOpen`] when the job file can not be read
/// - [`crate::WavIOError::DurationLimit`] / [`crate::WavIOError::FrameLimit`] for oversized jobs
/// - [`crate::WavIOError::Cancelled`] when `cancel` fires
/// - [`crate::WavIOError::Io`] when writing fails
pub fn generate_binaural_to<P: AsRef<Path>, Q: AsRef<Path>>(
    config_path: P,
    output_path: Q,
    log: &dyn LogSink,
    progress: &dyn ProgressSink,
    cancel: &CancelToken,
) -> WavIOResult<BinauralOutput> {
    let config_path = config_path.as_ref();
    let output_path = output_path.as_ref();
    let config_name = config_path.display().to_string();

    log.append_line(&format!("Reading audio configuration file: {}", config_name));
    let prepared = KeyedConfig::open(config_path)
        .and_then(|config| BinauralJob::from_config(&config))
        .and_then(|job| {
            log_job(log, &job);
            job.preflight().map(|frames| (job, frames))
        });
    let (job, total_frames) = match prepared {
        Ok(prepared) => prepared,
        Err(e) => {
            log.report_error(
                "Error processing configuration file:",
                &config_name,
                &e.to_string(),
            );
            return Err(e);
        }
    };

    progress.update(
        TOTAL_LABEL,
        Some("bold"),
        &format!("Total frames: {}", total_frames),
    );
    let output_name = output_path.display().to_string();
    log.append_line(&format!("Writing file: {}", output_name));

    match render_to_file(&job, total_frames, output_path, log, progress, cancel) {
        Ok(report) => {
            log.append_line(&format!("Finished writing file: {}", output_name));
            Ok(BinauralOutput {
                path: output_path.to_path_buf(),
                report,
            })
        }
        Err(e) => {
            if e.kind() == ErrorKind::Cancelled {
                log.append_line(&format!("Cancelled, partial file kept: {}", output_name));
            } else {
                log.report_error("Error writing file:", &output_name, &e.to_string());
            }
            Err(e)
        }
    }
}

fn render_to_file(
    job: &BinauralJob,
    total_frames: u64,
    output_path: &Path,
    log: &dyn LogSink,
    progress: &dyn ProgressSink,
    cancel: &CancelToken,
) -> WavIOResult<SynthesisReport> {
    let file = File::create(output_path)?;
    let mut writer = WaveWriter::begin(BufWriter::new(file), job.format(), total_frames)?;

    let rendered = Synthesizer::new(job, log, progress)
        .with_cancel(cancel)
        .render(&mut writer);
    let closed = writer.finish();

    let report = rendered?;
    closed?;
    Ok(report)
}

fn log_job(log: &dyn LogSink, job: &BinauralJob) {
    log.append_line(&format!("Sample Rate: {}", job.sample_rate));
    log.append_line(&format!("Sample Value Range: {}", job.value_range));
    for section in &job.sections {
        log.append_line(&format!(
            "{} time duration: {}",
            section.name(),
            section.duration_seconds
        ));
    }
    match job.total_seconds() {
        Some(total) => log.append_line(&format!("Total Time Duration: {}", total)),
        None => log.append_line("Total Time Duration: overflow"),
    }
    log.append_line(&format!(
        "Total Number of Samples for Each Channel: {}",
        job.sections.iter().map(|s| job.section_frames(s)).sum::<u64>()
    ));
}
