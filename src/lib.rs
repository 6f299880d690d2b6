// Correctness and logic
#![warn(clippy::unit_cmp)] // Detects comparing unit types
#![warn(clippy::match_same_arms)] // Duplicate match arms
#![allow(clippy::result_large_err)] // Errors carry positions and context strings
#![allow(clippy::collapsible_if)] // Sometimes clearer to have separate conditions
#![allow(clippy::unnecessary_cast)] // Explicit casts for clarity
#![allow(clippy::identity_op)] // Explicit operations for clarity

// Performance-focused
#![warn(clippy::inefficient_to_string)] // `format!("{}", x)` vs `x.to_string()`
#![warn(clippy::map_clone)] // Cloning inside `map()` unnecessarily
#![warn(clippy::unnecessary_to_owned)] // Detects redundant `.to_owned()` or `.clone()`
#![warn(clippy::large_stack_arrays)] // Helps avoid stack overflows
#![warn(clippy::needless_collect)] // Avoids `.collect().iter()` chains

// Style and idiomatic Rust
#![warn(clippy::redundant_clone)] // Detects unnecessary `.clone()`
#![warn(clippy::needless_return)] // Avoids `return` at the end of functions
#![warn(clippy::let_unit_value)] // Avoids binding `()` to variables
#![warn(clippy::manual_map)] // Use `.map()` instead of manual `match`
#![warn(clippy::unwrap_used)] // Avoids using `unwrap()`
#![warn(clippy::panic)] // Avoids using `panic!` in production code

// Maintainability
#![warn(clippy::missing_safety_doc)] // Docs for `unsafe` functions
#![allow(clippy::too_many_arguments)]

//! PCM RIFF/WAVE reading and writing, plus a binaural beat generator built on the writer.
//!
//! Reading loads the whole file into a channel-major [`ndarray::Array2<i32>`] and reports
//! every chunk it walks through to a [`LogSink`]. Writing is streaming: the header is
//! emitted up front from the declared frame count and frames are pushed one by one.

pub mod binaural;
pub mod config;
pub mod error;
pub mod sinks;
pub mod traits;
pub mod types;
pub mod wav;

#[cfg(feature = "cli")]
pub mod cli;

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

pub use crate::{
    binaural::{BinauralJob, BinauralOutput, Synthesizer, generate_binaural, generate_binaural_to},
    config::KeyedConfig,
    error::{ErrorKind, ErrorPosition, WavIOError, WavIOResult},
    sinks::{MemoryLog, NullProgress, TracingLog, TracingProgress},
    traits::{FrameSink, LogSink, ProgressSink},
    types::{CancelToken, SampleEncoding, SampleValueRange},
    wav::{FormatCode, FormatDescriptor, WaveFile, WaveWriter, read_wave},
};

/// Read a whole WAVE file.
///
/// Same as [`WaveFile::open`]; every chunk visited is reported to `log`.
///
/// # Example
///
/// ```no_run
/// use binaural_wav::{TracingLog, read_wave_file};
///
/// let wave = read_wave_file("tone.wav", &TracingLog::new())?;
/// println!("{} frames at {} Hz", wave.num_frames(), wave.format().sample_rate);
/// # Ok::<(), binaural_wav::WavIOError>(())
/// ```
pub fn read_wave_file<P: AsRef<Path>>(fp: P, log: &dyn LogSink) -> WavIOResult<WaveFile> {
    WaveFile::open(fp, log)
}

/// Read a WAVE stream from an already opened file, buffering the reads.
pub fn read_wave_from(file: File, log: &dyn LogSink) -> WavIOResult<WaveFile> {
    read_wave(BufReader::new(file), log)
}

/// Create a file and write the WAVE header for `total_frames` frames.
///
/// The returned writer expects exactly `total_frames` frames before
/// [`WaveWriter::finish`] is called.
///
/// # Example
///
/// ```no_run
/// use binaural_wav::{FormatDescriptor, SampleEncoding, create_wave_file};
///
/// let format = FormatDescriptor::pcm(2, 8_000, SampleEncoding::SignedWord);
/// let mut writer = create_wave_file("out.wav", format, 8_000)?;
/// for _ in 0..8_000 {
///     writer.push_frame(0, 0)?;
/// }
/// writer.finish()?;
/// # Ok::<(), binaural_wav::WavIOError>(())
/// ```
pub fn create_wave_file<P: AsRef<Path>>(
    fp: P,
    format: FormatDescriptor,
    total_frames: u64,
) -> WavIOResult<WaveWriter<BufWriter<File>>> {
    let file = File::create(fp)?;
    WaveWriter::begin(BufWriter::new(file), format, total_frames)
}
