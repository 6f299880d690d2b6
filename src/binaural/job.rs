//! Turns a keyed-section configuration into a synthesis job.

use core::fmt::{Display, Formatter, Result as FmtResult};

use crate::{
    config::KeyedConfig,
    error::{WavIOError, WavIOResult},
    types::SampleValueRange,
    wav::{fmt::FormatDescriptor, streaming_writer::WaveLayout},
};

/// Longest job accepted, in seconds (10 hours).
pub const MAX_TOTAL_SECONDS: i64 = 36_000;
/// Most frames per channel accepted: 10 hours at 44.1 kHz.
pub const MAX_TOTAL_FRAMES: u64 = 1_587_600_000;

pub const DEFAULT_SAMPLE_RATE: i64 = 44_100;
pub const DEFAULT_FREQUENCY_HZ: i64 = 1;
pub const DEFAULT_AMPLITUDE: i64 = 10_000;

pub const GENERAL_SECTION: &str = "general";
pub const SAMPLE_RATE_KEY: &str = "samples per second";
pub const VALUE_RANGE_KEY: &str = "sample value range";
pub const DURATION_KEY: &str = "time duration in seconds";

const GENERAL_SECTION_ALIASES: [&str; 2] = [GENERAL_SECTION, "General"];
const VALUE_RANGE_KEY_ALIASES: [&str; 2] = [
    VALUE_RANGE_KEY,
    "sample value range (1 = signed word, 2 = unsigned byte)",
];

/// Frequency ramp and amplitude of one channel within a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneSpec {
    pub start_hz: i64,
    pub end_hz: i64,
    pub amplitude: i64,
}

impl ToneSpec {
    fn read(config: &KeyedConfig, section: &str, channel: &str) -> Self {
        ToneSpec {
            start_hz: config.read_int(
                section,
                &format!("{} channel starting frequency Hz", channel),
                DEFAULT_FREQUENCY_HZ,
            ),
            end_hz: config.read_int(
                section,
                &format!("{} channel ending frequency Hz", channel),
                DEFAULT_FREQUENCY_HZ,
            ),
            amplitude: config.read_int(
                section,
                &format!("{} channel amplitude", channel),
                DEFAULT_AMPLITUDE,
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    /// 1-based position, as in the `section N` header
    pub index: usize,
    pub left: ToneSpec,
    pub right: ToneSpec,
    pub duration_seconds: i64,
}

impl Section {
    pub fn name(&self) -> String {
        section_name(self.index)
    }
}

pub fn section_name(index: usize) -> String {
    format!("section {}", index)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinauralJob {
    pub sample_rate: u32,
    pub value_range: SampleValueRange,
    pub sections: Vec<Section>,
}

impl BinauralJob {
    /// Reads the `general` settings and the numbered sections.
    ///
    /// Sections are read from `section 1` upwards; the first one whose duration is
    /// missing, malformed or negative ends the list, even if later sections exist.
    ///
    /// # Errors
    ///
    /// [`WavIOError::InvalidConfig`] when the sample rate is not a positive 32-bit value.
    pub fn from_config(config: &KeyedConfig) -> WavIOResult<Self> {
        let sample_rate = read_general_int(config, &[SAMPLE_RATE_KEY], DEFAULT_SAMPLE_RATE);
        let sample_rate = u32::try_from(sample_rate)
            .ok()
            .filter(|&rate| rate > 0)
            .ok_or_else(|| {
                WavIOError::invalid_config(format!(
                    "{} must be between 1 and {}, found {}",
                    SAMPLE_RATE_KEY,
                    u32::MAX,
                    sample_rate
                ))
            })?;
        let value_range =
            SampleValueRange::from_setting(read_general_int(config, &VALUE_RANGE_KEY_ALIASES, 1));

        let mut sections = Vec::new();
        for index in 1.. {
            let name = section_name(index);
            let duration_seconds = config.read_int(&name, DURATION_KEY, -1);
            if duration_seconds < 0 {
                break;
            }
            sections.push(Section {
                index,
                left: ToneSpec::read(config, &name, "left"),
                right: ToneSpec::read(config, &name, "right"),
                duration_seconds,
            });
        }

        Ok(BinauralJob {
            sample_rate,
            value_range,
            sections,
        })
    }

    /// Sum of the section durations; `None` on overflow.
    pub fn total_seconds(&self) -> Option<i64> {
        self.sections
            .iter()
            .try_fold(0i64, |total, section| total.checked_add(section.duration_seconds))
    }

    pub fn section_frames(&self, section: &Section) -> u64 {
        self.sample_rate as u64 * section.duration_seconds.max(0) as u64
    }

    /// Validates the job limits and returns the total number of frames.
    ///
    /// Runs before any output exists, so a rejected job never creates a file.
    ///
    /// # Errors
    ///
    /// [`WavIOError::DurationLimit`] when the total duration is outside
    /// `0..=MAX_TOTAL_SECONDS`, [`WavIOError::FrameLimit`] when the frame count
    /// exceeds [`MAX_TOTAL_FRAMES`], and a `SizeOverflow` [`WavIOError::WavError`]
    /// when the audio does not fit the 32-bit chunk sizes of the output format.
    pub fn preflight(&self) -> WavIOResult<u64> {
        let total_seconds = self.total_seconds().unwrap_or(i64::MAX);
        if !(0..=MAX_TOTAL_SECONDS).contains(&total_seconds) {
            return Err(WavIOError::DurationLimit {
                total_seconds,
                max_seconds: MAX_TOTAL_SECONDS,
            });
        }
        let total_frames = self.sample_rate as u64 * total_seconds as u64;
        if total_frames > MAX_TOTAL_FRAMES {
            return Err(WavIOError::FrameLimit {
                total_frames,
                max_frames: MAX_TOTAL_FRAMES,
            });
        }
        WaveLayout::compute(&self.format(), total_frames, &[])?;
        Ok(total_frames)
    }

    /// Two channels at the job's sample rate and encoding.
    pub const fn format(&self) -> FormatDescriptor {
        FormatDescriptor::pcm(2, self.sample_rate, self.value_range.encoding())
    }
}

impl Display for BinauralJob {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{} Hz, sample value range {}, {} section(s)",
            self.sample_rate,
            self.value_range,
            self.sections.len()
        )
    }
}

fn read_general_int(config: &KeyedConfig, keys: &[&str], default: i64) -> i64 {
    GENERAL_SECTION_ALIASES
        .iter()
        .flat_map(|section| keys.iter().map(move |key| (*section, *key)))
        .find(|(section, key)| config.contains(section, key))
        .map_or(default, |(section, key)| config.read_int(section, key, default))
}
