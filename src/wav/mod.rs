pub mod chunks;
pub mod data;
pub mod error;
pub mod fmt;
pub mod primitives;
pub mod streaming_writer;
pub mod wav_file;
use core::fmt::{Display, Formatter, Result as FmtResult};
pub use chunks::{ChunkDesc, ChunkID, ChunkReader};
pub use fmt::FormatDescriptor;
pub use streaming_writer::{WaveLayout, WaveWriter};
pub use wav_file::{WaveFile, read_wave};

use crate::traits::LogSink;

/// WAV compression codes (wFormatTag) with names for the codes commonly found in the wild.
///
/// Only [`FormatCode::Pcm`] can be decoded; the rest exist so that a rejected file
/// can be reported by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum FormatCode {
    Unknown,
    /// PCM (uncompressed)
    Pcm,
    MicrosoftAdpcm,
    ALaw,
    MuLaw,
    ImaAdpcm,
    YamahaAdpcm,
    Gsm610,
    G721Adpcm,
    Mpeg,
    Experimental,
    /// Any code without a name
    Other(u16),
}

impl FormatCode {
    /// Canonical numeric WAV format tag
    pub const fn as_u16(self) -> u16 {
        match self {
            FormatCode::Unknown => 0x0000,
            FormatCode::Pcm => 0x0001,
            FormatCode::MicrosoftAdpcm => 0x0002,
            FormatCode::ALaw => 0x0006,
            FormatCode::MuLaw => 0x0007,
            FormatCode::ImaAdpcm => 0x0011,
            FormatCode::YamahaAdpcm => 0x0016,
            FormatCode::Gsm610 => 0x0031,
            FormatCode::G721Adpcm => 0x0040,
            FormatCode::Mpeg => 0x0050,
            FormatCode::Experimental => 0xFFFF,
            FormatCode::Other(code) => code,
        }
    }

    pub const fn const_from(code: u16) -> Self {
        match code {
            0x0000 => FormatCode::Unknown,
            0x0001 => FormatCode::Pcm,
            0x0002 => FormatCode::MicrosoftAdpcm,
            0x0006 => FormatCode::ALaw,
            0x0007 => FormatCode::MuLaw,
            0x0011 => FormatCode::ImaAdpcm,
            0x0016 => FormatCode::YamahaAdpcm,
            0x0031 => FormatCode::Gsm610,
            0x0040 => FormatCode::G721Adpcm,
            0x0050 => FormatCode::Mpeg,
            0xFFFF => FormatCode::Experimental,
            other => FormatCode::Other(other),
        }
    }

    /// Human-readable name
    pub const fn as_str(self) -> &'static str {
        match self {
            FormatCode::Unknown => "Unknown",
            FormatCode::Pcm => "PCM/uncompressed",
            FormatCode::MicrosoftAdpcm => "Microsoft ADPCM",
            FormatCode::ALaw => "ITU G.711 a-law",
            FormatCode::MuLaw => "ITU G.711 µ-law",
            FormatCode::ImaAdpcm => "IMA ADPCM",
            FormatCode::YamahaAdpcm => "ITU G.723 ADPCM (Yamaha)",
            FormatCode::Gsm610 => "GSM 6.10",
            FormatCode::G721Adpcm => "ITU G.721 ADPCM",
            FormatCode::Mpeg => "MPEG",
            FormatCode::Experimental => "Experimental",
            FormatCode::Other(_) => "unrecognised",
        }
    }

    /// True if this is raw integer PCM
    pub const fn is_pcm(self) -> bool {
        matches!(self, FormatCode::Pcm)
    }
}

impl From<u16> for FormatCode {
    fn from(code: u16) -> Self {
        FormatCode::const_from(code)
    }
}

impl From<FormatCode> for u16 {
    fn from(val: FormatCode) -> Self {
        val.as_u16()
    }
}

impl Display for FormatCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if f.alternate() {
            write!(f, "{} ({})", self.as_u16(), self.as_str())
        } else {
            write!(f, "{}", self.as_str())
        }
    }
}

pub(crate) fn compression_name(code: &u16) -> &'static str {
    FormatCode::const_from(*code).as_str()
}

/// Lines written to the log whenever a file is rejected for its format.
pub const FORMAT_REQUIREMENTS: &[&str] = &[
    "Supported file format:",
    "  RIFF container with form type WAVE",
    "  fmt chunk before the data chunk",
    "  compression code 1 (PCM/uncompressed)",
    "  1 (mono) or 2 (stereo) channels",
    "  8 bits (unsigned) or 16 bits (signed, little-endian) per sample",
    "  at most 2147483647 samples per channel",
    "  LIST/INFO ICOP (copyright) strings are read, other LIST entries are skipped",
    "  any other chunk is skipped",
];

pub fn log_format_requirements(log: &dyn LogSink) {
    for line in FORMAT_REQUIREMENTS {
        log.append_line(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_code_round_trip() {
        for code in [0u16, 1, 2, 6, 7, 0x11, 0x16, 0x31, 0x40, 0x50, 0xFFFF, 0x1234] {
            assert_eq!(FormatCode::from(code).as_u16(), code);
        }
    }

    #[test]
    fn test_format_code_names() {
        assert_eq!(FormatCode::from(2).as_str(), "Microsoft ADPCM");
        assert_eq!(format!("{:#}", FormatCode::Pcm), "1 (PCM/uncompressed)");
        assert_eq!(FormatCode::from(0x1234), FormatCode::Other(0x1234));
        assert!(FormatCode::Pcm.is_pcm());
        assert!(!FormatCode::MuLaw.is_pcm());
    }
}
