use core::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// On-disk encoding of a single PCM sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleEncoding {
    /// 8 bits, unsigned, silence at 128
    UnsignedByte,
    /// 16 bits, signed two's complement, little-endian
    SignedWord,
}

impl SampleEncoding {
    pub const fn from_bits(bits_per_sample: u16) -> Option<Self> {
        match bits_per_sample {
            8 => Some(SampleEncoding::UnsignedByte),
            16 => Some(SampleEncoding::SignedWord),
            _ => None,
        }
    }

    pub const fn bits_per_sample(self) -> u16 {
        match self {
            SampleEncoding::UnsignedByte => 8,
            SampleEncoding::SignedWord => 16,
        }
    }

    pub const fn bytes_per_sample(self) -> u16 {
        self.bits_per_sample() / 8
    }

    /// Smallest signed value the writer accepts before saturating
    pub const fn min_signed(self) -> i32 {
        match self {
            SampleEncoding::UnsignedByte => i8::MIN as i32,
            SampleEncoding::SignedWord => i16::MIN as i32,
        }
    }

    /// Largest signed value the writer accepts before saturating
    pub const fn max_signed(self) -> i32 {
        match self {
            SampleEncoding::UnsignedByte => i8::MAX as i32,
            SampleEncoding::SignedWord => i16::MAX as i32,
        }
    }
}

impl Display for SampleEncoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            SampleEncoding::UnsignedByte => write!(f, "8-bit unsigned"),
            SampleEncoding::SignedWord => write!(f, "16-bit signed"),
        }
    }
}

/// The `sample value range` setting of a synthesis job: 1 selects 16-bit signed words,
/// anything else 8-bit unsigned bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleValueRange {
    SignedWord,
    UnsignedByte,
}

impl SampleValueRange {
    pub const fn from_setting(value: i64) -> Self {
        if value == 1 {
            SampleValueRange::SignedWord
        } else {
            SampleValueRange::UnsignedByte
        }
    }

    pub const fn setting(self) -> i64 {
        match self {
            SampleValueRange::SignedWord => 1,
            SampleValueRange::UnsignedByte => 2,
        }
    }

    pub const fn encoding(self) -> SampleEncoding {
        match self {
            SampleValueRange::SignedWord => SampleEncoding::SignedWord,
            SampleValueRange::UnsignedByte => SampleEncoding::UnsignedByte,
        }
    }
}

impl Display for SampleValueRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} ({})", self.setting(), self.encoding())
    }
}

/// Shared flag a host sets to stop a running synthesis job.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
