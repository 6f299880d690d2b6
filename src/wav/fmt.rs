use core::fmt::{Display, Formatter, Result as FmtResult};

use crate::{
    types::SampleEncoding,
    wav::{FormatCode, error::WavError},
};

/// Size of the PCM fields at the start of every `fmt ` body.
pub const FMT_BODY_SIZE: u32 = 16;

/// Borrowed view over the 16 PCM bytes of a `fmt ` chunk body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FmtChunk<'a> {
    bytes: &'a [u8; 16],
}

impl<'a> FmtChunk<'a> {
    /// Primary constructor for FmtChunk
    ///
    /// # Arguments
    ///
    /// * `bytes` - The first 16 bytes of a `fmt ` chunk body
    ///
    /// # Returns
    ///
    /// Ok(FmtChunk) if at least 16 bytes are given, Err(WavError) otherwise
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self, WavError> {
        let b: &[u8; 16] = bytes
            .get(..16)
            .and_then(|head| head.try_into().ok())
            .ok_or(WavError::InvalidFmtChunkSize(bytes.len() as u32))?;
        Ok(FmtChunk { bytes: b })
    }

    pub const fn compression_code(&self) -> u16 {
        u16::from_le_bytes([self.bytes[0], self.bytes[1]])
    }

    pub const fn format_code(&self) -> FormatCode {
        FormatCode::const_from(self.compression_code())
    }

    pub const fn channels(&self) -> u16 {
        u16::from_le_bytes([self.bytes[2], self.bytes[3]])
    }

    /// Sample rate in Hz
    pub const fn sample_rate(&self) -> u32 {
        u32::from_le_bytes([self.bytes[4], self.bytes[5], self.bytes[6], self.bytes[7]])
    }

    /// Number of bytes per second of audio data
    pub const fn avg_bytes_per_second(&self) -> u32 {
        u32::from_le_bytes([self.bytes[8], self.bytes[9], self.bytes[10], self.bytes[11]])
    }

    /// Number of bytes per sample frame (all channels)
    pub const fn block_align(&self) -> u16 {
        u16::from_le_bytes([self.bytes[12], self.bytes[13]])
    }

    pub const fn bits_per_sample(&self) -> u16 {
        u16::from_le_bytes([self.bytes[14], self.bytes[15]])
    }

    /// Copies the fields out without validating them.
    pub const fn descriptor(&self) -> FormatDescriptor {
        FormatDescriptor {
            compression_code: self.compression_code(),
            channels: self.channels(),
            sample_rate: self.sample_rate(),
            avg_bytes_per_second: self.avg_bytes_per_second(),
            block_align: self.block_align(),
            bits_per_sample: self.bits_per_sample(),
        }
    }

    /// Copies the fields out and checks that they describe something this crate can decode.
    ///
    /// # Errors
    ///
    /// [`WavError::UnsupportedCompression`] unless the compression code is 1 (PCM),
    /// [`WavError::UnsupportedChannels`] unless there are 1 or 2 channels and
    /// [`WavError::UnsupportedBitsPerSample`] unless samples are 8 or 16 bits wide.
    pub fn validated(&self) -> Result<FormatDescriptor, WavError> {
        let descriptor = self.descriptor();
        descriptor.validate()?;
        Ok(descriptor)
    }
}

/// PCM format description as stored in a `fmt ` chunk.
///
/// The fields are kept exactly as read so a file can be written back byte for byte,
/// even when `block_align` or `avg_bytes_per_second` disagree with the other fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatDescriptor {
    pub compression_code: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub avg_bytes_per_second: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
}

impl FormatDescriptor {
    /// Uncompressed PCM format with derived `block_align` and `avg_bytes_per_second`.
    pub const fn pcm(channels: u16, sample_rate: u32, encoding: SampleEncoding) -> Self {
        let bits_per_sample = encoding.bits_per_sample();
        let block_align = channels * bits_per_sample / 8;
        FormatDescriptor {
            compression_code: FormatCode::Pcm.as_u16(),
            channels,
            sample_rate,
            avg_bytes_per_second: sample_rate.saturating_mul(block_align as u32),
            block_align,
            bits_per_sample,
        }
    }

    pub const fn format_code(&self) -> FormatCode {
        FormatCode::const_from(self.compression_code)
    }

    pub const fn encoding(&self) -> Option<SampleEncoding> {
        SampleEncoding::from_bits(self.bits_per_sample)
    }

    /// Bytes per frame derived from `channels` and `bits_per_sample`, independent of
    /// the stored `block_align`.
    pub const fn frame_bytes(&self) -> u32 {
        self.channels as u32 * (self.bits_per_sample as u32 / 8)
    }

    pub fn validate(&self) -> Result<(), WavError> {
        if !self.format_code().is_pcm() {
            return Err(WavError::UnsupportedCompression(self.compression_code));
        }
        if !(1..=2).contains(&self.channels) {
            return Err(WavError::UnsupportedChannels(self.channels));
        }
        if self.encoding().is_none() {
            return Err(WavError::UnsupportedBitsPerSample(self.bits_per_sample));
        }
        Ok(())
    }

    /// Mismatches between the stored derived fields and the values implied by the
    /// other fields. These are reported but never rejected.
    pub fn consistency_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        let expected_block_align = self.frame_bytes();
        if self.block_align as u32 != expected_block_align {
            issues.push(format!(
                "Block align {} does not match expected {} (channels {} * bytes_per_sample {})",
                self.block_align,
                expected_block_align,
                self.channels,
                self.bits_per_sample / 8
            ));
        }

        let expected_byte_rate = self.sample_rate as u64 * expected_block_align as u64;
        if self.avg_bytes_per_second as u64 != expected_byte_rate {
            issues.push(format!(
                "Average bytes per second {} does not match expected {} (sample_rate {} * block_align {})",
                self.avg_bytes_per_second, expected_byte_rate, self.sample_rate, expected_block_align
            ));
        }

        issues
    }

    /// The 16 bytes of a `fmt ` body, in file order.
    pub fn to_bytes(&self) -> [u8; 16] {
        let mut bytes = [0u8; 16];
        bytes[0..2].copy_from_slice(&self.compression_code.to_le_bytes());
        bytes[2..4].copy_from_slice(&self.channels.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.sample_rate.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.avg_bytes_per_second.to_le_bytes());
        bytes[12..14].copy_from_slice(&self.block_align.to_le_bytes());
        bytes[14..16].copy_from_slice(&self.bits_per_sample.to_le_bytes());
        bytes
    }
}

impl Display for FormatDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if f.alternate() {
            writeln!(f, "Compression Type: {:#}", self.format_code())?;
            writeln!(f, "Number of Channels: {}", self.channels)?;
            writeln!(f, "Sample Rate: {}", self.sample_rate)?;
            writeln!(f, "Average Bytes Per Second: {}", self.avg_bytes_per_second)?;
            writeln!(f, "Block Align: {}", self.block_align)?;
            write!(f, "Significant Bits per Sample: {}", self.bits_per_sample)
        } else {
            write!(
                f,
                "FormatDescriptor {{ compression: {}, channels: {}, sample_rate: {}, avg_bytes_per_second: {}, block_align: {}, bits_per_sample: {} }}",
                self.compression_code,
                self.channels,
                self.sample_rate,
                self.avg_bytes_per_second,
                self.block_align,
                self.bits_per_sample
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_base_fmt_bytes(
        format_code: u16,
        channels: u16,
        sample_rate: u32,
        byte_rate: u32,
        block_align: u16,
        bits_per_sample: u16,
    ) -> [u8; 16] {
        let mut bytes = [0u8; 16];
        bytes[0..2].copy_from_slice(&format_code.to_le_bytes());
        bytes[2..4].copy_from_slice(&channels.to_le_bytes());
        bytes[4..8].copy_from_slice(&sample_rate.to_le_bytes());
        bytes[8..12].copy_from_slice(&byte_rate.to_le_bytes());
        bytes[12..14].copy_from_slice(&block_align.to_le_bytes());
        bytes[14..16].copy_from_slice(&bits_per_sample.to_le_bytes());
        bytes
    }

    #[test]
    fn test_fmt_accessors() {
        let bytes = make_base_fmt_bytes(1, 2, 44_100, 176_400, 4, 16);
        let fmt = FmtChunk::from_bytes(&bytes).unwrap();
        assert_eq!(fmt.format_code(), FormatCode::Pcm);
        assert_eq!(fmt.channels(), 2);
        assert_eq!(fmt.sample_rate(), 44_100);
        assert_eq!(fmt.avg_bytes_per_second(), 176_400);
        assert_eq!(fmt.block_align(), 4);
        assert_eq!(fmt.bits_per_sample(), 16);
        assert_eq!(fmt.validated().unwrap(), FormatDescriptor::pcm(2, 44_100, SampleEncoding::SignedWord));
    }

    #[test]
    fn test_fmt_rejects_short_body() {
        let err = FmtChunk::from_bytes(&[0u8; 14]).unwrap_err();
        assert_eq!(err, WavError::InvalidFmtChunkSize(14));
    }

    #[test]
    fn test_fmt_rejects_compressed_formats() {
        let bytes = make_base_fmt_bytes(2, 1, 8_000, 4_000, 256, 4);
        let fmt = FmtChunk::from_bytes(&bytes).unwrap();
        let err = fmt.validated().unwrap_err();
        assert_eq!(err, WavError::UnsupportedCompression(2));
        assert!(err.to_string().contains("Microsoft ADPCM"));
    }

    #[test]
    fn test_fmt_rejects_channel_and_bit_counts() {
        let bytes = make_base_fmt_bytes(1, 6, 48_000, 576_000, 12, 16);
        let err = FmtChunk::from_bytes(&bytes).unwrap().validated().unwrap_err();
        assert_eq!(err, WavError::UnsupportedChannels(6));

        let bytes = make_base_fmt_bytes(1, 2, 48_000, 288_000, 6, 24);
        let err = FmtChunk::from_bytes(&bytes).unwrap().validated().unwrap_err();
        assert_eq!(err, WavError::UnsupportedBitsPerSample(24));
    }

    #[test]
    fn test_consistency_issues_report_block_align_mismatch() {
        // For 2ch, 16-bit, expected block_align = 4, but we set 2
        let bytes = make_base_fmt_bytes(1, 2, 44_100, 176_400, 2, 16);
        let descriptor = FmtChunk::from_bytes(&bytes).unwrap().validated().unwrap();
        let issues = descriptor.consistency_issues();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("Block align 2 does not match expected 4"));
    }

    #[test]
    fn test_consistency_issues_report_byte_rate_mismatch() {
        let bytes = make_base_fmt_bytes(1, 2, 48_000, 1_000, 4, 16);
        let descriptor = FmtChunk::from_bytes(&bytes).unwrap().descriptor();
        let issues = descriptor.consistency_issues();
        assert!(issues[0].contains("Average bytes per second 1000 does not match expected 192000"));
    }

    #[test]
    fn test_descriptor_bytes_match_source() {
        let bytes = make_base_fmt_bytes(1, 1, 8_000, 8_000, 1, 8);
        let descriptor = FmtChunk::from_bytes(&bytes).unwrap().descriptor();
        assert_eq!(descriptor.to_bytes(), bytes);
        assert!(descriptor.consistency_issues().is_empty());
    }

    #[test]
    fn test_alternate_display_lists_fields() {
        let descriptor = FormatDescriptor::pcm(1, 8_000, SampleEncoding::UnsignedByte);
        let dump = format!("{:#}", descriptor);
        assert!(dump.contains("Compression Type: 1 (PCM/uncompressed)"));
        assert!(dump.contains("Significant Bits per Sample: 8"));
    }
}
