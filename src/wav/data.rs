use std::io::Read;

use ndarray::Array2;

use crate::{
    error::WavIOResult,
    types::SampleEncoding,
    wav::{error::WavError, fmt::FormatDescriptor, primitives::ReadWavExt},
};

/// Most frames per channel a `data` chunk may declare.
pub const MAX_FRAMES: u64 = i32::MAX as u64;

const READ_BLOCK_FRAMES: usize = 16 * 1024;

/// Interleaved PCM bytes of (part of) a `data` chunk body
#[derive(Debug, Clone)]
pub struct DataChunk<'a> {
    bytes: &'a [u8],
}

impl<'a> DataChunk<'a> {
    pub const fn from_bytes(bytes: &'a [u8]) -> DataChunk<'a> {
        DataChunk { bytes }
    }

    /// Whole frames contained in the bytes; a trailing partial frame is not counted.
    pub const fn total_frames(&self, encoding: SampleEncoding, num_channels: usize) -> usize {
        self.bytes.len() / (encoding.bytes_per_sample() as usize * num_channels)
    }

    /// Decodes whole frames, appending each channel's samples to its plane.
    ///
    /// 8-bit samples stay unsigned (0..=255), 16-bit samples are signed.
    pub fn decode_into(&self, encoding: SampleEncoding, planes: &mut [Vec<i32>]) {
        let num_channels = planes.len();
        if num_channels == 0 {
            return;
        }
        let frames = self.total_frames(encoding, num_channels);
        match encoding {
            SampleEncoding::UnsignedByte => {
                for frame in self.bytes.chunks_exact(num_channels).take(frames) {
                    for (plane, &byte) in planes.iter_mut().zip(frame) {
                        plane.push(byte as i32);
                    }
                }
            }
            SampleEncoding::SignedWord => {
                for frame in self.bytes.chunks_exact(num_channels * 2).take(frames) {
                    for (plane, pair) in planes.iter_mut().zip(frame.chunks_exact(2)) {
                        plane.push(i16::from_le_bytes([pair[0], pair[1]]) as i32);
                    }
                }
            }
        }
    }
}

/// Number of whole frames in a `data` body of `data_size` bytes.
///
/// # Errors
///
/// [`WavError::SizeOverflow`] when the count exceeds [`MAX_FRAMES`].
pub fn frame_count(data_size: u32, format: &FormatDescriptor) -> Result<u64, WavError> {
    let frame_bytes = format.frame_bytes();
    if frame_bytes == 0 {
        return Err(WavError::invalid_format("frame size of zero bytes"));
    }
    let frames = data_size as u64 / frame_bytes as u64;
    if frames > MAX_FRAMES {
        return Err(WavError::size_overflow(format!(
            "{} samples per channel, at most {} are supported",
            frames, MAX_FRAMES
        )));
    }
    Ok(frames)
}

/// Reads `frames` interleaved frames into a `[channels][frames]` matrix.
///
/// Memory grows with the data actually read, so a truncated stream with a huge
/// declared size fails with an EOF error instead of a large allocation.
pub fn read_sample_matrix<R: Read>(
    reader: &mut R,
    format: &FormatDescriptor,
    frames: u64,
) -> WavIOResult<Array2<i32>> {
    let encoding = format
        .encoding()
        .ok_or(WavError::UnsupportedBitsPerSample(format.bits_per_sample))?;
    let num_channels = format.channels as usize;
    let frame_bytes = format.frame_bytes() as usize;
    let frames = frames as usize;

    let mut planes: Vec<Vec<i32>> = (0..num_channels)
        .map(|_| Vec::with_capacity(frames.min(READ_BLOCK_FRAMES)))
        .collect();
    let mut buffer = vec![0u8; frames.min(READ_BLOCK_FRAMES) * frame_bytes];

    let mut remaining = frames;
    while remaining > 0 {
        let n = remaining.min(READ_BLOCK_FRAMES);
        let block = &mut buffer[..n * frame_bytes];
        reader.read_full(block, "sample data")?;
        DataChunk::from_bytes(block).decode_into(encoding, &mut planes);
        remaining -= n;
    }

    let flat = planes.concat();
    Array2::from_shape_vec((num_channels, frames), flat)
        .map_err(|e| WavError::invalid_format(format!("sample matrix: {}", e)).into())
}

/// Clamps a signed sample to the range of `encoding`. The flag is set when clamping
/// changed the value.
#[inline]
pub const fn saturate(encoding: SampleEncoding, value: i32) -> (i32, bool) {
    let min = encoding.min_signed();
    let max = encoding.max_signed();
    if value < min {
        (min, true)
    } else if value > max {
        (max, true)
    } else {
        (value, false)
    }
}

/// Signed 8-bit value to its unsigned on-disk byte.
#[inline]
pub const fn to_unsigned_byte(value: i8) -> u8 {
    (value as u8) ^ 0x80
}

/// Unsigned on-disk byte back to its signed value.
#[inline]
pub const fn from_unsigned_byte(value: u8) -> i8 {
    (value ^ 0x80) as i8
}
