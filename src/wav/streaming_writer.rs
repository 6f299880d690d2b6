//! Streaming WAVE writer.
//!
//! `WaveWriter` is told the number of frames up front, so every size field is known
//! before the first sample and the header is written once, at construction. The
//! output only needs `Write`, which makes pipes and sockets valid destinations.

use std::io::Write;

use tracing::warn;

use crate::{
    error::{WavIOError, WavIOResult},
    traits::FrameSink,
    types::SampleEncoding,
    wav::{
        chunks::{
            CHUNK_HEADER_SIZE, DATA_CHUNK, FMT_CHUNK, ICOP_CHUNK, INFO_LIST, LIST_CHUNK,
            RIFF_CHUNK, WAVE_FORM, pad_len,
        },
        data::{saturate, to_unsigned_byte},
        error::WavError,
        fmt::{FMT_BODY_SIZE, FormatDescriptor},
        primitives::WriteWavExt,
    },
};

/// Chunk sizes of a file holding `total_frames` frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveLayout {
    /// Value of the RIFF size field (file size minus 8)
    pub riff_size: u32,
    /// Body size of the LIST/INFO chunk, when copyright strings are written
    pub list_size: Option<u32>,
    pub data_size: u32,
}

impl WaveLayout {
    /// # Errors
    ///
    /// [`WavError::SizeOverflow`] when any size does not fit its 32-bit field and
    /// [`WavError::InvalidFormat`] when a copyright string holds a character above U+00FF.
    pub fn compute(
        format: &FormatDescriptor,
        total_frames: u64,
        copyrights: &[String],
    ) -> Result<Self, WavError> {
        let data_size = total_frames
            .checked_mul(format.frame_bytes() as u64)
            .and_then(|size| u32::try_from(size).ok())
            .ok_or_else(|| {
                WavError::size_overflow(format!(
                    "{} frames of {} bytes do not fit a data chunk",
                    total_frames,
                    format.frame_bytes()
                ))
            })?;

        let list_size = if copyrights.is_empty() {
            None
        } else {
            let mut size = 4u64;
            for text in copyrights {
                let len = latin1_bytes(text)?.len() as u64;
                size += CHUNK_HEADER_SIZE + len + (len & 1);
            }
            Some(u32::try_from(size).map_err(|_| WavError::size_overflow("LIST chunk too large"))?)
        };

        let riff_size = 4
            + CHUNK_HEADER_SIZE
            + FMT_BODY_SIZE as u64
            + list_size.map_or(0, |size| CHUNK_HEADER_SIZE + size as u64 + pad_len(size) as u64)
            + CHUNK_HEADER_SIZE
            + data_size as u64
            + pad_len(data_size) as u64;
        let riff_size = u32::try_from(riff_size).map_err(|_| {
            WavError::size_overflow(format!("RIFF size {} exceeds 4 GiB", riff_size))
        })?;

        Ok(WaveLayout {
            riff_size,
            list_size,
            data_size,
        })
    }

    /// Total number of bytes in the file
    pub const fn file_size(&self) -> u64 {
        CHUNK_HEADER_SIZE + self.riff_size as u64
    }
}

/// Encodes `text` with one byte per character.
pub(crate) fn latin1_bytes(text: &str) -> Result<Vec<u8>, WavError> {
    text.chars()
        .map(|c| {
            u8::try_from(c).map_err(|_| {
                WavError::invalid_format(format!("character {:?} can not be stored in ICOP", c))
            })
        })
        .collect()
}

/// A streaming WAVE writer.
///
/// # Finalization
///
/// Always call [`WaveWriter::finish`] after the last frame. It writes the pad byte of
/// an odd-sized data chunk and flushes the destination.
///
/// # Example
///
/// ```no_run
/// use binaural_wav::{FormatDescriptor, SampleEncoding, WaveWriter};
///
/// let format = FormatDescriptor::pcm(2, 44_100, SampleEncoding::SignedWord);
/// let file = std::io::BufWriter::new(std::fs::File::create("tone.wav")?);
/// let mut writer = WaveWriter::begin(file, format, 1)?;
/// writer.push_frame(1000, -1000)?;
/// writer.finish()?;
/// # Ok::<(), binaural_wav::WavIOError>(())
/// ```
pub struct WaveWriter<W: Write> {
    writer: W,
    format: FormatDescriptor,
    encoding: SampleEncoding,
    layout: WaveLayout,
    total_frames: u64,
    frames_written: u64,
    clipped_samples: u64,
    finished: bool,
}

impl<W: Write> WaveWriter<W> {
    /// Writes the RIFF, `fmt ` and `data` headers for `total_frames` frames.
    pub fn begin(writer: W, format: FormatDescriptor, total_frames: u64) -> WavIOResult<Self> {
        Self::begin_with_info(writer, format, total_frames, &[])
    }

    /// Like [`WaveWriter::begin`], with a LIST/INFO chunk holding one ICOP entry per
    /// string placed between `fmt ` and `data`.
    pub fn begin_with_info(
        mut writer: W,
        format: FormatDescriptor,
        total_frames: u64,
        copyrights: &[String],
    ) -> WavIOResult<Self> {
        format.validate()?;
        let encoding = format
            .encoding()
            .ok_or(WavError::UnsupportedBitsPerSample(format.bits_per_sample))?;
        let layout = WaveLayout::compute(&format, total_frames, copyrights)?;

        writer.write_tag(RIFF_CHUNK)?;
        writer.write_le_u32(layout.riff_size)?;
        writer.write_tag(WAVE_FORM)?;

        writer.write_tag(FMT_CHUNK)?;
        writer.write_le_u32(FMT_BODY_SIZE)?;
        writer.write_all(&format.to_bytes())?;

        if let Some(list_size) = layout.list_size {
            writer.write_tag(LIST_CHUNK)?;
            writer.write_le_u32(list_size)?;
            writer.write_tag(INFO_LIST)?;
            for text in copyrights {
                let bytes = latin1_bytes(text)?;
                writer.write_tag(ICOP_CHUNK)?;
                writer.write_le_u32(bytes.len() as u32)?;
                writer.write_all(&bytes)?;
                if bytes.len() % 2 == 1 {
                    writer.write_byte(0)?;
                }
            }
        }

        writer.write_tag(DATA_CHUNK)?;
        writer.write_le_u32(layout.data_size)?;

        Ok(WaveWriter {
            writer,
            format,
            encoding,
            layout,
            total_frames,
            frames_written: 0,
            clipped_samples: 0,
            finished: false,
        })
    }

    /// Appends one frame holding a signed value per channel.
    ///
    /// Values outside the range of the sample encoding saturate. 8-bit values are
    /// stored offset by 128.
    ///
    /// # Errors
    ///
    /// [`WavIOError::FrameOverflow`] once `total_frames` frames have been written, or
    /// any I/O error of the destination.
    pub fn push_samples(&mut self, frame: &[i32]) -> WavIOResult<()> {
        if self.finished {
            return Err(WavError::invalid_format("cannot write frames after finish()").into());
        }
        if frame.len() != self.format.channels as usize {
            return Err(WavError::invalid_format(format!(
                "frame has {} samples, writer has {} channels",
                frame.len(),
                self.format.channels
            ))
            .into());
        }
        if self.frames_written >= self.total_frames {
            return Err(WavIOError::FrameOverflow {
                declared: self.total_frames,
            });
        }

        for &value in frame {
            let (value, clipped) = saturate(self.encoding, value);
            if clipped {
                self.clipped_samples += 1;
            }
            match self.encoding {
                SampleEncoding::UnsignedByte => {
                    self.writer.write_byte(to_unsigned_byte(value as i8))?
                }
                SampleEncoding::SignedWord => self.writer.write_le_i16(value as i16)?,
            }
        }
        self.frames_written += 1;
        Ok(())
    }

    /// Appends one stereo frame. Both channels go through the same encoding.
    pub fn push_frame(&mut self, left: i32, right: i32) -> WavIOResult<()> {
        self.push_samples(&[left, right])
    }

    /// Writes the data pad byte when needed and flushes. Later calls do nothing.
    pub fn finish(&mut self) -> WavIOResult<()> {
        if self.finished {
            return Ok(());
        }
        if self.frames_written < self.total_frames {
            warn!(
                written = self.frames_written,
                declared = self.total_frames,
                "finishing WAVE output before all declared frames were written"
            );
        }
        if self.clipped_samples > 0 {
            warn!(
                clipped = self.clipped_samples,
                encoding = %self.encoding,
                "samples saturated to the encoding range"
            );
        }
        if pad_len(self.layout.data_size) == 1 {
            self.writer.write_byte(0)?;
        }
        self.writer.flush()?;
        self.finished = true;
        Ok(())
    }

    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    pub const fn frames_written(&self) -> u64 {
        self.frames_written
    }

    pub const fn total_frames(&self) -> u64 {
        self.total_frames
    }

    pub const fn clipped_samples(&self) -> u64 {
        self.clipped_samples
    }

    pub const fn format(&self) -> &FormatDescriptor {
        &self.format
    }

    pub const fn layout(&self) -> &WaveLayout {
        &self.layout
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }
}

impl<W: Write> FrameSink for WaveWriter<W> {
    fn push_frame(&mut self, left: i32, right: i32) -> WavIOResult<()> {
        WaveWriter::push_frame(self, left, right)
    }

    fn frames_written(&self) -> u64 {
        self.frames_written
    }

    fn finish(&mut self) -> WavIOResult<()> {
        WaveWriter::finish(self)
    }
}

impl<W: Write> Drop for WaveWriter<W> {
    fn drop(&mut self) {
        if !self.finished && self.frames_written > 0 {
            warn!(
                frames_written = self.frames_written,
                "WaveWriter dropped without calling finish(); odd-sized data may lack its pad byte"
            );
        }
    }
}
