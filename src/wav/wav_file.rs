use core::fmt::{Display, Formatter, Result as FmtResult};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
    time::Duration,
};

use ndarray::{Array2, ArrayView1};
use tracing::{debug, warn};

use crate::{
    error::{ErrorKind, WavIOResult},
    traits::LogSink,
    types::SampleEncoding,
    wav::{
        chunks::{
            ChunkDesc, ChunkID, ChunkReader, DATA_CHUNK, FMT_CHUNK, ICOP_CHUNK, LIST_CHUNK,
            RIFF_CHUNK, WAVE_FORM,
        },
        data::{MAX_FRAMES, frame_count, from_unsigned_byte, read_sample_matrix},
        error::WavError,
        fmt::{FMT_BODY_SIZE, FmtChunk, FormatDescriptor},
        log_format_requirements,
        primitives::ReadWavExt,
        streaming_writer::WaveWriter,
    },
};

/// Bytes of an unknown chunk shown in the hex dump before it is cut short.
const HEX_DUMP_LIMIT: u64 = 64;
const HEX_DUMP_ROW: usize = 16;

/// Name used in log lines for data that does not come from a file.
const STREAM_NAME: &str = "<stream>";

/// A decoded PCM WAVE file.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveFile {
    file_path: Option<PathBuf>,
    riff_size: u32,
    format: FormatDescriptor,
    /// `[channel][frame]`; 8-bit samples are unsigned (0..=255), 16-bit samples signed
    samples: Array2<i32>,
    copyrights: Vec<String>,
    chunks: Vec<ChunkDesc>,
}

impl WaveFile {
    /// Opens and decodes the file at `path`.
    ///
    /// Every terminal error is also reported to `log` and its error file together
    /// with the file name.
    pub fn open<P: AsRef<Path>>(path: P, log: &dyn LogSink) -> WavIOResult<Self> {
        let path = path.as_ref();
        let name = path.display().to_string();
        log.append_line(&format!("Reading file: {}", name));

        let result = File::open(path)
            .map_err(Into::into)
            .and_then(|file| parse(BufReader::new(file), &name, log));
        match result {
            Ok(mut wave) => {
                wave.file_path = Some(path.to_path_buf());
                Ok(wave)
            }
            Err(e) => {
                log.report_error("Error reading file:", &name, &e.to_string());
                Err(e)
            }
        }
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub const fn format(&self) -> &FormatDescriptor {
        &self.format
    }

    pub const fn samples(&self) -> &Array2<i32> {
        &self.samples
    }

    /// Samples of one channel, `None` when `index` is out of range.
    pub fn channel(&self, index: usize) -> Option<ArrayView1<'_, i32>> {
        (index < self.samples.nrows()).then(|| self.samples.row(index))
    }

    /// ICOP strings, in file order
    pub fn copyrights(&self) -> &[String] {
        &self.copyrights
    }

    /// Every top-level chunk seen, in file order
    pub fn chunks(&self) -> &[ChunkDesc] {
        &self.chunks
    }

    pub fn has_chunk(&self, id: ChunkID) -> bool {
        self.chunks.iter().any(|chunk| chunk.id == id)
    }

    /// Value of the RIFF size field as read
    pub const fn riff_size(&self) -> u32 {
        self.riff_size
    }

    pub fn num_channels(&self) -> usize {
        self.samples.nrows()
    }

    pub fn num_frames(&self) -> usize {
        self.samples.ncols()
    }

    pub fn is_mono(&self) -> bool {
        self.num_channels() == 1
    }

    pub fn duration(&self) -> Duration {
        if self.format.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.num_frames() as f64 / self.format.sample_rate as f64)
    }

    /// Writes the file back out: RIFF, `fmt ` with the stored fields, a LIST/INFO
    /// chunk when there are copyright strings, and `data`. Other chunks are not kept.
    pub fn write_to<W: Write>(&self, writer: W) -> WavIOResult<()> {
        let mut out = WaveWriter::begin_with_info(
            writer,
            self.format,
            self.num_frames() as u64,
            &self.copyrights,
        )?;
        let eight_bit = self.format.encoding() == Some(SampleEncoding::UnsignedByte);
        let mut frame = vec![0i32; self.num_channels()];
        for column in self.samples.columns() {
            for (slot, &value) in frame.iter_mut().zip(column.iter()) {
                *slot = if eight_bit {
                    from_unsigned_byte(value.clamp(0, 255) as u8) as i32
                } else {
                    value
                };
            }
            out.push_samples(&frame)?;
        }
        out.finish()
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> WavIOResult<()> {
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file))?;
        Ok(())
    }

    /// Writes the first `max_frames` frames (all when `None`) to `log`, one line per frame.
    pub fn log_samples(&self, log: &dyn LogSink, max_frames: Option<usize>) {
        let shown = max_frames.map_or(self.num_frames(), |n| n.min(self.num_frames()));
        let header = (1..=self.num_channels())
            .map(|c| format!("channel {}", c))
            .collect::<Vec<_>>()
            .join(" , ");
        log.append_line(&header);
        for column in self.samples.columns().into_iter().take(shown) {
            let line = column
                .iter()
                .map(i32::to_string)
                .collect::<Vec<_>>()
                .join(" , ");
            log.append_line(&line);
        }
        if shown < self.num_frames() {
            log.append_line(&format!("... {} more frames", self.num_frames() - shown));
        }
    }
}

impl Display for WaveFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.file_path {
            Some(path) => writeln!(f, "WAVE File: {}", path.display())?,
            None => writeln!(f, "WAVE File: {}", STREAM_NAME)?,
        }
        writeln!(f, "RIFF size: {}", self.riff_size)?;
        writeln!(f, "{:#}", self.format)?;
        writeln!(f, "Samples per channel: {}", self.num_frames())?;
        writeln!(f, "Duration: {:.3} s", self.duration().as_secs_f64())?;
        for text in &self.copyrights {
            writeln!(f, "Copyright: {}", text)?;
        }
        write!(f, "Chunks:")?;
        for chunk in &self.chunks {
            write!(f, "\n  {}", chunk)?;
        }
        Ok(())
    }
}

/// Decodes a WAVE stream.
///
/// Progress and the structure of the file are written to `log`. When the file is
/// rejected for its format, the list of supported formats is logged as well.
pub fn read_wave<R: Read>(reader: R, log: &dyn LogSink) -> WavIOResult<WaveFile> {
    let result = parse(reader, STREAM_NAME, log);
    if let Err(e) = &result {
        log.report_error("Error reading file:", STREAM_NAME, &e.to_string());
    }
    result
}

fn parse<R: Read>(reader: R, name: &str, log: &dyn LogSink) -> WavIOResult<WaveFile> {
    let result = WaveParser::new(reader, log).run();
    if let Err(e) = &result {
        if matches!(
            e.kind(),
            ErrorKind::FormatRejected | ErrorKind::OrderError | ErrorKind::SizeOverflow
        ) {
            debug!(file = name, "format rejected");
            log_format_requirements(log);
        }
    }
    result
}

struct WaveParser<'l, R> {
    reader: ChunkReader<R>,
    log: &'l dyn LogSink,
    riff_size: Option<u32>,
    format: Option<FormatDescriptor>,
    samples: Option<Array2<i32>>,
    copyrights: Vec<String>,
    chunks: Vec<ChunkDesc>,
}

impl<'l, R: Read> WaveParser<'l, R> {
    fn new(reader: R, log: &'l dyn LogSink) -> Self {
        WaveParser {
            reader: ChunkReader::new(reader),
            log,
            riff_size: None,
            format: None,
            samples: None,
            copyrights: Vec::new(),
            chunks: Vec::new(),
        }
    }

    fn run(mut self) -> WavIOResult<WaveFile> {
        while let Some(chunk) = self.reader.next_chunk()? {
            self.log.append_line("");
            self.log.append_line(&format!(
                "Chunk ID: 0x{:08X}  as a text string: {}",
                chunk.id.as_be_u32(),
                chunk.id
            ));
            self.log.append_line(&format!("Chunk Data Size: {}", chunk.data_size));
            self.check_order(&chunk)?;
            self.chunks.push(chunk.clone());

            match chunk.id {
                RIFF_CHUNK => self.handle_riff(&chunk)?,
                FMT_CHUNK => self.handle_fmt(&chunk)?,
                DATA_CHUNK => self.handle_data(&chunk)?,
                LIST_CHUNK => self.handle_list(&chunk)?,
                _ => self.handle_unknown(&chunk)?,
            }
        }

        let riff_size = self.riff_size.ok_or(WavError::MissingChunk(RIFF_CHUNK))?;
        let format = self.format.ok_or(WavError::MissingChunk(FMT_CHUNK))?;
        let samples = self.samples.ok_or(WavError::MissingChunk(DATA_CHUNK))?;
        Ok(WaveFile {
            file_path: None,
            riff_size,
            format,
            samples,
            copyrights: self.copyrights,
            chunks: self.chunks,
        })
    }

    /// RIFF must open the stream and `fmt ` must come before `data`.
    fn check_order(&self, chunk: &ChunkDesc) -> Result<(), WavError> {
        if chunk.id != RIFF_CHUNK && self.riff_size.is_none() {
            return Err(WavError::chunk_order(format!(
                "'{}' chunk at offset {} before the RIFF header",
                chunk.id, chunk.offset
            )));
        }
        if chunk.id == DATA_CHUNK && self.format.is_none() {
            return Err(WavError::chunk_order("data chunk before fmt chunk"));
        }
        if chunk.id == FMT_CHUNK && self.samples.is_some() {
            return Err(WavError::chunk_order("fmt chunk after data chunk"));
        }
        Ok(())
    }

    /// The RIFF body is the rest of the stream; only its form type is consumed here.
    fn handle_riff(&mut self, chunk: &ChunkDesc) -> WavIOResult<()> {
        self.log.append_line("--- RIFF Type Chunk ---");
        let offset = self.reader.offset();
        let form = self.reader.read_tag().map_err(|e| e.at_offset(offset))?;
        self.log.append_line(&format!("File Type: {}", form));
        if form != WAVE_FORM {
            return Err(WavError::NotWave(form).into());
        }
        if self.riff_size.is_some() {
            warn!(offset = chunk.offset, "additional RIFF header");
        }
        self.riff_size = Some(chunk.data_size);
        Ok(())
    }

    fn handle_fmt(&mut self, chunk: &ChunkDesc) -> WavIOResult<()> {
        self.log.append_line("--- Format Chunk ---");
        if chunk.data_size < FMT_BODY_SIZE {
            return Err(WavError::InvalidFmtChunkSize(chunk.data_size).into());
        }
        let mut body = [0u8; FMT_BODY_SIZE as usize];
        let offset = self.reader.offset();
        self.reader
            .read_full(&mut body, "fmt chunk")
            .map_err(|e| e.at_offset(offset))?;
        let fmt = FmtChunk::from_bytes(&body)?;

        self.log.append_line(&format!("Compression Type: {:#}", fmt.format_code()));
        let format = fmt.validated()?;
        self.log.append_line(&format!("Number of Channels: {}", format.channels));
        self.log.append_line(&format!("Sample Rate: {}", format.sample_rate));
        self.log.append_line(&format!(
            "Average Bytes Per Second: {}",
            format.avg_bytes_per_second
        ));
        self.log.append_line(&format!("Block Align: {}", format.block_align));
        self.log.append_line(&format!(
            "Significant Bits per Sample: {}",
            format.bits_per_sample
        ));
        for issue in format.consistency_issues() {
            warn!("{}", issue);
            self.log.append_line(&format!("Warning: {}", issue));
        }

        let extra = (chunk.data_size - FMT_BODY_SIZE) as u64;
        if extra > 0 {
            self.log.append_line(&format!("Skipping {} extra format bytes", extra));
            self.reader.skip(extra)?;
        }
        self.finish_chunk(chunk)?;
        self.format = Some(format);
        Ok(())
    }

    fn handle_data(&mut self, chunk: &ChunkDesc) -> WavIOResult<()> {
        self.log.append_line("--- Data Chunk ---");
        if self.samples.is_some() {
            warn!(offset = chunk.offset, "skipping additional data chunk");
            self.log.append_line("Skipping additional data chunk");
            self.reader.skip(chunk.data_size as u64)?;
            return self.finish_chunk(chunk);
        }
        let format = self
            .format
            .ok_or_else(|| WavError::chunk_order("data chunk before fmt chunk"))?;

        let frames = frame_count(chunk.data_size, &format)?;
        debug_assert!(frames <= MAX_FRAMES);
        self.log.append_line(&format!("Number of Samples per Channel: {}", frames));

        let offset = self.reader.offset();
        let samples = read_sample_matrix(&mut self.reader, &format, frames)
            .map_err(|e| e.at_offset(offset))?;

        let leftover = chunk.data_size as u64 - frames * format.frame_bytes() as u64;
        if leftover > 0 {
            self.log.append_line(&format!("Skipping {} bytes after the last whole frame", leftover));
            self.reader.skip(leftover)?;
        }
        self.finish_chunk(chunk)?;
        self.samples = Some(samples);
        Ok(())
    }

    fn handle_list(&mut self, chunk: &ChunkDesc) -> WavIOResult<()> {
        self.log.append_line("--- List Chunk ---");
        if chunk.data_size < 4 {
            return Err(WavError::chunk_parsing(
                LIST_CHUNK.to_string(),
                chunk.offset.to_string(),
                format!("body of {} bytes has no list type", chunk.data_size),
            )
            .into());
        }
        let offset = self.reader.offset();
        let list_type = self.reader.read_tag().map_err(|e| e.at_offset(offset))?;
        self.log.append_line(&format!("List Type: {}", list_type));

        let end = self.reader.offset() + (chunk.data_size as u64 - 4);
        while let Some(sub) = self.reader.next_sub_chunk(end)? {
            if sub.id == ICOP_CHUNK {
                let text = self
                    .reader
                    .read_vec(sub.data_size as u64, "ICOP text")
                    .map_err(|e| e.at_offset(sub.body_offset()))?;
                let text: String = text.iter().map(|&b| b as char).collect();
                self.log.append_line(&format!("Copyright: {}", text));
                self.copyrights.push(text);
            } else {
                self.log.append_line(&format!(
                    "Skipping list entry {} ({} bytes)",
                    sub.id, sub.data_size
                ));
                self.reader.skip(sub.data_size as u64)?;
            }
            self.finish_chunk(&sub)?;
        }

        // A sub-chunk pad byte may already have consumed the LIST pad.
        if self.reader.offset() == chunk.body_end() {
            self.finish_chunk(chunk)?;
        }
        Ok(())
    }

    fn handle_unknown(&mut self, chunk: &ChunkDesc) -> WavIOResult<()> {
        self.log.append_line(&format!("--- Unknown Chunk '{}' ---", chunk.id));
        let shown = (chunk.data_size as u64).min(HEX_DUMP_LIMIT);
        let mut head = vec![0u8; shown as usize];
        let offset = self.reader.offset();
        self.reader
            .read_full(&mut head, "unknown chunk")
            .map_err(|e| e.at_offset(offset))?;
        for row in head.chunks(HEX_DUMP_ROW) {
            let line = row
                .iter()
                .map(|b| format!("0x{:02X}", b))
                .collect::<Vec<_>>()
                .join(" ");
            self.log.append_line(&line);
        }
        let rest = chunk.data_size as u64 - shown;
        if rest > 0 {
            self.log.append_line(&format!("... {} more bytes", rest));
            self.reader.skip(rest)?;
        }
        self.finish_chunk(chunk)
    }

    fn finish_chunk(&mut self, chunk: &ChunkDesc) -> WavIOResult<()> {
        if let Some(pad) = self.reader.finish_chunk(chunk)? {
            self.log.append_line(&format!("Padding byte: 0x{:02X}", pad));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::MemoryLog;
    use std::io::Cursor;

    fn chunk(id: &[u8; 4], body: &[u8]) -> Vec<u8> {
        let mut bytes = id.to_vec();
        bytes.extend_from_slice(&(body.len() as u32).to_le_bytes());
        bytes.extend_from_slice(body);
        if body.len() % 2 == 1 {
            bytes.push(0);
        }
        bytes
    }

    fn riff(chunks: &[Vec<u8>]) -> Vec<u8> {
        let body: Vec<u8> = chunks.concat();
        let mut bytes = b"RIFF".to_vec();
        bytes.extend_from_slice(&(4 + body.len() as u32).to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        bytes.extend(body);
        bytes
    }

    fn fmt_body(code: u16, channels: u16, rate: u32, bits: u16) -> Vec<u8> {
        let align = channels * bits / 8;
        let mut body = Vec::new();
        body.extend_from_slice(&code.to_le_bytes());
        body.extend_from_slice(&channels.to_le_bytes());
        body.extend_from_slice(&rate.to_le_bytes());
        body.extend_from_slice(&(rate * align as u32).to_le_bytes());
        body.extend_from_slice(&align.to_le_bytes());
        body.extend_from_slice(&bits.to_le_bytes());
        body
    }

    #[test]
    fn test_reads_mono_eight_bit() {
        let bytes = riff(&[chunk(b"fmt ", &fmt_body(1, 1, 8_000, 8)), chunk(b"data", &[0x80, 0x81, 0x7F])]);
        let log = MemoryLog::new();
        let wave = read_wave(Cursor::new(bytes), &log).unwrap();

        assert_eq!(wave.num_channels(), 1);
        assert_eq!(wave.channel(0).unwrap().to_vec(), vec![128, 129, 127]);
        assert!(wave.channel(1).is_none());
        assert_eq!(wave.chunks().len(), 3);
        assert!(log.contains("Padding byte: 0x00"));
        assert!(log.contains("Number of Samples per Channel: 3"));
    }

    #[test]
    fn test_fmt_extension_bytes_are_skipped() {
        let mut fmt = fmt_body(1, 2, 8_000, 16);
        fmt.extend_from_slice(&[0, 0]);
        let bytes = riff(&[chunk(b"fmt ", &fmt), chunk(b"data", &[1, 0, 2, 0])]);
        let wave = read_wave(Cursor::new(bytes), &MemoryLog::new()).unwrap();
        assert_eq!(wave.samples().column(0).to_vec(), vec![1, 2]);
    }

    #[test]
    fn test_unknown_chunk_is_dumped_and_skipped() {
        let bytes = riff(&[
            chunk(b"fmt ", &fmt_body(1, 1, 8_000, 16)),
            chunk(b"junk", &[0xAB; 70]),
            chunk(b"data", &[0xFF, 0x7F]),
        ]);
        let log = MemoryLog::new();
        let wave = read_wave(Cursor::new(bytes), &log).unwrap();
        assert_eq!(wave.samples()[[0, 0]], 32767);
        assert!(log.contains("0xAB 0xAB"));
        assert!(log.contains("... 6 more bytes"));
        assert!(wave.has_chunk(ChunkID::new(b"junk")));
    }

    #[test]
    fn test_list_keeps_only_icop() {
        let mut list = b"INFO".to_vec();
        list.extend(chunk(b"INAM", b"name"));
        list.extend(chunk(b"ICOP", b"Public Domain"));
        let bytes = riff(&[
            chunk(b"fmt ", &fmt_body(1, 1, 8_000, 8)),
            chunk(b"LIST", &list),
            chunk(b"data", &[0x80]),
        ]);
        let wave = read_wave(Cursor::new(bytes), &MemoryLog::new()).unwrap();
        assert_eq!(wave.copyrights(), &["Public Domain".to_string()]);
    }

    #[test]
    fn test_leftover_data_bytes_are_skipped() {
        let bytes = riff(&[
            chunk(b"fmt ", &fmt_body(1, 2, 8_000, 16)),
            chunk(b"data", &[1, 0, 2, 0, 9, 9]),
            chunk(b"tail", &[]),
        ]);
        let wave = read_wave(Cursor::new(bytes), &MemoryLog::new()).unwrap();
        assert_eq!(wave.num_frames(), 1);
        assert!(wave.has_chunk(ChunkID::new(b"tail")));
    }

    #[test]
    fn test_second_data_chunk_is_ignored() {
        let bytes = riff(&[
            chunk(b"fmt ", &fmt_body(1, 1, 8_000, 8)),
            chunk(b"data", &[1, 2]),
            chunk(b"data", &[3, 4, 5]),
        ]);
        let wave = read_wave(Cursor::new(bytes), &MemoryLog::new()).unwrap();
        assert_eq!(wave.channel(0).unwrap().to_vec(), vec![1, 2]);
    }

    #[test]
    fn test_ordering_errors() {
        let log = MemoryLog::new();
        let bytes = riff(&[chunk(b"data", &[1, 2]), chunk(b"fmt ", &fmt_body(1, 1, 8_000, 8))]);
        let err = read_wave(Cursor::new(bytes), &log).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OrderError);
        assert!(log.contains("Supported file format:"));

        let bytes = chunk(b"fmt ", &fmt_body(1, 1, 8_000, 8));
        let err = read_wave(Cursor::new(bytes), &MemoryLog::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OrderError);

        let bytes = riff(&[
            chunk(b"fmt ", &fmt_body(1, 1, 8_000, 8)),
            chunk(b"data", &[1, 2]),
            chunk(b"fmt ", &fmt_body(1, 1, 8_000, 8)),
        ]);
        let err = read_wave(Cursor::new(bytes), &MemoryLog::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OrderError);
    }

    #[test]
    fn test_rejections() {
        let mut bytes = riff(&[chunk(b"fmt ", &fmt_body(1, 1, 8_000, 8)), chunk(b"data", &[0])]);
        bytes[8..12].copy_from_slice(b"AVI ");
        let err = read_wave(Cursor::new(bytes), &MemoryLog::new()).unwrap_err();
        assert!(matches!(err, crate::WavIOError::WavError(WavError::NotWave(_))));

        let bytes = riff(&[chunk(b"fmt ", &fmt_body(1, 1, 8_000, 8))]);
        let err = read_wave(Cursor::new(bytes), &MemoryLog::new()).unwrap_err();
        assert!(matches!(err, crate::WavIOError::WavError(WavError::MissingChunk(DATA_CHUNK))));

        let err = read_wave(Cursor::new(Vec::new()), &MemoryLog::new()).unwrap_err();
        assert!(matches!(err, crate::WavIOError::WavError(WavError::MissingChunk(RIFF_CHUNK))));
    }

    #[test]
    fn test_truncated_data_is_unexpected_eof() {
        let mut bytes = riff(&[chunk(b"fmt ", &fmt_body(1, 1, 8_000, 16))]);
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&100u32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 10]);
        let err = read_wave(Cursor::new(bytes), &MemoryLog::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_oversized_icop_is_unexpected_eof() {
        let mut bytes = riff(&[chunk(b"fmt ", &fmt_body(1, 1, 8_000, 16))]);
        bytes.extend_from_slice(b"LIST");
        bytes.extend_from_slice(&0xFFFF_FFF0u32.to_le_bytes());
        bytes.extend_from_slice(b"INFOICOP");
        bytes.extend_from_slice(&0xFFFF_FF00u32.to_le_bytes());
        bytes.extend_from_slice(b"abc");
        let err = read_wave(Cursor::new(bytes), &MemoryLog::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
        assert!(err.to_string().contains("ICOP text"));
    }

    #[test]
    fn test_write_to_round_trip() {
        let mut list = b"INFO".to_vec();
        list.extend(chunk(b"ICOP", b"Public Domain"));
        let bytes = riff(&[
            chunk(b"fmt ", &fmt_body(1, 2, 11_025, 8)),
            chunk(b"LIST", &list),
            chunk(b"data", &[0x80, 0x7F, 0x00, 0xFF]),
        ]);
        let wave = read_wave(Cursor::new(bytes.clone()), &MemoryLog::new()).unwrap();
        let mut written = Vec::new();
        wave.write_to(&mut written).unwrap();
        assert_eq!(written, bytes);
    }

    #[test]
    fn test_log_samples_limits_output() {
        let bytes = riff(&[chunk(b"fmt ", &fmt_body(1, 2, 8_000, 8)), chunk(b"data", &[1, 2, 3, 4, 5, 6])]);
        let wave = read_wave(Cursor::new(bytes), &MemoryLog::new()).unwrap();
        let log = MemoryLog::new();
        wave.log_samples(&log, Some(2));
        assert_eq!(log.lines(), vec!["channel 1 , channel 2", "1 , 2", "3 , 4", "... 1 more frames"]);
    }
}
