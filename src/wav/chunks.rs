use core::fmt::{Display, Formatter, Result as FmtResult};
use std::io::{self, Read};

use tracing::{debug, warn};

use crate::{
    error::WavIOResult,
    wav::{error::WavError, primitives::ReadWavExt},
};

/// Size of a chunk header: four byte tag plus little-endian u32 body size.
pub const CHUNK_HEADER_SIZE: u64 = 8;

/// FourCC chunk identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChunkID {
    pub id: [u8; 4],
}

/// Renders the tag as four characters, with `.` standing in for unprintable bytes.
impl Display for ChunkID {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for &b in &self.id {
            let c = if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '.'
            };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl ChunkID {
    #[inline]
    pub const fn new(id: &[u8; 4]) -> Self {
        ChunkID { id: *id }
    }

    /// Builds a tag from its big-endian packed value, `0x52494646` being `RIFF`.
    #[inline]
    pub const fn from_be_u32(value: u32) -> Self {
        ChunkID {
            id: value.to_be_bytes(),
        }
    }

    #[inline]
    pub const fn as_be_u32(&self) -> u32 {
        u32::from_be_bytes(self.id)
    }
}

/// Number of pad bytes following a chunk body of `data_size` bytes.
#[inline]
pub const fn pad_len(data_size: u32) -> u32 {
    data_size & 1
}

/// Lightweight description of a RIFF/WAV chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkDesc {
    pub id: ChunkID,
    /// Absolute offset of the chunk header
    pub offset: u64,
    /// Size of the chunk body as declared in the header (excluding header and padding)
    pub data_size: u32,
}

impl ChunkDesc {
    #[inline]
    pub const fn pad_len(&self) -> u32 {
        pad_len(self.data_size)
    }

    /// Offset of the first body byte
    #[inline]
    pub const fn body_offset(&self) -> u64 {
        self.offset + CHUNK_HEADER_SIZE
    }

    /// Offset just past the body, before any padding
    #[inline]
    pub const fn body_end(&self) -> u64 {
        self.body_offset() + self.data_size as u64
    }

    /// Total size including header and padding
    #[inline]
    pub const fn total_size(&self) -> u64 {
        CHUNK_HEADER_SIZE + self.data_size as u64 + self.pad_len() as u64
    }
}

impl Display for ChunkDesc {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "Chunk ID: 0x{:08X} ({}), Offset: {}, Data Size: {}, Total Size: {}",
            self.id.as_be_u32(),
            self.id,
            self.offset,
            self.data_size,
            self.total_size()
        )
    }
}

pub const RIFF_CHUNK: ChunkID = ChunkID::new(b"RIFF");
pub const WAVE_FORM: ChunkID = ChunkID::new(b"WAVE");
pub const FMT_CHUNK: ChunkID = ChunkID::new(b"fmt ");
pub const DATA_CHUNK: ChunkID = ChunkID::new(b"data");
pub const LIST_CHUNK: ChunkID = ChunkID::new(b"LIST");
pub const INFO_LIST: ChunkID = ChunkID::new(b"INFO");
pub const ICOP_CHUNK: ChunkID = ChunkID::new(b"ICOP");

/// Sequential chunk walker over any byte stream.
///
/// Tracks the absolute offset of every byte consumed, so chunk descriptors and
/// errors can be reported by position. Chunks are yielded strictly in file order.
#[derive(Debug)]
pub struct ChunkReader<R> {
    inner: R,
    offset: u64,
}

impl<R: Read> Read for ChunkReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.offset += n as u64;
        Ok(n)
    }
}

impl<R: Read> ChunkReader<R> {
    pub const fn new(inner: R) -> Self {
        ChunkReader { inner, offset: 0 }
    }

    /// Number of bytes consumed so far
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Reads the next chunk header.
    ///
    /// Returns `Ok(None)` when the stream ends anywhere inside the 8-byte header.
    /// This is the only place where running out of input is not an error.
    pub fn next_chunk(&mut self) -> WavIOResult<Option<ChunkDesc>> {
        let offset = self.offset;
        let id = match self.read_tag() {
            Ok(id) => id,
            Err(e) if e.is_eof() => {
                if self.offset > offset {
                    warn!(offset, "ignoring {} trailing bytes", self.offset - offset);
                }
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        let data_size = match self.read_le_u32() {
            Ok(size) => size,
            Err(e) if e.is_eof() => {
                warn!(offset, chunk = %id, "stream ends inside chunk header");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        debug!(offset, chunk = %id, data_size, "chunk header");
        Ok(Some(ChunkDesc {
            id,
            offset,
            data_size,
        }))
    }

    /// Reads the next sub-chunk of a nested body that ends at absolute offset `end`.
    ///
    /// A budget smaller than a chunk header is skipped. A sub-chunk whose header and
    /// body do not fit in the remaining budget is rejected.
    pub fn next_sub_chunk(&mut self, end: u64) -> WavIOResult<Option<ChunkDesc>> {
        let remaining = end.saturating_sub(self.offset);
        if remaining == 0 {
            return Ok(None);
        }
        if remaining < CHUNK_HEADER_SIZE {
            warn!(offset = self.offset, remaining, "skipping trailing bytes of nested body");
            self.skip(remaining)?;
            return Ok(None);
        }

        let offset = self.offset;
        let id = self.read_tag().map_err(|e| e.at_offset(offset))?;
        let data_size = self.read_le_u32().map_err(|e| e.at_offset(offset))?;
        if CHUNK_HEADER_SIZE + data_size as u64 > remaining {
            return Err(WavError::chunk_parsing(
                id.to_string(),
                offset.to_string(),
                format!(
                    "sub-chunk of {} bytes does not fit the {} bytes left in its parent",
                    data_size,
                    remaining - CHUNK_HEADER_SIZE
                ),
            )
            .into());
        }
        Ok(Some(ChunkDesc {
            id,
            offset,
            data_size,
        }))
    }

    /// Discards `n` bytes of the current chunk body.
    pub fn skip(&mut self, n: u64) -> WavIOResult<()> {
        let offset = self.offset;
        self.skip_bytes(n).map_err(|e| e.at_offset(offset))
    }

    /// Consumes the pad byte that follows an odd-sized body. Returns its value.
    pub fn finish_chunk(&mut self, chunk: &ChunkDesc) -> WavIOResult<Option<u8>> {
        if chunk.pad_len() == 0 {
            return Ok(None);
        }
        let offset = self.offset;
        let pad = self.read_byte().map_err(|e| e.at_offset(offset))?;
        Ok(Some(pad))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Cursor;

    fn chunk_bytes(id: &[u8; 4], body: &[u8]) -> Vec<u8> {
        let mut bytes = id.to_vec();
        bytes.extend_from_slice(&(body.len() as u32).to_le_bytes());
        bytes.extend_from_slice(body);
        if body.len() % 2 == 1 {
            bytes.push(0);
        }
        bytes
    }

    #[test]
    fn test_chunk_id_rendering() {
        assert_eq!(FMT_CHUNK.to_string(), "fmt ");
        assert_eq!(FMT_CHUNK.as_be_u32(), 0x666D_7420);
        assert_eq!(ChunkID::from_be_u32(0x6461_7461), DATA_CHUNK);
        assert_eq!(ChunkID::new(&[0, b'a', 0xFF, b'b']).to_string(), ".a.b");
    }

    #[test]
    fn test_walks_chunks_with_padding() {
        let mut bytes = chunk_bytes(b"abcd", &[1, 2, 3]);
        bytes.extend(chunk_bytes(b"efgh", &[4, 5]));
        let mut reader = ChunkReader::new(Cursor::new(bytes));

        let first = reader.next_chunk().unwrap().unwrap();
        assert_eq!(first.id, ChunkID::new(b"abcd"));
        assert_eq!(first.data_size, 3);
        assert_eq!(first.total_size(), 12);
        reader.skip(3).unwrap();
        assert_eq!(reader.finish_chunk(&first).unwrap(), Some(0));

        let second = reader.next_chunk().unwrap().unwrap();
        assert_eq!(second.offset, 12);
        assert_eq!(second.id, ChunkID::new(b"efgh"));
        reader.skip(2).unwrap();
        assert_eq!(reader.finish_chunk(&second).unwrap(), None);

        assert!(reader.next_chunk().unwrap().is_none());
    }

    #[test]
    fn test_partial_header_is_end_of_stream() {
        let mut reader = ChunkReader::new(Cursor::new(b"dat".to_vec()));
        assert!(reader.next_chunk().unwrap().is_none());

        let mut reader = ChunkReader::new(Cursor::new(b"data\x10\x00".to_vec()));
        assert!(reader.next_chunk().unwrap().is_none());
    }

    #[test]
    fn test_missing_pad_byte_is_an_error() {
        let bytes = b"abcd\x01\x00\x00\x00\x07".to_vec();
        let mut reader = ChunkReader::new(Cursor::new(bytes));
        let chunk = reader.next_chunk().unwrap().unwrap();
        reader.skip(1).unwrap();
        let err = reader.finish_chunk(&chunk).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_sub_chunk_budget() {
        let mut bytes = chunk_bytes(b"ICOP", b"abc");
        bytes.extend(chunk_bytes(b"INAM", &[0u8; 20]));
        let end = 12;
        let mut reader = ChunkReader::new(Cursor::new(bytes));

        let icop = reader.next_sub_chunk(end).unwrap().unwrap();
        assert_eq!(icop.id, ICOP_CHUNK);
        reader.skip(3).unwrap();
        reader.finish_chunk(&icop).unwrap();
        assert!(reader.next_sub_chunk(end).unwrap().is_none());

        // The second sub-chunk claims more bytes than a 20 byte budget allows.
        let mut reader = ChunkReader::new(Cursor::new(chunk_bytes(b"INAM", &[0u8; 20])));
        let err = reader.next_sub_chunk(20).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FormatRejected);
    }
}
