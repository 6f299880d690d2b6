//! Fixed-width reads and writes used by the RIFF reader and writer.
//!
//! Integers are little-endian except chunk tags, which are packed big-endian so that
//! `RIFF` reads as `0x52494646`. Short reads surface as [`WavIOError::UnexpectedEof`].

use std::io::{self, Read, Write};

use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::{
    error::{WavIOError, WavIOResult},
    wav::chunks::ChunkID,
};

fn map_read_err(what: &'static str) -> impl FnOnce(io::Error) -> WavIOError {
    move |e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            WavIOError::unexpected_eof(format!("reading {}", what))
        } else {
            WavIOError::Io(e)
        }
    }
}

pub trait ReadWavExt: Read {
    fn read_byte(&mut self) -> WavIOResult<u8> {
        ReadBytesExt::read_u8(self).map_err(map_read_err("byte"))
    }

    fn read_le_u16(&mut self) -> WavIOResult<u16> {
        ReadBytesExt::read_u16::<LittleEndian>(self).map_err(map_read_err("16-bit word"))
    }

    fn read_le_i16(&mut self) -> WavIOResult<i16> {
        ReadBytesExt::read_i16::<LittleEndian>(self).map_err(map_read_err("16-bit sample"))
    }

    fn read_le_u32(&mut self) -> WavIOResult<u32> {
        ReadBytesExt::read_u32::<LittleEndian>(self).map_err(map_read_err("32-bit word"))
    }

    /// Reads a four byte chunk tag.
    fn read_tag(&mut self) -> WavIOResult<ChunkID> {
        ReadBytesExt::read_u32::<BigEndian>(self)
            .map(ChunkID::from_be_u32)
            .map_err(map_read_err("chunk tag"))
    }

    /// Reads exactly `buf.len()` bytes.
    fn read_full(&mut self, buf: &mut [u8], what: &'static str) -> WavIOResult<()> {
        self.read_exact(buf).map_err(map_read_err(what))
    }

    /// Reads a body of `n` bytes declared by a header.
    ///
    /// The buffer grows with the bytes actually read, so a bogus size fails with
    /// `UnexpectedEof` instead of allocating it up front.
    fn read_vec(&mut self, n: u64, what: &'static str) -> WavIOResult<Vec<u8>>
    where
        Self: Sized,
    {
        let mut buf = Vec::new();
        self.by_ref().take(n).read_to_end(&mut buf)?;
        if (buf.len() as u64) < n {
            return Err(WavIOError::unexpected_eof(format!(
                "{}: {} bytes declared, only {} available",
                what,
                n,
                buf.len()
            )));
        }
        Ok(buf)
    }

    /// Discards `n` bytes.
    fn skip_bytes(&mut self, n: u64) -> WavIOResult<()>
    where
        Self: Sized,
    {
        let copied = io::copy(&mut self.by_ref().take(n), &mut io::sink())?;
        if copied < n {
            return Err(WavIOError::unexpected_eof(format!(
                "skipping {} bytes, only {} available",
                n, copied
            )));
        }
        Ok(())
    }
}

impl<R: Read + ?Sized> ReadWavExt for R {}

pub trait WriteWavExt: Write {
    fn write_byte(&mut self, value: u8) -> WavIOResult<()> {
        WriteBytesExt::write_u8(self, value)?;
        Ok(())
    }

    fn write_le_u16(&mut self, value: u16) -> WavIOResult<()> {
        WriteBytesExt::write_u16::<LittleEndian>(self, value)?;
        Ok(())
    }

    fn write_le_i16(&mut self, value: i16) -> WavIOResult<()> {
        WriteBytesExt::write_i16::<LittleEndian>(self, value)?;
        Ok(())
    }

    fn write_le_u32(&mut self, value: u32) -> WavIOResult<()> {
        WriteBytesExt::write_u32::<LittleEndian>(self, value)?;
        Ok(())
    }

    fn write_tag(&mut self, tag: ChunkID) -> WavIOResult<()> {
        WriteBytesExt::write_u32::<BigEndian>(self, tag.as_be_u32())?;
        Ok(())
    }
}

impl<W: Write + ?Sized> WriteWavExt for W {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Cursor;

    #[test]
    fn test_little_endian_reads() {
        let mut cursor = Cursor::new(vec![0x34, 0x12, 0x78, 0x56, 0x34, 0x12, 0xFF, 0xFF, 0x7F]);
        assert_eq!(cursor.read_le_u16().unwrap(), 0x1234);
        assert_eq!(cursor.read_le_u32().unwrap(), 0x1234_5678);
        assert_eq!(cursor.read_le_i16().unwrap(), -1);
        assert_eq!(cursor.read_byte().unwrap(), 0x7F);
    }

    #[test]
    fn test_tag_is_big_endian_packed() {
        let mut cursor = Cursor::new(b"RIFF".to_vec());
        let tag = cursor.read_tag().unwrap();
        assert_eq!(tag.as_be_u32(), 0x5249_4646);
        assert_eq!(tag.to_string(), "RIFF");
    }

    #[test]
    fn test_short_read_is_unexpected_eof() {
        let mut cursor = Cursor::new(vec![0x01, 0x02, 0x03]);
        let err = cursor.read_le_u32().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);

        let mut empty = Cursor::new(Vec::<u8>::new());
        assert!(empty.read_byte().unwrap_err().is_eof());
    }

    #[test]
    fn test_read_vec_stops_at_end_of_stream() {
        let mut cursor = Cursor::new(b"abcdef".to_vec());
        assert_eq!(cursor.read_vec(4, "text").unwrap(), b"abcd");

        let err = cursor.read_vec(u32::MAX as u64, "text").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
        assert_eq!(cursor.position(), 6);
    }

    #[test]
    fn test_skip_bytes() {
        let mut cursor = Cursor::new(vec![0u8; 10]);
        cursor.skip_bytes(6).unwrap();
        assert_eq!(cursor.position(), 6);
        assert!(cursor.skip_bytes(5).unwrap_err().is_eof());
    }

    #[test]
    fn test_writes_match_reads() {
        let mut buffer = Vec::new();
        buffer.write_tag(ChunkID::new(b"data")).unwrap();
        buffer.write_le_u32(0xDEAD_BEEF).unwrap();
        buffer.write_le_u16(0xCAFE).unwrap();
        buffer.write_le_i16(-2).unwrap();
        buffer.write_byte(0x80).unwrap();

        assert_eq!(&buffer[..4], b"data");
        assert_eq!(&buffer[4..8], &[0xEF, 0xBE, 0xAD, 0xDE]);
        assert_eq!(&buffer[8..10], &[0xFE, 0xCA]);
        assert_eq!(&buffer[10..12], &[0xFE, 0xFF]);
        assert_eq!(buffer[12], 0x80);
    }
}
