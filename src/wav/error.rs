use thiserror::Error;

use crate::{
    error::ErrorKind,
    wav::{chunks::ChunkID, compression_name},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WavError {
    #[error("WAV chunk parsing error: Chunk '{0}', Position {1}, Details: {2}")]
    ChunkParsingError(String, String, String),
    #[error("WAVE type RIFF file expected, found form type '{0}'")]
    NotWave(ChunkID),
    #[error("Compression code {0} ({name}) is not supported, only PCM (1) is", name = compression_name(.0))]
    UnsupportedCompression(u16),
    #[error("{0} channels are not supported, only 1 or 2")]
    UnsupportedChannels(u16),
    #[error("{0} bits per sample are not supported, only 8 or 16")]
    UnsupportedBitsPerSample(u16),
    #[error("Invalid FMT chunk size: found {0} bytes")]
    InvalidFmtChunkSize(u32),
    #[error("Chunk order violation: {0}")]
    ChunkOrder(String),
    #[error("Required chunk '{0}' was not found")]
    MissingChunk(ChunkID),
    #[error("Size overflow: {0}")]
    SizeOverflow(String),
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

impl WavError {
    pub fn chunk_parsing<S1: Into<String>, S2: Into<String>, S3: Into<String>>(
        chunk_id: S1,
        position: S2,
        details: S3,
    ) -> Self {
        WavError::ChunkParsingError(chunk_id.into(), position.into(), details.into())
    }

    pub fn chunk_order<S: Into<String>>(message: S) -> Self {
        WavError::ChunkOrder(message.into())
    }

    pub fn size_overflow<S: Into<String>>(message: S) -> Self {
        WavError::SizeOverflow(message.into())
    }

    pub fn invalid_format<S: Into<String>>(message: S) -> Self {
        WavError::InvalidFormat(message.into())
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            WavError::ChunkOrder(_) => ErrorKind::OrderError,
            WavError::SizeOverflow(_) => ErrorKind::SizeOverflow,
            _ => ErrorKind::FormatRejected,
        }
    }
}
