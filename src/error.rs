use crate::wav::error::WavError;

use core::fmt::{Display, Formatter, Result as FmtResult};
use std::{io, path::PathBuf};
use thiserror::Error;

/// Result type for binaural_wav operations
#[allow(clippy::result_large_err)]
pub type WavIOResult<T> = Result<T, WavIOError>;

/// Error type for every fallible operation in the crate
#[derive(Debug, Error)]
pub enum WavIOError {
    /// File I/O errors (file not found, permission denied, failed write, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The stream ended inside a value that had to be read in full
    #[error("Unexpected end of file at {position}: {context}")]
    UnexpectedEof {
        context: String,
        position: ErrorPosition,
    },

    #[error("Wav error: {0}")]
    WavError(#[from] WavError),

    #[error("Could not open configuration file {path:?}: {source}")]
    ConfigOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A configuration value that can not be turned into a job
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Total time duration of {total_seconds} seconds is outside 0..={max_seconds}")]
    DurationLimit { total_seconds: i64, max_seconds: i64 },

    #[error("Total number of frames {total_frames} exceeds the maximum of {max_frames}")]
    FrameLimit { total_frames: u64, max_frames: u64 },

    /// More frames were pushed than the writer declared up front
    #[error("Frame overflow: writer was sized for {declared} frames")]
    FrameOverflow { declared: u64 },

    #[error("Cancelled after {frames_written} frames")]
    Cancelled { frames_written: u64 },
}

/// Coarse error classification used by callers and the command line tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnexpectedEof,
    Io,
    FormatRejected,
    OrderError,
    SizeOverflow,
    ConfigOpen,
    DurationLimit,
    Cancelled,
}

/// Position information for errors that occur during parsing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorPosition {
    /// Byte offset in the stream where the error occurred
    pub offset: u64,
    /// Human-readable description of the position
    pub description: String,
}

impl ErrorPosition {
    /// Create a new error position at the given byte offset
    pub fn new(offset: u64) -> Self {
        Self {
            offset,
            description: format!("byte offset {}", offset),
        }
    }
}

impl Display for ErrorPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if self.description.is_empty() {
            write!(f, "unknown position")
        } else {
            write!(f, "{}", self.description)
        }
    }
}

impl WavIOError {
    /// Create an UnexpectedEof error without position information
    pub fn unexpected_eof(context: impl Into<String>) -> Self {
        WavIOError::UnexpectedEof {
            context: context.into(),
            position: ErrorPosition::default(),
        }
    }

    /// Create an InvalidConfig error with a custom message
    pub fn invalid_config(message: impl Into<String>) -> Self {
        WavIOError::InvalidConfig(message.into())
    }

    /// Attach a byte offset to an EOF error that does not carry one yet.
    pub fn at_offset(self, offset: u64) -> Self {
        match self {
            WavIOError::UnexpectedEof { context, position } if position.description.is_empty() => {
                WavIOError::UnexpectedEof {
                    context,
                    position: ErrorPosition::new(offset),
                }
            }
            other => other,
        }
    }

    pub const fn is_eof(&self) -> bool {
        matches!(self, WavIOError::UnexpectedEof { .. })
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            WavIOError::Io(_) => ErrorKind::Io,
            WavIOError::UnexpectedEof { .. } => ErrorKind::UnexpectedEof,
            WavIOError::WavError(e) => e.kind(),
            WavIOError::ConfigOpen { .. } => ErrorKind::ConfigOpen,
            WavIOError::InvalidConfig(_) => ErrorKind::FormatRejected,
            WavIOError::DurationLimit { .. } | WavIOError::FrameLimit { .. } => {
                ErrorKind::DurationLimit
            }
            WavIOError::FrameOverflow { .. } => ErrorKind::SizeOverflow,
            WavIOError::Cancelled { .. } => ErrorKind::Cancelled,
        }
    }

    /// Process exit status for the command line tools: 1 for I/O failures, 2 for
    /// format and limit violations.
    pub fn exit_code(&self) -> u8 {
        match self.kind() {
            ErrorKind::Io | ErrorKind::UnexpectedEof | ErrorKind::ConfigOpen => 1,
            ErrorKind::Cancelled => 1,
            ErrorKind::FormatRejected
            | ErrorKind::OrderError
            | ErrorKind::SizeOverflow
            | ErrorKind::DurationLimit => 2,
        }
    }
}
