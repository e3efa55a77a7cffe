//! Error types for Marquee protocol operations.

use std::io;
use thiserror::Error;

/// The main error type for Marquee protocol operations.
///
/// Every failure in the codec layer is fatal to the enclosing stream: the
/// caller is expected to tear down the connection rather than retry. No
/// error is retried or papered over with default values inside this layer.
#[derive(Debug, Error)]
pub enum MarqueeError {
    /// I/O errors from the underlying byte source or sink.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The stream ended before a decode operation got the bytes it needed.
    #[error("unexpected end of stream: need {needed} bytes, have {remaining}")]
    UnexpectedEof {
        /// Bytes the decode operation required.
        needed: usize,
        /// Bytes actually available.
        remaining: usize,
    },

    /// A first-occurrence type declaration named a wire type that is not
    /// registered. Indicates a schema mismatch between peers.
    #[error("unknown wire type: {0}")]
    UnknownType(String),

    /// A positive class code was never declared on this stream. Indicates a
    /// dropped or duplicated frame, or peer protocol desync; the connection
    /// should be re-established.
    #[error("unknown class code: {0}")]
    UnknownClassCode(i16),

    /// The writer has assigned every available class code. Practically
    /// unreachable; signals a logic bug upstream.
    #[error("class code space exhausted")]
    TooManyTypes,

    /// Malformed wire data: bad lengths, negative counts, invalid text, or
    /// a value handed to the wrong streamer.
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// A specialized `Result` type for Marquee protocol operations.
pub type Result<T> = std::result::Result<T, MarqueeError>;
