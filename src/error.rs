//! Error types for the rANS codec.

use thiserror::Error;

/// Error variants for rANS operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Symbol statistics are unusable: empty histogram, a zero-frequency
    /// symbol fed to the encoder, or a lookup table shorter than the
    /// probability range.
    #[error("invalid symbol statistics: {0}")]
    InvalidStats(&'static str),

    /// Probability precision is outside the supported range.
    #[error("unsupported precision: {0} bits")]
    InvalidPrecision(u32),

    /// The encoder would write past the start of the output buffer.
    #[error("output buffer overflow")]
    BufferOverflow,

    /// The decoder would read past the end of the bitstream.
    #[error("bitstream underflow")]
    BufferUnderflow,
}

/// A specialized Result type for rANS operations.
pub type Result<T> = std::result::Result<T, Error>;
