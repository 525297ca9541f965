//! # Error Types
//!
//! Every fallible operation in this crate returns [`QrError`]. Internal
//! consistency checks are assertions instead: a failed assertion is a bug in
//! the encoder, not a problem with the caller's input.

use thiserror::Error;

use crate::segment::QrSegmentMode;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, QrError>;

/// Main error type for encoding operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QrError {
    /// A constructor-level argument is outside its legal range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The text holds a character that the requested mode cannot represent.
    #[error("String contains unencodable character {character:?} in {mode:?} mode")]
    UnencodableCharacter {
        mode: QrSegmentMode,
        character: char,
    },

    /// No version up to the allowed maximum can hold the data.
    #[error("Data too long: {0}")]
    DataTooLong(#[from] DataTooLong),
}

/// Error type for when data exceeds QR code capacity.
///
/// Ways to handle this error include:
///
/// - Decrease the error correction level if it was greater than `QrCodeEcc::Low`.
/// - Increase the max version if it was less than `Version::MAX`.
/// - Change the text or binary data to be shorter.
/// - Change the text to fit the character set of a particular segment mode (e.g. alphanumeric).
/// - Propagate the error upward to the caller/user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DataTooLong {
    /// A segment's character count does not fit its count field.
    #[error("segment too long")]
    SegmentTooLong,

    /// Data length (in bits) exceeds the capacity (in bits) of the largest allowed version.
    #[error("data length = {0} bits, max capacity = {1} bits")]
    DataOverCapacity(usize, usize),
}

impl QrError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
