//! # qrforge
//!
//! A Rust library for encoding text or binary data into QR Code symbols.
//!
//! `qrforge` follows the QR Code Model 2 specification (ISO/IEC 18004). It supports versions
//! 1 to 40, all four error correction levels, and the numeric, alphanumeric, byte and ECI
//! segment modes. The output is a finished [`QrCode`]: a square grid of dark and light modules
//! that any renderer can read through [`QrCode::get_module`].
//!
//! ## Features
//!
//! - Automatic segment mode selection for text input.
//! - Smallest-version search with free error correction boosting.
//! - Reed-Solomon error correction over GF(256) with block interleaving.
//! - Penalty-based mask selection, or a forced mask.
//! - Safe Rust implementation with no unsafe code.
//!
//! ## Installation
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! qrforge = "0.1" # Replace with the latest version
//! ```
//!
//! ## Example
//!
//! Encode text and walk the module grid:
//!
//! ```rust
//! use qrforge::{QrCode, QrCodeEcc};
//!
//! let qr = QrCode::encode_text("HELLO WORLD", QrCodeEcc::Low).unwrap();
//! assert_eq!(qr.size(), 21);
//!
//! let border = 4;
//! for y in -border..qr.size() + border {
//!     let line: String = (-border..qr.size() + border)
//!         .map(|x| if qr.get_module(x, y) { '#' } else { ' ' })
//!         .collect();
//!     assert_eq!(line.chars().count() as i32, qr.size() + 2 * border);
//! }
//! ```
//!
//! Control the version range and mask:
//!
//! ```rust
//! use qrforge::{EncodeOptions, Mask, QrCode, QrCodeEcc, QrSegment, Version};
//!
//! let segs = QrSegment::make_segments("3141592653589793238462643383");
//! let options = EncodeOptions::default()
//!     .min_version(Version::new(2).unwrap())
//!     .mask(Mask::new(3).unwrap());
//! let qr = QrCode::encode_segments_with(&segs, QrCodeEcc::High, &options).unwrap();
//! assert_eq!(qr.mask().value(), 3);
//! assert!(qr.version().value() >= 2);
//! ```
//!
//! ## Modules
//!
//! - [`qrcode`]: The symbol type and the top-level encoders.
//! - [`segment`]: Segment construction and mode selection.
//! - [`reed_solomon`]: GF(256) arithmetic and error correction codewords.
//! - [`bits`]: The bit buffer used to build the data stream.
#![forbid(unsafe_code)]

pub mod bits;
mod ecc;
pub mod error;
mod matrix;
mod options;
mod penalty;
pub mod qrcode;
pub mod reed_solomon;
pub mod segment;
mod version;

pub use crate::bits::BitBuffer;
pub use crate::ecc::QrCodeEcc;
pub use crate::error::{DataTooLong, QrError, Result};
pub use crate::options::EncodeOptions;
pub use crate::qrcode::QrCode;
pub use crate::segment::{QrSegment, QrSegmentMode};
pub use crate::version::{Mask, Version};
