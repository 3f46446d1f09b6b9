#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
///
/// Defines [`IoError`] variants for file access and encoding/decoding failures.
pub mod error;

/// High-level image reading functions.
///
/// See [`functional::read_image_any`] for automatic format detection.
pub mod functional;

/// PNG image encoding.
///
/// Write 8-bit PNG images with one to four channels.
pub mod png;

pub use crate::error::IoError;
