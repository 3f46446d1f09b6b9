#![deny(missing_docs)]
//! Image types for convolution and filtering

/// image representation with interleaved channels.
pub mod image;

/// Error types for the image module.
pub mod error;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
