//! Filter operations
//!
//! This module provides 3x3 convolution filters for image processing.

/// Border handling for the 3x3 window.
pub mod border;

/// Filter kernels
pub mod kernels;

/// 3x3 convolution
mod convolution;
pub use convolution::*;

mod error;
pub use error::FilterError;
