use stencil_image::{ImageError, ImageSize};

use crate::parallel::ParallelError;

/// An error type for the filter module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FilterError {
    /// Source and destination do not have the same shape.
    #[error(
        "Source ({src}, channels: {src_channels}) and destination ({dst}, channels: {dst_channels}) shapes do not match"
    )]
    DimensionMismatch {
        /// Size of the source image.
        src: ImageSize,
        /// Number of channels of the source image.
        src_channels: usize,
        /// Size of the destination image.
        dst: ImageSize,
        /// Number of channels of the destination image.
        dst_channels: usize,
    },

    /// Error when creating the destination image.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error when scheduling the work.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}
