//! 3x3 kernel image convolution with runtime-selectable execution strategies.
//!
//! This crate re-exports the workspace crates:
//!
//! * [`image`]: the interleaved 8-bit [`image::Image`] buffer.
//! * [`imgproc`]: the kernel catalog, the convolution and the execution strategies.
//! * [`io`]: decoding of any image format and PNG encoding.
//!
//! ```
//! use stencil::image::Image;
//! use stencil::imgproc::{filter, filter::kernels::KernelType, parallel::ExecutionStrategy};
//!
//! let src = Image::new([3, 3].into(), 1, vec![10u8, 20, 30, 40, 50, 60, 70, 80, 90]).unwrap();
//! let kernel = KernelType::lookup("edge").kernel();
//!
//! let dst = filter::filter3x3_alloc(&src, kernel, ExecutionStrategy::DataParallel(2)).unwrap();
//! assert_eq!(dst.as_slice(), &[216, 226, 236, 246, 0, 10, 20, 30, 40]);
//! ```

#[doc(inline)]
pub use stencil_image as image;

#[doc(inline)]
pub use stencil_imgproc as imgproc;

#[doc(inline)]
pub use stencil_io as io;

/// Load, filter and save pipeline used by the `stencil` binary.
pub mod app;
