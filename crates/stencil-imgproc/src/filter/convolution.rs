use stencil_image::Image;

use super::{border, kernels::Kernel, FilterError};
use crate::parallel::{self, ExecutionStrategy};

/// Narrow an accumulated value to the 8-bit channel representation.
///
/// The value is truncated toward zero and then wrapped modulo 256, so `-4.0` becomes `252`
/// and `300.0` becomes `44`. Values are not saturated.
#[inline]
pub fn narrow_wrapping(value: f64) -> u8 {
    value as i64 as u8
}

/// Weighted sum of the 3x3 neighborhood given by the clamped `rows` and `cols` indices.
#[inline]
fn convolve_at(
    src_data: &[u8],
    row_stride: usize,
    channels: usize,
    rows: &[usize; 3],
    cols: &[usize; 3],
    ch: usize,
    kernel: &Kernel,
) -> u8 {
    let mut acc = 0.0f64;
    for (weights, &row) in kernel.weights().iter().zip(rows) {
        let row_offset = row * row_stride;
        for (&w, &col) in weights.iter().zip(cols) {
            acc += w * src_data[row_offset + col * channels + ch] as f64;
        }
    }
    narrow_wrapping(acc / kernel.divisor())
}

/// Compute the filtered value of one channel of one pixel.
///
/// The 3x3 window centered at `(x, y)` is clamped to the image borders independently
/// along each axis, then combined with the kernel coefficients (row 0 of the kernel is
/// applied to row `y - 1`). The sum is accumulated in `f64` and narrowed with
/// [`narrow_wrapping`].
///
/// PRECONDITION: `x < width`, `y < height` and `ch < channels`.
///
/// # Examples
///
/// ```
/// use stencil_image::Image;
/// use stencil_imgproc::filter::{kernels, sample};
///
/// let image = Image::new([2, 2].into(), 1, vec![10u8, 20, 30, 40]).unwrap();
///
/// assert_eq!(sample(&image, 1, 1, 0, &kernels::IDENTITY), 40);
/// ```
pub fn sample(src: &Image<u8>, x: usize, y: usize, ch: usize, kernel: &Kernel) -> u8 {
    let rows = border::neighbors(y, src.height());
    let cols = border::neighbors(x, src.width());
    convolve_at(
        src.as_slice(),
        src.row_stride(),
        src.num_channels(),
        &rows,
        &cols,
        ch,
        kernel,
    )
}

/// Convolve an image with a 3x3 kernel.
///
/// Every element of `dst` is overwritten with [`sample`] of the corresponding element of
/// `src`. The rows are scheduled according to `strategy`; the output does not depend on it.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel` - The 3x3 kernel to apply.
/// * `strategy` - How to split the work across threads.
///
/// # Errors
///
/// Returns [`FilterError::DimensionMismatch`] if `src` and `dst` do not have the same
/// width, height and number of channels, and [`FilterError::Parallel`] if the strategy
/// is invalid. `dst` is left untouched in both cases.
pub fn filter3x3(
    src: &Image<u8>,
    dst: &mut Image<u8>,
    kernel: &Kernel,
    strategy: ExecutionStrategy,
) -> Result<(), FilterError> {
    if !src.same_shape(dst) {
        return Err(FilterError::DimensionMismatch {
            src: src.size(),
            src_channels: src.num_channels(),
            dst: dst.size(),
            dst_channels: dst.num_channels(),
        });
    }

    let (width, height) = (src.width(), src.height());
    let channels = src.num_channels();
    let row_stride = src.row_stride();
    let src_data = src.as_slice();

    parallel::par_iter_row_bands(strategy, dst.as_slice_mut(), row_stride, |rows, band| {
        for (y, dst_row) in rows.zip(band.chunks_exact_mut(row_stride)) {
            let ys = border::neighbors(y, height);
            for (x, dst_pixel) in dst_row.chunks_exact_mut(channels).enumerate() {
                let xs = border::neighbors(x, width);
                for (ch, dst_val) in dst_pixel.iter_mut().enumerate() {
                    *dst_val = convolve_at(src_data, row_stride, channels, &ys, &xs, ch, kernel);
                }
            }
        }
    })?;

    Ok(())
}

/// Convolve an image with a 3x3 kernel into a newly allocated image.
///
/// # Errors
///
/// Returns [`FilterError::Image`] if the destination cannot be allocated.
pub fn filter3x3_alloc(
    src: &Image<u8>,
    kernel: &Kernel,
    strategy: ExecutionStrategy,
) -> Result<Image<u8>, FilterError> {
    let mut dst = Image::from_size_val(src.size(), src.num_channels(), 0u8)?;
    filter3x3(src, &mut dst, kernel, strategy)?;
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::kernels;

    fn grid_3x3() -> Result<Image<u8>, FilterError> {
        Ok(Image::new(
            [3, 3].into(),
            1,
            vec![10, 20, 30, 40, 50, 60, 70, 80, 90],
        )?)
    }

    #[test]
    fn test_narrow_wrapping() {
        assert_eq!(narrow_wrapping(0.0), 0);
        assert_eq!(narrow_wrapping(255.0), 255);
        assert_eq!(narrow_wrapping(255.9), 255);
        assert_eq!(narrow_wrapping(256.0), 0);
        assert_eq!(narrow_wrapping(300.7), 44);
        assert_eq!(narrow_wrapping(-4.0), 252);
        assert_eq!(narrow_wrapping(-0.5), 0);
        assert_eq!(narrow_wrapping(-256.0), 0);
    }

    #[test]
    fn test_edge_scenario() -> Result<(), FilterError> {
        let src = grid_3x3()?;
        let mut dst = Image::from_size_val(src.size(), 1, 0u8)?;
        filter3x3(&src, &mut dst, &kernels::EDGE, ExecutionStrategy::Serial)?;

        // center: 4*50 - 20 - 40 - 60 - 80 = 0
        // corner (0,0): 4*10 - 10 - 10 - 20 - 40 = -40 -> 216
        assert_eq!(
            dst.as_slice(),
            &[216, 226, 236, 246, 0, 10, 20, 30, 40]
        );
        Ok(())
    }

    #[test]
    fn test_sample_wraps_negative_sum() -> Result<(), FilterError> {
        let src = Image::new([3, 3].into(), 1, vec![0, 1, 0, 1, 0, 1, 0, 1, 0])?;
        // 4*0 - 1 - 1 - 1 - 1 = -4
        assert_eq!(sample(&src, 1, 1, 0, &kernels::EDGE), 252);

        let src = Image::new([3, 3].into(), 1, vec![0, 100, 0, 100, 0, 100, 0, 100, 0])?;
        // 5*0 - 400 = -400 -> 112
        assert_eq!(sample(&src, 1, 1, 0, &kernels::SHARPEN), 112);
        Ok(())
    }

    #[test]
    fn test_sample_clamps_top_left() -> Result<(), FilterError> {
        let src = grid_3x3()?;
        // only the top-left weight is set: the (-1,-1) neighbor reads (0,0)
        let top_left = Kernel::new([[1., 0., 0.], [0., 0., 0.], [0., 0., 0.]], 1.);
        assert_eq!(sample(&src, 0, 0, 0, &top_left), 10);

        let top = Kernel::new([[0., 1., 0.], [0., 0., 0.], [0., 0., 0.]], 1.);
        assert_eq!(sample(&src, 0, 0, 0, &top), 10);

        let left = Kernel::new([[0., 0., 0.], [1., 0., 0.], [0., 0., 0.]], 1.);
        assert_eq!(sample(&src, 0, 0, 0, &left), 10);

        let bottom_right = Kernel::new([[0., 0., 0.], [0., 0., 0.], [0., 0., 1.]], 1.);
        assert_eq!(sample(&src, 0, 0, 0, &bottom_right), 50);
        assert_eq!(sample(&src, 2, 2, 0, &bottom_right), 90);
        Ok(())
    }

    #[test]
    fn test_sample_orientation() -> Result<(), FilterError> {
        let src = grid_3x3()?;
        // row 0 of the kernel reads the row above, column 0 the column to the left
        let up_left = Kernel::new([[1., 0., 0.], [0., 0., 0.], [0., 0., 0.]], 1.);
        assert_eq!(sample(&src, 2, 2, 0, &up_left), 50);

        // -2*10 - 20 - 40 + 50 + 60 + 80 + 2*90 = 290 -> 34
        assert_eq!(sample(&src, 1, 1, 0, &kernels::EMBOSS), 34);
        Ok(())
    }

    #[test]
    fn test_sample_channels_are_independent() -> Result<(), FilterError> {
        let src = Image::new([1, 1].into(), 3, vec![10, 20, 30])?;
        for (ch, expected) in [10, 20, 30].into_iter().enumerate() {
            assert_eq!(sample(&src, 0, 0, ch, &kernels::BLUR), expected);
        }
        Ok(())
    }

    #[test]
    fn test_blur_uniform_image() -> Result<(), FilterError> {
        for val in [0u8, 1, 37, 128, 254, 255] {
            let src = Image::from_size_val([5, 4].into(), 3, val)?;
            for kernel in [&kernels::BLUR, &kernels::GAUSSIAN_BLUR] {
                let dst = filter3x3_alloc(&src, kernel, ExecutionStrategy::Serial)?;
                assert_eq!(dst, src, "val={val}");
            }
        }
        Ok(())
    }

    #[test]
    fn test_dimension_mismatch_leaves_dst_untouched() -> Result<(), FilterError> {
        let src = Image::from_size_val([4, 4].into(), 3, 1u8)?;

        for (size, channels) in [([5usize, 4], 3), ([4, 5], 3), ([4, 4], 1)] {
            let mut dst = Image::from_size_val(size.into(), channels, 7u8)?;
            let res = filter3x3(&src, &mut dst, &kernels::EDGE, ExecutionStrategy::Serial);
            assert_eq!(
                res,
                Err(FilterError::DimensionMismatch {
                    src: src.size(),
                    src_channels: 3,
                    dst: size.into(),
                    dst_channels: channels,
                })
            );
            assert!(dst.as_slice().iter().all(|&v| v == 7));
        }
        Ok(())
    }

    #[test]
    fn test_invalid_strategy_leaves_dst_untouched() -> Result<(), FilterError> {
        let src = Image::from_size_val([4, 4].into(), 1, 1u8)?;
        let mut dst = Image::from_size_val([4, 4].into(), 1, 7u8)?;
        let res = filter3x3(
            &src,
            &mut dst,
            &kernels::IDENTITY,
            ExecutionStrategy::FixedThreadPool(0),
        );
        assert!(matches!(res, Err(FilterError::Parallel(_))));
        assert!(dst.as_slice().iter().all(|&v| v == 7));
        Ok(())
    }
}
