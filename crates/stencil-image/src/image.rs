use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use stencil_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// Represents an image with pixel data.
///
/// The pixels are stored in a contiguous buffer with shape (H, W, C), row-major and
/// interleaved by channel: `index = row * width * channels + col * channels + channel`.
///
/// Unlike the size, the number of channels is a runtime property so that decoded files
/// keep their native layout (gray, gray-alpha, rgb or rgba).
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T> {
    shape: [usize; 3],
    data: Vec<T>,
}

impl<T> Image<T> {
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `channels` - The number of interleaved channels per pixel.
    /// * `data` - The pixel data of the image.
    ///
    /// # Errors
    ///
    /// If any dimension is zero or the length of the pixel data does not match the image
    /// size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use stencil_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8>::new(
    ///     ImageSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     3,
    ///     vec![0u8; 10 * 20 * 3],
    /// ).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// assert_eq!(image.num_channels(), 3);
    /// ```
    pub fn new(size: ImageSize, channels: usize, data: Vec<T>) -> Result<Self, ImageError> {
        if size.width == 0 || size.height == 0 || channels == 0 {
            return Err(ImageError::InvalidImageSize(
                size.width,
                size.height,
                channels,
            ));
        }

        let expected = size
            .width
            .checked_mul(size.height)
            .and_then(|n| n.checked_mul(channels))
            .ok_or(ImageError::InvalidImageSize(
                size.width,
                size.height,
                channels,
            ))?;
        if data.len() != expected {
            return Err(ImageError::InvalidChannelShape(data.len(), expected));
        }

        Ok(Self {
            shape: [size.height, size.width, channels],
            data,
        })
    }

    /// Create a new image with the given size and every element set to `val`.
    ///
    /// The buffer is reserved fallibly, so an oversized request is reported as
    /// [`ImageError::AllocationFailure`] instead of aborting the process.
    ///
    /// # Examples
    ///
    /// ```
    /// use stencil_image::Image;
    ///
    /// let image = Image::<u8>::from_size_val([10, 20].into(), 1, 0u8).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// assert_eq!(image.num_channels(), 1);
    /// ```
    pub fn from_size_val(size: ImageSize, channels: usize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        let numel = size
            .width
            .checked_mul(size.height)
            .and_then(|n| n.checked_mul(channels))
            .ok_or(ImageError::AllocationFailure(usize::MAX))?;

        let mut data = Vec::new();
        data.try_reserve_exact(numel).map_err(|_| {
            ImageError::AllocationFailure(numel.saturating_mul(std::mem::size_of::<T>()))
        })?;
        data.resize(numel, val);

        Image::new(size, channels, data)
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        ImageSize {
            width: self.shape[1],
            height: self.shape[0],
        }
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.shape[1]
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.shape[0]
    }

    /// Get the number of channels in the image.
    pub fn num_channels(&self) -> usize {
        self.shape[2]
    }

    /// Number of elements in one image row, i.e. `width * channels`.
    pub fn row_stride(&self) -> usize {
        self.shape[1] * self.shape[2]
    }

    /// Whether `other` has the same width, height and number of channels.
    pub fn same_shape<U>(&self, other: &Image<U>) -> bool {
        self.shape == other.shape
    }

    /// Get the pixel data as a flat slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get the pixel data as a flat mutable slice.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Get a reference to the element at `[row, col, channel]`, or `None` if out of bounds.
    pub fn get(&self, index: [usize; 3]) -> Option<&T> {
        let [row, col, ch] = index;
        if row >= self.shape[0] || col >= self.shape[1] || ch >= self.shape[2] {
            return None;
        }
        self.data.get(self.offset(row, col, ch))
    }

    /// Get the element at pixel `(x, y)` and channel `ch`.
    ///
    /// # Errors
    ///
    /// Returns an error if the pixel or the channel is out of bounds.
    pub fn get_pixel(&self, x: usize, y: usize, ch: usize) -> Result<&T, ImageError> {
        if x >= self.width() || y >= self.height() {
            return Err(ImageError::PixelIndexOutOfBounds(
                x,
                y,
                self.width(),
                self.height(),
            ));
        }

        if ch >= self.num_channels() {
            return Err(ImageError::ChannelIndexOutOfBounds(ch, self.num_channels()));
        }

        Ok(&self.data[self.offset(y, x, ch)])
    }

    #[inline]
    fn offset(&self, row: usize, col: usize, ch: usize) -> usize {
        row * self.shape[1] * self.shape[2] + col * self.shape[2] + ch
    }
}
