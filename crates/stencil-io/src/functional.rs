use std::path::Path;

use stencil_image::{Image, ImageSize};

use crate::error::IoError;

/// Reads an image from the given file path.
///
/// The format is guessed from the file content and any format supported by the image
/// crate is accepted. The image keeps its native number of channels (gray, gray-alpha,
/// rgb or rgba); 16-bit and floating point inputs are converted to 8 bits per channel.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An 8-bit image with one to four interleaved channels.
///
/// # Errors
///
/// Returns [`IoError::FileDoesNotExist`] if the path does not exist and
/// [`IoError::ImageDecodeError`] if the content cannot be decoded.
pub fn read_image_any(file_path: impl AsRef<Path>) -> Result<Image<u8>, IoError> {
    let file_path = file_path.as_ref().to_owned();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = image::ImageReader::open(&file_path)?
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    let channels = img.color().channel_count() as usize;
    let data = match channels {
        1 => img.into_luma8().into_raw(),
        2 => img.into_luma_alpha8().into_raw(),
        3 => img.into_rgb8().into_raw(),
        4 => img.into_rgba8().into_raw(),
        _ => return Err(IoError::UnsupportedChannels(channels)),
    };

    Ok(Image::new(size, channels, data)?)
}
