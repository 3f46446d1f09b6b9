use std::{fs::File, io::BufWriter, path::Path};

use png::{BitDepth, ColorType, Encoder};
use stencil_image::{Image, ImageSize};

use crate::error::IoError;

/// Writes an 8-bit image to a PNG file.
///
/// One to four channels are written as grayscale, grayscale-alpha, rgb and rgba.
///
/// # Arguments
///
/// * `file_path` - The path to the PNG image.
/// * `image` - The image to write.
///
/// # Errors
///
/// Returns [`IoError::UnsupportedChannels`] for any other number of channels.
pub fn write_image_png(file_path: impl AsRef<Path>, image: &Image<u8>) -> Result<(), IoError> {
    let color_type = match image.num_channels() {
        1 => ColorType::Grayscale,
        2 => ColorType::GrayscaleAlpha,
        3 => ColorType::Rgb,
        4 => ColorType::Rgba,
        n => return Err(IoError::UnsupportedChannels(n)),
    };

    write_png_impl(
        file_path,
        image.as_slice(),
        image.size(),
        BitDepth::Eight,
        color_type,
    )
}

fn write_png_impl(
    file_path: impl AsRef<Path>,
    image_data: &[u8],
    image_size: ImageSize,
    depth: BitDepth,
    color_type: ColorType,
) -> Result<(), IoError> {
    let file = File::create(file_path)?;

    let mut encoder = Encoder::new(
        BufWriter::new(file),
        image_size.width as u32,
        image_size.height as u32,
    );
    encoder.set_color(color_type);
    encoder.set_depth(depth);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    writer
        .write_image_data(image_data)
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    writer
        .finish()
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use png::{Decoder, Transformations};

    /// Read back a PNG written by [`write_image_png`] as 8 bits per channel.
    ///
    /// The pipeline itself decodes through `functional::read_image_any`.
    fn read_image_png(file_path: impl AsRef<Path>) -> Result<Image<u8>, IoError> {
        let file_path = file_path.as_ref();
        if !file_path.exists() {
            return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
        }

        let file = File::open(file_path)?;

        let mut decoder = Decoder::new(file);
        decoder.set_transformations(Transformations::normalize_to_color8());

        let mut reader = decoder
            .read_info()
            .map_err(|e| IoError::PngDecodeError(e.to_string()))?;

        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader
            .next_frame(&mut buf)
            .map_err(|e| IoError::PngDecodeError(e.to_string()))?;
        buf.truncate(info.buffer_size());

        let size = ImageSize {
            width: info.width as usize,
            height: info.height as usize,
        };

        Ok(Image::new(size, info.color_type.samples(), buf)?)
    }

    #[test]
    fn read_write_png_rgb8() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("rgb8.png");

        let data = (0..4 * 2 * 3).map(|i| (i * 10) as u8).collect();
        let image = Image::new([4, 2].into(), 3, data)?;
        write_image_png(&file_path, &image)?;
        assert!(file_path.exists(), "File does not exist: {:?}", file_path);

        let image_back = read_image_png(&file_path)?;
        assert_eq!(image_back.size(), image.size());
        assert_eq!(image_back.num_channels(), 3);
        assert_eq!(image_back.as_slice(), image.as_slice());

        Ok(())
    }

    #[test]
    fn read_write_png_mono8() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("mono8.png");

        let image = Image::new([3, 3].into(), 1, vec![10, 20, 30, 40, 50, 60, 70, 80, 90])?;
        write_image_png(&file_path, &image)?;

        let image_back = read_image_png(&file_path)?;
        assert_eq!(image_back, image);

        Ok(())
    }

    #[test]
    fn write_png_unsupported_channels() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("five.png");

        let image = Image::from_size_val([2, 2].into(), 5, 0u8)?;
        let res = write_image_png(&file_path, &image);
        assert!(matches!(res, Err(IoError::UnsupportedChannels(5))));
        assert!(!file_path.exists());

        Ok(())
    }

    #[test]
    fn read_png_missing_file() {
        let res = read_image_png("does/not/exist.png");
        assert!(matches!(res, Err(IoError::FileDoesNotExist(_))));
    }
}
