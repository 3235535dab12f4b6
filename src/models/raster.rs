use std::borrow::Cow;

use crate::error::DecodeError;
use crate::utils::grayscale::{rgb_to_grayscale, rgba_to_grayscale};

/// 8-bit luminance raster, borrowed or owned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage<'a> {
    width: usize,
    height: usize,
    pixels: Cow<'a, [u8]>,
}

impl<'a> RasterImage<'a> {
    /// Borrow a row-major luminance buffer; checked when decoded
    pub fn from_luma(pixels: &'a [u8], width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: Cow::Borrowed(pixels),
        }
    }

    /// Take ownership of a row-major luminance buffer
    pub fn from_luma_owned(pixels: Vec<u8>, width: usize, height: usize) -> RasterImage<'static> {
        RasterImage {
            width,
            height,
            pixels: Cow::Owned(pixels),
        }
    }

    /// Convert packed RGB bytes (3 per pixel)
    pub fn from_rgb(
        rgb: &[u8],
        width: usize,
        height: usize,
    ) -> Result<RasterImage<'static>, DecodeError> {
        check_buffer(rgb.len(), width, height, 3)?;
        Ok(RasterImage::from_luma_owned(
            rgb_to_grayscale(rgb, width, height),
            width,
            height,
        ))
    }

    /// Convert packed RGBA bytes (4 per pixel, alpha ignored)
    pub fn from_rgba(
        rgba: &[u8],
        width: usize,
        height: usize,
    ) -> Result<RasterImage<'static>, DecodeError> {
        check_buffer(rgba.len(), width, height, 4)?;
        Ok(RasterImage::from_luma_owned(
            rgba_to_grayscale(rgba, width, height),
            width,
            height,
        ))
    }

    /// Borrow the pixels of an `image` grayscale buffer
    pub fn from_gray_image(img: &'a image::GrayImage) -> Self {
        Self::from_luma(img.as_raw(), img.width() as usize, img.height() as usize)
    }

    /// Convert any decoded `image` to luminance
    pub fn from_dynamic(img: &image::DynamicImage) -> RasterImage<'static> {
        let rgb = img.to_rgb8();
        let (width, height) = (rgb.width() as usize, rgb.height() as usize);
        RasterImage::from_luma_owned(
            rgb_to_grayscale(rgb.as_raw(), width, height),
            width,
            height,
        )
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major luminance bytes
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Reject zero area and buffer/size mismatches
    pub fn validate(&self) -> Result<(), DecodeError> {
        check_buffer(self.pixels.len(), self.width, self.height, 1)
    }
}

fn check_buffer(
    len: usize,
    width: usize,
    height: usize,
    channels: usize,
) -> Result<(), DecodeError> {
    let expected = width.checked_mul(height).and_then(|n| n.checked_mul(channels));
    match expected {
        Some(n) if n > 0 && n == len => Ok(()),
        _ => Err(DecodeError::InvalidImage { width, height, len }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        let buf = vec![0u8; 12];
        assert!(RasterImage::from_luma(&buf, 4, 3).validate().is_ok());
        assert_eq!(
            RasterImage::from_luma(&buf, 5, 3).validate(),
            Err(DecodeError::InvalidImage {
                width: 5,
                height: 3,
                len: 12
            })
        );
        assert!(RasterImage::from_luma(&[], 0, 0).validate().is_err());
    }

    #[test]
    fn test_from_rgb_length_checked() {
        assert!(RasterImage::from_rgb(&[0u8; 11], 2, 2).is_err());
        let img = RasterImage::from_rgb(&[255u8; 12], 2, 2).unwrap();
        assert_eq!(img.pixels().len(), 4);
        assert!(img.pixels().iter().all(|&p| p >= 250));
    }

    #[test]
    fn test_from_gray_image_borrows() {
        let gray = image::GrayImage::from_pixel(3, 2, image::Luma([7u8]));
        let img = RasterImage::from_gray_image(&gray);
        assert_eq!((img.width(), img.height()), (3, 2));
        assert_eq!(img.pixels(), &[7u8; 6]);
    }
}
