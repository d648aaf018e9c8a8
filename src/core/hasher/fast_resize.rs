//! Bounded grayscale thumbnailing.
//!
//! Uses fast_image_resize (SIMD where available) with a Lanczos3 filter.
//! Images are only ever shrunk: anything already within the bound is
//! returned at its original size.

use fast_image_resize::{images::Image, FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, GrayImage};
use thiserror::Error;

/// Failures while normalising an image
#[derive(Error, Debug)]
pub enum ResizeError {
    #[error("image has zero width or height")]
    EmptyImage,

    #[error("resize failed: {0}")]
    Backend(String),
}

/// Largest size fitting in `max_dimension` x `max_dimension` with the same
/// aspect ratio. Never upscales, never returns a zero side.
pub fn bounded_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    if width <= max_dimension && height <= max_dimension {
        return (width, height);
    }

    let scale = f64::min(
        max_dimension as f64 / width as f64,
        max_dimension as f64 / height as f64,
    );
    let scaled = |side: u32| ((side as f64 * scale).round() as u32).clamp(1, max_dimension);
    (scaled(width), scaled(height))
}

/// Reusable resizer; holds scratch buffers between calls
pub struct FastResizer {
    resizer: Resizer,
}

impl FastResizer {
    pub fn new() -> Self {
        Self {
            resizer: Resizer::new(),
        }
    }

    /// Convert to single-channel luminance and shrink so neither side
    /// exceeds `max_dimension`.
    pub fn thumbnail_luma(
        &mut self,
        image: &DynamicImage,
        max_dimension: u32,
    ) -> Result<GrayImage, ResizeError> {
        let gray = image.to_luma8();
        let (src_width, src_height) = gray.dimensions();

        if src_width == 0 || src_height == 0 {
            return Err(ResizeError::EmptyImage);
        }

        let (width, height) = bounded_dimensions(src_width, src_height, max_dimension);
        if (width, height) == (src_width, src_height) {
            return Ok(gray);
        }

        let src_image = Image::from_vec_u8(src_width, src_height, gray.into_raw(), PixelType::U8)
            .map_err(|e| ResizeError::Backend(e.to_string()))?;
        let mut dst_image = Image::new(width, height, PixelType::U8);

        let options =
            ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3));

        self.resizer
            .resize(&src_image, &mut dst_image, &options)
            .map_err(|e| ResizeError::Backend(e.to_string()))?;

        GrayImage::from_raw(width, height, dst_image.into_vec())
            .ok_or_else(|| ResizeError::Backend("destination buffer size mismatch".to_string()))
    }
}

impl Default for FastResizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn create_test_image(width: u32, height: u32) -> DynamicImage {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            let r = (x * 255 / width.max(1)) as u8;
            let g = (y * 255 / height.max(1)) as u8;
            Rgb([r, g, 64])
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn bounded_dimensions_preserve_aspect_ratio() {
        assert_eq!(bounded_dimensions(1024, 512, 512), (512, 256));
        assert_eq!(bounded_dimensions(600, 1200, 512), (256, 512));
        assert_eq!(bounded_dimensions(4000, 3, 512), (512, 1));
    }

    #[test]
    fn bounded_dimensions_never_upscale() {
        assert_eq!(bounded_dimensions(100, 40, 512), (100, 40));
        assert_eq!(bounded_dimensions(512, 512, 512), (512, 512));
    }

    #[test]
    fn large_image_is_shrunk_to_bound() {
        let image = create_test_image(800, 400);
        let thumb = FastResizer::new().thumbnail_luma(&image, 512).unwrap();
        assert_eq!(thumb.dimensions(), (512, 256));
    }

    #[test]
    fn small_image_keeps_size_and_becomes_gray() {
        let image = create_test_image(64, 48);
        let thumb = FastResizer::new().thumbnail_luma(&image, 512).unwrap();
        assert_eq!(thumb.dimensions(), (64, 48));
        assert_eq!(thumb, image.to_luma8());
    }

    #[test]
    fn empty_image_is_rejected() {
        let image = DynamicImage::new_luma8(0, 10);
        assert!(matches!(
            FastResizer::new().thumbnail_luma(&image, 512),
            Err(ResizeError::EmptyImage)
        ));
    }

    #[test]
    fn resizer_reuse_is_deterministic() {
        let mut resizer = FastResizer::new();
        let image = create_test_image(1000, 700);

        let first = resizer.thumbnail_luma(&image, 256).unwrap();
        let second = resizer.thumbnail_luma(&image, 256).unwrap();

        assert_eq!(first, second);
    }
}
