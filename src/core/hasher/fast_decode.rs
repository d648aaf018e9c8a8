//! Image decoding with a fast path for JPEG.
//!
//! The file is read into memory once and closed before decoding starts, so
//! an I/O failure is always distinguishable from undecodable content and no
//! handle outlives the call. JPEG payloads go through zune-jpeg; everything
//! else, and any JPEG zune-jpeg rejects, goes through the image crate, which
//! detects the format from the bytes rather than the extension.
//!
//! Neither backend caps image size. Truncated files are fingerprinted when
//! the backend can still produce a full frame: zune-jpeg fills scan data
//! missing from a cut-off JPEG, while the image crate's PNG, GIF and BMP
//! decoders stop at the missing bytes, so those files are skipped as
//! undecodable.

use crate::error::HashError;
use image::{DynamicImage, ImageBuffer, ImageError, ImageReader, Luma, Rgb, Rgba};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;
use zune_jpeg::JpegDecoder;

const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// Decoder that picks the fastest backend for the payload
pub struct FastDecoder;

impl FastDecoder {
    /// Read and decode the image at `path`
    pub fn decode(path: &Path) -> Result<DynamicImage, HashError> {
        let bytes = fs::read(path).map_err(|e| HashError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::decode_bytes(path, &bytes)
    }

    /// Decode an in-memory payload; `path` is only used for error context
    pub fn decode_bytes(path: &Path, bytes: &[u8]) -> Result<DynamicImage, HashError> {
        if bytes.starts_with(&JPEG_MAGIC) {
            if let Some(image) = Self::decode_jpeg(bytes) {
                return Ok(image);
            }
        }

        Self::decode_fallback(path, bytes)
    }

    /// zune-jpeg decoding; `None` means "let the image crate try"
    fn decode_jpeg(bytes: &[u8]) -> Option<DynamicImage> {
        let options = DecoderOptions::new_fast()
            .set_max_width(usize::MAX)
            .set_max_height(usize::MAX)
            .jpeg_set_out_colorspace(ColorSpace::RGB);
        let mut decoder = JpegDecoder::new_with_options(bytes, options);

        let pixels = decoder.decode().ok()?;
        let info = decoder.info()?;
        let width = info.width as u32;
        let height = info.height as u32;

        match decoder.get_output_colorspace().unwrap_or(ColorSpace::RGB) {
            ColorSpace::RGB => ImageBuffer::<Rgb<u8>, Vec<u8>>::from_raw(width, height, pixels)
                .map(DynamicImage::ImageRgb8),
            ColorSpace::RGBA => ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(width, height, pixels)
                .map(DynamicImage::ImageRgba8),
            ColorSpace::Luma => ImageBuffer::<Luma<u8>, Vec<u8>>::from_raw(width, height, pixels)
                .map(DynamicImage::ImageLuma8),
            _ => None,
        }
    }

    fn decode_fallback(path: &Path, bytes: &[u8]) -> Result<DynamicImage, HashError> {
        let mut reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| HashError::Decode {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        reader.no_limits();

        reader.decode().map_err(|e| match e {
            ImageError::Decoding(_) | ImageError::Unsupported(_) | ImageError::IoError(_) => {
                HashError::Decode {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
            }
            other => HashError::Unexpected {
                path: path.to_path_buf(),
                reason: other.to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageFormat;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
        bytes
    }

    fn gradient() -> DynamicImage {
        DynamicImage::ImageRgb8(ImageBuffer::from_fn(40, 30, |x, y| {
            Rgb([(x * 6) as u8, (y * 8) as u8, 90])
        }))
    }

    #[test]
    fn decodes_png_bytes() {
        let bytes = encode(&gradient(), ImageFormat::Png);
        let image = FastDecoder::decode_bytes(Path::new("a.png"), &bytes).unwrap();
        assert_eq!((image.width(), image.height()), (40, 30));
    }

    #[test]
    fn decodes_jpeg_bytes() {
        let bytes = encode(&gradient(), ImageFormat::Jpeg);
        let image = FastDecoder::decode_bytes(Path::new("a.jpg"), &bytes).unwrap();
        assert_eq!((image.width(), image.height()), (40, 30));
    }

    #[test]
    fn format_is_detected_from_content_not_extension() {
        let bytes = encode(&gradient(), ImageFormat::Png);
        let image = FastDecoder::decode_bytes(Path::new("misnamed.jpg"), &bytes).unwrap();
        assert_eq!(image.width(), 40);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let result = FastDecoder::decode_bytes(Path::new("c.png"), b"this is not an image");
        assert!(matches!(result, Err(HashError::Decode { .. })));
    }

    #[test]
    fn truncated_jpeg_is_not_an_io_error() {
        let mut bytes = encode(&gradient(), ImageFormat::Jpeg);
        bytes.truncate(20);
        let result = FastDecoder::decode_bytes(Path::new("cut.jpg"), &bytes);
        assert!(!matches!(result, Err(HashError::Io { .. })));
    }

    #[test]
    fn wide_jpeg_beyond_default_decoder_bounds_is_decoded() {
        let wide = DynamicImage::ImageRgb8(ImageBuffer::from_fn(20_000, 8, |x, _| {
            Rgb([(x % 256) as u8, 40, 200])
        }));
        let bytes = encode(&wide, ImageFormat::Jpeg);

        let image = FastDecoder::decode_bytes(Path::new("panorama.jpg"), &bytes).unwrap();
        assert_eq!((image.width(), image.height()), (20_000, 8));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = FastDecoder::decode(&PathBuf::from("/nonexistent/dir/img.png"));
        assert!(matches!(result, Err(HashError::Io { .. })));
    }
}
