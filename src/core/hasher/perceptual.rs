//! DCT perceptual hash.
//!
//! The image is shrunk to `2n x 2n`, transformed with a 2-D DCT, the
//! top-left `n x n` low-frequency block is kept and each coefficient
//! becomes one bit: set when above the block median. The computation is
//! delegated to image_hasher.

use super::Fingerprint;
use image::{DynamicImage, GrayImage};
use image_hasher::{HashAlg, HasherConfig as ImageHasherConfig};

/// pHash over an already normalised luminance image
pub struct PerceptualHasher {
    hasher: image_hasher::Hasher,
}

impl PerceptualHasher {
    /// Create a hasher producing `hash_size * hash_size` bits
    pub fn new(hash_size: u32) -> Self {
        let hasher = ImageHasherConfig::new()
            .hash_size(hash_size, hash_size)
            .hash_alg(HashAlg::Median)
            .preproc_dct()
            .to_hasher();

        Self { hasher }
    }

    /// Fingerprint a grayscale image
    pub fn fingerprint(&self, gray: GrayImage) -> Fingerprint {
        let hash = self.hasher.hash_image(&DynamicImage::ImageLuma8(gray));
        Fingerprint::from_bytes(hash.as_bytes())
    }
}
