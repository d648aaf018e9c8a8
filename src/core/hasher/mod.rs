//! # Hasher Module
//!
//! Turns one candidate file into a perceptual fingerprint.
//!
//! ## How It Works
//! 1. Read the file and decode it (zune-jpeg for JPEG, image crate otherwise)
//! 2. Convert to single-channel luminance
//! 3. Shrink with Lanczos3 so neither side exceeds `max_dimension` (512)
//! 4. Compute a DCT pHash at `hash_size` (8, i.e. 64 bits)
//! 5. Render it as lowercase hex (16 characters)
//!
//! ## Failure Policy
//! [`HashComputer::hash_file`] never fails and never panics past its
//! boundary. Undecodable bytes, unreadable files and any other failure,
//! including a panic inside a decoder, become [`HashOutcome::Skipped`] so
//! that one bad file cannot stop a batch.
//!
//! ## Example
//! ```rust,ignore
//! use duplicate_image_finder::core::hasher::{HashComputer, HasherConfig};
//!
//! let computer = HashComputer::new(HasherConfig::default())?;
//! if let Some(fingerprint) = computer.hash_file(&path).fingerprint() {
//!     println!("{fingerprint}");
//! }
//! ```

pub mod fast_decode;
pub mod fast_resize;
mod perceptual;

pub use fast_decode::FastDecoder;
pub use fast_resize::{bounded_dimensions, FastResizer, ResizeError};
pub use perceptual::PerceptualHasher;

use crate::error::{DuplicateFinderError, HashError};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::{debug, warn};

/// Default bound on either side of the normalised image
pub const DEFAULT_MAX_DIMENSION: u32 = 512;

/// Default pHash grid size (64-bit fingerprint)
pub const DEFAULT_HASH_SIZE: u32 = 8;

/// Opaque perceptual fingerprint.
///
/// Lowercase hexadecimal of fixed length for a given hash size. Two images
/// are duplicates exactly when their fingerprints are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Render raw hash bytes
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.iter().map(|b| format!("{:02x}", b)).collect())
    }

    /// Accept an already rendered fingerprint, normalising its case
    pub fn from_hex(hex: &str) -> Self {
        Self(hex.to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of hashing one file
#[derive(Debug)]
pub enum HashOutcome {
    /// The file produced a fingerprint
    Hashed(Fingerprint),
    /// The file was skipped; the batch continues
    Skipped(HashError),
}

impl HashOutcome {
    /// The fingerprint, or `None` when the file was skipped
    pub fn fingerprint(self) -> Option<Fingerprint> {
        match self {
            HashOutcome::Hashed(fingerprint) => Some(fingerprint),
            HashOutcome::Skipped(_) => None,
        }
    }

    pub fn is_hashed(&self) -> bool {
        matches!(self, HashOutcome::Hashed(_))
    }
}

/// Configuration for fingerprinting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HasherConfig {
    /// Neither side of the normalised image exceeds this
    pub max_dimension: u32,
    /// Side of the pHash bit grid
    pub hash_size: u32,
}

impl HasherConfig {
    pub fn new() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
            hash_size: DEFAULT_HASH_SIZE,
        }
    }

    /// Set the normalisation bound
    pub fn max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension;
        self
    }

    /// Set the hash grid size.
    ///
    /// - 8: 64 bits, 16 hex characters (default)
    /// - 16: 256 bits, 64 hex characters
    pub fn hash_size(mut self, size: u32) -> Self {
        self.hash_size = size;
        self
    }

    pub fn validate(&self) -> Result<(), DuplicateFinderError> {
        if self.max_dimension == 0 {
            return Err(DuplicateFinderError::Config(
                "max dimension must be at least 1".to_string(),
            ));
        }
        if self.hash_size < 2 {
            return Err(DuplicateFinderError::Config(format!(
                "hash size {} is too small (minimum 2)",
                self.hash_size
            )));
        }
        Ok(())
    }
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Decodes, normalises and fingerprints images.
///
/// Shareable across threads; each call allocates its own resize buffers.
pub struct HashComputer {
    config: HasherConfig,
    hasher: PerceptualHasher,
}

impl HashComputer {
    /// Create a computer, rejecting unusable configurations
    pub fn new(config: HasherConfig) -> Result<Self, DuplicateFinderError> {
        config.validate()?;
        Ok(Self {
            config,
            hasher: PerceptualHasher::new(config.hash_size),
        })
    }

    pub fn config(&self) -> &HasherConfig {
        &self.config
    }

    /// Fingerprint an in-memory image
    pub fn hash_image(&self, image: &DynamicImage) -> Result<Fingerprint, ResizeError> {
        let gray = FastResizer::new().thumbnail_luma(image, self.config.max_dimension)?;
        Ok(self.hasher.fingerprint(gray))
    }

    /// Fingerprint one file, containing every failure.
    ///
    /// Decode failures are logged at debug level only; read failures and
    /// anything unexpected are logged at warn level with the path.
    pub fn hash_file(&self, path: &Path) -> HashOutcome {
        let attempt = panic::catch_unwind(AssertUnwindSafe(|| self.try_hash_file(path)));

        let result = match attempt {
            Ok(result) => result,
            Err(payload) => Err(HashError::Unexpected {
                path: path.to_path_buf(),
                reason: format!("panic while hashing: {}", panic_message(&payload)),
            }),
        };

        match result {
            Ok(fingerprint) => HashOutcome::Hashed(fingerprint),
            Err(error) => {
                if error.is_decode() {
                    debug!(path = %path.display(), error = %error, "skipping non-image file");
                } else {
                    warn!(path = %path.display(), error = %error, "skipping file after hash error");
                }
                HashOutcome::Skipped(error)
            }
        }
    }

    fn try_hash_file(&self, path: &Path) -> Result<Fingerprint, HashError> {
        let image = FastDecoder::decode(path)?;
        self.hash_image(&image).map_err(|e| HashError::Unexpected {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

fn panic_message(payload: &Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
