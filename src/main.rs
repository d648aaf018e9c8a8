//! # image-dedup CLI
//!
//! Command-line front end for the duplicate image finder.
//!
//! ## Usage
//! ```bash
//! image-dedup scan ~/Pictures
//! image-dedup scan ~/Pictures --ext png --ext webp --output json
//! image-dedup clean ~/Pictures --keep-first --trash
//! ```

mod cli;

use duplicate_image_finder::Result;

fn main() -> Result<()> {
    cli::run()
}
