//! Integration tests for the scan pipeline.
//!
//! These tests verify end-to-end behavior including:
//! - Grouping byte-identical copies
//! - Skipping corrupt files without failing the scan
//! - Repeatable results
//! - Fatal handling of a bad root only

use assert_fs::prelude::*;
use duplicate_image_finder::core::pipeline::{Pipeline, ScanController};
use duplicate_image_finder::error::{DuplicateFinderError, ScanError};
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use predicates::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;

fn png_bytes(image: &DynamicImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

/// Diagonal stripes
fn image_a() -> DynamicImage {
    DynamicImage::ImageRgb8(ImageBuffer::from_fn(128, 96, |x, y| {
        let v = if ((x + y) / 16) % 2 == 0 { 240 } else { 10 };
        Rgb([v, v, v])
    }))
}

/// Left-to-right gradient with a dark block
fn image_b() -> DynamicImage {
    DynamicImage::ImageRgb8(ImageBuffer::from_fn(128, 96, |x, y| {
        if x < 40 && y < 40 {
            Rgb([0, 0, 0])
        } else {
            let v = (x * 2) as u8;
            Rgb([v, v / 2, 255 - v])
        }
    }))
}

fn write(dir: &Path, relative: &str, bytes: &[u8]) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, bytes).unwrap();
}

/// Three copies of A in different folders, one B, one corrupt file
fn populate(dir: &Path) {
    let a = png_bytes(&image_a());
    write(dir, "a1.png", &a);
    write(dir, "nested/a2.png", &a);
    write(dir, "nested/deeper/a3.png", &a);
    write(dir, "b.png", &png_bytes(&image_b()));
    write(dir, "c.jpg", b"truncated garbage, not a jpeg");
}

#[test]
fn pipeline_groups_identical_copies_and_skips_corrupt_file() {
    let temp_dir = TempDir::new().unwrap();
    populate(temp_dir.path());

    let run = Pipeline::builder()
        .root(temp_dir.path())
        .build()
        .unwrap()
        .run()
        .unwrap();

    assert!(!run.cancelled);
    assert_eq!(run.files_scanned, 5);
    assert_eq!(run.files_hashed, 4);
    assert_eq!(run.files_skipped, 1);

    assert_eq!(run.result.len(), 1);
    let group = run.result.iter().next().unwrap();
    assert_eq!(group.len(), 3);
    assert!(group.paths().all(|p| p.file_name().unwrap().to_string_lossy().starts_with('a')));
    assert!(!run.result.contains_path(&temp_dir.path().join("b.png")));
    assert!(!run.result.contains_path(&temp_dir.path().join("c.jpg")));
}

#[test]
fn pipeline_results_are_repeatable() {
    let temp_dir = TempDir::new().unwrap();
    populate(temp_dir.path());

    let pipeline = Pipeline::builder().root(temp_dir.path()).build().unwrap();
    let first = pipeline.run().unwrap();
    let second = pipeline.run().unwrap();

    assert_eq!(first.result, second.result);
}

#[test]
fn pipeline_never_reports_singleton_groups() {
    let temp_dir = TempDir::new().unwrap();
    populate(temp_dir.path());
    write(temp_dir.path(), "b_copy.png", &png_bytes(&image_b()));

    let run = Pipeline::builder()
        .root(temp_dir.path())
        .build()
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(run.result.len(), 2);
    assert!(run.result.iter().all(|g| g.len() >= 2));
    assert_eq!(run.result.redundant_count(), 3);
}

#[test]
fn pipeline_handles_empty_directory() {
    let temp_dir = TempDir::new().unwrap();

    let run = Pipeline::builder()
        .root(temp_dir.path())
        .build()
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(run.files_scanned, 0);
    assert!(run.result.is_empty());
}

#[test]
fn pipeline_fails_on_missing_root() {
    let result = Pipeline::builder()
        .root("/nonexistent/path/that/does/not/exist")
        .build()
        .unwrap()
        .run();

    assert!(matches!(
        result,
        Err(DuplicateFinderError::Scan(ScanError::RootNotFound { .. }))
    ));
}

#[test]
fn pipeline_respects_extension_filter() {
    let temp = assert_fs::TempDir::new().unwrap();
    let a = png_bytes(&image_a());
    temp.child("one.png").write_binary(&a).unwrap();
    temp.child("two.png").write_binary(&a).unwrap();
    // Same bytes, extension outside the configured set
    temp.child("three.webp").write_binary(&a).unwrap();

    let run = Pipeline::builder()
        .root(temp.path())
        .extensions(["png"])
        .build()
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(run.files_scanned, 2);
    assert_eq!(run.result.len(), 1);
    temp.child("three.webp").assert(predicate::path::exists());
    assert!(!run.result.contains_path(temp.child("three.webp").path()));
}

#[test]
fn background_scan_matches_foreground_scan() {
    let temp_dir = TempDir::new().unwrap();
    populate(temp_dir.path());

    let pipeline = Pipeline::builder().root(temp_dir.path()).build().unwrap();
    let foreground = pipeline.run().unwrap();

    let mut controller = ScanController::new();
    let (handle, _events) = controller.start(pipeline).unwrap();
    let background = handle.wait().unwrap();

    assert_eq!(foreground.result, background.result);
}
