use std::fs;
use std::path::Path;

use image::RgbImage;
use imgdedup::{dupes, hash, Error};
use imgdedup_common::imghash::ConfigError;
use imgdedup_common::utils::imgutils::{filled, textured};

/// A horizontally decreasing ramp, clearly different from `textured`.
fn falling_ramp(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, _| {
        let v = 255 - (x * 255 / width.max(1)) as u8;
        image::Rgb([v, v, v])
    })
}

fn save(img: &RgbImage, path: &Path) {
    img.save(path).expect("failed to write test image");
}

#[test]
fn empty_directory_yields_empty_mappings() {
    let dir = tempfile::tempdir().unwrap();

    let hashed = hash(dir.path(), None, None, false).unwrap();
    assert!(hashed.hashes.is_empty());
    assert!(hashed.failures.is_empty());

    let duped = dupes(dir.path(), None, None, 0, false).unwrap();
    assert!(duped.groups.is_empty());
    assert!(duped.failures.is_empty());
    assert!(duped.removals.is_empty());
}

#[test]
fn one_entry_per_image_sorted_on_request() {
    let dir = tempfile::tempdir().unwrap();
    save(&textured(64, 64), &dir.path().join("c.png"));
    save(&filled(64, 64, 200, 30, 10), &dir.path().join("a.png"));
    save(&falling_ramp(64, 64), &dir.path().join("b.png"));
    fs::write(dir.path().join("readme.md"), "ignored").unwrap();

    let outcome = hash(dir.path(), Some("dHash"), Some("triangle"), true).unwrap();
    assert_eq!(3, outcome.hashes.len());
    assert!(outcome.failures.is_empty());

    let paths: Vec<_> = outcome.hashes.iter().map(|(p, _)| p.clone()).collect();
    let mut sorted = paths.clone();
    sorted.sort();
    assert_eq!(sorted, paths);

    // base64 of 8 bytes, unpadded
    assert!(outcome.hashes.iter().all(|(_, fp)| fp.len() == 11));
}

#[test]
fn every_algorithm_hashes_the_same_directory() {
    let dir = tempfile::tempdir().unwrap();
    save(&textured(64, 64), &dir.path().join("a.png"));
    save(&falling_ramp(64, 64), &dir.path().join("b.png"));

    for algo in ["aHash", "dhash", "PHASH", "wHash"] {
        let outcome = hash(dir.path(), Some(algo), None, false).unwrap();
        assert_eq!(2, outcome.hashes.len(), "{algo} missed an image");
    }
}

#[test]
fn unknown_names_are_fatal() {
    let dir = tempfile::tempdir().unwrap();

    match hash(dir.path(), Some("md5"), None, false) {
        Err(Error::Config(ConfigError::UnknownAlgorithm(name))) => {
            assert_eq!("md5", name)
        }
        other => panic!("expected a config error, got {other:?}"),
    }

    match dupes(dir.path(), None, Some("mitchell"), 0, false) {
        Err(Error::Config(ConfigError::UnknownFilter(name))) => {
            assert_eq!("mitchell", name)
        }
        other => panic!("expected a config error, got {other:?}"),
    }
}

#[test]
fn missing_roots_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let gone = dir.path().join("nothing-here");
    assert!(matches!(
        hash(&gone, None, None, false),
        Err(Error::InvalidRoot(_))
    ));
}

#[test]
fn one_unreadable_file_is_reported_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    save(&textured(64, 64), &dir.path().join("good1.png"));
    save(&falling_ramp(64, 64), &dir.path().join("good2.png"));
    fs::write(dir.path().join("broken.png"), b"not a png at all").unwrap();

    let outcome = hash(dir.path(), None, None, false).unwrap();
    assert_eq!(2, outcome.hashes.len());
    assert_eq!(1, outcome.failures.len());
    assert!(outcome.failures[0].path.ends_with("broken.png"));
}

#[test]
fn identical_copies_group_without_touching_files() {
    let dir = tempfile::tempdir().unwrap();
    let img = textured(128, 128);
    save(&img, &dir.path().join("copy1.png"));
    save(&img, &dir.path().join("copy2.png"));
    save(&falling_ramp(128, 128), &dir.path().join("different.png"));

    let outcome = dupes(dir.path(), None, None, 0, false).unwrap();
    assert_eq!(1, outcome.groups.len());
    assert!(outcome.removals.is_empty());

    let (canonical, removable) = outcome.groups.iter().next().unwrap();
    assert!(canonical.ends_with("copy1.png"));
    assert_eq!(1, removable.len());
    assert!(removable[0].ends_with("copy2.png"));

    // nothing was deleted
    assert!(dir.path().join("copy1.png").exists());
    assert!(dir.path().join("copy2.png").exists());
    assert!(dir.path().join("different.png").exists());
}

#[test]
fn removal_leaves_exactly_one_file_per_group() {
    let dir = tempfile::tempdir().unwrap();
    let img = textured(128, 128);
    save(&img, &dir.path().join("copy1.png"));
    save(&img, &dir.path().join("copy2.png"));
    save(&img, &dir.path().join("copy3.png"));
    save(&falling_ramp(128, 128), &dir.path().join("different.png"));

    let outcome = dupes(dir.path(), None, None, 0, true).unwrap();
    assert_eq!(1, outcome.groups.len());
    assert_eq!(2, outcome.removals.len());
    assert!(outcome.removals.iter().all(|o| o.result.is_ok()));

    // identical bytes mean identical sizes, so the smallest path is kept
    assert!(dir.path().join("copy1.png").exists());
    assert!(!dir.path().join("copy2.png").exists());
    assert!(!dir.path().join("copy3.png").exists());
    assert!(dir.path().join("different.png").exists());
}

#[test]
fn limit_bounds_a_run() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["a.png", "b.png", "c.png"] {
        save(&textured(32, 32), &dir.path().join(name));
    }

    let config = imgdedup::RunConfig::from_names(None, None).unwrap().limit(2);
    let outcome = imgdedup::hash_with(dir.path(), &config, true).unwrap();
    assert_eq!(2, outcome.hashes.len());
}
