use std::path::{Path, PathBuf};
use std::time::SystemTime;

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::imghash::normalize::NormalizeError;
use crate::imghash::{self, Fingerprint, HashAlgorithm, ResampleFilter};

/// Extensions worth trying to decode. Everything else is silently skipped.
const IMAGE_EXTENSIONS: &[&str] =
    &["bmp", "gif", "jpeg", "jpg", "png", "tif", "tiff", "webp"];

/// A discovered image file plus the metadata used for canonical tie-breaks.
/// Immutable once discovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHandle {
    path: PathBuf,
    size: u64,
    modified: Option<SystemTime>,
}

impl ImageHandle {
    pub fn new(path: PathBuf, size: u64, modified: Option<SystemTime>) -> Self {
        Self {
            path,
            size,
            modified,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }
}

/// Why a single image did not make it into the store.
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    #[error("failed to decode: {0}")]
    Decode(#[source] image::ImageError),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

/// A per-item failure. The rest of the batch is unaffected.
#[derive(Debug)]
pub struct HashFailure {
    pub path: PathBuf,
    pub error: HashError,
}

/// The fingerprints of one run. Every entry was produced by the same
/// algorithm and paths are unique, so entries compare freely against each
/// other. The order of entries carries no meaning.
#[derive(Debug)]
pub struct FingerprintStore {
    algo: HashAlgorithm,
    entries: Vec<(ImageHandle, Fingerprint)>,
}

impl FingerprintStore {
    /// Assemble a store from fingerprints computed elsewhere. Entries whose
    /// algorithm differs from `algo` are refused.
    pub fn from_entries(
        algo: HashAlgorithm,
        entries: Vec<(ImageHandle, Fingerprint)>,
    ) -> Result<Self, imghash::hamming::AlgorithmMismatch> {
        for (_, fingerprint) in &entries {
            if fingerprint.algo() != algo {
                return Err(imghash::hamming::AlgorithmMismatch {
                    left: algo,
                    right: fingerprint.algo(),
                });
            }
        }
        Ok(Self { algo, entries })
    }

    pub fn algo(&self) -> HashAlgorithm {
        self.algo
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(ImageHandle, Fingerprint)] {
        &self.entries
    }
}

/// Recursively collect image files under `root`, capturing the metadata the
/// retention tie-break needs. `limit` caps how many files are picked up, for
/// callers that want to bound a run before it starts.
pub fn discover(root: &Path, limit: usize) -> Vec<ImageHandle> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| has_image_extension(entry.path()))
        .take(limit)
        .map(|entry| {
            let meta = entry.metadata().ok();
            let size = meta.as_ref().map_or(0, |m| m.len());
            let modified = meta.and_then(|m| m.modified().ok());
            ImageHandle::new(entry.into_path(), size, modified)
        })
        .collect()
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Hash every handle with the same algorithm and filter, fanned out over a
/// worker pool. Each worker owns its handle outright and the results are
/// merged afterwards, so the store needs no locking.
///
/// A file that fails to decode or normalize only costs its own entry; the
/// batch always completes and the failures come back next to the store.
pub fn build_store(
    handles: Vec<ImageHandle>,
    algo: HashAlgorithm,
    filter: ResampleFilter,
) -> (FingerprintStore, Vec<HashFailure>) {
    let results: Vec<Result<(ImageHandle, Fingerprint), HashFailure>> = handles
        .into_par_iter()
        .map(|handle| match hash_one(&handle, algo, filter) {
            Ok(fingerprint) => Ok((handle, fingerprint)),
            Err(error) => Err(HashFailure {
                path: handle.into_path(),
                error,
            }),
        })
        .collect();

    let mut entries = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(entry) => entries.push(entry),
            Err(failure) => {
                log::warn!("skipping {}: {}", failure.path.display(), failure.error);
                failures.push(failure);
            }
        }
    }

    log::debug!(
        "hashed {} images with {algo}, {} failed",
        entries.len(),
        failures.len()
    );

    (FingerprintStore { algo, entries }, failures)
}

fn hash_one(
    handle: &ImageHandle,
    algo: HashAlgorithm,
    filter: ResampleFilter,
) -> Result<Fingerprint, HashError> {
    let img = image::open(handle.path()).map_err(HashError::Decode)?;
    let fingerprint = imghash::hash_image(&img, algo, filter)?;
    log::trace!("{} {}", fingerprint, handle.path().display());
    Ok(fingerprint)
}
