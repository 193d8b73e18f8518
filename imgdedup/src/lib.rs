//! Visual deduplication of image directories: fingerprint every image with a
//! perceptual hash, group the ones that look the same, and optionally delete
//! all but one member per group.
//!
//! The two operations here, [`hash`] and [`dupes`], are the surface consumed
//! by directory-walking callers, bindings and the CLI. Per-file trouble
//! (corrupt images, failed deletions) never aborts a call; it is collected in
//! the returned outcome. Only misconfiguration and an unusable root are
//! fatal.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use imgdedup_common::dedupe::resolve::RemovalOutcome;
use imgdedup_common::dedupe::store::{FingerprintStore, HashFailure};
use imgdedup_common::dedupe::{cluster, resolve, store};
use imgdedup_common::imghash::algorithm::DEFAULT_ALGORITHM;
use imgdedup_common::imghash::hamming::Distance;
use imgdedup_common::imghash::normalize::DEFAULT_FILTER;
use imgdedup_common::imghash::{ConfigError, HashAlgorithm, ResampleFilter};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("not a directory: {0}")]
    InvalidRoot(PathBuf),
}

/// Everything [`hash`] and [`dupes`] have in common, resolved eagerly from
/// caller-supplied names.
#[derive(Debug, Clone, Copy)]
pub struct RunConfig {
    algo: HashAlgorithm,
    filter: ResampleFilter,
    limit: usize,
}

impl RunConfig {
    /// Resolve algorithm and filter names, rejecting unknown ones up front.
    /// `None` picks the defaults: dHash and the triangle filter.
    pub fn from_names(
        algo: Option<&str>,
        filter: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let algo = match algo {
            Some(name) => name.parse()?,
            None => DEFAULT_ALGORITHM,
        };
        let filter = match filter {
            Some(name) => name.parse()?,
            None => DEFAULT_FILTER,
        };
        Ok(Self {
            algo,
            filter,
            limit: usize::MAX,
        })
    }

    /// Bound the number of files a run picks up.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn algo(&self) -> HashAlgorithm {
        self.algo
    }

    pub fn filter(&self) -> ResampleFilter {
        self.filter
    }
}

/// Result of [`hash`]: one base64 fingerprint per decodable image, plus the
/// files that could not be fingerprinted.
#[derive(Debug)]
pub struct HashOutcome {
    pub hashes: Vec<(PathBuf, String)>,
    pub failures: Vec<HashFailure>,
}

/// Result of [`dupes`]: duplicate groups keyed by their canonical path, the
/// per-file hashing failures, and (when removal was requested) what happened
/// to each removable file.
#[derive(Debug)]
pub struct DupesOutcome {
    pub groups: BTreeMap<PathBuf, Vec<PathBuf>>,
    pub failures: Vec<HashFailure>,
    pub removals: Vec<RemovalOutcome>,
}

/// Fingerprint all images under `root` recursively.
///
/// `sort` orders the result by path; unsorted output follows no particular
/// order.
pub fn hash(
    root: &Path,
    algo: Option<&str>,
    filter: Option<&str>,
    sort: bool,
) -> Result<HashOutcome, Error> {
    let config = RunConfig::from_names(algo, filter)?;
    hash_with(root, &config, sort)
}

/// [`hash`] with an already resolved configuration.
pub fn hash_with(
    root: &Path,
    config: &RunConfig,
    sort: bool,
) -> Result<HashOutcome, Error> {
    let (store, failures) = build(root, config)?;

    let mut hashes: Vec<(PathBuf, String)> = store
        .entries()
        .iter()
        .map(|(handle, fingerprint)| {
            (handle.path().to_path_buf(), fingerprint.to_base64())
        })
        .collect();
    if sort {
        hashes.sort_by(|(a, _), (b, _)| a.cmp(b));
    }

    Ok(HashOutcome { hashes, failures })
}

/// Group visually identical images under `root`.
///
/// Two images land in the same group when their fingerprints connect through
/// a chain of pairwise distances within `threshold`; zero keeps only exact
/// fingerprint matches. With `remove`, every non-canonical member is deleted
/// and each attempt is reported in the outcome.
pub fn dupes(
    root: &Path,
    algo: Option<&str>,
    filter: Option<&str>,
    threshold: Distance,
    remove: bool,
) -> Result<DupesOutcome, Error> {
    let config = RunConfig::from_names(algo, filter)?;
    dupes_with(root, &config, threshold, remove)
}

/// [`dupes`] with an already resolved configuration.
pub fn dupes_with(
    root: &Path,
    config: &RunConfig,
    threshold: Distance,
    remove: bool,
) -> Result<DupesOutcome, Error> {
    let (store, failures) = build(root, config)?;
    let groups = cluster::cluster(&store, threshold);

    let mut mapping = BTreeMap::new();
    let mut removals = Vec::new();
    for group in &groups {
        let resolution = resolve::resolve(group);
        if remove {
            removals.extend(resolve::remove(&resolution));
        }
        mapping.insert(
            resolution.canonical.path().to_path_buf(),
            resolution
                .removable
                .iter()
                .map(|handle| handle.path().to_path_buf())
                .collect(),
        );
    }

    Ok(DupesOutcome {
        groups: mapping,
        failures,
        removals,
    })
}

fn build(
    root: &Path,
    config: &RunConfig,
) -> Result<(FingerprintStore, Vec<HashFailure>), Error> {
    if !root.is_dir() {
        return Err(Error::InvalidRoot(root.to_path_buf()));
    }

    let handles = store::discover(root, config.limit);
    log::info!(
        "found {} image files under {}",
        handles.len(),
        root.display()
    );

    Ok(store::build_store(handles, config.algo, config.filter))
}
