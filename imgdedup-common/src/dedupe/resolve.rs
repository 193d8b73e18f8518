use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::dedupe::cluster::DuplicateGroup;
use crate::dedupe::store::ImageHandle;

/// The retained member of one group and everything slated for removal.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub canonical: ImageHandle,
    pub removable: Vec<ImageHandle>,
}

#[derive(Debug, thiserror::Error)]
#[error("failed to remove {path}: {source}")]
pub struct RemovalError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// What happened to one removable member. Failures are recorded, never
/// swallowed.
#[derive(Debug)]
pub struct RemovalOutcome {
    pub path: PathBuf,
    pub result: Result<(), RemovalError>,
}

/// Pick the canonical member of a group: the largest file wins, the
/// lexicographically smallest path breaks ties. A total order over unique
/// paths, so the outcome does not depend on how the group was assembled.
pub fn resolve(group: &DuplicateGroup) -> Resolution {
    let canonical = group
        .members()
        .iter()
        .max_by(|a, b| retention_order(a, b))
        .expect("groups have at least two members")
        .clone();

    let removable = group
        .members()
        .iter()
        .filter(|member| member.path() != canonical.path())
        .cloned()
        .collect();

    Resolution {
        canonical,
        removable,
    }
}

fn retention_order(a: &ImageHandle, b: &ImageHandle) -> Ordering {
    a.size()
        .cmp(&b.size())
        .then_with(|| b.path().cmp(a.path()))
}

/// Delete every removable member of the resolution. A failed deletion does
/// not stop the siblings; every attempt is reported.
pub fn remove(resolution: &Resolution) -> Vec<RemovalOutcome> {
    resolution
        .removable
        .iter()
        .map(|member| {
            let path = member.path().to_path_buf();
            let result = fs::remove_file(&path).map_err(|source| RemovalError {
                path: path.clone(),
                source,
            });
            match &result {
                Ok(()) => log::info!("removed {}", path.display()),
                Err(e) => log::warn!("{e}"),
            }
            RemovalOutcome { path, result }
        })
        .collect()
}
