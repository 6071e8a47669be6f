//! JSON snapshots of the entity tables ("local directory" storage)

use super::entities::Entities;
use crate::core::models::Principal;
use crate::utils::error::{AccessError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

pub(super) const SNAPSHOT_FILE: &str = "access.json";
const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    principals: Vec<Principal>,
}

pub(super) fn load(path: &Path) -> Result<Option<Entities>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read(path)?;
    let snapshot: Snapshot = serde_json::from_slice(&content)?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(AccessError::storage(format!(
            "Unsupported snapshot version {} in {:?}",
            snapshot.version, path
        )));
    }
    Entities::from_principals(snapshot.principals).map(Some)
}

/// Write the snapshot next to `path` and move it into place
pub(super) fn save(path: &Path, entities: &Entities) -> Result<()> {
    let mut principals: Vec<Principal> = entities.iter().cloned().collect();
    principals.sort_by(|a, b| (a.kind.as_str(), &a.name).cmp(&(b.kind.as_str(), &b.name)));

    let snapshot = Snapshot {
        version: SNAPSHOT_VERSION,
        principals,
    };
    let content = serde_json::to_vec_pretty(&snapshot)?;

    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, content)?;
    std::fs::rename(&tmp_path, path)?;

    debug!("Persisted {} access entities to {:?}", entities.len(), path);
    Ok(())
}
