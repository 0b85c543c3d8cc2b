use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};

use super::types::Snapshot;

pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    if !path.exists() {
        warn!("snapshot {} does not exist, starting empty", path.display());
        return Ok(Snapshot::default());
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    let mut snapshot: Snapshot = serde_json::from_str(&raw)
        .with_context(|| format!("invalid snapshot JSON in {}", path.display()))?;
    snapshot.link_people();

    info!(
        "loaded {} people and {} interactions from {}",
        snapshot.people.len(),
        snapshot.interactions.len(),
        path.display()
    );
    Ok(snapshot)
}

pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let serialized =
        serde_json::to_string_pretty(snapshot).context("failed to serialize snapshot")?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    fs::write(path, serialized)
        .with_context(|| format!("failed to write snapshot {}", path.display()))?;

    info!(
        "saved {} people and {} interactions to {}",
        snapshot.people.len(),
        snapshot.interactions.len(),
        path.display()
    );
    Ok(())
}
