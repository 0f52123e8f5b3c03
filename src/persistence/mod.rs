//! JSON file persistence
//!
//! Reads tolerate nothing: callers decide what a missing or corrupt file
//! means. Writes go to a sibling `.tmp` file first and are renamed over the
//! target, so a crash mid-write leaves the previous file intact.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;

/// Parse a JSON file into `T`
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Serialize `value` as pretty JSON and atomically replace `path`.
/// Missing parent directories are created.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(value)?;
    atomic_write(path, json.as_bytes())
}

fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    if let Err(err) = fs::rename(&tmp, path) {
        // Some filesystems refuse rename over an existing file
        log::warn!("rename onto {} failed ({err}), copying instead", path.display());
        fs::copy(&tmp, path)?;
        let _ = fs::remove_file(&tmp);
    }
    Ok(())
}
