//! JSON configuration for the demo tools.
//!
//! Each tool has its own config module with a `load_config` entry point;
//! optional sections fall back to their `Default` impls.
pub mod filters;
pub mod transform;

use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
