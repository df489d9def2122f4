use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::{IoError, IoResult};

/// Pretty-print `value` as JSON into `path`.
pub fn write_json<P: AsRef<Path>, V: Serialize + ?Sized>(path: P, value: &V) -> IoResult<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|source| IoError::Io {
        path: path.display().to_string(),
        source,
    })?;
    debug!(path = %path.display(), "wrote json");
    Ok(())
}

pub fn read_json<P: AsRef<Path>, V: DeserializeOwned>(path: P) -> IoResult<V> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| IoError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&json)?)
}
