use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::repository::StorageError;

/// Result of reading a JSON document that is allowed to be absent or broken.
pub(super) enum ReadOutcome<T> {
    Missing,
    Corrupt(String),
    Value(T),
}

/// Read and parse a whole JSON file.
///
/// Only genuine I/O failures become errors; a missing file and a file that
/// fails to parse are ordinary outcomes the self-healing callers act on.
pub(super) async fn read_json<T: DeserializeOwned>(
    path: &Path,
) -> Result<ReadOutcome<T>, StorageError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(ReadOutcome::Missing),
        Err(err) => return Err(StorageError::Io(err.to_string())),
    };
    match serde_json::from_slice(&bytes) {
        Ok(value) => Ok(ReadOutcome::Value(value)),
        Err(err) => Ok(ReadOutcome::Corrupt(err.to_string())),
    }
}

/// Serialize and write a whole JSON file, replacing prior content.
pub(super) async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let bytes = serde_json::to_vec_pretty(value)
        .map_err(|err| StorageError::Serialization(err.to_string()))?;
    tokio::fs::write(path, bytes)
        .await
        .map_err(|err| StorageError::Io(err.to_string()))
}
