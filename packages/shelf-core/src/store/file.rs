//! File helpers shared by the file-backed stores.

use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

use crc32fast::Hasher;
use serde::Serialize;

use crate::error::StoreError;

/// On-disk format version written by both stores.
pub(crate) const FORMAT_VERSION: u32 = 1;

/// Reads a whole file, returning `None` if it does not exist.
pub(crate) fn read_if_exists(path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StoreError::from_io(e, "Failed to open store file")),
    };
    let mut contents = Vec::new();
    file.read_to_end(&mut contents)
        .map_err(|e| StoreError::from_io(e, "Failed to read store file"))?;
    Ok(Some(contents))
}

/// Serializes `value` and replaces `path` atomically.
pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_vec_pretty(value)
        .map_err(|e| StoreError::Serialization(e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| StoreError::from_io(e, "Failed to create data directory"))?;
    }

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = Path::new(&temp_name);

    let mut file = File::create(temp_path)
        .map_err(|e| StoreError::from_io(e, "Failed to create temp file"))?;
    file.write_all(&json)
        .map_err(|e| StoreError::from_io(e, "Failed to write store file"))?;
    file.sync_all()
        .map_err(|e| StoreError::from_io(e, "Failed to sync store file"))?;

    // Atomic rename
    fs::rename(temp_path, path)
        .map_err(|e| StoreError::from_io(e, "Failed to rename store file"))?;

    Ok(())
}

/// CRC32 over the compact JSON form of `value`.
pub(crate) fn checksum<T: Serialize + ?Sized>(value: &T) -> Result<u32, StoreError> {
    let bytes =
        serde_json::to_vec(value).map_err(|e| StoreError::Serialization(e.to_string()))?;
    let mut hasher = Hasher::new();
    hasher.update(&bytes);
    Ok(hasher.finalize())
}

/// Fails with `Corrupted` when the stored checksum does not match.
pub(crate) fn verify_checksum<T: Serialize + ?Sized>(
    what: &str,
    value: &T,
    expected: u32,
) -> Result<(), StoreError> {
    let actual = checksum(value)?;
    if actual != expected {
        return Err(StoreError::Corrupted(format!(
            "checksum mismatch for {}: expected {:08x}, got {:08x}",
            what, expected, actual
        )));
    }
    Ok(())
}
