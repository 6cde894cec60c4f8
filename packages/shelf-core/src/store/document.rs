//! Document collection with a unique `gmrVmrNo` index.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::file::{checksum, read_if_exists, verify_checksum, write_json_atomic, FORMAT_VERSION};
use super::AssetStore;
use crate::assets::Asset;
use crate::error::StoreError;

const KEY_FIELD: &str = "gmrVmrNo";

/// Collection file format.
#[derive(Debug, Serialize, Deserialize)]
struct CollectionFile {
    version: u32,
    /// CRC32 of `documents`
    checksum: u32,
    documents: Vec<Asset>,
}

/// Documents in insertion order plus the unique key index.
#[derive(Debug, Clone, Default)]
struct Collection {
    documents: Vec<Asset>,
    index: HashMap<String, usize>,
}

impl Collection {
    fn from_documents(documents: Vec<Asset>) -> Result<Self, StoreError> {
        let mut collection = Collection::default();
        for asset in documents {
            collection.insert(asset)?;
        }
        Ok(collection)
    }

    fn insert(&mut self, asset: Asset) -> Result<(), StoreError> {
        if self.index.contains_key(&asset.gmr_vmr_no) {
            return Err(StoreError::DuplicateKey {
                field: KEY_FIELD,
                key: asset.gmr_vmr_no,
            });
        }
        self.index
            .insert(asset.gmr_vmr_no.clone(), self.documents.len());
        self.documents.push(asset);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> bool {
        let Some(pos) = self.index.remove(key) else {
            return false;
        };
        self.documents.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        true
    }
}

/// Asset document store, optionally persisted to a collection file.
#[derive(Debug)]
pub struct DocumentStore {
    path: Option<PathBuf>,
    collection: RwLock<Collection>,
}

impl DocumentStore {
    /// Opens the collection at `path`, starting empty if it does not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let collection = match read_if_exists(&path)? {
            Some(contents) => {
                let file: CollectionFile = serde_json::from_slice(&contents).map_err(|e| {
                    StoreError::Corrupted(format!("Failed to parse collection: {}", e))
                })?;
                if file.version != FORMAT_VERSION {
                    return Err(StoreError::Corrupted(format!(
                        "Unsupported collection version: {}",
                        file.version
                    )));
                }
                verify_checksum("asset collection", &file.documents, file.checksum)?;
                // A duplicate here means the file was edited by hand
                Collection::from_documents(file.documents).map_err(|e| {
                    StoreError::Corrupted(format!("Unique index violated on load: {}", e))
                })?
            }
            None => Collection::default(),
        };

        tracing::info!(
            "Opened asset collection {} with {} documents",
            path.display(),
            collection.documents.len()
        );

        Ok(Self {
            path: Some(path),
            collection: RwLock::new(collection),
        })
    }

    /// Creates a store without a backing file.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            collection: RwLock::new(Collection::default()),
        }
    }

    fn mutate<T, F>(&self, change: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Collection) -> Result<T, StoreError>,
    {
        let mut collection = self.collection.write();
        let mut next = collection.clone();
        let result = change(&mut next)?;

        if let Some(path) = &self.path {
            write_json_atomic(
                path,
                &CollectionFile {
                    version: FORMAT_VERSION,
                    checksum: checksum(&next.documents)?,
                    documents: next.documents.clone(),
                },
            )?;
        }

        *collection = next;
        Ok(result)
    }
}

impl AssetStore for DocumentStore {
    fn find_all(&self) -> Result<Vec<Asset>, StoreError> {
        let collection = self.collection.read();
        let mut documents: Vec<Asset> = collection.documents.iter().rev().cloned().collect();
        // Stable sort: equal timestamps keep newest-inserted first
        documents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(documents)
    }

    fn find_one(&self, key: &str) -> Result<Option<Asset>, StoreError> {
        let collection = self.collection.read();
        Ok(collection
            .index
            .get(key)
            .map(|&pos| collection.documents[pos].clone()))
    }

    fn insert(&self, asset: Asset) -> Result<Asset, StoreError> {
        self.mutate(|collection| {
            collection.insert(asset.clone())?;
            Ok(asset)
        })
    }

    fn replace(&self, asset: Asset) -> Result<Option<Asset>, StoreError> {
        // Unchanged collections skip the write
        if !self.collection.read().index.contains_key(&asset.gmr_vmr_no) {
            return Ok(None);
        }
        self.mutate(|collection| {
            let Some(&pos) = collection.index.get(&asset.gmr_vmr_no) else {
                return Ok(None);
            };
            collection.documents[pos] = asset.clone();
            Ok(Some(asset))
        })
    }

    fn delete_one(&self, key: &str) -> Result<bool, StoreError> {
        if !self.collection.read().index.contains_key(key) {
            return Ok(false);
        }
        self.mutate(|collection| Ok(collection.remove(key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn asset(key: &str, minutes_ago: i64) -> Asset {
        let at = Utc::now() - Duration::minutes(minutes_ago);
        Asset {
            gmr_vmr_no: key.to_string(),
            case_no: format!("CASE-{}", key),
            details: Default::default(),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_unique_index_rejects_duplicates() {
        let store = DocumentStore::in_memory();
        store.insert(asset("A1", 0)).unwrap();
        assert_eq!(
            store.insert(asset("A1", 0)),
            Err(StoreError::DuplicateKey {
                field: "gmrVmrNo",
                key: "A1".to_string()
            })
        );
        assert_eq!(store.find_all().unwrap().len(), 1);
    }

    #[test]
    fn test_find_all_sorted_by_created_at_desc() {
        let store = DocumentStore::in_memory();
        store.insert(asset("old", 30)).unwrap();
        store.insert(asset("new", 1)).unwrap();
        store.insert(asset("mid", 10)).unwrap();

        let keys: Vec<String> = store
            .find_all()
            .unwrap()
            .into_iter()
            .map(|a| a.gmr_vmr_no)
            .collect();
        assert_eq!(keys, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_delete_keeps_index_consistent() {
        let store = DocumentStore::in_memory();
        store.insert(asset("A", 3)).unwrap();
        store.insert(asset("B", 2)).unwrap();
        store.insert(asset("C", 1)).unwrap();

        assert!(store.delete_one("A").unwrap());
        assert!(!store.delete_one("A").unwrap());
        assert_eq!(store.find_one("C").unwrap().unwrap().gmr_vmr_no, "C");
        assert_eq!(store.find_one("B").unwrap().unwrap().gmr_vmr_no, "B");
    }
}
