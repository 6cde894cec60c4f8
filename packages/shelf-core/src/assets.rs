//! Asset registry facade over the document store.
//!
//! Uniqueness of `gmrVmrNo` and lookup by key are supplied by the store;
//! this layer only checks payload shape and maps store errors.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ShelfError, StoreError};
use crate::store::{AssetStore, StoreHandle};

pub const GMR_VMR_NO: &str = "gmrVmrNo";
pub const CASE_NO: &str = "caseNo";

/// Keys managed by the store and ignored in payloads.
const MANAGED_KEYS: &[&str] = &["createdAt", "updatedAt", "_id", "__v"];

/// Case/evidence record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Unique business key
    pub gmr_vmr_no: String,
    pub case_no: String,
    /// Optional free-text fields
    #[serde(flatten)]
    pub details: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Facade exposing list, get, create, update and delete for assets.
#[derive(Debug)]
pub struct AssetRegistry {
    store: StoreHandle<dyn AssetStore>,
}

impl AssetRegistry {
    pub fn new(store: StoreHandle<dyn AssetStore>) -> Self {
        Self { store }
    }

    /// All assets, newest first.
    pub fn list(&self) -> Result<Vec<Asset>, ShelfError> {
        Ok(self.store.get()?.find_all()?)
    }

    pub fn get(&self, key: &str) -> Result<Asset, ShelfError> {
        self.store.get()?.find_one(key)?.ok_or_else(|| not_found(key))
    }

    /// Validates `payload` and inserts it as a new asset.
    pub fn create(&self, payload: &Value) -> Result<Asset, ShelfError> {
        let payload = payload
            .as_object()
            .ok_or_else(|| ShelfError::Validation("request body must be a JSON object".to_string()))?;

        let gmr_vmr_no = text_field(payload.get(GMR_VMR_NO), GMR_VMR_NO)?;
        let case_no = text_field(payload.get(CASE_NO), CASE_NO)?;
        let missing: Vec<String> = [(GMR_VMR_NO, &gmr_vmr_no), (CASE_NO, &case_no)]
            .into_iter()
            .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
            .map(|(field, _)| field.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ShelfError::MissingFields { fields: missing });
        }

        let mut details = BTreeMap::new();
        for (key, value) in payload {
            if is_reserved(key) {
                continue;
            }
            if let Some(text) = text_field(Some(value), key)? {
                details.insert(key.clone(), text);
            }
        }

        let now = Utc::now();
        let asset = Asset {
            gmr_vmr_no: gmr_vmr_no.unwrap_or_default(),
            case_no: case_no.unwrap_or_default(),
            details,
            created_at: now,
            updated_at: now,
        };

        let store = self.store.get()?;
        let created = store.insert(asset).map_err(map_duplicate)?;
        tracing::info!("Registered asset {}", created.gmr_vmr_no);
        Ok(created)
    }

    /// Merges `payload` into the asset with `key`. A null value clears a
    /// free-text field.
    pub fn update(&self, key: &str, payload: &Value) -> Result<Asset, ShelfError> {
        let payload = payload
            .as_object()
            .ok_or_else(|| ShelfError::Validation("request body must be a JSON object".to_string()))?;

        let store = self.store.get()?;
        let mut asset = store.find_one(key)?.ok_or_else(|| not_found(key))?;

        if let Some(new_key) = text_field(payload.get(GMR_VMR_NO), GMR_VMR_NO)? {
            if new_key != asset.gmr_vmr_no {
                return Err(ShelfError::Validation(format!(
                    "{} cannot be changed",
                    GMR_VMR_NO
                )));
            }
        }
        if payload.contains_key(CASE_NO) {
            match text_field(payload.get(CASE_NO), CASE_NO)? {
                Some(case_no) if !case_no.trim().is_empty() => asset.case_no = case_no,
                _ => {
                    return Err(ShelfError::MissingFields {
                        fields: vec![CASE_NO.to_string()],
                    })
                }
            }
        }

        for (field, value) in payload {
            if is_reserved(field) {
                continue;
            }
            match text_field(Some(value), field)? {
                Some(text) => {
                    asset.details.insert(field.clone(), text);
                }
                None => {
                    asset.details.remove(field);
                }
            }
        }
        asset.updated_at = Utc::now();

        let updated = store.replace(asset)?.ok_or_else(|| not_found(key))?;
        tracing::info!("Updated asset {}", key);
        Ok(updated)
    }

    pub fn delete(&self, key: &str) -> Result<(), ShelfError> {
        if !self.store.get()?.delete_one(key)? {
            return Err(not_found(key));
        }
        tracing::info!("Deleted asset {}", key);
        Ok(())
    }

    /// Store handle backing this registry.
    pub fn store(&self) -> &StoreHandle<dyn AssetStore> {
        &self.store
    }
}

fn is_reserved(key: &str) -> bool {
    key == GMR_VMR_NO || key == CASE_NO || MANAGED_KEYS.contains(&key)
}

/// Free-text value of a payload field: strings as-is, numbers and booleans
/// in string form, null as absent. Nested values are rejected.
fn text_field(value: Option<&Value>, field: &str) -> Result<Option<String>, ShelfError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(Value::Array(_)) | Some(Value::Object(_)) => Err(ShelfError::Validation(format!(
            "field '{}' must be text",
            field
        ))),
    }
}

fn not_found(key: &str) -> ShelfError {
    ShelfError::NotFound {
        entity: "Asset",
        key_field: GMR_VMR_NO,
        key: key.to_string(),
    }
}

fn map_duplicate(e: StoreError) -> ShelfError {
    match e {
        StoreError::DuplicateKey { key, .. } => ShelfError::DuplicateKey { key },
        other => ShelfError::Store(other),
    }
}
