//! Catalog reconciliation: validation, coercion, business-key lookup and
//! field-by-field updates against the catalog store.
//!
//! The store has no index, so every update and delete re-enumerates the
//! whole sheet and scans it. That is only acceptable for small catalogs.
//! Lookups are confined to [`locate_by_business_key`] so an indexed store
//! can replace the scan without touching validation or coercion.

pub mod filter;
pub mod key;
pub mod normalize;

use serde_json::Value;

use crate::error::ShelfError;
use crate::fields::{FieldSchema, BOOK_SCHEMA};
use crate::store::{BookRow, CatalogStore, Fields, StoreHandle};

pub use filter::BookFilter;
pub use key::{Clock, KeyGenerator, SystemClock};
pub use normalize::{is_falsy, normalize_field, text_form, validate_required, RequiredRule};

/// Returns the first record whose business key, compared as a string,
/// equals `key`.
pub fn locate_by_business_key<'a>(
    records: &'a [BookRow],
    key: &str,
    schema: &FieldSchema,
) -> Result<&'a BookRow, ShelfError> {
    let mut matches = records
        .iter()
        .filter(|record| text_form(record.fields.get(schema.business_key)) == key);

    let found = matches.next().ok_or_else(|| ShelfError::NotFound {
        entity: "Book",
        key_field: schema.business_key,
        key: key.to_string(),
    })?;

    let extra = matches.count();
    if extra > 0 {
        tracing::warn!(
            "{} '{}' matches {} records, using row {}",
            schema.business_key,
            key,
            extra + 1,
            found.row_index
        );
    }
    Ok(found)
}

/// Overwrites exactly the payload's keys on `record`, then persists it
/// with a single store call.
pub fn apply_update(
    store: &dyn CatalogStore,
    record: &mut BookRow,
    payload: &Fields,
    schema: &FieldSchema,
) -> Result<(), ShelfError> {
    for (key, value) in payload {
        if let Some(normalized) = normalize_field(key, Some(value), schema) {
            record.fields.insert(key.clone(), normalized);
        }
    }
    store.persist(record)?;
    Ok(())
}

/// Book Record facade over the catalog store.
#[derive(Debug)]
pub struct CatalogReconciler {
    store: StoreHandle<dyn CatalogStore>,
    schema: FieldSchema,
    keys: KeyGenerator,
}

impl CatalogReconciler {
    /// Creates a reconciler for Book Records using the wall clock.
    pub fn new(store: StoreHandle<dyn CatalogStore>) -> Self {
        Self::with_key_generator(store, KeyGenerator::default())
    }

    /// Creates a reconciler with a custom fallback key source.
    pub fn with_key_generator(store: StoreHandle<dyn CatalogStore>, keys: KeyGenerator) -> Self {
        Self {
            store,
            schema: BOOK_SCHEMA,
            keys,
        }
    }

    /// Lists records matching `filter`, each with its `rowIndex`.
    pub fn list(&self, filter: &BookFilter) -> Result<Vec<Fields>, ShelfError> {
        let store = self.store.get()?;
        let records = store.enumerate_records()?;
        let total = records.len();

        let views: Vec<Fields> = records
            .into_iter()
            .filter(|record| filter.matches(&record.fields))
            .map(|record| self.view(record))
            .collect();

        tracing::debug!("Listed {} of {} books", views.len(), total);
        Ok(views)
    }

    /// Returns the record carrying `sr_no`.
    pub fn get(&self, sr_no: &str) -> Result<Fields, ShelfError> {
        let store = self.store.get()?;
        let records = store.enumerate_records()?;
        let record = locate_by_business_key(&records, sr_no, &self.schema)?;
        Ok(self.view(record.clone()))
    }

    /// Validates and appends a new record, returning its business key.
    pub fn create(&self, payload: &Value) -> Result<Value, ShelfError> {
        let payload = as_fields(payload)?;
        validate_required(payload, self.schema.required, RequiredRule::Truthy)?;
        let store = self.store.get()?;

        let mut row = Fields::new();
        for column in self.schema.columns {
            if let Some(value) = normalize_field(column, payload.get(*column), &self.schema) {
                row.insert(column.to_string(), value);
            }
        }

        let key_field = self.schema.business_key;
        if row.get(key_field).map_or(true, |key| is_falsy(Some(key))) {
            let key = self.keys.next_key();
            tracing::debug!("Assigned fallback {} {}", key_field, key);
            row.insert(key_field.to_string(), Value::from(key));
        }
        let sr_no = row.get(key_field).cloned().unwrap_or(Value::Null);

        store.append_record(row)?;
        tracing::info!("Added book {} {}", key_field, sr_no);
        Ok(sr_no)
    }

    /// Overwrites the payload's fields on the record carrying `sr_no`.
    pub fn update(&self, sr_no: &str, payload: &Value) -> Result<(), ShelfError> {
        let payload = as_fields(payload)?;
        validate_required(payload, self.schema.required, RequiredRule::Present)?;
        let store = self.store.get()?;

        let records = store.enumerate_records()?;
        let mut record = locate_by_business_key(&records, sr_no, &self.schema)?.clone();
        apply_update(store.as_ref(), &mut record, payload, &self.schema)?;

        tracing::info!(
            "Updated book {} {} at row {}",
            self.schema.business_key,
            sr_no,
            record.row_index
        );
        Ok(())
    }

    /// Deletes the record carrying `sr_no`.
    pub fn delete(&self, sr_no: &str) -> Result<(), ShelfError> {
        let store = self.store.get()?;
        let records = store.enumerate_records()?;
        let record = locate_by_business_key(&records, sr_no, &self.schema)?;
        store.delete_record(record)?;

        tracing::info!(
            "Deleted book {} {} at row {}",
            self.schema.business_key,
            sr_no,
            record.row_index
        );
        Ok(())
    }

    /// Store handle backing this reconciler.
    pub fn store(&self) -> &StoreHandle<dyn CatalogStore> {
        &self.store
    }

    fn view(&self, record: BookRow) -> Fields {
        let mut fields = record.fields;
        fields.insert(self.schema.derived.to_string(), Value::from(record.row_index));
        fields
    }
}

fn as_fields(payload: &Value) -> Result<&Fields, ShelfError> {
    payload
        .as_object()
        .ok_or_else(|| ShelfError::Validation("request body must be a JSON object".to_string()))
}
