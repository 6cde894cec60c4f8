//! Spreadsheet-like catalog store backed by a workbook file.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::file::{checksum, read_if_exists, verify_checksum, write_json_atomic, FORMAT_VERSION};
use super::{BookRow, CatalogStore, Fields};
use crate::error::StoreError;
use crate::fields::FieldSchema;

/// Sheet row number of the first record; row 1 holds the header.
pub const FIRST_DATA_ROW: usize = 2;

/// Workbook file format.
#[derive(Debug, Serialize, Deserialize)]
struct WorkbookFile {
    version: u32,
    sheets: Vec<SheetFile>,
}

/// One sheet as stored on disk.
#[derive(Debug, Serialize, Deserialize)]
struct SheetFile {
    title: String,
    header: Vec<String>,
    rows: Vec<Fields>,
    /// CRC32 of `rows`
    checksum: u32,
}

#[derive(Debug, Clone)]
struct Sheet {
    title: String,
    header: Vec<String>,
    rows: Vec<Fields>,
}

impl Sheet {
    /// Keeps only header columns, the way a sheet drops unknown keys.
    fn project(&self, fields: &Fields) -> Fields {
        self.header
            .iter()
            .filter_map(|column| fields.get(column).map(|v| (column.clone(), v.clone())))
            .collect()
    }

    /// Position of `record`'s row, checked against its enumerated key.
    fn position(&self, record: &BookRow, key_column: &str) -> Result<usize, StoreError> {
        let row_index = record.row_index;
        let pos = row_index
            .checked_sub(FIRST_DATA_ROW)
            .filter(|&pos| pos < self.rows.len())
            .ok_or(StoreError::RowOutOfRange {
                row_index,
                row_count: self.rows.len(),
            })?;

        let current = self.rows[pos].get(key_column).unwrap_or(&Value::Null);
        if *current != record.key {
            return Err(StoreError::StaleRow {
                row_index,
                key: match &record.key {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                },
            });
        }
        Ok(pos)
    }
}

/// Catalog store over one sheet of a workbook.
///
/// Rows live in memory; every mutation rewrites the workbook file before
/// it becomes visible. A store opened with [`SheetStore::in_memory`] has no
/// backing file.
#[derive(Debug)]
pub struct SheetStore {
    path: Option<PathBuf>,
    sheet_index: usize,
    /// Business key column guarding row writes
    key_column: &'static str,
    sheets: Mutex<Vec<Sheet>>,
}

impl SheetStore {
    /// Opens the workbook at `path`, creating it with a single sheet
    /// carrying `schema`'s header if the file does not exist.
    pub fn open(
        path: impl AsRef<Path>,
        sheet_index: usize,
        schema: &FieldSchema,
    ) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let sheets = match read_if_exists(&path)? {
            Some(contents) => Self::parse_workbook(&contents)?,
            None => {
                tracing::info!("Creating workbook {}", path.display());
                let sheets = vec![Self::blank_sheet(schema)];
                Self::save(&path, &sheets)?;
                sheets
            }
        };

        if sheet_index >= sheets.len() {
            return Err(StoreError::SheetNotFound {
                index: sheet_index,
                count: sheets.len(),
            });
        }

        tracing::info!(
            "Opened sheet {} ('{}') of {} with {} rows",
            sheet_index,
            sheets[sheet_index].title,
            path.display(),
            sheets[sheet_index].rows.len()
        );

        Ok(Self {
            path: Some(path),
            sheet_index,
            key_column: schema.business_key,
            sheets: Mutex::new(sheets),
        })
    }

    /// Creates a store without a backing file.
    pub fn in_memory(schema: &FieldSchema) -> Self {
        Self {
            path: None,
            sheet_index: 0,
            key_column: schema.business_key,
            sheets: Mutex::new(vec![Self::blank_sheet(schema)]),
        }
    }

    /// Header columns of the target sheet.
    pub fn header(&self) -> Vec<String> {
        self.sheets.lock()[self.sheet_index].header.clone()
    }

    fn blank_sheet(schema: &FieldSchema) -> Sheet {
        Sheet {
            title: "Books".to_string(),
            header: schema.columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    fn parse_workbook(contents: &[u8]) -> Result<Vec<Sheet>, StoreError> {
        let workbook: WorkbookFile = serde_json::from_slice(contents)
            .map_err(|e| StoreError::Corrupted(format!("Failed to parse workbook: {}", e)))?;

        if workbook.version != FORMAT_VERSION {
            return Err(StoreError::Corrupted(format!(
                "Unsupported workbook version: {}",
                workbook.version
            )));
        }

        workbook
            .sheets
            .into_iter()
            .map(|sheet| {
                verify_checksum(&format!("sheet '{}'", sheet.title), &sheet.rows, sheet.checksum)?;
                Ok(Sheet {
                    title: sheet.title,
                    header: sheet.header,
                    rows: sheet.rows,
                })
            })
            .collect()
    }

    fn save(path: &Path, sheets: &[Sheet]) -> Result<(), StoreError> {
        let sheets = sheets
            .iter()
            .map(|sheet| {
                Ok(SheetFile {
                    title: sheet.title.clone(),
                    header: sheet.header.clone(),
                    checksum: checksum(&sheet.rows)?,
                    rows: sheet.rows.clone(),
                })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        write_json_atomic(
            path,
            &WorkbookFile {
                version: FORMAT_VERSION,
                sheets,
            },
        )
    }

    /// Applies `change` to a copy of the target sheet, writes the workbook,
    /// then publishes the copy. A failed write leaves the rows untouched.
    fn mutate<F>(&self, change: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Sheet) -> Result<(), StoreError>,
    {
        let mut sheets = self.sheets.lock();
        let mut next = sheets[self.sheet_index].clone();
        change(&mut next)?;

        if let Some(path) = &self.path {
            let mut staged = sheets.clone();
            staged[self.sheet_index] = next.clone();
            Self::save(path, &staged)?;
        }

        sheets[self.sheet_index] = next;
        Ok(())
    }
}

impl CatalogStore for SheetStore {
    fn enumerate_records(&self) -> Result<Vec<BookRow>, StoreError> {
        let sheets = self.sheets.lock();
        Ok(sheets[self.sheet_index]
            .rows
            .iter()
            .enumerate()
            .map(|(pos, fields)| BookRow {
                row_index: pos + FIRST_DATA_ROW,
                key: fields.get(self.key_column).cloned().unwrap_or(Value::Null),
                fields: fields.clone(),
            })
            .collect())
    }

    fn append_record(&self, fields: Fields) -> Result<(), StoreError> {
        self.mutate(|sheet| {
            let row = sheet.project(&fields);
            sheet.rows.push(row);
            Ok(())
        })
    }

    fn persist(&self, record: &BookRow) -> Result<(), StoreError> {
        self.mutate(|sheet| {
            let pos = sheet.position(record, self.key_column)?;
            sheet.rows[pos] = sheet.project(&record.fields);
            Ok(())
        })
    }

    fn delete_record(&self, record: &BookRow) -> Result<(), StoreError> {
        self.mutate(|sheet| {
            let pos = sheet.position(record, self.key_column)?;
            sheet.rows.remove(pos);
            Ok(())
        })
    }
}
