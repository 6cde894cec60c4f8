//! Book field schema shared by every catalog call site.

/// Column layout and typing rules of a record store.
#[derive(Debug, Clone, Copy)]
pub struct FieldSchema {
    /// Columns in sheet header order
    pub columns: &'static [&'static str],
    /// Fields that must be present on create and update, in reporting order
    pub required: &'static [&'static str],
    /// Fields normalized to numbers
    pub numeric: &'static [&'static str],
    /// Field used to locate records for update and delete
    pub business_key: &'static str,
    /// Derived positional field, never written
    pub derived: &'static str,
}

impl FieldSchema {
    /// Returns true if `key` is normalized as a number.
    pub fn is_numeric(&self, key: &str) -> bool {
        self.numeric.contains(&key)
    }

    /// Returns true if `key` is a header column.
    pub fn is_column(&self, key: &str) -> bool {
        self.columns.contains(&key)
    }

    /// Returns true if `key` is derived from store position.
    pub fn is_derived(&self, key: &str) -> bool {
        self.derived == key
    }
}

pub const SR_NO: &str = "SrNo";
pub const CLASS: &str = "Class";
pub const BOOK_NAME: &str = "Book Name";
pub const BOOK_PRICE: &str = "Book Price";
pub const VOLUME: &str = "Volume";
pub const ROW_INDEX: &str = "rowIndex";

/// Schema of a Book Record row.
pub const BOOK_SCHEMA: FieldSchema = FieldSchema {
    columns: &[
        SR_NO, CLASS, BOOK_NAME, BOOK_PRICE, VOLUME, "Date", "Room", "Kapat", "other1", "other2",
        "Writer", "Reader",
    ],
    required: &[CLASS, BOOK_NAME, BOOK_PRICE],
    numeric: &[SR_NO, VOLUME, BOOK_PRICE],
    business_key: SR_NO,
    derived: ROW_INDEX,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_schema_sets_are_columns() {
        for field in BOOK_SCHEMA.required.iter().chain(BOOK_SCHEMA.numeric) {
            assert!(BOOK_SCHEMA.is_column(field), "{} is not a column", field);
        }
        assert!(BOOK_SCHEMA.is_column(BOOK_SCHEMA.business_key));
        assert!(!BOOK_SCHEMA.is_column(BOOK_SCHEMA.derived));
    }

    #[test]
    fn test_numeric_membership() {
        assert!(BOOK_SCHEMA.is_numeric("SrNo"));
        assert!(BOOK_SCHEMA.is_numeric("Book Price"));
        assert!(BOOK_SCHEMA.is_numeric("Volume"));
        assert!(!BOOK_SCHEMA.is_numeric("Class"));
        assert!(!BOOK_SCHEMA.is_numeric("Writer"));
    }
}
