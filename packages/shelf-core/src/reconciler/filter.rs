//! In-memory filtering for catalog listings.

use super::normalize::text_form;
use crate::fields::CLASS;
use crate::store::Fields;

/// Class and free-text filter applied after full enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    /// Lowercased class to match exactly
    class: Option<String>,
    /// Lowercased substring to find in any field value
    search: Option<String>,
}

impl BookFilter {
    /// Builds a filter from raw query values. An empty class or `All`
    /// disables class filtering; an empty search disables searching.
    pub fn new(class: Option<&str>, search: Option<&str>) -> Self {
        let class = class
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"))
            .map(str::to_lowercase);
        let search = search.filter(|s| !s.is_empty()).map(str::to_lowercase);
        Self { class, search }
    }

    /// Returns true if the filter lets every record through.
    pub fn is_empty(&self) -> bool {
        self.class.is_none() && self.search.is_none()
    }

    /// Tests one record's stored fields.
    pub fn matches(&self, fields: &Fields) -> bool {
        if let Some(class) = &self.class {
            if text_form(fields.get(CLASS)).to_lowercase() != *class {
                return false;
            }
        }
        if let Some(search) = &self.search {
            return fields
                .values()
                .any(|value| text_form(Some(value)).to_lowercase().contains(search));
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_all_and_empty_disable_class_filter() {
        assert!(BookFilter::new(Some("All"), None).is_empty());
        assert!(BookFilter::new(Some("all"), Some("")).is_empty());
        assert!(BookFilter::new(Some(""), None).is_empty());
        assert!(BookFilter::new(None, None).is_empty());
    }

    #[test]
    fn test_class_matches_exactly_ignoring_case() {
        let filter = BookFilter::new(Some("ii"), None);
        assert!(filter.matches(&record(json!({"Class": "II"}))));
        assert!(!filter.matches(&record(json!({"Class": "III"}))));
        assert!(!filter.matches(&record(json!({"Book Name": "No class"}))));
    }

    #[test]
    fn test_search_checks_every_value_as_text() {
        let filter = BookFilter::new(None, Some("BHAR"));
        assert!(filter.matches(&record(json!({"Book Name": "Balbharati"}))));
        assert!(!filter.matches(&record(json!({"Book Name": "Atlas"}))));

        let filter = BookFilter::new(None, Some("12"));
        assert!(filter.matches(&record(json!({"Book Price": 120}))));
    }

    #[test]
    fn test_class_and_search_combine() {
        let filter = BookFilter::new(Some("I"), Some("atlas"));
        assert!(filter.matches(&record(json!({"Class": "I", "Book Name": "Atlas"}))));
        assert!(!filter.matches(&record(json!({"Class": "II", "Book Name": "Atlas"}))));
        assert!(!filter.matches(&record(json!({"Class": "I", "Book Name": "Poems"}))));
    }
}
