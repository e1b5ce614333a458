//! Location to service-connection-code directory.
//!
//! Uploaded sheets name plants by location ("Bellandur", "Sahakar Nagar");
//! the database keys rows by the DISCOM service-connection code
//! ("S11HT-124"). The mapping lives in a JSON file of
//! `{"location": ..., "unit_id": ...}` entries.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
struct LocationUnit {
    location: String,
    unit_id: String,
}

#[derive(Debug, Clone)]
pub struct UnitDirectory {
    // keyed by uppercased location
    by_location: HashMap<String, String>,
}

impl UnitDirectory {
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<LocationUnit> =
            serde_json::from_str(json).context("invalid unit directory JSON")?;
        Ok(Self {
            by_location: entries
                .into_iter()
                .map(|e| (e.location.to_uppercase(), e.unit_id))
                .collect(),
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading unit directory {}", path.display()))?;
        let directory = Self::from_json(&raw)?;
        tracing::debug!(
            path = %path.display(),
            entries = directory.len(),
            "loaded unit directory"
        );
        Ok(directory)
    }

    /// Service-connection code for a location, case-insensitive.
    pub fn unit_code(&self, location: &str) -> Option<&str> {
        self.by_location
            .get(&location.to_uppercase())
            .map(String::as_str)
    }

    /// `"BELLANDUR (S11HT-124)"` — the form the monthly tables store in
    /// their `unit` column.
    pub fn display_name(&self, location: &str) -> Option<String> {
        self.unit_code(location)
            .map(|code| format!("{} ({code})", location.to_uppercase()))
    }

    pub fn len(&self) -> usize {
        self.by_location.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_location.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"location": "Bellandur", "unit_id": "S11HT-124"},
        {"location": "Sahakar Nagar", "unit_id": "C8HT-111"}
    ]"#;

    #[test]
    fn lookup_is_case_insensitive() {
        let directory = UnitDirectory::from_json(SAMPLE).unwrap();
        assert_eq!(directory.unit_code("bellandur"), Some("S11HT-124"));
        assert_eq!(directory.unit_code("BELLANDUR"), Some("S11HT-124"));
        assert_eq!(directory.unit_code("unknown"), None);
    }

    #[test]
    fn display_name_matches_monthly_table_format() {
        let directory = UnitDirectory::from_json(SAMPLE).unwrap();
        assert_eq!(
            directory.display_name("Sahakar Nagar").as_deref(),
            Some("SAHAKAR NAGAR (C8HT-111)")
        );
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(UnitDirectory::from_json("{\"location\": 1}").is_err());
    }

    #[test]
    fn reports_entry_count() {
        let directory = UnitDirectory::from_json(SAMPLE).unwrap();
        assert_eq!(directory.len(), 2);
        assert!(!directory.is_empty());
    }
}
