//! Canonical brand registry
//!
//! Loaded once at startup from a JSON file keyed by brand name. A `BTreeMap`
//! keeps brand iteration order stable so the first matched brand is
//! reproducible across runs.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Per-brand registry entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandEntry {
    /// Protected keywords; containment or near-match of any is a hit
    pub keywords: Vec<String>,

    /// Full VPAs legitimately operated by the brand
    #[serde(default)]
    pub allowed_vpas: HashSet<String>,
}

/// Registry of protected brands
#[derive(Debug, Clone, Default)]
pub struct BrandRegistry {
    brands: BTreeMap<String, BrandEntry>,
}

impl BrandRegistry {
    /// Load the registry from a JSON file.
    ///
    /// A missing or unparseable file yields an empty registry; screening
    /// then passes everything.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Brand registry unavailable, screening disabled");
                return Self::default();
            }
        };

        match serde_json::from_str::<BTreeMap<String, BrandEntry>>(&content) {
            Ok(brands) => {
                tracing::info!(path = %path.display(), brands = brands.len(), "Brand registry loaded");
                Self { brands }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Brand registry unparseable, screening disabled");
                Self::default()
            }
        }
    }

    /// Build a registry from in-memory entries
    pub fn from_entries(entries: impl IntoIterator<Item = (String, BrandEntry)>) -> Self {
        Self {
            brands: entries.into_iter().collect(),
        }
    }

    /// Iterate brands in stable (lexicographic) order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BrandEntry)> {
        self.brands.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Number of registered brands
    pub fn len(&self) -> usize {
        self.brands.len()
    }

    /// True if no brands are registered
    pub fn is_empty(&self) -> bool {
        self.brands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_empty_registry() {
        let registry = BrandRegistry::load("/nonexistent/brands.json");
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unparseable_file_yields_empty_registry() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json at all").unwrap();

        let registry = BrandRegistry::load(file.path());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"amazon": {{"keywords": ["amazon", "amzn"], "allowed_vpas": ["amazon@apl"]}}}}"#
        )
        .unwrap();

        let registry = BrandRegistry::load(file.path());
        assert_eq!(registry.len(), 1);

        let (name, entry) = registry.iter().next().unwrap();
        assert_eq!(name, "amazon");
        assert_eq!(entry.keywords.len(), 2);
        assert!(entry.allowed_vpas.contains("amazon@apl"));
    }

    #[test]
    fn test_iteration_order_is_stable() {
        let registry = BrandRegistry::from_entries([
            ("zomato".to_string(), BrandEntry::default()),
            ("amazon".to_string(), BrandEntry::default()),
            ("flipkart".to_string(), BrandEntry::default()),
        ]);

        let names: Vec<&str> = registry.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["amazon", "flipkart", "zomato"]);
    }
}
