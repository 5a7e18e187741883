use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// Category names that sort ahead of everything else, in display order.
const CATEGORY_ORDER: [&str; 3] = ["Beginner", "Intermediate", "Advanced"];

//
// ─── CATALOG TYPES ─────────────────────────────────────────────────────────────
//

/// A learning resource attached to a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
    pub url: String,
}

/// Reference metadata for one algorithm in the fixed catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub category: String,
    pub description: String,
    pub default_estimated_hours: f64,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

/// The fixed reference list of algorithms, keyed by algorithm name.
///
/// Immutable at runtime; the backing file is edited out-of-band and the
/// storage layer re-reads it on startup only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl Catalog {
    /// The built-in fallback catalog used when no file exists or the file
    /// cannot be parsed.
    #[must_use]
    pub fn builtin() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(
            "Linear Regression".to_string(),
            CatalogEntry {
                category: "Beginner".to_string(),
                description: "Simple linear model for predicting continuous values.".to_string(),
                default_estimated_hours: 10.0,
                resources: vec![Resource {
                    title: "Linear Regression Tutorial".to_string(),
                    url: "https://www.youtube.com/watch?v=zPG4NjIkCjc".to_string(),
                }],
            },
        );
        entries.insert(
            "Logistic Regression".to_string(),
            CatalogEntry {
                category: "Beginner".to_string(),
                description: "Binary classification algorithm using sigmoid function.".to_string(),
                default_estimated_hours: 12.0,
                resources: vec![Resource {
                    title: "Logistic Regression Tutorial".to_string(),
                    url: "https://www.youtube.com/watch?v=yIYKR4sgzI8".to_string(),
                }],
            },
        );
        Self { entries }
    }

    #[must_use]
    pub fn from_entries(entries: BTreeMap<String, CatalogEntry>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CatalogEntry)> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct categories in canonical order: Beginner, Intermediate,
    /// Advanced first, anything else alphabetically after.
    #[must_use]
    pub fn sorted_categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .entries
            .values()
            .map(|entry| entry.category.clone())
            .collect();
        categories.sort_by(|a, b| category_rank(a).cmp(&category_rank(b)).then(a.cmp(b)));
        categories.dedup();
        categories
    }

    /// Entries belonging to the given category, in name order.
    #[must_use]
    pub fn entries_in_category(&self, category: &str) -> Vec<(&String, &CatalogEntry)> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.category == category)
            .collect()
    }

    /// Sanity issues in externally edited catalog data.
    ///
    /// The catalog is configuration the user maintains by hand, so problems
    /// are reported for logging rather than rejected.
    #[must_use]
    pub fn lint(&self) -> Vec<CatalogLint> {
        let mut issues = Vec::new();
        for (name, entry) in &self.entries {
            if entry.default_estimated_hours <= 0.0 {
                issues.push(CatalogLint::NonPositiveHours {
                    algorithm: name.clone(),
                    hours: entry.default_estimated_hours,
                });
            }
            for resource in &entry.resources {
                if Url::parse(&resource.url).is_err() {
                    issues.push(CatalogLint::InvalidResourceUrl {
                        algorithm: name.clone(),
                        url: resource.url.clone(),
                    });
                }
            }
        }
        issues
    }
}

/// Sort rank for a category name: known categories in display order,
/// everything else after (callers break ties alphabetically).
#[must_use]
pub fn category_rank(category: &str) -> usize {
    CATEGORY_ORDER
        .iter()
        .position(|known| *known == category)
        .unwrap_or(CATEGORY_ORDER.len())
}

/// A tolerated problem found in catalog data.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogLint {
    NonPositiveHours { algorithm: String, hours: f64 },
    InvalidResourceUrl { algorithm: String, url: String },
}

impl fmt::Display for CatalogLint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogLint::NonPositiveHours { algorithm, hours } => {
                write!(f, "{algorithm}: default_estimated_hours must be positive, got {hours}")
            }
            CatalogLint::InvalidResourceUrl { algorithm, url } => {
                write!(f, "{algorithm}: resource URL does not parse: {url}")
            }
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
