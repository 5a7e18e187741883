use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Catalog, CatalogEntry};

//
// ─── PROGRESS TYPES ────────────────────────────────────────────────────────────
//

/// One user's tracked state for one catalog algorithm.
///
/// Serialized field names match the on-disk progress documents
/// (`start_date` / `completion_date`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub category: String,
    pub started: bool,
    #[serde(rename = "start_date")]
    pub started_at: Option<DateTime<Utc>>,
    pub completed: bool,
    #[serde(rename = "completion_date")]
    pub completed_at: Option<DateTime<Utc>>,
    pub estimated_hours: f64,
    #[serde(default)]
    pub actual_hours: f64,
    pub implementation_file: Option<String>,
    #[serde(default)]
    pub notes: String,
}

impl ProgressEntry {
    /// The all-defaults entry for an algorithm the user has not touched.
    ///
    /// Category and estimated hours are copied from the catalog at creation
    /// time; the category may drift if the catalog is later edited.
    #[must_use]
    pub fn fresh(catalog_entry: &CatalogEntry) -> Self {
        Self {
            category: catalog_entry.category.clone(),
            started: false,
            started_at: None,
            completed: false,
            completed_at: None,
            estimated_hours: catalog_entry.default_estimated_hours,
            actual_hours: 0.0,
            implementation_file: None,
            notes: String::new(),
        }
    }
}

/// A user's whole progress document: one entry per tracked algorithm plus a
/// last-updated stamp. Persisted and replaced as a whole (last writer wins).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressDocument {
    pub algorithms: BTreeMap<String, ProgressEntry>,
    pub last_updated: DateTime<Utc>,
}

impl ProgressDocument {
    /// A new document with a default entry for every catalog algorithm.
    #[must_use]
    pub fn fresh(catalog: &Catalog, now: DateTime<Utc>) -> Self {
        let algorithms = catalog
            .iter()
            .map(|(name, entry)| (name.clone(), ProgressEntry::fresh(entry)))
            .collect();
        Self {
            algorithms,
            last_updated: now,
        }
    }

    /// Insert a default entry for every catalog algorithm missing from this
    /// document, returning how many were added.
    ///
    /// Entries for algorithms no longer in the catalog are left in place;
    /// nothing is ever removed here.
    pub fn merge_missing(&mut self, catalog: &Catalog) -> usize {
        let mut added = 0;
        for (name, entry) in catalog.iter() {
            if !self.algorithms.contains_key(name) {
                self.algorithms
                    .insert(name.clone(), ProgressEntry::fresh(entry));
                added += 1;
            }
        }
        added
    }

    #[must_use]
    pub fn entry(&self, algo_name: &str) -> Option<&ProgressEntry> {
        self.algorithms.get(algo_name)
    }

    #[must_use]
    pub fn entry_mut(&mut self, algo_name: &str) -> Option<&mut ProgressEntry> {
        self.algorithms.get_mut(algo_name)
    }

    /// Dashboard counters over the whole document.
    #[must_use]
    pub fn stats(&self) -> ProgressStats {
        let total = self.algorithms.len();
        let started = self.algorithms.values().filter(|e| e.started).count();
        let completed = self.algorithms.values().filter(|e| e.completed).count();
        ProgressStats {
            total,
            started,
            completed,
        }
    }
}

/// Aggregate progress counters for the dashboard header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressStats {
    pub total: usize,
    pub started: usize,
    pub completed: usize,
}

impl ProgressStats {
    /// Started but not yet completed.
    #[must_use]
    pub fn in_progress(&self) -> usize {
        self.started.saturating_sub(self.completed)
    }

    /// Completed share in `[0, 1]`; zero for an empty catalog.
    #[must_use]
    pub fn completion_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Resource;
    use crate::time::fixed_now;

    fn catalog_with(names: &[&str]) -> Catalog {
        let entries = names
            .iter()
            .map(|name| {
                (
                    (*name).to_string(),
                    CatalogEntry {
                        category: "Beginner".to_string(),
                        description: format!("{name} description"),
                        default_estimated_hours: 4.0,
                        resources: vec![Resource {
                            title: "ref".to_string(),
                            url: "https://example.com".to_string(),
                        }],
                    },
                )
            })
            .collect();
        Catalog::from_entries(entries)
    }

    #[test]
    fn fresh_document_covers_every_catalog_entry() {
        let catalog = Catalog::builtin();
        let doc = ProgressDocument::fresh(&catalog, fixed_now());

        assert_eq!(doc.algorithms.len(), catalog.len());
        for (name, entry) in catalog.iter() {
            let progress = doc.entry(name).unwrap();
            assert!(!progress.started);
            assert!(!progress.completed);
            assert_eq!(progress.estimated_hours, entry.default_estimated_hours);
            assert_eq!(progress.actual_hours, 0.0);
            assert!(progress.notes.is_empty());
        }
    }

    #[test]
    fn merge_missing_adds_only_new_entries() {
        let catalog = catalog_with(&["K-Means"]);
        let mut doc = ProgressDocument::fresh(&catalog, fixed_now());
        let existing = doc.entry_mut("K-Means").unwrap();
        existing.started = true;
        existing.notes = "halfway".to_string();
        let existing = existing.clone();

        let grown = catalog_with(&["K-Means", "PCA"]);
        let added = doc.merge_missing(&grown);

        assert_eq!(added, 1);
        assert_eq!(doc.entry("K-Means"), Some(&existing));
        assert!(!doc.entry("PCA").unwrap().started);
    }

    #[test]
    fn merge_missing_keeps_orphaned_entries() {
        let catalog = catalog_with(&["K-Means", "PCA"]);
        let mut doc = ProgressDocument::fresh(&catalog, fixed_now());

        let shrunk = catalog_with(&["K-Means"]);
        let added = doc.merge_missing(&shrunk);

        assert_eq!(added, 0);
        assert!(doc.entry("PCA").is_some());
    }

    #[test]
    fn stats_count_started_and_completed() {
        let catalog = catalog_with(&["A", "B", "C"]);
        let mut doc = ProgressDocument::fresh(&catalog, fixed_now());
        doc.entry_mut("A").unwrap().started = true;
        let b = doc.entry_mut("B").unwrap();
        b.started = true;
        b.completed = true;

        let stats = doc.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.in_progress(), 1);
        assert_eq!(stats.completed, 1);
        assert!((stats.completion_ratio() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn entry_round_trips_through_json_with_wire_names() {
        let catalog = catalog_with(&["SVM"]);
        let mut doc = ProgressDocument::fresh(&catalog, fixed_now());
        let entry = doc.entry_mut("SVM").unwrap();
        entry.started = true;
        entry.started_at = Some(fixed_now());

        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"start_date\""));
        assert!(json.contains("\"completion_date\""));

        let back: ProgressDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
