use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use storage::repository::{ProgressRepository, StorageError, UploadRepository};
use tracker_core::Status;
use tracker_core::model::{
    Catalog, CatalogEntry, ProgressDocument, ProgressEntry, ProgressStats, Resource, category_rank,
};
use tracker_core::time::fractional_hours;

use crate::Clock;
use crate::error::ProgressError;

/// One dashboard card: an algorithm with its progress and derived status.
#[derive(Debug, Clone, PartialEq)]
pub struct AlgorithmCard {
    pub name: String,
    pub entry: ProgressEntry,
    pub status: Status,
}

/// Dashboard cards for one category, in algorithm-name order.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySection {
    pub category: String,
    pub cards: Vec<AlgorithmCard>,
}

/// Everything the dashboard renders for one user.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressOverview {
    pub stats: ProgressStats,
    pub sections: Vec<CategorySection>,
}

/// Everything the detail screen renders for one algorithm.
///
/// Description and resources come from the catalog and are empty for an
/// orphaned entry whose algorithm was removed from the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct AlgorithmDetail {
    pub name: String,
    pub entry: ProgressEntry,
    pub status: Status,
    pub description: String,
    pub resources: Vec<Resource>,
}

/// The state of an entry's uploaded implementation at display time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImplementationFile {
    /// Nothing was ever uploaded.
    Absent,
    /// The entry references a file that is no longer on disk.
    Missing { filename: String },
    /// The stored source, decoded lossily as UTF-8.
    Present { filename: String, source: String },
}

/// Orchestrates progress documents: self-healing loads, lazy catalog
/// migration, and the start/complete/edit operations.
///
/// Sole writer of progress documents. Writes replace the whole document;
/// concurrent sessions for the same user can lose updates (last save wins).
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    catalog: Arc<Catalog>,
    progress: Arc<dyn ProgressRepository>,
    uploads: Arc<dyn UploadRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(
        clock: Clock,
        catalog: Arc<Catalog>,
        progress: Arc<dyn ProgressRepository>,
        uploads: Arc<dyn UploadRepository>,
    ) -> Self {
        Self {
            clock,
            catalog,
            progress,
            uploads,
        }
    }

    /// Load the user's document, creating or repairing it as needed.
    ///
    /// A missing document (including one the repository reported as
    /// unparsable) is rebuilt from the catalog and persisted — once, with a
    /// failing write surfacing as an error rather than retrying. An existing
    /// document gains a default entry for any catalog algorithm it lacks;
    /// when that migration adds entries it is persisted immediately so the
    /// merge is visible on disk.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if the document cannot be read or
    /// (re)written.
    pub async fn load(&self, username: &str) -> Result<ProgressDocument, ProgressError> {
        match self.progress.load_document(username).await? {
            Some(mut document) => {
                let added = document.merge_missing(&self.catalog);
                if added > 0 {
                    debug!(username, added, "merged new catalog algorithms into progress document");
                    self.save(username, &mut document).await?;
                }
                Ok(document)
            }
            None => {
                let mut document = ProgressDocument::fresh(&self.catalog, self.clock.now());
                self.save(username, &mut document).await?;
                Ok(document)
            }
        }
    }

    /// Stamp `last_updated` and persist the whole document.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if the document cannot be written.
    pub async fn save(
        &self,
        username: &str,
        document: &mut ProgressDocument,
    ) -> Result<(), ProgressError> {
        document.last_updated = self.clock.now();
        self.progress.save_document(username, document).await?;
        Ok(())
    }

    /// Mark an algorithm started now.
    ///
    /// Returns `Ok(false)` for an algorithm the document does not track.
    /// Calling this again on a started algorithm resets the start timestamp.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` on persistence failures.
    pub async fn start(&self, username: &str, algo_name: &str) -> Result<bool, ProgressError> {
        let mut document = self.load(username).await?;
        let now = self.clock.now();
        let Some(entry) = document.entry_mut(algo_name) else {
            return Ok(false);
        };
        entry.started = true;
        entry.started_at = Some(now);
        self.save(username, &mut document).await?;
        Ok(true)
    }

    /// Mark an algorithm completed now, optionally storing an uploaded
    /// implementation file.
    ///
    /// When a start timestamp exists, `actual_hours` becomes the fractional
    /// hours between start and completion; inconsistent clocks can make that
    /// negative and the value is stored as computed.
    ///
    /// Returns `Ok(false)` for an algorithm the document does not track.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` on persistence failures.
    pub async fn complete(
        &self,
        username: &str,
        algo_name: &str,
        file_bytes: Option<&[u8]>,
    ) -> Result<bool, ProgressError> {
        let mut document = self.load(username).await?;
        let now = self.clock.now();
        let Some(entry) = document.entry_mut(algo_name) else {
            return Ok(false);
        };

        entry.completed = true;
        entry.completed_at = Some(now);
        if let Some(started_at) = entry.started_at {
            entry.actual_hours = fractional_hours(now - started_at);
        }
        if let Some(bytes) = file_bytes {
            let filename = self
                .uploads
                .store_implementation(username, algo_name, bytes)
                .await?;
            entry.implementation_file = Some(filename);
        }

        self.save(username, &mut document).await?;
        Ok(true)
    }

    /// Set a new time estimate, persisting immediately.
    ///
    /// Returns `Ok(false)` for a non-positive estimate or an untracked
    /// algorithm.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` on persistence failures.
    pub async fn update_estimated_hours(
        &self,
        username: &str,
        algo_name: &str,
        hours: f64,
    ) -> Result<bool, ProgressError> {
        if hours <= 0.0 {
            return Ok(false);
        }
        let mut document = self.load(username).await?;
        let Some(entry) = document.entry_mut(algo_name) else {
            return Ok(false);
        };
        entry.estimated_hours = hours;
        self.save(username, &mut document).await?;
        Ok(true)
    }

    /// Replace the free-text notes, persisting immediately.
    ///
    /// Returns `Ok(false)` for an untracked algorithm.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` on persistence failures.
    pub async fn update_notes(
        &self,
        username: &str,
        algo_name: &str,
        notes: &str,
    ) -> Result<bool, ProgressError> {
        let mut document = self.load(username).await?;
        let Some(entry) = document.entry_mut(algo_name) else {
            return Ok(false);
        };
        entry.notes = notes.to_string();
        self.save(username, &mut document).await?;
        Ok(true)
    }

    /// Dashboard data: counters plus status-annotated cards grouped by
    /// category in canonical order (Beginner, Intermediate, Advanced, then
    /// others alphabetically). Grouping uses each entry's own category, so
    /// orphaned entries still show up where they were filed.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if the document cannot be loaded.
    pub async fn overview(&self, username: &str) -> Result<ProgressOverview, ProgressError> {
        let document = self.load(username).await?;
        let now = self.clock.now();
        let stats = document.stats();

        let mut by_category: BTreeMap<String, Vec<AlgorithmCard>> = BTreeMap::new();
        for (name, entry) in &document.algorithms {
            by_category
                .entry(entry.category.clone())
                .or_default()
                .push(AlgorithmCard {
                    name: name.clone(),
                    entry: entry.clone(),
                    status: Status::derive(entry, now),
                });
        }

        let mut categories: Vec<String> = by_category.keys().cloned().collect();
        categories.sort_by(|a, b| category_rank(a).cmp(&category_rank(b)).then(a.cmp(b)));

        let sections = categories
            .into_iter()
            .filter_map(|category| {
                by_category
                    .remove(&category)
                    .map(|cards| CategorySection { category, cards })
            })
            .collect();

        Ok(ProgressOverview { stats, sections })
    }

    /// Detail-screen data for one algorithm; `Ok(None)` when untracked.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if the document cannot be loaded.
    pub async fn detail(
        &self,
        username: &str,
        algo_name: &str,
    ) -> Result<Option<AlgorithmDetail>, ProgressError> {
        let document = self.load(username).await?;
        let Some(entry) = document.entry(algo_name) else {
            return Ok(None);
        };
        let (description, resources) = match self.catalog.get(algo_name) {
            Some(CatalogEntry {
                description,
                resources,
                ..
            }) => (description.clone(), resources.clone()),
            None => (String::new(), Vec::new()),
        };
        Ok(Some(AlgorithmDetail {
            name: algo_name.to_string(),
            entry: entry.clone(),
            status: Status::derive(entry, self.clock.now()),
            description,
            resources,
        }))
    }

    /// Read back the implementation referenced by an entry for display.
    ///
    /// A dangling reference is non-fatal: it is logged and reported as
    /// `Missing` so the page can render a warning.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` for read failures other than the
    /// file being gone.
    pub async fn implementation_source(
        &self,
        username: &str,
        entry: &ProgressEntry,
    ) -> Result<ImplementationFile, ProgressError> {
        let Some(filename) = entry.implementation_file.clone() else {
            return Ok(ImplementationFile::Absent);
        };
        match self.uploads.read_implementation(username, &filename).await {
            Ok(bytes) => Ok(ImplementationFile::Present {
                source: String::from_utf8_lossy(&bytes).into_owned(),
                filename,
            }),
            Err(StorageError::NotFound) => {
                warn!(username, %filename, "referenced implementation file is missing");
                Ok(ImplementationFile::Missing { filename })
            }
            Err(err) => Err(err.into()),
        }
    }
}
