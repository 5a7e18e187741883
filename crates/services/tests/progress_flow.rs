use chrono::Duration;
use tempfile::TempDir;

use services::{AppServices, Clock};
use storage::StoragePaths;
use storage::repository::{CatalogRepository, Storage};
use tracker_core::Status;
use tracker_core::model::{Catalog, CatalogEntry, RegistrationDraft};
use tracker_core::time::{fixed_clock, fixed_now};

fn draft(username: &str) -> RegistrationDraft {
    RegistrationDraft {
        username: username.to_string(),
        password: "hunter2".to_string(),
        confirm_password: "hunter2".to_string(),
        name: "Ada Lovelace".to_string(),
    }
}

#[tokio::test]
async fn register_start_complete_flow_on_disk() {
    let dir = TempDir::new().unwrap();

    let mut clock = fixed_clock();
    let services = AppServices::new_json_files(StoragePaths::new(dir.path()), clock)
        .await
        .expect("bootstrap");

    services.auth().register(draft("ada")).await.expect("register");
    assert!(services.auth().login("ada", "hunter2").await.unwrap());
    assert!(!services.auth().login("ada", "wrong").await.unwrap());

    let progress = services.progress();
    assert!(progress.start("ada", "Linear Regression").await.unwrap());

    clock.advance(Duration::minutes(30));
    let services = AppServices::new_json_files(StoragePaths::new(dir.path()), clock)
        .await
        .expect("reopen");
    let progress = services.progress();

    let bytes = b"import numpy as np\n";
    assert!(progress
        .complete("ada", "Linear Regression", Some(bytes))
        .await
        .unwrap());

    let document = progress.load("ada").await.unwrap();
    let entry = document.entry("Linear Regression").unwrap();
    assert!(entry.completed);
    assert!((entry.actual_hours - 0.5).abs() < 1e-9);
    assert!(entry.completed_at.unwrap() >= entry.started_at.unwrap());

    // Upload round-trip through the real filesystem.
    let stored = std::fs::read(dir.path().join("uploads/ada/Linear_Regression.py")).unwrap();
    assert_eq!(stored, bytes);

    let overview = progress.overview("ada").await.unwrap();
    assert_eq!(overview.stats.completed, 1);
    assert!(overview.sections[0]
        .cards
        .iter()
        .any(|card| matches!(card.status, Status::Completed { .. })));
}

#[tokio::test]
async fn catalog_growth_migrates_existing_documents() {
    let dir = TempDir::new().unwrap();
    let clock = fixed_clock();

    let services = AppServices::new_json_files(StoragePaths::new(dir.path()), clock)
        .await
        .unwrap();
    services.auth().register(draft("ada")).await.unwrap();
    services
        .progress()
        .update_notes("ada", "Linear Regression", "keep me")
        .await
        .unwrap();

    // Simulate an out-of-band catalog edit adding one algorithm.
    let catalog_path = dir.path().join("algorithms/algorithm_list.json");
    let mut catalog: Catalog =
        serde_json::from_slice(&std::fs::read(&catalog_path).unwrap()).unwrap();
    let mut entries: std::collections::BTreeMap<String, CatalogEntry> =
        catalog.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    entries.insert(
        "Decision Tree".to_string(),
        CatalogEntry {
            category: "Intermediate".to_string(),
            description: "Recursive axis-aligned splits.".to_string(),
            default_estimated_hours: 8.0,
            resources: Vec::new(),
        },
    );
    catalog = Catalog::from_entries(entries);
    std::fs::write(&catalog_path, serde_json::to_vec_pretty(&catalog).unwrap()).unwrap();

    // A fresh boot picks up the new catalog; load() migrates the document.
    let services = AppServices::new_json_files(StoragePaths::new(dir.path()), clock)
        .await
        .unwrap();
    let document = services.progress().load("ada").await.unwrap();

    let added = document.entry("Decision Tree").expect("migrated entry");
    assert!(!added.started);
    assert_eq!(added.estimated_hours, 8.0);
    assert_eq!(document.entry("Linear Regression").unwrap().notes, "keep me");
}

#[tokio::test]
async fn corrupt_progress_document_is_rebuilt_once() {
    let dir = TempDir::new().unwrap();
    let clock = Clock::fixed(fixed_now());

    let services = AppServices::new_json_files(StoragePaths::new(dir.path()), clock)
        .await
        .unwrap();
    services.auth().register(draft("ada")).await.unwrap();
    services
        .progress()
        .update_notes("ada", "Linear Regression", "will be lost")
        .await
        .unwrap();

    let progress_path = dir.path().join("data/user_progress/ada.json");
    std::fs::write(&progress_path, "{{{{").unwrap();

    let document = services.progress().load("ada").await.unwrap();
    assert_eq!(document.algorithms.len(), 2);
    assert!(document.entry("Linear Regression").unwrap().notes.is_empty());

    // The rebuild was persisted, so the file parses again.
    let raw = std::fs::read_to_string(&progress_path).unwrap();
    assert!(serde_json::from_str::<serde_json::Value>(&raw).is_ok());
}

#[tokio::test]
async fn in_memory_catalog_swap_is_visible_on_next_boot() {
    // The storage aggregate is swappable; a grown catalog served by the
    // same backend migrates documents built against the old one.
    use storage::repository::{InMemoryRepository, ProgressRepository};

    let repo = InMemoryRepository::new();
    let storage = Storage {
        catalog: std::sync::Arc::new(repo.clone()),
        credentials: std::sync::Arc::new(repo.clone()),
        progress: std::sync::Arc::new(repo.clone()),
        uploads: std::sync::Arc::new(repo.clone()),
    };
    let services = AppServices::from_storage(storage.clone(), fixed_clock())
        .await
        .unwrap();
    services.auth().register(draft("ada")).await.unwrap();

    let mut entries: std::collections::BTreeMap<String, CatalogEntry> = Catalog::builtin()
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    entries.insert(
        "K-Means".to_string(),
        CatalogEntry {
            category: "Clustering".to_string(),
            description: "Centroid-based partitioning.".to_string(),
            default_estimated_hours: 6.0,
            resources: Vec::new(),
        },
    );
    repo.replace_catalog(Catalog::from_entries(entries));
    assert_eq!(repo.load_catalog().await.unwrap().len(), 3);

    let services = AppServices::from_storage(storage, fixed_clock())
        .await
        .unwrap();
    let document = services.progress().load("ada").await.unwrap();
    assert!(document.entry("K-Means").is_some());

    let persisted = repo.load_document("ada").await.unwrap().unwrap();
    assert!(persisted.entry("K-Means").is_some());
}
