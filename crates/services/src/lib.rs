#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth_service;
pub mod catalog_service;
pub mod error;
pub mod progress_service;

pub use tracker_core::Clock;

pub use app_services::AppServices;
pub use auth_service::AuthService;
pub use catalog_service::CatalogService;
pub use error::{AppServicesError, AuthError, ProgressError};
pub use progress_service::{
    AlgorithmCard, AlgorithmDetail, CategorySection, ImplementationFile, ProgressOverview,
    ProgressService,
};
