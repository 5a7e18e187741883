mod account;
mod catalog;
mod progress;

pub use account::{RegistrationDraft, RegistrationError, UserAccount, ValidatedRegistration};
pub use catalog::{Catalog, CatalogEntry, CatalogLint, Resource, category_rank};
pub use progress::{ProgressDocument, ProgressEntry, ProgressStats};
