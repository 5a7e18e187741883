mod auth;
mod dashboard;
mod detail;
mod state;

pub use auth::AuthView;
pub use dashboard::DashboardView;
pub use detail::DetailView;
pub use state::{ViewError, ViewState, view_state_from_resource};
