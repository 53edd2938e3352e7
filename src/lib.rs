pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod state;

pub use api::build_router;
pub use config::AppConfig;
pub use error::AppError;
pub use service::compute_breakdown;
pub use state::AppState;
