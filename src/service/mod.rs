pub mod client_store;
pub mod estimator;
pub mod paper_matrix;
pub mod settings_store;

pub use client_store::ClientStore;
pub use estimator::compute_breakdown;
pub use paper_matrix::{cost_per_sheet, PaperCostMatrix, PaperPricing};
pub use settings_store::SettingsStore;
