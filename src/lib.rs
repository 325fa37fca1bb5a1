pub mod app;
pub mod client;
pub mod config;
pub mod errors;
pub mod grid;
pub mod handlers;
pub mod models;
pub mod score;
pub mod state;
pub mod stats;
pub mod store;
pub mod ui;

pub use app::router;
pub use client::{ActivityCache, ActivityClient, Tracker};
pub use config::Config;
pub use grid::{generate_year_grid, month_labels};
pub use score::{activity_score, color_for_score};
pub use state::AppState;
pub use store::ActivityStore;
