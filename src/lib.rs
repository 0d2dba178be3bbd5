pub mod app;
pub mod client;
pub mod config;
pub mod entry;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod retro;
pub mod state;
pub mod timer;
pub mod ui;
pub mod week;

pub use app::router;
pub use client::ReportingClient;
pub use config::Config;
pub use retro::{bucket_label, build_retrospective, focus_reality_stats, structural_wins, summarize_intents};
pub use state::AppState;
pub use week::{current_year_week, dates_in_week, YearWeek};
