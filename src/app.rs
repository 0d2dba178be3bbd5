use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/intents", post(handlers::set_intents))
        .route("/blocks/start", post(handlers::start_block))
        .route("/blocks/interrupt", post(handlers::interrupt_block))
        .route("/blocks/end", post(handlers::end_block))
        .route("/recovery/start", post(handlers::start_recovery))
        .route("/recovery/end", post(handlers::end_recovery))
        .route("/day", get(handlers::day_report))
        .route("/week", get(handlers::current_week_page))
        .route("/week/:year_week", get(handlers::week_page))
        .route("/week/:year_week/summary", post(handlers::save_summary))
        .route("/week/:year_week/improvements", post(handlers::toggle_improvement))
        .route("/api/week/current", get(handlers::get_current_week))
        .route("/api/retro/:year_week", get(handlers::get_retrospective))
        .route("/api/export/day/:date", post(handlers::export_day))
        .with_state(state)
}
