use crate::client::ReportingClient;
use crate::config::Config;
use crate::retro::ImprovementPicks;
use crate::timer::ActiveBlockTracker;
use crate::week::YearWeek;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;

/// Per-view state lives here instead of in module globals: the today view
/// owns the active-block ticker, each week view owns its improvement picks.
#[derive(Clone)]
pub struct AppState {
    pub client: ReportingClient,
    pub tracker: Arc<Mutex<ActiveBlockTracker>>,
    pub improvements: Arc<Mutex<HashMap<YearWeek, ImprovementPicks>>>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self::with_client(ReportingClient::new(config.api_base.clone()), config)
    }

    pub fn with_client(client: ReportingClient, config: &Config) -> Self {
        Self {
            client,
            tracker: Arc::new(Mutex::new(ActiveBlockTracker::new(config.tick_period))),
            improvements: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}
