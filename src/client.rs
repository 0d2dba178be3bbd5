use crate::entry::{ReasonCode, RecoveryKind};
use crate::models::{
    BlockStarted, DailyIntentsRequest, DailyRollup, EndBlockRequest,
    EndRecoveryRequest, ExportResponse, HealthResponse, InterruptBlockRequest, StartBlockRequest,
    StartRecoveryRequest, WeeklyRollup, WeeklySummaryRequest,
};
use crate::retro::{build_retrospective, Retrospective};
use crate::week::{date_key, dates_in_week, YearWeek};
use chrono::NaiveDate;
use futures::future::join_all;
use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request to reporting api failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("reporting api returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Client for the reporting/tracking REST API that owns all persistence.
#[derive(Debug, Clone)]
pub struct ReportingClient {
    http: Client,
    base_url: String,
}

impl ReportingClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    async fn send<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("reporting api request: {method} {url}");
        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }
        Ok(response.json().await?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send::<(), T>(Method::GET, path, None).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.send(Method::POST, path, Some(body)).await
    }

    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.get("/health").await
    }

    pub async fn set_daily_intents(&self, date: NaiveDate, intents: Vec<String>) -> Result<(), ClientError> {
        let body = DailyIntentsRequest {
            date: date_key(date),
            intents,
        };
        self.post::<_, serde_json::Value>("/intents/daily", &body).await?;
        Ok(())
    }

    pub async fn start_block(
        &self,
        date: NaiveDate,
        intent: &str,
        notes: Option<&str>,
    ) -> Result<BlockStarted, ClientError> {
        let body = StartBlockRequest {
            date: date_key(date),
            intent: intent.to_string(),
            notes: notes.map(str::to_string),
        };
        self.post("/blocks/start", &body).await
    }

    pub async fn interrupt_block(&self, block_id: &str, reason_code: ReasonCode) -> Result<(), ClientError> {
        let body = InterruptBlockRequest {
            block_id: block_id.to_string(),
            reason_code,
        };
        self.post::<_, serde_json::Value>("/blocks/interrupt", &body).await?;
        Ok(())
    }

    pub async fn end_block(
        &self,
        block_id: &str,
        actual_outcome: Option<&str>,
        duration_minutes: Option<u32>,
    ) -> Result<(), ClientError> {
        let body = EndBlockRequest {
            block_id: block_id.to_string(),
            actual_outcome: actual_outcome.map(str::to_string),
            duration_minutes,
        };
        self.post::<_, serde_json::Value>("/blocks/end", &body).await?;
        Ok(())
    }

    pub async fn day(&self, date: NaiveDate) -> Result<DailyRollup, ClientError> {
        self.get(&format!("/days/{}", date_key(date))).await
    }

    pub async fn week(&self, week: YearWeek) -> Result<WeeklyRollup, ClientError> {
        self.get(&format!("/weeks/{week}")).await
    }

    pub async fn save_weekly_summary(
        &self,
        week: YearWeek,
        summary: &WeeklySummaryRequest,
    ) -> Result<(), ClientError> {
        self.post::<_, serde_json::Value>(&format!("/weeks/{week}/summary"), summary)
            .await?;
        Ok(())
    }

    pub async fn start_recovery(&self, kind: RecoveryKind, date: NaiveDate) -> Result<BlockStarted, ClientError> {
        let body = StartRecoveryRequest {
            kind,
            date: date_key(date),
        };
        self.post("/recovery/start", &body).await
    }

    pub async fn end_recovery(&self, block_id: &str, duration_minutes: u32) -> Result<(), ClientError> {
        let body = EndRecoveryRequest {
            block_id: block_id.to_string(),
            duration_minutes,
        };
        self.post::<_, serde_json::Value>("/recovery/end", &body).await?;
        Ok(())
    }

    pub async fn export_day(&self, date: NaiveDate) -> Result<ExportResponse, ClientError> {
        self.send::<(), _>(Method::POST, &format!("/export/day/{}", date_key(date)), None)
            .await
    }

    /// Fetches all seven days concurrently. Days that fail (e.g. future dates
    /// with no data yet) are dropped; the rest keep Monday..Sunday order.
    pub async fn week_days(&self, week: YearWeek) -> Vec<DailyRollup> {
        let dates = dates_in_week(week);
        let results = join_all(dates.iter().map(|date| self.day(*date))).await;
        dates
            .iter()
            .zip(results)
            .filter_map(|(date, result)| match result {
                Ok(day) => Some(day),
                Err(err) => {
                    warn!(date = %date, "skipping day rollup: {err}");
                    None
                }
            })
            .collect()
    }

    /// Weekly view model; a missing week rollup degrades to defaults.
    pub async fn retrospective(&self, week: YearWeek) -> Retrospective {
        let (week_rollup, days) = futures::join!(self.week(week), self.week_days(week));
        let week_rollup = match week_rollup {
            Ok(rollup) => Some(rollup),
            Err(err) => {
                warn!(%week, "week rollup unavailable: {err}");
                None
            }
        };
        build_retrospective(week, week_rollup.as_ref(), &days)
    }
}
