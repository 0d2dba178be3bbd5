use crate::entry::{
    self, parse_fragmenter_codes, parse_intents, resolve_duration, EntryError, ReasonCode, RecoveryKind,
};
use crate::errors::AppError;
use crate::models::{CurrentWeekResponse, DailyRollup, ExportResponse, WeekReflection};
use crate::retro::Retrospective;
use crate::state::AppState;
use crate::ui::{render_day, render_today, render_week};
use crate::week::{current_year_week, date_key, dates_in_week, parse_date_key, YearWeek};
use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    Form, Json,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct IntentsForm {
    #[serde(default)]
    pub intents: String,
}

#[derive(Debug, Deserialize)]
pub struct StartBlockForm {
    pub intent: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Deserialize)]
pub struct InterruptForm {
    pub block_id: String,
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct EndBlockForm {
    pub block_id: String,
    #[serde(default)]
    pub outcome: String,
    #[serde(default)]
    pub bucket: String,
    #[serde(default)]
    pub exact: String,
}

#[derive(Debug, Deserialize)]
pub struct StartRecoveryForm {
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub struct EndRecoveryForm {
    pub block_id: String,
    pub minutes: String,
}

#[derive(Debug, Deserialize)]
pub struct SummaryForm {
    #[serde(default)]
    pub fragmenters: String,
    #[serde(default)]
    pub not_performance_issues: String,
    #[serde(default)]
    pub one_change: String,
}

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ImprovementForm {
    pub option: String,
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let today = today();
    let day = match state.client.day(today).await {
        Ok(day) => day,
        Err(err) => {
            warn!(date = %today, "day rollup unavailable: {err}");
            DailyRollup {
                date: date_key(today),
                ..DailyRollup::default()
            }
        }
    };

    let active = entry::active_block(&day);
    let suggested = state
        .tracker
        .lock()
        .await
        .sync(active.map(|block| block.block_id.as_str()))
        .await;

    Html(render_today(&day, active, suggested))
}

pub async fn set_intents(
    State(state): State<AppState>,
    Form(form): Form<IntentsForm>,
) -> Result<Redirect, AppError> {
    let intents = parse_intents(&form.intents)?;
    state.client.set_daily_intents(today(), intents).await?;
    Ok(Redirect::to("/"))
}

pub async fn start_block(
    State(state): State<AppState>,
    Form(form): Form<StartBlockForm>,
) -> Result<Redirect, AppError> {
    let intent = form.intent.trim();
    if intent.is_empty() {
        return Err(EntryError::EmptyIntent.into());
    }
    let notes = Some(form.notes.trim()).filter(|notes| !notes.is_empty());

    let started = state.client.start_block(today(), intent, notes).await?;
    info!(block_id = %started.block_id, intent, "block started");
    state.tracker.lock().await.start(&started.block_id).await;
    Ok(Redirect::to("/"))
}

pub async fn interrupt_block(
    State(state): State<AppState>,
    Form(form): Form<InterruptForm>,
) -> Result<Redirect, AppError> {
    let reason: ReasonCode = form.reason.parse()?;
    state.client.interrupt_block(&form.block_id, reason).await?;
    info!(block_id = %form.block_id, %reason, "block interrupted");
    state.tracker.lock().await.stop(&form.block_id).await;
    Ok(Redirect::to("/"))
}

pub async fn end_block(
    State(state): State<AppState>,
    Form(form): Form<EndBlockForm>,
) -> Result<Redirect, AppError> {
    let bucket = form.bucket.trim().parse::<u32>().ok();
    let minutes = resolve_duration(bucket, Some(&form.exact))?;
    let outcome = Some(form.outcome.trim()).filter(|outcome| !outcome.is_empty());

    state.client.end_block(&form.block_id, outcome, Some(minutes)).await?;
    info!(block_id = %form.block_id, minutes, "block ended");
    state.tracker.lock().await.stop(&form.block_id).await;
    Ok(Redirect::to("/"))
}

pub async fn start_recovery(
    State(state): State<AppState>,
    Form(form): Form<StartRecoveryForm>,
) -> Result<Redirect, AppError> {
    let kind: RecoveryKind = form.kind.parse()?;
    let started = state.client.start_recovery(kind, today()).await?;
    info!(block_id = %started.block_id, ?kind, "recovery started");
    Ok(Redirect::to("/"))
}

pub async fn end_recovery(
    State(state): State<AppState>,
    Form(form): Form<EndRecoveryForm>,
) -> Result<Redirect, AppError> {
    let minutes = form
        .minutes
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|minutes| *minutes > 0)
        .ok_or_else(|| EntryError::InvalidDuration(form.minutes.clone()))?;
    state.client.end_recovery(&form.block_id, minutes).await?;
    Ok(Redirect::to("/"))
}

pub async fn day_report(
    State(state): State<AppState>,
    Query(query): Query<DayQuery>,
) -> Result<Html<String>, AppError> {
    let date = match query.date.as_deref().map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => parse_date_key(raw)?,
        None => today(),
    };
    let day = match state.client.day(date).await {
        Ok(day) => Some(day),
        Err(err) => {
            warn!(%date, "day rollup unavailable: {err}");
            None
        }
    };
    Ok(Html(render_day(&date_key(date), day.as_ref())))
}

pub async fn current_week_page() -> Result<Redirect, AppError> {
    Ok(Redirect::to(&format!("/week/{}", current_year_week()?)))
}

pub async fn week_page(
    State(state): State<AppState>,
    Path(year_week): Path<String>,
) -> Result<Html<String>, AppError> {
    let week: YearWeek = year_week.parse()?;
    let retro = state.client.retrospective(week).await;
    let picks = state.improvements.lock().await.get(&week).cloned().unwrap_or_default();
    Ok(Html(render_week(&retro, &picks)))
}

pub async fn save_summary(
    State(state): State<AppState>,
    Path(year_week): Path<String>,
    Form(form): Form<SummaryForm>,
) -> Result<Redirect, AppError> {
    let week: YearWeek = year_week.parse()?;
    let summary = WeekReflection {
        top_fragmenters: parse_fragmenter_codes(&form.fragmenters)?,
        not_performance_issues: entry::non_empty_lines(&form.not_performance_issues),
        one_change_next_week: form.one_change.trim().to_string(),
    };
    state.client.save_weekly_summary(week, &summary).await?;
    info!(%week, "weekly summary saved");
    Ok(Redirect::to(&format!("/week/{week}")))
}

pub async fn toggle_improvement(
    State(state): State<AppState>,
    Path(year_week): Path<String>,
    Form(form): Form<ImprovementForm>,
) -> Result<Redirect, AppError> {
    let week: YearWeek = year_week.parse()?;
    state
        .improvements
        .lock()
        .await
        .entry(week)
        .or_default()
        .toggle(&form.option)?;
    Ok(Redirect::to(&format!("/week/{week}")))
}

pub async fn get_current_week() -> Result<Json<CurrentWeekResponse>, AppError> {
    let year_week = current_year_week()?;
    Ok(Json(CurrentWeekResponse {
        year_week,
        dates: dates_in_week(year_week).into_iter().map(date_key).collect(),
    }))
}

pub async fn get_retrospective(
    State(state): State<AppState>,
    Path(year_week): Path<String>,
) -> Result<Json<Retrospective>, AppError> {
    let week: YearWeek = year_week.parse()?;
    Ok(Json(state.client.retrospective(week).await))
}

pub async fn export_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<ExportResponse>, AppError> {
    let date = parse_date_key(&date)?;
    let exported = state.client.export_day(date).await?;
    info!(%date, path = %exported.path, "day exported");
    Ok(Json(exported))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
