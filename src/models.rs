use crate::entry::{ReasonCode, RecoveryKind};
use crate::week::YearWeek;
use serde::{Deserialize, Serialize};

// Optional fields use absence as the only sentinel: a JSON `null` and a
// missing key both land as `None`.

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkBlock {
    pub block_id: String,
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub actual_outcome: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub duration_label: Option<String>,
    #[serde(default)]
    pub interrupted: bool,
    #[serde(default)]
    pub reason_code: Option<String>,
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayMetrics {
    #[serde(default)]
    pub total_blocks: u32,
    #[serde(default)]
    pub interrupted_blocks: u32,
    #[serde(default)]
    pub fragmentation_rate: f64,
    #[serde(default)]
    pub focus_blocks: u32,
    #[serde(default)]
    pub total_active_minutes: Option<u32>,
    #[serde(default)]
    pub total_active_label: Option<String>,
    #[serde(default)]
    pub total_recovery_minutes: Option<u32>,
    #[serde(default)]
    pub total_recovery_label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyRollup {
    pub date: String,
    #[serde(default)]
    pub intents: Vec<String>,
    #[serde(default)]
    pub blocks: Vec<WorkBlock>,
    #[serde(default)]
    pub recovery_blocks: Vec<RecoveryBlock>,
    #[serde(default)]
    pub metrics: DayMetrics,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryBlock {
    pub block_id: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FragmenterCount {
    pub code: String,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeekMetrics {
    #[serde(default)]
    pub total_blocks: u32,
    #[serde(default)]
    pub interrupted_blocks: u32,
    #[serde(default)]
    pub fragmentation_rate: f64,
    #[serde(default)]
    pub focus_blocks: u32,
    #[serde(default)]
    pub top_fragmenters: Vec<FragmenterCount>,
    #[serde(default)]
    pub total_active_minutes: Option<u32>,
    #[serde(default)]
    pub total_active_label: Option<String>,
    #[serde(default)]
    pub total_recovery_minutes: Option<u32>,
    #[serde(default)]
    pub total_recovery_label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeekReflection {
    #[serde(default)]
    pub top_fragmenters: Vec<String>,
    #[serde(default)]
    pub not_performance_issues: Vec<String>,
    #[serde(default)]
    pub one_change_next_week: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyRollup {
    pub year_week: YearWeek,
    #[serde(default)]
    pub metrics: Option<WeekMetrics>,
    #[serde(default)]
    pub reflection: WeekReflection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyIntentsRequest {
    pub date: String,
    #[serde(default)]
    pub intents: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StartBlockRequest {
    pub date: String,
    pub intent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterruptBlockRequest {
    pub block_id: String,
    pub reason_code: ReasonCode,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndBlockRequest {
    pub block_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_outcome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
}

pub type WeeklySummaryRequest = WeekReflection;

#[derive(Debug, Clone, Serialize)]
pub struct StartRecoveryRequest {
    pub kind: RecoveryKind,
    pub date: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndRecoveryRequest {
    pub block_id: String,
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlockStarted {
    pub block_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportResponse {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeekResponse {
    pub year_week: YearWeek,
    pub dates: Vec<String>,
}
