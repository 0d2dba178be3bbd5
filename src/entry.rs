use crate::models::{DailyRollup, RecoveryBlock, WorkBlock};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, time::Duration};

pub const MAX_DAILY_INTENTS: usize = 5;

/// End-of-block duration choices offered on the today page.
pub const DURATION_BUCKETS: [(&str, u32); 6] = [
    ("~15 mins", 15),
    ("~30 mins", 30),
    ("~1 hour", 60),
    ("~2 hours", 120),
    ("~½ day (3h)", 180),
    ("~1 day (6h)", 360),
];

pub const DEFAULT_DURATION_BUCKET: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryError {
    #[error("max 5 intents allowed, got {0}")]
    TooManyIntents(usize),
    #[error("unknown interruption reason '{0}'")]
    UnknownReason(String),
    #[error("unknown recovery kind '{0}'")]
    UnknownRecoveryKind(String),
    #[error("duration must be a positive number of minutes, got '{0}'")]
    InvalidDuration(String),
    #[error("intent must not be empty")]
    EmptyIntent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    Meeting,
    Dependency,
    ContextSwitch,
    Family,
    EmotionalLoad,
    TechIssue,
    UnplannedRequest,
}

impl ReasonCode {
    pub const ALL: [ReasonCode; 7] = [
        ReasonCode::Meeting,
        ReasonCode::Dependency,
        ReasonCode::ContextSwitch,
        ReasonCode::Family,
        ReasonCode::EmotionalLoad,
        ReasonCode::TechIssue,
        ReasonCode::UnplannedRequest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::Meeting => "MEETING",
            ReasonCode::Dependency => "DEPENDENCY",
            ReasonCode::ContextSwitch => "CONTEXT_SWITCH",
            ReasonCode::Family => "FAMILY",
            ReasonCode::EmotionalLoad => "EMOTIONAL_LOAD",
            ReasonCode::TechIssue => "TECH_ISSUE",
            ReasonCode::UnplannedRequest => "UNPLANNED_REQUEST",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReasonCode {
    type Err = EntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|code| code.as_str() == trimmed)
            .ok_or_else(|| EntryError::UnknownReason(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecoveryKind {
    Coffee,
    Lunch,
}

impl FromStr for RecoveryKind {
    type Err = EntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "COFFEE" => Ok(RecoveryKind::Coffee),
            "LUNCH" => Ok(RecoveryKind::Lunch),
            _ => Err(EntryError::UnknownRecoveryKind(s.to_string())),
        }
    }
}

/// One intent per line; blank lines are dropped.
pub fn parse_intents(text: &str) -> Result<Vec<String>, EntryError> {
    let intents = non_empty_lines(text);
    if intents.len() > MAX_DAILY_INTENTS {
        return Err(EntryError::TooManyIntents(intents.len()));
    }
    Ok(intents)
}

pub fn is_open(block: &WorkBlock) -> bool {
    !block.interrupted && block.actual_outcome.is_none() && block.duration_minutes.is_none()
}

pub fn active_block(day: &DailyRollup) -> Option<&WorkBlock> {
    day.blocks.iter().find(|block| is_open(block))
}

pub fn open_recovery(day: &DailyRollup) -> Option<&RecoveryBlock> {
    day.recovery_blocks.iter().find(|block| block.duration_minutes.is_none())
}

pub fn non_empty_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Fragmenter codes picked on the weekly reflection form, comma or space separated.
pub fn parse_fragmenter_codes(text: &str) -> Result<Vec<String>, EntryError> {
    let mut codes = Vec::new();
    for raw in text.split(|c: char| c == ',' || c.is_whitespace()).filter(|s| !s.is_empty()) {
        let code = raw.parse::<ReasonCode>()?.as_str().to_string();
        if !codes.contains(&code) {
            codes.push(code);
        }
    }
    Ok(codes)
}

/// A non-empty exact entry overrides the bucket choice.
pub fn resolve_duration(bucket: Option<u32>, exact: Option<&str>) -> Result<u32, EntryError> {
    match exact.map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => match raw.parse::<u32>() {
            Ok(minutes) if minutes > 0 => Ok(minutes),
            _ => Err(EntryError::InvalidDuration(raw.to_string())),
        },
        None => Ok(bucket.unwrap_or(DEFAULT_DURATION_BUCKET)),
    }
}

pub fn suggested_minutes(elapsed: Duration) -> u32 {
    let minutes = (elapsed.as_secs_f64() / 60.0).round() as u32;
    minutes.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_intents_trims_and_drops_blanks() {
        let intents = parse_intents("  Code feature \n\n Review PR\n   \n").unwrap();
        assert_eq!(intents, vec!["Code feature".to_string(), "Review PR".to_string()]);
    }

    #[test]
    fn parse_intents_caps_at_five() {
        assert_eq!(parse_intents("a\nb\nc\nd\ne\nf"), Err(EntryError::TooManyIntents(6)));
        assert_eq!(parse_intents("a\nb\nc\nd\ne").unwrap().len(), 5);
    }

    #[test]
    fn active_block_is_first_open_one() {
        let day = DailyRollup {
            date: "2026-10-19".into(),
            blocks: vec![
                WorkBlock {
                    block_id: "done".into(),
                    duration_minutes: Some(30),
                    actual_outcome: Some("shipped".into()),
                    ..WorkBlock::default()
                },
                WorkBlock {
                    block_id: "cut".into(),
                    interrupted: true,
                    ..WorkBlock::default()
                },
                WorkBlock {
                    block_id: "open".into(),
                    ..WorkBlock::default()
                },
            ],
            ..DailyRollup::default()
        };
        assert_eq!(active_block(&day).map(|b| b.block_id.as_str()), Some("open"));
    }

    #[test]
    fn reason_codes_parse_and_serialize() {
        assert_eq!("CONTEXT_SWITCH".parse::<ReasonCode>(), Ok(ReasonCode::ContextSwitch));
        assert!(matches!("NAP".parse::<ReasonCode>(), Err(EntryError::UnknownReason(_))));
        assert_eq!(
            serde_json::to_string(&ReasonCode::UnplannedRequest).unwrap(),
            "\"UNPLANNED_REQUEST\""
        );
        for code in ReasonCode::ALL {
            assert_eq!(serde_json::to_string(&code).unwrap(), format!("\"{code}\""));
        }
    }

    #[test]
    fn fragmenter_codes_are_validated_and_deduplicated() {
        assert_eq!(
            parse_fragmenter_codes("MEETING, FAMILY MEETING").unwrap(),
            vec!["MEETING".to_string(), "FAMILY".to_string()]
        );
        assert!(parse_fragmenter_codes("").unwrap().is_empty());
        assert!(parse_fragmenter_codes("MEETING,NAP").is_err());
    }

    #[test]
    fn open_recovery_has_no_duration() {
        let day = DailyRollup {
            recovery_blocks: vec![
                RecoveryBlock {
                    block_id: "r1".into(),
                    kind: "COFFEE".into(),
                    duration_minutes: Some(20),
                },
                RecoveryBlock {
                    block_id: "r2".into(),
                    kind: "LUNCH".into(),
                    duration_minutes: None,
                },
            ],
            ..DailyRollup::default()
        };
        assert_eq!(open_recovery(&day).map(|b| b.block_id.as_str()), Some("r2"));
    }

    #[test]
    fn recovery_kind_parses_known_values_only() {
        assert_eq!("LUNCH".parse::<RecoveryKind>(), Ok(RecoveryKind::Lunch));
        assert!("NAP".parse::<RecoveryKind>().is_err());
    }

    #[test]
    fn exact_duration_wins_over_bucket() {
        assert_eq!(resolve_duration(Some(60), Some("42")), Ok(42));
        assert_eq!(resolve_duration(Some(60), Some("  ")), Ok(60));
        assert_eq!(resolve_duration(None, None), Ok(DEFAULT_DURATION_BUCKET));
        assert!(resolve_duration(Some(60), Some("0")).is_err());
        assert!(resolve_duration(Some(60), Some("abc")).is_err());
    }

    #[test]
    fn suggested_minutes_never_below_one() {
        assert_eq!(suggested_minutes(Duration::from_secs(0)), 1);
        assert_eq!(suggested_minutes(Duration::from_secs(89)), 1);
        assert_eq!(suggested_minutes(Duration::from_secs(91)), 2);
        assert_eq!(suggested_minutes(Duration::from_secs(45 * 60)), 45);
    }
}
