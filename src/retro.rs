use crate::models::{DailyRollup, FragmenterCount, WeekMetrics, WeeklyRollup};
use crate::week::YearWeek;
use serde::Serialize;

pub const UNKNOWN_INTENT: &str = "Unknown";
pub const FALLBACK_WIN: &str = "You tracked your work, which is the first step to checking reality.";
pub const MAX_IMPROVEMENT_PICKS: usize = 3;

pub const IMPROVEMENT_OPTIONS: [&str; 6] = [
    "Block mornings for deep work on Tue/Thu.",
    "Decline meetings without a clear agenda.",
    "Break tasks down into 30m chunks.",
    "Turn off Slack notifications during focus.",
    "Clarify dependencies before starting a block.",
    "Take a real lunch break away from screens.",
];

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IntentSummary {
    pub name: String,
    pub count: u32,
    pub total_minutes: u32,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FocusReality {
    pub focus_day_count: u32,
    pub longest_uninterrupted_minutes: u32,
}

pub fn summarize_intents(days: &[DailyRollup]) -> Vec<IntentSummary> {
    let mut summaries: Vec<IntentSummary> = Vec::new();
    for block in days.iter().flat_map(|day| &day.blocks) {
        let name = match block.intent.as_deref() {
            Some(intent) if !intent.is_empty() => intent,
            _ => UNKNOWN_INTENT,
        };
        let minutes = block.duration_minutes.unwrap_or(0);
        match summaries.iter_mut().find(|summary| summary.name == name) {
            Some(summary) => {
                summary.count += 1;
                summary.total_minutes = summary.total_minutes.saturating_add(minutes);
            }
            None => summaries.push(IntentSummary {
                name: name.to_string(),
                count: 1,
                total_minutes: minutes,
            }),
        }
    }
    // sort_by is stable, so ties keep first-seen order
    summaries.sort_by(|a, b| b.total_minutes.cmp(&a.total_minutes));
    summaries
}

pub fn bucket_label(minutes: u32) -> &'static str {
    match minutes {
        0..=15 => "~15 mins",
        16..=30 => "~30 mins",
        31..=60 => "~1 hour",
        61..=120 => "~2 hours",
        121..=180 => "~½ day",
        181..=360 => "~1 day",
        _ => "> 1 day",
    }
}

pub fn block_label(minutes: Option<u32>) -> Option<&'static str> {
    minutes.map(bucket_label)
}

pub fn total_label(minutes: u32) -> &'static str {
    if minutes == 0 { "~0 mins" } else { bucket_label(minutes) }
}

pub fn fragmentation_percent(rate: f64) -> u32 {
    (rate.clamp(0.0, 1.0) * 100.0).round() as u32
}

pub fn focus_reality_stats(days: &[DailyRollup]) -> FocusReality {
    let focus_day_count = days.iter().filter(|day| day.metrics.focus_blocks > 0).count() as u32;
    let longest_uninterrupted_minutes = days
        .iter()
        .flat_map(|day| &day.blocks)
        .filter(|block| !block.interrupted)
        .map(|block| block.duration_minutes.unwrap_or(0))
        .max()
        .unwrap_or(0);
    FocusReality {
        focus_day_count,
        longest_uninterrupted_minutes,
    }
}

pub fn days_recorded(days: &[DailyRollup]) -> u32 {
    days.iter().filter(|day| !day.blocks.is_empty()).count() as u32
}

/// Absent metrics skip the fragmentation and interruption rules.
pub fn structural_wins(metrics: Option<&WeekMetrics>, focus_day_count: u32) -> Vec<String> {
    let mut wins = Vec::new();
    if focus_day_count >= 2 {
        wins.push("You had 2+ days with deep focus blocks".to_string());
    }
    if let Some(metrics) = metrics {
        if metrics.fragmentation_rate < 0.30 && metrics.total_blocks > 5 {
            wins.push("Fragmentation was kept lower than 30%".to_string());
        }
        if metrics.interrupted_blocks == 0 && metrics.total_blocks > 0 {
            wins.push("Zero interruptions recorded!".to_string());
        }
    }
    if wins.is_empty() {
        wins.push(FALLBACK_WIN.to_string());
    }
    wins
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IntentLine {
    pub name: String,
    pub count: u32,
    pub total_minutes: u32,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeekAtAGlance {
    pub active_label: String,
    pub total_blocks: u32,
    pub focus_blocks: u32,
    pub fragmentation_percent: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Retrospective {
    pub year_week: YearWeek,
    pub has_week_data: bool,
    pub glance: WeekAtAGlance,
    pub intents: Vec<IntentLine>,
    pub top_fragmenters: Vec<FragmenterCount>,
    pub focus: FocusReality,
    pub longest_label: String,
    pub days_recorded: u32,
    pub not_performance_issues: Vec<String>,
    pub structural_wins: Vec<String>,
    pub one_change_next_week: String,
    /// Fragmenter codes from the saved reflection, not the measured ones.
    pub reflection_fragmenters: Vec<String>,
}

pub fn build_retrospective(
    year_week: YearWeek,
    week: Option<&WeeklyRollup>,
    days: &[DailyRollup],
) -> Retrospective {
    let metrics = week.and_then(|week| week.metrics.as_ref());
    let focus = focus_reality_stats(days);

    let glance = WeekAtAGlance {
        active_label: metrics
            .and_then(|metrics| metrics.total_active_label.clone())
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| total_label(0).to_string()),
        total_blocks: metrics.map_or(0, |metrics| metrics.total_blocks),
        focus_blocks: metrics.map_or(0, |metrics| metrics.focus_blocks),
        fragmentation_percent: fragmentation_percent(metrics.map_or(0.0, |m| m.fragmentation_rate)),
    };

    let intents = summarize_intents(days)
        .into_iter()
        .map(|summary| IntentLine {
            label: bucket_label(summary.total_minutes),
            name: summary.name,
            count: summary.count,
            total_minutes: summary.total_minutes,
        })
        .collect();

    let longest_label = if focus.longest_uninterrupted_minutes > 0 {
        bucket_label(focus.longest_uninterrupted_minutes).to_string()
    } else {
        "-".to_string()
    };

    let reflection = week.map(|week| week.reflection.clone()).unwrap_or_default();

    Retrospective {
        year_week,
        has_week_data: week.is_some(),
        glance,
        intents,
        top_fragmenters: metrics.map(|m| m.top_fragmenters.clone()).unwrap_or_default(),
        focus,
        longest_label,
        days_recorded: days_recorded(days),
        not_performance_issues: reflection.not_performance_issues,
        structural_wins: structural_wins(metrics, focus.focus_day_count),
        one_change_next_week: reflection.one_change_next_week,
        reflection_fragmenters: reflection.top_fragmenters,
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("unknown improvement option '{0}'")]
pub struct UnknownImprovement(pub String);

/// Up to three structural changes picked for next week.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ImprovementPicks {
    selected: Vec<&'static str>,
}

impl ImprovementPicks {
    pub fn selected(&self) -> &[&'static str] {
        &self.selected
    }

    pub fn is_selected(&self, option: &str) -> bool {
        self.selected.iter().any(|picked| *picked == option)
    }

    /// Deselects a picked option, or selects it while fewer than three are picked.
    pub fn toggle(&mut self, option: &str) -> Result<bool, UnknownImprovement> {
        let option = IMPROVEMENT_OPTIONS
            .iter()
            .copied()
            .find(|known| *known == option)
            .ok_or_else(|| UnknownImprovement(option.to_string()))?;

        if let Some(pos) = self.selected.iter().position(|picked| *picked == option) {
            self.selected.remove(pos);
            return Ok(false);
        }
        if self.selected.len() >= MAX_IMPROVEMENT_PICKS {
            return Ok(false);
        }
        self.selected.push(option);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DayMetrics, WeekReflection, WorkBlock};

    fn block(intent: &str, minutes: Option<u32>, interrupted: bool) -> WorkBlock {
        WorkBlock {
            block_id: format!("{intent}-{minutes:?}"),
            intent: Some(intent.to_string()),
            duration_minutes: minutes,
            interrupted,
            date: "2026-10-19".to_string(),
            ..WorkBlock::default()
        }
    }

    fn day(date: &str, blocks: Vec<WorkBlock>, focus_blocks: u32) -> DailyRollup {
        DailyRollup {
            date: date.to_string(),
            blocks,
            metrics: DayMetrics {
                focus_blocks,
                ..DayMetrics::default()
            },
            ..DailyRollup::default()
        }
    }

    fn metrics(total: u32, interrupted: u32, rate: f64) -> WeekMetrics {
        WeekMetrics {
            total_blocks: total,
            interrupted_blocks: interrupted,
            fragmentation_rate: rate,
            ..WeekMetrics::default()
        }
    }

    #[test]
    fn bucket_label_thresholds_are_inclusive() {
        assert_eq!(bucket_label(0), "~15 mins");
        assert_eq!(bucket_label(15), "~15 mins");
        assert_eq!(bucket_label(16), "~30 mins");
        assert_eq!(bucket_label(45), "~1 hour");
        assert_eq!(bucket_label(120), "~2 hours");
        assert_eq!(bucket_label(180), "~½ day");
        assert_eq!(bucket_label(360), "~1 day");
        assert_eq!(bucket_label(361), "> 1 day");
        assert_eq!(total_label(0), "~0 mins");
        assert_eq!(total_label(100), "~2 hours");
        assert_eq!(block_label(None), None);
    }

    #[test]
    fn summarize_intents_empty_input() {
        assert!(summarize_intents(&[]).is_empty());
    }

    #[test]
    fn summarize_intents_groups_across_days_and_sorts() {
        let days = vec![
            day("2026-10-19", vec![block("A", Some(30), false), block("B", Some(10), false)], 0),
            day("2026-10-20", vec![block("B", Some(10), false), block("A", Some(30), false)], 0),
        ];
        let summary = summarize_intents(&days);
        assert_eq!(
            summary,
            vec![
                IntentSummary { name: "A".into(), count: 2, total_minutes: 60 },
                IntentSummary { name: "B".into(), count: 2, total_minutes: 20 },
            ]
        );
    }

    #[test]
    fn summarize_intents_one_block_each() {
        let days = vec![day(
            "2026-10-19",
            vec![block("B", Some(10), false), block("A", Some(30), false)],
            0,
        )];
        let summary = summarize_intents(&days);
        assert_eq!(summary[0], IntentSummary { name: "A".into(), count: 1, total_minutes: 30 });
        assert_eq!(summary[1], IntentSummary { name: "B".into(), count: 1, total_minutes: 10 });
    }

    #[test]
    fn summarize_intents_open_blocks_count_without_minutes_and_ties_keep_order() {
        let mut nameless = block("", None, false);
        nameless.intent = None;
        let days = vec![day(
            "2026-10-19",
            vec![block("First", None, false), nameless, block("", Some(0), true)],
            0,
        )];
        let summary = summarize_intents(&days);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].name, "First");
        assert_eq!(summary[1], IntentSummary { name: UNKNOWN_INTENT.into(), count: 2, total_minutes: 0 });
    }

    #[test]
    fn focus_reality_ignores_interrupted_blocks() {
        let days = vec![day(
            "2026-10-19",
            vec![block("A", Some(45), false), block("A", Some(90), true)],
            1,
        )];
        let stats = focus_reality_stats(&days);
        assert_eq!(stats.longest_uninterrupted_minutes, 45);
        assert_eq!(stats.focus_day_count, 1);
    }

    #[test]
    fn focus_reality_of_nothing_is_zero() {
        assert_eq!(focus_reality_stats(&[]), FocusReality::default());
        let open_only = vec![day("2026-10-19", vec![block("A", None, false)], 0)];
        assert_eq!(focus_reality_stats(&open_only).longest_uninterrupted_minutes, 0);
    }

    #[test]
    fn structural_wins_fallback_when_nothing_fires() {
        assert_eq!(structural_wins(Some(&metrics(0, 0, 0.0)), 0), vec![FALLBACK_WIN.to_string()]);
        assert_eq!(structural_wins(None, 1), vec![FALLBACK_WIN.to_string()]);
    }

    #[test]
    fn structural_wins_fire_in_fixed_order() {
        let wins = structural_wins(Some(&metrics(6, 0, 0.0)), 3);
        assert_eq!(
            wins,
            vec![
                "You had 2+ days with deep focus blocks".to_string(),
                "Fragmentation was kept lower than 30%".to_string(),
                "Zero interruptions recorded!".to_string(),
            ]
        );
    }

    #[test]
    fn structural_wins_fragmentation_needs_more_than_five_blocks() {
        let wins = structural_wins(Some(&metrics(5, 1, 0.2)), 0);
        assert_eq!(wins, vec![FALLBACK_WIN.to_string()]);
        let wins = structural_wins(Some(&metrics(10, 3, 0.3)), 0);
        assert_eq!(wins, vec![FALLBACK_WIN.to_string()]);
    }

    #[test]
    fn structural_wins_skip_metric_rules_without_metrics() {
        assert_eq!(structural_wins(None, 2), vec!["You had 2+ days with deep focus blocks".to_string()]);
    }

    #[test]
    fn retrospective_defaults_without_week_data() {
        let week: YearWeek = "2026-W43".parse().unwrap();
        let retro = build_retrospective(week, None, &[]);
        assert!(!retro.has_week_data);
        assert_eq!(retro.glance.active_label, "~0 mins");
        assert_eq!(retro.glance.fragmentation_percent, 0);
        assert_eq!(retro.longest_label, "-");
        assert_eq!(retro.structural_wins, vec![FALLBACK_WIN.to_string()]);
        assert!(retro.reflection_fragmenters.is_empty());
        assert_eq!(retro.one_change_next_week, "");
    }

    #[test]
    fn retrospective_combines_week_and_days() {
        let week = WeeklyRollup {
            year_week: "2026-W43".parse().unwrap(),
            metrics: Some(WeekMetrics {
                total_active_label: Some("~2 hours".into()),
                focus_blocks: 2,
                top_fragmenters: vec![FragmenterCount { code: "MEETING".into(), count: 2 }],
                ..metrics(8, 2, 0.25)
            }),
            reflection: WeekReflection {
                top_fragmenters: vec!["FAMILY".into()],
                not_performance_issues: vec!["Power outage".into()],
                one_change_next_week: "Mute chat".into(),
            },
        };
        let days = vec![
            day("2026-10-19", vec![block("Ship", Some(50), false)], 1),
            day("2026-10-20", vec![block("Ship", Some(40), false), block("Chat", Some(10), true)], 1),
            day("2026-10-21", Vec::new(), 0),
        ];
        let retro = build_retrospective(week.year_week, Some(&week), &days);
        assert_eq!(retro.glance.active_label, "~2 hours");
        assert_eq!(retro.glance.fragmentation_percent, 25);
        assert_eq!(retro.intents[0].name, "Ship");
        assert_eq!(retro.intents[0].label, "~2 hours");
        assert_eq!(retro.longest_label, "~1 hour");
        assert_eq!(retro.days_recorded, 2);
        assert_eq!(retro.top_fragmenters.len(), 1);
        assert_eq!(retro.not_performance_issues, vec!["Power outage".to_string()]);
        assert_eq!(retro.reflection_fragmenters, vec!["FAMILY".to_string()]);
        assert_eq!(retro.one_change_next_week, "Mute chat");
        assert_eq!(
            retro.structural_wins,
            vec![
                "You had 2+ days with deep focus blocks".to_string(),
                "Fragmentation was kept lower than 30%".to_string(),
            ]
        );
    }

    #[test]
    fn improvement_picks_cap_at_three() {
        let mut picks = ImprovementPicks::default();
        for option in &IMPROVEMENT_OPTIONS[..3] {
            assert_eq!(picks.toggle(option), Ok(true));
        }
        assert_eq!(picks.toggle(IMPROVEMENT_OPTIONS[3]), Ok(false));
        assert_eq!(picks.selected().len(), 3);

        assert_eq!(picks.toggle(IMPROVEMENT_OPTIONS[0]), Ok(false));
        assert!(!picks.is_selected(IMPROVEMENT_OPTIONS[0]));
        assert_eq!(picks.toggle(IMPROVEMENT_OPTIONS[3]), Ok(true));
        assert!(picks.toggle("Work harder").is_err());
    }
}
