use crate::entry::{open_recovery, ReasonCode, DEFAULT_DURATION_BUCKET, DURATION_BUCKETS};
use crate::models::{DailyRollup, WorkBlock};
use crate::retro::{block_label, fragmentation_percent, ImprovementPicks, Retrospective, IMPROVEMENT_OPTIONS};
use std::fmt::Write;

pub fn render_today(day: &DailyRollup, active: Option<&WorkBlock>, suggested: Option<u32>) -> String {
    TODAY_HTML
        .replace("{{STYLE}}", STYLE)
        .replace("{{DATE}}", &escape(&day.date))
        .replace("{{INTENTS}}", &intent_list(&day.intents))
        .replace("{{INTENTS_TEXT}}", &escape(&day.intents.join("\n")))
        .replace("{{ACTIVE}}", &active_panel(active, suggested))
        .replace("{{RECOVERY}}", &recovery_panel(day))
        .replace("{{BLOCKS}}", &block_rows(&day.blocks))
        .replace("{{ACTIVE_LABEL}}", &escape(day.metrics.total_active_label.as_deref().unwrap_or("~0 mins")))
        .replace("{{TOTAL_BLOCKS}}", &day.metrics.total_blocks.to_string())
        .replace("{{FOCUS_BLOCKS}}", &day.metrics.focus_blocks.to_string())
        .replace(
            "{{FRAGMENTATION}}",
            &format!("{}%", fragmentation_percent(day.metrics.fragmentation_rate)),
        )
}

/// Day report for any date; `day` is `None` when the API has nothing for it.
pub fn render_day(date: &str, day: Option<&DailyRollup>) -> String {
    let Some(day) = day else {
        return DAY_HTML
            .replace("{{STYLE}}", STYLE)
            .replace("{{DATE}}", &escape(date))
            .replace("{{REPORT}}", r#"<p class="empty">No data for this date.</p>"#);
    };
    let metrics = &day.metrics;
    let report = format!(
        r#"<section class="panel">
      <div class="stat"><p class="label">Total time</p><p class="value">{active}</p></div>
      <div class="stat"><p class="label">Focus blocks</p><p class="value">{focus} / {total}</p></div>
      <div class="stat"><p class="label">Interrupted</p><p class="value">{interrupted}</p><p class="subtitle">{rate}% fragmentation</p></div>
    </section>
    <section>
      <table>
        <thead><tr><th>Intent</th><th>Outcome</th><th>Duration</th><th>Interrupted</th><th>Reason</th></tr></thead>
        <tbody>{blocks}</tbody>
      </table>
    </section>"#,
        active = escape(metrics.total_active_label.as_deref().unwrap_or("~0 mins")),
        focus = metrics.focus_blocks,
        total = metrics.total_blocks,
        interrupted = metrics.interrupted_blocks,
        rate = fragmentation_percent(metrics.fragmentation_rate),
        blocks = block_rows(&day.blocks),
    );
    DAY_HTML
        .replace("{{STYLE}}", STYLE)
        .replace("{{DATE}}", &escape(date))
        .replace("{{REPORT}}", &report)
}

pub fn render_week(retro: &Retrospective, picks: &ImprovementPicks) -> String {
    let week = retro.year_week.to_string();
    WEEK_HTML
        .replace("{{STYLE}}", STYLE)
        .replace("{{WEEK}}", &week)
        .replace("{{ACTIVE_LABEL}}", &escape(&retro.glance.active_label))
        .replace("{{TOTAL_BLOCKS}}", &retro.glance.total_blocks.to_string())
        .replace("{{FOCUS_BLOCKS}}", &retro.glance.focus_blocks.to_string())
        .replace("{{FRAGMENTATION}}", &format!("{}%", retro.glance.fragmentation_percent))
        .replace("{{INTENTS}}", &intent_summary_rows(retro))
        .replace("{{FRAGMENTERS}}", &fragmenter_rows(retro))
        .replace("{{FOCUS_DAYS}}", &retro.focus.focus_day_count.to_string())
        .replace("{{LONGEST}}", &escape(&retro.longest_label))
        .replace("{{NOT_PERF}}", &not_performance_list(&retro.not_performance_issues))
        .replace("{{WINS}}", &list_items(&retro.structural_wins))
        .replace("{{ONE_CHANGE}}", &escape(&retro.one_change_next_week))
        .replace("{{REFLECTION_FRAGMENTERS}}", &escape(&retro.reflection_fragmenters.join(", ")))
        .replace("{{NOT_PERF_TEXT}}", &escape(&retro.not_performance_issues.join("\n")))
        .replace("{{IMPROVEMENTS}}", &improvement_buttons(&week, picks))
}

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn list_items(items: &[String]) -> String {
    items.iter().fold(String::new(), |mut out, item| {
        let _ = write!(out, "<li>{}</li>", escape(item));
        out
    })
}

fn intent_list(intents: &[String]) -> String {
    if intents.is_empty() {
        return r#"<p class="empty">No intents set for today.</p>"#.to_string();
    }
    format!("<ul>{}</ul>", list_items(intents))
}

fn active_panel(active: Option<&WorkBlock>, suggested: Option<u32>) -> String {
    let Some(block) = active else {
        return r#"<form method="post" action="/blocks/start" class="stack">
      <input name="intent" placeholder="What are you working on?" required />
      <input name="notes" placeholder="Notes (optional)" />
      <button class="btn-primary" type="submit">Start block</button>
    </form>"#
            .to_string();
    };

    let suggested = suggested.unwrap_or(DEFAULT_DURATION_BUCKET);
    let closest = DURATION_BUCKETS
        .iter()
        .map(|(_, minutes)| *minutes)
        .find(|minutes| *minutes >= suggested)
        .unwrap_or(DURATION_BUCKETS[DURATION_BUCKETS.len() - 1].1);
    let buckets = DURATION_BUCKETS.iter().fold(String::new(), |mut out, (label, minutes)| {
        let selected = if *minutes == closest { " selected" } else { "" };
        let _ = write!(out, r#"<option value="{minutes}"{selected}>{label}</option>"#);
        out
    });
    let reasons = ReasonCode::ALL.iter().fold(String::new(), |mut out, code| {
        let _ = write!(out, r#"<option value="{code}">{code}</option>"#);
        out
    });
    let id = escape(&block.block_id);

    format!(
        r#"<div class="active">
      <p class="label">Active block</p>
      <p class="value">{intent}</p>
      <p class="subtitle">Running for about {suggested} min</p>
      <form method="post" action="/blocks/end" class="stack">
        <input type="hidden" name="block_id" value="{id}" />
        <input name="outcome" placeholder="What actually happened?" />
        <select name="bucket">{buckets}</select>
        <input name="exact" placeholder="Exact minutes (optional)" />
        <button class="btn-primary" type="submit">End block</button>
      </form>
      <form method="post" action="/blocks/interrupt" class="inline">
        <input type="hidden" name="block_id" value="{id}" />
        <select name="reason">{reasons}</select>
        <button class="btn-secondary" type="submit">Interrupted</button>
      </form>
    </div>"#,
        intent = escape(block.intent.as_deref().unwrap_or_default()),
    )
}

fn recovery_panel(day: &DailyRollup) -> String {
    match open_recovery(day) {
        Some(block) => format!(
            r#"<form method="post" action="/recovery/end" class="inline">
      <input type="hidden" name="block_id" value="{id}" />
      <span>{kind} break running</span>
      <input name="minutes" placeholder="Minutes" required />
      <button class="btn-secondary" type="submit">End break</button>
    </form>"#,
            id = escape(&block.block_id),
            kind = escape(&block.kind),
        ),
        None => r#"<form method="post" action="/recovery/start" class="inline">
      <button class="btn-secondary" name="kind" value="COFFEE" type="submit">Coffee</button>
      <button class="btn-secondary" name="kind" value="LUNCH" type="submit">Lunch</button>
    </form>"#
            .to_string(),
    }
}

fn block_rows(blocks: &[WorkBlock]) -> String {
    if blocks.is_empty() {
        return r#"<tr><td colspan="5" class="empty">No blocks yet.</td></tr>"#.to_string();
    }
    blocks.iter().fold(String::new(), |mut out, block| {
        let duration = block
            .duration_label
            .as_deref()
            .filter(|label| !label.is_empty())
            .or_else(|| block_label(block.duration_minutes))
            .unwrap_or("");
        let _ = write!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(block.intent.as_deref().unwrap_or_default()),
            escape(block.actual_outcome.as_deref().unwrap_or_default()),
            escape(duration),
            if block.interrupted { "Yes" } else { "No" },
            escape(block.reason_code.as_deref().unwrap_or("-")),
        );
        out
    })
}

fn intent_summary_rows(retro: &Retrospective) -> String {
    if retro.intents.is_empty() {
        return r#"<p class="empty">No work recorded.</p>"#.to_string();
    }
    retro.intents.iter().fold(String::new(), |mut out, intent| {
        let _ = write!(
            out,
            r#"<div class="row"><span>{}</span><span>{} blocks &middot; <code>{}</code></span></div>"#,
            escape(&intent.name),
            intent.count,
            intent.label,
        );
        out
    })
}

fn fragmenter_rows(retro: &Retrospective) -> String {
    if retro.top_fragmenters.is_empty() {
        return r#"<p class="calm">Zero major interruptions recorded. Smooth sailing?</p>"#.to_string();
    }
    retro
        .top_fragmenters
        .iter()
        .enumerate()
        .fold(String::new(), |mut out, (rank, fragmenter)| {
            let _ = write!(
                out,
                r#"<div class="row"><span>{}. <strong>{}</strong></span><span>interrupted {} blocks</span></div>"#,
                rank + 1,
                escape(&fragmenter.code),
                fragmenter.count,
            );
            out
        })
}

fn not_performance_list(issues: &[String]) -> String {
    if issues.is_empty() {
        return r#"<p class="empty">No external blockers logged in weekly reflection.</p>"#.to_string();
    }
    format!("<ul>{}</ul>", list_items(issues))
}

fn improvement_buttons(week: &str, picks: &ImprovementPicks) -> String {
    IMPROVEMENT_OPTIONS.iter().fold(String::new(), |mut out, option| {
        let class = if picks.is_selected(option) { "pick selected" } else { "pick" };
        let _ = write!(
            out,
            r#"<form method="post" action="/week/{week}/improvements"><button class="{class}" name="option" value="{value}" type="submit">{label}</button></form>"#,
            value = escape(option),
            label = escape(option),
        );
        out
    })
}

const STYLE: &str = r#"
    :root {
      --bg-1: #f8f3e6;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }
    * { box-sizing: border-box; }
    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }
    .app {
      width: min(860px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
    }
    h1 { font-family: "Fraunces", "Georgia", serif; font-weight: 600; margin: 0; }
    h2 { margin: 0; font-size: 1.3rem; }
    nav a { color: var(--accent-2); margin-right: 12px; }
    .subtitle { margin: 0; color: #5f5c57; }
    .panel { display: grid; grid-template-columns: repeat(auto-fit, minmax(160px, 1fr)); gap: 16px; }
    .stat { background: white; border-radius: 18px; padding: 18px; border: 1px solid rgba(47, 72, 88, 0.08); }
    .label { font-size: 0.85rem; text-transform: uppercase; letter-spacing: 0.12em; color: #8b857d; margin: 0; }
    .value { font-size: 1.7rem; font-weight: 600; color: var(--accent-2); margin: 4px 0; }
    .stack { display: grid; gap: 10px; }
    .inline { display: flex; flex-wrap: wrap; gap: 10px; align-items: center; }
    .row { display: flex; justify-content: space-between; padding: 10px 0; border-bottom: 1px solid #eee; }
    .empty, .calm { color: #8b857d; font-style: italic; }
    input, select, textarea { font: inherit; padding: 10px 12px; border-radius: 12px; border: 1px solid #ddd; }
    button { border: none; border-radius: 999px; padding: 12px 18px; font-weight: 600; cursor: pointer; }
    .btn-primary { background: var(--accent); color: white; }
    .btn-secondary { background: var(--accent-2); color: white; }
    .pick { width: 100%; text-align: left; border-radius: 12px; background: white; border: 1px solid #ddd; }
    .pick.selected { background: #e8f0ff; border-color: #4a7bff; }
    table { width: 100%; border-collapse: collapse; }
    td, th { text-align: left; padding: 8px; border-bottom: 1px solid #eee; }
"#;

const TODAY_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Today</title>
  <style>{{STYLE}}</style>
</head>
<body>
  <main class="app">
    <header>
      <nav><a href="/">Today</a><a href="/day">Day report</a><a href="/week">Weekend summary</a></nav>
      <h1>Today</h1>
      <p class="subtitle">{{DATE}}</p>
    </header>
    <section class="stack">
      <h2>Intents</h2>
      {{INTENTS}}
      <form method="post" action="/intents" class="stack">
        <textarea name="intents" rows="5" placeholder="One intent per line (max 5)">{{INTENTS_TEXT}}</textarea>
        <button class="btn-secondary" type="submit">Set intents</button>
      </form>
    </section>
    <section class="stack">
      <h2>Focus block</h2>
      {{ACTIVE}}
    </section>
    <section class="stack">
      <h2>Recovery</h2>
      {{RECOVERY}}
    </section>
    <section class="panel">
      <div class="stat"><p class="label">Active work</p><p class="value">{{ACTIVE_LABEL}}</p></div>
      <div class="stat"><p class="label">Blocks</p><p class="value">{{TOTAL_BLOCKS}}</p></div>
      <div class="stat"><p class="label">Focus blocks</p><p class="value">{{FOCUS_BLOCKS}}</p></div>
      <div class="stat"><p class="label">Fragmentation</p><p class="value">{{FRAGMENTATION}}</p></div>
    </section>
    <section>
      <table>
        <thead><tr><th>Intent</th><th>Outcome</th><th>Duration</th><th>Interrupted</th><th>Reason</th></tr></thead>
        <tbody>{{BLOCKS}}</tbody>
      </table>
    </section>
  </main>
</body>
</html>
"#;

const DAY_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Day Report {{DATE}}</title>
  <style>{{STYLE}}</style>
</head>
<body>
  <main class="app">
    <header>
      <nav><a href="/">Today</a><a href="/day">Day report</a><a href="/week">Weekend summary</a></nav>
      <h1>Day Report</h1>
      <form method="get" action="/day" class="inline">
        <input type="date" name="date" value="{{DATE}}" />
        <button class="btn-secondary" type="submit">Show</button>
      </form>
    </header>
    {{REPORT}}
  </main>
</body>
</html>
"#;

const WEEK_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Weekend Summary {{WEEK}}</title>
  <style>{{STYLE}}</style>
</head>
<body>
  <main class="app">
    <header>
      <nav><a href="/">Today</a><a href="/day">Day report</a><a href="/week">This week</a></nav>
      <h1>Weekend Summary</h1>
      <p class="subtitle">{{WEEK}} &middot; Designing a better next week, not judging the last one.</p>
    </header>
    <section class="stack">
      <h2>Week at a Glance</h2>
      <div class="panel">
        <div class="stat"><p class="label">Active work</p><p class="value">{{ACTIVE_LABEL}}</p></div>
        <div class="stat"><p class="label">Total blocks</p><p class="value">{{TOTAL_BLOCKS}}</p></div>
        <div class="stat"><p class="label">Focus blocks</p><p class="value">{{FOCUS_BLOCKS}}</p></div>
        <div class="stat"><p class="label">Fragmentation</p><p class="value">{{FRAGMENTATION}}</p></div>
      </div>
      <p class="empty">This is an approximation of cognitive effort, not hours worked.</p>
    </section>
    <section class="stack">
      <h2>Where Energy Went</h2>
      {{INTENTS}}
    </section>
    <section class="stack">
      <h2>Fragmentation Pattern</h2>
      {{FRAGMENTERS}}
    </section>
    <section class="panel">
      <div class="stat"><p class="value">{{FOCUS_DAYS}} days</p><p class="label">Allowed deeper focus blocks (30m+)</p></div>
      <div class="stat"><p class="value">{{LONGEST}}</p><p class="label">Longest uninterrupted flow state</p></div>
    </section>
    <section class="stack">
      <h2>Not A Performance Issue</h2>
      {{NOT_PERF}}
    </section>
    <section class="stack">
      <h2>Structural Wins</h2>
      <ul>{{WINS}}</ul>
    </section>
    <section class="stack">
      <h2>Design Next Week</h2>
      <p class="subtitle">Pick 1-3 structural changes to try. Don't rely on willpower.</p>
      <div class="panel">{{IMPROVEMENTS}}</div>
    </section>
    <section class="stack">
      <h2>Reflection</h2>
      <form method="post" action="/week/{{WEEK}}/summary" class="stack">
        <input name="fragmenters" placeholder="Systemic fragmenters, e.g. MEETING, CONTEXT_SWITCH" value="{{REFLECTION_FRAGMENTERS}}" />
        <textarea name="not_performance_issues" rows="3" placeholder="What was not a performance issue (one per line)">{{NOT_PERF_TEXT}}</textarea>
        <input name="one_change" placeholder="One change for next week" value="{{ONE_CHANGE}}" />
        <button class="btn-primary" type="submit">Save reflection</button>
      </form>
    </section>
  </main>
</body>
</html>
"#;
