//! Standalone HTML page of the card.
//!
//! Served at `/` and loaded by the browser backend, which waits for the
//! element carrying [`CARD_CLASS`] and screenshots it.

use super::escape_xml as esc;
use crate::stats::StatsRecord;
use std::fmt::Write;

pub const CARD_CLASS: &str = "stats-card";

const STYLE: &str = r#"
* { box-sizing: border-box; margin: 0; padding: 0; }
body { min-height: 100vh; display: flex; align-items: center; justify-content: center; padding: 2rem;
       background: linear-gradient(135deg, #0f172a, #1e3a8a, #0f172a); color: #dbeafe;
       font-family: ui-monospace, SFMono-Regular, Menlo, monospace; }
.wrap { width: 100%; max-width: 56rem; }
.stats-card { background: rgba(30, 41, 59, .5); border: 1px solid rgba(59, 130, 246, .3);
              border-radius: .5rem; padding: 2rem; box-shadow: 0 25px 50px -12px rgba(0, 0, 0, .5); }
.title { color: #60a5fa; font-size: 1.5rem; font-weight: 700; }
.rule { color: rgba(59, 130, 246, .4); margin: 1rem 0; overflow: hidden; white-space: nowrap; }
.grid { display: grid; gap: .75rem 2rem; }
.cols-2 { grid-template-columns: repeat(2, 1fr); }
.cols-3 { grid-template-columns: repeat(3, 1fr); }
.span-2 { grid-column: span 2; }
.label { color: #93c5fd; min-width: 100px; display: inline-block; }
.value { color: #fff; }
.section { font-weight: 700; font-size: 1.1rem; margin: 1.25rem 0 .75rem; color: #67e8f9; }
.tile { border-radius: .5rem; padding: 1rem; border: 1px solid rgba(6, 182, 212, .3); background: rgba(6, 182, 212, .1); }
.tile.stars { border-color: rgba(234, 179, 8, .3); background: rgba(234, 179, 8, .1); }
.tile.streak { border-color: rgba(16, 185, 129, .3); background: rgba(16, 185, 129, .1); }
.tile.pattern { border-color: rgba(139, 92, 246, .3); background: rgba(139, 92, 246, .1); margin-top: 1rem; }
.tile .name { font-size: .875rem; color: #67e8f9; margin-bottom: .5rem; }
.tile .big { font-size: 1.5rem; font-weight: 700; color: #fff; }
.tile .sub { font-size: .875rem; color: #c4b5fd; }
.badges { display: flex; flex-wrap: wrap; gap: .5rem; }
.badge { background: rgba(59, 130, 246, .2); color: #bfdbfe; padding: .25rem .75rem; border-radius: .25rem;
         border: 1px solid rgba(96, 165, 250, .3); font-size: .875rem; }
.footer { margin-top: 1.5rem; padding-top: 1rem; border-top: 1px solid rgba(59, 130, 246, .3);
          text-align: center; color: #94a3b8; font-size: .75rem; }
.meta { margin-top: 1.5rem; text-align: center; color: #94a3b8; font-size: .75rem; }
"#;

const RULE: &str = "─────────────────────────────────────────────────────";

fn tile(out: &mut String, class: &str, name: &str, big: &str, sub: Option<&str>) {
    let _ = write!(
        out,
        r#"<div class="tile {class}"><div class="name">{}</div><div class="big">{}</div>"#,
        esc(name),
        esc(big)
    );
    if let Some(sub) = sub {
        let _ = write!(out, r#"<div class="sub">{}</div>"#, esc(sub));
    }
    out.push_str("</div>\n");
}

fn stat_line(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(
        out,
        r#"<div><span class="label">{}:</span> <span class="value">{}</span></div>"#,
        esc(label),
        esc(value)
    );
}

/// Render the page for `stats`.
pub fn render_page(stats: &StatsRecord) -> String {
    let mut body = String::new();

    let _ = writeln!(body, r#"<div class="title">&gt;_ {}@github</div>"#, esc(&stats.username));
    let _ = writeln!(body, r#"<div class="rule">{RULE}</div>"#);

    body.push_str(r#"<div class="grid cols-2">"#);
    stat_line(&mut body, "Name", &stats.full_name);
    stat_line(&mut body, "Experience", &stats.experience);
    body.push_str(r#"<div class="span-2">"#);
    stat_line(&mut body, "Bio", &stats.bio);
    body.push_str("</div></div>\n");
    let _ = writeln!(body, r#"<div class="rule">{RULE}</div>"#);

    body.push_str(r#"<div class="section">Commit Activity</div><div class="grid cols-3">"#);
    tile(&mut body, "", "Total Commits", &stats.total_commits, None);
    tile(&mut body, "", "Total Repos", &stats.total_repos, None);
    tile(&mut body, "stars", "Total Stars", &stats.total_stars, None);
    body.push_str("</div>\n");

    body.push_str(r#"<div class="grid cols-2" style="margin-top:1rem">"#);
    tile(&mut body, "streak", "Current Streak", &stats.current_streak, None);
    tile(&mut body, "streak", "Longest Streak", &stats.longest_streak, None);
    body.push_str("</div>\n");

    body.push_str(r#"<div class="tile pattern"><div class="name">Activity Patterns</div><div class="grid cols-2">"#);
    tile(
        &mut body,
        "",
        "Most Active Day of Week",
        &stats.most_commit_day,
        Some(format!("{} commits total", stats.most_commit_day_count).as_str()),
    );
    tile(
        &mut body,
        "",
        "Most Active Single Date",
        &stats.most_active_date,
        Some(format!("{} commits", stats.most_active_date_count).as_str()),
    );
    body.push_str("</div></div>\n");
    let _ = writeln!(body, r#"<div class="rule">{RULE}</div>"#);

    body.push_str(r#"<div class="section">Notable Projects</div><div class="grid cols-2">"#);
    let most_commits = if stats.most_commit_project_count > 0 {
        format!("{} ({} commits)", stats.most_commit_project, stats.most_commit_project_count)
    } else {
        stats.most_commit_project.clone()
    };
    stat_line(&mut body, "Most Commits", &most_commits);
    stat_line(
        &mut body,
        "Fans Favourite",
        &format!("{} with {} stars", stats.favourite_project, stats.favourite_project_stars),
    );
    body.push_str("</div>\n");
    let _ = writeln!(body, r#"<div class="rule">{RULE}</div>"#);

    body.push_str(r#"<div class="section">Tech Stack</div><div class="badges">"#);
    for lang in &stats.languages {
        let _ = write!(body, r#"<span class="badge">{}</span>"#, esc(lang));
    }
    body.push_str("</div>\n");

    if let Some(w) = &stats.wakatime {
        body.push_str(r#"<div class="section">Coding Time</div><div class="grid cols-3">"#);
        tile(&mut body, "", "Total Hours (All Time)", &w.total_hours, None);
        tile(&mut body, "", "Last 7 Days", &w.last_7_days_total, None);
        tile(&mut body, "", "Top OS", &w.top_os, None);
        body.push_str("</div>\n");
        body.push_str(r#"<div class="grid cols-2" style="margin-top:1rem">"#);
        tile(&mut body, "", "Favourite Language", &w.top_language, Some(w.top_language_time.as_str()));
        tile(&mut body, "", "Runner-up", &w.second_language, Some(w.second_language_time.as_str()));
        body.push_str("</div>\n");
    }

    let _ = writeln!(
        body,
        r#"<div class="footer">Building with passion, shipping with purpose · {} views</div>"#,
        stats.profile_views
    );

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} · stats</title>
<style>{STYLE}</style>
</head>
<body>
<div class="wrap">
<div class="{CARD_CLASS}">
{body}</div>
<div class="meta">◆ Last updated: {updated} ◆</div>
</div>
</body>
</html>
"#,
        title = esc(&stats.username),
        updated = stats.updated_on.format("%-m/%-d/%Y"),
    )
}
