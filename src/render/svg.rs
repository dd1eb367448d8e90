//! Compact card, written out as one SVG template.
//!
//! 495px wide so it sits in a README column. Height grows by one section
//! when coding-time stats are present.

use super::{escape_xml, truncate};
use crate::stats::StatsRecord;
use std::fmt::Write;

pub const WIDTH: u32 = 495;
const BASE_HEIGHT: u32 = 600;
const WAKATIME_HEIGHT: u32 = 90;
const BIO_CHARS: usize = 50;
const MAX_BADGES: usize = 8;
const BADGE_COLUMNS: usize = 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Parse the `theme` query value; anything unknown is dark.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("light") => Theme::Light,
            _ => Theme::Dark,
        }
    }

    pub fn colors(self) -> ThemeColors {
        match self {
            Theme::Dark => ThemeColors {
                bg_from: "#0f172a",
                bg_mid: "#1e3a8a",
                panel: "#1e293b80",
                title: "#60a5fa",
                section: "#67e8f9",
                label: "#93c5fd",
                value: "#ffffff",
                accent: "#6ee7b7",
                badge: "#bfdbfe",
                muted: "#94a3b8",
            },
            Theme::Light => ThemeColors {
                bg_from: "#f8fafc",
                bg_mid: "#dbeafe",
                panel: "#ffffffcc",
                title: "#1d4ed8",
                section: "#0e7490",
                label: "#1e40af",
                value: "#0f172a",
                accent: "#047857",
                badge: "#1e3a8a",
                muted: "#64748b",
            },
        }
    }
}

pub struct ThemeColors {
    pub bg_from: &'static str,
    pub bg_mid: &'static str,
    pub panel: &'static str,
    pub title: &'static str,
    pub section: &'static str,
    pub label: &'static str,
    pub value: &'static str,
    pub accent: &'static str,
    pub badge: &'static str,
    pub muted: &'static str,
}

fn language_badges(languages: &[String]) -> String {
    let mut out = String::new();
    for (idx, lang) in languages.iter().take(MAX_BADGES).enumerate() {
        let col = (idx % BADGE_COLUMNS) as u32;
        let row = (idx / BADGE_COLUMNS) as u32;
        let width = (lang.chars().count() as u32 * 7 + 12).min(100);
        let _ = write!(
            out,
            r##"    <rect x="{rx}" y="{ry}" width="{width}" height="20" rx="3" fill="#3b82f630" stroke="#60a5fa50" stroke-width="0.5"/>
    <text x="{tx}" y="{ty}" class="lang-badge">{name}</text>
"##,
            rx = 35 + col * 110,
            ry = 478 + row * 25,
            tx = 42 + col * 110,
            ty = 492 + row * 25,
            name = escape_xml(lang),
        );
    }
    out
}

fn wakatime_section(stats: &StatsRecord) -> String {
    let Some(w) = &stats.wakatime else {
        return String::new();
    };
    format!(
        r##"
  <line x1="25" y1="535" x2="470" y2="535" class="divider"/>
  <text x="25" y="555" class="section-title">⏱ Coding Time</text>
  <text x="25" y="575" class="label">All Time:</text>
  <text x="95" y="575" class="value">{total}</text>
  <text x="250" y="575" class="label">Last 7 Days:</text>
  <text x="330" y="575" class="value">{week}</text>
  <text x="25" y="593" class="label">Languages:</text>
  <text x="95" y="593" class="value">{l1} ({t1}), {l2} ({t2})</text>
  <text x="25" y="611" class="label">Top OS:</text>
  <text x="95" y="611" class="value">{os}</text>
"##,
        total = escape_xml(&w.total_hours),
        week = escape_xml(&w.last_7_days_total),
        l1 = escape_xml(&w.top_language),
        t1 = escape_xml(&w.top_language_time),
        l2 = escape_xml(&w.second_language),
        t2 = escape_xml(&w.second_language_time),
        os = escape_xml(&w.top_os),
    )
}

/// Main SVG generation function
pub fn render(stats: &StatsRecord, theme: Theme) -> String {
    let c = theme.colors();
    let height = BASE_HEIGHT + if stats.wakatime.is_some() { WAKATIME_HEIGHT } else { 0 };
    let footer_y = height - 25;

    let project_commits = if stats.most_commit_project_count > 0 {
        format!(" ({} commits)", stats.most_commit_project_count)
    } else {
        String::new()
    };

    format!(
        r##"<svg width="{WIDTH}" height="{height}" viewBox="0 0 {WIDTH} {height}" xmlns="http://www.w3.org/2000/svg">
  <defs>
    <linearGradient id="bg" x1="0%" y1="0%" x2="100%" y2="100%">
      <stop offset="0%" style="stop-color:{bg_from};stop-opacity:1" />
      <stop offset="50%" style="stop-color:{bg_mid};stop-opacity:1" />
      <stop offset="100%" style="stop-color:{bg_from};stop-opacity:1" />
    </linearGradient>
    <style>
      .username {{ font: bold 16px 'Segoe UI', system-ui, sans-serif; fill: {title}; }}
      .section-title {{ font: bold 13px 'Segoe UI', system-ui, sans-serif; fill: {section}; }}
      .label {{ font: 11px 'Segoe UI', system-ui, sans-serif; fill: {label}; }}
      .value {{ font: 11px 'Segoe UI', system-ui, sans-serif; fill: {value}; }}
      .stat-card {{ fill: rgba(6, 182, 212, 0.1); }}
      .stat-label {{ font: 10px 'Segoe UI', system-ui, sans-serif; fill: {section}; }}
      .stat-value {{ font: bold 18px 'Segoe UI', system-ui, sans-serif; fill: {value}; }}
      .streak-card {{ fill: rgba(16, 185, 129, 0.1); }}
      .streak-label {{ font: 9px 'Segoe UI', system-ui, sans-serif; fill: {accent}; }}
      .lang-badge {{ font: 9px 'Segoe UI', system-ui, sans-serif; fill: {badge}; }}
      .divider {{ stroke: #3b82f680; stroke-width: 0.5; }}
      .footer {{ font: 8px 'Segoe UI', system-ui, sans-serif; fill: {muted}; }}
    </style>
  </defs>

  <rect width="{WIDTH}" height="{height}" fill="url(#bg)"/>
  <rect x="10" y="10" width="475" height="{panel_h}" rx="8" fill="{panel}" stroke="#3b82f650" stroke-width="1"/>

  <text x="25" y="35" class="username">{username}@github</text>
  <line x1="25" y1="42" x2="470" y2="42" class="divider"/>

  <text x="25" y="62" class="label">Name:</text>
  <text x="90" y="62" class="value">{full_name}</text>
  <text x="280" y="62" class="label">Experience:</text>
  <text x="355" y="62" class="value">{experience}</text>
  <text x="25" y="78" class="label">Bio:</text>
  <text x="90" y="78" class="value">{bio}</text>
  <line x1="25" y1="88" x2="470" y2="88" class="divider"/>

  <text x="25" y="108" class="section-title">📊 Commit Activity</text>
  <rect x="25" y="120" width="140" height="65" rx="6" class="stat-card" stroke="#06b6d450" stroke-width="0.5"/>
  <text x="35" y="135" class="stat-label">Total Commits</text>
  <text x="35" y="163" class="stat-value">{total_commits}</text>
  <rect x="177" y="120" width="140" height="65" rx="6" class="stat-card" stroke="#06b6d450" stroke-width="0.5"/>
  <text x="187" y="135" class="stat-label">Total Repos</text>
  <text x="187" y="163" class="stat-value">{total_repos}</text>
  <rect x="330" y="120" width="140" height="65" rx="6" fill="rgba(234, 179, 8, 0.1)" stroke="#eab30850" stroke-width="0.5"/>
  <text x="340" y="135" class="stat-label">⭐ Total Stars</text>
  <text x="340" y="163" class="stat-value">{total_stars}</text>

  <rect x="25" y="200" width="217" height="65" rx="6" class="streak-card" stroke="#10b98150" stroke-width="0.5"/>
  <text x="35" y="215" class="streak-label">🔥 Current Streak</text>
  <text x="35" y="243" class="stat-value">{current_streak}</text>
  <rect x="253" y="200" width="217" height="65" rx="6" class="streak-card" stroke="#10b98150" stroke-width="0.5"/>
  <text x="263" y="215" class="streak-label">📈 Longest Streak</text>
  <text x="263" y="243" class="stat-value">{longest_streak}</text>

  <rect x="25" y="280" width="445" height="85" rx="6" fill="rgba(139, 92, 246, 0.1)" stroke="#8b5cf650" stroke-width="0.5"/>
  <text x="35" y="295" class="streak-label">📅 Activity Patterns</text>
  <text x="35" y="315" class="stat-label">Most Active Day</text>
  <text x="35" y="330" class="value">{day} ({day_count})</text>
  <text x="35" y="347" class="stat-label">Most Active Date</text>
  <text x="35" y="360" class="value">{date} ({date_count})</text>
  <line x1="25" y1="378" x2="470" y2="378" class="divider"/>

  <text x="25" y="398" class="section-title">💻 Notable Projects</text>
  <text x="25" y="418" class="label">Most Commits:</text>
  <text x="125" y="418" class="value">{project}{project_commits}</text>
  <text x="25" y="434" class="label">⭐ Favourite:</text>
  <text x="125" y="434" class="value">{favourite} ({favourite_stars} ⭐)</text>
  <line x1="25" y1="447" x2="470" y2="447" class="divider"/>

  <text x="25" y="467" class="section-title">🔧 Tech Stack</text>
{badges}{wakatime}
  <text x="247" y="{footer_y}" class="footer" text-anchor="middle">👁 {views} views • Last updated: {updated}</text>
</svg>
"##,
        bg_from = c.bg_from,
        bg_mid = c.bg_mid,
        panel = c.panel,
        title = c.title,
        section = c.section,
        label = c.label,
        value = c.value,
        accent = c.accent,
        badge = c.badge,
        muted = c.muted,
        panel_h = height - 20,
        username = escape_xml(&stats.username),
        full_name = escape_xml(&stats.full_name),
        experience = escape_xml(&stats.experience),
        bio = escape_xml(&truncate(&stats.bio, BIO_CHARS)),
        total_commits = escape_xml(&stats.total_commits),
        total_repos = escape_xml(&stats.total_repos),
        total_stars = escape_xml(&stats.total_stars),
        current_streak = escape_xml(&stats.current_streak),
        longest_streak = escape_xml(&stats.longest_streak),
        day = escape_xml(&stats.most_commit_day),
        day_count = stats.most_commit_day_count,
        date = escape_xml(&stats.most_active_date),
        date_count = stats.most_active_date_count,
        project = escape_xml(&stats.most_commit_project),
        favourite = escape_xml(&stats.favourite_project),
        favourite_stars = stats.favourite_project_stars,
        badges = language_badges(&stats.languages),
        wakatime = wakatime_section(stats),
        views = stats.profile_views,
        updated = stats.updated_on.format("%-m/%-d/%Y"),
    )
}
