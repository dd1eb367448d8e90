//! Structured card layout compiled to SVG.
//!
//! The card is described as a flat list of positioned nodes over a gradient
//! background and compiled in one pass. Coordinates are absolute; there is
//! no flow layout.

use super::escape_xml;
use crate::stats::StatsRecord;
use std::fmt::Write;

const WIDTH: f32 = 800.0;
const HEIGHT_WITH_WAKATIME: f32 = 1350.0;
const HEIGHT_PLAIN: f32 = 1100.0;
const FONT: &str = "system-ui, -apple-system, sans-serif";
const LANGUAGE_COLUMNS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_str(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

/// Run of text with an optional colour override
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub fill: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub x: f32,
    pub y: f32,
    pub size: u32,
    pub weight: Option<u32>,
    pub fill: &'static str,
    pub anchor: Anchor,
    pub italic: bool,
    pub letter_spacing: Option<f32>,
    pub spans: Vec<Span>,
}

impl Text {
    pub fn new(x: f32, y: f32, size: u32, fill: &'static str, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            size,
            weight: None,
            fill,
            anchor: Anchor::Start,
            italic: false,
            letter_spacing: None,
            spans: vec![Span {
                text: text.into(),
                fill: None,
            }],
        }
    }

    pub fn weight(mut self, weight: u32) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn spacing(mut self, spacing: f32) -> Self {
        self.letter_spacing = Some(spacing);
        self
    }

    /// Append a differently coloured run after the existing text.
    pub fn span(mut self, text: impl Into<String>, fill: &'static str) -> Self {
        self.spans.push(Span {
            text: text.into(),
            fill: Some(fill),
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        rx: f32,
        fill: &'static str,
        stroke: &'static str,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        stroke: &'static str,
        width: f32,
    },
    Text(Text),
}

/// Two-stop vertical-diagonal gradient referenced by id
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub id: &'static str,
    pub from: &'static str,
    pub to: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    pub gradients: Vec<Gradient>,
    /// Fill of the full-size background rectangle
    pub background: &'static str,
    pub nodes: Vec<Node>,
}

impl Layout {
    pub fn new(width: f32, height: f32, background: &'static str) -> Self {
        Self {
            width,
            height,
            gradients: Vec::new(),
            background,
            nodes: Vec::new(),
        }
    }

    pub fn gradient(&mut self, id: &'static str, from: &'static str, to: &'static str) {
        self.gradients.push(Gradient { id, from, to });
    }

    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, fill: &'static str, stroke: &'static str) {
        self.nodes.push(Node::Rect {
            x,
            y,
            width,
            height,
            rx: 8.0,
            fill,
            stroke,
        });
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, stroke: &'static str, width: f32) {
        self.nodes.push(Node::Line {
            x1,
            y1,
            x2,
            y2,
            stroke,
            width,
        });
    }

    pub fn text(&mut self, text: Text) {
        self.nodes.push(Node::Text(text));
    }

    /// Compile to an SVG document
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}" xmlns="http://www.w3.org/2000/svg">"#,
            w = self.width,
            h = self.height
        );

        if !self.gradients.is_empty() {
            out.push_str("  <defs>\n");
            for g in &self.gradients {
                let _ = writeln!(
                    out,
                    r#"    <linearGradient id="{id}" x1="0%" y1="0%" x2="100%" y2="100%"><stop offset="0%" stop-color="{from}"/><stop offset="100%" stop-color="{to}"/></linearGradient>"#,
                    id = g.id,
                    from = g.from,
                    to = g.to
                );
            }
            out.push_str("  </defs>\n");
        }

        let _ = writeln!(
            out,
            r#"  <rect width="{}" height="{}" fill="{}"/>"#,
            self.width, self.height, self.background
        );

        for node in &self.nodes {
            write_node(&mut out, node);
        }

        out.push_str("</svg>\n");
        out
    }
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Rect {
            x,
            y,
            width,
            height,
            rx,
            fill,
            stroke,
        } => {
            let _ = writeln!(
                out,
                r#"  <rect x="{x}" y="{y}" width="{width}" height="{height}" rx="{rx}" fill="{fill}" stroke="{stroke}" stroke-width="1"/>"#
            );
        }
        Node::Line {
            x1,
            y1,
            x2,
            y2,
            stroke,
            width,
        } => {
            let _ = writeln!(
                out,
                r#"  <line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="{stroke}" stroke-width="{width}"/>"#
            );
        }
        Node::Text(t) => {
            let _ = write!(
                out,
                r#"  <text x="{}" y="{}" font-family="{FONT}" font-size="{}" fill="{}""#,
                t.x, t.y, t.size, t.fill
            );
            if let Some(weight) = t.weight {
                let _ = write!(out, r#" font-weight="{weight}""#);
            }
            if t.italic {
                out.push_str(r#" font-style="italic""#);
            }
            if let Some(spacing) = t.letter_spacing {
                let _ = write!(out, r#" letter-spacing="{spacing}""#);
            }
            if t.anchor != Anchor::Start {
                let _ = write!(out, r#" text-anchor="{}""#, t.anchor.as_str());
            }
            out.push('>');
            for span in &t.spans {
                match span.fill {
                    Some(fill) => {
                        let _ = write!(out, r#"<tspan fill="{fill}">{}</tspan>"#, escape_xml(&span.text));
                    }
                    None => out.push_str(&escape_xml(&span.text)),
                }
            }
            out.push_str("</text>\n");
        }
    }
}

fn label(x: f32, y: f32, text: &str) -> Text {
    Text::new(x, y, 13, "#888888", text)
}

fn heading(x: f32, y: f32, text: &str) -> Text {
    Text::new(x, y, 14, "#666666", text).spacing(1.0)
}

/// Lay out the full card for `stats`.
pub fn stats_card(stats: &StatsRecord) -> Layout {
    let height = if stats.wakatime.is_some() {
        HEIGHT_WITH_WAKATIME
    } else {
        HEIGHT_PLAIN
    };
    let mut card = Layout::new(WIDTH, height, "url(#bgGradient)");
    card.gradient("bgGradient", "#000000", "#0a0a0a");
    card.gradient("streakGradient", "#1a1a1a", "#0f0f0f");

    // Header
    card.text(
        Text::new(40.0, 70.0, 32, "#ffffff", &stats.full_name)
            .weight(700)
            .spacing(-0.5),
    );
    card.text(Text::new(
        40.0,
        100.0,
        16,
        "#666666",
        format!("@{} • {} experience", stats.username, stats.experience),
    ));
    card.text(
        Text::new(760.0, 100.0, 14, "#666666", format!("👁️ {} views", stats.profile_views))
            .anchor(Anchor::End),
    );
    card.line(40.0, 120.0, 760.0, 120.0, "#1a1a1a", 2.0);
    card.text(Text::new(40.0, 165.0, 18, "#999999", format!("\"{}\"", stats.bio)).italic());

    // Totals
    for (i, (title, value)) in [
        ("COMMITS", &stats.total_commits),
        ("REPOS", &stats.total_repos),
        ("STARS", &stats.total_stars),
    ]
    .into_iter()
    .enumerate()
    {
        let x = 40.0 + i as f32 * 247.0;
        card.rect(x, 210.0, 226.0, 100.0, "#111111", "#1f1f1f");
        card.text(Text::new(x + 24.0, 235.0, 13, "#666666", title).spacing(1.0));
        card.text(Text::new(x + 24.0, 275.0, 36, "#ffffff", value.as_str()).weight(700));
    }

    // Streaks
    for (i, (title, value)) in [
        ("🔥 Current Streak", &stats.current_streak),
        ("📈 Longest Streak", &stats.longest_streak),
    ]
    .into_iter()
    .enumerate()
    {
        let x = 40.0 + i as f32 * 370.0;
        card.rect(x, 340.0, 350.0, 100.0, "url(#streakGradient)", "#2a2a2a");
        card.text(label(x + 24.0, 370.0, title));
        card.text(Text::new(x + 24.0, 415.0, 32, "#ffffff", value.as_str()).weight(700));
    }

    // Activity insights
    card.rect(40.0, 470.0, 720.0, 130.0, "#0d0d0d", "#1a1a1a");
    card.text(heading(64.0, 500.0, "ACTIVITY INSIGHTS"));
    card.text(label(64.0, 530.0, "Most Active Day"));
    card.text(Text::new(64.0, 555.0, 16, "#ffffff", &stats.most_commit_day).weight(600));
    card.text(Text::new(
        64.0,
        575.0,
        12,
        "#555555",
        format!("{} commits", stats.most_commit_day_count),
    ));
    card.text(label(314.0, 530.0, "Peak Date"));
    card.text(Text::new(314.0, 555.0, 16, "#ffffff", &stats.most_active_date).weight(600));
    card.text(Text::new(
        314.0,
        575.0,
        12,
        "#555555",
        format!("{} commits", stats.most_active_date_count),
    ));

    // Projects
    card.text(heading(40.0, 645.0, "NOTABLE PROJECTS"));
    card.rect(40.0, 665.0, 350.0, 90.0, "#0d0d0d", "#1a1a1a");
    card.text(Text::new(56.0, 690.0, 12, "#777777", "Most Commits"));
    let mut most = Text::new(56.0, 720.0, 16, "#ffffff", &stats.most_commit_project).weight(600);
    if stats.most_commit_project_count > 0 {
        most = most.span(format!(" ({} commits)", stats.most_commit_project_count), "#ffffff");
    }
    card.text(most);
    card.rect(410.0, 665.0, 350.0, 90.0, "#0d0d0d", "#1a1a1a");
    card.text(Text::new(426.0, 690.0, 12, "#777777", "⭐ Fan Favorite"));
    card.text(Text::new(426.0, 720.0, 16, "#ffffff", &stats.favourite_project).weight(600));
    card.text(Text::new(
        426.0,
        740.0,
        12,
        "#555555",
        format!("{} stars", stats.favourite_project_stars),
    ));

    // Tech stack
    card.text(heading(40.0, 810.0, "TECH STACK"));
    for (idx, lang) in stats.languages.iter().enumerate() {
        let x = 40.0 + (idx % LANGUAGE_COLUMNS) as f32 * 145.0;
        let y = 830.0 + (idx / LANGUAGE_COLUMNS) as f32 * 50.0;
        card.nodes.push(Node::Rect {
            x,
            y,
            width: 135.0,
            height: 40.0,
            rx: 6.0,
            fill: "#111111",
            stroke: "#1f1f1f",
        });
        card.text(
            Text::new(x + 67.5, y + 25.0, 14, "#cccccc", lang.as_str())
                .weight(500)
                .anchor(Anchor::Middle),
        );
    }

    // Coding time
    if let Some(w) = &stats.wakatime {
        card.text(heading(40.0, 975.0, "WAKATIME STATS"));
        card.rect(40.0, 995.0, 720.0, 220.0, "#0d0d0d", "#1a1a1a");
        for (x, title, value) in [
            (64.0, "Total Hours (All Time)", &w.total_hours),
            (290.0, "Last 7 Days", &w.last_7_days_total),
            (490.0, "Top OS", &w.top_os),
        ] {
            card.text(label(x, 1025.0, title));
            card.text(Text::new(x, 1055.0, 28, "#ffffff", value.as_str()).weight(700));
        }
        card.line(64.0, 1085.0, 736.0, 1085.0, "#1a1a1a", 1.0);
        card.text(label(64.0, 1110.0, "Favorite Languages (All Time)"));
        card.text(
            Text::new(64.0, 1145.0, 18, "#ffffff", format!("1. {} ", w.top_language))
                .weight(600)
                .span(&w.top_language_time, "#666666"),
        );
        card.text(
            Text::new(64.0, 1180.0, 18, "#ffffff", format!("2. {} ", w.second_language))
                .weight(600)
                .span(&w.second_language_time, "#666666"),
        );
    }

    // Footer
    let footer = height - 90.0;
    card.line(40.0, footer, 760.0, footer, "#1a1a1a", 1.0);
    card.text(Text::new(
        40.0,
        footer + 30.0,
        12,
        "#444444",
        format!("github.com/{}", stats.username),
    ));
    card.text(
        Text::new(
            760.0,
            footer + 30.0,
            12,
            "#444444",
            format!("Updated {}", stats.updated_on.format("%-m/%-d/%Y")),
        )
        .anchor(Anchor::End),
    );

    card
}
