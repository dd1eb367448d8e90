use chrono::NaiveDate;

/// Placeholder shown for any value that could not be determined.
pub const NOT_AVAILABLE: &str = "N/A";

/// Bio shown when the profile itself could not be fetched.
pub const BIO_UNAVAILABLE: &str = "Unable to fetch bio";

/// Bio shown when the profile has none.
pub const BIO_EMPTY: &str = "No bio available";

/// Everything a card needs, already formatted for display.
///
/// String fields never hold an empty "unknown": they carry [`NOT_AVAILABLE`]
/// instead, so renderers can interpolate them without branching.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsRecord {
    pub username: String,
    pub full_name: String,
    pub bio: String,
    pub experience: String,
    pub total_repos: String,
    pub total_stars: String,
    pub total_commits: String,
    pub current_streak: String,
    pub longest_streak: String,
    pub most_commit_day: String,
    pub most_commit_day_count: u64,
    pub most_active_date: String,
    pub most_active_date_count: u32,
    pub most_commit_project: String,
    /// Commits counted in the sampled page; 0 when the recency proxy was used
    pub most_commit_project_count: usize,
    pub favourite_project: String,
    pub favourite_project_stars: u64,
    pub languages: Vec<String>,
    pub wakatime: Option<WakaTimeStats>,
    pub profile_views: u64,
    pub updated_on: NaiveDate,
}

/// Coding-time summary from WakaTime
#[derive(Debug, Clone, PartialEq)]
pub struct WakaTimeStats {
    pub total_hours: String,
    pub last_7_days_total: String,
    pub top_language: String,
    pub top_language_time: String,
    pub second_language: String,
    pub second_language_time: String,
    pub top_os: String,
}

impl StatsRecord {
    /// Record used when the profile or repository listing is unavailable.
    pub fn fallback(username: &str, updated_on: NaiveDate) -> Self {
        let na = || NOT_AVAILABLE.to_string();
        Self {
            username: username.to_string(),
            full_name: username.to_string(),
            bio: BIO_UNAVAILABLE.to_string(),
            experience: na(),
            total_repos: na(),
            total_stars: na(),
            total_commits: na(),
            current_streak: na(),
            longest_streak: na(),
            most_commit_day: na(),
            most_commit_day_count: 0,
            most_active_date: na(),
            most_active_date_count: 0,
            most_commit_project: na(),
            most_commit_project_count: 0,
            favourite_project: na(),
            favourite_project_stars: 0,
            languages: Vec::new(),
            wakatime: None,
            profile_views: 0,
            updated_on,
        }
    }

    /// Blank every field derived from the contribution feed.
    pub fn clear_contribution_fields(&mut self) {
        self.total_commits = NOT_AVAILABLE.to_string();
        self.current_streak = NOT_AVAILABLE.to_string();
        self.longest_streak = NOT_AVAILABLE.to_string();
        self.most_commit_day = NOT_AVAILABLE.to_string();
        self.most_commit_day_count = 0;
        self.most_active_date = NOT_AVAILABLE.to_string();
        self.most_active_date_count = 0;
    }

    pub fn with_profile_views(mut self, views: u64) -> Self {
        self.profile_views = views;
        self
    }
}

/// Result of gathering stats. Both arms carry a renderable record.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Every required upstream answered
    Complete(StatsRecord),
    /// Some upstream failed; the record holds sentinels where data is missing
    Degraded { record: StatsRecord, reason: String },
}

impl FetchOutcome {
    pub fn record(&self) -> &StatsRecord {
        match self {
            FetchOutcome::Complete(record) => record,
            FetchOutcome::Degraded { record, .. } => record,
        }
    }

    pub fn into_record(self) -> StatsRecord {
        match self {
            FetchOutcome::Complete(record) => record,
            FetchOutcome::Degraded { record, .. } => record,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, FetchOutcome::Degraded { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            FetchOutcome::Complete(_) => None,
            FetchOutcome::Degraded { reason, .. } => Some(reason),
        }
    }
}

/// Format an integer with `,` thousands separators.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_days(n: u32) -> String {
    format!("{n} days")
}
