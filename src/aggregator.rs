//! Gathers everything a card needs for one user.
//!
//! `fetch` never fails. A broken profile or repository call yields the
//! fallback record, a broken contribution feed blanks only the fields derived
//! from it, and both are reported as [`FetchOutcome::Degraded`]. Commit
//! sampling and WakaTime failures are absorbed without degrading.

use crate::config::{Config, ProjectStrategy, ProjectsConfig};
use crate::contributions::ContributionsClient;
use crate::error::Result;
use crate::experience::experience_string;
use crate::github::{GithubClient, Repo};
use crate::metrics::{self, Metrics};
use crate::stats::{
    BIO_EMPTY, FetchOutcome, NOT_AVAILABLE, StatsRecord, format_count, format_days,
};
use crate::wakatime::WakaTimeClient;
use chrono::{NaiveDate, Utc};

/// Project with the most sampled commits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectEstimate {
    pub name: String,
    /// Commits on the sampled page; 0 for the recency proxy
    pub commits: usize,
}

pub struct StatsAggregator {
    github: GithubClient,
    contributions: ContributionsClient,
    wakatime: Option<WakaTimeClient>,
    projects: ProjectsConfig,
}

impl StatsAggregator {
    pub fn new(config: &Config) -> Result<Self> {
        let wakatime = WakaTimeClient::from_config(&config.wakatime)?;
        if wakatime.is_none() {
            tracing::info!("WAKATIME_API_KEY not set, coding-time stats disabled");
        }
        Ok(Self {
            github: GithubClient::new(&config.github)?,
            contributions: ContributionsClient::new(&config.contributions)?,
            wakatime,
            projects: config.projects.clone(),
        })
    }

    pub async fn fetch(&self, username: &str) -> FetchOutcome {
        self.fetch_on(username, Utc::now().date_naive()).await
    }

    /// `fetch` with an explicit "today", which anchors the current streak and
    /// the experience estimate.
    pub async fn fetch_on(&self, username: &str, today: NaiveDate) -> FetchOutcome {
        let profile = async {
            let user = self.github.user(username).await?;
            let repos = self.github.repos(username).await?;
            Ok::<_, crate::error::Error>((user, repos))
        };
        let (user, repos) = match profile.await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(username, error = %e, "Profile fetch failed, using fallback stats");
                return FetchOutcome::Degraded {
                    record: StatsRecord::fallback(username, today),
                    reason: format!("profile unavailable: {e}"),
                };
            }
        };

        let (contributions, feed_error) = match self.contributions.fetch(username).await {
            Ok(days) => (days, None),
            Err(e) => {
                tracing::warn!(username, error = %e, "Contribution feed failed");
                (Vec::new(), Some(e))
            }
        };

        let metrics = metrics::compute(&contributions, &repos, today);
        let project = self.most_committed_project(username, &repos, &metrics).await;
        let summary = metrics::summarize_repos(&repos);
        let (favourite_project, favourite_project_stars) = summary
            .favourite
            .unwrap_or_else(|| (NOT_AVAILABLE.to_string(), 0));

        let (most_commit_day, most_commit_day_count) = match metrics.most_active_weekday {
            Some((day, count)) => (metrics::weekday_name(day).to_string(), count),
            None => (NOT_AVAILABLE.to_string(), 0),
        };
        let (most_active_date, most_active_date_count) = match metrics.most_active_date {
            Some((date, count)) => (metrics::long_date(date), count),
            None => (NOT_AVAILABLE.to_string(), 0),
        };

        let wakatime = match &self.wakatime {
            Some(client) => match client.fetch().await {
                Ok(stats) => Some(stats),
                Err(e) => {
                    tracing::warn!(error = %e, "WakaTime enrichment failed, omitting");
                    None
                }
            },
            None => None,
        };

        let mut record = StatsRecord {
            username: user.login.clone(),
            full_name: user
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| user.login.clone()),
            bio: user
                .bio
                .filter(|b| !b.trim().is_empty())
                .unwrap_or_else(|| BIO_EMPTY.to_string()),
            experience: experience_string(user.created_at.date_naive(), today),
            total_repos: format_count(user.public_repos),
            total_stars: format_count(summary.total_stars),
            total_commits: format_count(metrics.total_contributions),
            current_streak: format_days(metrics.current_streak),
            longest_streak: format_days(metrics.longest_streak),
            most_commit_day,
            most_commit_day_count,
            most_active_date,
            most_active_date_count,
            most_commit_project: project.name,
            most_commit_project_count: project.commits,
            favourite_project,
            favourite_project_stars,
            languages: summary.languages,
            wakatime,
            profile_views: 0,
            updated_on: today,
        };

        match feed_error {
            None => {
                tracing::debug!(username, repos = repos.len(), "Stats gathered");
                FetchOutcome::Complete(record)
            }
            Some(e) => {
                record.clear_contribution_fields();
                FetchOutcome::Degraded {
                    record,
                    reason: format!("contributions unavailable: {e}"),
                }
            }
        }
    }

    async fn most_committed_project(
        &self,
        username: &str,
        repos: &[Repo],
        metrics: &Metrics,
    ) -> ProjectEstimate {
        let recency = || ProjectEstimate {
            name: metrics
                .most_recent_project
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            commits: 0,
        };

        match self.projects.strategy {
            ProjectStrategy::Recency => recency(),
            ProjectStrategy::Sample => self
                .sample_commits(username, repos)
                .await
                .unwrap_or_else(recency),
        }
    }

    /// Count one page of the user's commits in each of the first
    /// `sample_repos` repositories. Approximate by construction: no repo can
    /// score above `page_size`.
    pub async fn sample_commits(&self, username: &str, repos: &[Repo]) -> Option<ProjectEstimate> {
        let mut best: Option<ProjectEstimate> = None;

        for repo in repos.iter().take(self.projects.sample_repos) {
            let count = match self
                .github
                .commit_count(username, &repo.name, username, self.projects.page_size)
                .await
            {
                Ok(count) => count,
                Err(e) => {
                    tracing::debug!(repo = %repo.name, error = %e, "Skipping repo in commit sample");
                    continue;
                }
            };

            if count > 0 && best.as_ref().is_none_or(|b| count > b.commits) {
                best = Some(ProjectEstimate {
                    name: repo.name.clone(),
                    commits: count,
                });
            }
        }

        best
    }
}
