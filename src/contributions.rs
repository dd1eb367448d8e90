use crate::config::ContributionsConfig;
use crate::error::{Error, Result};
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

/// Contribution count for one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ContributionDay {
    pub date: NaiveDate,
    pub count: u32,
}

impl ContributionDay {
    pub fn new(date: NaiveDate, count: u32) -> Self {
        Self { date, count }
    }
}

/// Client for the public daily-contribution feed (`{base}/v4/{username}`).
#[derive(Clone)]
pub struct ContributionsClient {
    base: String,
    http: Client,
}

impl ContributionsClient {
    pub fn new(config: &ContributionsConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("devcard/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base: config.api_base.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Every day the feed knows about, in the order it returned them.
    pub async fn fetch(&self, username: &str) -> Result<Vec<ContributionDay>> {
        #[derive(Deserialize)]
        struct FeedResponse {
            #[serde(default)]
            contributions: Vec<ContributionDay>,
        }

        let url = format!("{}/v4/{username}", self.base);
        let resp = self.http.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url,
            });
        }

        let json: Value = resp.json().await?;
        let parsed: FeedResponse = serde_json::from_value(json).map_err(|source| Error::Json {
            context: "contribution feed",
            source,
        })?;

        tracing::debug!(username, days = parsed.contributions.len(), "Fetched contribution feed");
        Ok(parsed.contributions)
    }
}
