//! Optional WakaTime enrichment.
//!
//! Two calls: all-time stats for totals and favourite languages, last seven
//! days for the recent total. The caller treats any error as "no data".

use crate::config::WakaTimeConfig;
use crate::error::{Error, Result};
use crate::stats::{NOT_AVAILABLE, WakaTimeStats, format_count};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct StatsEnvelope {
    data: StatsData,
}

#[derive(Debug, Default, Deserialize)]
struct StatsData {
    #[serde(default)]
    total_seconds: f64,
    human_readable_total: Option<String>,
    #[serde(default)]
    languages: Vec<Entry>,
    #[serde(default)]
    operating_systems: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    name: String,
    text: Option<String>,
    #[serde(default)]
    total_seconds: f64,
}

#[derive(Clone)]
pub struct WakaTimeClient {
    base: String,
    api_key: String,
    http: Client,
}

impl WakaTimeClient {
    /// Returns `None` when no API key is configured.
    pub fn from_config(config: &WakaTimeConfig) -> Result<Option<Self>> {
        let Some(api_key) = config.api_key.clone() else {
            return Ok(None);
        };
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("devcard/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Some(Self {
            base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
            http,
        }))
    }

    async fn range(&self, range: &str) -> Result<StatsData> {
        let url = format!("{}/users/current/stats/{range}", self.base);
        let resp = self
            .http
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| e.without_url())?;

        let status = resp.status();
        if !status.is_success() {
            // The key travels in the query string, keep it out of the error.
            return Err(Error::Status {
                status: status.as_u16(),
                url,
            });
        }

        let json: Value = resp.json().await.map_err(|e| e.without_url())?;
        let envelope: StatsEnvelope = serde_json::from_value(json).map_err(|source| Error::Json {
            context: "wakatime stats",
            source,
        })?;
        Ok(envelope.data)
    }

    pub async fn fetch(&self) -> Result<WakaTimeStats> {
        let all_time = self.range("all_time").await?;
        let last_week = self.range("last_7_days").await?;
        Ok(summarize(all_time, last_week))
    }
}

fn summarize(all_time: StatsData, last_week: StatsData) -> WakaTimeStats {
    let mut languages = all_time.languages;
    languages.sort_by(|a, b| b.total_seconds.total_cmp(&a.total_seconds));
    let mut languages = languages.into_iter();

    let (top_language, top_language_time) = entry_or_na(languages.next());
    let (second_language, second_language_time) = entry_or_na(languages.next());

    let top_os = all_time
        .operating_systems
        .into_iter()
        .max_by(|a, b| a.total_seconds.total_cmp(&b.total_seconds))
        .map(|os| os.name)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let last_7_days_total = last_week
        .human_readable_total
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    WakaTimeStats {
        total_hours: format!("{} hrs", format_count((all_time.total_seconds / 3600.0) as u64)),
        last_7_days_total,
        top_language,
        top_language_time,
        second_language,
        second_language_time,
        top_os,
    }
}

fn entry_or_na(entry: Option<Entry>) -> (String, String) {
    match entry {
        Some(e) => (e.name, e.text.unwrap_or_else(|| NOT_AVAILABLE.to_string())),
        None => (NOT_AVAILABLE.to_string(), NOT_AVAILABLE.to_string()),
    }
}
