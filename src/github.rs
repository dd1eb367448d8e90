use crate::config::GithubConfig;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::Value;
use std::sync::Arc;

/// Public profile fields used on the card
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub login: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    #[serde(default)]
    pub public_repos: u64,
    pub created_at: DateTime<Utc>,
}

/// Repository fields used by the metrics
#[derive(Debug, Clone, Deserialize)]
pub struct Repo {
    pub name: String,
    #[serde(default)]
    pub stargazers_count: u64,
    pub language: Option<String>,
    pub pushed_at: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct GithubClient {
    base: Arc<String>,
    token: Option<Arc<String>>,
    http: Arc<Client>,
}

impl GithubClient {
    /// Create a REST client. Without a token requests go out unauthenticated
    /// and run into the much lower anonymous rate limit.
    pub fn new(config: &GithubConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("devcard/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base: Arc::new(config.api_base.trim_end_matches('/').to_string()),
            token: config.token.clone().map(Arc::new),
            http: Arc::new(http),
        })
    }

    /// Low-level GET returning the decoded body. Non-2xx is an error; nothing
    /// is retried.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        context: &'static str,
    ) -> Result<T> {
        let url = format!("{}{path}", self.base);

        let mut req = self
            .http
            .get(&url)
            .query(query)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        if let Some(token) = &self.token {
            req = req.bearer_auth(token.as_str());
        }

        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url,
            });
        }

        let json: Value = resp.json().await?;
        serde_json::from_value(json).map_err(|source| Error::Json { context, source })
    }

    /// Fetch the public profile of `username`.
    pub async fn user(&self, username: &str) -> Result<User> {
        self.get_json(&format!("/users/{username}"), &[], "user profile")
            .await
    }

    /// First 100 public repositories, most recently updated first.
    pub async fn repos(&self, username: &str) -> Result<Vec<Repo>> {
        self.get_json(
            &format!("/users/{username}/repos"),
            &[("per_page", "100"), ("sort", "updated")],
            "repository list",
        )
        .await
    }

    /// Number of commits by `author` on one page of `owner/repo` history.
    /// Capped at `page_size`; this is a sample, not a total.
    pub async fn commit_count(
        &self,
        owner: &str,
        repo: &str,
        author: &str,
        page_size: u32,
    ) -> Result<usize> {
        let per_page = page_size.to_string();
        let commits: Vec<IgnoredAny> = self
            .get_json(
                &format!("/repos/{owner}/{repo}/commits"),
                &[("author", author), ("per_page", per_page.as_str())],
                "commit list",
            )
            .await?;
        Ok(commits.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_tolerates_missing_fields() {
        let repo: Repo = serde_json::from_str(r#"{"name":"empty","language":null}"#).unwrap();
        assert_eq!(repo.name, "empty");
        assert_eq!(repo.stargazers_count, 0);
        assert!(repo.pushed_at.is_none());
    }

    #[test]
    fn test_user_parses_rest_payload() {
        let user: User = serde_json::from_str(
            r#"{
                "login": "octocat",
                "name": null,
                "bio": "hi",
                "public_repos": 8,
                "created_at": "2011-01-25T18:44:36Z",
                "followers": 100
            }"#,
        )
        .unwrap();
        assert_eq!(user.login, "octocat");
        assert!(user.name.is_none());
        assert_eq!(user.public_repos, 8);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = GithubConfig {
            api_base: "http://localhost:1234/".into(),
            ..GithubConfig::default()
        };
        let client = GithubClient::new(&config).unwrap();
        assert_eq!(client.base.as_str(), "http://localhost:1234");
    }
}
