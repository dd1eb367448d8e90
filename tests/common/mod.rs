//! Local stand-ins for GitHub, the contribution feed and WakaTime.

#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::NaiveDate;
use devcard::config::{Config, ImageBackend, ProjectStrategy};
use serde_json::{Value, json};
use std::collections::HashMap;
use tokio::net::TcpListener;

pub const USER: &str = "ferris";

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
}

/// Which upstream pieces answer with an error
#[derive(Clone, Copy, Default)]
pub struct Failures {
    pub profile: bool,
    pub repos: bool,
    pub contributions: bool,
    pub commits: bool,
    pub wakatime: bool,
}

fn user_json() -> Value {
    json!({
        "login": USER,
        "name": "Ferris Crab",
        "bio": "Memory safe & proud",
        "public_repos": 3,
        "created_at": "2019-05-01T10:00:00Z"
    })
}

/// Repository listing plus the commit count each repo's history reports
#[derive(Clone)]
pub struct Repos {
    pub listing: Value,
    pub commits: HashMap<String, usize>,
}

impl Default for Repos {
    fn default() -> Self {
        Self {
            listing: json!([
                {"name": "claws", "stargazers_count": 120, "language": "Rust", "pushed_at": "2024-03-01T00:00:00Z"},
                {"name": "shell", "stargazers_count": 4, "language": "C", "pushed_at": "2024-03-10T00:00:00Z"},
                {"name": "tide", "stargazers_count": 9, "language": null, "pushed_at": null}
            ]),
            commits: [("claws", 40), ("shell", 12), ("tide", 0)]
                .into_iter()
                .map(|(name, n)| (name.to_string(), n))
                .collect(),
        }
    }
}

impl Repos {
    /// `repo-01..=repo-{count}` in listing order, where `repo-N` has N commits.
    pub fn numbered(count: usize) -> Self {
        let names: Vec<String> = (1..=count).map(|i| format!("repo-{i:02}")).collect();
        Self {
            listing: Value::Array(
                names
                    .iter()
                    .map(|name| json!({"name": name, "stargazers_count": 1, "language": "Rust", "pushed_at": null}))
                    .collect(),
            ),
            commits: names.into_iter().zip(1..).collect(),
        }
    }
}

/// 2024-03-01..=2024-03-10: a three-day run, a gap, then a five-day run that
/// ends yesterday relative to [`today`].
fn contributions_json() -> Value {
    json!({
        "total": {"2024": 30},
        "contributions": [
            {"date": "2024-03-01", "count": 2, "level": 1},
            {"date": "2024-03-02", "count": 1, "level": 1},
            {"date": "2024-03-03", "count": 3, "level": 2},
            {"date": "2024-03-04", "count": 0, "level": 0},
            {"date": "2024-03-05", "count": 0, "level": 0},
            {"date": "2024-03-06", "count": 4, "level": 2},
            {"date": "2024-03-07", "count": 2, "level": 1},
            {"date": "2024-03-08", "count": 9, "level": 4},
            {"date": "2024-03-09", "count": 1, "level": 1},
            {"date": "2024-03-10", "count": 8, "level": 4},
            {"date": "2024-03-11", "count": 0, "level": 0}
        ]
    })
}

fn wakatime_json(range: &str) -> Value {
    match range {
        "all_time" => json!({"data": {
            "total_seconds": 360000.0,
            "languages": [
                {"name": "C", "text": "10 hrs", "total_seconds": 36000},
                {"name": "Rust", "text": "90 hrs", "total_seconds": 324000}
            ],
            "operating_systems": [{"name": "Linux", "text": "100 hrs", "total_seconds": 360000}]
        }}),
        _ => json!({"data": {"human_readable_total": "6 hrs 30 mins"}}),
    }
}

fn fail() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "upstream down").into_response()
}

/// Start the fake upstream and return its base URL.
pub async fn spawn_upstream(failures: Failures) -> String {
    spawn_upstream_with(failures, Repos::default()).await
}

/// [`spawn_upstream`] with a custom repository listing.
pub async fn spawn_upstream_with(failures: Failures, repos: Repos) -> String {
    let Repos { listing, commits: commit_counts } = repos;

    let app = Router::new()
        .route(
            "/users/{user}",
            get(move |Path(_user): Path<String>| async move {
                if failures.profile { fail() } else { Json(user_json()).into_response() }
            }),
        )
        .route(
            "/users/{user}/repos",
            get(move |Path(_user): Path<String>| {
                let listing = listing.clone();
                async move {
                    if failures.repos {
                        (StatusCode::BAD_GATEWAY, "repos down").into_response()
                    } else {
                        Json(listing).into_response()
                    }
                }
            }),
        )
        .route(
            "/repos/{owner}/{repo}/commits",
            get(move |Path((_owner, repo)): Path<(String, String)>, Query(q): Query<HashMap<String, String>>| {
                let counts = commit_counts.clone();
                async move {
                    if failures.commits || q.get("author").map(String::as_str) != Some(USER) {
                        return fail();
                    }
                    let n = counts.get(repo.as_str()).copied().unwrap_or(0);
                    Json(vec![json!({"sha": "abc"}); n]).into_response()
                }
            }),
        )
        .route(
            "/v4/{user}",
            get(move |Path(_user): Path<String>| async move {
                if failures.contributions { fail() } else { Json(contributions_json()).into_response() }
            }),
        )
        .route(
            "/users/current/stats/{range}",
            get(move |Path(range): Path<String>, Query(q): Query<HashMap<String, String>>| async move {
                if failures.wakatime || q.get("api_key").map(String::as_str) != Some("waka-key") {
                    return fail();
                }
                Json(wakatime_json(&range)).into_response()
            }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Config pointing every client at `base`.
pub fn config_for(base: &str, wakatime_key: Option<&str>) -> Config {
    let mut config = Config::default();
    config.username = USER.to_string();
    config.github.api_base = base.to_string();
    config.contributions.api_base = base.to_string();
    config.wakatime.api_base = base.to_string();
    config.wakatime.api_key = wakatime_key.map(str::to_string);
    config.projects.strategy = ProjectStrategy::Sample;
    config.image.backend = ImageBackend::Markup;
    config
}

/// A base URL nothing listens on.
pub async fn dead_upstream() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
