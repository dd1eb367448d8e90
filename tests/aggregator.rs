//! End-to-end tests for stats gathering against local fake upstreams.

mod common;

use common::{Failures, Repos, USER, config_for, dead_upstream, spawn_upstream, spawn_upstream_with, today};
use devcard::aggregator::StatsAggregator;
use devcard::config::ProjectStrategy;
use devcard::stats::{BIO_UNAVAILABLE, FetchOutcome, NOT_AVAILABLE, StatsRecord};

async fn fetch(failures: Failures, wakatime_key: Option<&str>, strategy: ProjectStrategy) -> FetchOutcome {
    devcard::logging::init_test();
    let base = spawn_upstream(failures).await;
    let mut config = config_for(&base, wakatime_key);
    config.projects.strategy = strategy;
    let aggregator = StatsAggregator::new(&config).unwrap();
    aggregator.fetch_on(USER, today()).await
}

fn contribution_fields(record: &StatsRecord) -> [&str; 5] {
    [
        record.total_commits.as_str(),
        record.current_streak.as_str(),
        record.longest_streak.as_str(),
        record.most_commit_day.as_str(),
        record.most_active_date.as_str(),
    ]
}

// ============================================
// Full success
// ============================================

#[tokio::test]
async fn test_complete_record() {
    let outcome = fetch(Failures::default(), None, ProjectStrategy::Sample).await;
    assert!(!outcome.is_degraded());
    let r = outcome.record();

    assert_eq!(r.username, USER);
    assert_eq!(r.full_name, "Ferris Crab");
    assert_eq!(r.bio, "Memory safe & proud");
    assert_eq!(r.experience, "5+ years");
    assert_eq!(r.total_repos, "3");
    assert_eq!(r.total_stars, "133");
    assert_eq!(r.total_commits, "30");
    assert_eq!(r.current_streak, "5 days");
    assert_eq!(r.longest_streak, "5 days");
    // Friday and Sunday both total 11; Sunday is seen later.
    assert_eq!(r.most_commit_day, "Sunday");
    assert_eq!(r.most_commit_day_count, 11);
    assert_eq!(r.most_active_date, "Friday, March 8, 2024");
    assert_eq!(r.most_active_date_count, 9);
    assert_eq!(r.favourite_project, "claws");
    assert_eq!(r.favourite_project_stars, 120);
    assert_eq!(r.languages, vec!["Rust", "C"]);
    assert_eq!(r.updated_on, today());
    assert!(r.wakatime.is_none());
}

#[tokio::test]
async fn test_sample_strategy_counts_commits() {
    let outcome = fetch(Failures::default(), None, ProjectStrategy::Sample).await;
    assert_eq!(outcome.record().most_commit_project, "claws");
    assert_eq!(outcome.record().most_commit_project_count, 40);
}

#[tokio::test]
async fn test_sample_only_covers_first_ten_repos() {
    devcard::logging::init_test();
    // repo-11 and repo-12 have the most commits but fall outside the sample.
    let base = spawn_upstream_with(Failures::default(), Repos::numbered(12)).await;
    let aggregator = StatsAggregator::new(&config_for(&base, None)).unwrap();

    let outcome = aggregator.fetch_on(USER, today()).await;
    assert!(!outcome.is_degraded());
    assert_eq!(outcome.record().total_repos, "3");
    assert_eq!(outcome.record().most_commit_project, "repo-10");
    assert_eq!(outcome.record().most_commit_project_count, 10);
}

#[tokio::test]
async fn test_recency_strategy_uses_latest_push() {
    let outcome = fetch(Failures::default(), None, ProjectStrategy::Recency).await;
    assert_eq!(outcome.record().most_commit_project, "shell");
    assert_eq!(outcome.record().most_commit_project_count, 0);
}

#[tokio::test]
async fn test_wakatime_enrichment() {
    let outcome = fetch(Failures::default(), Some("waka-key"), ProjectStrategy::Sample).await;
    assert!(!outcome.is_degraded());
    let w = outcome.record().wakatime.clone().expect("wakatime stats");

    assert_eq!(w.total_hours, "100 hrs");
    assert_eq!(w.last_7_days_total, "6 hrs 30 mins");
    assert_eq!(w.top_language, "Rust");
    assert_eq!(w.top_language_time, "90 hrs");
    assert_eq!(w.second_language, "C");
    assert_eq!(w.second_language_time, "10 hrs");
    assert_eq!(w.top_os, "Linux");
}

// ============================================
// Fail-soft paths
// ============================================

#[tokio::test]
async fn test_profile_failure_yields_fallback() {
    let outcome = fetch(
        Failures {
            profile: true,
            ..Failures::default()
        },
        None,
        ProjectStrategy::Sample,
    )
    .await;

    let FetchOutcome::Degraded { record, reason } = outcome else {
        panic!("expected degraded outcome");
    };
    assert!(reason.contains("profile"));
    assert_eq!(record, StatsRecord::fallback(USER, today()));
    assert_eq!(record.bio, BIO_UNAVAILABLE);
}

#[tokio::test]
async fn test_repo_listing_failure_yields_fallback() {
    let outcome = fetch(
        Failures {
            repos: true,
            ..Failures::default()
        },
        None,
        ProjectStrategy::Sample,
    )
    .await;

    let FetchOutcome::Degraded { record, reason } = outcome else {
        panic!("expected degraded outcome");
    };
    assert!(reason.starts_with("profile unavailable"), "{reason}");
    assert!(reason.contains("502"), "{reason}");
    assert_eq!(record, StatsRecord::fallback(USER, today()));
}

#[tokio::test]
async fn test_unreachable_upstream_yields_fallback() {
    devcard::logging::init_test();
    let base = dead_upstream().await;
    let aggregator = StatsAggregator::new(&config_for(&base, Some("waka-key"))).unwrap();

    let outcome = aggregator.fetch_on(USER, today()).await;
    assert!(outcome.is_degraded());
    assert_eq!(outcome.into_record(), StatsRecord::fallback(USER, today()));
}

#[tokio::test]
async fn test_contribution_failure_blanks_derived_fields() {
    let outcome = fetch(
        Failures {
            contributions: true,
            ..Failures::default()
        },
        None,
        ProjectStrategy::Sample,
    )
    .await;

    assert!(outcome.is_degraded());
    assert!(outcome.reason().unwrap().contains("contributions"));
    let r = outcome.record();
    for field in contribution_fields(r) {
        assert_eq!(field, NOT_AVAILABLE);
    }
    assert_eq!(r.most_commit_day_count, 0);
    assert_eq!(r.most_active_date_count, 0);
    // Profile and repository data survive.
    assert_eq!(r.full_name, "Ferris Crab");
    assert_eq!(r.total_stars, "133");
    assert_eq!(r.most_commit_project, "claws");
}

#[tokio::test]
async fn test_commit_sampling_failure_falls_back_to_recency() {
    let outcome = fetch(
        Failures {
            commits: true,
            ..Failures::default()
        },
        None,
        ProjectStrategy::Sample,
    )
    .await;

    assert!(!outcome.is_degraded());
    assert_eq!(outcome.record().most_commit_project, "shell");
    assert_eq!(outcome.record().most_commit_project_count, 0);
}

#[tokio::test]
async fn test_wakatime_failure_is_not_degraded() {
    let outcome = fetch(
        Failures {
            wakatime: true,
            ..Failures::default()
        },
        Some("waka-key"),
        ProjectStrategy::Sample,
    )
    .await;

    assert!(!outcome.is_degraded());
    assert!(outcome.record().wakatime.is_none());
    assert_eq!(outcome.record().total_commits, "30");
}
