//! metrics.rs
//!
//! Single-pass reduction of the daily contribution feed and the repository
//! list into the numbers shown on the card.
//!
//! Streak rules:
//!   • a streak is a run of consecutive calendar days with count > 0
//!   • a zero day or a missing date ends the run
//!   • the current streak is counted backwards from *yesterday*, since today
//!     may still be in progress
//!
//! Tie-breaks (deterministic for a given input):
//!   • weekday totals: buckets are kept in first-seen order over the sorted
//!     days, the bucket seen last wins a tie
//!   • single date: the earliest date wins a tie
//!   • favourite project: the repo listed last wins a tie

use crate::contributions::ContributionDay;
use crate::github::Repo;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use std::collections::{BTreeMap, HashSet};

/// Languages kept for the tech-stack section
pub const MAX_LANGUAGES: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metrics {
    pub total_contributions: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
    /// `None` when there were no contributions at all
    pub most_active_weekday: Option<(Weekday, u64)>,
    /// `None` when every day is zero
    pub most_active_date: Option<(NaiveDate, u32)>,
    pub most_recent_project: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSummary {
    pub total_stars: u64,
    pub favourite: Option<(String, u64)>,
    pub languages: Vec<String>,
}

/// Reduce contributions and repositories into card metrics.
pub fn compute(contributions: &[ContributionDay], repos: &[Repo], today: NaiveDate) -> Metrics {
    // Duplicate dates sum, so the total always equals the sum of the input.
    let mut by_date: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for day in contributions {
        let slot = by_date.entry(day.date).or_insert(0);
        *slot = slot.saturating_add(day.count);
    }

    let mut total = 0u64;
    let mut longest = 0u32;
    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;
    let mut weekdays: Vec<(Weekday, u64)> = Vec::with_capacity(7);
    let mut peak: Option<(NaiveDate, u32)> = None;

    for (&date, &count) in &by_date {
        total += u64::from(count);

        let adjacent = prev.and_then(|p| p.succ_opt()) == Some(date);
        if count > 0 {
            run = if adjacent { run + 1 } else { 1 };
            longest = longest.max(run);
        } else {
            run = 0;
        }
        prev = Some(date);

        let weekday = date.weekday();
        match weekdays.iter_mut().find(|(w, _)| *w == weekday) {
            Some((_, sum)) => *sum += u64::from(count),
            None => weekdays.push((weekday, u64::from(count))),
        }

        // Strictly greater keeps the earliest date on ties.
        if peak.is_none_or(|(_, best)| count > best) {
            peak = Some((date, count));
        }
    }

    let most_active_weekday = if total == 0 {
        None
    } else {
        weekdays
            .into_iter()
            .reduce(|best, next| if best.1 > next.1 { best } else { next })
    };

    Metrics {
        total_contributions: total,
        current_streak: current_streak(&by_date, today),
        longest_streak: longest,
        most_active_weekday,
        most_active_date: peak.filter(|(_, count)| *count > 0),
        most_recent_project: most_recent_project(repos),
    }
}

fn current_streak(by_date: &BTreeMap<NaiveDate, u32>, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = today.checked_sub_days(Days::new(1));
    while let Some(d) = day {
        match by_date.get(&d) {
            Some(&count) if count > 0 => {
                streak += 1;
                day = d.pred_opt();
            }
            _ => break,
        }
    }
    streak
}

/// Recency proxy for the most committed project: the latest `pushed_at`,
/// else the first listed repository.
pub fn most_recent_project(repos: &[Repo]) -> Option<String> {
    repos
        .iter()
        .filter(|r| r.pushed_at.is_some())
        .max_by_key(|r| r.pushed_at)
        .or_else(|| repos.first())
        .map(|r| r.name.clone())
}

pub fn summarize_repos(repos: &[Repo]) -> RepoSummary {
    let total_stars = repos.iter().map(|r| r.stargazers_count).sum();

    // max_by_key returns the last maximum.
    let favourite = repos
        .iter()
        .max_by_key(|r| r.stargazers_count)
        .map(|r| (r.name.clone(), r.stargazers_count));

    let mut seen = HashSet::new();
    let languages = repos
        .iter()
        .filter_map(|r| r.language.as_deref())
        .filter(|lang| seen.insert(*lang))
        .take(MAX_LANGUAGES)
        .map(str::to_string)
        .collect();

    RepoSummary {
        total_stars,
        favourite,
        languages,
    }
}

/// English weekday name ("Monday").
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Long date ("Monday, January 1, 2024").
pub fn long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Consecutive days starting at `start` with the given counts.
    fn series(start: NaiveDate, counts: &[u32]) -> Vec<ContributionDay> {
        counts
            .iter()
            .enumerate()
            .map(|(i, &c)| ContributionDay::new(start + Days::new(i as u64), c))
            .collect()
    }

    fn repo(name: &str, stars: u64, lang: Option<&str>, pushed_day: Option<u32>) -> Repo {
        Repo {
            name: name.to_string(),
            stargazers_count: stars,
            language: lang.map(str::to_string),
            pushed_at: pushed_day.map(|d| Utc.with_ymd_and_hms(2024, 5, d, 12, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_all_zero_series() {
        let today = date(2024, 3, 11);
        let days = series(date(2024, 3, 1), &[0; 11]);
        let m = compute(&days, &[], today);

        assert_eq!(m.total_contributions, 0);
        assert_eq!(m.current_streak, 0);
        assert_eq!(m.longest_streak, 0);
        assert_eq!(m.most_active_weekday, None);
        assert_eq!(m.most_active_date, None);
    }

    #[test]
    fn test_empty_series() {
        let m = compute(&[], &[], date(2024, 3, 11));
        assert_eq!(m, Metrics {
            total_contributions: 0,
            current_streak: 0,
            longest_streak: 0,
            most_active_weekday: None,
            most_active_date: None,
            most_recent_project: None,
        });
    }

    #[test]
    fn test_trailing_run_ending_yesterday() {
        // 2024-03-01..=2024-03-10, today is the 11th
        let today = date(2024, 3, 11);
        let days = series(date(2024, 3, 1), &[1, 1, 0, 2, 0, 3, 1, 4, 1, 5]);
        let m = compute(&days, &[], today);

        assert_eq!(m.current_streak, 5);
        assert_eq!(m.longest_streak, 5);
        assert_eq!(m.total_contributions, 18);
    }

    #[test]
    fn test_today_is_ignored_for_current_streak() {
        let today = date(2024, 3, 11);
        let mut days = series(date(2024, 3, 8), &[2, 2, 2]);
        days.push(ContributionDay::new(today, 0));
        assert_eq!(compute(&days, &[], today).current_streak, 3);

        // A contribution today does not extend a streak that broke yesterday.
        let days = series(date(2024, 3, 9), &[4, 0, 7]);
        assert_eq!(compute(&days, &[], today).current_streak, 0);
    }

    #[test]
    fn test_missing_day_breaks_streaks() {
        let today = date(2024, 3, 11);
        let mut days = series(date(2024, 3, 1), &[1, 1, 1]);
        days.extend(series(date(2024, 3, 9), &[1, 1]));
        let m = compute(&days, &[], today);

        assert_eq!(m.longest_streak, 3);
        assert_eq!(m.current_streak, 2);
    }

    #[test]
    fn test_unsorted_input_and_duplicates() {
        let today = date(2024, 3, 5);
        let days = vec![
            ContributionDay::new(date(2024, 3, 4), 1),
            ContributionDay::new(date(2024, 3, 2), 3),
            ContributionDay::new(date(2024, 3, 3), 2),
            ContributionDay::new(date(2024, 3, 3), 4),
        ];
        let m = compute(&days, &[], today);

        assert_eq!(m.total_contributions, 10);
        assert_eq!(m.longest_streak, 3);
        assert_eq!(m.current_streak, 3);
        assert_eq!(m.most_active_date, Some((date(2024, 3, 3), 6)));
    }

    #[test]
    fn test_total_independent_of_streak_boundaries() {
        let counts = [5, 0, 0, 9, 1, 0, 3];
        let days = series(date(2023, 12, 28), &counts);
        let m = compute(&days, &[], date(2024, 6, 1));
        assert_eq!(m.total_contributions, counts.iter().map(|&c| c as u64).sum::<u64>());
        assert_eq!(m.current_streak, 0);
        assert_eq!(m.longest_streak, 2);
    }

    #[test]
    fn test_most_active_weekday() {
        // 2024-03-04 is a Monday
        let days = series(date(2024, 3, 4), &[1, 8, 2, 0, 0, 0, 0, 1, 1]);
        let m = compute(&days, &[], date(2024, 4, 1));
        assert_eq!(m.most_active_weekday, Some((Weekday::Tue, 9)));
    }

    #[test]
    fn test_weekday_tie_goes_to_last_seen() {
        // Monday and Tuesday both total 4; Tuesday is first seen after Monday.
        let days = series(date(2024, 3, 4), &[4, 4]);
        let m = compute(&days, &[], date(2024, 4, 1));
        assert_eq!(m.most_active_weekday, Some((Weekday::Tue, 4)));
    }

    #[test]
    fn test_date_tie_is_earliest_and_repeatable() {
        let days = vec![
            ContributionDay::new(date(2024, 3, 9), 7),
            ContributionDay::new(date(2024, 3, 2), 7),
            ContributionDay::new(date(2024, 3, 5), 1),
        ];
        let first = compute(&days, &[], date(2024, 4, 1));
        let mut reversed = days.clone();
        reversed.reverse();
        let second = compute(&reversed, &[], date(2024, 4, 1));

        assert_eq!(first.most_active_date, Some((date(2024, 3, 2), 7)));
        assert_eq!(first, second);
    }

    #[test]
    fn test_most_recent_project() {
        let repos = vec![
            repo("old", 0, None, Some(1)),
            repo("never-pushed", 0, None, None),
            repo("fresh", 0, None, Some(20)),
        ];
        assert_eq!(most_recent_project(&repos).as_deref(), Some("fresh"));

        let unpushed = vec![repo("first", 0, None, None), repo("second", 0, None, None)];
        assert_eq!(most_recent_project(&unpushed).as_deref(), Some("first"));
        assert_eq!(most_recent_project(&[]), None);
    }

    #[test]
    fn test_summarize_repos() {
        let repos = vec![
            repo("a", 3, Some("Rust"), None),
            repo("b", 10, Some("Go"), None),
            repo("c", 10, Some("Rust"), None),
            repo("d", 0, None, None),
            repo("e", 1, Some("C"), None),
            repo("f", 1, Some("Zig"), None),
            repo("g", 1, Some("Lua"), None),
            repo("h", 1, Some("Nix"), None),
            repo("i", 1, Some("Elm"), None),
        ];
        let summary = summarize_repos(&repos);

        assert_eq!(summary.total_stars, 28);
        assert_eq!(summary.favourite, Some(("c".to_string(), 10)));
        assert_eq!(summary.languages, vec!["Rust", "Go", "C", "Zig", "Lua", "Nix"]);
    }

    #[test]
    fn test_formatting_helpers() {
        assert_eq!(weekday_name(Weekday::Sun), "Sunday");
        assert_eq!(long_date(date(2024, 1, 1)), "Monday, January 1, 2024");
    }
}
