//! experience.rs
//!
//! Rough "years on GitHub" label shown on the card. The estimate is the
//! difference between calendar years, not elapsed time: an account created
//! in December 2020 already reads "4+ years" on 1 January 2024. Anything below
//! one calendar year (or a creation date in the future) reads "< 1 year".

use chrono::{Datelike, NaiveDate};

/// Returns the experience label for an account created on `created`
pub fn experience_string(created: NaiveDate, today: NaiveDate) -> String {
    let years = today.year() - created.year();
    if years > 0 {
        format!("{years}+ years")
    } else {
        "< 1 year".to_string()
    }
}
