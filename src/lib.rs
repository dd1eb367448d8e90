//! devcard: developer stats cards from GitHub activity.
//!
//! [`aggregator::StatsAggregator`] gathers a [`stats::StatsRecord`] for one
//! user, the [`render`] modules turn it into SVG, HTML or PNG, and [`server`]
//! serves the result over HTTP.

pub mod aggregator;
pub mod config;
pub mod contributions;
pub mod error;
pub mod experience;
pub mod github;
pub mod logging;
pub mod metrics;
pub mod render;
pub mod server;
pub mod stats;
pub mod views;
pub mod wakatime;

pub use error::{Error, Result};
