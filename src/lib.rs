//! # Scout Report
//!
//! Opponent scouting reports for esports teams, built from live series data
//! or deterministic fixtures.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (matches, series states, insights, reports)
//! - **calculate**: Insight derivation, exploits and counter strategies
//! - **demo**: Team-seeded fixture matches
//! - **provider**: Live series data client with response caching
//! - **report**: Report assembly and the report service
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod demo;
pub mod models;
pub mod provider;
pub mod report;

pub use models::*;

use std::time::Duration;

/// Parse a CLI duration such as "5m", "300s" or "1h". A bare number is seconds.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    let (digits, unit_secs) = match s.char_indices().last()? {
        (i, 'h') => (&s[..i], 3600),
        (i, 'm') => (&s[..i], 60),
        (i, 's') => (&s[..i], 1),
        _ => (s, 1),
    };

    let count: u64 = digits.parse().ok()?;
    count.checked_mul(unit_secs).map(Duration::from_secs)
}
