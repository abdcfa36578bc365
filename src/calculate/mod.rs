//! Insight derivation engine.
//!
//! Turns already-fetched records into scored insights and counters:
//! - Evidence builder
//! - Metric aggregators (site, eco, map, series, K/D, composition)
//! - Insight classifier
//! - Exploit detection and counter-strategy generation
//!
//! Everything here is pure and infallible. Rates guard their denominators,
//! K/D floors deaths at 1 and confidences are clamped on construction.

mod aggregators;
mod classify;
mod counters;
mod evidence;
mod insights;

pub use aggregators::*;
pub use classify::*;
pub use counters::*;
pub use evidence::*;
pub use insights::*;

use crate::models::{LiveDataset, Match};

/// Records an analysis runs over.
#[derive(Debug, Clone, Copy)]
pub enum RecordSet<'a> {
    /// Structured matches, already scoped to the analyzed team
    Matches(&'a [Match]),
    /// Live series listings and states
    Series(&'a LiveDataset),
}

impl<'a> RecordSet<'a> {
    pub fn is_live(&self) -> bool {
        matches!(self, RecordSet::Series(_))
    }
}

/// Who is being analyzed, and over how many records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisContext {
    pub team_name: String,
    /// Stable provider ID, preferred over name matching when present
    pub team_id: Option<String>,
    pub match_limit: usize,
}

impl AnalysisContext {
    pub fn new(team_name: impl Into<String>, match_limit: usize) -> Self {
        Self {
            team_name: team_name.into(),
            team_id: None,
            match_limit,
        }
    }

    pub fn with_team_id(mut self, team_id: impl Into<String>) -> Self {
        self.team_id = Some(team_id.into());
        self
    }

    /// Whether a team listed in a record is the analyzed team.
    ///
    /// IDs are compared when both sides have one; otherwise names are
    /// matched with [`team_names_match`].
    pub fn matches_team(&self, name: &str, id: Option<&str>) -> bool {
        match (self.team_id.as_deref(), id.filter(|id| !id.is_empty())) {
            (Some(ours), Some(theirs)) => ours == theirs,
            _ => team_names_match(&self.team_name, name),
        }
    }
}

/// Case-insensitive bidirectional substring match.
///
/// Loose on purpose so "C9" style abbreviations and full names line up.
/// Empty names never match.
pub fn team_names_match(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(&b) || b.contains(&a)
}

/// Rounded whole percentage, 0 when the denominator is zero.
pub fn percentage(numerator: u32, denominator: u32) -> u32 {
    if denominator == 0 {
        0
    } else {
        (numerator as f64 / denominator as f64 * 100.0).round() as u32
    }
}

/// Win rate in `[0, 1]`, 0.0 when nothing was played.
pub fn win_rate(wins: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        wins as f64 / total as f64
    }
}

/// Kill/death ratio with the denominator floored at 1.
pub fn kd_ratio(kills: u32, deaths: u32) -> f64 {
    kills as f64 / deaths.max(1) as f64
}
