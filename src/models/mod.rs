//! Core data models for scouting reports.

mod confidence;
mod ids;
mod insight;
mod match_record;
mod report;
mod roster;
mod series;

pub use confidence::*;
pub use ids::*;
pub use insight::*;
pub use match_record::*;
pub use report::*;
pub use roster::*;
pub use series::*;
