//! Series records (live-provider regime).
//!
//! These are the strongly-typed form of the provider's loosely-typed
//! GraphQL payloads. Missing fields are resolved once, when mapping raw
//! responses in `provider::raw`; everything here is already defaulted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference to a team inside a series listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

/// Tournament a series belongs to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TournamentRef {
    pub id: String,
    pub name: String,
}

/// One entry of a tournament's series listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSummary {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time_scheduled: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tournament: Option<TournamentRef>,
    #[serde(default)]
    pub teams: Vec<TeamRef>,
}

impl SeriesSummary {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            start_time_scheduled: None,
            tournament: None,
            teams: Vec::new(),
        }
    }
}

/// Agent or champion a player fielded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
}

/// A player's line in one game (or a whole series).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub kills: u32,
    #[serde(default)]
    pub deaths: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<Character>,
}

/// A team's state in a series or a single game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesTeamState {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub won: bool,
    #[serde(default)]
    pub players: Vec<PlayerState>,
}

/// One map played within a series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<String>,
    #[serde(default)]
    pub teams: Vec<SeriesTeamState>,
}

/// Post-match state of one best-of-N series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesState {
    pub id: String,
    #[serde(default)]
    pub finished: bool,
    /// Exactly two entries for a well-formed series
    #[serde(default)]
    pub teams: Vec<SeriesTeamState>,
    #[serde(default)]
    pub games: Vec<GameState>,
}

impl SeriesState {
    /// The winning team, if the series has exactly one.
    pub fn winner(&self) -> Option<&SeriesTeamState> {
        let mut winners = self.teams.iter().filter(|t| t.won);
        match (winners.next(), winners.next()) {
            (Some(team), None) => Some(team),
            _ => None,
        }
    }
}

/// Everything fetched from the live provider for one report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveDataset {
    /// Series listings, most recent first
    pub series_list: Vec<SeriesSummary>,

    /// Successfully fetched series states; failed fetches are already dropped
    pub series_states: Vec<SeriesState>,
}

impl LiveDataset {
    pub fn new(series_list: Vec<SeriesSummary>, series_states: Vec<SeriesState>) -> Self {
        Self {
            series_list,
            series_states,
        }
    }

    pub fn summary(&self, series_id: &str) -> Option<&SeriesSummary> {
        self.series_list.iter().find(|s| s.id == series_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(name: &str, won: bool) -> SeriesTeamState {
        SeriesTeamState {
            name: name.to_string(),
            won,
            ..Default::default()
        }
    }

    #[test]
    fn test_series_winner() {
        let state = SeriesState {
            id: "s1".to_string(),
            teams: vec![team("Sentinels", true), team("NRG", false)],
            ..Default::default()
        };
        assert_eq!(state.winner().map(|t| t.name.as_str()), Some("Sentinels"));
    }

    #[test]
    fn test_series_winner_unfinished() {
        let state = SeriesState {
            id: "s1".to_string(),
            teams: vec![team("Sentinels", false), team("NRG", false)],
            ..Default::default()
        };
        assert!(state.winner().is_none());
    }

    #[test]
    fn test_live_dataset_summary_lookup() {
        let summaries = vec![SeriesSummary::new("a"), SeriesSummary::new("b")];
        let dataset = LiveDataset::new(summaries, vec![]);
        assert!(dataset.summary("b").is_some());
        assert!(dataset.summary("c").is_none());
    }

    #[test]
    fn test_player_state_defaults() {
        let player: PlayerState = serde_json::from_str(r#"{"name": "TenZ"}"#).unwrap();
        assert_eq!(player.kills, 0);
        assert_eq!(player.deaths, 0);
        assert!(player.character.is_none());
    }
}
