//! Raw provider payloads and their mapping into the series model.
//!
//! Every field is optional here; defaults are applied once, in the
//! `From` impls, so the rest of the crate never sees a half-filled record.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::{
    Character, GameState, PlayerState, SeriesState, SeriesSummary, SeriesTeamState, TeamRef,
    TournamentRef,
};

/// Name used when the provider omits one.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Standard GraphQL envelope.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    #[serde(default)]
    pub message: String,
}

/// Joined error messages, or a placeholder when none were given.
pub fn error_summary(errors: &[GraphQlError]) -> String {
    let messages: Vec<&str> = errors
        .iter()
        .map(|e| e.message.as_str())
        .filter(|m| !m.is_empty())
        .collect();
    if messages.is_empty() {
        "unspecified GraphQL error".to_string()
    } else {
        messages.join("; ")
    }
}

// Series listing (central data).

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllSeriesData {
    pub all_series: Option<SeriesConnection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesConnection {
    pub total_count: Option<u32>,
    #[serde(default)]
    pub edges: Vec<SeriesEdge>,
}

#[derive(Debug, Deserialize)]
pub struct SeriesEdge {
    pub node: Option<RawSeries>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSeries {
    pub id: Option<String>,
    pub start_time_scheduled: Option<String>,
    #[serde(default)]
    pub teams: Vec<RawSeriesTeam>,
    pub tournament: Option<RawTournament>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSeriesTeam {
    pub base_info: Option<RawBaseInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBaseInfo {
    pub id: Option<String>,
    pub name: Option<String>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawTournament {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl AllSeriesData {
    /// Listed series, skipping nodes without an id.
    pub fn into_summaries(self) -> Vec<SeriesSummary> {
        self.all_series
            .map(|conn| conn.edges)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|edge| edge.node)
            .filter_map(|node| node.into_summary())
            .collect()
    }
}

impl RawSeries {
    fn into_summary(self) -> Option<SeriesSummary> {
        let id = self.id.filter(|id| !id.is_empty())?;
        Some(SeriesSummary {
            id,
            start_time_scheduled: self.start_time_scheduled.as_deref().and_then(parse_time),
            tournament: self.tournament.map(|t| TournamentRef {
                id: t.id.unwrap_or_default(),
                name: t.name.unwrap_or_default(),
            }),
            teams: self
                .teams
                .into_iter()
                .filter_map(|t| t.base_info)
                .map(|info| TeamRef {
                    id: info.id,
                    name: info.name.unwrap_or_else(|| UNKNOWN_NAME.to_string()),
                    logo_url: info.logo_url,
                })
                .collect(),
        })
    }
}

fn parse_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

// Series state (live data feed).

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesStateData {
    pub series_state: Option<RawSeriesState>,
}

#[derive(Debug, Deserialize)]
pub struct RawSeriesState {
    pub id: Option<String>,
    pub finished: Option<bool>,
    #[serde(default)]
    pub teams: Vec<RawTeamState>,
    #[serde(default)]
    pub games: Vec<RawGame>,
}

#[derive(Debug, Deserialize)]
pub struct RawTeamState {
    pub id: Option<String>,
    pub name: Option<String>,
    pub won: Option<bool>,
    pub score: Option<i64>,
    #[serde(default)]
    pub players: Vec<RawPlayer>,
}

#[derive(Debug, Deserialize)]
pub struct RawGame {
    pub id: Option<String>,
    pub map: Option<RawNamed>,
    #[serde(default)]
    pub teams: Vec<RawTeamState>,
}

#[derive(Debug, Deserialize)]
pub struct RawPlayer {
    pub id: Option<String>,
    pub name: Option<String>,
    pub kills: Option<i64>,
    pub deaths: Option<i64>,
    pub character: Option<RawNamed>,
}

#[derive(Debug, Deserialize)]
pub struct RawNamed {
    pub name: Option<String>,
}

fn count(raw: Option<i64>) -> u32 {
    raw.map(|v| v.clamp(0, u32::MAX as i64) as u32).unwrap_or(0)
}

impl RawSeriesState {
    /// Map into the model, falling back to `requested_id` for a missing id.
    pub fn into_state(self, requested_id: &str) -> SeriesState {
        SeriesState {
            id: self
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| requested_id.to_string()),
            finished: self.finished.unwrap_or(false),
            teams: self.teams.into_iter().map(SeriesTeamState::from).collect(),
            games: self.games.into_iter().map(GameState::from).collect(),
        }
    }
}

impl From<RawTeamState> for SeriesTeamState {
    fn from(raw: RawTeamState) -> Self {
        SeriesTeamState {
            id: raw.id.unwrap_or_default(),
            name: raw.name.unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            score: count(raw.score),
            won: raw.won.unwrap_or(false),
            players: raw.players.into_iter().map(PlayerState::from).collect(),
        }
    }
}

impl From<RawGame> for GameState {
    fn from(raw: RawGame) -> Self {
        GameState {
            id: raw.id.unwrap_or_default(),
            map: raw.map.and_then(|m| m.name).filter(|m| !m.is_empty()),
            teams: raw.teams.into_iter().map(SeriesTeamState::from).collect(),
        }
    }
}

impl From<RawPlayer> for PlayerState {
    fn from(raw: RawPlayer) -> Self {
        PlayerState {
            id: raw.id.unwrap_or_default(),
            name: raw.name.unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            kills: count(raw.kills),
            deaths: count(raw.deaths),
            character: raw
                .character
                .and_then(|c| c.name)
                .filter(|name| !name.is_empty())
                .map(|name| Character { name }),
        }
    }
}
