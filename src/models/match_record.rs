//! Structured match records (demo-fixture regime).

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Side of the map a team plays in one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Attack,
    Defense,
}

impl Side {
    /// The side the other team plays.
    pub fn opposite(self) -> Self {
        match self {
            Side::Attack => Side::Defense,
            Side::Defense => Side::Attack,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Attack => write!(f, "attack"),
            Side::Defense => write!(f, "defense"),
        }
    }
}

/// Buy type of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundType {
    Pistol,
    Eco,
    Force,
    Full,
}

impl RoundType {
    /// Eco and force buys are the "light buy" rounds tracked for discipline.
    pub fn is_light_buy(&self) -> bool {
        matches!(self, RoundType::Eco | RoundType::Force)
    }
}

/// Per-player line for one round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRoundStats {
    #[serde(default)]
    pub kills: u32,
    #[serde(default)]
    pub deaths: u32,
    #[serde(default)]
    pub assists: u32,
}

/// One round within a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    /// 1-based, strictly increasing within a match
    pub round_number: u32,

    /// Side that won the round
    pub winner: Side,

    /// Bomb site the round was played on ("A", "B", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,

    pub round_type: RoundType,

    /// Side the analyzed team played, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_side: Option<Side>,

    /// Player name -> stat line
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub player_stats: BTreeMap<String, PlayerRoundStats>,
}

impl Round {
    pub fn new(round_number: u32, winner: Side, round_type: RoundType) -> Self {
        Self {
            round_number,
            winner,
            site: None,
            round_type,
            team_side: None,
            player_stats: BTreeMap::new(),
        }
    }

    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.site = Some(site.into());
        self
    }

    pub fn with_team_side(mut self, side: Side) -> Self {
        self.team_side = Some(side);
        self
    }

    pub fn with_player_stats(mut self, name: impl Into<String>, stats: PlayerRoundStats) -> Self {
        self.player_stats.insert(name.into(), stats);
        self
    }

    /// Whether the analyzed team won, if its side is known.
    pub fn team_won(&self) -> Option<bool> {
        self.team_side.map(|side| side == self.winner)
    }
}

/// Final score of a match from the analyzed team's perspective.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub team: u32,
    pub opponent: u32,
}

impl Score {
    pub fn margin(&self) -> u32 {
        self.team.abs_diff(self.opponent)
    }
}

/// One completed game for the analyzed team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    pub date: NaiveDate,
    pub team_id: String,
    pub opponent_id: String,
    pub opponent_name: String,
    pub map: String,

    /// Chronological order
    #[serde(default)]
    pub rounds: Vec<Round>,

    pub score: Score,

    /// Always equal to `score.team > score.opponent`
    pub won: bool,

    /// Player name -> agent fielded in this match
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub agents: BTreeMap<String, String>,
}

impl Match {
    /// Create a match; `won` is derived from the score.
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        team_id: impl Into<String>,
        opponent_name: impl Into<String>,
        map: impl Into<String>,
        score: Score,
    ) -> Self {
        let opponent_name = opponent_name.into();
        Self {
            id: id.into(),
            date,
            team_id: team_id.into(),
            opponent_id: slugify(&opponent_name),
            opponent_name,
            map: map.into(),
            rounds: Vec::new(),
            won: score.team > score.opponent,
            score,
            agents: BTreeMap::new(),
        }
    }

    pub fn with_rounds(mut self, rounds: Vec<Round>) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_agent(mut self, player: impl Into<String>, agent: impl Into<String>) -> Self {
        self.agents.insert(player.into(), agent.into());
        self
    }

    /// Whether the match was decided by three rounds or fewer.
    pub fn is_close(&self) -> bool {
        self.score.margin() <= 3
    }
}

/// Lowercase, dash-separated form of a name for use in IDs.
pub fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}
