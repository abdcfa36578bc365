//! Scouting report model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Counter, Insight, ReportId, Role};

/// Provenance of a report.
///
/// Anything other than `Demo` or `Grid` means live data was requested but
/// the report was built from deterministic fixtures instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportMode {
    /// Fixture data was requested
    Demo,
    /// Backed by live provider data
    Grid,
    /// Live data was fetched but held no usable series states
    DemoFallback,
    /// The team was not found in the live data
    DemoNoMatch,
    /// The live fetch failed
    DemoError,
}

impl ReportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportMode::Demo => "demo",
            ReportMode::Grid => "grid",
            ReportMode::DemoFallback => "demo-fallback",
            ReportMode::DemoNoMatch => "demo-no-match",
            ReportMode::DemoError => "demo-error",
        }
    }

    /// Whether the report is backed by live data.
    pub fn is_live(&self) -> bool {
        matches!(self, ReportMode::Grid)
    }

    /// Whether live data was wanted but substituted.
    pub fn is_substituted(&self) -> bool {
        matches!(
            self,
            ReportMode::DemoFallback | ReportMode::DemoNoMatch | ReportMode::DemoError
        )
    }
}

impl std::fmt::Display for ReportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Game title a team competes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Game {
    Valorant,
    Lol,
    Unknown,
}

const VALORANT_TEAMS: &[&str] = &[
    "Phantom Tactics",
    "Shadow Strike Gaming",
    "Nova Esports",
    "Crimson Force",
    "Azure Dragons",
    "Sentinels",
    "Cloud9",
    "NRG",
    "100 Thieves",
    "Evil Geniuses",
];

const LOL_TEAMS: &[&str] = &["T1", "Gen.G", "DRX", "JD Gaming", "Bilibili Gaming"];

impl Game {
    /// Detect the title from the known team lists (exact name match).
    pub fn detect(team_name: &str) -> Self {
        let name = team_name.trim();
        if VALORANT_TEAMS.contains(&name) {
            Game::Valorant
        } else if LOL_TEAMS.contains(&name) {
            Game::Lol
        } else {
            Game::Unknown
        }
    }

    /// All teams with a known title, VALORANT first.
    pub fn known_teams() -> impl Iterator<Item = (&'static str, Game)> {
        VALORANT_TEAMS
            .iter()
            .map(|t| (*t, Game::Valorant))
            .chain(LOL_TEAMS.iter().map(|t| (*t, Game::Lol)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub report_id: ReportId,
    pub team_name: String,
    pub generated_at: DateTime<Utc>,
    pub mode: ReportMode,
    pub last_n: usize,
    pub game: Game,
}

/// Proof that a live report is backed by a real series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    pub source: String,
    pub series_id: String,
    pub tournament: String,
    pub verified: bool,
}

/// First and last dates covered; "N/A" when unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchWindow {
    pub first: String,
    pub last: String,
}

impl MatchWindow {
    pub fn unknown() -> Self {
        Self {
            first: "N/A".to_string(),
            last: "N/A".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub matches_analyzed: usize,
    /// 0.0 to 1.0
    pub overall_win_rate: f64,
    /// Each map at most once, first-seen order
    pub maps_played: Vec<String>,
    pub match_window: MatchWindow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedLink {
    pub name: String,
    pub url: String,
}

/// Player card shown in the roster section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    pub name: String,
    pub ign: String,
    pub role: Role,
    pub agents: Vec<String>,
    pub tendencies: Vec<String>,
    pub external_links: Vec<NamedLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSections {
    pub overview: Overview,
    pub players: Vec<PlayerProfile>,
    pub team_insights: Vec<Insight>,
    pub player_insights: Vec<Insight>,
    pub comp_insights: Vec<Insight>,
    pub exploits: Vec<Insight>,
    pub how_to_win: Vec<Counter>,
}

impl ReportSections {
    /// Every insight in section order.
    pub fn all_insights(&self) -> impl Iterator<Item = &Insight> {
        self.team_insights
            .iter()
            .chain(&self.player_insights)
            .chain(&self.comp_insights)
            .chain(&self.exploits)
    }
}

/// A complete scouting report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification: Option<Verification>,
    pub sections: ReportSections,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_mode_serialization() {
        assert_eq!(
            serde_json::to_string(&ReportMode::DemoNoMatch).unwrap(),
            "\"demo-no-match\""
        );
        assert_eq!(serde_json::to_string(&ReportMode::Grid).unwrap(), "\"grid\"");
        let parsed: ReportMode = serde_json::from_str("\"demo-error\"").unwrap();
        assert_eq!(parsed, ReportMode::DemoError);
    }

    #[test]
    fn test_report_mode_flags() {
        assert!(ReportMode::Grid.is_live());
        assert!(!ReportMode::Demo.is_substituted());
        assert!(ReportMode::DemoFallback.is_substituted());
        assert_eq!(format!("{}", ReportMode::DemoFallback), "demo-fallback");
    }

    #[test]
    fn test_game_detect() {
        assert_eq!(Game::detect("Sentinels"), Game::Valorant);
        assert_eq!(Game::detect("T1"), Game::Lol);
        assert_eq!(Game::detect("Unknown Squad"), Game::Unknown);
    }

    #[test]
    fn test_known_teams() {
        let teams: Vec<_> = Game::known_teams().collect();
        assert_eq!(teams.len(), 15);
        assert_eq!(teams[0], ("Phantom Tactics", Game::Valorant));
        assert_eq!(teams[14], ("Bilibili Gaming", Game::Lol));
    }
}
