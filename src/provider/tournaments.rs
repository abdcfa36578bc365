//! Tournament routing and the known-team directory.

use serde::Serialize;

use crate::models::Game;

/// A provider tournament a team may have played in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tournament {
    pub id: u32,
    pub name: &'static str,
}

const fn t(id: u32, name: &'static str) -> Tournament {
    Tournament { id, name }
}

const VALORANT_AMERICAS: &[Tournament] = &[
    t(757371, "VCT Americas - Kickoff 2024"),
    t(757481, "VCT Americas - Stage 1 2024"),
    t(774782, "VCT Americas - Stage 2 2024"),
    t(775516, "VCT Americas - Kickoff 2025"),
    t(800675, "VCT Americas - Stage 1 2025"),
    t(826660, "VCT Americas - Stage 2 2025"),
];

const LPL: &[Tournament] = &[
    t(758054, "LPL - Spring 2024"),
    t(774845, "LPL - Summer 2024"),
    t(775662, "LPL - Split 1 2025"),
    t(825450, "LPL - Split 2 2025"),
];

const LCK: &[Tournament] = &[
    t(758024, "LCK - Spring 2024"),
    t(774794, "LCK - Summer 2024"),
    t(825490, "LCK - Split 2 2025"),
];

const LCS_LEC: &[Tournament] = &[
    t(758043, "LCS - Spring 2024"),
    t(774888, "LCS - Summer 2024"),
    t(758077, "LEC - Spring 2024"),
    t(774622, "LEC - Summer 2024"),
];

const LPL_KEYWORDS: &[&str] = &[
    "jd gaming", "bilibili", "weibo", "lng", "top", "fpx", "edg", "rng",
];

const LCK_KEYWORDS: &[&str] = &["t1", "gen.g", "drx", "kt", "hanwha", "dplus", "kwangdong"];

const LCS_LEC_KEYWORDS: &[&str] = &[
    "fnatic",
    "g2",
    "mad lions",
    "team liquid",
    "flyquest",
    "dignitas",
];

/// Candidate tournaments for a team, most relevant first.
///
/// League is chosen by keyword in the lowercased name; anything
/// unrecognised is assumed to play VALORANT Americas.
pub fn tournaments_for_team(team_name: &str) -> &'static [Tournament] {
    let lower = team_name.to_lowercase();
    let has = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

    if has(LPL_KEYWORDS) {
        LPL
    } else if has(LCK_KEYWORDS) {
        LCK
    } else if has(LCS_LEC_KEYWORDS) {
        LCS_LEC
    } else {
        VALORANT_AMERICAS
    }
}

/// Directory entry for the team search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamListing {
    pub name: &'static str,
    pub game: Game,
}

/// Known teams whose name contains `query` (case-insensitive).
///
/// An empty query lists everything.
pub fn search_teams(query: &str) -> Vec<TeamListing> {
    let needle = query.trim().to_lowercase();
    Game::known_teams()
        .filter(|(name, _)| needle.is_empty() || name.to_lowercase().contains(&needle))
        .map(|(name, game)| TeamListing { name, game })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_by_league() {
        assert_eq!(tournaments_for_team("JD Gaming")[0].id, 758054);
        assert_eq!(tournaments_for_team("Gen.G Esports")[0].name, "LCK - Spring 2024");
        assert_eq!(tournaments_for_team("Fnatic")[2].name, "LEC - Spring 2024");
    }

    #[test]
    fn test_unknown_team_routes_to_valorant() {
        let list = tournaments_for_team("Sentinels");
        assert_eq!(list.len(), 6);
        assert_eq!(list[0].name, "VCT Americas - Kickoff 2024");
    }

    #[test]
    fn test_search_teams() {
        let hits = search_teams("gaming");
        let names: Vec<_> = hits.iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["Shadow Strike Gaming", "JD Gaming", "Bilibili Gaming"]);
        assert_eq!(hits[1].game, Game::Lol);
    }

    #[test]
    fn test_search_empty_query_lists_all() {
        assert_eq!(search_teams("  ").len(), 15);
    }
}
