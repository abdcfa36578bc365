//! Deterministic demo fixtures.
//!
//! Every "random-looking" value is derived from a seeded hash of the team
//! name, so the same team and match limit always yield the same matches,
//! and different teams diverge.

use chrono::{Duration, NaiveDate};

use crate::models::{slugify, Match, PlayerRoundStats, Round, RoundType, Score, Side};

pub const PLAYER_PREFIXES: [&str; 20] = [
    "Ace", "Blaze", "Cryo", "Drift", "Echo", "Flux", "Ghost", "Hawk", "Ion", "Jade", "Karma",
    "Luna", "Mist", "Nyx", "Onyx", "Pulse", "Quake", "Raven", "Storm", "Trace",
];

pub const PLAYER_SUFFIXES: [&str; 20] = [
    "X", "Prime", "Zero", "One", "Null", "Core", "Max", "Pro", "Elite", "Alpha", "Omega", "Nova",
    "Fury", "Edge", "Vex", "Hex", "Arc", "Sol", "Zyx", "Neo",
];

pub const AGENTS: [&str; 10] = [
    "Jett", "Raze", "Omen", "Viper", "Killjoy", "Sova", "Sage", "Reyna", "Phoenix", "Cypher",
];

pub const MAP_POOL: [&str; 8] = [
    "Ascent", "Haven", "Bind", "Split", "Icebox", "Breeze", "Lotus", "Sunset",
];

const OPPONENTS: [&str; 8] = [
    "Phantom Tactics",
    "Shadow Strike Gaming",
    "Nova Esports",
    "Crimson Force",
    "Azure Dragons",
    "Iron Wolves",
    "Solar Flare",
    "Vortex Gaming",
];

/// Side of the player name grid.
const NAME_WIDTH: usize = PLAYER_PREFIXES.len();

/// Rounds needed to win a map.
const ROUNDS_TO_WIN: u32 = 13;

/// Side switch happens after this round.
const HALF: u32 = 12;

/// Order-dependent polynomial hash over UTF-16 code units.
///
/// `h = h * 31 + code * (index + 1)` in wrapping 32-bit arithmetic, starting
/// from `seed`; the absolute value is returned.
pub fn seeded_hash(input: &str, seed: i32) -> u32 {
    let mut h = seed;
    for (i, code) in input.encode_utf16().enumerate() {
        h = h
            .wrapping_mul(31)
            .wrapping_add((code as i32).wrapping_mul(i as i32 + 1));
    }
    h.unsigned_abs()
}

/// A generated player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoPlayer {
    pub name: String,
    pub agent: String,
    /// Target K/D in tenths (7 to 20)
    pub kd_tenths: u32,
}

/// Seeded parameters for one team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoProfile {
    pub team_name: String,
    /// Target win rate, 40 to 79
    pub win_rate_pct: u32,
    pub match_count: usize,
    pub players: Vec<DemoPlayer>,
    pub maps: Vec<String>,
}

impl DemoProfile {
    pub fn for_team(team_name: &str, match_limit: usize) -> Self {
        let team_hash = seeded_hash(team_name, 1);
        let stats_hash = seeded_hash(team_name, 31);

        let mut players: Vec<DemoPlayer> = Vec::with_capacity(5);
        for i in 0..5 {
            let ph = seeded_hash(&format!("{}{}", team_name, i), i * 13 + 7);
            let name = distinct_name(
                &players,
                ph as usize % NAME_WIDTH,
                (ph >> 4) as usize % NAME_WIDTH,
                NAME_WIDTH,
            );
            players.push(DemoPlayer {
                name,
                agent: AGENTS[(ph >> 8) as usize % AGENTS.len()].to_string(),
                kd_tenths: 7 + ph % 14,
            });
        }

        let start = (team_hash % 3) as usize;
        let count = 3 + (team_hash % 4) as usize;
        let maps = MAP_POOL[start..start + count]
            .iter()
            .map(|m| m.to_string())
            .collect();

        Self {
            team_name: team_name.to_string(),
            win_rate_pct: 40 + stats_hash % 40,
            match_count: match_limit.min(5 + (stats_hash % 12) as usize),
            players,
            maps,
        }
    }
}

/// Placeholder roster for a live team whose data carried no players.
pub fn placeholder_players(team_name: &str) -> Vec<DemoPlayer> {
    let mut players: Vec<DemoPlayer> = Vec::with_capacity(5);
    for i in 0..5 {
        let ph = seeded_hash(&format!("{}{}", team_name, i), i * 17);
        let name = distinct_name(&players, ph as usize % 10, (ph >> 3) as usize % 10, 10);
        players.push(DemoPlayer {
            name,
            agent: AGENTS[(ph >> 6) as usize % AGENTS.len()].to_string(),
            kd_tenths: 10,
        });
    }
    players
}

/// First name at or after `(prefix, suffix)` in a `width`x`width` name grid
/// that no player in `taken` already has. Steps the suffix, then the prefix.
fn distinct_name(taken: &[DemoPlayer], prefix: usize, suffix: usize, width: usize) -> String {
    let cells = width * width;
    (0..cells)
        .map(|step| {
            let cell = (prefix * width + suffix + step) % cells;
            format!("{}{}", PLAYER_PREFIXES[cell / width], PLAYER_SUFFIXES[cell % width])
        })
        .find(|name| taken.iter().all(|p| &p.name != name))
        .unwrap_or_default()
}

/// Generate the team's fixture matches, oldest first.
pub fn demo_matches(team_name: &str, match_limit: usize) -> Vec<Match> {
    let profile = DemoProfile::for_team(team_name, match_limit);
    (0..profile.match_count)
        .map(|i| demo_match(&profile, i))
        .collect()
}

fn demo_match(profile: &DemoProfile, index: usize) -> Match {
    let team = profile.team_name.as_str();
    let mh = seeded_hash(&format!("{}#match{}", team, index), 41 + index as i32);

    let won = mh % 100 < profile.win_rate_pct;
    let loser_rounds = (mh >> 7) % 12;
    let score = if won {
        Score {
            team: ROUNDS_TO_WIN,
            opponent: loser_rounds,
        }
    } else {
        Score {
            team: loser_rounds,
            opponent: ROUNDS_TO_WIN,
        }
    };

    let map = &profile.maps[(mh >> 3) as usize % profile.maps.len()];
    let opponent = OPPONENTS
        .iter()
        .cycle()
        .skip((mh >> 11) as usize % OPPONENTS.len())
        .take(OPPONENTS.len())
        .find(|name| !name.eq_ignore_ascii_case(team))
        .copied()
        .unwrap_or("Open Qualifier");
    let date = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap_or_default()
        + Duration::days(7 * index as i64);
    let id = format!("demo-{}-{}", slugify(team), index + 1);
    let starting_side = if (mh >> 5) & 1 == 0 {
        Side::Attack
    } else {
        Side::Defense
    };

    let rounds = demo_rounds(&id, profile, won, loser_rounds, starting_side);
    let mut record = Match::new(id, date, slugify(team), opponent, map.as_str(), score)
        .with_rounds(rounds);
    for player in &profile.players {
        record = record.with_agent(player.name.clone(), player.agent.clone());
    }
    record
}

/// Round-by-round results.
///
/// The map winner's twelve non-final rounds are spread evenly across the
/// game and it always takes the last round.
fn demo_rounds(
    match_id: &str,
    profile: &DemoProfile,
    team_won_map: bool,
    loser_rounds: u32,
    starting_side: Side,
) -> Vec<Round> {
    let total = ROUNDS_TO_WIN + loser_rounds;
    let spread = total - 1;

    (1..=total)
        .map(|r| {
            let k = r - 1;
            let map_winner_takes = r == total
                || (k + 1) * (ROUNDS_TO_WIN - 1) / spread > k * (ROUNDS_TO_WIN - 1) / spread;
            let team_takes = map_winner_takes == team_won_map;
            let team_side = if r <= HALF {
                starting_side
            } else {
                starting_side.opposite()
            };
            let winner = if team_takes {
                team_side
            } else {
                team_side.opposite()
            };

            let rh = seeded_hash(&format!("{}r{}", match_id, r), r as i32);
            let round_type = if r == 1 || r == HALF + 1 {
                RoundType::Pistol
            } else {
                match (rh >> 3) % 10 {
                    0 | 1 => RoundType::Eco,
                    2 | 3 => RoundType::Force,
                    _ => RoundType::Full,
                }
            };

            let mut round = Round::new(r, winner, round_type).with_team_side(team_side);
            match rh % 5 {
                0 | 1 => round = round.with_site("A"),
                2 | 3 => round = round.with_site("B"),
                _ => {}
            }

            for (j, player) in profile.players.iter().enumerate() {
                let ps = seeded_hash(&format!("{}r{}p{}", match_id, r, j), j as i32);
                round = round.with_player_stats(
                    player.name.clone(),
                    PlayerRoundStats {
                        kills: (player.kd_tenths * 7 + (ps >> 7) % 100) / 100,
                        deaths: u32::from(ps % 100 < 70),
                        assists: (ps >> 3) % 2,
                    },
                );
            }
            round
        })
        .collect()
}
