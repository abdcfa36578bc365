//! Metric aggregators.
//!
//! Each function scans raw records and returns counts only; turning counts
//! into insights happens in `insights`.

use std::collections::HashMap;

use crate::models::{LiveDataset, Match, RosterEntry, SeriesState, SeriesTeamState, Side};

use super::{percentage, win_rate, AnalysisContext, RecordSet};

/// Hits over attempts, with the records that contributed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tally {
    pub hits: u32,
    pub total: u32,
    pub record_ids: Vec<String>,
}

impl Tally {
    pub fn rate(&self) -> f64 {
        win_rate(self.hits, self.total)
    }

    pub fn percent(&self) -> u32 {
        percentage(self.hits, self.total)
    }
}

/// Attack results on one bomb site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteSplit {
    pub site: &'static str,
    pub attack_wins: u32,
    pub rounds: u32,
}

impl SiteSplit {
    fn new(site: &'static str) -> Self {
        Self {
            site,
            attack_wins: 0,
            rounds: 0,
        }
    }

    pub fn rate(&self) -> f64 {
        win_rate(self.attack_wins, self.rounds)
    }
}

/// Preferred attack site: the one with the higher attack win rate.
///
/// Only sites "A" and "B" count. Ties, including no rounds at all, go to A.
pub fn site_preference(matches: &[Match]) -> SiteSplit {
    let mut a = SiteSplit::new("A");
    let mut b = SiteSplit::new("B");

    for round in matches.iter().flat_map(|m| &m.rounds) {
        let split = match round.site.as_deref() {
            Some("A") => &mut a,
            Some("B") => &mut b,
            _ => continue,
        };
        split.rounds += 1;
        if round.winner == Side::Attack {
            split.attack_wins += 1;
        }
    }

    if b.rate() > a.rate() {
        b
    } else {
        a
    }
}

/// Eco and force rounds, and how many of them the team converted.
///
/// A round with a known team side counts as a hit only when the team won
/// it. Rounds without side information count as hits.
pub fn eco_discipline(matches: &[Match]) -> Tally {
    let mut tally = Tally::default();
    for m in matches {
        let mut seen = false;
        for round in m.rounds.iter().filter(|r| r.round_type.is_light_buy()) {
            tally.total += 1;
            if round.team_won().unwrap_or(true) {
                tally.hits += 1;
            }
            seen = true;
        }
        if seen {
            tally.record_ids.push(m.id.clone());
        }
    }
    tally
}

/// Win/loss record on one map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapRecord {
    pub map: String,
    pub wins: u32,
    pub total: u32,
    pub match_ids: Vec<String>,
}

impl MapRecord {
    pub fn rate(&self) -> f64 {
        win_rate(self.wins, self.total)
    }

    /// Strictly better win rate than `other`, compared without division.
    fn beats(&self, other: &MapRecord) -> bool {
        (self.wins as u64) * (other.total as u64) > (other.wins as u64) * (self.total as u64)
    }
}

/// Per-map records in encounter order.
pub fn map_records(matches: &[Match]) -> Vec<MapRecord> {
    let mut records: Vec<MapRecord> = Vec::new();
    for m in matches {
        let idx = match records.iter().position(|r| r.map == m.map) {
            Some(idx) => idx,
            None => {
                records.push(MapRecord {
                    map: m.map.clone(),
                    wins: 0,
                    total: 0,
                    match_ids: Vec::new(),
                });
                records.len() - 1
            }
        };
        let record = &mut records[idx];
        record.total += 1;
        if m.won {
            record.wins += 1;
        }
        record.match_ids.push(m.id.clone());
    }
    records
}

/// The map with the strictly highest win rate; the first one seen wins ties.
pub fn strongest_map(matches: &[Match]) -> Option<MapRecord> {
    let mut best: Option<MapRecord> = None;
    for record in map_records(matches).into_iter().filter(|r| r.total > 0) {
        if best.as_ref().map_or(true, |current| record.beats(current)) {
            best = Some(record);
        }
    }
    best
}

/// Defensive rounds won.
///
/// With a known team side only the team's defense rounds count. Without
/// one, every round counts and a hit is any round the defenders won.
pub fn defense_rounds(matches: &[Match]) -> Tally {
    let mut tally = Tally::default();
    for m in matches {
        let mut seen = false;
        for round in &m.rounds {
            if round.team_side.is_some_and(|side| side != Side::Defense) {
                continue;
            }
            tally.total += 1;
            if round.winner == Side::Defense {
                tally.hits += 1;
            }
            seen = true;
        }
        if seen {
            tally.record_ids.push(m.id.clone());
        }
    }
    tally
}

/// Matches decided by three rounds or fewer, and how many were won.
pub fn close_matches(matches: &[Match]) -> Tally {
    let mut tally = Tally::default();
    for m in matches.iter().filter(|m| m.is_close()) {
        tally.total += 1;
        if m.won {
            tally.hits += 1;
        }
        tally.record_ids.push(m.id.clone());
    }
    tally
}

/// Matches won over matches played.
pub fn match_record(matches: &[Match]) -> Tally {
    Tally {
        hits: matches.iter().filter(|m| m.won).count() as u32,
        total: matches.len() as u32,
        record_ids: matches.iter().map(|m| m.id.clone()).collect(),
    }
}

/// Find the analyzed team among a record's teams.
pub fn find_team<'a>(
    teams: &'a [SeriesTeamState],
    ctx: &AnalysisContext,
) -> Option<&'a SeriesTeamState> {
    teams
        .iter()
        .find(|t| ctx.matches_team(&t.name, Some(t.id.as_str())))
}

/// Series states in which the analyzed team could be identified.
pub fn identified_series<'a>(
    dataset: &'a LiveDataset,
    ctx: &'a AnalysisContext,
) -> impl Iterator<Item = (&'a SeriesState, &'a SeriesTeamState)> + 'a {
    dataset
        .series_states
        .iter()
        .filter_map(move |state| find_team(&state.teams, ctx).map(|team| (state, team)))
}

/// Series won over series played, counting only identified series.
pub fn series_record(dataset: &LiveDataset, ctx: &AnalysisContext) -> Tally {
    let mut tally = Tally::default();
    for (state, team) in identified_series(dataset, ctx) {
        tally.total += 1;
        if team.won {
            tally.hits += 1;
        }
        tally.record_ids.push(state.id.clone());
    }
    tally
}

/// Overall record for either regime.
pub fn team_record(records: RecordSet<'_>, ctx: &AnalysisContext) -> Tally {
    match records {
        RecordSet::Matches(matches) => match_record(matches),
        RecordSet::Series(dataset) => series_record(dataset, ctx),
    }
}

/// Distinct maps played, first-seen order.
pub fn maps_played(records: RecordSet<'_>, ctx: &AnalysisContext) -> Vec<String> {
    let mut maps: Vec<String> = Vec::new();
    let mut add = |map: &str| {
        if !map.is_empty() && !maps.iter().any(|m| m == map) {
            maps.push(map.to_string());
        }
    };
    match records {
        RecordSet::Matches(matches) => matches.iter().for_each(|m| add(&m.map)),
        RecordSet::Series(dataset) => {
            for (state, _) in identified_series(dataset, ctx) {
                state
                    .games
                    .iter()
                    .filter_map(|g| g.map.as_deref())
                    .for_each(&mut add);
            }
        }
    }
    maps
}

/// Aggregate the analyzed team's players, first-seen order.
///
/// Match regime: one game per match the player has round stats or an agent
/// in. Live regime: one game per map the player appears in.
pub fn build_roster(records: RecordSet<'_>, ctx: &AnalysisContext) -> Vec<RosterEntry> {
    let mut roster: Vec<RosterEntry> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    let mut entry = |roster: &mut Vec<RosterEntry>, name: &str| -> usize {
        *index.entry(name.to_string()).or_insert_with(|| {
            roster.push(RosterEntry::new(name));
            roster.len() - 1
        })
    };

    match records {
        RecordSet::Matches(matches) => {
            for m in matches {
                for (player, agent) in &m.agents {
                    let idx = entry(&mut roster, player);
                    roster[idx].add_agent(agent);
                }
                for round in &m.rounds {
                    for (player, stats) in &round.player_stats {
                        let idx = entry(&mut roster, player);
                        roster[idx].kills += stats.kills;
                        roster[idx].deaths += stats.deaths;
                    }
                }
                for player in roster.iter_mut() {
                    let appeared = m.agents.contains_key(&player.name)
                        || m.rounds.iter().any(|r| r.player_stats.contains_key(&player.name));
                    if appeared && player.record_appearance(&m.id) {
                        player.games += 1;
                    }
                }
            }
        }
        RecordSet::Series(dataset) => {
            for (state, _) in identified_series(dataset, ctx) {
                for game in &state.games {
                    let Some(team) = find_team(&game.teams, ctx) else {
                        continue;
                    };
                    for player in &team.players {
                        let idx = entry(&mut roster, &player.name);
                        let line = &mut roster[idx];
                        line.kills += player.kills;
                        line.deaths += player.deaths;
                        line.games += 1;
                        line.record_appearance(&state.id);
                        if let Some(character) = &player.character {
                            line.add_agent(&character.name);
                        }
                    }
                }
            }
        }
    }

    roster
}

/// Agent pick counts weighted by games played, most picked first.
///
/// Equal counts keep first-seen order.
pub fn agent_picks(roster: &[RosterEntry]) -> Vec<(String, u32)> {
    let mut picks: Vec<(String, u32)> = Vec::new();
    for player in roster {
        for agent in &player.agents {
            match picks.iter_mut().find(|(name, _)| name == agent) {
                Some((_, count)) => *count += player.games,
                None => picks.push((agent.clone(), player.games)),
            }
        }
    }
    picks.sort_by(|a, b| b.1.cmp(&a.1));
    picks
}
