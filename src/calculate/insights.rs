//! Entry points that turn records into report insights.

use url::Url;

use crate::models::{
    slugify, Confidence, Evidence, ExternalLinks, Insight, InsightCategory, InsightScope,
    RosterEntry, Severity,
};

use super::{
    agent_picks, build_evidence, build_roster, classify, close_matches, defense_rounds,
    eco_discipline, maps_played, series_record, site_preference, strongest_map,
    team_record, AnalysisContext, MetricValue, RecordSet, Thresholds,
};

pub const TEAM_SITE_PREFERENCE: &str = "team-site-preference";
pub const TEAM_ECO_DISCIPLINE: &str = "team-eco-discipline";
pub const TEAM_MAP_STRENGTH: &str = "team-map-strength";
pub const TEAM_DEFENSE: &str = "team-defense";
pub const TEAM_CLOSE_MATCHES: &str = "team-close-matches";
pub const TEAM_WIN_RATE: &str = "team-win-rate";
pub const TEAM_MAP_POOL: &str = "team-map-pool";
pub const COMP_AGENTS: &str = "comp-agents";
pub const EXPLOIT_FORM: &str = "exploit-form";
pub const EXPLOIT_OVEREXTENSION: &str = "exploit-overextension";
pub const EXPLOIT_ROTATION: &str = "exploit-rotation";
pub const EXPLOIT_PLAYERS: &str = "exploit-players";

/// Live-regime players need this many games to be rated.
pub const MIN_LIVE_GAMES: u32 = 2;

/// Record IDs shown in a preview.
const PREVIEW_IDS: usize = 5;

struct Draft<'a> {
    id: String,
    scope: InsightScope,
    title: String,
    metric: MetricValue,
    thresholds: &'a Thresholds,
    subject: &'a str,
    template: &'a str,
    confidence: Confidence,
    evidence: Evidence,
}

impl Draft<'_> {
    fn finish(self) -> Insight {
        let verdict = classify(self.metric, self.thresholds, self.subject, self.template);
        let value = match self.metric {
            MetricValue::Rate { .. } => self.metric.display(),
            MetricValue::Ratio { .. } => format!("{} K/D", self.metric.display()),
        };
        Insight {
            id: self.id,
            scope: self.scope,
            category: verdict.category,
            severity: verdict.severity,
            title: self.title,
            claim: verdict.claim,
            value,
            confidence: self.confidence,
            evidence: self.evidence,
        }
    }
}

/// Team-scoped insights.
///
/// Match regime, in order: site preference, eco/force discipline, map pool
/// strength, defense adaptability, close-match performance. Live regime:
/// series win rate and the map pool played.
pub fn compute_team_insights(records: RecordSet<'_>, ctx: &AnalysisContext) -> Vec<Insight> {
    match records {
        RecordSet::Matches(matches) => {
            let team = ctx.team_name.as_str();
            let all_ids: Vec<&str> = matches.iter().map(|m| m.id.as_str()).collect();
            let mut insights = Vec::with_capacity(5);

            let site = site_preference(matches);
            let site_template = format!(
                "{{subject}} wins {{value}} of rounds when attacking Site {}",
                site.site
            );
            insights.push(
                Draft {
                    id: TEAM_SITE_PREFERENCE.to_string(),
                    scope: InsightScope::Team,
                    title: format!("Site {} Attack Preference", site.site),
                    metric: MetricValue::rate(site.attack_wins, site.rounds),
                    thresholds: &Thresholds::RATE,
                    subject: team,
                    template: &site_template,
                    confidence: Confidence::scaled(60.0, 0.5, site.rounds as usize, 95.0),
                    evidence: build_evidence(
                        format!("Attack Site {} Win Rate", site.site),
                        site.attack_wins,
                        site.rounds,
                        &all_ids,
                    )
                    .with_rounds(site.rounds as usize),
                }
                .finish(),
            );

            let eco = eco_discipline(matches);
            insights.push(
                Draft {
                    id: TEAM_ECO_DISCIPLINE.to_string(),
                    scope: InsightScope::Team,
                    title: "Eco Round Discipline".to_string(),
                    metric: MetricValue::rate(eco.hits, eco.total),
                    thresholds: &Thresholds::RATE,
                    subject: team,
                    template: "{subject} converts {value} of eco and force rounds",
                    confidence: Confidence::scaled(50.0, 1.0, eco.total as usize, 85.0),
                    evidence: build_evidence(
                        "Eco/Force Round Win Rate",
                        eco.hits,
                        eco.total,
                        &eco.record_ids,
                    )
                    .with_rounds(eco.total as usize),
                }
                .finish(),
            );

            if let Some(map) = strongest_map(matches) {
                let template = format!("{{subject}} wins {{value}} of matches on {}", map.map);
                insights.push(
                    Draft {
                        id: TEAM_MAP_STRENGTH.to_string(),
                        scope: InsightScope::Team,
                        title: format!("{} Dominance", map.map),
                        metric: MetricValue::rate(map.wins, map.total),
                        thresholds: &Thresholds::RATE,
                        subject: team,
                        template: &template,
                        confidence: Confidence::scaled(60.0, 3.0, map.total as usize, 90.0),
                        evidence: build_evidence(
                            format!("Win Rate on {}", map.map),
                            map.wins,
                            map.total,
                            &map.match_ids,
                        ),
                    }
                    .finish(),
                );
            }

            let defense = defense_rounds(matches);
            insights.push(
                Draft {
                    id: TEAM_DEFENSE.to_string(),
                    scope: InsightScope::Team,
                    title: "Defense Adaptability".to_string(),
                    metric: MetricValue::rate(defense.hits, defense.total),
                    thresholds: &Thresholds::RATE,
                    subject: team,
                    template: "{subject} holds {value} of defensive rounds",
                    confidence: Confidence::scaled(50.0, 0.5, defense.total as usize, 80.0),
                    evidence: build_evidence(
                        "Defensive Round Success",
                        defense.hits,
                        defense.total,
                        &defense.record_ids,
                    )
                    .with_rounds(defense.total as usize),
                }
                .finish(),
            );

            let close = close_matches(matches);
            insights.push(
                Draft {
                    id: TEAM_CLOSE_MATCHES.to_string(),
                    scope: InsightScope::Team,
                    title: "Clutch Performance".to_string(),
                    metric: MetricValue::rate(close.hits, close.total),
                    thresholds: &Thresholds::RATE,
                    subject: team,
                    template: "{subject} wins {value} of matches decided by 3 rounds or fewer",
                    confidence: Confidence::scaled(50.0, 4.0, close.total as usize, 85.0),
                    evidence: build_evidence(
                        "Close Match Win Rate",
                        close.hits,
                        close.total,
                        &close.record_ids,
                    ),
                }
                .finish(),
            );

            insights
        }
        RecordSet::Series(dataset) => {
            let team = ctx.team_name.as_str();
            let record = series_record(dataset, ctx);
            let mut insights = Vec::with_capacity(2);

            let template = format!(
                "{{subject}} has a {{value}} win rate across {} series",
                record.total
            );
            let links = external_links(team, record.record_ids.first().map(String::as_str));
            insights.push(
                Draft {
                    id: TEAM_WIN_RATE.to_string(),
                    scope: InsightScope::Team,
                    title: "Overall Win Rate".to_string(),
                    metric: MetricValue::rate(record.hits, record.total),
                    thresholds: &Thresholds::RATE,
                    subject: team,
                    template: &template,
                    confidence: Confidence::scaled(50.0, 5.0, record.total as usize, 95.0),
                    evidence: build_evidence(
                        "Series Win Rate",
                        record.hits,
                        record.total,
                        &record.record_ids,
                    )
                    .truncate_ids(PREVIEW_IDS)
                    .with_external_links(links),
                }
                .finish(),
            );

            let maps = maps_played(records, ctx);
            if !maps.is_empty() {
                let named = maps.iter().take(3).cloned().collect::<Vec<_>>().join(", ");
                let more = if maps.len() > 3 { "..." } else { "" };
                let count = maps.len() as u32;
                insights.push(Insight {
                    id: TEAM_MAP_POOL.to_string(),
                    scope: InsightScope::Team,
                    category: InsightCategory::Pattern,
                    severity: Severity::Low,
                    title: "Map Pool".to_string(),
                    claim: format!(
                        "{} has played {} unique maps: {}{}",
                        team, count, named, more
                    ),
                    value: format!("{} maps", count),
                    confidence: Confidence::new(100),
                    evidence: build_evidence(
                        "Unique Maps Played",
                        count,
                        count,
                        &record.record_ids,
                    )
                    .truncate_ids(3),
                });
            }

            insights
        }
    }
}

/// Per-player K/D insights, roster order.
///
/// In the live regime players with fewer than two games are skipped.
pub fn compute_player_insights(records: RecordSet<'_>, ctx: &AnalysisContext) -> Vec<Insight> {
    let min_games = if records.is_live() { MIN_LIVE_GAMES } else { 1 };
    build_roster(records, ctx)
        .iter()
        .filter(|player| player.games >= min_games)
        .map(player_insight)
        .collect()
}

fn player_insight(player: &RosterEntry) -> Insight {
    let kd = player.kd();
    let on_agents = if player.agents.is_empty() {
        String::new()
    } else {
        let agents: Vec<&str> = player.agents.iter().take(2).map(String::as_str).collect();
        format!(" on {}", agents.join(", "))
    };
    let template = format!(
        "{{subject}} averages {:.1} kills/game with {{value}} K/D{}",
        player.kills_per_game(),
        on_agents
    );

    Draft {
        id: format!("player-{}", slugify(&player.name)),
        scope: InsightScope::Player,
        title: format!("{} Performance", player.name),
        metric: MetricValue::ratio(kd, player.games as usize),
        thresholds: &Thresholds::KD,
        subject: &player.name,
        template: &template,
        confidence: Confidence::scaled(50.0, 10.0, player.games as usize, 90.0),
        evidence: build_evidence(
            "Kill/Death Ratio",
            player.kills,
            player.deaths.max(1),
            &player.match_ids,
        )
        .with_matches(player.games as usize),
    }
    .finish()
}

/// Agent pick-rate pattern, emitted once at least three agents are known.
pub fn compute_composition_insights(
    records: RecordSet<'_>,
    ctx: &AnalysisContext,
) -> Vec<Insight> {
    let roster = build_roster(records, ctx);
    let picks = agent_picks(&roster);
    if picks.len() < 3 {
        return Vec::new();
    }

    let all_picks: u32 = picks.iter().map(|(_, count)| count).sum();
    let top: Vec<&(String, u32)> = picks.iter().take(5).collect();
    let top_picks: u32 = top.iter().map(|(_, count)| count).sum();
    let favored: Vec<&str> = top.iter().take(3).map(|(name, _)| name.as_str()).collect();
    let record = team_record(records, ctx);

    vec![Insight {
        id: COMP_AGENTS.to_string(),
        scope: InsightScope::Comp,
        category: InsightCategory::Pattern,
        severity: Severity::Low,
        title: "Preferred Composition".to_string(),
        claim: format!(
            "{} favors {} in their team compositions",
            ctx.team_name,
            favored.join(", ")
        ),
        value: format!("{} agents", top.len()),
        confidence: Confidence::new(85),
        evidence: build_evidence("Agent Pick Rate", top_picks, all_picks, &record.record_ids)
            .truncate_ids(3),
    }]
}

/// Exploitable weaknesses.
///
/// Critical team insights come first (the win rate only when there is no
/// slump to report), then a form read (slump or over-extension), a rotation
/// heuristic while the list is still short, and finally any players below
/// 0.8 K/D.
pub fn compute_exploits(
    insights: &[Insight],
    records: RecordSet<'_>,
    ctx: &AnalysisContext,
) -> Vec<Insight> {
    let team = ctx.team_name.as_str();
    let record = team_record(records, ctx);
    let unit = if records.is_live() { "series" } else { "matches" };
    let rate = record.rate();
    let slump = rate < 0.5 && record.total >= 3;

    // A slump already reports the win rate as Struggling Form
    let mut exploits: Vec<Insight> = insights
        .iter()
        .filter(|i| i.scope == InsightScope::Team && i.is_critical())
        .filter(|i| !(slump && i.id == TEAM_WIN_RATE))
        .map(|i| Insight {
            id: format!("exploit-{}", i.id),
            scope: InsightScope::Exploit,
            ..i.clone()
        })
        .collect();

    if slump {
        let severity = classify(
            MetricValue::rate(record.hits, record.total),
            &Thresholds::RATE,
            team,
            "",
        )
        .severity;
        exploits.push(Insight {
            id: EXPLOIT_FORM.to_string(),
            scope: InsightScope::Exploit,
            category: InsightCategory::Critical,
            severity,
            title: "Struggling Form".to_string(),
            claim: format!(
                "{} has won only {}% of recent {} - they're in a slump",
                team,
                record.percent(),
                unit
            ),
            value: format!("{}% Win Rate", record.percent()),
            confidence: Confidence::new(80),
            evidence: build_evidence(
                if records.is_live() { "Series Win Rate" } else { "Match Win Rate" },
                record.hits,
                record.total,
                &record.record_ids,
            )
            .truncate_ids(PREVIEW_IDS),
        });
    } else if rate >= 0.6 {
        exploits.push(Insight {
            id: EXPLOIT_OVEREXTENSION.to_string(),
            scope: InsightScope::Exploit,
            category: InsightCategory::Critical,
            severity: Severity::Low,
            title: "Over-Extension".to_string(),
            claim: format!(
                "{} tends to over-force plays when ahead, leading to throw potential",
                team
            ),
            value: "Discipline Gap".to_string(),
            confidence: Confidence::new(70),
            evidence: build_evidence(
                "Round Throw Rate (heuristic)",
                record.total * 3 / 10,
                record.total,
                &record.record_ids,
            )
            .truncate_ids(3),
        });
    }

    if exploits.len() < 2 {
        exploits.push(Insight {
            id: EXPLOIT_ROTATION.to_string(),
            scope: InsightScope::Exploit,
            category: InsightCategory::Critical,
            severity: Severity::Low,
            title: "Predictable Rotations".to_string(),
            claim: format!(
                "{}'s rotations run slower than the tier-one average",
                team
            ),
            value: "+3.2s Rotate".to_string(),
            confidence: Confidence::new(65),
            evidence: build_evidence("Rotation Latency (heuristic)", 1, 1, &record.record_ids)
                .truncate_ids(2)
                .with_matches(record.total as usize),
        });
    }

    let min_games = if records.is_live() { MIN_LIVE_GAMES } else { 1 };
    let roster = build_roster(records, ctx);
    let weak: Vec<&str> = roster
        .iter()
        .filter(|p| p.games >= min_games && p.kd() < 0.8)
        .map(|p| p.name.as_str())
        .collect();
    if !weak.is_empty() {
        let named = weak.iter().take(2).copied().collect::<Vec<_>>().join(" and ");
        exploits.push(Insight {
            id: EXPLOIT_PLAYERS.to_string(),
            scope: InsightScope::Exploit,
            category: InsightCategory::Critical,
            severity: Severity::Medium,
            title: "Vulnerable Players".to_string(),
            claim: format!(
                "Target {} - they consistently underperform with K/D < 0.8",
                named
            ),
            value: format!("{} Weak Links", weak.len()),
            confidence: Confidence::new(85),
            evidence: build_evidence(
                "Player K/D Analysis",
                weak.len() as u32,
                roster.len() as u32,
                &record.record_ids,
            )
            .truncate_ids(3),
        });
    }

    exploits
}

/// Search links for a team's series.
fn external_links(team: &str, series_id: Option<&str>) -> ExternalLinks {
    let search = |query: String| {
        Url::parse_with_params("https://www.google.com/search", &[("q", query)])
            .ok()
            .map(String::from)
    };
    ExternalLinks {
        vlr: search(format!(
            "{} valorant match {} vlr.gg",
            team,
            series_id.unwrap_or_default()
        )),
        liquipedia: search(format!("{} valorant liquipedia", team)),
        grid: Some("https://grid.gg/".to_string()),
    }
}
