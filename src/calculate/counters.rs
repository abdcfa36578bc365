//! "How to win" counter-strategy generation.

use crate::models::{Confidence, Counter, Evidence, Insight, InsightScope, Role, RosterEntry};

use super::{
    build_evidence, EXPLOIT_FORM, EXPLOIT_OVEREXTENSION, EXPLOIT_PLAYERS, EXPLOIT_ROTATION,
    TEAM_CLOSE_MATCHES, TEAM_DEFENSE, TEAM_ECO_DISCIPLINE, TEAM_MAP_POOL, TEAM_MAP_STRENGTH,
    TEAM_SITE_PREFERENCE, TEAM_WIN_RATE,
};

/// Weakness-derived counters are topped up to this many.
pub const MIN_COUNTERS: usize = 2;

/// Players that get their own counter.
const MAX_PLAYER_COUNTERS: usize = 5;

/// K/D above which a player is focused rather than countered by role.
const STAR_KD: f64 = 1.2;

/// Ceiling for counters not backed by a statistic.
const SYNTHETIC_CEILING: u8 = 70;

struct Play {
    key: &'static str,
    title: &'static str,
    condition: &'static str,
    action: &'static str,
    outcome: &'static str,
    heuristic: bool,
}

const FORM_PLAY: Play = Play {
    key: "form",
    title: "Punish Their Slump",
    condition: "Early in the series",
    action: "Apply early pressure and deny them momentum rounds",
    outcome: "Compound a {value} run of form",
    heuristic: false,
};

const ROTATION_PLAY: Play = Play {
    key: "rotation",
    title: "Exploit Slow Rotations",
    condition: "Mid-round",
    action: "Fake one site with utility, then hit the other once they rotate",
    outcome: "Beat their rotation to the site",
    heuristic: true,
};

const DEFAULTS_PLAY: Play = Play {
    key: "defaults",
    title: "Probe Their Defaults",
    condition: "First rounds of each half",
    action: "Spend early utility to read their default setup before committing",
    outcome: "Find the gap in their default and punish it",
    heuristic: true,
};

/// Play for a weakness, keyed so mirrored insights map to one counter.
fn play_for(insight: &Insight) -> Option<Play> {
    let id = insight.id.strip_prefix("exploit-").unwrap_or(&insight.id);
    let play = match insight.id.as_str() {
        EXPLOIT_FORM => FORM_PLAY,
        EXPLOIT_ROTATION => ROTATION_PLAY,
        EXPLOIT_OVEREXTENSION => Play {
            key: "overextension",
            title: "Bait Over-Extensions",
            condition: "When they are ahead in the round",
            action: "Give ground and set crossfires for their over-forced pushes",
            outcome: "Turn their aggression into free picks",
            heuristic: true,
        },
        EXPLOIT_PLAYERS => Play {
            key: "players",
            title: "Target Weak Links",
            condition: "On first contact",
            action: "Isolate their low-K/D players in duels and trade off them",
            outcome: "Win early numbers advantages",
            heuristic: false,
        },
        _ => match id {
            TEAM_WIN_RATE => FORM_PLAY,
            TEAM_SITE_PREFERENCE => Play {
                key: TEAM_SITE_PREFERENCE,
                title: "Shut Down Their Attack",
                condition: "On defense",
                action: "Stack early on their preferred site and force slow executes",
                outcome: "Hold their attack at {value}",
                heuristic: false,
            },
            TEAM_ECO_DISCIPLINE => Play {
                key: TEAM_ECO_DISCIPLINE,
                title: "Punish Light Buys",
                condition: "When they eco or force buy",
                action: "Play for trades at range and deny cheap entry kills",
                outcome: "Convert their {value} light-buy success into economic leads",
                heuristic: false,
            },
            TEAM_MAP_STRENGTH => Play {
                key: TEAM_MAP_STRENGTH,
                title: "Take Your Comfort Maps",
                condition: "During map selection",
                action: "Pick your own strongest maps; their best map only yields {value}",
                outcome: "Fight where they have no edge",
                heuristic: false,
            },
            TEAM_DEFENSE => Play {
                key: TEAM_DEFENSE,
                title: "Attack With Tempo",
                condition: "On attack",
                action: "Execute fast before their defensive setups settle",
                outcome: "Exploit their {value} defensive round rate",
                heuristic: false,
            },
            TEAM_CLOSE_MATCHES => Play {
                key: TEAM_CLOSE_MATCHES,
                title: "Drag Games Late",
                condition: "When the score is close",
                action: "Keep rounds tight and save resources for late-half pressure",
                outcome: "They convert only {value} of close matches",
                heuristic: false,
            },
            _ => return None,
        },
    };
    Some(play)
}

fn counter_from(
    id: String,
    play: &Play,
    value: &str,
    confidence: Confidence,
    evidence: Evidence,
) -> Counter {
    let confidence = if play.heuristic {
        confidence.capped(SYNTHETIC_CEILING)
    } else {
        confidence
    };
    Counter {
        id,
        title: play.title.to_string(),
        condition: play.condition.to_string(),
        action: play.action.replace("{value}", value),
        expected_outcome: play.outcome.replace("{value}", value),
        confidence,
        evidence,
        synthetic: play.heuristic,
    }
}

/// Role-templated counter: (condition, action, outcome).
fn role_play(role: Role) -> (&'static str, &'static str, &'static str) {
    match role {
        Role::Duelist => (
            "When they entry",
            "Stack utility on chokepoints - Mollies, Shocks, Flashes",
            "Deny entry and force fallback",
        ),
        Role::Controller => (
            "During smoke phase",
            "Push through smokes aggressively before refresh",
            "Catch them off-guard during cooldown",
        ),
        Role::Sentinel => (
            "On retake",
            "Clear utility traps first, then swing together",
            "Avoid 1-by-1 picks from setups",
        ),
        Role::Initiator => (
            "After info ability used",
            "Reposition immediately - they know your spot",
            "Avoid easy trade setup",
        ),
        Role::Flex => (
            "During rotation",
            "Send 1 lurker to their common flank route",
            "Catch predictable rotation pattern",
        ),
    }
}

fn player_counter(idx: usize, player: &RosterEntry) -> Counter {
    let role = player.role_or_slot(idx);
    let kd = player.kd();
    let (condition, action, outcome) = if kd > STAR_KD {
        (
            format!("When {} is alive", player.name),
            format!("Focus {} first - trade immediately after contact", player.name),
            format!(
                "Remove their {:.1} kills/game threat",
                player.kills_per_game()
            ),
        )
    } else {
        let (condition, action, outcome) = role_play(role);
        (condition.to_string(), action.to_string(), outcome.to_string())
    };
    let score = (70.0 + (kd * 10.0).round()).min(92.0);

    Counter {
        id: format!("htw-player-{}", idx),
        title: format!("Counter: {}", player.name),
        condition,
        action,
        expected_outcome: outcome,
        confidence: Confidence::new(score as i64),
        evidence: build_evidence(
            format!("{} Counter Analysis", role),
            player.kills,
            player.deaths.max(1),
            &player.match_ids,
        )
        .with_matches(player.games as usize)
        .truncate_ids(2),
        synthetic: false,
    }
}

/// Generate counter-strategies.
///
/// Output order is weakness-derived counters (topped up with synthetic
/// fallbacks to [`MIN_COUNTERS`]), then one per roster player (first five),
/// then a map-veto counter when at least two maps were played.
pub fn generate_counters(
    insights: &[Insight],
    roster: &[RosterEntry],
    map_pool: &[String],
) -> Vec<Counter> {
    let mut counters = Vec::new();
    let mut keys: Vec<&'static str> = Vec::new();

    for insight in insights
        .iter()
        .filter(|i| i.is_critical() && i.scope != InsightScope::Player)
    {
        let Some(play) = play_for(insight) else {
            continue;
        };
        if keys.contains(&play.key) {
            continue;
        }
        keys.push(play.key);
        counters.push(counter_from(
            format!("htw-weak-{}", counters.len()),
            &play,
            &insight.value,
            insight.confidence,
            insight.evidence.clone(),
        ));
    }

    let fallbacks = [(ROTATION_PLAY, 65), (DEFAULTS_PLAY, 60)];
    for (play, score) in fallbacks.iter() {
        if counters.len() >= MIN_COUNTERS {
            break;
        }
        if keys.contains(&play.key) {
            continue;
        }
        keys.push(play.key);
        counters.push(counter_from(
            format!("htw-fallback-{}", counters.len()),
            play,
            "",
            Confidence::new(*score),
            build_evidence::<&str>(format!("{} (heuristic)", play.title), 1, 1, &[]),
        ));
    }

    counters.extend(
        roster
            .iter()
            .take(MAX_PLAYER_COUNTERS)
            .enumerate()
            .map(|(idx, player)| player_counter(idx, player)),
    );

    if map_pool.len() >= 2 {
        let basis = insights
            .iter()
            .find(|i| i.id == TEAM_MAP_STRENGTH || i.id == TEAM_MAP_POOL);
        let mut evidence = build_evidence(
            "Map Pool Analysis",
            1,
            map_pool.len() as u32,
            basis.map(|i| i.evidence.match_ids.as_slice()).unwrap_or(&[]),
        )
        .truncate_ids(3);
        if let Some(basis) = basis {
            evidence = evidence.with_matches(basis.evidence.sample_size.matches);
        }
        let target = if map_pool.len() > 2 {
            "unfamiliar"
        } else {
            "less practiced"
        };
        counters.push(Counter {
            id: "htw-map-veto".to_string(),
            title: "Map Veto Strategy".to_string(),
            condition: "During map selection".to_string(),
            action: format!(
                "Ban {} - their comfort pick. Force them onto {} maps",
                map_pool[0], target
            ),
            expected_outcome: "Reduce their map advantage and prepared strats".to_string(),
            confidence: Confidence::new(80),
            evidence,
            synthetic: false,
        });
    }

    counters
}
