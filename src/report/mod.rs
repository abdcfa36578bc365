//! Report assembly.
//!
//! [`assemble_report`] is the pure entry point: given a team and either
//! nothing (demo) or a fetched live dataset, it always returns a complete
//! report. When live data is present but unusable it substitutes
//! team-seeded fixtures and tags `metadata.mode` accordingly.
//!
//! [`ReportService`] wraps it with the fetch step and tracks the
//! idle -> fetching -> deriving -> assembled stage of the latest run.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;

use crate::calculate::{
    build_roster, compute_composition_insights, compute_exploits, compute_player_insights,
    compute_team_insights, generate_counters, maps_played, strongest_map, team_record,
    AnalysisContext, RecordSet,
};
use crate::demo::{demo_matches, placeholder_players};
use crate::models::{
    Game, LiveDataset, Match, MatchWindow, NamedLink, Overview, PlayerProfile, Report,
    ReportId, ReportMetadata, ReportMode, ReportSections, Role, RosterEntry, SeriesSummary,
    Verification,
};
use crate::provider::{fetch_live_dataset, FetchPlan, SeriesSource};

/// Provenance label for live reports.
pub const LIVE_SOURCE: &str = "GRID Esports Data Platform";

/// Tournament label when a series listing carries none.
const DEFAULT_TOURNAMENT: &str = "Official Match";

const PROFILE_LIMIT: usize = 5;
const PROFILE_AGENTS: usize = 3;

/// Build a report stamped with the current time.
///
/// `live` is `None` for a demo report.
pub fn assemble_report(team_name: &str, live: Option<&LiveDataset>, match_limit: usize) -> Report {
    assemble_report_at(team_name, live, match_limit, Utc::now())
}

/// Build a report with an explicit generation time.
pub fn assemble_report_at(
    team_name: &str,
    live: Option<&LiveDataset>,
    match_limit: usize,
    generated_at: DateTime<Utc>,
) -> Report {
    let Some(dataset) = live else {
        return assemble_demo_report_at(team_name, match_limit, ReportMode::Demo, generated_at);
    };

    if dataset.series_list.is_empty() {
        info!("No series found for {}, using demo data", team_name);
        return assemble_demo_report_at(
            team_name,
            match_limit,
            ReportMode::DemoNoMatch,
            generated_at,
        );
    }

    let ctx = resolve_context(team_name, dataset, match_limit);
    let records = RecordSet::Series(dataset);
    if team_record(records, &ctx).total == 0 {
        warn!(
            "{} series listed for {} but no usable series states",
            dataset.series_list.len(),
            ctx.team_name
        );
        return assemble_demo_report_at(
            team_name,
            match_limit,
            ReportMode::DemoFallback,
            generated_at,
        );
    }

    let mut report = derive(records, &ctx, ReportMode::Grid, generated_at);
    report.sections.overview.match_window = series_window(dataset);
    report.verification = verification(dataset);
    if report.sections.players.is_empty() {
        info!("No player stats found, generating placeholder players for {}", ctx.team_name);
        report.sections.players = placeholder_profiles(&ctx.team_name);
    }
    report
}

/// Build a report from team-seeded fixtures under the given mode.
pub fn assemble_demo_report_at(
    team_name: &str,
    match_limit: usize,
    mode: ReportMode,
    generated_at: DateTime<Utc>,
) -> Report {
    let matches = demo_matches(team_name, match_limit);
    let ctx = AnalysisContext::new(team_name, match_limit);
    let mut report = derive(RecordSet::Matches(&matches), &ctx, mode, generated_at);
    report.sections.overview.match_window = match_window(&matches);
    report
}

/// Analysis context for a live dataset.
///
/// The first listed series the team played supplies its canonical name
/// and, when present, its provider ID.
fn resolve_context(team_name: &str, dataset: &LiveDataset, match_limit: usize) -> AnalysisContext {
    let requested = AnalysisContext::new(team_name, match_limit);
    let found = dataset
        .series_list
        .iter()
        .flat_map(|s| s.teams.iter())
        .find(|t| requested.matches_team(&t.name, t.id.as_deref()));

    match found {
        Some(team) => {
            debug!("Resolved {} to {}", team_name, team.name);
            let ctx = AnalysisContext::new(team.name.clone(), match_limit);
            match team.id.as_deref().filter(|id| !id.is_empty()) {
                Some(id) => ctx.with_team_id(id),
                None => ctx,
            }
        }
        None => requested,
    }
}

/// Run the full derivation pipeline over one record set.
fn derive(
    records: RecordSet<'_>,
    ctx: &AnalysisContext,
    mode: ReportMode,
    generated_at: DateTime<Utc>,
) -> Report {
    let team_insights = compute_team_insights(records, ctx);
    let player_insights = compute_player_insights(records, ctx);
    let comp_insights = compute_composition_insights(records, ctx);

    let rated: Vec<_> = team_insights
        .iter()
        .chain(&player_insights)
        .cloned()
        .collect();
    let exploits = compute_exploits(&rated, records, ctx);

    let roster = build_roster(records, ctx);
    let pool = map_pool(records, ctx);
    let weaknesses: Vec<_> = team_insights.iter().chain(&exploits).cloned().collect();
    let how_to_win = generate_counters(&weaknesses, &roster, &pool);

    let record = team_record(records, ctx);
    debug!(
        "Derived {} team, {} player, {} comp insights, {} exploits, {} counters",
        team_insights.len(),
        player_insights.len(),
        comp_insights.len(),
        exploits.len(),
        how_to_win.len()
    );

    Report {
        metadata: ReportMetadata {
            report_id: ReportId::for_report(&ctx.team_name, mode.as_str(), ctx.match_limit),
            team_name: ctx.team_name.clone(),
            generated_at,
            mode,
            last_n: ctx.match_limit,
            game: Game::detect(&ctx.team_name),
        },
        verification: None,
        sections: ReportSections {
            overview: Overview {
                matches_analyzed: record.total as usize,
                overall_win_rate: record.rate(),
                maps_played: maps_played(records, ctx),
                match_window: MatchWindow::unknown(),
            },
            players: profiles(&roster, ctx.match_limit),
            team_insights,
            player_insights,
            comp_insights,
            exploits,
            how_to_win,
        },
    }
}

/// Maps for the veto counter: strongest first, then first-seen order.
fn map_pool(records: RecordSet<'_>, ctx: &AnalysisContext) -> Vec<String> {
    let mut maps = maps_played(records, ctx);
    if let RecordSet::Matches(matches) = records {
        if let Some(best) = strongest_map(matches) {
            maps.retain(|m| *m != best.map);
            maps.insert(0, best.map);
        }
    }
    maps
}

fn match_window(matches: &[Match]) -> MatchWindow {
    let first = matches.iter().map(|m| m.date).min();
    let last = matches.iter().map(|m| m.date).max();
    match (first, last) {
        (Some(first), Some(last)) => MatchWindow {
            first: first.format("%Y-%m-%d").to_string(),
            last: last.format("%Y-%m-%d").to_string(),
        },
        _ => MatchWindow::unknown(),
    }
}

/// Window of a live listing, which is ordered most recent first.
fn series_window(dataset: &LiveDataset) -> MatchWindow {
    let day = |s: Option<&SeriesSummary>| {
        s.and_then(|s| s.start_time_scheduled)
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "N/A".to_string())
    };
    MatchWindow {
        first: day(dataset.series_list.last()),
        last: day(dataset.series_list.first()),
    }
}

/// Provenance from the first successfully fetched series state.
fn verification(dataset: &LiveDataset) -> Option<Verification> {
    let state = dataset.series_states.first()?;
    let tournament = dataset
        .summary(&state.id)
        .and_then(|s| s.tournament.as_ref())
        .map(|t| t.name.clone())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_TOURNAMENT.to_string());
    Some(Verification {
        source: LIVE_SOURCE.to_string(),
        series_id: state.id.clone(),
        tournament,
        verified: true,
    })
}

fn kd_tendency(kd: f64) -> &'static str {
    if kd > 1.3 {
        "Elite fragger - top damage contributor"
    } else if kd > 1.1 {
        "High impact player - wins key duels"
    } else if kd > 0.9 {
        "Consistent performer - reliable trades"
    } else {
        "Support-oriented - enables teammates"
    }
}

fn role_tendency(role: Role) -> &'static str {
    match role {
        Role::Duelist => "Aggressive entry - first contact seeker",
        Role::Controller => "Map control focus - denies space",
        Role::Sentinel => "Anchor player - holds sites solo",
        Role::Initiator => "Info gatherer - enables executes",
        Role::Flex => "Flex pick - adapts to team needs",
    }
}

fn vlr_link(name: &str) -> Option<NamedLink> {
    let url = Url::parse_with_params("https://vlr.gg/search", &[("q", name)]).ok()?;
    Some(NamedLink {
        name: "VLR.gg".to_string(),
        url: url.to_string(),
    })
}

fn liquipedia_link(name: &str) -> Option<NamedLink> {
    let mut url = Url::parse("https://liquipedia.net/valorant").ok()?;
    url.path_segments_mut().ok()?.push(&name.replacen(' ', "_", 1));
    Some(NamedLink {
        name: "Liquipedia".to_string(),
        url: url.to_string(),
    })
}

/// Player cards for the first five roster entries.
fn profiles(roster: &[RosterEntry], match_limit: usize) -> Vec<PlayerProfile> {
    roster
        .iter()
        .take(PROFILE_LIMIT)
        .enumerate()
        .map(|(idx, player)| {
            let role = player.role_or_slot(idx);
            let games = (player.games as usize).min(match_limit).max(1);
            PlayerProfile {
                name: player.name.clone(),
                ign: player.name.clone(),
                role,
                agents: player.agents.iter().take(PROFILE_AGENTS).cloned().collect(),
                tendencies: vec![
                    kd_tendency(player.kd()).to_string(),
                    format!("{:.1} kills/game average", player.kills as f64 / games as f64),
                    role_tendency(role).to_string(),
                ],
                external_links: [vlr_link(&player.name), liquipedia_link(&player.name)]
                    .into_iter()
                    .flatten()
                    .collect(),
            }
        })
        .collect()
}

/// Seeded stand-in cards for a live team with no player data.
fn placeholder_profiles(team_name: &str) -> Vec<PlayerProfile> {
    placeholder_players(team_name)
        .into_iter()
        .enumerate()
        .map(|(i, player)| PlayerProfile {
            ign: player.name.clone(),
            role: Role::for_index(i),
            agents: vec![player.agent],
            tendencies: vec![
                "Data pending from GRID".to_string(),
                format!("Player {} on roster", i + 1),
                "Stats being collected".to_string(),
            ],
            external_links: vlr_link(&player.name).into_iter().collect(),
            name: player.name,
        })
        .collect()
}

/// Where report data should come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    #[default]
    Demo,
    Live,
}

/// Stage of the most recent report run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssemblyStage {
    #[default]
    Idle,
    Fetching,
    Deriving,
    Assembled,
}

/// Status of the report service.
///
/// Reports run concurrently share one status, so `stage` and the `last_*`
/// fields describe whichever run updated them most recently.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceState {
    pub stage: AssemblyStage,
    pub last_team: Option<String>,
    pub last_mode: Option<ReportMode>,
    pub last_generated_at: Option<DateTime<Utc>>,
    pub reports_generated: u64,
    /// Failure of the most recent live fetch, cleared once a live fetch succeeds
    pub last_error: Option<String>,
}

/// Generates reports, fetching live data when asked and available.
///
/// Never fails: fetch errors and a missing live source route to
/// team-seeded fixtures with `mode = demo-error`.
pub struct ReportService {
    source: Option<Arc<dyn SeriesSource>>,
    plan: FetchPlan,
    state: Arc<RwLock<ServiceState>>,
}

impl ReportService {
    pub fn new(source: Option<Arc<dyn SeriesSource>>, plan: FetchPlan) -> Self {
        Self {
            source,
            plan,
            state: Arc::new(RwLock::new(ServiceState::default())),
        }
    }

    /// A service without a live source.
    pub fn demo_only() -> Self {
        Self::new(None, FetchPlan::default())
    }

    pub fn has_live_source(&self) -> bool {
        self.source.is_some()
    }

    pub async fn state(&self) -> ServiceState {
        self.state.read().await.clone()
    }

    async fn enter(&self, stage: AssemblyStage) {
        debug!("Report stage -> {:?}", stage);
        self.state.write().await.stage = stage;
    }

    /// Generate a report for `team_name` over its last `match_limit` records.
    pub async fn generate(
        &self,
        team_name: &str,
        match_limit: usize,
        data_source: DataSource,
    ) -> Report {
        info!(
            "Generating {:?} report for {} (last {})",
            data_source, team_name, match_limit
        );
        self.enter(AssemblyStage::Fetching).await;

        let fetched = match (data_source, &self.source) {
            (DataSource::Demo, _) => Ok(None),
            (DataSource::Live, None) => Err("no live data source configured".to_string()),
            (DataSource::Live, Some(source)) => {
                let ctx = AnalysisContext::new(team_name, match_limit);
                fetch_live_dataset(source.clone(), &ctx, self.plan)
                    .await
                    .map(Some)
                    .map_err(|e| e.to_string())
            }
        };

        self.enter(AssemblyStage::Deriving).await;
        let report = match &fetched {
            Ok(live) => assemble_report(team_name, live.as_ref(), match_limit),
            Err(e) => {
                warn!("Live fetch failed for {}: {}, using demo data", team_name, e);
                assemble_demo_report_at(team_name, match_limit, ReportMode::DemoError, Utc::now())
            }
        };

        let mut state = self.state.write().await;
        state.stage = AssemblyStage::Assembled;
        state.last_team = Some(report.metadata.team_name.clone());
        state.last_mode = Some(report.metadata.mode);
        state.last_generated_at = Some(report.metadata.generated_at);
        state.reports_generated += 1;
        match fetched {
            Err(e) => state.last_error = Some(e),
            Ok(Some(_)) => state.last_error = None,
            Ok(None) => {}
        }
        info!(
            "Report {} assembled for {} ({})",
            report.metadata.report_id, report.metadata.team_name, report.metadata.mode
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SeriesState, SeriesTeamState};
    use crate::provider::fixtures::{state, summary};
    use crate::provider::mock::MockSource;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap()
    }

    fn demo(team: &str) -> Report {
        assemble_report_at(team, None, 10, at())
    }

    fn live_dataset() -> LiveDataset {
        LiveDataset::new(
            vec![
                summary("s2", 5, &["Sentinels", "NRG"]),
                summary("s1", 1, &["Sentinels", "100 Thieves"]),
            ],
            vec![
                state("s2", "Sentinels", "NRG", true),
                state("s1", "Sentinels", "100 Thieves", false),
            ],
        )
    }

    fn names(report: &Report) -> Vec<String> {
        report.sections.players.iter().map(|p| p.name.clone()).collect()
    }

    #[test]
    fn test_demo_report_is_deterministic() {
        assert_eq!(demo("Sentinels"), demo("Sentinels"));
    }

    #[test]
    fn test_demo_reports_differ_between_teams() {
        let a = demo("Sentinels");
        let b = demo("Cloud9");
        assert_ne!(names(&a), names(&b));
        assert_ne!(
            a.sections.overview.overall_win_rate,
            b.sections.overview.overall_win_rate
        );
    }

    #[test]
    fn test_demo_report_shape() {
        let report = demo("Sentinels");
        assert_eq!(report.metadata.mode, ReportMode::Demo);
        assert_eq!(report.metadata.game, Game::Valorant);
        assert_eq!(report.metadata.last_n, 10);
        assert_eq!(report.metadata.generated_at, at());
        assert_eq!(
            report.metadata.report_id,
            ReportId::for_report("Sentinels", "demo", 10)
        );
        assert!(report.verification.is_none());

        let overview = &report.sections.overview;
        assert_eq!(overview.matches_analyzed, 8);
        assert_eq!(overview.overall_win_rate, 0.5);
        assert_eq!(overview.match_window.first, "2024-01-08");
        assert_eq!(overview.match_window.last, "2024-02-26");
        assert_eq!(report.sections.team_insights.len(), 5);
        assert_eq!(report.sections.players.len(), 5);
    }

    #[test]
    fn test_maps_played_are_unique() {
        for team in ["Sentinels", "Cloud9", "T1", "Unknown Squad"] {
            let maps = demo(team).sections.overview.maps_played;
            let mut deduped = maps.clone();
            deduped.sort();
            deduped.dedup();
            assert_eq!(maps.len(), deduped.len());
        }
    }

    #[test]
    fn test_confidence_bounds_and_counter_floor() {
        let reports = [
            demo("Sentinels"),
            demo("Cloud9"),
            assemble_report_at("Sentinels", Some(&live_dataset()), 10, at()),
            assemble_report_at("x", None, 0, at()),
        ];
        for report in &reports {
            for insight in report.sections.all_insights() {
                assert!(insight.confidence.value() <= 100);
            }
            for counter in &report.sections.how_to_win {
                assert!(counter.confidence.value() <= 100);
            }
            assert!(report.sections.how_to_win.len() >= 2);
            assert!((0.0..=1.0).contains(&report.sections.overview.overall_win_rate));
        }
    }

    #[test]
    fn test_empty_demo_window() {
        let report = assemble_report_at("Sentinels", None, 0, at());
        assert_eq!(report.sections.overview.matches_analyzed, 0);
        assert_eq!(report.sections.overview.match_window, MatchWindow::unknown());
        assert!(report.sections.players.is_empty());
    }

    #[test]
    fn test_live_report() {
        let report = assemble_report_at("sentinels", Some(&live_dataset()), 10, at());

        assert_eq!(report.metadata.mode, ReportMode::Grid);
        assert_eq!(report.metadata.team_name, "Sentinels");
        assert_eq!(
            report.verification,
            Some(Verification {
                source: LIVE_SOURCE.to_string(),
                series_id: "s2".to_string(),
                tournament: "VCT Americas - Stage 1 2024".to_string(),
                verified: true,
            })
        );

        let overview = &report.sections.overview;
        assert_eq!(overview.matches_analyzed, 2);
        assert_eq!(overview.overall_win_rate, 0.5);
        assert_eq!(overview.maps_played, vec!["Ascent", "Lotus"]);
        assert_eq!(overview.match_window.first, "2024-03-01");
        assert_eq!(overview.match_window.last, "2024-03-05");

        let ids: Vec<_> = report
            .sections
            .team_insights
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(ids, vec!["team-win-rate", "team-map-pool"]);
        assert_eq!(report.sections.player_insights.len(), 5);
    }

    #[test]
    fn test_live_player_profiles() {
        let report = assemble_report_at("Sentinels", Some(&live_dataset()), 10, at());
        let zekken = &report.sections.players[0];

        assert_eq!(zekken.name, "Zekken");
        assert_eq!(zekken.role, Role::Duelist);
        assert_eq!(zekken.agents, vec!["Raze"]);
        assert_eq!(
            zekken.tendencies,
            vec![
                "Elite fragger - top damage contributor",
                "22.0 kills/game average",
                "Aggressive entry - first contact seeker",
            ]
        );
        assert_eq!(zekken.external_links[0].url, "https://vlr.gg/search?q=Zekken");
        assert_eq!(
            zekken.external_links[1].url,
            "https://liquipedia.net/valorant/Zekken"
        );
        assert_eq!(report.sections.players[1].role, Role::Controller);
    }

    #[test]
    fn test_liquipedia_link_encoding() {
        let link = liquipedia_link("Boaster Jr Two").unwrap();
        assert_eq!(link.url, "https://liquipedia.net/valorant/Boaster_Jr%20Two");
    }

    #[test]
    fn test_no_match_falls_back() {
        let report = assemble_report_at("Sentinels", Some(&LiveDataset::default()), 10, at());
        assert_eq!(report.metadata.mode, ReportMode::DemoNoMatch);
        assert_eq!(names(&report), names(&demo("Sentinels")));
        assert!(report.verification.is_none());
    }

    #[test]
    fn test_unusable_states_fall_back() {
        let dataset = LiveDataset::new(
            vec![summary("s1", 1, &["Sentinels", "NRG"])],
            vec![state("s1", "Cloud9", "NRG", true)],
        );
        let report = assemble_report_at("Sentinels", Some(&dataset), 10, at());
        assert_eq!(report.metadata.mode, ReportMode::DemoFallback);
        assert!(report.metadata.mode.is_substituted());
    }

    #[test]
    fn test_live_without_players_gets_placeholders() {
        let bare = |id: &str| SeriesState {
            id: id.to_string(),
            finished: true,
            teams: vec![
                SeriesTeamState {
                    name: "Sentinels".to_string(),
                    won: true,
                    ..Default::default()
                },
                SeriesTeamState {
                    name: "NRG".to_string(),
                    ..Default::default()
                },
            ],
            games: vec![],
        };
        let dataset = LiveDataset::new(
            vec![summary("s1", 1, &["Sentinels", "NRG"])],
            vec![bare("s1")],
        );

        let report = assemble_report_at("Sentinels", Some(&dataset), 10, at());
        assert_eq!(report.metadata.mode, ReportMode::Grid);
        assert_eq!(report.sections.players.len(), 5);
        assert_eq!(
            report.sections.players[0].tendencies[0],
            "Data pending from GRID"
        );
        assert_eq!(report.sections.players[4].role, Role::Flex);
        assert_eq!(
            report.verification.map(|v| v.tournament),
            Some("VCT Americas - Stage 1 2024".to_string())
        );
    }

    #[test]
    fn test_map_pool_puts_strongest_first() {
        use crate::models::Score;
        use chrono::NaiveDate;

        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let win = Score { team: 13, opponent: 5 };
        let loss = Score { team: 5, opponent: 13 };
        let matches = vec![
            Match::new("m1", day, "t", "A", "Haven", loss),
            Match::new("m2", day, "t", "B", "Ascent", win),
            Match::new("m3", day, "t", "C", "Bind", win),
        ];
        let ctx = AnalysisContext::new("T", 10);
        assert_eq!(
            map_pool(RecordSet::Matches(&matches), &ctx),
            vec!["Ascent", "Haven", "Bind"]
        );
    }

    #[tokio::test]
    async fn test_service_demo() {
        let service = ReportService::demo_only();
        assert_eq!(service.state().await.stage, AssemblyStage::Idle);

        let report = service.generate("Sentinels", 10, DataSource::Demo).await;
        assert_eq!(report.metadata.mode, ReportMode::Demo);

        let state = service.state().await;
        assert_eq!(state.stage, AssemblyStage::Assembled);
        assert_eq!(state.reports_generated, 1);
        assert_eq!(state.last_mode, Some(ReportMode::Demo));
    }

    #[tokio::test]
    async fn test_service_live() {
        let source = MockSource::new()
            .with_listing(757371, vec![summary("s1", 1, &["Sentinels", "NRG"])])
            .with_state(state("s1", "Sentinels", "NRG", true));
        let service = ReportService::new(Some(Arc::new(source)), FetchPlan::default());

        let report = service.generate("Sentinels", 10, DataSource::Live).await;
        assert_eq!(report.metadata.mode, ReportMode::Grid);
        assert_eq!(report.sections.overview.overall_win_rate, 1.0);
    }

    #[tokio::test]
    async fn test_service_live_ignores_unfinished_series() {
        let mut in_progress = state("s2", "Sentinels", "NRG", false);
        in_progress.finished = false;
        for team in in_progress.teams.iter_mut() {
            team.won = false;
        }
        let source = MockSource::new()
            .with_listing(
                757371,
                vec![
                    summary("s1", 1, &["Sentinels", "Cloud9"]),
                    summary("s2", 2, &["Sentinels", "NRG"]),
                ],
            )
            .with_state(state("s1", "Sentinels", "Cloud9", true))
            .with_state(in_progress);
        let service = ReportService::new(Some(Arc::new(source)), FetchPlan::default());

        let report = service.generate("Sentinels", 10, DataSource::Live).await;
        assert_eq!(report.metadata.mode, ReportMode::Grid);
        assert_eq!(report.sections.overview.matches_analyzed, 1);
        assert_eq!(report.sections.overview.overall_win_rate, 1.0);
        let verified = report.verification.map(|v| v.series_id);
        assert_eq!(verified.as_deref(), Some("s1"));
    }

    #[tokio::test]
    async fn test_service_clears_error_after_live_success() {
        // Each live fetch lists two tournaments, so the first run fails both
        let source = MockSource::new()
            .with_listing(757371, vec![summary("s1", 1, &["Sentinels", "NRG"])])
            .with_state(state("s1", "Sentinels", "NRG", true))
            .with_listing_failures(2);
        let service = ReportService::new(Some(Arc::new(source)), FetchPlan::default());

        let first = service.generate("Sentinels", 10, DataSource::Live).await;
        assert_eq!(first.metadata.mode, ReportMode::DemoError);
        assert!(service.state().await.last_error.is_some());

        let second = service.generate("Sentinels", 10, DataSource::Live).await;
        assert_eq!(second.metadata.mode, ReportMode::Grid);
        let status = service.state().await;
        assert_eq!(status.last_error, None);
        assert_eq!(status.reports_generated, 2);
    }

    #[tokio::test]
    async fn test_service_live_no_match() {
        let source =
            MockSource::new().with_listing(757371, vec![summary("s1", 1, &["NRG", "Cloud9"])]);
        let service = ReportService::new(Some(Arc::new(source)), FetchPlan::default());

        let report = service.generate("Sentinels", 10, DataSource::Live).await;
        assert_eq!(report.metadata.mode, ReportMode::DemoNoMatch);
    }

    #[tokio::test]
    async fn test_service_fetch_error_routes_to_demo() {
        let service =
            ReportService::new(Some(Arc::new(MockSource::failing())), FetchPlan::default());

        let report = service.generate("Sentinels", 10, DataSource::Live).await;
        assert_eq!(report.metadata.mode, ReportMode::DemoError);
        assert_eq!(names(&report), names(&demo("Sentinels")));

        let state = service.state().await;
        assert_eq!(state.stage, AssemblyStage::Assembled);
        assert!(state.last_error.is_some());
    }

    #[tokio::test]
    async fn test_service_without_source_routes_to_demo() {
        let service = ReportService::demo_only();
        assert!(!service.has_live_source());
        let report = service.generate("Sentinels", 10, DataSource::Live).await;
        assert_eq!(report.metadata.mode, ReportMode::DemoError);
    }
}
