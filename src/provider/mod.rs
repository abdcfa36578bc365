//! Live data provider client.
//!
//! Queries the provider's GraphQL endpoints for tournament series listings
//! and per-series state, caching responses for a configurable TTL. Raw
//! payloads are mapped into [`crate::models`] types in [`raw`].

pub mod cache;
pub mod raw;
pub mod tournaments;

pub use cache::{cache_key, Clock, ManualClock, ResponseCache, SystemClock};
pub use tournaments::{search_teams, tournaments_for_team, TeamListing, Tournament};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use crate::calculate::AnalysisContext;
use crate::config::ProviderConfig;
use crate::models::{LiveDataset, SeriesState, SeriesSummary};

use raw::{error_summary, AllSeriesData, GraphQlResponse, SeriesStateData};

/// Errors that can occur while talking to the provider.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Rate limited by {host}, retry after {retry_after_secs}s")]
    RateLimited { host: String, retry_after_secs: u64 },

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("Empty response for {0}")]
    EmptyResponse(String),

    #[error("API key not set (expected in ${0})")]
    MissingApiKey(String),
}

pub const SERIES_BY_TOURNAMENT_QUERY: &str = "\
    query GetSeriesByTournament($filter: SeriesFilter!, $first: Int = 50, $after: String) { \
    allSeries(first: $first after: $after filter: $filter orderBy: StartTimeScheduled) { \
    totalCount edges { node { id startTimeScheduled \
    teams { baseInfo { id name logoUrl } } tournament { id name } } } \
    pageInfo { hasNextPage endCursor } } }";

pub const SERIES_STATE_QUERY: &str = "\
    query GetSeriesState($seriesId: ID!) { \
    seriesState(id: $seriesId) { id started finished teams { id name won score } \
    games { id map { name } \
    teams { id name won players { id name kills deaths character { name } } } } } }";

/// Supplier of live series records.
#[async_trait]
pub trait SeriesSource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &'static str;

    /// Series scheduled in a tournament (children included).
    async fn series_for_tournament(
        &self,
        tournament_id: u32,
        first: usize,
    ) -> Result<Vec<SeriesSummary>, FetchError>;

    /// Post-match state of one series.
    async fn series_state(&self, series_id: &str) -> Result<SeriesState, FetchError>;
}

/// GraphQL client for the esports data provider.
pub struct GridClient {
    client: Client,
    central_url: Url,
    series_state_url: Url,
    timeout: Duration,
    listings: ResponseCache<Vec<SeriesSummary>>,
    states: ResponseCache<SeriesState>,
}

impl GridClient {
    /// Build a client, reading the API key from the configured variable.
    pub fn new(config: &ProviderConfig) -> Result<Self, FetchError> {
        let api_key = config
            .api_key()
            .ok_or_else(|| FetchError::MissingApiKey(config.api_key_env.clone()))?;
        Self::with_clock(config, &api_key, Arc::new(SystemClock))
    }

    /// Build a client with an explicit key and cache clock.
    pub fn with_clock(
        config: &ProviderConfig,
        api_key: &str,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(api_key)
                .map_err(|_| FetchError::MissingApiKey(config.api_key_env.clone()))?,
        );

        let client = Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            central_url: parse_url(&config.central_url)?,
            series_state_url: parse_url(&config.series_state_url)?,
            timeout: config.timeout(),
            listings: ResponseCache::new(config.cache_ttl(), clock.clone()),
            states: ResponseCache::new(config.cache_ttl(), clock),
        })
    }

    /// POST one GraphQL operation and unwrap its `data`.
    async fn post_graphql<T: DeserializeOwned>(
        &self,
        url: &Url,
        operation: &str,
        query: &str,
        variables: Value,
    ) -> Result<T, FetchError> {
        debug!("POST {} ({})", url, operation);

        let response = self
            .client
            .post(url.as_str())
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|e| self.classify_send_error(e))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);

            return Err(FetchError::RateLimited {
                host: url.host_str().unwrap_or("unknown").to_string(),
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.classify_send_error(e))?;
        let envelope: GraphQlResponse<T> = serde_json::from_slice(&body)?;

        if !envelope.errors.is_empty() {
            return Err(FetchError::GraphQl(error_summary(&envelope.errors)));
        }

        envelope
            .data
            .ok_or_else(|| FetchError::EmptyResponse(operation.to_string()))
    }

    /// Drop expired listings and series states.
    async fn purge_caches(&self) {
        let purged = self.listings.purge_expired().await + self.states.purge_expired().await;
        if purged > 0 {
            debug!("Purged {} expired cache entries", purged);
        }
    }

    fn classify_send_error(&self, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout(self.timeout.as_secs())
        } else {
            FetchError::Http(error)
        }
    }
}

fn parse_url(raw: &str) -> Result<Url, FetchError> {
    Url::parse(raw).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", raw, e)))
}

#[async_trait]
impl SeriesSource for GridClient {
    fn name(&self) -> &'static str {
        "grid"
    }

    async fn series_for_tournament(
        &self,
        tournament_id: u32,
        first: usize,
    ) -> Result<Vec<SeriesSummary>, FetchError> {
        let key = cache_key(
            "GetSeriesByTournament",
            &format!("{}/{}", tournament_id, first),
        );
        if let Some(cached) = self.listings.get(&key).await {
            return Ok(cached);
        }
        self.purge_caches().await;

        let variables = json!({
            "filter": {
                "tournament": {
                    "id": { "in": [tournament_id] },
                    "includeChildren": { "equals": true }
                }
            },
            "first": first
        });
        let data: AllSeriesData = self
            .post_graphql(
                &self.central_url,
                "GetSeriesByTournament",
                SERIES_BY_TOURNAMENT_QUERY,
                variables,
            )
            .await?;

        let series = data.into_summaries();
        self.listings.insert(key, series.clone()).await;
        Ok(series)
    }

    async fn series_state(&self, series_id: &str) -> Result<SeriesState, FetchError> {
        let key = cache_key("GetSeriesState", series_id);
        if let Some(cached) = self.states.get(&key).await {
            return Ok(cached);
        }

        let data: SeriesStateData = self
            .post_graphql(
                &self.series_state_url,
                "GetSeriesState",
                SERIES_STATE_QUERY,
                json!({ "seriesId": series_id }),
            )
            .await?;

        let state = data
            .series_state
            .ok_or_else(|| FetchError::EmptyResponse(format!("series {}", series_id)))?
            .into_state(series_id);
        self.states.insert(key, state.clone()).await;
        Ok(state)
    }
}

/// How much live data to pull for one report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPlan {
    pub tournaments_per_team: usize,
    pub series_per_tournament: usize,
    pub max_series_states: usize,
}

impl Default for FetchPlan {
    fn default() -> Self {
        Self::from(&ProviderConfig::default())
    }
}

impl From<&ProviderConfig> for FetchPlan {
    fn from(config: &ProviderConfig) -> Self {
        Self {
            tournaments_per_team: config.tournaments_per_team,
            series_per_tournament: config.series_per_tournament,
            max_series_states: config.max_series_states,
        }
    }
}

/// Gather the analyzed team's recent series and their states.
///
/// Lists the team's first tournaments, keeps series the team played (most
/// recent first, capped at the context's match limit), then fetches states
/// for the first `max_series_states` concurrently. Failed state fetches and
/// unfinished series are logged and dropped. A listing error is returned only when every
/// tournament request failed.
pub async fn fetch_live_dataset(
    source: Arc<dyn SeriesSource>,
    ctx: &AnalysisContext,
    plan: FetchPlan,
) -> Result<LiveDataset, FetchError> {
    let tournaments = tournaments_for_team(&ctx.team_name);
    let mut all_series: Vec<SeriesSummary> = Vec::new();
    let mut last_error = None;
    let mut listed = 0;

    for tournament in tournaments.iter().take(plan.tournaments_per_team) {
        match source
            .series_for_tournament(tournament.id, plan.series_per_tournament)
            .await
        {
            Ok(series) => {
                info!(
                    "Fetched {} series from {} via {}",
                    series.len(),
                    tournament.name,
                    source.name()
                );
                listed += 1;
                all_series.extend(series);
            }
            Err(e) => {
                warn!("Failed to list series for {}: {}", tournament.name, e);
                last_error = Some(e);
            }
        }
    }

    if listed == 0 {
        if let Some(e) = last_error {
            return Err(e);
        }
    }

    let mut matching: Vec<SeriesSummary> = all_series
        .into_iter()
        .filter(|s| {
            s.teams
                .iter()
                .any(|t| ctx.matches_team(&t.name, t.id.as_deref()))
        })
        .collect();
    matching.sort_by(|a, b| b.start_time_scheduled.cmp(&a.start_time_scheduled));
    matching.truncate(ctx.match_limit);
    info!("Found {} series for {}", matching.len(), ctx.team_name);

    let handles: Vec<_> = matching
        .iter()
        .take(plan.max_series_states)
        .map(|summary| {
            let source = source.clone();
            let series_id = summary.id.clone();
            tokio::spawn(async move {
                let result = source.series_state(&series_id).await;
                (series_id, result)
            })
        })
        .collect();

    let mut states = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await {
            Ok((series_id, Ok(state))) if !state.finished => {
                warn!("Skipping unfinished series {}", series_id)
            }
            Ok((_, Ok(state))) => states.push(state),
            Ok((series_id, Err(e))) => warn!("Skipping series {}: {}", series_id, e),
            Err(e) => warn!("Series state task failed: {}", e),
        }
    }
    debug!("Fetched {} series states", states.len());

    Ok(LiveDataset::new(matching, states))
}

/// In-memory series source for tests.
#[cfg(test)]
pub mod mock {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Default)]
    pub struct MockSource {
        pub listings: HashMap<u32, Vec<SeriesSummary>>,
        pub states: HashMap<String, SeriesState>,
        /// Listing requests left to fail; `usize::MAX` fails them all
        pub fail_listings: AtomicUsize,
        pub state_calls: AtomicUsize,
    }

    impl MockSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_listing(mut self, tournament_id: u32, series: Vec<SeriesSummary>) -> Self {
            self.listings.insert(tournament_id, series);
            self
        }

        pub fn with_state(mut self, state: SeriesState) -> Self {
            self.states.insert(state.id.clone(), state);
            self
        }

        pub fn failing() -> Self {
            Self::new().with_listing_failures(usize::MAX)
        }

        /// Fail the next `count` listing requests, then serve listings.
        pub fn with_listing_failures(self, count: usize) -> Self {
            self.fail_listings.store(count, Ordering::SeqCst);
            self
        }
    }

    #[async_trait]
    impl SeriesSource for MockSource {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn series_for_tournament(
            &self,
            tournament_id: u32,
            _first: usize,
        ) -> Result<Vec<SeriesSummary>, FetchError> {
            let failed = self
                .fail_listings
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| match left {
                    0 => None,
                    usize::MAX => Some(left),
                    _ => Some(left - 1),
                })
                .is_ok();
            if failed {
                return Err(FetchError::Timeout(10));
            }
            Ok(self.listings.get(&tournament_id).cloned().unwrap_or_default())
        }

        async fn series_state(&self, series_id: &str) -> Result<SeriesState, FetchError> {
            self.state_calls.fetch_add(1, Ordering::SeqCst);
            self.states
                .get(series_id)
                .cloned()
                .ok_or_else(|| FetchError::HttpStatus {
                    status: 404,
                    message: "Not Found".to_string(),
                })
        }
    }
}

#[cfg(test)]
pub mod fixtures {
    use chrono::{TimeZone, Utc};

    use crate::models::{
        Character, GameState, PlayerState, SeriesState, SeriesSummary, SeriesTeamState, TeamRef,
        TournamentRef,
    };

    pub fn summary(id: &str, day: u32, teams: &[&str]) -> SeriesSummary {
        SeriesSummary {
            id: id.to_string(),
            start_time_scheduled: Utc.with_ymd_and_hms(2024, 3, day, 18, 0, 0).single(),
            tournament: Some(TournamentRef {
                id: "757481".to_string(),
                name: "VCT Americas - Stage 1 2024".to_string(),
            }),
            teams: teams
                .iter()
                .map(|name| TeamRef {
                    name: name.to_string(),
                    ..Default::default()
                })
                .collect(),
        }
    }

    fn player(name: &str, kills: u32, deaths: u32, agent: &str) -> PlayerState {
        PlayerState {
            id: name.to_lowercase(),
            name: name.to_string(),
            kills,
            deaths,
            character: Some(Character {
                name: agent.to_string(),
            }),
        }
    }

    /// A two-map series between `team` and `opponent`.
    pub fn state(id: &str, team: &str, opponent: &str, team_won: bool) -> SeriesState {
        let lineup = || SeriesTeamState {
            name: team.to_string(),
            won: team_won,
            players: vec![
                player("Zekken", 22, 15, "Raze"),
                player("TenZ", 19, 16, "Jett"),
                player("Sacy", 14, 17, "Sova"),
                player("Johnqt", 12, 18, "Omen"),
                player("Zellsis", 16, 16, "Killjoy"),
            ],
            ..Default::default()
        };
        let rivals = || SeriesTeamState {
            name: opponent.to_string(),
            won: !team_won,
            ..Default::default()
        };

        SeriesState {
            id: id.to_string(),
            finished: true,
            teams: vec![
                SeriesTeamState {
                    score: if team_won { 2 } else { 0 },
                    ..lineup()
                },
                SeriesTeamState {
                    score: if team_won { 0 } else { 2 },
                    ..rivals()
                },
            ],
            games: ["Ascent", "Lotus"]
                .iter()
                .enumerate()
                .map(|(i, map)| GameState {
                    id: format!("{}-g{}", id, i + 1),
                    map: Some(map.to_string()),
                    teams: vec![lineup(), rivals()],
                })
                .collect(),
        }
    }
}
