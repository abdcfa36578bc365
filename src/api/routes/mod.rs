use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::Report;
use crate::provider::{search_teams, TeamListing};
use crate::report::{DataSource, ServiceState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub live_source: bool,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        live_source: state.reports.has_live_source(),
    })
}

pub async fn status(State(state): State<AppState>) -> Json<ServiceState> {
    Json(state.reports.state().await)
}

#[derive(Debug, Deserialize)]
pub struct TeamSearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TeamSearchResponse {
    pub teams: Vec<TeamListing>,
    pub total: usize,
}

pub async fn list_teams(Query(params): Query<TeamSearchParams>) -> Json<TeamSearchResponse> {
    let teams = search_teams(params.q.as_deref().unwrap_or(""));
    Json(TeamSearchResponse {
        total: teams.len(),
        teams,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub team: String,
    pub last_n: Option<usize>,
    pub mode: Option<String>,
}

fn parse_mode(mode: Option<&str>) -> Result<DataSource, ApiError> {
    match mode.map(|m| m.trim().to_lowercase()).as_deref() {
        None | Some("") | Some("demo") => Ok(DataSource::Demo),
        Some("live") | Some("grid") => Ok(DataSource::Live),
        Some(other) => Err(ApiError::BadRequest(format!(
            "unknown mode '{}', expected 'demo' or 'live'",
            other
        ))),
    }
}

pub async fn create_report(
    State(state): State<AppState>,
    Json(request): Json<ReportRequest>,
) -> Result<Json<Report>, ApiError> {
    let team = request.team.trim();
    if team.is_empty() {
        return Err(ApiError::BadRequest("team is required".to_string()));
    }

    let bounds = &state.report_config;
    let last_n = request.last_n.unwrap_or(bounds.default_last_n);
    if !bounds.accepts(last_n) {
        return Err(ApiError::BadRequest(format!(
            "lastN must be between {} and {}",
            bounds.min_last_n, bounds.max_last_n
        )));
    }

    let source = parse_mode(request.mode.as_deref())?;
    let report = state.reports.generate(team, last_n, source).await;
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::build_router;
    use crate::config::ReportConfig;
    use crate::report::ReportService;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::util::ServiceExt;

    fn app() -> axum::Router {
        build_router(AppState::new(ReportService::demo_only(), ReportConfig::default()))
    }

    async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    async fn post_json(app: axum::Router, uri: &str, body: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!(parse_mode(None).unwrap(), DataSource::Demo);
        assert_eq!(parse_mode(Some("LIVE")).unwrap(), DataSource::Live);
        assert!(parse_mode(Some("stream")).is_err());
    }

    #[tokio::test]
    async fn test_health() {
        let (status, json) = get_json(app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "scout-report");
        assert_eq!(json["liveSource"], false);
    }

    #[tokio::test]
    async fn test_team_search() {
        let (status, json) = get_json(app(), "/api/teams?q=gen").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total"], 2);
        assert_eq!(json["teams"][0]["name"], "Evil Geniuses");
        assert_eq!(json["teams"][1]["game"], "lol");
    }

    #[tokio::test]
    async fn test_team_search_without_query() {
        let (_, json) = get_json(app(), "/api/teams").await;
        assert_eq!(json["total"], 15);
    }

    #[tokio::test]
    async fn test_create_demo_report() {
        let (status, json) =
            post_json(app(), "/api/reports", r#"{"team": "Sentinels", "lastN": 10}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["metadata"]["teamName"], "Sentinels");
        assert_eq!(json["metadata"]["mode"], "demo");
        assert_eq!(json["metadata"]["lastN"], 10);
        assert_eq!(json["sections"]["players"].as_array().map(Vec::len), Some(5));
        assert!(json.get("verification").is_none());
    }

    #[tokio::test]
    async fn test_create_report_default_window() {
        let (status, json) = post_json(app(), "/api/reports", r#"{"team": "Cloud9"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["metadata"]["lastN"], 10);
    }

    #[tokio::test]
    async fn test_live_without_source_is_demo_error() {
        let (status, json) = post_json(
            app(),
            "/api/reports",
            r#"{"team": "Sentinels", "mode": "live"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["metadata"]["mode"], "demo-error");
    }

    #[tokio::test]
    async fn test_create_report_validation() {
        let (status, json) = post_json(app(), "/api/reports", r#"{"team": "  "}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");

        let (status, _) =
            post_json(app(), "/api/reports", r#"{"team": "Sentinels", "lastN": 50}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) =
            post_json(app(), "/api/reports", r#"{"team": "Sentinels", "lastN": 4}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = post_json(
            app(),
            "/api/reports",
            r#"{"team": "Sentinels", "mode": "stream"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_status_after_report() {
        let state = AppState::new(ReportService::demo_only(), ReportConfig::default());
        let app = build_router(state.clone());
        post_json(app.clone(), "/api/reports", r#"{"team": "Sentinels"}"#).await;

        let (status, json) = get_json(app, "/api/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["stage"], "assembled");
        assert_eq!(json["reportsGenerated"], 1);
        assert_eq!(json["lastMode"], "demo");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, json) = get_json(app(), "/api/nothing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }
}
