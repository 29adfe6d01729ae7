use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::config::{MatchConfig, ServerConfig};
use crate::data::{MatchResult, Role};
use crate::error::{Error, Result};
use crate::ingest::{RawPerson, ingest};
use crate::report::{Report, ReportMode, build_report};
use crate::solver;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveRequest {
    pub teachers: Vec<RawPerson>,
    pub students: Vec<RawPerson>,
    #[serde(default)]
    pub config: MatchConfig,
    #[serde(default)]
    pub canonicalize_labels: bool,
    #[serde(default)]
    pub report_mode: ReportMode,
}

#[derive(Debug, Clone, Serialize)]
pub struct SolveResponse {
    pub result: MatchResult,
    pub report: Report,
}

/// Ingests, matches and builds the report for one request.
pub fn handle(request: SolveRequest) -> Result<SolveResponse> {
    request.config.validate()?;
    let teachers = ingest(&request.teachers, Role::Teacher, request.canonicalize_labels)?;
    let students = ingest(&request.students, Role::Student, request.canonicalize_labels)?;

    let result = solver::solve(&teachers, &students, &request.config);
    let report = build_report(&result, request.report_mode);
    Ok(SolveResponse { result, report })
}

async fn solve_handler(
    Json(request): Json<SolveRequest>,
) -> std::result::Result<Json<SolveResponse>, (StatusCode, String)> {
    let outcome = tokio::task::spawn_blocking(move || handle(request))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    match outcome {
        Ok(response) => Ok(Json(response)),
        Err(e @ Error::InvalidInput(_)) => Err((StatusCode::BAD_REQUEST, e.to_string())),
        Err(e) => {
            error!("solve failed: {e}");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

pub fn router() -> Router {
    Router::new().route("/v1/match/solve", post(solve_handler))
}

pub async fn run_server(config: ServerConfig) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, router()).await?;
    Ok(())
}
