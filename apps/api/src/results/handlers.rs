//! Axum route handlers for the matching flow.

use std::net::SocketAddr;

use axum::{
    extract::{rejection::JsonRejection, ConnectInfo, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::profile::{FieldSpec, ProfileForm, PROFILE_FIELDS};
use crate::results::view::{build_results_view, section_views, ResultsView, SectionView};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ProfileFieldsResponse {
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Deserialize)]
pub struct ParseExplanationRequest {
    pub explanation: String,
}

#[derive(Debug, Serialize)]
pub struct ParseExplanationResponse {
    pub parser: &'static str,
    pub sections: Vec<SectionView>,
}

/// Header the front end uses to identify its browser session.
pub const SESSION_HEADER: &str = "x-session-id";

/// Key for the submission gate: the session header, else the peer IP.
fn client_key(headers: &HeaderMap, peer: Option<ConnectInfo<SocketAddr>>) -> String {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| format!("session:{v}"))
        .or_else(|| peer.map(|ConnectInfo(addr)| format!("peer:{}", addr.ip())))
        .unwrap_or_else(|| "anonymous".to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/profile/fields
///
/// The profile form's inputs in display order.
pub async fn handle_profile_fields() -> Json<ProfileFieldsResponse> {
    Json(ProfileFieldsResponse {
        fields: PROFILE_FIELDS.to_vec(),
    })
}

/// POST /api/v1/matches
///
/// Validates the submitted profile, asks the matching service for ranked
/// opportunities and returns the render-ready results. Refused with 409 while
/// the same client has another submission pending.
pub async fn handle_match(
    State(state): State<AppState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    payload: Result<Json<ProfileForm>, JsonRejection>,
) -> Result<Json<ResultsView>, AppError> {
    let Json(form) = payload?;
    let profile = form.into_profile()?;
    let _submission = state.submissions.try_enter(&client_key(&headers, peer))?;

    info!("Matching opportunities for '{}'", profile.company_name);
    let response = state.matcher.match_opportunities(&profile).await?;
    info!(
        "Received {} matches for '{}'",
        response.matches.len(),
        profile.company_name
    );

    Ok(Json(build_results_view(&response, state.parser.as_ref())))
}

/// POST /api/v1/explanations/parse
///
/// Splits a single explanation into its sections. Missing sections come back
/// with an empty body.
pub async fn handle_parse_explanation(
    State(state): State<AppState>,
    payload: Result<Json<ParseExplanationRequest>, JsonRejection>,
) -> Result<Json<ParseExplanationResponse>, AppError> {
    let Json(request) = payload?;
    Ok(Json(ParseExplanationResponse {
        parser: state.parser.backend(),
        sections: section_views(state.parser.as_ref(), &request.explanation),
    }))
}
