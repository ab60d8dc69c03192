use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use pawpal_types::api::{
    GenerateSopsRequest, SafetyTipRequest, SafetyTipResponse, SummarizeRequest, SummaryResponse,
};

use crate::{AppState, blocking};

/// AI calls never fail from the caller's perspective: the assist client
/// substitutes fixed fallback content on any error.
pub async fn generate_sops(
    State(state): State<AppState>,
    Json(req): Json<GenerateSopsRequest>,
) -> impl IntoResponse {
    let sops = state
        .assist
        .generate_sops(&req.species, &req.breed, req.age, &req.personality)
        .await;
    Json(sops)
}

pub async fn summarize_chat(
    State(state): State<AppState>,
    Json(req): Json<SummarizeRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let messages = blocking({
        let state = state.clone();
        move || state.market.messages(&req.booking_id)
    })
    .await?;

    let summary = state.assist.summarize_chat(&messages).await;
    Ok(Json(SummaryResponse { summary }))
}

pub async fn safety_tip(
    State(state): State<AppState>,
    Json(req): Json<SafetyTipRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let pet = blocking({
        let state = state.clone();
        move || state.market.pet(&req.pet_id)
    })
    .await?
    .ok_or(StatusCode::NOT_FOUND)?;

    let tip = state.assist.safety_tip(&pet, req.role).await;
    Ok(Json(SafetyTipResponse { tip }))
}
