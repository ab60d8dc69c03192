use axum::{Json, extract::Path, extract::State, http::StatusCode, response::IntoResponse};

use pawpal_types::api::{LoginRequest, RegisterRequest};
use pawpal_types::models::{User, new_id};

use crate::{AppState, blocking};

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    if req.name.trim().is_empty() || req.email.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let user = User {
        id: new_id(),
        name: req.name,
        email: req.email,
        role: req.role,
        avatar_url: req.avatar_url,
        location: req.location,
    };

    let response = user.clone();
    let created = blocking(move || state.market.register(user)).await?;

    if !created {
        // Email already taken
        return Err(StatusCode::CONFLICT);
    }

    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let user = blocking(move || state.market.login(&req.email))
        .await?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    Ok(Json(user))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let user = blocking(move || state.market.user(&id))
        .await?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(user))
}
