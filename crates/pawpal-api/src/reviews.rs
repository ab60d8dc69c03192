use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use pawpal_types::api::{CreateReviewRequest, PendingReviewQuery};
use pawpal_types::models::{Review, new_id};

use crate::{AppState, blocking};

pub async fn reviews_for_user(
    State(state): State<AppState>,
    Path(target_id): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let reviews = blocking(move || state.market.reviews_for(&target_id)).await?;
    Ok(Json(reviews))
}

pub async fn pending_reviews(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<PendingReviewQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let bookings = blocking(move || state.market.pending_reviews(&user_id, query.role)).await?;
    Ok(Json(bookings))
}

pub async fn create_review(
    State(state): State<AppState>,
    Json(req): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    if !(1..=5).contains(&req.rating) {
        return Err(StatusCode::BAD_REQUEST);
    }

    let review = Review {
        id: new_id(),
        booking_id: req.booking_id,
        reviewer_id: req.reviewer_id,
        target_id: req.target_id,
        rating: req.rating,
        comment: req.comment,
        created_at: chrono::Utc::now().date_naive(),
    };

    let response = review.clone();
    let added = blocking(move || state.market.add_review(review)).await?;
    if !added {
        // One review per (booking, reviewer) pair
        return Err(StatusCode::CONFLICT);
    }

    Ok((StatusCode::CREATED, Json(response)))
}
