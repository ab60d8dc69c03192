use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use pawpal_types::api::{BookingQuery, CreateBookingRequest, UpdateBookingStatusRequest};
use pawpal_types::events::MarketEvent;
use pawpal_types::models::{Booking, BookingStatus, new_id};

use crate::{AppState, blocking};

pub async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<BookingQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let bookings =
        blocking(move || state.market.bookings_for_user(&query.user_id, query.role)).await?;
    Ok(Json(bookings))
}

pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let booking = blocking(move || state.market.booking(&id))
        .await?
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(booking))
}

pub async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    // The owner side comes from the pet being booked.
    let booking = blocking(move || {
        let Some(pet) = state.market.pet(&req.pet_id)? else {
            return Ok(None);
        };
        let booking = Booking {
            id: new_id(),
            pet_id: req.pet_id,
            owner_id: pet.owner_id,
            lover_id: req.lover_id,
            start_date: req.start_date,
            end_date: req.end_date,
            status: BookingStatus::Pending,
            total_price: req.total_price,
        };
        state.market.create_booking(booking.clone())?;
        Ok(Some(booking))
    })
    .await?
    .ok_or(StatusCode::NOT_FOUND)?;

    Ok((StatusCode::CREATED, Json(booking)))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateBookingStatusRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let booking = blocking({
        let state = state.clone();
        let id = id.clone();
        move || {
            if !state.market.update_booking_status(&id, req.status)? {
                // Distinguish unknown id from an illegal transition
                return Ok(Err(match state.market.booking(&id)? {
                    Some(_) => StatusCode::CONFLICT,
                    None => StatusCode::NOT_FOUND,
                }));
            }
            Ok(state
                .market
                .booking(&id)?
                .ok_or(StatusCode::NOT_FOUND))
        }
    })
    .await??;

    state.dispatcher.publish(MarketEvent::BookingUpdated {
        booking_id: booking.id.clone(),
        status: booking.status,
    });

    Ok(Json(booking))
}
