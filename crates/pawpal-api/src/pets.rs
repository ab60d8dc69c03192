use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use pawpal_types::api::CreatePetRequest;
use pawpal_types::models::{Pet, new_id};

use crate::{AppState, blocking};

fn pet_from_request(id: String, req: CreatePetRequest) -> Pet {
    Pet {
        id,
        owner_id: req.owner_id,
        name: req.name,
        species: req.species,
        breed: req.breed,
        age: req.age,
        description: req.description,
        image_url: req.image_url,
        sops: req.sops,
    }
}

pub async fn list_pets(State(state): State<AppState>) -> Result<impl IntoResponse, StatusCode> {
    let pets = blocking(move || state.market.pets()).await?;
    Ok(Json(pets))
}

pub async fn get_pet(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let pet = blocking(move || state.market.pet(&id))
        .await?
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(pet))
}

pub async fn pets_by_owner(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let pets = blocking(move || state.market.pets_by_owner(&owner_id)).await?;
    Ok(Json(pets))
}

pub async fn create_pet(
    State(state): State<AppState>,
    Json(req): Json<CreatePetRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let pet = pet_from_request(new_id(), req);
    let response = pet.clone();

    blocking(move || state.market.add_pet(pet)).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn update_pet(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CreatePetRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let pet = pet_from_request(id, req);
    let response = pet.clone();

    let updated = blocking(move || state.market.update_pet(pet)).await?;
    if !updated {
        return Err(StatusCode::NOT_FOUND);
    }

    Ok(Json(response))
}

pub async fn delete_pet(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    blocking(move || state.market.delete_pet(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
