use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use service::domain::{NewOrganizer, Organizer};

use crate::errors::ApiError;
use crate::state::ServerState;

#[derive(Debug, Deserialize)]
pub struct OrganizerInput {
    pub name: String,
    pub email: String,
}

impl OrganizerInput {
    fn validate(self) -> Result<NewOrganizer, ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::validation("name must not be blank"));
        }
        if !self.email.contains('@') {
            return Err(ApiError::validation("email must be a valid address"));
        }
        Ok(NewOrganizer {
            name: self.name,
            email: self.email,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct OrganizerResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<Organizer> for OrganizerResponse {
    fn from(organizer: Organizer) -> Self {
        Self {
            id: organizer.id,
            name: organizer.name,
            email: organizer.email,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: String,
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<OrganizerResponse>>, ApiError> {
    let organizers = state.organizers.find_all().await?;
    Ok(Json(organizers.into_iter().map(OrganizerResponse::from).collect()))
}

pub async fn by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Json<OrganizerResponse>, ApiError> {
    Ok(Json(state.organizers.find_by_id(id).await?.into()))
}

pub async fn by_name(
    State(state): State<ServerState>,
    Query(query): Query<NameQuery>,
) -> Result<Json<Vec<OrganizerResponse>>, ApiError> {
    let organizers = state.organizers.find_by_name(&query.name).await?;
    Ok(Json(organizers.into_iter().map(OrganizerResponse::from).collect()))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<OrganizerInput>,
) -> Result<(StatusCode, Json<OrganizerResponse>), ApiError> {
    let organizer = state.organizers.create(input.validate()?).await?;
    Ok((StatusCode::CREATED, Json(organizer.into())))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(input): Json<OrganizerInput>,
) -> Result<Json<OrganizerResponse>, ApiError> {
    let organizer = state.organizers.update(input.validate()?, id).await?;
    Ok(Json(organizer.into()))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Json<OrganizerResponse>, ApiError> {
    Ok(Json(state.organizers.delete(id).await?.into()))
}
