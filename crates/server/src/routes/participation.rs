use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::errors::ApiError;
use crate::routes::events::EventResponse;
use crate::routes::users::UserResponse;
use crate::state::ServerState;

/// 404s both when the event is missing and when its membership set is empty.
pub async fn users_for_event(
    State(state): State<ServerState>,
    Path(event_id): Path<i64>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.participation.find_users_for_event(event_id).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// An unknown user yields an empty list here, never a 404.
pub async fn events_for_user(
    State(state): State<ServerState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<EventResponse>>, ApiError> {
    let events = state.participation.find_events_for_user(user_id).await?;
    Ok(Json(events.into_iter().map(EventResponse::from).collect()))
}

pub async fn add_user(
    State(state): State<ServerState>,
    Path((event_id, user_id)): Path<(i64, i64)>,
) -> Result<(StatusCode, Json<EventResponse>), ApiError> {
    let event = state.participation.add_user_to_event(event_id, user_id).await?;
    Ok((StatusCode::CREATED, Json(event.into())))
}

pub async fn remove_user(
    State(state): State<ServerState>,
    Path((event_id, user_id)): Path<(i64, i64)>,
) -> Result<Json<EventResponse>, ApiError> {
    let event = state
        .participation
        .remove_user_from_event(event_id, user_id)
        .await?;
    Ok(Json(event.into()))
}
