use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use service::domain::{NewUser, User};

use crate::errors::ApiError;
use crate::state::ServerState;

/// Write-side payload. The password is accepted on create and silently
/// ignored on update.
#[derive(Debug, Deserialize)]
pub struct UserInput {
    #[serde(default)]
    pub password: String,
    pub username: String,
    pub email: String,
}

impl UserInput {
    fn validate(self) -> Result<NewUser, ApiError> {
        if self.username.trim().is_empty() {
            return Err(ApiError::validation("username must not be blank"));
        }
        if !self.email.contains('@') {
            return Err(ApiError::validation("email must be a valid address"));
        }
        Ok(NewUser {
            password: self.password,
            username: self.username,
            email: self.email,
        })
    }
}

/// Read-side projection; the password never leaves the service.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UsernameQuery {
    pub username: String,
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.users.find_all().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

pub async fn by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    Ok(Json(state.users.find_by_id(id).await?.into()))
}

pub async fn by_username(
    State(state): State<ServerState>,
    Query(query): Query<UsernameQuery>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.users.find_by_username(&query.username).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<UserInput>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = state.users.create(input.validate()?).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(input): Json<UserInput>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.users.update(input.validate()?, id).await?;
    Ok(Json(user.into()))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    Ok(Json(state.users.delete(id).await?.into()))
}
