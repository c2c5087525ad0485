use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use service::domain::{Comment, NewComment};

use crate::errors::ApiError;
use crate::state::ServerState;

#[derive(Debug, Deserialize)]
pub struct CommentInput {
    pub contents: String,
}

impl CommentInput {
    fn validate(self) -> Result<NewComment, ApiError> {
        if self.contents.trim().is_empty() {
            return Err(ApiError::validation("contents must not be blank"));
        }
        Ok(NewComment { contents: self.contents })
    }
}

/// The anchoring user and event ids live in the path, not the body.
#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: i64,
    pub contents: String,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            contents: comment.contents,
        }
    }
}

fn into_responses(comments: Vec<Comment>) -> Json<Vec<CommentResponse>> {
    Json(comments.into_iter().map(CommentResponse::from).collect())
}

pub async fn create(
    State(state): State<ServerState>,
    Path((user_id, event_id)): Path<(i64, i64)>,
    Json(input): Json<CommentInput>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    let comment = state
        .comments
        .create(input.validate()?, user_id, event_id)
        .await?;
    Ok((StatusCode::CREATED, Json(comment.into())))
}

pub async fn by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Json<CommentResponse>, ApiError> {
    Ok(Json(state.comments.find_by_id(id).await?.into()))
}

pub async fn for_user_and_event(
    State(state): State<ServerState>,
    Path((user_id, event_id)): Path<(i64, i64)>,
) -> Result<Json<Vec<CommentResponse>>, ApiError> {
    let comments = state.comments.find_by_event_and_user(event_id, user_id).await?;
    Ok(into_responses(comments))
}

pub async fn for_event(
    State(state): State<ServerState>,
    Path(event_id): Path<i64>,
) -> Result<Json<Vec<CommentResponse>>, ApiError> {
    Ok(into_responses(state.comments.find_by_event(event_id).await?))
}

pub async fn for_user(
    State(state): State<ServerState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<CommentResponse>>, ApiError> {
    Ok(into_responses(state.comments.find_by_user(user_id).await?))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Json<CommentResponse>, ApiError> {
    Ok(Json(state.comments.delete(id).await?.into()))
}
