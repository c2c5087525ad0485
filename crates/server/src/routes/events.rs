use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use service::domain::{Event, EventDraft, OrganizerDraft};
use service::ServiceError;

use crate::errors::ApiError;
use crate::routes::organizers::OrganizerResponse;
use crate::routes::users::UserResponse;
use crate::state::ServerState;

/// Dates cross the wire as `yyyy-MM-dd` strings.
fn parse_date(value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ApiError::validation(format!("invalid date {value}, expected yyyy-MM-dd")))
}

/// Write-side payload. The embedded organizer carries an optional id: with an
/// id the referenced row is updated in place, without one a fresh organizer
/// row is created alongside the event.
#[derive(Debug, Deserialize)]
pub struct EventInput {
    pub name: String,
    pub date: String,
    pub address: String,
    pub organizer: EventOrganizerInput,
}

#[derive(Debug, Deserialize)]
pub struct EventOrganizerInput {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
}

impl EventInput {
    fn validate(self) -> Result<EventDraft, ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::validation("name must not be blank"));
        }
        if self.address.trim().is_empty() {
            return Err(ApiError::validation("address must not be blank"));
        }
        if self.organizer.name.trim().is_empty() {
            return Err(ApiError::validation("organizer name must not be blank"));
        }
        if !self.organizer.email.contains('@') {
            return Err(ApiError::validation("organizer email must be a valid address"));
        }
        Ok(EventDraft {
            name: self.name,
            date: parse_date(&self.date)?,
            address: self.address,
            organizer: OrganizerDraft {
                id: self.organizer.id,
                name: self.organizer.name,
                email: self.organizer.email,
            },
        })
    }
}

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub id: i64,
    pub name: String,
    pub date: NaiveDate,
    pub address: String,
    pub organizer: OrganizerResponse,
    pub participants: Vec<UserResponse>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            name: event.name,
            date: event.date,
            address: event.address,
            organizer: event.organizer.into(),
            participants: event.participants.into_iter().map(UserResponse::from).collect(),
        }
    }
}

fn into_responses(events: Vec<Event>) -> Json<Vec<EventResponse>> {
    Json(events.into_iter().map(EventResponse::from).collect())
}

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AddressQuery {
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    #[serde(rename = "startDate")]
    pub start_date: String,
    #[serde(rename = "endDate")]
    pub end_date: String,
}

#[derive(Debug, Deserialize)]
pub struct CompositeQuery {
    pub name: String,
    pub address: String,
    pub date: String,
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<EventResponse>>, ApiError> {
    Ok(into_responses(state.events.find_all().await?))
}

pub async fn by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Json<EventResponse>, ApiError> {
    Ok(Json(state.events.find_by_id(id).await?.into()))
}

pub async fn by_name(
    State(state): State<ServerState>,
    Query(query): Query<NameQuery>,
) -> Result<Json<Vec<EventResponse>>, ApiError> {
    Ok(into_responses(state.events.find_by_name(&query.name).await?))
}

pub async fn by_address(
    State(state): State<ServerState>,
    Query(query): Query<AddressQuery>,
) -> Result<Json<Vec<EventResponse>>, ApiError> {
    Ok(into_responses(state.events.find_by_address(&query.address).await?))
}

pub async fn by_date(
    State(state): State<ServerState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<EventResponse>>, ApiError> {
    let date = parse_date(&query.date)?;
    Ok(into_responses(state.events.find_by_date(date).await?))
}

/// Inclusive on both ends; no matches is an empty list, not a 404.
pub async fn by_date_range(
    State(state): State<ServerState>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<Vec<EventResponse>>, ApiError> {
    let since = parse_date(&query.start_date)?;
    let until = parse_date(&query.end_date)?;
    Ok(into_responses(state.events.find_by_date_range(since, until).await?))
}

pub async fn by_composite(
    State(state): State<ServerState>,
    Query(query): Query<CompositeQuery>,
) -> Result<Json<Vec<EventResponse>>, ApiError> {
    let date = parse_date(&query.date)?;
    let events = state
        .events
        .find_by_name_address_date(&query.name, &query.address, date)
        .await?;
    Ok(into_responses(events))
}

/// A relation-keyed lookup: an organizer without an event is a 404.
pub async fn by_organizer(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Json<EventResponse>, ApiError> {
    let event = state.events.find_by_organizer_id(id).await?.ok_or_else(|| {
        ApiError::from(ServiceError::ParticipationNotFound(format!(
            "Event not found for organizer {id}"
        )))
    })?;
    Ok(Json(event.into()))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<EventInput>,
) -> Result<(StatusCode, Json<EventResponse>), ApiError> {
    let event = state.events.create(input.validate()?).await?;
    Ok((StatusCode::CREATED, Json(event.into())))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(input): Json<EventInput>,
) -> Result<Json<EventResponse>, ApiError> {
    let event = state.events.update(input.validate()?, id).await?;
    Ok(Json(event.into()))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Json<EventResponse>, ApiError> {
    Ok(Json(state.events.delete(id).await?.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_and_rejects_the_rest() {
        assert_eq!(
            parse_date("2019-01-05").unwrap(),
            NaiveDate::from_ymd_opt(2019, 1, 5).unwrap()
        );
        assert!(parse_date("05-01-2019").is_err());
        assert!(parse_date("not a date").is_err());
    }

    #[test]
    fn event_input_rejects_blank_fields() {
        let input = EventInput {
            name: "  ".into(),
            date: "2019-01-01".into(),
            address: "Wroclaw".into(),
            organizer: EventOrganizerInput {
                id: None,
                name: "acme".into(),
                email: "acme@example.com".into(),
            },
        };
        assert!(input.validate().is_err());
    }
}
