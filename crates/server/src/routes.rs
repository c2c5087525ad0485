use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::state::ServerState;

pub mod comments;
pub mod events;
pub mod organizers;
pub mod participation;
pub mod users;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let user_routes = Router::new()
        .route("/users", get(users::list).post(users::create))
        .route("/users/username", get(users::by_username))
        .route(
            "/users/:id",
            get(users::by_id).put(users::update).delete(users::remove),
        );

    let organizer_routes = Router::new()
        .route(
            "/organizers",
            get(organizers::list).post(organizers::create),
        )
        .route("/organizers/name", get(organizers::by_name))
        .route(
            "/organizers/:id",
            get(organizers::by_id)
                .put(organizers::update)
                .delete(organizers::remove),
        );

    let event_routes = Router::new()
        .route("/events", get(events::list).post(events::create))
        .route("/events/name", get(events::by_name))
        .route("/events/address", get(events::by_address))
        .route("/events/date", get(events::by_date))
        .route("/events/startDate/endDate", get(events::by_date_range))
        .route("/events/name/address/date", get(events::by_composite))
        .route(
            "/events/:id",
            get(events::by_id).put(events::update).delete(events::remove),
        )
        .route("/organizer/:id/events", get(events::by_organizer));

    let comment_routes = Router::new()
        .route(
            "/comments/user/:user_id/event/:event_id",
            post(comments::create),
        )
        .route(
            "/comments/:id",
            get(comments::by_id).delete(comments::remove),
        )
        .route(
            "/user/:user_id/event/:event_id/comments",
            get(comments::for_user_and_event),
        )
        .route("/event/:event_id/comments", get(comments::for_event))
        .route("/user/:user_id/comments", get(comments::for_user));

    let participation_routes = Router::new()
        .route("/events/:id/users", get(participation::users_for_event))
        .route(
            "/events/:id/users/:user_id",
            post(participation::add_user).delete(participation::remove_user),
        )
        .route("/users/:id/events", get(participation::events_for_user));

    Router::new()
        .route("/health", get(health))
        .merge(user_routes)
        .merge(organizer_routes)
        .merge(event_routes)
        .merge(comment_routes)
        .merge(participation_routes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
