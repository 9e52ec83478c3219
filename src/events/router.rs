use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use super::domain::{EventDraft, EventId};
use super::repository::EventStore;
use super::service::{EventService, EventServiceError};
use crate::auth::AuthPolicy;
use crate::export;

/// Shared state for calendar endpoints. Reads and exports are public;
/// mutations sit behind the session guard.
pub struct EventRoutes<S> {
    pub service: Arc<EventService<S>>,
    pub auth: AuthPolicy,
}

impl<S> Clone for EventRoutes<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            auth: self.auth.clone(),
        }
    }
}

/// Router builder for the placement calendar.
pub fn event_router<S>(service: Arc<EventService<S>>, auth: AuthPolicy) -> Router
where
    S: EventStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/events",
            get(list_events_handler::<S>).post(create_event_handler::<S>),
        )
        .route(
            "/api/v1/events/export/csv",
            get(export_events_csv_handler::<S>),
        )
        .route(
            "/api/v1/events/export/ics",
            get(export_events_ics_handler::<S>),
        )
        .route(
            "/api/v1/events/:event_id",
            get(get_event_handler::<S>)
                .put(replace_event_handler::<S>)
                .delete(delete_event_handler::<S>),
        )
        .with_state(EventRoutes { service, auth })
}

async fn list_events_handler<S>(State(routes): State<EventRoutes<S>>) -> Response
where
    S: EventStore + 'static,
{
    match routes.service.list() {
        Ok(events) => (StatusCode::OK, Json(events)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn get_event_handler<S>(
    State(routes): State<EventRoutes<S>>,
    Path(event_id): Path<String>,
) -> Response
where
    S: EventStore + 'static,
{
    match routes.service.get(&EventId(event_id)) {
        Ok(event) => (StatusCode::OK, Json(event)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn create_event_handler<S>(
    State(routes): State<EventRoutes<S>>,
    headers: HeaderMap,
    Json(draft): Json<EventDraft>,
) -> Response
where
    S: EventStore + 'static,
{
    if let Err(err) = routes.auth.authorize(&headers) {
        return err.into_response();
    }

    match routes.service.create(draft) {
        Ok(event) => (StatusCode::CREATED, Json(event)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn replace_event_handler<S>(
    State(routes): State<EventRoutes<S>>,
    Path(event_id): Path<String>,
    headers: HeaderMap,
    Json(draft): Json<EventDraft>,
) -> Response
where
    S: EventStore + 'static,
{
    if let Err(err) = routes.auth.authorize(&headers) {
        return err.into_response();
    }

    match routes.service.replace(&EventId(event_id), draft) {
        Ok(event) => (StatusCode::OK, Json(event)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn delete_event_handler<S>(
    State(routes): State<EventRoutes<S>>,
    Path(event_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    S: EventStore + 'static,
{
    if let Err(err) = routes.auth.authorize(&headers) {
        return err.into_response();
    }

    match routes.service.delete(&EventId(event_id)) {
        Ok(()) => (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
        Err(err) => error_response(err),
    }
}

async fn export_events_csv_handler<S>(State(routes): State<EventRoutes<S>>) -> Response
where
    S: EventStore + 'static,
{
    let events = match routes.service.list() {
        Ok(events) => events,
        Err(err) => return error_response(err),
    };

    match export::events_csv(&events) {
        Ok(csv) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"events.csv\"",
                ),
            ],
            csv,
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "events CSV export failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal error" })),
            )
                .into_response()
        }
    }
}

async fn export_events_ics_handler<S>(State(routes): State<EventRoutes<S>>) -> Response
where
    S: EventStore + 'static,
{
    match routes.service.list() {
        Ok(events) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/calendar"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"calendar.ics\"",
                ),
            ],
            export::events_ics(&events),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: EventServiceError) -> Response {
    match err {
        EventServiceError::NotFound => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
        EventServiceError::Validation(_) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
        EventServiceError::Store(inner) => {
            tracing::error!(error = %inner, "event store failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal error" })),
            )
                .into_response()
        }
    }
}
