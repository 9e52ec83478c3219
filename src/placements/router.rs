use std::io::Cursor;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::json;

use super::domain::{OfferDraft, OfferId, OfferPatch, StudentId, StudentPatch, StudentQuery};
use super::repository::PlacementStore;
use super::roster;
use super::service::{PlacementService, PlacementServiceError};
use crate::auth::AuthPolicy;

/// Shared state for the roster/placement endpoints. Every route here is
/// behind the session guard: listings expose student PII and the rest
/// mutate engine-owned state.
pub struct PlacementRoutes<S> {
    pub service: Arc<PlacementService<S>>,
    pub auth: AuthPolicy,
}

impl<S> Clone for PlacementRoutes<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            auth: self.auth.clone(),
        }
    }
}

/// Router builder for student and placement-offer endpoints.
pub fn placement_router<S>(service: Arc<PlacementService<S>>, auth: AuthPolicy) -> Router
where
    S: PlacementStore + 'static,
{
    Router::new()
        .route("/api/v1/students", get(list_students_handler::<S>))
        .route("/api/v1/students/import", post(import_roster_handler::<S>))
        .route(
            "/api/v1/students/:student_id",
            get(get_student_handler::<S>).put(update_student_handler::<S>),
        )
        .route(
            "/api/v1/students/:student_id/placements",
            post(record_offer_handler::<S>),
        )
        .route(
            "/api/v1/students/:student_id/placements/:placement_id",
            put(update_offer_handler::<S>).delete(delete_offer_handler::<S>),
        )
        .with_state(PlacementRoutes { service, auth })
}

async fn list_students_handler<S>(
    State(routes): State<PlacementRoutes<S>>,
    Query(query): Query<StudentQuery>,
    headers: HeaderMap,
) -> Response
where
    S: PlacementStore + 'static,
{
    if let Err(err) = routes.auth.authorize(&headers) {
        return err.into_response();
    }

    match routes.service.list_students(&query) {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn import_roster_handler<S>(
    State(routes): State<PlacementRoutes<S>>,
    headers: HeaderMap,
    body: String,
) -> Response
where
    S: PlacementStore + 'static,
{
    if let Err(err) = routes.auth.authorize(&headers) {
        return err.into_response();
    }

    match roster::import_roster(&routes.service, Cursor::new(body.into_bytes())) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn get_student_handler<S>(
    State(routes): State<PlacementRoutes<S>>,
    Path(student_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    S: PlacementStore + 'static,
{
    if let Err(err) = routes.auth.authorize(&headers) {
        return err.into_response();
    }

    match routes.service.get_student(&StudentId(student_id)) {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn update_student_handler<S>(
    State(routes): State<PlacementRoutes<S>>,
    Path(student_id): Path<String>,
    headers: HeaderMap,
    Json(patch): Json<StudentPatch>,
) -> Response
where
    S: PlacementStore + 'static,
{
    if let Err(err) = routes.auth.authorize(&headers) {
        return err.into_response();
    }

    match routes.service.update_student(&StudentId(student_id), patch) {
        Ok(student) => (StatusCode::OK, Json(student)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn record_offer_handler<S>(
    State(routes): State<PlacementRoutes<S>>,
    Path(student_id): Path<String>,
    headers: HeaderMap,
    Json(draft): Json<OfferDraft>,
) -> Response
where
    S: PlacementStore + 'static,
{
    if let Err(err) = routes.auth.authorize(&headers) {
        return err.into_response();
    }

    match routes.service.record_offer(&StudentId(student_id), draft) {
        Ok(offer) => (StatusCode::CREATED, Json(offer)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn update_offer_handler<S>(
    State(routes): State<PlacementRoutes<S>>,
    Path((student_id, placement_id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(patch): Json<OfferPatch>,
) -> Response
where
    S: PlacementStore + 'static,
{
    if let Err(err) = routes.auth.authorize(&headers) {
        return err.into_response();
    }

    match routes.service.update_offer(
        &StudentId(student_id),
        &OfferId(placement_id),
        patch,
    ) {
        Ok(offer) => (StatusCode::OK, Json(offer)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn delete_offer_handler<S>(
    State(routes): State<PlacementRoutes<S>>,
    Path((student_id, placement_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response
where
    S: PlacementStore + 'static,
{
    if let Err(err) = routes.auth.authorize(&headers) {
        return err.into_response();
    }

    match routes
        .service
        .delete_offer(&StudentId(student_id), &OfferId(placement_id))
    {
        Ok(()) => (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: PlacementServiceError) -> Response {
    match err {
        PlacementServiceError::NotFound => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
        PlacementServiceError::Validation(_) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
        PlacementServiceError::Store(inner) => {
            tracing::error!(error = %inner, "placement store failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal error" })),
            )
                .into_response()
        }
    }
}
