//! Axum router exposing a [`VirtualFeeder`] over the feeder's REST paths.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

use feederdash_domain::config::{AdvancedSettings, ScheduleSettings};
use feederdash_domain::endpoint;
use feederdash_domain::reply::{Ack, ConfigReply, StatusReply};

use crate::feeder::VirtualFeeder;

/// Feeder state shared by all handlers.
pub type SharedFeeder = Arc<Mutex<VirtualFeeder>>;

fn lock(feeder: &SharedFeeder) -> MutexGuard<'_, VirtualFeeder> {
    feeder.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Build the router.
///
/// Includes a [`TraceLayer`] that logs each request at the `DEBUG` level.
pub fn build(feeder: SharedFeeder) -> Router {
    Router::new()
        .route(endpoint::STATUS, get(status))
        .route(endpoint::FEED_NOW, post(feed_now))
        .route(endpoint::FEED_CANCEL, post(cancel))
        .route(endpoint::CONFIG, get(config))
        .route(endpoint::CONFIG_SCHEDULE, post(save_schedule))
        .route(endpoint::CONFIG_ADVANCED, post(save_advanced))
        .route(endpoint::RESET_DAILY, post(reset_daily))
        .route(endpoint::REBOOT, post(reboot))
        .route(endpoint::CAMERA_STREAM, get(camera))
        .route(endpoint::CAMERA_CAPTURE, get(camera))
        .layer(TraceLayer::new_for_http())
        .with_state(feeder)
}

async fn status(State(feeder): State<SharedFeeder>) -> Response {
    let snapshot = lock(&feeder).status();
    Json(StatusReply {
        success: true,
        snapshot: &snapshot,
    })
    .into_response()
}

async fn config(State(feeder): State<SharedFeeder>) -> Response {
    let config = lock(&feeder).config().clone();
    Json(ConfigReply {
        success: true,
        config: &config,
    })
    .into_response()
}

async fn feed_now(State(feeder): State<SharedFeeder>) -> Json<Ack> {
    Json(lock(&feeder).feed_now())
}

async fn cancel(State(feeder): State<SharedFeeder>) -> Json<Ack> {
    Json(lock(&feeder).cancel())
}

async fn save_schedule(
    State(feeder): State<SharedFeeder>,
    Json(settings): Json<ScheduleSettings>,
) -> Json<Ack> {
    Json(lock(&feeder).save_schedule(settings))
}

async fn save_advanced(
    State(feeder): State<SharedFeeder>,
    Json(settings): Json<AdvancedSettings>,
) -> Json<Ack> {
    Json(lock(&feeder).save_advanced(settings))
}

async fn reset_daily(State(feeder): State<SharedFeeder>) -> Json<Ack> {
    Json(lock(&feeder).reset_daily())
}

async fn reboot(State(feeder): State<SharedFeeder>) -> Json<Ack> {
    tracing::info!("virtual feeder rebooting");
    Json(lock(&feeder).reboot())
}

async fn camera(State(feeder): State<SharedFeeder>) -> Response {
    match lock(&feeder).frame() {
        Some(frame) => ([(header::CONTENT_TYPE, "image/jpeg")], frame).into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "Camera disabled").into_response(),
    }
}
