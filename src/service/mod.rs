//! JSON over HTTP in front of a [`Loom`].
//!
//! | Route                         | Variant                     |
//! |-------------------------------|-----------------------------|
//! | `GET /health`                 | liveness, `{"status":"OK"}` |
//! | `POST /api/roadmap/generate`  | [`GraphResponse`]           |
//! | `POST /api/generate-roadmap`  | [`PhasesResponse`]          |
//!
//! Every failure is answered with `{"error": "..."}`: 400 when the request was at fault, 500 when
//! generation failed.

use std::sync::Arc;

use axum::{
	extract::{rejection::JsonRejection, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
	Json, Router,
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, warn};

use crate::{
	types::{ErrorClass, LoomError},
	Config, GraphResponse, Loom, PhasesResponse, RoadmapRequest,
};

mod server;

pub use server::serve;

/// Builds the router serving `loom`.
pub fn router<T: Config>(loom: Arc<Loom<T>>) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/api/roadmap/generate", post(generate_graph::<T>))
		.route("/api/generate-roadmap", post(generate_phases::<T>))
		.layer(CorsLayer::permissive())
		.layer(TraceLayer::new_for_http())
		.with_state(loom)
}

async fn health() -> Json<serde_json::Value> {
	Json(json!({ "status": "OK" }))
}

async fn generate_graph<T: Config>(
	State(loom): State<Arc<Loom<T>>>,
	payload: Result<Json<RoadmapRequest>, JsonRejection>,
) -> Result<Json<GraphResponse>, ApiError> {
	let Json(request) = payload?;
	Ok(Json(loom.weave_graph(request).await?))
}

async fn generate_phases<T: Config>(
	State(loom): State<Arc<Loom<T>>>,
	payload: Result<Json<RoadmapRequest>, JsonRejection>,
) -> Result<Json<PhasesResponse>, ApiError> {
	let Json(request) = payload?;
	Ok(Json(loom.weave_phases(request).await?))
}

/// Error answered to HTTP clients.
#[derive(Debug)]
pub enum ApiError {
	/// The body was not a JSON roadmap request.
	Body(JsonRejection),
	Loom(LoomError),
}

impl From<JsonRejection> for ApiError {
	fn from(rejection: JsonRejection) -> Self {
		Self::Body(rejection)
	}
}

impl From<LoomError> for ApiError {
	fn from(e: LoomError) -> Self {
		Self::Loom(e)
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let (status, message) = match self {
			Self::Body(rejection) => {
				let message = rejection.body_text();
				warn!("Rejected request body: {}", message);
				(StatusCode::BAD_REQUEST, message)
			},
			Self::Loom(e) => (status_of(&e), e.public_message()),
		};

		(status, Json(json!({ "error": message }))).into_response()
	}
}

fn status_of(e: &LoomError) -> StatusCode {
	match e.class() {
		ErrorClass::BadInput => {
			warn!("Rejected roadmap request: {}", e);
			StatusCode::BAD_REQUEST
		},
		ErrorClass::GenerationFailed => {
			error!("Roadmap generation failed: {}", e);
			StatusCode::INTERNAL_SERVER_ERROR
		},
	}
}
