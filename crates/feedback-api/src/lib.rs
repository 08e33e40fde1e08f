//! JSON HTTP API for translation feedback collection.
//!
//! Exposes an axum [`Router`] backed by any
//! [`feedback_core::store::EvaluationStore`]. CORS, tracing, and transport
//! concerns are the caller's responsibility.
//!
//! Every endpoint is served both at the root and under `/api`, so the router
//! works behind a proxy that keeps or strips the prefix.

pub mod error;
pub mod evaluations;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use feedback_core::store::EvaluationStore;

pub use error::ApiError;

/// Build the API router for `store`. Unknown routes get a JSON 404.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: EvaluationStore + 'static,
{
  Router::new()
    .route("/get_target", get(evaluations::get_target::<S>))
    .route("/submit_evaluation", post(evaluations::submit_evaluation::<S>))
    .route("/api/get_target", get(evaluations::get_target::<S>))
    .route("/api/submit_evaluation", post(evaluations::submit_evaluation::<S>))
    .fallback(not_found)
    .with_state(store)
}

async fn not_found() -> ApiError { ApiError::NotFound("not found".into()) }
