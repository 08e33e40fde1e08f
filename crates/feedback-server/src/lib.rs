//! Server wiring for the translation feedback API.
//!
//! Loads [`ServerConfig`] and wraps [`feedback_api::api_router`] in the CORS
//! and request-tracing layers the browser evaluator UI needs.

use std::{path::Path, sync::Arc};

use axum::{
  Router,
  http::{HeaderValue, Method, header, header::InvalidHeaderValue},
};
use feedback_core::store::EvaluationStore;
use feedback_store_sqlite::StoreConfig;
use serde::Deserialize;
use tower_http::{
  cors::{AllowOrigin, CorsLayer},
  trace::TraceLayer,
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `FEEDBACK_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:         String,
  pub port:         u16,
  /// Browser origins allowed to call the API.
  pub cors_origins: Vec<String>,
  pub database:     StoreConfig,
}

impl ServerConfig {
  /// Layer built-in defaults, the TOML file at `path` (if present) and the
  /// environment, in increasing priority.
  ///
  /// Nested keys use `__` in variable names, e.g.
  /// `FEEDBACK_DATABASE__FOLDER=/var/lib/feedback`. `FEEDBACK_CORS_ORIGINS`
  /// takes a comma-separated list.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 5000_i64)?
      .set_default(
        "cors_origins",
        vec!["http://localhost:5173", "http://127.0.0.1:5173"],
      )?
      .set_default("database.folder", "data")?
      .set_default("database.name", "feedback.db")?
      .set_default("database.root", "")?
      .set_default("database.example", "assets/example_data.json")?
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("FEEDBACK")
          .prefix_separator("_")
          .separator("__")
          .list_separator(",")
          .with_list_parse_key("cors_origins")
          .try_parsing(true),
      )
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The API router with CORS and request tracing applied.
pub fn app<S>(store: Arc<S>, config: &ServerConfig) -> Result<Router, InvalidHeaderValue>
where
  S: EvaluationStore + 'static,
{
  Ok(
    feedback_api::api_router(store)
      .layer(cors_layer(&config.cors_origins)?)
      .layer(TraceLayer::new_for_http()),
  )
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer, InvalidHeaderValue> {
  let origins = origins
    .iter()
    .map(|o| HeaderValue::from_str(o))
    .collect::<Result<Vec<_>, _>>()?;

  Ok(
    CorsLayer::new()
      .allow_origin(AllowOrigin::list(origins))
      .allow_methods([Method::GET, Method::POST])
      .allow_headers([header::CONTENT_TYPE]),
  )
}
