//! Handlers for the evaluation endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/get_target` | Least-evaluated target with all its translations, or `{"response": null}` |
//! | `POST` | `/submit_evaluation` | Body: [`SubmitBody`]; 400 on malformed body or invalid batch |

use std::sync::Arc;

use axum::{Json, body::Bytes, extract::State};
use feedback_core::{
  EvalId, ranking::RankingEntry, store::EvaluationStore, translation::EvaluationSet,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

// ─── Get target ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum GetTargetResponse {
  Found(EvaluationSet),
  /// Nothing to evaluate; serialises as `{"response": null}`.
  Empty { response: () },
}

/// `GET /get_target`
pub async fn get_target<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<GetTargetResponse>, ApiError>
where
  S: EvaluationStore,
{
  let set = store
    .least_evaluated_with_siblings()
    .await
    .map_err(ApiError::store)?;

  Ok(Json(match set {
    Some(set) => GetTargetResponse::Found(set),
    None => GetTargetResponse::Empty { response: () },
  }))
}

// ─── Submit evaluation ────────────────────────────────────────────────────────

/// JSON body accepted by `POST /submit_evaluation`.
#[derive(Debug, Deserialize)]
pub struct SubmitBody {
  pub rankings: Option<Vec<RankingEntry>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
  pub message: &'static str,
  pub eval_id: EvalId,
}

const MISSING_RANKINGS: &str = "Missing rankings";

/// `POST /submit_evaluation` — body: `{"rankings": [{"translationId": 1,
/// "rank": 1, "discarded": false}, ...]}`.
///
/// The body is parsed by hand so that an empty body, invalid JSON and a
/// missing `rankings` key all produce the same JSON error shape.
pub async fn submit_evaluation<S>(
  State(store): State<Arc<S>>,
  body: Bytes,
) -> Result<Json<SubmitResponse>, ApiError>
where
  S: EvaluationStore,
{
  if body.is_empty() {
    return Err(ApiError::BadRequest(MISSING_RANKINGS.into()));
  }
  let body: SubmitBody = serde_json::from_slice(&body)
    .map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {e}")))?;
  let rankings = body
    .rankings
    .ok_or_else(|| ApiError::BadRequest(MISSING_RANKINGS.into()))?;

  let eval_id = store
    .submit_evaluation(rankings)
    .await
    .map_err(ApiError::store)?;

  Ok(Json(SubmitResponse {
    message: "Evaluation submitted successfully",
    eval_id,
  }))
}
