//! Handlers for `/brands/{slug}/onboarding/evidence`.
//!
//! | Method   | Notes |
//! |----------|-------|
//! | `GET`    | Query params `status`, `kind`, `limit`; newest first |
//! | `POST`   | Inline kinds (`manual`, `brand_name_search`) complete immediately |
//! | `DELETE` | Query param `id`; scoped to the workspace |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use brandkit_core::{
  analyzer::BrandAnalyzer,
  evidence::{EvidenceKind, EvidenceStatus, NewEvidence},
  store::{BrandStore, EvidenceQuery, SessionStore},
};

use crate::{
  AppState, load_workspace, touch,
  error::{ApiError, success},
  session::CurrentUser,
};

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub status: Option<String>,
  pub kind:   Option<String>,
  pub limit:  Option<usize>,
}

/// `GET /brands/{slug}/onboarding/evidence[?status=…&kind=…&limit=…]`
pub async fn list<S, A>(
  State(state): State<AppState<S, A>>,
  current: CurrentUser,
  Path(slug): Path<String>,
  Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BrandStore + SessionStore + 'static,
  A: BrandAnalyzer + 'static,
{
  let ws = load_workspace(&state, &current.user, &slug).await?;

  let status = params
    .status
    .as_deref()
    .map(EvidenceStatus::parse)
    .transpose()
    .map_err(|e| ApiError::Validation(e.to_string()))?;
  let kind = params
    .kind
    .as_deref()
    .map(EvidenceKind::parse)
    .transpose()
    .map_err(|e| ApiError::Validation(e.to_string()))?;

  let query = EvidenceQuery { status, kind, limit: params.limit };
  let items = state
    .store()
    .list_evidence(ws.workspace_id, &query)
    .await
    .map_err(ApiError::internal)?;
  Ok(success(&items))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub kind:     String,
  pub value:    String,
  #[serde(default)]
  pub metadata: Option<serde_json::Value>,
}

/// `POST /brands/{slug}/onboarding/evidence` — body:
/// `{"kind":"manual","value":"We sell anvils"}`
pub async fn create<S, A>(
  State(state): State<AppState<S, A>>,
  current: CurrentUser,
  Path(slug): Path<String>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BrandStore + SessionStore + 'static,
  A: BrandAnalyzer + 'static,
{
  let kind = EvidenceKind::parse(&body.kind)
    .map_err(|e| ApiError::Validation(e.to_string()))?;
  if body.value.trim().is_empty() {
    return Err(ApiError::Validation("evidence value is required".to_string()));
  }

  let ws = load_workspace(&state, &current.user, &slug).await?;

  let mut input =
    NewEvidence::new(ws.workspace_id, ws.slug.clone(), kind, body.value);
  if let Some(metadata) = body.metadata {
    input.metadata = metadata;
  }

  let mut item = state
    .store()
    .add_evidence(input)
    .await
    .map_err(ApiError::internal)?;

  // Inline kinds carry their content in `value` and need no processing
  // pipeline; they become analyzable immediately.
  if kind.is_inline() {
    state
      .store()
      .complete_evidence(item.evidence_id, &item.value)
      .await
      .map_err(ApiError::internal)?;
    item.status = EvidenceStatus::Complete;
    item.analyzed_content = Some(item.value.clone());
  }

  touch(&state, &slug).await?;
  Ok((StatusCode::CREATED, success(&item)))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
  pub id: Uuid,
}

/// `DELETE /brands/{slug}/onboarding/evidence?id=<uuid>`
pub async fn delete_one<S, A>(
  State(state): State<AppState<S, A>>,
  current: CurrentUser,
  Path(slug): Path<String>,
  Query(params): Query<DeleteParams>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BrandStore + SessionStore + 'static,
  A: BrandAnalyzer + 'static,
{
  let ws = load_workspace(&state, &current.user, &slug).await?;

  let deleted = state
    .store()
    .delete_evidence(params.id, ws.workspace_id)
    .await
    .map_err(ApiError::internal)?;
  if !deleted {
    return Err(ApiError::NotFound(format!(
      "evidence {} not found",
      params.id
    )));
  }

  touch(&state, &slug).await?;
  Ok(success(serde_json::json!({ "deleted": true })))
}
