//! Router-level integration tests against an in-memory store and stub
//! analyzers.

use std::{future::Future, sync::Arc};

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use serde_json::{Value, json};
use tower::ServiceExt as _;

use brandkit_core::{
  analyzer::{AnalyzerError, BrandAnalyzer},
  brain::BrandAnalysis,
  store::BrandStore,
};
use brandkit_store_sqlite::SqliteStore;

use crate::{AppState, SessionKeys, router};

// ─── Stub analyzers ──────────────────────────────────────────────────────────

/// Always answers on-contract.
#[derive(Clone)]
struct StubAnalyzer;

impl BrandAnalyzer for StubAnalyzer {
  fn analyze<'a>(
    &'a self,
    brand_name: &'a str,
    _evidence_text: &'a str,
  ) -> impl Future<Output = Result<BrandAnalysis, AnalyzerError>> + Send + 'a {
    async move {
      Ok(BrandAnalysis {
        summary:         format!("{brand_name} sells premium anvils."),
        audience:        "Coyotes".to_string(),
        tone:            "Dry".to_string(),
        pillars:         vec!["Durability".into(), "Speed".into(), "Value".into()],
        recommendations: vec!["Do A".into(), "Do B".into(), "Do C".into()],
        offers:          "Anvils".to_string(),
        competitors:     vec!["Roadrunner Inc".into()],
        channels:        vec!["Desert billboards".into()],
      })
    }
  }
}

/// Answers, but off-contract (too few pillars) — the degraded path.
#[derive(Clone)]
struct OffContractAnalyzer;

impl BrandAnalyzer for OffContractAnalyzer {
  fn analyze<'a>(
    &'a self,
    _brand_name: &'a str,
    _evidence_text: &'a str,
  ) -> impl Future<Output = Result<BrandAnalysis, AnalyzerError>> + Send + 'a {
    async move {
      Ok(BrandAnalysis {
        summary:         "too thin".to_string(),
        audience:        String::new(),
        tone:            String::new(),
        pillars:         vec!["only one".into()],
        recommendations: Vec::new(),
        offers:          String::new(),
        competitors:     Vec::new(),
        channels:        Vec::new(),
      })
    }
  }
}

/// Times out — the failed path.
#[derive(Clone)]
struct FailingAnalyzer;

impl BrandAnalyzer for FailingAnalyzer {
  fn analyze<'a>(
    &'a self,
    _brand_name: &'a str,
    _evidence_text: &'a str,
  ) -> impl Future<Output = Result<BrandAnalysis, AnalyzerError>> + Send + 'a {
    async move { Err(AnalyzerError::Timeout) }
  }
}

// ─── Harness ─────────────────────────────────────────────────────────────────

async fn make_state<An>(analyzer: An) -> AppState<SqliteStore, An>
where
  An: BrandAnalyzer + 'static,
{
  let store = SqliteStore::open_in_memory().await.unwrap();
  AppState::new(
    Arc::new(store),
    Arc::new(analyzer),
    SessionKeys::new("test-secret"),
  )
}

async fn send<An>(
  state:  &AppState<SqliteStore, An>,
  method: &str,
  uri:    &str,
  cookie: Option<&str>,
  body:   Option<Value>,
) -> Response
where
  An: BrandAnalyzer + 'static,
{
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(cookie) = cookie {
    builder = builder.header(header::COOKIE, cookie);
  }
  let req = match body {
    Some(v) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(v.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };
  router(state.clone()).oneshot(req).await.unwrap()
}

async fn body_json(resp: Response) -> Value {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

fn session_cookie(resp: &Response) -> String {
  let set = resp
    .headers()
    .get(header::SET_COOKIE)
    .expect("Set-Cookie header")
    .to_str()
    .unwrap();
  set.split(';').next().unwrap().to_string()
}

async fn register<An>(state: &AppState<SqliteStore, An>, email: &str) -> String
where
  An: BrandAnalyzer + 'static,
{
  let resp = send(
    state,
    "POST",
    "/auth/register",
    None,
    Some(json!({ "email": email, "password": "password123", "name": "Test User" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  session_cookie(&resp)
}

async fn create_workspace<An>(
  state:  &AppState<SqliteStore, An>,
  cookie: &str,
  name:   &str,
) -> String
where
  An: BrandAnalyzer + 'static,
{
  let resp = send(
    state,
    "POST",
    "/brand-workspaces/create",
    Some(cookie),
    Some(json!({ "name": name })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let body = body_json(resp).await;
  body["data"]["slug"].as_str().unwrap().to_string()
}

async fn add_manual_evidence<An>(
  state:  &AppState<SqliteStore, An>,
  cookie: &str,
  slug:   &str,
  value:  &str,
) where
  An: BrandAnalyzer + 'static,
{
  let resp = send(
    state,
    "POST",
    &format!("/brands/{slug}/onboarding/evidence"),
    Some(cookie),
    Some(json!({ "kind": "manual", "value": value })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
}

// ─── Auth ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_then_me_round_trips() {
  let state = make_state(StubAnalyzer).await;
  let cookie = register(&state, "alice@example.com").await;

  let resp = send(&state, "GET", "/auth/me", Some(&cookie), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_json(resp).await;
  assert_eq!(body["success"], json!(true));
  assert_eq!(body["data"]["email"], json!("alice@example.com"));
  assert_eq!(body["data"]["onboarding_completed"], json!(false));
}

#[tokio::test]
async fn me_without_cookie_is_401() {
  let state = make_state(StubAnalyzer).await;
  let resp = send(&state, "GET", "/auth/me", None, None).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  let body = body_json(resp).await;
  assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn register_validation_first_violation_only() {
  let state = make_state(StubAnalyzer).await;

  let resp = send(
    &state,
    "POST",
    "/auth/register",
    None,
    Some(json!({ "email": "not-an-email", "password": "x", "name": "" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body = body_json(resp).await;
  // The email violation is reported; later violations are not.
  assert!(body["error"].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn duplicate_email_registration_is_409() {
  let state = make_state(StubAnalyzer).await;
  register(&state, "dup@example.com").await;

  let resp = send(
    &state,
    "POST",
    "/auth/register",
    None,
    Some(json!({ "email": "dup@example.com", "password": "password123", "name": "Again" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn login_with_wrong_password_is_401() {
  let state = make_state(StubAnalyzer).await;
  register(&state, "carol@example.com").await;

  let resp = send(
    &state,
    "POST",
    "/auth/login",
    None,
    Some(json!({ "email": "carol@example.com", "password": "wrong-password" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_then_logout_invalidates_session() {
  let state = make_state(StubAnalyzer).await;
  register(&state, "dan@example.com").await;

  let resp = send(
    &state,
    "POST",
    "/auth/login",
    None,
    Some(json!({ "email": "DAN@example.com", "password": "password123" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let cookie = session_cookie(&resp);

  let resp = send(&state, "POST", "/auth/logout", Some(&cookie), None).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let resp = send(&state, "GET", "/auth/me", Some(&cookie), None).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ─── Workspaces ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_workspace_slugifies_and_creates_brain() {
  let state = make_state(StubAnalyzer).await;
  let cookie = register(&state, "alice@example.com").await;

  let slug = create_workspace(&state, &cookie, "Acme Co").await;
  assert_eq!(slug, "acme-co");

  // Eager brain creation: the brain exists before any onboarding call.
  let resp = send(
    &state,
    "GET",
    "/brands/acme-co/onboarding/brain",
    Some(&cookie),
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_json(resp).await;
  assert!(!body["data"].is_null());
  assert_eq!(body["data"]["status"], json!("not_started"));
}

#[tokio::test]
async fn slug_collision_appends_numeric_suffix() {
  let state = make_state(StubAnalyzer).await;
  let cookie = register(&state, "alice@example.com").await;

  assert_eq!(create_workspace(&state, &cookie, "Acme Co").await, "acme-co");
  assert_eq!(create_workspace(&state, &cookie, "Acme Co").await, "acme-co-1");
  assert_eq!(create_workspace(&state, &cookie, "Acme Co!").await, "acme-co-2");
}

#[tokio::test]
async fn workspace_name_too_short_is_400() {
  let state = make_state(StubAnalyzer).await;
  let cookie = register(&state, "alice@example.com").await;

  let resp = send(
    &state,
    "POST",
    "/brand-workspaces/create",
    Some(&cookie),
    Some(json!({ "name": "x" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_workspaces_in_creation_order() {
  let state = make_state(StubAnalyzer).await;
  let cookie = register(&state, "alice@example.com").await;
  create_workspace(&state, &cookie, "First Brand").await;
  create_workspace(&state, &cookie, "Second Brand").await;

  let resp = send(&state, "GET", "/brand-workspaces", Some(&cookie), None).await;
  let body = body_json(resp).await;
  let slugs: Vec<&str> = body["data"]
    .as_array()
    .unwrap()
    .iter()
    .map(|w| w["slug"].as_str().unwrap())
    .collect();
  assert_eq!(slugs, vec!["first-brand", "second-brand"]);
}

#[tokio::test]
async fn other_users_workspace_reads_as_404() {
  let state = make_state(StubAnalyzer).await;
  let owner = register(&state, "owner@example.com").await;
  let intruder = register(&state, "intruder@example.com").await;
  create_workspace(&state, &owner, "Acme Co").await;

  for uri in [
    "/brand-workspaces/acme-co",
    "/brands/acme-co/onboarding/brain",
    "/brands/acme-co/onboarding/state",
  ] {
    let resp = send(&state, "GET", uri, Some(&intruder), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
  }
}

#[tokio::test]
async fn delete_workspace_cascades() {
  let state = make_state(StubAnalyzer).await;
  let cookie = register(&state, "alice@example.com").await;
  create_workspace(&state, &cookie, "Acme Co").await;
  add_manual_evidence(&state, &cookie, "acme-co", "We sell anvils").await;

  let resp = send(
    &state,
    "DELETE",
    "/brand-workspaces/acme-co",
    Some(&cookie),
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);

  let resp = send(&state, "GET", "/brand-workspaces/acme-co", Some(&cookie), None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ─── Evidence ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn manual_evidence_completes_immediately() {
  let state = make_state(StubAnalyzer).await;
  let cookie = register(&state, "alice@example.com").await;
  create_workspace(&state, &cookie, "Acme Co").await;

  let resp = send(
    &state,
    "POST",
    "/brands/acme-co/onboarding/evidence",
    Some(&cookie),
    Some(json!({ "kind": "manual", "value": "We sell anvils" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let body = body_json(resp).await;
  assert_eq!(body["data"]["status"], json!("complete"));
  assert_eq!(body["data"]["analyzed_content"], json!("We sell anvils"));
}

#[tokio::test]
async fn website_evidence_stays_pending() {
  let state = make_state(StubAnalyzer).await;
  let cookie = register(&state, "alice@example.com").await;
  create_workspace(&state, &cookie, "Acme Co").await;

  let resp = send(
    &state,
    "POST",
    "/brands/acme-co/onboarding/evidence",
    Some(&cookie),
    Some(json!({ "kind": "website", "value": "https://acme.example" })),
  )
  .await;
  let body = body_json(resp).await;
  assert_eq!(body["data"]["status"], json!("pending"));

  // Status filter separates it from complete items.
  let resp = send(
    &state,
    "GET",
    "/brands/acme-co/onboarding/evidence?status=complete",
    Some(&cookie),
    None,
  )
  .await;
  let body = body_json(resp).await;
  assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_evidence_kind_is_400() {
  let state = make_state(StubAnalyzer).await;
  let cookie = register(&state, "alice@example.com").await;
  create_workspace(&state, &cookie, "Acme Co").await;

  let resp = send(
    &state,
    "POST",
    "/brands/acme-co/onboarding/evidence",
    Some(&cookie),
    Some(json!({ "kind": "telepathy", "value": "hm" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_evidence_by_query_id() {
  let state = make_state(StubAnalyzer).await;
  let cookie = register(&state, "alice@example.com").await;
  create_workspace(&state, &cookie, "Acme Co").await;

  let resp = send(
    &state,
    "POST",
    "/brands/acme-co/onboarding/evidence",
    Some(&cookie),
    Some(json!({ "kind": "manual", "value": "note" })),
  )
  .await;
  let body = body_json(resp).await;
  let id = body["data"]["evidence_id"].as_str().unwrap().to_string();

  let resp = send(
    &state,
    "DELETE",
    &format!("/brands/acme-co/onboarding/evidence?id={id}"),
    Some(&cookie),
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);

  let resp = send(
    &state,
    "DELETE",
    &format!("/brands/acme-co/onboarding/evidence?id={id}"),
    Some(&cookie),
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ─── Analysis ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn analyze_without_complete_evidence_is_400() {
  let state = make_state(StubAnalyzer).await;
  let cookie = register(&state, "alice@example.com").await;
  create_workspace(&state, &cookie, "Acme Co").await;

  let resp = send(
    &state,
    "POST",
    "/brands/acme-co/onboarding/analyze",
    Some(&cookie),
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn happy_path_analysis_reaches_ready_step_five() {
  let state = make_state(StubAnalyzer).await;
  let cookie = register(&state, "alice@example.com").await;
  create_workspace(&state, &cookie, "Acme Co").await;
  add_manual_evidence(&state, &cookie, "acme-co", "We sell anvils").await;

  let resp = send(
    &state,
    "POST",
    "/brands/acme-co/onboarding/analyze",
    Some(&cookie),
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_json(resp).await;
  assert_eq!(body["data"]["outcome"], json!("completed"));
  let brain = &body["data"]["brain"];
  assert_eq!(brain["status"], json!("ready"));
  assert_eq!(brain["onboarding_step"], json!(5));
  assert_eq!(brain["analysis_method"], json!("ai"));
  let pillars = brain["pillars"].as_array().unwrap();
  assert!((3..=5).contains(&pillars.len()));

  // The workspace row mirrors the final state.
  let resp = send(&state, "GET", "/brand-workspaces/acme-co", Some(&cookie), None).await;
  let body = body_json(resp).await;
  assert_eq!(body["data"]["status"], json!("ready"));
  assert_eq!(body["data"]["onboarding_step"], json!(5));
}

#[tokio::test]
async fn off_contract_analysis_degrades_to_placeholder() {
  let state = make_state(OffContractAnalyzer).await;
  let cookie = register(&state, "alice@example.com").await;
  create_workspace(&state, &cookie, "Acme Co").await;
  add_manual_evidence(&state, &cookie, "acme-co", "We sell anvils").await;

  let resp = send(
    &state,
    "POST",
    "/brands/acme-co/onboarding/analyze",
    Some(&cookie),
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_json(resp).await;
  assert_eq!(body["data"]["outcome"], json!("degraded"));
  assert_eq!(body["data"]["brain"]["analysis_method"], json!("placeholder"));
  assert_eq!(body["data"]["brain"]["status"], json!("ready"));
}

#[tokio::test]
async fn transport_failure_fails_then_reset_allows_retry() {
  let state = make_state(FailingAnalyzer).await;
  let cookie = register(&state, "alice@example.com").await;
  create_workspace(&state, &cookie, "Acme Co").await;
  add_manual_evidence(&state, &cookie, "acme-co", "We sell anvils").await;

  let resp = send(
    &state,
    "POST",
    "/brands/acme-co/onboarding/analyze",
    Some(&cookie),
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_json(resp).await;
  assert_eq!(body["data"]["outcome"], json!("failed"));
  assert_eq!(body["data"]["brain"]["status"], json!("failed"));
  assert_eq!(body["data"]["brain"]["onboarding_step"], json!(2));
  assert!(!body["data"]["brain"]["last_error"].is_null());

  // Reset clears the failure and parks at step 3.
  let resp = send(
    &state,
    "POST",
    "/brands/acme-co/onboarding/analyze",
    Some(&cookie),
    Some(json!({ "reset": true })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_json(resp).await;
  assert_eq!(body["data"]["brain"]["status"], json!("not_started"));
  assert_eq!(body["data"]["brain"]["onboarding_step"], json!(3));
  assert!(body["data"]["brain"]["last_error"].is_null());
}

#[tokio::test]
async fn concurrent_analysis_claim_answers_409() {
  let state = make_state(StubAnalyzer).await;
  let cookie = register(&state, "alice@example.com").await;
  create_workspace(&state, &cookie, "Acme Co").await;
  add_manual_evidence(&state, &cookie, "acme-co", "We sell anvils").await;

  // Hold the claim the way a concurrent request would.
  let resp = send(&state, "GET", "/brand-workspaces/acme-co", Some(&cookie), None).await;
  let body = body_json(resp).await;
  let ws_id = body["data"]["workspace_id"].as_str().unwrap().parse().unwrap();
  assert!(state.store().claim_analysis(ws_id).await.unwrap());

  let resp = send(
    &state,
    "POST",
    "/brands/acme-co/onboarding/analyze",
    Some(&cookie),
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);
  let body = body_json(resp).await;
  assert_eq!(body["error"], json!("ANALYSIS_IN_PROGRESS"));
}

#[tokio::test]
async fn poll_reports_analysis_state() {
  let state = make_state(StubAnalyzer).await;
  let cookie = register(&state, "alice@example.com").await;
  create_workspace(&state, &cookie, "Acme Co").await;

  let resp = send(
    &state,
    "GET",
    "/brands/acme-co/onboarding/analyze",
    Some(&cookie),
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_json(resp).await;
  assert_eq!(body["data"]["status"], json!("not_started"));
  assert!(body["data"]["last_analyzed_at"].is_null());
}

// ─── Brain ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn refine_pillars_splits_newlines() {
  let state = make_state(StubAnalyzer).await;
  let cookie = register(&state, "alice@example.com").await;
  create_workspace(&state, &cookie, "Acme Co").await;

  let resp = send(
    &state,
    "PATCH",
    "/brands/acme-co/onboarding/brain",
    Some(&cookie),
    Some(json!({ "section": "pillars", "content": "A\nB\n\nC" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_json(resp).await;
  assert_eq!(body["data"]["pillars"], json!(["A", "B", "C"]));
}

#[tokio::test]
async fn refine_unknown_section_is_400() {
  let state = make_state(StubAnalyzer).await;
  let cookie = register(&state, "alice@example.com").await;
  create_workspace(&state, &cookie, "Acme Co").await;

  let resp = send(
    &state,
    "PATCH",
    "/brands/acme-co/onboarding/brain",
    Some(&cookie),
    Some(json!({ "section": "logo", "content": "red" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn post_brain_patches_partially() {
  let state = make_state(StubAnalyzer).await;
  let cookie = register(&state, "alice@example.com").await;
  create_workspace(&state, &cookie, "Acme Co").await;

  let resp = send(
    &state,
    "POST",
    "/brands/acme-co/onboarding/brain",
    Some(&cookie),
    Some(json!({ "summary": "Anvils, but premium.", "tone": "Dry" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_json(resp).await;
  assert_eq!(body["data"]["summary"], json!("Anvils, but premium."));
  assert_eq!(body["data"]["tone"], json!("Dry"));
}

#[tokio::test]
async fn activation_is_idempotent_and_completes_user_onboarding() {
  let state = make_state(StubAnalyzer).await;
  let cookie = register(&state, "alice@example.com").await;
  create_workspace(&state, &cookie, "Acme Co").await;

  for _ in 0..2 {
    let resp = send(
      &state,
      "PUT",
      "/brands/acme-co/onboarding/brain",
      Some(&cookie),
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["is_activated"], json!(true));
    assert_eq!(body["data"]["status"], json!("ready"));
    assert_eq!(body["data"]["onboarding_step"], json!(5));
  }

  let resp = send(&state, "GET", "/auth/me", Some(&cookie), None).await;
  let body = body_json(resp).await;
  assert_eq!(body["data"]["onboarding_completed"], json!(true));
}

// ─── State machine endpoints ─────────────────────────────────────────────────

#[tokio::test]
async fn named_and_numeric_families_share_one_machine() {
  let state = make_state(StubAnalyzer).await;
  let cookie = register(&state, "alice@example.com").await;
  create_workspace(&state, &cookie, "Acme Co").await;

  let resp = send(
    &state,
    "GET",
    "/brands/acme-co/onboarding/state",
    Some(&cookie),
    None,
  )
  .await;
  let body = body_json(resp).await;
  assert_eq!(body["data"]["step"], json!("intro"));

  // Numeric write is visible through the named read.
  let resp = send(
    &state,
    "PATCH",
    "/brands/acme-co/onboarding",
    Some(&cookie),
    Some(json!({ "step": 4 })),
  )
  .await;
  let body = body_json(resp).await;
  assert_eq!(body["data"]["step"], json!(4));
  assert_eq!(body["data"]["status"], json!("in_progress"));

  let resp = send(
    &state,
    "GET",
    "/brands/acme-co/onboarding/state",
    Some(&cookie),
    None,
  )
  .await;
  let body = body_json(resp).await;
  assert_eq!(body["data"]["step"], json!("analyzing"));
}

#[tokio::test]
async fn complete_alias_canonicalises_to_reviewing_brand_brain() {
  let state = make_state(StubAnalyzer).await;
  let cookie = register(&state, "alice@example.com").await;
  create_workspace(&state, &cookie, "Acme Co").await;

  let resp = send(
    &state,
    "PATCH",
    "/brands/acme-co/onboarding/state",
    Some(&cookie),
    Some(json!({ "step": "complete" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_json(resp).await;
  assert_eq!(body["data"]["step"], json!("reviewing_brand_brain"));
  assert_eq!(body["data"]["status"], json!("ready"));
}

#[tokio::test]
async fn numeric_step_out_of_range_is_400() {
  let state = make_state(StubAnalyzer).await;
  let cookie = register(&state, "alice@example.com").await;
  create_workspace(&state, &cookie, "Acme Co").await;

  let resp = send(
    &state,
    "PATCH",
    "/brands/acme-co/onboarding",
    Some(&cookie),
    Some(json!({ "step": 9 })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn state_mutation_invalidates_cached_workspace() {
  let state = make_state(StubAnalyzer).await;
  let cookie = register(&state, "alice@example.com").await;
  create_workspace(&state, &cookie, "Acme Co").await;

  // Prime the cache.
  send(&state, "GET", "/brand-workspaces/acme-co", Some(&cookie), None).await;

  send(
    &state,
    "PATCH",
    "/brands/acme-co/onboarding",
    Some(&cookie),
    Some(json!({ "step": 2 })),
  )
  .await;

  // The read after the mutation must see the new step, not the cached one.
  let resp = send(&state, "GET", "/brand-workspaces/acme-co", Some(&cookie), None).await;
  let body = body_json(resp).await;
  assert_eq!(body["data"]["onboarding_step"], json!(2));
  assert_eq!(body["data"]["status"], json!("in_progress"));
}

// ─── Chat ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn chat_streams_step_guidance_as_text() {
  let state = make_state(StubAnalyzer).await;
  let cookie = register(&state, "alice@example.com").await;
  create_workspace(&state, &cookie, "Acme Co").await;

  let resp = send(
    &state,
    "POST",
    "/brands/acme-co/onboarding/chat",
    Some(&cookie),
    Some(json!({ "message": "where do I start?" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let ct = resp
    .headers()
    .get(header::CONTENT_TYPE)
    .unwrap()
    .to_str()
    .unwrap();
  assert!(ct.starts_with("text/plain"), "Content-Type: {ct}");

  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let text = std::str::from_utf8(&bytes).unwrap();
  assert!(text.contains("Acme Co"), "guidance: {text}");
}
