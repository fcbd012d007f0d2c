//! Handlers for `/auth/*` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/register` | Creates the user and a first session |
//! | `POST` | `/auth/login` | Sets the `HttpOnly` session cookie |
//! | `POST` | `/auth/logout` | Deletes the session row, clears the cookie |
//! | `GET`  | `/auth/me` | Current user behind the cookie |

use argon2::{
  Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier as _,
  password_hash::SaltString,
};
use axum::{
  Json,
  extract::State,
  http::{StatusCode, header},
  response::IntoResponse,
};
use chrono::{Duration, Utc};
use rand_core::OsRng;
use serde::Deserialize;

use brandkit_core::{
  analyzer::BrandAnalyzer,
  store::{BrandStore, SessionStore},
  user::{NewUser, User},
};

use crate::{
  AppState,
  error::{ApiError, success},
  session::{self, CurrentUser, SESSION_TTL_DAYS},
};

const MIN_PASSWORD_LEN: usize = 8;

// ─── Register ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub email:    String,
  pub password: String,
  pub name:     String,
}

/// `POST /auth/register`
pub async fn register<S, A>(
  State(state): State<AppState<S, A>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BrandStore + SessionStore + 'static,
  A: BrandAnalyzer + 'static,
{
  let email = body.email.trim().to_lowercase();
  if email.is_empty() || !email.contains('@') {
    return Err(ApiError::Validation("a valid email is required".to_string()));
  }
  if body.password.chars().count() < MIN_PASSWORD_LEN {
    return Err(ApiError::Validation(format!(
      "password must be at least {MIN_PASSWORD_LEN} characters"
    )));
  }
  let name = body.name.trim();
  if name.is_empty() {
    return Err(ApiError::Validation("name is required".to_string()));
  }

  let password_hash = hash_password(&body.password)?;

  let user = BrandStore::create_user(state.store(), NewUser {
    email,
    password_hash,
    name: name.to_string(),
  })
  .await
  .map_err(ApiError::from_store::<S>)?;

  tracing::info!(user_id = %user.user_id, "user registered");

  let cookie = open_session(&state, &user).await?;
  Ok((
    StatusCode::CREATED,
    [(header::SET_COOKIE, cookie)],
    success(&user),
  ))
}

// ─── Login ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    String,
  pub password: String,
}

/// `POST /auth/login`
pub async fn login<S, A>(
  State(state): State<AppState<S, A>>,
  Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BrandStore + SessionStore + 'static,
  A: BrandAnalyzer + 'static,
{
  let creds = BrandStore::find_credentials(state.store(), &body.email)
    .await
    .map_err(ApiError::internal)?
    .ok_or(ApiError::Unauthenticated)?;

  let parsed = PasswordHash::new(&creds.password_hash)
    .map_err(|_| ApiError::Unauthenticated)?;
  Argon2::default()
    .verify_password(body.password.as_bytes(), &parsed)
    .map_err(|_| ApiError::Unauthenticated)?;

  let user = BrandStore::get_user(state.store(), creds.user_id)
    .await
    .map_err(ApiError::internal)?
    .ok_or(ApiError::Unauthenticated)?;

  let cookie = open_session(&state, &user).await?;
  Ok(([(header::SET_COOKIE, cookie)], success(&user)))
}

// ─── Logout ──────────────────────────────────────────────────────────────────

/// `POST /auth/logout`
pub async fn logout<S, A>(
  State(state): State<AppState<S, A>>,
  current: CurrentUser,
) -> Result<impl IntoResponse, ApiError>
where
  S: BrandStore + SessionStore + 'static,
  A: BrandAnalyzer + 'static,
{
  SessionStore::delete_session(state.store(), &current.token_digest)
    .await
    .map_err(ApiError::internal)?;
  Ok((
    [(header::SET_COOKIE, session::clear_cookie())],
    success(serde_json::json!({ "logged_out": true })),
  ))
}

// ─── Me ──────────────────────────────────────────────────────────────────────

/// `GET /auth/me`
pub async fn me<S, A>(
  current: CurrentUser,
) -> Result<impl IntoResponse, ApiError>
where
  S: BrandStore + SessionStore + 'static,
  A: BrandAnalyzer + 'static,
{
  Ok(success(&current.user))
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

pub(crate) fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| ApiError::Internal(e.to_string().into()))
}

async fn open_session<S, A>(
  state: &AppState<S, A>,
  user:  &User,
) -> Result<String, ApiError>
where
  S: BrandStore + SessionStore + 'static,
  A: BrandAnalyzer + 'static,
{
  let token = state.keys.mint_token();
  let digest = state.keys.digest(&token);
  let expires_at = Utc::now() + Duration::days(SESSION_TTL_DAYS);

  SessionStore::create_session(state.store(), &digest, user.user_id, expires_at)
    .await
    .map_err(ApiError::internal)?;

  Ok(session::session_cookie(&token))
}
