//! Cookie-based session layer.
//!
//! Login mints a 32-byte random token and hands it to the client in an
//! `HttpOnly` cookie. At rest only the keyed SHA-256 digest of the token is
//! stored, so a leaked database cannot be replayed as a session.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use rand_core::{OsRng, RngCore as _};
use sha2::{Digest as _, Sha256};

use brandkit_core::{
  analyzer::BrandAnalyzer,
  store::{BrandStore, SessionStore},
  user::User,
};

use crate::{AppState, error::ApiError};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "brandkit_session";

/// Sessions live for 30 days; expired rows read as absent.
pub const SESSION_TTL_DAYS: i64 = 30;

// ─── Token minting and digesting ─────────────────────────────────────────────

/// Keyed digest configuration. The secret comes from server config and must
/// be present at boot.
#[derive(Clone)]
pub struct SessionKeys {
  secret: String,
}

impl SessionKeys {
  pub fn new(secret: impl Into<String>) -> Self {
    Self { secret: secret.into() }
  }

  /// A fresh 32-byte random token, base64url-encoded for the cookie.
  pub fn mint_token(&self) -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    B64.encode(bytes)
  }

  /// Hex SHA-256 of `secret ‖ token` — the only form that reaches storage.
  pub fn digest(&self, token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(self.secret.as_bytes());
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
  }
}

// ─── Cookie plumbing ─────────────────────────────────────────────────────────

/// `Set-Cookie` value installing a session token.
pub fn session_cookie(token: &str) -> String {
  format!(
    "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
    SESSION_TTL_DAYS * 24 * 3600
  )
}

/// `Set-Cookie` value clearing the session cookie.
pub fn clear_cookie() -> String {
  format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Pull the raw session token out of the `Cookie` header, if present.
pub fn cookie_token(headers: &HeaderMap) -> Option<String> {
  let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
  cookies.split(';').find_map(|pair| {
    let (name, value) = pair.trim().split_once('=')?;
    (name == SESSION_COOKIE).then(|| value.to_string())
  })
}

// ─── Extractor ───────────────────────────────────────────────────────────────

/// The authenticated user behind the request's session cookie.
///
/// Rejects with 401 when the cookie is missing, unknown, or expired.
pub struct CurrentUser {
  pub user:         User,
  /// Digest of the presented token — what logout deletes.
  pub token_digest: String,
}

impl<S, A> FromRequestParts<AppState<S, A>> for CurrentUser
where
  S: BrandStore + SessionStore + 'static,
  A: BrandAnalyzer + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, A>,
  ) -> Result<Self, Self::Rejection> {
    let token = cookie_token(&parts.headers).ok_or(ApiError::Unauthenticated)?;
    let digest = state.keys.digest(&token);

    let session = SessionStore::get_session(state.store(), &digest)
      .await
      .map_err(ApiError::internal)?
      .ok_or(ApiError::Unauthenticated)?;

    let user = BrandStore::get_user(state.store(), session.user_id)
      .await
      .map_err(ApiError::internal)?
      .ok_or(ApiError::Unauthenticated)?;

    Ok(CurrentUser { user, token_digest: digest })
  }
}
