//! User identity types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account. The password hash never appears here; handlers that
/// need it fetch [`UserCredentials`] instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub user_id:               Uuid,
  /// Always stored lowercased; uniqueness is enforced by the store.
  pub email:                 String,
  pub name:                  String,
  pub onboarding_completed:  bool,
  pub created_at:            DateTime<Utc>,
}

/// Input to [`crate::store::BrandStore::create_user`].
#[derive(Debug, Clone)]
pub struct NewUser {
  pub email:         String,
  /// Argon2 PHC string.
  pub password_hash: String,
  pub name:          String,
}

/// The minimum needed to verify a login attempt.
#[derive(Debug, Clone)]
pub struct UserCredentials {
  pub user_id:       Uuid,
  pub password_hash: String,
}
