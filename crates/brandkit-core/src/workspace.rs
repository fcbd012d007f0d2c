//! Brand workspaces — the tenant-scoped container for one brand.
//!
//! A workspace owns its brain and evidence exclusively; the
//! `(owner_user_id, slug)` pair is the access-control predicate for every
//! nested resource.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, onboarding::Step};

/// Minimum length of a workspace name.
pub const MIN_NAME_LEN: usize = 2;

// ─── Status ──────────────────────────────────────────────────────────────────

/// Coarse onboarding status, always derivable from the step except after a
/// reset-analysis (see [`crate::onboarding::reset_state`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceStatus {
  NotStarted,
  InProgress,
  Ready,
}

impl WorkspaceStatus {
  /// The string stored in the `status` column.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::NotStarted => "not_started",
      Self::InProgress => "in_progress",
      Self::Ready => "ready",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "not_started" => Ok(Self::NotStarted),
      "in_progress" => Ok(Self::InProgress),
      "ready" => Ok(Self::Ready),
      other => Err(Error::UnknownWorkspaceStatus(other.to_string())),
    }
  }
}

// ─── Workspace ───────────────────────────────────────────────────────────────

/// A tenant's container for one brand's onboarding and strategy data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandWorkspace {
  pub workspace_id:    Uuid,
  pub name:            String,
  /// Globally unique, URL-safe, derived from `name`.
  pub slug:            String,
  pub owner_user_id:   Uuid,
  pub status:          WorkspaceStatus,
  pub onboarding_step: Step,
  /// Opaque handle to a conversational context, if one has been opened.
  pub ai_thread_id:    Option<String>,
  pub last_active_at:  DateTime<Utc>,
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
}

/// Input to [`crate::store::BrandStore::create_workspace`]. The slug is
/// chosen by the registry layer, not the caller.
#[derive(Debug, Clone)]
pub struct NewWorkspace {
  pub owner_user_id: Uuid,
  pub name:          String,
  pub slug:          String,
}

/// Validate a workspace name before slug generation.
pub fn validate_name(name: &str) -> Result<()> {
  if name.trim().chars().count() < MIN_NAME_LEN {
    return Err(Error::WorkspaceNameTooShort);
  }
  Ok(())
}

// ─── Slug generation ─────────────────────────────────────────────────────────

/// Derive a URL-safe slug from a workspace name: lowercase, ASCII-fold
/// alphanumerics, hyphenate runs of anything else, trim hyphens.
pub fn slugify(name: &str) -> String {
  let mut slug = String::with_capacity(name.len());
  let mut pending_hyphen = false;
  for c in name.chars() {
    if c.is_ascii_alphanumeric() {
      if pending_hyphen && !slug.is_empty() {
        slug.push('-');
      }
      pending_hyphen = false;
      slug.push(c.to_ascii_lowercase());
    } else {
      pending_hyphen = true;
    }
  }
  if slug.is_empty() { "brand".to_string() } else { slug }
}

/// The `attempt`-th candidate slug for a base: the base itself, then
/// `base-1`, `base-2`, …
pub fn candidate_slug(base: &str, attempt: u32) -> String {
  if attempt == 0 {
    base.to_string()
  } else {
    format!("{base}-{attempt}")
  }
}

/// Termination fallback after exhausting numeric suffixes: a timestamp
/// suffix is unique enough in practice.
pub fn fallback_slug(base: &str, now: DateTime<Utc>) -> String {
  format!("{base}-{}", now.timestamp_millis())
}
