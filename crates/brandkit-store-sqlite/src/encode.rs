//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. String lists and metadata
//! are stored as compact JSON. UUIDs are stored as hyphenated lowercase
//! strings. Enum columns delegate to the `as_str`/`parse` pairs in
//! `brandkit-core`.

use brandkit_core::{
  brain::{BrainStatus, BrandBrain},
  evidence::{Evidence, EvidenceKind, EvidenceStatus},
  onboarding::Step,
  user::User,
  workspace::{BrandWorkspace, WorkspaceStatus},
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn decode_dt_opt(s: Option<&str>) -> Result<Option<DateTime<Utc>>> {
  s.map(decode_dt).transpose()
}

// ─── Steps ───────────────────────────────────────────────────────────────────

pub fn decode_step(n: i64) -> Result<Step> {
  Ok(Step::new(u8::try_from(n).map_err(|_| {
    brandkit_core::Error::StepOutOfRange(u8::MAX)
  })?)?)
}

// ─── String lists ────────────────────────────────────────────────────────────

pub fn encode_list(items: &[String]) -> Result<String> {
  Ok(serde_json::to_string(items)?)
}

pub fn decode_list(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:              String,
  pub email:                String,
  pub name:                 String,
  pub onboarding_completed: bool,
  pub created_at:           String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:              decode_uuid(&self.user_id)?,
      email:                self.email,
      name:                 self.name,
      onboarding_completed: self.onboarding_completed,
      created_at:           decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `workspaces` row.
pub struct RawWorkspace {
  pub workspace_id:    String,
  pub name:            String,
  pub slug:            String,
  pub owner_user_id:   String,
  pub status:          String,
  pub onboarding_step: i64,
  pub ai_thread_id:    Option<String>,
  pub last_active_at:  String,
  pub created_at:      String,
  pub updated_at:      String,
}

impl RawWorkspace {
  pub fn into_workspace(self) -> Result<BrandWorkspace> {
    Ok(BrandWorkspace {
      workspace_id:    decode_uuid(&self.workspace_id)?,
      name:            self.name,
      slug:            self.slug,
      owner_user_id:   decode_uuid(&self.owner_user_id)?,
      status:          WorkspaceStatus::parse(&self.status)?,
      onboarding_step: decode_step(self.onboarding_step)?,
      ai_thread_id:    self.ai_thread_id,
      last_active_at:  decode_dt(&self.last_active_at)?,
      created_at:      decode_dt(&self.created_at)?,
      updated_at:      decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from a `brains` row.
pub struct RawBrain {
  pub workspace_id:        String,
  pub brand_slug:          String,
  pub summary:             Option<String>,
  pub audience:            Option<String>,
  pub tone:                Option<String>,
  pub pillars:             String,
  pub offers:              Option<String>,
  pub competitors:         String,
  pub channels:            String,
  pub recommendations:     String,
  pub status:              String,
  pub onboarding_step:     i64,
  pub is_activated:        bool,
  pub analysis_method:     Option<String>,
  pub analysis_started_at: Option<String>,
  pub last_analyzed_at:    Option<String>,
  pub last_error:          Option<String>,
  pub created_at:          String,
  pub updated_at:          String,
}

impl RawBrain {
  pub fn into_brain(self) -> Result<BrandBrain> {
    Ok(BrandBrain {
      workspace_id:        decode_uuid(&self.workspace_id)?,
      brand_slug:          self.brand_slug,
      summary:             self.summary,
      audience:            self.audience,
      tone:                self.tone,
      pillars:             decode_list(&self.pillars)?,
      offers:              self.offers,
      competitors:         decode_list(&self.competitors)?,
      channels:            decode_list(&self.channels)?,
      recommendations:     decode_list(&self.recommendations)?,
      status:              BrainStatus::parse(&self.status)?,
      onboarding_step:     decode_step(self.onboarding_step)?,
      is_activated:        self.is_activated,
      analysis_method:     self.analysis_method,
      analysis_started_at: decode_dt_opt(self.analysis_started_at.as_deref())?,
      last_analyzed_at:    decode_dt_opt(self.last_analyzed_at.as_deref())?,
      last_error:          self.last_error,
      created_at:          decode_dt(&self.created_at)?,
      updated_at:          decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from an `evidence` row.
pub struct RawEvidence {
  pub evidence_id:      String,
  pub workspace_id:     String,
  pub brand_slug:       String,
  pub kind:             String,
  pub value:            String,
  pub status:           String,
  pub analyzed_content: Option<String>,
  pub metadata:         String,
  pub created_at:       String,
}

impl RawEvidence {
  pub fn into_evidence(self) -> Result<Evidence> {
    Ok(Evidence {
      evidence_id:      decode_uuid(&self.evidence_id)?,
      workspace_id:     decode_uuid(&self.workspace_id)?,
      brand_slug:       self.brand_slug,
      kind:             EvidenceKind::parse(&self.kind)?,
      value:            self.value,
      status:           EvidenceStatus::parse(&self.status)?,
      analyzed_content: self.analyzed_content,
      metadata:         serde_json::from_str(&self.metadata)?,
      created_at:       decode_dt(&self.created_at)?,
    })
  }
}
