//! Evidence — one raw or processed input used to synthesise a brand brain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Kind ────────────────────────────────────────────────────────────────────

/// Where a piece of evidence came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceKind {
  Website,
  Document,
  Social,
  Manual,
  BrandNameSearch,
}

impl EvidenceKind {
  /// The string stored in the `kind` column and used in analysis labels.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Website => "website",
      Self::Document => "document",
      Self::Social => "social",
      Self::Manual => "manual",
      Self::BrandNameSearch => "brand_name_search",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "website" => Ok(Self::Website),
      "document" => Ok(Self::Document),
      "social" => Ok(Self::Social),
      "manual" => Ok(Self::Manual),
      "brand_name_search" => Ok(Self::BrandNameSearch),
      other => Err(Error::UnknownEvidenceKind(other.to_string())),
    }
  }

  /// Inline kinds carry their content in `value` directly and need no
  /// external processing before they are usable for analysis.
  pub fn is_inline(self) -> bool {
    matches!(self, Self::Manual | Self::BrandNameSearch)
  }
}

// ─── Status ──────────────────────────────────────────────────────────────────

/// Processing state of one evidence item. The canonical initial state is
/// `Pending`; only `Complete` items are ever fed to analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceStatus {
  Pending,
  Processing,
  Complete,
  Failed,
}

impl EvidenceStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Pending => "pending",
      Self::Processing => "processing",
      Self::Complete => "complete",
      Self::Failed => "failed",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "pending" => Ok(Self::Pending),
      "processing" => Ok(Self::Processing),
      "complete" => Ok(Self::Complete),
      "failed" => Ok(Self::Failed),
      other => Err(Error::UnknownEvidenceStatus(other.to_string())),
    }
  }
}

// ─── Evidence ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
  pub evidence_id:      Uuid,
  pub workspace_id:     Uuid,
  /// Denormalised for fast per-brand listing; never the authority.
  pub brand_slug:       String,
  pub kind:             EvidenceKind,
  /// Raw content: a URL, a document reference, or free text.
  pub value:            String,
  pub status:           EvidenceStatus,
  /// Derived/cleaned text produced by processing; preferred over `value`
  /// when assembling analysis input.
  pub analyzed_content: Option<String>,
  pub metadata:         serde_json::Value,
  pub created_at:       DateTime<Utc>,
}

/// Input to [`crate::store::BrandStore::add_evidence`]. New evidence always
/// starts `Pending`; inline kinds are completed immediately by the caller.
#[derive(Debug, Clone)]
pub struct NewEvidence {
  pub workspace_id: Uuid,
  pub brand_slug:   String,
  pub kind:         EvidenceKind,
  pub value:        String,
  pub metadata:     serde_json::Value,
}

impl NewEvidence {
  pub fn new(
    workspace_id: Uuid,
    brand_slug: impl Into<String>,
    kind: EvidenceKind,
    value: impl Into<String>,
  ) -> Self {
    Self {
      workspace_id,
      brand_slug: brand_slug.into(),
      kind,
      value: value.into(),
      metadata: serde_json::Value::Object(Default::default()),
    }
  }
}
