//! Error types for `brandkit-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("workspace name must be at least {min} characters", min = crate::workspace::MIN_NAME_LEN)]
  WorkspaceNameTooShort,

  #[error("unknown brain section: {0:?}")]
  UnknownSection(String),

  #[error("unknown evidence kind: {0:?}")]
  UnknownEvidenceKind(String),

  #[error("unknown evidence status: {0:?}")]
  UnknownEvidenceStatus(String),

  #[error("unknown workspace status: {0:?}")]
  UnknownWorkspaceStatus(String),

  #[error("unknown brain status: {0:?}")]
  UnknownBrainStatus(String),

  #[error("onboarding step out of range: {0}")]
  StepOutOfRange(u8),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
