//! The onboarding state machine.
//!
//! The single authoritative mapping between the *named* step representation
//! (used by the chat/state endpoints) and the *numeric* 1–5 representation
//! (used by the brain/onboarding endpoints), plus status derivation. Both
//! endpoint families delegate here; nothing else re-derives this table.
//!
//! | Numeric | Named                           | Status      |
//! |---------|---------------------------------|-------------|
//! | 1       | intro                           | not_started |
//! | 2       | collecting_evidence             | in_progress |
//! | 3       | waiting_for_analysis            | in_progress |
//! | 4       | analyzing                       | in_progress |
//! | 5       | reviewing_brand_brain / complete| ready       |

use serde::{Deserialize, Serialize};

use crate::{Error, Result, workspace::WorkspaceStatus};

// ─── Step ────────────────────────────────────────────────────────────────────

/// A numeric onboarding step, always in `1..=5`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Step(u8);

impl Step {
  pub const INTRO: Step = Step(1);
  pub const COLLECTING_EVIDENCE: Step = Step(2);
  pub const WAITING_FOR_ANALYSIS: Step = Step(3);
  pub const ANALYZING: Step = Step(4);
  pub const REVIEWING_BRAND_BRAIN: Step = Step(5);

  pub const MIN: u8 = 1;
  pub const MAX: u8 = 5;

  pub fn new(n: u8) -> Result<Self> {
    if (Self::MIN..=Self::MAX).contains(&n) {
      Ok(Step(n))
    } else {
      Err(Error::StepOutOfRange(n))
    }
  }

  pub fn get(self) -> u8 { self.0 }
}

impl TryFrom<u8> for Step {
  type Error = Error;
  fn try_from(n: u8) -> Result<Self> { Step::new(n) }
}

impl From<Step> for u8 {
  fn from(s: Step) -> u8 { s.0 }
}

// ─── StepName ────────────────────────────────────────────────────────────────

/// The named representation of an onboarding step.
///
/// `Complete` is accepted on input as an alias for step 5; responses always
/// use the canonical `ReviewingBrandBrain`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepName {
  Intro,
  CollectingEvidence,
  WaitingForAnalysis,
  Analyzing,
  ReviewingBrandBrain,
  Complete,
}

impl StepName {
  /// The numeric step this name maps to.
  pub fn step(self) -> Step {
    match self {
      Self::Intro => Step::INTRO,
      Self::CollectingEvidence => Step::COLLECTING_EVIDENCE,
      Self::WaitingForAnalysis => Step::WAITING_FOR_ANALYSIS,
      Self::Analyzing => Step::ANALYZING,
      Self::ReviewingBrandBrain | Self::Complete => Step::REVIEWING_BRAND_BRAIN,
    }
  }

  /// The canonical name for a numeric step.
  pub fn canonical(step: Step) -> StepName {
    match step.get() {
      1 => Self::Intro,
      2 => Self::CollectingEvidence,
      3 => Self::WaitingForAnalysis,
      4 => Self::Analyzing,
      _ => Self::ReviewingBrandBrain,
    }
  }
}

// ─── Derivation and transitions ──────────────────────────────────────────────

/// Derive the workspace status implied by a step. Pure and total.
pub fn derive_status(step: Step) -> WorkspaceStatus {
  match step.get() {
    1 => WorkspaceStatus::NotStarted,
    2..=4 => WorkspaceStatus::InProgress,
    _ => WorkspaceStatus::Ready,
  }
}

/// Apply a step transition. Any forward or backward transition is permitted;
/// the returned status is always derived from the target.
pub fn advance(_current: Step, target: Step) -> (Step, WorkspaceStatus) {
  (target, derive_status(target))
}

/// The state forced by a reset-analysis operation, letting a user retry a
/// failed analysis. Note the status is deliberately `not_started`, not the
/// derived status of step 3.
pub fn reset_state() -> (Step, WorkspaceStatus) {
  (Step::WAITING_FOR_ANALYSIS, WorkspaceStatus::NotStarted)
}
