//! The brand brain — the synthesised strategy aggregate, one-to-one with a
//! workspace.
//!
//! `workspace_id` is the single natural key; `brand_slug` is a non-unique
//! denormalised lookup field written only by the brain upsert path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, onboarding::Step};

// ─── Status ──────────────────────────────────────────────────────────────────

/// Brain lifecycle status. Unlike the workspace status this includes
/// `Failed`, reachable from `InProgress` on analyzer error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrainStatus {
  NotStarted,
  InProgress,
  Ready,
  Failed,
}

impl BrainStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::NotStarted => "not_started",
      Self::InProgress => "in_progress",
      Self::Ready => "ready",
      Self::Failed => "failed",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "not_started" => Ok(Self::NotStarted),
      "in_progress" => Ok(Self::InProgress),
      "ready" => Ok(Self::Ready),
      "failed" => Ok(Self::Failed),
      other => Err(Error::UnknownBrainStatus(other.to_string())),
    }
  }
}

impl From<crate::workspace::WorkspaceStatus> for BrainStatus {
  fn from(s: crate::workspace::WorkspaceStatus) -> Self {
    use crate::workspace::WorkspaceStatus as W;
    match s {
      W::NotStarted => Self::NotStarted,
      W::InProgress => Self::InProgress,
      W::Ready => Self::Ready,
    }
  }
}

// ─── Section keys ────────────────────────────────────────────────────────────

/// The eight refinable sections of a brain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKey {
  Summary,
  Audience,
  Tone,
  Pillars,
  Recommendations,
  Offers,
  Competitors,
  Channels,
}

impl SectionKey {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Summary => "summary",
      Self::Audience => "audience",
      Self::Tone => "tone",
      Self::Pillars => "pillars",
      Self::Recommendations => "recommendations",
      Self::Offers => "offers",
      Self::Competitors => "competitors",
      Self::Channels => "channels",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "summary" => Ok(Self::Summary),
      "audience" => Ok(Self::Audience),
      "tone" => Ok(Self::Tone),
      "pillars" => Ok(Self::Pillars),
      "recommendations" => Ok(Self::Recommendations),
      "offers" => Ok(Self::Offers),
      "competitors" => Ok(Self::Competitors),
      "channels" => Ok(Self::Channels),
      other => Err(Error::UnknownSection(other.to_string())),
    }
  }

  /// List-typed sections take newline-separated content; the rest store
  /// content verbatim.
  pub fn is_list(self) -> bool {
    matches!(
      self,
      Self::Pillars | Self::Recommendations | Self::Competitors | Self::Channels
    )
  }
}

/// Split newline-separated section content, dropping blank lines and
/// preserving order.
pub fn split_list(content: &str) -> Vec<String> {
  content
    .lines()
    .map(str::trim)
    .filter(|l| !l.is_empty())
    .map(str::to_string)
    .collect()
}

// ─── BrandBrain ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandBrain {
  pub workspace_id:        Uuid,
  pub brand_slug:          String,
  pub summary:             Option<String>,
  pub audience:            Option<String>,
  pub tone:                Option<String>,
  pub pillars:             Vec<String>,
  pub offers:              Option<String>,
  pub competitors:         Vec<String>,
  pub channels:            Vec<String>,
  pub recommendations:     Vec<String>,
  pub status:              BrainStatus,
  pub onboarding_step:     Step,
  pub is_activated:        bool,
  /// `"ai"` for a real analyzer result, `"placeholder"` for the degraded
  /// fallback, absent before the first analysis.
  pub analysis_method:     Option<String>,
  pub analysis_started_at: Option<DateTime<Utc>>,
  pub last_analyzed_at:    Option<DateTime<Utc>>,
  pub last_error:          Option<String>,
  pub created_at:          DateTime<Utc>,
  pub updated_at:          DateTime<Utc>,
}

/// Partial update applied by the brain upsert path. `None` leaves the stored
/// field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrainPatch {
  pub summary:         Option<String>,
  pub audience:        Option<String>,
  pub tone:            Option<String>,
  pub pillars:         Option<Vec<String>>,
  pub offers:          Option<String>,
  pub competitors:     Option<Vec<String>>,
  pub channels:        Option<Vec<String>>,
  pub recommendations: Option<Vec<String>>,
  pub status:          Option<BrainStatus>,
  pub onboarding_step: Option<Step>,
  pub is_activated:    Option<bool>,
}

impl BrainPatch {
  /// A patch built from a single refined section.
  pub fn for_section(key: SectionKey, content: &str) -> Self {
    let mut patch = Self::default();
    if key.is_list() {
      let items = split_list(content);
      match key {
        SectionKey::Pillars => patch.pillars = Some(items),
        SectionKey::Recommendations => patch.recommendations = Some(items),
        SectionKey::Competitors => patch.competitors = Some(items),
        SectionKey::Channels => patch.channels = Some(items),
        _ => unreachable!("is_list covers exactly the four list sections"),
      }
    } else {
      let text = Some(content.to_string());
      match key {
        SectionKey::Summary => patch.summary = text,
        SectionKey::Audience => patch.audience = text,
        SectionKey::Tone => patch.tone = text,
        SectionKey::Offers => patch.offers = text,
        _ => unreachable!("non-list keys are the four scalar sections"),
      }
    }
    patch
  }
}

// ─── Analysis result ─────────────────────────────────────────────────────────

/// The structured object an analyzer must return. JSON contract: keys
/// `summary, audience, tone, pillars (3–5), recommendations (3–5), offers,
/// competitors, channels`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandAnalysis {
  pub summary:         String,
  pub audience:        String,
  pub tone:            String,
  pub pillars:         Vec<String>,
  pub recommendations: Vec<String>,
  pub offers:          String,
  pub competitors:     Vec<String>,
  pub channels:        Vec<String>,
}

impl BrandAnalysis {
  /// Whether the analysis honours the contract. Out-of-contract results are
  /// treated as malformed output (degraded path), not as hard failure.
  pub fn conforms(&self) -> bool {
    !self.summary.trim().is_empty()
      && (3..=5).contains(&self.pillars.len())
      && (3..=5).contains(&self.recommendations.len())
  }

  /// The fixed placeholder served when the analyzer returns malformed
  /// output. Availability over accuracy: the request still succeeds, and
  /// `analysis_method = "placeholder"` records what happened.
  pub fn placeholder(brand_name: &str) -> Self {
    Self {
      summary: format!(
        "{brand_name} is building its brand profile. Add more evidence and \
         re-run the analysis for a richer strategy."
      ),
      audience: "People researching products and services in your category."
        .to_string(),
      tone: "Clear, friendly, and credible.".to_string(),
      pillars: vec![
        "What you offer".to_string(),
        "Why it matters".to_string(),
        "Proof and stories".to_string(),
      ],
      recommendations: vec![
        "Add your website and social profiles as evidence.".to_string(),
        "Describe your ideal customer in a manual note.".to_string(),
        "Re-run the analysis once more evidence is complete.".to_string(),
      ],
      offers: "Not enough evidence to describe offers yet.".to_string(),
      competitors: Vec::new(),
      channels: Vec::new(),
    }
  }
}

impl From<&BrandAnalysis> for BrainPatch {
  fn from(a: &BrandAnalysis) -> Self {
    BrainPatch {
      summary: Some(a.summary.clone()),
      audience: Some(a.audience.clone()),
      tone: Some(a.tone.clone()),
      pillars: Some(a.pillars.clone()),
      offers: Some(a.offers.clone()),
      competitors: Some(a.competitors.clone()),
      channels: Some(a.channels.clone()),
      recommendations: Some(a.recommendations.clone()),
      ..Default::default()
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn split_list_drops_blanks_preserves_order() {
    assert_eq!(split_list("A\nB\n\nC"), vec!["A", "B", "C"]);
    assert_eq!(split_list("  x  \n\n  y"), vec!["x", "y"]);
    assert!(split_list("\n\n").is_empty());
  }

  #[test]
  fn section_key_parse_rejects_unknown() {
    assert!(SectionKey::parse("summary").is_ok());
    assert!(SectionKey::parse("logo").is_err());
  }

  #[test]
  fn section_patch_routes_lists_and_scalars() {
    let patch = BrainPatch::for_section(SectionKey::Pillars, "A\nB\n\nC");
    assert_eq!(patch.pillars.as_deref(), Some(&["A".to_string(), "B".to_string(), "C".to_string()][..]));
    assert!(patch.summary.is_none());

    let patch = BrainPatch::for_section(SectionKey::Tone, "Warm\nand direct");
    assert_eq!(patch.tone.as_deref(), Some("Warm\nand direct"));
    assert!(patch.pillars.is_none());
  }

  #[test]
  fn placeholder_conforms_to_contract() {
    let p = BrandAnalysis::placeholder("Acme Co");
    assert!(p.conforms());
    assert!(p.summary.contains("Acme Co"));
  }

  #[test]
  fn conformance_bounds_on_pillars() {
    let mut a = BrandAnalysis::placeholder("X");
    a.pillars = vec!["one".into(), "two".into()];
    assert!(!a.conforms());
    a.pillars = vec!["1".into(); 6];
    assert!(!a.conforms());
  }
}
