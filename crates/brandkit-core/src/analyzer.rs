//! The `BrandAnalyzer` trait — the opaque external AI collaborator.

use std::future::Future;

use thiserror::Error;

use crate::brain::BrandAnalysis;

/// The fixed instruction contract sent with every analysis request. The
/// analyzer must answer with a single JSON object using exactly these keys.
pub const ANALYSIS_INSTRUCTIONS: &str = "\
You are a brand strategist. Given a brand name and a block of evidence, \
return a single JSON object with the keys: summary (string), audience \
(string), tone (string), pillars (array of 3-5 strings), recommendations \
(array of 3-5 strings), offers (string), competitors (array of strings), \
channels (array of strings). Return only the JSON object, no prose.";

/// Why an analyzer call produced no usable result. `Timeout` and
/// `Transport` are genuine failures; `Malformed` means the service answered
/// but off-contract, which the engine degrades to a placeholder instead of
/// failing the request.
#[derive(Debug, Error)]
pub enum AnalyzerError {
  #[error("analyzer call timed out")]
  Timeout,

  #[error("analyzer transport error: {0}")]
  Transport(String),

  #[error("analyzer returned malformed output: {0}")]
  Malformed(String),
}

/// Converts brand name + evidence text into a structured analysis.
///
/// Implementations must bound every call with an explicit timeout; a hung
/// external service must never block a request indefinitely.
pub trait BrandAnalyzer: Send + Sync {
  fn analyze<'a>(
    &'a self,
    brand_name: &'a str,
    evidence_text: &'a str,
  ) -> impl Future<Output = Result<BrandAnalysis, AnalyzerError>> + Send + 'a;
}
