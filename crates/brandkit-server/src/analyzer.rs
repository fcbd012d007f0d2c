//! HTTP-backed [`BrandAnalyzer`] implementation.
//!
//! Posts the instruction contract, brand name, and evidence block to a
//! configured endpoint and parses the JSON analysis out of the reply. Every
//! call is bounded by the client timeout; a hung service surfaces as
//! [`AnalyzerError::Timeout`], never as a stuck request.

use std::{future::Future, time::Duration};

use brandkit_core::{
  analyzer::{ANALYSIS_INSTRUCTIONS, AnalyzerError, BrandAnalyzer},
  brain::BrandAnalysis,
};
use serde_json::json;

pub struct HttpAnalyzer {
  client:  reqwest::Client,
  url:     String,
  api_key: Option<String>,
}

impl HttpAnalyzer {
  pub fn new(
    url: impl Into<String>,
    api_key: Option<String>,
    timeout: Duration,
  ) -> anyhow::Result<Self> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    Ok(Self { client, url: url.into(), api_key })
  }
}

impl BrandAnalyzer for HttpAnalyzer {
  fn analyze<'a>(
    &'a self,
    brand_name: &'a str,
    evidence_text: &'a str,
  ) -> impl Future<Output = Result<BrandAnalysis, AnalyzerError>> + Send + 'a {
    async move {
      let payload = json!({
        "instructions": ANALYSIS_INSTRUCTIONS,
        "brand_name":   brand_name,
        "evidence":     evidence_text,
      });

      let mut request = self.client.post(&self.url).json(&payload);
      if let Some(key) = &self.api_key {
        request = request.bearer_auth(key);
      }

      let response = request.send().await.map_err(classify)?;
      let response = response
        .error_for_status()
        .map_err(|e| AnalyzerError::Transport(e.to_string()))?;
      let text = response.text().await.map_err(classify)?;

      parse_analysis(&text)
    }
  }
}

fn classify(err: reqwest::Error) -> AnalyzerError {
  if err.is_timeout() {
    AnalyzerError::Timeout
  } else {
    AnalyzerError::Transport(err.to_string())
  }
}

/// Parse the analysis JSON, tolerating a markdown code fence around it.
fn parse_analysis(text: &str) -> Result<BrandAnalysis, AnalyzerError> {
  let trimmed = text.trim();
  let body = trimmed
    .strip_prefix("```json")
    .or_else(|| trimmed.strip_prefix("```"))
    .and_then(|rest| rest.strip_suffix("```"))
    .map(str::trim)
    .unwrap_or(trimmed);

  serde_json::from_str(body).map_err(|e| AnalyzerError::Malformed(e.to_string()))
}
