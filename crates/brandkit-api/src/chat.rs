//! Handler for `/brands/{slug}/onboarding/chat`.
//!
//! Streams step-appropriate onboarding guidance as chunked plain text. The
//! guidance is canned per step; the analyzer is not consulted here.

use std::convert::Infallible;

use axum::{
  Json,
  body::Body,
  extract::{Path, State},
  http::header,
  response::IntoResponse,
};
use bytes::Bytes;
use serde::Deserialize;
use tokio_stream::wrappers::ReceiverStream;

use brandkit_core::{
  analyzer::BrandAnalyzer,
  onboarding::{Step, StepName},
  store::{BrandStore, SessionStore},
};

use crate::{AppState, load_workspace, error::ApiError, session::CurrentUser};

#[derive(Debug, Default, Deserialize)]
pub struct ChatBody {
  #[serde(default)]
  pub message: Option<String>,
}

/// `POST /brands/{slug}/onboarding/chat`
pub async fn handler<S, A>(
  State(state): State<AppState<S, A>>,
  current: CurrentUser,
  Path(slug): Path<String>,
  _body: Option<Json<ChatBody>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BrandStore + SessionStore + 'static,
  A: BrandAnalyzer + 'static,
{
  let ws = load_workspace(&state, &current.user, &slug).await?;
  let brain = state.engine.ensure_brain(&ws).await?;

  let chunks = guidance(&ws.name, brain.onboarding_step);

  let (tx, rx) = tokio::sync::mpsc::channel::<Result<Bytes, Infallible>>(4);
  tokio::spawn(async move {
    for chunk in chunks {
      if tx.send(Ok(Bytes::from(chunk))).await.is_err() {
        break;
      }
    }
  });

  Ok((
    [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
    Body::from_stream(ReceiverStream::new(rx)),
  ))
}

/// Canned guidance for a step, split into stream chunks.
fn guidance(brand_name: &str, step: Step) -> Vec<String> {
  let body = match StepName::canonical(step) {
    StepName::Intro => format!(
      "Welcome! Let's set up the brand profile for {brand_name}. Start by \
       telling us what the brand does, then add evidence like your website \
       or social profiles."
    ),
    StepName::CollectingEvidence => format!(
      "Keep adding evidence for {brand_name}: a website URL, social links, \
       documents, or a manual note describing the business. The more \
       complete evidence you add, the richer the analysis."
    ),
    StepName::WaitingForAnalysis => format!(
      "Evidence for {brand_name} looks good. When you're ready, trigger the \
       analysis and we'll synthesise a brand strategy from it."
    ),
    StepName::Analyzing => format!(
      "We're analyzing the evidence for {brand_name} right now. This \
       usually takes a few seconds; poll the analyze endpoint to see when \
       it finishes."
    ),
    StepName::ReviewingBrandBrain | StepName::Complete => format!(
      "The brand brain for {brand_name} is ready. Review each section, \
       refine anything that feels off, and activate it when it represents \
       the brand well."
    ),
  };

  body
    .split_inclusive(". ")
    .map(str::to_string)
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn guidance_mentions_brand_and_streams_in_chunks() {
    let chunks = guidance("Acme Co", Step::COLLECTING_EVIDENCE);
    assert!(chunks.len() > 1);
    assert!(chunks.concat().contains("Acme Co"));
  }

  #[test]
  fn guidance_covers_every_step() {
    for n in Step::MIN..=Step::MAX {
      let step = Step::new(n).unwrap();
      assert!(!guidance("X", step).is_empty(), "step {n}");
    }
  }
}
