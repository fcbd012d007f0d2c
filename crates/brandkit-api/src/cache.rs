//! Short-TTL workspace cache, keyed by slug.
//!
//! Absorbs the repeated ownership lookups the nested onboarding routes make.
//! Mutations must call [`WorkspaceCache::invalidate`]; a cache miss always
//! falls through to the store, so authorization never depends on a stale
//! entry being absent.

use std::{
  collections::HashMap,
  sync::Mutex,
  time::{Duration, Instant},
};

use brandkit_core::workspace::BrandWorkspace;

/// Default entry lifetime.
pub const CACHE_TTL: Duration = Duration::from_secs(30);

pub struct WorkspaceCache {
  ttl:     Duration,
  entries: Mutex<HashMap<String, (BrandWorkspace, Instant)>>,
}

impl Default for WorkspaceCache {
  fn default() -> Self {
    Self::new(CACHE_TTL)
  }
}

impl WorkspaceCache {
  pub fn new(ttl: Duration) -> Self {
    Self { ttl, entries: Mutex::new(HashMap::new()) }
  }

  fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, (BrandWorkspace, Instant)>> {
    self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }

  /// Fresh entry for `slug`, if any. Expired entries are dropped on read.
  pub fn get(&self, slug: &str) -> Option<BrandWorkspace> {
    let mut entries = self.lock();
    match entries.get(slug) {
      Some((ws, at)) if at.elapsed() < self.ttl => Some(ws.clone()),
      Some(_) => {
        entries.remove(slug);
        None
      }
      None => None,
    }
  }

  pub fn set(&self, workspace: BrandWorkspace) {
    self
      .lock()
      .insert(workspace.slug.clone(), (workspace, Instant::now()));
  }

  pub fn invalidate(&self, slug: &str) {
    self.lock().remove(slug);
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use uuid::Uuid;

  use super::*;
  use brandkit_core::{onboarding::Step, workspace::WorkspaceStatus};

  fn workspace(slug: &str) -> BrandWorkspace {
    let now = Utc::now();
    BrandWorkspace {
      workspace_id:    Uuid::new_v4(),
      name:            "Acme Co".into(),
      slug:            slug.into(),
      owner_user_id:   Uuid::new_v4(),
      status:          WorkspaceStatus::NotStarted,
      onboarding_step: Step::INTRO,
      ai_thread_id:    None,
      last_active_at:  now,
      created_at:      now,
      updated_at:      now,
    }
  }

  #[test]
  fn hit_within_ttl() {
    let cache = WorkspaceCache::default();
    cache.set(workspace("acme"));
    assert!(cache.get("acme").is_some());
    assert!(cache.get("other").is_none());
  }

  #[test]
  fn invalidate_removes_entry() {
    let cache = WorkspaceCache::default();
    cache.set(workspace("acme"));
    cache.invalidate("acme");
    assert!(cache.get("acme").is_none());
  }

  #[test]
  fn expired_entry_reads_as_miss() {
    let cache = WorkspaceCache::new(Duration::ZERO);
    cache.set(workspace("acme"));
    assert!(cache.get("acme").is_none());
  }
}
