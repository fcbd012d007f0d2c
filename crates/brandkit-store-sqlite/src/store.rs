//! [`SqliteStore`] — the SQLite implementation of [`BrandStore`] and
//! [`SessionStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use brandkit_core::{
  brain::{BrainPatch, BrainStatus, BrandAnalysis, BrandBrain},
  evidence::{Evidence, EvidenceStatus, NewEvidence},
  onboarding::Step,
  store::{BrandStore, EvidenceQuery, Session, SessionStore},
  user::{NewUser, User, UserCredentials},
  workspace::{BrandWorkspace, NewWorkspace, WorkspaceStatus},
};

use crate::{
  Error, Result,
  encode::{
    RawBrain, RawEvidence, RawUser, RawWorkspace, encode_dt, encode_list,
    encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Row mappers ─────────────────────────────────────────────────────────────

const WORKSPACE_COLS: &str = "workspace_id, name, slug, owner_user_id, status, \
   onboarding_step, ai_thread_id, last_active_at, created_at, updated_at";

fn workspace_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawWorkspace> {
  Ok(RawWorkspace {
    workspace_id:    row.get(0)?,
    name:            row.get(1)?,
    slug:            row.get(2)?,
    owner_user_id:   row.get(3)?,
    status:          row.get(4)?,
    onboarding_step: row.get(5)?,
    ai_thread_id:    row.get(6)?,
    last_active_at:  row.get(7)?,
    created_at:      row.get(8)?,
    updated_at:      row.get(9)?,
  })
}

const BRAIN_COLS: &str = "workspace_id, brand_slug, summary, audience, tone, \
   pillars, offers, competitors, channels, recommendations, status, \
   onboarding_step, is_activated, analysis_method, analysis_started_at, \
   last_analyzed_at, last_error, created_at, updated_at";

fn brain_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawBrain> {
  Ok(RawBrain {
    workspace_id:        row.get(0)?,
    brand_slug:          row.get(1)?,
    summary:             row.get(2)?,
    audience:            row.get(3)?,
    tone:                row.get(4)?,
    pillars:             row.get(5)?,
    offers:              row.get(6)?,
    competitors:         row.get(7)?,
    channels:            row.get(8)?,
    recommendations:     row.get(9)?,
    status:              row.get(10)?,
    onboarding_step:     row.get(11)?,
    is_activated:        row.get(12)?,
    analysis_method:     row.get(13)?,
    analysis_started_at: row.get(14)?,
    last_analyzed_at:    row.get(15)?,
    last_error:          row.get(16)?,
    created_at:          row.get(17)?,
    updated_at:          row.get(18)?,
  })
}

const EVIDENCE_COLS: &str = "evidence_id, workspace_id, brand_slug, kind, \
   value, status, analyzed_content, metadata, created_at";

fn evidence_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawEvidence> {
  Ok(RawEvidence {
    evidence_id:      row.get(0)?,
    workspace_id:     row.get(1)?,
    brand_slug:       row.get(2)?,
    kind:             row.get(3)?,
    value:            row.get(4)?,
    status:           row.get(5)?,
    analyzed_content: row.get(6)?,
    metadata:         row.get(7)?,
    created_at:       row.get(8)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Brandkit store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch one brain row by workspace id.
  async fn fetch_brain(&self, workspace_id: Uuid) -> Result<Option<BrandBrain>> {
    let id_str = encode_uuid(workspace_id);
    let raw: Option<RawBrain> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {BRAIN_COLS} FROM brains WHERE workspace_id = ?1"),
              rusqlite::params![id_str],
              brain_from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawBrain::into_brain).transpose()
  }
}

// ─── BrandStore impl ─────────────────────────────────────────────────────────

impl BrandStore for SqliteStore {
  type Error = Error;

  fn is_conflict(err: &Error) -> bool {
    matches!(err, Error::Duplicate(_))
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let user = User {
      user_id:              Uuid::new_v4(),
      email:                input.email,
      name:                 input.name,
      onboarding_completed: false,
      created_at:           Utc::now(),
    };

    let id_str   = encode_uuid(user.user_id);
    let email    = user.email.clone();
    let hash     = input.password_hash;
    let name     = user.name.clone();
    let at_str   = encode_dt(user.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (user_id, email, password_hash, name, onboarding_completed, created_at)
           VALUES (?1, ?2, ?3, ?4, 0, ?5)",
          rusqlite::params![id_str, email, hash, name, at_str],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| Error::duplicate_as(e, "an account with this email already exists"))?;

    Ok(user)
  }

  async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(user_id);
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, email, name, onboarding_completed, created_at
               FROM users WHERE user_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawUser {
                  user_id:              row.get(0)?,
                  email:                row.get(1)?,
                  name:                 row.get(2)?,
                  onboarding_completed: row.get(3)?,
                  created_at:           row.get(4)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawUser::into_user).transpose()
  }

  async fn find_credentials(&self, email: &str) -> Result<Option<UserCredentials>> {
    let email = email.to_lowercase();
    let row: Option<(String, String)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, password_hash FROM users WHERE email = ?1",
              rusqlite::params![email],
              |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?,
        )
      })
      .await?;

    row
      .map(|(id_str, password_hash)| {
        Ok(UserCredentials {
          user_id: crate::encode::decode_uuid(&id_str)?,
          password_hash,
        })
      })
      .transpose()
  }

  async fn set_onboarding_completed(&self, user_id: Uuid, completed: bool) -> Result<()> {
    let id_str = encode_uuid(user_id);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE users SET onboarding_completed = ?2 WHERE user_id = ?1",
          rusqlite::params![id_str, completed],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Workspaces ────────────────────────────────────────────────────────────

  async fn create_workspace(&self, input: NewWorkspace) -> Result<BrandWorkspace> {
    let now = Utc::now();
    let workspace = BrandWorkspace {
      workspace_id:    Uuid::new_v4(),
      name:            input.name,
      slug:            input.slug,
      owner_user_id:   input.owner_user_id,
      status:          WorkspaceStatus::NotStarted,
      onboarding_step: Step::INTRO,
      ai_thread_id:    None,
      last_active_at:  now,
      created_at:      now,
      updated_at:      now,
    };

    let id_str    = encode_uuid(workspace.workspace_id);
    let name      = workspace.name.clone();
    let slug      = workspace.slug.clone();
    let owner_str = encode_uuid(workspace.owner_user_id);
    let at_str    = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO workspaces
             (workspace_id, name, slug, owner_user_id, status, onboarding_step,
              last_active_at, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, 'not_started', 1, ?5, ?5, ?5)",
          rusqlite::params![id_str, name, slug, owner_str, at_str],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| Error::duplicate_as(e, "a workspace with this slug already exists"))?;

    Ok(workspace)
  }

  async fn get_workspace(&self, slug: &str, owner_user_id: Uuid) -> Result<Option<BrandWorkspace>> {
    let slug      = slug.to_string();
    let owner_str = encode_uuid(owner_user_id);

    let raw: Option<RawWorkspace> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {WORKSPACE_COLS} FROM workspaces
                 WHERE slug = ?1 AND owner_user_id = ?2"
              ),
              rusqlite::params![slug, owner_str],
              workspace_from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawWorkspace::into_workspace).transpose()
  }

  async fn slug_exists(&self, slug: &str) -> Result<bool> {
    let slug = slug.to_string();
    let exists: bool = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM workspaces WHERE slug = ?1",
              rusqlite::params![slug],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(exists)
  }

  async fn list_workspaces(&self, owner_user_id: Uuid) -> Result<Vec<BrandWorkspace>> {
    let owner_str = encode_uuid(owner_user_id);
    let raws: Vec<RawWorkspace> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {WORKSPACE_COLS} FROM workspaces
           WHERE owner_user_id = ?1 ORDER BY created_at ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![owner_str], workspace_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawWorkspace::into_workspace).collect()
  }

  async fn touch_workspace(&self, slug: &str) -> Result<()> {
    let slug   = slug.to_string();
    let at_str = encode_dt(Utc::now());
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE workspaces SET last_active_at = ?2 WHERE slug = ?1",
          rusqlite::params![slug, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn set_workspace_state(
    &self,
    slug:   &str,
    step:   Step,
    status: WorkspaceStatus,
  ) -> Result<()> {
    let slug       = slug.to_string();
    let status_str = status.as_str().to_owned();
    let step_num   = i64::from(step.get());
    let at_str     = encode_dt(Utc::now());
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE workspaces
           SET status = ?2, onboarding_step = ?3, last_active_at = ?4, updated_at = ?4
           WHERE slug = ?1",
          rusqlite::params![slug, status_str, step_num, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete_workspace(&self, slug: &str, owner_user_id: Uuid) -> Result<bool> {
    let slug      = slug.to_string();
    let owner_str = encode_uuid(owner_user_id);

    let deleted: bool = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let ws_id: Option<String> = tx
          .query_row(
            "SELECT workspace_id FROM workspaces
             WHERE slug = ?1 AND owner_user_id = ?2",
            rusqlite::params![slug, owner_str],
            |row| row.get(0),
          )
          .optional()?;

        let Some(ws_id) = ws_id else {
          return Ok(false);
        };

        // Explicit cascade: evidence and brain first, workspace last.
        tx.execute(
          "DELETE FROM evidence WHERE workspace_id = ?1",
          rusqlite::params![ws_id],
        )?;
        tx.execute(
          "DELETE FROM brains WHERE workspace_id = ?1",
          rusqlite::params![ws_id],
        )?;
        tx.execute(
          "DELETE FROM workspaces WHERE workspace_id = ?1",
          rusqlite::params![ws_id],
        )?;

        tx.commit()?;
        Ok(true)
      })
      .await?;
    Ok(deleted)
  }

  // ── Brains ────────────────────────────────────────────────────────────────

  async fn get_brain(&self, workspace_id: Uuid) -> Result<Option<BrandBrain>> {
    self.fetch_brain(workspace_id).await
  }

  async fn upsert_brain(
    &self,
    workspace_id: Uuid,
    brand_slug:   &str,
    patch:        BrainPatch,
  ) -> Result<BrandBrain> {
    let id_str   = encode_uuid(workspace_id);
    let slug     = brand_slug.to_string();
    let at_str   = encode_dt(Utc::now());

    let pillars         = patch.pillars.as_deref().map(encode_list).transpose()?;
    let competitors     = patch.competitors.as_deref().map(encode_list).transpose()?;
    let channels        = patch.channels.as_deref().map(encode_list).transpose()?;
    let recommendations = patch.recommendations.as_deref().map(encode_list).transpose()?;
    let status          = patch.status.map(|s| s.as_str().to_owned());
    let step            = patch.onboarding_step.map(|s| i64::from(s.get()));
    let summary         = patch.summary;
    let audience        = patch.audience;
    let tone            = patch.tone;
    let offers          = patch.offers;
    let is_activated    = patch.is_activated;

    let raw: RawBrain = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO brains
             (workspace_id, brand_slug, summary, audience, tone, pillars,
              offers, competitors, channels, recommendations, status,
              onboarding_step, is_activated, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5,
                   COALESCE(?6, '[]'), ?7, COALESCE(?8, '[]'),
                   COALESCE(?9, '[]'), COALESCE(?10, '[]'),
                   COALESCE(?11, 'not_started'), COALESCE(?12, 1),
                   COALESCE(?13, 0), ?14, ?14)
           ON CONFLICT(workspace_id) DO UPDATE SET
             brand_slug      = excluded.brand_slug,
             summary         = COALESCE(?3,  brains.summary),
             audience        = COALESCE(?4,  brains.audience),
             tone            = COALESCE(?5,  brains.tone),
             pillars         = COALESCE(?6,  brains.pillars),
             offers          = COALESCE(?7,  brains.offers),
             competitors     = COALESCE(?8,  brains.competitors),
             channels        = COALESCE(?9,  brains.channels),
             recommendations = COALESCE(?10, brains.recommendations),
             status          = COALESCE(?11, brains.status),
             onboarding_step = COALESCE(?12, brains.onboarding_step),
             is_activated    = COALESCE(?13, brains.is_activated),
             updated_at      = ?14",
          rusqlite::params![
            id_str, slug, summary, audience, tone, pillars, offers,
            competitors, channels, recommendations, status, step,
            is_activated, at_str,
          ],
        )?;

        conn.query_row(
          &format!("SELECT {BRAIN_COLS} FROM brains WHERE workspace_id = ?1"),
          rusqlite::params![id_str],
          brain_from_row,
        )
        .map_err(Into::into)
      })
      .await?;

    raw.into_brain()
  }

  async fn claim_analysis(&self, workspace_id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(workspace_id);
    let at_str = encode_dt(Utc::now());

    // Single conditional write: the claim succeeds only when no run is
    // already in progress at step 4. No read precedes it.
    let claimed: bool = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "UPDATE brains
           SET status = 'in_progress', onboarding_step = 4,
               analysis_started_at = ?2, last_error = NULL, updated_at = ?2
           WHERE workspace_id = ?1
             AND NOT (status = 'in_progress' AND onboarding_step = 4)",
          rusqlite::params![id_str, at_str],
        )?;
        Ok(n == 1)
      })
      .await?;
    Ok(claimed)
  }

  async fn finish_analysis(
    &self,
    workspace_id: Uuid,
    analysis:     &BrandAnalysis,
    method:       &str,
  ) -> Result<BrandBrain> {
    let id_str          = encode_uuid(workspace_id);
    let at_str          = encode_dt(Utc::now());
    let method          = method.to_string();
    let summary         = analysis.summary.clone();
    let audience        = analysis.audience.clone();
    let tone            = analysis.tone.clone();
    let offers          = analysis.offers.clone();
    let pillars         = encode_list(&analysis.pillars)?;
    let recommendations = encode_list(&analysis.recommendations)?;
    let competitors     = encode_list(&analysis.competitors)?;
    let channels        = encode_list(&analysis.channels)?;

    let raw: RawBrain = self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE brains
           SET summary = ?2, audience = ?3, tone = ?4, pillars = ?5,
               offers = ?6, competitors = ?7, channels = ?8,
               recommendations = ?9, status = 'ready', onboarding_step = 5,
               analysis_method = ?10, last_analyzed_at = ?11,
               last_error = NULL, updated_at = ?11
           WHERE workspace_id = ?1",
          rusqlite::params![
            id_str, summary, audience, tone, pillars, offers, competitors,
            channels, recommendations, method, at_str,
          ],
        )?;

        conn.query_row(
          &format!("SELECT {BRAIN_COLS} FROM brains WHERE workspace_id = ?1"),
          rusqlite::params![id_str],
          brain_from_row,
        )
        .map_err(Into::into)
      })
      .await?;

    raw.into_brain()
  }

  async fn fail_analysis(&self, workspace_id: Uuid, error: &str) -> Result<BrandBrain> {
    let id_str = encode_uuid(workspace_id);
    let at_str = encode_dt(Utc::now());
    let error  = error.to_string();

    let raw: RawBrain = self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE brains
           SET status = 'failed', onboarding_step = 2, last_error = ?2,
               updated_at = ?3
           WHERE workspace_id = ?1",
          rusqlite::params![id_str, error, at_str],
        )?;

        conn.query_row(
          &format!("SELECT {BRAIN_COLS} FROM brains WHERE workspace_id = ?1"),
          rusqlite::params![id_str],
          brain_from_row,
        )
        .map_err(Into::into)
      })
      .await?;

    raw.into_brain()
  }

  async fn reset_analysis(&self, workspace_id: Uuid) -> Result<()> {
    let id_str = encode_uuid(workspace_id);
    let at_str = encode_dt(Utc::now());
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE brains
           SET status = 'not_started', onboarding_step = 3,
               analysis_started_at = NULL, last_analyzed_at = NULL,
               last_error = NULL, updated_at = ?2
           WHERE workspace_id = ?1",
          rusqlite::params![id_str, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn activate_brain(&self, workspace_id: Uuid) -> Result<BrandBrain> {
    let id_str = encode_uuid(workspace_id);
    let at_str = encode_dt(Utc::now());

    let raw: RawBrain = self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE brains
           SET is_activated = 1, status = 'ready', onboarding_step = 5,
               updated_at = ?2
           WHERE workspace_id = ?1",
          rusqlite::params![id_str, at_str],
        )?;

        conn.query_row(
          &format!("SELECT {BRAIN_COLS} FROM brains WHERE workspace_id = ?1"),
          rusqlite::params![id_str],
          brain_from_row,
        )
        .map_err(Into::into)
      })
      .await?;

    raw.into_brain()
  }

  async fn set_brain_state(
    &self,
    workspace_id: Uuid,
    step:         Step,
    status:       BrainStatus,
  ) -> Result<BrandBrain> {
    let id_str     = encode_uuid(workspace_id);
    let status_str = status.as_str().to_owned();
    let step_num   = i64::from(step.get());
    let at_str     = encode_dt(Utc::now());

    let raw: RawBrain = self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE brains
           SET status = ?2, onboarding_step = ?3, updated_at = ?4
           WHERE workspace_id = ?1",
          rusqlite::params![id_str, status_str, step_num, at_str],
        )?;

        conn.query_row(
          &format!("SELECT {BRAIN_COLS} FROM brains WHERE workspace_id = ?1"),
          rusqlite::params![id_str],
          brain_from_row,
        )
        .map_err(Into::into)
      })
      .await?;

    raw.into_brain()
  }

  // ── Evidence ──────────────────────────────────────────────────────────────

  async fn add_evidence(&self, input: NewEvidence) -> Result<Evidence> {
    let evidence = Evidence {
      evidence_id:      Uuid::new_v4(),
      workspace_id:     input.workspace_id,
      brand_slug:       input.brand_slug,
      kind:             input.kind,
      value:            input.value,
      status:           EvidenceStatus::Pending,
      analyzed_content: None,
      metadata:         input.metadata,
      created_at:       Utc::now(),
    };

    let id_str   = encode_uuid(evidence.evidence_id);
    let ws_str   = encode_uuid(evidence.workspace_id);
    let slug     = evidence.brand_slug.clone();
    let kind     = evidence.kind.as_str().to_owned();
    let value    = evidence.value.clone();
    let metadata = serde_json::to_string(&evidence.metadata)?;
    let at_str   = encode_dt(evidence.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO evidence
             (evidence_id, workspace_id, brand_slug, kind, value, status,
              metadata, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, 'pending', ?6, ?7)",
          rusqlite::params![id_str, ws_str, slug, kind, value, metadata, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(evidence)
  }

  async fn list_evidence(
    &self,
    workspace_id: Uuid,
    query:        &EvidenceQuery,
  ) -> Result<Vec<Evidence>> {
    let ws_str     = encode_uuid(workspace_id);
    let status_str = query.status.map(|s| s.as_str().to_owned());
    let kind_str   = query.kind.map(|k| k.as_str().to_owned());
    let limit_val  = query.limit.unwrap_or(50).min(i64::MAX as usize) as i64;

    let raws: Vec<RawEvidence> = self
      .conn
      .call(move |conn| {
        let mut conds = vec!["workspace_id = ?1"];
        if status_str.is_some() {
          conds.push("status = ?2");
        }
        if kind_str.is_some() {
          conds.push("kind = ?3");
        }

        let sql = format!(
          "SELECT {EVIDENCE_COLS} FROM evidence
           WHERE {}
           ORDER BY created_at DESC
           LIMIT ?4",
          conds.join(" AND ")
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![
              ws_str,
              status_str.as_deref(),
              kind_str.as_deref(),
              limit_val,
            ],
            evidence_from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEvidence::into_evidence).collect()
  }

  async fn delete_evidence(&self, evidence_id: Uuid, workspace_id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(evidence_id);
    let ws_str = encode_uuid(workspace_id);
    let deleted: bool = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM evidence WHERE evidence_id = ?1 AND workspace_id = ?2",
          rusqlite::params![id_str, ws_str],
        )?;
        Ok(n == 1)
      })
      .await?;
    Ok(deleted)
  }

  async fn mark_evidence_status(
    &self,
    evidence_ids: &[Uuid],
    status:       EvidenceStatus,
  ) -> Result<usize> {
    let ids: Vec<String> = evidence_ids.iter().copied().map(encode_uuid).collect();
    let status_str = status.as_str().to_owned();

    let changed: usize = self
      .conn
      .call(move |conn| {
        let mut changed = 0;
        for id in &ids {
          changed += conn.execute(
            "UPDATE evidence SET status = ?2 WHERE evidence_id = ?1",
            rusqlite::params![id, status_str],
          )?;
        }
        Ok(changed)
      })
      .await?;
    Ok(changed)
  }

  async fn complete_evidence(&self, evidence_id: Uuid, analyzed_content: &str) -> Result<()> {
    let id_str  = encode_uuid(evidence_id);
    let content = analyzed_content.to_string();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE evidence
           SET status = 'complete', analyzed_content = ?2
           WHERE evidence_id = ?1",
          rusqlite::params![id_str, content],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── SessionStore impl ───────────────────────────────────────────────────────

impl SessionStore for SqliteStore {
  type Error = Error;

  async fn create_session(
    &self,
    token_digest: &str,
    user_id:      Uuid,
    expires_at:   DateTime<Utc>,
  ) -> Result<()> {
    let digest  = token_digest.to_string();
    let user    = encode_uuid(user_id);
    let now_str = encode_dt(Utc::now());
    let exp_str = encode_dt(expires_at);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sessions (token_digest, user_id, created_at, expires_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![digest, user, now_str, exp_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_session(&self, token_digest: &str) -> Result<Option<Session>> {
    let digest = token_digest.to_string();
    let row: Option<(String, String, String)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, created_at, expires_at
               FROM sessions WHERE token_digest = ?1",
              rusqlite::params![digest],
              |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?,
        )
      })
      .await?;

    let Some((user_str, created_str, expires_str)) = row else {
      return Ok(None);
    };

    let session = Session {
      user_id:    crate::encode::decode_uuid(&user_str)?,
      created_at: crate::encode::decode_dt(&created_str)?,
      expires_at: crate::encode::decode_dt(&expires_str)?,
    };

    // Expired rows are treated as absent.
    if session.expires_at <= Utc::now() {
      return Ok(None);
    }
    Ok(Some(session))
  }

  async fn delete_session(&self, token_digest: &str) -> Result<()> {
    let digest = token_digest.to_string();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM sessions WHERE token_digest = ?1",
          rusqlite::params![digest],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
