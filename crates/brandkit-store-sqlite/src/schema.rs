//! SQL schema for the Brandkit SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id               TEXT PRIMARY KEY,
    email                 TEXT NOT NULL UNIQUE,  -- always lowercased
    password_hash         TEXT NOT NULL,         -- argon2 PHC string
    name                  TEXT NOT NULL,
    onboarding_completed  INTEGER NOT NULL DEFAULT 0,
    created_at            TEXT NOT NULL
);

-- Server-side sessions, keyed by the keyed SHA-256 digest of the token.
-- The raw token only ever lives in the client cookie.
CREATE TABLE IF NOT EXISTS sessions (
    token_digest TEXT PRIMARY KEY,
    user_id      TEXT NOT NULL REFERENCES users(user_id),
    created_at   TEXT NOT NULL,
    expires_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS workspaces (
    workspace_id    TEXT PRIMARY KEY,
    slug            TEXT NOT NULL UNIQUE,
    name            TEXT NOT NULL,
    owner_user_id   TEXT NOT NULL REFERENCES users(user_id),
    status          TEXT NOT NULL DEFAULT 'not_started',
    onboarding_step INTEGER NOT NULL DEFAULT 1,
    ai_thread_id    TEXT,
    last_active_at  TEXT NOT NULL,
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL
);

-- One brain per workspace. workspace_id is the single natural key;
-- brand_slug is a denormalised, deliberately non-unique lookup column.
CREATE TABLE IF NOT EXISTS brains (
    workspace_id        TEXT PRIMARY KEY REFERENCES workspaces(workspace_id),
    brand_slug          TEXT NOT NULL,
    summary             TEXT,
    audience            TEXT,
    tone                TEXT,
    pillars             TEXT NOT NULL DEFAULT '[]',  -- JSON array of strings
    offers              TEXT,
    competitors         TEXT NOT NULL DEFAULT '[]',
    channels            TEXT NOT NULL DEFAULT '[]',
    recommendations     TEXT NOT NULL DEFAULT '[]',
    status              TEXT NOT NULL DEFAULT 'not_started',
    onboarding_step     INTEGER NOT NULL DEFAULT 1,
    is_activated        INTEGER NOT NULL DEFAULT 0,
    analysis_method     TEXT,                        -- 'ai' | 'placeholder'
    analysis_started_at TEXT,
    last_analyzed_at    TEXT,
    last_error          TEXT,
    created_at          TEXT NOT NULL,
    updated_at          TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS evidence (
    evidence_id      TEXT PRIMARY KEY,
    workspace_id     TEXT NOT NULL REFERENCES workspaces(workspace_id),
    brand_slug       TEXT NOT NULL,
    kind             TEXT NOT NULL,
    value            TEXT NOT NULL,
    status           TEXT NOT NULL DEFAULT 'pending',
    analyzed_content TEXT,
    metadata         TEXT NOT NULL DEFAULT '{}',
    created_at       TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS workspaces_owner_idx   ON workspaces(owner_user_id);
CREATE INDEX IF NOT EXISTS brains_slug_idx        ON brains(brand_slug);
CREATE INDEX IF NOT EXISTS evidence_workspace_idx ON evidence(workspace_id);
CREATE INDEX IF NOT EXISTS evidence_status_idx    ON evidence(status);
CREATE INDEX IF NOT EXISTS sessions_user_idx      ON sessions(user_id);

PRAGMA user_version = 1;
";
