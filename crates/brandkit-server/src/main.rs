//! Brandkit server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), layered with
//! `BRANDKIT_`-prefixed environment variables, opens an in-process SQLite
//! store, and serves the JSON API over HTTP.
//!
//! # Password hash generation
//!
//! To generate an argon2 PHC string for seeding accounts:
//!
//! ```text
//! cargo run -p brandkit-server -- --hash-password
//! ```

mod analyzer;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use brandkit_api::{AppState, SessionKeys};
use brandkit_store_sqlite::SqliteStore;
use clap::Parser;
use rand_core::OsRng;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use analyzer::HttpAnalyzer;

// ─── Configuration ───────────────────────────────────────────────────────────

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }
fn default_analyzer_timeout() -> u64 { 10 }

/// Runtime server configuration, deserialised from `config.toml` and
/// `BRANDKIT_*` environment variables.
#[derive(Deserialize, Clone)]
struct ServerConfig {
  #[serde(default = "default_host")]
  host:                  String,
  #[serde(default = "default_port")]
  port:                  u16,
  store_path:            PathBuf,
  /// Key for the session-token digest. Required; the server refuses to
  /// start without it.
  session_secret:        String,
  analyzer_url:          String,
  analyzer_api_key:      Option<String>,
  #[serde(default = "default_analyzer_timeout")]
  analyzer_timeout_secs: u64,
}

// ─── CLI ─────────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(author, version, about = "Brandkit onboarding API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if cli.hash_password {
    let password = read_password_line()?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?
      .to_string();
    println!("{hash}");
    return Ok(());
  }

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("BRANDKIT"))
    .build()
    .context("failed to read config")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Startup checks; refusing to boot beats limping with broken auth.
  anyhow::ensure!(
    !server_cfg.session_secret.trim().is_empty(),
    "session_secret must be set"
  );
  anyhow::ensure!(
    !server_cfg.store_path.as_os_str().is_empty(),
    "store_path must be set"
  );

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let analyzer = HttpAnalyzer::new(
    server_cfg.analyzer_url.clone(),
    server_cfg.analyzer_api_key.clone(),
    Duration::from_secs(server_cfg.analyzer_timeout_secs),
  )
  .context("failed to build analyzer client")?;

  let state = AppState::new(
    Arc::new(store),
    Arc::new(analyzer),
    SessionKeys::new(server_cfg.session_secret.clone()),
  );

  let app = brandkit_api::router(state).layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read a password line from stdin.
fn read_password_line() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
