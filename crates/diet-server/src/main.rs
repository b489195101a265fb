//! diet-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), applies
//! `DIET_*` environment overrides, opens the SQLite store and serves the
//! diet API over HTTP.
//!
//! # Granting the admin capability
//!
//! ```
//! cargo run -p diet-server -- --grant-admin 6f1c…
//! ```

mod config;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use diet_api::{AppState, api_router};
use diet_core::store::DietStore;
use diet_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::config::ServerConfig;

#[derive(Parser)]
#[command(author, version, about = "Diet tracking API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Set the admin capability on the identity with this id and exit.
  #[arg(long, value_name = "USER_ID")]
  grant_admin: Option<Uuid>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = ::config::Config::builder()
    .add_source(::config::File::from(cli.config).required(false))
    .add_source(::config::Environment::with_prefix("DIET").try_parsing(true))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // Helper mode: grant the admin capability and exit.
  if let Some(user_id) = cli.grant_admin {
    let found = store
      .set_admin(user_id, true)
      .await
      .context("failed to update identity")?;
    anyhow::ensure!(found, "no identity with id {user_id}");
    println!("granted admin to {user_id}");
    return Ok(());
  }

  let state = AppState::new(Arc::new(store), server_cfg.api_settings());
  let app = api_router(state).layer(TraceLayer::new_for_http());
  let address = server_cfg.address();

  tracing::info!(
    policy = ?server_cfg.ledger_policy(),
    admin_access = ?server_cfg.admin_access,
    "Listening on http://{address}",
  );
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  tracing::info!("shutting down");
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
