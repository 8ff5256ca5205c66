//! nestlog server binary.
//!
//! Reads `nestlog.toml` (or the path given with `--config`), opens the SQLite
//! store, and serves the dashboard plus the JSON API over HTTP.
//!
//! # Seeding
//!
//! Logging requires a user. Create one and exit with:
//!
//! ```
//! cargo run -p nestlog-web --bin server -- --seed "Parent"
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use nestlog_core::store::ActivityStore;
use nestlog_store_sqlite::SqliteStore;
use nestlog_web::{AppState, ServerConfig};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "nestlog infant activity tracker")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "nestlog.toml")]
  config: PathBuf,

  /// Create the primary user if none exists, then exit.
  #[arg(long, value_name = "NAME", num_args = 0..=1, default_missing_value = "Parent")]
  seed: Option<String>,
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

  let mut server_cfg =
    ServerConfig::load(&cli.config).context("failed to load configuration")?;
  if let Ok(url) = std::env::var("DATABASE_URL") {
    server_cfg.apply_database_url(&url);
  }

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  if let Some(name) = cli.seed {
    return seed(&store, name).await;
  }

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  let state = AppState {
    store:  Arc::new(store),
    config: Arc::new(server_cfg),
  };
  let app = nestlog_web::router(state);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Idempotent: an existing primary user is left alone.
async fn seed(store: &SqliteStore, name: String) -> anyhow::Result<()> {
  if let Some(user) = store
    .get_primary_user()
    .await
    .context("failed to look up primary user")?
  {
    tracing::info!(user_id = %user.user_id, "primary user already exists");
    return Ok(());
  }

  let name = Some(name).filter(|n| !n.trim().is_empty());
  let user = store
    .add_user(name)
    .await
    .context("failed to create user")?;
  tracing::info!(user_id = %user.user_id, "created primary user");
  Ok(())
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
