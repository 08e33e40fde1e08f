//! `feedback` — translation feedback collection server.
//!
//! Reads `config.toml` (or the path given with `--config`), then either serves
//! the HTTP API or runs a one-off maintenance command against the store.
//!
//! ```text
//! feedback serve --reset        # fresh schema + example data, then serve
//! feedback add-targets new.json # append targets from a JSON array
//! feedback dump                 # print every table as JSON
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use feedback_core::{
  seed::SeedOptions,
  store::{EvaluationStore, SchemaDropper, SchemaInitializer},
};
use feedback_server::ServerConfig;
use feedback_store_sqlite::SqliteStore;
use serde::{Serialize, de::DeserializeOwned};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Translation feedback collection server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the HTTP API (the default).
  Serve {
    /// Recreate the schema and load the example data before serving.
    #[arg(long)]
    reset: bool,
  },
  /// Drop and recreate all tables, indexes and triggers.
  Init,
  /// Load the configured example data file.
  Seed {
    #[arg(long)]
    no_translations: bool,
    #[arg(long)]
    no_rankings: bool,
  },
  /// Append targets from a JSON array of `{target, context1, context2}`.
  AddTargets { file: PathBuf },
  /// Append translations from a JSON array of `{targetId, translation, model}`.
  AddTranslations { file: PathBuf },
  /// Drop all tables.
  #[command(name = "drop")]
  DropTables,
  /// Delete all rows, keeping the schema.
  Clear,
  /// Print every table as JSON.
  Dump,
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

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;
  tracing::debug!(?server_cfg, "configuration loaded");

  let store = SqliteStore::new(server_cfg.database.clone());

  match cli.command.unwrap_or(Command::Serve { reset: false }) {
    Command::Serve { reset } => {
      if reset {
        reset_store(&store).await?;
      }
      serve(store, &server_cfg).await?;
    }
    Command::Init => {
      store
        .initialize_schema()
        .await
        .context("failed to initialize schema")?;
    }
    Command::Seed { no_translations, no_rankings } => {
      let options = SeedOptions {
        include_translations: !no_translations,
        include_rankings:     !no_rankings,
      };
      load_example(&store, options).await?;
    }
    Command::AddTargets { file } => {
      let added = store
        .add_targets(read_json(&file).await?)
        .await
        .context("failed to add targets")?;
      print_json(&added)?;
    }
    Command::AddTranslations { file } => {
      let added = store
        .add_translations(read_json(&file).await?)
        .await
        .context("failed to add translations")?;
      print_json(&added)?;
    }
    Command::DropTables => {
      store.drop_all_tables().await.context("failed to drop tables")?;
    }
    Command::Clear => {
      store.clear_all_tables().await.context("failed to clear tables")?;
    }
    Command::Dump => {
      let snapshot = store.snapshot().await.context("failed to read tables")?;
      print_json(&snapshot)?;
    }
  }

  Ok(())
}

async fn serve(store: SqliteStore, server_cfg: &ServerConfig) -> anyhow::Result<()> {
  let app = feedback_server::app(Arc::new(store), server_cfg)
    .context("invalid CORS origin in configuration")?;
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Fresh schema plus the example data, as a development server expects.
async fn reset_store(store: &SqliteStore) -> anyhow::Result<()> {
  store
    .initialize_schema()
    .await
    .context("failed to initialize schema")?;
  load_example(store, SeedOptions::default()).await
}

async fn load_example(store: &SqliteStore, options: SeedOptions) -> anyhow::Result<()> {
  store
    .load_seed_file(options)
    .await
    .with_context(|| format!("failed to load example data from {:?}", store.config().example))
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
  let bytes = tokio::fs::read(path)
    .await
    .with_context(|| format!("failed to read {path:?}"))?;
  serde_json::from_slice(&bytes).with_context(|| format!("failed to parse {path:?}"))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}
