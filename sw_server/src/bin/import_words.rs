//! Dictionary import tool.
//!
//! Reads a newline-separated word list, keeps the 5-letter lowercase
//! entries, and bulk-inserts them into the dictionary, skipping words that
//! are already present.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Error};
use pico_args::Arguments;
use secret_word::db::{Database, DatabaseConfig, GameRepository, PgGameRepository};
use sw_server::logging;

const HELP: &str = "\
Import dictionary words from a file

USAGE:
  import_words --file PATH [OPTIONS]

OPTIONS:
  --file       PATH        Newline-separated word list to import
  --db-url     URL         Database connection string  [default: env DATABASE_URL or postgres://postgres@localhost/secret_word_db]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  DATABASE_URL             PostgreSQL connection string
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let file: PathBuf = pargs.value_from_str("--file")?;
    let database_url_override: Option<String> = pargs.opt_value_from_str("--db-url")?;

    logging::init();

    // The importer only needs the database section of the configuration.
    let database = DatabaseConfig {
        database_url: database_url_override
            .or_else(|| std::env::var("DATABASE_URL").ok())
            .unwrap_or_else(|| "postgres://postgres@localhost/secret_word_db".to_string()),
        ..DatabaseConfig::development()
    };

    let contents = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read word list from {}", file.display()))?;

    let words: Vec<String> = contents
        .lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|word| word.chars().count() == 5 && word.chars().all(char::is_alphabetic))
        .collect();

    if words.is_empty() {
        tracing::warn!("No 5-letter words found in {}", file.display());
        return Ok(());
    }
    tracing::info!("Read {} candidate words from {}", words.len(), file.display());

    let db = Database::new(&database)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;

    let repository = PgGameRepository::new(Arc::new(db.pool().clone()));
    let inserted = repository
        .save_words(&words)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to save words: {}", e))?;

    tracing::info!(
        "Successfully imported {} new words ({} duplicates skipped)",
        inserted,
        words.len() as u64 - inserted
    );

    db.close().await;
    Ok(())
}
