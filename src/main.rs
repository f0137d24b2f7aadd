//! sql-bridge - coerce wire values from the command line
//!
//! Reads one JSON value per line from stdin, applies optimistic coercion
//! with the toggles from the environment, and prints one JSON object per
//! line: `{"kind": "...", "wire": ...}`.

use anyhow::{Context, Result};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sql_bridge::{convert_sql_value, optimistic_cast, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sql_bridge=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    info!(
        "Cast config: uuid={}, date={}, time={}, datetime={}",
        config.cast.cast_uuid, config.cast.cast_date, config.cast.cast_time, config.cast.cast_datetime
    );
    info!("Shared resource idle TTL: {:?}", config.idle_ttl());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut processed = 0usize;

    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        if line.trim().is_empty() {
            continue;
        }

        let raw: Value = match serde_json::from_str(&line) {
            Ok(value) => value,
            Err(e) => {
                warn!("Skipping malformed line {:?}: {}", line, e);
                continue;
            }
        };

        let bound = optimistic_cast(raw, &config.cast);
        let out = json!({
            "kind": bound.kind(),
            "wire": convert_sql_value(&bound),
        });

        stdout
            .write_all(format!("{out}\n").as_bytes())
            .await
            .context("writing stdout")?;
        processed += 1;
    }

    stdout.flush().await.context("flushing stdout")?;
    info!("Coerced {} values", processed);
    Ok(())
}
