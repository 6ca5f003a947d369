use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

// The terminal belongs to the panel renderer, so log lines go to a file.
// RUST_LOG overrides the configured filter.
pub fn setup(log_file: &Path, default_filter: &str) -> anyhow::Result<()> {
    let directives = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_owned());
    let file = File::create(log_file)
        .with_context(|| format!("creating log file {}", log_file.display()))?;

    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .with_env_filter(EnvFilter::builder().parse_lossy(directives))
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing log subscriber: {e}"))
}
