//! Line-oriented front end for the IOU ledger
//!
//! Reads `METHOD PATH [JSON]` requests from stdin, one per line, and
//! writes one JSON response per line to stdout. Logs go to stderr.

use anyhow::Context;
use iou_gateway::{Config, Request, RestApi};
use iou_settlement::SettlementEngine;
use std::io::{self, BufRead, Write};

fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&config.log_filter)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    tracing::info!("Starting IOU gateway");

    let mut api = match &config.seed_path {
        Some(path) => {
            let database = std::fs::read_to_string(path)
                .with_context(|| format!("reading seed database {}", path.display()))?;
            RestApi::from_database_json(config.settlement.clone(), &database)?
        }
        None => RestApi::new(SettlementEngine::new(config.settlement.clone())?),
    };
    tracing::info!(users = api.engine().store().len(), "Ledger loaded");

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line.context("reading request")?;
        if line.trim().is_empty() {
            continue;
        }

        let response = Request::parse(&line).and_then(|request| api.handle(&request));
        let body = response.unwrap_or_else(|err| {
            tracing::warn!(status = err.status_code(), error = %err, "Request failed");
            err.to_body()
        });

        writeln!(stdout, "{}", body)?;
        stdout.flush()?;
    }

    tracing::info!("Shutting down IOU gateway");
    Ok(())
}
