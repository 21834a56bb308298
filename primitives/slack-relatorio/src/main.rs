//! Slack Relatorio - Daily Balance Report Relay
//!
//! Serves the two request URLs of a Slack app:
//!
//! - `POST /slack/relatorio` - slash command, opens the report modal
//! - `POST /slack/interativo` - interactivity, receives the submitted modal
//!   and posts the report to the incoming webhook
//!
//! # Usage
//!
//! ```bash
//! # Token and webhook from the environment (or a .env file)
//! SLACK_BOT_TOKEN=xoxb-... SLACK_WEBHOOK_URL=https://hooks.slack.com/... slack-relatorio
//!
//! # Custom port, cash counted in the opening balance
//! slack-relatorio --port 8080 --opening-balance-fields especie,santander,itau,cora
//!
//! # JSON logs
//! RUST_LOG=slack_relatorio=debug slack-relatorio --log-json
//! ```

use anyhow::Context;
use clap::Parser;
use slack_relatorio::{
    config::Args,
    server::{AppState, router},
};
use std::sync::Arc;
use tokio::signal::unix::{SignalKind, signal};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "slack_relatorio=info";

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let args = Args::parse();
    init_tracing(args.log_json);

    let addr = args.listen_addr()?;
    let opening = args.opening_policy()?;
    let slack = args.slack_client()?;

    tracing::info!(
        opening_balance = %opening,
        webhook = %slack.webhook_display(),
        api_base = %args.slack_api_base,
        "configuration loaded"
    );

    let app = router(Arc::new(AppState::new(slack, opening)));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    // Set up SIGTERM handler for graceful shutdown
    let mut sigterm = signal(SignalKind::terminate())?;

    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = sigterm.recv() => {}
                _ = tokio::signal::ctrl_c() => {}
            }
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}
