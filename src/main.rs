//! realtime-bridge terminal front-end.
//!
//! Connects to the configured backend, builds the page for the configured
//! profile, feeds stdin lines to the bridge as UI events and prints every
//! document update.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, mpsc};
use tracing_subscriber::EnvFilter;

use realtime_bridge::app_state::AppState;
use realtime_bridge::config::{BridgeConfig, LogFormat};
use realtime_bridge::frontend;
use realtime_bridge::transport;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = BridgeConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }

    tracing::info!(
        url = %config.url,
        profile = %config.profile,
        wire_format = %config.wire_format,
        "starting realtime-bridge"
    );

    let state = AppState::new(config);
    let bridge = state.build_bridge()?;
    let connection = transport::connect(
        &state.config.url,
        state.config.wire_format,
        state.config.channel_capacity,
    )
    .await?;

    // Renderer
    let mut updates = state.update_bus.subscribe();
    tokio::spawn(async move {
        loop {
            match updates.recv().await {
                Ok(update) => println!("{update}"),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(lagged = n, "renderer lagged behind update bus");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // Input
    let (ui_tx, ui_rx) = mpsc::channel(state.config.channel_capacity);
    let profile = state.config.profile;
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let events = match frontend::parse_line(profile, &line) {
                Ok(events) => events,
                Err(err) => {
                    eprintln!("{err}");
                    continue;
                }
            };
            for event in events {
                if ui_tx.send(event).await.is_err() {
                    return;
                }
            }
        }
    });

    let (_bridge, reason) = transport::run(bridge, ui_rx, connection, state.update_bus).await?;
    tracing::info!(?reason, "realtime-bridge stopped");

    Ok(())
}
