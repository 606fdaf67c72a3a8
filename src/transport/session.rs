//! The bridge's event loop.
//!
//! One task owns the [`Bridge`] and takes one event at a time, either a UI
//! event from the front-end or an inbound event from the socket reader,
//! handling it to completion before taking the next. After each event the
//! queued emissions go to the socket writer and the recorded mutations go
//! to the [`UpdateBus`].

use tokio::sync::mpsc;

use super::client::Connection;
use crate::bridge::{Bridge, DomEvent};
use crate::dom::UpdateBus;
use crate::error::BridgeError;

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The front-end closed its event channel.
    UiClosed,
    /// The socket reader finished.
    TransportClosed,
}

/// Runs the bridge until the front-end or the transport goes away, then
/// shuts the connection down and hands the bridge back.
///
/// # Errors
///
/// Returns the transport error that ended the connection, or
/// [`BridgeError::ChannelClosed`] if the socket writer went away without
/// reporting one.
pub async fn run(
    mut bridge: Bridge,
    mut ui_events: mpsc::Receiver<DomEvent>,
    mut connection: Connection,
    updates: UpdateBus,
) -> Result<(Bridge, StopReason), BridgeError> {
    let mut writer_lost = false;
    let reason = loop {
        tokio::select! {
            ui = ui_events.recv() => {
                let Some(event) = ui else {
                    break StopReason::UiClosed;
                };
                match bridge.handle_dom_event(&event) {
                    Ok(report) => tracing::debug!(
                        kind = event.kind().name(),
                        element = event.target(),
                        handled = report.handled,
                        failed = report.failed,
                        "ui event"
                    ),
                    Err(err) => tracing::warn!(error = %err, "ui event dropped"),
                }
                for outbound in bridge.drain_outbound() {
                    if connection.outbound.send(outbound).await.is_err() {
                        writer_lost = true;
                        break;
                    }
                }
                if writer_lost {
                    tracing::warn!("socket writer is gone");
                    break StopReason::TransportClosed;
                }
            }
            inbound = connection.inbound.recv() => {
                let Some(event) = inbound else {
                    break StopReason::TransportClosed;
                };
                let report = bridge.handle_inbound(&event);
                tracing::debug!(
                    kind = %event.kind(),
                    handled = report.handled,
                    failed = report.failed,
                    "inbound event"
                );
            }
        }
        updates.publish_all(bridge.take_mutations());
    };

    tracing::info!(?reason, "bridge loop stopped");
    connection.shutdown().await?;
    if writer_lost {
        return Err(BridgeError::ChannelClosed);
    }
    Ok((bridge, reason))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::app_state::build_bridge;
    use crate::config::Profile;
    use crate::frontend::parse_line;

    async fn submit_hi(ui_tx: &mpsc::Sender<DomEvent>) {
        let Ok(events) = parse_line(Profile::Chat, "hi") else {
            panic!("parse failed");
        };
        for event in events {
            assert!(ui_tx.send(event).await.is_ok());
        }
    }

    fn chat_bridge() -> Bridge {
        let Ok(bridge) = build_bridge(Profile::Chat) else {
            panic!("chat bridge failed to build");
        };
        bridge
    }

    #[tokio::test]
    async fn dead_writer_surfaces_its_own_error() {
        let (inbound_tx, inbound) = mpsc::channel(1);
        let (outbound, outbound_rx) = mpsc::channel(1);
        drop(outbound_rx);
        let reader = tokio::spawn(async move {
            let _open = inbound_tx;
            std::future::pending::<Result<(), BridgeError>>().await
        });
        let writer = tokio::spawn(async { Err(BridgeError::Transport("connection reset".into())) });
        let connection = Connection::from_parts(inbound, outbound, reader, writer);

        let (ui_tx, ui_rx) = mpsc::channel(4);
        submit_hi(&ui_tx).await;
        let result = run(chat_bridge(), ui_rx, connection, UpdateBus::new(16)).await;
        assert!(matches!(
            result,
            Err(BridgeError::Transport(msg)) if msg == "connection reset"
        ));
    }

    #[tokio::test]
    async fn writer_gone_without_error_is_channel_closed() {
        let (inbound_tx, inbound) = mpsc::channel(1);
        let (outbound, outbound_rx) = mpsc::channel(1);
        drop(outbound_rx);
        let reader = tokio::spawn(async move {
            let _open = inbound_tx;
            std::future::pending::<Result<(), BridgeError>>().await
        });
        let writer = tokio::spawn(async { Ok(()) });
        let connection = Connection::from_parts(inbound, outbound, reader, writer);

        let (ui_tx, ui_rx) = mpsc::channel(4);
        submit_hi(&ui_tx).await;
        let result = run(chat_bridge(), ui_rx, connection, UpdateBus::new(16)).await;
        assert!(matches!(result, Err(BridgeError::ChannelClosed)));
    }
}
