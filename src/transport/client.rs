//! WebSocket client using tokio-tungstenite.
//!
//! The socket is split into a reader task and a writer task. The reader
//! decodes frames and forwards [`InboundEvent`]s; the writer encodes
//! [`OutboundEvent`]s. Socket.IO control replies (namespace join, pong)
//! travel from reader to writer on a private channel. Neither task touches
//! the document.
//!
//! With Socket.IO the server drops events from a client that has not
//! joined the namespace, so the writer holds emissions back until the
//! reader has seen the join acknowledged, then sends them in order.

use std::collections::VecDeque;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{WebSocketStream, connect_async};

use crate::error::BridgeError;
use crate::protocol::codec::{self, Frame, WireFormat};
use crate::protocol::{InboundEvent, OutboundEvent};

/// Live connection to the backend.
#[derive(Debug)]
pub struct Connection {
    /// Decoded inbound events, in receipt order.
    pub inbound: mpsc::Receiver<InboundEvent>,
    /// Outbound events to encode and send.
    pub outbound: mpsc::Sender<OutboundEvent>,
    reader: JoinHandle<Result<(), BridgeError>>,
    writer: JoinHandle<Result<(), BridgeError>>,
}

impl Connection {
    /// Stops sending, waits for both socket tasks and reports the first
    /// transport error either of them hit.
    ///
    /// # Errors
    ///
    /// Returns the reader's or writer's [`BridgeError`], or
    /// [`BridgeError::Transport`] if a task panicked.
    pub async fn shutdown(self) -> Result<(), BridgeError> {
        let Self {
            inbound,
            outbound,
            reader,
            writer,
        } = self;
        drop(outbound);
        let written = join(writer).await;
        drop(inbound);
        reader.abort();
        let read = match reader.await {
            Ok(result) => result,
            Err(err) if err.is_cancelled() => Ok(()),
            Err(err) => Err(BridgeError::Transport(err.to_string())),
        };
        read.and(written)
    }
}

#[cfg(test)]
impl Connection {
    pub(crate) fn from_parts(
        inbound: mpsc::Receiver<InboundEvent>,
        outbound: mpsc::Sender<OutboundEvent>,
        reader: JoinHandle<Result<(), BridgeError>>,
        writer: JoinHandle<Result<(), BridgeError>>,
    ) -> Self {
        Self {
            inbound,
            outbound,
            reader,
            writer,
        }
    }
}

async fn join(handle: JoinHandle<Result<(), BridgeError>>) -> Result<(), BridgeError> {
    handle
        .await
        .map_err(|err| BridgeError::Transport(err.to_string()))?
}

/// Opens a WebSocket to `url` and starts the socket tasks.
///
/// # Errors
///
/// Returns [`BridgeError::Transport`] if the handshake fails.
pub async fn connect(
    url: &str,
    format: WireFormat,
    capacity: usize,
) -> Result<Connection, BridgeError> {
    let (ws, response) = connect_async(url).await?;
    tracing::info!(url, status = %response.status(), %format, "connected");
    Ok(spawn(ws, format, capacity))
}

/// Reader-to-writer signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    /// Packet to send as-is.
    Reply(&'static str),
    /// The namespace join was acknowledged; emissions may go out.
    Joined,
}

/// Starts the reader and writer tasks over an established socket.
pub fn spawn<S>(ws: WebSocketStream<S>, format: WireFormat, capacity: usize) -> Connection
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let capacity = capacity.max(1);
    let (sink, stream) = ws.split();
    let (inbound_tx, inbound) = mpsc::channel(capacity);
    let (outbound, outbound_rx) = mpsc::channel(capacity);
    let (control_tx, control_rx) = mpsc::channel(capacity);

    let reader = tokio::spawn(read_loop(stream, format, inbound_tx, control_tx));
    let writer = tokio::spawn(write_loop(sink, format, outbound_rx, control_rx));

    Connection {
        inbound,
        outbound,
        reader,
        writer,
    }
}

async fn read_loop<R>(
    mut stream: R,
    format: WireFormat,
    inbound: mpsc::Sender<InboundEvent>,
    control: mpsc::Sender<Control>,
) -> Result<(), BridgeError>
where
    R: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    while let Some(msg) = stream.next().await {
        let text = match msg? {
            Message::Text(text) => text,
            Message::Close(frame) => {
                tracing::info!(?frame, "server closed connection");
                break;
            }
            _ => continue,
        };

        match codec::decode(text.as_str(), format) {
            Ok(Frame::Event(event)) => {
                if inbound.send(event).await.is_err() {
                    break;
                }
            }
            Ok(Frame::Disconnect) => {
                tracing::info!("server ended the session");
                break;
            }
            Ok(Frame::Connected) => {
                tracing::info!("namespace joined");
                if control.send(Control::Joined).await.is_err() {
                    break;
                }
            }
            Ok(frame) => {
                if let Some(reply) = frame.reply()
                    && control.send(Control::Reply(reply)).await.is_err()
                {
                    break;
                }
                tracing::trace!(?frame, "control frame");
            }
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                tracing::warn!(code = err.error_code(), error = %err, "dropping frame");
            }
        }
    }
    Ok(())
}

async fn write_loop<W>(
    mut sink: W,
    format: WireFormat,
    mut outbound: mpsc::Receiver<OutboundEvent>,
    mut control: mpsc::Receiver<Control>,
) -> Result<(), BridgeError>
where
    W: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    let mut joined = format == WireFormat::Envelope;
    let mut held: VecDeque<OutboundEvent> = VecDeque::new();
    loop {
        tokio::select! {
            Some(signal) = control.recv() => match signal {
                Control::Reply(reply) => {
                    sink.send(Message::text(reply.to_string())).await?;
                }
                Control::Joined => {
                    joined = true;
                    if !held.is_empty() {
                        tracing::debug!(count = held.len(), "sending held emissions");
                    }
                    while let Some(event) = held.pop_front() {
                        send_event(&mut sink, &event, format).await?;
                    }
                }
            },
            event = outbound.recv() => {
                let Some(event) = event else {
                    break;
                };
                if joined {
                    send_event(&mut sink, &event, format).await?;
                } else {
                    held.push_back(event);
                }
            }
        }
    }
    if !held.is_empty() {
        tracing::warn!(count = held.len(), "namespace never joined, emissions dropped");
    }
    if let Err(err) = sink.close().await {
        tracing::debug!(error = %err, "close after peer hung up");
    }
    Ok(())
}

async fn send_event<W>(
    sink: &mut W,
    event: &OutboundEvent,
    format: WireFormat,
) -> Result<(), BridgeError>
where
    W: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    match codec::encode(event, format) {
        Ok(text) => sink.send(Message::text(text)).await?,
        Err(err) => {
            tracing::error!(event = event.name(), error = %err, "failed to encode");
        }
    }
    Ok(())
}
