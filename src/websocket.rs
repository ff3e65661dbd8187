//! WebSocket handlers for live agent tracking
//!
//! Each connection gets a [`Session`] keyed by the peer's socket address.
//! Inbound JSON records are routed to the session by their `type`; outbound
//! messages queued on the connection handle are written by a dedicated task.
//! Supports ping/pong for connection keepalive.

use crate::error::AppError;
use crate::session::{ConnectionHandle, OutboundMessage, Session};
use crate::state::{AgentId, AppState};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        ConnectInfo, State, WebSocketUpgrade,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::Value;
use std::net::SocketAddr;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Inbound message types
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// Register the connection as an agent
    Handshake,
    /// New position report
    Position {
        /// Degrees, [-90, 90]
        latitude: f64,
        /// Degrees, [-180, 180]
        longitude: f64,
    },
    /// New heading report, degrees clockwise from north
    Heading(f64),
    /// Payment addressed to the given agent
    Payment(AgentId),
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

#[derive(Deserialize)]
struct PositionData {
    latitude: f64,
    longitude: f64,
}

impl InboundMessage {
    /// Parse a text frame
    ///
    /// Returns `Ok(None)` for message types this server does not handle.
    pub fn parse(text: &str) -> Result<Option<Self>, serde_json::Error> {
        let envelope: Envelope = serde_json::from_str(text)?;
        let message = match envelope.kind.as_str() {
            "handshake" => InboundMessage::Handshake,
            "position" => {
                let data: PositionData = serde_json::from_value(envelope.data)?;
                InboundMessage::Position {
                    latitude: data.latitude,
                    longitude: data.longitude,
                }
            }
            "heading" => InboundMessage::Heading(serde_json::from_value(envelope.data)?),
            "payment" => InboundMessage::Payment(serde_json::from_value(envelope.data)?),
            _ => return Ok(None),
        };
        Ok(Some(message))
    }
}

/// Route one inbound message to the matching session operation
pub fn dispatch(session: &mut Session, message: InboundMessage) -> Result<(), AppError> {
    match message {
        InboundMessage::Handshake => session.on_handshake(),
        InboundMessage::Position {
            latitude,
            longitude,
        } => session.on_position(latitude, longitude),
        InboundMessage::Heading(heading) => session.on_heading(heading),
        InboundMessage::Payment(recipient) => session.on_payment(&recipient),
    }
}

/// Parse and dispatch one text frame, reporting refused handshakes back to
/// the client. Failures never leave this session.
pub fn handle_text(session: &mut Session, text: &str) {
    let message = match InboundMessage::parse(text) {
        Ok(Some(message)) => message,
        Ok(None) => {
            debug!(agent_id = %session.id(), "Ignoring unrecognized message type");
            return;
        }
        Err(e) => {
            warn!(agent_id = %session.id(), error = %e, "Dropping malformed message");
            return;
        }
    };

    let is_handshake = message == InboundMessage::Handshake;
    if let Err(e) = dispatch(session, message) {
        warn!(agent_id = %session.id(), error = %e, "Message rejected");
        if is_handshake {
            session.connection().send(OutboundMessage::Error(e.to_string()));
        }
    }
}

/// WebSocket upgrade handler
///
/// The peer's socket address becomes the agent identifier.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(state): State<AppState>,
) -> Response {
    let id = addr.to_string();
    let span = info_span!("connection", agent_id = %id);
    ws.on_upgrade(move |socket| handle_socket(socket, id, state).instrument(span))
}

// Handle WebSocket connection
async fn handle_socket(socket: WebSocket, id: AgentId, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let (handle, mut rx) = ConnectionHandle::channel();
    let ping_interval = state.ping_interval;
    let mut session = Session::new(id, handle, state);

    info!("WebSocket client connected");

    // Task to write queued outbound messages and periodic pings
    let mut send_task = tokio::spawn(
        async move {
            let mut keepalive = tokio::time::interval_at(
                tokio::time::Instant::now() + ping_interval,
                ping_interval,
            );
            loop {
                let frame = tokio::select! {
                    outbound = rx.recv() => match outbound {
                        Some(outbound) => match serde_json::to_string(&outbound) {
                            Ok(text) => Message::Text(text),
                            Err(e) => {
                                error!("Failed to serialize outbound message: {}", e);
                                continue;
                            }
                        },
                        None => break,
                    },
                    _ = keepalive.tick() => Message::Ping(Vec::new()),
                };
                if let Err(e) = sender.send(frame).await {
                    error!("Failed to send message: {}", e);
                    break;
                }
            }
        }
        .in_current_span(),
    );

    // Receive messages; the session lives in this task so aborting it drops
    // the session and deregisters the agent
    let mut recv_task = tokio::spawn(
        async move {
            while let Some(msg) = receiver.next().await {
                match msg {
                    Ok(Message::Text(text)) => handle_text(&mut session, &text),
                    Ok(Message::Close(_)) => {
                        info!("WebSocket client disconnected");
                        session.on_close();
                        return;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        error!("WebSocket error: {}", e);
                        session.on_error();
                        return;
                    }
                }
            }
            session.on_close();
        }
        .in_current_span(),
    );

    // Wait for either task to complete
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    info!("WebSocket connection closed");
}
