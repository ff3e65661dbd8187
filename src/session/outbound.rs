//! Outbound messages and the per-connection delivery handle

use crate::state::{Agent, AgentId};
use serde::Serialize;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

/// Messages sent from the server to a connected agent
#[derive(Serialize, Debug, Clone)]
#[serde(tag = "type", content = "data")]
pub enum OutboundMessage {
    /// Agents currently inside the receiver's field of view
    #[serde(rename = "clients")]
    Clients(Vec<Agent>),
    /// Another agent sent the receiver a payment
    #[serde(rename = "receivedPayment")]
    ReceivedPayment(AgentId),
    /// A request from this connection was refused
    #[serde(rename = "error")]
    Error(String),
}

/// Handle used to deliver [`OutboundMessage`]s to one connection
///
/// Sending never blocks: messages are queued for the connection's writer task.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    tx: UnboundedSender<OutboundMessage>,
}

impl ConnectionHandle {
    /// Create a handle together with the receiving end drained by the writer
    pub fn channel() -> (Self, UnboundedReceiver<OutboundMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Queue a message for delivery
    /// Returns false if the connection has already gone away
    pub fn send(&self, message: OutboundMessage) -> bool {
        match self.tx.send(message) {
            Ok(()) => true,
            Err(_) => {
                debug!("Dropping outbound message for closed connection");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outbound_serialization() {
        let json = serde_json::to_value(OutboundMessage::ReceivedPayment("A".to_string())).unwrap();
        assert_eq!(json, serde_json::json!({"type": "receivedPayment", "data": "A"}));

        let json = serde_json::to_value(OutboundMessage::Clients(vec![])).unwrap();
        assert_eq!(json, serde_json::json!({"type": "clients", "data": []}));
    }

    #[tokio::test]
    async fn test_send_after_receiver_dropped() {
        let (handle, mut rx) = ConnectionHandle::channel();
        assert!(handle.send(OutboundMessage::Error("first".to_string())));
        assert!(matches!(rx.recv().await, Some(OutboundMessage::Error(_))));

        drop(rx);
        assert!(!handle.send(OutboundMessage::Error("second".to_string())));
    }
}
