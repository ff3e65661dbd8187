//! Per-connection session lifecycle
//!
//! A [`Session`] is owned by the task reading one connection. It registers the
//! agent on handshake, applies position and heading updates in arrival order,
//! triggers FOV evaluation once both are known, relays payments, and removes
//! the agent again when the connection ends.

pub mod outbound;

pub use outbound::{ConnectionHandle, OutboundMessage};

use crate::error::AppError;
use crate::state::{Agent, AgentId, AppState};
use tracing::{debug, info, warn};

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Connection open, handshake not yet completed
    Connecting,
    /// Agent registered and accepting updates
    Active,
    /// Connection finished; terminal
    Closed,
}

/// State and operations for one connected agent
#[derive(Debug)]
pub struct Session {
    id: AgentId,
    connection: ConnectionHandle,
    app: AppState,
    state: SessionState,
}

impl Session {
    /// Create a session for the connection identified by `id`
    pub fn new(id: AgentId, connection: ConnectionHandle, app: AppState) -> Self {
        Self {
            id,
            connection,
            app,
            state: SessionState::Connecting,
        }
    }

    /// Identifier of the connected agent
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Outbound handle of this connection
    pub fn connection(&self) -> &ConnectionHandle {
        &self.connection
    }

    /// Register the agent and move to `Active`
    ///
    /// Fails with `DuplicateIdentifier` when this session already completed a
    /// handshake or another live session holds the same identifier.
    pub fn on_handshake(&mut self) -> Result<(), AppError> {
        match self.state {
            SessionState::Connecting => {}
            SessionState::Active => return Err(AppError::DuplicateIdentifier(self.id.clone())),
            SessionState::Closed => return Err(AppError::SessionNotActive(self.id.clone())),
        }

        self.app.registry.create(self.id.clone(), self.connection.clone())?;
        self.state = SessionState::Active;
        info!(agent_id = %self.id, "Handshake completed");
        Ok(())
    }

    /// Apply a position report; evaluates the FOV if the heading is known
    pub fn on_position(&mut self, latitude: f64, longitude: f64) -> Result<(), AppError> {
        self.ensure_active()?;
        let agent = self.app.registry.update_position(&self.id, latitude, longitude)?;
        debug!(agent_id = %self.id, latitude, longitude, "Position updated");

        if agent.heading.is_some() {
            self.publish_fov(&agent);
        }
        Ok(())
    }

    /// Apply a heading report; evaluates the FOV if the position is known
    pub fn on_heading(&mut self, heading: f64) -> Result<(), AppError> {
        self.ensure_active()?;
        let agent = self.app.registry.update_heading(&self.id, heading)?;
        debug!(agent_id = %self.id, heading, "Heading updated");

        if agent.position.is_some() {
            self.publish_fov(&agent);
        }
        Ok(())
    }

    /// Notify `recipient` that this agent paid them
    pub fn on_payment(&mut self, recipient: &str) -> Result<(), AppError> {
        self.ensure_active()?;
        let payee = self.app.registry.get(recipient).map_err(|e| match e {
            AppError::AgentNotFound(id) => AppError::RecipientNotFound(id),
            other => other,
        })?;

        if let Ok(payer) = self.app.registry.get(&self.id) {
            info!(
                agent_id = %self.id,
                recipient = %recipient,
                latitude = ?payer.position.map(|p| p.latitude()),
                longitude = ?payer.position.map(|p| p.longitude()),
                heading = ?payer.heading,
                "Payment made"
            );
        }

        match payee.connection {
            Some(connection) => {
                connection.send(OutboundMessage::ReceivedPayment(self.id.clone()));
            }
            None => {
                warn!(recipient = %recipient, "Payment recipient has no connection; not delivered");
            }
        }
        Ok(())
    }

    /// Connection closed normally
    pub fn on_close(&mut self) {
        self.finish("closed");
    }

    /// Connection failed
    pub fn on_error(&mut self) {
        self.finish("errored");
    }

    // Only a session that registered the identifier may remove it, so a
    // refused duplicate cannot evict the live owner.
    fn finish(&mut self, reason: &str) {
        let previous = std::mem::replace(&mut self.state, SessionState::Closed);
        if previous == SessionState::Active {
            self.app.registry.remove(&self.id);
            info!(agent_id = %self.id, reason, "Session ended");
        }
    }

    fn ensure_active(&self) -> Result<(), AppError> {
        if self.state == SessionState::Active {
            Ok(())
        } else {
            Err(AppError::SessionNotActive(self.id.clone()))
        }
    }

    fn publish_fov(&self, agent: &Agent) {
        let visible = self.app.engine.evaluate(agent);
        self.connection.send(OutboundMessage::Clients(visible));
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.finish("dropped");
    }
}
