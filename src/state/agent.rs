// Agent record
// Latest known state of one tracked agent

use crate::geo::Position;
use crate::session::ConnectionHandle;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Unique identifier for an agent (connection-scoped)
pub type AgentId = String;

/// Agent structure
/// Position and heading are unset until the agent first reports them
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    /// Identifier derived from the agent's connection
    pub id: AgentId,
    /// Latitude and longitude, always set together
    #[serde(flatten)]
    pub position: Option<Position>,
    /// Compass heading in degrees, [0, 360)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
    /// Time of the last mutation
    pub updated_at: DateTime<Utc>,
    /// Outbound channel of the owning session; landmarks have none
    #[serde(skip)]
    pub connection: Option<ConnectionHandle>,
}

impl Agent {
    /// Create a connected agent with no position or heading
    pub fn new(id: AgentId, connection: ConnectionHandle) -> Self {
        Self {
            id,
            position: None,
            heading: None,
            updated_at: Utc::now(),
            connection: Some(connection),
        }
    }

    /// Create a fixed, connectionless agent at `position`
    pub fn landmark(id: AgentId, position: Position) -> Self {
        Self {
            id,
            position: Some(position),
            heading: None,
            updated_at: Utc::now(),
            connection: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_agent_is_unlocated() {
        let (handle, _rx) = ConnectionHandle::channel();
        let agent = Agent::new("10.0.0.1:5000".to_string(), handle);

        assert!(agent.position.is_none());
        assert!(agent.heading.is_none());
        assert!(agent.connection.is_some());
    }

    #[test]
    fn test_serialization_flattens_position() {
        let position = Position::new(51.5, 4.5).unwrap();
        let mut agent = Agent::landmark("Noorden".to_string(), position);

        let json = serde_json::to_value(&agent).unwrap();
        assert_eq!(json["id"], "Noorden");
        assert_eq!(json["latitude"], 51.5);
        assert_eq!(json["longitude"], 4.5);
        assert!(json.get("heading").is_none());
        assert!(json.get("connection").is_none());
        assert!(json["updatedAt"].is_string());

        agent.heading = Some(90.0);
        let json = serde_json::to_value(&agent).unwrap();
        assert_eq!(json["heading"], 90.0);
    }

    #[test]
    fn test_unlocated_agent_omits_coordinates() {
        let (handle, _rx) = ConnectionHandle::channel();
        let json = serde_json::to_value(Agent::new("a".to_string(), handle)).unwrap();
        assert!(json.get("latitude").is_none());
    }
}
