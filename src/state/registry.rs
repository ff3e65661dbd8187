//! Agent registry
//!
//! The only shared mutable resource of the service. The map itself sits behind
//! a `RwLock` that is write-locked only to insert or remove entries; each agent
//! record has its own `Mutex`, so updates to different agents proceed in
//! parallel while updates to the same agent are serialized.
//!
//! Inserting or removing an entry takes the map write lock for one hash-map
//! operation, so a handshake or disconnect briefly holds off updates to every
//! other agent. No record lock is ever taken while holding the write lock.

use super::agent::{Agent, AgentId};
use crate::error::AppError;
use crate::geo::{validate_heading, Position};
use crate::session::ConnectionHandle;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

type Record = Arc<Mutex<Agent>>;

/// Concurrency-safe table of tracked agents
#[derive(Debug, Default)]
pub struct AgentRegistry {
    agents: RwLock<HashMap<AgentId, Record>>,
}

impl AgentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connected agent with no position or heading
    /// Fails with `DuplicateIdentifier` if `id` is already present
    pub fn create(&self, id: AgentId, connection: ConnectionHandle) -> Result<Agent, AppError> {
        self.insert(Agent::new(id, connection))
    }

    /// Register a fixed, connectionless agent
    pub fn insert_landmark(&self, id: AgentId, position: Position) -> Result<Agent, AppError> {
        self.insert(Agent::landmark(id, position))
    }

    fn insert(&self, agent: Agent) -> Result<Agent, AppError> {
        let mut agents = self.write_map();
        if agents.contains_key(&agent.id) {
            return Err(AppError::DuplicateIdentifier(agent.id));
        }
        agents.insert(agent.id.clone(), Arc::new(Mutex::new(agent.clone())));
        debug!(agent_id = %agent.id, "Agent registered");
        Ok(agent)
    }

    /// Get a copy of an agent's current state
    pub fn get(&self, id: &str) -> Result<Agent, AppError> {
        let agents = self.read_map();
        let record = agents
            .get(id)
            .ok_or_else(|| AppError::AgentNotFound(id.to_string()))?;
        let agent = lock(record).clone();
        Ok(agent)
    }

    /// Replace both coordinates of an agent in one step
    ///
    /// The coordinates are validated before the record is touched, so a
    /// rejected update leaves the previous position in place.
    pub fn update_position(&self, id: &str, latitude: f64, longitude: f64) -> Result<Agent, AppError> {
        let position = Position::new(latitude, longitude)?;
        self.modify(id, |agent| agent.position = Some(position))
    }

    /// Replace an agent's heading
    pub fn update_heading(&self, id: &str, heading: f64) -> Result<Agent, AppError> {
        let heading = validate_heading(heading)?;
        self.modify(id, |agent| agent.heading = Some(heading))
    }

    // The map read guard is held for the duration of the update so a
    // concurrent remove cannot detach the record mid-write.
    fn modify<F>(&self, id: &str, apply: F) -> Result<Agent, AppError>
    where
        F: FnOnce(&mut Agent),
    {
        let agents = self.read_map();
        let record = agents
            .get(id)
            .ok_or_else(|| AppError::AgentNotFound(id.to_string()))?;

        let mut agent = lock(record);
        apply(&mut *agent);
        agent.updated_at = Utc::now();
        let updated = agent.clone();
        Ok(updated)
    }

    /// Remove an agent; removing an absent identifier is a no-op
    /// Returns true if an entry was removed
    pub fn remove(&self, id: &str) -> bool {
        let removed = self.write_map().remove(id).is_some();
        if removed {
            debug!(agent_id = %id, "Agent removed");
        }
        removed
    }

    /// Consistent copy of every agent except `id`, sorted by identifier
    pub fn snapshot_others(&self, id: &str) -> Vec<Agent> {
        self.collect(|agent_id| agent_id != id)
    }

    /// Consistent copy of every agent, sorted by identifier
    pub fn snapshot(&self) -> Vec<Agent> {
        self.collect(|_| true)
    }

    // Each record is copied under its own lock, so an agent in the middle of
    // an update shows up entirely before or entirely after it.
    fn collect<P>(&self, include: P) -> Vec<Agent>
    where
        P: Fn(&str) -> bool,
    {
        let agents = self.read_map();
        let mut snapshot: Vec<Agent> = agents
            .iter()
            .filter(|(agent_id, _)| include(agent_id.as_str()))
            .map(|(_, record)| lock(record).clone())
            .collect();
        snapshot.sort_by(|a, b| a.id.cmp(&b.id));
        snapshot
    }

    /// Number of registered agents
    pub fn len(&self) -> usize {
        self.read_map().len()
    }

    /// Whether no agents are registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read_map(&self) -> RwLockReadGuard<'_, HashMap<AgentId, Record>> {
        self.agents.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_map(&self) -> RwLockWriteGuard<'_, HashMap<AgentId, Record>> {
        self.agents.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn lock(record: &Record) -> MutexGuard<'_, Agent> {
    record.lock().unwrap_or_else(PoisonError::into_inner)
}
