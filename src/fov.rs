//! Field-of-view evaluation
//!
//! Given one agent's position and heading, finds every other agent inside the
//! forward cone `heading ± max_fov / 2` up to `max_distance_km`.

use crate::config::FovConfig;
use crate::geo::{cone, normalize_bearing, GeoError, Sector};
use crate::state::{Agent, AgentRegistry};
use std::sync::Arc;
use tracing::{debug, error};

/// Lower and upper cone bounds for `heading` and total width `max_fov`,
/// both normalized onto [0, 360)
pub fn fov_bounds(heading: f64, max_fov: f64) -> (f64, f64) {
    let half = max_fov / 2.0;
    (normalize_bearing(heading - half), normalize_bearing(heading + half))
}

/// Computes FOV membership against a shared registry
#[derive(Debug)]
pub struct FovEngine {
    registry: Arc<AgentRegistry>,
    config: FovConfig,
}

impl FovEngine {
    /// Create an engine reading from `registry`
    pub fn new(registry: Arc<AgentRegistry>, config: FovConfig) -> Self {
        Self { registry, config }
    }

    /// The registry this engine reads from
    pub fn registry(&self) -> &Arc<AgentRegistry> {
        &self.registry
    }

    /// FOV parameters in use
    pub fn config(&self) -> FovConfig {
        self.config
    }

    /// The FOV sector of `agent`
    ///
    /// `Ok(None)` until the agent has reported both a position and a heading.
    pub fn sector_of(&self, agent: &Agent) -> Result<Option<Sector>, GeoError> {
        let (Some(center), Some(heading)) = (agent.position, agent.heading) else {
            return Ok(None);
        };
        cone(
            center,
            self.config.max_distance_km,
            heading,
            self.config.max_fov_deg,
        )
        .map(Some)
    }

    /// Agents other than `agent` that lie inside its field of view
    ///
    /// Returns an empty list when the subject has no position or heading, or
    /// when the sector cannot be built. Results follow identifier order.
    pub fn evaluate(&self, agent: &Agent) -> Vec<Agent> {
        let view = match self.sector_of(agent) {
            Ok(Some(view)) => view,
            Ok(None) => return Vec::new(),
            Err(e) => {
                error!(agent_id = %agent.id, error = %e, "Failed to build FOV sector");
                return Vec::new();
            }
        };

        let visible: Vec<Agent> = self
            .registry
            .snapshot_others(&agent.id)
            .into_iter()
            .filter(|other| other.position.is_some_and(|p| view.contains(&p)))
            .collect();

        debug!(
            agent_id = %agent.id,
            lower_bound = view.bounds().0,
            upper_bound = view.bounds().1,
            visible = visible.len(),
            "Evaluated field of view"
        );
        visible
    }
}
