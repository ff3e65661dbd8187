//! Agent inspection API handlers
//!
//! Read-only views of the live registry.

use crate::error::AppError;
use crate::geo::Position;
use crate::state::{Agent, AgentId, AppState};
use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Serialize;

/// Agents list response
#[derive(Serialize)]
pub struct AgentsListResponse {
    /// Snapshot of all agents, sorted by identifier
    pub agents: Vec<Agent>,
    /// Total number of agents
    pub count: usize,
}

/// Arc vertices in the diagnostic outline
const OUTLINE_STEPS: usize = 32;

/// Field-of-view diagnostic for one agent
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FovResponse {
    /// Agent the view belongs to
    pub id: AgentId,
    /// Sector geometry; absent until position and heading are both known
    pub sector: Option<SectorView>,
    /// Agents currently inside the view, sorted by identifier
    pub visible: Vec<Agent>,
}

/// Serializable sector geometry
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorView {
    /// Normalized lower bearing
    pub lower_bound: f64,
    /// Normalized upper bearing
    pub upper_bound: f64,
    /// Angular width in degrees
    pub span: f64,
    /// Sensing radius in kilometers
    pub radius_km: f64,
    /// Closed polygon ring: center, arc vertices, center
    pub outline: Vec<Position>,
}

/// GET /api/agents - List all agents
pub async fn list_agents(State(state): State<AppState>) -> Json<AgentsListResponse> {
    let agents = state.registry.snapshot();
    Json(AgentsListResponse {
        count: agents.len(),
        agents,
    })
}

/// GET /api/agents/:id - Get a specific agent
pub async fn get_agent(
    State(state): State<AppState>,
    Path(id): Path<AgentId>,
) -> Result<Json<Agent>, AppError> {
    let agent = state.registry.get(&id)?;
    Ok(Json(agent))
}

/// GET /api/agents/:id/fov - Sector outline and visible agents
pub async fn get_agent_fov(
    State(state): State<AppState>,
    Path(id): Path<AgentId>,
) -> Result<Json<FovResponse>, AppError> {
    let agent = state.registry.get(&id)?;
    let sector = state.engine.sector_of(&agent)?.map(|sector| {
        let (lower_bound, upper_bound) = sector.bounds();
        SectorView {
            lower_bound,
            upper_bound,
            span: sector.span(),
            radius_km: sector.radius_km(),
            outline: sector.outline(OUTLINE_STEPS),
        }
    });

    Ok(Json(FovResponse {
        visible: state.engine.evaluate(&agent),
        id: agent.id,
        sector,
    }))
}
