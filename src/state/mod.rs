// State management module
// Handles the agent registry and the state shared by every connection

pub mod agent;
pub mod app_state;
pub mod landmarks;
pub mod registry;

pub use agent::{Agent, AgentId};
pub use app_state::AppState;
pub use registry::AgentRegistry;
