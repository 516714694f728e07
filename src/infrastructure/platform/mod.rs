//! Push-platform adapters

mod gateway;
mod simulated;

pub use gateway::GatewayPlatform;
pub use simulated::SimulatedPlatform;
