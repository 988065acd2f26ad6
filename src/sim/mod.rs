//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick only
//! - Seeded, instance-owned RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod config;
pub mod state;
pub mod tick;
pub mod tunnel;

pub use collision::{CorridorSpan, CraftBox, check_collision, craft_out_of_screen};
pub use config::{ConfigError, SimConfig};
pub use state::{
    Action, ActionError, Phase, RngState, Simulation, SimulationState, TerminationCause,
};
pub use tick::{apply_physics, tick};
pub use tunnel::Tunnel;
