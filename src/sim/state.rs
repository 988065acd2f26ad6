//! Simulation state and core types
//!
//! Everything a tick reads or writes lives here. Each `Simulation` owns its
//! own random stream, so independent instances never share mutable state.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::config::{ConfigError, SimConfig};
use super::tick::tick;
use super::tunnel::Tunnel;

/// Action applied for a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Action {
    /// Let gravity pull the craft down
    #[default]
    None,
    /// Apply upward thrust
    Thrust,
}

impl Action {
    /// Number of discrete actions
    pub const COUNT: usize = 2;

    pub fn as_index(self) -> u8 {
        match self {
            Action::None => 0,
            Action::Thrust => 1,
        }
    }
}

/// Raised at the boundary when an action value is outside the action space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("invalid action {0} (expected 0 = none or 1 = thrust)")]
    Invalid(i64),
}

impl TryFrom<i64> for Action {
    type Error = ActionError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Action::None),
            1 => Ok(Action::Thrust),
            other => Err(ActionError::Invalid(other)),
        }
    }
}

impl TryFrom<u8> for Action {
    type Error = ActionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Action::try_from(i64::from(value))
    }
}

/// Why an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationCause {
    /// Craft center left the screen vertically
    OutOfScreen,
    /// Craft box crossed the corridor wall
    CorridorWall,
}

/// Episode phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Running,
    /// Absorbing until the next reset
    Terminated(TerminationCause),
}

/// Observable craft and episode state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Vertical position of the craft center (screen y grows downward)
    pub craft_y: f32,
    /// Vertical velocity, positive is downward
    pub craft_vy: f32,
    /// Cumulative horizontal distance travelled
    pub distance: u64,
    /// Ticks advanced in this episode
    pub ticks: u64,
    /// Most recent action applied
    pub action: Action,
    pub phase: Phase,
}

impl SimulationState {
    /// Fresh state with the craft resting at mid-height
    pub fn initial(config: &SimConfig) -> Self {
        Self {
            craft_y: config.mid_height(),
            craft_vy: 0.0,
            distance: 0,
            ticks: 0,
            action: Action::None,
            phase: Phase::Running,
        }
    }

    #[inline]
    pub fn terminated(&self) -> bool {
        matches!(self.phase, Phase::Terminated(_))
    }

    pub fn termination(&self) -> Option<TerminationCause> {
        match self.phase {
            Phase::Running => None,
            Phase::Terminated(cause) => Some(cause),
        }
    }
}

/// RNG state wrapper for reproducibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Pick a seed from the process entropy source
    pub fn from_entropy() -> Self {
        Self::new(rand::rng().random())
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// One self-contained simulation instance
#[derive(Debug, Clone)]
pub struct Simulation {
    pub(crate) config: SimConfig,
    pub(crate) rng_state: RngState,
    pub(crate) rng: Pcg32,
    pub(crate) state: SimulationState,
    pub(crate) tunnel: Tunnel,
}

impl Simulation {
    /// Create a simulation with a random stream seeded from OS entropy
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        Self::with_rng_state(config, RngState::from_entropy())
    }

    /// Create a simulation with a deterministic random stream
    pub fn seeded(config: SimConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng_state(config, RngState::new(seed))
    }

    fn with_rng_state(config: SimConfig, rng_state: RngState) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = rng_state.to_rng();
        let tunnel = Tunnel::new(&config, &mut rng);
        let state = SimulationState::initial(&config);
        log::debug!("Simulation created with seed {}", rng_state.seed);
        Ok(Self {
            config,
            rng_state,
            rng,
            state,
            tunnel,
        })
    }

    /// Start a new episode. The random stream continues, so each episode's
    /// tunnel differs.
    pub fn reset(&mut self) -> SimulationState {
        self.state = SimulationState::initial(&self.config);
        self.tunnel.reset(&self.config, &mut self.rng);
        log::debug!("Episode reset (seed {})", self.rng_state.seed);
        self.state
    }

    /// Restart the random stream from `seed`, then start a new episode
    pub fn reset_with_seed(&mut self, seed: u64) -> SimulationState {
        self.rng_state = RngState::new(seed);
        self.rng = self.rng_state.to_rng();
        self.reset()
    }

    /// Advance one tick. A no-op once the episode has terminated.
    pub fn step(&mut self, action: Action) -> SimulationState {
        tick(self, action);
        self.state
    }

    #[inline]
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    #[inline]
    pub fn craft_y(&self) -> f32 {
        self.state.craft_y
    }

    #[inline]
    pub fn craft_vy(&self) -> f32 {
        self.state.craft_vy
    }

    #[inline]
    pub fn distance(&self) -> u64 {
        self.state.distance
    }

    #[inline]
    pub fn is_terminated(&self) -> bool {
        self.state.terminated()
    }

    #[inline]
    pub fn action(&self) -> Action {
        self.state.action
    }

    /// Current tunnel window, left to right
    #[inline]
    pub fn tunnel_points(&self) -> &[Vec2] {
        self.tunnel.points()
    }

    #[inline]
    pub fn tunnel(&self) -> &Tunnel {
        &self.tunnel
    }

    #[inline]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Seed of the current random stream
    #[inline]
    pub fn seed(&self) -> u64 {
        self.rng_state.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_conversion() {
        assert_eq!(Action::try_from(0u8), Ok(Action::None));
        assert_eq!(Action::try_from(1i64), Ok(Action::Thrust));
        assert_eq!(Action::try_from(2u8), Err(ActionError::Invalid(2)));
        assert_eq!(Action::try_from(-1i64), Err(ActionError::Invalid(-1)));
        assert_eq!(Action::Thrust.as_index(), 1);
    }

    #[test]
    fn test_new_simulation_initial_state() {
        let sim = Simulation::seeded(SimConfig::default(), 1).unwrap();
        assert_eq!(sim.craft_y(), 120.0);
        assert_eq!(sim.craft_vy(), 0.0);
        assert_eq!(sim.distance(), 0);
        assert!(!sim.is_terminated());
        assert_eq!(sim.action(), Action::None);
        assert_eq!(sim.seed(), 1);
        assert!(sim.tunnel_points().len() >= 2);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SimConfig {
            screen_height: 0.0,
            ..Default::default()
        };
        assert!(Simulation::seeded(config, 1).is_err());
    }

    #[test]
    fn test_unseeded_simulations_differ() {
        let a = Simulation::new(SimConfig::default()).unwrap();
        let b = Simulation::new(SimConfig::default()).unwrap();
        // 2^-64 chance of a false failure
        assert_ne!(a.seed(), b.seed());
    }

    #[test]
    fn test_reset_with_seed_replays_tunnel() {
        let mut a = Simulation::seeded(SimConfig::default(), 5).unwrap();
        for _ in 0..30 {
            a.step(Action::Thrust);
        }
        a.reset_with_seed(11);
        let b = Simulation::seeded(SimConfig::default(), 11).unwrap();
        assert_eq!(a.tunnel(), b.tunnel());
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn test_termination_accessors() {
        let mut state = SimulationState::initial(&SimConfig::default());
        assert!(!state.terminated());
        assert_eq!(state.termination(), None);
        state.phase = Phase::Terminated(TerminationCause::CorridorWall);
        assert!(state.terminated());
        assert_eq!(state.termination(), Some(TerminationCause::CorridorWall));
    }
}
