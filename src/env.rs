//! Reinforcement-learning environment adapter
//!
//! Wraps a [`Simulation`] behind a Gym-style reset/step interface with a
//! discrete action space (0 = none, 1 = thrust) and a fixed-size observation
//! vector normalized to roughly `[0, 1]`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::{Action, ActionError, ConfigError, SimConfig, Simulation, TerminationCause};

/// Number of leading tunnel points encoded into an observation
pub const MAX_TUNNEL_POINTS: usize = 4;
/// Observation length: craft y, craft vy, then (x, y) per tunnel point
pub const OBS_SIZE: usize = 2 + MAX_TUNNEL_POINTS * 2;

/// Padding for tunnel slots beyond the current window
const EMPTY_POINT: [f32; 2] = [1.0, 0.5];

pub type Observation = [f32; OBS_SIZE];

/// Episode bookkeeping returned with every observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    pub game_over: bool,
    pub distance: u64,
    pub ticks: u64,
    pub cause: Option<TerminationCause>,
    /// Last observation of a finished episode when a [`VecEnv`] auto-reset
    /// replaced it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminal_observation: Option<Observation>,
}

/// Result of a single environment step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvStep {
    pub observation: Observation,
    pub reward: f32,
    pub terminated: bool,
    /// Step cap reached without termination
    pub truncated: bool,
    pub info: StepInfo,
}

impl EnvStep {
    #[inline]
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// Errors raised before any environment is stepped
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvError {
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error("expected {expected} actions, got {got}")]
    ActionCount { expected: usize, got: usize },
}

/// Encode the simulation into an observation vector
pub fn observe(sim: &Simulation) -> Observation {
    let config = sim.config();
    let width = config.screen_width;
    let height = config.screen_height;

    let mut obs = [0.0; OBS_SIZE];
    obs[0] = sim.craft_y() / height;
    obs[1] = sim.craft_vy() / config.max_vertical_speed * 0.5 + 0.5;

    let points = sim.tunnel_points();
    for slot in 0..MAX_TUNNEL_POINTS {
        let encoded = match points.get(slot) {
            Some(point) => [(point.x + width) / (width * 3.0), point.y / height],
            None => EMPTY_POINT,
        };
        obs[2 + slot * 2] = encoded[0];
        obs[3 + slot * 2] = encoded[1];
    }
    obs
}

/// Single-instance environment
#[derive(Debug, Clone)]
pub struct HelicopterEnv {
    sim: Simulation,
    /// Optional step cap per episode; reaching it sets `truncated`
    max_steps: Option<u32>,
    steps: u32,
}

impl HelicopterEnv {
    /// Build an environment. Without a seed the random stream comes from OS
    /// entropy and every run differs.
    pub fn new(config: SimConfig, seed: Option<u64>) -> Result<Self, ConfigError> {
        let sim = match seed {
            Some(seed) => Simulation::seeded(config, seed)?,
            None => Simulation::new(config)?,
        };
        Ok(Self {
            sim,
            max_steps: None,
            steps: 0,
        })
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Start a new episode. A seed restarts the random stream.
    pub fn reset(&mut self, seed: Option<u64>) -> (Observation, StepInfo) {
        match seed {
            Some(seed) => self.sim.reset_with_seed(seed),
            None => self.sim.reset(),
        };
        self.steps = 0;
        (observe(&self.sim), self.info())
    }

    /// Validate a raw action value and step. Invalid values leave the
    /// environment untouched.
    pub fn step(&mut self, action: i64) -> Result<EnvStep, ActionError> {
        let action = Action::try_from(action)?;
        Ok(self.step_action(action))
    }

    pub fn step_action(&mut self, action: Action) -> EnvStep {
        self.sim.step(action);
        self.steps = self.steps.saturating_add(1);

        let terminated = self.sim.is_terminated();
        let truncated = !terminated && self.max_steps.is_some_and(|max| self.steps >= max);
        EnvStep {
            observation: observe(&self.sim),
            reward: if terminated { 0.0 } else { 1.0 },
            terminated,
            truncated,
            info: self.info(),
        }
    }

    fn info(&self) -> StepInfo {
        let state = self.sim.state();
        StepInfo {
            game_over: state.terminated(),
            distance: state.distance,
            ticks: state.ticks,
            cause: state.termination(),
            terminal_observation: None,
        }
    }

    #[inline]
    pub fn sim(&self) -> &Simulation {
        &self.sim
    }

    /// Steps taken in the current episode
    #[inline]
    pub fn steps(&self) -> u32 {
        self.steps
    }

    #[inline]
    pub fn action_count(&self) -> usize {
        Action::COUNT
    }

    #[inline]
    pub fn observation_size(&self) -> usize {
        OBS_SIZE
    }
}

/// A batch of independent environments stepped in lockstep.
///
/// Finished environments are reset automatically; the returned step then
/// carries the fresh observation and the finished one in
/// `info.terminal_observation`.
#[derive(Debug, Clone)]
pub struct VecEnv {
    envs: Vec<HelicopterEnv>,
}

impl VecEnv {
    /// `count` environments seeded `base_seed`, `base_seed + 1`, ...
    pub fn new(
        config: &SimConfig,
        count: usize,
        base_seed: u64,
        max_steps: Option<u32>,
    ) -> Result<Self, ConfigError> {
        let envs = (0..count)
            .map(|i| -> Result<HelicopterEnv, ConfigError> {
                let seed = base_seed.wrapping_add(i as u64);
                let env = HelicopterEnv::new(config.clone(), Some(seed))?;
                Ok(match max_steps {
                    Some(max) => env.with_max_steps(max),
                    None => env,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("Created {} environments from seed {}", count, base_seed);
        Ok(Self { envs })
    }

    pub fn reset(&mut self) -> Vec<Observation> {
        self.envs.iter_mut().map(|env| env.reset(None).0).collect()
    }

    /// Step every environment with its action. All actions are validated
    /// before any environment moves.
    pub fn step(&mut self, actions: &[i64]) -> Result<Vec<EnvStep>, EnvError> {
        if actions.len() != self.envs.len() {
            return Err(EnvError::ActionCount {
                expected: self.envs.len(),
                got: actions.len(),
            });
        }
        let actions = actions
            .iter()
            .map(|&a| Action::try_from(a))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self
            .envs
            .iter_mut()
            .zip(actions)
            .map(|(env, action)| {
                let mut step = env.step_action(action);
                if step.done() {
                    let (observation, _) = env.reset(None);
                    let terminal = std::mem::replace(&mut step.observation, observation);
                    step.info = StepInfo {
                        terminal_observation: Some(terminal),
                        ..step.info
                    };
                }
                step
            })
            .collect())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.envs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.envs.is_empty()
    }

    pub fn envs(&self) -> &[HelicopterEnv] {
        &self.envs
    }
}
