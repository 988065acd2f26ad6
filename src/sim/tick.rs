//! Fixed-step simulation tick
//!
//! Order within a tick is fixed: distance, physics, tunnel, collision.

use super::collision::check_collision;
use super::config::SimConfig;
use super::state::{Action, Phase, Simulation, SimulationState};

/// Advance the simulation by one tick
pub fn tick(sim: &mut Simulation, action: Action) {
    if sim.state.terminated() {
        return;
    }

    let config = &sim.config;
    let state = &mut sim.state;

    state.ticks += 1;
    state.distance += u64::from(config.scroll_speed);
    state.action = action;

    apply_physics(state, action, config);

    sim.tunnel.advance(config.scroll_dx());
    sim.tunnel.extend(config, &mut sim.rng);
    sim.tunnel.prune();

    let tunnel = &sim.tunnel;
    let craft_x = config.craft_x;
    let cause = check_collision(config, state.craft_y, || match tunnel.center_at(craft_x) {
        Some(center) => center,
        None => {
            let (first, last) = tunnel.bounds();
            log::error!(
                "No tunnel segment covers craft x {craft_x} (window {first}..{last}, {} points)",
                tunnel.len()
            );
            panic!(
                "tunnel window {first}..{last} does not cover craft x {craft_x}; \
                 scroll speed or segment bounds are misconfigured"
            );
        }
    });

    if let Some(cause) = cause {
        state.phase = Phase::Terminated(cause);
        log::debug!(
            "Episode over: {:?} at distance {} after {} ticks",
            cause,
            state.distance,
            state.ticks
        );
    }
}

/// Apply thrust or gravity, clamp, then integrate position
pub fn apply_physics(state: &mut SimulationState, action: Action, config: &SimConfig) {
    match action {
        Action::Thrust => {
            if config.reset_speed_on_thrust && state.craft_vy > 0.0 {
                state.craft_vy = 0.0;
            }
            state.craft_vy -= config.thrust;
        }
        Action::None => {
            state.craft_vy += config.gravity;
        }
    }

    let max = config.max_vertical_speed;
    state.craft_vy = state.craft_vy.clamp(-max, max);
    state.craft_y += state.craft_vy;
}
