//! Heli Tunnel headless runner
//!
//! Plays episodes with a scripted policy or benchmarks batched environments.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use heli_tunnel::sim::{Action, TerminationCause};
use heli_tunnel::{HelicopterEnv, SimConfig, VecEnv};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Policy {
    /// Uniformly random actions
    Random,
    /// Never thrust
    Idle,
    /// Always thrust
    Thrust,
    /// Thrust whenever the craft is below the corridor center
    Hover,
}

#[derive(Debug, Parser)]
#[command(name = "heli-tunnel", version)]
#[command(about = "Headless helicopter tunnel simulation runner")]
struct Args {
    /// JSON file with simulation tuning (camelCase keys)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for the simulation and policy streams (random when omitted)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play episodes and report distance per episode
    Run {
        #[arg(long, default_value_t = 5)]
        episodes: u32,

        /// Step cap per episode
        #[arg(long, default_value_t = 1000)]
        max_steps: u32,

        #[arg(long, value_enum, default_value_t = Policy::Hover)]
        policy: Policy,

        /// Print a JSON summary instead of text
        #[arg(long)]
        json: bool,
    },
    /// Measure environment steps per second across a batch
    Bench {
        /// Batch sizes to measure (comma-separated)
        #[arg(long, value_delimiter = ',', default_value = "1,4,16,64")]
        envs: Vec<usize>,

        #[arg(long, default_value_t = 5000)]
        steps_per_env: u32,
    },
}

#[derive(Debug, Serialize)]
struct EpisodeReport {
    episode: u32,
    steps: u32,
    distance: u64,
    truncated: bool,
    cause: Option<TerminationCause>,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    seed: u64,
    episodes: Vec<EpisodeReport>,
    mean_distance: f64,
    best_distance: u64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SimConfig::default(),
    };
    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    log::info!("Heli Tunnel starting with seed {seed}");

    match args.command {
        Command::Run {
            episodes,
            max_steps,
            policy,
            json,
        } => run(config, seed, episodes, max_steps, policy, json),
        Command::Bench {
            envs,
            steps_per_env,
        } => bench(&config, seed, &envs, steps_per_env),
    }
}

fn choose_action(env: &HelicopterEnv, policy: Policy, rng: &mut Pcg32) -> Action {
    match policy {
        Policy::Random => {
            if rng.random_bool(0.5) {
                Action::Thrust
            } else {
                Action::None
            }
        }
        Policy::Idle => Action::None,
        Policy::Thrust => Action::Thrust,
        Policy::Hover => {
            let sim = env.sim();
            // Look one tick ahead so the craft starts braking early
            let ahead = sim.config().craft_x + sim.config().scroll_dx();
            let center = sim
                .tunnel()
                .center_at(ahead)
                .unwrap_or(sim.config().mid_height());
            if sim.craft_y() + sim.craft_vy() > center {
                Action::Thrust
            } else {
                Action::None
            }
        }
    }
}

fn run(
    config: SimConfig,
    seed: u64,
    episodes: u32,
    max_steps: u32,
    policy: Policy,
    json: bool,
) -> Result<()> {
    let mut env = HelicopterEnv::new(config, Some(seed))
        .context("invalid simulation config")?
        .with_max_steps(max_steps);
    let mut policy_rng = Pcg32::seed_from_u64(seed.wrapping_add(1));

    let mut reports = Vec::with_capacity(episodes as usize);
    for episode in 0..episodes {
        env.reset(None);
        loop {
            let action = choose_action(&env, policy, &mut policy_rng);
            let step = env.step_action(action);
            if step.done() {
                let report = EpisodeReport {
                    episode,
                    steps: env.steps(),
                    distance: step.info.distance,
                    truncated: step.truncated,
                    cause: step.info.cause,
                };
                if !json {
                    println!(
                        "episode {:>3}: distance {:>6} in {:>5} steps ({})",
                        report.episode,
                        report.distance,
                        report.steps,
                        match report.cause {
                            Some(TerminationCause::OutOfScreen) => "left the screen",
                            Some(TerminationCause::CorridorWall) => "hit the wall",
                            None => "step cap",
                        }
                    );
                }
                reports.push(report);
                break;
            }
        }
    }

    let best_distance = reports.iter().map(|r| r.distance).max().unwrap_or(0);
    let mean_distance = if reports.is_empty() {
        0.0
    } else {
        reports.iter().map(|r| r.distance as f64).sum::<f64>() / reports.len() as f64
    };

    if json {
        let summary = RunSummary {
            seed,
            episodes: reports,
            mean_distance,
            best_distance,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("mean distance {mean_distance:.1}, best {best_distance}");
    }
    Ok(())
}

fn bench(config: &SimConfig, seed: u64, batch_sizes: &[usize], steps_per_env: u32) -> Result<()> {
    let mut rng = Pcg32::seed_from_u64(seed);
    for &count in batch_sizes {
        let mut envs = VecEnv::new(config, count, seed, None).context("invalid simulation config")?;
        envs.reset();
        let mut actions = vec![0i64; count];

        let start = Instant::now();
        for _ in 0..steps_per_env {
            for action in &mut actions {
                *action = i64::from(rng.random_bool(0.5));
            }
            envs.step(&actions)?;
        }
        let elapsed = start.elapsed().as_secs_f64();

        let total = count as f64 * f64::from(steps_per_env);
        println!(
            "envs {:>4}: {:>9} steps in {:>7.3}s -> {:>12.1} steps/s",
            count,
            total,
            elapsed,
            total / elapsed.max(f64::EPSILON)
        );
    }
    Ok(())
}
