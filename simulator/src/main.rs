use clap::Parser;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use simulator::scenario::{apply_step, RandomWalk};
use simulator::{Simulation, SpawnPolicy};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{interval, Duration, Instant, MissedTickBehavior};

/// Runs seeded random walks through the dog movement simulator.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Game config file with the map catalogue
    #[arg(short = 'c', long)]
    config_file: PathBuf,

    /// Map to join (defaults to the first map in the config)
    #[arg(short = 'm', long)]
    map: Option<String>,

    /// Number of dogs to join
    #[arg(short = 'p', long, default_value = "1")]
    players: u32,

    /// Number of random steps to run
    #[arg(short = 'n', long, default_value = "10")]
    steps: u32,

    /// Seed for directions, tick lengths and spawn points
    #[arg(short = 's', long, default_value = "0")]
    seed: u64,

    /// Spawn dogs at random points on random roads
    #[arg(long)]
    randomize_spawn_points: bool,

    /// Advance the simulation in real time with this tick period (ms)
    #[arg(short = 't', long)]
    tick_period: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();

    let mut sim = Simulation::from_file(&args.config_file)?;
    info!("Loaded {} maps from {}", sim.maps().len(), args.config_file.display());

    let map_id = match args.map {
        Some(id) => id,
        None => sim
            .maps()
            .first()
            .map(|m| m.id.clone())
            .ok_or("config has no maps")?,
    };
    let segments = sim
        .map(&map_id)
        .ok_or_else(|| format!("no such map: {}", map_id))?
        .segments()?;

    let policy = if args.randomize_spawn_points {
        SpawnPolicy::Random
    } else {
        SpawnPolicy::FirstRoadStart
    };
    let mut spawn_rng = StdRng::seed_from_u64(args.seed);

    let mut tokens = Vec::new();
    for id in 0..args.players {
        let token = format!("{:032x}", u128::from(id) + 1);
        let spawn = policy
            .spawn_point(&segments, &mut spawn_rng)
            .ok_or_else(|| format!("map {} has no roads", map_id))?;
        sim.join(&format!("dog-{}", id), &map_id, &token, id, spawn)?;
        tokens.push(token);
    }

    let mut walk = RandomWalk::new(args.seed);

    let sim = match args.tick_period {
        Some(period_ms) => {
            let sim = Arc::new(RwLock::new(sim));
            run_realtime(Arc::clone(&sim), &mut walk, &tokens, args.steps, period_ms).await;
            Arc::try_unwrap(sim)
                .map_err(|_| "simulation still shared after shutdown")?
                .into_inner()
        }
        None => {
            for step in 0..args.steps {
                let applied = walk.advance(&mut sim, &tokens);
                info!("Step {}: ticked {}ms", step, applied.delta_ms);
            }
            sim
        }
    };

    let state = tokens
        .first()
        .and_then(|token| sim.get_state(token))
        .ok_or("no players joined")?;
    println!("{}", serde_json::to_string_pretty(&state)?);

    Ok(())
}

/// Drives the simulation off a wall-clock interval. Each step's moves are
/// drawn from the walk, but the tick length is the real elapsed time.
async fn run_realtime(
    sim: Arc<RwLock<Simulation>>,
    walk: &mut RandomWalk,
    tokens: &[String],
    steps: u32,
    period_ms: u64,
) {
    let mut interval_timer = interval(Duration::from_millis(period_ms.max(1)));
    interval_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // Skip the first tick since it fires immediately
    interval_timer.tick().await;
    let mut last_update = Instant::now();

    for step in 0..steps {
        tokio::select! {
            _ = interval_timer.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                warn!("Received Ctrl+C, stopping after {} steps", step);
                break;
            }
        }

        let elapsed_ms = consume_whole_millis(&mut last_update, Instant::now());

        let mut step_plan = walk.next_step(tokens);
        step_plan.delta_ms = elapsed_ms;

        let mut state = sim.write().await;
        apply_step(&mut state, &step_plan);
        info!("Step {}: ticked {}ms", step, elapsed_ms);
    }
}

/// Returns the whole milliseconds between `last_update` and `now`, moving
/// `last_update` forward by exactly that much so sub-millisecond remainders
/// carry into the next step.
fn consume_whole_millis(last_update: &mut Instant, now: Instant) -> u64 {
    let elapsed_ms = (now - *last_update).as_millis() as u64;
    *last_update += Duration::from_millis(elapsed_ms);
    elapsed_ms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remainders_carry_over() {
        let start = Instant::now();
        let mut last_update = start;
        let mut total_ms = 0;

        // Ten steps of 1.5ms each add up to 15ms, not 10ms.
        for step in 1..=10u32 {
            let now = start + Duration::from_micros(1500 * u64::from(step));
            total_ms += consume_whole_millis(&mut last_update, now);
        }

        assert_eq!(total_ms, 15);
        assert_eq!(last_update, start + Duration::from_millis(15));
    }

    #[test]
    fn test_exact_millis_consumed_fully() {
        let start = Instant::now();
        let mut last_update = start;
        assert_eq!(consume_whole_millis(&mut last_update, start + Duration::from_millis(16)), 16);
        assert_eq!(last_update, start + Duration::from_millis(16));
    }
}
