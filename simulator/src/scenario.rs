//! Seeded random walks: a reproducible stream of move commands and tick
//! lengths for driving the simulator (and a server beside it) in lockstep.

use crate::direction::Direction;
use crate::simulation::Simulation;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;

/// Tick lengths drawn by default, in milliseconds.
pub const DEFAULT_TICK_RANGE: RangeInclusive<u64> = 10..=10_000;

/// One step of a walk: every listed token gets a move, then one tick runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub moves: Vec<(String, Option<Direction>)>,
    pub delta_ms: u64,
}

pub struct RandomWalk {
    rng: StdRng,
    tick_range: RangeInclusive<u64>,
}

impl RandomWalk {
    pub fn new(seed: u64) -> Self {
        Self::with_tick_range(seed, DEFAULT_TICK_RANGE)
    }

    pub fn with_tick_range(seed: u64, tick_range: RangeInclusive<u64>) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            tick_range,
        }
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn next_step(&mut self, tokens: &[String]) -> Step {
        let moves = tokens
            .iter()
            .map(|token| (token.clone(), Direction::random(&mut self.rng)))
            .collect();
        let delta_ms = self.rng.gen_range(self.tick_range.clone());
        Step { moves, delta_ms }
    }

    /// Draws the next step and applies it to `sim`.
    pub fn advance(&mut self, sim: &mut Simulation, tokens: &[String]) -> Step {
        let step = self.next_step(tokens);
        apply_step(sim, &step);
        step
    }
}

pub fn apply_step(sim: &mut Simulation, step: &Step) {
    for (token, direction) in &step.moves {
        if !sim.move_player(token, *direction) {
            debug!("Skipping move for unknown token {}", token);
        }
    }
    sim.tick(step.delta_ms);
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{GameConfig, Point};

    fn tokens() -> Vec<String> {
        vec!["a".to_string(), "b".to_string()]
    }

    #[test]
    fn test_same_seed_same_walk() {
        let mut first = RandomWalk::new(345612);
        let mut second = RandomWalk::new(345612);
        for _ in 0..10 {
            assert_eq!(first.next_step(&tokens()), second.next_step(&tokens()));
        }
    }

    #[test]
    fn test_tick_range_respected() {
        let mut walk = RandomWalk::with_tick_range(1, 0..=250);
        for _ in 0..100 {
            let step = walk.next_step(&tokens());
            assert!(step.delta_ms <= 250);
            assert_eq!(step.moves.len(), 2);
        }
    }

    #[test]
    fn test_walk_keeps_players_on_roads() {
        let config = GameConfig::from_json(
            r#"{ "maps": [ { "id": "m", "name": "M", "roads": [
                { "x0": 0, "y0": 0, "x1": 40 },
                { "x0": 40, "y0": 0, "y1": 30 },
                { "x0": 40, "y0": 30, "x1": 0 },
                { "x0": 0, "y0": 0, "y1": 30 }
            ] } ] }"#,
        )
        .unwrap();
        let mut sim = Simulation::new(config);
        sim.join("a", "m", "a", 0, Point::new(0.0, 0.0)).unwrap();
        sim.join("b", "m", "b", 1, Point::new(40.0, 30.0)).unwrap();

        let mut walk = RandomWalk::new(9);
        for _ in 0..50 {
            walk.advance(&mut sim, &tokens());
            let session = sim.session("m").unwrap();
            for player in session.players() {
                assert!(session.roads().iter().any(|r| r.is_on_road(player.position)));
            }
        }
    }
}
