//! # Dog Movement Simulator
//!
//! A reference implementation of the dog game server's movement physics,
//! used as an oracle: tests feed it the same joins, moves and ticks they
//! send to the real server and compare the resulting states field by field.
//!
//! ## Movement Model
//!
//! Every road is an axis-aligned segment padded by a fixed half-width into
//! a corridor. On each tick a moving dog's unconstrained target is clamped
//! into every corridor that contains its current position, and the clamp
//! that lets it travel farthest is kept. A dog whose move got clamped hits
//! the wall: its velocity drops to zero and it faces no direction.
//!
//! ## Module Organization
//!
//! ### Direction Module (`direction`)
//! The closed set of move directions and their velocity vectors.
//!
//! ### Player Module (`player`)
//! Per-dog identity and kinematic state.
//!
//! ### Session Module (`session`)
//! One map's corridors and players, and the tick integration itself.
//!
//! ### Simulation Module (`simulation`)
//! The map catalogue, lazily created sessions and token lookup.
//!
//! ### State Module (`state`)
//! Snapshots shaped like the server's JSON state and a divergence report.
//!
//! ### Spawn and Scenario Modules (`spawn`, `scenario`)
//! Spawn point choice and seeded random walks for standalone runs.
//!
//! ## Usage Example
//!
//! ```rust
//! use shared::{GameConfig, Point};
//! use simulator::{Direction, Simulation};
//!
//! let config = GameConfig::from_json(
//!     r#"{ "maps": [ { "id": "map1", "name": "Map 1",
//!          "roads": [ { "x0": 0, "y0": 0, "x1": 40 } ] } ] }"#,
//! )?;
//! let mut sim = Simulation::new(config);
//! sim.join("Rex", "map1", "token", 0, Point::new(0.0, 0.0))?;
//! sim.move_player("token", Some(Direction::Right));
//! sim.tick(1000);
//!
//! let state = sim.player_state("token").unwrap();
//! assert_eq!(state.pos, Point::new(1.0, 0.0));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Determinism
//!
//! A tick is a synchronous computation over the current snapshot. Players
//! are resolved in join order, each against the immutable road list, so no
//! player observes another's half-applied update.

pub mod direction;
pub mod player;
pub mod scenario;
pub mod session;
pub mod simulation;
pub mod spawn;
pub mod state;

pub use direction::Direction;
pub use player::{Player, PlayerId};
pub use session::{constrain_move, GameSession};
pub use simulation::{Simulation, SimulationError};
pub use spawn::SpawnPolicy;
pub use state::{compare_states, Divergence, PlayerState, SessionState};
