//! Dogs controlled by joined players.

use crate::direction::Direction;
use crate::state::PlayerState;
use log::debug;
use shared::{Point, Vector2};

/// Integer id the server assigns on join.
pub type PlayerId = u32;

#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub token: String,
    pub position: Point,
    pub velocity: Vector2,
    pub facing: Option<Direction>,
}

impl Player {
    /// A new dog stands still at its spawn point facing up.
    pub fn new(id: PlayerId, name: impl Into<String>, token: impl Into<String>, spawn: Point) -> Self {
        Self {
            id,
            name: name.into(),
            token: token.into(),
            position: spawn,
            velocity: Vector2::ZERO,
            facing: Some(Direction::Up),
        }
    }

    /// Applies a move command. `None` stops the dog but keeps its facing.
    pub fn set_direction(&mut self, direction: Option<Direction>, speed: f64) {
        match direction {
            Some(direction) => {
                self.velocity = direction.velocity(speed);
                self.facing = Some(direction);
            }
            None => self.velocity = Vector2::ZERO,
        }
        debug!(
            "Player {} direction {:?}, velocity ({}, {})",
            self.id, self.facing, self.velocity.x, self.velocity.y
        );
    }

    /// Called when a tick ran the dog into a road boundary.
    pub fn stop_at_boundary(&mut self) {
        debug!(
            "Player {} stopped at road boundary ({}, {})",
            self.id, self.position.x, self.position.y
        );
        self.velocity = Vector2::ZERO;
        self.facing = None;
    }

    pub fn state(&self) -> PlayerState {
        PlayerState {
            pos: self.position,
            speed: self.velocity,
            dir: self.facing,
        }
    }
}
