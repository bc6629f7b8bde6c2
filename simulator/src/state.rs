//! Player and session snapshots in the shape the game server reports them,
//! plus a field-by-field diff for lockstep comparison.

use crate::direction::{facing_code, Direction};
use crate::player::PlayerId;
use serde::{Deserialize, Serialize};
use shared::{Point, Vector2};
use std::collections::BTreeMap;
use std::fmt;

/// `{pos: [x, y], speed: [vx, vy], dir: "U"|"R"|"D"|"L"|""}`
///
/// Equality is approximate on all float fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub pos: Point,
    pub speed: Vector2,
    #[serde(with = "facing_code")]
    pub dir: Option<Direction>,
}

/// State of every player in one session, keyed by player id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub players: BTreeMap<PlayerId, PlayerState>,
}

/// A single mismatch between an expected and an observed session state.
#[derive(Debug, Clone, PartialEq)]
pub enum Divergence {
    MissingPlayer(PlayerId),
    UnexpectedPlayer(PlayerId),
    Position {
        id: PlayerId,
        expected: Point,
        actual: Point,
    },
    Velocity {
        id: PlayerId,
        expected: Vector2,
        actual: Vector2,
    },
    Direction {
        id: PlayerId,
        expected: Option<Direction>,
        actual: Option<Direction>,
    },
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Divergence::MissingPlayer(id) => write!(f, "player {} missing", id),
            Divergence::UnexpectedPlayer(id) => write!(f, "unexpected player {}", id),
            Divergence::Position {
                id,
                expected,
                actual,
            } => write!(
                f,
                "player {} pos: expected ({}, {}), got ({}, {})",
                id, expected.x, expected.y, actual.x, actual.y
            ),
            Divergence::Velocity {
                id,
                expected,
                actual,
            } => write!(
                f,
                "player {} speed: expected ({}, {}), got ({}, {})",
                id, expected.x, expected.y, actual.x, actual.y
            ),
            Divergence::Direction {
                id,
                expected,
                actual,
            } => write!(
                f,
                "player {} dir: expected {:?}, got {:?}",
                id,
                expected.map_or("", Direction::code),
                actual.map_or("", Direction::code)
            ),
        }
    }
}

/// Diffs two session states. An empty result means they agree.
pub fn compare_states(expected: &SessionState, actual: &SessionState) -> Vec<Divergence> {
    let mut divergences = Vec::new();

    for (&id, want) in &expected.players {
        let Some(got) = actual.players.get(&id) else {
            divergences.push(Divergence::MissingPlayer(id));
            continue;
        };

        if want.pos != got.pos {
            divergences.push(Divergence::Position {
                id,
                expected: want.pos,
                actual: got.pos,
            });
        }
        if want.speed != got.speed {
            divergences.push(Divergence::Velocity {
                id,
                expected: want.speed,
                actual: got.speed,
            });
        }
        if want.dir != got.dir {
            divergences.push(Divergence::Direction {
                id,
                expected: want.dir,
                actual: got.dir,
            });
        }
    }

    divergences.extend(
        actual
            .players
            .keys()
            .filter(|id| !expected.players.contains_key(id))
            .map(|&id| Divergence::UnexpectedPlayer(id)),
    );

    divergences
}
