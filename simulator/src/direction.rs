use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use shared::Vector2;
use std::fmt;

/// Direction a dog can be sent in. Facing "no direction" is `Option::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "U")]
    Up,
    #[serde(rename = "R")]
    Right,
    #[serde(rename = "D")]
    Down,
    #[serde(rename = "L")]
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Parses a move token. Anything but `U`, `R`, `D`, `L` means stop.
    pub fn from_code(code: &str) -> Option<Direction> {
        match code {
            "U" => Some(Direction::Up),
            "R" => Some(Direction::Right),
            "D" => Some(Direction::Down),
            "L" => Some(Direction::Left),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Direction::Up => "U",
            Direction::Right => "R",
            Direction::Down => "D",
            Direction::Left => "L",
        }
    }

    /// Velocity for moving this way at `speed`. Y grows downward.
    pub fn velocity(self, speed: f64) -> Vector2 {
        match self {
            Direction::Up => Vector2::new(0.0, -speed),
            Direction::Right => Vector2::new(speed, 0.0),
            Direction::Down => Vector2::new(0.0, speed),
            Direction::Left => Vector2::new(-speed, 0.0),
        }
    }

    /// Picks one of the four directions or "stop" with equal probability.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Option<Direction> {
        let index = rng.gen_range(0..=Self::ALL.len());
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Serde adapter writing a facing as its code, with `""` for no direction.
pub mod facing_code {
    use super::*;

    pub fn serialize<S: Serializer>(facing: &Option<Direction>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(facing.map_or("", Direction::code))
    }

    /// Unlike move commands, a reported facing must be one of the known codes.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Direction>, D::Error> {
        let code = String::deserialize(d)?;
        if code.is_empty() {
            return Ok(None);
        }
        Direction::from_code(&code)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown direction {:?}", code)))
    }
}
