//! Map catalogue and game config as read from the server's JSON config file.

use crate::geometry::Point;
use crate::road::RoadSegment;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Dog speed used when neither the config nor the map specifies one.
pub const DEFAULT_DOG_SPEED: f64 = 1.0;

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("map {map}: road #{index} has neither x1 nor y1")]
    MissingEndpoint { map: String, index: usize },

    #[error("map {map}: road #{index} is not axis-aligned")]
    NotAxisAligned { map: String, index: usize },

    #[error("invalid dog speed {0}")]
    InvalidSpeed(f64),
}

/// A road entry exactly as it appears in the config file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RawRoad {
    pub x0: f64,
    pub y0: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y1: Option<f64>,
}

impl RawRoad {
    /// Second endpoint, with the omitted coordinate taken from the start.
    fn end(&self) -> Option<Point> {
        match (self.x1, self.y1) {
            (Some(x1), None) => Some(Point::new(x1, self.y0)),
            (None, Some(y1)) => Some(Point::new(self.x0, y1)),
            (Some(x1), Some(y1)) => Some(Point::new(x1, y1)),
            (None, None) => None,
        }
    }

    pub fn to_segment(&self, map: &str, index: usize) -> Result<RoadSegment, MapError> {
        let start = Point::new(self.x0, self.y0);
        let end = self.end().ok_or_else(|| MapError::MissingEndpoint {
            map: map.to_string(),
            index,
        })?;

        if start.x != end.x && start.y != end.y {
            return Err(MapError::NotAxisAligned {
                map: map.to_string(),
                index,
            });
        }

        Ok(RoadSegment { start, end })
    }
}

impl From<RoadSegment> for RawRoad {
    fn from(segment: RoadSegment) -> Self {
        let RoadSegment { start, end } = segment;
        if start.y == end.y {
            RawRoad {
                x0: start.x,
                y0: start.y,
                x1: Some(end.x),
                y1: None,
            }
        } else {
            RawRoad {
                x0: start.x,
                y0: start.y,
                x1: None,
                y1: Some(end.y),
            }
        }
    }
}

/// A map as listed in the catalogue. Fields the simulator does not use
/// (buildings, offices, loot) are ignored on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDefinition {
    pub id: String,
    pub name: String,
    pub roads: Vec<RawRoad>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dog_speed: Option<f64>,
}

impl MapDefinition {
    pub fn segments(&self) -> Result<Vec<RoadSegment>, MapError> {
        self.roads
            .iter()
            .enumerate()
            .map(|(index, road)| road.to_segment(&self.id, index))
            .collect()
    }

    fn validate(&self) -> Result<(), MapError> {
        self.segments()?;
        if let Some(speed) = self.dog_speed {
            check_speed(speed)?;
        }
        Ok(())
    }
}

/// `{id, name}` entry of the map list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapSummary {
    pub id: String,
    pub name: String,
}

/// The top-level game config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_dog_speed: Option<f64>,
    #[serde(default)]
    pub maps: Vec<MapDefinition>,
}

impl GameConfig {
    /// Reads and validates a config file. Any failure is fatal for the caller.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, MapError> {
        let config: GameConfig = serde_json::from_str(text)?;
        if let Some(speed) = config.default_dog_speed {
            check_speed(speed)?;
        }
        for map in &config.maps {
            map.validate()?;
        }
        Ok(config)
    }

    pub fn default_speed(&self) -> f64 {
        self.default_dog_speed.unwrap_or(DEFAULT_DOG_SPEED)
    }

    pub fn map(&self, id: &str) -> Option<&MapDefinition> {
        self.maps.iter().find(|m| m.id == id)
    }

    pub fn summaries(&self) -> Vec<MapSummary> {
        self.maps
            .iter()
            .map(|m| MapSummary {
                id: m.id.clone(),
                name: m.name.clone(),
            })
            .collect()
    }
}

fn check_speed(speed: f64) -> Result<(), MapError> {
    if speed.is_finite() && speed >= 0.0 {
        Ok(())
    } else {
        Err(MapError::InvalidSpeed(speed))
    }
}
