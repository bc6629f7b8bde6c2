//! Types shared between the movement simulator and its test drivers:
//! geometry primitives, road corridors and the map catalogue.

pub mod geometry;
pub mod map;
pub mod road;

pub use geometry::{distance, Point, Vector2};
pub use map::{GameConfig, MapDefinition, MapError, MapSummary, RawRoad, DEFAULT_DOG_SPEED};
pub use road::{normalize, Orientation, Road, RoadSegment, ROAD_HALF_WIDTH};
