//! Spawn point selection for runs without a real server to ask.

use rand::seq::SliceRandom;
use rand::Rng;
use shared::{Point, RoadSegment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpawnPolicy {
    /// Start point of the first road on the map.
    #[default]
    FirstRoadStart,
    /// Uniform point along a randomly chosen road.
    Random,
}

impl SpawnPolicy {
    pub fn spawn_point<R: Rng + ?Sized>(self, roads: &[RoadSegment], rng: &mut R) -> Option<Point> {
        match self {
            SpawnPolicy::FirstRoadStart => roads.first().map(|road| road.start),
            SpawnPolicy::Random => roads.choose(rng).map(|road| random_point_on(road, rng)),
        }
    }
}

fn random_point_on<R: Rng + ?Sized>(road: &RoadSegment, rng: &mut R) -> Point {
    let t: f64 = rng.gen_range(0.0..=1.0);
    Point::new(
        road.start.x + (road.end.x - road.start.x) * t,
        road.start.y + (road.end.y - road.start.y) * t,
    )
}
