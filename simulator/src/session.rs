//! One game session per map: its road corridors and the dogs running on them.

use crate::direction::Direction;
use crate::player::{Player, PlayerId};
use crate::state::SessionState;
use log::{info, warn};
use shared::{distance, normalize, MapDefinition, MapError, Point, Road};

#[derive(Debug, Clone)]
pub struct GameSession {
    map_id: String,
    roads: Vec<Road>,
    speed: f64,
    players: Vec<Player>,
}

impl GameSession {
    /// Builds the session's corridors from the map, merging roads first.
    /// The map's own dog speed wins over `default_speed`.
    pub fn new(map: &MapDefinition, default_speed: f64) -> Result<Self, MapError> {
        let segments = map.segments()?;
        let roads: Vec<Road> = normalize(&segments).into_iter().map(Road::new).collect();
        let speed = map.dog_speed.unwrap_or(default_speed);

        info!(
            "Created session for map {} with {} roads ({} before merge), dog speed {}",
            map.id,
            roads.len(),
            segments.len(),
            speed
        );

        Ok(Self {
            map_id: map.id.clone(),
            roads,
            speed,
            players: Vec::new(),
        })
    }

    ///Returns the id of the map this session runs on.
    pub fn map_id(&self) -> &str {
        &self.map_id
    }

    ///Returns the merged road corridors.
    pub fn roads(&self) -> &[Road] {
        &self.roads
    }

    ///Returns the dog speed used for move commands.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    ///Returns the players in join order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Adds a player and returns its index within the session.
    pub fn add_player(&mut self, player: Player) -> usize {
        info!(
            "Player {} ({}) joined map {} at ({}, {})",
            player.id, player.name, self.map_id, player.position.x, player.position.y
        );
        self.players.push(player);
        self.players.len() - 1
    }

    ///Returns the player at `index`, if any.
    pub fn player(&self, index: usize) -> Option<&Player> {
        self.players.get(index)
    }

    ///Applies a move command at the session speed. Returns false for an unknown index.
    pub fn set_direction(&mut self, index: usize, direction: Option<Direction>) -> bool {
        let speed = self.speed;
        match self.players.get_mut(index) {
            Some(player) => {
                player.set_direction(direction, speed);
                true
            }
            None => false,
        }
    }

    /// Advances every moving dog by `delta_ms` milliseconds.
    pub fn tick(&mut self, delta_ms: u64) {
        let dt = delta_ms as f64 / 1000.0;

        for player in &mut self.players {
            if player.velocity.is_zero() {
                continue;
            }

            let start = player.position;
            let target = start + player.velocity * dt;

            let Some(end) = constrain_move(&self.roads, start, target) else {
                warn!(
                    "Player {} is off-road at ({}, {}) on map {}, holding position",
                    player.id, start.x, start.y, self.map_id
                );
                continue;
            };

            player.position = end;
            if !end.is_identical(&target) {
                player.stop_at_boundary();
            }
        }
    }

    ///Returns the state of every player keyed by id.
    pub fn state(&self) -> SessionState {
        SessionState {
            players: self
                .players
                .iter()
                .map(|p| (p.id, p.state()))
                .collect(),
        }
    }

    ///Returns player ids in join order.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.iter().map(|p| p.id)
    }
}

/// Resolves where a dog starting at `start` and heading for `target` ends up.
///
/// Every corridor containing `start` clamps the target; the clamp farthest
/// from `start` wins, earlier roads winning ties. Returns `None` when no
/// corridor contains `start`.
pub fn constrain_move(roads: &[Road], start: Point, target: Point) -> Option<Point> {
    let mut best: Option<(Point, f64)> = None;

    for road in roads.iter().filter(|road| road.is_on_road(start)) {
        let candidate = road.clamp_to_road(target);
        let progress = distance(start, candidate);
        match best {
            Some((_, farthest)) if progress <= farthest => {}
            _ => best = Some((candidate, progress)),
        }
    }

    best.map(|(point, _)| point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use shared::{RawRoad, RoadSegment};

    fn map(roads: Vec<RoadSegment>, dog_speed: Option<f64>) -> MapDefinition {
        MapDefinition {
            id: "map1".to_string(),
            name: "Map 1".to_string(),
            roads: roads.into_iter().map(RawRoad::from).collect(),
            dog_speed,
        }
    }

    fn corner_map() -> MapDefinition {
        map(
            vec![
                RoadSegment::horizontal(0.0, 0.0, 40.0),
                RoadSegment::vertical(40.0, 0.0, 30.0),
            ],
            None,
        )
    }

    fn session_with_player(map: &MapDefinition, spawn: Point) -> GameSession {
        let mut session = GameSession::new(map, 1.0).unwrap();
        session.add_player(Player::new(0, "Rex", "token", spawn));
        session
    }

    #[test]
    fn test_session_speed() {
        let plain = GameSession::new(&corner_map(), 2.0).unwrap();
        assert_eq!(plain.speed(), 2.0);

        let fast = GameSession::new(&map(vec![RoadSegment::horizontal(0.0, 0.0, 1.0)], Some(5.0)), 2.0)
            .unwrap();
        assert_eq!(fast.speed(), 5.0);
    }

    #[test]
    fn test_session_merges_roads() {
        let session = GameSession::new(
            &map(
                vec![
                    RoadSegment::horizontal(0.0, 0.0, 10.0),
                    RoadSegment::horizontal(10.0, 0.0, 20.0),
                ],
                None,
            ),
            1.0,
        )
        .unwrap();
        assert_eq!(session.roads().len(), 1);
        assert_approx_eq!(session.roads()[0].right(), 20.4);
    }

    #[test]
    fn test_sessions_do_not_share_players() {
        let map = corner_map();
        let mut a = GameSession::new(&map, 1.0).unwrap();
        let b = GameSession::new(&map, 1.0).unwrap();
        a.add_player(Player::new(0, "Rex", "t0", Point::default()));
        assert_eq!(a.players().len(), 1);
        assert!(b.players().is_empty());
    }

    #[test]
    fn test_zero_tick_is_noop() {
        let mut session = session_with_player(&corner_map(), Point::new(3.0, 0.0));
        session.set_direction(0, Some(Direction::Right));
        session.tick(0);
        let player = session.player(0).unwrap();
        assert!(player.position.is_identical(&Point::new(3.0, 0.0)));
        assert_eq!(player.velocity.x, 1.0);
    }

    #[test]
    fn test_unobstructed_move() {
        let mut session = session_with_player(&corner_map(), Point::new(0.0, 0.0));
        session.set_direction(0, Some(Direction::Right));
        session.tick(1000);
        let player = session.player(0).unwrap();
        assert_eq!(player.position, Point::new(1.0, 0.0));
        assert_eq!(player.facing, Some(Direction::Right));
        assert_eq!(player.velocity.x, 1.0);
    }

    #[test]
    fn test_reaching_road_end_exactly_does_not_stop() {
        let road = map(vec![RoadSegment::horizontal(0.0, 0.0, 40.0)], None);
        let mut session = session_with_player(&road, Point::new(0.0, 0.0));
        session.set_direction(0, Some(Direction::Right));
        session.tick(40_000);
        let player = session.player(0).unwrap();
        assert_eq!(player.position, Point::new(40.0, 0.0));
        assert_eq!(player.velocity.x, 1.0);
        assert_eq!(player.facing, Some(Direction::Right));
    }

    #[test]
    fn test_overshoot_clamps_and_stops() {
        let road = map(vec![RoadSegment::horizontal(0.0, 0.0, 40.0)], None);
        let mut session = session_with_player(&road, Point::new(0.0, 0.0));
        session.set_direction(0, Some(Direction::Right));
        session.tick(60_000);
        let player = session.player(0).unwrap();
        assert_approx_eq!(player.position.x, 40.4);
        assert_approx_eq!(player.position.y, 0.0);
        assert!(player.velocity.is_zero());
        assert_eq!(player.facing, None);
    }

    #[test]
    fn test_moving_across_narrow_road_stops_at_edge() {
        let road = map(vec![RoadSegment::horizontal(0.0, 0.0, 40.0)], None);
        let mut session = session_with_player(&road, Point::new(10.0, 0.0));
        session.set_direction(0, Some(Direction::Up));
        session.tick(1000);
        let player = session.player(0).unwrap();
        assert_approx_eq!(player.position.x, 10.0);
        assert_approx_eq!(player.position.y, -0.4);
        assert!(player.velocity.is_zero());
    }

    #[test]
    fn test_intersection_picks_farthest_corridor() {
        // Standing at the corner, heading down: the horizontal corridor only
        // allows 0.4, the vertical one allows the full step.
        let mut session = session_with_player(&corner_map(), Point::new(40.0, 0.0));
        session.set_direction(0, Some(Direction::Down));
        session.tick(5000);
        let player = session.player(0).unwrap();
        assert_eq!(player.position, Point::new(40.0, 5.0));
        assert_eq!(player.velocity, shared::Vector2::new(0.0, 1.0));
    }

    #[test]
    fn test_turning_at_corner_sequentially() {
        let mut session = session_with_player(&corner_map(), Point::new(0.0, 0.0));
        session.set_direction(0, Some(Direction::Right));
        session.tick(40_000);
        session.set_direction(0, Some(Direction::Down));
        session.tick(10_000);
        let player = session.player(0).unwrap();
        assert_eq!(player.position, Point::new(40.0, 10.0));

        session.tick(30_000);
        let player = session.player(0).unwrap();
        assert_approx_eq!(player.position.y, 30.4);
        assert!(player.velocity.is_zero());
    }

    #[test]
    fn test_off_road_player_holds_position() {
        let mut session = session_with_player(&corner_map(), Point::new(20.0, 20.0));
        session.set_direction(0, Some(Direction::Left));
        session.tick(1000);
        let player = session.player(0).unwrap();
        assert!(player.position.is_identical(&Point::new(20.0, 20.0)));
        assert_eq!(player.velocity.x, -1.0);
        assert_eq!(player.facing, Some(Direction::Left));
    }

    #[test]
    fn test_constrain_move_tie_prefers_first_road() {
        let roads = vec![
            Road::with_half_width(RoadSegment::horizontal(0.0, 0.0, 10.0), 0.5),
            Road::with_half_width(RoadSegment::vertical(5.0, -10.0, 10.0), 0.5),
        ];
        // (8, 0.5) and (5.5, 3) are both exactly sqrt(9.25) from the start.
        let end = constrain_move(&roads, Point::new(5.0, 0.0), Point::new(8.0, 3.0)).unwrap();
        assert!(end.is_identical(&Point::new(8.0, 0.5)));

        assert!(constrain_move(&roads, Point::new(8.0, 3.0), Point::new(9.0, 3.0)).is_none());
    }

    #[test]
    fn test_state_keyed_by_id() {
        let mut session = GameSession::new(&corner_map(), 1.0).unwrap();
        session.add_player(Player::new(4, "a", "t4", Point::new(1.0, 0.0)));
        session.add_player(Player::new(9, "b", "t9", Point::new(40.0, 3.0)));
        let state = session.state();
        assert_eq!(state.players.len(), 2);
        assert_eq!(state.players[&9].pos, Point::new(40.0, 3.0));
        assert_eq!(session.player_ids().collect::<Vec<_>>(), vec![4, 9]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn grid() -> Vec<Road> {
            let mut segments = Vec::new();
            for i in 0..4u8 {
                let c = f64::from(i) * 10.0;
                segments.push(RoadSegment::horizontal(0.0, c, 30.0));
                segments.push(RoadSegment::vertical(c, 0.0, 30.0));
            }
            segments.into_iter().map(Road::new).collect()
        }

        fn direction() -> impl Strategy<Value = Direction> {
            prop_oneof![
                Just(Direction::Up),
                Just(Direction::Right),
                Just(Direction::Down),
                Just(Direction::Left),
            ]
        }

        proptest! {
            #[test]
            fn moves_stay_on_road_and_never_overshoot(
                lane in 0u8..4,
                along in 0.0f64..30.0,
                horizontal in any::<bool>(),
                direction in direction(),
                speed in 0.1f64..10.0,
                delta_ms in 0u64..20_000,
            ) {
                let roads = grid();
                let lane = f64::from(lane) * 10.0;
                let start = if horizontal { Point::new(along, lane) } else { Point::new(lane, along) };
                let target = start + direction.velocity(speed) * (delta_ms as f64 / 1000.0);

                let end = constrain_move(&roads, start, target).unwrap();

                prop_assert!(roads.iter().any(|r| r.is_on_road(end)));
                prop_assert!(distance(start, end) <= distance(start, target) + 1e-9);

                let best = roads
                    .iter()
                    .filter(|r| r.is_on_road(start))
                    .map(|r| distance(start, r.clamp_to_road(target)))
                    .fold(0.0f64, f64::max);
                prop_assert!((distance(start, end) - best).abs() <= 1e-9);
            }

            #[test]
            fn clamped_tick_always_stops(
                along in 0.0f64..30.0,
                direction in direction(),
                delta_ms in 0u64..60_000,
            ) {
                let segments: Vec<RoadSegment> = vec![RoadSegment::horizontal(0.0, 0.0, 30.0)];
                let map = MapDefinition {
                    id: "m".into(),
                    name: "M".into(),
                    roads: segments.into_iter().map(RawRoad::from).collect(),
                    dog_speed: None,
                };
                let mut session = GameSession::new(&map, 1.0).unwrap();
                session.add_player(Player::new(0, "p", "t", Point::new(along, 0.0)));
                session.set_direction(0, Some(direction));

                let start = session.player(0).unwrap().position;
                let target = start + session.player(0).unwrap().velocity * (delta_ms as f64 / 1000.0);
                session.tick(delta_ms);
                let player = session.player(0).unwrap();

                if !player.position.is_identical(&target) {
                    prop_assert!(player.velocity.is_zero());
                    prop_assert_eq!(player.facing, None);
                } else {
                    prop_assert!(!player.velocity.is_zero());
                }
            }
        }
    }
}
