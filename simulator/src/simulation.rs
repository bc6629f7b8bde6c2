//! Top-level simulator: the map catalogue plus one session per joined map.
//!
//! Method names mirror the game server's API (`join`, `move`, `tick`,
//! `get_state`) so a test can drive both in lockstep and diff the results.

use crate::direction::Direction;
use crate::player::{Player, PlayerId};
use crate::session::GameSession;
use crate::state::{PlayerState, SessionState};
use shared::{GameConfig, MapDefinition, MapError, MapSummary, Point};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("no such map: {0}")]
    UnknownMap(String),

    #[error("token {0} is already in use")]
    DuplicateToken(String),

    #[error("player id {id} already joined map {map}")]
    DuplicatePlayerId { map: String, id: PlayerId },

    #[error(transparent)]
    Map(#[from] MapError),
}

/// Position of a player: session index, then index within the session.
#[derive(Debug, Clone, Copy)]
struct Seat {
    session: usize,
    player: usize,
}

pub struct Simulation {
    config: GameConfig,
    default_speed: f64,
    /// Sessions in creation order.
    sessions: Vec<GameSession>,
    /// Map id to index in `sessions`.
    session_index: HashMap<String, usize>,
    /// Auth token to seat. Players never leave, so seats stay valid.
    seats: HashMap<String, Seat>,
}

impl Simulation {
    ///Creates a simulation with no sessions over the given map catalogue.
    pub fn new(config: GameConfig) -> Self {
        let default_speed = config.default_speed();
        Self {
            config,
            default_speed,
            sessions: Vec::new(),
            session_index: HashMap::new(),
            seats: HashMap::new(),
        }
    }

    ///Loads the catalogue from a config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MapError> {
        Ok(Self::new(GameConfig::from_file(path)?))
    }

    ///Returns the dog speed for maps without their own.
    pub fn default_speed(&self) -> f64 {
        self.default_speed
    }

    ///Returns the `{id, name}` list of all maps.
    pub fn maps(&self) -> Vec<MapSummary> {
        self.config.summaries()
    }

    ///Returns the full definition of a map.
    pub fn map(&self, map_id: &str) -> Option<&MapDefinition> {
        self.config.map(map_id)
    }

    ///Returns sessions in creation order.
    pub fn sessions(&self) -> &[GameSession] {
        &self.sessions
    }

    ///Returns the session for a map, if anyone joined it.
    pub fn session(&self, map_id: &str) -> Option<&GameSession> {
        self.session_index.get(map_id).map(|&i| &self.sessions[i])
    }

    /// Adds a player to the session for `map_id`, creating the session on
    /// first join. The spawn point is whatever the server under test chose.
    pub fn join(
        &mut self,
        name: &str,
        map_id: &str,
        token: &str,
        id: PlayerId,
        spawn: Point,
    ) -> Result<(), SimulationError> {
        if self.seats.contains_key(token) {
            return Err(SimulationError::DuplicateToken(token.to_string()));
        }

        let session = match self.session_index.get(map_id) {
            Some(&index) => index,
            None => {
                let map = self
                    .config
                    .map(map_id)
                    .ok_or_else(|| SimulationError::UnknownMap(map_id.to_string()))?;
                let session = GameSession::new(map, self.default_speed)?;
                self.sessions.push(session);
                let index = self.sessions.len() - 1;
                self.session_index.insert(map_id.to_string(), index);
                index
            }
        };

        if self.sessions[session].player_ids().any(|existing| existing == id) {
            return Err(SimulationError::DuplicatePlayerId {
                map: map_id.to_string(),
                id,
            });
        }

        let player = self.sessions[session].add_player(Player::new(id, name, token, spawn));
        self.seats
            .insert(token.to_string(), Seat { session, player });
        Ok(())
    }

    /// Changes a player's direction. Returns false if the token is unknown.
    pub fn move_player(&mut self, token: &str, direction: Option<Direction>) -> bool {
        match self.seats.get(token) {
            Some(seat) => self.sessions[seat.session].set_direction(seat.player, direction),
            None => false,
        }
    }

    /// Advances every session by `delta_ms` milliseconds.
    pub fn tick(&mut self, delta_ms: u64) {
        for session in &mut self.sessions {
            session.tick(delta_ms);
        }
    }

    /// State of the whole session the token's player belongs to.
    pub fn get_state(&self, token: &str) -> Option<SessionState> {
        let seat = self.seats.get(token)?;
        Some(self.sessions[seat.session].state())
    }

    ///Returns the state of the token's own player.
    pub fn player_state(&self, token: &str) -> Option<PlayerState> {
        self.player(token).map(Player::state)
    }

    ///Returns the player owning the token.
    pub fn player(&self, token: &str) -> Option<&Player> {
        let seat = self.seats.get(token)?;
        self.sessions[seat.session].player(seat.player)
    }
}
