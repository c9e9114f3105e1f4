//! Match score

use serde::{Deserialize, Serialize};

use super::actor::Player;

/// Points per player, indexed by `Player::index`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    points: [u32; 2],
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, player: Player) -> u32 {
        self.points[player.index()]
    }

    /// Give one point to `player`
    pub fn award(&mut self, player: Player) {
        self.points[player.index()] += 1;
    }

    /// HUD text, left player first
    pub fn label(&self) -> String {
        format!("{}:{}", self.points[0], self.points[1])
    }
}
