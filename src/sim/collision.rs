//! Player/obstacle collision detection
//!
//! Plain rectangle overlap. Every obstacle is tested, there is no early exit,
//! so each hit can be reported individually.

use super::state::{Obstacle, Player};

/// IDs of every obstacle the player currently overlaps
pub fn colliding_obstacles(player: &Player, obstacles: &[Obstacle]) -> Vec<u32> {
    obstacles
        .iter()
        .filter(|o| player.rect.overlaps(&o.rect))
        .map(|o| o.id)
        .collect()
}
