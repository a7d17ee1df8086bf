//! Player identity.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::PlayerId;

/// A player as seen by the backend: a stable id plus a display name.
///
/// Equality and hashing go by `id` only; two tokens issued for the same
/// id refer to the same player even if the display name changed between
/// them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Player {}

impl Hash for Player {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_players_compare_by_id_not_name() {
        let id = PlayerId::random();
        let a = Player::new(id, "alice");
        let b = Player::new(id, "renamed");
        assert_eq!(a, b);

        let c = Player::new(PlayerId::random(), "alice");
        assert_ne!(a, c);
    }

    #[test]
    fn test_player_json_shape() {
        let id: PlayerId = "8a6e0804-2bd0-4672-b79d-d97027f9071a".parse().unwrap();
        let player = Player::new(id, "alice");
        let json: serde_json::Value = serde_json::to_value(&player).unwrap();
        assert_eq!(json["id"], "8a6e0804-2bd0-4672-b79d-d97027f9071a");
        assert_eq!(json["name"], "alice");
    }
}
