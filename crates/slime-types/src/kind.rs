use serde::{Deserialize, Serialize};
use std::fmt;

/// Species of a world entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// The player-controlled alien.
    Player,
    /// The second playable character, usually driven by a script.
    Rival,
    Shark,
    Slime,
    Plant,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Player => "player",
            EntityKind::Rival => "rival",
            EntityKind::Shark => "shark",
            EntityKind::Slime => "slime",
            EntityKind::Plant => "plant",
        };
        f.write_str(name)
    }
}

/// Category a `foreach` loop enumerates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Player,
    Rival,
    Shark,
    Slime,
    Plant,
    /// Every terrain tile.
    Terrain,
    /// Every entity followed by every terrain tile.
    Any,
}

impl ObjectKind {
    /// Whether an entity of `kind` belongs to this category.
    pub fn includes_entity(self, kind: EntityKind) -> bool {
        match self {
            ObjectKind::Any => true,
            ObjectKind::Terrain => false,
            ObjectKind::Player => kind == EntityKind::Player,
            ObjectKind::Rival => kind == EntityKind::Rival,
            ObjectKind::Shark => kind == EntityKind::Shark,
            ObjectKind::Slime => kind == EntityKind::Slime,
            ObjectKind::Plant => kind == EntityKind::Plant,
        }
    }

    pub fn includes_tiles(self) -> bool {
        matches!(self, ObjectKind::Terrain | ObjectKind::Any)
    }
}

impl From<EntityKind> for ObjectKind {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Player => ObjectKind::Player,
            EntityKind::Rival => ObjectKind::Rival,
            EntityKind::Shark => ObjectKind::Shark,
            EntityKind::Slime => ObjectKind::Slime,
            EntityKind::Plant => ObjectKind::Plant,
        }
    }
}
