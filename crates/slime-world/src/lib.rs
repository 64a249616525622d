//! The world as seen by Slime scripts.
//!
//! The interpreter never owns the simulation. It reads and commands it
//! through the narrow traits defined here: [`World`] for enumeration and
//! terrain, [`WorldEntity`] for per-entity attributes, and the capability
//! traits [`Movable`], [`Jumpable`] and [`Duckable`] for commands.
//!
//! Capabilities are exposed through accessor methods that return `None` when
//! an entity lacks them, so new entity kinds plug in without the interpreter
//! knowing their concrete types.

mod geometry;
pub mod sandbox;

pub use geometry::{overlaps, Rect};
pub use sandbox::{SandboxEntity, SandboxWorld};

use serde::{Deserialize, Serialize};
use slime_types::{Direction, EntityId, EntityKind, ObjectKind, ObjectRef};
use thiserror::Error;

/// Classification of a terrain tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainKind {
    #[default]
    Air,
    Solid,
    Water,
    Magma,
}

impl TerrainKind {
    /// Entities can move through every tile except solid ground.
    pub fn is_passable(self) -> bool {
        self != TerrainKind::Solid
    }
}

/// A command an entity refused in its current state.
///
/// The simulation reports these; scripts never see them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CapabilityError {
    #[error("cannot run {0}")]
    InvalidDirection(Direction),
    #[error("not moving {0}")]
    NotMoving(Direction),
    #[error("already jumping")]
    AlreadyJumping,
    #[error("not jumping")]
    NotJumping,
    #[error("already ducking")]
    AlreadyDucking,
    #[error("not ducking")]
    NotDucking,
    #[error("entity is dead")]
    Dead,
}

/// Horizontal movement.
pub trait Movable {
    fn moving_direction(&self) -> Option<Direction>;
    fn start_move(&mut self, direction: Direction) -> Result<(), CapabilityError>;
    fn end_move(&mut self, direction: Direction) -> Result<(), CapabilityError>;
}

pub trait Jumpable {
    fn is_jumping(&self) -> bool;
    fn start_jump(&mut self) -> Result<(), CapabilityError>;
    fn end_jump(&mut self) -> Result<(), CapabilityError>;
}

pub trait Duckable {
    fn is_ducking(&self) -> bool;
    fn start_duck(&mut self) -> Result<(), CapabilityError>;
    fn end_duck(&mut self) -> Result<(), CapabilityError>;
}

/// Read access to one entity, plus its capability set.
pub trait WorldEntity {
    fn kind(&self) -> EntityKind;

    /// Bounding rectangle in world pixels.
    fn bounds(&self) -> Rect;

    fn hit_points(&self) -> f64;

    fn is_dead(&self) -> bool {
        self.hit_points() <= 0.0
    }

    fn movable(&self) -> Option<&dyn Movable> {
        None
    }

    fn movable_mut(&mut self) -> Option<&mut dyn Movable> {
        None
    }

    fn jumpable(&self) -> Option<&dyn Jumpable> {
        None
    }

    fn jumpable_mut(&mut self) -> Option<&mut dyn Jumpable> {
        None
    }

    fn duckable(&self) -> Option<&dyn Duckable> {
        None
    }

    fn duckable_mut(&mut self) -> Option<&mut dyn Duckable> {
        None
    }
}

/// The simulated world, as far as scripts are concerned.
///
/// Tile `(0, 0)` is the bottom-left tile; tile `(x, y)` covers pixels
/// `[x * tile_size, (x + 1) * tile_size)` horizontally and likewise
/// vertically.
pub trait World {
    /// Ids of every live entity, in a stable order.
    fn entity_ids(&self) -> Vec<EntityId>;

    /// `None` when the entity no longer exists.
    fn entity(&self, id: EntityId) -> Option<&dyn WorldEntity>;

    fn entity_mut(&mut self, id: EntityId) -> Option<&mut dyn WorldEntity>;

    /// Edge length of a square tile in pixels.
    fn tile_size(&self) -> f64;

    /// Number of tile columns and rows.
    fn tile_bounds(&self) -> (i32, i32);

    /// `None` outside the world.
    fn terrain_at(&self, tile_x: i32, tile_y: i32) -> Option<TerrainKind>;

    /// Every tile, row-major from the bottom-left.
    fn tiles(&self) -> Vec<ObjectRef> {
        let (columns, rows) = self.tile_bounds();
        let mut tiles = Vec::with_capacity((columns.max(0) * rows.max(0)) as usize);
        for y in 0..rows {
            for x in 0..columns {
                tiles.push(ObjectRef::Tile { x, y });
            }
        }
        tiles
    }

    /// Every object of `kind`: entities in [`World::entity_ids`] order,
    /// followed by tiles when the kind includes terrain.
    fn objects_of_kind(&self, kind: ObjectKind) -> Vec<ObjectRef> {
        let mut objects: Vec<ObjectRef> = self
            .entity_ids()
            .into_iter()
            .filter(|id| {
                self.entity(*id)
                    .is_some_and(|e| kind.includes_entity(e.kind()))
            })
            .map(ObjectRef::Entity)
            .collect();
        if kind.includes_tiles() {
            objects.extend(self.tiles());
        }
        objects
    }

    /// Pixel rectangle of a tile.
    fn tile_rect(&self, tile_x: i32, tile_y: i32) -> Rect {
        let size = self.tile_size();
        Rect::new(tile_x as f64 * size, tile_y as f64 * size, size, size)
    }
}
