//! An in-memory world with terrain and entities but no physics.
//!
//! Entities stay where they are put; commands only flip their movement
//! flags. This is enough to drive scripts in tests and in the sandbox host,
//! where the host itself moves things between ticks when it wants to.

use crate::{CapabilityError, Duckable, Jumpable, Movable, Rect, TerrainKind, World, WorldEntity};
use serde::{Deserialize, Serialize};
use slime_types::{Direction, EntityId, EntityKind};
use thiserror::Error;

/// Which capability traits an entity exposes. Fixed at spawn time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySet {
    pub movable: bool,
    pub jumpable: bool,
    pub duckable: bool,
}

impl CapabilitySet {
    /// The capabilities each species has in the game.
    pub fn for_kind(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Player | EntityKind::Rival => Self {
                movable: true,
                jumpable: true,
                duckable: true,
            },
            EntityKind::Shark => Self {
                movable: true,
                jumpable: true,
                duckable: false,
            },
            EntityKind::Slime | EntityKind::Plant => Self {
                movable: true,
                jumpable: false,
                duckable: false,
            },
        }
    }
}

/// One entity of the sandbox world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SandboxEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub bounds: Rect,
    pub hit_points: f64,
    pub moving: Option<Direction>,
    pub jumping: bool,
    pub ducking: bool,
    pub capabilities: CapabilitySet,
}

impl SandboxEntity {
    pub fn new(id: EntityId, kind: EntityKind, bounds: Rect, hit_points: f64) -> Self {
        Self {
            id,
            kind,
            bounds,
            hit_points,
            moving: None,
            jumping: false,
            ducking: false,
            capabilities: CapabilitySet::for_kind(kind),
        }
    }

    fn ensure_alive(&self) -> Result<(), CapabilityError> {
        if self.hit_points <= 0.0 {
            Err(CapabilityError::Dead)
        } else {
            Ok(())
        }
    }
}

impl WorldEntity for SandboxEntity {
    fn kind(&self) -> EntityKind {
        self.kind
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn hit_points(&self) -> f64 {
        self.hit_points
    }

    fn movable(&self) -> Option<&dyn Movable> {
        self.capabilities.movable.then_some(self as &dyn Movable)
    }

    fn movable_mut(&mut self) -> Option<&mut dyn Movable> {
        if self.capabilities.movable {
            Some(self as &mut dyn Movable)
        } else {
            None
        }
    }

    fn jumpable(&self) -> Option<&dyn Jumpable> {
        self.capabilities.jumpable.then_some(self as &dyn Jumpable)
    }

    fn jumpable_mut(&mut self) -> Option<&mut dyn Jumpable> {
        if self.capabilities.jumpable {
            Some(self as &mut dyn Jumpable)
        } else {
            None
        }
    }

    fn duckable(&self) -> Option<&dyn Duckable> {
        self.capabilities.duckable.then_some(self as &dyn Duckable)
    }

    fn duckable_mut(&mut self) -> Option<&mut dyn Duckable> {
        if self.capabilities.duckable {
            Some(self as &mut dyn Duckable)
        } else {
            None
        }
    }
}

impl Movable for SandboxEntity {
    fn moving_direction(&self) -> Option<Direction> {
        self.moving
    }

    fn start_move(&mut self, direction: Direction) -> Result<(), CapabilityError> {
        self.ensure_alive()?;
        if !direction.is_horizontal() {
            return Err(CapabilityError::InvalidDirection(direction));
        }
        self.moving = Some(direction);
        Ok(())
    }

    fn end_move(&mut self, direction: Direction) -> Result<(), CapabilityError> {
        if self.moving != Some(direction) {
            return Err(CapabilityError::NotMoving(direction));
        }
        self.moving = None;
        Ok(())
    }
}

impl Jumpable for SandboxEntity {
    fn is_jumping(&self) -> bool {
        self.jumping
    }

    fn start_jump(&mut self) -> Result<(), CapabilityError> {
        self.ensure_alive()?;
        if self.jumping {
            return Err(CapabilityError::AlreadyJumping);
        }
        self.jumping = true;
        Ok(())
    }

    fn end_jump(&mut self) -> Result<(), CapabilityError> {
        if !self.jumping {
            return Err(CapabilityError::NotJumping);
        }
        self.jumping = false;
        Ok(())
    }
}

impl Duckable for SandboxEntity {
    fn is_ducking(&self) -> bool {
        self.ducking
    }

    fn start_duck(&mut self) -> Result<(), CapabilityError> {
        self.ensure_alive()?;
        if self.ducking {
            return Err(CapabilityError::AlreadyDucking);
        }
        self.ducking = true;
        Ok(())
    }

    fn end_duck(&mut self) -> Result<(), CapabilityError> {
        if !self.ducking {
            return Err(CapabilityError::NotDucking);
        }
        self.ducking = false;
        Ok(())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Layout loading
// ══════════════════════════════════════════════════════════════════════════════

/// Errors loading a world layout.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("unknown terrain character {0:?} (expected one of . # ~ ^)")]
    UnknownTerrain(char),
    #[error("terrain row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("tile size must be a positive finite number, got {0}")]
    InvalidTileSize(f64),
    #[error("invalid layout JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The JSON shape of a sandbox world.
///
/// `terrain` lists rows top row first, one character per tile:
/// `.` air, `#` solid, `~` water, `^` magma.
#[derive(Debug, Clone, Deserialize)]
pub struct WorldLayout {
    #[serde(default = "default_tile_size")]
    pub tile_size: f64,
    pub terrain: Vec<String>,
    #[serde(default)]
    pub entities: Vec<EntityLayout>,
}

/// One entity in a [`WorldLayout`]. Ids are assigned in listing order.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityLayout {
    pub kind: EntityKind,
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_entity_extent")]
    pub width: f64,
    #[serde(default = "default_entity_extent")]
    pub height: f64,
    #[serde(default = "default_hit_points")]
    pub hit_points: f64,
}

fn default_tile_size() -> f64 {
    10.0
}

fn default_entity_extent() -> f64 {
    10.0
}

fn default_hit_points() -> f64 {
    100.0
}

fn terrain_from_char(c: char) -> Result<TerrainKind, LayoutError> {
    match c {
        '.' => Ok(TerrainKind::Air),
        '#' => Ok(TerrainKind::Solid),
        '~' => Ok(TerrainKind::Water),
        '^' => Ok(TerrainKind::Magma),
        other => Err(LayoutError::UnknownTerrain(other)),
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// SandboxWorld
// ══════════════════════════════════════════════════════════════════════════════

/// A grid of terrain plus a list of entities.
#[derive(Debug, Clone)]
pub struct SandboxWorld {
    tile_size: f64,
    columns: i32,
    rows: i32,
    /// Row-major from the bottom-left tile.
    tiles: Vec<TerrainKind>,
    entities: Vec<SandboxEntity>,
    next_id: u32,
}

impl SandboxWorld {
    /// An all-air world of `columns` x `rows` tiles.
    pub fn new(tile_size: f64, columns: i32, rows: i32) -> Result<Self, LayoutError> {
        if !(tile_size.is_finite() && tile_size > 0.0) {
            return Err(LayoutError::InvalidTileSize(tile_size));
        }
        let columns = columns.max(0);
        let rows = rows.max(0);
        Ok(Self {
            tile_size,
            columns,
            rows,
            tiles: vec![TerrainKind::Air; (columns * rows) as usize],
            entities: Vec::new(),
            next_id: 1,
        })
    }

    /// Build a world from terrain rows, top row first (see [`WorldLayout`]).
    pub fn from_rows<S: AsRef<str>>(tile_size: f64, rows: &[S]) -> Result<Self, LayoutError> {
        let columns = rows.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);
        let mut world = Self::new(tile_size, columns as i32, rows.len() as i32)?;
        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != columns {
                return Err(LayoutError::RaggedRow {
                    row: row_index,
                    found,
                    expected: columns,
                });
            }
            let y = (rows.len() - 1 - row_index) as i32;
            for (x, c) in row.chars().enumerate() {
                world.set_terrain(x as i32, y, terrain_from_char(c)?);
            }
        }
        Ok(world)
    }

    pub fn from_layout(layout: &WorldLayout) -> Result<Self, LayoutError> {
        let mut world = Self::from_rows(layout.tile_size, &layout.terrain)?;
        for e in &layout.entities {
            world.spawn(e.kind, Rect::new(e.x, e.y, e.width, e.height), e.hit_points);
        }
        Ok(world)
    }

    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let layout: WorldLayout = serde_json::from_str(json)?;
        Self::from_layout(&layout)
    }

    /// Add an entity and return its id. Ids are never reused.
    pub fn spawn(&mut self, kind: EntityKind, bounds: Rect, hit_points: f64) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        log::debug!("spawned {kind} {id} at ({}, {})", bounds.x, bounds.y);
        self.entities
            .push(SandboxEntity::new(id, kind, bounds, hit_points));
        id
    }

    /// Remove an entity, as the simulation does when something dies off-screen.
    pub fn remove(&mut self, id: EntityId) -> Option<SandboxEntity> {
        let index = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(index))
    }

    /// Concrete view of an entity, for hosts and tests.
    pub fn get(&self, id: EntityId) -> Option<&SandboxEntity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut SandboxEntity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn entities(&self) -> &[SandboxEntity] {
        &self.entities
    }

    /// Teleport an entity. Returns `false` if it does not exist.
    pub fn place(&mut self, id: EntityId, x: f64, y: f64) -> bool {
        match self.get_mut(id) {
            Some(e) => {
                e.bounds.x = x;
                e.bounds.y = y;
                true
            }
            None => false,
        }
    }

    /// Set a tile's terrain; ignored outside the grid.
    pub fn set_terrain(&mut self, tile_x: i32, tile_y: i32, kind: TerrainKind) {
        if let Some(index) = self.index_of(tile_x, tile_y) {
            self.tiles[index] = kind;
        }
    }

    fn index_of(&self, tile_x: i32, tile_y: i32) -> Option<usize> {
        if tile_x < 0 || tile_y < 0 || tile_x >= self.columns || tile_y >= self.rows {
            None
        } else {
            Some((tile_y * self.columns + tile_x) as usize)
        }
    }
}

impl World for SandboxWorld {
    fn entity_ids(&self) -> Vec<EntityId> {
        self.entities.iter().map(|e| e.id).collect()
    }

    fn entity(&self, id: EntityId) -> Option<&dyn WorldEntity> {
        self.get(id).map(|e| e as &dyn WorldEntity)
    }

    fn entity_mut(&mut self, id: EntityId) -> Option<&mut dyn WorldEntity> {
        self.get_mut(id).map(|e| e as &mut dyn WorldEntity)
    }

    fn tile_size(&self) -> f64 {
        self.tile_size
    }

    fn tile_bounds(&self) -> (i32, i32) {
        (self.columns, self.rows)
    }

    fn terrain_at(&self, tile_x: i32, tile_y: i32) -> Option<TerrainKind> {
        self.index_of(tile_x, tile_y).map(|i| self.tiles[i])
    }
}
