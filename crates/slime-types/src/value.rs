//! Runtime values of the Slime language.
//!
//! The value set is closed: numbers, booleans, directions and object
//! references. Values are immutable once produced and compare structurally.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four compass directions a script can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Whether this direction runs along the x axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identifier of an entity living in the host world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// A reference to something in the world: an entity or a terrain tile.
///
/// Tiles are addressed by tile coordinates, not pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectRef {
    Entity(EntityId),
    Tile { x: i32, y: i32 },
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectRef::Entity(id) => write!(f, "{id}"),
            ObjectRef::Tile { x, y } => write!(f, "tile({x}, {y})"),
        }
    }
}

/// The static type of a variable. Every [`Value`] has exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarType {
    Number,
    Boolean,
    Direction,
    Object,
}

impl VarType {
    /// The value a declaration of this type starts with when none is given.
    pub fn default_value(self) -> Value {
        match self {
            VarType::Number => Value::Number(0.0),
            VarType::Boolean => Value::Boolean(false),
            VarType::Direction => Value::Direction(Direction::Right),
            VarType::Object => Value::Object(None),
        }
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VarType::Number => "double",
            VarType::Boolean => "bool",
            VarType::Direction => "direction",
            VarType::Object => "object",
        };
        f.write_str(name)
    }
}

/// A runtime value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Value {
    Number(f64),
    Boolean(bool),
    Direction(Direction),
    /// `None` is the script-level `null`.
    Object(Option<ObjectRef>),
}

impl Value {
    pub fn null() -> Self {
        Value::Object(None)
    }

    pub fn entity(id: EntityId) -> Self {
        Value::Object(Some(ObjectRef::Entity(id)))
    }

    pub fn tile(x: i32, y: i32) -> Self {
        Value::Object(Some(ObjectRef::Tile { x, y }))
    }

    pub fn var_type(&self) -> VarType {
        match self {
            Value::Number(_) => VarType::Number,
            Value::Boolean(_) => VarType::Boolean,
            Value::Direction(_) => VarType::Direction,
            Value::Object(_) => VarType::Object,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_direction(&self) -> Option<Direction> {
        match self {
            Value::Direction(d) => Some(*d),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<Direction> for Value {
    fn from(d: Direction) -> Self {
        Value::Direction(d)
    }
}

impl From<ObjectRef> for Value {
    fn from(o: ObjectRef) -> Self {
        Value::Object(Some(o))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Direction(d) => write!(f, "{d}"),
            Value::Object(None) => f.write_str("null"),
            Value::Object(Some(o)) => write!(f, "{o}"),
        }
    }
}
