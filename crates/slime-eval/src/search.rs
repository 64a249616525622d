//! `searchobj`: the nearest obstacle on one side of the commanding entity.

use crate::error::{EvalError, EvalResult};
use slime_types::{Direction, EntityId, ObjectRef};
use slime_world::{Rect, World};

pub use slime_world::overlaps;

/// Distance from `from` to `other` along the axis `direction` runs on,
/// measured between bottom-left corners.
pub fn distance(from: &Rect, other: &Rect, direction: Direction) -> f64 {
    (other.position_along(direction) - from.position_along(direction)).abs()
}

/// Whether `other` lies strictly on the `direction` side of `from`.
pub fn lies_in_direction(from: &Rect, other: &Rect, direction: Direction) -> bool {
    match direction {
        Direction::Right => other.x > from.x,
        Direction::Left => other.x < from.x,
        Direction::Up => other.y > from.y,
        Direction::Down => other.y < from.y,
    }
}

/// Find the closest entity or solid tile seen from `this` looking `direction`.
///
/// Ties go to the earliest candidate: entities in world order, then tiles
/// row-major from the bottom-left.
pub fn search_object(world: &dyn World, this: EntityId, direction: Direction) -> EvalResult<ObjectRef> {
    let origin = world
        .entity(this)
        .ok_or_else(|| EvalError::UnknownObject(format!("{this} is no longer in the world")))?
        .bounds();

    let entities = world
        .entity_ids()
        .into_iter()
        .filter(|id| *id != this)
        .filter_map(|id| world.entity(id).map(|e| (ObjectRef::Entity(id), e.bounds())));
    let solid_tiles = world.tiles().into_iter().filter_map(|tile| match tile {
        ObjectRef::Tile { x, y } => match world.terrain_at(x, y) {
            Some(terrain) if !terrain.is_passable() => Some((tile, world.tile_rect(x, y))),
            _ => None,
        },
        ObjectRef::Entity(_) => None,
    });

    let mut best: Option<(f64, ObjectRef)> = None;
    for (object, rect) in entities.chain(solid_tiles) {
        if !lies_in_direction(&origin, &rect, direction) || !origin.overlaps_across(&rect, direction) {
            continue;
        }
        let d = distance(&origin, &rect, direction);
        if best.map_or(true, |(best_d, _)| d < best_d) {
            best = Some((d, object));
        }
    }

    best.map(|(_, object)| object)
        .ok_or(EvalError::NothingFound(direction))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_uses_query_axis() {
        let e = Rect::new(250.0, 40.0, 10.0, 10.0);
        let o = Rect::new(80.0, 45.0, 10.0, 10.0);
        assert_eq!(distance(&e, &o, Direction::Left), 170.0);
        assert_eq!(distance(&e, &o, Direction::Up), 5.0);
    }

    #[test]
    fn test_lies_in_direction_is_strict() {
        let e = Rect::new(10.0, 10.0, 5.0, 5.0);
        let same = Rect::new(10.0, 10.0, 5.0, 5.0);
        for dir in [Direction::Left, Direction::Right, Direction::Up, Direction::Down] {
            assert!(!lies_in_direction(&e, &same, dir));
        }
        assert!(lies_in_direction(&e, &Rect::new(11.0, 0.0, 1.0, 1.0), Direction::Right));
        assert!(lies_in_direction(&e, &Rect::new(9.0, 0.0, 1.0, 1.0), Direction::Left));
        assert!(lies_in_direction(&e, &Rect::new(0.0, 11.0, 1.0, 1.0), Direction::Up));
        assert!(lies_in_direction(&e, &Rect::new(0.0, 9.0, 1.0, 1.0), Direction::Down));
    }
}
