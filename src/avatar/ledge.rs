//! Ledge detection: grounded, but nothing left under a slightly shrunk hitbox

use bevy::math::DVec3;

use super::hitbox::Hitbox;
use crate::constants::{LEDGE_EDGE_SHRINK, LEDGE_PROBE_DEPTH};
use crate::terrain::{Point, TerrainQuery};

/// True when the avatar stands on the very edge of its support, about to
/// step off. Never fires while jumping or crouching, since neither lets the
/// avatar walk off.
pub fn is_at_ledge(
    terrain: &dyn TerrainQuery,
    position: Point,
    on_ground: bool,
    jump_held: bool,
    crouch_held: bool,
) -> bool {
    if !on_ground || jump_held || crouch_held {
        return false;
    }
    let probe = Hitbox::at(position)
        .offset(DVec3::new(0.0, -LEDGE_PROBE_DEPTH, 0.0))
        .contract_horizontal(LEDGE_EDGE_SHRINK);
    !probe.touches_solid(terrain)
}
