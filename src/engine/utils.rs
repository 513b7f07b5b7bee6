use crate::constants::CELL_SIZE;
use crate::types::{Direction, Position};
use crate::world::Grid;

/// Blocked flag per direction, indexed by `Direction::index`.
pub(super) fn probe_walls(grid: &Grid, pos: Position, speed: i32, door_passable: bool) -> [bool; 4] {
    Direction::ALL.map(|dir| grid.is_blocked(pos.step(dir, speed), door_passable))
}

/// Horizontal tunnel: leaving one side re-enters from the other, one step inside the edge.
pub(super) fn wrap_tunnel(x: i32, speed: i32, pixel_width: i32) -> i32 {
    if x < -CELL_SIZE {
        pixel_width - speed
    } else if x >= pixel_width {
        speed - CELL_SIZE
    } else {
        x
    }
}

/// Two cell-sized bodies touch when they are closer than one cell on both axes.
pub(super) fn hitboxes_overlap(a: Position, b: Position) -> bool {
    (a.x - b.x).abs() < CELL_SIZE && (a.y - b.y).abs() < CELL_SIZE
}

pub(super) fn nearest_cell(pos: Position) -> (i32, i32) {
    (
        (pos.x + CELL_SIZE / 2).div_euclid(CELL_SIZE),
        (pos.y + CELL_SIZE / 2).div_euclid(CELL_SIZE),
    )
}

pub(super) fn manhattan(x: i32, y: i32, tx: i32, ty: i32) -> i32 {
    (x - tx).abs() + (y - ty).abs()
}
