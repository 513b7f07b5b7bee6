use crate::constants::CELL_SIZE;
use crate::types::{Cell, Position, WorldInit};

/// Row-major cell matrix. Dimensions never change after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Width of the maze in pixel units, the span used by tunnel wrapping.
    pub fn pixel_width(&self) -> i32 {
        self.width as i32 * CELL_SIZE
    }

    fn index_of(&self, col: i32, row: i32) -> Option<usize> {
        if col < 0 || row < 0 || col as usize >= self.width || row as usize >= self.height {
            return None;
        }
        Some(row as usize * self.width + col as usize)
    }

    pub fn get(&self, col: i32, row: i32) -> Option<Cell> {
        self.index_of(col, row).map(|index| self.cells[index])
    }

    /// Returns false when the coordinates fall outside the grid.
    pub fn set(&mut self, col: i32, row: i32, cell: Cell) -> bool {
        let Some(index) = self.index_of(col, row) else {
            return false;
        };
        self.cells[index] = cell;
        true
    }

    pub fn count(&self, kind: Cell) -> usize {
        self.cells.iter().filter(|cell| **cell == kind).count()
    }

    pub fn pellets_remaining(&self) -> usize {
        self.count(Cell::Pellet)
    }

    /// A level is cleared once no pellet is left; leftover energizers do not count.
    pub fn is_cleared(&self) -> bool {
        !self.cells.contains(&Cell::Pellet)
    }

    pub fn tiles(&self) -> Vec<String> {
        self.cells
            .chunks(self.width.max(1))
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect()
    }

    /// Whether a body at `pos` would overlap a wall, or a door when `door_passable` is false.
    pub fn is_blocked(&self, pos: Position, door_passable: bool) -> bool {
        candidate_cells(pos).into_iter().any(|(col, row)| {
            matches!(
                (self.get(col, row), door_passable),
                (Some(Cell::Wall), _) | (Some(Cell::Door), false)
            )
        })
    }

    /// Eats everything a body at `pos` touches. Returns true only when an energizer was eaten;
    /// pellets are consumed silently in the same pass.
    pub fn collect_at(&mut self, pos: Position) -> bool {
        let mut energized = false;
        for (col, row) in candidate_cells(pos) {
            match self.get(col, row) {
                Some(Cell::Energizer) => {
                    energized = true;
                    self.set(col, row, Cell::Empty);
                }
                Some(Cell::Pellet) => {
                    self.set(col, row, Cell::Empty);
                }
                _ => {}
            }
        }
        energized
    }
}

/// The up to four cells a cell-sized body at `pos` straddles (floor and ceiling on each axis).
fn candidate_cells(pos: Position) -> [(i32, i32); 4] {
    let (left, right) = floor_ceil(pos.x);
    let (top, bottom) = floor_ceil(pos.y);
    [(left, top), (right, top), (left, bottom), (right, bottom)]
}

fn floor_ceil(value: i32) -> (i32, i32) {
    let floor = value.div_euclid(CELL_SIZE);
    if value.rem_euclid(CELL_SIZE) == 0 {
        (floor, floor)
    } else {
        (floor, floor + 1)
    }
}

pub fn to_world_init(grid: &Grid) -> WorldInit {
    WorldInit {
        width: grid.width(),
        height: grid.height(),
        cell_size: CELL_SIZE,
        tiles: grid.tiles(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell_origin(col: i32, row: i32) -> Position {
        Position::new(col * CELL_SIZE, row * CELL_SIZE)
    }

    fn walled_center() -> Grid {
        let mut grid = Grid::new(3, 3);
        grid.set(1, 1, Cell::Wall);
        grid
    }

    #[test]
    fn point_inside_open_cell_is_not_blocked() {
        let grid = walled_center();
        for (col, row) in [(0, 0), (2, 0), (0, 2), (2, 2)] {
            assert!(!grid.is_blocked(cell_origin(col, row), false));
        }
    }

    #[test]
    fn any_point_touching_a_wall_is_blocked() {
        let grid = walled_center();
        assert!(grid.is_blocked(cell_origin(1, 1), false));
        assert!(grid.is_blocked(cell_origin(1, 1), true));
        // straddling from the left neighbour into the wall
        assert!(grid.is_blocked(Position::new(CELL_SIZE - 1, CELL_SIZE), false));
        assert!(grid.is_blocked(Position::new(1, 1), false));
    }

    #[test]
    fn door_blocks_only_without_passage() {
        let mut grid = Grid::new(3, 1);
        grid.set(1, 0, Cell::Door);
        let pos = Position::new(CELL_SIZE + 3, 0);
        assert!(grid.is_blocked(pos, false));
        assert!(!grid.is_blocked(pos, true));
    }

    #[test]
    fn out_of_bounds_cells_are_transparent() {
        let mut grid = Grid::new(2, 2);
        grid.set(0, 0, Cell::Energizer);
        assert!(!grid.is_blocked(Position::new(-5, -5), false));
        assert!(!grid.is_blocked(Position::new(100, 100), false));
        assert!(!grid.collect_at(Position::new(100, 100)));
        assert_eq!(grid.get(-1, 0), None);
        assert!(!grid.set(2, 0, Cell::Wall));
    }

    #[test]
    fn collecting_is_idempotent() {
        let mut grid = Grid::new(2, 1);
        grid.set(0, 0, Cell::Energizer);
        grid.set(1, 0, Cell::Pellet);

        assert!(grid.collect_at(cell_origin(0, 0)));
        assert_eq!(grid.get(0, 0), Some(Cell::Empty));
        assert!(!grid.collect_at(cell_origin(0, 0)));

        assert!(!grid.collect_at(cell_origin(1, 0)));
        assert_eq!(grid.get(1, 0), Some(Cell::Empty));
        assert!(!grid.collect_at(cell_origin(1, 0)));
        assert!(grid.is_cleared());
    }

    #[test]
    fn one_probe_can_signal_energizer_and_eat_pellet() {
        let mut grid = Grid::new(2, 1);
        grid.set(0, 0, Cell::Pellet);
        grid.set(1, 0, Cell::Energizer);

        assert!(grid.collect_at(Position::new(CELL_SIZE / 2, 0)));
        assert_eq!(grid.get(0, 0), Some(Cell::Empty));
        assert_eq!(grid.get(1, 0), Some(Cell::Empty));
    }

    #[test]
    fn tiles_render_one_string_per_row() {
        let mut grid = walled_center();
        grid.set(0, 2, Cell::Pellet);
        assert_eq!(grid.tiles(), vec!["   ", " # ", ".  "]);
        assert_eq!(to_world_init(&grid).cell_size, CELL_SIZE);
    }
}
