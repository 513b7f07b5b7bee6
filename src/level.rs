use crate::constants::{CELL_SIZE, MAP_HEIGHT};
use crate::types::{Cell, Position};
use crate::world::Grid;

pub const DEFAULT_LAYOUT: [&str; MAP_HEIGHT] = [
    " ################### ",
    " #........#........# ",
    " #o##.###.#.###.##o# ",
    " #.................# ",
    " #.##.#.#####.#.##.# ",
    " #....#...#...#....# ",
    " ####.### # ###.#### ",
    "    #.#   0   #.#    ",
    "#####.# ##=## #.#####",
    "     .  #123#  .     ",
    "#####.# ##### #.#####",
    "    #.#       #.#    ",
    " ####.# ##### #.#### ",
    " #........#........# ",
    " #.##.###.#.###.##.# ",
    " #o.#.....P.....#.o# ",
    " ##.#.#.#####.#.#.## ",
    " #....#...#...#....# ",
    " #.######.#.######.# ",
    " #.................# ",
    " ################### ",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LevelError {
    #[error("layout has no rows")]
    EmptyLayout,
    #[error("row {row} is {found} cells wide, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown symbol {symbol:?} at ({column}, {row})")]
    UnknownSymbol {
        symbol: char,
        column: usize,
        row: usize,
    },
    #[error("layout has no player spawn")]
    MissingPlayerSpawn,
    #[error("second player spawn at ({column}, {row})")]
    DuplicatePlayerSpawn { column: usize, row: usize },
    #[error("layout has no spawn for ghost {id}")]
    MissingGhostSpawn { id: usize },
    #[error("ghost {id} has more than one spawn")]
    DuplicateGhostSpawn { id: usize },
}

/// A parsed level: the pristine grid plus where everybody starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelLayout {
    pub grid: Grid,
    pub player_spawn: Position,
    pub ghost_spawns: [Position; 4],
}

pub fn default_layout() -> LevelLayout {
    parse_layout(&DEFAULT_LAYOUT).expect("built-in layout is valid")
}

pub fn parse_layout<S: AsRef<str>>(rows: &[S]) -> Result<LevelLayout, LevelError> {
    let width = rows
        .first()
        .map(|row| row.as_ref().chars().count())
        .ok_or(LevelError::EmptyLayout)?;
    if width == 0 {
        return Err(LevelError::EmptyLayout);
    }

    let mut grid = Grid::new(width, rows.len());
    let mut player_spawn = None;
    let mut ghost_spawns: [Option<Position>; 4] = [None; 4];

    for (row_idx, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        let found = row.chars().count();
        if found != width {
            return Err(LevelError::RaggedRow {
                row: row_idx,
                expected: width,
                found,
            });
        }

        for (col_idx, symbol) in row.chars().enumerate() {
            let spawn = Position::new(col_idx as i32 * CELL_SIZE, row_idx as i32 * CELL_SIZE);
            let cell = match symbol {
                ' ' => Cell::Empty,
                '#' => Cell::Wall,
                '=' => Cell::Door,
                '.' => Cell::Pellet,
                'o' => Cell::Energizer,
                'P' => {
                    if player_spawn.is_some() {
                        return Err(LevelError::DuplicatePlayerSpawn {
                            column: col_idx,
                            row: row_idx,
                        });
                    }
                    player_spawn = Some(spawn);
                    Cell::Empty
                }
                '0'..='3' => {
                    let id = symbol as usize - '0' as usize;
                    if ghost_spawns[id].replace(spawn).is_some() {
                        return Err(LevelError::DuplicateGhostSpawn { id });
                    }
                    Cell::Empty
                }
                _ => {
                    return Err(LevelError::UnknownSymbol {
                        symbol,
                        column: col_idx,
                        row: row_idx,
                    })
                }
            };
            grid.set(col_idx as i32, row_idx as i32, cell);
        }
    }

    let player_spawn = player_spawn.ok_or(LevelError::MissingPlayerSpawn)?;
    let mut spawns = [Position::default(); 4];
    for (id, spawn) in ghost_spawns.into_iter().enumerate() {
        spawns[id] = spawn.ok_or(LevelError::MissingGhostSpawn { id })?;
    }

    Ok(LevelLayout {
        grid,
        player_spawn,
        ghost_spawns: spawns,
    })
}
