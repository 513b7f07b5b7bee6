use std::collections::VecDeque;

use crate::constants::CELL_SIZE;
use crate::types::{Cell, Direction, GhostState, PlayerIntent, Position};
use crate::world::Grid;

use super::utils::{manhattan, nearest_cell};
use super::Session;

/// Cells this close (in steps) to a hunting ghost are avoided while another route exists.
const DANGER_RADIUS: i32 = 2;

/// Picks a direction for the player: shortest walk to the nearest pellet or energizer,
/// steering clear of ghosts that can still kill.
pub fn choose_intent(session: &Session) -> PlayerIntent {
    let grid = session.grid();
    let width = grid.width() as i32;
    let position = session.player().position();
    let (col, row) = nearest_cell(position);
    let start = (col.rem_euclid(width.max(1)), row);
    let origin = Position::new(col * CELL_SIZE, row * CELL_SIZE);

    let threats: Vec<(i32, i32)> = session
        .fleet()
        .ghosts()
        .iter()
        .filter(|ghost| ghost.state() == GhostState::Normal)
        .map(|ghost| nearest_cell(ghost.position()))
        .collect();
    let dangerous = |(x, y): (i32, i32)| {
        threats
            .iter()
            .any(|(tx, ty)| manhattan(x, y, *tx, *ty) <= DANGER_RADIUS)
    };

    let Some(step) = first_step_to_food(grid, start, dangerous)
        .or_else(|| first_step_to_food(grid, start, |_| false))
    else {
        return PlayerIntent::none();
    };

    // Off-centre turns get refused by the wall probe, so line up with the cell first.
    match align_towards(position, origin) {
        Some(align) if is_horizontal(align) != is_horizontal(step) => PlayerIntent::only(align),
        _ => PlayerIntent::only(step),
    }
}

fn align_towards(position: Position, origin: Position) -> Option<Direction> {
    if position.x < origin.x {
        Some(Direction::Right)
    } else if position.x > origin.x {
        Some(Direction::Left)
    } else if position.y < origin.y {
        Some(Direction::Down)
    } else if position.y > origin.y {
        Some(Direction::Up)
    } else {
        None
    }
}

fn is_horizontal(dir: Direction) -> bool {
    matches!(dir, Direction::Left | Direction::Right)
}

/// Breadth-first search over walkable cells; the row wraps horizontally like the tunnel.
fn first_step_to_food<F>(grid: &Grid, start: (i32, i32), avoid: F) -> Option<Direction>
where
    F: Fn((i32, i32)) -> bool,
{
    grid.get(start.0, start.1)?;
    let width = grid.width() as i32;
    let index = |(x, y): (i32, i32)| y as usize * grid.width() + x as usize;

    let mut visited = vec![false; grid.width() * grid.height()];
    let mut queue = VecDeque::new();
    visited[index(start)] = true;
    queue.push_back((start, None::<Direction>));

    while let Some((cell, first)) = queue.pop_front() {
        if first.is_some()
            && matches!(
                grid.get(cell.0, cell.1),
                Some(Cell::Pellet | Cell::Energizer)
            )
        {
            return first;
        }

        for dir in Direction::ALL {
            let (dx, dy) = dir.delta();
            let next = ((cell.0 + dx).rem_euclid(width), cell.1 + dy);
            let Some(kind) = grid.get(next.0, next.1) else {
                continue;
            };
            if matches!(kind, Cell::Wall | Cell::Door) || visited[index(next)] || avoid(next) {
                continue;
            }
            visited[index(next)] = true;
            queue.push_back((next, first.or(Some(dir))));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SessionOptions;

    fn session_with(rows: &[&str]) -> Session {
        Session::new(SessionOptions {
            seed: 1,
            start_level: 0,
            layout: Some(rows.iter().map(|row| row.to_string()).collect()),
        })
        .expect("test layout should load")
    }

    #[test]
    fn heads_for_nearest_pellet() {
        let rows = ["#######", "#.P  .#", "#######", "#######", "0123###"];
        let session = session_with(&rows);
        assert_eq!(choose_intent(&session), PlayerIntent::only(Direction::Left));
    }

    #[test]
    fn detours_around_hunting_ghosts() {
        let rows = ["#########", "#. P   .#", "#########", "0123#####"];
        let session = session_with(&rows);
        assert_eq!(choose_intent(&session), PlayerIntent::only(Direction::Right));
    }

    #[test]
    fn frightened_ghosts_are_not_avoided() {
        let rows = ["#########", "#. P   .#", "#########", "0123#####"];
        let mut session = session_with(&rows);
        for ghost in &mut session.fleet.ghosts {
            ghost.state = GhostState::Frightened;
        }
        assert_eq!(choose_intent(&session), PlayerIntent::only(Direction::Left));
    }

    #[test]
    fn takes_risky_route_when_no_safe_one_exists() {
        let rows = ["#####", "#.P #", "#####", "0123#"];
        let session = session_with(&rows);
        assert_eq!(choose_intent(&session), PlayerIntent::only(Direction::Left));
    }

    #[test]
    fn finds_food_through_the_tunnel() {
        let rows = ["#######", "P   .  ", "#######", "#######", "#0123##"];
        let session = session_with(&rows);
        assert_eq!(choose_intent(&session), PlayerIntent::only(Direction::Left));
    }

    #[test]
    fn lines_up_before_turning() {
        let rows = ["#####", "#P  #", "#.###", "#####", "0123#"];
        let mut session = session_with(&rows);
        session.player.set_position(Position::new(CELL_SIZE + 4, CELL_SIZE));
        assert_eq!(choose_intent(&session), PlayerIntent::only(Direction::Left));

        session.player.set_position(Position::new(CELL_SIZE, CELL_SIZE));
        assert_eq!(choose_intent(&session), PlayerIntent::only(Direction::Down));
    }

    #[test]
    fn no_food_means_no_input() {
        let rows = ["#####", "#P  #", "#####", "0123#"];
        let session = session_with(&rows);
        assert!(choose_intent(&session).is_empty());
    }
}
