use crate::constants::{
    energizer_duration, PLAYER_ANIMATION_FRAMES, PLAYER_ANIMATION_SPEED, PLAYER_DEATH_FRAMES,
    PLAYER_SPEED,
};
use crate::types::{Direction, PlayerIntent, PlayerView, Position};
use crate::world::Grid;

use super::utils::{probe_walls, wrap_tunnel};

#[derive(Clone, Debug)]
pub struct Player {
    pub(crate) position: Position,
    pub(crate) direction: Direction,
    pub(crate) dead: bool,
    pub(crate) animation_timer: u16,
    pub(crate) animation_over: bool,
    pub(crate) energizer_timer: u16,
}

impl Player {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            direction: Direction::Right,
            dead: false,
            animation_timer: 0,
            animation_over: false,
            energizer_timer: 0,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn energizer_timer(&self) -> u16 {
        self.energizer_timer
    }

    pub fn is_animation_over(&self) -> bool {
        self.animation_over
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn set_dead(&mut self, dead: bool) {
        self.dead = dead;
        if dead {
            self.animation_timer = 0;
        }
    }

    /// Back to level-start state. The spawn position is applied separately by the session.
    pub fn reset(&mut self) {
        self.direction = Direction::Right;
        self.dead = false;
        self.animation_timer = 0;
        self.animation_over = false;
        self.energizer_timer = 0;
    }

    /// Moves one tick and eats whatever is underneath. Returns true when an energizer was eaten.
    pub fn update(&mut self, level: u8, grid: &mut Grid, intent: PlayerIntent) -> bool {
        let walls = probe_walls(grid, self.position, PLAYER_SPEED, false);

        for dir in Direction::ALL {
            if intent.is_pressed(dir) && !walls[dir.index()] {
                self.direction = dir;
            }
        }

        if !walls[self.direction.index()] {
            self.position = self.position.step(self.direction, PLAYER_SPEED);
        }
        self.position.x = wrap_tunnel(self.position.x, PLAYER_SPEED, grid.pixel_width());

        if grid.collect_at(self.position) {
            self.energizer_timer = energizer_duration(level);
            true
        } else {
            self.energizer_timer = self.energizer_timer.saturating_sub(1);
            false
        }
    }

    pub(crate) fn restart_animation(&mut self) {
        self.animation_timer = 0;
    }

    /// Loops the chomp cycle while playing; plays the one-shot death/victory cycle otherwise.
    pub fn animate(&mut self, finished: bool) {
        if self.dead || finished {
            if self.animation_timer < PLAYER_DEATH_FRAMES * PLAYER_ANIMATION_SPEED {
                self.animation_timer += 1;
            } else {
                self.animation_over = true;
            }
        } else {
            self.animation_timer =
                (self.animation_timer + 1) % (PLAYER_ANIMATION_FRAMES * PLAYER_ANIMATION_SPEED);
        }
    }

    pub fn view(&self) -> PlayerView {
        PlayerView {
            x: self.position.x,
            y: self.position.y,
            dir: self.direction,
            dead: self.dead,
            energizer_timer: self.energizer_timer,
            animation_timer: self.animation_timer,
            animation_over: self.animation_over,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{CELL_SIZE, ENERGIZER_DURATION};
    use crate::level::parse_layout;
    use crate::types::Cell;

    fn open_grid(width: usize, height: usize) -> Grid {
        Grid::new(width, height)
    }

    #[test]
    fn stepping_onto_last_pellet_clears_level() {
        let mut grid = open_grid(3, 3);
        grid.set(1, 1, Cell::Pellet);
        let mut player = Player::new(Position::new(0, CELL_SIZE));

        let energized = player.update(0, &mut grid, PlayerIntent::only(Direction::Right));

        assert!(!energized);
        assert_eq!(player.position(), Position::new(PLAYER_SPEED, CELL_SIZE));
        assert_eq!(grid.get(1, 1), Some(Cell::Empty));
        assert!(grid.is_cleared());
    }

    #[test]
    fn blocked_request_is_ignored() {
        let layout = parse_layout(&["#####", "#P  #", "#0123", "#####"]).expect("valid layout");
        let mut grid = layout.grid;
        let mut player = Player::new(layout.player_spawn);
        player.direction = Direction::Right;

        player.update(0, &mut grid, PlayerIntent::only(Direction::Up));

        assert_eq!(player.direction(), Direction::Right);
        assert_eq!(
            player.position(),
            layout.player_spawn.step(Direction::Right, PLAYER_SPEED)
        );
    }

    #[test]
    fn later_requested_direction_wins_when_both_open() {
        let mut grid = open_grid(5, 5);
        let mut player = Player::new(Position::new(2 * CELL_SIZE, 2 * CELL_SIZE));

        let intent = PlayerIntent::from_directions([Direction::Right, Direction::Down]);
        player.update(0, &mut grid, intent);

        assert_eq!(player.direction(), Direction::Down);
        assert_eq!(player.position(), Position::new(2 * CELL_SIZE, 2 * CELL_SIZE + PLAYER_SPEED));
    }

    #[test]
    fn stays_put_facing_a_wall() {
        let layout = parse_layout(&["####", "#P##", "####", "0123"]).expect("valid layout");
        let mut grid = layout.grid;
        let mut player = Player::new(layout.player_spawn);

        player.update(0, &mut grid, PlayerIntent::none());

        assert_eq!(player.position(), layout.player_spawn);
    }

    #[test]
    fn energizer_duration_scales_with_level_and_counts_down() {
        let mut grid = open_grid(4, 1);
        grid.set(1, 0, Cell::Energizer);
        let mut player = Player::new(Position::new(0, 0));

        assert!(player.update(2, &mut grid, PlayerIntent::none()));
        assert_eq!(player.energizer_timer(), ENERGIZER_DURATION / 4);

        player.update(2, &mut grid, PlayerIntent::none());
        assert_eq!(player.energizer_timer(), ENERGIZER_DURATION / 4 - 1);

        player.energizer_timer = 0;
        player.update(2, &mut grid, PlayerIntent::none());
        assert_eq!(player.energizer_timer(), 0);
    }

    #[test]
    fn tunnel_wrap_is_a_closed_loop_both_ways() {
        for dir in [Direction::Right, Direction::Left] {
            let mut grid = open_grid(5, 1);
            let start = Position::new(2 * CELL_SIZE, 0);
            let mut player = Player::new(start);
            player.direction = dir;

            let mut wrapped = false;
            let mut returned = false;
            for _ in 0..200 {
                let before = player.position().x;
                player.update(0, &mut grid, PlayerIntent::none());
                let after = player.position().x;
                if (after - before).abs() > PLAYER_SPEED {
                    wrapped = true;
                }
                if player.position() == start {
                    returned = true;
                    break;
                }
            }
            assert!(wrapped, "{dir:?} never crossed the tunnel");
            assert!(returned, "{dir:?} never came back to the start");
        }
    }

    #[test]
    fn death_animation_runs_once_then_reports_over() {
        let mut player = Player::new(Position::default());
        player.animation_timer = 7;
        player.set_dead(true);
        assert_eq!(player.animation_timer, 0);

        for _ in 0..(PLAYER_DEATH_FRAMES * PLAYER_ANIMATION_SPEED) {
            player.animate(false);
        }
        assert!(!player.is_animation_over());
        player.animate(false);
        assert!(player.is_animation_over());

        player.reset();
        assert!(!player.is_dead());
        assert!(!player.is_animation_over());
        assert_eq!(player.direction(), Direction::Right);
    }

    #[test]
    fn chomp_animation_loops_while_alive() {
        let mut player = Player::new(Position::default());
        for _ in 0..(PLAYER_ANIMATION_FRAMES * PLAYER_ANIMATION_SPEED) {
            player.animate(false);
        }
        assert_eq!(player.animation_timer, 0);
    }
}
