use crate::constants::{
    energizer_duration, CELL_SIZE, GHOST_1_CHASE, GHOST_2_CHASE, GHOST_3_CHASE,
    GHOST_ANIMATION_FRAMES, GHOST_ANIMATION_SPEED, GHOST_ESCAPE_SPEED, GHOST_FRIGHTENED_SPEED,
    GHOST_SPEED,
};
use crate::rng::Rng;
use crate::types::{
    Direction, GhostRole, GhostState, GhostView, MovementMode, Position, RuntimeEvent,
};
use crate::world::Grid;

use super::player::Player;
use super::utils::{hitboxes_overlap, probe_walls, wrap_tunnel};

/// One pursuer. `uses_door` is tracked apart from `state` because ghosts also need the door
/// to leave the house at level start, while still in `Normal`.
#[derive(Clone, Debug)]
pub struct Ghost {
    pub(crate) id: usize,
    pub(crate) role: GhostRole,
    pub(crate) position: Position,
    pub(crate) direction: Direction,
    pub(crate) mode: MovementMode,
    pub(crate) state: GhostState,
    pub(crate) uses_door: bool,
    pub(crate) frightened_speed_timer: u16,
    pub(crate) home: Position,
    pub(crate) home_exit: Position,
    pub(crate) target: Position,
    pub(crate) animation_timer: u16,
}

impl Ghost {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            role: GhostRole::from_id(id),
            position: Position::default(),
            direction: Direction::Right,
            mode: MovementMode::Scatter,
            state: GhostState::Normal,
            uses_door: false,
            frightened_speed_timer: 0,
            home: Position::default(),
            home_exit: Position::default(),
            target: Position::default(),
            animation_timer: 0,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn state(&self) -> GhostState {
        self.state
    }

    pub fn mode(&self) -> MovementMode {
        self.mode
    }

    pub fn target(&self) -> Position {
        self.target
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Level-start state. Everyone but the leader begins inside the house and walks out
    /// through the door towards `home_exit`.
    pub fn reset(&mut self, home: Position, home_exit: Position) {
        self.mode = MovementMode::Scatter;
        self.uses_door = self.id > 0;
        self.direction = Direction::Right;
        self.state = GhostState::Normal;
        self.frightened_speed_timer = 0;
        self.animation_timer = 0;
        self.home = home;
        self.home_exit = home_exit;
        self.target = home_exit;
    }

    pub fn switch_mode(&mut self) {
        self.mode = self.mode.toggled();
    }

    pub fn animate(&mut self) {
        self.animation_timer =
            (self.animation_timer + 1) % (GHOST_ANIMATION_FRAMES * GHOST_ANIMATION_SPEED);
    }

    pub fn update(
        &mut self,
        level: u8,
        grid: &Grid,
        leader: Position,
        player: &mut Player,
        rng: &mut Rng,
        events: &mut Vec<RuntimeEvent>,
    ) {
        self.update_fright(level, player, events);

        let speed = self.current_speed();
        self.update_target(grid, leader, player, events);

        let walls = probe_walls(grid, self.position, speed, self.uses_door);
        let moves = if self.state == GhostState::Frightened {
            self.wander(walls, rng)
        } else {
            self.direction = self.choose_direction(walls);
            true
        };

        if moves {
            self.position = self.position.step(self.direction, speed);
            self.position.x = wrap_tunnel(self.position.x, speed, grid.pixel_width());
        }

        if hitboxes_overlap(self.position, player.position()) {
            self.resolve_player_contact(player, events);
        }
    }

    fn update_fright(&mut self, level: u8, player: &Player, events: &mut Vec<RuntimeEvent>) {
        let full = energizer_duration(level);
        match self.state {
            GhostState::Normal if full > 0 && player.energizer_timer() == full => {
                self.state = GhostState::Frightened;
                self.frightened_speed_timer = GHOST_FRIGHTENED_SPEED;
                events.push(RuntimeEvent::GhostFrightened { ghost_id: self.id });
            }
            GhostState::Frightened if player.energizer_timer() == 0 => {
                self.state = GhostState::Normal;
                events.push(RuntimeEvent::GhostCalmed { ghost_id: self.id });
            }
            _ => {}
        }
    }

    /// Escaping ghosts sprint only from positions on the escape-speed lattice.
    fn current_speed(&self) -> i32 {
        if self.state == GhostState::ReturningHome
            && self.position.x.rem_euclid(GHOST_ESCAPE_SPEED) == 0
            && self.position.y.rem_euclid(GHOST_ESCAPE_SPEED) == 0
        {
            GHOST_ESCAPE_SPEED
        } else {
            GHOST_SPEED
        }
    }

    fn update_target(
        &mut self,
        grid: &Grid,
        leader: Position,
        player: &Player,
        events: &mut Vec<RuntimeEvent>,
    ) {
        if self.uses_door {
            if self.position != self.target {
                return;
            }
            if self.target == self.home_exit {
                self.uses_door = false;
                if self.state == GhostState::ReturningHome {
                    self.state = GhostState::Normal;
                    events.push(RuntimeEvent::GhostRecovered { ghost_id: self.id });
                }
            } else if self.target == self.home {
                self.target = self.home_exit;
                events.push(RuntimeEvent::GhostReachedHome { ghost_id: self.id });
            }
            return;
        }

        self.target = match self.mode {
            MovementMode::Scatter => scatter_corner(self.role, grid),
            MovementMode::Chase => chase_target(self.role, self.position, leader, player, grid),
        };
    }

    fn target_distance(&self, dir: Direction) -> f32 {
        self.position.step(dir, GHOST_SPEED).distance_to(self.target)
    }

    /// Greedy step towards the target. Never turns back unless boxed in; equal distances keep
    /// the first direction in scan order.
    pub(crate) fn choose_direction(&self, walls: [bool; 4]) -> Direction {
        let reverse = self.direction.reverse();
        let mut best: Option<Direction> = None;
        for dir in Direction::ALL {
            if dir == reverse || walls[dir.index()] {
                continue;
            }
            match best {
                Some(current) if self.target_distance(dir) >= self.target_distance(current) => {}
                _ => best = Some(dir),
            }
        }
        best.unwrap_or(reverse)
    }

    /// Frightened ghosts crawl: one random step every few ticks. Returns whether to move.
    fn wander(&mut self, walls: [bool; 4], rng: &mut Rng) -> bool {
        if self.frightened_speed_timer > 0 {
            self.frightened_speed_timer -= 1;
            return false;
        }
        self.frightened_speed_timer = GHOST_FRIGHTENED_SPEED;

        let reverse = self.direction.reverse();
        let options: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|dir| *dir != reverse && !walls[dir.index()])
            .collect();
        self.direction = rng.pick(&options).unwrap_or(reverse);
        true
    }

    fn resolve_player_contact(&mut self, player: &mut Player, events: &mut Vec<RuntimeEvent>) {
        match self.state {
            GhostState::Normal => {
                if !player.is_dead() {
                    player.set_dead(true);
                    events.push(RuntimeEvent::PlayerDown { ghost_id: self.id });
                }
            }
            GhostState::Frightened => {
                self.state = GhostState::ReturningHome;
                self.uses_door = true;
                self.target = self.home;
                events.push(RuntimeEvent::GhostCaught { ghost_id: self.id });
            }
            GhostState::ReturningHome => {}
        }
    }

    pub fn view(&self) -> GhostView {
        GhostView {
            id: self.id,
            role: self.role,
            x: self.position.x,
            y: self.position.y,
            dir: self.direction,
            mode: self.mode,
            state: self.state,
            uses_door: self.uses_door,
            target: self.target,
            animation_timer: self.animation_timer,
        }
    }
}

fn scatter_corner(role: GhostRole, grid: &Grid) -> Position {
    let right = CELL_SIZE * (grid.width() as i32 - 1);
    let bottom = CELL_SIZE * (grid.height() as i32 - 1);
    match role {
        GhostRole::Aggressive => Position::new(right, 0),
        GhostRole::Ambush => Position::new(0, 0),
        GhostRole::Flank => Position::new(right, bottom),
        GhostRole::Opportunist => Position::new(0, bottom),
    }
}

fn chase_target(
    role: GhostRole,
    own: Position,
    leader: Position,
    player: &Player,
    grid: &Grid,
) -> Position {
    let player_pos = player.position();
    match role {
        GhostRole::Aggressive => player_pos,
        GhostRole::Ambush => player_pos.step(player.direction(), CELL_SIZE * GHOST_1_CHASE),
        GhostRole::Flank => {
            let pivot = player_pos.step(player.direction(), CELL_SIZE * GHOST_2_CHASE);
            Position::new(2 * pivot.x - leader.x, 2 * pivot.y - leader.y)
        }
        GhostRole::Opportunist => {
            if own.distance_to(player_pos) > (CELL_SIZE * GHOST_3_CHASE) as f32 {
                player_pos
            } else {
                scatter_corner(role, grid)
            }
        }
    }
}
