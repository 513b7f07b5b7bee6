use crate::constants::{level_scaled, wave_duration, LONG_SCATTER_DURATION, MAX_WAVE};
use crate::rng::Rng;
use crate::types::{Position, RuntimeEvent};
use crate::world::Grid;

use super::ghost::Ghost;
use super::player::Player;

/// The four ghosts plus the scatter/chase schedule they share.
#[derive(Clone, Debug)]
pub struct GhostFleet {
    pub(crate) wave: u8,
    pub(crate) wave_timer: u16,
    pub(crate) ghosts: [Ghost; 4],
}

impl Default for GhostFleet {
    fn default() -> Self {
        Self::new()
    }
}

impl GhostFleet {
    pub fn new() -> Self {
        Self {
            wave: 0,
            wave_timer: LONG_SCATTER_DURATION,
            ghosts: std::array::from_fn(Ghost::new),
        }
    }

    pub fn wave(&self) -> u8 {
        self.wave
    }

    pub fn wave_timer(&self) -> u16 {
        self.wave_timer
    }

    pub fn ghosts(&self) -> &[Ghost; 4] {
        &self.ghosts
    }

    /// Ghost 2's spawn is the house; ghost 0's spawn, just outside the door, is the exit.
    pub fn reset(&mut self, level: u8, spawns: &[Position; 4]) {
        self.wave = 0;
        self.wave_timer = level_scaled(LONG_SCATTER_DURATION, level);

        for (ghost, spawn) in self.ghosts.iter_mut().zip(spawns) {
            ghost.set_position(*spawn);
        }
        let home = spawns[2];
        let home_exit = spawns[0];
        for ghost in &mut self.ghosts {
            ghost.reset(home, home_exit);
        }
    }

    pub fn update(
        &mut self,
        level: u8,
        grid: &Grid,
        player: &mut Player,
        rng: &mut Rng,
        events: &mut Vec<RuntimeEvent>,
    ) {
        if player.energizer_timer() == 0 {
            self.advance_wave(level, events);
        }

        for id in 0..self.ghosts.len() {
            let leader = self.ghosts[0].position();
            self.ghosts[id].update(level, grid, leader, player, rng, events);
        }
    }

    fn advance_wave(&mut self, level: u8, events: &mut Vec<RuntimeEvent>) {
        if self.wave_timer > 0 {
            self.wave_timer -= 1;
            return;
        }

        if self.wave < MAX_WAVE {
            self.wave += 1;
            for ghost in &mut self.ghosts {
                ghost.switch_mode();
            }
            events.push(RuntimeEvent::WaveChanged {
                wave: self.wave,
                mode: self.ghosts[0].mode(),
            });
        }
        self.wave_timer = wave_duration(self.wave, level);
    }

    pub fn animate(&mut self) {
        for ghost in &mut self.ghosts {
            ghost.animate();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{CELL_SIZE, CHASE_DURATION, SHORT_SCATTER_DURATION};
    use crate::level::default_layout;
    use crate::types::MovementMode;

    fn fleet_on_default_layout(level: u8) -> (GhostFleet, Grid, Player) {
        let layout = default_layout();
        let mut fleet = GhostFleet::new();
        fleet.reset(level, &layout.ghost_spawns);
        let player = Player::new(layout.player_spawn);
        (fleet, layout.grid, player)
    }

    #[test]
    fn reset_shares_house_and_exit() {
        let layout = default_layout();
        let (fleet, _, _) = fleet_on_default_layout(1);

        assert_eq!(fleet.wave(), 0);
        assert_eq!(fleet.wave_timer(), LONG_SCATTER_DURATION / 2);
        for (ghost, spawn) in fleet.ghosts().iter().zip(&layout.ghost_spawns) {
            assert_eq!(ghost.position(), *spawn);
            assert_eq!(ghost.home, layout.ghost_spawns[2]);
            assert_eq!(ghost.home_exit, layout.ghost_spawns[0]);
            assert_eq!(ghost.mode(), MovementMode::Scatter);
            assert_eq!(ghost.uses_door, ghost.id() > 0);
        }
    }

    #[test]
    fn expired_wave_toggles_every_ghost_together() {
        let (mut fleet, grid, mut player) = fleet_on_default_layout(0);
        let mut rng = Rng::new(1);
        let mut events = Vec::new();
        fleet.wave_timer = 0;

        fleet.update(0, &grid, &mut player, &mut rng, &mut events);

        assert_eq!(fleet.wave(), 1);
        assert_eq!(fleet.wave_timer(), CHASE_DURATION);
        assert!(fleet
            .ghosts()
            .iter()
            .all(|ghost| ghost.mode() == MovementMode::Chase));
        assert!(events.iter().any(|event| matches!(
            event,
            RuntimeEvent::WaveChanged {
                wave: 1,
                mode: MovementMode::Chase
            }
        )));
    }

    #[test]
    fn wave_index_stops_at_cap() {
        let (mut fleet, grid, mut player) = fleet_on_default_layout(0);
        let mut rng = Rng::new(2);
        let mut events = Vec::new();

        let mut previous = fleet.wave();
        for _ in 0..20_000 {
            fleet.update(0, &grid, &mut player, &mut rng, &mut events);
            assert!(fleet.wave() <= MAX_WAVE);
            assert!(fleet.wave() >= previous);
            previous = fleet.wave();
            player.set_position(Position::new(-100 * CELL_SIZE, 0));
        }
        assert_eq!(fleet.wave(), MAX_WAVE);
        assert!(fleet
            .ghosts()
            .iter()
            .all(|ghost| ghost.mode() == MovementMode::Chase));

        fleet.wave_timer = 0;
        fleet.update(0, &grid, &mut player, &mut rng, &mut events);
        assert_eq!(fleet.wave(), MAX_WAVE);
        assert_eq!(fleet.wave_timer(), CHASE_DURATION);
    }

    #[test]
    fn energized_player_pauses_the_schedule() {
        let (mut fleet, grid, mut player) = fleet_on_default_layout(0);
        let mut rng = Rng::new(3);
        let mut events = Vec::new();
        let before = fleet.wave_timer();

        player.energizer_timer = 10;
        fleet.update(0, &grid, &mut player, &mut rng, &mut events);
        assert_eq!(fleet.wave_timer(), before);

        player.energizer_timer = 0;
        fleet.update(0, &grid, &mut player, &mut rng, &mut events);
        assert_eq!(fleet.wave_timer(), before - 1);
    }

    #[test]
    fn later_scatter_waves_are_short() {
        let mut fleet = GhostFleet::new();
        let mut events = Vec::new();
        fleet.wave = 3;
        fleet.wave_timer = 0;

        fleet.advance_wave(0, &mut events);

        assert_eq!(fleet.wave(), 4);
        assert_eq!(fleet.wave_timer(), SHORT_SCATTER_DURATION);
    }
}
