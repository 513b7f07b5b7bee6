use crate::constants::GHOST_FLASH_START;
use crate::level::{default_layout, parse_layout, LevelError, LevelLayout};
use crate::rng::Rng;
use crate::types::{PlayerIntent, RuntimeEvent, SessionStatus, Snapshot, WorldInit};
use crate::world::{to_world_init, Grid};

mod autopilot;
mod fleet;
mod ghost;
mod player;
mod utils;

pub use self::autopilot::choose_intent;
pub use self::fleet::GhostFleet;
pub use self::ghost::Ghost;
pub use self::player::Player;

#[derive(Clone, Debug, Default)]
pub struct SessionOptions {
    pub seed: u32,
    pub start_level: u8,
    /// Custom maze rows; the built-in maze is used when absent.
    pub layout: Option<Vec<String>>,
}

/// One game: the live grid, the player, the ghosts and the level counter.
#[derive(Clone, Debug)]
pub struct Session {
    layout: LevelLayout,
    grid: Grid,
    player: Player,
    fleet: GhostFleet,
    rng: Rng,
    events: Vec<RuntimeEvent>,
    level: u8,
    won: bool,
    tick_counter: u64,
}

impl Session {
    pub fn new(options: SessionOptions) -> Result<Self, LevelError> {
        let layout = match &options.layout {
            Some(rows) => parse_layout(rows)?,
            None => default_layout(),
        };

        let mut session = Self {
            grid: layout.grid.clone(),
            player: Player::new(layout.player_spawn),
            fleet: GhostFleet::new(),
            layout,
            rng: Rng::new(options.seed),
            events: Vec::new(),
            level: options.start_level,
            won: false,
            tick_counter: 0,
        };
        session.start_level();
        Ok(session)
    }

    fn start_level(&mut self) {
        self.won = false;
        self.grid = self.layout.grid.clone();
        self.fleet.reset(self.level, &self.layout.ghost_spawns);
        self.player.reset();
        self.player.set_position(self.layout.player_spawn);
        self.events.push(RuntimeEvent::LevelStarted { level: self.level });
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn tick(&self) -> u64 {
        self.tick_counter
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn fleet(&self) -> &GhostFleet {
        &self.fleet
    }

    pub fn is_level_complete(&self) -> bool {
        self.won
    }

    pub fn is_player_dead(&self) -> bool {
        self.player.is_dead()
    }

    pub fn status(&self) -> SessionStatus {
        if self.player.is_dead() {
            SessionStatus::PlayerDown
        } else if self.won {
            SessionStatus::LevelComplete
        } else {
            SessionStatus::Playing
        }
    }

    /// Advances the simulation by one fixed frame. Once the level is won or lost only the
    /// animations keep running until `restart` is called.
    pub fn step(&mut self, intent: PlayerIntent) {
        self.tick_counter += 1;

        if !self.won && !self.player.is_dead() {
            if self.player.update(self.level, &mut self.grid, intent) {
                let at = self.player.position();
                self.events
                    .push(RuntimeEvent::EnergizerEaten { x: at.x, y: at.y });
            }

            self.fleet.update(
                self.level,
                &self.grid,
                &mut self.player,
                &mut self.rng,
                &mut self.events,
            );

            self.won = self.grid.is_cleared();
            if self.won {
                self.player.restart_animation();
                self.events
                    .push(RuntimeEvent::LevelCleared { level: self.level });
            }
        }

        self.player.animate(self.won);
        self.fleet.animate();
    }

    /// Starts the next level after a win, or level 0 after a death. Does nothing mid-level.
    pub fn restart(&mut self) -> bool {
        if self.player.is_dead() {
            self.level = 0;
        } else if self.won {
            self.level = self.level.saturating_add(1);
        } else {
            return false;
        }
        self.start_level();
        true
    }

    pub fn world_init(&self) -> WorldInit {
        to_world_init(&self.grid)
    }

    /// Events accumulate across steps until a snapshot built with `include_events` drains them.
    pub fn build_snapshot(&mut self, include_events: bool) -> Snapshot {
        Snapshot {
            tick: self.tick_counter,
            level: self.level,
            status: self.status(),
            wave: self.fleet.wave(),
            pellets_remaining: self.grid.pellets_remaining(),
            flash: self.player.energizer_timer() <= GHOST_FLASH_START,
            tiles: self.grid.tiles(),
            player: self.player.view(),
            ghosts: self.fleet.ghosts().iter().map(Ghost::view).collect(),
            events: if include_events {
                std::mem::take(&mut self.events)
            } else {
                Vec::new()
            },
        }
    }
}
