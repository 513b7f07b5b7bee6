use std::time::Duration;

pub const CELL_SIZE: i32 = 16;
pub const MAP_WIDTH: usize = 21;
pub const MAP_HEIGHT: usize = 21;

pub const FRAME_DURATION_US: u64 = 16_667;
pub const FRAME_DURATION: Duration = Duration::from_micros(FRAME_DURATION_US);

pub const PLAYER_SPEED: i32 = 2;
pub const GHOST_SPEED: i32 = 1;
pub const GHOST_ESCAPE_SPEED: i32 = 4;
/// Ticks a frightened ghost waits between single steps.
pub const GHOST_FRIGHTENED_SPEED: u16 = 3;

/// Cells ahead of the player the ambush ghost aims for.
pub const GHOST_1_CHASE: i32 = 2;
/// Cells ahead of the player used as the pivot of the flanking ghost.
pub const GHOST_2_CHASE: i32 = 1;
/// Distance in cells under which the opportunist ghost retreats to its corner.
pub const GHOST_3_CHASE: i32 = 4;

pub const ENERGIZER_DURATION: u16 = 512;
pub const CHASE_DURATION: u16 = 1024;
pub const LONG_SCATTER_DURATION: u16 = 512;
pub const SHORT_SCATTER_DURATION: u16 = 256;
pub const MAX_WAVE: u8 = 7;
pub const GHOST_FLASH_START: u16 = 64;

pub const PLAYER_ANIMATION_FRAMES: u16 = 6;
pub const PLAYER_ANIMATION_SPEED: u16 = 4;
pub const PLAYER_DEATH_FRAMES: u16 = 12;
pub const GHOST_ANIMATION_FRAMES: u16 = 6;
pub const GHOST_ANIMATION_SPEED: u16 = 4;

/// Halves `base` once per level, flooring, and bottoms out at zero.
pub fn level_scaled(base: u16, level: u8) -> u16 {
    base.checked_shr(u32::from(level)).unwrap_or(0)
}

pub fn energizer_duration(level: u8) -> u16 {
    level_scaled(ENERGIZER_DURATION, level)
}

pub fn wave_duration(wave: u8, level: u8) -> u16 {
    if wave % 2 == 1 {
        return CHASE_DURATION;
    }
    if wave == 2 {
        return level_scaled(LONG_SCATTER_DURATION, level);
    }
    level_scaled(SHORT_SCATTER_DURATION, level)
}
