use serde::Serialize;

/// Scan order matters: ghosts break distance ties in favour of the lower ordinal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Right = 0,
    Up = 1,
    Left = 2,
    Down = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Up,
        Direction::Left,
        Direction::Down,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    pub fn reverse(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Down => (0, 1),
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "right" => Some(Self::Right),
            "up" => Some(Self::Up),
            "left" => Some(Self::Left),
            "down" => Some(Self::Down),
            _ => None,
        }
    }
}

/// A point in pixel units; one cell spans `CELL_SIZE` units on each axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, dir: Direction, distance: i32) -> Self {
        let (dx, dy) = dir.delta();
        Self {
            x: self.x + dx * distance,
            y: self.y + dy * distance,
        }
    }

    pub fn distance_to(self, other: Position) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    #[default]
    Empty,
    Wall,
    Door,
    Pellet,
    Energizer,
}

impl Cell {
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::Wall => '#',
            Cell::Door => '=',
            Cell::Pellet => '.',
            Cell::Energizer => 'o',
        }
    }
}

/// Directions the player asked for during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerIntent {
    pressed: [bool; 4],
}

impl PlayerIntent {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn only(dir: Direction) -> Self {
        Self::none().with(dir)
    }

    pub fn with(mut self, dir: Direction) -> Self {
        self.pressed[dir.index()] = true;
        self
    }

    pub fn from_directions<I>(dirs: I) -> Self
    where
        I: IntoIterator<Item = Direction>,
    {
        dirs.into_iter().fold(Self::none(), Self::with)
    }

    pub fn is_pressed(&self, dir: Direction) -> bool {
        self.pressed[dir.index()]
    }

    pub fn is_empty(&self) -> bool {
        !self.pressed.iter().any(|pressed| *pressed)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementMode {
    #[default]
    Scatter,
    Chase,
}

impl MovementMode {
    pub fn toggled(self) -> Self {
        match self {
            MovementMode::Scatter => MovementMode::Chase,
            MovementMode::Chase => MovementMode::Scatter,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GhostState {
    #[default]
    Normal,
    Frightened,
    ReturningHome,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GhostRole {
    Aggressive,
    Ambush,
    Flank,
    Opportunist,
}

impl GhostRole {
    pub fn from_id(id: usize) -> Self {
        match id {
            0 => GhostRole::Aggressive,
            1 => GhostRole::Ambush,
            2 => GhostRole::Flank,
            _ => GhostRole::Opportunist,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Playing,
    LevelComplete,
    PlayerDown,
}

#[derive(Clone, Debug, Serialize)]
pub struct WorldInit {
    pub width: usize,
    pub height: usize,
    #[serde(rename = "cellSize")]
    pub cell_size: i32,
    pub tiles: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PlayerView {
    pub x: i32,
    pub y: i32,
    pub dir: Direction,
    pub dead: bool,
    #[serde(rename = "energizerTimer")]
    pub energizer_timer: u16,
    #[serde(rename = "animationTimer")]
    pub animation_timer: u16,
    #[serde(rename = "animationOver")]
    pub animation_over: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct GhostView {
    pub id: usize,
    pub role: GhostRole,
    pub x: i32,
    pub y: i32,
    pub dir: Direction,
    pub mode: MovementMode,
    pub state: GhostState,
    #[serde(rename = "usesDoor")]
    pub uses_door: bool,
    pub target: Position,
    #[serde(rename = "animationTimer")]
    pub animation_timer: u16,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuntimeEvent {
    LevelStarted {
        level: u8,
    },
    EnergizerEaten {
        x: i32,
        y: i32,
    },
    WaveChanged {
        wave: u8,
        mode: MovementMode,
    },
    GhostFrightened {
        #[serde(rename = "ghostId")]
        ghost_id: usize,
    },
    GhostCalmed {
        #[serde(rename = "ghostId")]
        ghost_id: usize,
    },
    GhostCaught {
        #[serde(rename = "ghostId")]
        ghost_id: usize,
    },
    GhostReachedHome {
        #[serde(rename = "ghostId")]
        ghost_id: usize,
    },
    GhostRecovered {
        #[serde(rename = "ghostId")]
        ghost_id: usize,
    },
    PlayerDown {
        #[serde(rename = "ghostId")]
        ghost_id: usize,
    },
    LevelCleared {
        level: u8,
    },
}

#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub level: u8,
    pub status: SessionStatus,
    pub wave: u8,
    #[serde(rename = "pelletsRemaining")]
    pub pellets_remaining: usize,
    /// Frightened ghosts should blink once the power mode is about to run out.
    pub flash: bool,
    pub tiles: Vec<String>,
    pub player: PlayerView,
    pub ghosts: Vec<GhostView>,
    pub events: Vec<RuntimeEvent>,
}
