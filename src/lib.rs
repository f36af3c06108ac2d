//! Fish Escape - a scrolling lane escape game
//!
//! Core modules:
//! - `sim`: Deterministic grid simulation (movement, collisions, scrolling, pursuit)
//! - `highscores`: Best score record and its storage collaborator
//! - `settings`: Data-driven game tuning

pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::{HighScore, JsonFileStore, MemoryStore, ScoreStore};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Grid lattice
    pub const GRID_COLS: i32 = 8;
    pub const GRID_ROWS: i32 = 14;

    /// Default viewport (pixels)
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 480.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 840.0;

    /// Forward steps needed to reach the finish line
    pub const GOAL_MOVES: u32 = 40;

    /// Ticks per forward step on a fresh run
    pub const BASE_MOVE_TIME: u32 = 60;
    /// Move time a lost run is reset to before the level ramp applies
    pub const RESTART_MOVE_TIME: u32 = 70;
    /// Move time never drops below this
    pub const MOVE_TIME_FLOOR: u32 = 5;
    /// Move time shaved off per cleared level
    pub const MOVE_TIME_STEP: u32 = 10;
    /// Below this the ramp gives back half a step
    pub const MOVE_TIME_SOFT_LIMIT: u32 = 20;

    /// Enemies get an extra pursuit pass every N moves
    pub const JUMP_INTERVAL: u32 = 5;

    /// Player spawn cell
    pub const PLAYER_START_COL: i32 = 3;
    pub const PLAYER_START_ROW: i32 = 5;

    /// Obstacle field
    pub const OBSTACLE_ROWS: usize = 6;
    pub const OBSTACLES_PER_ROW: usize = 4;
    /// Collectible field
    pub const COLLECTIBLE_ROWS: usize = 6;
    pub const COLLECTIBLES_PER_ROW: usize = 3;
    /// Vertical gap between row bands (cells)
    pub const ROW_GAP: i32 = 3;

    /// Enemy pool
    pub const ENEMY_COUNT: usize = 4;
    /// Enemies wait one row below the screen
    pub const ENEMY_SPAWN_ROW: i32 = -1;

    /// Finish line sits this many rows above the remaining move count
    pub const FINISH_LINE_OFFSET: i32 = 6;
    pub const FINISH_LINE_HEIGHT: i32 = 2;
}
