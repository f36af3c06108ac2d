//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in `GameState`. Collaborators only
//! read a `Snapshot` or send intents.

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::enemy::EnemyPool;
use super::field::{CollectibleField, ObstacleField};
use super::grid::{CellRect, Grid};
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Level in progress
    Playing,
    /// Reached the finish line; waiting for restart
    Won,
    /// Eaten by an enemy; waiting for restart
    Lost,
}

impl GamePhase {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GamePhase::Playing)
    }
}

/// Which way an entity last moved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    Up,
    Left,
    Right,
}

/// Things that happened during a tick, for audio/UI collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// World scrolled one row
    StepTaken,
    /// Forward step refused by an obstacle
    StepBlocked,
    /// Picked up this many collectibles
    Collected(u32),
    /// Enemies took their extra pursuit pass
    EnemyJump,
    Won,
    Lost,
    /// Best score raised to this value
    NewHighScore(u32),
    /// A new level started
    Restarted { level: u32 },
}

/// The player's fish
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: IVec2,
    pub facing: Facing,
    pub eaten: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: IVec2::new(PLAYER_START_COL, PLAYER_START_ROW),
            facing: Facing::Up,
            eaten: false,
        }
    }
}

impl Player {
    /// The single cell the player occupies
    #[inline]
    pub fn cell(&self) -> CellRect {
        CellRect::cell(self.pos)
    }
}

/// Tunables resolved from settings at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rules {
    pub goal_moves: u32,
    pub base_move_time: u32,
    pub restart_move_time: u32,
    pub move_time_floor: u32,
    pub jump_interval: u32,
    pub pursue_on_blocked_step: bool,
}

impl From<&Settings> for Rules {
    fn from(settings: &Settings) -> Self {
        Self::from_sanitized(&settings.sanitized())
    }
}

impl Rules {
    /// Settings must already be sanitized
    fn from_sanitized(settings: &Settings) -> Self {
        Self {
            goal_moves: settings.goal_moves,
            base_move_time: settings.base_move_time,
            restart_move_time: settings.restart_move_time,
            move_time_floor: settings.move_time_floor,
            jump_interval: settings.jump_interval,
            pursue_on_blocked_step: settings.pursue_on_blocked_step,
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Single source of randomness
    pub rng: Pcg32,
    pub rules: Rules,
    pub grid: Grid,
    pub phase: GamePhase,
    pub player: Player,
    pub obstacles: ObstacleField,
    pub collectibles: CollectibleField,
    pub enemies: EnemyPool,
    /// Forward steps left before the finish line
    pub moves_left: u32,
    /// Forward steps taken this level
    pub moves: u32,
    /// Collectibles gathered this life
    pub points: u32,
    /// Best points across lives
    pub high_score: u32,
    /// Current level (1-based)
    pub level: u32,
    /// Ticks per forward step
    pub move_time: u32,
    /// Ticks since the run started (never reset)
    pub frames: u64,
    /// `moves` value the last enemy jump fired on
    pub last_jump_moves: Option<u32>,
}

impl GameState {
    /// Create a new run with default rules
    pub fn new(seed: u64) -> Self {
        Self::with_settings(seed, &Settings::default(), 0)
    }

    /// Create a new run from settings and a previously stored best score
    pub fn with_settings(seed: u64, settings: &Settings, high_score: u32) -> Self {
        let settings = settings.sanitized();
        let grid = Grid::new(settings.viewport_width, settings.viewport_height);
        let rules = Rules::from_sanitized(&settings);
        let mut rng = Pcg32::seed_from_u64(seed);

        let obstacles = ObstacleField::generate(&mut rng, OBSTACLE_ROWS, grid.top_row());
        let collectibles = CollectibleField::generate(&mut rng, COLLECTIBLE_ROWS, grid.top_row());

        log::info!("New run: seed={} goal={} move_time={}", seed, rules.goal_moves, rules.base_move_time);

        Self {
            seed,
            rng,
            moves_left: rules.goal_moves,
            move_time: rules.base_move_time,
            rules,
            grid,
            phase: GamePhase::Playing,
            player: Player::default(),
            obstacles,
            collectibles,
            enemies: EnemyPool::spawn(),
            moves: 0,
            points: 0,
            high_score,
            level: 1,
            frames: 0,
            last_jump_moves: None,
        }
    }

    /// Regenerate the world for a new level, keeping score/level bookkeeping
    pub(crate) fn reset_world(&mut self) {
        self.obstacles = ObstacleField::generate(&mut self.rng, OBSTACLE_ROWS, self.grid.top_row());
        self.collectibles =
            CollectibleField::generate(&mut self.rng, COLLECTIBLE_ROWS, self.grid.top_row());
        self.enemies = EnemyPool::spawn();
        self.player = Player::default();
        self.moves_left = self.rules.goal_moves;
        self.moves = 0;
        self.last_jump_moves = None;
        self.phase = GamePhase::Playing;
    }

    /// Forward steps until the enemies next jump
    pub fn moves_until_jump(&self) -> u32 {
        let interval = self.rules.jump_interval;
        match self.moves % interval {
            0 => interval,
            r => interval - r,
        }
    }

    /// Row of the finish banner's lower edge
    pub fn finish_line_row(&self) -> i32 {
        self.moves_left as i32 + FINISH_LINE_OFFSET
    }
}
