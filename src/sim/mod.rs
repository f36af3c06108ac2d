//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Tick driven only
//! - Seeded RNG only
//! - Stable iteration order (by row and slot index)
//! - No rendering, input or storage dependencies

pub mod enemy;
pub mod field;
pub mod grid;
pub mod state;
pub mod tick;

pub use enemy::{Enemy, EnemyPool};
pub use field::{Collectible, CollectibleField, Obstacle, ObstacleField, Row, RowField, RowItem};
pub use grid::{CellRect, Grid, Lateral, PixelRect};
pub use state::{Facing, GameEvent, GamePhase, GameState, Player, Rules};
pub use tick::{CollectibleView, EntityView, Intent, RectView, Snapshot, ramp_move_time};
