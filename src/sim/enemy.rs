//! Enemy pool and greedy pursuit
//!
//! Each enemy closes on the player one cell per pass: forward while it is
//! below the player, otherwise sideways along the shorter wrapped distance.
//! Obstacles block every move; a blocked move is reverted.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::field::ObstacleField;
use super::grid::{CellRect, Grid, Lateral};
use super::state::Facing;
use crate::consts::{ENEMY_COUNT, ENEMY_SPAWN_ROW};

/// A pursuing shark
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: IVec2,
    pub facing: Facing,
    /// Spawn column, used when the enemy is reset
    pub start_col: i32,
}

impl Enemy {
    pub fn new(start_col: i32) -> Self {
        Self {
            pos: IVec2::new(start_col, ENEMY_SPAWN_ROW),
            facing: Facing::Up,
            start_col,
        }
    }

    #[inline]
    pub fn cell(&self) -> CellRect {
        CellRect::cell(self.pos)
    }

    /// Back to the spawn cell below the screen
    pub fn reset(&mut self) {
        self.pos = IVec2::new(self.start_col, ENEMY_SPAWN_ROW);
    }

    /// Try to move up one row; on a block, sidestep toward the player instead
    fn advance(&mut self, grid: &Grid, obstacles: &ObstacleField, target: IVec2) {
        self.facing = Facing::Up;
        self.pos.y += 1;
        if obstacles.blocks(&self.cell()) {
            self.pos.y -= 1;
            if self.pos.x > target.x {
                self.sidestep(grid, obstacles, Lateral::Left);
            } else if self.pos.x < target.x {
                self.sidestep(grid, obstacles, Lateral::Right);
            }
        }
    }

    /// Try to move one column sideways (wrapping); stay put on a block
    fn sidestep(&mut self, grid: &Grid, obstacles: &ObstacleField, dir: Lateral) {
        self.facing = match dir {
            Lateral::Left => Facing::Left,
            Lateral::Right => Facing::Right,
        };
        let from = self.pos.x;
        let (to, _wrapped) = grid.step_col(from, dir);
        self.pos.x = to;
        if obstacles.blocks(&self.cell()) {
            // Reverting a wrapped move lands back on the boundary column it left
            self.pos.x = from;
        }
    }

    /// Horizontal direction along the shorter wrapped distance, if any
    fn chase_direction(&self, grid: &Grid, target: IVec2) -> Option<Lateral> {
        let half = grid.half_cols();
        let (ex, px) = (self.pos.x, target.x);
        if (ex > px && ex - px <= half) || px - ex > half {
            Some(Lateral::Left)
        } else if (ex < px && px - ex <= half) || ex - px > half {
            Some(Lateral::Right)
        } else {
            None
        }
    }

    /// One pursuit move. Returns true if the enemy now overlaps the player.
    pub fn pursue(&mut self, grid: &Grid, obstacles: &ObstacleField, player: &CellRect) -> bool {
        let target = IVec2::new(player.x, player.y);
        if self.pos.y < target.y {
            self.advance(grid, obstacles, target);
        } else if let Some(dir) = self.chase_direction(grid, target) {
            self.sidestep(grid, obstacles, dir);
        }

        let caught = self.cell().overlaps(player);

        // Stalled below the screen: start over
        if self.pos.y < ENEMY_SPAWN_ROW {
            self.reset();
        }
        caught
    }
}

/// Fixed set of enemies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyPool {
    enemies: Vec<Enemy>,
}

impl EnemyPool {
    /// Enemy `i` spawns at column `2 * i`, one row below the screen
    pub fn spawn() -> Self {
        Self {
            enemies: (0..ENEMY_COUNT as i32).map(|i| Enemy::new(i * 2)).collect(),
        }
    }

    pub fn from_enemies(enemies: Vec<Enemy>) -> Self {
        Self { enemies }
    }

    /// Scroll every enemy down with the world
    pub fn scroll(&mut self) {
        for enemy in &mut self.enemies {
            enemy.pos.y -= 1;
        }
    }

    /// One pursuit pass over every enemy in slot order.
    /// Returns true if any enemy caught the player.
    pub fn pursuit_pass(&mut self, grid: &Grid, obstacles: &ObstacleField, player: &CellRect) -> bool {
        let mut caught = false;
        for enemy in &mut self.enemies {
            caught |= enemy.pursue(grid, obstacles, player);
        }
        caught
    }

    pub fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter()
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Obstacle field pushed far above the screen so nothing blocks
    fn open_field() -> ObstacleField {
        let mut rng = Pcg32::seed_from_u64(0);
        ObstacleField::generate(&mut rng, 6, 1000)
    }

    /// Open field with a single obstacle covering `rect`
    fn field_with(rect: CellRect) -> ObstacleField {
        let mut field = open_field();
        field.plant(0, rect);
        field
    }

    #[test]
    fn test_spawn_columns() {
        let pool = EnemyPool::spawn();
        let cols: Vec<i32> = pool.iter().map(|e| e.pos.x).collect();
        assert_eq!(cols, vec![0, 2, 4, 6]);
        assert!(pool.iter().all(|e| e.pos.y == -1));
    }

    #[test]
    fn test_advances_when_below_player() {
        let grid = Grid::default();
        let mut enemy = Enemy::new(2);
        let player = CellRect::cell(IVec2::new(3, 5));
        assert!(!enemy.pursue(&grid, &open_field(), &player));
        assert_eq!(enemy.pos, IVec2::new(2, 0));
        assert_eq!(enemy.facing, Facing::Up);
    }

    #[test]
    fn test_blocked_advance_sidesteps_toward_player() {
        let grid = Grid::default();
        let obstacles = field_with(CellRect::new(2, 1, 1, 1));
        let mut enemy = Enemy::new(2);
        enemy.pos = IVec2::new(2, 0);
        let player = CellRect::cell(IVec2::new(3, 5));
        enemy.pursue(&grid, &obstacles, &player);
        assert_eq!(enemy.pos, IVec2::new(3, 0));
        assert_eq!(enemy.facing, Facing::Right);
    }

    #[test]
    fn test_chases_along_shorter_wrap() {
        let grid = Grid::default();
        let player = CellRect::cell(IVec2::new(7, 5));
        // From column 0 the player is 1 step away going left through the edge
        let mut enemy = Enemy::new(0);
        enemy.pos = IVec2::new(0, 5);
        enemy.pursue(&grid, &open_field(), &player);
        assert_eq!(enemy.pos.x, 7);
        assert_eq!(enemy.facing, Facing::Left);

        // Directly to the right within half a screen
        let mut enemy = Enemy::new(0);
        enemy.pos = IVec2::new(4, 6);
        enemy.pursue(&grid, &open_field(), &player);
        assert_eq!(enemy.pos.x, 5);
        assert_eq!(enemy.facing, Facing::Right);
    }

    #[test]
    fn test_blocked_wrap_reverts_to_boundary() {
        let grid = Grid::default();
        let obstacles = field_with(CellRect::new(7, 5, 1, 1));
        let player = CellRect::cell(IVec2::new(6, 5));
        let mut enemy = Enemy::new(0);
        enemy.pos = IVec2::new(0, 5);
        enemy.pursue(&grid, &obstacles, &player);
        assert_eq!(enemy.pos, IVec2::new(0, 5));
    }

    #[test]
    fn test_same_column_above_player_holds() {
        let grid = Grid::default();
        let player = CellRect::cell(IVec2::new(3, 5));
        let mut enemy = Enemy::new(0);
        enemy.pos = IVec2::new(3, 8);
        assert!(!enemy.pursue(&grid, &open_field(), &player));
        assert_eq!(enemy.pos, IVec2::new(3, 8));
    }

    #[test]
    fn test_catches_player() {
        let grid = Grid::default();
        let player = CellRect::cell(IVec2::new(3, 5));
        let mut pool = EnemyPool::from_enemies(vec![Enemy {
            pos: IVec2::new(3, 4),
            facing: Facing::Up,
            start_col: 0,
        }]);
        assert!(pool.pursuit_pass(&grid, &open_field(), &player));
    }

    #[test]
    fn test_stalled_enemy_resets() {
        let grid = Grid::default();
        // Block the way up so the enemy cannot recover this pass
        let obstacles = field_with(CellRect::new(1, -1, 1, 1));
        let player = CellRect::cell(IVec2::new(1, 5));
        let mut enemy = Enemy::new(6);
        enemy.pos = IVec2::new(1, -2);
        enemy.pursue(&grid, &obstacles, &player);
        assert_eq!(enemy.pos, IVec2::new(6, -1));
    }
}
