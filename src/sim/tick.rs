//! Simulation clock, intents and the forward step
//!
//! The host calls `advance_tick` at a fixed cadence and `apply_intent`
//! whenever it sees input. Both run to completion synchronously.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::grid::{CellRect, Lateral, PixelRect};
use super::state::{Facing, GameEvent, GamePhase, GameState};
use crate::consts::{FINISH_LINE_HEIGHT, MOVE_TIME_SOFT_LIMIT, MOVE_TIME_STEP};

/// Logical input from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    /// Start the next level; only honoured once the current one is over
    Restart,
}

/// Read-only view of the simulation for renderers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub player: EntityView,
    pub enemies: Vec<EntityView>,
    pub obstacles: Vec<RectView>,
    pub collectibles: Vec<CollectibleView>,
    pub finish_line: RectView,
    pub moves_left: u32,
    pub points: u32,
    pub high_score: u32,
    pub level: u32,
    pub moves_until_jump: u32,
    pub phase: GamePhase,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EntityView {
    pub cell: CellRect,
    pub rect: PixelRect,
    pub facing: Facing,
}

/// A plain rectangle (obstacle, finish banner)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RectView {
    pub cell: CellRect,
    pub rect: PixelRect,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CollectibleView {
    pub cell: CellRect,
    pub rect: PixelRect,
    pub taken: bool,
}

/// Next move time after a cleared level
pub fn ramp_move_time(move_time: u32, floor: u32) -> u32 {
    let mut t = move_time as i64 - MOVE_TIME_STEP as i64;
    if t <= MOVE_TIME_SOFT_LIMIT as i64 {
        t += MOVE_TIME_STEP as i64 / 2;
    }
    t.max(floor as i64) as u32
}

impl GameState {
    /// Advance the clock one tick, firing a forward step every `move_time` ticks
    pub fn advance_tick(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.frames % self.move_time as u64 == 0 {
            self.forward_step_into(&mut events);
        }
        self.frames += 1;
        events
    }

    /// Apply a host intent. Out-of-phase intents are no-ops.
    pub fn apply_intent(&mut self, intent: Intent) -> Vec<GameEvent> {
        let mut events = Vec::new();
        match (intent, self.phase) {
            (Intent::MoveLeft, GamePhase::Playing) => self.move_lateral(Lateral::Left, &mut events),
            (Intent::MoveRight, GamePhase::Playing) => {
                self.move_lateral(Lateral::Right, &mut events)
            }
            (Intent::Restart, GamePhase::Won | GamePhase::Lost) => self.restart(&mut events),
            _ => {}
        }
        events
    }

    /// Run one forward step now, regardless of the clock
    pub fn forward_step(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.forward_step_into(&mut events);
        events
    }

    fn forward_step_into(&mut self, events: &mut Vec<GameEvent>) {
        if self.phase.is_terminal() {
            return;
        }

        let ahead = CellRect::cell(self.player.pos + IVec2::Y);
        if self.obstacles.blocks(&ahead) {
            log::debug!("Forward step blocked at {:?}", self.player.pos);
            events.push(GameEvent::StepBlocked);
            if self.rules.pursue_on_blocked_step {
                self.run_pursuit(events);
                self.resolve_phase(events);
            }
            return;
        }

        // The world moves, the player stays on its screen row
        self.enemies.scroll();
        self.obstacles.scroll(&mut self.rng);
        self.collectibles.scroll(&mut self.rng);
        self.pick_up(events);

        self.moves_left = self.moves_left.saturating_sub(1);
        self.moves += 1;
        self.player.facing = Facing::Up;
        events.push(GameEvent::StepTaken);

        self.run_pursuit(events);
        self.resolve_phase(events);
    }

    fn move_lateral(&mut self, dir: Lateral, events: &mut Vec<GameEvent>) {
        let from = self.player.pos.x;
        let (to, _wrapped) = self.grid.step_col(from, dir);
        self.player.pos.x = to;
        if self.obstacles.blocks(&self.player.cell()) {
            self.player.pos.x = from;
            return;
        }
        self.pick_up(events);
        self.player.facing = match dir {
            Lateral::Left => Facing::Left,
            Lateral::Right => Facing::Right,
        };
    }

    fn pick_up(&mut self, events: &mut Vec<GameEvent>) {
        let count = self.collectibles.collect(&self.player.cell());
        if count > 0 {
            self.points += count;
            events.push(GameEvent::Collected(count));
        }
    }

    /// One pursuit pass, or two when the enemies jump on this move count
    fn run_pursuit(&mut self, events: &mut Vec<GameEvent>) {
        let jump = self.moves % self.rules.jump_interval == 0
            && self.last_jump_moves != Some(self.moves);
        let passes = if jump {
            self.last_jump_moves = Some(self.moves);
            events.push(GameEvent::EnemyJump);
            log::debug!("Enemies jump at move {}", self.moves);
            2
        } else {
            1
        };

        let player = self.player.cell();
        for _ in 0..passes {
            if self.enemies.pursuit_pass(&self.grid, &self.obstacles, &player) {
                self.player.eaten = true;
            }
        }
    }

    fn resolve_phase(&mut self, events: &mut Vec<GameEvent>) {
        if self.player.eaten {
            self.phase = GamePhase::Lost;
            events.push(GameEvent::Lost);
            log::info!("Level {} lost with {} points", self.level, self.points);
            if self.points > self.high_score {
                self.high_score = self.points;
                events.push(GameEvent::NewHighScore(self.high_score));
                log::info!("New high score: {}", self.high_score);
            }
        } else if self.moves_left == 0 {
            self.phase = GamePhase::Won;
            events.push(GameEvent::Won);
            log::info!("Level {} won in {} moves", self.level, self.moves);
        }
    }

    fn restart(&mut self, events: &mut Vec<GameEvent>) {
        if self.phase == GamePhase::Lost {
            if self.points > self.high_score {
                self.high_score = self.points;
                events.push(GameEvent::NewHighScore(self.high_score));
            }
            self.points = 0;
            self.level = 0;
            self.move_time = self.rules.restart_move_time;
        }
        self.level += 1;
        self.move_time = ramp_move_time(self.move_time, self.rules.move_time_floor);
        self.reset_world();
        events.push(GameEvent::Restarted { level: self.level });
        log::info!("Level {} started (move time {})", self.level, self.move_time);
    }

    /// Pure read of everything a renderer needs
    pub fn snapshot(&self) -> Snapshot {
        let grid = &self.grid;
        let view = |cell: CellRect, facing: Facing| EntityView {
            cell,
            rect: grid.rect_to_pixels(&cell),
            facing,
        };
        let finish = CellRect::new(0, self.finish_line_row(), grid.cols, FINISH_LINE_HEIGHT);

        Snapshot {
            player: view(self.player.cell(), self.player.facing),
            enemies: self.enemies.iter().map(|e| view(e.cell(), e.facing)).collect(),
            obstacles: self
                .obstacles
                .iter()
                .map(|o| RectView {
                    cell: o.rect,
                    rect: grid.rect_to_pixels(&o.rect),
                })
                .collect(),
            collectibles: self
                .collectibles
                .iter()
                .map(|c| CollectibleView {
                    cell: c.rect,
                    rect: grid.rect_to_pixels(&c.rect),
                    taken: c.taken,
                })
                .collect(),
            finish_line: RectView {
                cell: finish,
                rect: grid.rect_to_pixels(&finish),
            },
            moves_left: self.moves_left,
            points: self.points,
            high_score: self.high_score,
            level: self.level,
            moves_until_jump: self.moves_until_jump(),
            phase: self.phase,
        }
    }
}
