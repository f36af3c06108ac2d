//! Fish Escape entry point
//!
//! Headless native host: drives the simulation at its tick cadence with a
//! simple autopilot and prints each forward step as a text frame.
//!
//! Usage: `fish-escape [settings.json] [highscore.json]`

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use fish_escape::consts::{GRID_COLS, GRID_ROWS};
use fish_escape::sim::{CellRect, GameEvent, GamePhase, GameState, Intent, Snapshot};
use fish_escape::{HighScore, JsonFileStore, ScoreStore, Settings};

/// Levels the demo plays before exiting
const DEMO_LEVELS: u32 = 3;
/// Hard stop so a stuck run still terminates
const MAX_TICKS: u64 = 200_000;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Fish Escape (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = args
        .next()
        .map(|p| Settings::load(&PathBuf::from(p)))
        .unwrap_or_default();
    let mut store = JsonFileStore::new(args.next().unwrap_or_else(|| "highscore.json".into()));
    let mut best = store.load();

    let seed = settings.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });
    let mut state = GameState::with_settings(seed, &settings, best.best);
    log::info!("Game initialized with seed: {}", seed);

    let mut levels_played = 0;
    while state.frames < MAX_TICKS {
        if let Some(intent) = autopilot(&state.snapshot()) {
            handle_events(&state.apply_intent(intent), &mut best, &mut store);
        }

        let events = state.advance_tick();
        if events
            .iter()
            .any(|e| matches!(e, GameEvent::StepTaken | GameEvent::StepBlocked))
        {
            println!("{}", render(&state.snapshot()));
        }
        handle_events(&events, &mut best, &mut store);

        if state.phase.is_terminal() {
            levels_played += 1;
            println!(
                "{} level {} with {} points (best {})",
                if state.phase == GamePhase::Won { "Cleared" } else { "Eaten on" },
                state.level,
                state.points,
                state.high_score
            );
            if levels_played >= DEMO_LEVELS {
                break;
            }
            handle_events(&state.apply_intent(Intent::Restart), &mut best, &mut store);
        }
    }

    log::info!("Demo finished after {} ticks", state.frames);
    Ok(())
}

fn handle_events(events: &[GameEvent], best: &mut HighScore, store: &mut impl ScoreStore) {
    for event in events {
        if let GameEvent::NewHighScore(points) = *event {
            if best.submit(points) {
                if let Err(e) = store.save(*best) {
                    log::warn!("Could not persist high score: {:#}", e);
                }
            }
        }
    }
}

/// Idle/demo player: dodge blocks ahead, drift toward pickups
fn autopilot(snap: &Snapshot) -> Option<Intent> {
    if snap.phase != GamePhase::Playing {
        return None;
    }
    let me = snap.player.cell;
    let blocked = |x: i32, y: i32| {
        let cell = CellRect::new(x.rem_euclid(GRID_COLS), y, 1, 1);
        snap.obstacles.iter().any(|o| o.cell.overlaps(&cell))
    };

    if blocked(me.x, me.y + 1) {
        // Prefer the side whose column is open ahead
        let left_ok = !blocked(me.x - 1, me.y) && !blocked(me.x - 1, me.y + 1);
        let right_ok = !blocked(me.x + 1, me.y) && !blocked(me.x + 1, me.y + 1);
        return match (left_ok, right_ok) {
            (true, _) => Some(Intent::MoveLeft),
            (false, true) => Some(Intent::MoveRight),
            _ => None,
        };
    }

    // Only chase pickups on the next row so the clock never outruns us
    let target = snap
        .collectibles
        .iter()
        .filter(|c| !c.taken && c.cell.y == me.y + 1 && c.cell.x < GRID_COLS)
        .min_by_key(|c| (c.cell.x - me.x).abs())?;
    match target.cell.x.cmp(&me.x) {
        std::cmp::Ordering::Less if !blocked(me.x - 1, me.y) => Some(Intent::MoveLeft),
        std::cmp::Ordering::Greater if !blocked(me.x + 1, me.y) => Some(Intent::MoveRight),
        _ => None,
    }
}

/// Text frame of the visible screen, top row first
fn render(snap: &Snapshot) -> String {
    let mut rows = vec![vec!['.'; GRID_COLS as usize]; GRID_ROWS as usize];
    let mut paint = |cell: &CellRect, ch: char| {
        for y in cell.y..cell.top() {
            for x in cell.x..cell.right() {
                if (0..GRID_COLS).contains(&x) && (0..GRID_ROWS).contains(&y) {
                    rows[y as usize][x as usize] = ch;
                }
            }
        }
    };

    paint(&snap.finish_line.cell, '=');
    for c in snap.collectibles.iter().filter(|c| !c.taken) {
        paint(&c.cell, 'o');
    }
    for o in &snap.obstacles {
        paint(&o.cell, '#');
    }
    paint(&snap.player.cell, 'F');
    for e in &snap.enemies {
        paint(&e.cell, 'S');
    }

    let mut out = format!(
        "level {}  moves left {}  points {}  best {}  jump in {}\n",
        snap.level, snap.moves_left, snap.points, snap.high_score, snap.moves_until_jump
    );
    for row in rows.iter().rev() {
        out.extend(row.iter());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_paints_finish_line_from_snapshot() {
        let mut state = GameState::new(12345);
        state.moves_left = 0;
        let snap = state.snapshot();
        let frame = render(&snap);
        let lines: Vec<&str> = frame.lines().collect();

        // Header, then rows 13 down to 0
        assert_eq!(lines.len(), 1 + GRID_ROWS as usize);
        let line_for = |row: i32| lines[1 + (GRID_ROWS - 1 - row) as usize];
        assert_eq!(snap.finish_line.cell.y, 6);
        assert_eq!(line_for(6), "========");
        assert_eq!(line_for(7), "========");
        assert_eq!(line_for(5), "...F....");
    }

    #[test]
    fn test_autopilot_sidesteps_block_ahead() {
        let mut state = GameState::new(12345);
        let mut snap = state.snapshot();
        snap.obstacles.truncate(0);
        snap.collectibles.truncate(0);
        let block = CellRect::new(3, 6, 1, 1);
        snap.obstacles.push(fish_escape::sim::RectView {
            cell: block,
            rect: state.grid.rect_to_pixels(&block),
        });
        assert_eq!(autopilot(&snap), Some(Intent::MoveLeft));

        state.phase = GamePhase::Won;
        assert_eq!(autopilot(&state.snapshot()), None);
    }
}
