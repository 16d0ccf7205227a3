// Draw-it session: a countdown, a cursor that paints or erases as it moves,
// and a verdict once time runs out or the player submits.
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::{Analysis, DrawGrid, TARGETS, Target, Verdict, analyze, classify};
use crate::grid::{Direction, GridPos, HeldKeys, format_countdown};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrawConfig {
    pub tile_size: f64,
    pub time_limit: f64,
    pub cursor_move_interval: f64,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            tile_size: 10.0,
            time_limit: 170_000.0,
            cursor_move_interval: 80.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawMode {
    Draw,
    Erase,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawStatus {
    Drawing,
    Judged,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawEvent {
    CursorMoved(GridPos),
    Painted(GridPos),
    Erased(GridPos),
    Judged(Box<(Analysis, Verdict)>),
}

#[derive(Clone, Debug, Serialize)]
pub struct DrawSnapshot<'a> {
    pub status: DrawStatus,
    pub mode: DrawMode,
    pub target: &'a Target,
    pub cols: usize,
    pub rows: usize,
    pub cursor: GridPos,
    pub filled: usize,
    pub time_remaining: f64,
    pub time_text: String,
    pub verdict: Option<&'a Verdict>,
}

pub struct DrawGame {
    config: DrawConfig,
    target: &'static Target,
    grid: DrawGrid,
    cursor: GridPos,
    mode: DrawMode,
    keys: HeldKeys,
    move_cooldown: f64,
    time_remaining: f64,
    status: DrawStatus,
    verdict: Option<Verdict>,
}

impl DrawGame {
    pub fn new(config: DrawConfig, cols: usize, rows: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let target = &TARGETS[rng.gen_range(0..TARGETS.len())];
        Self::with_target(config, cols, rows, target)
    }

    pub fn with_target(config: DrawConfig, cols: usize, rows: usize, target: &'static Target) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        info!("draw: new {cols}x{rows} canvas, target '{}'", target.id);
        Self {
            time_remaining: config.time_limit,
            config,
            target,
            grid: DrawGrid::new(cols, rows),
            cursor: GridPos::new((cols / 2) as i32, (rows / 2) as i32),
            mode: DrawMode::Draw,
            keys: HeldKeys::default(),
            move_cooldown: 0.0,
            status: DrawStatus::Drawing,
            verdict: None,
        }
    }

    pub fn target(&self) -> &'static Target {
        self.target
    }

    pub fn grid(&self) -> &DrawGrid {
        &self.grid
    }

    pub fn cursor(&self) -> GridPos {
        self.cursor
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    pub fn status(&self) -> DrawStatus {
        self.status
    }

    pub fn verdict(&self) -> Option<&Verdict> {
        self.verdict.as_ref()
    }

    pub fn time_remaining(&self) -> f64 {
        self.time_remaining
    }

    pub fn set_key(&mut self, dir: Direction, pressed: bool) {
        self.keys.set(dir, pressed);
    }

    /// A switches to drawing.
    pub fn handle_a(&mut self) {
        self.mode = DrawMode::Draw;
    }

    /// B switches to erasing.
    pub fn handle_b(&mut self) {
        self.mode = DrawMode::Erase;
    }

    /// Judge the drawing now instead of waiting for the clock.
    pub fn submit(&mut self) -> Option<DrawEvent> {
        if self.status != DrawStatus::Drawing {
            return None;
        }
        Some(self.evaluate())
    }

    pub fn tick(&mut self, dt: f64) -> Vec<DrawEvent> {
        let mut events = Vec::new();
        if self.status != DrawStatus::Drawing {
            return events;
        }
        self.time_remaining -= dt;
        if self.time_remaining <= 0.0 {
            self.time_remaining = 0.0;
            events.push(self.evaluate());
            return events;
        }
        self.move_cursor(dt, &mut events);
        events
    }

    fn move_cursor(&mut self, dt: f64, events: &mut Vec<DrawEvent>) {
        self.move_cooldown -= dt;
        if self.move_cooldown > 0.0 {
            return;
        }
        let Some(dir) = self.keys.direction() else {
            return;
        };
        let next = self
            .cursor
            .step_clamped(dir, self.grid.cols() as i32, self.grid.rows() as i32);
        if next == self.cursor {
            return;
        }
        self.cursor = next;
        self.move_cooldown = self.config.cursor_move_interval;
        events.push(DrawEvent::CursorMoved(next));

        let (col, row) = (next.col as usize, next.row as usize);
        match self.mode {
            DrawMode::Draw => {
                if self.grid.set(col, row, true) {
                    events.push(DrawEvent::Painted(next));
                }
            }
            DrawMode::Erase => {
                if self.grid.set(col, row, false) {
                    events.push(DrawEvent::Erased(next));
                }
            }
        }
    }

    fn evaluate(&mut self) -> DrawEvent {
        self.status = DrawStatus::Judged;
        let analysis = analyze(&self.grid);
        let verdict = classify(&analysis, self.target);
        info!(
            "draw: '{}' judged {} at {}% confidence",
            self.target.id,
            if verdict.success { "a match" } else { "no match" },
            verdict.confidence
        );
        self.verdict = Some(verdict.clone());
        DrawEvent::Judged(Box::new((analysis, verdict)))
    }

    pub fn snapshot(&self) -> DrawSnapshot<'_> {
        DrawSnapshot {
            status: self.status,
            mode: self.mode,
            target: self.target,
            cols: self.grid.cols(),
            rows: self.grid.rows(),
            cursor: self.cursor,
            filled: self.grid.filled_count(),
            time_remaining: self.time_remaining,
            time_text: format_countdown(self.time_remaining),
            verdict: self.verdict.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::find_target;

    fn game() -> DrawGame {
        DrawGame::with_target(DrawConfig::default(), 30, 20, find_target("square").unwrap())
    }

    #[test]
    fn cursor_paints_where_it_lands() {
        let mut g = game();
        assert_eq!(g.cursor(), GridPos::new(15, 10));
        g.set_key(Direction::Right, true);
        let events = g.tick(16.0);
        assert_eq!(
            events,
            vec![
                DrawEvent::CursorMoved(GridPos::new(16, 10)),
                DrawEvent::Painted(GridPos::new(16, 10)),
            ]
        );
        // cooldown blocks the next step
        assert!(g.tick(40.0).is_empty());
        assert_eq!(g.tick(40.0).len(), 2);
        assert!(g.grid().get(17, 10));
        // the start cell is never painted by just standing there
        assert!(!g.grid().get(15, 10));
    }

    #[test]
    fn erase_mode_clears_cells() {
        let mut g = game();
        g.set_key(Direction::Right, true);
        g.tick(80.0);
        g.tick(80.0);
        g.set_key(Direction::Right, false);
        assert_eq!(g.grid().filled_count(), 2);

        g.handle_b();
        assert_eq!(g.mode(), DrawMode::Erase);
        g.set_key(Direction::Left, true);
        let events = g.tick(80.0);
        assert!(events.contains(&DrawEvent::Erased(GridPos::new(16, 10))));
        assert_eq!(g.grid().filled_count(), 1);

        g.handle_a();
        assert_eq!(g.mode(), DrawMode::Draw);
    }

    #[test]
    fn timeout_judges_the_drawing() {
        let mut g = DrawGame::with_target(
            DrawConfig {
                time_limit: 1000.0,
                ..DrawConfig::default()
            },
            30,
            20,
            find_target("circle").unwrap(),
        );
        assert!(g.tick(999.0).is_empty());
        let events = g.tick(5.0);
        match events.as_slice() {
            [DrawEvent::Judged(judged)] => {
                let (analysis, verdict) = judged.as_ref();
                assert!(analysis.is_empty());
                assert!(!verdict.success);
                assert_eq!(verdict.confidence, 0);
            }
            other => panic!("unexpected events {other:?}"),
        }
        assert_eq!(g.status(), DrawStatus::Judged);
        assert_eq!(g.time_remaining(), 0.0);
        assert!(g.tick(16.0).is_empty());
        assert!(g.submit().is_none());
    }

    #[test]
    fn submit_early_uses_the_classifier() {
        let mut g = game();
        // draw a closed 6x6 block by sweeping rows
        for row in 7..13 {
            for col in 12..18 {
                g.grid.set(col, row, true);
            }
        }
        let Some(DrawEvent::Judged(judged)) = g.submit() else {
            panic!("submit should judge");
        };
        assert!(judged.1.success);
        assert_eq!(g.verdict().map(|v| v.success), Some(true));
    }

    #[test]
    fn seeded_target_choice_is_stable() {
        let a = DrawGame::new(DrawConfig::default(), 10, 10, 77);
        let b = DrawGame::new(DrawConfig::default(), 10, 10, 77);
        assert_eq!(a.target().id, b.target().id);
    }

    #[test]
    fn snapshot_formats_countdown() {
        let g = game();
        let snap = g.snapshot();
        assert_eq!(snap.time_text, "02:50");
        assert_eq!(snap.target.id, "square");
        assert!(snap.verdict.is_none());
    }
}
