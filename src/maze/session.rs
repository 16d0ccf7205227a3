// Maze escape session: the player starts in the far corner and walks to the
// goal at (1,1) while a clock runs.
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::Maze;
use crate::error::Result;
use crate::grid::{Direction, GridPos, HeldKeys, format_clock};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MazeConfig {
    pub player_move_interval: f64,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            player_move_interval: 120.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum MazeStatus {
    Running,
    Won { elapsed_ms: f64 },
}

#[derive(Clone, Debug, PartialEq)]
pub enum MazeEvent {
    PlayerMoved(GridPos),
    Won { elapsed_ms: f64, time_text: String },
}

#[derive(Clone, Debug, Serialize)]
pub struct MazeSnapshot {
    pub status: MazeStatus,
    pub cols: usize,
    pub rows: usize,
    pub player: GridPos,
    pub goal: GridPos,
    pub elapsed_ms: f64,
    pub time_text: String,
    pub keys: HeldKeys,
}

pub struct MazeGame {
    config: MazeConfig,
    rng: StdRng,
    maze: Maze,
    player: GridPos,
    goal: GridPos,
    move_cooldown: f64,
    keys: HeldKeys,
    elapsed_ms: f64,
    status: MazeStatus,
}

impl MazeGame {
    pub fn new(config: MazeConfig, cols: usize, rows: usize, seed: u64) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        let maze = Maze::generate(cols, rows, &mut rng)?;
        info!("maze: new {cols}x{rows} labyrinth");
        Ok(Self {
            config,
            rng,
            player: Self::spawn_point(&maze),
            goal: GridPos::new(1, 1),
            maze,
            move_cooldown: 0.0,
            keys: HeldKeys::default(),
            elapsed_ms: 0.0,
            status: MazeStatus::Running,
        })
    }

    fn spawn_point(maze: &Maze) -> GridPos {
        GridPos::new(maze.cols() as i32 - 2, maze.rows() as i32 - 2)
    }

    /// Carve a fresh maze of the same size and reset the run.
    pub fn regenerate(&mut self) -> Result<()> {
        self.maze = Maze::generate(self.maze.cols(), self.maze.rows(), &mut self.rng)?;
        self.player = Self::spawn_point(&self.maze);
        self.move_cooldown = 0.0;
        self.keys.clear();
        self.elapsed_ms = 0.0;
        self.status = MazeStatus::Running;
        Ok(())
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn player(&self) -> GridPos {
        self.player
    }

    pub fn goal(&self) -> GridPos {
        self.goal
    }

    pub fn status(&self) -> MazeStatus {
        self.status
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn set_key(&mut self, dir: Direction, pressed: bool) {
        self.keys.set(dir, pressed);
    }

    /// A restarts only once the maze has been escaped.
    pub fn handle_a(&mut self) -> Result<bool> {
        if matches!(self.status, MazeStatus::Won { .. }) {
            self.regenerate()?;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn tick(&mut self, dt: f64) -> Vec<MazeEvent> {
        let mut events = Vec::new();
        if self.status != MazeStatus::Running {
            return events;
        }
        self.elapsed_ms += dt;
        self.move_player(dt, &mut events);

        if self.player == self.goal {
            self.status = MazeStatus::Won {
                elapsed_ms: self.elapsed_ms,
            };
            let time_text = format_clock(self.elapsed_ms);
            info!("maze: escaped in {time_text}");
            events.push(MazeEvent::Won {
                elapsed_ms: self.elapsed_ms,
                time_text,
            });
        }
        events
    }

    fn move_player(&mut self, dt: f64, events: &mut Vec<MazeEvent>) {
        self.move_cooldown -= dt;
        if self.move_cooldown > 0.0 {
            return;
        }
        let Some(dir) = self.keys.direction() else {
            return;
        };
        let next =
            self.player
                .step_clamped(dir, self.maze.cols() as i32, self.maze.rows() as i32);
        if next == self.player || !self.maze.is_open(next) {
            return;
        }
        self.player = next;
        self.move_cooldown = self.config.player_move_interval;
        events.push(MazeEvent::PlayerMoved(next));
    }

    pub fn snapshot(&self) -> MazeSnapshot {
        MazeSnapshot {
            status: self.status,
            cols: self.maze.cols(),
            rows: self.maze.rows(),
            player: self.player,
            goal: self.goal,
            elapsed_ms: self.elapsed_ms,
            time_text: format_clock(self.elapsed_ms),
            keys: self.keys,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Breadth-first route from the player to the goal as directions.
    fn route(game: &MazeGame) -> Vec<Direction> {
        let maze = game.maze();
        let cols = maze.cols() as i32;
        let mut prev: Vec<Option<(GridPos, Direction)>> =
            vec![None; maze.cols() * maze.rows()];
        let mut queue = std::collections::VecDeque::from([game.player()]);
        let mut seen = vec![false; maze.cols() * maze.rows()];
        seen[game.player().index(cols)] = true;
        while let Some(pos) = queue.pop_front() {
            if pos == game.goal() {
                break;
            }
            for dir in Direction::ALL {
                let (dc, dr) = dir.delta();
                let next = GridPos::new(pos.col + dc, pos.row + dr);
                if maze.is_open(next) && !seen[next.index(cols)] {
                    seen[next.index(cols)] = true;
                    prev[next.index(cols)] = Some((pos, dir));
                    queue.push_back(next);
                }
            }
        }
        let mut dirs = Vec::new();
        let mut cur = game.goal();
        while let Some((from, dir)) = prev[cur.index(cols)] {
            dirs.push(dir);
            cur = from;
        }
        dirs.reverse();
        dirs
    }

    #[test]
    fn player_spawns_opposite_the_goal() {
        let game = MazeGame::new(MazeConfig::default(), 21, 15, 3).unwrap();
        assert_eq!(game.player(), GridPos::new(19, 13));
        assert_eq!(game.goal(), GridPos::new(1, 1));
        assert!(game.maze().is_open(game.player()));
    }

    #[test]
    fn walls_block_movement() {
        let mut game = MazeGame::new(MazeConfig::default(), 21, 15, 3).unwrap();
        // (20, 13) is the right border: always a wall
        game.set_key(Direction::Right, true);
        assert!(game.tick(16.0).is_empty());
        assert_eq!(game.player(), GridPos::new(19, 13));
    }

    #[test]
    fn walking_the_route_wins_and_reports_time() {
        let mut game = MazeGame::new(MazeConfig::default(), 21, 15, 9).unwrap();
        let steps = route(&game);
        assert!(!steps.is_empty());

        let mut last = Vec::new();
        for dir in steps {
            game.set_key(dir, true);
            last = game.tick(120.0);
            game.set_key(dir, false);
        }
        assert_eq!(game.player(), game.goal());
        match game.status() {
            MazeStatus::Won { elapsed_ms } => assert!(elapsed_ms > 0.0),
            other => panic!("expected a win, got {other:?}"),
        }
        assert!(matches!(last.last(), Some(MazeEvent::Won { .. })));
        // frozen after the win
        assert!(game.tick(1000.0).is_empty());
    }

    #[test]
    fn handle_a_restarts_only_after_win() {
        let mut game = MazeGame::new(MazeConfig::default(), 15, 15, 4).unwrap();
        assert!(!game.handle_a().unwrap());
        game.status = MazeStatus::Won { elapsed_ms: 10.0 };
        game.player = game.goal;
        assert!(game.handle_a().unwrap());
        assert_eq!(game.status(), MazeStatus::Running);
        assert_eq!(game.player(), GridPos::new(13, 13));
        assert_eq!(game.elapsed_ms(), 0.0);
    }
}
