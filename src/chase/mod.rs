//! Chase game: the player collects coins on a tile grid while monsters chase
//! them down, arm when adjacent and explode after a short delay.
//!
//! The session is pure simulation. `tick` advances it by the elapsed
//! milliseconds of one animation frame and returns what happened as a list of
//! [`ChaseEvent`]s; the browser layer turns those into DOM updates and sound
//! cues. All randomness comes from the session's own seeded `StdRng`.
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::grid::{Direction, GridPos, HeldKeys};

mod config;
mod monster;

pub use config::{ChaseConfig, MonsterQuota, PurpleVariant};
pub use monster::{Monster, MonsterKind, MonsterState, greedy_step};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChaseStatus {
    Playing,
    Over,
}

/// Something observable that happened during a tick.
#[derive(Clone, Debug, PartialEq)]
pub enum ChaseEvent {
    PlayerMoved(GridPos),
    CoinSpawned(GridPos),
    CoinCollected { score: u32 },
    MonsterSpawned { id: u32, pos: GridPos, kind: MonsterKind },
    MonsterMoved { id: u32, pos: GridPos },
    MonsterArming { id: u32 },
    MonsterExploded { id: u32, pos: GridPos, radius: i32, kind: MonsterKind },
    GameOver { score: u32, highscore: u32, new_highscore: bool },
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct Player {
    pub pos: GridPos,
    pub move_cooldown: f64,
}

/// Constraints for a random free-cell search.
#[derive(Clone, Copy, Debug)]
struct SpotQuery {
    avoid_coin: bool,
    avoid_monsters: bool,
    avoid_player: bool,
    min_distance_from_player: i32,
}

/// Introspection record returned by `getState()`.
#[derive(Clone, Debug, Serialize)]
pub struct ChaseSnapshot<'a> {
    pub status: ChaseStatus,
    pub score: u32,
    pub highscore: u32,
    pub game_time: f64,
    pub cols: i32,
    pub rows: i32,
    pub player: Player,
    pub keys: HeldKeys,
    pub coin: Option<GridPos>,
    pub monsters: &'a [Monster],
}

pub struct ChaseGame {
    config: ChaseConfig,
    cols: i32,
    rows: i32,
    rng: StdRng,
    status: ChaseStatus,
    score: u32,
    highscore: u32,
    game_time: f64,
    player: Player,
    keys: HeldKeys,
    coin: Option<GridPos>,
    monsters: Vec<Monster>,
    next_monster_id: u32,
    last_tap_move_at: f64,
    last_monster_spawn_at: f64,
}

impl ChaseGame {
    pub fn new(config: ChaseConfig, cols: i32, rows: i32, highscore: u32, seed: u64) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        info!("chase: new session {cols}x{rows}, highscore {highscore}");
        Self {
            config,
            cols,
            rows,
            rng: StdRng::seed_from_u64(seed),
            status: ChaseStatus::Playing,
            score: 0,
            highscore,
            game_time: 0.0,
            player: Player {
                pos: GridPos::new(cols / 2, rows / 2),
                move_cooldown: 0.0,
            },
            keys: HeldKeys::default(),
            coin: None,
            monsters: Vec::new(),
            next_monster_id: 0,
            last_tap_move_at: 0.0,
            last_monster_spawn_at: 0.0,
        }
    }

    pub fn config(&self) -> &ChaseConfig {
        &self.config
    }

    pub fn dimensions(&self) -> (i32, i32) {
        (self.cols, self.rows)
    }

    pub fn status(&self) -> ChaseStatus {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn highscore(&self) -> u32 {
        self.highscore
    }

    pub fn player(&self) -> GridPos {
        self.player.pos
    }

    pub fn coin(&self) -> Option<GridPos> {
        self.coin
    }

    pub fn monsters(&self) -> &[Monster] {
        &self.monsters
    }

    pub fn set_key(&mut self, dir: Direction, pressed: bool) {
        self.keys.set(dir, pressed);
    }

    pub fn snapshot(&self) -> ChaseSnapshot<'_> {
        ChaseSnapshot {
            status: self.status,
            score: self.score,
            highscore: self.highscore,
            game_time: self.game_time,
            cols: self.cols,
            rows: self.rows,
            player: self.player,
            keys: self.keys,
            coin: self.coin,
            monsters: &self.monsters,
        }
    }

    /// Advance the simulation by `dt` milliseconds.
    pub fn tick(&mut self, dt: f64) -> Vec<ChaseEvent> {
        let mut events = Vec::new();
        if self.status != ChaseStatus::Playing {
            return events;
        }
        self.game_time += dt;

        if self.monsters_enabled() && self.coin.is_none() {
            self.spawn_coin(&mut events);
        }

        self.move_player(dt, &mut events);
        self.update_monsters(dt, &mut events);
        if self.status != ChaseStatus::Playing {
            return events;
        }
        self.ensure_desired_monsters(&mut events);
        self.check_coin_pickup(&mut events);
        events
    }

    /// Discrete tap move. Bypasses the hold-to-move cooldown but is rate
    /// limited and only allowed once monsters are active.
    pub fn handle_press(&mut self, dir: Direction) -> Option<GridPos> {
        if self.status != ChaseStatus::Playing || !self.monsters_enabled() {
            return None;
        }
        let now = self.game_time;
        if now - self.last_tap_move_at < self.config.tap_move_min_interval {
            return None;
        }
        self.last_tap_move_at = now;
        self.try_move_player(dir, true)
    }

    fn monsters_enabled(&self) -> bool {
        self.game_time >= self.config.monsters_enabled_at
    }

    fn move_player(&mut self, dt: f64, events: &mut Vec<ChaseEvent>) {
        self.player.move_cooldown -= dt;
        if self.player.move_cooldown > 0.0 {
            return;
        }
        let Some(dir) = self.keys.direction() else {
            return;
        };
        if let Some(pos) = self.try_move_player(dir, false) {
            events.push(ChaseEvent::PlayerMoved(pos));
        }
    }

    fn try_move_player(&mut self, dir: Direction, force: bool) -> Option<GridPos> {
        if !force && self.player.move_cooldown > 0.0 {
            return None;
        }
        let next = self.player.pos.step_clamped(dir, self.cols, self.rows);
        if next == self.player.pos {
            return None;
        }
        self.player.pos = next;
        self.player.move_cooldown = self.config.player_move_interval;
        Some(next)
    }

    fn update_monsters(&mut self, dt: f64, events: &mut Vec<ChaseEvent>) {
        let player = self.player.pos;
        let (cols, rows) = (self.cols, self.rows);
        let explosion_delay = self.config.explosion_delay;
        let mut caught = false;

        for m in self.monsters.iter_mut().filter(|m| !m.dead) {
            match m.state {
                MonsterState::Chasing => {
                    if player.tile_distance(m.pos) <= 1 {
                        m.state = MonsterState::Arming {
                            timer: explosion_delay,
                        };
                        events.push(ChaseEvent::MonsterArming { id: m.id });
                        continue;
                    }

                    m.move_cooldown -= dt;
                    if m.move_cooldown > 0.0 {
                        continue;
                    }
                    m.move_cooldown = m.move_interval;

                    let (dc, dr) = greedy_step(m.pos, player);
                    let next = m.pos.offset_clamped(dc, dr, cols, rows);
                    if next == player || next == m.pos {
                        continue;
                    }
                    m.pos = next;
                    events.push(ChaseEvent::MonsterMoved { id: m.id, pos: next });
                }
                MonsterState::Arming { timer } => {
                    let timer = timer - dt;
                    m.state = MonsterState::Arming { timer };
                    if timer <= 0.0 {
                        debug!("chase: monster {} exploded at {:?}", m.id, m.pos);
                        events.push(ChaseEvent::MonsterExploded {
                            id: m.id,
                            pos: m.pos,
                            radius: m.blast_radius,
                            kind: m.kind,
                        });
                        if player.tile_distance(m.pos) <= m.blast_radius {
                            caught = true;
                        }
                        m.dead = true;
                    }
                }
            }
        }

        self.monsters.retain(|m| !m.dead);
        if caught {
            self.game_over(events);
        }
    }

    fn ensure_desired_monsters(&mut self, events: &mut Vec<ChaseEvent>) {
        if !self.monsters_enabled() {
            return;
        }
        if self.monsters.len() >= self.config.quota.desired(self.score) {
            return;
        }
        if self.game_time - self.last_monster_spawn_at < self.config.monster_spawn_min_interval {
            return;
        }
        if self.spawn_monster(events) {
            self.last_monster_spawn_at = self.game_time;
        }
    }

    fn spawn_monster(&mut self, events: &mut Vec<ChaseEvent>) -> bool {
        let Some(pos) = self.find_free_spot(SpotQuery {
            avoid_coin: true,
            avoid_monsters: true,
            avoid_player: false,
            min_distance_from_player: self.config.min_spawn_distance,
        }) else {
            return false;
        };

        let purple = &self.config.purple;
        let kind = if self.score >= purple.min_score && self.rng.gen_bool(purple.chance) {
            MonsterKind::Purple
        } else {
            MonsterKind::Normal
        };
        let (interval, radius) = match kind {
            MonsterKind::Normal => (
                self.config.monster_move_interval(),
                self.config.explosion_radius,
            ),
            MonsterKind::Purple => (
                self.config.purple_move_interval(),
                self.config.explosion_radius * purple.radius_factor,
            ),
        };

        let id = self.next_monster_id;
        self.next_monster_id += 1;
        self.monsters.push(Monster::new(id, pos, kind, interval, radius));
        debug!("chase: spawned {kind:?} monster {id} at {pos:?}");
        events.push(ChaseEvent::MonsterSpawned { id, pos, kind });
        true
    }

    fn spawn_coin(&mut self, events: &mut Vec<ChaseEvent>) {
        if let Some(pos) = self.find_free_spot(SpotQuery {
            avoid_coin: true,
            avoid_monsters: true,
            avoid_player: true,
            min_distance_from_player: 0,
        }) {
            self.coin = Some(pos);
            events.push(ChaseEvent::CoinSpawned(pos));
        }
    }

    fn check_coin_pickup(&mut self, events: &mut Vec<ChaseEvent>) {
        if self.coin != Some(self.player.pos) {
            return;
        }
        self.score += 1;
        events.push(ChaseEvent::CoinCollected { score: self.score });
        self.ensure_desired_monsters(events);
        self.coin = None;
        self.spawn_coin(events);
    }

    fn game_over(&mut self, events: &mut Vec<ChaseEvent>) {
        self.status = ChaseStatus::Over;
        let new_highscore = self.score > self.highscore;
        if new_highscore {
            self.highscore = self.score;
        }
        info!(
            "chase: game over with score {} (highscore {})",
            self.score, self.highscore
        );
        events.push(ChaseEvent::GameOver {
            score: self.score,
            highscore: self.highscore,
            new_highscore,
        });
    }

    /// Random cell search with a bounded number of tries. `None` once the
    /// grid is too crowded to find a match.
    fn find_free_spot(&mut self, query: SpotQuery) -> Option<GridPos> {
        for _ in 0..self.config.spawn_retries {
            let pos = GridPos::new(
                self.rng.gen_range(0..self.cols),
                self.rng.gen_range(0..self.rows),
            );
            if query.avoid_player && pos == self.player.pos {
                continue;
            }
            if query.min_distance_from_player > 0
                && self.player.pos.tile_distance(pos) < query.min_distance_from_player
            {
                continue;
            }
            if query.avoid_coin && self.coin == Some(pos) {
                continue;
            }
            if query.avoid_monsters && self.monsters.iter().any(|m| !m.dead && m.pos == pos) {
                continue;
            }
            return Some(pos);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_config() -> ChaseConfig {
        ChaseConfig {
            monsters_enabled_at: f64::INFINITY,
            ..ChaseConfig::default()
        }
    }

    fn place_monster(game: &mut ChaseGame, pos: GridPos) -> u32 {
        let id = game.next_monster_id;
        game.next_monster_id += 1;
        let interval = game.config.monster_move_interval();
        let radius = game.config.explosion_radius;
        game.monsters
            .push(Monster::new(id, pos, MonsterKind::Normal, interval, radius));
        id
    }

    #[test]
    fn player_starts_in_the_middle() {
        let game = ChaseGame::new(ChaseConfig::default(), 21, 15, 0, 1);
        assert_eq!(game.player(), GridPos::new(10, 7));
        assert_eq!(game.status(), ChaseStatus::Playing);
        assert!(game.coin().is_none());
    }

    #[test]
    fn held_key_moves_once_per_cooldown() {
        let mut game = ChaseGame::new(quiet_config(), 21, 21, 0, 1);
        game.set_key(Direction::Right, true);
        let events = game.tick(16.0);
        assert_eq!(events, vec![ChaseEvent::PlayerMoved(GridPos::new(11, 10))]);
        assert!(game.tick(200.0).is_empty());
        let events = game.tick(74.0);
        assert_eq!(events, vec![ChaseEvent::PlayerMoved(GridPos::new(12, 10))]);
    }

    #[test]
    fn player_never_leaves_grid() {
        let mut game = ChaseGame::new(quiet_config(), 7, 5, 0, 3);
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..400 {
            let dir = Direction::ALL[rng.gen_range(0..4)];
            game.set_key(dir, true);
            game.tick(300.0);
            game.handle_press(dir);
            game.set_key(dir, false);
            let p = game.player();
            assert!((0..7).contains(&p.col), "col out of range: {p:?}");
            assert!((0..5).contains(&p.row), "row out of range: {p:?}");
        }
    }

    #[test]
    fn adjacent_monster_arms_then_detonates_after_delay() {
        let mut game = ChaseGame::new(quiet_config(), 21, 21, 3, 1);
        let id = place_monster(&mut game, GridPos::new(11, 11));

        let events = game.tick(16.0);
        assert_eq!(events, vec![ChaseEvent::MonsterArming { id }]);
        assert!(game.monsters()[0].is_arming());

        assert!(game.tick(499.0).is_empty());
        assert_eq!(game.status(), ChaseStatus::Playing);

        let events = game.tick(1.0);
        assert_eq!(
            events,
            vec![
                ChaseEvent::MonsterExploded {
                    id,
                    pos: GridPos::new(11, 11),
                    radius: 1,
                    kind: MonsterKind::Normal,
                },
                ChaseEvent::GameOver {
                    score: 0,
                    highscore: 3,
                    new_highscore: false,
                },
            ]
        );
        assert_eq!(game.status(), ChaseStatus::Over);
        assert!(game.monsters().is_empty());
        assert!(game.tick(16.0).is_empty());
    }

    #[test]
    fn escaping_the_blast_keeps_the_game_running() {
        let mut game = ChaseGame::new(quiet_config(), 21, 21, 0, 1);
        place_monster(&mut game, GridPos::new(11, 10));
        game.tick(16.0);

        game.set_key(Direction::Left, true);
        game.tick(100.0);
        game.set_key(Direction::Left, false);
        assert_eq!(game.player(), GridPos::new(9, 10));

        game.tick(274.0);
        let events = game.tick(200.0);
        assert!(matches!(events[0], ChaseEvent::MonsterExploded { .. }));
        assert_eq!(game.status(), ChaseStatus::Playing);
        assert!(game.monsters().is_empty());
    }

    #[test]
    fn chasing_monster_steps_toward_player() {
        let mut game = ChaseGame::new(quiet_config(), 21, 21, 0, 1);
        let id = place_monster(&mut game, GridPos::new(10, 2));
        let events = game.tick(16.0);
        assert_eq!(
            events,
            vec![ChaseEvent::MonsterMoved {
                id,
                pos: GridPos::new(10, 3)
            }]
        );
        // cooldown now gates the next step
        assert!(game.tick(100.0).is_empty());
    }

    #[test]
    fn collecting_coin_scores_and_respawns() {
        let config = ChaseConfig {
            monsters_enabled_at: 0.0,
            ..ChaseConfig::default()
        };
        let mut game = ChaseGame::new(config, 21, 21, 0, 5);
        game.coin = Some(GridPos::new(11, 10));
        game.set_key(Direction::Right, true);
        let events = game.tick(300.0);

        assert_eq!(game.score(), 1);
        assert!(events.contains(&ChaseEvent::CoinCollected { score: 1 }));
        let coin = game.coin().expect("coin respawned");
        assert_ne!(coin, game.player());
        assert!(
            events
                .iter()
                .any(|e| matches!(e, ChaseEvent::MonsterSpawned { .. }))
        );
        for m in game.monsters() {
            assert!(m.pos.tile_distance(game.player()) >= 6);
        }
    }

    #[test]
    fn crowded_grid_skips_spawns_silently() {
        let config = ChaseConfig {
            monsters_enabled_at: 0.0,
            ..ChaseConfig::default()
        };
        let mut game = ChaseGame::new(config, 1, 1, 0, 1);
        for _ in 0..10 {
            game.tick(300.0);
        }
        assert!(game.coin().is_none());
        assert!(game.monsters().is_empty());
        assert_eq!(game.status(), ChaseStatus::Playing);
    }

    #[test]
    fn tap_moves_are_rate_limited_and_gated() {
        let mut game = ChaseGame::new(ChaseConfig::default(), 21, 21, 0, 1);
        assert_eq!(game.handle_press(Direction::Up), None);
        game.game_time = 2000.0;
        assert_eq!(game.handle_press(Direction::Up), Some(GridPos::new(10, 9)));
        assert_eq!(game.handle_press(Direction::Up), None);
        game.game_time += 45.0;
        assert_eq!(game.handle_press(Direction::Up), Some(GridPos::new(10, 8)));
    }

    #[test]
    fn beating_the_highscore_is_reported() {
        let mut game = ChaseGame::new(quiet_config(), 21, 21, 2, 1);
        game.score = 7;
        place_monster(&mut game, GridPos::new(10, 11));
        game.tick(16.0);
        let events = game.tick(500.0);
        assert!(events.contains(&ChaseEvent::GameOver {
            score: 7,
            highscore: 7,
            new_highscore: true
        }));
        assert_eq!(game.highscore(), 7);
    }

    #[test]
    fn purple_monsters_only_after_threshold() {
        let config = ChaseConfig {
            monsters_enabled_at: 0.0,
            purple: PurpleVariant {
                chance: 1.0,
                ..ChaseConfig::default().purple
            },
            ..ChaseConfig::default()
        };
        let mut game = ChaseGame::new(config, 31, 31, 0, 11);
        game.tick(300.0);
        assert_eq!(game.monsters()[0].kind, MonsterKind::Normal);

        game.monsters.clear();
        game.score = 10;
        game.game_time += 1000.0;
        game.tick(16.0);
        let m = &game.monsters()[0];
        assert_eq!(m.kind, MonsterKind::Purple);
        assert_eq!(m.blast_radius, 2);
        assert_eq!(m.move_interval, 403.0);
    }

    #[test]
    fn same_seed_same_session() {
        let run = |seed| {
            let config = ChaseConfig {
                monsters_enabled_at: 0.0,
                ..ChaseConfig::default()
            };
            let mut game = ChaseGame::new(config, 25, 18, 0, seed);
            game.set_key(Direction::Left, true);
            for _ in 0..60 {
                game.tick(33.0);
            }
            serde_json::to_string(&game.snapshot()).unwrap()
        };
        assert_eq!(run(42), run(42));
    }
}
