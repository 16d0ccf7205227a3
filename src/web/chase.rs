// RogueBox in the browser: entities are absolutely positioned divs inside the
// game area, created and moved as the session reports events.
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement};

use super::{
    FrameLoop, LocalStorageStore, audio, create_div, document, place, remove_later, session_seed,
    set_hidden, set_px, set_text, to_js,
};
use crate::audio::AudioCue;
use crate::chase::{ChaseConfig, ChaseEvent, ChaseGame, ChaseStatus, MonsterKind};
use crate::error::{ArcadeError, Result};
use crate::grid::{Direction, GridPos};
use crate::settings::{KEY_CHASE_HIGHSCORE, get_setting, set_setting};

const EXPLOSION_VISIBLE_MS: i32 = 400;

#[derive(Clone)]
struct ChaseElements {
    game_area: HtmlElement,
    current_score: Option<HtmlElement>,
    highscore: Option<HtmlElement>,
    game_over_screen: Option<HtmlElement>,
    final_score: Option<HtmlElement>,
}

struct ChaseView {
    doc: Document,
    els: ChaseElements,
    tile: f64,
    cols: i32,
    rows: i32,
    player: HtmlElement,
    coin: Option<HtmlElement>,
    monsters: HashMap<u32, HtmlElement>,
}

impl ChaseView {
    fn mount(els: ChaseElements, game: &ChaseGame) -> Result<Self> {
        let doc = document()?;
        let tile = game.config().tile_size;
        let (cols, rows) = game.dimensions();
        els.game_area.set_inner_html("");
        let player = create_div(&doc, "rb-entity rb-player")?;
        place(&player, game.player(), tile);
        els.game_area.append_child(&player)?;

        set_text(els.current_score.as_ref(), "0");
        set_text(els.highscore.as_ref(), &game.highscore().to_string());
        set_text(els.final_score.as_ref(), "0");
        set_hidden(els.game_over_screen.as_ref(), true);

        Ok(Self {
            doc,
            els,
            tile,
            cols,
            rows,
            player,
            coin: None,
            monsters: HashMap::new(),
        })
    }

    fn spawn(&self, class: &str, pos: GridPos) -> Result<HtmlElement> {
        let el = create_div(&self.doc, class)?;
        place(&el, pos, self.tile);
        self.els.game_area.append_child(&el)?;
        Ok(el)
    }

    fn explosion(&self, pos: GridPos, radius: i32, kind: MonsterKind) -> Result<()> {
        let class = match kind {
            MonsterKind::Normal => "rb-explosion",
            MonsterKind::Purple => "rb-explosion rb-explosion-purple",
        };
        let el = create_div(&self.doc, class)?;
        // clip the blast square to the playfield
        let min_col = (pos.col - radius).max(0);
        let min_row = (pos.row - radius).max(0);
        let max_col = (pos.col + radius).min(self.cols - 1);
        let max_row = (pos.row + radius).min(self.rows - 1);
        place(&el, GridPos::new(min_col, min_row), self.tile);
        set_px(&el, "width", (max_col - min_col + 1) as f64 * self.tile);
        set_px(&el, "height", (max_row - min_row + 1) as f64 * self.tile);
        self.els.game_area.append_child(&el)?;
        remove_later(el, EXPLOSION_VISIBLE_MS);
        Ok(())
    }

    fn apply(&mut self, event: &ChaseEvent) -> Result<()> {
        match *event {
            ChaseEvent::PlayerMoved(pos) => place(&self.player, pos, self.tile),
            ChaseEvent::CoinSpawned(pos) => {
                if let Some(old) = self.coin.take() {
                    old.remove();
                }
                self.coin = Some(self.spawn("rb-entity rb-coin", pos)?);
            }
            ChaseEvent::CoinCollected { score } => {
                if let Some(coin) = self.coin.take() {
                    coin.remove();
                }
                set_text(self.els.current_score.as_ref(), &score.to_string());
                audio::play(AudioCue::Coin);
            }
            ChaseEvent::MonsterSpawned { id, pos, kind } => {
                let class = match kind {
                    MonsterKind::Normal => "rb-entity rb-monster",
                    MonsterKind::Purple => "rb-entity rb-monster rb-monster-purple",
                };
                let el = self.spawn(class, pos)?;
                self.monsters.insert(id, el);
            }
            ChaseEvent::MonsterMoved { id, pos } => {
                if let Some(el) = self.monsters.get(&id) {
                    place(el, pos, self.tile);
                }
            }
            ChaseEvent::MonsterArming { id } => {
                if let Some(el) = self.monsters.get(&id) {
                    el.class_list().add_1("preparing")?;
                }
                audio::play(AudioCue::Arming);
            }
            ChaseEvent::MonsterExploded {
                id,
                pos,
                radius,
                kind,
            } => {
                if let Some(el) = self.monsters.remove(&id) {
                    el.remove();
                }
                self.explosion(pos, radius, kind)?;
                audio::play(AudioCue::Explosion);
            }
            ChaseEvent::GameOver {
                score,
                highscore,
                new_highscore,
            } => {
                if new_highscore {
                    persist_highscore(highscore);
                }
                set_text(self.els.highscore.as_ref(), &highscore.to_string());
                set_text(self.els.final_score.as_ref(), &score.to_string());
                set_hidden(self.els.game_over_screen.as_ref(), false);
                audio::play(AudioCue::Defeat);
            }
        }
        Ok(())
    }
}

fn load_highscore() -> u32 {
    LocalStorageStore::open()
        .and_then(|store| get_setting(&store, KEY_CHASE_HIGHSCORE, 0u32))
        .unwrap_or_else(|err| {
            warn!("chase: highscore unavailable: {err}");
            0
        })
}

fn persist_highscore(highscore: u32) {
    let saved = LocalStorageStore::open()
        .and_then(|mut store| set_setting(&mut store, KEY_CHASE_HIGHSCORE, &highscore));
    if let Err(err) = saved {
        warn!("chase: could not save highscore: {err}");
    }
}

struct ChaseRuntime {
    game: ChaseGame,
    view: ChaseView,
}

impl ChaseRuntime {
    /// One frame. Returns false once the loop should end.
    fn step(&mut self, dt: f64) -> bool {
        for event in self.game.tick(dt) {
            if let Err(err) = self.view.apply(&event) {
                warn!("chase: render failed: {err}");
            }
        }
        self.game.status() == ChaseStatus::Playing
    }
}

#[wasm_bindgen(js_name = ChaseGame)]
pub struct ChaseGameHandle {
    config: ChaseConfig,
    els: Option<ChaseElements>,
    runtime: Rc<RefCell<Option<ChaseRuntime>>>,
    frame: FrameLoop,
}

impl Default for ChaseGameHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen(js_class = ChaseGame)]
impl ChaseGameHandle {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            config: ChaseConfig::default(),
            els: None,
            runtime: Rc::new(RefCell::new(None)),
            frame: FrameLoop::new(),
        }
    }

    /// Bind the DOM nodes the game renders into. Only `game_area` is required.
    pub fn init(
        &mut self,
        game_area: HtmlElement,
        current_score: Option<HtmlElement>,
        highscore: Option<HtmlElement>,
        game_over_screen: Option<HtmlElement>,
        final_score: Option<HtmlElement>,
    ) {
        set_text(highscore.as_ref(), &load_highscore().to_string());
        self.els = Some(ChaseElements {
            game_area,
            current_score,
            highscore,
            game_over_screen,
            final_score,
        });
    }

    /// Reset to a fresh session and run the loop.
    pub fn start(&mut self) -> std::result::Result<(), JsValue> {
        self.start_session().map_err(to_js)
    }

    pub fn restart(&mut self) -> std::result::Result<(), JsValue> {
        self.start()
    }

    /// Cancel the loop. The last frame stays on screen.
    pub fn stop(&mut self) {
        self.frame.stop();
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.frame.is_running()
    }

    /// Held-key state for `up`/`down`/`left`/`right`; other keys are ignored.
    #[wasm_bindgen(js_name = setKey)]
    pub fn set_key(&mut self, key: &str, pressed: bool) {
        let Some(dir) = Direction::from_key(key) else {
            return;
        };
        if let Some(rt) = self.runtime.borrow_mut().as_mut() {
            rt.game.set_key(dir, pressed);
        }
    }

    /// A single tap: moves at once, subject to the tap rate limit.
    #[wasm_bindgen(js_name = handlePress)]
    pub fn handle_press(&mut self, key: &str) {
        let Some(dir) = Direction::from_key(key) else {
            return;
        };
        if let Some(rt) = self.runtime.borrow_mut().as_mut() {
            if let Some(pos) = rt.game.handle_press(dir) {
                place(&rt.view.player, pos, rt.view.tile);
            }
        }
    }

    /// JSON snapshot of the running session, `undefined` before the first
    /// start.
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> std::result::Result<Option<String>, JsValue> {
        self.runtime
            .borrow()
            .as_ref()
            .map(|rt| serde_json::to_string(&rt.game.snapshot()))
            .transpose()
            .map_err(|e| to_js(e.into()))
    }
}

impl ChaseGameHandle {
    fn start_session(&mut self) -> Result<()> {
        self.frame.stop();
        let els = self
            .els
            .clone()
            .ok_or_else(|| ArcadeError::MissingElement("chase game area".to_string()))?;

        let rect = els.game_area.get_bounding_client_rect();
        let tile = self.config.tile_size;
        let cols = ((rect.width() / tile).floor() as i32).max(1);
        let rows = ((rect.height() / tile).floor() as i32).max(1);
        let game = ChaseGame::new(
            self.config.clone(),
            cols,
            rows,
            load_highscore(),
            session_seed(),
        );
        let view = ChaseView::mount(els, &game)?;
        *self.runtime.borrow_mut() = Some(ChaseRuntime { game, view });

        let runtime = self.runtime.clone();
        self.frame.start(move |dt| match runtime.borrow_mut().as_mut() {
            Some(rt) => rt.step(dt),
            None => false,
        })
    }
}
