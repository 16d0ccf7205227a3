// Labyrinth in the browser. Walls are rendered once per maze; only the player
// div moves afterwards.
use std::cell::RefCell;
use std::rc::Rc;

use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use super::{
    FrameLoop, audio, create_div, document, place, session_seed, set_hidden, set_px, set_text,
    to_js,
};
use crate::audio::AudioCue;
use crate::error::{ArcadeError, Result};
use crate::grid::{Direction, GridPos, format_clock};
use crate::maze::{Cell, MazeConfig, MazeEvent, MazeGame, MazeStatus, fit_dimensions};

/// Height of the screen header above the playfield.
const HEADER_PX: f64 = 28.0;

#[derive(Clone)]
struct MazeElements {
    game_area: HtmlElement,
    time: Option<HtmlElement>,
    victory_overlay: Option<HtmlElement>,
    final_time: Option<HtmlElement>,
}

struct MazeView {
    els: MazeElements,
    tile: f64,
    player: HtmlElement,
}

impl MazeView {
    fn mount(els: MazeElements, game: &MazeGame, tile: f64) -> Result<Self> {
        let doc = document()?;
        let area = &els.game_area;
        area.set_inner_html("");
        let maze = game.maze();
        set_px(area, "width", maze.cols() as f64 * tile);
        set_px(area, "height", maze.rows() as f64 * tile);

        for row in 0..maze.rows() {
            for col in 0..maze.cols() {
                if maze.cell(col, row) != Cell::Wall {
                    continue;
                }
                let wall = create_div(&doc, "lb-wall")?;
                place(&wall, GridPos::new(col as i32, row as i32), tile);
                set_px(&wall, "width", tile);
                set_px(&wall, "height", tile);
                area.append_child(&wall)?;
            }
        }

        let goal = create_div(&doc, "lb-goal")?;
        place(&goal, game.goal(), tile);
        set_px(&goal, "width", tile);
        set_px(&goal, "height", tile);
        area.append_child(&goal)?;

        let player = create_div(&doc, "lb-player")?;
        place(&player, game.player(), tile);
        set_px(&player, "width", tile);
        set_px(&player, "height", tile);
        area.append_child(&player)?;

        set_text(els.time.as_ref(), &format_clock(0.0));
        set_hidden(els.victory_overlay.as_ref(), true);
        Ok(Self { els, tile, player })
    }
}

struct MazeRuntime {
    game: MazeGame,
    view: MazeView,
}

impl MazeRuntime {
    fn step(&mut self, dt: f64) -> bool {
        for event in self.game.tick(dt) {
            match event {
                MazeEvent::PlayerMoved(pos) => place(&self.view.player, pos, self.view.tile),
                MazeEvent::Won { time_text, .. } => {
                    set_text(self.view.els.final_time.as_ref(), &time_text);
                    set_hidden(self.view.els.victory_overlay.as_ref(), false);
                    audio::play(AudioCue::Victory);
                }
            }
        }
        set_text(
            self.view.els.time.as_ref(),
            &format_clock(self.game.elapsed_ms()),
        );
        self.game.status() == MazeStatus::Running
    }
}

#[wasm_bindgen(js_name = MazeGame)]
pub struct MazeGameHandle {
    config: MazeConfig,
    els: Option<MazeElements>,
    runtime: Rc<RefCell<Option<MazeRuntime>>>,
    frame: FrameLoop,
}

impl Default for MazeGameHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen(js_class = MazeGame)]
impl MazeGameHandle {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            config: MazeConfig::default(),
            els: None,
            runtime: Rc::new(RefCell::new(None)),
            frame: FrameLoop::new(),
        }
    }

    pub fn init(
        &mut self,
        game_area: HtmlElement,
        time: Option<HtmlElement>,
        victory_overlay: Option<HtmlElement>,
        final_time: Option<HtmlElement>,
    ) {
        self.els = Some(MazeElements {
            game_area,
            time,
            victory_overlay,
            final_time,
        });
    }

    /// Generate a maze sized to the screen and start the clock.
    pub fn start(&mut self) -> std::result::Result<(), JsValue> {
        self.start_session().map_err(to_js)
    }

    pub fn restart(&mut self) -> std::result::Result<(), JsValue> {
        self.start()
    }

    pub fn stop(&mut self) {
        self.frame.stop();
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.frame.is_running()
    }

    #[wasm_bindgen(js_name = setKey)]
    pub fn set_key(&mut self, key: &str, pressed: bool) {
        let Some(dir) = Direction::from_key(key) else {
            return;
        };
        if let Some(rt) = self.runtime.borrow_mut().as_mut() {
            rt.game.set_key(dir, pressed);
        }
    }

    /// A on the victory overlay plays again; ignored while running.
    #[wasm_bindgen(js_name = handleA)]
    pub fn handle_a(&mut self) -> std::result::Result<bool, JsValue> {
        let won = self
            .runtime
            .borrow()
            .as_ref()
            .is_some_and(|rt| matches!(rt.game.status(), MazeStatus::Won { .. }));
        if !won {
            return Ok(false);
        }
        self.start()?;
        Ok(true)
    }

    /// Snapshot JSON, or `undefined` before the first start.
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

impl MazeGameHandle {
    fn start_session(&mut self) -> Result<()> {
        self.frame.stop();
        let els = self
            .els
            .clone()
            .ok_or_else(|| ArcadeError::MissingElement("maze game area".to_string()))?;

        // size against the screen, not the area we resize ourselves
        let rect = match els.game_area.parent_element() {
            Some(parent) => parent.get_bounding_client_rect(),
            None => els.game_area.get_bounding_client_rect(),
        };
        let (cols, rows, tile) = fit_dimensions(rect.width(), rect.height() - HEADER_PX);
        let game = MazeGame::new(self.config.clone(), cols, rows, session_seed())?;
        let view = MazeView::mount(els, &game, tile)?;
        *self.runtime.borrow_mut() = Some(MazeRuntime { game, view });

        let runtime = self.runtime.clone();
        self.frame.start(move |dt| match runtime.borrow_mut().as_mut() {
            Some(rt) => rt.step(dt),
            None => false,
        })
        .map_err(|err| {
            warn!("maze: loop did not start: {err}");
            err
        })
    }
}
