// DrawIt in the browser: a cursor div, one div per painted cell, and a result
// overlay filled from the verdict.
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, Node};

use super::{
    FrameLoop, audio, create_div, document, place, session_seed, set_hidden, set_px, set_text,
    to_js,
};
use crate::audio::AudioCue;
use crate::draw::{Analysis, DrawConfig, DrawEvent, DrawGame, DrawMode, DrawStatus, Verdict};
use crate::error::{ArcadeError, Result};
use crate::grid::{Direction, GridPos, format_countdown};

#[derive(Clone)]
struct DrawElements {
    game_area: HtmlElement,
    time: Option<HtmlElement>,
    mode: Option<HtmlElement>,
    target: Option<HtmlElement>,
    result_overlay: Option<HtmlElement>,
    result_message: Option<HtmlElement>,
    result_details: Option<HtmlElement>,
}

struct DrawView {
    doc: Document,
    els: DrawElements,
    tile: f64,
    cursor: HtmlElement,
    pixels: HashMap<GridPos, HtmlElement>,
}

impl DrawView {
    fn mount(els: DrawElements, game: &DrawGame, tile: f64) -> Result<Self> {
        let doc = document()?;
        els.game_area.set_inner_html("");
        let cursor = create_div(&doc, "di-cursor")?;
        set_px(&cursor, "width", tile);
        set_px(&cursor, "height", tile);
        place(&cursor, game.cursor(), tile);
        els.game_area.append_child(&cursor)?;

        set_text(els.target.as_ref(), game.target().name);
        set_text(els.time.as_ref(), &format_countdown(game.time_remaining()));
        set_hidden(els.result_overlay.as_ref(), true);
        let view = Self {
            doc,
            els,
            tile,
            cursor,
            pixels: HashMap::new(),
        };
        view.show_mode(game.mode());
        Ok(view)
    }

    fn show_mode(&self, mode: DrawMode) {
        let (text, class) = match mode {
            DrawMode::Draw => ("DRAW", "di-mode di-mode-draw"),
            DrawMode::Erase => ("ERASE", "di-mode di-mode-erase"),
        };
        if let Some(el) = self.els.mode.as_ref() {
            el.set_text_content(Some(text));
            el.set_class_name(class);
        }
    }

    fn paint(&mut self, pos: GridPos) -> Result<()> {
        if self.pixels.contains_key(&pos) {
            return Ok(());
        }
        let px = create_div(&self.doc, "di-pixel")?;
        place(&px, pos, self.tile);
        set_px(&px, "width", self.tile);
        set_px(&px, "height", self.tile);
        // keep the cursor on top
        let cursor: &Node = &self.cursor;
        self.els.game_area.insert_before(&px, Some(cursor))?;
        self.pixels.insert(pos, px);
        Ok(())
    }

    fn erase(&mut self, pos: GridPos) {
        if let Some(px) = self.pixels.remove(&pos) {
            px.remove();
        }
    }

    fn show_result(&self, analysis: &Analysis, verdict: &Verdict, target_name: &str) -> Result<()> {
        set_text(self.els.result_message.as_ref(), &verdict.message);
        if let Some(details) = self.els.result_details.as_ref() {
            details.set_inner_html("");
            let mut lines = vec![
                format!("Target: {target_name}"),
                format!("Confidence: {}%", verdict.confidence),
                format!("Cells drawn: {}", analysis.filled),
            ];
            lines.extend(verdict.reasons.iter().map(|r| format!("+ {}", r.label())));
            for line in lines {
                let row = create_div(&self.doc, "di-result-line")?;
                row.set_text_content(Some(&line));
                details.append_child(&row)?;
            }
        }
        set_hidden(self.els.result_overlay.as_ref(), false);
        audio::play(if verdict.success {
            AudioCue::Victory
        } else {
            AudioCue::Defeat
        });
        Ok(())
    }

    fn apply(&mut self, event: &DrawEvent, target_name: &str) -> Result<()> {
        match event {
            DrawEvent::CursorMoved(pos) => place(&self.cursor, *pos, self.tile),
            DrawEvent::Painted(pos) => self.paint(*pos)?,
            DrawEvent::Erased(pos) => self.erase(*pos),
            DrawEvent::Judged(judged) => {
                let (analysis, verdict) = &**judged;
                self.show_result(analysis, verdict, target_name)?;
            }
        }
        Ok(())
    }
}

struct DrawRuntime {
    game: DrawGame,
    view: DrawView,
}

impl DrawRuntime {
    fn render(&mut self, events: &[DrawEvent]) {
        let name = self.game.target().name;
        for event in events {
            if let Err(err) = self.view.apply(event, name) {
                warn!("draw: render failed: {err}");
            }
        }
        set_text(
            self.view.els.time.as_ref(),
            &format_countdown(self.game.time_remaining()),
        );
    }

    fn step(&mut self, dt: f64) -> bool {
        let events = self.game.tick(dt);
        self.render(&events);
        self.game.status() == DrawStatus::Drawing
    }
}

#[wasm_bindgen(js_name = DrawGame)]
pub struct DrawGameHandle {
    config: DrawConfig,
    els: Option<DrawElements>,
    runtime: Rc<RefCell<Option<DrawRuntime>>>,
    frame: FrameLoop,
}

impl Default for DrawGameHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen(js_class = DrawGame)]
impl DrawGameHandle {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            config: DrawConfig::default(),
            els: None,
            runtime: Rc::new(RefCell::new(None)),
            frame: FrameLoop::new(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn init(
        &mut self,
        game_area: HtmlElement,
        time: Option<HtmlElement>,
        mode: Option<HtmlElement>,
        target: Option<HtmlElement>,
        result_overlay: Option<HtmlElement>,
        result_message: Option<HtmlElement>,
        result_details: Option<HtmlElement>,
    ) {
        self.els = Some(DrawElements {
            game_area,
            time,
            mode,
            target,
            result_overlay,
            result_message,
            result_details,
        });
    }

    /// Pick a new target, clear the canvas and start the countdown.
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

    /// A: draw mode.
    #[wasm_bindgen(js_name = handleA)]
    pub fn handle_a(&mut self) {
        if let Some(rt) = self.runtime.borrow_mut().as_mut() {
            rt.game.handle_a();
            rt.view.show_mode(rt.game.mode());
        }
    }

    /// B: erase mode.
    #[wasm_bindgen(js_name = handleB)]
    pub fn handle_b(&mut self) {
        if let Some(rt) = self.runtime.borrow_mut().as_mut() {
            rt.game.handle_b();
            rt.view.show_mode(rt.game.mode());
        }
    }

    /// Judge the drawing before the clock runs out.
    #[wasm_bindgen(js_name = handleSubmit)]
    pub fn handle_submit(&mut self) {
        let judged = match self.runtime.borrow_mut().as_mut() {
            Some(rt) => match rt.game.submit() {
                Some(event) => {
                    rt.render(&[event]);
                    true
                }
                None => false,
            },
            None => false,
        };
        if judged {
            self.frame.stop();
        }
    }

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

impl DrawGameHandle {
    fn start_session(&mut self) -> Result<()> {
        self.frame.stop();
        let els = self
            .els
            .clone()
            .ok_or_else(|| ArcadeError::MissingElement("draw game area".to_string()))?;

        let rect = els.game_area.get_bounding_client_rect();
        let tile = self.config.tile_size;
        let cols = (rect.width() / tile).floor().max(1.0) as usize;
        let rows = (rect.height() / tile).floor().max(1.0) as usize;
        let game = DrawGame::new(self.config.clone(), cols, rows, session_seed());
        let view = DrawView::mount(els, &game, tile)?;
        *self.runtime.borrow_mut() = Some(DrawRuntime { game, view });

        let runtime = self.runtime.clone();
        self.frame.start(move |dt| match runtime.borrow_mut().as_mut() {
            Some(rt) => rt.step(dt),
            None => false,
        })
    }
}
