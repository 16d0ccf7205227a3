//! Browser glue: one wasm-bindgen class per game, the animation-frame loop
//! that drives them, and the DOM / storage / audio plumbing they share.
//!
//! Every class owns its session outright (`Rc<RefCell<Option<..>>>` shared
//! only with its own frame callback), so several instances can coexist.
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, Window, window};

use crate::error::{ArcadeError, Result};
use crate::grid::GridPos;

pub mod audio;
mod chase;
mod draw;
mod maze;
mod shell;
mod storage;

pub use chase::ChaseGameHandle;
pub use draw::DrawGameHandle;
pub use maze::MazeGameHandle;
pub use shell::ArcadeShell;
pub use storage::LocalStorageStore;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// A `requestAnimationFrame` loop with a cancellable handle. Starting always
/// stops first, so there is never more than one pending frame per loop.
pub struct FrameLoop {
    callback: FrameCallback,
    handle: Rc<Cell<Option<i32>>>,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            callback: Rc::new(RefCell::new(None)),
            handle: Rc::new(Cell::new(None)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.get().is_some()
    }

    /// Run `step(dt_ms)` once per frame until it returns false or `stop` is
    /// called.
    pub fn start<F>(&mut self, mut step: F) -> Result<()>
    where
        F: FnMut(f64) -> bool + 'static,
    {
        self.stop();
        let win = browser_window()?;

        let callback = self.callback.clone();
        let handle = self.handle.clone();
        let mut last = now_ms();
        let frame = Closure::wrap(Box::new(move |ts: f64| {
            let dt = ts - last;
            last = ts;
            if !step(dt) {
                handle.set(None);
                return;
            }
            let next = window().and_then(|w| {
                callback
                    .borrow()
                    .as_ref()
                    .and_then(|cb| w.request_animation_frame(cb.as_ref().unchecked_ref()).ok())
            });
            handle.set(next);
        }) as Box<dyn FnMut(f64)>);

        *self.callback.borrow_mut() = Some(frame);
        let id = {
            let cb = self.callback.borrow();
            match cb.as_ref() {
                Some(cb) => win.request_animation_frame(cb.as_ref().unchecked_ref())?,
                None => return Ok(()),
            }
        };
        self.handle.set(Some(id));
        Ok(())
    }

    /// Cancel the pending frame and forget its handle.
    pub fn stop(&mut self) {
        if let Some(id) = self.handle.take() {
            if let Some(w) = window() {
                let _ = w.cancel_animation_frame(id);
            }
        }
    }
}

// The frame closure keeps itself alive through `callback`; break that cycle
// so a freed game handle leaves no frame chain behind.
impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
        self.callback.borrow_mut().take();
    }
}

pub(crate) fn browser_window() -> Result<Window> {
    window().ok_or_else(|| ArcadeError::Js("no window".to_string()))
}

pub(crate) fn document() -> Result<Document> {
    browser_window()?
        .document()
        .ok_or_else(|| ArcadeError::Js("no document".to_string()))
}

pub(crate) fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Seed for a new game session.
pub(crate) fn session_seed() -> u64 {
    #[cfg(feature = "rng")]
    {
        let mut buf = [0u8; 8];
        if getrandom::getrandom(&mut buf).is_ok() {
            return u64::from_le_bytes(buf);
        }
    }
    now_ms().to_bits()
}

pub(crate) fn create_div(doc: &Document, class: &str) -> Result<HtmlElement> {
    let el: HtmlElement = doc.create_element("div")?.unchecked_into();
    el.set_class_name(class);
    Ok(el)
}

pub(crate) fn set_px(el: &HtmlElement, prop: &str, px: f64) {
    let _ = el.style().set_property(prop, &format!("{px}px"));
}

/// Place an absolutely positioned tile element on the grid.
pub(crate) fn place(el: &HtmlElement, pos: GridPos, tile: f64) {
    set_px(el, "left", pos.col as f64 * tile);
    set_px(el, "top", pos.row as f64 * tile);
}

pub(crate) fn set_text(el: Option<&HtmlElement>, text: &str) {
    if let Some(el) = el {
        el.set_text_content(Some(text));
    }
}

pub(crate) fn set_hidden(el: Option<&HtmlElement>, hidden: bool) {
    if let Some(el) = el {
        let classes = el.class_list();
        let _ = if hidden {
            classes.add_1("hidden")
        } else {
            classes.remove_1("hidden")
        };
    }
}

/// Remove `el` from the DOM after `delay_ms`.
pub(crate) fn remove_later(el: HtmlElement, delay_ms: i32) {
    let Some(w) = window() else {
        el.remove();
        return;
    };
    let cb = Closure::once_into_js(move || el.remove());
    if w
        .set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), delay_ms)
        .is_err()
    {
        log::warn!("web: could not schedule element removal");
    }
}

pub(crate) fn to_js(err: ArcadeError) -> JsValue {
    log::error!("{err}");
    err.into()
}
