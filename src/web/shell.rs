// The console shell: intro, menus and settings, plus switching between the
// menu screens and a running game's screen. Games themselves are separate
// classes driven by the page.
use log::{info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

use super::audio::{self, BrowserAudio};
use super::{LocalStorageStore, browser_window, document, to_js};
use crate::error::Result;
use crate::menu::{Button, GameKind, Menu, MenuAction, Press, Screen, handle_button};
use crate::settings::{MemoryStore, SettingKind, Settings, SettingsStore};

const SCREENS: [Screen; 5] = [
    Screen::Intro,
    Screen::MainMenu,
    Screen::Games,
    Screen::Settings,
    Screen::Info,
];

fn game_name(kind: GameKind) -> &'static str {
    match kind {
        GameKind::Chase => "chase",
        GameKind::Maze => "maze",
        GameKind::Draw => "draw",
    }
}

fn game_screen_id(kind: GameKind) -> &'static str {
    match kind {
        GameKind::Chase => "roguebox-screen",
        GameKind::Maze => "labyrinth-screen",
        GameKind::Draw => "drawit-screen",
    }
}

fn list_id(screen: Screen) -> Option<&'static str> {
    match screen {
        Screen::MainMenu => Some("main-menu-list"),
        Screen::Games => Some("games-list"),
        Screen::Settings => Some("settings-list"),
        Screen::Intro | Screen::Info => None,
    }
}

fn setting_label_id(kind: SettingKind) -> &'static str {
    match kind {
        SettingKind::Sound => "setting-sound",
        SettingKind::Display => "setting-display",
        SettingKind::Theme => "setting-theme",
    }
}

fn prefers_dark() -> bool {
    browser_window()
        .ok()
        .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
        .is_some_and(|query| query.matches())
}

fn set_element_hidden(doc: &Document, id: &str, hidden: bool) {
    if let Some(el) = doc.get_element_by_id(id) {
        let _ = el.class_list().toggle_with_force("hidden", hidden);
    }
}

#[wasm_bindgen]
pub struct ArcadeShell {
    menu: Menu,
    settings: Settings,
    store: Box<dyn SettingsStore>,
    playing: Option<GameKind>,
}

impl Default for ArcadeShell {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl ArcadeShell {
    /// Load settings (in-memory only if `localStorage` is unavailable) and
    /// show the intro screen.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let store: Box<dyn SettingsStore> = match LocalStorageStore::open() {
            Ok(store) => Box::new(store),
            Err(err) => {
                warn!("shell: settings will not persist: {err}");
                Box::new(MemoryStore::new())
            }
        };
        let defaults = Settings::with_preferred_theme(prefers_dark());
        let settings = Settings::load_or_default(&*store, defaults);
        info!(
            "shell: sound {}, {} display, {} theme",
            if settings.sound { "on" } else { "off" },
            settings.display.as_str(),
            settings.theme.as_str()
        );
        let shell = Self {
            menu: Menu::new(),
            settings,
            store,
            playing: None,
        };
        if let Err(err) = shell.render() {
            warn!("shell: initial render failed: {err}");
        }
        shell
    }

    /// Current screen's element id, or the game's screen while one is open.
    pub fn screen(&self) -> String {
        match self.playing {
            Some(kind) => game_screen_id(kind).to_string(),
            None => self.menu.screen().id().to_string(),
        }
    }

    /// JSON of the current settings.
    pub fn settings(&self) -> std::result::Result<String, JsValue> {
        serde_json::to_string(&self.settings).map_err(|e| to_js(e.into()))
    }

    #[wasm_bindgen(js_name = pressStart)]
    pub fn press_start(&mut self) -> std::result::Result<(), JsValue> {
        self.press(Button::Start).map(|_| ())
    }

    pub fn up(&mut self) -> std::result::Result<(), JsValue> {
        self.press(Button::Up).map(|_| ())
    }

    pub fn down(&mut self) -> std::result::Result<(), JsValue> {
        self.press(Button::Down).map(|_| ())
    }

    /// A button. Returns the game to launch (`"chase"`, `"maze"`, `"draw"`)
    /// when one was picked; the page then starts that game's class.
    pub fn a(&mut self) -> std::result::Result<Option<String>, JsValue> {
        let Press::Action(action) = self.press(Button::A)? else {
            return Ok(None);
        };
        let launched = match action {
            MenuAction::Navigate(_) => None,
            MenuAction::Toggle(kind) => {
                if let Err(err) = self.settings.toggle(kind, &mut *self.store) {
                    warn!("shell: could not save {kind:?}: {err}");
                }
                None
            }
            MenuAction::Launch(kind) => {
                info!("shell: launching {}", game_name(kind));
                self.playing = Some(kind);
                Some(game_name(kind).to_string())
            }
        };
        self.render().map_err(to_js)?;
        Ok(launched)
    }

    /// B button: back to the main menu.
    pub fn b(&mut self) -> std::result::Result<(), JsValue> {
        self.press(Button::B).map(|_| ())
    }

    /// Leave a game and return to the games list. The B press that leads
    /// here has already clicked.
    #[wasm_bindgen(js_name = closeGame)]
    pub fn close_game(&mut self) -> std::result::Result<(), JsValue> {
        if self.playing.take().is_some() {
            self.render().map_err(to_js)?;
        }
        Ok(())
    }
}

impl ArcadeShell {
    // Any console button counts as the user gesture the tune waits for.
    fn press(&mut self, button: Button) -> std::result::Result<Press, JsValue> {
        audio::start_music();
        let press = handle_button(
            &mut self.menu,
            button,
            self.playing.is_some(),
            &mut BrowserAudio,
        );
        if matches!(press, Press::Moved(_) | Press::Screen(_)) {
            self.render().map_err(to_js)?;
        }
        Ok(press)
    }

    fn render(&self) -> Result<()> {
        audio::set_enabled(self.settings.sound);
        let doc = document()?;
        self.apply_settings(&doc)?;

        let current = self.menu.screen();
        for screen in SCREENS {
            set_element_hidden(&doc, screen.id(), self.playing.is_some() || screen != current);
        }
        for kind in [GameKind::Chase, GameKind::Maze, GameKind::Draw] {
            set_element_hidden(&doc, game_screen_id(kind), self.playing != Some(kind));
        }

        if let (Some(list), Some(selected)) = (list_id(current), self.menu.selection()) {
            highlight(&doc, list, selected)?;
        }
        Ok(())
    }

    fn apply_settings(&self, doc: &Document) -> Result<()> {
        if let Some(body) = doc.body() {
            body.set_attribute("data-display", self.settings.display.as_str())?;
            body.set_attribute("data-theme", self.settings.theme.as_str())?;
        }
        for kind in [SettingKind::Sound, SettingKind::Display, SettingKind::Theme] {
            if let Some(el) = doc.get_element_by_id(setting_label_id(kind)) {
                el.set_text_content(Some(&self.settings.label(kind)));
            }
        }
        Ok(())
    }
}

/// Mark the `selected`-th `.menu-item` of a list as active.
fn highlight(doc: &Document, list: &str, selected: usize) -> Result<()> {
    let items = doc.query_selector_all(&format!("#{list} .menu-item"))?;
    for i in 0..items.length() {
        let Some(item) = items.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        item.class_list()
            .toggle_with_force("active", i as usize == selected)?;
    }
    Ok(())
}
