//! Persistent key/value settings. Values are stored JSON-encoded so any
//! serde type fits; the browser build backs this with `localStorage`.
use std::collections::HashMap;

use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const KEY_SOUND: &str = "sound";
pub const KEY_DISPLAY: &str = "display";
pub const KEY_THEME: &str = "theme";
pub const KEY_CHASE_HIGHSCORE: &str = "rb_highscore";

/// Raw string store. Missing keys are `Ok(None)`.
pub trait SettingsStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>>;
    fn set_raw(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Read a setting, falling back to `default` when the key was never written.
pub fn get_setting<T, S>(store: &S, key: &str, default: T) -> Result<T>
where
    T: DeserializeOwned,
    S: SettingsStore + ?Sized,
{
    match store.get_raw(key)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(default),
    }
}

pub fn set_setting<T, S>(store: &mut S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: SettingsStore + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.set_raw(key, &raw)
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set_raw(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Retro,
    Modern,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Retro => DisplayMode::Modern,
            DisplayMode::Modern => DisplayMode::Retro,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DisplayMode::Retro => "retro",
            DisplayMode::Modern => "modern",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// The toggles shown on the settings screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingKind {
    Sound,
    Display,
    Theme,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub sound: bool,
    pub display: DisplayMode,
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound: true,
            display: DisplayMode::Retro,
            theme: Theme::Light,
        }
    }
}

impl Settings {
    /// Defaults for a first visit, following the browser's colour scheme.
    pub fn with_preferred_theme(prefers_dark: bool) -> Self {
        Self {
            theme: if prefers_dark { Theme::Dark } else { Theme::Light },
            ..Self::default()
        }
    }

    /// Load every setting, using `defaults` for keys never written.
    pub fn load<S: SettingsStore + ?Sized>(store: &S, defaults: Settings) -> Result<Self> {
        Ok(Self {
            sound: get_setting(store, KEY_SOUND, defaults.sound)?,
            display: get_setting(store, KEY_DISPLAY, defaults.display)?,
            theme: get_setting(store, KEY_THEME, defaults.theme)?,
        })
    }

    /// Like `load`, but a broken store just yields the defaults.
    pub fn load_or_default<S: SettingsStore + ?Sized>(store: &S, defaults: Settings) -> Self {
        Self::load(store, defaults).unwrap_or_else(|err| {
            warn!("settings: falling back to defaults: {err}");
            defaults
        })
    }

    /// Flip one setting and persist just that key.
    pub fn toggle<S: SettingsStore + ?Sized>(&mut self, kind: SettingKind, store: &mut S) -> Result<()> {
        match kind {
            SettingKind::Sound => {
                self.sound = !self.sound;
                set_setting(store, KEY_SOUND, &self.sound)
            }
            SettingKind::Display => {
                self.display = self.display.toggled();
                set_setting(store, KEY_DISPLAY, &self.display)
            }
            SettingKind::Theme => {
                self.theme = self.theme.toggled();
                set_setting(store, KEY_THEME, &self.theme)
            }
        }
    }

    /// Menu label for a toggle, e.g. `Sound: ON`.
    pub fn label(&self, kind: SettingKind) -> String {
        match kind {
            SettingKind::Sound => format!("Sound: {}", if self.sound { "ON" } else { "OFF" }),
            SettingKind::Display => format!(
                "Display: {}",
                match self.display {
                    DisplayMode::Retro => "Retro",
                    DisplayMode::Modern => "Modern",
                }
            ),
            SettingKind::Theme => format!(
                "Mode: {}",
                match self.theme {
                    Theme::Light => "Light",
                    Theme::Dark => "Dark",
                }
            ),
        }
    }
}
