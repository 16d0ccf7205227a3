//! Screen navigation for the shell: intro, main menu and its three lists.
use serde::Serialize;

use crate::audio::{AudioCue, AudioSink};
use crate::settings::SettingKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Screen {
    Intro,
    MainMenu,
    Games,
    Settings,
    Info,
}

impl Screen {
    pub fn id(self) -> &'static str {
        match self {
            Screen::Intro => "intro-screen",
            Screen::MainMenu => "main-menu",
            Screen::Games => "games-screen",
            Screen::Settings => "settings-screen",
            Screen::Info => "info-screen",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Chase,
    Maze,
    Draw,
}

pub const MAIN_MENU_ITEMS: [Screen; 3] = [Screen::Games, Screen::Settings, Screen::Info];
pub const GAME_ITEMS: [GameKind; 3] = [GameKind::Chase, GameKind::Maze, GameKind::Draw];
pub const SETTING_ITEMS: [SettingKind; 3] = [SettingKind::Sound, SettingKind::Display, SettingKind::Theme];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Navigate(Screen),
    Toggle(SettingKind),
    Launch(GameKind),
}

/// Console buttons routed through the shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Start,
    Up,
    Down,
    A,
    B,
}

impl Button {
    pub fn cue(self) -> AudioCue {
        match self {
            Button::Start => AudioCue::Menu,
            Button::Up | Button::Down => AudioCue::Nav,
            Button::A => AudioCue::ClickA,
            Button::B => AudioCue::ClickB,
        }
    }
}

/// What a button press did to the menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Press {
    Ignored,
    Moved(usize),
    Screen(Screen),
    Action(MenuAction),
}

/// Feed one button to the menu. Direction, A and B click on every press,
/// even when nothing changes or a game has the screen; Start only clicks
/// when it leaves the intro. While `in_game`, the menu itself is untouched.
pub fn handle_button(
    menu: &mut Menu,
    button: Button,
    in_game: bool,
    sink: &mut dyn AudioSink,
) -> Press {
    if button == Button::Start {
        if in_game || !menu.press_start() {
            return Press::Ignored;
        }
        sink.play(button.cue());
        return Press::Screen(menu.screen());
    }
    sink.play(button.cue());
    if in_game {
        return Press::Ignored;
    }
    let press = match button {
        Button::Up => menu.up().map(Press::Moved),
        Button::Down => menu.down().map(Press::Moved),
        Button::A => menu.select().map(Press::Action),
        Button::B => menu.back().map(Press::Screen),
        Button::Start => None,
    };
    press.unwrap_or(Press::Ignored)
}

#[derive(Clone, Debug, Serialize)]
pub struct Menu {
    screen: Screen,
    main_index: usize,
    games_index: usize,
    settings_index: usize,
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}

impl Menu {
    pub fn new() -> Self {
        Self {
            screen: Screen::Intro,
            main_index: 0,
            games_index: 0,
            settings_index: 0,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Highlighted row of the current list, if the screen has one.
    pub fn selection(&self) -> Option<usize> {
        match self.screen {
            Screen::MainMenu => Some(self.main_index),
            Screen::Games => Some(self.games_index),
            Screen::Settings => Some(self.settings_index),
            Screen::Intro | Screen::Info => None,
        }
    }

    /// Start button: leaves the intro.
    pub fn press_start(&mut self) -> bool {
        if self.screen != Screen::Intro {
            return false;
        }
        self.screen = Screen::MainMenu;
        true
    }

    pub fn up(&mut self) -> Option<usize> {
        self.move_selection(false)
    }

    pub fn down(&mut self) -> Option<usize> {
        self.move_selection(true)
    }

    fn move_selection(&mut self, forward: bool) -> Option<usize> {
        let (index, len) = match self.screen {
            Screen::MainMenu => (&mut self.main_index, MAIN_MENU_ITEMS.len()),
            Screen::Games => (&mut self.games_index, GAME_ITEMS.len()),
            Screen::Settings => (&mut self.settings_index, SETTING_ITEMS.len()),
            Screen::Intro | Screen::Info => return None,
        };
        *index = if forward {
            (*index + 1) % len
        } else {
            (*index + len - 1) % len
        };
        Some(*index)
    }

    /// A button on the current screen.
    pub fn select(&mut self) -> Option<MenuAction> {
        match self.screen {
            Screen::MainMenu => {
                let target = MAIN_MENU_ITEMS[self.main_index];
                self.screen = target;
                Some(MenuAction::Navigate(target))
            }
            Screen::Settings => Some(MenuAction::Toggle(SETTING_ITEMS[self.settings_index])),
            Screen::Games => Some(MenuAction::Launch(GAME_ITEMS[self.games_index])),
            Screen::Intro | Screen::Info => None,
        }
    }

    /// B button: back to the main menu from any sub screen.
    pub fn back(&mut self) -> Option<Screen> {
        match self.screen {
            Screen::Intro | Screen::MainMenu => None,
            _ => {
                self.screen = Screen::MainMenu;
                Some(Screen::MainMenu)
            }
        }
    }
}
