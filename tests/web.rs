// Browser tests: `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use std::rc::Rc;

use pocket_arcade::settings::{KEY_CHASE_HIGHSCORE, Settings, SettingKind, get_setting, set_setting};
use pocket_arcade::web::{ArcadeShell, ChaseGameHandle, FrameLoop, LocalStorageStore};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn local_storage_round_trips_settings() {
    let mut store = LocalStorageStore::open().unwrap();
    set_setting(&mut store, KEY_CHASE_HIGHSCORE, &31u32).unwrap();
    assert_eq!(get_setting(&store, KEY_CHASE_HIGHSCORE, 0u32).unwrap(), 31);

    let mut settings = Settings::load(&store, Settings::default()).unwrap();
    let before = settings.theme;
    settings.toggle(SettingKind::Theme, &mut store).unwrap();
    let reloaded = Settings::load(&store, Settings::default()).unwrap();
    assert_eq!(reloaded.theme, before.toggled());
}

#[wasm_bindgen_test]
fn shell_starts_on_the_intro() {
    let mut shell = ArcadeShell::new();
    assert_eq!(shell.screen(), "intro-screen");
    shell.press_start().unwrap();
    assert_eq!(shell.screen(), "main-menu");
    // games list, first entry
    shell.a().unwrap();
    assert_eq!(shell.a().unwrap().as_deref(), Some("chase"));
    assert_eq!(shell.screen(), "roguebox-screen");
    shell.close_game().unwrap();
    assert_eq!(shell.screen(), "games-screen");
}

#[wasm_bindgen_test]
fn chase_game_mounts_into_an_area() {
    let doc = web_sys::window().unwrap().document().unwrap();
    let area: HtmlElement = doc.create_element("div").unwrap().unchecked_into();
    area.style().set_property("width", "300px").unwrap();
    area.style().set_property("height", "200px").unwrap();
    doc.body().unwrap().append_child(&area).unwrap();

    let mut game = ChaseGameHandle::new();
    assert_eq!(game.get_state().unwrap(), None);
    game.init(area.clone(), None, None, None, None);
    game.start().unwrap();
    assert!(game.is_running());
    let state = game.get_state().unwrap().unwrap();
    assert!(state.contains("\"cols\":30"), "{state}");
    assert_eq!(area.child_element_count(), 1);
    game.stop();
    assert!(!game.is_running());
    area.remove();
}

#[wasm_bindgen_test]
fn restarting_chase_leaves_one_fresh_session() {
    let doc = web_sys::window().unwrap().document().unwrap();
    let area: HtmlElement = doc.create_element("div").unwrap().unchecked_into();
    area.style().set_property("width", "200px").unwrap();
    area.style().set_property("height", "200px").unwrap();
    doc.body().unwrap().append_child(&area).unwrap();

    let mut game = ChaseGameHandle::new();
    game.init(area.clone(), None, None, None, None);
    game.start().unwrap();
    game.start().unwrap();
    assert!(game.is_running());
    // the second mount replaced the first player
    assert_eq!(area.child_element_count(), 1);
    game.stop();
    assert!(!game.is_running());
    game.stop();
    assert!(!game.is_running());
    let state = game.get_state().unwrap().unwrap();
    assert!(state.contains("\"game_time\":0.0"), "{state}");
    assert!(state.contains("\"score\":0"), "{state}");
    area.remove();
}

#[wasm_bindgen_test]
fn restarting_a_frame_loop_drops_the_old_step() {
    let first = Rc::new(());
    let second = Rc::new(());
    let mut frames = FrameLoop::new();

    let held = first.clone();
    frames.start(move |_| Rc::strong_count(&held) > 0).unwrap();
    assert_eq!(Rc::strong_count(&first), 2);

    let held = second.clone();
    frames.start(move |_| Rc::strong_count(&held) > 0).unwrap();
    assert!(frames.is_running());
    assert_eq!(Rc::strong_count(&first), 1);
    assert_eq!(Rc::strong_count(&second), 2);

    frames.stop();
    assert!(!frames.is_running());
}

#[wasm_bindgen_test]
fn dropping_a_frame_loop_releases_its_step() {
    let token = Rc::new(());
    let mut frames = FrameLoop::new();
    let held = token.clone();
    frames.start(move |_| Rc::strong_count(&held) > 0).unwrap();
    assert!(frames.is_running());

    drop(frames);
    assert_eq!(Rc::strong_count(&token), 1);
}

#[wasm_bindgen_test]
fn every_menu_button_is_accepted_while_a_game_runs() {
    let mut shell = ArcadeShell::new();
    shell.press_start().unwrap();
    shell.a().unwrap();
    assert_eq!(shell.a().unwrap().as_deref(), Some("chase"));
    // presses click, but the shell stays on the game screen
    shell.up().unwrap();
    shell.b().unwrap();
    assert_eq!(shell.a().unwrap(), None);
    assert_eq!(shell.screen(), "roguebox-screen");
    shell.close_game().unwrap();
    assert_eq!(shell.screen(), "games-screen");
}
