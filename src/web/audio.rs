//! Web Audio output for [`AudioCue`]s and the background tune. One lazily
//! created `AudioContext` is shared by the shell and every game.
use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AudioContext, GainNode, OscillatorType};

use super::browser_window;
use crate::audio::{AudioCue, AudioSink, Beep, MUSIC_STEP_MS, MusicCursor, Note, Waveform};

const MASTER_GAIN: f32 = 0.3;

thread_local! {
    static AUDIO: RefCell<WebAudio> = RefCell::new(WebAudio::default());
}

pub fn play(cue: AudioCue) {
    AUDIO.with(|a| a.borrow_mut().play(cue));
}

pub fn set_enabled(enabled: bool) {
    AUDIO.with(|a| a.borrow_mut().set_enabled(enabled));
}

/// Start looping the background tune. Later calls do nothing.
pub fn start_music() {
    AUDIO.with(|a| {
        if let Err(e) = a.borrow_mut().start_music() {
            log::warn!("audio: music did not start: {e:?}");
        }
    });
}

/// [`AudioSink`] view of the shared browser output.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserAudio;

impl AudioSink for BrowserAudio {
    fn set_enabled(&mut self, enabled: bool) {
        set_enabled(enabled);
    }

    fn is_enabled(&self) -> bool {
        AUDIO.with(|a| a.borrow().is_enabled())
    }

    fn play(&mut self, cue: AudioCue) {
        play(cue);
    }
}

struct Music {
    cursor: MusicCursor,
    _step: Closure<dyn FnMut()>,
    interval: i32,
}

pub struct WebAudio {
    enabled: bool,
    output: Option<(AudioContext, GainNode)>,
    music: Option<Music>,
}

impl Default for WebAudio {
    fn default() -> Self {
        Self {
            enabled: true,
            output: None,
            music: None,
        }
    }
}

impl Drop for WebAudio {
    fn drop(&mut self) {
        if let (Some(music), Some(w)) = (self.music.take(), web_sys::window()) {
            w.clear_interval_with_handle(music.interval);
        }
    }
}

impl WebAudio {
    fn master_level(&self) -> f32 {
        if self.enabled { MASTER_GAIN } else { 0.0 }
    }

    // Browsers only allow a context after a user gesture, so it is created on
    // the first cue rather than at load.
    fn output(&mut self) -> Result<&(AudioContext, GainNode), JsValue> {
        if self.output.is_none() {
            let ctx = AudioContext::new()?;
            let master = ctx.create_gain()?;
            master.gain().set_value(self.master_level());
            master.connect_with_audio_node(&ctx.destination())?;
            self.output = Some((ctx, master));
        }
        self.output
            .as_ref()
            .ok_or_else(|| JsValue::from_str("audio output missing"))
    }

    fn beep(&mut self, beep: Beep) -> Result<(), JsValue> {
        let (ctx, master) = self.output()?;
        let osc = ctx.create_oscillator()?;
        let gain = ctx.create_gain()?;
        osc.set_type(match beep.wave {
            Waveform::Square => OscillatorType::Square,
            Waveform::Sine => OscillatorType::Sine,
            Waveform::Triangle => OscillatorType::Triangle,
            Waveform::Sawtooth => OscillatorType::Sawtooth,
        });
        let t = ctx.current_time();
        osc.frequency().set_value_at_time(beep.freq, t)?;
        gain.gain().set_value_at_time(0.1, t)?;
        gain.gain().exponential_ramp_to_value_at_time(0.01, t + beep.duration)?;
        osc.connect_with_audio_node(&gain)?;
        gain.connect_with_audio_node(master)?;
        osc.start()?;
        osc.stop_with_when(t + beep.duration)?;
        Ok(())
    }

    // Tune notes sit well under the cues and fade out just before they end.
    fn tone(&mut self, note: Note) -> Result<(), JsValue> {
        let (ctx, master) = self.output()?;
        let osc = ctx.create_oscillator()?;
        let gain = ctx.create_gain()?;
        osc.set_type(OscillatorType::Triangle);
        let t = ctx.current_time();
        osc.frequency().set_value_at_time(note.freq, t)?;
        gain.gain().set_value_at_time(0.04, t)?;
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, t + note.duration - 0.05)?;
        osc.connect_with_audio_node(&gain)?;
        gain.connect_with_audio_node(master)?;
        osc.start()?;
        osc.stop_with_when(t + note.duration)?;
        Ok(())
    }

    fn start_music(&mut self) -> Result<(), JsValue> {
        if self.music.is_some() {
            return Ok(());
        }
        let step = Closure::wrap(Box::new(|| {
            AUDIO.with(|a| a.borrow_mut().music_step());
        }) as Box<dyn FnMut()>);
        let interval = browser_window()?
            .set_interval_with_callback_and_timeout_and_arguments_0(
                step.as_ref().unchecked_ref(),
                MUSIC_STEP_MS,
            )?;
        self.music = Some(Music {
            cursor: MusicCursor::default(),
            _step: step,
            interval,
        });
        Ok(())
    }

    fn music_step(&mut self) {
        let enabled = self.enabled;
        let Some(note) = self
            .music
            .as_mut()
            .and_then(|m| m.cursor.next_note(enabled))
        else {
            return;
        };
        if note.is_rest() {
            return;
        }
        if let Err(e) = self.tone(note) {
            log::warn!("audio: tune note failed: {e:?}");
        }
    }
}

impl AudioSink for WebAudio {
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        let level = self.master_level();
        if let Some((_, master)) = self.output.as_ref() {
            master.gain().set_value(level);
        }
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn play(&mut self, cue: AudioCue) {
        if !self.enabled {
            return;
        }
        if let Err(e) = self.beep(cue.beep()) {
            log::warn!("audio: {cue:?} failed: {e:?}");
        }
    }
}
