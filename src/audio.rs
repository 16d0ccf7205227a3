//! Retro beep cues and the background tune. Each cue is a single oscillator
//! note; the browser sink plays it through Web Audio, the silent sink just
//! records it.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waveform {
    Square,
    Sine,
    Triangle,
    Sawtooth,
}

/// One short note: frequency in Hz, duration in seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Beep {
    pub freq: f32,
    pub duration: f64,
    pub wave: Waveform,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AudioCue {
    ClickA,
    ClickB,
    Nav,
    Menu,
    Coin,
    Arming,
    Explosion,
    Victory,
    Defeat,
}

impl AudioCue {
    pub fn beep(self) -> Beep {
        let (freq, duration, wave) = match self {
            AudioCue::ClickA => (600.0, 0.1, Waveform::Square),
            AudioCue::ClickB => (400.0, 0.1, Waveform::Square),
            AudioCue::Nav => (800.0, 0.05, Waveform::Sine),
            AudioCue::Menu => (1000.0, 0.1, Waveform::Triangle),
            AudioCue::Coin => (1320.0, 0.08, Waveform::Square),
            AudioCue::Arming => (220.0, 0.12, Waveform::Sawtooth),
            AudioCue::Explosion => (90.0, 0.3, Waveform::Sawtooth),
            AudioCue::Victory => (880.0, 0.4, Waveform::Triangle),
            AudioCue::Defeat => (150.0, 0.5, Waveform::Square),
        };
        Beep {
            freq,
            duration,
            wave,
        }
    }
}

/// A note of the background tune. Zero frequency is a rest.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Note {
    pub freq: f32,
    pub duration: f64,
}

impl Note {
    const fn new(freq: f32, duration: f64) -> Self {
        Self { freq, duration }
    }

    pub fn is_rest(&self) -> bool {
        self.freq <= 0.0
    }
}

/// Interval between tune steps.
pub const MUSIC_STEP_MS: i32 = 250;

/// The looping background tune, eight phrases.
pub const MUSIC: [Note; 40] = [
    Note::new(659.25, 0.4),
    Note::new(493.88, 0.2),
    Note::new(523.25, 0.2),
    Note::new(587.33, 0.4),
    Note::new(523.25, 0.2),
    Note::new(493.88, 0.2),
    Note::new(440.0, 0.4),
    Note::new(440.0, 0.2),
    Note::new(523.25, 0.2),
    Note::new(659.25, 0.4),
    Note::new(587.33, 0.2),
    Note::new(523.25, 0.2),
    Note::new(493.88, 0.4),
    Note::new(493.88, 0.2),
    Note::new(523.25, 0.2),
    Note::new(587.33, 0.4),
    Note::new(659.25, 0.4),
    Note::new(523.25, 0.4),
    Note::new(440.0, 0.4),
    Note::new(440.0, 0.4),
    Note::new(0.0, 0.4),
    Note::new(587.33, 0.4),
    Note::new(698.46, 0.2),
    Note::new(880.0, 0.4),
    Note::new(783.99, 0.2),
    Note::new(698.46, 0.2),
    Note::new(659.25, 0.6),
    Note::new(523.25, 0.2),
    Note::new(659.25, 0.4),
    Note::new(587.33, 0.2),
    Note::new(523.25, 0.2),
    Note::new(493.88, 0.4),
    Note::new(493.88, 0.2),
    Note::new(523.25, 0.2),
    Note::new(587.33, 0.4),
    Note::new(659.25, 0.4),
    Note::new(523.25, 0.4),
    Note::new(440.0, 0.4),
    Note::new(440.0, 0.4),
    Note::new(0.0, 0.4),
];

/// Position in [`MUSIC`]. Muted steps hold the position so the tune resumes
/// where it stopped.
#[derive(Clone, Debug, Default)]
pub struct MusicCursor {
    index: usize,
}

impl MusicCursor {
    pub fn position(&self) -> usize {
        self.index
    }

    pub fn next_note(&mut self, enabled: bool) -> Option<Note> {
        if !enabled {
            return None;
        }
        let note = MUSIC[self.index];
        self.index = (self.index + 1) % MUSIC.len();
        Some(note)
    }
}

pub trait AudioSink {
    fn set_enabled(&mut self, enabled: bool);
    fn is_enabled(&self) -> bool;
    fn play(&mut self, cue: AudioCue);
}

/// Sink with no output. Keeps the cues it was asked to play while enabled.
#[derive(Debug)]
pub struct SilentAudio {
    enabled: bool,
    pub played: Vec<AudioCue>,
}

impl Default for SilentAudio {
    fn default() -> Self {
        Self {
            enabled: true,
            played: Vec::new(),
        }
    }
}

impl AudioSink for SilentAudio {
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn play(&mut self, cue: AudioCue) {
        if self.enabled {
            self.played.push(cue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_cues_match_the_retro_palette() {
        assert_eq!(
            AudioCue::ClickA.beep(),
            Beep {
                freq: 600.0,
                duration: 0.1,
                wave: Waveform::Square
            }
        );
        assert_eq!(AudioCue::Nav.beep().wave, Waveform::Sine);
        assert_eq!(AudioCue::Menu.beep().freq, 1000.0);
    }

    #[test]
    fn disabled_sink_drops_cues() {
        let mut sink = SilentAudio::default();
        sink.play(AudioCue::Coin);
        sink.set_enabled(false);
        sink.play(AudioCue::Explosion);
        assert_eq!(sink.played, vec![AudioCue::Coin]);
    }

    #[test]
    fn tune_opens_on_e_and_ends_each_half_on_a_rest() {
        assert_eq!(MUSIC[0], Note::new(659.25, 0.4));
        assert!(MUSIC[20].is_rest());
        assert!(MUSIC[39].is_rest());
        assert_eq!(MUSIC.iter().filter(|n| n.is_rest()).count(), 2);
    }

    #[test]
    fn muted_steps_hold_the_tune_position() {
        let mut cursor = MusicCursor::default();
        assert_eq!(cursor.next_note(true), Some(MUSIC[0]));
        assert_eq!(cursor.next_note(false), None);
        assert_eq!(cursor.next_note(false), None);
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.next_note(true), Some(MUSIC[1]));
    }

    #[test]
    fn tune_loops() {
        let mut cursor = MusicCursor::default();
        for _ in 0..MUSIC.len() {
            cursor.next_note(true);
        }
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.next_note(true), Some(MUSIC[0]));
    }
}
