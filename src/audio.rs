//! Audio presentation
//!
//! Procedurally described sound effects - no external files needed!
//! Cues coming out of the simulation are turned into [`Voice`] descriptions
//! (waveform, pitch sweep, envelope) that a platform backend can synthesize.

use crate::sim::AudioCue;

/// Anything that can react to a simulation audio cue
pub trait AudioPresenter {
    fn play(&mut self, cue: AudioCue);
}

/// Oscillator shape (or filtered noise)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    /// White noise through a low-pass filter
    Noise,
}

/// One scheduled sound source
#[derive(Debug, Clone, PartialEq)]
pub struct Voice {
    pub waveform: Waveform,
    /// Offset from "now" in seconds
    pub start: f32,
    pub duration: f32,
    /// Starting frequency (filter cutoff for noise)
    pub freq_start: f32,
    /// Frequency reached at the end of the exponential sweep
    pub freq_end: f32,
    /// Peak gain, already scaled by the effective volume
    pub gain: f32,
}

/// Platform side that actually makes noise
pub trait AudioBackend {
    fn schedule(&mut self, voice: &Voice);
}

/// Backend that only traces voices (headless runs)
#[derive(Debug, Default)]
pub struct LogBackend {
    pub scheduled: usize,
}

impl AudioBackend for LogBackend {
    fn schedule(&mut self, voice: &Voice) {
        self.scheduled += 1;
        log::trace!(
            "voice {:?} {:.0}->{:.0}Hz for {:.2}s at +{:.2}s gain {:.2}",
            voice.waveform,
            voice.freq_start,
            voice.freq_end,
            voice.duration,
            voice.start,
            voice.gain
        );
    }
}

/// Audio manager for the game
pub struct AudioManager<B: AudioBackend> {
    backend: B,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager<LogBackend> {
    fn default() -> Self {
        Self::new(LogBackend::default())
    }
}

impl<B: AudioBackend> AudioManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Voices for a cue at the current volume (empty when silent)
    pub fn voices(&self, cue: AudioCue) -> Vec<Voice> {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return Vec::new();
        }
        let mut voices = cue_voices(cue);
        for voice in &mut voices {
            voice.gain *= vol;
        }
        voices
    }
}

impl<B: AudioBackend> AudioPresenter for AudioManager<B> {
    fn play(&mut self, cue: AudioCue) {
        for voice in self.voices(cue) {
            self.backend.schedule(&voice);
        }
    }
}

// === Sound definitions ===

fn sweep(waveform: Waveform, from: f32, to: f32, duration: f32, gain: f32) -> Voice {
    Voice {
        waveform,
        start: 0.0,
        duration,
        freq_start: from,
        freq_end: to,
        gain,
    }
}

/// Unscaled voices for each cue
fn cue_voices(cue: AudioCue) -> Vec<Voice> {
    match cue {
        // Laser zap
        AudioCue::ShotFired => vec![sweep(Waveform::Square, 400.0, 50.0, 0.1, 0.1)],
        // Filtered noise burst, cutoff closing
        AudioCue::ExplosionOccurred => vec![sweep(Waveform::Noise, 1000.0, 100.0, 0.2, 0.3)],
        // Rising chirp
        AudioCue::ItemPickedUp => vec![sweep(Waveform::Sine, 600.0, 1200.0, 0.2, 0.1)],
        // C major arpeggio
        AudioCue::StageCleared => [523.25, 659.25, 783.99, 1046.5]
            .iter()
            .enumerate()
            .map(|(i, &freq)| Voice {
                start: i as f32 * 0.1,
                ..sweep(Waveform::Sine, freq, freq, 0.3, 0.1)
            })
            .collect(),
        // Sad slide down
        AudioCue::GameOver => vec![sweep(Waveform::Sawtooth, 200.0, 50.0, 1.0, 0.2)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_cue_has_voices() {
        let manager = AudioManager::default();
        for cue in [
            AudioCue::ShotFired,
            AudioCue::ExplosionOccurred,
            AudioCue::ItemPickedUp,
            AudioCue::StageCleared,
            AudioCue::GameOver,
        ] {
            assert!(!manager.voices(cue).is_empty(), "{cue:?} is silent");
        }
    }

    #[test]
    fn test_volume_scales_gain() {
        let mut manager = AudioManager::default();
        manager.set_master_volume(0.5);
        manager.set_sfx_volume(2.0);
        let voices = manager.voices(AudioCue::GameOver);
        assert!((voices[0].gain - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_muted_schedules_nothing() {
        let mut manager = AudioManager::default();
        manager.set_muted(true);
        manager.play(AudioCue::ExplosionOccurred);
        assert_eq!(manager.backend().scheduled, 0);

        manager.set_muted(false);
        manager.play(AudioCue::StageCleared);
        assert_eq!(manager.backend().scheduled, 4);
    }

    #[test]
    fn test_arpeggio_is_staggered() {
        let voices = cue_voices(AudioCue::StageCleared);
        let starts: Vec<f32> = voices.iter().map(|v| v.start).collect();
        assert!(starts.windows(2).all(|w| w[1] > w[0]));
        assert_eq!(voices[3].freq_start, 1046.5);
    }
}
