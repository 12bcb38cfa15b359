//! Synthesized sound cues.

use crate::error::SoundError;
use crate::session::GameEvent;
use fundsp::prelude::*;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};

const SAMPLE_RATE: u32 = 44_100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Flap,
    Score,
    SpeedUp,
    Crash,
}

impl Cue {
    pub fn for_event(event: GameEvent) -> Option<Cue> {
        match event {
            GameEvent::Flapped => Some(Cue::Flap),
            GameEvent::Scored(_) => Some(Cue::Score),
            GameEvent::SpeedUp => Some(Cue::SpeedUp),
            GameEvent::Crashed { .. } => Some(Cue::Crash),
            GameEvent::Restarted => None,
        }
    }

    fn seconds(self) -> f32 {
        match self {
            Cue::Flap => 0.08,
            Cue::Score => 0.12,
            Cue::SpeedUp => 0.25,
            Cue::Crash => 0.5,
        }
    }

    /// Oscillator frequency and gain at time `t`.
    fn shape(self, t: f32) -> (f32, f32) {
        let d = self.seconds();
        let fade = 1.0 - (t / d).min(1.0);
        match self {
            // Short upward chirp
            Cue::Flap => (300.0 + 500.0 * (t / d), 0.08 * fade),
            // Two-note blip
            Cue::Score => (if t < d / 2.0 { 880.0 } else { 1320.0 }, 0.1 * fade),
            // Rising sweep
            Cue::SpeedUp => (440.0 + 880.0 * (t / d), 0.1 * fade),
            // 400Hz falling to 80Hz over 0.4s
            Cue::Crash => {
                let sweep = (t / 0.4).min(1.0);
                (400.0 + (80.0 - 400.0) * sweep, 0.15 * fade)
            }
        }
    }

    /// Mono samples for this cue.
    pub fn samples(self) -> Vec<f32> {
        // Runs at the default 44.1kHz
        let mut osc = saw();
        let n = (self.seconds() * SAMPLE_RATE as f32) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let (freq, gain) = self.shape(t);
                osc.filter_mono(freq) * gain
            })
            .collect()
    }
}

/// Open audio output. Dropping it stops all sound.
pub struct Sfx {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl Sfx {
    pub fn open() -> Result<Self, SoundError> {
        let (stream, handle) = OutputStream::try_default()?;
        Ok(Self {
            _stream: stream,
            handle,
        })
    }

    pub fn play(&self, cue: Cue) -> Result<(), SoundError> {
        let sink = Sink::try_new(&self.handle)?;
        sink.append(SamplesBuffer::new(1, SAMPLE_RATE, cue.samples()));
        sink.detach(); // Play in background
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_lengths() {
        assert_eq!(Cue::Crash.samples().len(), 22_050);
        assert_eq!(Cue::Flap.samples().len(), (0.08_f32 * 44_100.0) as usize);
    }

    #[test]
    fn test_samples_bounded_and_fade_out() {
        for cue in [Cue::Flap, Cue::Score, Cue::SpeedUp, Cue::Crash] {
            let s = cue.samples();
            assert!(s.iter().all(|x| x.is_finite() && x.abs() <= 1.0));
            let tail = s[s.len() - 10..].iter().map(|x| x.abs()).fold(0.0, f32::max);
            assert!(tail < 0.01, "{cue:?} does not fade out");
        }
    }

    #[test]
    fn test_crash_sweeps_down() {
        let (start, _) = Cue::Crash.shape(0.0);
        let (end, _) = Cue::Crash.shape(0.45);
        assert_eq!(start, 400.0);
        assert_eq!(end, 80.0);
    }

    #[test]
    fn test_event_mapping() {
        assert_eq!(Cue::for_event(GameEvent::Flapped), Some(Cue::Flap));
        assert_eq!(Cue::for_event(GameEvent::Scored(3)), Some(Cue::Score));
        assert_eq!(Cue::for_event(GameEvent::Restarted), None);
        assert_eq!(
            Cue::for_event(GameEvent::Crashed {
                score: 1,
                new_best: false
            }),
            Some(Cue::Crash)
        );
    }
}
