//! Background melody
//!
//! Playback is best effort: any failure is logged and the animation carries
//! on in silence. Playback needs the `audio` cargo feature; without it the
//! melody is skipped with a log line.

use crate::settings::AudioSettings;
use std::f64::consts::TAU;
use tracing::{info, warn};

/// C major arpeggio, then F, looped
#[cfg_attr(not(feature = "audio"), allow(dead_code))]
const NOTES: [f64; 8] = [523.25, 659.25, 783.99, 659.25, 587.33, 698.46, 880.0, 698.46];
#[cfg_attr(not(feature = "audio"), allow(dead_code))]
const NOTE_SECS: f64 = 0.6;

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[cfg(not(feature = "audio"))]
    #[error("built without audio support")]
    Unsupported,
    #[cfg(feature = "audio")]
    #[error("no audio output device")]
    NoDevice,
    #[cfg(feature = "audio")]
    #[error("no usable output config: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),
    #[cfg(feature = "audio")]
    #[error("could not build output stream: {0}")]
    Build(#[from] cpal::BuildStreamError),
    #[cfg(feature = "audio")]
    #[error("could not start playback: {0}")]
    Play(#[from] cpal::PlayStreamError),
}

/// Plucked-sine synth producing one mono sample per call
#[cfg_attr(not(feature = "audio"), allow(dead_code))]
pub struct Melody {
    sample_rate: f64,
    volume: f64,
    t: u64,
}

#[cfg_attr(not(feature = "audio"), allow(dead_code))]
impl Melody {
    pub fn new(sample_rate: u32, volume: f32) -> Self {
        Self {
            sample_rate: sample_rate.max(1) as f64,
            volume: volume.clamp(0.0, 1.0) as f64,
            t: 0,
        }
    }

    pub fn next_sample(&mut self) -> f32 {
        let per_note = ((self.sample_rate * NOTE_SECS) as u64).max(1);
        let freq = NOTES[(self.t / per_note) as usize % NOTES.len()];
        let within = (self.t % per_note) as f64 / per_note as f64;
        let envelope = (1.0 - within).powi(2);
        let phase = (self.t as f64 / self.sample_rate * freq).fract();
        self.t += 1;
        ((phase * TAU).sin() * envelope * self.volume) as f32
    }
}

/// Keeps the output stream alive; dropping it stops the music
pub struct Playback {
    #[cfg(feature = "audio")]
    _stream: cpal::Stream,
}

/// Try to start the melody; log and give up on failure.
pub fn start(settings: &AudioSettings) -> Option<Playback> {
    if !settings.enabled {
        info!("audio disabled");
        return None;
    }
    match try_start(settings.volume) {
        Ok(playback) => {
            info!(volume = settings.volume, "audio playing");
            Some(playback)
        }
        Err(e) => {
            warn!(error = %e, "audio autoplay blocked");
            None
        }
    }
}

#[cfg(not(feature = "audio"))]
fn try_start(_volume: f32) -> Result<Playback, AudioError> {
    Err(AudioError::Unsupported)
}

#[cfg(feature = "audio")]
fn try_start(volume: f32) -> Result<Playback, AudioError> {
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

    let host = cpal::default_host();
    let device = host.default_output_device().ok_or(AudioError::NoDevice)?;
    let config = device.default_output_config()?.config();
    let channels = (config.channels as usize).max(1);
    let mut melody = Melody::new(config.sample_rate.0, volume);

    let stream = device.build_output_stream(
        &config,
        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
            for frame in data.chunks_mut(channels) {
                let sample = melody.next_sample();
                frame.fill(sample);
            }
        },
        |err| warn!(error = %err, "audio stream error"),
        None,
    )?;
    stream.play()?;

    Ok(Playback { _stream: stream })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_stay_within_volume() {
        let mut melody = Melody::new(8000, 0.3);
        for _ in 0..8000 * 6 {
            let s = melody.next_sample();
            assert!(s.abs() <= 0.3 + 1e-6, "sample {s}");
        }
    }

    #[test]
    fn melody_starts_silent_and_makes_sound() {
        let mut melody = Melody::new(8000, 0.5);
        assert_eq!(melody.next_sample(), 0.0);
        let loudest = (0..400).map(|_| melody.next_sample().abs()).fold(0.0f32, f32::max);
        assert!(loudest > 0.1);
    }

    #[test]
    fn zero_volume_is_silent() {
        let mut melody = Melody::new(44_100, 0.0);
        assert!((0..1000).all(|_| melody.next_sample() == 0.0));
    }

    #[test]
    fn disabled_audio_does_not_start() {
        let settings = AudioSettings {
            enabled: false,
            volume: 0.3,
        };
        assert!(start(&settings).is_none());
    }

    #[cfg(not(feature = "audio"))]
    #[test]
    fn missing_backend_is_reported_not_fatal() {
        assert!(matches!(try_start(0.3), Err(AudioError::Unsupported)));
        assert!(start(&AudioSettings::default()).is_none());
    }
}
