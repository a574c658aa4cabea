//! Silent audio backend
//!
//! Used by the native walkthrough and by tests. Tracks make no sound but
//! record every request in a probe so callers can inspect what the session
//! asked for.

use std::cell::RefCell;
use std::rc::Rc;

use super::{AudioBackend, SoundEffect, Track};
use crate::error::AudioError;

/// Default reported length of a silent track (seconds)
const SILENT_TRACK_SECS: f64 = 180.0;

/// Recorded state of one opened track
#[derive(Debug, Clone, PartialEq)]
pub struct TrackProbe {
    pub source: String,
    pub play_requests: u32,
    pub paused: bool,
    pub position: f64,
    pub duration: Option<f64>,
    pub volume: f32,
    pub looping: bool,
    /// The session dropped the track
    pub released: bool,
}

type Probes = Rc<RefCell<Vec<TrackProbe>>>;

pub struct SilentTrack {
    slot: usize,
    probes: Probes,
    reject: bool,
}

impl SilentTrack {
    fn with<R>(&self, f: impl FnOnce(&mut TrackProbe) -> R) -> R {
        f(&mut self.probes.borrow_mut()[self.slot])
    }
}

impl Track for SilentTrack {
    fn play(&mut self) -> Result<(), AudioError> {
        let source = self.with(|p| {
            p.play_requests += 1;
            p.paused = false;
            p.source.clone()
        });
        if self.reject {
            return Err(AudioError::PlaybackRejected(source));
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.with(|p| p.paused = true);
    }

    fn seek(&mut self, secs: f64) {
        self.with(|p| p.position = secs);
    }

    fn current_time(&self) -> f64 {
        self.with(|p| p.position)
    }

    fn duration(&self) -> Option<f64> {
        self.with(|p| p.duration)
    }

    fn set_volume(&mut self, volume: f32) {
        self.with(|p| p.volume = volume);
    }

    fn set_looping(&mut self, looping: bool) {
        self.with(|p| p.looping = looping);
    }
}

impl Drop for SilentTrack {
    fn drop(&mut self) {
        if let Ok(mut probes) = self.probes.try_borrow_mut() {
            probes[self.slot].released = true;
        }
    }
}

/// Backend that plays nothing and remembers everything
#[derive(Default)]
pub struct SilentBackend {
    probes: Probes,
    effects: Vec<SoundEffect>,
    reject_playback: bool,
    unavailable: Vec<String>,
}

impl SilentBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose tracks refuse to play, like a browser blocking autoplay
    pub fn rejecting() -> Self {
        Self {
            reject_playback: true,
            ..Self::default()
        }
    }

    /// Make `open` fail for a source
    pub fn fail_open(&mut self, source: &str) {
        self.unavailable.push(source.to_string());
    }

    /// State of the most recently opened track for `source`
    pub fn probe(&self, source: &str) -> Option<TrackProbe> {
        self.probes
            .borrow()
            .iter()
            .rev()
            .find(|p| p.source == source)
            .cloned()
    }

    /// Number of tracks opened so far
    pub fn opened(&self) -> usize {
        self.probes.borrow().len()
    }

    /// Effects requested so far, in order
    pub fn effects(&self) -> &[SoundEffect] {
        &self.effects
    }

    fn with_latest(&self, source: &str, f: impl FnOnce(&mut TrackProbe)) {
        if let Some(p) = self
            .probes
            .borrow_mut()
            .iter_mut()
            .rev()
            .find(|p| p.source == source)
        {
            f(p);
        }
    }

    /// Simulate playback progress
    pub fn set_position(&mut self, source: &str, secs: f64) {
        self.with_latest(source, |p| p.position = secs);
    }

    /// Simulate loaded metadata
    pub fn set_duration(&mut self, source: &str, secs: f64) {
        self.with_latest(source, |p| p.duration = Some(secs));
    }
}

impl AudioBackend for SilentBackend {
    type Track = SilentTrack;

    fn open(&mut self, source: &str) -> Result<SilentTrack, AudioError> {
        if self.unavailable.iter().any(|s| s == source) {
            return Err(AudioError::Unavailable(source.to_string()));
        }
        let mut probes = self.probes.borrow_mut();
        probes.push(TrackProbe {
            source: source.to_string(),
            play_requests: 0,
            paused: true,
            position: 0.0,
            duration: Some(SILENT_TRACK_SECS),
            volume: 1.0,
            looping: false,
            released: false,
        });
        Ok(SilentTrack {
            slot: probes.len() - 1,
            probes: self.probes.clone(),
            reject: self.reject_playback,
        })
    }

    fn play_effect(&mut self, effect: SoundEffect, volume: f32) {
        log::trace!("Effect {:?} at {:.2}", effect, volume);
        self.effects.push(effect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_tracks_requests() {
        let mut backend = SilentBackend::new();
        let mut track = backend.open("song.mp3").unwrap();
        track.set_looping(true);
        track.play().unwrap();
        track.seek(12.5);
        let probe = backend.probe("song.mp3").unwrap();
        assert_eq!(probe.play_requests, 1);
        assert!(!probe.paused);
        assert!(probe.looping);
        assert_eq!(track.current_time(), 12.5);

        drop(track);
        assert!(backend.probe("song.mp3").unwrap().released);
    }

    #[test]
    fn test_rejecting_backend() {
        let mut backend = SilentBackend::rejecting();
        let mut track = backend.open("song.mp3").unwrap();
        assert!(matches!(track.play(), Err(AudioError::PlaybackRejected(_))));
    }

    #[test]
    fn test_fail_open() {
        let mut backend = SilentBackend::new();
        backend.fail_open("missing.mp3");
        assert!(backend.open("missing.mp3").is_err());
        assert_eq!(backend.opened(), 0);
    }
}
