//! Shared audio session
//!
//! One background track (looping song shared by the intro song card, the
//! music toggle and the gallery), at most one foreground playlist track, and
//! procedurally synthesized one-shot effects. Playback failures are logged
//! and swallowed: the `playing` flags record intent, not hardware state.

pub mod silent;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use silent::{SilentBackend, SilentTrack, TrackProbe};
#[cfg(target_arch = "wasm32")]
pub use web::{WebAudio, WebTrack};

use crate::error::AudioError;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Balloon popped
    BalloonPop,
    /// Candle lit
    CandleLight,
    /// Cake cut - celebratory fanfare
    CakeCut,
    /// Postcard flipped
    CardFlip,
    /// Finale heart caught
    HeartCatch,
}

/// A playable track (an `<audio>` element in the browser)
pub trait Track {
    /// Request playback. Asynchronous rejections are reported by the backend itself.
    fn play(&mut self) -> Result<(), AudioError>;
    fn pause(&mut self);
    /// Seek to an absolute position (seconds)
    fn seek(&mut self, secs: f64);
    fn current_time(&self) -> f64;
    /// Track length in seconds, if known yet
    fn duration(&self) -> Option<f64>;
    fn set_volume(&mut self, volume: f32);
    fn set_looping(&mut self, looping: bool);
}

/// Platform audio provider
pub trait AudioBackend {
    type Track: Track;

    /// Create a track for a media source URL
    fn open(&mut self, source: &str) -> Result<Self::Track, AudioError>;

    /// Fire-and-forget synthesized effect at the given volume (0.0 - 1.0)
    fn play_effect(&mut self, effect: SoundEffect, volume: f32);
}

/// A track plus the session's view of it
#[derive(Debug)]
pub struct AudioHandle<T> {
    track: T,
    source: String,
    looping: bool,
    volume: f32,
    playing: bool,
}

impl<T: Track> AudioHandle<T> {
    fn new(mut track: T, source: &str, looping: bool, volume: f32) -> Self {
        track.set_looping(looping);
        track.set_volume(volume);
        Self {
            track,
            source: source.to_string(),
            looping,
            volume,
            playing: false,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn track(&self) -> &T {
        &self.track
    }

    /// Start playback, optimistically marking the handle as playing
    fn start(&mut self) {
        self.playing = true;
        if let Err(e) = self.track.play() {
            log::warn!("Audio playback failed for {}: {}", self.source, e);
        }
    }

    fn stop(&mut self) {
        self.track.pause();
        self.playing = false;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        self.track.set_volume(volume);
    }
}

/// Volume levels applied by the session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mix {
    pub master: f32,
    pub music: f32,
    pub sfx: f32,
    pub muted: bool,
}

impl Default for Mix {
    fn default() -> Self {
        Self {
            master: 1.0,
            music: 0.5,
            sfx: 1.0,
            muted: false,
        }
    }
}

impl Mix {
    fn music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master * self.music).clamp(0.0, 1.0)
        }
    }

    fn foreground_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master.clamp(0.0, 1.0) }
    }

    fn sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master * self.sfx).clamp(0.0, 1.0)
        }
    }
}

/// The single audio session, built once and lent to every stage
pub struct AudioSession<B: AudioBackend> {
    backend: B,
    mix: Mix,
    background: Option<AudioHandle<B::Track>>,
    foreground: Option<AudioHandle<B::Track>>,
}

impl<B: AudioBackend> AudioSession<B> {
    /// Create the session and open the background track (looping)
    pub fn new(mut backend: B, background_source: &str, mix: Mix) -> Self {
        let background = match backend.open(background_source) {
            Ok(track) => Some(AudioHandle::new(
                track,
                background_source,
                true,
                mix.music_volume(),
            )),
            Err(e) => {
                log::warn!("Background track unavailable ({}): {}", background_source, e);
                None
            }
        };
        Self {
            backend,
            mix,
            background,
            foreground: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn background(&self) -> Option<&AudioHandle<B::Track>> {
        self.background.as_ref()
    }

    pub fn foreground(&self) -> Option<&AudioHandle<B::Track>> {
        self.foreground.as_ref()
    }

    pub fn mix(&self) -> Mix {
        self.mix
    }

    /// Update volumes on every open track
    pub fn set_mix(&mut self, mix: Mix) {
        self.mix = mix;
        if let Some(bg) = &mut self.background {
            bg.set_volume(mix.music_volume());
        }
        if let Some(fg) = &mut self.foreground {
            fg.set_volume(mix.foreground_volume());
        }
    }

    /// Whether background music is meant to be playing
    pub fn is_background_playing(&self) -> bool {
        self.background.as_ref().is_some_and(|bg| bg.playing)
    }

    /// Play or pause the background track. Last write wins.
    pub fn set_background_playing(&mut self, playing: bool) {
        let Some(bg) = &mut self.background else {
            return;
        };
        if playing == bg.playing {
            return;
        }
        if playing {
            bg.start();
            log::info!("Background music on");
        } else {
            bg.stop();
            log::info!("Background music off");
        }
    }

    /// Flip the background track (music toggle button). Returns the new state.
    pub fn toggle_background(&mut self) -> bool {
        let playing = !self.is_background_playing();
        self.set_background_playing(playing);
        self.is_background_playing()
    }

    /// Seek the background track to an absolute position (seconds)
    pub fn seek_background(&mut self, secs: f64) {
        if let Some(bg) = &mut self.background {
            bg.track.seek(secs.max(0.0));
        }
    }

    /// Move the background track by `delta` seconds, capped at its duration
    pub fn skip_background(&mut self, delta: f64) {
        if let Some(bg) = &mut self.background {
            let target = bg.track.current_time() + delta;
            let target = match bg.track.duration() {
                Some(duration) => target.min(duration),
                None => target,
            };
            bg.track.seek(target.max(0.0));
        }
    }

    /// Background playback progress in percent, once the duration is known
    pub fn background_progress(&self) -> Option<f32> {
        let bg = self.background.as_ref()?;
        let duration = bg.track.duration().filter(|d| *d > 0.0)?;
        Some(((bg.track.current_time() / duration) * 100.0).clamp(0.0, 100.0) as f32)
    }

    /// Start a playlist track, replacing any current one and silencing the background.
    pub fn play_foreground(&mut self, source: &str) {
        if let Some(current) = &mut self.foreground {
            current.stop();
            current.track.seek(0.0);
        }
        self.set_background_playing(false);

        match self.backend.open(source) {
            Ok(track) => {
                let mut handle =
                    AudioHandle::new(track, source, false, self.mix.foreground_volume());
                handle.start();
                log::info!("Playing {}", source);
                self.foreground = Some(handle);
            }
            Err(e) => {
                log::warn!("Playlist track unavailable ({}): {}", source, e);
                self.foreground = None;
            }
        }
    }

    /// Stop and release the foreground track
    pub fn stop_foreground(&mut self) {
        if let Some(mut fg) = self.foreground.take() {
            fg.stop();
            log::debug!("Released {}", fg.source);
        }
    }

    /// Play a synthesized effect at the session's effect volume
    pub fn play_effect(&mut self, effect: SoundEffect) {
        let vol = self.mix.sfx_volume();
        if vol <= 0.0 {
            return;
        }
        self.backend.play_effect(effect, vol);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> AudioSession<SilentBackend> {
        AudioSession::new(SilentBackend::new(), "bg.mp3", Mix::default())
    }

    #[test]
    fn test_background_opened_looping_at_music_volume() {
        let s = session();
        let bg = s.background().unwrap();
        assert!(bg.is_looping());
        assert_eq!(bg.volume(), 0.5);
        assert!(!s.is_background_playing());
        let probe = s.backend().probe("bg.mp3").unwrap();
        assert!(probe.looping);
        assert_eq!(probe.volume, 0.5);
    }

    #[test]
    fn test_foreground_replaces_previous_and_stops_background() {
        let mut s = session();
        s.set_background_playing(true);
        s.play_foreground("a.mp3");
        assert!(!s.is_background_playing());
        assert!(s.backend().probe("bg.mp3").unwrap().paused);

        s.backend_mut().set_position("a.mp3", 42.0);
        s.play_foreground("b.mp3");

        let a = s.backend().probe("a.mp3").unwrap();
        assert!(a.paused);
        assert_eq!(a.position, 0.0);
        let b = s.backend().probe("b.mp3").unwrap();
        assert_eq!(b.play_requests, 1);
        assert!(!b.paused);
        assert_eq!(s.foreground().unwrap().source(), "b.mp3");
        assert!(s.foreground().unwrap().is_playing());
    }

    #[test]
    fn test_rejected_playback_is_swallowed() {
        let mut s = AudioSession::new(SilentBackend::rejecting(), "bg.mp3", Mix::default());
        s.set_background_playing(true);
        // Intent is kept even though the platform refused
        assert!(s.is_background_playing());
        s.play_foreground("a.mp3");
        assert!(s.foreground().unwrap().is_playing());
    }

    #[test]
    fn test_missing_background_is_a_no_op() {
        let mut backend = SilentBackend::new();
        backend.fail_open("bg.mp3");
        let mut s = AudioSession::new(backend, "bg.mp3", Mix::default());
        assert!(s.background().is_none());
        s.set_background_playing(true);
        assert!(!s.toggle_background());
        assert_eq!(s.background_progress(), None);
    }

    #[test]
    fn test_stop_foreground_releases_track() {
        let mut s = session();
        s.play_foreground("a.mp3");
        s.stop_foreground();
        assert!(s.foreground().is_none());
        let a = s.backend().probe("a.mp3").unwrap();
        assert!(a.paused);
        assert!(a.released);
    }

    #[test]
    fn test_toggle_and_skip() {
        let mut s = session();
        assert!(s.toggle_background());
        assert!(!s.toggle_background());

        s.backend_mut().set_duration("bg.mp3", 25.0);
        s.skip_background(10.0);
        s.skip_background(10.0);
        s.skip_background(10.0);
        assert_eq!(s.backend().probe("bg.mp3").unwrap().position, 25.0);
        assert_eq!(s.background_progress(), Some(100.0));
        s.seek_background(0.0);
        assert_eq!(s.background_progress(), Some(0.0));
    }

    #[test]
    fn test_muted_mix_skips_effects() {
        let mut s = session();
        s.play_effect(SoundEffect::BalloonPop);
        s.set_mix(Mix {
            muted: true,
            ..Mix::default()
        });
        s.play_effect(SoundEffect::BalloonPop);
        assert_eq!(s.backend().effects(), &[SoundEffect::BalloonPop]);
        assert_eq!(s.backend().probe("bg.mp3").unwrap().volume, 0.0);
    }
}
