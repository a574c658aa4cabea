//! Browser audio backend
//!
//! Tracks are `<audio>` elements. Effects are procedurally generated with
//! the Web Audio API - no sound files needed!

use wasm_bindgen_futures::JsFuture;
use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

use super::{AudioBackend, SoundEffect, Track};
use crate::error::AudioError;

/// An `<audio>` element
pub struct WebTrack {
    element: HtmlAudioElement,
    source: String,
}

impl Track for WebTrack {
    fn play(&mut self) -> Result<(), AudioError> {
        let promise = self
            .element
            .play()
            .map_err(|e| AudioError::PlaybackRejected(format!("{}: {:?}", self.source, e)))?;
        // Autoplay policy rejections arrive asynchronously
        let source = self.source.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                log::warn!("Audio playback failed for {}: {:?}", source, e);
            }
        });
        Ok(())
    }

    fn pause(&mut self) {
        let _ = self.element.pause();
    }

    fn seek(&mut self, secs: f64) {
        self.element.set_current_time(secs);
    }

    fn current_time(&self) -> f64 {
        self.element.current_time()
    }

    fn duration(&self) -> Option<f64> {
        let d = self.element.duration();
        d.is_finite().then_some(d)
    }

    fn set_volume(&mut self, volume: f32) {
        self.element.set_volume(volume.clamp(0.0, 1.0) as f64);
    }

    fn set_looping(&mut self, looping: bool) {
        self.element.set_loop(looping);
    }
}

/// Audio manager for the browser
pub struct WebAudio {
    ctx: Option<AudioContext>,
}

impl Default for WebAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl WebAudio {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - effects disabled");
        }
        Self { ctx }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Balloon pop - sharp crack with a falling tail
    fn play_pop(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 1800.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.05)
                .ok();
            osc.frequency().set_value_at_time(1800.0, t).ok();
            osc.frequency().set_value_at_time(400.0, t + 0.01).ok();
            osc.frequency().set_value_at_time(2400.0, t + 0.02).ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.06).ok();
        }

        if let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Sine) {
            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(60.0, t + 0.15)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.2).ok();
        }
    }

    /// Candle lit - soft shimmer
    fn play_candle(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [880.0, 1320.0].iter().enumerate() {
            let delay = i as f64 * 0.03;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.15, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.35).ok();
            }
        }
    }

    /// Cake cut - triumphant fanfare
    fn play_fanfare(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [523.0, 659.0, 784.0, 1047.0].iter().enumerate() {
            let delay = i as f64 * 0.12;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.6).ok();
            }
        }
    }

    /// Card flip - quick tick
    fn play_flip(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 600.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.25, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.06)
            .ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(900.0, t + 0.05)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.08).ok();
    }

    /// Heart caught - happy ding
    fn play_heart(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [600.0, 800.0, 1000.0].iter().enumerate() {
            let delay = i as f64 * 0.08;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.2).ok();
            }
        }
    }
}

impl AudioBackend for WebAudio {
    type Track = WebTrack;

    fn open(&mut self, source: &str) -> Result<WebTrack, AudioError> {
        let element = HtmlAudioElement::new_with_src(source)
            .map_err(|e| AudioError::Unavailable(format!("{}: {:?}", source, e)))?;
        Ok(WebTrack {
            element,
            source: source.to_string(),
        })
    }

    fn play_effect(&mut self, effect: SoundEffect, vol: f32) {
        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::BalloonPop => self.play_pop(ctx, vol),
            SoundEffect::CandleLight => self.play_candle(ctx, vol),
            SoundEffect::CakeCut => self.play_fanfare(ctx, vol),
            SoundEffect::CardFlip => self.play_flip(ctx, vol),
            SoundEffect::HeartCatch => self.play_heart(ctx, vol),
        }
    }
}
