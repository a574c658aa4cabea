//! Cake ceremony: candles, themes, tap hearts and the drag-to-cut gesture

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::cut::{CutOutcome, CutRecognizer};
use super::sampler::{GestureSample, GestureSampler};
use super::schedule::Scheduler;
use super::{Completion, Viewport};
use crate::audio::{AudioBackend, AudioSession, SoundEffect};
use crate::consts::CANDLE_COUNT;
use crate::tuning::Tuning;

/// Cake color themes, cycled by the theme button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CakeTheme {
    #[default]
    Strawberry,
    Blueberry,
    Mint,
}

/// Colors for one theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CakePalette {
    pub base: (&'static str, &'static str),
    pub layer: (&'static str, &'static str),
    pub drip: &'static str,
    pub confetti: &'static str,
    pub slice: (&'static str, &'static str),
}

impl CakeTheme {
    pub fn next(self) -> Self {
        match self {
            CakeTheme::Strawberry => CakeTheme::Blueberry,
            CakeTheme::Blueberry => CakeTheme::Mint,
            CakeTheme::Mint => CakeTheme::Strawberry,
        }
    }

    pub fn palette(self) -> CakePalette {
        match self {
            CakeTheme::Strawberry => CakePalette {
                base: ("#f9a8d4", "#f472b6"),
                layer: ("#f472b6", "#ec4899"),
                drip: "#fbcfe8",
                confetti: "#fbbf24",
                slice: ("#ffccd5", "#ff6f69"),
            },
            CakeTheme::Blueberry => CakePalette {
                base: ("#93c5fd", "#60a5fa"),
                layer: ("#60a5fa", "#3b82f6"),
                drip: "#bfdbfe",
                confetti: "#60a5fa",
                slice: ("#cce7ff", "#60a5fa"),
            },
            CakeTheme::Mint => CakePalette {
                base: ("#86efac", "#4ade80"),
                layer: ("#4ade80", "#22c55e"),
                drip: "#bbf7d0",
                confetti: "#34d399",
                slice: ("#d1fae5", "#34d399"),
            },
        }
    }
}

/// Heart left where the screen was tapped
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeartEffect {
    pub id: u32,
    pub pos: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CakeEvent {
    ExpireHeart(u32),
    Complete,
}

/// The cake-cutting stage
pub struct CakeStage {
    tuning: Tuning,
    viewport: Viewport,
    rng: Pcg32,
    scheduler: Scheduler<CakeEvent>,
    candles: [bool; CANDLE_COUNT],
    theme: CakeTheme,
    recognizer: CutRecognizer,
    sampler: GestureSampler,
    confetti: Vec<Vec2>,
    hearts: Vec<HeartEffect>,
    next_id: u32,
    easter_egg_found: bool,
    completion: Completion,
}

impl CakeStage {
    pub fn new(tuning: &Tuning, viewport: Viewport, seed: u64, now_ms: f64) -> Self {
        Self {
            tuning: *tuning,
            viewport,
            rng: Pcg32::seed_from_u64(seed),
            scheduler: Scheduler::new(now_ms),
            candles: [false; CANDLE_COUNT],
            theme: CakeTheme::default(),
            recognizer: CutRecognizer::new(tuning),
            sampler: GestureSampler::new(),
            confetti: Vec::new(),
            hearts: Vec::new(),
            next_id: 1,
            easter_egg_found: false,
            completion: Completion::default(),
        }
    }

    pub fn candles(&self) -> &[bool] {
        &self.candles
    }

    /// Every candle is lit, so the knife can be used
    pub fn armed(&self) -> bool {
        self.candles.iter().all(|lit| *lit)
    }

    pub fn is_cut(&self) -> bool {
        self.recognizer.is_cut()
    }

    pub fn knife_visible(&self) -> bool {
        self.armed() && !self.is_cut()
    }

    pub fn recognizer(&self) -> &CutRecognizer {
        &self.recognizer
    }

    pub fn theme(&self) -> CakeTheme {
        self.theme
    }

    pub fn confetti(&self) -> &[Vec2] {
        &self.confetti
    }

    pub fn hearts(&self) -> &[HeartEffect] {
        &self.hearts
    }

    pub fn easter_egg_found(&self) -> bool {
        self.easter_egg_found
    }

    pub fn completion_mut(&mut self) -> &mut Completion {
        &mut self.completion
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Light one candle. Already-lit or unknown candles are ignored.
    pub fn light_candle<B: AudioBackend>(
        &mut self,
        index: usize,
        audio: &mut AudioSession<B>,
    ) -> bool {
        match self.candles.get_mut(index) {
            Some(lit) if !*lit => {
                *lit = true;
                audio.play_effect(SoundEffect::CandleLight);
                if self.armed() {
                    log::info!("All candles lit, knife ready");
                }
                true
            }
            _ => false,
        }
    }

    pub fn change_theme(&mut self) {
        self.theme = self.theme.next();
    }

    /// Reveal the hidden message. Returns false if already found.
    pub fn find_easter_egg(&mut self) -> bool {
        !std::mem::replace(&mut self.easter_egg_found, true)
    }

    /// Drop a heart at the tap position
    pub fn tap(&mut self, point: Vec2, now_ms: f64) {
        self.scheduler.advance_to(now_ms);
        let id = self.next_id;
        self.next_id += 1;
        self.hearts.push(HeartEffect { id, pos: point });
        self.scheduler
            .after(self.tuning.heart_effect_ms, CakeEvent::ExpireHeart(id));
    }

    /// Press on the cake: starts a drag when armed
    pub fn pointer_down(&mut self, point: Vec2, time_ms: f64) -> bool {
        let armed = self.armed();
        self.recognizer.begin(point, time_ms, armed)
    }

    /// Raw move event. Returns true when the caller should request a frame.
    pub fn pointer_move(&mut self, point: Vec2, time_ms: f64) -> bool {
        if !self.recognizer.is_dragging() {
            return false;
        }
        self.sampler.push(GestureSample::new(point, time_ms))
    }

    /// Release or leave: ends the drag and drops any unprocessed sample
    pub fn pointer_up(&mut self) {
        self.recognizer.end();
        self.sampler.cancel();
    }

    /// Frame update: process the coalesced sample, then due timers.
    ///
    /// Returns true when the stage layout changed. Knife and slice offsets
    /// move every frame and are read directly.
    pub fn update<B: AudioBackend>(&mut self, now_ms: f64, audio: &mut AudioSession<B>) -> bool {
        let mut changed = false;
        self.scheduler.advance_to(now_ms);

        if let Some(sample) = self.sampler.take() {
            match self.recognizer.sample(sample) {
                CutOutcome::Ignored | CutOutcome::Moved { .. } => {}
                CutOutcome::Cut => {
                    changed = true;
                    self.celebrate(audio);
                }
            }
        }

        while let Some(event) = self.scheduler.poll(now_ms) {
            changed = true;
            match event {
                CakeEvent::ExpireHeart(id) => self.hearts.retain(|h| h.id != id),
                CakeEvent::Complete => {
                    self.completion.fire();
                }
            }
        }

        changed
    }

    /// Confetti burst, fanfare and the delayed completion
    fn celebrate<B: AudioBackend>(&mut self, audio: &mut AudioSession<B>) {
        let vp = self.viewport;
        self.confetti = (0..self.tuning.confetti_count)
            .map(|_| {
                Vec2::new(
                    self.rng.random_range(0.0..vp.width),
                    self.rng.random_range(0.0..vp.height),
                )
            })
            .collect();
        audio.play_effect(SoundEffect::CakeCut);
        self.scheduler
            .after(self.tuning.cut_complete_delay_ms, CakeEvent::Complete);
    }

    /// Cancel timers and any pending sample
    pub fn teardown(&mut self) {
        self.scheduler.cancel_all();
        self.sampler.cancel();
    }
}
