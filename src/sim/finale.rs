//! Postcards, the catch-the-heart game and the final message.
//!
//! The finale is terminal: it never signals completion.

use glam::Vec2;

use crate::audio::{AudioBackend, AudioSession, SoundEffect};
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalePhase {
    Postcards,
    Game,
    Final,
}

pub struct FinaleStage {
    phase: FinalePhase,
    postcard_count: usize,
    /// Flipped postcards, in flip order
    flipped: Vec<usize>,
    heart: Vec2,
    drag_limit: f32,
}

impl FinaleStage {
    pub fn new(tuning: &Tuning, postcard_count: usize) -> Self {
        Self {
            phase: FinalePhase::Postcards,
            postcard_count,
            flipped: Vec::new(),
            heart: Vec2::ZERO,
            drag_limit: tuning.heart_drag_limit,
        }
    }

    pub fn phase(&self) -> FinalePhase {
        self.phase
    }

    pub fn is_flipped(&self, index: usize) -> bool {
        self.flipped.contains(&index)
    }

    pub fn flipped(&self) -> &[usize] {
        &self.flipped
    }

    /// Heart offset from its resting place
    pub fn heart(&self) -> Vec2 {
        self.heart
    }

    /// Turn a postcard face up. Cards stay flipped.
    pub fn flip_card<B: AudioBackend>(&mut self, index: usize, audio: &mut AudioSession<B>) -> bool {
        if self.phase != FinalePhase::Postcards
            || index >= self.postcard_count
            || self.is_flipped(index)
        {
            return false;
        }
        self.flipped.push(index);
        audio.play_effect(SoundEffect::CardFlip);
        true
    }

    pub fn open_game(&mut self) -> bool {
        if self.phase != FinalePhase::Postcards {
            return false;
        }
        self.phase = FinalePhase::Game;
        true
    }

    /// Move the heart, keeping it inside its drag box
    pub fn drag_heart(&mut self, delta: Vec2) {
        if self.phase == FinalePhase::Game {
            let limit = Vec2::splat(self.drag_limit);
            self.heart = (self.heart + delta).clamp(-limit, limit);
        }
    }

    pub fn catch_heart<B: AudioBackend>(&mut self, audio: &mut AudioSession<B>) -> bool {
        if self.phase != FinalePhase::Game {
            return false;
        }
        self.phase = FinalePhase::Final;
        audio.play_effect(SoundEffect::HeartCatch);
        log::info!("Heart caught, showing the final message");
        true
    }
}
