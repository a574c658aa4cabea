//! Deterministic stage logic
//!
//! All interaction logic lives here. This module must be pure and deterministic:
//! - Time only comes from the clock readings handed to `update`
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod cake;
pub mod cut;
pub mod finale;
pub mod gallery;
pub mod intro;
pub mod room;
pub mod sampler;
pub mod schedule;
pub mod stage;

pub use cake::{CakeStage, CakeTheme, HeartEffect};
pub use cut::{CutOutcome, CutPhase, CutRecognizer};
pub use finale::{FinalePhase, FinaleStage};
pub use gallery::{GalleryStage, GalleryView};
pub use intro::{IntroPhase, IntroStage};
pub use room::{Balloon, BalloonId, BalloonVariant, PopEffect, RoomStage};
pub use sampler::{GestureSample, GestureSampler};
pub use schedule::{Scheduler, TaskId};
pub use stage::{Stage, StageController};

/// Visible area in CSS pixels, queried at spawn/interaction time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// One-shot completion latch shared by every stage.
///
/// `fire` arms it at most once; `take` reports it to the controller at most once.
#[derive(Debug, Clone, Default)]
pub struct Completion {
    fired: bool,
    delivered: bool,
}

impl Completion {
    /// Arm the latch. Returns false if it was already armed.
    pub fn fire(&mut self) -> bool {
        if self.fired {
            return false;
        }
        self.fired = true;
        true
    }

    pub fn is_fired(&self) -> bool {
        self.fired
    }

    /// Consume the completion. True exactly once after `fire`.
    pub fn take(&mut self) -> bool {
        if self.fired && !self.delivered {
            self.delivered = true;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_delivered_once() {
        let mut done = Completion::default();
        assert!(!done.take());
        assert!(done.fire());
        assert!(!done.fire());
        assert!(done.take());
        assert!(!done.take());
        assert!(done.is_fired());
    }

    #[test]
    fn test_viewport_never_empty() {
        let vp = Viewport::new(0.0, -5.0);
        assert_eq!(vp.width, 1.0);
        assert_eq!(vp.height, 1.0);
    }
}
