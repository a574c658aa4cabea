//! Drag-to-cut gesture recognizer
//!
//! Idle -> Dragging on a press once the cake is armed, Dragging -> Cut when a
//! sample is both far enough below the origin and moving down fast enough.
//! Cut is terminal for the stage instance.

use glam::Vec2;

use super::sampler::GestureSample;
use crate::tuning::Tuning;

/// Recognizer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutPhase {
    Idle,
    Dragging,
    Cut,
}

/// Result of feeding one sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CutOutcome {
    /// Not dragging, or already cut
    Ignored,
    /// Knife moved, no cut yet
    Moved { velocity: Option<f32> },
    /// The cut happened on this sample
    Cut,
}

#[derive(Debug, Clone)]
pub struct CutRecognizer {
    phase: CutPhase,
    origin: Vec2,
    knife: Vec2,
    slice_reveal: f32,
    last_time_ms: f64,
    last_y: f32,
    reveal_threshold: f32,
    reveal_max: f32,
    cut_threshold: f32,
    min_velocity: f32,
}

impl CutRecognizer {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            phase: CutPhase::Idle,
            origin: Vec2::ZERO,
            knife: Vec2::ZERO,
            slice_reveal: 0.0,
            last_time_ms: 0.0,
            last_y: 0.0,
            reveal_threshold: tuning.slice_reveal_threshold,
            reveal_max: tuning.slice_reveal_max,
            cut_threshold: tuning.cut_threshold,
            min_velocity: tuning.min_cut_velocity,
        }
    }

    pub fn phase(&self) -> CutPhase {
        self.phase
    }

    pub fn is_cut(&self) -> bool {
        self.phase == CutPhase::Cut
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == CutPhase::Dragging
    }

    /// Knife offset from where the drag started
    pub fn knife(&self) -> Vec2 {
        self.knife
    }

    /// Revealed slice height (percent, 0..=reveal_max)
    pub fn slice_reveal(&self) -> f32 {
        self.slice_reveal
    }

    /// Start a drag. Only accepted from Idle and when `armed`.
    pub fn begin(&mut self, point: Vec2, time_ms: f64, armed: bool) -> bool {
        if self.phase != CutPhase::Idle || !armed {
            return false;
        }
        self.phase = CutPhase::Dragging;
        self.origin = point;
        self.last_time_ms = time_ms;
        self.last_y = point.y;
        true
    }

    /// Process one frame-coalesced sample
    pub fn sample(&mut self, sample: GestureSample) -> CutOutcome {
        if self.phase != CutPhase::Dragging {
            return CutOutcome::Ignored;
        }

        let displacement = sample.point - self.origin;
        self.knife = displacement;
        if displacement.y > self.reveal_threshold {
            self.slice_reveal = (displacement.y - self.reveal_threshold).min(self.reveal_max);
        }

        let dt = sample.time_ms - self.last_time_ms;
        let velocity = (dt > 0.0).then(|| (sample.point.y - self.last_y) / dt as f32);
        self.last_time_ms = sample.time_ms;
        self.last_y = sample.point.y;

        match velocity {
            Some(v) if displacement.y > self.cut_threshold && v > self.min_velocity => {
                self.phase = CutPhase::Cut;
                log::info!("Cake cut at dy={:.0} v={:.2}", displacement.y, v);
                CutOutcome::Cut
            }
            _ => CutOutcome::Moved { velocity },
        }
    }

    /// Release. A drag that never cut returns to Idle.
    pub fn end(&mut self) {
        if self.phase == CutPhase::Dragging {
            self.phase = CutPhase::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn recognizer() -> CutRecognizer {
        CutRecognizer::new(&Tuning::default())
    }

    fn at(x: f32, y: f32, t: f64) -> GestureSample {
        GestureSample::new(Vec2::new(x, y), t)
    }

    #[test]
    fn test_fast_drag_cuts_once() {
        let mut r = recognizer();
        assert!(r.begin(Vec2::ZERO, 0.0, true));
        // 250 units in 100ms = 2.5 units/ms
        assert_eq!(r.sample(at(0.0, 250.0, 100.0)), CutOutcome::Cut);
        assert_eq!(r.phase(), CutPhase::Cut);
        assert_eq!(r.sample(at(0.0, 400.0, 110.0)), CutOutcome::Ignored);
    }

    #[test]
    fn test_slow_drag_never_cuts() {
        let mut r = recognizer();
        r.begin(Vec2::ZERO, 0.0, true);
        // 250 units in 1000ms = 0.25 units/ms
        let outcome = r.sample(at(0.0, 250.0, 1000.0));
        assert_eq!(
            outcome,
            CutOutcome::Moved {
                velocity: Some(0.25)
            }
        );
        assert_eq!(r.phase(), CutPhase::Dragging);
    }

    #[test]
    fn test_begin_requires_armed_and_idle() {
        let mut r = recognizer();
        assert!(!r.begin(Vec2::ZERO, 0.0, false));
        assert_eq!(r.phase(), CutPhase::Idle);
        assert!(r.begin(Vec2::ZERO, 0.0, true));
        assert!(!r.begin(Vec2::ONE, 5.0, true));
    }

    #[test]
    fn test_slice_reveal_capped() {
        let mut r = recognizer();
        r.begin(Vec2::ZERO, 0.0, true);
        r.sample(at(0.0, 150.0, 1000.0));
        assert_eq!(r.slice_reveal(), 50.0);
        r.sample(at(0.0, 190.0, 2000.0));
        assert_eq!(r.slice_reveal(), 90.0);
        // Far below but slow: capped reveal, no cut
        r.sample(at(0.0, 600.0, 100_000.0));
        assert_eq!(r.slice_reveal(), 100.0);
        assert!(!r.is_cut());
    }

    #[test]
    fn test_zero_dt_skips_velocity() {
        let mut r = recognizer();
        r.begin(Vec2::ZERO, 50.0, true);
        assert_eq!(
            r.sample(at(0.0, 300.0, 50.0)),
            CutOutcome::Moved { velocity: None }
        );
        assert!(r.is_dragging());
    }

    #[test]
    fn test_end_cancels_drag() {
        let mut r = recognizer();
        r.begin(Vec2::ZERO, 0.0, true);
        r.sample(at(10.0, 120.0, 500.0));
        r.end();
        assert_eq!(r.phase(), CutPhase::Idle);
        // A new drag starts from the new origin
        assert!(r.begin(Vec2::new(0.0, 120.0), 600.0, true));
        assert_eq!(r.sample(at(0.0, 240.0, 700.0)), CutOutcome::Moved { velocity: Some(1.2) });
    }

    #[test]
    fn test_cut_state_frozen() {
        let mut r = recognizer();
        r.begin(Vec2::ZERO, 0.0, true);
        r.sample(at(5.0, 250.0, 100.0));
        let knife = r.knife();
        let slice = r.slice_reveal();
        r.sample(at(80.0, 900.0, 120.0));
        r.end();
        assert!(!r.begin(Vec2::ZERO, 200.0, true));
        assert_eq!(r.knife(), knife);
        assert_eq!(r.slice_reveal(), slice);
        assert!(r.is_cut());
    }

    proptest! {
        #[test]
        fn prop_slow_samples_never_cut(steps in prop::collection::vec((0.0f32..40.0, 100.0f64..400.0), 1..40)) {
            // Each step moves down at most 40 units over at least 100ms: velocity <= 0.4
            let mut r = recognizer();
            r.begin(Vec2::ZERO, 0.0, true);
            let (mut y, mut t) = (0.0f32, 0.0f64);
            for (dy, dt) in steps {
                y += dy;
                t += dt;
                prop_assert_ne!(r.sample(at(0.0, y, t)), CutOutcome::Cut);
            }
            prop_assert!(!r.is_cut());
        }

        #[test]
        fn prop_at_most_one_cut(ys in prop::collection::vec(0.0f32..1000.0, 1..60)) {
            let mut r = recognizer();
            r.begin(Vec2::ZERO, 0.0, true);
            let cuts = ys
                .iter()
                .enumerate()
                .filter(|(i, y)| r.sample(at(0.0, **y, (*i as f64 + 1.0) * 16.0)) == CutOutcome::Cut)
                .count();
            prop_assert!(cuts <= 1);
        }
    }
}
