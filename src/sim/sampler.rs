//! Frame-coalesced gesture sampling
//!
//! Raw pointer events can arrive many times per frame. The sampler keeps a
//! single pending slot that each event overwrites; the frame callback drains
//! it, so the recognizer sees at most one sample per frame and never falls
//! behind under event flooding.

use glam::Vec2;

/// A pointer position with its event timestamp (ms)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSample {
    pub point: Vec2,
    pub time_ms: f64,
}

impl GestureSample {
    pub fn new(point: Vec2, time_ms: f64) -> Self {
        Self { point, time_ms }
    }
}

/// Single-slot pending sample buffer
#[derive(Debug, Clone, Default)]
pub struct GestureSampler {
    pending: Option<GestureSample>,
    frame_requested: bool,
}

impl GestureSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a raw event, replacing any sample not yet processed.
    ///
    /// Returns true when no frame is outstanding yet and the caller should
    /// request one.
    pub fn push(&mut self, sample: GestureSample) -> bool {
        self.pending = Some(sample);
        if self.frame_requested {
            false
        } else {
            self.frame_requested = true;
            true
        }
    }

    /// Drain the latest sample on a display frame
    pub fn take(&mut self) -> Option<GestureSample> {
        self.frame_requested = false;
        self.pending.take()
    }

    /// Drop the pending sample and any outstanding frame request
    pub fn cancel(&mut self) {
        self.pending = None;
        self.frame_requested = false;
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn frame_requested(&self) -> bool {
        self.frame_requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_sample_survives() {
        let mut sampler = GestureSampler::new();
        assert!(sampler.push(GestureSample::new(Vec2::new(0.0, 10.0), 1.0)));
        assert!(!sampler.push(GestureSample::new(Vec2::new(0.0, 20.0), 2.0)));
        assert!(!sampler.push(GestureSample::new(Vec2::new(0.0, 30.0), 3.0)));

        let sample = sampler.take().unwrap();
        assert_eq!(sample.point.y, 30.0);
        assert_eq!(sample.time_ms, 3.0);
        assert!(sampler.take().is_none());
    }

    #[test]
    fn test_new_frame_requested_after_drain() {
        let mut sampler = GestureSampler::new();
        assert!(sampler.push(GestureSample::new(Vec2::ZERO, 0.0)));
        sampler.take();
        assert!(!sampler.frame_requested());
        assert!(sampler.push(GestureSample::new(Vec2::ONE, 16.0)));
    }

    #[test]
    fn test_cancel_clears_pending() {
        let mut sampler = GestureSampler::new();
        sampler.push(GestureSample::new(Vec2::ONE, 5.0));
        sampler.cancel();
        assert!(!sampler.has_pending());
        assert!(!sampler.frame_requested());
        assert!(sampler.take().is_none());
    }
}
