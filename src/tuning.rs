//! Data-driven timing and gesture balance
//!
//! Every threshold and interval the stages use. Defaults come from `consts`;
//! a settings block can override any field.

use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Intro ===
    pub intro_message_ms: f64,
    pub song_choice_delay_ms: f64,
    pub launch_delay_ms: f64,

    // === Balloon room ===
    pub balloon_spawn_ms: f64,
    pub balloon_tick_ms: f64,
    pub balloon_rise_speed: f32,
    pub balloon_sway_amplitude: f32,
    pub balloon_sway_step: f32,
    pub balloon_spawn_depth: f32,
    pub balloon_exit_margin: f32,
    pub balloon_min_size: f32,
    pub balloon_max_size: f32,
    pub pop_effect_ms: f64,
    pub reward_threshold: u32,

    // === Cake ===
    pub slice_reveal_threshold: f32,
    pub slice_reveal_max: f32,
    pub cut_threshold: f32,
    pub min_cut_velocity: f32,
    pub cut_complete_delay_ms: f64,
    pub confetti_count: usize,
    pub heart_effect_ms: f64,

    // === Gallery ===
    pub photo_rotate_ms: f64,
    pub skip_forward_secs: f64,

    // === Finale ===
    pub heart_drag_limit: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            intro_message_ms: INTRO_MESSAGE_MS,
            song_choice_delay_ms: SONG_CHOICE_DELAY_MS,
            launch_delay_ms: LAUNCH_DELAY_MS,

            balloon_spawn_ms: BALLOON_SPAWN_MS,
            balloon_tick_ms: BALLOON_TICK_MS,
            balloon_rise_speed: BALLOON_RISE_SPEED,
            balloon_sway_amplitude: BALLOON_SWAY_AMPLITUDE,
            balloon_sway_step: BALLOON_SWAY_STEP,
            balloon_spawn_depth: BALLOON_SPAWN_DEPTH,
            balloon_exit_margin: BALLOON_EXIT_MARGIN,
            balloon_min_size: BALLOON_MIN_SIZE,
            balloon_max_size: BALLOON_MAX_SIZE,
            pop_effect_ms: POP_EFFECT_MS,
            reward_threshold: REWARD_THRESHOLD,

            slice_reveal_threshold: SLICE_REVEAL_THRESHOLD,
            slice_reveal_max: SLICE_REVEAL_MAX,
            cut_threshold: CUT_THRESHOLD,
            min_cut_velocity: MIN_CUT_VELOCITY,
            cut_complete_delay_ms: CUT_COMPLETE_DELAY_MS,
            confetti_count: CONFETTI_COUNT,
            heart_effect_ms: HEART_EFFECT_MS,

            photo_rotate_ms: PHOTO_ROTATE_MS,
            skip_forward_secs: SKIP_FORWARD_SECS,

            heart_drag_limit: HEART_DRAG_LIMIT,
        }
    }
}

impl Tuning {
    /// Check the invariants the stages rely on.
    ///
    /// Returns a description of the first violated constraint.
    pub fn check(&self) -> Result<(), String> {
        let intervals = [
            ("intro_message_ms", self.intro_message_ms),
            ("balloon_spawn_ms", self.balloon_spawn_ms),
            ("balloon_tick_ms", self.balloon_tick_ms),
            ("photo_rotate_ms", self.photo_rotate_ms),
        ];
        for (name, value) in intervals {
            if !(value > 0.0) {
                return Err(format!("{name} must be positive, got {value}"));
            }
        }
        let delays = [
            ("song_choice_delay_ms", self.song_choice_delay_ms),
            ("launch_delay_ms", self.launch_delay_ms),
            ("pop_effect_ms", self.pop_effect_ms),
            ("cut_complete_delay_ms", self.cut_complete_delay_ms),
            ("heart_effect_ms", self.heart_effect_ms),
            ("skip_forward_secs", self.skip_forward_secs),
        ];
        for (name, value) in delays {
            if !(value >= 0.0) {
                return Err(format!("{name} must not be negative, got {value}"));
            }
        }
        if !(self.min_cut_velocity >= 0.0) {
            return Err(format!(
                "min_cut_velocity must not be negative, got {}",
                self.min_cut_velocity
            ));
        }
        // Both are used as clamp bounds
        let bounds = [
            ("slice_reveal_max", self.slice_reveal_max),
            ("heart_drag_limit", self.heart_drag_limit),
        ];
        for (name, value) in bounds {
            if !(value > 0.0) {
                return Err(format!("{name} must be positive, got {value}"));
            }
        }
        // Balloons must strictly rise every tick
        if !(self.balloon_rise_speed > 0.0) {
            return Err(format!(
                "balloon_rise_speed must be positive, got {}",
                self.balloon_rise_speed
            ));
        }
        if !(self.balloon_min_size > 0.0 && self.balloon_min_size < self.balloon_max_size) {
            return Err(format!(
                "balloon size range {}..{} is empty",
                self.balloon_min_size, self.balloon_max_size
            ));
        }
        if self.slice_reveal_threshold > self.cut_threshold {
            return Err(format!(
                "slice_reveal_threshold ({}) exceeds cut_threshold ({})",
                self.slice_reveal_threshold, self.cut_threshold
            ));
        }
        if self.reward_threshold == 0 {
            return Err("reward_threshold must be at least 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().check().is_ok());
    }

    #[test]
    fn test_rejects_non_rising_balloons() {
        let tuning = Tuning {
            balloon_rise_speed: 0.0,
            ..Default::default()
        };
        assert!(tuning.check().unwrap_err().contains("balloon_rise_speed"));
    }

    #[test]
    fn test_rejects_zero_interval() {
        let tuning = Tuning {
            balloon_tick_ms: 0.0,
            ..Default::default()
        };
        assert!(tuning.check().is_err());
    }

    #[test]
    fn test_rejects_inverted_clamp_bounds() {
        let tuning = Tuning {
            heart_drag_limit: -50.0,
            ..Default::default()
        };
        assert!(tuning.check().unwrap_err().contains("heart_drag_limit"));

        let tuning = Tuning {
            slice_reveal_max: 0.0,
            ..Default::default()
        };
        assert!(tuning.check().unwrap_err().contains("slice_reveal_max"));
    }

    #[test]
    fn test_rejects_negative_velocity_and_delays() {
        let tuning = Tuning {
            min_cut_velocity: -0.1,
            ..Default::default()
        };
        assert!(tuning.check().unwrap_err().contains("min_cut_velocity"));

        let tuning = Tuning {
            launch_delay_ms: -1.0,
            ..Default::default()
        };
        assert!(tuning.check().unwrap_err().contains("launch_delay_ms"));

        // Zero delays and a zero cut speed are allowed
        let tuning = Tuning {
            min_cut_velocity: 0.0,
            cut_complete_delay_ms: 0.0,
            ..Default::default()
        };
        assert!(tuning.check().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning: Tuning = serde_json::from_str(r#"{"reward_threshold": 3}"#).unwrap();
        assert_eq!(tuning.reward_threshold, 3);
        assert_eq!(tuning.cut_threshold, CUT_THRESHOLD);
    }
}
