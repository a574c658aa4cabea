//! Birthday Bash - a staged, animated birthday experience
//!
//! Core modules:
//! - `sim`: Deterministic stage logic (scheduler, balloon physics, cut gesture, stage controller)
//! - `audio`: Shared audio session (background + foreground tracks, synthesized effects)
//! - `experience`: Root orchestration of the active stage
//! - `ui`: Markup generation and canvas drawing
//! - `platform`: Browser/native platform abstraction (clocks)
//! - `settings`, `tuning`, `content`: Data-driven configuration

pub mod audio;
pub mod content;
pub mod error;
pub mod experience;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use content::Content;
pub use error::{AudioError, SettingsError};
pub use experience::{Action, ActiveStage, Experience};
pub use settings::Settings;
pub use tuning::Tuning;

/// Experience configuration constants (defaults for `Tuning`)
pub mod consts {
    /// Delay between intro messages (ms)
    pub const INTRO_MESSAGE_MS: f64 = 3000.0;
    /// Delay between pressing play on the song card and the song choice (ms)
    pub const SONG_CHOICE_DELAY_MS: f64 = 3000.0;
    /// Launch message display time before the balloon room (ms)
    pub const LAUNCH_DELAY_MS: f64 = 3000.0;

    /// Balloon spawn interval (ms)
    pub const BALLOON_SPAWN_MS: f64 = 1000.0;
    /// Balloon physics tick (ms, one frame at 60 Hz)
    pub const BALLOON_TICK_MS: f64 = 16.0;
    /// Upward movement per tick
    pub const BALLOON_RISE_SPEED: f32 = 2.0;
    /// Horizontal sway per tick
    pub const BALLOON_SWAY_AMPLITUDE: f32 = 0.5;
    /// Sway phase step per tick (radians)
    pub const BALLOON_SWAY_STEP: f32 = 0.05;
    /// Balloons spawn this far below the bottom edge
    pub const BALLOON_SPAWN_DEPTH: f32 = 100.0;
    /// Balloons are removed once this far above the top edge
    pub const BALLOON_EXIT_MARGIN: f32 = 100.0;
    /// Balloon size range (width, height is 1.2x)
    pub const BALLOON_MIN_SIZE: f32 = 60.0;
    pub const BALLOON_MAX_SIZE: f32 = 100.0;
    /// "POP!" marker lifetime (ms)
    pub const POP_EFFECT_MS: f64 = 600.0;
    /// Pops needed to unlock the reward and continue control
    pub const REWARD_THRESHOLD: u32 = 6;

    /// Candles that must be lit before the knife appears
    pub const CANDLE_COUNT: usize = 3;
    /// Vertical drag beyond which the slice starts to show
    pub const SLICE_REVEAL_THRESHOLD: f32 = 100.0;
    /// Slice reveal cap (percent)
    pub const SLICE_REVEAL_MAX: f32 = 100.0;
    /// Vertical drag required for a cut
    pub const CUT_THRESHOLD: f32 = 200.0;
    /// Minimum downward speed for a cut (units/ms)
    pub const MIN_CUT_VELOCITY: f32 = 0.5;
    /// Delay between the cut and stage completion (ms)
    pub const CUT_COMPLETE_DELAY_MS: f64 = 3000.0;
    /// Confetti particles per cut
    pub const CONFETTI_COUNT: usize = 50;
    /// Confetti particles per cut with reduced motion
    pub const REDUCED_CONFETTI_COUNT: usize = 10;
    /// Tap heart lifetime (ms)
    pub const HEART_EFFECT_MS: f64 = 1000.0;

    /// Gallery photo rotation interval (ms)
    pub const PHOTO_ROTATE_MS: f64 = 5000.0;
    /// Song card skip-forward step (seconds)
    pub const SKIP_FORWARD_SECS: f64 = 10.0;

    /// Heart drag bound in the finale mini-game
    pub const HEART_DRAG_LIMIT: f32 = 100.0;

    /// Maximum repeater firings per task per frame to prevent spiral of death
    pub const MAX_CATCHUP: u32 = 8;
}
