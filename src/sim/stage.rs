//! Stage sequencing

use crate::audio::{AudioBackend, AudioSession};

/// The ordered stages of the experience
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Stage {
    #[default]
    Intro,
    BalloonGame,
    CakeCeremony,
    Gallery,
    FinalMessage,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Intro,
        Stage::BalloonGame,
        Stage::CakeCeremony,
        Stage::Gallery,
        Stage::FinalMessage,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Following stage, or None at the end
    pub fn next(self) -> Option<Stage> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Intro => "intro",
            Stage::BalloonGame => "balloon-game",
            Stage::CakeCeremony => "cake-ceremony",
            Stage::Gallery => "gallery",
            Stage::FinalMessage => "final-message",
        }
    }

    /// Entering this stage switches the background music on
    pub fn enables_background_music(self) -> bool {
        self == Stage::BalloonGame
    }
}

/// Forward-only sequencer over [`Stage`]
#[derive(Debug, Clone, Default)]
pub struct StageController {
    current: Stage,
}

impl StageController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_stage(&self) -> Stage {
        self.current
    }

    /// Move to the next stage and apply its audio side effect.
    ///
    /// Returns the new stage, or None (and changes nothing) at the final stage.
    pub fn advance<B: AudioBackend>(&mut self, audio: &mut AudioSession<B>) -> Option<Stage> {
        let next = self.current.next()?;
        log::info!("Stage {} -> {}", self.current.name(), next.name());
        self.current = next;
        if next.enables_background_music() {
            audio.set_background_playing(true);
        }
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{Mix, SilentBackend};
    use proptest::prelude::*;

    fn audio() -> AudioSession<SilentBackend> {
        AudioSession::new(SilentBackend::new(), "bg.mp3", Mix::default())
    }

    #[test]
    fn test_walks_all_stages_then_saturates() {
        let mut audio = audio();
        let mut c = StageController::new();
        assert_eq!(c.current_stage(), Stage::Intro);
        for expected in &Stage::ALL[1..] {
            assert_eq!(c.advance(&mut audio), Some(*expected));
        }
        assert_eq!(c.advance(&mut audio), None);
        assert_eq!(c.current_stage(), Stage::FinalMessage);
        assert!(c.current_stage().is_terminal());
    }

    #[test]
    fn test_balloon_game_enables_music() {
        let mut audio = audio();
        let mut c = StageController::new();
        c.advance(&mut audio);
        assert!(audio.is_background_playing());

        // Later stages leave the music alone
        audio.set_background_playing(false);
        c.advance(&mut audio);
        c.advance(&mut audio);
        assert!(!audio.is_background_playing());
    }

    proptest! {
        #[test]
        fn prop_advance_is_monotonic(steps in 0usize..20) {
            let mut audio = audio();
            let mut c = StageController::new();
            let mut prev = c.current_stage();
            for _ in 0..steps {
                c.advance(&mut audio);
                prop_assert!(c.current_stage() >= prev);
                prop_assert!(c.current_stage().index() <= prev.index() + 1);
                prev = c.current_stage();
            }
            prop_assert_eq!(c.current_stage().index(), steps.min(4));
        }
    }
}
