//! Opening sequence: timed messages, the song card and the launch message

use super::schedule::{Scheduler, TaskId};
use super::Completion;
use crate::audio::{AudioBackend, AudioSession};
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntroPhase {
    /// Greeting messages, then the choice buttons
    Messages,
    /// Song card with playback controls
    SongCard,
    /// "Let's go" message before the balloon room
    Launch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IntroEvent {
    NextMessage,
    SongChosen,
    Launch,
}

pub struct IntroStage {
    tuning: Tuning,
    scheduler: Scheduler<IntroEvent>,
    phase: IntroPhase,
    message_count: usize,
    message_index: usize,
    buttons_visible: bool,
    song_playing: bool,
    progress_visible: bool,
    song_choice: Option<TaskId>,
    completion: Completion,
}

impl IntroStage {
    pub fn new(tuning: &Tuning, message_count: usize, now_ms: f64) -> Self {
        let message_count = message_count.max(1);
        let mut scheduler = Scheduler::new(now_ms);
        let buttons_visible = message_count == 1;
        if !buttons_visible {
            scheduler.every(tuning.intro_message_ms, IntroEvent::NextMessage);
        }
        Self {
            tuning: *tuning,
            scheduler,
            phase: IntroPhase::Messages,
            message_count,
            message_index: 0,
            buttons_visible,
            song_playing: false,
            progress_visible: false,
            song_choice: None,
            completion: Completion::default(),
        }
    }

    pub fn phase(&self) -> IntroPhase {
        self.phase
    }

    pub fn message_index(&self) -> usize {
        self.message_index
    }

    pub fn buttons_visible(&self) -> bool {
        self.buttons_visible
    }

    pub fn song_playing(&self) -> bool {
        self.song_playing
    }

    pub fn progress_visible(&self) -> bool {
        self.progress_visible
    }

    pub fn completion_mut(&mut self) -> &mut Completion {
        &mut self.completion
    }

    /// A choice button was clicked: open the song card
    pub fn choose(&mut self) -> bool {
        if self.phase != IntroPhase::Messages || !self.buttons_visible {
            return false;
        }
        self.phase = IntroPhase::SongCard;
        self.scheduler.cancel_all();
        true
    }

    /// Play/pause on the song card. The first play schedules the song choice.
    pub fn toggle_song<B: AudioBackend>(&mut self, audio: &mut AudioSession<B>, now_ms: f64) {
        if self.phase != IntroPhase::SongCard {
            return;
        }
        self.scheduler.advance_to(now_ms);
        if self.song_playing {
            audio.set_background_playing(false);
            self.song_playing = false;
            return;
        }
        self.progress_visible = true;
        audio.set_background_playing(true);
        self.song_playing = true;
        if self.song_choice.is_none() {
            self.song_choice = Some(
                self.scheduler
                    .after(self.tuning.song_choice_delay_ms, IntroEvent::SongChosen),
            );
        }
    }

    pub fn skip_back<B: AudioBackend>(&mut self, audio: &mut AudioSession<B>) {
        if self.phase == IntroPhase::SongCard {
            audio.seek_background(0.0);
        }
    }

    pub fn skip_forward<B: AudioBackend>(&mut self, audio: &mut AudioSession<B>) {
        if self.phase == IntroPhase::SongCard {
            audio.skip_background(self.tuning.skip_forward_secs);
        }
    }

    /// Progress bar fill (percent), once the bar is shown
    pub fn progress<B: AudioBackend>(&self, audio: &AudioSession<B>) -> Option<f32> {
        if !self.progress_visible {
            return None;
        }
        Some(audio.background_progress().unwrap_or(0.0))
    }

    /// Returns true when visible state changed
    pub fn update<B: AudioBackend>(&mut self, now_ms: f64, audio: &mut AudioSession<B>) -> bool {
        let mut changed = false;
        while let Some(event) = self.scheduler.poll(now_ms) {
            changed = true;
            match event {
                IntroEvent::NextMessage => self.next_message(),
                IntroEvent::SongChosen => {
                    audio.set_background_playing(true);
                    self.song_playing = true;
                    self.phase = IntroPhase::Launch;
                    self.scheduler
                        .after(self.tuning.launch_delay_ms, IntroEvent::Launch);
                    log::info!("Song chosen, launching");
                }
                IntroEvent::Launch => {
                    self.completion.fire();
                }
            }
        }
        changed
    }

    fn next_message(&mut self) {
        if self.message_index + 1 < self.message_count {
            self.message_index += 1;
        }
        if self.message_index + 1 == self.message_count {
            self.buttons_visible = true;
            self.scheduler.cancel_all();
        }
    }

    pub fn teardown(&mut self) {
        self.scheduler.cancel_all();
    }
}
