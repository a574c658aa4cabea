//! Root orchestration
//!
//! `Experience` owns the stage controller, the single audio session and the
//! one mounted stage. The platform layer feeds it `Action`s and frame ticks;
//! it never reads a clock itself.

use glam::Vec2;

use crate::audio::{AudioBackend, AudioSession};
use crate::settings::Settings;
use crate::sim::{
    BalloonId, CakeStage, FinaleStage, GalleryStage, IntroStage, RoomStage, Stage,
    StageController, Viewport,
};
use crate::tuning::Tuning;

/// The mounted stage and its state
pub enum ActiveStage {
    Intro(IntroStage),
    Room(RoomStage),
    Cake(CakeStage),
    Gallery(GalleryStage),
    Finale(FinaleStage),
}

impl ActiveStage {
    pub fn stage(&self) -> Stage {
        match self {
            ActiveStage::Intro(_) => Stage::Intro,
            ActiveStage::Room(_) => Stage::BalloonGame,
            ActiveStage::Cake(_) => Stage::CakeCeremony,
            ActiveStage::Gallery(_) => Stage::Gallery,
            ActiveStage::Finale(_) => Stage::FinalMessage,
        }
    }
}

/// A user interaction, already resolved to its target
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Global music button
    ToggleMusic,

    // === Intro ===
    ShowSongCard,
    ToggleSong,
    SkipBack,
    SkipForward,

    // === Balloon room ===
    /// Press on the balloon canvas (hit-tested)
    PressRoom(Vec2),
    PopBalloon(BalloonId),
    ContinueRoom,

    // === Cake ===
    LightCandle(usize),
    ChangeTheme,
    FindEasterEgg,
    TapCake(Vec2),
    PointerDown(Vec2),
    PointerMove(Vec2),
    PointerUp,

    // === Gallery ===
    ProceedTimeline,
    FlipPhoto,
    PlaySong(usize),
    ContinueGallery,

    // === Finale ===
    FlipPostcard(usize),
    OpenHeartGame,
    DragHeart(Vec2),
    CatchHeart,
}

pub struct Experience<B: AudioBackend> {
    settings: Settings,
    tuning: Tuning,
    controller: StageController,
    audio: AudioSession<B>,
    active: ActiveStage,
    viewport: Viewport,
    seed: u64,
    /// Bumped whenever the stage layout must be rebuilt
    revision: u64,
}

impl<B: AudioBackend> Experience<B> {
    pub fn new(settings: Settings, backend: B, viewport: Viewport, seed: u64, now_ms: f64) -> Self {
        let tuning = settings.effective_tuning();
        let audio = AudioSession::new(backend, &settings.content.song.source, settings.mix());
        let intro = IntroStage::new(&tuning, settings.content.intro_messages.len(), now_ms);
        log::info!("Experience started for {}", settings.content.recipient);
        Self {
            settings,
            tuning,
            controller: StageController::new(),
            audio,
            active: ActiveStage::Intro(intro),
            viewport,
            seed,
            revision: 0,
        }
    }

    pub fn stage(&self) -> Stage {
        self.controller.current_stage()
    }

    pub fn active(&self) -> &ActiveStage {
        &self.active
    }

    pub fn audio(&self) -> &AudioSession<B> {
        &self.audio
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        match &mut self.active {
            ActiveStage::Room(room) => room.set_viewport(viewport),
            ActiveStage::Cake(cake) => cake.set_viewport(viewport),
            _ => {}
        }
    }

    /// Apply one user interaction
    pub fn handle(&mut self, action: Action, now_ms: f64) {
        let audio = &mut self.audio;
        let content = &self.settings.content;

        let changed = match (&mut self.active, action) {
            (_, Action::ToggleMusic) => {
                audio.toggle_background();
                true
            }

            (ActiveStage::Intro(intro), Action::ShowSongCard) => intro.choose(),
            (ActiveStage::Intro(intro), Action::ToggleSong) => {
                intro.toggle_song(audio, now_ms);
                true
            }
            (ActiveStage::Intro(intro), Action::SkipBack) => {
                intro.skip_back(audio);
                false
            }
            (ActiveStage::Intro(intro), Action::SkipForward) => {
                intro.skip_forward(audio);
                false
            }

            (ActiveStage::Room(room), Action::PressRoom(point)) => match room.balloon_at(point) {
                Some(id) => room.pop(id, audio),
                None => false,
            },
            (ActiveStage::Room(room), Action::PopBalloon(id)) => room.pop(id, audio),
            (ActiveStage::Room(room), Action::ContinueRoom) => room.continue_clicked(),

            (ActiveStage::Cake(cake), Action::LightCandle(i)) => cake.light_candle(i, audio),
            (ActiveStage::Cake(cake), Action::ChangeTheme) => {
                cake.change_theme();
                true
            }
            (ActiveStage::Cake(cake), Action::FindEasterEgg) => cake.find_easter_egg(),
            (ActiveStage::Cake(cake), Action::TapCake(point)) => {
                cake.tap(point, now_ms);
                true
            }
            (ActiveStage::Cake(cake), Action::PointerDown(point)) => {
                cake.pointer_down(point, now_ms);
                false
            }
            (ActiveStage::Cake(cake), Action::PointerMove(point)) => {
                cake.pointer_move(point, now_ms);
                false
            }
            (ActiveStage::Cake(cake), Action::PointerUp) => {
                cake.pointer_up();
                false
            }

            (ActiveStage::Gallery(gallery), Action::ProceedTimeline) => gallery.proceed(),
            (ActiveStage::Gallery(gallery), Action::FlipPhoto) => {
                gallery.flip();
                true
            }
            (ActiveStage::Gallery(gallery), Action::PlaySong(i)) => match content.playlist.get(i) {
                Some(entry) => gallery.play_song(i, &entry.source, audio),
                None => false,
            },
            (ActiveStage::Gallery(gallery), Action::ContinueGallery) => gallery.continue_clicked(),

            (ActiveStage::Finale(finale), Action::FlipPostcard(i)) => finale.flip_card(i, audio),
            (ActiveStage::Finale(finale), Action::OpenHeartGame) => finale.open_game(),
            (ActiveStage::Finale(finale), Action::DragHeart(delta)) => {
                finale.drag_heart(delta);
                false
            }
            (ActiveStage::Finale(finale), Action::CatchHeart) => finale.catch_heart(audio),

            (active, action) => {
                log::debug!("{:?} ignored in stage {}", action, active.stage().name());
                false
            }
        };

        if changed {
            self.touch();
        }
        self.settle(now_ms);
    }

    /// Advance the mounted stage to `now_ms`. Returns true when the layout changed.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        let before = self.revision;
        let changed = match &mut self.active {
            ActiveStage::Intro(intro) => intro.update(now_ms, &mut self.audio),
            ActiveStage::Room(room) => {
                room.update(now_ms);
                false
            }
            ActiveStage::Cake(cake) => cake.update(now_ms, &mut self.audio),
            ActiveStage::Gallery(gallery) => gallery.update(now_ms),
            ActiveStage::Finale(_) => false,
        };
        if changed {
            self.touch();
        }
        self.settle(now_ms);
        self.revision != before
    }

    /// Take a pending completion signal and move to the next stage
    fn settle(&mut self, now_ms: f64) {
        let completed = match &mut self.active {
            ActiveStage::Intro(intro) => intro.completion_mut().take(),
            ActiveStage::Room(room) => room.completion_mut().take(),
            ActiveStage::Cake(cake) => cake.completion_mut().take(),
            ActiveStage::Gallery(gallery) => gallery.completion_mut().take(),
            ActiveStage::Finale(_) => false,
        };
        if completed {
            self.transition(now_ms);
        }
    }

    fn transition(&mut self, now_ms: f64) {
        match &mut self.active {
            ActiveStage::Intro(intro) => intro.teardown(),
            ActiveStage::Room(room) => room.teardown(),
            ActiveStage::Cake(cake) => cake.teardown(),
            ActiveStage::Gallery(gallery) => gallery.teardown(&mut self.audio),
            ActiveStage::Finale(_) => {}
        }

        let Some(next) = self.controller.advance(&mut self.audio) else {
            return;
        };
        self.active = self.mount(next, now_ms);
        self.touch();
    }

    fn mount(&self, stage: Stage, now_ms: f64) -> ActiveStage {
        let tuning = &self.tuning;
        let content = &self.settings.content;
        let seed = self.seed.wrapping_add(stage.index() as u64);
        match stage {
            Stage::Intro => {
                ActiveStage::Intro(IntroStage::new(tuning, content.intro_messages.len(), now_ms))
            }
            Stage::BalloonGame => {
                ActiveStage::Room(RoomStage::new(tuning, self.viewport, seed, now_ms))
            }
            Stage::CakeCeremony => {
                ActiveStage::Cake(CakeStage::new(tuning, self.viewport, seed, now_ms))
            }
            Stage::Gallery => ActiveStage::Gallery(GalleryStage::new(
                tuning,
                content.photos.len(),
                content.playlist.len(),
                now_ms,
            )),
            Stage::FinalMessage => {
                ActiveStage::Finale(FinaleStage::new(tuning, content.postcards.len()))
            }
        }
    }
}
