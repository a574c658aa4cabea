//! End-to-end runs of the experience on a virtual clock

use glam::Vec2;

use birthday_bash::audio::{SilentBackend, SoundEffect};
use birthday_bash::platform::{Clock, ManualClock};
use birthday_bash::sim::{FinalePhase, Stage, Viewport};
use birthday_bash::{Action, ActiveStage, Experience, Settings};

const FRAME_MS: f64 = 16.0;

struct Harness {
    exp: Experience<SilentBackend>,
    clock: ManualClock,
}

impl Harness {
    fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    fn with_settings(settings: Settings) -> Self {
        Self {
            exp: Experience::new(
                settings,
                SilentBackend::new(),
                Viewport::new(1024.0, 768.0),
                99,
                0.0,
            ),
            clock: ManualClock::new(0.0),
        }
    }

    fn act(&mut self, action: Action) {
        let now = self.clock.advance(FRAME_MS);
        self.exp.handle(action, now);
        self.exp.frame(now);
    }

    fn run_for(&mut self, ms: f64) {
        let end = self.clock.now_ms() + ms;
        while self.clock.now_ms() < end {
            let now = self.clock.advance(FRAME_MS);
            self.exp.frame(now);
        }
    }

    fn effects(&self, effect: SoundEffect) -> usize {
        self.exp
            .audio()
            .backend()
            .effects()
            .iter()
            .filter(|e| **e == effect)
            .count()
    }

    fn room_state(&self) -> (u32, bool, Option<birthday_bash::sim::BalloonId>) {
        match self.exp.active() {
            ActiveStage::Room(room) => (
                room.score(),
                room.reward_visible(),
                room.balloons().first().map(|b| b.id),
            ),
            _ => panic!("not in the balloon room"),
        }
    }

    fn to_room(&mut self) {
        self.run_for(3000.0);
        self.act(Action::ShowSongCard);
        self.act(Action::ToggleSong);
        self.run_for(6100.0);
        assert_eq!(self.exp.stage(), Stage::BalloonGame);
    }

    fn pop_until_reward(&mut self) {
        for _ in 0..10_000 {
            let (_, reward, target) = self.room_state();
            if reward {
                return;
            }
            match target {
                Some(id) => self.act(Action::PopBalloon(id)),
                None => self.run_for(FRAME_MS),
            }
        }
        panic!("reward never unlocked");
    }

    fn to_cake(&mut self) {
        self.to_room();
        self.pop_until_reward();
        self.act(Action::ContinueRoom);
        assert_eq!(self.exp.stage(), Stage::CakeCeremony);
    }
}

#[test]
fn balloon_room_reward_and_single_completion() {
    let mut h = Harness::new();
    h.to_room();
    assert!(h.exp.audio().is_background_playing());

    // Continue is unavailable before the reward
    h.run_for(2000.0);
    h.act(Action::ContinueRoom);
    assert_eq!(h.exp.stage(), Stage::BalloonGame);

    let mut pops = 0;
    while pops < 6 {
        match h.room_state().2 {
            Some(id) => {
                let before = h.room_state().0;
                h.act(Action::PopBalloon(id));
                assert_eq!(h.room_state().0, before + 1);
                pops += 1;
                assert_eq!(h.room_state().1, pops >= 6);
            }
            None => h.run_for(FRAME_MS),
        }
    }
    assert_eq!(h.effects(SoundEffect::BalloonPop), 6);

    // Reward stays visible while more balloons come and go
    h.run_for(5000.0);
    assert!(h.room_state().1);

    let rev = h.exp.revision();
    h.act(Action::ContinueRoom);
    assert_eq!(h.exp.stage(), Stage::CakeCeremony);
    assert!(h.exp.revision() > rev);
    h.act(Action::ContinueRoom);
    assert_eq!(h.exp.stage(), Stage::CakeCeremony);
}

#[test]
fn popping_an_unknown_balloon_is_a_no_op() {
    let mut h = Harness::new();
    h.to_room();
    h.act(Action::PopBalloon(birthday_bash::sim::BalloonId(9999)));
    h.act(Action::PressRoom(Vec2::new(-50.0, -50.0)));
    assert_eq!(h.room_state().0, 0);
    assert_eq!(h.effects(SoundEffect::BalloonPop), 0);
}

#[test]
fn slow_drag_never_cuts_the_cake() {
    let mut h = Harness::new();
    h.to_cake();
    for i in 0..3 {
        h.act(Action::LightCandle(i));
    }

    h.act(Action::PointerDown(Vec2::new(300.0, 100.0)));
    let mut y = 100.0;
    // 1 unit per 16 ms frame is well under the cut speed
    for _ in 0..400 {
        y += 1.0;
        h.act(Action::PointerMove(Vec2::new(300.0, y)));
    }
    h.act(Action::PointerUp);
    h.run_for(5000.0);

    assert_eq!(h.exp.stage(), Stage::CakeCeremony);
    match h.exp.active() {
        ActiveStage::Cake(cake) => {
            assert!(!cake.is_cut());
            assert_eq!(cake.recognizer().slice_reveal(), 100.0);
        }
        _ => panic!("left the cake stage"),
    }
}

#[test]
fn knife_needs_every_candle() {
    let mut h = Harness::new();
    h.to_cake();
    h.act(Action::LightCandle(0));
    h.act(Action::LightCandle(1));
    h.act(Action::PointerDown(Vec2::ZERO));
    h.act(Action::PointerMove(Vec2::new(0.0, 400.0)));
    h.act(Action::PointerUp);
    h.run_for(4000.0);
    assert_eq!(h.exp.stage(), Stage::CakeCeremony);
    assert_eq!(h.effects(SoundEffect::CakeCut), 0);
}

#[test]
fn full_walkthrough_reaches_the_final_message() {
    let mut settings = Settings::default();
    settings.reduced_motion = true;
    let mut h = Harness::with_settings(settings);
    h.to_cake();

    for i in 0..3 {
        h.act(Action::LightCandle(i));
    }
    h.act(Action::LightCandle(1));
    assert_eq!(h.effects(SoundEffect::CandleLight), 3);

    h.act(Action::PointerDown(Vec2::new(300.0, 100.0)));
    h.act(Action::PointerMove(Vec2::new(300.0, 250.0)));
    h.act(Action::PointerMove(Vec2::new(300.0, 400.0)));
    match h.exp.active() {
        ActiveStage::Cake(cake) => {
            assert!(cake.is_cut());
            assert_eq!(cake.confetti().len(), 10);
        }
        _ => panic!("expected the cake stage"),
    }
    // Further drags do nothing
    h.act(Action::PointerMove(Vec2::new(300.0, 900.0)));
    h.act(Action::PointerUp);
    h.act(Action::PointerDown(Vec2::new(300.0, 100.0)));
    h.act(Action::PointerMove(Vec2::new(300.0, 600.0)));
    assert_eq!(h.effects(SoundEffect::CakeCut), 1);

    h.run_for(3100.0);
    assert_eq!(h.exp.stage(), Stage::Gallery);

    // Gallery: the playlist silences the background track
    assert!(h.exp.audio().is_background_playing());
    h.act(Action::ProceedTimeline);
    h.act(Action::PlaySong(1));
    assert!(!h.exp.audio().is_background_playing());
    h.act(Action::PlaySong(2));
    let second = h.exp.settings().content.playlist[1].source.clone();
    let third = h.exp.settings().content.playlist[2].source.clone();
    assert!(h.exp.audio().backend().probe(&second).unwrap().paused);
    assert_eq!(h.exp.audio().foreground().unwrap().source(), third);

    h.act(Action::ContinueGallery);
    assert_eq!(h.exp.stage(), Stage::FinalMessage);
    assert!(h.exp.audio().foreground().is_none());
    assert!(h.exp.audio().backend().probe(&third).unwrap().released);

    // Finale
    h.act(Action::FlipPostcard(0));
    h.act(Action::FlipPostcard(0));
    h.act(Action::FlipPostcard(3));
    assert_eq!(h.effects(SoundEffect::CardFlip), 2);
    h.act(Action::OpenHeartGame);
    h.act(Action::DragHeart(Vec2::new(500.0, 0.0)));
    match h.exp.active() {
        ActiveStage::Finale(f) => assert_eq!(f.heart(), Vec2::new(100.0, 0.0)),
        _ => panic!("expected the finale"),
    }
    h.act(Action::CatchHeart);
    assert_eq!(h.effects(SoundEffect::HeartCatch), 1);

    match h.exp.active() {
        ActiveStage::Finale(f) => assert_eq!(f.phase(), FinalePhase::Final),
        _ => panic!("expected the finale"),
    }

    // The last stage is terminal
    h.run_for(60_000.0);
    assert_eq!(h.exp.stage(), Stage::FinalMessage);
}
