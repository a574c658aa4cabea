//! Balloon room: spawn/tick physics loop and pop scoring

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::schedule::Scheduler;
use super::{Completion, Viewport};
use crate::audio::{AudioBackend, AudioSession, SoundEffect};
use crate::tuning::Tuning;

/// Balloon identity, unique within a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BalloonId(pub u32);

/// Decoration drawn on a balloon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalloonVariant {
    Plain,
    Star,
    Smiley,
}

impl BalloonVariant {
    pub const ALL: [BalloonVariant; 3] = [
        BalloonVariant::Plain,
        BalloonVariant::Star,
        BalloonVariant::Smiley,
    ];
}

/// An upward-drifting balloon
#[derive(Debug, Clone, PartialEq)]
pub struct Balloon {
    pub id: BalloonId,
    /// Top-left corner in viewport coordinates
    pub pos: Vec2,
    /// Width; height is 1.2x
    pub size: f32,
    /// Hue in degrees (rendered at 100% saturation, 75% lightness)
    pub hue: f32,
    /// Rotation in degrees
    pub rotation: f32,
    /// Phase of the horizontal sway oscillation
    pub sway: f32,
    pub variant: BalloonVariant,
}

impl Balloon {
    /// Rendered height
    pub fn height(&self) -> f32 {
        self.size * 1.2
    }

    /// CSS color
    pub fn color(&self) -> String {
        format!("hsl({:.0}, 100%, 75%)", self.hue)
    }

    /// Advance one physics tick
    pub fn advance(&mut self, tuning: &Tuning) {
        self.pos.y -= tuning.balloon_rise_speed;
        self.pos.x += self.sway.sin() * tuning.balloon_sway_amplitude;
        self.sway += tuning.balloon_sway_step;
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.pos.x
            && point.x <= self.pos.x + self.size
            && point.y >= self.pos.y
            && point.y <= self.pos.y + self.height()
    }
}

/// "POP!" marker left where a balloon burst
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopEffect {
    pub id: u32,
    pub pos: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoomEvent {
    Spawn,
    Tick,
    ExpirePop(u32),
}

/// The balloon-popping stage
pub struct RoomStage {
    tuning: Tuning,
    viewport: Viewport,
    rng: Pcg32,
    scheduler: Scheduler<RoomEvent>,
    balloons: Vec<Balloon>,
    pops: Vec<PopEffect>,
    score: u32,
    next_id: u32,
    completion: Completion,
}

impl RoomStage {
    /// Mount the room: starts the spawn and physics repeaters
    pub fn new(tuning: &Tuning, viewport: Viewport, seed: u64, now_ms: f64) -> Self {
        let mut scheduler = Scheduler::new(now_ms);
        scheduler.every(tuning.balloon_spawn_ms, RoomEvent::Spawn);
        scheduler.every(tuning.balloon_tick_ms, RoomEvent::Tick);
        Self {
            tuning: *tuning,
            viewport,
            rng: Pcg32::seed_from_u64(seed),
            scheduler,
            balloons: Vec::new(),
            pops: Vec::new(),
            score: 0,
            next_id: 1,
            completion: Completion::default(),
        }
    }

    pub fn balloons(&self) -> &[Balloon] {
        &self.balloons
    }

    pub fn pops(&self) -> &[PopEffect] {
        &self.pops
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Reward message and continue control are shown
    pub fn reward_visible(&self) -> bool {
        self.score >= self.tuning.reward_threshold
    }

    pub fn completion_mut(&mut self) -> &mut Completion {
        &mut self.completion
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Run every task due at `now_ms`
    pub fn update(&mut self, now_ms: f64) {
        while let Some(event) = self.scheduler.poll(now_ms) {
            match event {
                RoomEvent::Spawn => self.spawn_balloon(),
                RoomEvent::Tick => self.step_physics(),
                RoomEvent::ExpirePop(id) => self.pops.retain(|p| p.id != id),
            }
        }
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Append one balloon just below the bottom edge
    pub fn spawn_balloon(&mut self) {
        let id = BalloonId(self.next_entity_id());
        let variant = BalloonVariant::ALL[self.rng.random_range(0..BalloonVariant::ALL.len())];
        let balloon = Balloon {
            id,
            pos: Vec2::new(
                self.rng.random_range(0.0..self.viewport.width),
                self.viewport.height + self.tuning.balloon_spawn_depth,
            ),
            size: self
                .rng
                .random_range(self.tuning.balloon_min_size..self.tuning.balloon_max_size),
            hue: self.rng.random_range(0.0..360.0),
            rotation: self.rng.random_range(0.0..360.0),
            sway: self.rng.random_range(-10.0..10.0),
            variant,
        };
        self.balloons.push(balloon);
    }

    /// One physics tick: move every balloon, drop the ones that floated away
    pub fn step_physics(&mut self) {
        let tuning = self.tuning;
        for balloon in &mut self.balloons {
            balloon.advance(&tuning);
        }
        let margin = tuning.balloon_exit_margin;
        self.balloons.retain(|b| b.pos.y > -margin);
    }

    /// Topmost balloon under `point`
    pub fn balloon_at(&self, point: Vec2) -> Option<BalloonId> {
        self.balloons
            .iter()
            .rev()
            .find(|b| b.contains(point))
            .map(|b| b.id)
    }

    /// Pop a balloon. Unknown ids are ignored.
    pub fn pop<B: AudioBackend>(&mut self, id: BalloonId, audio: &mut AudioSession<B>) -> bool {
        let Some(idx) = self.balloons.iter().position(|b| b.id == id) else {
            return false;
        };
        let balloon = self.balloons.remove(idx);
        audio.play_effect(SoundEffect::BalloonPop);

        let pop_id = self.next_entity_id();
        self.pops.push(PopEffect {
            id: pop_id,
            pos: balloon.pos,
        });
        self.scheduler
            .after(self.tuning.pop_effect_ms, RoomEvent::ExpirePop(pop_id));

        self.score += 1;
        log::debug!("Popped balloon {:?}, score {}", id, self.score);
        if self.score == self.tuning.reward_threshold {
            log::info!("Balloon reward unlocked");
        }
        true
    }

    /// Continue control. Only available once the reward is visible.
    pub fn continue_clicked(&mut self) -> bool {
        self.reward_visible() && self.completion.fire()
    }

    /// Cancel all timers
    pub fn teardown(&mut self) {
        self.scheduler.cancel_all();
    }

    /// Live timer count
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }
}
