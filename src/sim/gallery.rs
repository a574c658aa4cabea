//! Story timeline, rotating photo gallery and the playlist

use super::schedule::Scheduler;
use super::Completion;
use crate::audio::{AudioBackend, AudioSession};
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryView {
    Timeline,
    Photos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GalleryEvent {
    Rotate,
}

pub struct GalleryStage {
    scheduler: Scheduler<GalleryEvent>,
    view: GalleryView,
    photo_count: usize,
    photo_index: usize,
    flipped: bool,
    playlist_len: usize,
    current_song: Option<usize>,
    completion: Completion,
}

impl GalleryStage {
    pub fn new(tuning: &Tuning, photo_count: usize, playlist_len: usize, now_ms: f64) -> Self {
        let mut scheduler = Scheduler::new(now_ms);
        if photo_count > 1 {
            scheduler.every(tuning.photo_rotate_ms, GalleryEvent::Rotate);
        }
        Self {
            scheduler,
            view: GalleryView::Timeline,
            photo_count,
            photo_index: 0,
            flipped: false,
            playlist_len,
            current_song: None,
            completion: Completion::default(),
        }
    }

    pub fn view(&self) -> GalleryView {
        self.view
    }

    pub fn photo_index(&self) -> usize {
        self.photo_index
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn current_song(&self) -> Option<usize> {
        self.current_song
    }

    pub fn completion_mut(&mut self) -> &mut Completion {
        &mut self.completion
    }

    /// Leave the timeline for the photo gallery
    pub fn proceed(&mut self) -> bool {
        if self.view != GalleryView::Timeline {
            return false;
        }
        self.view = GalleryView::Photos;
        true
    }

    /// Turn the polaroid over (or back)
    pub fn flip(&mut self) {
        if self.view == GalleryView::Photos {
            self.flipped = !self.flipped;
        }
    }

    /// Start playlist entry `index` from `source`, silencing the background music
    pub fn play_song<B: AudioBackend>(
        &mut self,
        index: usize,
        source: &str,
        audio: &mut AudioSession<B>,
    ) -> bool {
        if self.view != GalleryView::Photos || index >= self.playlist_len {
            return false;
        }
        audio.play_foreground(source);
        self.current_song = Some(index);
        true
    }

    pub fn continue_clicked(&mut self) -> bool {
        self.view == GalleryView::Photos && self.completion.fire()
    }

    pub fn update(&mut self, now_ms: f64) -> bool {
        let mut changed = false;
        while let Some(GalleryEvent::Rotate) = self.scheduler.poll(now_ms) {
            self.photo_index = (self.photo_index + 1) % self.photo_count.max(1);
            self.flipped = false;
            changed = true;
        }
        changed
    }

    /// Cancel rotation and release the playlist track
    pub fn teardown<B: AudioBackend>(&mut self, audio: &mut AudioSession<B>) {
        self.scheduler.cancel_all();
        audio.stop_foreground();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{Mix, SilentBackend};

    fn audio() -> AudioSession<SilentBackend> {
        AudioSession::new(SilentBackend::new(), "bg.mp3", Mix::default())
    }

    #[test]
    fn test_photos_rotate_and_reset_flip() {
        let mut g = GalleryStage::new(&Tuning::default(), 3, 3, 0.0);
        g.proceed();
        g.flip();
        assert!(g.is_flipped());

        g.update(4999.0);
        assert_eq!(g.photo_index(), 0);
        g.update(5000.0);
        assert_eq!(g.photo_index(), 1);
        assert!(!g.is_flipped());
        g.update(10_000.0);
        g.update(15_000.0);
        assert_eq!(g.photo_index(), 0);
    }

    #[test]
    fn test_timeline_gates_gallery_controls() {
        let mut audio = audio();
        let mut g = GalleryStage::new(&Tuning::default(), 3, 3, 0.0);
        assert_eq!(g.view(), GalleryView::Timeline);
        g.flip();
        assert!(!g.is_flipped());
        assert!(!g.play_song(0, "a.mp3", &mut audio));
        assert!(!g.continue_clicked());

        assert!(g.proceed());
        assert!(!g.proceed());
        assert!(g.continue_clicked());
        assert!(!g.continue_clicked());
        assert!(g.completion_mut().take());
    }

    #[test]
    fn test_playlist_stops_background_and_teardown_releases() {
        let mut audio = audio();
        audio.set_background_playing(true);
        let mut g = GalleryStage::new(&Tuning::default(), 3, 2, 0.0);
        g.proceed();

        assert!(g.play_song(1, "b.mp3", &mut audio));
        assert!(!audio.is_background_playing());
        assert_eq!(g.current_song(), Some(1));
        assert!(!g.play_song(2, "c.mp3", &mut audio));
        assert_eq!(g.current_song(), Some(1));

        g.teardown(&mut audio);
        assert!(audio.foreground().is_none());
        assert!(audio.backend().probe("b.mp3").unwrap().released);
        assert!(!g.update(100_000.0));
    }

    #[test]
    fn test_single_photo_never_rotates() {
        let mut g = GalleryStage::new(&Tuning::default(), 1, 0, 0.0);
        assert!(!g.update(50_000.0));
        assert_eq!(g.photo_index(), 0);
    }
}
