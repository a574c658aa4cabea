//! Presentation
//!
//! - `markup`: HTML for the mounted stage, rebuilt only when the experience
//!   revision changes, plus per-frame style updates
//! - `canvas`: balloon room sprites drawn every frame
//!
//! Interactive elements carry `data-action` (and optionally `data-arg`)
//! attributes; the platform layer resolves a click to the closest such
//! element and turns it into an [`Action`] here.

pub mod canvas;
pub mod markup;

use glam::Vec2;

use crate::experience::Action;

/// `data-action` values
pub mod names {
    pub const TOGGLE_MUSIC: &str = "toggle-music";
    pub const SHOW_SONG_CARD: &str = "show-song-card";
    pub const TOGGLE_SONG: &str = "toggle-song";
    pub const SKIP_BACK: &str = "skip-back";
    pub const SKIP_FORWARD: &str = "skip-forward";
    pub const ROOM_CANVAS: &str = "room-canvas";
    pub const CONTINUE_ROOM: &str = "continue-room";
    pub const LIGHT_CANDLE: &str = "light-candle";
    pub const CHANGE_THEME: &str = "change-theme";
    pub const EASTER_EGG: &str = "easter-egg";
    pub const TAP_CAKE: &str = "tap-cake";
    pub const PROCEED_TIMELINE: &str = "proceed-timeline";
    pub const FLIP_PHOTO: &str = "flip-photo";
    pub const PLAY_SONG: &str = "play-song";
    pub const CONTINUE_GALLERY: &str = "continue-gallery";
    pub const FLIP_POSTCARD: &str = "flip-postcard";
    pub const OPEN_HEART_GAME: &str = "open-heart-game";
    pub const CATCH_HEART: &str = "catch-heart";

    /// `data-press` values (pointer down, not click)
    pub const PRESS_CAKE: &str = "cake";
    pub const PRESS_HEART: &str = "heart";
}

/// Resolve a click on an element with `data-action = name`.
///
/// `point` is the click position relative to the stage root.
pub fn click_action(name: &str, arg: Option<&str>, point: Vec2) -> Option<Action> {
    let index = || arg.and_then(|a| a.parse::<usize>().ok());
    let action = match name {
        names::TOGGLE_MUSIC => Action::ToggleMusic,
        names::SHOW_SONG_CARD => Action::ShowSongCard,
        names::TOGGLE_SONG => Action::ToggleSong,
        names::SKIP_BACK => Action::SkipBack,
        names::SKIP_FORWARD => Action::SkipForward,
        names::ROOM_CANVAS => Action::PressRoom(point),
        names::CONTINUE_ROOM => Action::ContinueRoom,
        names::LIGHT_CANDLE => Action::LightCandle(index()?),
        names::CHANGE_THEME => Action::ChangeTheme,
        names::EASTER_EGG => Action::FindEasterEgg,
        names::TAP_CAKE => Action::TapCake(point),
        names::PROCEED_TIMELINE => Action::ProceedTimeline,
        names::FLIP_PHOTO => Action::FlipPhoto,
        names::PLAY_SONG => Action::PlaySong(index()?),
        names::CONTINUE_GALLERY => Action::ContinueGallery,
        names::FLIP_POSTCARD => Action::FlipPostcard(index()?),
        names::OPEN_HEART_GAME => Action::OpenHeartGame,
        names::CATCH_HEART => Action::CatchHeart,
        _ => {
            log::debug!("Unknown action '{}'", name);
            return None;
        }
    };
    Some(action)
}

/// What a pointer press on a `data-press` element starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Press {
    /// Knife drag on the cake
    Cake(Vec2),
    /// Heart drag in the finale game
    Heart(Vec2),
}

impl Press {
    pub fn from_name(name: &str, point: Vec2) -> Option<Self> {
        match name {
            names::PRESS_CAKE => Some(Press::Cake(point)),
            names::PRESS_HEART => Some(Press::Heart(point)),
            _ => None,
        }
    }

    /// Action for the press itself
    pub fn begin(self) -> Option<Action> {
        match self {
            Press::Cake(point) => Some(Action::PointerDown(point)),
            Press::Heart(_) => None,
        }
    }

    /// Action for a pointer move while pressed. `last` is the previous move position.
    pub fn moved(self, point: Vec2, last: Vec2) -> Action {
        match self {
            Press::Cake(_) => Action::PointerMove(point),
            Press::Heart(_) => Action::DragHeart(point - last),
        }
    }

    /// Action for the release
    pub fn end(self) -> Option<Action> {
        match self {
            Press::Cake(_) => Some(Action::PointerUp),
            Press::Heart(_) => None,
        }
    }

    pub fn origin(self) -> Vec2 {
        match self {
            Press::Cake(p) | Press::Heart(p) => p,
        }
    }
}

/// A press that travelled further than this is a drag, not a click
pub const CLICK_SLOP: f32 = 5.0;
