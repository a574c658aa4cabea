//! Text and media shown by the stages
//!
//! Everything here is opaque to the logic: URLs are handed to the audio
//! backend or an `<img>` as-is.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SongCard {
    pub title: String,
    pub subtitle: String,
    pub cover: String,
    /// Background track, shared by the song card, the music toggle and the room
    pub source: String,
}

impl Default for SongCard {
    fn default() -> Self {
        Self {
            title: "Our Song".to_string(),
            subtitle: "Your favourite".to_string(),
            cover: "img/cover.jpg".to_string(),
            source: "music/theme.mp3".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub icon: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub url: String,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub title: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Postcard {
    /// CSS color name for the card face
    pub color: String,
    pub symbol: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Content {
    pub recipient: String,
    pub intro_messages: Vec<String>,
    pub intro_buttons: Vec<String>,
    pub song: SongCard,
    pub launch_message: String,

    pub room_heading: String,
    pub reward_title: String,
    pub reward_message: String,

    pub sticky_notes: Vec<String>,
    pub easter_egg_message: String,
    pub wish_message: String,

    pub timeline_title: String,
    pub timeline: Vec<TimelineEvent>,
    pub gallery_title: String,
    pub photos: Vec<Photo>,
    pub extra_photos: Vec<Photo>,
    pub photo_note: String,
    pub playlist: Vec<PlaylistEntry>,

    pub postcards_title: String,
    pub postcards: Vec<Postcard>,
    pub game_prompt: String,
    pub final_title: String,
    pub final_message: String,
    pub sign_off: String,
}

fn photo(url: &str, caption: &str) -> Photo {
    Photo {
        url: url.to_string(),
        caption: caption.to_string(),
    }
}

fn postcard(color: &str, symbol: &str, message: &str) -> Postcard {
    Postcard {
        color: color.to_string(),
        symbol: symbol.to_string(),
        message: message.to_string(),
    }
}

fn event(icon: &str, title: &str, description: &str) -> TimelineEvent {
    TimelineEvent {
        icon: icon.to_string(),
        title: title.to_string(),
        description: description.to_string(),
    }
}

fn track(title: &str, source: &str) -> PlaylistEntry {
    PlaylistEntry {
        title: title.to_string(),
        source: source.to_string(),
    }
}

impl Default for Content {
    fn default() -> Self {
        Self {
            recipient: "Friend".to_string(),
            intro_messages: vec![
                "Hey! It's your day, and it deserved something as special as you.".to_string(),
                "So... I made you this.".to_string(),
            ],
            intro_buttons: vec!["Let's see!".to_string(), "Yay!".to_string()],
            song: SongCard::default(),
            launch_message: "Let's gooo!".to_string(),

            room_heading: "Let's see how many balloons you can pop!".to_string(),
            reward_title: "Bonus reward unlocked!".to_string(),
            reward_message: "You popped your way to cake.".to_string(),

            sticky_notes: vec![
                "Make a wish!".to_string(),
                "You deserve all the cake.".to_string(),
            ],
            easter_egg_message: "You found the secret. Another year of adventures awaits!"
                .to_string(),
            wish_message: "Close your eyes and make a wish!".to_string(),

            timeline_title: "Our Story".to_string(),
            timeline: vec![
                event("🌟", "Where it started", "One message that turned out to matter."),
                event("💌", "We talked", "Morning to late-night conversations."),
                event("🎵", "Shared songs", "A playlist that keeps growing."),
                event("✨", "A day just for you", "Today."),
            ],
            gallery_title: "Your Memories!".to_string(),
            photos: vec![
                photo("img/photo1.jpg", "Shining bright"),
                photo("img/photo2.jpg", "Soft and divine"),
                photo("img/photo3.jpg", "Running light"),
            ],
            extra_photos: vec![
                photo("img/extra1.jpg", "Extra memory 1"),
                photo("img/extra2.jpg", "Extra memory 2"),
            ],
            photo_note: "Don't ever lose the magic that makes you, you.".to_string(),
            playlist: vec![
                track("Song One", "music/theme.mp3"),
                track("Song Two", "music/track2.mp3"),
                track("Song Three", "music/track3.mp3"),
            ],

            postcards_title: "Special postcards for you!".to_string(),
            postcards: vec![
                postcard("red", "🃏", "You're the wild card in my life."),
                postcard("yellow", "🔄", "Like a reverse card, you turned things around."),
                postcard("green", "+4", "Calm kind of chaos that just feels right."),
                postcard("blue", "⏭️", "We skip all the boring parts."),
                postcard("purple", "🎯", "The rare card I never knew I needed."),
            ],
            game_prompt: "Catch the heart to reveal your special message!".to_string(),
            final_title: "Happy Birthday!".to_string(),
            final_message: "Here's to another year of laughs, long talks and good music."
                .to_string(),
            sign_off: "With love 💖".to_string(),
        }
    }
}

impl Content {
    /// Structural problems that would leave a stage without anything to show
    pub fn check(&self) -> Result<(), String> {
        if self.intro_messages.is_empty() {
            return Err("intro_messages must not be empty".to_string());
        }
        if self.intro_buttons.is_empty() {
            return Err("intro_buttons must not be empty".to_string());
        }
        if self.photos.is_empty() {
            return Err("photos must not be empty".to_string());
        }
        if self.song.source.trim().is_empty() {
            return Err("song.source must not be empty".to_string());
        }
        if let Some(entry) = self.playlist.iter().find(|e| e.source.trim().is_empty()) {
            return Err(format!("playlist entry '{}' has no source", entry.title));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_content_is_valid() {
        assert!(Content::default().check().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let c: Content = serde_json::from_str(r#"{"recipient": "Sam"}"#).unwrap();
        assert_eq!(c.recipient, "Sam");
        assert_eq!(c.postcards.len(), 5);
        assert_eq!(c.song, SongCard::default());
    }

    #[test]
    fn test_empty_messages_rejected() {
        let c = Content {
            intro_messages: Vec::new(),
            ..Content::default()
        };
        assert!(c.check().is_err());
    }

    #[test]
    fn test_playlist_without_source_rejected() {
        let mut c = Content::default();
        c.playlist.push(track("Silent", " "));
        assert!(c.check().unwrap_err().contains("Silent"));
    }
}
