//! HTML for each stage
//!
//! Pure string generation so every stage can be rendered and inspected
//! natively. Elements that move every frame (progress fill, knife, heart)
//! get an `id` and are positioned through [`live_styles`] instead of a
//! rebuild.

use std::fmt::Write;

use super::names;
use crate::audio::AudioBackend;
use crate::content::Content;
use crate::experience::{ActiveStage, Experience};
use crate::sim::{
    CakeStage, FinalePhase, FinaleStage, GalleryStage, GalleryView, IntroPhase, IntroStage,
    RoomStage,
};

pub const SONG_PROGRESS_ID: &str = "song-progress";
pub const KNIFE_ID: &str = "knife";
pub const SLICE_ID: &str = "slice";
pub const HEART_ID: &str = "heart";
pub const ROOM_CANVAS_ID: &str = "room-canvas";

/// Escape text for element content and quoted attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Full markup for the app root: music toggle plus the mounted stage
pub fn render<B: AudioBackend>(exp: &Experience<B>) -> String {
    let content = &exp.settings().content;
    let mut html = String::new();

    let music_on = exp.audio().is_background_playing();
    let _ = write!(
        html,
        r#"<button class="music-toggle{}" data-action="{}" aria-label="Toggle music">{}</button>"#,
        if music_on { " on" } else { "" },
        names::TOGGLE_MUSIC,
        if music_on { "♫" } else { "♪" },
    );

    let _ = write!(
        html,
        r#"<section class="stage stage-{}">"#,
        exp.stage().name()
    );
    match exp.active() {
        ActiveStage::Intro(intro) => render_intro(&mut html, intro, content),
        ActiveStage::Room(room) => render_room(&mut html, room, content, exp),
        ActiveStage::Cake(cake) => render_cake(&mut html, cake, content),
        ActiveStage::Gallery(gallery) => render_gallery(&mut html, gallery, content),
        ActiveStage::Finale(finale) => render_finale(&mut html, finale, content),
    }
    html.push_str("</section>");
    html
}

fn render_intro(html: &mut String, intro: &IntroStage, content: &Content) {
    match intro.phase() {
        IntroPhase::Messages => {
            let message = content
                .intro_messages
                .get(intro.message_index())
                .map(String::as_str)
                .unwrap_or_default();
            let _ = write!(
                html,
                r#"<div class="message-card" data-message="{}"><p class="message">{}</p>"#,
                intro.message_index(),
                escape(message)
            );
            if intro.buttons_visible() {
                html.push_str(r#"<div class="choices">"#);
                for label in &content.intro_buttons {
                    let _ = write!(
                        html,
                        r#"<button class="choice" data-action="{}">{}</button>"#,
                        names::SHOW_SONG_CARD,
                        escape(label)
                    );
                }
                html.push_str("</div>");
            }
            html.push_str("</div>");
        }
        IntroPhase::SongCard => {
            let song = &content.song;
            let icon = if intro.song_playing() { "♫" } else { "▶" };
            let _ = write!(
                html,
                r#"<div class="song-card"><div class="cover"><img src="{cover}" alt="Song cover"><button class="cover-play" data-action="{toggle}">{icon}</button></div><h3>{title}</h3><p class="subtitle">{subtitle}</p><div class="controls"><button data-action="{back}" aria-label="Restart">⏮</button><button data-action="{toggle}" aria-label="Play">{icon}</button><button data-action="{fwd}" aria-label="Skip forward">⏭</button></div>"#,
                cover = escape(&song.cover),
                toggle = names::TOGGLE_SONG,
                icon = icon,
                title = escape(&song.title),
                subtitle = escape(&song.subtitle),
                back = names::SKIP_BACK,
                fwd = names::SKIP_FORWARD,
            );
            if intro.progress_visible() {
                let _ = write!(
                    html,
                    r#"<div class="progress"><div id="{}" class="progress-fill"></div></div>"#,
                    SONG_PROGRESS_ID
                );
            }
            html.push_str("</div>");
        }
        IntroPhase::Launch => {
            let _ = write!(
                html,
                r#"<div class="message-card launch"><p class="message">{}</p></div>"#,
                escape(&content.launch_message)
            );
        }
    }
}

fn render_room<B: AudioBackend>(
    html: &mut String,
    room: &RoomStage,
    content: &Content,
    exp: &Experience<B>,
) {
    let vp = exp.viewport();
    let _ = write!(
        html,
        r#"<header class="room-header"><h1>{}</h1><div class="score">Score: {}</div></header>"#,
        escape(&content.room_heading),
        room.score()
    );
    let _ = write!(
        html,
        r#"<canvas id="{}" data-action="{}" width="{}" height="{}"></canvas>"#,
        ROOM_CANVAS_ID,
        names::ROOM_CANVAS,
        vp.width as u32,
        vp.height as u32
    );
    if room.reward_visible() {
        let _ = write!(
            html,
            r#"<div class="reward"><h2>{}</h2><p>{}</p></div><button class="continue" data-action="{}">Continue to the cake →</button>"#,
            escape(&content.reward_title),
            escape(&content.reward_message),
            names::CONTINUE_ROOM
        );
    }
}

fn render_cake(html: &mut String, cake: &CakeStage, content: &Content) {
    let palette = cake.theme().palette();
    let _ = write!(
        html,
        r#"<div class="cake-stage" data-action="{}">"#,
        names::TAP_CAKE
    );

    for (i, note) in content.sticky_notes.iter().enumerate() {
        let _ = write!(
            html,
            r#"<div class="sticky-note note-{}">{}</div>"#,
            i,
            escape(note)
        );
    }
    let _ = write!(
        html,
        r#"<button class="theme" data-action="{}">Change theme</button>"#,
        names::CHANGE_THEME
    );

    html.push_str(r#"<div class="candles">"#);
    for (i, lit) in cake.candles().iter().enumerate() {
        let _ = write!(
            html,
            r#"<button class="candle{}" data-action="{}" data-arg="{}">{}</button>"#,
            if *lit { " lit" } else { "" },
            names::LIGHT_CANDLE,
            i,
            if *lit { "🔥" } else { "🕯" }
        );
    }
    html.push_str("</div>");

    let _ = write!(
        html,
        r#"<div class="cake{}" data-press="{}" style="--base-top: {}; --base-bottom: {}; --layer-top: {}; --layer-bottom: {}; --drip: {}; --slice-top: {}; --slice-bottom: {}">"#,
        if cake.is_cut() { " cut" } else { "" },
        names::PRESS_CAKE,
        palette.base.0,
        palette.base.1,
        palette.layer.0,
        palette.layer.1,
        palette.drip,
        palette.slice.0,
        palette.slice.1
    );
    let _ = write!(html, r#"<div id="{}" class="slice"></div>"#, SLICE_ID);
    if cake.knife_visible() {
        let _ = write!(html, r#"<div id="{}" class="knife">🔪</div>"#, KNIFE_ID);
    }
    html.push_str("</div>");

    if !cake.armed() {
        html.push_str(r#"<p class="hint">Light all the candles first!</p>"#);
    } else if !cake.is_cut() {
        html.push_str(r#"<p class="hint">Drag the knife down to cut the cake</p>"#);
    } else {
        let _ = write!(html, r#"<p class="wish">{}</p>"#, escape(&content.wish_message));
    }

    for piece in cake.confetti() {
        let _ = write!(
            html,
            r#"<div class="confetti" style="left: {:.0}px; top: {:.0}px; background: {}"></div>"#,
            piece.x, piece.y, palette.confetti
        );
    }
    for heart in cake.hearts() {
        let _ = write!(
            html,
            r#"<div class="tap-heart" style="left: {:.0}px; top: {:.0}px">❤</div>"#,
            heart.pos.x, heart.pos.y
        );
    }

    if cake.easter_egg_found() {
        let _ = write!(
            html,
            r#"<div class="easter-egg found">{}</div>"#,
            escape(&content.easter_egg_message)
        );
    } else {
        let _ = write!(
            html,
            r#"<button class="easter-egg" data-action="{}" aria-label="Secret">🎁</button>"#,
            names::EASTER_EGG
        );
    }
    html.push_str("</div>");
}

fn render_gallery(html: &mut String, gallery: &GalleryStage, content: &Content) {
    match gallery.view() {
        GalleryView::Timeline => {
            let _ = write!(
                html,
                r#"<h2 class="title">{}</h2><ol class="timeline">"#,
                escape(&content.timeline_title)
            );
            for (i, event) in content.timeline.iter().enumerate() {
                let _ = write!(
                    html,
                    r#"<li class="event" style="animation-delay: {}ms"><span class="icon">{}</span><h3>{}</h3><p>{}</p></li>"#,
                    i * 300,
                    escape(&event.icon),
                    escape(&event.title),
                    escape(&event.description)
                );
            }
            let _ = write!(
                html,
                r#"</ol><button class="continue" data-action="{}">Continue 🎵</button>"#,
                names::PROCEED_TIMELINE
            );
        }
        GalleryView::Photos => {
            let _ = write!(
                html,
                r#"<h2 class="title">{}</h2><div class="gallery">"#,
                escape(&content.gallery_title)
            );
            if let Some(photo) = content.photos.get(gallery.photo_index()) {
                let _ = write!(
                    html,
                    r#"<div class="polaroid{}" data-action="{}"><div class="front"><img src="{}" alt="Memory {}"><p>{}</p></div><div class="back"><h4>A special note</h4><p>{}</p><p class="hint">(Click again to flip back)</p></div></div>"#,
                    if gallery.is_flipped() { " flipped" } else { "" },
                    names::FLIP_PHOTO,
                    escape(&photo.url),
                    gallery.photo_index() + 1,
                    escape(&photo.caption),
                    escape(&content.photo_note)
                );
            }

            html.push_str(r#"<div class="extras">"#);
            for photo in &content.extra_photos {
                let _ = write!(
                    html,
                    r#"<figure class="extra"><img src="{}" alt="{}"><figcaption>{}</figcaption></figure>"#,
                    escape(&photo.url),
                    escape(&photo.caption),
                    escape(&photo.caption)
                );
            }
            html.push_str(r#"</div><ul class="playlist">"#);
            for (i, entry) in content.playlist.iter().enumerate() {
                let _ = write!(
                    html,
                    r#"<li class="song{}" data-action="{}" data-arg="{}">{}</li>"#,
                    if gallery.current_song() == Some(i) { " playing" } else { "" },
                    names::PLAY_SONG,
                    i,
                    escape(&entry.title)
                );
            }
            let _ = write!(
                html,
                r#"</ul><button class="continue" data-action="{}">One more surprise →</button></div>"#,
                names::CONTINUE_GALLERY
            );
        }
    }
}

fn render_finale(html: &mut String, finale: &FinaleStage, content: &Content) {
    match finale.phase() {
        FinalePhase::Postcards => {
            let _ = write!(
                html,
                r#"<h1 class="title">{}</h1><div class="postcards">"#,
                escape(&content.postcards_title)
            );
            for (i, card) in content.postcards.iter().enumerate() {
                let _ = write!(
                    html,
                    r#"<div class="postcard color-{}{}" data-action="{}" data-arg="{}"><div class="front">{}</div><div class="back"><p>{}</p></div></div>"#,
                    escape(&card.color),
                    if finale.is_flipped(i) { " flipped" } else { "" },
                    names::FLIP_POSTCARD,
                    i,
                    escape(&card.symbol),
                    escape(&card.message)
                );
            }
            let _ = write!(
                html,
                r#"</div><button class="continue" data-action="{}">Special message for you →</button>"#,
                names::OPEN_HEART_GAME
            );
        }
        FinalePhase::Game => {
            let _ = write!(
                html,
                r#"<h2 class="title">{}</h2><div class="heart-box"><div id="{}" class="heart" data-press="{}" data-action="{}">❤</div></div><p class="hint">Drag and click the heart when you catch it!</p>"#,
                escape(&content.game_prompt),
                HEART_ID,
                names::PRESS_HEART,
                names::CATCH_HEART
            );
        }
        FinalePhase::Final => {
            let _ = write!(
                html,
                r#"<div class="final"><h1>{}</h1><p>{}</p><div class="sign-off">{}</div></div>"#,
                escape(&content.final_title),
                escape(&content.final_message),
                escape(&content.sign_off)
            );
        }
    }
}

/// Inline styles for elements that move between rebuilds, as `(id, style)`
pub fn live_styles<B: AudioBackend>(exp: &Experience<B>) -> Vec<(&'static str, String)> {
    let mut styles = Vec::new();
    match exp.active() {
        ActiveStage::Intro(intro) => {
            if let Some(progress) = intro.progress(exp.audio()) {
                styles.push((SONG_PROGRESS_ID, format!("width: {:.1}%", progress)));
            }
        }
        ActiveStage::Cake(cake) => {
            let recognizer = cake.recognizer();
            let reveal = recognizer.slice_reveal();
            styles.push((
                SLICE_ID,
                format!(
                    "opacity: {:.2}; transform: translateX({:.1}px)",
                    reveal / 100.0,
                    reveal * 0.3
                ),
            ));
            if cake.knife_visible() {
                let knife = recognizer.knife();
                styles.push((
                    KNIFE_ID,
                    format!("transform: translate({:.1}px, {:.1}px)", knife.x, knife.y),
                ));
            }
        }
        ActiveStage::Finale(finale) if finale.phase() == FinalePhase::Game => {
            let heart = finale.heart();
            styles.push((
                HEART_ID,
                format!("transform: translate({:.1}px, {:.1}px)", heart.x, heart.y),
            ));
        }
        _ => {}
    }
    styles
}
