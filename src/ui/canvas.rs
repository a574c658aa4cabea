//! Balloon room canvas
//!
//! Balloons and pop markers change every physics tick, so they are drawn on
//! a 2D canvas each frame instead of living in the DOM.

use glam::Vec2;

use crate::sim::{Balloon, BalloonVariant};

/// String hanging below each balloon (px)
const STRING_LENGTH: f32 = 30.0;

/// Everything needed to draw one balloon
#[derive(Debug, Clone, PartialEq)]
pub struct BalloonSprite {
    pub center: Vec2,
    /// Ellipse radii
    pub radii: Vec2,
    pub rotation_rad: f32,
    pub fill: String,
    /// Glyph drawn on the balloon body
    pub decoration: Option<&'static str>,
}

impl BalloonSprite {
    /// Bottom of the string in the balloon's local frame
    pub fn string_end(&self) -> Vec2 {
        Vec2::new(0.0, self.radii.y + STRING_LENGTH)
    }
}

/// Glyph for a balloon variant
pub fn decoration(variant: BalloonVariant) -> Option<&'static str> {
    match variant {
        BalloonVariant::Plain => None,
        BalloonVariant::Star => Some("★"),
        BalloonVariant::Smiley => Some("☺"),
    }
}

pub fn balloon_sprite(balloon: &Balloon) -> BalloonSprite {
    let radii = Vec2::new(balloon.size, balloon.height()) * 0.5;
    BalloonSprite {
        center: balloon.pos + radii,
        radii,
        rotation_rad: balloon.rotation.to_radians(),
        fill: balloon.color(),
        decoration: decoration(balloon.variant),
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::draw_room;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::f64::consts::TAU;

    use wasm_bindgen::JsValue;
    use web_sys::CanvasRenderingContext2d;

    use super::balloon_sprite;
    use crate::sim::{Balloon, PopEffect};

    /// Clear the canvas and draw every balloon and pop marker
    pub fn draw_room(
        ctx: &CanvasRenderingContext2d,
        width: f64,
        height: f64,
        balloons: &[Balloon],
        pops: &[PopEffect],
    ) -> Result<(), JsValue> {
        ctx.clear_rect(0.0, 0.0, width, height);
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");

        for balloon in balloons {
            let sprite = balloon_sprite(balloon);
            ctx.save();
            ctx.translate(sprite.center.x as f64, sprite.center.y as f64)?;
            ctx.rotate(sprite.rotation_rad as f64)?;

            let tail = sprite.string_end();
            ctx.begin_path();
            ctx.move_to(0.0, sprite.radii.y as f64);
            ctx.line_to(tail.x as f64, tail.y as f64);
            ctx.set_stroke_style_str("rgba(0, 0, 0, 0.35)");
            ctx.stroke();

            ctx.begin_path();
            ctx.ellipse(
                0.0,
                0.0,
                sprite.radii.x as f64,
                sprite.radii.y as f64,
                0.0,
                0.0,
                TAU,
            )?;
            ctx.set_fill_style_str(&sprite.fill);
            ctx.fill();

            if let Some(glyph) = sprite.decoration {
                ctx.set_font(&format!("{:.0}px sans-serif", sprite.radii.x));
                ctx.set_fill_style_str("rgba(255, 255, 255, 0.9)");
                ctx.fill_text(glyph, 0.0, 0.0)?;
            }
            ctx.restore();
        }

        ctx.set_font("bold 28px 'Comic Neue', 'Comic Sans MS', cursive");
        ctx.set_fill_style_str("#ff6f69");
        for pop in pops {
            ctx.fill_text("POP!", pop.pos.x as f64, pop.pos.y as f64)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::BalloonId;

    fn balloon(variant: BalloonVariant) -> Balloon {
        Balloon {
            id: BalloonId(1),
            pos: Vec2::new(100.0, 200.0),
            size: 80.0,
            hue: 120.0,
            rotation: 90.0,
            sway: 0.0,
            variant,
        }
    }

    #[test]
    fn test_sprite_covers_hit_box() {
        let b = balloon(BalloonVariant::Plain);
        let sprite = balloon_sprite(&b);
        assert!(sprite.center.abs_diff_eq(Vec2::new(140.0, 248.0), 1e-3));
        assert!(sprite.radii.abs_diff_eq(Vec2::new(40.0, 48.0), 1e-3));
        assert_eq!(sprite.fill, "hsl(120, 100%, 75%)");
        assert!(b.contains(sprite.center));
        assert!(sprite.string_end().abs_diff_eq(Vec2::new(0.0, 78.0), 1e-3));
    }

    #[test]
    fn test_each_variant_has_its_own_look() {
        assert_eq!(balloon_sprite(&balloon(BalloonVariant::Plain)).decoration, None);
        assert_eq!(balloon_sprite(&balloon(BalloonVariant::Star)).decoration, Some("★"));
        assert_eq!(balloon_sprite(&balloon(BalloonVariant::Smiley)).decoration, Some("☺"));
    }
}
