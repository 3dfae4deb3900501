use murk_core::{Point, Rgba};
use rand::Rng;

use crate::color::{GlowColor, Palette};
use crate::pool::{Ambient, Particle, SceneRng};
use crate::surface::Surface;

/// Spark thrown off while the pointer is dragged.
#[derive(Debug, Clone, PartialEq)]
pub struct GlowParticle {
    pub pos: Point,
    pub vel: Point,
    pub life: f32,
    pub size: f32,
    pub color: Rgba,
}

impl GlowParticle {
    pub const LIFE: f32 = 255.0;
    const GRAVITY: f32 = 0.1;
    const DECAY: f32 = 3.0;
    const SHRINK: f32 = 0.99;
    const BLUR: f32 = 10.0;

    pub fn spawn(origin: Point, rng: &mut SceneRng, palette: &Palette) -> Self {
        let pos = origin.offset(rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0));
        let vel = Point::new(rng.gen_range(-2.0..2.0), rng.gen_range(-3.0..-1.0));
        let size = rng.gen_range(3.0..8.0);
        let color = match palette.glow {
            GlowColor::Ember => Rgba::rgb(
                rng.gen_range(200..=255),
                rng.gen_range(150..=220),
                rng.gen_range(50..=150),
            ),
            GlowColor::Fixed(c) => c,
        };
        Self {
            pos,
            vel,
            life: Self::LIFE,
            size,
            color,
        }
    }
}

impl Particle for GlowParticle {
    fn step(&mut self, _ambient: &Ambient<'_>, _rng: &mut SceneRng) {
        self.pos = self.pos.offset(self.vel.x, self.vel.y);
        self.vel.y += Self::GRAVITY;
        self.life -= Self::DECAY;
        self.size *= Self::SHRINK;
    }

    fn is_expired(&self, _ambient: &Ambient<'_>) -> bool {
        self.life <= 0.0
    }

    fn render(&self, surface: &mut dyn Surface, _palette: &Palette) {
        super::draw_glow(
            surface,
            self.pos,
            self.size,
            Self::BLUR,
            self.color.with_alpha(self.life * 0.25),
            self.color.with_alpha(self.life),
        );
    }
}
