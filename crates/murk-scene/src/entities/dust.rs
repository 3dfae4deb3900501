use murk_core::{BlendMode, Point};
use rand::Rng;

use crate::color::Palette;
use crate::pool::{Ambient, Particle, SceneRng};
use crate::surface::Surface;

/// Slow falling mote. Wraps to the top instead of dying.
#[derive(Debug, Clone, PartialEq)]
pub struct DustMote {
    pub pos: Point,
    pub size: f32,
    pub speed: f32,
    /// Position along the noise curve that drives horizontal drift.
    pub offset: f32,
}

impl DustMote {
    pub fn spawn(width: f32, height: f32, rng: &mut SceneRng) -> Self {
        Self {
            pos: Point::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height)),
            size: rng.gen_range(1.0..3.0),
            speed: rng.gen_range(0.2..0.8),
            offset: rng.gen_range(0.0..1000.0),
        }
    }
}

impl Particle for DustMote {
    fn step(&mut self, ambient: &Ambient<'_>, rng: &mut SceneRng) {
        let mut dx = ambient.noise.sample1(self.offset) * 2.0 - 1.0;
        if ambient.windy {
            dx += ambient.wind.sin() * 0.5;
        }
        self.pos.x += dx;
        self.pos.y += self.speed;
        self.offset += 0.01;
        if self.pos.y > ambient.height {
            self.pos = Point::new(rng.gen_range(0.0..ambient.width), -10.0);
        }
    }

    fn is_expired(&self, _ambient: &Ambient<'_>) -> bool {
        false
    }

    fn render(&self, surface: &mut dyn Surface, palette: &Palette) {
        surface.fill_circle(self.pos, self.size / 2.0, palette.dust, BlendMode::Normal);
    }
}
