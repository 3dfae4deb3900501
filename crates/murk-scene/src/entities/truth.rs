//! Pink shards of the truth scene.

use murk_core::Point;
use rand::Rng;

use crate::color::Palette;
use crate::pool::{Ambient, Particle, SceneRng};
use crate::surface::Surface;

fn anywhere(width: f32, height: f32, rng: &mut SceneRng) -> Point {
    Point::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height))
}

/// Drifting shard with a constant velocity.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub pos: Point,
    pub vel: Point,
    pub life: f32,
    pub size: f32,
}

impl Fragment {
    pub const LIFE: f32 = 255.0;

    pub fn spawn(origin: Point, rng: &mut SceneRng) -> Self {
        Self {
            pos: origin,
            vel: Point::new(rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0)),
            life: Self::LIFE,
            size: rng.gen_range(3.0..8.0),
        }
    }

    pub fn spawn_anywhere(width: f32, height: f32, rng: &mut SceneRng) -> Self {
        let origin = anywhere(width, height, rng);
        Self::spawn(origin, rng)
    }
}

impl Particle for Fragment {
    fn step(&mut self, _ambient: &Ambient<'_>, _rng: &mut SceneRng) {
        self.pos = self.pos.offset(self.vel.x, self.vel.y);
        self.life -= 3.0;
        self.size *= 0.99;
    }

    fn is_expired(&self, _ambient: &Ambient<'_>) -> bool {
        self.life <= 0.0
    }

    fn render(&self, surface: &mut dyn Surface, palette: &Palette) {
        let c = palette.fragment;
        super::draw_glow(
            surface,
            self.pos,
            self.size,
            10.0,
            c.with_alpha(self.life * 0.25),
            c.with_alpha(self.life),
        );
    }
}

/// Glimmer that wanders on the spot.
#[derive(Debug, Clone, PartialEq)]
pub struct Secret {
    pub pos: Point,
    pub life: f32,
    pub size: f32,
}

impl Secret {
    pub const LIFE: f32 = 180.0;

    pub fn spawn(origin: Point, rng: &mut SceneRng) -> Self {
        Self {
            pos: origin,
            life: Self::LIFE,
            size: rng.gen_range(5.0..12.0),
        }
    }

    pub fn spawn_anywhere(width: f32, height: f32, rng: &mut SceneRng) -> Self {
        let origin = anywhere(width, height, rng);
        Self::spawn(origin, rng)
    }
}

impl Particle for Secret {
    fn step(&mut self, _ambient: &Ambient<'_>, rng: &mut SceneRng) {
        self.pos = self.pos.offset(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
        self.life -= 1.0;
    }

    fn is_expired(&self, _ambient: &Ambient<'_>) -> bool {
        self.life <= 0.0
    }

    fn render(&self, surface: &mut dyn Surface, palette: &Palette) {
        let c = palette.secret;
        super::draw_glow(
            surface,
            self.pos,
            self.size,
            20.0,
            c.with_alpha(204.0 * self.life / Self::LIFE * 0.5),
            c.with_alpha(self.life),
        );
    }
}

/// Short-lived blot left by a click.
#[derive(Debug, Clone, PartialEq)]
pub struct Illusion {
    pub pos: Point,
    pub life: f32,
    pub size: f32,
}

impl Illusion {
    pub const LIFE: f32 = 120.0;

    pub fn spawn(origin: Point, rng: &mut SceneRng) -> Self {
        Self {
            pos: origin,
            life: Self::LIFE,
            size: rng.gen_range(8.0..18.0),
        }
    }
}

impl Particle for Illusion {
    fn step(&mut self, _ambient: &Ambient<'_>, rng: &mut SceneRng) {
        self.pos = self.pos.offset(rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0));
        self.life -= 2.0;
    }

    fn is_expired(&self, _ambient: &Ambient<'_>) -> bool {
        self.life <= 0.0
    }

    fn render(&self, surface: &mut dyn Surface, palette: &Palette) {
        let c = palette.illusion;
        super::draw_glow(
            surface,
            self.pos,
            self.size,
            10.0,
            c.with_alpha(128.0 * self.life / Self::LIFE * 0.5),
            c.with_alpha(self.life),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::Noise;
    use rand::SeedableRng;

    fn steps_to_expire(mut p: impl Particle, rng: &mut SceneRng, ambient: &Ambient<'_>) -> u32 {
        let mut n = 0;
        while !p.is_expired(ambient) {
            p.step(ambient, rng);
            n += 1;
        }
        n
    }

    #[test]
    fn test_lifetimes() {
        let mut rng = SceneRng::seed_from_u64(11);
        let noise = Noise::new(&mut rng);
        let ambient = Ambient {
            width: 1920.0,
            height: 1080.0,
            wind: 0.0,
            windy: false,
            noise: &noise,
        };
        let origin = Point::new(300.0, 300.0);
        let fragment = Fragment::spawn(origin, &mut rng);
        let secret = Secret::spawn(origin, &mut rng);
        let illusion = Illusion::spawn(origin, &mut rng);
        assert_eq!(steps_to_expire(fragment, &mut rng, &ambient), 85);
        assert_eq!(steps_to_expire(secret, &mut rng, &ambient), 180);
        assert_eq!(steps_to_expire(illusion, &mut rng, &ambient), 60);
    }

    #[test]
    fn test_random_walk_is_bounded() {
        let mut rng = SceneRng::seed_from_u64(11);
        let noise = Noise::new(&mut rng);
        let ambient = Ambient {
            width: 1920.0,
            height: 1080.0,
            wind: 0.0,
            windy: false,
            noise: &noise,
        };
        let mut illusion = Illusion::spawn(Point::new(0.0, 0.0), &mut rng);
        illusion.step(&ambient, &mut rng);
        assert!(illusion.pos.x.abs() <= 2.0 && illusion.pos.y.abs() <= 2.0);
    }
}
