use murk_core::{BlendMode, Point};
use rand::Rng;

use crate::color::Palette;
use crate::pool::{Ambient, Particle, SceneRng};
use crate::surface::Surface;

#[derive(Debug, Clone, PartialEq)]
pub struct Raindrop {
    pub pos: Point,
    pub speed: f32,
    pub length: f32,
}

impl Raindrop {
    /// Drops spawned per tick while it rains.
    pub const PER_TICK: usize = 3;

    pub fn spawn(width: f32, rng: &mut SceneRng) -> Self {
        Self {
            pos: Point::new(rng.gen_range(0.0..width), -10.0),
            speed: rng.gen_range(8.0..15.0),
            length: rng.gen_range(10.0..25.0),
        }
    }
}

impl Particle for Raindrop {
    fn step(&mut self, ambient: &Ambient<'_>, _rng: &mut SceneRng) {
        self.pos.x += ambient.wind.sin() * 2.0;
        self.pos.y += self.speed;
    }

    fn is_expired(&self, ambient: &Ambient<'_>) -> bool {
        self.pos.y > ambient.height
    }

    fn render(&self, surface: &mut dyn Surface, palette: &Palette) {
        surface.stroke_line(
            self.pos,
            self.pos.offset(0.0, self.length),
            1.0,
            palette.rain,
            BlendMode::Normal,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::Noise;
    use rand::SeedableRng;

    fn ambient(noise: &Noise, wind: f32) -> Ambient<'_> {
        Ambient {
            width: 300.0,
            height: 100.0,
            wind,
            windy: false,
            noise,
        }
    }

    #[test]
    fn test_spawn_above_the_frame() {
        let mut rng = SceneRng::seed_from_u64(8);
        for _ in 0..50 {
            let drop = Raindrop::spawn(300.0, &mut rng);
            assert_eq!(drop.pos.y, -10.0);
            assert!((0.0..300.0).contains(&drop.pos.x));
            assert!((8.0..15.0).contains(&drop.speed));
            assert!((10.0..25.0).contains(&drop.length));
        }
    }

    #[test]
    fn test_drop_drifts_with_wind_and_falls() {
        let mut rng = SceneRng::seed_from_u64(8);
        let noise = Noise::new(&mut rng);
        let wind = 1.2f32;
        let mut drop = Raindrop {
            pos: Point::new(150.0, 20.0),
            speed: 10.0,
            length: 12.0,
        };
        drop.step(&ambient(&noise, wind), &mut rng);
        assert!((drop.pos.x - (150.0 + wind.sin() * 2.0)).abs() < 1e-5);
        assert_eq!(drop.pos.y, 30.0);
    }

    #[test]
    fn test_drop_expires_below_the_bottom_edge() {
        let mut rng = SceneRng::seed_from_u64(8);
        let noise = Noise::new(&mut rng);
        let ambient = ambient(&noise, 0.0);
        let mut drop = Raindrop {
            pos: Point::new(10.0, 90.0),
            speed: 10.0,
            length: 12.0,
        };
        drop.step(&ambient, &mut rng);
        assert_eq!(drop.pos.y, 100.0);
        assert!(!drop.is_expired(&ambient));
        drop.step(&ambient, &mut rng);
        assert!(drop.is_expired(&ambient));
    }
}
