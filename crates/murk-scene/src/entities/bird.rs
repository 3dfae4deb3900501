use std::f32::consts::TAU;

use murk_core::{BlendMode, Point};
use rand::Rng;

use crate::color::Palette;
use crate::pool::{Ambient, Particle, SceneRng};
use crate::surface::Surface;

#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub pos: Point,
    pub speed: f32,
    pub wing_phase: f32,
    pub size: f32,
}

impl Bird {
    pub fn spawn(pos: Point, rng: &mut SceneRng) -> Self {
        Self {
            pos,
            speed: rng.gen_range(2.0..4.0),
            wing_phase: rng.gen_range(0.0..TAU),
            size: rng.gen_range(3.0..6.0),
        }
    }
}

/// A staggered line of birds entering from the left edge.
pub fn spawn_flock(height: f32, rng: &mut SceneRng) -> Vec<Bird> {
    let flock_y = rng.gen_range(50.0..(height * 0.4).max(50.1));
    let count = rng.gen_range(5..12);
    (0..count)
        .map(|i| {
            let pos = Point::new(-50.0 - i as f32 * 20.0, flock_y + rng.gen_range(-30.0..30.0));
            Bird::spawn(pos, rng)
        })
        .collect()
}

impl Particle for Bird {
    fn step(&mut self, _ambient: &Ambient<'_>, _rng: &mut SceneRng) {
        self.pos.x += self.speed;
        self.pos.y += (self.pos.x * 0.01 + self.wing_phase).sin() * 0.5;
        self.wing_phase += 0.3;
    }

    fn is_expired(&self, ambient: &Ambient<'_>) -> bool {
        self.pos.x >= ambient.width + 50.0
    }

    fn render(&self, surface: &mut dyn Surface, palette: &Palette) {
        let flap = self.wing_phase.sin() * 2.0;
        let Point { x, y } = self.pos;
        let s = self.size;
        surface.stroke_line(
            Point::new(x - s, y + flap),
            Point::new(x + s, y - flap),
            2.0,
            palette.bird,
            BlendMode::Normal,
        );
        surface.stroke_line(
            Point::new(x - s, y - flap),
            Point::new(x + s, y + flap),
            2.0,
            palette.bird,
            BlendMode::Normal,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::Noise;
    use rand::SeedableRng;

    #[test]
    fn test_flock_shape() {
        let mut rng = SceneRng::seed_from_u64(4);
        let flock = spawn_flock(1080.0, &mut rng);
        assert!((5..12).contains(&flock.len()));
        for (i, bird) in flock.iter().enumerate() {
            assert_eq!(bird.pos.x, -50.0 - i as f32 * 20.0);
            assert!(bird.pos.y >= 20.0 && bird.pos.y < 462.0);
        }
    }

    #[test]
    fn test_bird_flies_right_until_past_the_edge() {
        let mut rng = SceneRng::seed_from_u64(4);
        let noise = Noise::new(&mut rng);
        let ambient = Ambient {
            width: 200.0,
            height: 100.0,
            wind: 0.0,
            windy: false,
            noise: &noise,
        };
        let mut bird = Bird {
            pos: Point::new(246.0, 40.0),
            speed: 3.0,
            wing_phase: 0.0,
            size: 4.0,
        };

        bird.step(&ambient, &mut rng);
        assert_eq!(bird.pos.x, 249.0);
        assert!((bird.pos.y - (40.0 + 2.49f32.sin() * 0.5)).abs() < 1e-5);
        assert!((bird.wing_phase - 0.3).abs() < 1e-6);
        assert!(!bird.is_expired(&ambient));

        bird.step(&ambient, &mut rng);
        assert_eq!(bird.pos.x, 252.0);
        assert!(bird.is_expired(&ambient));
    }

    #[test]
    fn test_bird_at_exactly_the_margin_is_expired() {
        let mut rng = SceneRng::seed_from_u64(4);
        let noise = Noise::new(&mut rng);
        let ambient = Ambient {
            width: 200.0,
            height: 100.0,
            wind: 0.0,
            windy: false,
            noise: &noise,
        };
        let bird = Bird::spawn(Point::new(250.0, 10.0), &mut rng);
        assert!(bird.is_expired(&ambient));
    }
}
