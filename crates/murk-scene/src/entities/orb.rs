use murk_core::{Point, Rgba};
use rand::Rng;

use crate::color::Palette;
use crate::pool::{Ambient, Particle, SceneRng};
use crate::surface::Surface;

/// Warm light that floats up and away from a click.
#[derive(Debug, Clone, PartialEq)]
pub struct LightOrb {
    pub pos: Point,
    pub target: Point,
    pub life: f32,
    pub size: f32,
    pub color: Rgba,
}

impl LightOrb {
    pub const LIFE: f32 = 180.0;
    const EASE: f32 = 0.02;
    const BLUR: f32 = 20.0;

    pub fn spawn(origin: Point, rng: &mut SceneRng, palette: &Palette) -> Self {
        let target = origin.offset(rng.gen_range(-100.0..100.0), -rng.gen_range(50.0..150.0));
        Self {
            pos: origin,
            target,
            life: Self::LIFE,
            size: rng.gen_range(5.0..12.0),
            color: palette.orb,
        }
    }
}

impl Particle for LightOrb {
    fn step(&mut self, _ambient: &Ambient<'_>, _rng: &mut SceneRng) {
        self.pos = self.pos.lerp(self.target, Self::EASE);
        self.life -= 1.0;
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
            self.color.with_alpha(204.0 * self.life / Self::LIFE * 0.5),
            self.color.with_alpha(self.life),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::Noise;
    use murk_core::AtmosphereMode;
    use rand::SeedableRng;

    #[test]
    fn test_drifts_toward_target() {
        let mut rng = SceneRng::seed_from_u64(9);
        let noise = Noise::new(&mut rng);
        let ambient = Ambient {
            width: 1920.0,
            height: 1080.0,
            wind: 0.0,
            windy: false,
            noise: &noise,
        };
        let mut orb = LightOrb::spawn(
            Point::new(500.0, 500.0),
            &mut rng,
            &Palette::city(AtmosphereMode::Normal),
        );
        assert!(orb.target.y <= 450.0 && orb.target.y > 350.0);

        let start = orb.pos.distance(orb.target);
        for _ in 0..179 {
            orb.step(&ambient, &mut rng);
        }
        assert!(orb.pos.distance(orb.target) < start);
        assert!(!orb.is_expired(&ambient));
        orb.step(&ambient, &mut rng);
        assert!(orb.is_expired(&ambient));
    }
}
