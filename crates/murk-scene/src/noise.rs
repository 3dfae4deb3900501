//! Smooth 3D noise: four octaves of fractal Perlin noise, remapped into `[0, 1)`.
//!
//! The generator is seeded once from the scene's random source, so sampling is
//! a pure function and may be used while rendering.

use ::noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use rand::RngCore;

const OCTAVES: usize = 4;
/// Largest value a sample is clamped to, keeping the range half-open.
const MAX_SAMPLE: f32 = 1.0 - f32::EPSILON;

/// Seeded smooth noise field.
#[derive(Debug, Clone)]
pub struct Noise {
    fbm: Fbm<Perlin>,
}

impl Noise {
    pub fn new(rng: &mut impl RngCore) -> Self {
        let fbm = Fbm::<Perlin>::new(rng.next_u32()).set_octaves(OCTAVES);
        Self { fbm }
    }

    pub fn sample1(&self, x: f32) -> f32 {
        self.sample(x, 0.0, 0.0)
    }

    pub fn sample2(&self, x: f32, y: f32) -> f32 {
        self.sample(x, y, 0.0)
    }

    /// Sample the field at `(x, y, z)`.
    pub fn sample(&self, x: f32, y: f32, z: f32) -> f32 {
        let v = self.fbm.get([f64::from(x), f64::from(y), f64::from(z)]);
        ((v * 0.5 + 0.5) as f32).clamp(0.0, MAX_SAMPLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn noise(seed: u64) -> Noise {
        Noise::new(&mut ChaCha8Rng::seed_from_u64(seed))
    }

    #[test]
    fn test_range() {
        let n = noise(3);
        for i in 0..500 {
            let v = n.sample(i as f32 * 0.37, i as f32 * 0.011, i as f32 * 0.002);
            assert!((0.0..1.0).contains(&v), "{v}");
        }
    }

    #[test]
    fn test_deterministic_for_seed() {
        let a = noise(3);
        let b = noise(3);
        assert_eq!(a.sample(1.5, 2.25, 0.1), b.sample(1.5, 2.25, 0.1));
    }

    #[test]
    fn test_seed_changes_the_field() {
        let a = noise(3);
        let b = noise(4);
        let differs = (0..50).any(|i| {
            let x = i as f32 * 0.73 + 0.31;
            a.sample2(x, 0.47) != b.sample2(x, 0.47)
        });
        assert!(differs);
    }

    #[test]
    fn test_smooth_between_close_samples() {
        let n = noise(3);
        let a = n.sample2(10.3, 4.1);
        let b = n.sample2(10.301, 4.1);
        assert!((a - b).abs() < 0.02);
    }
}
