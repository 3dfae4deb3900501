//! Entity pools: one homogeneous collection per transient entity kind.

use rand_chacha::ChaCha8Rng;

use crate::color::Palette;
use crate::noise::Noise;
use crate::surface::Surface;

/// The random source threaded through generation and spawning.
pub type SceneRng = ChaCha8Rng;

/// Per-tick environment handed to every entity step.
#[derive(Debug, Clone, Copy)]
pub struct Ambient<'a> {
    /// Logical scene width.
    pub width: f32,
    /// Logical scene height.
    pub height: f32,
    /// Wind phase; drift is `sin(wind)`.
    pub wind: f32,
    /// Whether dust motes feel the wind.
    pub windy: bool,
    /// Field the dust motes drift through.
    pub noise: &'a Noise,
}

/// Behaviour table for one entity kind.
pub trait Particle {
    /// Advance by one tick.
    fn step(&mut self, ambient: &Ambient<'_>, rng: &mut SceneRng);

    /// Whether the owning pool should drop this entity now.
    fn is_expired(&self, ambient: &Ambient<'_>) -> bool;

    fn render(&self, surface: &mut dyn Surface, palette: &Palette);
}

/// Live instances of one entity kind. Order carries no meaning.
#[derive(Debug, Clone)]
pub struct Pool<T> {
    items: Vec<T>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Particle> Pool<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entity: T) {
        self.items.push(entity);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Step every entity exactly once, then drop the expired ones.
    ///
    /// Returns how many entities were removed.
    pub fn advance(&mut self, ambient: &Ambient<'_>, rng: &mut SceneRng) -> usize {
        let before = self.items.len();
        self.items.retain_mut(|entity| {
            entity.step(ambient, rng);
            !entity.is_expired(ambient)
        });
        before - self.items.len()
    }

    pub fn render(&self, surface: &mut dyn Surface, palette: &Palette) {
        for entity in &self.items {
            entity.render(surface, palette);
        }
    }
}

impl<T: Particle> Extend<T> for Pool<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}
