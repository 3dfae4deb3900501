//! The particle scene: everything one variant needs between frames.

use murk_core::{AtmosphereMode, Density, Point, SceneKind};
use rand::SeedableRng;

use crate::canvas::Image;
use crate::color::Palette;
use crate::compositor::{FLIP_PERIOD, FlipTimer, LayerCompositor, LayerInputs};
use crate::entities::{
    Bird, DustMote, Fragment, GlowParticle, Illusion, LightOrb, Raindrop, RippleMarker, Secret,
    TrailPoint,
};
use crate::generator::{self, CityScene};
use crate::noise::Noise;
use crate::pool::{Ambient, Pool, SceneRng};
use crate::stats::{Stats, Weather};

/// Logical width every particle scene is laid out in.
pub const SCENE_WIDTH: f32 = 1920.0;
/// Logical height every particle scene is laid out in.
pub const SCENE_HEIGHT: f32 = 1080.0;

pub const DUST_MOTES: usize = 30;

/// Decoded images a scene may draw. Any of them may be missing.
#[derive(Debug, Clone, Default)]
pub struct Assets {
    pub effect_a: Option<Image>,
    pub effect_b: Option<Image>,
    pub background: Option<Image>,
}

/// One pool per transient entity kind.
#[derive(Debug, Clone, Default)]
pub struct Pools {
    pub glow: Pool<GlowParticle>,
    pub orbs: Pool<LightOrb>,
    pub dust: Pool<DustMote>,
    pub rain: Pool<Raindrop>,
    pub birds: Pool<Bird>,
    pub fragments: Pool<Fragment>,
    pub secrets: Pool<Secret>,
    pub illusions: Pool<Illusion>,
    pub ripples: Pool<RippleMarker>,
    pub trail: Pool<TrailPoint>,
}

#[derive(Debug, Clone)]
pub struct Timers {
    pub frame: u64,
    /// Drives the vine wobble; +0.01 per tick.
    pub noise_offset: f32,
    /// Wind phase; +0.02 per tick.
    pub wind: f32,
    effect_image: FlipTimer,
    /// Which effect image is showing.
    pub show_effect_a: bool,
}

impl Default for Timers {
    fn default() -> Self {
        Self {
            frame: 0,
            noise_offset: 0.0,
            wind: 0.0,
            effect_image: FlipTimer::new(FLIP_PERIOD),
            show_effect_a: true,
        }
    }
}

/// Mutable state of a particle scene, advanced by [`SceneState::step`] and
/// drawn by [`render`](crate::render::render).
#[derive(Debug, Clone)]
pub struct SceneState {
    pub(crate) kind: SceneKind,
    pub(crate) rng: SceneRng,
    pub(crate) noise: Noise,
    pub(crate) city: CityScene,
    pub(crate) pools: Pools,
    pub(crate) timers: Timers,
    pub(crate) layers: LayerCompositor,
    pub(crate) palette: Palette,
    pub(crate) atmosphere: AtmosphereMode,
    pub(crate) density: Density,
    /// Rain in the city variants, shatter in the truth scene.
    pub(crate) storming: bool,
    pub(crate) birds_enabled: bool,
    pub(crate) assets: Assets,
    pub(crate) pointer: Point,
}

impl SceneState {
    /// Build a fresh scene for `kind`, laid out from `seed`.
    ///
    /// `pixel_size` is the size of the host surface the overlay layers are
    /// rasterised at. A `Hypno` kind yields an empty backdrop.
    pub fn new(kind: SceneKind, seed: u64, pixel_size: (u32, u32)) -> Self {
        let mut rng = SceneRng::seed_from_u64(seed);
        let noise = Noise::new(&mut rng);
        let atmosphere = AtmosphereMode::Normal;

        let mut state = Self {
            kind,
            rng,
            noise,
            city: CityScene::default(),
            pools: Pools::default(),
            timers: Timers::default(),
            layers: LayerCompositor::new(
                kind,
                pixel_size.0,
                pixel_size.1,
                SCENE_WIDTH,
                SCENE_HEIGHT,
            ),
            palette: Palette::for_scene(kind, atmosphere),
            atmosphere,
            density: Density::Normal,
            storming: false,
            birds_enabled: false,
            assets: Assets::default(),
            pointer: Point::new(SCENE_WIDTH / 2.0, SCENE_HEIGHT / 2.0),
        };

        state.regenerate();
        if kind.has_city() {
            let dust = (0..DUST_MOTES)
                .map(|_| DustMote::spawn(SCENE_WIDTH, SCENE_HEIGHT, &mut state.rng))
                .collect::<Vec<_>>();
            state.pools.dust.extend(dust);
        }
        state.regenerate_layers();

        log::info!("created {kind} scene (seed {seed})");
        state
    }

    pub fn with_assets(mut self, assets: Assets) -> Self {
        self.assets = assets;
        self
    }

    /// Allow the `b` key to release bird flocks.
    pub fn with_birds(mut self, enabled: bool) -> Self {
        self.birds_enabled = enabled;
        self
    }

    pub fn kind(&self) -> SceneKind {
        self.kind
    }

    pub fn size(&self) -> (f32, f32) {
        (SCENE_WIDTH, SCENE_HEIGHT)
    }

    pub fn city(&self) -> &CityScene {
        &self.city
    }

    pub fn pools(&self) -> &Pools {
        &self.pools
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn layers(&self) -> &LayerCompositor {
        &self.layers
    }

    pub fn atmosphere(&self) -> AtmosphereMode {
        self.atmosphere
    }

    pub fn density(&self) -> Density {
        self.density
    }

    pub fn is_storming(&self) -> bool {
        self.storming
    }

    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// Replace the static scene and clear the pools tied to it.
    pub fn regenerate(&mut self) {
        match self.kind {
            SceneKind::City | SceneKind::Aftermath => {
                self.city = generator::generate_city(SCENE_WIDTH, SCENE_HEIGHT, &mut self.rng);
                self.pools.glow.clear();
                self.pools.orbs.clear();
            }
            SceneKind::Truth => {
                self.pools.fragments.clear();
                self.pools
                    .fragments
                    .extend(generator::seed_fragments(SCENE_WIDTH, SCENE_HEIGHT, &mut self.rng));
                self.pools.illusions.clear();
                self.pools.secrets.clear();
                self.pools
                    .secrets
                    .extend(generator::seed_secrets(SCENE_WIDTH, SCENE_HEIGHT, &mut self.rng));
            }
            SceneKind::Hypno => {}
        }
        log::debug!("regenerated {} scene", self.kind);
    }

    /// Rebuild overlay buffers for a new host size.
    pub fn resize(&mut self, pixel_w: u32, pixel_h: u32) {
        self.layers.resize(pixel_w, pixel_h);
        self.regenerate_layers();
        log::debug!("resized {} scene layers to {pixel_w}x{pixel_h}", self.kind);
    }

    pub(crate) fn regenerate_layers(&mut self) {
        let inputs = LayerInputs {
            frame: self.timers.frame,
            density: self.density,
            palette: &self.palette,
            noise: &self.noise,
        };
        self.layers.regenerate(&inputs, &mut self.rng);
    }

    pub(crate) fn set_atmosphere(&mut self, mode: AtmosphereMode) {
        self.atmosphere = mode;
        self.palette = Palette::for_scene(self.kind, mode);
    }

    /// Advance the simulation by one tick; `dt` is wall-clock seconds.
    pub fn step(&mut self, dt: f32) {
        let ambient = Ambient {
            width: SCENE_WIDTH,
            height: SCENE_HEIGHT,
            wind: self.timers.wind,
            windy: self.kind == SceneKind::City,
            noise: &self.noise,
        };
        let rng = &mut self.rng;
        let pools = &mut self.pools;

        pools.trail.advance(&ambient, rng);
        pools.ripples.advance(&ambient, rng);

        pools.glow.advance(&ambient, rng);
        pools.orbs.advance(&ambient, rng);
        pools.dust.advance(&ambient, rng);
        if self.storming && self.kind.has_city() {
            for _ in 0..Raindrop::PER_TICK {
                pools.rain.push(Raindrop::spawn(SCENE_WIDTH, rng));
            }
        }
        pools.rain.advance(&ambient, rng);
        pools.birds.advance(&ambient, rng);

        pools.fragments.advance(&ambient, rng);
        pools.secrets.advance(&ambient, rng);
        pools.illusions.advance(&ambient, rng);

        self.timers.frame += 1;
        self.timers.noise_offset += 0.01;
        self.timers.wind += 0.02;

        let inputs = LayerInputs {
            frame: self.timers.frame,
            density: self.density,
            palette: &self.palette,
            noise: &self.noise,
        };
        self.layers.update(&inputs, dt, &mut self.rng);

        if self.timers.effect_image.tick(dt) {
            self.timers.show_effect_a = !self.timers.show_effect_a;
        }
    }

    /// Live entities counted by the status line.
    pub fn live_entities(&self) -> usize {
        let p = &self.pools;
        match self.kind {
            SceneKind::Truth => p.fragments.len() + p.secrets.len() + p.illusions.len(),
            _ => p.glow.len() + p.orbs.len() + p.dust.len(),
        }
    }

    pub fn stats(&self) -> Stats {
        let weather = match (self.kind, self.storming) {
            (SceneKind::Truth, true) => Weather::Broken,
            (SceneKind::Truth, false) => Weather::Stable,
            (_, true) => Weather::Rain,
            (_, false) => Weather::Clear,
        };
        let atmosphere = if self.kind == SceneKind::City {
            self.atmosphere
        } else {
            AtmosphereMode::Normal
        };
        Stats {
            scene: self.kind,
            frame: self.timers.frame,
            live_entities: self.live_entities(),
            atmosphere,
            weather,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_starts_with_dust_only() {
        let state = SceneState::new(SceneKind::City, 7, (64, 36));
        assert!(!state.city().elements.is_empty());
        assert_eq!(state.pools().dust.len(), DUST_MOTES);
        assert_eq!(state.live_entities(), DUST_MOTES);
        assert_eq!(state.stats().weather, Weather::Clear);
    }

    #[test]
    fn test_truth_starts_seeded() {
        let state = SceneState::new(SceneKind::Truth, 7, (64, 36));
        assert!(state.city().elements.is_empty());
        assert_eq!(state.pools().fragments.len(), 30);
        assert_eq!(state.pools().secrets.len(), 20);
        assert_eq!(state.live_entities(), 50);
        assert_eq!(state.stats().weather, Weather::Stable);
    }

    #[test]
    fn test_timers_advance_per_tick() {
        let mut state = SceneState::new(SceneKind::Aftermath, 7, (32, 18));
        for _ in 0..10 {
            state.step(1.0 / 60.0);
        }
        let t = state.timers();
        assert_eq!(t.frame, 10);
        assert!((t.noise_offset - 0.1).abs() < 1e-4);
        assert!((t.wind - 0.2).abs() < 1e-4);
    }

    #[test]
    fn test_effect_image_alternates() {
        let mut state = SceneState::new(SceneKind::City, 7, (32, 18));
        assert!(state.timers().show_effect_a);
        state.step(0.6);
        assert!(!state.timers().show_effect_a);
    }

    #[test]
    fn test_rain_only_while_storming() {
        let mut state = SceneState::new(SceneKind::City, 7, (32, 18));
        state.step(1.0 / 60.0);
        assert!(state.pools().rain.is_empty());
        state.storming = true;
        state.step(1.0 / 60.0);
        assert_eq!(state.pools().rain.len(), Raindrop::PER_TICK);
    }

    #[test]
    fn test_same_seed_same_scene() {
        let a = SceneState::new(SceneKind::City, 42, (32, 18));
        let b = SceneState::new(SceneKind::City, 42, (32, 18));
        assert_eq!(a.city(), b.city());
    }
}
