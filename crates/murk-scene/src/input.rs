//! Pointer and key reactions of the particle scenes.

use murk_core::{Point, SceneKind};

use crate::entities::{
    Fragment, GlowParticle, Illusion, LightOrb, RippleMarker, Secret, TrailPoint, spawn_flock,
};
use crate::generator;
use crate::state::{SCENE_HEIGHT, SceneState};

/// Orbs or illusions released by one click.
const CLICK_BURST: usize = 3;
/// Window draws toggled per clicked building.
const WINDOW_DRAWS: usize = 3;
/// Glow particles or fragments per drag event.
const DRAG_BURST: usize = 2;

/// Scene commands bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKey {
    /// `space`: rain in the city, shatter in the truth scene.
    ToggleWeather,
    /// `r`
    Regenerate,
    /// `f`
    CycleDensity,
    /// `v`: a vine, or a secret in the truth scene.
    Grow,
    /// `a`, city only.
    CycleAtmosphere,
    /// `b`, when bird flocks are enabled.
    Birds,
}

impl SceneKey {
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            ' ' => Some(Self::ToggleWeather),
            'r' => Some(Self::Regenerate),
            'f' => Some(Self::CycleDensity),
            'v' => Some(Self::Grow),
            'a' => Some(Self::CycleAtmosphere),
            'b' => Some(Self::Birds),
            _ => None,
        }
    }
}

/// Host input already mapped to logical scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown(Point),
    PointerDrag(Point),
    PointerMove(Point),
    Key(SceneKey),
    /// New host surface size in pixels.
    Resize { width: u32, height: u32 },
}

impl SceneState {
    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown(p) => self.pointer_down(p),
            InputEvent::PointerDrag(p) => {
                self.pointer_drag(p);
                self.pointer_move(p);
            }
            InputEvent::PointerMove(p) => self.pointer_move(p),
            InputEvent::Key(key) => self.key(key),
            InputEvent::Resize { width, height } => self.resize(width, height),
        }
    }

    fn pointer_down(&mut self, p: Point) {
        self.pointer = p;
        self.pools.ripples.push(RippleMarker::new(p));
        match self.kind {
            SceneKind::City | SceneKind::Aftermath => {
                let hits: Vec<usize> = self.city.elements_at(p).collect();
                for i in hits {
                    self.city.elements[i].toggle_random_windows(WINDOW_DRAWS, &mut self.rng);
                }
                for _ in 0..CLICK_BURST {
                    let orb = LightOrb::spawn(p, &mut self.rng, &self.palette);
                    self.pools.orbs.push(orb);
                }
            }
            SceneKind::Truth => {
                for _ in 0..CLICK_BURST {
                    self.pools.illusions.push(Illusion::spawn(p, &mut self.rng));
                }
            }
            SceneKind::Hypno => {}
        }
    }

    fn pointer_drag(&mut self, p: Point) {
        match self.kind {
            SceneKind::City | SceneKind::Aftermath => {
                for _ in 0..DRAG_BURST {
                    let glow = GlowParticle::spawn(p, &mut self.rng, &self.palette);
                    self.pools.glow.push(glow);
                }
            }
            SceneKind::Truth => {
                for _ in 0..DRAG_BURST {
                    let fragment = Fragment::spawn(p, &mut self.rng);
                    self.pools.fragments.push(fragment);
                }
            }
            SceneKind::Hypno => {}
        }
    }

    fn pointer_move(&mut self, p: Point) {
        self.pointer = p;
        self.pools.trail.push(TrailPoint::new(p));
    }

    fn key(&mut self, key: SceneKey) {
        match key {
            SceneKey::ToggleWeather => {
                self.storming = !self.storming;
                if !self.storming {
                    self.pools.rain.clear();
                }
                log::info!("{} weather: {}", self.kind, self.stats().weather.label());
            }
            SceneKey::Regenerate => self.regenerate(),
            SceneKey::CycleDensity => {
                self.density = self.density.next();
                log::debug!("density now {}", self.density.factor());
            }
            SceneKey::Grow => match self.kind {
                SceneKind::City | SceneKind::Aftermath => {
                    let vine = generator::vine_at(self.pointer, &mut self.rng);
                    self.city.vines.push(vine);
                }
                SceneKind::Truth => {
                    let secret = Secret::spawn(self.pointer, &mut self.rng);
                    self.pools.secrets.push(secret);
                }
                SceneKind::Hypno => {}
            },
            SceneKey::CycleAtmosphere => {
                if self.kind == SceneKind::City {
                    self.set_atmosphere(self.atmosphere.next());
                    log::info!("atmosphere now {}", self.atmosphere.label());
                }
            }
            SceneKey::Birds => {
                if self.birds_enabled && self.kind.has_city() {
                    self.pools.birds.extend(spawn_flock(SCENE_HEIGHT, &mut self.rng));
                }
            }
        }
    }
}
