//! Particle scenes for murk.
//!
//! This crate holds the whole engine: procedural generation of the static
//! backdrop, per-kind entity pools, the per-tick simulation step, the
//! noise-textured overlay layers, the render pass onto a software canvas and
//! the self-contained hypno effect. It knows nothing about terminals or files.

mod canvas;
mod color;
mod compositor;
mod entities;
mod generator;
mod hypno;
mod input;
mod noise;
mod pool;
mod render;
mod stage;
mod state;
mod stats;
mod surface;

pub use canvas::{Canvas, Image, blend};
pub use color::{GlowColor, Palette};
pub use compositor::{FlipTimer, LayerCompositor, PrimaryLayer};
pub use entities::{
    Bird, DustMote, Fragment, GlowParticle, Illusion, LightOrb, Raindrop, RippleMarker, Secret,
    TrailPoint,
};
pub use generator::{
    Category, CityScene, Crack, Stain, StructureElement, Vine, VinePoint, WindowElement,
    generate_city, seed_fragments, seed_secrets, vine_at,
};
pub use hypno::{HypnoEffect, HypnoSettings};
pub use input::{InputEvent, SceneKey};
pub use crate::noise::Noise;
pub use pool::{Ambient, Particle, Pool, SceneRng};
pub use render::render;
pub use stage::{HYPNO_SCALE, Stage, hypno_logical_size};
pub use state::{Assets, DUST_MOTES, Pools, SCENE_HEIGHT, SCENE_WIDTH, SceneState, Timers};
pub use stats::{Stats, StatsSink, Weather};
pub use surface::Surface;
