//! Transient entity kinds, one struct per kind.
//!
//! Each kind implements [`Particle`](crate::pool::Particle) and lives in its
//! own [`Pool`](crate::pool::Pool). Spawning takes the scene's random source so
//! a seeded run reproduces every entity.

mod bird;
mod dust;
mod glow;
mod marks;
mod orb;
mod rain;
mod truth;

pub use bird::{Bird, spawn_flock};
pub use dust::DustMote;
pub use glow::GlowParticle;
pub use marks::{RippleMarker, TrailPoint, draw_trail};
pub use orb::LightOrb;
pub use rain::Raindrop;
pub use truth::{Fragment, Illusion, Secret};

use murk_core::{BlendMode, Point, Rgba};

use crate::surface::Surface;

/// Solid disc with a soft halo standing in for a canvas shadow blur.
pub(crate) fn draw_glow(
    surface: &mut dyn Surface,
    center: Point,
    diameter: f32,
    blur: f32,
    halo: Rgba,
    core: Rgba,
) {
    let radius = diameter / 2.0;
    if blur > 0.0 && halo.a > 0 {
        surface.fill_radial_gradient(
            center,
            radius + blur,
            halo,
            halo.with_alpha(0.0),
            BlendMode::Normal,
        );
    }
    surface.fill_circle(center, radius, core, BlendMode::Normal);
}
