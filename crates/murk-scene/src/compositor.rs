//! Noise-textured overlay layers and the timers that alternate them.
//!
//! Layers are transparent canvases the size of the host surface. They are
//! regenerated during the simulation step and only blitted while rendering.

use murk_core::{BlendMode, Density, Point, RectF, Rgba, SceneKind};
use rand::Rng;

use crate::canvas::Canvas;
use crate::color::Palette;
use crate::noise::Noise;
use crate::pool::SceneRng;
use crate::surface::Surface;

const SPARKS: usize = 80;
const FOG_CELL: f32 = 25.0;
const SHADOW_CELL: f32 = 18.0;
const VIGNETTE_STEP: f32 = 12.0;
const VIGNETTE_STROKE: f32 = 24.0;

/// Seconds between overlay flips.
pub const FLIP_PERIOD: f32 = 0.5;

/// Accumulates elapsed time and fires once per period.
#[derive(Debug, Clone, PartialEq)]
pub struct FlipTimer {
    elapsed: f32,
    period: f32,
}

impl FlipTimer {
    pub fn new(period: f32) -> Self {
        Self {
            elapsed: 0.0,
            period,
        }
    }

    /// Add `dt` seconds; returns true (and restarts) once the period is exceeded.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        if self.elapsed > self.period {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }
}

/// Which of the two alternating city layers is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryLayer {
    Sparks,
    Fog,
}

impl PrimaryLayer {
    fn toggled(self) -> Self {
        match self {
            Self::Sparks => Self::Fog,
            Self::Fog => Self::Sparks,
        }
    }
}

/// What the layers are regenerated from.
#[derive(Debug, Clone, Copy)]
pub struct LayerInputs<'a> {
    pub frame: u64,
    pub density: Density,
    pub palette: &'a Palette,
    pub noise: &'a Noise,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerCompositor {
    kind: SceneKind,
    sparks: Canvas,
    fog: Canvas,
    shadow: Canvas,
    vignette: Canvas,
    /// Colour and strength the vignette was last built with.
    vignette_key: Option<(Rgba, u32)>,
    primary: PrimaryLayer,
    primary_timer: FlipTimer,
    shadow_timer: FlipTimer,
}

impl LayerCompositor {
    pub fn new(kind: SceneKind, pixel_w: u32, pixel_h: u32, logical_w: f32, logical_h: f32) -> Self {
        let layer = Canvas::new(pixel_w, pixel_h, logical_w, logical_h);
        Self {
            kind,
            sparks: layer.clone(),
            fog: layer.clone(),
            shadow: layer.clone(),
            vignette: layer,
            vignette_key: None,
            primary: PrimaryLayer::Sparks,
            primary_timer: FlipTimer::new(FLIP_PERIOD),
            shadow_timer: FlipTimer::new(FLIP_PERIOD),
        }
    }

    pub fn primary(&self) -> PrimaryLayer {
        self.primary
    }

    /// Host pixel size the layers are rasterised at.
    pub fn pixel_size(&self) -> (u32, u32) {
        self.vignette.pixel_size()
    }

    pub fn resize(&mut self, pixel_w: u32, pixel_h: u32) {
        for layer in [
            &mut self.sparks,
            &mut self.fog,
            &mut self.shadow,
            &mut self.vignette,
        ] {
            layer.resize(pixel_w, pixel_h);
        }
        self.vignette_key = None;
    }

    /// Rebuild every layer the variant uses, regardless of timers.
    pub fn regenerate(&mut self, inputs: &LayerInputs<'_>, rng: &mut SceneRng) {
        if self.kind.has_city() {
            self.draw_sparks(inputs, rng);
            self.draw_fog(inputs);
        }
        if self.kind == SceneKind::Truth {
            self.draw_shadow(inputs);
        }
        self.draw_vignette(inputs.palette);
    }

    /// Per-tick update: city layers every tick, the truth shadow on each flip.
    pub fn update(&mut self, inputs: &LayerInputs<'_>, dt: f32, rng: &mut SceneRng) {
        if self.kind.has_city() {
            self.draw_sparks(inputs, rng);
            self.draw_fog(inputs);
            if self.primary_timer.tick(dt) {
                self.primary = self.primary.toggled();
            }
        }
        if self.kind == SceneKind::Truth && self.shadow_timer.tick(dt) {
            self.draw_shadow(inputs);
        }
        self.draw_vignette(inputs.palette);
    }

    fn draw_sparks(&mut self, inputs: &LayerInputs<'_>, rng: &mut SceneRng) {
        let (w, h) = self.sparks.size();
        let f = inputs.frame as f32;
        let noise = inputs.noise;
        self.sparks.clear(Rgba::TRANSPARENT);
        for i in 0..SPARKS {
            let i = i as f32;
            let x = (noise.sample2(i * 0.1, f * 0.001) * w * 2.0) % w;
            let y = (noise.sample2(i * 0.1 + 100.0, f * 0.001) * h * 2.0) % h;
            let alpha = noise.sample2(i * 0.05, f * 0.005) * 80.0 + 20.0;
            let diameter: f32 = rng.gen_range(1.0..6.0);
            self.sparks.fill_circle(
                Point::new(x, y),
                diameter / 2.0,
                inputs.palette.sparks.with_alpha(alpha),
                BlendMode::Screen,
            );
        }
    }

    fn draw_fog(&mut self, inputs: &LayerInputs<'_>) {
        let f = inputs.frame as f32;
        let density = inputs.density.factor();
        let color = inputs.palette.fog;
        let noise = inputs.noise;
        fill_cells(&mut self.fog, FOG_CELL, |x, y| {
            color.with_alpha(noise.sample(x * 0.008, y * 0.008, f * 0.002) * 120.0 * density)
        });
    }

    fn draw_shadow(&mut self, inputs: &LayerInputs<'_>) {
        let f = inputs.frame as f32;
        let density = inputs.density.factor();
        let color = inputs.palette.shadow;
        let noise = inputs.noise;
        fill_cells(&mut self.shadow, SHADOW_CELL, |x, y| {
            color.with_alpha(noise.sample(x * 0.01, y * 0.01, f * 0.003) * 120.0 * density)
        });
    }

    /// The vignette only depends on geometry and palette, so it is rebuilt
    /// when either changes.
    fn draw_vignette(&mut self, palette: &Palette) {
        let key = (palette.vignette, palette.vignette_max.to_bits());
        if self.vignette_key == Some(key) {
            return;
        }
        self.vignette_key = Some(key);

        let (lw, lh) = self.vignette.size();
        let (pw, ph) = self.vignette.pixel_size();
        let center = Point::new(lw / 2.0, lh / 2.0);
        let max_r = (lw * lw + lh * lh).sqrt() * 1.1;
        let image = self.vignette.pixels_mut();
        for py in 0..ph {
            for px in 0..pw {
                let p = Point::new(
                    (px as f32 + 0.5) * lw / pw as f32,
                    (py as f32 + 0.5) * lh / ph as f32,
                );
                let alpha = vignette_alpha(p.distance(center), max_r, palette.vignette_max);
                image.set(px, py, palette.vignette.with_alpha(alpha));
            }
        }
    }

    /// Tint alpha of the active primary layer.
    fn primary_tint(&self) -> f32 {
        match (self.kind, self.primary) {
            (SceneKind::Aftermath, PrimaryLayer::Sparks) => 60.0,
            (SceneKind::Aftermath, PrimaryLayer::Fog) => 120.0,
            (_, PrimaryLayer::Sparks) => 120.0,
            (_, PrimaryLayer::Fog) => 160.0,
        }
    }

    pub fn composite_primary(&self, surface: &mut dyn Surface) {
        if !self.kind.has_city() {
            return;
        }
        let layer = match self.primary {
            PrimaryLayer::Sparks => &self.sparks,
            PrimaryLayer::Fog => &self.fog,
        };
        surface.blit(
            layer.image(),
            Rgba::WHITE.with_alpha(self.primary_tint()),
            BlendMode::Multiply,
        );
    }

    pub fn composite_shadow(&self, surface: &mut dyn Surface) {
        if self.kind == SceneKind::Truth {
            surface.blit(self.shadow.image(), Rgba::WHITE, BlendMode::Multiply);
        }
    }

    pub fn composite_vignette(&self, surface: &mut dyn Surface) {
        surface.blit(self.vignette.image(), Rgba::WHITE, BlendMode::Multiply);
    }
}

/// Clear `layer` and paint it as a grid of square cells.
fn fill_cells(layer: &mut Canvas, cell: f32, color_at: impl Fn(f32, f32) -> Rgba) {
    let (w, h) = layer.size();
    layer.clear(Rgba::TRANSPARENT);
    let mut y = 0.0;
    while y < h {
        let mut x = 0.0;
        while x < w {
            layer.fill_rect(RectF::new(x, y, cell, cell), color_at(x, y), BlendMode::Normal);
            x += cell;
        }
        y += cell;
    }
}

/// Combined alpha of the concentric vignette rings covering distance `d`.
///
/// Ring `k` has diameter `12k` and a 24 px stroke, so it covers distances
/// within 12 of `6k`. Its own alpha grows linearly with its diameter.
fn vignette_alpha(d: f32, max_r: f32, max_alpha: f32) -> f32 {
    let half = VIGNETTE_STROKE / 2.0;
    let first = ((2.0 * (d - half)) / VIGNETTE_STEP).ceil().max(0.0) as u32;
    let last = ((2.0 * (d + half)) / VIGNETTE_STEP).floor() as u32;
    let mut clear = 1.0;
    for k in first..=last {
        let r = k as f32 * VIGNETTE_STEP;
        if r >= max_r {
            break;
        }
        let a = (r / max_r * max_alpha / 255.0).clamp(0.0, 1.0);
        clear *= 1.0 - a;
    }
    (1.0 - clear) * 255.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use murk_core::AtmosphereMode;
    use rand::SeedableRng;

    fn compositor(kind: SceneKind) -> LayerCompositor {
        LayerCompositor::new(kind, 96, 54, 1920.0, 1080.0)
    }

    #[test]
    fn test_flip_timer_fires_after_period() {
        let mut timer = FlipTimer::new(0.5);
        let fired = (0..60).filter(|_| timer.tick(0.01)).count();
        assert_eq!(fired, 1);
        assert!(FlipTimer::new(0.5).tick(0.6));
    }

    #[test]
    fn test_primary_alternates() {
        let mut rng = SceneRng::seed_from_u64(1);
        let noise = Noise::new(&mut rng);
        let palette = Palette::city(AtmosphereMode::Normal);
        let inputs = LayerInputs {
            frame: 0,
            density: Density::Normal,
            palette: &palette,
            noise: &noise,
        };
        let mut c = compositor(SceneKind::City);
        assert_eq!(c.primary(), PrimaryLayer::Sparks);
        c.update(&inputs, 0.6, &mut rng);
        assert_eq!(c.primary(), PrimaryLayer::Fog);
        c.update(&inputs, 0.1, &mut rng);
        assert_eq!(c.primary(), PrimaryLayer::Fog);
        c.update(&inputs, 0.6, &mut rng);
        assert_eq!(c.primary(), PrimaryLayer::Sparks);
    }

    #[test]
    fn test_vignette_darkens_edges_more_than_centre() {
        let mut rng = SceneRng::seed_from_u64(1);
        let noise = Noise::new(&mut rng);
        let palette = Palette::city(AtmosphereMode::Normal);
        let inputs = LayerInputs {
            frame: 0,
            density: Density::Normal,
            palette: &palette,
            noise: &noise,
        };
        let mut c = compositor(SceneKind::City);
        c.regenerate(&inputs, &mut rng);
        let img = c.vignette.image();
        let centre = img.get(48, 27).map(|p| p.a).unwrap_or_default();
        let corner = img.get(0, 0).map(|p| p.a).unwrap_or_default();
        assert!(corner > centre, "corner {corner} centre {centre}");
    }

    #[test]
    fn test_vignette_alpha_profile() {
        let max_r = 2000.0;
        assert!(vignette_alpha(0.0, max_r, 120.0) < 5.0);
        let mid = vignette_alpha(500.0, max_r, 120.0);
        let far = vignette_alpha(900.0, max_r, 120.0);
        assert!(mid > 0.0 && far > mid);
        assert!(vignette_alpha(5000.0, max_r, 120.0) == 0.0);
    }

    #[test]
    fn test_fog_follows_density() {
        let mut rng = SceneRng::seed_from_u64(1);
        let noise = Noise::new(&mut rng);
        let palette = Palette::city(AtmosphereMode::Normal);
        let mut thin = compositor(SceneKind::City);
        let mut thick = compositor(SceneKind::City);
        for (c, density) in [(&mut thin, Density::Thin), (&mut thick, Density::Thick)] {
            let inputs = LayerInputs {
                frame: 10,
                density,
                palette: &palette,
                noise: &noise,
            };
            c.draw_fog(&inputs);
        }
        let sum = |c: &LayerCompositor| -> u32 {
            c.fog.image().pixels().iter().map(|p| p.a as u32).sum()
        };
        assert!(sum(&thick) > sum(&thin));
    }

    #[test]
    fn test_truth_has_no_primary_layer() {
        let c = compositor(SceneKind::Truth);
        let mut canvas = Canvas::new(96, 54, 1920.0, 1080.0);
        canvas.clear(Rgba::WHITE);
        c.composite_primary(&mut canvas);
        assert!(canvas.image().pixels().iter().all(|&p| p == Rgba::WHITE));
    }
}
