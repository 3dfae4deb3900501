//! The render pass: paints a [`SceneState`] onto a [`Surface`].
//!
//! Rendering is pure. It reads the post-step state, consults no random
//! source and mutates nothing, so the same state always yields the same
//! pixels.

use murk_core::{BlendMode, Point, RectF, Rgba, SceneKind};

use crate::color::Palette;
use crate::entities::draw_trail;
use crate::generator::{CityScene, StructureElement};
use crate::noise::Noise;
use crate::state::SceneState;
use crate::surface::Surface;

/// Halo drawn around lit windows, in logical pixels.
const WINDOW_GLOW: f32 = 4.0;

pub fn render(state: &SceneState, surface: &mut dyn Surface) {
    draw_backdrop(state, surface);
    state.layers.composite_primary(surface);

    if state.kind.has_city() {
        draw_city(&state.city, state.timers.frame, &state.palette, surface);
        draw_vines(
            &state.city,
            &state.noise,
            state.timers.noise_offset,
            &state.palette,
            surface,
        );
        draw_cracks(&state.city, &state.palette, surface);
    }

    let pools = &state.pools;
    let palette = &state.palette;
    pools.glow.render(surface, palette);
    pools.orbs.render(surface, palette);
    pools.dust.render(surface, palette);
    if state.storming {
        pools.rain.render(surface, palette);
    }
    pools.birds.render(surface, palette);
    pools.fragments.render(surface, palette);
    pools.secrets.render(surface, palette);
    pools.illusions.render(surface, palette);

    draw_trail(pools.trail.iter(), surface, palette);
    pools.ripples.render(surface, palette);

    state.layers.composite_shadow(surface);
    state.layers.composite_vignette(surface);

    if state.kind.has_city() {
        draw_effect_image(state, surface);
    }
}

fn draw_backdrop(state: &SceneState, surface: &mut dyn Surface) {
    let palette = &state.palette;
    match state.kind {
        SceneKind::City | SceneKind::Aftermath => {
            surface.fill_vertical_gradient(palette.sky_top, palette.sky_bottom);
        }
        SceneKind::Truth => {
            surface.clear(palette.backdrop);
            if let Some(image) = &state.assets.background {
                surface.blit(image, palette.backdrop_tint, BlendMode::Normal);
            }
        }
        SceneKind::Hypno => surface.clear(Rgba::WHITE),
    }
}

fn draw_effect_image(state: &SceneState, surface: &mut dyn Surface) {
    let assets = &state.assets;
    let image = if state.timers.show_effect_a && assets.effect_a.is_some() {
        assets.effect_a.as_ref()
    } else {
        assets.effect_b.as_ref()
    };
    if let Some(image) = image {
        surface.blit(image, Rgba::WHITE, BlendMode::Multiply);
    }
}

/// Static alpha factor in `[0.7, 1.0)` for a flickering window.
pub fn flicker_jitter(index: usize) -> f32 {
    let h = (index as u32).wrapping_add(1).wrapping_mul(0x9E37_79B1);
    let frac = (h >> 16) as f32 / 65536.0;
    0.7 + 0.3 * frac
}

fn draw_city(city: &CityScene, frame: u64, palette: &Palette, surface: &mut dyn Surface) {
    for element in &city.elements {
        let dx = (frame as f32 * 0.01 + element.sway).sin() * 0.5;
        draw_structure(element, dx, palette, surface);
    }
}

fn draw_structure(
    element: &StructureElement,
    dx: f32,
    palette: &Palette,
    surface: &mut dyn Surface,
) {
    let body = element.rect.translated(dx, 0.0);
    surface.fill_rect(body, palette.damaged_fill(element.damage), BlendMode::Normal);
    stroke_rect(surface, body, palette.damaged_stroke(element.damage));

    for stain in &element.stains {
        surface.fill_ellipse(
            stain.center.offset(dx, 0.0),
            stain.w / 2.0,
            stain.h / 2.0,
            palette.stain,
            BlendMode::Normal,
        );
    }

    for (i, window) in element.windows.iter().enumerate() {
        let rect = window.rect.translated(dx, 0.0);
        if element.lit[i] {
            let flicker = if window.flickering {
                flicker_jitter(i)
            } else {
                1.0
            };
            let lit = palette.window_lit;
            let halo = RectF::new(
                rect.x - WINDOW_GLOW,
                rect.y - WINDOW_GLOW,
                rect.w + 2.0 * WINDOW_GLOW,
                rect.h + 2.0 * WINDOW_GLOW,
            );
            surface.fill_rect(halo, lit.with_alpha(60.0 * flicker), BlendMode::Normal);
            surface.fill_rect(rect, lit.with_alpha(lit.a as f32 * flicker), BlendMode::Normal);
        } else if window.broken {
            surface.fill_rect(rect, palette.window_broken, BlendMode::Normal);
        } else {
            surface.fill_rect(rect, palette.window_dark, BlendMode::Normal);
        }
    }
}

fn stroke_rect(surface: &mut dyn Surface, r: RectF, color: Rgba) {
    let corners = [
        Point::new(r.x, r.y),
        Point::new(r.right(), r.y),
        Point::new(r.right(), r.bottom()),
        Point::new(r.x, r.bottom()),
        Point::new(r.x, r.y),
    ];
    surface.stroke_polyline(&corners, 1.0, color, BlendMode::Normal);
}

fn draw_vines(
    city: &CityScene,
    noise: &Noise,
    offset: f32,
    palette: &Palette,
    surface: &mut dyn Surface,
) {
    let wobble = |p: Point| p.offset(noise.sample(p.x * 0.01, p.y * 0.01, offset) * 2.0, 0.0);
    for vine in &city.vines {
        let path: Vec<Point> = vine.points.iter().map(|v| wobble(v.pos)).collect();
        surface.stroke_polyline(&path, 2.0, palette.vine, BlendMode::Normal);
        for point in vine.points.iter().filter(|v| v.leaf) {
            surface.fill_ellipse(
                wobble(point.pos),
                point.size * 1.5,
                point.size * 2.0,
                palette.leaf,
                BlendMode::Normal,
            );
        }
    }
}

fn draw_cracks(city: &CityScene, palette: &Palette, surface: &mut dyn Surface) {
    for crack in &city.cracks {
        surface.stroke_polyline(&crack.points, 1.0, palette.crack, BlendMode::Normal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Canvas, Image};
    use crate::state::Assets;

    #[test]
    fn test_flicker_range() {
        for i in 0..1000 {
            let f = flicker_jitter(i);
            assert!((0.7..1.0).contains(&f), "{i}: {f}");
        }
        assert_eq!(flicker_jitter(17), flicker_jitter(17));
    }

    #[test]
    fn test_empty_truth_scene_without_background_is_flat() {
        let mut state = SceneState::new(SceneKind::Truth, 1, (48, 27));
        state.pools.fragments.clear();
        state.pools.secrets.clear();
        let mut canvas = Canvas::new(48, 27, 1920.0, 1080.0);
        render(&state, &mut canvas);
        // the shadow and vignette only darken the flat backdrop
        let backdrop = state.palette.backdrop;
        for p in canvas.image().pixels() {
            assert!(p.r <= backdrop.r && p.g <= backdrop.g && p.b <= backdrop.b);
        }
    }

    #[test]
    fn test_missing_first_effect_image_falls_back_to_second() {
        let black = Image::filled(4, 4, Rgba::BLACK);
        let state = SceneState::new(SceneKind::City, 1, (32, 18)).with_assets(Assets {
            effect_a: None,
            effect_b: Some(black),
            background: None,
        });
        let mut canvas = Canvas::new(32, 18, 1920.0, 1080.0);
        render(&state, &mut canvas);
        assert!(canvas.image().pixels().iter().all(|p| p.r == 0 && p.g == 0 && p.b == 0));
    }

    #[test]
    fn test_render_is_repeatable() {
        let mut state = SceneState::new(SceneKind::City, 3, (64, 36));
        for _ in 0..5 {
            state.step(1.0 / 60.0);
        }
        let mut a = Canvas::new(64, 36, 1920.0, 1080.0);
        let mut b = Canvas::new(64, 36, 1920.0, 1080.0);
        render(&state, &mut a);
        render(&state, &mut b);
        assert_eq!(a.image(), b.image());
    }
}
