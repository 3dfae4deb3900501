//! Colour palettes for the scene variants.

use murk_core::{AtmosphereMode, Rgba, SceneKind};

/// How glow particles pick their colour at spawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GlowColor {
    /// Random warm ember: r in 200-255, g in 150-220, b in 50-150.
    Ember,
    Fixed(Rgba),
}

/// Every colour a scene variant paints with.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub sky_top: Rgba,
    pub sky_bottom: Rgba,
    /// Flat fill when the backdrop image is missing (truth).
    pub backdrop: Rgba,
    /// Tint applied to the backdrop image (truth).
    pub backdrop_tint: Rgba,

    pub building_fill: Rgba,
    pub building_stroke: Rgba,
    /// Per-unit-damage darkening subtracted from the building fill.
    pub building_damage: [f32; 3],
    /// Per-unit-damage darkening subtracted from the building outline.
    pub outline_damage: [f32; 3],
    pub stain: Rgba,
    pub window_lit: Rgba,
    pub window_broken: Rgba,
    pub window_dark: Rgba,

    pub vine: Rgba,
    pub leaf: Rgba,
    pub crack: Rgba,

    pub glow: GlowColor,
    pub orb: Rgba,
    pub dust: Rgba,
    pub rain: Rgba,
    pub bird: Rgba,
    pub fragment: Rgba,
    pub secret: Rgba,
    pub illusion: Rgba,
    /// Pointer trail and click ripples.
    pub pointer: Rgba,

    pub sparks: Rgba,
    pub fog: Rgba,
    pub shadow: Rgba,
    pub vignette: Rgba,
    /// Alpha reached by the vignette at the outermost ring.
    pub vignette_max: f32,
}

impl Palette {
    /// Palette for a scene variant; `mode` only matters for the city.
    pub fn for_scene(kind: SceneKind, mode: AtmosphereMode) -> Self {
        match kind {
            SceneKind::City | SceneKind::Hypno => Self::city(mode),
            SceneKind::Aftermath => Self::aftermath(),
            SceneKind::Truth => Self::truth(),
        }
    }

    /// Dusty sepia city; storm cools and darkens it, mystical pushes it violet.
    pub fn city(mode: AtmosphereMode) -> Self {
        let m = mode.index() as f32;
        let (top_shift, bottom_shift) = match mode {
            AtmosphereMode::Normal => ([0.0, 0.0, 0.0], [0.0, 0.0, 0.0]),
            AtmosphereMode::Storm => ([-30.0, -20.0, -10.0], [-20.0, -15.0, -5.0]),
            AtmosphereMode::Mystical => ([20.0, -10.0, 30.0], [15.0, -5.0, 20.0]),
        };
        let shifted = |base: [f32; 3], d: [f32; 3]| {
            Rgba::from_f32(base[0] + d[0], base[1] + d[1], base[2] + d[2], 255.0)
        };

        Self {
            sky_top: shifted([139.0, 125.0, 107.0], top_shift),
            sky_bottom: shifted([92.0, 84.0, 73.0], bottom_shift),
            backdrop: Rgba::rgb(40, 10, 40),
            backdrop_tint: Rgba::WHITE,
            building_fill: Rgba::rgb(70, 60, 50),
            building_stroke: Rgba::rgb(50, 40, 30),
            building_damage: [20.0, 15.0, 10.0],
            outline_damage: [10.0, 8.0, 5.0],
            stain: Rgba::new(60, 50, 40, 150),
            window_lit: Rgba::new(255, 220, 120, 200),
            window_broken: Rgba::rgb(20, 15, 10),
            window_dark: Rgba::rgb(30, 25, 20),
            vine: Rgba::new(40, 60, 30, 200),
            leaf: Rgba::new(45, 70, 35, 180),
            crack: Rgba::new(40, 35, 30, 120),
            glow: GlowColor::Ember,
            orb: Rgba::rgb(255, 220, 100),
            dust: Rgba::new(200, 180, 140, 60),
            rain: Rgba::new(150, 180, 200, 120),
            bird: Rgba::rgb(80, 70, 60),
            fragment: Rgba::rgb(255, 0, 80),
            secret: Rgba::rgb(255, 0, 80),
            illusion: Rgba::rgb(255, 0, 80),
            pointer: Rgba::rgb(255, 200, 100),
            sparks: Rgba::rgb(255, 240, 200),
            fog: Rgba::from_f32(180.0 + m * 20.0, 170.0 + m * 15.0, 150.0 + m * 25.0, 255.0),
            shadow: Rgba::rgb(30, 0, 30),
            vignette: Rgba::rgb(20, 15, 10),
            vignette_max: 120.0 + m * 30.0,
        }
    }

    /// The city after the fall: everything in shades of blood red.
    pub fn aftermath() -> Self {
        let red = Rgba::rgb(255, 30, 30);
        Self {
            sky_top: Rgba::rgb(30, 0, 0),
            sky_bottom: Rgba::rgb(10, 0, 0),
            building_fill: Rgba::rgb(60, 0, 0),
            building_stroke: Rgba::rgb(120, 0, 0),
            building_damage: [0.0, 0.0, 0.0],
            outline_damage: [0.0, 0.0, 0.0],
            stain: Rgba::new(80, 0, 0, 150),
            window_lit: red.with_alpha(200.0),
            window_broken: Rgba::rgb(40, 0, 0),
            window_dark: Rgba::rgb(60, 0, 0),
            vine: red.with_alpha(200.0),
            leaf: red.with_alpha(180.0),
            crack: red.with_alpha(120.0),
            glow: GlowColor::Fixed(red),
            orb: red,
            dust: red.with_alpha(60.0),
            rain: red.with_alpha(120.0),
            bird: red,
            pointer: red,
            sparks: red,
            fog: Rgba::rgb(80, 0, 0),
            vignette: red,
            vignette_max: 120.0,
            ..Self::city(AtmosphereMode::Normal)
        }
    }

    /// Magenta truth scene.
    pub fn truth() -> Self {
        let pink = Rgba::rgb(255, 0, 80);
        Self {
            backdrop: Rgba::rgb(40, 10, 40),
            backdrop_tint: Rgba::new(180, 80, 180, 220),
            fragment: pink,
            secret: pink,
            illusion: pink,
            pointer: pink,
            shadow: Rgba::rgb(30, 0, 30),
            vignette: pink,
            vignette_max: 120.0,
            ..Self::city(AtmosphereMode::Normal)
        }
    }

    /// Building fill darkened by `damage`.
    pub fn damaged_fill(&self, damage: f32) -> Rgba {
        darken(self.building_fill, self.building_damage, damage)
    }

    /// Building outline darkened by `damage`.
    pub fn damaged_stroke(&self, damage: f32) -> Rgba {
        darken(self.building_stroke, self.outline_damage, damage)
    }
}

fn darken(c: Rgba, per_unit: [f32; 3], damage: f32) -> Rgba {
    Rgba::from_f32(
        c.r as f32 - damage * per_unit[0],
        c.g as f32 - damage * per_unit[1],
        c.b as f32 - damage * per_unit[2],
        255.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storm_darkens_sky() {
        let normal = Palette::city(AtmosphereMode::Normal);
        let storm = Palette::city(AtmosphereMode::Storm);
        assert!(storm.sky_top.r < normal.sky_top.r);
        assert_eq!(storm.sky_top, Rgba::rgb(109, 105, 97));
    }

    #[test]
    fn test_vignette_strength_follows_mode() {
        assert_eq!(Palette::city(AtmosphereMode::Normal).vignette_max, 120.0);
        assert_eq!(Palette::city(AtmosphereMode::Mystical).vignette_max, 180.0);
        assert_eq!(Palette::aftermath().vignette_max, 120.0);
    }

    #[test]
    fn test_damage_darkens_buildings() {
        let p = Palette::city(AtmosphereMode::Normal);
        assert_eq!(p.damaged_fill(0.5), Rgba::rgb(60, 53, 45));
        assert_eq!(Palette::aftermath().damaged_fill(0.7), Rgba::rgb(60, 0, 0));
    }
}
