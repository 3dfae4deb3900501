//! Core types shared by the murk crates.
//!
//! Colours, geometry, blend modes and the small cycling enums that the
//! scenes, the config file and the terminal front-end all agree on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Straight (non-premultiplied) 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque colour.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Build a colour from float channels, clamping each to 0..=255.
    pub fn from_f32(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self::new(channel(r), channel(g), channel(b), channel(a))
    }

    /// Same colour with a new alpha (clamped float, 0..=255 scale).
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self { a: channel(alpha), ..self }
    }

    /// Scale the alpha channel by `factor` (0.0-1.0).
    pub fn fade(self, factor: f32) -> Self {
        self.with_alpha(self.a as f32 * factor)
    }

    /// Linear interpolation between two colours, `t` in 0.0-1.0.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| a as f32 + (b as f32 - a as f32) * t;
        Self::from_f32(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }
}

fn channel(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

impl From<Rgba> for ratatui::style::Color {
    fn from(c: Rgba) -> Self {
        ratatui::style::Color::Rgb(c.r, c.g, c.b)
    }
}

/// A point in logical scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn lerp(self, target: Self, t: f32) -> Self {
        Self::new(
            self.x + (target.x - self.x) * t,
            self.y + (target.y - self.y) * t,
        )
    }

    pub fn distance(self, other: Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned rectangle in logical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectF {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl RectF {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict containment: points on the border are outside.
    pub fn contains(&self, p: Point) -> bool {
        p.x > self.x && p.x < self.right() && p.y > self.y && p.y < self.bottom()
    }

    /// True when `other` lies entirely inside this rectangle (borders inclusive).
    pub fn encloses(&self, other: &RectF) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }
}

/// Compositing modes supported by the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Source-over alpha blending.
    #[default]
    Normal,
    /// `base * src / 255`; can only darken.
    Multiply,
    /// `255 - (255 - base) * (255 - src) / 255`; can only brighten.
    Screen,
    /// Multiply in the shadows, screen in the highlights.
    Overlay,
}

/// The scene variants the stage can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneKind {
    /// Decaying city with weather and atmosphere modes.
    #[default]
    City,
    /// The city in blood red, without wind or atmosphere cycling.
    Aftermath,
    /// Shattered-truth vignette over a background image.
    Truth,
    /// Hypnotic spiral overlay.
    Hypno,
}

impl SceneKind {
    pub const ALL: [SceneKind; 4] = [Self::City, Self::Aftermath, Self::Truth, Self::Hypno];

    pub fn name(self) -> &'static str {
        match self {
            Self::City => "city",
            Self::Aftermath => "aftermath",
            Self::Truth => "truth",
            Self::Hypno => "hypno",
        }
    }

    /// Whether the variant draws the building skyline.
    pub fn has_city(self) -> bool {
        matches!(self, Self::City | Self::Aftermath)
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SceneKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown scene '{s}' (expected city, aftermath, truth or hypno)"))
    }
}

/// City atmosphere palette selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AtmosphereMode {
    #[default]
    Normal,
    Storm,
    Mystical,
}

impl AtmosphereMode {
    /// Cycle to the next mode.
    pub fn next(self) -> Self {
        match self {
            Self::Normal => Self::Storm,
            Self::Storm => Self::Mystical,
            Self::Mystical => Self::Normal,
        }
    }

    /// Numeric mode (0, 1, 2) used by the palette formulas.
    pub fn index(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::Storm => 1,
            Self::Mystical => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Storm => "Storm",
            Self::Mystical => "Mystical",
        }
    }
}

/// Overlay density multiplier, cycled with the `f` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Density {
    #[default]
    Normal,
    Thick,
    Thin,
}

impl Density {
    /// Cycle 1 -> 2 -> 0.5 -> 1.
    pub fn next(self) -> Self {
        match self {
            Self::Normal => Self::Thick,
            Self::Thick => Self::Thin,
            Self::Thin => Self::Normal,
        }
    }

    pub fn factor(self) -> f32 {
        match self {
            Self::Normal => 1.0,
            Self::Thick => 2.0,
            Self::Thin => 0.5,
        }
    }
}
