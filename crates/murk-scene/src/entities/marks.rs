//! Pointer marks: click ripples and the mouse trail.

use murk_core::{BlendMode, Point};

use crate::color::Palette;
use crate::pool::{Ambient, Particle, SceneRng};
use crate::surface::Surface;

/// Expanding ring left by a click.
#[derive(Debug, Clone, PartialEq)]
pub struct RippleMarker {
    pub center: Point,
    pub diameter: f32,
    pub alpha: f32,
}

impl RippleMarker {
    pub fn new(center: Point) -> Self {
        Self {
            center,
            diameter: 0.0,
            alpha: 100.0,
        }
    }
}

impl Particle for RippleMarker {
    fn step(&mut self, _ambient: &Ambient<'_>, _rng: &mut SceneRng) {
        self.diameter += 4.0;
        self.alpha -= 3.0;
    }

    fn is_expired(&self, _ambient: &Ambient<'_>) -> bool {
        self.alpha <= 0.0
    }

    fn render(&self, surface: &mut dyn Surface, palette: &Palette) {
        surface.stroke_circle(
            self.center,
            self.diameter / 2.0,
            3.0,
            palette.pointer.with_alpha(self.alpha * 1.5),
            BlendMode::Normal,
        );
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrailPoint {
    pub pos: Point,
    pub life: f32,
}

impl TrailPoint {
    pub const LIFE: f32 = 20.0;

    pub fn new(pos: Point) -> Self {
        Self {
            pos,
            life: Self::LIFE,
        }
    }

    /// Alpha of the segment ending at this point.
    fn alpha(&self) -> f32 {
        self.life / Self::LIFE * 100.0
    }
}

impl Particle for TrailPoint {
    fn step(&mut self, _ambient: &Ambient<'_>, _rng: &mut SceneRng) {
        self.life -= 1.0;
    }

    fn is_expired(&self, _ambient: &Ambient<'_>) -> bool {
        self.life <= 0.0
    }

    /// A lone point has no segment to draw; see [`draw_trail`].
    fn render(&self, _surface: &mut dyn Surface, _palette: &Palette) {}
}

/// Stroke the trail as one polyline, each segment fading with its end point.
pub fn draw_trail<'a>(
    points: impl IntoIterator<Item = &'a TrailPoint>,
    surface: &mut dyn Surface,
    palette: &Palette,
) {
    let mut prev: Option<&TrailPoint> = None;
    for point in points {
        if let Some(from) = prev {
            surface.stroke_line(
                from.pos,
                point.pos,
                2.0,
                palette.pointer.with_alpha(point.alpha()),
                BlendMode::Normal,
            );
        }
        prev = Some(point);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use murk_core::{AtmosphereMode, Rgba};

    #[test]
    fn test_trail_needs_two_points() {
        let palette = Palette::city(AtmosphereMode::Normal);
        let mut canvas = Canvas::with_pixel_size(40, 40);
        canvas.clear(Rgba::BLACK);
        let lone = [TrailPoint::new(Point::new(20.0, 20.0))];
        draw_trail(&lone, &mut canvas, &palette);
        assert!(canvas.image().pixels().iter().all(|&p| p == Rgba::BLACK));

        let pair = [
            TrailPoint::new(Point::new(5.0, 20.0)),
            TrailPoint::new(Point::new(35.0, 20.0)),
        ];
        draw_trail(&pair, &mut canvas, &palette);
        assert_ne!(canvas.image().get(20, 20), Some(Rgba::BLACK));
    }
}
