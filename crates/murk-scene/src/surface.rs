//! The drawing surface the render pass paints on.

use murk_core::{BlendMode, Point, RectF, Rgba};

use crate::canvas::Image;

/// Samples used to flatten one quadratic curve segment.
const CURVE_SEGMENTS: usize = 6;

/// A 2D surface addressed in logical coordinates.
///
/// Every call is pure drawing; implementations must not consult any random
/// source so that rendering the same state twice yields the same pixels.
pub trait Surface {
    /// Logical width and height.
    fn size(&self) -> (f32, f32);

    /// Overwrite every pixel with `color`.
    fn clear(&mut self, color: Rgba);

    fn fill_rect(&mut self, rect: RectF, color: Rgba, mode: BlendMode);

    fn fill_ellipse(&mut self, center: Point, rx: f32, ry: f32, color: Rgba, mode: BlendMode);

    fn stroke_circle(
        &mut self,
        center: Point,
        radius: f32,
        width: f32,
        color: Rgba,
        mode: BlendMode,
    );

    fn stroke_line(&mut self, from: Point, to: Point, width: f32, color: Rgba, mode: BlendMode);

    /// Full-frame top-to-bottom gradient, drawn opaque.
    fn fill_vertical_gradient(&mut self, top: Rgba, bottom: Rgba);

    /// Disc whose colour runs from `inner` at the centre to `outer` at `radius`.
    fn fill_radial_gradient(
        &mut self,
        center: Point,
        radius: f32,
        inner: Rgba,
        outer: Rgba,
        mode: BlendMode,
    );

    /// Stretch `image` over the whole surface, multiplying it by `tint`.
    fn blit(&mut self, image: &Image, tint: Rgba, mode: BlendMode);

    /// Pixel-level read access.
    fn pixels(&self) -> &Image;

    /// Pixel-level write access.
    fn pixels_mut(&mut self) -> &mut Image;

    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgba, mode: BlendMode) {
        self.fill_ellipse(center, radius, radius, color, mode);
    }

    fn stroke_polyline(&mut self, points: &[Point], width: f32, color: Rgba, mode: BlendMode) {
        for pair in points.windows(2) {
            self.stroke_line(pair[0], pair[1], width, color, mode);
        }
    }

    /// Stroke a path of quadratic Bézier segments given as `(control, end)`.
    fn stroke_quadratic_path(
        &mut self,
        start: Point,
        segments: &[(Point, Point)],
        width: f32,
        color: Rgba,
        mode: BlendMode,
    ) {
        let mut points = Vec::with_capacity(segments.len() * CURVE_SEGMENTS + 1);
        points.push(start);
        let mut from = start;
        for &(control, to) in segments {
            for i in 1..=CURVE_SEGMENTS {
                let t = i as f32 / CURVE_SEGMENTS as f32;
                let a = from.lerp(control, t);
                let b = control.lerp(to, t);
                points.push(a.lerp(b, t));
            }
            from = to;
        }
        self.stroke_polyline(&points, width, color, mode);
    }
}
