//! Software RGBA canvas implementing [`Surface`].

use murk_core::{BlendMode, Point, RectF, Rgba};

use crate::surface::Surface;

// ============================================================================
// Blending
// ============================================================================

/// Separable blend function on normalised channels.
fn mix(mode: BlendMode, base: f32, src: f32) -> f32 {
    match mode {
        BlendMode::Normal => src,
        BlendMode::Multiply => base * src,
        BlendMode::Screen => base + src - base * src,
        BlendMode::Overlay => {
            if base <= 0.5 {
                2.0 * base * src
            } else {
                1.0 - 2.0 * (1.0 - base) * (1.0 - src)
            }
        }
    }
}

/// Composite `src` over `dst` with `mode`, straight alpha.
///
/// Follows the W3C compositing model: the blend result is weighted by the
/// backdrop's alpha, then source-over is applied with the source alpha.
pub fn blend(dst: Rgba, src: Rgba, mode: BlendMode) -> Rgba {
    if src.a == 0 {
        return dst;
    }
    let sa = src.a as f32 / 255.0;
    let da = dst.a as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);

    let channel = |cb: u8, cs: u8| {
        let cb = cb as f32 / 255.0;
        let cs = cs as f32 / 255.0;
        let mixed = (1.0 - da) * cs + da * mix(mode, cb, cs);
        let co = mixed * sa + cb * da * (1.0 - sa);
        co / out_a * 255.0
    };

    Rgba::from_f32(
        channel(dst.r, src.r),
        channel(dst.g, src.g),
        channel(dst.b, src.b),
        out_a * 255.0,
    )
}

// ============================================================================
// Image
// ============================================================================

/// A plain RGBA pixel grid. Used for assets, overlay layers and the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Image {
    /// Transparent image of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba::TRANSPARENT)
    }

    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    /// Build from tightly packed RGBA8 bytes. Returns `None` on a size mismatch.
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Option<Self> {
        if bytes.len() != width as usize * height as usize * 4 {
            return None;
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|p| Rgba::new(p[0], p[1], p[2], p[3]))
            .collect();
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Tightly packed RGBA8 bytes.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|p| [p.r, p.g, p.b, p.a])
            .collect()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        (x < self.width && y < self.height).then(|| self.pixels[self.index(x, y)])
    }

    pub fn set(&mut self, x: u32, y: u32, color: Rgba) {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.pixels[i] = color;
        }
    }

    pub fn fill(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    /// Blend one pixel; out-of-range coordinates are ignored.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba, mode: BlendMode) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        let i = self.index(x as u32, y as u32);
        self.pixels[i] = blend(self.pixels[i], color, mode);
    }

    /// Nearest-neighbour sample at normalised coordinates (0.0-1.0).
    pub fn sample(&self, u: f32, v: f32) -> Rgba {
        if self.is_empty() {
            return Rgba::TRANSPARENT;
        }
        let x = ((u * self.width as f32) as u32).min(self.width - 1);
        let y = ((v * self.height as f32) as u32).min(self.height - 1);
        self.pixels[self.index(x, y)]
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }
}

// ============================================================================
// Canvas
// ============================================================================

/// An [`Image`] with a logical coordinate system laid over it.
///
/// Scenes draw in their fixed logical resolution (1920×1080 for the particle
/// scenes) and the canvas scales to whatever pixel size the host gives it.
/// Shapes are rasterised by testing pixel centres; shapes smaller than a pixel
/// are drawn into the covering pixel with alpha scaled by their area.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    image: Image,
    logical_w: f32,
    logical_h: f32,
}

impl Canvas {
    pub fn new(pixel_w: u32, pixel_h: u32, logical_w: f32, logical_h: f32) -> Self {
        Self {
            image: Image::new(pixel_w, pixel_h),
            logical_w: logical_w.max(1.0),
            logical_h: logical_h.max(1.0),
        }
    }

    /// A canvas whose logical and pixel sizes coincide.
    pub fn with_pixel_size(width: u32, height: u32) -> Self {
        Self::new(width, height, width as f32, height as f32)
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        (self.image.width, self.image.height)
    }

    fn scale(&self) -> (f32, f32) {
        (
            self.image.width as f32 / self.logical_w,
            self.image.height as f32 / self.logical_h,
        )
    }

    /// Smallest logical distance that still covers half a pixel.
    fn half_pixel(&self) -> f32 {
        let (sx, sy) = self.scale();
        0.5 / sx.min(sy).max(f32::EPSILON)
    }

    /// Pixel range whose centres may fall in `[x0, x1) × [y0, y1)` (logical).
    fn pixel_bounds(&self, x0: f32, y0: f32, x1: f32, y1: f32) -> Option<(i32, i32, i32, i32)> {
        let (sx, sy) = self.scale();
        let px0 = ((x0 * sx).floor() as i32).max(0);
        let py0 = ((y0 * sy).floor() as i32).max(0);
        let px1 = ((x1 * sx).ceil() as i32).min(self.image.width as i32 - 1);
        let py1 = ((y1 * sy).ceil() as i32).min(self.image.height as i32 - 1);
        (px0 <= px1 && py0 <= py1).then_some((px0, py0, px1, py1))
    }

    /// Logical coordinates of a pixel centre.
    fn logical(&self, px: i32, py: i32) -> Point {
        let (sx, sy) = self.scale();
        Point::new((px as f32 + 0.5) / sx, (py as f32 + 0.5) / sy)
    }

    /// Pixel containing a logical point.
    fn pixel_at(&self, p: Point) -> (i32, i32) {
        let (sx, sy) = self.scale();
        ((p.x * sx).floor() as i32, (p.y * sy).floor() as i32)
    }

    /// Visit every pixel in the bounding box whose centre passes `inside`.
    /// Falls back to a coverage-weighted dot when no centre is hit.
    fn raster(
        &mut self,
        bounds: (f32, f32, f32, f32),
        anchor: Point,
        area: f32,
        color: Rgba,
        mode: BlendMode,
        inside: impl Fn(Point) -> bool,
    ) {
        let mut hit = false;
        if let Some((px0, py0, px1, py1)) = self.pixel_bounds(bounds.0, bounds.1, bounds.2, bounds.3)
        {
            for py in py0..=py1 {
                for px in px0..=px1 {
                    if inside(self.logical(px, py)) {
                        self.image.blend_pixel(px, py, color, mode);
                        hit = true;
                    }
                }
            }
        }
        if !hit && area > 0.0 {
            let (sx, sy) = self.scale();
            let coverage = (area * sx * sy).min(1.0);
            let (px, py) = self.pixel_at(anchor);
            self.image.blend_pixel(px, py, color.fade(coverage), mode);
        }
    }

    /// Reallocate to a new pixel size, keeping the logical coordinate system.
    pub fn resize(&mut self, pixel_w: u32, pixel_h: u32) {
        self.image = Image::new(pixel_w, pixel_h);
    }

    /// Change the logical coordinate system (the hypno effect tracks the viewport).
    pub fn set_logical_size(&mut self, logical_w: f32, logical_h: f32) {
        self.logical_w = logical_w.max(1.0);
        self.logical_h = logical_h.max(1.0);
    }
}

impl Surface for Canvas {
    fn size(&self) -> (f32, f32) {
        (self.logical_w, self.logical_h)
    }

    fn clear(&mut self, color: Rgba) {
        self.image.fill(color);
    }

    fn fill_rect(&mut self, rect: RectF, color: Rgba, mode: BlendMode) {
        if rect.w <= 0.0 || rect.h <= 0.0 {
            return;
        }
        let center = Point::new(rect.x + rect.w / 2.0, rect.y + rect.h / 2.0);
        self.raster(
            (rect.x, rect.y, rect.right(), rect.bottom()),
            center,
            rect.w * rect.h,
            color,
            mode,
            |p| p.x >= rect.x && p.x < rect.right() && p.y >= rect.y && p.y < rect.bottom(),
        );
    }

    fn fill_ellipse(&mut self, center: Point, rx: f32, ry: f32, color: Rgba, mode: BlendMode) {
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        self.raster(
            (center.x - rx, center.y - ry, center.x + rx, center.y + ry),
            center,
            std::f32::consts::PI * rx * ry,
            color,
            mode,
            |p| {
                let dx = (p.x - center.x) / rx;
                let dy = (p.y - center.y) / ry;
                dx * dx + dy * dy <= 1.0
            },
        );
    }

    fn stroke_circle(
        &mut self,
        center: Point,
        radius: f32,
        width: f32,
        color: Rgba,
        mode: BlendMode,
    ) {
        if width <= 0.0 || radius < 0.0 {
            return;
        }
        let half = (width / 2.0).max(self.half_pixel());
        let color = color.fade((width / (2.0 * half)).min(1.0));
        let outer = radius + half;
        let inner = (radius - half).max(0.0);
        self.raster(
            (
                center.x - outer,
                center.y - outer,
                center.x + outer,
                center.y + outer,
            ),
            center,
            0.0,
            color,
            mode,
            |p| {
                let d = p.distance(center);
                d >= inner && d <= outer
            },
        );
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f32, color: Rgba, mode: BlendMode) {
        if width <= 0.0 {
            return;
        }
        let half = (width / 2.0).max(self.half_pixel());
        let color = color.fade((width / (2.0 * half)).min(1.0));
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let len_sq = dx * dx + dy * dy;
        self.raster(
            (
                from.x.min(to.x) - half,
                from.y.min(to.y) - half,
                from.x.max(to.x) + half,
                from.y.max(to.y) + half,
            ),
            from,
            0.0,
            color,
            mode,
            |p| {
                let t = if len_sq > 0.0 {
                    (((p.x - from.x) * dx + (p.y - from.y) * dy) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let closest = Point::new(from.x + dx * t, from.y + dy * t);
                p.distance(closest) <= half
            },
        );
    }

    fn fill_vertical_gradient(&mut self, top: Rgba, bottom: Rgba) {
        let (w, h) = (self.image.width, self.image.height);
        for py in 0..h {
            let t = self.logical(0, py as i32).y / self.logical_h;
            let color = top.lerp(bottom, t);
            for px in 0..w {
                self.image.set(px, py, color);
            }
        }
    }

    fn fill_radial_gradient(
        &mut self,
        center: Point,
        radius: f32,
        inner: Rgba,
        outer: Rgba,
        mode: BlendMode,
    ) {
        if radius <= 0.0 {
            return;
        }
        let Some((px0, py0, px1, py1)) = self.pixel_bounds(
            center.x - radius,
            center.y - radius,
            center.x + radius,
            center.y + radius,
        ) else {
            return;
        };
        for py in py0..=py1 {
            for px in px0..=px1 {
                let d = self.logical(px, py).distance(center);
                if d <= radius {
                    let color = inner.lerp(outer, d / radius);
                    self.image.blend_pixel(px, py, color, mode);
                }
            }
        }
    }

    fn blit(&mut self, image: &Image, tint: Rgba, mode: BlendMode) {
        if image.is_empty() || tint.a == 0 {
            return;
        }
        let (w, h) = (self.image.width, self.image.height);
        let scale = |c: u8, t: u8| ((c as u16 * t as u16 + 127) / 255) as u8;
        for py in 0..h {
            let v = (py as f32 + 0.5) / h as f32;
            for px in 0..w {
                let u = (px as f32 + 0.5) / w as f32;
                let src = image.sample(u, v);
                if src.a == 0 {
                    continue;
                }
                let tinted = Rgba::new(
                    scale(src.r, tint.r),
                    scale(src.g, tint.g),
                    scale(src.b, tint.b),
                    scale(src.a, tint.a),
                );
                self.image.blend_pixel(px as i32, py as i32, tinted, mode);
            }
        }
    }

    fn pixels(&self) -> &Image {
        &self.image
    }

    fn pixels_mut(&mut self) -> &mut Image {
        &mut self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_blend_over_opaque() {
        let out = blend(Rgba::rgb(0, 0, 0), Rgba::new(255, 255, 255, 128), BlendMode::Normal);
        assert_eq!(out.a, 255);
        assert!((127..=129).contains(&out.r));
    }

    #[test]
    fn test_blend_onto_transparent_keeps_source() {
        for mode in [
            BlendMode::Normal,
            BlendMode::Multiply,
            BlendMode::Screen,
            BlendMode::Overlay,
        ] {
            let out = blend(Rgba::TRANSPARENT, Rgba::new(200, 40, 10, 90), mode);
            assert_eq!(out, Rgba::new(200, 40, 10, 90), "{mode:?}");
        }
    }

    #[test]
    fn test_multiply_never_brightens() {
        let bases = [Rgba::rgb(0, 0, 0), Rgba::rgb(139, 125, 107), Rgba::rgb(255, 255, 255)];
        let overlays = [
            Rgba::new(255, 255, 255, 255),
            Rgba::new(180, 170, 150, 77),
            Rgba::new(20, 15, 10, 200),
            Rgba::new(255, 30, 30, 1),
        ];
        for base in bases {
            for overlay in overlays {
                let out = blend(base, overlay, BlendMode::Multiply);
                assert!(out.r <= base.r && out.g <= base.g && out.b <= base.b);
                assert_eq!(out.a, 255);
            }
        }
    }

    #[test]
    fn test_screen_never_darkens() {
        let base = Rgba::rgb(90, 60, 30);
        let out = blend(base, Rgba::new(100, 100, 100, 180), BlendMode::Screen);
        assert!(out.r >= base.r && out.g >= base.g && out.b >= base.b);
    }

    #[test]
    fn test_fill_rect_scales_to_pixels() {
        let mut canvas = Canvas::new(192, 108, 1920.0, 1080.0);
        canvas.fill_rect(RectF::new(0.0, 0.0, 960.0, 1080.0), Rgba::WHITE, BlendMode::Normal);
        let img = canvas.image();
        assert_eq!(img.get(0, 0), Some(Rgba::WHITE));
        assert_eq!(img.get(95, 107), Some(Rgba::WHITE));
        assert_eq!(img.get(96, 0), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_tiny_ellipse_still_leaves_a_mark() {
        let mut canvas = Canvas::new(192, 108, 1920.0, 1080.0);
        canvas.clear(Rgba::BLACK);
        canvas.fill_circle(Point::new(500.0, 500.0), 1.0, Rgba::WHITE, BlendMode::Normal);
        let px = canvas.image().get(50, 50).unwrap();
        assert!(px.r > 0 && px.r < 255);
    }

    #[test]
    fn test_stroke_circle_leaves_centre_untouched() {
        let mut canvas = Canvas::with_pixel_size(100, 100);
        canvas.stroke_circle(Point::new(50.0, 50.0), 30.0, 3.0, Rgba::WHITE, BlendMode::Normal);
        assert_eq!(canvas.image().get(50, 50), Some(Rgba::TRANSPARENT));
        assert_eq!(canvas.image().get(80, 50), Some(Rgba::WHITE));
    }

    #[test]
    fn test_blit_multiply_with_tint() {
        let mut canvas = Canvas::with_pixel_size(4, 4);
        canvas.clear(Rgba::rgb(200, 200, 200));
        let overlay = Image::filled(2, 2, Rgba::rgb(0, 0, 0));
        canvas.blit(&overlay, Rgba::new(255, 255, 255, 0), BlendMode::Multiply);
        assert_eq!(canvas.image().get(0, 0), Some(Rgba::rgb(200, 200, 200)));
        canvas.blit(&overlay, Rgba::WHITE, BlendMode::Multiply);
        assert_eq!(canvas.image().get(3, 3), Some(Rgba::rgb(0, 0, 0)));
    }

    #[test]
    fn test_gradient_runs_top_to_bottom() {
        let mut canvas = Canvas::with_pixel_size(2, 10);
        canvas.fill_vertical_gradient(Rgba::WHITE, Rgba::BLACK);
        let top = canvas.image().get(0, 0).unwrap();
        let bottom = canvas.image().get(0, 9).unwrap();
        assert!(top.r > 230 && bottom.r < 25);
    }

    #[test]
    fn test_rgba_bytes_round_trip() {
        let bytes: Vec<u8> = (0..16).collect();
        let img = Image::from_rgba_bytes(2, 2, &bytes).unwrap();
        assert_eq!(img.get(1, 0), Some(Rgba::new(4, 5, 6, 7)));
        assert_eq!(img.to_rgba_bytes(), bytes);
        assert!(Image::from_rgba_bytes(3, 2, &bytes).is_none());
    }
}
