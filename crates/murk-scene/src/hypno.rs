//! Hypnotic overlay: pulsing circles, counter-rotating spirals and wavy
//! radial lines, composited with multiply over whatever sits beneath it.

use std::f32::consts::{PI, TAU};

use murk_core::{BlendMode, Point, Rgba};

use crate::canvas::Canvas;
use crate::surface::Surface;

const PINK: Rgba = Rgba::rgb(255, 20, 147);
const BLUE: Rgba = Rgba::rgb(65, 105, 225);
const DARK_PINK: Rgba = Rgba::rgb(199, 21, 133);
const DARK_BLUE: Rgba = Rgba::rgb(25, 25, 112);

const PULSE_COLORS: [Rgba; 5] = [PINK, BLUE, Rgba::BLACK, DARK_PINK, DARK_BLUE];
const SPIRAL_COLORS: [Rgba; 3] = [PINK, BLUE, Rgba::BLACK];
const WAVE_COLORS: [Rgba; 3] = [PINK, BLUE, DARK_PINK];

/// Grid step of the optional pixel distortion pass.
const DISTORTION_STEP: usize = 4;

const INTENSITY_MIN: f32 = 0.0;
const INTENSITY_MAX: f32 = 2.0;
const SPEED_MIN: f32 = 0.001;
const SPEED_MAX: f32 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct HypnoSettings {
    /// In `[0, 2]`.
    pub intensity: f32,
    /// In `[0.001, 0.1]`.
    pub speed: f32,
    pub wave_amplitude: f32,
    pub spiral_speed: f32,
    pub distortion_strength: f32,
    /// Run the pixel distortion pass after drawing.
    pub distortion: bool,
}

impl HypnoSettings {
    /// Pull intensity and speed into their ranges, leaving the other fields as given.
    pub fn clamped(self) -> Self {
        Self {
            intensity: self.intensity.clamp(INTENSITY_MIN, INTENSITY_MAX),
            speed: self.speed.clamp(SPEED_MIN, SPEED_MAX),
            ..self
        }
    }
}

impl Default for HypnoSettings {
    fn default() -> Self {
        Self {
            intensity: 1.0,
            speed: 0.02,
            wave_amplitude: 50.0,
            spiral_speed: 0.03,
            distortion_strength: 30.0,
            distortion: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HypnoEffect {
    settings: HypnoSettings,
    time: f32,
    layer: Canvas,
}

impl HypnoEffect {
    /// Intensity and speed are clamped into range.
    pub fn new(settings: HypnoSettings, pixel_size: (u32, u32), logical_size: (f32, f32)) -> Self {
        Self {
            settings: settings.clamped(),
            time: 0.0,
            layer: Canvas::new(pixel_size.0, pixel_size.1, logical_size.0, logical_size.1),
        }
    }

    pub fn settings(&self) -> &HypnoSettings {
        &self.settings
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn layer(&self) -> &Canvas {
        &self.layer
    }

    /// Clamp to `[0, 2]` and rescale the wave amplitude and distortion with it.
    pub fn set_intensity(&mut self, intensity: f32) {
        let s = &mut self.settings;
        s.intensity = intensity.clamp(INTENSITY_MIN, INTENSITY_MAX);
        s.wave_amplitude = 50.0 * s.intensity;
        s.distortion_strength = 30.0 * s.intensity;
    }

    /// Clamp to `[0.001, 0.1]`; the spirals turn at one and a half times the speed.
    pub fn set_speed(&mut self, speed: f32) {
        let s = &mut self.settings;
        s.speed = speed.clamp(SPEED_MIN, SPEED_MAX);
        s.spiral_speed = s.speed * 1.5;
    }

    /// Track a new viewport.
    pub fn resize(&mut self, pixel_size: (u32, u32), logical_size: (f32, f32)) {
        self.layer.resize(pixel_size.0, pixel_size.1);
        self.layer.set_logical_size(logical_size.0, logical_size.1);
        self.redraw();
        log::debug!("hypno layer resized to {}x{}", pixel_size.0, pixel_size.1);
    }

    /// Advance one tick and redraw the layer.
    pub fn step(&mut self) {
        self.time += 1.0;
        self.redraw();
    }

    fn redraw(&mut self) {
        self.layer.clear(Rgba::TRANSPARENT);
        self.draw_pulsing_circles();
        self.draw_spirals();
        self.draw_wavy_lines();
        if self.settings.distortion {
            self.distort();
        }
    }

    /// Multiply the layer over `surface`.
    pub fn composite(&self, surface: &mut dyn Surface) {
        surface.blit(self.layer.image(), Rgba::WHITE, BlendMode::Multiply);
    }

    /// The effect on its own, over a white page.
    pub fn render(&self, surface: &mut dyn Surface) {
        surface.clear(Rgba::WHITE);
        self.composite(surface);
    }

    fn center(&self) -> Point {
        let (w, h) = self.layer.size();
        Point::new(w / 2.0, h / 2.0)
    }

    fn draw_pulsing_circles(&mut self) {
        let center = self.center();
        let s = &self.settings;
        for (i, color) in PULSE_COLORS.into_iter().enumerate() {
            let i = i as f32;
            let pulse = (self.time * s.speed * 3.0 + i * PI / 2.0).sin() * 0.5 + 0.5;
            let radius = (50.0 + i * 80.0) * (1.0 + pulse * 0.3);
            let alpha = (0.1 + pulse * 0.1) * 255.0;
            self.layer.fill_radial_gradient(
                center,
                radius,
                color.with_alpha(alpha),
                color.with_alpha(0.0),
                BlendMode::Screen,
            );
        }
    }

    fn draw_spirals(&mut self) {
        let center = self.center();
        let (w, h) = self.layer.size();
        let max_r = (w * w + h * h).sqrt() / 2.0;
        let s = self.settings.clone();

        for spiral in 0..2 {
            let offset = spiral as f32 * PI;
            let direction = if spiral == 0 { 1.0 } else { -1.0 };
            for arm in 0..8 {
                let color = SPIRAL_COLORS[arm % 3].with_alpha(0.4 * 255.0);
                let point_at = |radius: f32| {
                    let angle = radius * 0.1
                        + self.time * s.spiral_speed * direction
                        + offset
                        + arm as f32 * PI / 4.0;
                    let wave = (radius * 0.05 + self.time * s.speed * 2.0).sin()
                        * s.distortion_strength;
                    Point::new(
                        center.x + angle.cos() * (radius + wave),
                        center.y + angle.sin() * (radius + wave),
                    )
                };
                let path = chained(10.0, max_r, 2.0, point_at);
                self.stroke_chain(&path, 2.0, color, BlendMode::Overlay);
            }
        }
    }

    fn draw_wavy_lines(&mut self) {
        let center = self.center();
        let (w, h) = self.layer.size();
        let reach = w.max(h);
        let s = self.settings.clone();

        for (layer, base) in WAVE_COLORS.into_iter().enumerate() {
            let l = layer as f32;
            let mode = if layer == 0 {
                BlendMode::Normal
            } else {
                BlendMode::Screen
            };
            let color = base.with_alpha((0.6 - l * 0.15) * 255.0);
            let wave_offset = self.time * s.speed + l * PI / 3.0;
            let amplitude = s.wave_amplitude * (1.0 - l * 0.2);

            let mut angle = 0.0;
            while angle < TAU {
                let point_at = |radius: f32| {
                    let wx = (angle + wave_offset + radius * 0.01).cos()
                        * amplitude
                        * (radius * 0.02 + wave_offset).sin();
                    let wy = (angle + wave_offset + radius * 0.01).sin()
                        * amplitude
                        * (radius * 0.02 + wave_offset).cos();
                    Point::new(
                        center.x + angle.cos() * radius + wx,
                        center.y + angle.sin() * radius + wy,
                    )
                };
                let path = chained(20.0, reach, 10.0, point_at);
                self.stroke_chain(&path, 3.0 + l, color, mode);
                angle += PI / 16.0;
            }
        }
    }

    /// Each segment's control point is the previous end point.
    fn stroke_chain(&mut self, path: &[Point], width: f32, color: Rgba, mode: BlendMode) {
        let Some((&start, rest)) = path.split_first() else {
            return;
        };
        let mut prev = start;
        let segments: Vec<(Point, Point)> = rest
            .iter()
            .map(|&p| {
                let seg = (prev, p);
                prev = p;
                seg
            })
            .collect();
        self.layer
            .stroke_quadratic_path(start, &segments, width, color, mode);
    }

    /// Displace pixels on a coarse grid along a radial ripple.
    fn distort(&mut self) {
        let (lw, lh) = self.layer.size();
        let (pw, ph) = self.layer.pixel_size();
        let (sx, sy) = (pw as f32 / lw, ph as f32 / lh);
        let center = self.center();
        let s = &self.settings;
        let time = self.time;
        let image = self.layer.pixels_mut();

        for py in (0..ph as usize).step_by(DISTORTION_STEP) {
            for px in (0..pw as usize).step_by(DISTORTION_STEP) {
                let p = Point::new(px as f32 / sx, py as f32 / sy);
                let d = p.distance(center);
                let wave = (d * 0.02 + time * s.speed * 4.0).sin() * s.distortion_strength * 0.5;
                let src_x = (px as f32 + wave * sx).round();
                let src_y = (py as f32 + (d * 0.03 + time * s.speed * 3.0).cos() * wave * sy).round();
                if src_x < 0.0 || src_y < 0.0 {
                    continue;
                }
                if let Some(c) = image.get(src_x as u32, src_y as u32) {
                    image.set(px as u32, py as u32, c);
                }
            }
        }
    }
}

/// Sample `point_at` for radii `from, from + step, ...` below `to`.
fn chained(from: f32, to: f32, step: f32, point_at: impl Fn(f32) -> Point) -> Vec<Point> {
    let mut points = Vec::new();
    let mut r = from;
    while r < to {
        points.push(point_at(r));
        r += step;
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn effect() -> HypnoEffect {
        HypnoEffect::new(HypnoSettings::default(), (40, 24), (400.0, 240.0))
    }

    #[test]
    fn test_set_intensity_clamps_and_rescales() {
        let mut fx = effect();
        fx.set_intensity(5.0);
        assert_eq!(fx.settings().intensity, 2.0);
        assert_eq!(fx.settings().wave_amplitude, 100.0);
        assert_eq!(fx.settings().distortion_strength, 60.0);

        fx.set_intensity(-1.0);
        assert_eq!(fx.settings().intensity, 0.0);
        assert_eq!(fx.settings().wave_amplitude, 0.0);

        fx.set_intensity(0.5);
        assert_eq!(fx.settings().distortion_strength, 15.0);
    }

    #[test]
    fn test_set_speed_clamps_and_drives_spirals() {
        let mut fx = effect();
        fx.set_speed(1.0);
        assert_eq!(fx.settings().speed, 0.1);
        assert!((fx.settings().spiral_speed - 0.15).abs() < 1e-6);

        fx.set_speed(0.0);
        assert_eq!(fx.settings().speed, 0.001);
        assert!((fx.settings().spiral_speed - 0.0015).abs() < 1e-7);
    }

    #[test]
    fn test_step_advances_time_and_paints() {
        let mut fx = effect();
        fx.step();
        fx.step();
        assert_eq!(fx.time(), 2.0);
        assert!(fx.layer().image().pixels().iter().any(|p| p.a > 0));
    }

    #[test]
    fn test_composite_only_darkens() {
        let mut fx = effect();
        fx.step();
        let mut page = Canvas::new(40, 24, 400.0, 240.0);
        fx.render(&mut page);
        assert!(page.image().pixels().iter().all(|p| p.a == 255));
        assert!(page.image().pixels().iter().any(|p| *p != Rgba::WHITE));
    }

    #[test]
    fn test_new_clamps_out_of_range_settings() {
        let settings = HypnoSettings {
            intensity: 5.0,
            speed: 0.0,
            wave_amplitude: 80.0,
            ..HypnoSettings::default()
        };
        let fx = HypnoEffect::new(settings, (40, 24), (400.0, 240.0));
        assert_eq!(fx.settings().intensity, 2.0);
        assert_eq!(fx.settings().speed, 0.001);
        assert_eq!(fx.settings().wave_amplitude, 80.0);
    }

    #[test]
    fn test_distortion_pass_moves_pixels() {
        let distorted = HypnoSettings {
            distortion: true,
            ..HypnoSettings::default()
        };
        let mut plain = effect();
        let mut warped = HypnoEffect::new(distorted, (40, 24), (400.0, 240.0));
        for _ in 0..5 {
            plain.step();
            warped.step();
        }
        let moved = plain
            .layer()
            .image()
            .pixels()
            .iter()
            .zip(warped.layer().image().pixels())
            .filter(|(a, b)| a != b)
            .count();
        assert!(moved > 0);
    }
}
