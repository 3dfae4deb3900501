//! Procedural scene skeletons.
//!
//! Builds the static backdrop of the city variants (buildings with their
//! windows and stains, vines, cracks) and the seed populations of the truth
//! scene. Every draw comes from the caller's random source.

use murk_core::{Point, RectF};
use rand::Rng;

use crate::entities::{Fragment, Secret};
use crate::pool::SceneRng;

pub const VINES_PER_CITY: usize = 25;
pub const CRACKS_PER_CITY: usize = 20;
pub const SEED_FRAGMENTS: usize = 30;
pub const SEED_SECRETS: usize = 20;

/// Horizontal margin kept free at both edges of the skyline.
const MARGIN: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Residential,
    Office,
    Industrial,
}

impl Category {
    pub const ALL: [Category; 3] = [Self::Residential, Self::Office, Self::Industrial];

    /// Window width, height and grid pitch.
    fn window_grid(self) -> (f32, f32, f32) {
        match self {
            Self::Office => (6.0, 8.0, 12.0),
            Self::Residential | Self::Industrial => (10.0, 14.0, 18.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowElement {
    pub rect: RectF,
    pub broken: bool,
    pub flickering: bool,
}

/// Grime splotch on a badly damaged building.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stain {
    pub center: Point,
    pub w: f32,
    pub h: f32,
}

/// One building of the skyline.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureElement {
    pub rect: RectF,
    pub category: Category,
    pub windows: Vec<WindowElement>,
    /// Lit state per window, indexed like `windows`.
    pub lit: Vec<bool>,
    /// In `[0.1, 0.8)`.
    pub damage: f32,
    /// Sway phase offset in `[-0.5, 0.5)`.
    pub sway: f32,
    pub stains: Vec<Stain>,
}

impl StructureElement {
    fn generate(x: f32, height: f32, rng: &mut SceneRng) -> Self {
        let h = rng.gen_range(200.0..(height * 0.8).max(200.1));
        let w = rng.gen_range(60.0..140.0);
        let category = Category::ALL[rng.gen_range(0..Category::ALL.len())];
        let rect = RectF::new(x, height - h, w, h);
        let windows = generate_windows(&rect, category, rng);
        let damage: f32 = rng.gen_range(0.1..0.8);
        let sway = rng.gen_range(-0.5..0.5);

        let stains = if damage > 0.5 {
            let count = (damage * 8.0).ceil() as usize;
            (0..count)
                .map(|_| Stain {
                    center: Point::new(
                        rect.x + rng.gen_range(0.0..w),
                        rect.y + rng.gen_range(0.0..h),
                    ),
                    w: rng.gen_range(15.0..35.0),
                    h: rng.gen_range(25.0..50.0),
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            rect,
            category,
            lit: vec![false; windows.len()],
            windows,
            damage,
            sway,
            stains,
        }
    }

    /// Flip the lit state of `draws` randomly chosen windows.
    ///
    /// The same window may be drawn twice and end up unchanged.
    pub fn toggle_random_windows(&mut self, draws: usize, rng: &mut SceneRng) {
        if self.windows.is_empty() {
            return;
        }
        for _ in 0..draws {
            let i = rng.gen_range(0..self.windows.len());
            self.lit[i] = !self.lit[i];
        }
    }

    pub fn lit_count(&self) -> usize {
        self.lit.iter().filter(|&&l| l).count()
    }
}

fn generate_windows(rect: &RectF, category: Category, rng: &mut SceneRng) -> Vec<WindowElement> {
    let (ww, wh, pitch) = category.window_grid();
    let mut windows = Vec::new();
    let mut y = rect.y + 40.0;
    while y < rect.bottom() - 20.0 {
        let mut x = rect.x + 15.0;
        while x < rect.right() - 15.0 {
            if rng.gen_bool(0.8) {
                windows.push(WindowElement {
                    rect: RectF::new(x, y, ww, wh),
                    broken: rng.gen_bool(0.3),
                    flickering: rng.gen_bool(0.1),
                });
            }
            x += pitch;
        }
        y += pitch;
    }
    windows
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VinePoint {
    pub pos: Point,
    pub size: f32,
    pub leaf: bool,
}

/// Creeper climbing from an anchor towards the top of the frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Vine {
    pub points: Vec<VinePoint>,
}

impl Vine {
    pub fn grow(anchor: Point, rng: &mut SceneRng) -> Self {
        let steps = rng.gen_range(80..150);
        let mut pos = anchor;
        let mut points = Vec::with_capacity(steps);
        for _ in 0..steps {
            pos = pos.offset(rng.gen_range(-4.0..4.0), -rng.gen_range(1.0..4.0));
            if pos.y < 0.0 {
                break;
            }
            points.push(VinePoint {
                pos,
                size: rng.gen_range(1.0..3.0),
                leaf: rng.gen_bool(0.2),
            });
        }
        Self { points }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Crack {
    pub points: Vec<Point>,
}

impl Crack {
    pub fn generate(width: f32, height: f32, rng: &mut SceneRng) -> Self {
        let mut pos = Point::new(
            rng.gen_range(0.0..width),
            rng.gen_range(height * 0.4..height),
        );
        let steps = rng.gen_range(40..100);
        let points = (0..steps)
            .map(|_| {
                pos = pos.offset(rng.gen_range(-3.0..3.0), rng.gen_range(-2.0..4.0));
                pos
            })
            .collect();
        Self { points }
    }
}

/// Static backdrop of the city variants.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityScene {
    pub elements: Vec<StructureElement>,
    pub vines: Vec<Vine>,
    pub cracks: Vec<Crack>,
}

impl CityScene {
    /// Indices of the elements whose interior contains `p`.
    pub fn elements_at(&self, p: Point) -> impl Iterator<Item = usize> + '_ {
        self.elements
            .iter()
            .enumerate()
            .filter(move |(_, e)| e.rect.contains(p))
            .map(|(i, _)| i)
    }

    pub fn lit_windows(&self) -> usize {
        self.elements.iter().map(StructureElement::lit_count).sum()
    }
}

/// Lay out a fresh skyline with its vines and cracks.
pub fn generate_city(width: f32, height: f32, rng: &mut SceneRng) -> CityScene {
    let mut elements = Vec::new();
    let mut x = MARGIN;
    while x < width - MARGIN {
        elements.push(StructureElement::generate(x, height, rng));
        x += rng.gen_range(80.0..150.0);
    }

    let mut vines = Vec::with_capacity(VINES_PER_CITY);
    if !elements.is_empty() {
        for _ in 0..VINES_PER_CITY {
            let rect = elements[rng.gen_range(0..elements.len())].rect;
            let anchor = Point::new(rect.x + rng.gen_range(0.0..rect.w), rect.bottom());
            vines.push(Vine::grow(anchor, rng));
        }
    }

    let cracks = (0..CRACKS_PER_CITY)
        .map(|_| Crack::generate(width, height, rng))
        .collect();

    log::debug!(
        "generated city: {} buildings, {} vines, {} cracks",
        elements.len(),
        vines.len(),
        CRACKS_PER_CITY
    );

    CityScene {
        elements,
        vines,
        cracks,
    }
}

/// Vine anchored at an arbitrary point (the `v` key).
pub fn vine_at(anchor: Point, rng: &mut SceneRng) -> Vine {
    Vine::grow(anchor, rng)
}

pub fn seed_fragments(width: f32, height: f32, rng: &mut SceneRng) -> Vec<Fragment> {
    (0..SEED_FRAGMENTS)
        .map(|_| Fragment::spawn_anywhere(width, height, rng))
        .collect()
}

pub fn seed_secrets(width: f32, height: f32, rng: &mut SceneRng) -> Vec<Secret> {
    (0..SEED_SECRETS)
        .map(|_| Secret::spawn_anywhere(width, height, rng))
        .collect()
}
