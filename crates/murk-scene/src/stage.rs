//! The stage: whichever variant is running, behind one interface.

use murk_core::{AtmosphereMode, SceneKind};

use crate::hypno::HypnoEffect;
use crate::input::InputEvent;
use crate::render;
use crate::state::SceneState;
use crate::stats::{Stats, Weather};
use crate::surface::Surface;

/// Logical units per host pixel for the hypno layer, which spans the viewport.
pub const HYPNO_SCALE: f32 = 10.0;

pub fn hypno_logical_size(pixel_w: u32, pixel_h: u32) -> (f32, f32) {
    (pixel_w as f32 * HYPNO_SCALE, pixel_h as f32 * HYPNO_SCALE)
}

#[derive(Debug, Clone)]
pub enum Stage {
    Scene(Box<SceneState>),
    Hypno {
        effect: HypnoEffect,
        /// Scene the effect is laid over; a white page when absent.
        host: Option<Box<SceneState>>,
    },
}

impl Stage {
    pub fn kind(&self) -> SceneKind {
        match self {
            Self::Scene(state) => state.kind(),
            Self::Hypno { .. } => SceneKind::Hypno,
        }
    }

    /// Logical size pointer coordinates are expressed in.
    pub fn logical_size(&self) -> (f32, f32) {
        match self {
            Self::Scene(state) => state.size(),
            Self::Hypno {
                host: Some(state), ..
            } => state.size(),
            Self::Hypno { effect, host: None } => {
                let (w, h) = effect.layer().pixel_size();
                hypno_logical_size(w, h)
            }
        }
    }

    /// Host pixel size the stage is rasterised for.
    pub fn pixel_size(&self) -> (u32, u32) {
        match self {
            Self::Scene(state) => state.layers().pixel_size(),
            Self::Hypno { effect, .. } => effect.layer().pixel_size(),
        }
    }

    /// The hypno effect, when this stage runs one.
    pub fn hypno_mut(&mut self) -> Option<&mut HypnoEffect> {
        match self {
            Self::Scene(_) => None,
            Self::Hypno { effect, .. } => Some(effect),
        }
    }

    pub fn step(&mut self, dt: f32) {
        match self {
            Self::Scene(state) => state.step(dt),
            Self::Hypno { effect, host } => {
                if let Some(state) = host {
                    state.step(dt);
                }
                effect.step();
            }
        }
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        match self {
            Self::Scene(state) => render::render(state, surface),
            Self::Hypno {
                effect,
                host: Some(state),
            } => {
                render::render(state, surface);
                effect.composite(surface);
            }
            Self::Hypno { effect, host: None } => effect.render(surface),
        }
    }

    pub fn handle(&mut self, event: InputEvent) {
        if let InputEvent::Resize { width, height } = event {
            self.resize(width, height);
            return;
        }
        match self {
            Self::Scene(state) => state.handle(event),
            Self::Hypno {
                host: Some(state), ..
            } => state.handle(event),
            Self::Hypno { host: None, .. } => {}
        }
    }

    pub fn resize(&mut self, pixel_w: u32, pixel_h: u32) {
        match self {
            Self::Scene(state) => state.resize(pixel_w, pixel_h),
            Self::Hypno { effect, host } => {
                if let Some(state) = host {
                    state.resize(pixel_w, pixel_h);
                }
                let logical = match host {
                    Some(state) => state.size(),
                    None => hypno_logical_size(pixel_w, pixel_h),
                };
                effect.resize((pixel_w, pixel_h), logical);
            }
        }
    }

    pub fn stats(&self) -> Stats {
        match self {
            Self::Scene(state) => state.stats(),
            Self::Hypno {
                host: Some(state), ..
            } => Stats {
                scene: SceneKind::Hypno,
                ..state.stats()
            },
            Self::Hypno { effect, host: None } => Stats {
                scene: SceneKind::Hypno,
                frame: effect.time() as u64,
                live_entities: 0,
                atmosphere: AtmosphereMode::Normal,
                weather: Weather::Clear,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::hypno::HypnoSettings;
    use crate::input::SceneKey;
    use murk_core::Rgba;

    fn hypno(host: Option<Box<SceneState>>) -> Stage {
        let logical = hypno_logical_size(20, 12);
        Stage::Hypno {
            effect: HypnoEffect::new(HypnoSettings::default(), (20, 12), logical),
            host,
        }
    }

    #[test]
    fn test_scene_stage_forwards_input() {
        let mut stage = Stage::Scene(Box::new(SceneState::new(SceneKind::City, 1, (20, 12))));
        stage.handle(InputEvent::Key(SceneKey::ToggleWeather));
        assert_eq!(stage.stats().weather, Weather::Rain);
        assert_eq!(stage.logical_size(), (1920.0, 1080.0));
    }

    #[test]
    fn test_lone_hypno_stats() {
        let mut stage = hypno(None);
        stage.step(1.0 / 60.0);
        let stats = stage.stats();
        assert_eq!(stats.scene, SceneKind::Hypno);
        assert_eq!(stats.frame, 1);
        assert_eq!(stats.live_entities, 0);
        assert_eq!(stage.logical_size(), (200.0, 120.0));
    }

    #[test]
    fn test_hypno_over_host_counts_host_entities() {
        let host = SceneState::new(SceneKind::City, 1, (20, 12));
        let mut stage = hypno(Some(Box::new(host)));
        stage.step(1.0 / 60.0);
        assert_eq!(stage.stats().live_entities, crate::state::DUST_MOTES);

        let mut canvas = Canvas::new(20, 12, 1920.0, 1080.0);
        stage.render(&mut canvas);
        assert!(canvas.image().pixels().iter().any(|p| *p != Rgba::WHITE));
    }

    #[test]
    fn test_hypno_mut_only_on_hypno() {
        let mut scene = Stage::Scene(Box::new(SceneState::new(SceneKind::Truth, 1, (20, 12))));
        assert!(scene.hypno_mut().is_none());

        let mut stage = hypno(None);
        if let Some(effect) = stage.hypno_mut() {
            effect.set_intensity(1.5);
        }
        assert!(matches!(&stage, Stage::Hypno { effect, .. } if effect.settings().intensity == 1.5));
    }

    #[test]
    fn test_resize_tracks_viewport() {
        let mut stage = hypno(None);
        stage.handle(InputEvent::Resize {
            width: 30,
            height: 10,
        });
        assert_eq!(stage.logical_size(), (300.0, 100.0));
        assert_eq!(stage.pixel_size(), (30, 10));
    }
}
