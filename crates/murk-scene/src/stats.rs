//! Per-tick scene statistics and where they are reported.

use std::fmt;

use murk_core::{AtmosphereMode, SceneKind};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Weather {
    Rain,
    Clear,
    /// Truth scene, shattered.
    Broken,
    /// Truth scene, whole.
    Stable,
}

impl Weather {
    pub fn label(self) -> &'static str {
        match self {
            Self::Rain => "Rain",
            Self::Clear => "Clear",
            Self::Broken => "Broken",
            Self::Stable => "Stable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub scene: SceneKind,
    pub frame: u64,
    pub live_entities: usize,
    pub atmosphere: AtmosphereMode,
    pub weather: Weather,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Particles: {}  Atmosphere: {}  Weather: {}",
            self.live_entities,
            self.atmosphere.label(),
            self.weather.label()
        )
    }
}

/// Receives the stats of every tick.
pub trait StatsSink {
    fn report(&mut self, stats: &Stats);
}

/// Collects every report; handy for tests and replays.
impl StatsSink for Vec<Stats> {
    fn report(&mut self, stats: &Stats) {
        self.push(stats.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_line() {
        let stats = Stats {
            scene: SceneKind::City,
            frame: 3,
            live_entities: 42,
            atmosphere: AtmosphereMode::Storm,
            weather: Weather::Rain,
        };
        assert_eq!(
            stats.to_string(),
            "Particles: 42  Atmosphere: Storm  Weather: Rain"
        );
    }

    #[test]
    fn test_serializes_flat() {
        let stats = Stats {
            scene: SceneKind::Truth,
            frame: 0,
            live_entities: 50,
            atmosphere: AtmosphereMode::Normal,
            weather: Weather::Stable,
        };
        let json = serde_json::to_string(&stats).expect("stats serialize");
        assert_eq!(
            json,
            r#"{"scene":"truth","frame":0,"live_entities":50,"atmosphere":"Normal","weather":"Stable"}"#
        );
    }
}
