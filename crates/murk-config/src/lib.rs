//! Configuration for the murk mood scenes.
//!
//! Settings live in `config.toml` under the platform config directory
//! (`directories::ProjectDirs`). A missing file means defaults; a missing key
//! means that key's default.

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{WrapErr, eyre};
use directories::ProjectDirs;
use murk_core::SceneKind;
use serde::{Deserialize, Serialize};

/// Name of the config file inside the config directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scene variant to run.
    pub scene: SceneKind,
    /// Seed for the scene's random source; `None` seeds from the clock.
    pub seed: Option<u64>,
    /// Target ticks per second.
    pub fps: u32,
    pub assets: AssetConfig,
    pub hypno: HypnoConfig,
    pub features: FeatureConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scene: SceneKind::City,
            seed: None,
            fps: 60,
            assets: AssetConfig::default(),
            hypno: HypnoConfig::default(),
            features: FeatureConfig::default(),
        }
    }
}

/// Image assets resolved before the first frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory the file names below are relative to.
    pub dir: PathBuf,
    /// First alternating full-frame tint image (city scenes).
    pub effect_a: String,
    /// Second alternating full-frame tint image (city scenes).
    pub effect_b: String,
    /// Backdrop for the truth scene.
    pub background: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("assets"),
            effect_a: "effect1.png".to_string(),
            effect_b: "effect2.png".to_string(),
            background: "background.png".to_string(),
        }
    }
}

impl AssetConfig {
    pub fn effect_a_path(&self) -> PathBuf {
        self.dir.join(&self.effect_a)
    }

    pub fn effect_b_path(&self) -> PathBuf {
        self.dir.join(&self.effect_b)
    }

    pub fn background_path(&self) -> PathBuf {
        self.dir.join(&self.background)
    }
}

/// Hypnotic overlay tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HypnoConfig {
    pub intensity: f32,
    pub speed: f32,
    pub wave_amplitude: f32,
    pub spiral_speed: f32,
    pub distortion_strength: f32,
    /// Layer the hypno effect over the chosen particle scene.
    pub overlay: bool,
    /// Run the pixel-level ripple distortion after drawing.
    pub distortion: bool,
}

impl Default for HypnoConfig {
    fn default() -> Self {
        Self {
            intensity: 1.0,
            speed: 0.02,
            wave_amplitude: 50.0,
            spiral_speed: 0.03,
            distortion_strength: 30.0,
            overlay: false,
            distortion: false,
        }
    }
}

/// Optional behaviour that is off by default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Bind `b` to a bird flock fly-by.
    pub birds: bool,
}

impl Config {
    /// Default config file location, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "murk").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load from `path`, or from the default location when `path` is `None`.
    ///
    /// A file that does not exist yields the defaults.
    pub fn load(path: Option<&Path>) -> color_eyre::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => {
                    log::warn!("no config directory available, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !path.exists() {
            log::debug!("config {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = fs::read_to_string(&path)
            .wrap_err_with(|| format!("reading config {}", path.display()))?;
        let config = Self::from_toml(&text)
            .wrap_err_with(|| format!("parsing config {}", path.display()))?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> color_eyre::Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialise to a TOML document.
    pub fn to_toml(&self) -> color_eyre::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write the config to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> color_eyre::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("creating {}", parent.display()))?;
        }
        fs::write(path, self.to_toml()?).wrap_err_with(|| format!("writing {}", path.display()))
    }

    fn validate(&self) -> color_eyre::Result<()> {
        if self.fps == 0 || self.fps > 240 {
            return Err(eyre!("fps must be between 1 and 240, got {}", self.fps));
        }
        Ok(())
    }
}
