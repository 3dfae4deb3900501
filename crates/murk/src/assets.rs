//! Image assets, decoded with the `image` crate before the first frame.

use std::path::Path;

use murk_config::AssetConfig;
use murk_core::SceneKind;
use murk_scene::{Assets, Image};

/// Load the images `kind` draws. A missing or unreadable file is logged and
/// left out; the scene falls back to flat colour.
pub fn load(config: &AssetConfig, kind: SceneKind) -> Assets {
    let mut assets = Assets::default();
    if kind.has_city() {
        assets.effect_a = load_image(&config.effect_a_path());
        assets.effect_b = load_image(&config.effect_b_path());
    }
    if kind == SceneKind::Truth {
        assets.background = load_image(&config.background_path());
    }
    assets
}

pub fn load_image(path: &Path) -> Option<Image> {
    let decoded = match image::open(path) {
        Ok(decoded) => decoded.to_rgba8(),
        Err(err) => {
            log::warn!("skipping asset {}: {err}", path.display());
            return None;
        }
    };
    let (w, h) = decoded.dimensions();
    let image = Image::from_rgba_bytes(w, h, decoded.as_raw());
    if image.is_none() {
        log::warn!("skipping asset {}: unexpected pixel layout", path.display());
    } else {
        log::debug!("loaded asset {} ({w}x{h})", path.display());
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use murk_core::Rgba;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("murk-assets-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_file_is_none() {
        assert!(load_image(Path::new("/definitely/not/here.png")).is_none());
    }

    #[test]
    fn test_png_round_trips_into_image() {
        let dir = scratch_dir("png");
        let path = dir.join("tint.png");
        let mut png = image::RgbaImage::new(3, 2);
        png.put_pixel(2, 1, image::Rgba([1, 2, 3, 255]));
        png.save(&path).unwrap();

        let loaded = load_image(&path).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (3, 2));
        assert_eq!(loaded.get(2, 1), Some(Rgba::new(1, 2, 3, 255)));
        assert_eq!(loaded.get(0, 0), Some(Rgba::new(0, 0, 0, 0)));
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_load_only_what_the_scene_draws() {
        let dir = scratch_dir("kinds");
        image::RgbaImage::new(1, 1).save(dir.join("background.png")).unwrap();
        image::RgbaImage::new(1, 1).save(dir.join("effect1.png")).unwrap();
        let config = AssetConfig {
            dir: dir.clone(),
            ..AssetConfig::default()
        };

        let truth = load(&config, SceneKind::Truth);
        assert!(truth.background.is_some());
        assert!(truth.effect_a.is_none());

        let city = load(&config, SceneKind::City);
        assert!(city.effect_a.is_some());
        assert!(city.effect_b.is_none());
        assert!(city.background.is_none());
        std::fs::remove_dir_all(dir).ok();
    }
}
