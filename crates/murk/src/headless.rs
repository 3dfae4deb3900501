//! Runs a stage without a terminal: fixed ticks, stats as JSON lines, the
//! last frame as a PNG.

use std::io::Write;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{WrapErr, eyre};
use murk_scene::{Canvas, Image, Stage, Stats, StatsSink};

/// Fixed step used for every headless tick.
const DT: f32 = 1.0 / 60.0;

#[derive(Debug, Clone)]
pub struct Options {
    pub frames: u64,
    pub out: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Writes one JSON object per report.
pub struct JsonLines<W: Write> {
    writer: W,
    broken: bool,
}

impl<W: Write> JsonLines<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            broken: false,
        }
    }
}

impl<W: Write> StatsSink for JsonLines<W> {
    fn report(&mut self, stats: &Stats) {
        if self.broken {
            return;
        }
        let written = serde_json::to_writer(&mut self.writer, stats)
            .map_err(std::io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"));
        if let Err(err) = written {
            log::error!("stats output closed: {err}");
            self.broken = true;
        }
    }
}

pub fn run(
    mut stage: Stage,
    options: &Options,
    sink: &mut dyn StatsSink,
) -> color_eyre::Result<()> {
    let (lw, lh) = stage.logical_size();
    let mut canvas = Canvas::new(options.width, options.height, lw, lh);

    for _ in 0..options.frames {
        stage.step(DT);
        sink.report(&stage.stats());
    }
    stage.render(&mut canvas);

    write_png(canvas.image(), &options.out)?;
    log::info!(
        "wrote {} after {} ticks",
        options.out.display(),
        options.frames
    );
    Ok(())
}

pub fn write_png(image: &Image, path: &Path) -> color_eyre::Result<()> {
    let (w, h) = (image.width(), image.height());
    let buffer = image::RgbaImage::from_raw(w, h, image.to_rgba_bytes())
        .ok_or_else(|| eyre!("frame buffer does not match {w}x{h}"))?;
    buffer
        .save(path)
        .wrap_err_with(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use murk_core::SceneKind;
    use murk_scene::SceneState;

    fn out_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("murk-headless-{name}-{}.png", std::process::id()))
    }

    #[test]
    fn test_run_reports_every_tick_and_writes_png() {
        let stage = Stage::Scene(Box::new(SceneState::new(SceneKind::Truth, 5, (48, 27))));
        let options = Options {
            frames: 4,
            out: out_path("run"),
            width: 48,
            height: 27,
        };
        let mut reports: Vec<Stats> = Vec::new();
        run(stage, &options, &mut reports).unwrap();

        let frames: Vec<u64> = reports.iter().map(|s| s.frame).collect();
        assert_eq!(frames, vec![1, 2, 3, 4]);

        let png = image::open(&options.out).unwrap().to_rgba8();
        assert_eq!(png.dimensions(), (48, 27));
        std::fs::remove_file(&options.out).ok();
    }

    #[test]
    fn test_json_lines_sink() {
        let stage = Stage::Scene(Box::new(SceneState::new(SceneKind::City, 5, (16, 9))));
        let mut sink = JsonLines::new(Vec::new());
        sink.report(&stage.stats());
        sink.report(&stage.stats());

        let text = String::from_utf8(sink.writer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["scene"], "city");
        assert_eq!(value["weather"], "Clear");
    }

    #[test]
    fn test_write_png_into_missing_dir_fails_with_context() {
        let path = Path::new("/definitely/not/here/frame.png");
        let err = write_png(&Image::new(2, 2), path).unwrap_err();
        assert!(format!("{err:#}").contains("writing /definitely/not/here/frame.png"));
    }
}
