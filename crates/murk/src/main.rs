mod app;
mod assets;
mod headless;
mod view;

use std::fs::File;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use color_eyre::eyre::WrapErr;
use directories::ProjectDirs;
use murk_config::Config;
use murk_core::SceneKind;
use murk_scene::{HypnoEffect, HypnoSettings, SceneState, Stage, hypno_logical_size};
use ratatui::DefaultTerminal;

use app::App;

#[derive(Parser, Debug)]
#[command(name = "murk")]
#[command(about = "Generative mood scenes: a decaying city, its aftermath, shattered truth and a hypnotic overlay")]
struct Cli {
    /// Scene to run (city, aftermath, truth, hypno)
    #[arg(short, long)]
    scene: Option<SceneKind>,

    /// Seed for the scene's random source
    #[arg(long)]
    seed: Option<u64>,

    /// Target ticks per second
    #[arg(long)]
    fps: Option<u32>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Render without a terminal and write the last frame as a PNG
    #[arg(long)]
    headless: bool,

    /// Ticks to run in headless mode
    #[arg(long, default_value_t = 300)]
    frames: u64,

    /// PNG written by headless mode
    #[arg(short, long, value_name = "FILE", default_value = "murk.png")]
    out: PathBuf,

    /// Headless canvas width in pixels
    #[arg(long, default_value_t = 480)]
    width: u32,

    /// Headless canvas height in pixels
    #[arg(long, default_value_t = 270)]
    height: u32,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(cli.headless)?;

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(scene) = cli.scene {
        config.scene = scene;
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(fps) = cli.fps {
        config.fps = fps.clamp(1, 240);
    }
    let seed = config.seed.unwrap_or_else(clock_seed);
    log::info!("starting {} (seed {seed}, {} fps)", config.scene, config.fps);

    if cli.headless {
        let options = headless::Options {
            frames: cli.frames,
            out: cli.out,
            width: cli.width.max(1),
            height: cli.height.max(1),
        };
        let stage = build_stage(&config, seed, (options.width, options.height));
        let stdout = std::io::stdout();
        return headless::run(stage, &options, &mut headless::JsonLines::new(stdout.lock()));
    }

    let terminal = ratatui::init();
    let result = run_terminal(terminal, &config, seed);
    ratatui::restore();
    result
}

fn run_terminal(
    terminal: DefaultTerminal,
    config: &Config,
    seed: u64,
) -> color_eyre::Result<()> {
    let size = terminal.size().wrap_err("reading terminal size")?;
    let stage = build_stage(config, seed, app::canvas_size(size.width, size.height));
    App::new(stage, config.fps).run(terminal)
}

/// Build the stage the config asks for at the given canvas size.
fn build_stage(config: &Config, seed: u64, pixel_size: (u32, u32)) -> Stage {
    let scene = |kind: SceneKind| {
        let state = SceneState::new(kind, seed, pixel_size)
            .with_assets(assets::load(&config.assets, kind))
            .with_birds(config.features.birds);
        Box::new(state)
    };

    if config.scene != SceneKind::Hypno {
        return Stage::Scene(scene(config.scene));
    }

    let h = &config.hypno;
    let settings = HypnoSettings {
        intensity: h.intensity,
        speed: h.speed,
        wave_amplitude: h.wave_amplitude,
        spiral_speed: h.spiral_speed,
        distortion_strength: h.distortion_strength,
        distortion: h.distortion,
    };
    let host = h.overlay.then(|| scene(SceneKind::City));
    let logical = match &host {
        Some(state) => state.size(),
        None => hypno_logical_size(pixel_size.0, pixel_size.1),
    };
    let effect = HypnoEffect::new(settings, pixel_size, logical);
    Stage::Hypno { effect, host }
}

/// Terminal mode logs to a file so the screen stays clean; headless logs to stderr.
fn init_logging(headless: bool) -> color_eyre::Result<()> {
    let env = env_logger::Env::default().default_filter_or("warn");
    let mut builder = env_logger::Builder::from_env(env);

    if !headless {
        if let Some(dirs) = ProjectDirs::from("", "", "murk") {
            let dir = dirs.data_dir();
            std::fs::create_dir_all(dir)
                .wrap_err_with(|| format!("creating {}", dir.display()))?;
            let path = dir.join("murk.log");
            let file =
                File::create(&path).wrap_err_with(|| format!("creating {}", path.display()))?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        } else {
            builder.filter_level(log::LevelFilter::Off);
        }
    }

    builder.init();
    Ok(())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
