//! Headless preview: run an effect config and log what it does.
//!
//! ```text
//! spritefx-preview <config.json> [--frames N] [--fps F] [--kind basic|path|animated]
//! ```
//!
//! Set `RUST_LOG=debug` to see emitter diagnostics.

use clap::{Parser, ValueEnum};
use spritefx::prelude::*;
use spritefx::ConfigError;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "spritefx-preview")]
#[command(about = "Run a particle effect config without a renderer and log its particle counts", long_about = None)]
struct Cli {
    /// Emitter config (JSON)
    config: PathBuf,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 300)]
    frames: u32,

    /// Simulated frames per second
    #[arg(long, default_value_t = 60.0, value_parser = parse_fps)]
    fps: f32,

    /// Particle variant to spawn
    #[arg(short, long, value_enum, default_value_t = Kind::Basic)]
    kind: Kind,
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    /// Straight-line particles
    Basic,
    /// Particles following `extraData.path`
    Path,
    /// Eight-frame animated particles
    Animated,
}

impl From<Kind> for ParticleKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Basic => ParticleKind::Basic,
            Kind::Path => ParticleKind::Path,
            Kind::Animated => ParticleKind::Animated,
        }
    }
}

fn parse_fps(value: &str) -> Result<f32, String> {
    let fps: f32 = value.parse().map_err(|e| format!("{e}"))?;
    if fps > 0.0 && fps.is_finite() {
        Ok(fps)
    } else {
        Err(format!("fps must be a positive number, got {fps}"))
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match run(&cli.config, cli.frames, cli.fps, cli.kind.into()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(path: &Path, frames: u32, fps: f32, kind: ParticleKind) -> Result<(), ConfigError> {
    let config = EmitterConfig::load(path)?;
    let art = match kind {
        ParticleKind::Animated => vec![ParticleArt::Frames(
            (0..8).map(|i| TextureHandle::in_atlas(i, 0)).collect(),
        )],
        _ => vec![TextureHandle::new(0).into()],
    };

    let mut emitter = Emitter::new(DisplayList::new()).with_particle_kind(kind);
    emitter.init(art, &config);

    let delta = 1.0 / fps;
    let log_every = (fps.round() as u32).max(1);
    let mut instances = Vec::new();
    let mut peak = 0;
    for frame in 0..frames {
        emitter.update(delta);
        instances.clear();
        emitter.write_instances(&mut instances);
        peak = peak.max(instances.len());

        if frame % log_every == 0 {
            log::info!(
                "t={:.2}s live={} pooled={} drawn={}",
                frame as f32 * delta,
                emitter.particle_count(),
                emitter.pool_len(),
                instances.len()
            );
        }
        if emitter.no_more_particles() {
            log::info!("Effect finished after {:.2}s", (frame + 1) as f32 * delta);
            break;
        }
    }

    log::info!(
        "Peak {} particles, {} bytes of instance data",
        peak,
        peak * std::mem::size_of::<ParticleInstance>()
    );
    let container = emitter.destroy();
    log::debug!("Container held {} particles at teardown", container.len());
    Ok(())
}
