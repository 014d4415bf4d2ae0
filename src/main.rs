mod animation;
mod clock;
mod config;
mod error;
mod graphics;
mod math;
mod params;
mod segment;
mod session;
mod state;

use animation::AnimationLoop;
use anyhow::Context;
use clap::Parser;
use clock::{Control, FrameClock};
use config::{Args, Settings};
use error::Error;
use graphics::{Renderer, TerminalRenderer};
use log::info;
use params::ParameterGenerator;
use session::TerminalSession;
use std::fs::File;
use std::io::{self, Stdout};
use std::path::Path;

/// Sends logs to `path` when given; the terminal itself is owned by the animation
fn init_logging(path: Option<&Path>) -> anyhow::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let log_file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();
    Ok(())
}

/// Feeds each wake requested by the animation back into it until the user quits
fn run(
    animation: &mut AnimationLoop,
    renderer: &mut TerminalRenderer<Stdout>,
    clock: &mut FrameClock,
) -> Result<(), Error> {
    let mut wake = animation.start(renderer)?;
    loop {
        if clock.wait(wake)? == Control::Quit {
            info!(
                "quit requested in {:?} at angle {:.2} after {} cycles, geometry {:?}",
                animation.phase(),
                animation.state().angle,
                animation.generations(),
                animation.geometry()
            );
            return Ok(());
        }
        wake = animation.tick(renderer)?;
    }
}

/// Main function
fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let mut renderer =
        TerminalRenderer::stdout(args.height).context("failed to open the terminal surface")?;
    let settings = Settings::resolve(&args, renderer.measure_surface())?;
    info!("seed: {:?}, settings: {:?}", args.seed, settings);

    let generator = ParameterGenerator::from_seed(args.seed, settings.max_line, settings.center);
    let mut clock = FrameClock::new(settings.frame_interval);
    let mut animation = AnimationLoop::new(settings, generator);

    let mut session = TerminalSession::enter(io::stdout())?;
    session.enable_raw_mode()?;

    let result = run(&mut animation, &mut renderer, &mut clock);
    drop(session);

    result.context("animation loop failed")
}
