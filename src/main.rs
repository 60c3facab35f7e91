mod clock;
mod config;
mod geometry;
mod graphics;
mod math;
mod orbit;
mod panel;
mod parallax;
mod renderer;
mod rotation;
mod scene;
mod scheduler;
mod state;
mod vertex;
mod widget;

use crate::clock::SystemClock;
use crate::config::Config;
use crate::renderer::TerminalRenderer;
use crate::scene::Scene;
use crate::state::{AppState, ViewportSize};
use crate::widget::{SceneWidget, WidgetOptions};
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    style::ResetColor,
    terminal::{self, DisableLineWrap, EnableLineWrap, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Raw-mode alternate screen with mouse capture, restored on drop
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        let guard = TerminalGuard;
        execute!(
            io::stdout(),
            EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            DisableLineWrap
        )
        .context("failed to prepare terminal")?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = io::stdout();
        if let Err(err) = execute!(
            out,
            ResetColor,
            DisableMouseCapture,
            cursor::Show,
            EnableLineWrap,
            LeaveAlternateScreen
        ) {
            log::error!("failed to restore terminal: {err}");
        }
        if let Err(err) = terminal::disable_raw_mode() {
            log::error!("failed to disable raw mode: {err}");
        }
        let _ = out.flush();
    }
}

/// Used when `RUST_LOG` asks for logs but no `--log-file` was given
const DEFAULT_LOG_FILE: &str = "orbitscene.log";

/// Where logs are written; stderr is the alternate screen while the scene runs
fn log_destination(log_file: Option<&Path>, rust_log_set: bool) -> Option<PathBuf> {
    match log_file {
        Some(path) => Some(path.to_path_buf()),
        None if rust_log_set => Some(PathBuf::from(DEFAULT_LOG_FILE)),
        None => None,
    }
}

/// Initializes logging from `RUST_LOG`, into a file whenever logging is enabled
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let rust_log_set = std::env::var_os("RUST_LOG").is_some();
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(path) = log_destination(log_file, rust_log_set) {
        if log_file.is_none() {
            eprintln!("RUST_LOG is set, writing logs to {}", path.display());
        }
        let file = File::create(&path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
        if !rust_log_set {
            builder.filter_level(log::LevelFilter::Info);
        }
    }
    builder.try_init().context("failed to initialize logger")?;
    Ok(())
}

/// Current terminal size in cells
fn initial_viewport() -> ViewportSize {
    if let Some(size) = termsize::get() {
        return ViewportSize::new(size.cols, size.rows);
    }
    match terminal::size() {
        Ok((width, height)) => ViewportSize::new(width, height),
        Err(err) => {
            log::warn!("terminal size unavailable ({err}), assuming 80x24");
            ViewportSize::new(80, 24)
        }
    }
}

/// Drives display refreshes at `interval`, feeding input events in between
fn run<W: Write>(
    widget: &mut SceneWidget<SystemClock>,
    renderer: &mut TerminalRenderer<W>,
    interval: Duration,
) -> Result<()> {
    widget.start(renderer)?;
    let mut next_refresh = Instant::now() + interval;

    while widget.is_running() {
        let now = Instant::now();
        if now >= next_refresh {
            widget.refresh(renderer)?;
            next_refresh = (next_refresh + interval).max(now);
            continue;
        }
        if event::poll(next_refresh - now).context("failed to poll terminal events")? {
            let event = event::read().context("failed to read terminal event")?;
            widget.event(&event, renderer);
        }
    }
    Ok(())
}

/// Main function
fn main() -> Result<()> {
    let config = Config::parse();
    init_logging(config.log_file.as_deref())?;

    let viewport = initial_viewport();
    let options = WidgetOptions {
        cell_aspect: config.cell_aspect,
        wheel_step: config.wheel_step,
    };
    let mut rng = config.rng();
    let scene = Scene::new(
        config.material(),
        config.particles,
        viewport.aspect(options.cell_aspect),
        &mut rng,
    );

    let mut state = AppState::new(viewport);
    state.debug = config.debug;
    state.wireframe = config.wireframe;

    let mut widget = SceneWidget::new(scene, state, SystemClock::new(), options);
    let mut renderer = TerminalRenderer::new(io::stdout(), viewport);

    let _guard = TerminalGuard::enter()?;
    run(&mut widget, &mut renderer, config.frame_interval())
}
