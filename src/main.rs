mod app;
mod watchers;

use std::error::Error;
use std::fs::File;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use verdant_runtime::AvatarInput;
use verdant_world::WorldGenParams;
use verdant_world::worldgen::load_params_from_path;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Walk {
    Right,
    Left,
    Idle,
}

impl Walk {
    pub fn input(self) -> AvatarInput {
        AvatarInput {
            left: self == Walk::Left,
            right: self == Walk::Right,
            ..AvatarInput::default()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "verdant", about = "Endless procedural side-scroller")]
pub struct Args {
    /// World config (TOML). Missing sections fall back to defaults.
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub seed: Option<i64>,
    #[arg(long)]
    pub width: Option<f32>,
    #[arg(long)]
    pub height: Option<f32>,
    /// Run this many 60 Hz ticks without a window, then exit.
    #[arg(long, value_name = "TICKS")]
    pub headless: Option<u64>,
    /// Scripted input for headless runs.
    #[arg(long, value_enum, default_value_t = Walk::Idle)]
    pub walk: Walk,
    /// Re-apply [leaves] and [day] when the config file changes.
    #[arg(long)]
    pub watch_config: bool,
    #[arg(long, default_value = "info")]
    pub log_level: LevelFilter,
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

fn init_logging(args: &Args) -> Result<(), Box<dyn Error>> {
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .set_thread_level(LevelFilter::Off)
        .build();
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        args.log_level,
        config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = &args.log_file {
        loggers.push(WriteLogger::new(args.log_level, config, File::create(path)?));
    }
    CombinedLogger::init(loggers)?;
    Ok(())
}

fn load_params(args: &Args) -> Result<WorldGenParams, Box<dyn Error>> {
    let mut params = match &args.config {
        Some(path) => load_params_from_path(path)?,
        None => WorldGenParams::default(),
    };
    if let Some(seed) = args.seed {
        params.seed = seed;
    }
    if let Some(w) = args.width {
        params.window_width = w;
    }
    if let Some(h) = args.height {
        params.window_height = h;
    }
    params.validate()?;
    Ok(params)
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let params = load_params(args)?;
    log::info!(
        "seed={} window={}x{} block={} frames={}",
        params.seed,
        params.window_width,
        params.window_height,
        params.block_size,
        params.frames_in_window
    );
    match args.headless {
        Some(ticks) => app::run_headless(params, ticks, args.walk.input()),
        None => app::run_windowed(params, args),
    }
}

fn main() {
    let args = Args::parse();
    if let Err(e) = init_logging(&args) {
        eprintln!("logger setup failed: {}", e);
    }
    if let Err(e) = run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
