use thirdlaw::{load_config, run_2d, run_headless, HeadlessOptions, LabConfig, SimulationKind};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short, default_value = "default.yaml")]
    file_name: String,

    /// Run this many frames without a window, then exit
    #[arg(long, value_name = "FRAMES")]
    headless: Option<u64>,

    /// Strike once at startup (headless)
    #[arg(long)]
    strike: bool,

    /// Pace headless frames against the wall clock
    #[arg(long)]
    realtime: bool,

    /// Simulation shown first, overrides the scenario file
    #[arg(long, value_enum)]
    simulation: Option<SimulationKind>,

    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }

    fn bevy(self) -> bevy::log::Level {
        match self {
            LogLevel::Error => bevy::log::Level::ERROR,
            LogLevel::Warn => bevy::log::Level::WARN,
            LogLevel::Info => bevy::log::Level::INFO,
            LogLevel::Debug => bevy::log::Level::DEBUG,
            LogLevel::Trace => bevy::log::Level::TRACE,
        }
    }
}

// load here to keep main clean
fn load_lab_config(args: &Args) -> Result<LabConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(&args.file_name);
    let mut cfg = load_config(&config_path).with_context(|| format!("failed to load scenario {}", config_path.display()))?;

    if let Some(simulation) = args.simulation {
        cfg.start.simulation = simulation;
    }
    Ok(cfg)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let cfg = load_lab_config(&args)?;

    match args.headless {
        Some(frames) => {
            env_logger::Builder::new().filter_level(args.log_level.filter()).init();
            let options = HeadlessOptions {
                frames,
                strike: args.strike,
                realtime: args.realtime,
                ..Default::default()
            };
            let report = run_headless(&cfg, options);
            let phases: Vec<&str> = report.phases.iter().map(|p| p.label()).collect();
            println!("{} ticks, contact phases: {}", report.ticks, phases.join(" -> "));
            println!("{}", report.final_status);
        }
        None => run_2d(&cfg, args.log_level.bevy()),
    }

    Ok(())
}
