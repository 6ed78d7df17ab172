use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing::level_filters::LevelFilter;
use wisp::Gameboy;
use wisp::UnimplementedPolicy;

pub mod capture;
pub mod config;
pub mod error;
pub mod run;

use config::Config;
use error::LanternError;
use run::Limits;
use run::StopReason;

/// Runs a ROM headlessly and reports how far it got.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// The ROM image to run.
    rom: PathBuf,
    /// A TOML config file. Flags given on the command line take precedence over it.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// The number of frames to render before stopping.
    #[arg(short, long)]
    frames: Option<u64>,
    /// The most instructions to run, regardless of frames.
    #[arg(long)]
    max_steps: Option<u64>,
    /// Writes the last frame to this path as a PNG.
    #[arg(long)]
    dump_frame: Option<PathBuf>,
    /// Hide the first page of the ROM until PC reaches 0x0100.
    #[arg(long)]
    boot_overlay: bool,
    /// Log and skip unimplemented op codes rather than stopping.
    #[arg(long)]
    skip_unimplemented: bool,
    /// Increases the log level. Can be given up to three times.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Folds the flags into the config from the file.
    fn apply(&self, config: &mut Config) {
        if self.frames.is_some() {
            config.frames = self.frames;
        }
        if self.max_steps.is_some() {
            config.max_steps = self.max_steps;
        }
        if self.boot_overlay {
            config.core.boot_overlay = true;
        }
        if self.skip_unimplemented {
            config.core.unimplemented_opcode = UnimplementedPolicy::Skip;
        }
    }

    fn level(&self, config: &Config) -> Result<LevelFilter, LanternError> {
        let level = match self.verbose {
            0 => config.level()?.unwrap_or(LevelFilter::WARN),
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        };
        Ok(level)
    }
}

fn main() -> ExitCode {
    match lantern(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("lantern: {err}");
            ExitCode::FAILURE
        }
    }
}

fn lantern(args: Args) -> Result<(), LanternError> {
    let mut config = Config::load(args.config.as_deref())?;
    args.apply(&mut config);
    tracing_subscriber::fmt()
        .with_max_level(args.level(&config)?)
        .with_writer(std::io::stderr)
        .init();

    let rom = std::fs::read(&args.rom).map_err(|e| LanternError::io(&args.rom, e))?;
    info!("Loaded {} bytes from {}", rom.len(), args.rom.display());
    let mut gb = Gameboy::new(rom, config.core.clone())?;

    let limits = Limits {
        frames: config.frames.unwrap_or(1),
        max_steps: config.max_steps,
    };
    let summary = run::run(&mut gb, limits);
    println!("{summary}");

    if let Some(path) = &args.dump_frame {
        capture::save_frame(gb.frame(), &config.core.palette, path)?;
        info!("Wrote the last frame to {}", path.display());
    }
    match summary.stop {
        StopReason::Fault(err) => Err(err.into()),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_the_config_file() {
        let args = Args::try_parse_from([
            "lantern",
            "game.gb",
            "--frames",
            "5",
            "--skip-unimplemented",
            "-vv",
        ])
        .unwrap();
        let mut config = Config {
            frames: Some(60),
            max_steps: Some(100),
            ..Config::default()
        };
        args.apply(&mut config);
        assert_eq!(config.frames, Some(5));
        assert_eq!(config.max_steps, Some(100));
        assert!(!config.core.boot_overlay);
        assert_eq!(config.core.unimplemented_opcode, UnimplementedPolicy::Skip);
        assert_eq!(args.level(&config).unwrap(), LevelFilter::DEBUG);
    }

    #[test]
    fn level_falls_back_to_the_config() {
        let args = Args::try_parse_from(["lantern", "game.gb"]).unwrap();
        let config = Config {
            log_level: Some("trace".into()),
            ..Config::default()
        };
        assert_eq!(args.level(&config).unwrap(), LevelFilter::TRACE);
        assert_eq!(args.level(&Config::default()).unwrap(), LevelFilter::WARN);
    }
}
