//! Greed entry point
//!
//! Parses the command line, loads settings and runs the director on either
//! the terminal or the headless backend.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use greed::platform::headless::{HeadlessVideo, ScriptedKeyboard};
use greed::platform::terminal;
use greed::sim::{Director, build_cast};
use greed::Settings;

#[derive(Parser, Debug)]
#[command(name = "greed")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings file (JSON)
    #[arg(short = 'c', long, env = "GREED_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// RNG seed for a reproducible run
    #[arg(short = 's', long)]
    seed: Option<u64>,

    /// Playfield width in cells
    #[arg(long)]
    width: Option<u16>,

    /// Playfield height in cells
    #[arg(long)]
    height: Option<u16>,

    /// Run without a terminal UI (no input, nothing drawn)
    #[arg(long)]
    headless: bool,

    /// Frames to simulate in headless mode
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Let artifacts pile up below the screen instead of dropping them
    #[arg(long)]
    keep_offscreen: bool,
}

impl Args {
    fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if let Some(seed) = self.seed {
            settings.seed = Some(seed);
        }
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
        if self.keep_offscreen {
            settings.cull_offscreen = false;
        }
        settings.validate()?;
        Ok(settings)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let settings = args.settings().context("could not load settings")?;
    log::info!("{} starting...", settings.caption);

    let mut cast = build_cast(&settings);

    if args.headless {
        let video = HeadlessVideo::from_settings(&settings, args.frames);
        let mut director = Director::from_settings(ScriptedKeyboard::default(), video, &settings);
        director.start_game(&mut cast).context("headless run failed")?;
        println!(
            "{} frames, score {}, {} artifacts in play",
            director.frame(),
            cast.get_score(),
            cast.len(greed::sim::ARTIFACTS)
        );
    } else {
        let (keyboard, video) = terminal::open(&settings);
        let mut director = Director::from_settings(keyboard, video, &settings);
        director.start_game(&mut cast).context("terminal session failed")?;
        println!("Final score: {}", cast.get_score());
    }

    Ok(())
}
