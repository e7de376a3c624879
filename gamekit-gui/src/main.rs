use std::path::PathBuf;

use clap::Parser;
use eframe::egui;
use gamekit::prelude::*;

pub mod app;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Game config JSON file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Random seed for reproducible rolls
    #[arg(long, default_value = None)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut config = GameConfig::load_or_default(args.config.as_deref())?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let initial_size = (config.window_width as f32, config.window_height as f32);
    let title = config.title.clone();
    let game = DiceGame::new(config)?;
    log::info!(
        "Starting with {} dice: press 1-{} to roll",
        game.dice().len(),
        game.dice().len().min(9)
    );

    let options = eframe::NativeOptions {
        window_builder: Some(Box::new(move |wb| {
            wb.with_inner_size(egui::Vec2::new(initial_size.0, initial_size.1))
                .with_resizable(true)
        })),
        ..Default::default()
    };
    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| Ok(Box::new(app::App::new(game)))),
    )
    .map_err(|e| anyhow::anyhow!("{}", e))
}
