use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gamekit::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Game config JSON file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long, default_value = None, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Roll a die one or more times
    Roll {
        /// Die type: d4, d6, d6alt, d8, d10, d12 or d20
        die: DieType,

        /// Number of rolls
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },
    /// Put a die on a specific face and show which sprite it resolves to
    Set {
        /// Die type: d4, d6, d6alt, d8, d10, d12 or d20
        die: DieType,

        /// Face value, starting at 1
        face: u32,
    },
    /// Print the face count and sprite start of every die type
    Table,
    /// Render the sprite sheet with index captions to a PNG file
    Sheet {
        /// Output file path
        #[arg(short, long, default_value = "sheet.png")]
        output: PathBuf,
    },
}

fn describe(sprite: Option<&Sprite>) -> String {
    match sprite {
        Some(sprite) => format!("sprite {} at {}", sprite.index(), sprite.rect()),
        None => String::from("no sprite"),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::builder()
        .format_timestamp_secs()
        .filter_level(log::LevelFilter::Info)
        .init();
    log::info!("Starting with args: {:?}", args);

    let mut config = GameConfig::load_or_default(args.config.as_deref())?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    match args.command {
        Command::Roll { die, count } => {
            config.dice = vec![die];
            let mut game = DiceGame::new(config)?;
            for _ in 0..count {
                let (face, sprite) = game.roll(0)?;
                println!("{}: rolled {} ({})", die, face, describe(sprite.as_ref()));
            }
        }
        Command::Set { die, face } => {
            config.dice = vec![die];
            let mut game = DiceGame::new(config)?;
            let sprite = game.set(0, face)?;
            println!("{}: set to {} ({})", die, face, describe(Some(&sprite)));
        }
        Command::Table => {
            println!("{:<6} {:<5} {:>5} {:>12}", "type", "name", "faces", "sprite start");
            for die_type in DieType::all() {
                println!(
                    "{:<6} {:<5} {:>5} {:>12}",
                    format!("{:?}", die_type),
                    die_type.to_string(),
                    die_type.face_count(),
                    die_type.sprite_start()
                );
            }
        }
        Command::Sheet { output } => {
            let game = DiceGame::new(config)?;
            let image = game.render_sheet();
            image.save(&output)?;
            log::info!(
                "Wrote {}x{} sheet to {}",
                image.width(),
                image.height(),
                output.display()
            );
        }
    }

    Ok(())
}
