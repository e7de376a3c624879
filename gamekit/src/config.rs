use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{canvas::Color, dice::DieType};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    pub path: String,
    pub sprite_width: u32,
    pub sprite_height: u32,
    pub rows: u32,
    pub cols: u32,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            path: String::from("dice/dice.png"),
            sprite_width: 32,
            sprite_height: 32,
            rows: 8,
            cols: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub background: Color,
    pub dice: Vec<DieType>,
    pub sheet: SheetConfig,
    /// Fixed seed for reproducible rolls; seeded from the OS when unset.
    pub seed: Option<u64>,
    /// Load assets from this directory instead of the compiled-in bundle.
    pub asset_dir: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: String::from("Dice Game"),
            window_width: 1024,
            window_height: 768,
            background: [0xcc, 0xcc, 0xcc, 0xff],
            dice: vec![
                DieType::D4,
                DieType::D6,
                DieType::D6Alt,
                DieType::D8,
                DieType::D12,
                DieType::D20,
            ],
            sheet: SheetConfig::default(),
            seed: None,
            asset_dir: None,
        }
    }
}

impl GameConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `path` when given, the defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                log::info!("Loading config from {}", path.display());
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.title, "Dice Game");
        assert_eq!((config.window_width, config.window_height), (1024, 768));
        assert_eq!(config.dice.len(), 6);
        assert!(!config.dice.contains(&DieType::D10));
        assert_eq!(config.sheet.path, "dice/dice.png");
        assert_eq!((config.sheet.rows, config.sheet.cols), (8, 8));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "dice": ["D20", "D10"], "seed": 9 }"#).unwrap();
        assert_eq!(config.dice, vec![DieType::D20, DieType::D10]);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.title, "Dice Game");
        assert_eq!(config.sheet, SheetConfig::default());
    }

    #[test]
    fn test_save_and_load() -> anyhow::Result<()> {
        let path = std::env::temp_dir().join(format!("gamekit-config-{}.json", std::process::id()));
        let config = GameConfig {
            title: String::from("Test Table"),
            seed: Some(1),
            ..Default::default()
        };
        config.save(&path)?;
        let loaded = GameConfig::load(&path)?;
        std::fs::remove_file(&path)?;
        assert_eq!(loaded, config);
        Ok(())
    }

    #[test]
    fn test_load_errors() {
        let missing = Path::new("/nonexistent/gamekit.json");
        assert!(matches!(
            GameConfig::load(missing),
            Err(ConfigError::Read { .. })
        ));
        assert_eq!(
            GameConfig::load_or_default(None).unwrap(),
            GameConfig::default()
        );
    }
}
