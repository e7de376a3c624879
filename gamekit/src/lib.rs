pub mod assets;
pub mod canvas;
pub mod config;
pub mod dice;
pub mod game;
pub mod roller;
pub mod sprite;

pub mod prelude {
    pub use crate::{
        assets::{AnyTree, AssetError, AssetManager, AssetSource, Bundle, DirTree, ResourceTree},
        canvas::{Canvas, Color},
        config::{ConfigError, GameConfig, SheetConfig},
        dice::{DiceError, Die, DieType},
        game::DiceGame,
        roller::Roller,
        sprite::{Rect, Sprite, SpriteError, SpriteProvider, SpriteSheet},
    };
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use image::GenericImageView;

    use crate::prelude::*;

    #[test]
    fn test_d20_end_to_end() -> anyhow::Result<()> {
        let mut assets = AssetManager::bundled();
        let sheet: Arc<dyn SpriteProvider> =
            Arc::new(SpriteSheet::from_assets(&mut assets, "dice/dice.png", 32, 32, 8, 8)?);

        let mut roller = Roller::test_rng();
        let mut die = Die::new(DieType::D20, sheet);
        for _ in 0..1000 {
            let (face, sprite) = die.roll(&mut roller);
            assert!(face < 20);
            if let Some(sprite) = sprite {
                assert_eq!(sprite.view().dimensions(), (32, 32));
                assert_eq!(sprite.to_image().dimensions(), (32, 32));
            }
        }
        Ok(())
    }

    #[test]
    fn test_exported_sheet_matches_sprites() -> anyhow::Result<()> {
        let game = DiceGame::new(GameConfig::default())?;
        let mut image = image::RgbaImage::new(512, 480);
        game.sheet().draw(&mut image);

        // the first cell is drawn at the origin, unscaled
        let first = game.sheet().get(1)?.to_image();
        for (x, y, pixel) in first.enumerate_pixels() {
            if pixel.0[3] == 255 {
                assert_eq!(image.get_pixel(x, y), pixel);
            }
        }
        Ok(())
    }
}
