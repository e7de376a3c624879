use std::sync::Arc;

use anyhow::Context;
use image::RgbaImage;

use crate::{
    assets::{AnyTree, AssetManager},
    canvas::Canvas,
    config::GameConfig,
    dice::Die,
    roller::Roller,
    sprite::{CELL_PADDING_X, CELL_PADDING_Y, Sprite, SpriteProvider, SpriteSheet},
};

const DIE_SPACING: f32 = 35.0;
const DIE_ROW_Y: f32 = 700.0;

/// Engine-independent game state: the table of dice and what to draw.
///
/// A host calls [`DiceGame::update`] once per input tick and
/// [`DiceGame::draw`] once per frame.
#[derive(Debug)]
pub struct DiceGame {
    config: GameConfig,
    roller: Roller,
    sheet: Arc<dyn SpriteProvider>,
    dice: Vec<Die>,
}

impl DiceGame {
    /// Loads the shared sheet and builds one die per configured type.
    pub fn new(config: GameConfig) -> anyhow::Result<Self> {
        let mut assets = AssetManager::new(AnyTree::from_override(config.asset_dir.as_deref()));
        let sheet = SpriteSheet::from_assets(
            &mut assets,
            &config.sheet.path,
            config.sheet.sprite_width,
            config.sheet.sprite_height,
            config.sheet.rows,
            config.sheet.cols,
        )
        .with_context(|| format!("failed to load sprite sheet {}", config.sheet.path))?;

        let roller = Roller::seeded(config.seed);
        Ok(Self::with_sheet(config, Arc::new(sheet), roller))
    }

    pub fn with_sheet(config: GameConfig, sheet: Arc<dyn SpriteProvider>, roller: Roller) -> Self {
        let dice = config
            .dice
            .iter()
            .map(|&die_type| Die::new(die_type, sheet.clone()))
            .collect();
        Self {
            config,
            roller,
            sheet,
            dice,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn dice(&self) -> &[Die] {
        &self.dice
    }

    pub fn sheet(&self) -> &Arc<dyn SpriteProvider> {
        &self.sheet
    }

    /// Rolls every die whose key was freshly pressed this tick. Die `i` is
    /// bound to key `i + 1`.
    pub fn update(&mut self, just_pressed: impl Fn(usize) -> bool) -> anyhow::Result<()> {
        for i in 0..self.dice.len() {
            if just_pressed(i) {
                let (value, _) = self.roll(i)?;
                log::info!("Die {}: Rolled {}", self.dice[i].die_type(), value);
            }
        }
        Ok(())
    }

    pub fn roll(&mut self, i: usize) -> anyhow::Result<(u32, Option<Sprite>)> {
        let die = self
            .dice
            .get_mut(i)
            .ok_or_else(|| anyhow::anyhow!("No die at position {}", i))?;
        Ok(die.roll(&mut self.roller))
    }

    pub fn set(&mut self, i: usize, face: u32) -> anyhow::Result<Sprite> {
        let die = self
            .dice
            .get_mut(i)
            .ok_or_else(|| anyhow::anyhow!("No die at position {}", i))?;
        Ok(die.set(face)?)
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.fill(self.config.background);
        self.sheet.draw(canvas);

        for (i, die) in self.dice.iter().enumerate() {
            if let (_, Some(sprite)) = die.last_roll() {
                canvas.draw_sprite(&sprite, (i + 1) as f32 * DIE_SPACING, DIE_ROW_Y);
            }
        }
    }

    /// Renders the sheet's debug grid on the background color, sized to fit.
    pub fn render_sheet(&self) -> RgbaImage {
        let (sprite_width, sprite_height) = self.sheet.sprite_size();
        let (rows, cols) = self.sheet.grid();
        let mut image = RgbaImage::new(
            cols * (sprite_width + CELL_PADDING_X),
            rows * (sprite_height + CELL_PADDING_Y),
        );
        Canvas::fill(&mut image, self.config.background);
        self.sheet.draw(&mut image);
        image
    }

    pub fn layout(&self, outside_width: u32, outside_height: u32) -> (u32, u32) {
        (outside_width, outside_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        canvas::recording::{DrawOp, RecordingCanvas},
        dice::DieType,
    };

    fn test_game() -> DiceGame {
        let image = Arc::new(RgbaImage::new(256, 256));
        let sheet = SpriteSheet::new(image, 32, 32, 8, 8).unwrap();
        DiceGame::with_sheet(GameConfig::default(), Arc::new(sheet), Roller::test_rng())
    }

    #[test]
    fn test_new_loads_bundled_sheet() -> anyhow::Result<()> {
        let game = DiceGame::new(GameConfig::default())?;
        assert_eq!(game.dice().len(), 6);
        assert_eq!(game.sheet().len(), 64);
        Ok(())
    }

    #[test]
    fn test_new_fails_on_bad_sheet() {
        let config = GameConfig {
            sheet: crate::config::SheetConfig {
                path: String::from("dice/dice.svg"),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(DiceGame::new(config).is_err());
    }

    #[test]
    fn test_new_rejects_oversized_grid() {
        let config = GameConfig {
            sheet: crate::config::SheetConfig {
                sprite_width: u32::MAX,
                cols: 2,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(DiceGame::new(config).is_err());
    }

    #[test]
    fn test_update_rolls_pressed_dice() -> anyhow::Result<()> {
        let mut game = test_game();
        game.update(|i| i == 1 || i == 5)?;

        let rolled: Vec<bool> = game.dice().iter().map(|d| d.last_value() != 0).collect();
        assert_eq!(rolled, vec![false, true, false, false, false, true]);
        Ok(())
    }

    #[test]
    fn test_update_without_input() -> anyhow::Result<()> {
        let mut game = test_game();
        game.update(|_| false)?;
        assert!(game.dice().iter().all(|d| d.last_value() == 0));
        Ok(())
    }

    #[test]
    fn test_roll_and_set_bounds() {
        let mut game = test_game();
        assert!(game.roll(6).is_err());
        assert!(game.set(0, 0).is_err());
        assert!(game.set(0, 5).is_err());
        assert_eq!(game.set(5, 20).unwrap().index(), 57);
    }

    #[test]
    fn test_draw() {
        let game = test_game();
        let mut canvas = RecordingCanvas::default();
        game.draw(&mut canvas);

        assert_eq!(canvas.ops[0], DrawOp::Fill([0xcc, 0xcc, 0xcc, 0xff]));
        assert_eq!(canvas.texts().len(), 64);

        let sprites = canvas.sprites();
        assert_eq!(sprites.len(), 64 + 6);
        let dice_row = &sprites[64..];
        let expected_starts: Vec<u32> = GameConfig::default()
            .dice
            .iter()
            .map(DieType::sprite_start)
            .collect();
        for (i, &(index, x, y)) in dice_row.iter().enumerate() {
            assert_eq!(index, expected_starts[i]);
            assert_eq!(x, (i + 1) as f32 * 35.0);
            assert_eq!(y, 700.0);
        }
    }

    #[test]
    fn test_render_sheet() -> anyhow::Result<()> {
        let game = DiceGame::new(GameConfig::default())?;
        let image = game.render_sheet();
        assert_eq!(image.dimensions(), (8 * 42, 8 * 52));
        // padding between the first two cells keeps the background
        assert_eq!(image.get_pixel(36, 16).0, [0xcc, 0xcc, 0xcc, 0xff]);
        Ok(())
    }

    #[test]
    fn test_render_sheet_uses_sheet_grid() {
        // a 4x2 grid of 16x16 sprites, unlike the configured 8x8 grid of 32x32
        let image = Arc::new(RgbaImage::new(64, 64));
        let sheet = SpriteSheet::new(image, 16, 16, 4, 2).unwrap();
        let game = DiceGame::with_sheet(GameConfig::default(), Arc::new(sheet), Roller::test_rng());
        assert_eq!(game.render_sheet().dimensions(), (2 * 26, 4 * 36));
    }

    #[test]
    fn test_layout() {
        let game = test_game();
        assert_eq!(game.layout(800, 600), (800, 600));
    }
}
