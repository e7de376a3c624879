use std::sync::Arc;

use derive_more::Display;
use image::{GenericImageView, RgbaImage, SubImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    assets::{AssetError, AssetSource},
    canvas::{Canvas, WHITE},
};

// Sprite indexes start at 1. The dice sheet is 8x8:
// 01 02 03 04 05 06 07 08
// 09 10 11 12 13 14 15 16
// 17 18 19 20 21 22 23 24
// 25 26 27 28 29 30 31 32
// 33 34 35 36 37 38 39 40
// 41 42 43 44 45 46 47 48
// 49 50 51 52 53 54 55 56
// 57 58 59 60 61 62 63 64

pub(crate) const CELL_PADDING_X: u32 = 10;
pub(crate) const CELL_PADDING_Y: u32 = 20;

#[derive(Debug, Error)]
pub enum SpriteError {
    #[error("index out of bounds: {index} (sheet has {len} sprites)")]
    IndexOutOfBounds { index: u32, len: u32 },
    #[error("a {cols}x{rows} grid of {width}x{height} sprites does not fit in a {image_width}x{image_height} image")]
    GridExceedsImage {
        width: u32,
        height: u32,
        rows: u32,
        cols: u32,
        image_width: u32,
        image_height: u32,
    },
    #[error("a {cols}x{rows} grid of {width}x{height} sprites has no cells")]
    EmptyGrid {
        width: u32,
        height: u32,
        rows: u32,
        cols: u32,
    },
    #[error(transparent)]
    Asset(#[from] AssetError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display("({x}, {y}) {width}x{height}")]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn max(&self) -> (u32, u32) {
        (self.x + self.width, self.y + self.height)
    }
}

/// One cell of a sprite sheet.
///
/// Holds a shared handle to the sheet's pixels plus the cell rectangle; no
/// pixels are copied until [`Sprite::to_image`] is called.
#[derive(Debug, Clone)]
pub struct Sprite {
    sheet: Arc<RgbaImage>,
    rect: Rect,
    index: u32,
}

impl Sprite {
    /// The 1-based sheet index this sprite was looked up with.
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn width(&self) -> u32 {
        self.rect.width
    }

    pub fn height(&self) -> u32 {
        self.rect.height
    }

    pub fn sheet(&self) -> &Arc<RgbaImage> {
        &self.sheet
    }

    pub fn view(&self) -> SubImage<&RgbaImage> {
        self.sheet
            .view(self.rect.x, self.rect.y, self.rect.width, self.rect.height)
    }

    pub fn to_image(&self) -> RgbaImage {
        self.view().to_image()
    }
}

/// Anything that can hand out sprites by 1-based index.
pub trait SpriteProvider: std::fmt::Debug {
    fn get(&self, index: u32) -> Result<Sprite, SpriteError>;

    /// Renders every sprite with its index underneath, for checking a sheet's
    /// layout.
    fn draw(&self, canvas: &mut dyn Canvas);

    fn sprite_size(&self) -> (u32, u32);

    /// Grid shape as `(rows, cols)`.
    fn grid(&self) -> (u32, u32);

    fn len(&self) -> u32;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A bitmap sliced into a `rows` x `cols` grid of equally sized sprites.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    sheet: Arc<RgbaImage>,
    sprite_width: u32,
    sprite_height: u32,
    rows: u32,
    cols: u32,
}

impl SpriteSheet {
    pub fn new(
        sheet: Arc<RgbaImage>,
        sprite_width: u32,
        sprite_height: u32,
        rows: u32,
        cols: u32,
    ) -> Result<Self, SpriteError> {
        if sprite_width == 0 || sprite_height == 0 || rows == 0 || cols == 0 {
            return Err(SpriteError::EmptyGrid {
                width: sprite_width,
                height: sprite_height,
                rows,
                cols,
            });
        }

        let (image_width, image_height) = sheet.dimensions();
        let fits = |size: u32, count: u32, limit: u32| {
            size.checked_mul(count).is_some_and(|total| total <= limit)
        };
        if !fits(sprite_width, cols, image_width)
            || !fits(sprite_height, rows, image_height)
            || rows.checked_mul(cols).is_none()
        {
            return Err(SpriteError::GridExceedsImage {
                width: sprite_width,
                height: sprite_height,
                rows,
                cols,
                image_width,
                image_height,
            });
        }

        Ok(Self {
            sheet,
            sprite_width,
            sprite_height,
            rows,
            cols,
        })
    }

    pub fn from_assets(
        assets: &mut dyn AssetSource,
        path: &str,
        sprite_width: u32,
        sprite_height: u32,
        rows: u32,
        cols: u32,
    ) -> Result<Self, SpriteError> {
        let image = assets.get_image(path)?;
        log::info!(
            "Loaded sprite sheet {} ({}x{} grid of {}x{} sprites)",
            path,
            cols,
            rows,
            sprite_width,
            sprite_height
        );
        Self::new(image, sprite_width, sprite_height, rows, cols)
    }

    pub fn image(&self) -> &Arc<RgbaImage> {
        &self.sheet
    }

    /// Zero-based `(row, col)` of a 1-based index.
    fn cell(&self, index: u32) -> (u32, u32) {
        let index = index - 1;
        (index / self.cols, index % self.cols)
    }
}

impl SpriteProvider for SpriteSheet {
    fn get(&self, index: u32) -> Result<Sprite, SpriteError> {
        let len = self.len();
        if index < 1 || index > len {
            return Err(SpriteError::IndexOutOfBounds { index, len });
        }

        let (row, col) = self.cell(index);
        Ok(Sprite {
            sheet: self.sheet.clone(),
            rect: Rect {
                x: col * self.sprite_width,
                y: row * self.sprite_height,
                width: self.sprite_width,
                height: self.sprite_height,
            },
            index,
        })
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        for i in 1..=self.len() {
            let sprite = match self.get(i) {
                Ok(sprite) => sprite,
                Err(e) => {
                    log::warn!("Error retrieving sprite {}: {}", i, e);
                    continue;
                }
            };

            let (row, col) = self.cell(i);
            let x = (col * (self.sprite_width + CELL_PADDING_X)) as f32;
            let y = (row * (self.sprite_height + CELL_PADDING_Y)) as f32;
            canvas.draw_sprite(&sprite, x, y);

            let text_x = x + self.sprite_width as f32 / 2.0 - 10.0;
            let text_y = y + self.sprite_height as f32 + 10.0;
            canvas.draw_text(&format!("{:02}", i), text_x, text_y, WHITE);
        }
    }

    fn sprite_size(&self) -> (u32, u32) {
        (self.sprite_width, self.sprite_height)
    }

    fn grid(&self) -> (u32, u32) {
        (self.rows, self.cols)
    }

    fn len(&self) -> u32 {
        self.rows * self.cols
    }
}
