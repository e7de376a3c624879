use image::{Rgba, RgbaImage};

use crate::sprite::Sprite;

pub type Color = [u8; 4];

pub const WHITE: Color = [0xff, 0xff, 0xff, 0xff];

/// A render target the game draws onto.
///
/// Positions are in logical pixels from the top-left corner. Text is placed
/// by its baseline.
pub trait Canvas {
    fn fill(&mut self, color: Color);
    fn draw_sprite(&mut self, sprite: &Sprite, x: f32, y: f32);
    fn draw_text(&mut self, text: &str, x: f32, y: f32, color: Color);
}

const GLYPH_WIDTH: u32 = 3;
const GLYPH_HEIGHT: u32 = 5;
const GLYPH_SCALE: u32 = 2;

// 3x5 bitmaps, one row per byte, most significant of the low 3 bits leftmost
const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b010, 0b010, 0b010],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

fn put_pixel_clipped(image: &mut RgbaImage, x: i64, y: i64, color: Color) {
    if x < 0 || y < 0 || x >= image.width() as i64 || y >= image.height() as i64 {
        return;
    }
    image.put_pixel(x as u32, y as u32, Rgba(color));
}

/// Offline canvas, used to export the sheet layout without a window.
///
/// Only digits are rasterized; other characters advance the pen.
impl Canvas for RgbaImage {
    fn fill(&mut self, color: Color) {
        for pixel in self.pixels_mut() {
            *pixel = Rgba(color);
        }
    }

    fn draw_sprite(&mut self, sprite: &Sprite, x: f32, y: f32) {
        image::imageops::overlay(self, &*sprite.view(), x.round() as i64, y.round() as i64);
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, color: Color) {
        let advance = ((GLYPH_WIDTH + 1) * GLYPH_SCALE) as i64;
        let top = y.round() as i64 - (GLYPH_HEIGHT * GLYPH_SCALE) as i64;
        let mut pen = x.round() as i64;

        for ch in text.chars() {
            if let Some(glyph) = ch.to_digit(10).map(|d| DIGITS[d as usize]) {
                for (row, bits) in glyph.iter().enumerate() {
                    for col in 0..GLYPH_WIDTH {
                        if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                            continue;
                        }
                        for dy in 0..GLYPH_SCALE {
                            for dx in 0..GLYPH_SCALE {
                                put_pixel_clipped(
                                    self,
                                    pen + (col * GLYPH_SCALE + dx) as i64,
                                    top + (row as u32 * GLYPH_SCALE + dy) as i64,
                                    color,
                                );
                            }
                        }
                    }
                }
            }
            pen += advance;
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill() {
        let mut image = RgbaImage::new(4, 4);
        Canvas::fill(&mut image, [1, 2, 3, 4]);
        assert!(image.pixels().all(|p| p.0 == [1, 2, 3, 4]));
    }

    #[test]
    fn test_draw_text_digit_one() {
        let mut image = RgbaImage::new(16, 16);
        image.draw_text("1", 0.0, 10.0, WHITE);
        // top row of "1" is 0b010: only the middle column is lit
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 0]);
        assert_eq!(image.get_pixel(2, 0).0, WHITE);
        assert_eq!(image.get_pixel(3, 1).0, WHITE);
        assert_eq!(image.get_pixel(4, 0).0, [0, 0, 0, 0]);
        // bottom row is 0b111
        assert_eq!(image.get_pixel(0, 9).0, WHITE);
        assert_eq!(image.get_pixel(5, 9).0, WHITE);
    }

    #[test]
    fn test_draw_text_clips() {
        let mut image = RgbaImage::new(4, 4);
        image.draw_text("88", -3.0, 2.0, WHITE);
        image.draw_text("x", 0.0, 10.0, WHITE);
        assert_eq!(image.get_pixel(0, 0).0, WHITE);
        assert_eq!(image.get_pixel(3, 3).0, [0, 0, 0, 0]);
    }
}
