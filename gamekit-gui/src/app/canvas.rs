use std::sync::Arc;

use eframe::egui;
use gamekit::prelude::*;
use image::RgbaImage;
use rustc_hash::FxHashMap;

const CAPTION_FONT_SIZE: f32 = 13.0;

fn color32(color: Color) -> egui::Color32 {
    let [r, g, b, a] = color;
    egui::Color32::from_rgba_unmultiplied(r, g, b, a)
}

/// GPU textures for sprite sheets, uploaded the first time a sheet is drawn.
#[derive(Default)]
pub struct SheetTextures {
    textures: FxHashMap<usize, egui::TextureHandle>,
}

impl SheetTextures {
    pub fn get_or_load(&mut self, ctx: &egui::Context, sheet: &Arc<RgbaImage>) -> egui::TextureId {
        let key = Arc::as_ptr(sheet) as usize;
        self.textures
            .entry(key)
            .or_insert_with(|| {
                let size = [sheet.width() as usize, sheet.height() as usize];
                let image = egui::ColorImage::from_rgba_unmultiplied(size, sheet.as_raw());
                log::debug!("Uploading {}x{} sprite sheet texture", size[0], size[1]);
                ctx.load_texture(
                    format!("sprite-sheet-{:x}", key),
                    image,
                    egui::TextureOptions::NEAREST,
                )
            })
            .id()
    }
}

/// Draws into an egui painter, with positions relative to `origin`.
pub struct EguiCanvas<'a> {
    ctx: &'a egui::Context,
    painter: &'a egui::Painter,
    origin: egui::Pos2,
    textures: &'a mut SheetTextures,
}

impl<'a> EguiCanvas<'a> {
    pub fn new(
        ctx: &'a egui::Context,
        painter: &'a egui::Painter,
        textures: &'a mut SheetTextures,
    ) -> Self {
        Self {
            ctx,
            painter,
            origin: painter.clip_rect().min,
            textures,
        }
    }

    fn at(&self, x: f32, y: f32) -> egui::Pos2 {
        self.origin + egui::Vec2::new(x, y)
    }
}

impl Canvas for EguiCanvas<'_> {
    fn fill(&mut self, color: Color) {
        self.painter
            .rect_filled(self.painter.clip_rect(), 0.0, color32(color));
    }

    fn draw_sprite(&mut self, sprite: &Sprite, x: f32, y: f32) {
        let texture = self.textures.get_or_load(self.ctx, sprite.sheet());

        let (sheet_width, sheet_height) = sprite.sheet().dimensions();
        let rect = sprite.rect();
        let (max_x, max_y) = rect.max();
        let uv = egui::Rect::from_min_max(
            egui::pos2(
                rect.x as f32 / sheet_width as f32,
                rect.y as f32 / sheet_height as f32,
            ),
            egui::pos2(
                max_x as f32 / sheet_width as f32,
                max_y as f32 / sheet_height as f32,
            ),
        );
        let target = egui::Rect::from_min_size(
            self.at(x, y),
            egui::Vec2::new(rect.width as f32, rect.height as f32),
        );
        self.painter
            .image(texture, target, uv, egui::Color32::WHITE);
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, color: Color) {
        self.painter.text(
            self.at(x, y),
            egui::Align2::LEFT_BOTTOM,
            text,
            egui::FontId::monospace(CAPTION_FONT_SIZE),
            color32(color),
        );
    }
}
