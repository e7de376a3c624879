use std::path::Path;

use eframe::egui;
use gamekit::prelude::*;

pub mod canvas;

use canvas::{EguiCanvas, SheetTextures};

const DIGIT_KEYS: [egui::Key; 9] = [
    egui::Key::Num1,
    egui::Key::Num2,
    egui::Key::Num3,
    egui::Key::Num4,
    egui::Key::Num5,
    egui::Key::Num6,
    egui::Key::Num7,
    egui::Key::Num8,
    egui::Key::Num9,
];

pub struct App {
    pub game: DiceGame,
    textures: SheetTextures,
    status: Option<String>,
}

impl App {
    pub fn new(game: DiceGame) -> Self {
        Self {
            game,
            textures: SheetTextures::default(),
            status: None,
        }
    }

    pub fn ui(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                for (i, die) in self.game.dice().iter().enumerate() {
                    let value = match die.last_value() {
                        0 => String::from("-"),
                        v => v.to_string(),
                    };
                    ui.label(format!("[{}] {}: {}", i + 1, die.die_type(), value));
                    ui.separator();
                }

                if ui.button("Export Sheet").clicked()
                    && let Some(path) = rfd::FileDialog::new()
                        .add_filter("PNG", &["png"])
                        .set_title("Export Sprite Sheet")
                        .set_file_name("sheet.png")
                        .save_file()
                {
                    self.status = Some(match self.export_sheet(&path) {
                        Ok(()) => format!("Exported sheet to {}", path.display()),
                        Err(e) => format!("Failed to export sheet: {:#}", e),
                    });
                }

                if let Some(status) = &self.status {
                    ui.label(status);
                }
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let available = ui.max_rect();
                let (width, height) = self
                    .game
                    .layout(available.width() as u32, available.height() as u32);
                let rect = egui::Rect::from_min_size(
                    available.min,
                    egui::Vec2::new(width as f32, height as f32),
                );
                let painter = ui.painter_at(rect);
                let mut canvas = EguiCanvas::new(ctx, &painter, &mut self.textures);
                self.game.draw(&mut canvas);
            });
    }

    fn export_sheet(&self, path: &Path) -> anyhow::Result<()> {
        self.game.render_sheet().save(path)?;
        log::info!("Exported sheet to {}", path.display());
        Ok(())
    }
}

/// Die positions whose key went down in `events`, ignoring key repeat.
fn pressed_dice(events: &[egui::Event]) -> Vec<usize> {
    events
        .iter()
        .filter_map(|event| match event {
            egui::Event::Key {
                key,
                pressed: true,
                repeat: false,
                ..
            } => DIGIT_KEYS.iter().position(|k| k == key),
            _ => None,
        })
        .collect()
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let pressed = ctx.input(|input| pressed_dice(&input.events));
        if let Err(e) = self.game.update(|i| pressed.contains(&i)) {
            log::error!("Update failed: {:#}", e);
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        self.ui(ctx);
    }
}
