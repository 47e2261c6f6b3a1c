use crate::config::Config;
use crate::flower_recognizer::core::Event;
use crate::flower_recognizer::main::FlowerRecognizer;
use crate::flower_recognizer::render::{render, ButtonView, ResultPanel, TITLE};
use eframe::egui;
use std::error::Error;
use std::time::Duration;

const PREVIEW_SIZE: f32 = 360.0;
const GREEN: egui::Color32 = egui::Color32::from_rgb(34, 197, 94);
const DARK_GREEN: egui::Color32 = egui::Color32::from_rgb(22, 101, 52);
const BLUE: egui::Color32 = egui::Color32::from_rgb(59, 130, 246);
const GRAY: egui::Color32 = egui::Color32::from_rgb(156, 163, 175);

struct FlowerRecognizerWindow {
    recognizer: FlowerRecognizer,
    preview: Option<egui::TextureHandle>,
    preview_generation: u64,
    repaint_interval: Duration,
}

impl FlowerRecognizerWindow {
    fn update_preview(&mut self, ctx: &egui::Context) {
        let (generation, frame) = self.recognizer.latest_frame().get_with_generation();
        if generation == self.preview_generation {
            return;
        }
        self.preview_generation = generation;

        let Some(frame) = frame else {
            self.preview = None;
            return;
        };

        let image = egui::ColorImage::from_rgb(
            [frame.width() as usize, frame.height() as usize],
            frame.image().as_raw(),
        );

        match &mut self.preview {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.preview =
                    Some(ctx.load_texture("camera-preview", image, egui::TextureOptions::LINEAR))
            }
        }
    }
}

impl eframe::App for FlowerRecognizerWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.recognizer.process_pending();
        self.update_preview(ctx);

        let view = render(self.recognizer.model());
        let preview = self.preview.as_ref();
        let mut events = Vec::new();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.label(
                    egui::RichText::new(view.title)
                        .size(28.0)
                        .strong()
                        .color(DARK_GREEN),
                );
                ui.add_space(12.0);

                draw_preview(ui, preview, view.mirror_preview);
                ui.add_space(12.0);

                if draw_button(ui, &view.classify_button, GREEN) {
                    events.push(Event::ClassifyPressed);
                }
                ui.add_space(6.0);
                if draw_button(ui, &view.switch_camera_button, BLUE) {
                    events.push(Event::SwitchCameraPressed);
                }

                if let Some(status) = &view.status {
                    ui.add_space(8.0);
                    ui.label(egui::RichText::new(status).italics());
                }

                if let Some(panel) = &view.result {
                    ui.add_space(16.0);
                    draw_result(ui, panel);
                }
            });
        });

        for event in events {
            self.recognizer.dispatch(event);
        }

        ctx.request_repaint_after(self.repaint_interval);
    }
}

fn draw_preview(ui: &mut egui::Ui, preview: Option<&egui::TextureHandle>, mirror: bool) {
    let size = egui::vec2(PREVIEW_SIZE, PREVIEW_SIZE);

    let rect = match preview {
        Some(texture) => {
            let uv = if mirror {
                egui::Rect::from_min_max(egui::pos2(1.0, 0.0), egui::pos2(0.0, 1.0))
            } else {
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0))
            };
            let image = egui::Image::new(egui::load::SizedTexture::new(texture.id(), size))
                .fit_to_exact_size(size)
                .uv(uv);
            ui.add(image).rect
        }
        None => {
            let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
            ui.painter()
                .rect_filled(rect, 8.0, egui::Color32::from_gray(40));
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "No camera",
                egui::FontId::proportional(18.0),
                egui::Color32::GRAY,
            );
            rect
        }
    };

    // Framing guide
    let guide = egui::Rect::from_center_size(rect.center(), size * 0.5);
    ui.painter()
        .rect_stroke(guide, 8.0, egui::Stroke::new(2.0, egui::Color32::WHITE));
}

fn draw_button(ui: &mut egui::Ui, button: &ButtonView, fill: egui::Color32) -> bool {
    let fill = if button.enabled { fill } else { GRAY };
    let text = egui::RichText::new(button.label)
        .size(18.0)
        .strong()
        .color(egui::Color32::WHITE);

    let clicked = ui
        .add_enabled(
            button.enabled,
            egui::Button::new(text)
                .fill(fill)
                .rounding(22.0)
                .min_size(egui::vec2(PREVIEW_SIZE, 44.0)),
        )
        .clicked();

    if button.spinner {
        ui.add(egui::Spinner::new());
    }

    clicked
}

fn draw_result(ui: &mut egui::Ui, panel: &ResultPanel) {
    egui::Frame::group(ui.style())
        .rounding(8.0)
        .inner_margin(16.0)
        .show(ui, |ui| {
            ui.set_width(PREVIEW_SIZE - 32.0);
            ui.label(
                egui::RichText::new(panel.title)
                    .size(22.0)
                    .strong()
                    .color(DARK_GREEN),
            );
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Flower:").size(18.0));
                ui.label(
                    egui::RichText::new(&panel.flower)
                        .size(18.0)
                        .strong()
                        .color(GREEN),
                );
            });
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Confidence:").size(18.0));
                ui.label(
                    egui::RichText::new(&panel.confidence)
                        .size(18.0)
                        .strong()
                        .color(BLUE),
                );
            });
        });
}

pub fn run(config: &Config, recognizer: FlowerRecognizer) -> Result<(), Box<dyn Error + Send + Sync>> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITLE)
            .with_inner_size(config.window_size),
        ..Default::default()
    };

    let window = FlowerRecognizerWindow {
        recognizer,
        preview: None,
        preview_generation: 0,
        repaint_interval: config.preview_frame_interval,
    };

    eframe::run_native(TITLE, options, Box::new(move |_cc| Box::new(window)))
        .map_err(|e| e.to_string().into())
}
