use egui::{ColorImage, TextureHandle, TextureOptions};
use image::RgbImage;

use crate::app::controller::UiEvent;
use crate::app::views::View;
use crate::session::InteractiveSession;

/// Summary text next to the annotated (or raw) image.
pub struct ResultView {
    annotated: Option<TextureHandle>,
    raw: Option<TextureHandle>,
    show_raw: bool,
}

impl ResultView {
    pub fn new() -> Self {
        Self {
            annotated: None,
            raw: None,
            show_raw: false,
        }
    }

    /// Drops the uploaded textures so the next draw picks up new results.
    pub fn invalidate(&mut self) {
        self.annotated = None;
        self.raw = None;
    }

    fn draw_summary(&self, ui: &mut egui::Ui, session: &InteractiveSession) {
        ui.group(|ui| {
            for line in session.summary() {
                ui.label(line);
            }
        });
    }

    fn draw_image(&mut self, ui: &mut egui::Ui, session: &InteractiveSession) {
        let analysis = session.analysis();
        let texture = if self.show_raw {
            self.raw
                .get_or_insert_with(|| upload(ui.ctx(), "raw_image", &analysis.raw))
        } else {
            self.annotated
                .get_or_insert_with(|| upload(ui.ctx(), "annotated_image", &analysis.annotated))
        };
        ui.add(egui::Image::new(&*texture).shrink_to_fit());
    }
}

impl Default for ResultView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for ResultView {
    fn draw(&mut self, ui: &mut egui::Ui, session: &InteractiveSession, _events: &mut Vec<UiEvent>) {
        ui.horizontal(|ui| {
            ui.heading(session.file_name());
            ui.checkbox(&mut self.show_raw, "Show raw image");
        });
        ui.separator();
        self.draw_summary(ui, session);
        self.draw_image(ui, session);
    }
}

fn upload(ctx: &egui::Context, name: &str, image: &RgbImage) -> TextureHandle {
    let color_image = ColorImage::from_rgb(
        [image.width() as usize, image.height() as usize],
        image.as_raw().as_slice(),
    );
    ctx.load_texture(name, color_image, TextureOptions::default())
}
