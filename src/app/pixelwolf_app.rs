use tracing::{error, info};

use crate::app::controller::{AppController, DispatchOutcome, SessionState, UiEvent};
use crate::app::pick_image;
use crate::app::views::{ControlView, ResultView, View};
use crate::config::Settings;
use crate::error::AppError;

const MAX_LOGGED_ERRORS: usize = 50;

pub struct PixelwolfApp {
    controller: AppController,
    control_view: ControlView,
    result_view: ResultView,
    status: Option<String>,
    errors: Vec<AppError>,
}

impl PixelwolfApp {
    pub fn new(controller: AppController) -> Self {
        Self {
            controller,
            control_view: ControlView::new(),
            result_view: ResultView::new(),
            status: None,
            errors: Vec::new(),
        }
    }

    pub fn start_gui(settings: &Settings, controller: AppController) -> Result<(), AppError> {
        let title = settings.window.title.clone();
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size(egui::vec2(settings.window.width, settings.window.height))
                .with_title(title.clone()),
            ..Default::default()
        };

        eframe::run_native(
            &title,
            options,
            Box::new(move |_cc| Ok(Box::new(PixelwolfApp::new(controller)))),
        )
        .map_err(|e| AppError::Ui(e.to_string()))
    }

    fn handle_events(&mut self, ctx: &egui::Context, events: Vec<UiEvent>) {
        for event in events {
            match self.controller.dispatch(event) {
                Ok(DispatchOutcome::Redraw) => self.result_view.invalidate(),
                Ok(DispatchOutcome::Loaded) => {
                    self.result_view.invalidate();
                    self.status = None;
                }
                Ok(DispatchOutcome::Exported(path)) => {
                    self.status = Some(format!("Saved {}", path.display()));
                }
                Ok(DispatchOutcome::Exit) => {
                    info!("Exit requested");
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
                Err(e) => self.record_error(e),
            }
        }
    }

    // Repeats of the newest entry are dropped, so an error raised on every
    // frame (e.g. while a slider is dragged) shows up once.
    fn record_error(&mut self, e: AppError) {
        let message = e.to_string();
        if self.errors.last().map(ToString::to_string) == Some(message) {
            return;
        }
        error!("{}", e);
        self.errors.push(e);
        if self.errors.len() > MAX_LOGGED_ERRORS {
            self.errors.remove(0);
        }
    }

    fn draw_unloaded(ui: &mut egui::Ui, last_error: Option<&str>, events: &mut Vec<UiEvent>) {
        ui.heading("No image loaded");
        if let Some(message) = last_error {
            ui.colored_label(egui::Color32::RED, message);
        }
        ui.horizontal(|ui| {
            if ui.button("Open image...").clicked() {
                if let Some(path) = pick_image() {
                    events.push(UiEvent::OpenRequested(path));
                }
            }
            if ui.button("Exit").clicked() {
                events.push(UiEvent::ExitRequested);
            }
        });
    }
}

impl eframe::App for PixelwolfApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut events = Vec::new();

        egui::TopBottomPanel::bottom("error_panel")
            .resizable(true)
            .show(ctx, |ui| {
                if let Some(status) = &self.status {
                    ui.label(status);
                }
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for error in self.errors.iter().rev() {
                        ui.label(format!("[ERROR] {}", error));
                    }
                });
            });

        match self.controller.state() {
            SessionState::Loaded(session) => {
                egui::SidePanel::left("controls")
                    .resizable(false)
                    .show(ctx, |ui| self.control_view.draw(ui, session, &mut events));
                egui::CentralPanel::default()
                    .show(ctx, |ui| self.result_view.draw(ui, session, &mut events));
            }
            SessionState::Unloaded { last_error } => {
                egui::CentralPanel::default()
                    .show(ctx, |ui| Self::draw_unloaded(ui, last_error.as_deref(), &mut events));
            }
        }

        self.handle_events(ctx, events);
    }
}
