use std::ops::RangeInclusive;

use egui::emath::Numeric;

use crate::app::controller::UiEvent;
use crate::app::views::View;
use crate::session::{InteractiveSession, ParameterUpdate, Parameters};

/// Sliders for the region and the intensity window, plus the save and exit
/// buttons. Every change is emitted as a single-field update.
#[derive(Default)]
pub struct ControlView;

impl ControlView {
    pub fn new() -> Self {
        Self
    }
}

impl View for ControlView {
    fn draw(&mut self, ui: &mut egui::Ui, session: &InteractiveSession, events: &mut Vec<UiEvent>) {
        let Parameters { region, window } = session.parameters();
        let (width, height) = (session.width(), session.height());
        let shorter = width.min(height);

        ui.label("Change center of circle (x|y)");
        let mut center_x = region.center_x;
        if slider(ui, &mut center_x, 0..=width, step(width), "x") {
            events.push(UiEvent::ParameterChanged(
                ParameterUpdate::new().center_x(center_x),
            ));
        }
        let mut center_y = region.center_y;
        if slider(ui, &mut center_y, 0..=height, step(height), "y") {
            events.push(UiEvent::ParameterChanged(
                ParameterUpdate::new().center_y(center_y),
            ));
        }

        ui.separator();
        ui.label("Set radius");
        let mut radius = region.radius;
        if slider(ui, &mut radius, 1..=shorter.max(1), step(shorter), "radius") {
            events.push(UiEvent::ParameterChanged(ParameterUpdate::new().radius(radius)));
        }

        ui.separator();
        ui.label("Set lower and upper boundary of grayscale");
        let mut lower = window.lower;
        if slider(ui, &mut lower, 0..=u8::MAX, 1.0, "lower") {
            events.push(UiEvent::ParameterChanged(ParameterUpdate::new().lower(lower)));
        }
        let mut upper = window.upper;
        if slider(ui, &mut upper, 0..=u8::MAX, 1.0, "upper") {
            events.push(UiEvent::ParameterChanged(ParameterUpdate::new().upper(upper)));
        }

        ui.separator();
        ui.horizontal(|ui| {
            if ui.button("Save").clicked() {
                events.push(UiEvent::ExportRequested);
            }
            if ui.button("Exit").clicked() {
                events.push(UiEvent::ExitRequested);
            }
        });
    }
}

fn slider<N: Numeric>(
    ui: &mut egui::Ui,
    value: &mut N,
    range: RangeInclusive<N>,
    step: f64,
    text: &str,
) -> bool {
    ui.add(egui::Slider::new(value, range).step_by(step).text(text))
        .changed()
}

/// Slider resolution: one hundredth of the extent, at least one pixel.
fn step(extent: u32) -> f64 {
    (extent / 100).max(1) as f64
}
