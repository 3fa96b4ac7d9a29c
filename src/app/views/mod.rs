pub mod control_view;
pub mod result_view;

use crate::app::controller::UiEvent;
use crate::session::InteractiveSession;

pub use control_view::ControlView;
pub use result_view::ResultView;

pub trait View {
    fn draw(&mut self, ui: &mut egui::Ui, session: &InteractiveSession, events: &mut Vec<UiEvent>);
}
