pub mod app_controller;

pub use app_controller::{AppController, DispatchOutcome, SessionState, UiEvent};
