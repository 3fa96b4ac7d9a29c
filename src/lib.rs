pub mod analysis;
pub mod app;
pub mod config;
pub mod error;
pub mod export;
pub mod session;

pub use analysis::{Analysis, IntensityWindow, Region, analyze};
pub use config::Settings;
pub use error::{AppError, ExportError, LoadError, SessionError};
pub use session::{InteractiveSession, ParameterUpdate, Parameters};
