use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::config::Settings;
use crate::error::{AppError, SessionError};
use crate::session::{InteractiveSession, ParameterUpdate};

/// Everything the presentation layer can ask of the session.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    ParameterChanged(ParameterUpdate),
    ExportRequested,
    ExitRequested,
    OpenRequested(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Redraw,
    Exported(PathBuf),
    Loaded,
    Exit,
}

pub enum SessionState {
    Unloaded { last_error: Option<String> },
    Loaded(InteractiveSession),
}

pub struct AppController {
    state: SessionState,
    settings: Settings,
}

impl AppController {
    pub fn new(settings: Settings) -> Self {
        Self {
            state: SessionState::Unloaded { last_error: None },
            settings,
        }
    }

    pub fn with_session(session: InteractiveSession, settings: Settings) -> Self {
        Self {
            state: SessionState::Loaded(session),
            settings,
        }
    }

    /// Loads `path` into a fresh session. On failure an already loaded
    /// session is kept as it was.
    pub fn open(&mut self, path: &Path) -> Result<(), AppError> {
        match InteractiveSession::load(path, &self.settings) {
            Ok(session) => {
                self.state = SessionState::Loaded(session);
                Ok(())
            }
            Err(e) => {
                error!("Failed to load {}: {}", path.display(), e);
                if let SessionState::Unloaded { last_error } = &mut self.state {
                    *last_error = Some(e.to_string());
                }
                Err(e.into())
            }
        }
    }

    pub fn dispatch(&mut self, event: UiEvent) -> Result<DispatchOutcome, AppError> {
        match event {
            UiEvent::ParameterChanged(update) => {
                self.session_mut()?.set_parameters(update)?;
                Ok(DispatchOutcome::Redraw)
            }
            UiEvent::ExportRequested => {
                let session = self.session().ok_or(SessionError::Unloaded)?;
                let written = session.export(&session.default_export_path())?;
                info!("Saved {}", written.display());
                Ok(DispatchOutcome::Exported(written))
            }
            UiEvent::ExitRequested => Ok(DispatchOutcome::Exit),
            UiEvent::OpenRequested(path) => {
                self.open(&path)?;
                Ok(DispatchOutcome::Loaded)
            }
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn session(&self) -> Option<&InteractiveSession> {
        match &self.state {
            SessionState::Loaded(session) => Some(session),
            SessionState::Unloaded { .. } => None,
        }
    }

    fn session_mut(&mut self) -> Result<&mut InteractiveSession, SessionError> {
        match &mut self.state {
            SessionState::Loaded(session) => Ok(session),
            SessionState::Unloaded { .. } => Err(SessionError::Unloaded),
        }
    }
}
