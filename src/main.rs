use std::path::{Path, PathBuf};

use clap::Parser;
use pixelwolf::app::{AppController, PixelwolfApp, UiEvent, pick_image};
use pixelwolf::config::{LoggingSettings, Settings};
use pixelwolf::error::AppError;
use pixelwolf::session::{InteractiveSession, ParameterUpdate};
use tracing::{error, info};

/// Measures the share of pixels inside a circular region whose grayscale
/// intensity falls within an adjustable window.
#[derive(Parser, Debug)]
#[command(name = "pixelwolf", version)]
struct Cli {
    /// Image to inspect; a file dialog opens when omitted.
    image: Option<PathBuf>,
    /// Settings file (TOML, YAML, JSON, ...).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the summary and export the document without opening a window.
    #[arg(long, requires = "image")]
    headless: bool,
    #[arg(long)]
    center_x: Option<u32>,
    #[arg(long)]
    center_y: Option<u32>,
    #[arg(long)]
    radius: Option<u32>,
    #[arg(long)]
    lower: Option<u8>,
    #[arg(long)]
    upper: Option<u8>,
}

impl Cli {
    fn overrides(&self) -> ParameterUpdate {
        ParameterUpdate {
            center_x: self.center_x,
            center_y: self.center_y,
            radius: self.radius,
            lower: self.lower,
            upper: self.upper,
        }
    }
}

fn init_logging(settings: &LoggingSettings) {
    tracing_subscriber::fmt()
        .with_max_level(settings.max_level())
        .init();
}

fn run_headless(
    path: &Path,
    settings: &Settings,
    overrides: ParameterUpdate,
) -> Result<(), AppError> {
    let mut session = InteractiveSession::load(path, settings)?;
    if !overrides.is_empty() {
        session.set_parameters(overrides)?;
    }
    for line in session.summary() {
        println!("{}", line);
    }
    let written = session.export(&session.default_export_path())?;
    println!("Saved {}", written.display());
    Ok(())
}

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;
    init_logging(&settings.logging);

    let Some(path) = cli.image.clone().or_else(pick_image) else {
        info!("No image selected, exiting.");
        return Ok(());
    };

    if cli.headless {
        return run_headless(&path, &settings, cli.overrides());
    }

    let mut controller = AppController::new(settings.clone());
    if controller.open(&path).is_ok() {
        let overrides = cli.overrides();
        if !overrides.is_empty() {
            if let Err(e) = controller.dispatch(UiEvent::ParameterChanged(overrides)) {
                error!("Ignoring command line parameters: {}", e);
            }
        }
    }

    PixelwolfApp::start_gui(&settings, controller)
}
