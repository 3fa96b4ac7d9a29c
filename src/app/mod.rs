pub mod controller;
pub mod pixelwolf_app;
pub mod views;

use std::path::PathBuf;

pub use controller::{AppController, DispatchOutcome, SessionState, UiEvent};
pub use pixelwolf_app::PixelwolfApp;

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "tif", "tiff"];

/// Native file dialog for choosing the sample image.
pub fn pick_image() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Get file (.png/.jpg)")
        .add_filter("Images", &IMAGE_EXTENSIONS)
        .pick_file()
}
