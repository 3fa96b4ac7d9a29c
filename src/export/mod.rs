pub mod pdf;

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbImage;
use tracing::info;

use crate::config::ExportSettings;
use crate::error::ExportError;
use pdf::PageLayout;

/// `<source_dir>/<source_stem>.<extension>`
pub fn export_path(source: &Path, extension: &str) -> PathBuf {
    let mut name = source
        .file_stem()
        .unwrap_or(source.as_os_str())
        .to_os_string();
    name.push(".");
    name.push(extension);
    source.with_file_name(name)
}

/// Writes the summary lines and the annotated image to `destination` as a
/// single document.
pub fn write_document(
    destination: &Path,
    lines: &[String],
    image: &RgbImage,
    settings: &ExportSettings,
) -> Result<(), ExportError> {
    let bytes = pdf::render(&PageLayout {
        lines,
        image,
        panel_size: settings.panel_size,
        font_size: settings.font_size,
    })?;
    fs::write(destination, &bytes)
        .map_err(|e| ExportError::Io(destination.to_path_buf(), e))?;
    info!("Exported {} bytes to {}", bytes.len(), destination.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    #[test]
    fn test_export_path_replaces_extension() {
        let path = export_path(Path::new("/data/samples/disc_04.jpg"), "pdf");
        assert_eq!(path, PathBuf::from("/data/samples/disc_04.pdf"));
    }

    #[test]
    fn test_export_path_keeps_inner_dots() {
        let path = export_path(Path::new("run.2024.02.png"), "pdf");
        assert_eq!(path, PathBuf::from("run.2024.02.pdf"));
    }

    #[test]
    fn test_unwritable_destination_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("missing").join("out.pdf");
        let image: RgbImage = ImageBuffer::from_pixel(4, 4, Rgb([0, 0, 0]));

        let result = write_document(&destination, &[], &image, &ExportSettings::default());
        assert!(matches!(result, Err(ExportError::Io(path, _)) if path == destination));
    }
}
