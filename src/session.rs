use std::path::{Path, PathBuf};

use image::RgbImage;
use tracing::{debug, info, warn};

use crate::analysis::{Analysis, IntensityWindow, Region, analyze};
use crate::config::{ExportSettings, Settings};
use crate::error::{ExportError, LoadError, SessionError};
use crate::export;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameters {
    pub region: Region,
    pub window: IntensityWindow,
}

/// A partial change to the session parameters. Fields left as `None` keep
/// their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParameterUpdate {
    pub center_x: Option<u32>,
    pub center_y: Option<u32>,
    pub radius: Option<u32>,
    pub lower: Option<u8>,
    pub upper: Option<u8>,
}

impl ParameterUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn center_x(mut self, center_x: u32) -> Self {
        self.center_x = Some(center_x);
        self
    }

    pub fn center_y(mut self, center_y: u32) -> Self {
        self.center_y = Some(center_y);
        self
    }

    pub fn radius(mut self, radius: u32) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn lower(mut self, lower: u8) -> Self {
        self.lower = Some(lower);
        self
    }

    pub fn upper(mut self, upper: u8) -> Self {
        self.upper = Some(upper);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn apply_to(&self, parameters: Parameters) -> Parameters {
        let Parameters { region, window } = parameters;
        Parameters {
            region: Region::new(
                self.center_x.unwrap_or(region.center_x),
                self.center_y.unwrap_or(region.center_y),
                self.radius.unwrap_or(region.radius),
            ),
            window: IntensityWindow::new(
                self.lower.unwrap_or(window.lower),
                self.upper.unwrap_or(window.upper),
            ),
        }
    }
}

/// One loaded image, its current region and window, and the latest results.
pub struct InteractiveSession {
    image: RgbImage,
    source: PathBuf,
    parameters: Parameters,
    analysis: Analysis,
    export_settings: ExportSettings,
}

impl InteractiveSession {
    /// Decodes the image at `path` and runs the first analysis with the
    /// configured defaults.
    pub fn load(path: impl AsRef<Path>, settings: &Settings) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|e| LoadError::Decode(path.to_path_buf(), e))?
            .to_rgb8();
        info!(
            "Loaded {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        Self::from_image(image, path, settings)
    }

    pub fn from_image(
        image: RgbImage,
        source: impl Into<PathBuf>,
        settings: &Settings,
    ) -> Result<Self, LoadError> {
        let source = source.into();
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(LoadError::EmptyImage(source));
        }

        let defaults = &settings.analysis;
        let parameters = Parameters {
            region: Region::centered(width, height, defaults.radius_divisor),
            window: IntensityWindow::new(defaults.default_lower, defaults.default_upper),
        };
        validate(&parameters, width, height)
            .map_err(|e| LoadError::InvalidDefaults(source.clone(), e))?;
        let analysis = analyze(&image, &parameters.region, &parameters.window);

        Ok(Self {
            image,
            source,
            parameters,
            analysis,
            export_settings: settings.export.clone(),
        })
    }

    /// Applies `update` and recomputes. A rejected update leaves the
    /// parameters and results untouched.
    pub fn set_parameters(&mut self, update: ParameterUpdate) -> Result<&Analysis, SessionError> {
        let next = update.apply_to(self.parameters);
        if let Err(e) = validate(&next, self.width(), self.height()) {
            warn!("Rejected parameter update {:?}: {}", update, e);
            return Err(e);
        }
        self.parameters = next;
        Ok(self.recompute())
    }

    pub fn recompute(&mut self) -> &Analysis {
        debug!("Recomputing with {:?}", self.parameters);
        self.analysis = analyze(
            &self.image,
            &self.parameters.region,
            &self.parameters.window,
        );
        &self.analysis
    }

    /// Writes the summary and annotated image to `destination` and returns
    /// the path of the written document.
    pub fn export(&self, destination: &Path) -> Result<PathBuf, ExportError> {
        export::write_document(
            destination,
            &self.summary(),
            &self.analysis.annotated,
            &self.export_settings,
        )?;
        Ok(destination.to_path_buf())
    }

    pub fn default_export_path(&self) -> PathBuf {
        export::export_path(&self.source, &self.export_settings.extension)
    }

    pub fn summary(&self) -> Vec<String> {
        let Parameters { region, window } = self.parameters;
        let headline = match self.analysis.percentage {
            Some(percentage) => format!("Total shrinkage is {:.2}%", percentage),
            None => "Total shrinkage is undefined (empty region)".to_string(),
        };
        vec![
            headline,
            format!(
                "center_x: {}, center_y: {}",
                region.center_x, region.center_y
            ),
            format!("radius: {}", region.radius),
            format!(
                "upper limit: {}, lower limit: {}",
                window.upper, window.lower
            ),
            format!("filename is {}", self.file_name()),
        ]
    }

    pub fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn parameters(&self) -> Parameters {
        self.parameters
    }

    pub fn analysis(&self) -> &Analysis {
        &self.analysis
    }
}

fn validate(parameters: &Parameters, width: u32, height: u32) -> Result<(), SessionError> {
    let Parameters { region, window } = *parameters;
    if !window.is_ordered() {
        return Err(SessionError::InvalidThreshold {
            lower: window.lower,
            upper: window.upper,
        });
    }
    if region.radius == 0 {
        return Err(SessionError::InvalidRadius(region.radius));
    }
    if region.center_x > width || region.center_y > height {
        return Err(SessionError::CenterOutOfBounds {
            x: region.center_x,
            y: region.center_y,
            width,
            height,
        });
    }
    Ok(())
}
