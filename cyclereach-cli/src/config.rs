use std::path::{Path, PathBuf};

use cyclereach_core::{Error, loading::AnalysisConfig};
use serde::Deserialize;

/// Input data locations
#[derive(Debug, Clone, Deserialize)]
pub struct InputPaths {
    /// GeoJSON street features
    pub streets: PathBuf,
    /// Shelter points, GeoJSON or CSV
    pub shelters: PathBuf,
    /// ESRI ASCII grid elevation raster
    pub elevation: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

/// Run configuration file
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    pub input: InputPaths,
    #[serde(default)]
    pub output: Option<OutputConfig>,
    #[serde(flatten)]
    pub analysis: AnalysisConfig,
}

impl RunConfig {
    /// Loads the file and resolves relative input paths against its directory
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&content)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, Error> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        resolve(&mut self.input.streets);
        resolve(&mut self.input.shelters);
        resolve(&mut self.input.elevation);
        if let Some(output) = &mut self.output {
            resolve(&mut output.dir);
        }
    }
}
