use std::fmt;

use thiserror::Error;

/// Pipeline stage, used to report which part of a run failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Configuration,
    Normalization,
    CostModel,
    GraphBuild,
    Connectivity,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Configuration => "configuration",
            Self::Normalization => "geometry normalization",
            Self::CostModel => "cost model",
            Self::GraphBuild => "graph build",
            Self::Connectivity => "connectivity",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid data: {0}")]
    DataError(String),
    #[error("Invalid geometry: {0}")]
    GeometryError(String),
    #[error("No elevation data at ({x}, {y})")]
    MissingElevation { x: f64, y: f64 },
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: PipelineStage,
        #[source]
        source: Box<Error>,
    },
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl Error {
    /// Wraps the error with the stage it aborted
    pub(crate) fn in_stage(self, stage: PipelineStage) -> Self {
        match self {
            Self::Stage { .. } => self,
            other => Self::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// Stage that failed, if known
    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
