use thiserror::Error;

use crate::pose::Joint;

/// A sample that violates the joint schema. Missing joints are not errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MalformedSample {
    #[error("unknown joint identifier: {0:?}")]
    UnknownJoint(String),

    #[error("non-finite coordinate for {joint}")]
    NonFiniteCoordinate { joint: Joint },

    #[error("{joint} at ({x}, {y}) is outside the coordinate bounds")]
    OutOfBounds { joint: Joint, x: f32, y: f32 },

    #[error("expected {expected} landmarks, found {found}")]
    LandmarkCount { expected: usize, found: usize },
}

/// Classifier settings that would make the fall check meaningless.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidConfig {
    #[error("threshold must be finite, got {0}")]
    Threshold(f32),

    #[error("min_visibility must be within [0, 1], got {0}")]
    MinVisibility(f32),

    #[error("coordinate bounds must be finite with min <= max, got [{min}, {max}]")]
    Bounds { min: f32, max: f32 },
}

/// Failures while replaying recorded samples.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to read samples: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: invalid JSON: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line}: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: MalformedSample,
    },
}
