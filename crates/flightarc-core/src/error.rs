//! Error types for loading flights and building arcs.

use std::fmt;
use thiserror::Error;

/// Which end of a flight record a problem refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Origin,
    Destination,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Origin => f.write_str("origin"),
            Endpoint::Destination => f.write_str("destination"),
        }
    }
}

/// Failure to turn two endpoints into an arc.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArcError {
    #[error("start and end points are antipodal, the great circle is undefined")]
    Antipodal,
    #[error("start and end points coincide")]
    Degenerate,
    #[error("arc endpoints must be finite")]
    NonFinite,
}

/// A single flight record that cannot be used. The record is skipped and
/// loading continues with the next one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("flight record is not an [origin, destination] array")]
    NotAnArray,
    #[error("flight record is missing its {0}")]
    MissingEndpoint(Endpoint),
    #[error("flight record has {0} points, expected 2")]
    WrongArity(usize),
    #[error("invalid {endpoint} coordinate: {reason}")]
    InvalidCoordinate { endpoint: Endpoint, reason: String },
    #[error(transparent)]
    Arc(#[from] ArcError),
}

/// Failure to load the flight document as a whole. The store stays empty.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to parse flight document: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse animation config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid animation config: {0}")]
    Invalid(String),
}
