//! Core data models for flights and their animated features.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Endpoint, LoadError, RecordError};

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Check the position is finite and within the lat/lon ranges.
    pub fn validate(&self) -> Result<(), String> {
        if !self.lat.is_finite() || !self.lon.is_finite() {
            return Err(format!("non-finite position ({}, {})", self.lat, self.lon));
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(format!("latitude {} out of range", self.lat));
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(format!("longitude {} out of range", self.lon));
        }
        Ok(())
    }
}

/// Position in render space (projected map units).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// The flight list document: `{"flights": [[[lat, lon], [lat, lon]], ...]}`.
///
/// Records are kept as raw JSON so a single bad entry can be skipped
/// without rejecting the whole document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightDocument {
    #[serde(default)]
    pub flights: Vec<Value>,
}

impl FlightDocument {
    pub fn parse(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse every record, in document order.
    pub fn records(&self) -> impl Iterator<Item = Result<FlightRecord, RecordError>> + '_ {
        self.flights.iter().map(FlightRecord::from_value)
    }
}

/// One origin/destination pair from the flight document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightRecord {
    pub origin: Coordinate,
    pub destination: Coordinate,
}

impl FlightRecord {
    pub fn new(origin: Coordinate, destination: Coordinate) -> Self {
        Self {
            origin,
            destination,
        }
    }

    pub fn from_value(value: &Value) -> Result<Self, RecordError> {
        let points = value.as_array().ok_or(RecordError::NotAnArray)?;
        match points.len() {
            0 => return Err(RecordError::MissingEndpoint(Endpoint::Origin)),
            1 => return Err(RecordError::MissingEndpoint(Endpoint::Destination)),
            2 => {}
            n => return Err(RecordError::WrongArity(n)),
        }

        Ok(Self {
            origin: parse_point(&points[0], Endpoint::Origin)?,
            destination: parse_point(&points[1], Endpoint::Destination)?,
        })
    }
}

fn parse_point(value: &Value, endpoint: Endpoint) -> Result<Coordinate, RecordError> {
    if value.is_null() {
        return Err(RecordError::MissingEndpoint(endpoint));
    }
    let [lat, lon]: [f64; 2] = serde_json::from_value(value.clone()).map_err(|e| {
        RecordError::InvalidCoordinate {
            endpoint,
            reason: e.to_string(),
        }
    })?;
    let coord = Coordinate::new(lat, lon);
    coord
        .validate()
        .map_err(|reason| RecordError::InvalidCoordinate { endpoint, reason })?;
    Ok(coord)
}

/// Identifies a feature by its flight (document index) and arc piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FeatureId {
    pub flight: usize,
    pub piece: usize,
}

/// Animation state of a feature at a given time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureState {
    /// Not inserted yet, or inserted with a start time still in the future
    Pending,
    /// Start time reached, path partially revealed
    Revealing,
    /// Whole path revealed; drawn with the static style
    Finished,
}

/// One animated piece of a flight arc.
#[derive(Debug, Clone)]
pub struct FlightFeature {
    id: FeatureId,
    full_path: Vec<Point>,
    start_time: Option<i64>,
    finished: bool,
    revealed: usize,
}

impl FlightFeature {
    pub fn new(id: FeatureId, full_path: Vec<Point>) -> Self {
        Self {
            id,
            full_path,
            start_time: None,
            finished: false,
            revealed: 0,
        }
    }

    pub fn id(&self) -> FeatureId {
        self.id
    }

    pub fn full_path(&self) -> &[Point] {
        &self.full_path
    }

    pub fn len(&self) -> usize {
        self.full_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.full_path.is_empty()
    }

    /// Start of the animation in milliseconds; `None` until inserted.
    pub fn start_time(&self) -> Option<i64> {
        self.start_time
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Highest number of points revealed so far.
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    /// Time needed to reveal the whole path at the given rate.
    pub fn duration_ms(&self, points_per_ms: f64) -> f64 {
        self.full_path.len() as f64 / points_per_ms
    }

    pub fn state_at(&self, now: i64) -> FeatureState {
        if self.finished {
            return FeatureState::Finished;
        }
        match self.start_time {
            Some(start) if now >= start => FeatureState::Revealing,
            _ => FeatureState::Pending,
        }
    }

    /// Number of points that should be visible at `now`, or `None` before
    /// the start time.
    pub fn revealed_at(&self, now: i64, points_per_ms: f64) -> Option<usize> {
        let elapsed = now - self.start_time?;
        if elapsed < 0 {
            return None;
        }
        let points = (elapsed as f64 * points_per_ms).floor();
        Some((points.max(0.0) as usize).min(self.full_path.len()))
    }

    /// Set the start time. Only the first call has any effect.
    pub(crate) fn assign_start(&mut self, start: i64) -> bool {
        if self.start_time.is_some() {
            return false;
        }
        self.start_time = Some(start);
        true
    }

    /// Raise the reveal high-water mark and return it.
    pub(crate) fn reveal_to(&mut self, count: usize) -> usize {
        self.revealed = self.revealed.max(count.min(self.full_path.len()));
        self.revealed
    }

    pub(crate) fn mark_finished(&mut self) {
        self.finished = true;
    }
}

/// Features built from one flight record, inserted together.
#[derive(Debug, Clone)]
pub struct FlightBatch {
    pub flight: usize,
    pub record: FlightRecord,
    pub features: Vec<FlightFeature>,
}

impl FlightBatch {
    pub fn point_count(&self) -> usize {
        self.features.iter().map(FlightFeature::len).sum()
    }
}
