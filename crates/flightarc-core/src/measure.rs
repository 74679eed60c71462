//! Line and area measurement for user sketches.
//!
//! A sketch is tagged as a line or an area; the tag picks both the
//! measurement and its formatter. [`MeasureSession`] follows one drawing
//! interaction from start to end and keeps the frozen results.

use crate::models::Coordinate;
use crate::spatial::{geodesic_area, geodesic_length, ring_center};

const LENGTH_SCALE_THRESHOLD_M: f64 = 100.0;
const AREA_SCALE_THRESHOLD_M2: f64 = 10_000.0;

pub const START_DRAWING_MSG: &str = "Click to start drawing";
pub const CONTINUE_LINE_MSG: &str = "Click to continue drawing the line";
pub const CONTINUE_POLYGON_MSG: &str = "Click to continue drawing the polygon";

/// In-progress geometry drawn by the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Sketch {
    Line(Vec<Coordinate>),
    Area(Vec<Coordinate>),
}

impl Sketch {
    pub fn measure(&self) -> Measurement {
        match self {
            Sketch::Line(coords) => Measurement::Length(geodesic_length(coords)),
            Sketch::Area(ring) => Measurement::Area(geodesic_area(ring)),
        }
    }

    /// Formatter matching this sketch's measurement.
    pub fn formatter(&self) -> fn(f64) -> String {
        match self {
            Sketch::Line(_) => format_length,
            Sketch::Area(_) => format_area,
        }
    }

    /// Where the live tooltip sits: the last vertex of a line, the middle of
    /// an area.
    pub fn tooltip_anchor(&self) -> Option<Coordinate> {
        match self {
            Sketch::Line(coords) => coords.last().copied(),
            Sketch::Area(ring) => ring_center(ring),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measurement {
    /// Meters
    Length(f64),
    /// Square meters
    Area(f64),
}

impl Measurement {
    pub fn value(&self) -> f64 {
        match self {
            Measurement::Length(v) | Measurement::Area(v) => *v,
        }
    }
}

/// Two decimals, with negative zero folded into zero.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0 + 0.0
}

/// `"50 m"` below 100 m, otherwise kilometers: `"1.5 km"`.
pub fn format_length(meters: f64) -> String {
    if meters < LENGTH_SCALE_THRESHOLD_M {
        format!("{} m", round2(meters))
    } else {
        format!("{} km", round2(meters / 1_000.0))
    }
}

/// `"m²"` below 10 000 m², otherwise `"km²"`.
pub fn format_area(square_meters: f64) -> String {
    if square_meters < AREA_SCALE_THRESHOLD_M2 {
        format!("{} m²", round2(square_meters))
    } else {
        format!("{} km²", round2(square_meters / 1_000_000.0))
    }
}

/// Help text shown next to the pointer.
pub fn help_message(sketch: Option<&Sketch>) -> &'static str {
    match sketch {
        None => START_DRAWING_MSG,
        Some(Sketch::Line(_)) => CONTINUE_LINE_MSG,
        Some(Sketch::Area(_)) => CONTINUE_POLYGON_MSG,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub text: String,
    pub anchor: Coordinate,
    /// Live tooltips follow the sketch; static ones are frozen results
    pub is_static: bool,
}

/// One measurement interaction: `draw_start`, any number of `update`s,
/// then `draw_end`.
#[derive(Debug, Default)]
pub struct MeasureSession {
    sketch: Option<Sketch>,
    live: Option<Tooltip>,
    frozen: Vec<Tooltip>,
}

impl MeasureSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a sketch; the tooltip starts at the clicked coordinate.
    pub fn draw_start(&mut self, sketch: Sketch, coordinate: Coordinate) -> &Tooltip {
        let text = sketch.formatter()(sketch.measure().value());
        self.sketch = Some(sketch);
        self.live.insert(Tooltip {
            text,
            anchor: coordinate,
            is_static: false,
        })
    }

    /// Geometry changed. Returns the refreshed live tooltip, or `None` when
    /// no drawing is in progress.
    pub fn update(&mut self, sketch: Sketch) -> Option<&Tooltip> {
        let live = self.live.as_mut()?;
        live.text = sketch.formatter()(sketch.measure().value());
        if let Some(anchor) = sketch.tooltip_anchor() {
            live.anchor = anchor;
        }
        self.sketch = Some(sketch);
        Some(&*live)
    }

    /// Finish the sketch: freeze the last value and stop listening for
    /// changes.
    pub fn draw_end(&mut self) -> Option<&Tooltip> {
        let mut tooltip = self.live.take()?;
        self.sketch = None;
        tooltip.is_static = true;
        tracing::debug!("Measurement frozen: {}", tooltip.text);
        self.frozen.push(tooltip);
        self.frozen.last()
    }

    pub fn sketch(&self) -> Option<&Sketch> {
        self.sketch.as_ref()
    }

    pub fn live_tooltip(&self) -> Option<&Tooltip> {
        self.live.as_ref()
    }

    pub fn frozen_tooltips(&self) -> &[Tooltip] {
        &self.frozen
    }

    pub fn help_message(&self) -> &'static str {
        help_message(self.sketch.as_ref())
    }
}
