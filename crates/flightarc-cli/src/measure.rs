//! Command-line measurement of sketched lines and polygons.

use anyhow::{anyhow, bail, Result};
use clap::ValueEnum;
use flightarc_core::{Coordinate, MeasureSession, Sketch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SketchKind {
    Line,
    Area,
}

impl SketchKind {
    fn sketch(self, coords: Vec<Coordinate>) -> Sketch {
        match self {
            SketchKind::Line => Sketch::Line(coords),
            SketchKind::Area => Sketch::Area(coords),
        }
    }
}

/// Parse `"lat,lon"` in decimal degrees.
pub fn parse_coordinate(text: &str) -> Result<Coordinate> {
    let (lat, lon) = text
        .split_once(',')
        .ok_or_else(|| anyhow!("expected lat,lon but got {:?}", text))?;
    let coord = Coordinate::new(lat.trim().parse()?, lon.trim().parse()?);
    coord.validate().map_err(|reason| anyhow!(reason))?;
    Ok(coord)
}

/// Replay the points as clicks of one drawing interaction and return the
/// frozen label.
pub fn measure_points(kind: SketchKind, points: &[Coordinate]) -> Result<String> {
    let Some(&first) = points.first() else {
        bail!("at least one point is required");
    };

    let mut session = MeasureSession::new();
    session.draw_start(kind.sketch(vec![first]), first);
    for n in 2..=points.len() {
        let label = session
            .update(kind.sketch(points[..n].to_vec()))
            .map(|tooltip| tooltip.text.clone());
        if let Some(label) = label {
            tracing::debug!("{} -> {}", session.help_message(), label);
        }
    }

    session
        .draw_end()
        .map(|tooltip| tooltip.text.clone())
        .ok_or_else(|| anyhow!("measurement did not produce a label"))
}
