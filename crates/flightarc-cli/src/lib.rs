//! flightarc CLI - headless animation driver and measurement tools.
//!
//! - `flightarc animate`: load a flight document and play the reveal
//!   animation against a recording surface
//! - `flightarc measure`: measure a line or polygon and print the label

pub mod measure;
pub mod runner;
pub mod source;

pub use measure::{measure_points, parse_coordinate, SketchKind};
pub use runner::{run_animation, HeadlessSurface, RunOptions, RunSummary, TokioClock};
pub use source::fetch_document;
