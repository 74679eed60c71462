//! Core logic for animated flight-path rendering.
//!
//! Flights are turned into great-circle arcs, queued for staggered insertion
//! and revealed frame by frame behind a one-shot activation gate. The
//! measurement module formats live line/area sketches.

pub mod clock;
pub mod config;
pub mod error;
pub mod gate;
pub mod great_circle;
pub mod measure;
pub mod models;
pub mod render;
pub mod scheduler;
pub mod spatial;
pub mod store;
pub mod task_queue;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AnimationConfig, POINTS_PER_MS};
pub use error::{ArcError, ConfigError, Endpoint, LoadError, RecordError};
pub use gate::{ActivationGate, GateTrigger};
pub use great_circle::{ArcOptions, GreatCircle, GreatCircleProvider};
pub use measure::{
    format_area, format_length, help_message, MeasureSession, Measurement, Sketch, Tooltip,
};
pub use models::{
    Coordinate, FeatureId, FeatureState, FlightBatch, FlightDocument, FlightFeature, FlightRecord,
    Point,
};
pub use render::{
    DrawCall, DrawContext, FrameState, RecordingContext, RenderSurface, StaticLayer, StrokeStyle,
};
pub use scheduler::{AnimationScheduler, FrameReport};
pub use spatial::{haversine_distance, WORLD_WIDTH};
pub use store::{FlightFeatureStore, InsertionReport};
pub use task_queue::TaskQueue;
