//! Headless animation loop.
//!
//! Plays the same frame sequence a map would: each tick advances the
//! insertion queue, paints the static layer and then the animated reveal,
//! and keeps going while the scheduler reports the animation as active.

use std::time::Duration;

use tokio::time::{interval, Instant, MissedTickBehavior};

use flightarc_core::{
    ActivationGate, AnimationConfig, AnimationScheduler, Clock, FlightDocument, FlightFeatureStore,
    GreatCircle, RecordingContext, RenderSurface, StaticLayer, SystemClock, WORLD_WIDTH,
};

/// Epoch milliseconds driven by tokio's clock, so paused test time moves
/// the animation too.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: Instant,
    epoch_ms: i64,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            epoch_ms: SystemClock.now_ms(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now_ms(&self) -> i64 {
        self.epoch_ms + self.origin.elapsed().as_millis() as i64
    }
}

/// Render surface with a fixed view and no output device.
pub struct HeadlessSurface<C: Clock> {
    clock: C,
    view_center_x: f64,
    world_width: f64,
}

impl<C: Clock> HeadlessSurface<C> {
    pub fn new(clock: C, view_center_x: f64) -> Self {
        Self {
            clock,
            view_center_x,
            world_width: WORLD_WIDTH,
        }
    }
}

impl<C: Clock> RenderSurface for HeadlessSurface<C> {
    fn now(&self) -> i64 {
        self.clock.now_ms()
    }

    fn view_center_x(&self) -> f64 {
        self.view_center_x
    }

    fn world_width(&self) -> f64 {
        self.world_width
    }
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Stop after this many frames even if flights are still animating
    pub max_frames: Option<usize>,
    pub frame_interval: Duration,
    /// Delay before the start trigger opens the gate
    pub start_after: Duration,
    pub view_center_x: f64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_frames: None,
            frame_interval: Duration::from_millis(16),
            start_after: Duration::ZERO,
            view_center_x: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub load_error: Option<String>,
    pub frames: usize,
    pub loaded_batches: usize,
    pub inserted_batches: usize,
    pub dropped_batches: usize,
    pub total_features: usize,
    pub finished_features: usize,
    pub draw_calls: usize,
    /// Every inserted flight finished and nothing is left to insert
    pub completed: bool,
}

/// Load `document`, schedule its flights and paint frames until the
/// animation completes or `max_frames` is reached.
pub async fn run_animation(
    document: &str,
    config: &AnimationConfig,
    options: &RunOptions,
) -> RunSummary {
    let mut summary = RunSummary::default();
    let surface = HeadlessSurface::new(TokioClock::new(), options.view_center_x);

    let (gate, trigger) = ActivationGate::closed();
    let mut store = FlightFeatureStore::new(gate.clone(), Box::new(GreatCircle), config);
    let mut scheduler = AnimationScheduler::new(gate.clone(), config);
    let static_layer = StaticLayer::new(config.stroke.clone());

    match FlightDocument::parse(document) {
        Ok(document) => {
            let batches = store.load_document(&document);
            summary.loaded_batches = batches.len();
            store.schedule_all(batches, surface.now());
        }
        Err(e) => {
            tracing::error!("Flight document not loaded: {}", e);
            summary.load_error = Some(e.to_string());
            return summary;
        }
    }

    let start_at = surface.now() + options.start_after.as_millis() as i64;
    let mut trigger = Some(trigger);
    let mut ticker = interval(options.frame_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut ctx = RecordingContext::new();

    loop {
        if options.max_frames.is_some_and(|max| summary.frames >= max) {
            break;
        }
        ticker.tick().await;
        let frame = surface.frame_state();

        if frame.time >= start_at {
            if let Some(trigger) = trigger.take() {
                trigger.open();
            }
        }

        let inserted = store.advance(frame.time);
        summary.inserted_batches += inserted.inserted_batches;
        summary.dropped_batches += inserted.dropped_batches;

        ctx.clear();
        static_layer.render(store.static_features(), &frame, &mut ctx);
        let report = scheduler.on_paint(&mut store, &frame, &mut ctx);

        summary.frames += 1;
        summary.draw_calls += ctx.line_count();
        tracing::debug!(
            "Frame {} @ {}: {} revealing, {} finished, {} waiting, {} pending insertion(s)",
            summary.frames,
            frame.time,
            report.drawn_features,
            report.newly_finished,
            report.waiting,
            store.pending_insertions()
        );

        if gate.is_open() && !scheduler.animation_active() {
            summary.completed = true;
            break;
        }
    }

    summary.total_features = store.active_features().len();
    summary.finished_features = store.static_features().count();
    tracing::info!(
        "Animation stopped after {} frame(s): {}/{} feature(s) finished",
        summary.frames,
        summary.finished_features,
        summary.total_features
    );
    summary
}
