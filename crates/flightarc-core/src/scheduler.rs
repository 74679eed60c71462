//! Per-frame reveal of flight paths.
//!
//! Each paint advances every started, unfinished feature to the prefix of
//! its path that `points_per_ms` allows and draws it twice: on the world
//! copy under the view center and on the next one east, so arcs stay
//! continuous when the map is panned across the wrap boundary.
//!
//! Feature states only move forward: pending, revealing, finished. A
//! finished feature is drawn once more by the frame that finished it and
//! afterwards only by the static layer.

use crate::config::AnimationConfig;
use crate::gate::ActivationGate;
use crate::render::{translated, DrawContext, FrameState, StrokeStyle};
use crate::store::FlightFeatureStore;

/// What a single paint did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Features with a non-empty prefix drawn this frame
    pub drawn_features: usize,
    pub draw_calls: usize,
    pub newly_finished: usize,
    /// Features skipped because their start time is still ahead
    pub waiting: usize,
}

pub struct AnimationScheduler {
    gate: ActivationGate,
    style: StrokeStyle,
    animation_active: bool,
}

impl AnimationScheduler {
    pub fn new(gate: ActivationGate, config: &AnimationConfig) -> Self {
        Self {
            gate,
            style: config.stroke.clone(),
            animation_active: false,
        }
    }

    /// Whether the surface should schedule another paint.
    pub fn animation_active(&self) -> bool {
        self.animation_active
    }

    /// Paint callback: reveal and draw every active, unfinished feature.
    pub fn on_paint(
        &mut self,
        store: &mut FlightFeatureStore,
        frame: &FrameState,
        ctx: &mut dyn DrawContext,
    ) -> FrameReport {
        let mut report = FrameReport::default();

        if !self.gate.is_open() {
            self.animation_active = false;
            return report;
        }

        ctx.set_style(&self.style);
        let shifts = frame.wrap_shifts();
        let points_per_ms = store.points_per_ms();

        for feature in store.active_features_mut() {
            if feature.is_finished() {
                continue;
            }

            let Some(target) = feature.revealed_at(frame.time, points_per_ms) else {
                report.waiting += 1;
                continue;
            };

            let revealed = feature.reveal_to(target);
            if revealed >= feature.len() {
                feature.mark_finished();
                report.newly_finished += 1;
                tracing::trace!("Feature {:?} finished at {}", feature.id(), frame.time);
            }

            if revealed == 0 {
                continue;
            }

            let visible = &feature.full_path()[..revealed];
            for shift in shifts {
                ctx.draw_line(&translated(visible, shift));
                report.draw_calls += 1;
            }
            report.drawn_features += 1;
        }

        self.animation_active = store.has_unfinished() || store.pending_insertions() > 0;
        report
    }
}
