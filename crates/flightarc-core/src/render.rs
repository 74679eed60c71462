//! Render-side interfaces: the paint surface, the drawing context and the
//! static style layer for finished flights.

use serde::{Deserialize, Serialize};

use crate::models::{FlightFeature, Point};
use crate::spatial::{world_wrap_offset, WORLD_WIDTH};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: String,
    pub width: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: "#FF0000".to_string(),
            width: 2.0,
        }
    }
}

/// Immediate-mode drawing target handed to the painters each frame.
pub trait DrawContext {
    fn set_style(&mut self, style: &StrokeStyle);
    fn draw_line(&mut self, points: &[Point]);
}

/// View geometry and time captured at the start of a paint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    /// Frame time in milliseconds
    pub time: i64,
    pub view_center_x: f64,
    pub world_width: f64,
}

impl FrameState {
    pub fn new(time: i64, view_center_x: f64) -> Self {
        Self {
            time,
            view_center_x,
            world_width: WORLD_WIDTH,
        }
    }

    /// Horizontal translations of the two world copies nearest the view.
    pub fn wrap_shifts(&self) -> [f64; 2] {
        let base = world_wrap_offset(self.view_center_x, self.world_width) * self.world_width;
        [base, base + self.world_width]
    }
}

/// The paint loop driving the animation.
///
/// Instead of the painter re-registering itself, the surface polls
/// `AnimationScheduler::animation_active` after each paint and keeps
/// repainting while it is set.
pub trait RenderSurface {
    fn now(&self) -> i64;
    fn view_center_x(&self) -> f64;
    fn world_width(&self) -> f64;

    fn frame_state(&self) -> FrameState {
        FrameState {
            time: self.now(),
            view_center_x: self.view_center_x(),
            world_width: self.world_width(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Style(StrokeStyle),
    Line(Vec<Point>),
}

/// Context that records draw calls instead of rasterizing them.
#[derive(Debug, Default)]
pub struct RecordingContext {
    calls: Vec<DrawCall>,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn lines(&self) -> impl Iterator<Item = &[Point]> {
        self.calls.iter().filter_map(|call| match call {
            DrawCall::Line(points) => Some(points.as_slice()),
            DrawCall::Style(_) => None,
        })
    }

    pub fn line_count(&self) -> usize {
        self.lines().count()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl DrawContext for RecordingContext {
    fn set_style(&mut self, style: &StrokeStyle) {
        self.calls.push(DrawCall::Style(style.clone()));
    }

    fn draw_line(&mut self, points: &[Point]) {
        self.calls.push(DrawCall::Line(points.to_vec()));
    }
}

/// Layer drawing features through a style function: finished features get
/// the static stroke, everything else is invisible here.
#[derive(Debug, Clone)]
pub struct StaticLayer {
    style: StrokeStyle,
}

impl StaticLayer {
    pub fn new(style: StrokeStyle) -> Self {
        Self { style }
    }

    pub fn style_for(&self, feature: &FlightFeature) -> Option<&StrokeStyle> {
        feature.is_finished().then_some(&self.style)
    }

    /// Draw every styled feature on the two world copies around the view.
    /// Returns the number of features drawn.
    pub fn render<'a>(
        &self,
        features: impl IntoIterator<Item = &'a FlightFeature>,
        frame: &FrameState,
        ctx: &mut dyn DrawContext,
    ) -> usize {
        let mut drawn = 0;
        let mut current: Option<&StrokeStyle> = None;
        for feature in features {
            let Some(style) = self.style_for(feature) else {
                continue;
            };
            if current != Some(style) {
                ctx.set_style(style);
                current = Some(style);
            }
            for shift in frame.wrap_shifts() {
                ctx.draw_line(&translated(feature.full_path(), shift));
            }
            drawn += 1;
        }
        drawn
    }
}

pub(crate) fn translated(points: &[Point], dx: f64) -> Vec<Point> {
    points.iter().map(|p| p.translate(dx, 0.0)).collect()
}
