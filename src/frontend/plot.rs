//! Recording plot using egui_plot
//!
//! Draws the vm signal of the loaded recording with its derived labeling:
//!
//! - **Signal**: vm line with a filled area, optional sample points
//! - **Shading**: grey over asleep samples, dark over discarded samples
//! - **Markers**: a dashed vertical line per marker, colored by kind
//! - **Reference lines**: horizontal activity cut points
//!
//! The x axis is controlled by the app: drag pans (handled by egui_plot),
//! while key and wheel pan/zoom are queued as [`ViewOp`]s and applied to the
//! bounds egui_plot last showed. A right-click opens the labeling menu at
//! the clicked time.

use egui::{Color32, Ui};
use egui_plot::{
    GridInput, GridMark, HLine, Line, Plot, PlotBounds, PlotPoint, PlotPoints, Points, Polygon, VLine,
};

use crate::config::settings::{ViewSettings, ViewWindow};
use crate::data::annotate::Annotation;
use crate::data::table::SampleTable;
use crate::frontend::markers::{label_menu, marker_color, CURSOR_COLOR, DISCARD_FILL, SLEEP_FILL};
use crate::frontend::state::AppAction;
use crate::session::{Session, ViewRange};
use crate::types::{from_plot_x, to_plot_x, Sample, MAX_RENDER_POINTS};
use std::ops::RangeInclusive;

/// A pending change to the visible x range
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewOp {
    Set(ViewWindow),
    Pan(f64),
    ZoomIn(f64),
    ZoomOut(f64),
}

impl ViewOp {
    fn apply(self, window: ViewWindow) -> ViewWindow {
        match self {
            ViewOp::Set(w) => w,
            ViewOp::Pan(f) => window.pan(f),
            ViewOp::ZoomIn(f) => window.zoom_in(f),
            ViewOp::ZoomOut(f) => window.zoom_out(f),
        }
    }
}

/// Plot interaction state
#[derive(Debug, Default)]
pub struct PlotState {
    /// Range shown last frame
    window: Option<ViewWindow>,
    /// Ops to apply next frame
    pending: Vec<ViewOp>,
    /// Plot x of the last right-click
    pick_x: Option<f64>,
}

impl PlotState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a view change
    pub fn push(&mut self, op: ViewOp) {
        self.pending.push(op);
    }

    fn resolve_window(&mut self, shown: ViewWindow) -> (ViewWindow, bool) {
        if self.pending.is_empty() {
            return (shown, false);
        }
        let window = self.pending.drain(..).fold(shown, |w, op| op.apply(w));
        (window, true)
    }
}

/// Full extent of a recording
pub fn fit_window(table: &SampleTable) -> ViewWindow {
    let (first, last) = table.bounds();
    let (min, max) = (to_plot_x(first), to_plot_x(last));
    if max > min {
        ViewWindow::new(min, max)
    } else {
        ViewWindow::new(min - 30.0, max + 30.0)
    }
}

/// Render the plot for the session; returns labeling actions
pub fn render(state: &mut PlotState, session: &mut Session, view: &ViewSettings, ui: &mut Ui) -> Vec<AppAction> {
    let mut actions = Vec::new();

    let Some(table) = session.table() else {
        ui.centered_and_justified(|ui| {
            ui.heading("Please Load Data File");
        });
        return actions;
    };

    if session.saved_view().is_none() {
        state.pending.clear();
        state.push(ViewOp::Set(fit_window(table)));
    }

    let annotation = match session.annotate() {
        Ok(a) => a,
        Err(_) => return actions,
    };

    ui.vertical_centered(|ui| {
        ui.strong(table.source_name());
    });

    let (vm_lo, _) = table.vm_range();
    let y_lo = vm_lo.min(0.0);
    let y_hi = view.y_max.max(y_lo + 1.0);

    let plot = Plot::new("recording_plot")
        .allow_drag([true, false])
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false)
        .auto_bounds([false, false])
        .show_grid(true)
        .x_axis_label("Timestamp")
        .y_axis_label("Counts")
        .x_grid_spacer(time_grid_marks)
        .x_axis_formatter(|mark, _range| format_time_mark(mark.value, mark.step_size));

    let markers: Vec<_> = session.markers().iter().copied().collect();

    let response = plot.show(ui, |plot_ui| {
        let shown = plot_ui.plot_bounds();
        let shown = ViewWindow::new(shown.min()[0], shown.max()[0]);
        let (window, changed) = state.resolve_window(shown);
        if changed {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max([window.min, y_lo], [window.max, y_hi]));
        }
        state.window = Some(window);

        let has_discard = markers.iter().any(|m| m.kind.is_discard());
        draw_shading(plot_ui, table, &annotation, has_discard, y_lo, y_hi);

        let points = visible_points(table, window);
        let line = Line::new("vm", PlotPoints::from(points.clone()))
            .color(Color32::from_rgb(31, 119, 180))
            .fill(y_lo as f32)
            .width(1.0);
        plot_ui.line(line);

        if view.show_points && points.len() <= MAX_RENDER_POINTS / 4 {
            let scatter = Points::new("samples", PlotPoints::from(points))
                .color(Color32::from_rgb(31, 119, 180))
                .radius(2.5);
            plot_ui.points(scatter);
        }

        for &value in &view.reference_lines {
            let hline = HLine::new(format!("{}", value), value)
                .color(Color32::from_rgba_unmultiplied(255, 0, 0, 128))
                .width(1.0)
                .style(egui_plot::LineStyle::dashed_dense());
            plot_ui.hline(hline);
        }

        for marker in &markers {
            let vline = VLine::new(marker.kind.to_string(), marker.plot_x())
                .color(marker_color(marker.kind))
                .width(1.5)
                .style(egui_plot::LineStyle::dashed_loose());
            plot_ui.vline(vline);
        }
        if !markers.is_empty() {
            let marker_points: Vec<[f64; 2]> = markers.iter().map(|m| [m.plot_x(), y_lo]).collect();
            plot_ui.points(
                Points::new("markers", PlotPoints::from(marker_points))
                    .color(Color32::RED)
                    .radius(4.0),
            );
        }

        if let Some((cx, cy)) = cursor_position(plot_ui.pointer_coordinate(), window) {
            plot_ui.vline(VLine::new("cursor", cx).color(CURSOR_COLOR).width(1.0));
            plot_ui.hline(HLine::new("cursor", cy).color(CURSOR_COLOR).width(1.0));
        }
    });

    let plot_response = &response.response;

    if plot_response.hovered() {
        let scroll = ui.input(|i| i.raw_scroll_delta.y);
        if scroll > 0.0 {
            state.push(ViewOp::ZoomIn(view.scroll_zoom));
        } else if scroll < 0.0 {
            state.push(ViewOp::ZoomOut(view.scroll_zoom));
        }
        if !state.pending.is_empty() {
            ui.ctx().request_repaint();
        }
    }

    if plot_response.secondary_clicked() {
        if let Some(pos) = plot_response.interact_pointer_pos() {
            state.pick_x = Some(response.transform.value_from_position(pos).x);
        }
    }
    if let Some(x) = state.pick_x {
        plot_response.context_menu(|ui| label_menu(ui, x, &mut actions));
    }

    session.set_saved_view(state.window.map(|w| ViewRange::new(w.min, w.max)));
    actions
}

/// Crosshair position for the hovered point, if it lies in the shown range
fn cursor_position(pointer: Option<PlotPoint>, window: ViewWindow) -> Option<(f64, f64)> {
    let p = pointer?;
    (p.x.is_finite() && p.y.is_finite() && p.x >= window.min && p.x <= window.max).then_some((p.x, p.y))
}

fn rect(x0: f64, x1: f64, y0: f64, y1: f64) -> Vec<[f64; 2]> {
    vec![[x0, y0], [x1, y0], [x1, y1], [x0, y1]]
}

/// Shade asleep and discarded spans.
///
/// Until a discard marker is placed every sample is discarded, so discard
/// shading is skipped to keep the signal readable.
fn draw_shading(
    plot_ui: &mut egui_plot::PlotUi,
    table: &SampleTable,
    annotation: &Annotation,
    has_discard: bool,
    y_lo: f64,
    y_hi: f64,
) {
    let samples = table.samples();

    let discard_spans = if has_discard {
        annotation.discard_spans()
    } else {
        Vec::new()
    };
    for span in discard_spans {
        let (x0, x1) = span_x_range(samples, &span);
        let polygon = Polygon::new("discarded", PlotPoints::from(rect(x0, x1, y_lo, y_hi)))
            .fill_color(DISCARD_FILL);
        plot_ui.polygon(polygon);
    }
    for span in annotation.sleep_spans() {
        let (x0, x1) = span_x_range(samples, &span);
        let polygon = Polygon::new("asleep", PlotPoints::from(rect(x0, x1, y_lo, y_hi)))
            .fill_color(SLEEP_FILL);
        plot_ui.polygon(polygon);
    }
}

/// Plot x extent of a run of flagged samples.
///
/// Each sample covers the interval up to the next one, so the last flagged
/// sample still shows. The final sample of the recording has no successor
/// and ends at its own time.
fn span_x_range(samples: &[Sample], span: &RangeInclusive<usize>) -> (f64, f64) {
    let x = |i: usize| to_plot_x(samples[i].timestamp);
    let end = *span.end();
    let right = if end + 1 < samples.len() { x(end + 1) } else { x(end) };
    (x(*span.start()), right)
}

/// Points of the vm signal inside `window`, decimated for drawing.
///
/// One sample past each edge is included so the line reaches the border.
fn visible_points(table: &SampleTable, window: ViewWindow) -> Vec<[f64; 2]> {
    let samples = table.samples();
    let (Some(lo), Some(hi)) = (from_plot_x(window.min), from_plot_x(window.max)) else {
        return Vec::new();
    };
    let start = samples.partition_point(|s| s.timestamp < lo).saturating_sub(1);
    let end = (samples.partition_point(|s| s.timestamp <= hi) + 1).min(samples.len());
    if start >= end {
        return Vec::new();
    }
    let points: Vec<[f64; 2]> = samples[start..end].iter().map(|s| s.plot_point()).collect();
    decimate_points(&points, MAX_RENDER_POINTS)
}

/// Min/max decimation that keeps peaks visible
fn decimate_points(points: &[[f64; 2]], max_points: usize) -> Vec<[f64; 2]> {
    if points.len() <= max_points || points.is_empty() {
        return points.to_vec();
    }

    let bucket_size = points.len() / (max_points / 2).max(1);
    let mut result = Vec::with_capacity(max_points + 2);

    result.push(points[0]);

    for bucket in points[1..points.len().saturating_sub(1)].chunks(bucket_size) {
        let (min_pt, max_pt) = bucket.iter().fold((bucket[0], bucket[0]), |(min, max), pt| {
            (
                if pt[1] < min[1] { *pt } else { min },
                if pt[1] > max[1] { *pt } else { max },
            )
        });
        if min_pt[0] < max_pt[0] {
            result.push(min_pt);
            result.push(max_pt);
        } else {
            result.push(max_pt);
            result.push(min_pt);
        }
    }

    if let Some(last) = points.last() {
        result.push(*last);
    }

    result
}

const TIME_STEPS: &[f64] = &[
    1.0, 5.0, 10.0, 30.0, 60.0, 300.0, 600.0, 1800.0, 3600.0, 10800.0, 21600.0, 43200.0, 86400.0,
];

/// Clock-aligned grid marks for the time axis
fn time_grid_marks(input: GridInput) -> Vec<GridMark> {
    let (min, max) = input.bounds;
    let range = max - min;
    if !(range.is_finite() && range > 0.0) {
        return Vec::new();
    }

    let step = TIME_STEPS
        .iter()
        .copied()
        .find(|s| range / s <= 8.0)
        .unwrap_or_else(|| (range / 8.0 / 86400.0).ceil() * 86400.0);

    let mut marks = Vec::new();
    let mut current = (min / step).ceil() * step;
    while current <= max {
        marks.push(GridMark {
            value: current,
            step_size: step,
        });
        current += step;
    }
    marks
}

fn format_time_mark(value: f64, step: f64) -> String {
    let Some(t) = from_plot_x(value) else {
        return String::new();
    };
    let format = if step < 60.0 {
        "%H:%M:%S"
    } else if step < 86400.0 {
        "%m-%d %H:%M"
    } else {
        "%Y-%m-%d"
    };
    t.format(format).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeDelta};

    fn table(n: i64) -> SampleTable {
        let base = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let samples = (0..n)
            .map(|i| Sample::new(base + TimeDelta::seconds(i * 60), 0.0, 0.0, 0.0, i as f64))
            .collect();
        SampleTable::from_samples(samples, "p.csv").unwrap()
    }

    #[test]
    fn test_fit_window_spans_recording() {
        let t = table(11);
        let w = fit_window(&t);
        assert!((w.width() - 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_fit_window_single_sample() {
        let w = fit_window(&table(1));
        assert!(w.width() > 0.0);
    }

    #[test]
    fn test_span_reaches_next_sample() {
        let t = table(5);
        let samples = t.samples();
        let x = |i: usize| to_plot_x(samples[i].timestamp);

        let (x0, x1) = span_x_range(samples, &(2..=2));
        assert_eq!(x0, x(2));
        assert_eq!(x1, x(3));
        assert!(x1 - x0 > 0.0);

        assert_eq!(span_x_range(samples, &(1..=3)), (x(1), x(4)));
        assert_eq!(span_x_range(samples, &(3..=4)), (x(3), x(4)));
    }

    #[test]
    fn test_cursor_follows_pointer_inside_window() {
        let window = ViewWindow::new(100.0, 200.0);
        assert_eq!(
            cursor_position(Some(PlotPoint::new(150.0, 42.0)), window),
            Some((150.0, 42.0))
        );
        assert_eq!(cursor_position(Some(PlotPoint::new(250.0, 42.0)), window), None);
        assert_eq!(cursor_position(Some(PlotPoint::new(f64::NAN, 1.0)), window), None);
        assert_eq!(cursor_position(None, window), None);
    }

    #[test]
    fn test_view_ops_applied_in_order() {
        let mut state = PlotState::new();
        state.push(ViewOp::Set(ViewWindow::new(0.0, 100.0)));
        state.push(ViewOp::Pan(0.1));
        state.push(ViewOp::ZoomIn(0.1));
        let (w, changed) = state.resolve_window(ViewWindow::new(-5.0, 5.0));
        assert!(changed);
        assert_eq!(w, ViewWindow::new(20.0, 100.0));

        let (same, changed) = state.resolve_window(w);
        assert!(!changed);
        assert_eq!(same, w);
    }

    #[test]
    fn test_visible_points_clipped() {
        let t = table(100);
        let first = to_plot_x(t.bounds().0);
        let window = ViewWindow::new(first + 600.0, first + 1200.0);
        let pts = visible_points(&t, window);
        // samples 10..=20 plus one on each side
        assert_eq!(pts.len(), 13);
        assert_eq!(pts[0][1], 9.0);
    }

    #[test]
    fn test_decimate_keeps_extremes() {
        let points: Vec<[f64; 2]> = (0..10_000)
            .map(|i| [i as f64, if i == 5_000 { 999.0 } else { 1.0 }])
            .collect();
        let out = decimate_points(&points, 100);
        assert!(out.len() <= 110);
        assert!(out.iter().any(|p| p[1] == 999.0));
    }

    #[test]
    fn test_format_time_mark() {
        let x = to_plot_x(
            NaiveDate::from_ymd_opt(2020, 1, 2)
                .unwrap()
                .and_hms_opt(3, 4, 5)
                .unwrap(),
        );
        assert_eq!(format_time_mark(x, 10.0), "03:04:05");
        assert_eq!(format_time_mark(x, 600.0), "01-02 03:04");
        assert_eq!(format_time_mark(x, 86400.0), "2020-01-02");
    }
}
