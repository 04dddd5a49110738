//! Per-track render instructions: what each signal track should draw,
//! independent of any UI toolkit.
//!
//! The rendering collaborator consumes `(x slice, y slice)` pairs and axis
//! limits; `build_track_view` produces exactly that, so the correlation core
//! and the axis math stay testable without a UI.

use std::ops::Range;

use crate::messages::SePair;
use crate::store::{SeriesStore, Signal};
use crate::window::{data_bounds, x_window, y_axis_limits, XWindow};

/// Zoom/pan control state for one signal track. Each of the four stacked
/// tracks owns one, adjusted independently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackWindow {
    /// Render the full timeline instead of a zoom window.
    pub show_all: bool,
    /// X window width in timeline units.
    pub zoom_width: f64,
    /// X pan position, 0–100.
    pub x_pan: f64,
    /// Y zoom percentage, 1–100.
    pub y_zoom: f64,
    /// Y pan position, 0–100.
    pub y_pan: f64,
}

impl Default for TrackWindow {
    fn default() -> Self {
        Self {
            show_all: true,
            zoom_width: 60.0,
            x_pan: 100.0,
            y_zoom: 100.0,
            y_pan: 50.0,
        }
    }
}

/// One per-pair polyline: index range into the shared timeline (x) and into
/// the pair's series (y). Diff series can be shorter than the timeline, so
/// the range is clipped per line.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackLine {
    pub pair: SePair,
    pub range: Range<usize>,
}

/// Render instructions for one signal track.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackView {
    pub signal: Signal,
    pub x_bounds: (f64, f64),
    pub y_bounds: (f64, f64),
    pub lines: Vec<TrackLine>,
}

/// Compute what one track should draw. Returns `None` while the timeline is
/// still empty.
pub fn build_track_view(
    store: &SeriesStore,
    signal: Signal,
    win: &TrackWindow,
) -> Option<TrackView> {
    let timeline = store.timeline();
    let last = *timeline.last()?;
    let xw = if win.show_all {
        XWindow {
            lo: timeline[0],
            hi: last,
            start: 0,
            end: timeline.len(),
        }
    } else {
        x_window(timeline, win.zoom_width, win.x_pan)?
    };

    let mut lines = Vec::new();
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for pair in store.pairs() {
        let series = store.series(signal, pair);
        let end = xw.end.min(series.len());
        if xw.start >= end {
            continue;
        }
        let (smin, smax) = data_bounds(series[xw.start..end].iter().copied());
        lo = lo.min(smin);
        hi = hi.max(smax);
        lines.push(TrackLine {
            pair: pair.clone(),
            range: xw.start..end,
        });
    }

    // When nothing was drawn (lo, hi) stays inverted and y_axis_limits
    // falls back to its 0..100 default, with an advisory.
    let y_bounds = y_axis_limits(lo, hi, win.y_zoom, win.y_pan);
    Some(TrackView {
        signal,
        x_bounds: (xw.lo, xw.hi),
        y_bounds,
        lines,
    })
}
