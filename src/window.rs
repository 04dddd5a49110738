//! Window calculator: the visible sub-range of a growing timeline and the
//! y-axis bounds of each signal track, from independent zoom/pan controls.
//!
//! Both calculators are pure so the axis contracts stay unit-testable; the
//! UI layer just forwards their output to the plot bounds.

use tracing::warn;

/// Visible x sub-window over the timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XWindow {
    /// Window bounds in timeline units.
    pub lo: f64,
    pub hi: f64,
    /// Half-open index range into the timeline. Computed by binary search
    /// over the actual offsets (sample spacing is not assumed fixed) and
    /// widened by one sample on each side where available, so a drawn line
    /// does not visibly truncate at the window edge.
    pub start: usize,
    pub end: usize,
}

/// Compute the visible window for a zoom width (timeline units) and a pan
/// position (0–100).
///
/// `pan = 100` pins the right edge to the latest offset, `pan = 0` pins the
/// left edge to the first; in between the window is centered at
/// `first + pan/100 * span` and clamped by sliding (filling toward the other
/// side) so it never exceeds either timeline boundary.
pub fn x_window(timeline: &[f64], zoom_width: f64, pan_percent: f64) -> Option<XWindow> {
    let first = *timeline.first()?;
    let last = *timeline.last()?;
    let span = last - first;
    let width = zoom_width.max(0.0);

    let (mut lo, mut hi) = if pan_percent >= 100.0 {
        (last - width, last)
    } else if pan_percent <= 0.0 {
        (first, first + width)
    } else {
        let center = first + span * pan_percent / 100.0;
        (center - width / 2.0, center + width / 2.0)
    };
    if hi > last {
        lo -= hi - last;
        hi = last;
    }
    if lo < first {
        hi += first - lo;
        lo = first;
    }
    if hi > last {
        hi = last;
    }

    // Largest offset not exceeding `lo` / smallest offset not less than `hi`.
    let start = timeline.partition_point(|&t| t <= lo).saturating_sub(1);
    let end = (timeline.partition_point(|&t| t < hi) + 1).min(timeline.len());

    Some(XWindow { lo, hi, start, end })
}

/// Y-axis bounds for one signal track.
///
/// `zoom_percent` (1–100) selects a window height as a fraction of the data
/// range, `pan_percent` (0–100) positions its center within the range. The
/// window is clamped into `[data_min, data_max]` by sliding (never
/// shrinking), then both ends are expanded by 3% of the window height as a
/// visual margin. An inverted input range means "no data": a default 0..100
/// range is substituted and a warning reported.
pub fn y_axis_limits(
    data_min: f64,
    data_max: f64,
    zoom_percent: f64,
    pan_percent: f64,
) -> (f64, f64) {
    let (data_min, data_max) = if data_min > data_max {
        warn!(data_min, data_max, "no data for y-axis range; substituting 0..100");
        (0.0, 100.0)
    } else {
        (data_min, data_max)
    };
    let range = data_max - data_min;
    let zoom = zoom_percent.clamp(1.0, 100.0);
    let pan = pan_percent.clamp(0.0, 100.0);

    let height = range * zoom / 100.0;
    let center = data_min + range * pan / 100.0;
    let mut low = center - height / 2.0;
    let mut high = low + height;
    if high > data_max {
        high = data_max;
        low = high - height;
    }
    if low < data_min {
        low = data_min;
        high = low + height;
    }

    let margin = height * 0.03;
    (low - margin, high + margin)
}

/// Minimum/maximum over an iterator of values. Returns an inverted range
/// (`min > max`) when the iterator is empty, which feeds the "no data"
/// substitution in [`y_axis_limits`].
pub fn data_bounds<I: IntoIterator<Item = f64>>(values: I) -> (f64, f64) {
    values
        .into_iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        })
}
