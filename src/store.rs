//! Series buffer: one shared timeline plus four per-pair signal series, with
//! a staging area that defers (never drops) appends while the view is paused.
//!
//! All four series of a pair and the timeline grow in lockstep within one
//! tick; the two difference series are sparse relative to magnitude/angle
//! (they only grow on ticks with a simulation match) and must be indexed
//! independently.

use std::collections::HashMap;

use crate::messages::SePair;

/// One of the four vertically stacked signal tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Magnitude,
    Angle,
    MagnitudeDiff,
    AngleDiff,
}

impl Signal {
    pub const ALL: [Signal; 4] = [
        Signal::Magnitude,
        Signal::Angle,
        Signal::MagnitudeDiff,
        Signal::AngleDiff,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Signal::Magnitude => "Voltage magnitude (V)",
            Signal::Angle => "Voltage angle (deg)",
            Signal::MagnitudeDiff => "Magnitude difference (%)",
            Signal::AngleDiff => "Angle difference (deg)",
        }
    }

    /// Difference series only grow on ticks with a simulation match.
    pub fn is_sparse(self) -> bool {
        matches!(self, Signal::MagnitudeDiff | Signal::AngleDiff)
    }

    pub fn index(self) -> usize {
        match self {
            Signal::Magnitude => 0,
            Signal::Angle => 1,
            Signal::MagnitudeDiff => 2,
            Signal::AngleDiff => 3,
        }
    }
}

/// Timeline plus the four per-pair series maps. Two live in the store: the
/// primary set and the paused staging set.
#[derive(Debug, Default, Clone)]
struct SeriesSet {
    timeline: Vec<f64>,
    magnitude: HashMap<SePair, Vec<f64>>,
    angle: HashMap<SePair, Vec<f64>>,
    mag_diff: HashMap<SePair, Vec<f64>>,
    angle_diff: HashMap<SePair, Vec<f64>>,
}

impl SeriesSet {
    fn series(&self, signal: Signal) -> &HashMap<SePair, Vec<f64>> {
        match signal {
            Signal::Magnitude => &self.magnitude,
            Signal::Angle => &self.angle,
            Signal::MagnitudeDiff => &self.mag_diff,
            Signal::AngleDiff => &self.angle_diff,
        }
    }
}

/// Append-only store for all per-pair time series.
///
/// While paused, appends land in the staging set; `resume()` splices staged
/// data onto the primary sequences in recorded order and clears staging, so
/// pausing defers data instead of discarding it. The caller samples the
/// pause flag once per tick and passes it to every append of that tick.
#[derive(Debug, Default)]
pub struct SeriesStore {
    primary: SeriesSet,
    staged: SeriesSet,
    pair_order: Vec<SePair>,
}

impl SeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent pair registration: eager from a static configuration or
    /// lazy on first observation.
    pub fn register_pair(&mut self, pair: &SePair) {
        if self.primary.magnitude.contains_key(pair) {
            return;
        }
        self.primary.magnitude.insert(pair.clone(), Vec::new());
        self.primary.angle.insert(pair.clone(), Vec::new());
        self.primary.mag_diff.insert(pair.clone(), Vec::new());
        self.primary.angle_diff.insert(pair.clone(), Vec::new());
        self.pair_order.push(pair.clone());
    }

    pub fn is_registered(&self, pair: &SePair) -> bool {
        self.primary.magnitude.contains_key(pair)
    }

    /// Registered pairs in registration order (stable render order).
    pub fn pairs(&self) -> &[SePair] {
        &self.pair_order
    }

    fn set_mut(&mut self, paused: bool) -> &mut SeriesSet {
        if paused {
            &mut self.staged
        } else {
            &mut self.primary
        }
    }

    /// Append one elapsed-time offset to the timeline. Called exactly once
    /// per tick that buffered at least one pair.
    pub fn append_timeline(&mut self, offset: f64, paused: bool) {
        self.set_mut(paused).timeline.push(offset);
    }

    /// Append a magnitude/angle observation for one pair.
    pub fn append_sample(&mut self, pair: &SePair, magnitude: f64, angle: f64, paused: bool) {
        let set = self.set_mut(paused);
        set.magnitude.entry(pair.clone()).or_default().push(magnitude);
        set.angle.entry(pair.clone()).or_default().push(angle);
    }

    /// Append the two simulation differences for one pair.
    pub fn append_diffs(&mut self, pair: &SePair, mag_diff: f64, angle_diff: f64, paused: bool) {
        let set = self.set_mut(paused);
        set.mag_diff.entry(pair.clone()).or_default().push(mag_diff);
        set.angle_diff.entry(pair.clone()).or_default().push(angle_diff);
    }

    /// Paused -> Live transition: splice every staged sequence onto its
    /// primary counterpart in recorded order, then clear staging. One call,
    /// so the (single-threaded) render path never observes a partial merge.
    pub fn resume(&mut self) {
        let staged = std::mem::take(&mut self.staged);
        self.primary.timeline.extend(staged.timeline);
        for (pair, vals) in staged.magnitude {
            self.primary.magnitude.entry(pair).or_default().extend(vals);
        }
        for (pair, vals) in staged.angle {
            self.primary.angle.entry(pair).or_default().extend(vals);
        }
        for (pair, vals) in staged.mag_diff {
            self.primary.mag_diff.entry(pair).or_default().extend(vals);
        }
        for (pair, vals) in staged.angle_diff {
            self.primary.angle_diff.entry(pair).or_default().extend(vals);
        }
    }

    /// The primary (rendered) timeline of elapsed offsets.
    pub fn timeline(&self) -> &[f64] {
        &self.primary.timeline
    }

    /// Primary series for one signal and pair; empty if never appended.
    pub fn series(&self, signal: Signal, pair: &SePair) -> &[f64] {
        self.primary
            .series(signal)
            .get(pair)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn staged_timeline(&self) -> &[f64] {
        &self.staged.timeline
    }

    pub fn staged_series(&self, signal: Signal, pair: &SePair) -> &[f64] {
        self.staged
            .series(signal)
            .get(pair)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
