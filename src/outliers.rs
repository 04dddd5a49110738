//! Outlier classification: model-specific threshold bands over the computed
//! stream differences.
//!
//! Classification is purely observational; it never alters control flow. The
//! band table is data-driven configuration keyed by model identity so new
//! feeder models are one table entry, not a code branch. Unknown models
//! produce no classification.

use std::collections::HashMap;
use std::sync::mpsc::{Receiver, Sender};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::messages::SePair;

// ─────────────────────────────────────────────────────────────────────────────
// Bands
// ─────────────────────────────────────────────────────────────────────────────

/// Which computed value a band applies to. `Magnitude` bands apply to the
/// raw estimate magnitude of pairs that had no simulation match this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandSignal {
    PercentDiff,
    AngleDiff,
    Magnitude,
}

/// Band condition kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandKind {
    /// Outlier when value > `value`
    Above { value: f64 },
    /// Outlier when value < `value`
    Below { value: f64 },
}

impl BandKind {
    #[inline]
    pub fn is_violated(&self, v: f64) -> bool {
        match self {
            BandKind::Above { value } => v > *value,
            BandKind::Below { value } => v < *value,
        }
    }
}

/// One threshold band of a model's table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub signal: BandSignal,
    pub kind: BandKind,
}

/// Per-model band tables, serde-loadable from YAML or JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BandTable {
    pub models: HashMap<String, Vec<Band>>,
}

impl BandTable {
    pub fn bands_for(&self, model: &str) -> &[Band] {
        self.models.get(model).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }
}

static DEFAULT_BANDS: Lazy<BandTable> = Lazy::new(|| {
    let mut models = HashMap::new();
    models.insert(
        "ieee13nodecktassets".to_string(),
        vec![Band {
            signal: BandSignal::PercentDiff,
            kind: BandKind::Below { value: -2.0 },
        }],
    );
    models.insert(
        "ieee123".to_string(),
        vec![
            Band {
                signal: BandSignal::PercentDiff,
                kind: BandKind::Above { value: 3.0 },
            },
            Band {
                signal: BandSignal::PercentDiff,
                kind: BandKind::Below { value: -2.0 },
            },
        ],
    );
    models.insert(
        "ieee8500".to_string(),
        vec![
            Band {
                signal: BandSignal::PercentDiff,
                kind: BandKind::Below { value: -2.0 },
            },
            Band {
                signal: BandSignal::AngleDiff,
                kind: BandKind::Above { value: 5.0 },
            },
            Band {
                signal: BandSignal::Magnitude,
                kind: BandKind::Above { value: 1.0e5 },
            },
        ],
    );
    BandTable { models }
});

/// Built-in band tables for the feeder models shipped with the demos.
pub fn default_band_table() -> BandTable {
    DEFAULT_BANDS.clone()
}

// ─────────────────────────────────────────────────────────────────────────────
// Monitor
// ─────────────────────────────────────────────────────────────────────────────

/// One out-of-band observation.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlierEvent {
    pub pair: SePair,
    pub signal: BandSignal,
    pub value: f64,
    pub band: Band,
    pub timestamp: i64,
}

/// Classifies per-pair observations against the active model's bands and
/// fans resulting events out to subscribers.
pub struct OutlierMonitor {
    model: String,
    table: BandTable,
    listeners: Vec<Sender<OutlierEvent>>,
}

impl OutlierMonitor {
    pub fn new<S: Into<String>>(model: S, table: BandTable) -> Self {
        Self {
            model: model.into(),
            table,
            listeners: Vec::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Subscribe to outlier events as they are classified.
    pub fn subscribe(&mut self) -> Receiver<OutlierEvent> {
        let (tx, rx) = std::sync::mpsc::channel();
        self.listeners.push(tx);
        rx
    }

    /// Classify one matched observation (both differences available).
    pub fn classify_matched(
        &mut self,
        pair: &SePair,
        timestamp: i64,
        percent_diff: f64,
        angle_diff: f64,
    ) -> Vec<OutlierEvent> {
        self.classify(pair, timestamp, |signal| match signal {
            BandSignal::PercentDiff => Some(percent_diff),
            BandSignal::AngleDiff => Some(angle_diff),
            BandSignal::Magnitude => None,
        })
    }

    /// Classify one unmatched observation (raw magnitude only).
    pub fn classify_unmatched(
        &mut self,
        pair: &SePair,
        timestamp: i64,
        magnitude: f64,
    ) -> Vec<OutlierEvent> {
        self.classify(pair, timestamp, |signal| match signal {
            BandSignal::Magnitude => Some(magnitude),
            _ => None,
        })
    }

    fn classify<F>(&mut self, pair: &SePair, timestamp: i64, value_of: F) -> Vec<OutlierEvent>
    where
        F: Fn(BandSignal) -> Option<f64>,
    {
        let mut events = Vec::new();
        for band in self.table.bands_for(&self.model) {
            let Some(value) = value_of(band.signal) else {
                continue;
            };
            if band.kind.is_violated(value) {
                events.push(OutlierEvent {
                    pair: pair.clone(),
                    signal: band.signal,
                    value,
                    band: *band,
                    timestamp,
                });
            }
        }
        if !events.is_empty() {
            self.listeners
                .retain(|tx| events.iter().all(|e| tx.send(e.clone()).is_ok()));
        }
        events
    }
}
