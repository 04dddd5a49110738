//! Run configuration for the dashboard.
//!
//! A configured-but-unreadable pairs-of-interest or band-table file is a
//! setup fault: the run aborts before streaming starts.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::controllers::DashboardController;
use crate::error::{GridscopeError, Result};
use crate::messages::SePair;
use crate::outliers::{default_band_table, BandTable};
use crate::render::TrackWindow;

/// Top-level configuration for the dashboard.
#[derive(Clone)]
pub struct DashboardConfig {
    /// Model identity; selects the outlier band table entry.
    pub model: String,
    /// Static pairs of interest. `None` tracks every observed pair,
    /// registered lazily on first sighting.
    pub pairs_of_interest: Option<HashSet<SePair>>,
    /// Outlier band table; defaults to the built-in per-model table.
    pub bands: BandTable,
    /// Window title. `None` falls back to a default.
    pub title: Option<String>,
    /// Initial zoom/pan state applied to every track.
    pub track_defaults: TrackWindow,
    /// Optional external controller for pause/show-all requests and
    /// tick/outlier subscriptions.
    pub controller: Option<DashboardController>,
    /// Override the native window options.
    pub native_options: Option<eframe::NativeOptions>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            model: String::new(),
            pairs_of_interest: None,
            bands: default_band_table(),
            title: None,
            track_defaults: TrackWindow::default(),
            controller: None,
            native_options: None,
        }
    }
}

impl DashboardConfig {
    pub fn for_model<S: Into<String>>(model: S) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }
}

/// One entry of a pairs-of-interest file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PairEntry {
    node: String,
    phase: String,
}

/// Load a static pairs-of-interest file: a YAML (or JSON) list of
/// `{node, phase}` entries.
pub fn load_pairs_of_interest(path: &Path) -> Result<HashSet<SePair>> {
    let text = std::fs::read_to_string(path).map_err(|e| GridscopeError::Setup {
        what: format!("pair configuration {}: {e}", path.display()),
    })?;
    let entries: Vec<PairEntry> = serde_yaml::from_str(&text)?;
    Ok(entries
        .into_iter()
        .map(|p| SePair::new(p.node, p.phase))
        .collect())
}

/// Load an outlier band table from a YAML (or JSON) file.
pub fn load_band_table(path: &Path) -> Result<BandTable> {
    let text = std::fs::read_to_string(path).map_err(|e| GridscopeError::Setup {
        what: format!("band table {}: {e}", path.display()),
    })?;
    BandTable::from_yaml(&text)
}
