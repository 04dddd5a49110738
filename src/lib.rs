//! GridScope crate root: re-exports and module wiring.
//!
//! Live dashboard comparing a streaming state-estimate against a reference
//! simulation stream, per bus/phase voltage magnitude and angle. The two
//! streams arrive asynchronously over a message bus; this crate correlates
//! them tick-by-tick and renders four stacked signal tracks.
//!
//! Module map:
//! - `mapping`: one-time identifier join between the two naming schemes
//! - `correlate`: per-tick alignment and per-pair matching of the streams
//! - `store`: shared-timeline series buffer with lossless pause staging
//! - `window`: visible sub-window and y-axis bounds from zoom/pan controls
//! - `render`: per-track render instructions, independent of any UI toolkit
//! - `channel`: inbound-message channel feeding the single consumer loop
//! - `app`: egui/eframe UI drawing the four tracks

pub mod app;
pub mod channel;
pub mod config;
pub mod controllers;
pub mod correlate;
pub mod error;
pub mod mapping;
pub mod messages;
pub mod outliers;
pub mod render;
pub mod store;
pub mod window;

// Public re-exports for a compact external API
pub use app::{run_dashboard, Dashboard, DashboardApp};
pub use channel::{channel_dashboard, BusMessage, ControlEvent, DashboardSink};
pub use config::{load_band_table, load_pairs_of_interest, DashboardConfig};
pub use controllers::DashboardController;
pub use correlate::{Correlator, TickReport};
pub use error::{GridscopeError, Result};
pub use mapping::{build_identifier_map, IdentifierMap};
pub use messages::{
    Estimate, EstimateMessage, MeasurementRecord, NodeRecord, SePair, SimMrid, SimReading,
    SimulationMessage, SvEstVoltage,
};
pub use outliers::{
    default_band_table, Band, BandKind, BandSignal, BandTable, OutlierEvent, OutlierMonitor,
};
pub use render::{build_track_view, TrackLine, TrackView, TrackWindow};
pub use store::{SeriesStore, Signal};
pub use window::{data_bounds, x_window, y_axis_limits, XWindow};
