//! Wire types for the two inbound streams and the one-time mapping queries.
//!
//! Field names follow the bus payloads exactly (via `#[serde(rename)]`), so
//! a transport adapter can hand raw JSON straight to `serde_json`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Identifiers
// ─────────────────────────────────────────────────────────────────────────────

/// Estimator-side key for one node/phase voltage observation.
///
/// Stable for the lifetime of a run; displayed as `"node,phase"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SePair {
    pub node: String,
    pub phase: String,
}

impl SePair {
    pub fn new<N: Into<String>, P: Into<String>>(node: N, phase: P) -> Self {
        Self {
            node: node.into(),
            phase: phase.into(),
        }
    }
}

impl fmt::Display for SePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.node, self.phase)
    }
}

/// Simulation-side measurement identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimMrid(pub String);

impl fmt::Display for SimMrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SimMrid {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Estimate stream
// ─────────────────────────────────────────────────────────────────────────────

/// One estimate batch; `timestamp` is a discrete tick counter shared with the
/// simulation clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateMessage {
    pub timestamp: i64,
    #[serde(rename = "Estimate")]
    pub estimate: Estimate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Estimate {
    #[serde(rename = "SvEstVoltages")]
    pub sv_est_voltages: Vec<SvEstVoltage>,
}

/// Per-pair voltage estimate: magnitude `v` and `angle` in degrees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SvEstVoltage {
    #[serde(rename = "ConnectivityNode")]
    pub connectivity_node: String,
    pub phase: String,
    pub v: f64,
    pub angle: f64,
}

impl SvEstVoltage {
    pub fn pair(&self) -> SePair {
        SePair::new(self.connectivity_node.clone(), self.phase.clone())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Simulation stream
// ─────────────────────────────────────────────────────────────────────────────

/// One simulation output batch, keyed by measurement mRID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationMessage {
    pub timestamp: i64,
    pub measurements: HashMap<SimMrid, SimReading>,
}

/// One simulation reading. Not every measurement carries a magnitude (switch
/// positions and tap changers share the stream), so both fields are optional.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimReading {
    #[serde(default)]
    pub magnitude: Option<f64>,
    #[serde(default)]
    pub angle: Option<f64>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Mapping query responses
// ─────────────────────────────────────────────────────────────────────────────

/// One row of the configuration/measurement index query.
/// Only `measurementType == "PNV"` rows participate in the identifier join.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementRecord {
    #[serde(rename = "mRID")]
    pub mrid: String,
    #[serde(rename = "ConnectivityNode")]
    pub connectivity_node: String,
    pub phases: String,
    #[serde(rename = "measurementType")]
    pub measurement_type: String,
}

/// One row of the connectivity-node model query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRecord {
    pub cnid: String,
    pub cnname: String,
}
