//! Stream correlator: aligns each incoming estimate batch with the pending
//! simulation output and matches per-pair records.
//!
//! The two streams arrive out of lockstep and at different rates, but share
//! one discrete tick clock, so alignment is exact-timestamp equality. Sim
//! batches older than the estimate tick being processed can never match and
//! are purged up front so the pending store stays bounded.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, warn};

use crate::error::{GridscopeError, Result};
use crate::mapping::IdentifierMap;
use crate::messages::{EstimateMessage, SePair, SimMrid, SimReading, SimulationMessage};
use crate::outliers::{OutlierEvent, OutlierMonitor};
use crate::store::SeriesStore;

/// Summary of one estimate-batch tick, for reporting and subscribers.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub timestamp: i64,
    /// Elapsed offset appended to the timeline, if any pair was buffered.
    pub offset: Option<f64>,
    pub pairs_seen: usize,
    pub pairs_accepted: usize,
    pub pairs_matched: usize,
    pub stale_purged: usize,
    pub snapshot_claimed: bool,
    pub outliers: Vec<OutlierEvent>,
}

/// Per-run correlator state. All mutation happens inside a single handler
/// activation (the consumer loop); no locking is needed.
pub struct Correlator {
    map: IdentifierMap,
    monitor: OutlierMonitor,
    /// Not-yet-consumed simulation batches, keyed (and therefore ordered) by
    /// timestamp. The stream is expected monotonic; an out-of-order batch is
    /// stored in order and simply purged as stale if its tick has passed.
    pending: BTreeMap<i64, HashMap<SimMrid, SimReading>>,
    pairs_of_interest: Option<HashSet<SePair>>,
    first_timestamp: Option<i64>,
}

impl Correlator {
    pub fn new(map: IdentifierMap, monitor: OutlierMonitor) -> Self {
        Self {
            map,
            monitor,
            pending: BTreeMap::new(),
            pairs_of_interest: None,
            first_timestamp: None,
        }
    }

    /// Restrict processing to a static set of pairs, registered eagerly so
    /// their series exist from the first tick onward.
    pub fn with_pairs_of_interest(
        mut self,
        pairs: HashSet<SePair>,
        store: &mut SeriesStore,
    ) -> Self {
        for pair in &pairs {
            store.register_pair(pair);
        }
        self.pairs_of_interest = Some(pairs);
        self
    }

    pub fn monitor_mut(&mut self) -> &mut OutlierMonitor {
        &mut self.monitor
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Stage one simulation batch until an estimate tick claims or purges it.
    pub fn ingest_simulation(&mut self, msg: SimulationMessage) {
        self.pending.insert(msg.timestamp, msg.measurements);
    }

    /// Process one estimate batch: one "tick".
    ///
    /// The pause flag is sampled by the caller once at tick entry and used
    /// for every append of this tick. A malformed batch returns an error
    /// before any buffer is touched.
    pub fn process_estimate(
        &mut self,
        msg: &EstimateMessage,
        store: &mut SeriesStore,
        paused: bool,
    ) -> Result<TickReport> {
        validate_batch(msg)?;

        let ts = msg.timestamp;
        let mut report = TickReport {
            timestamp: ts,
            ..Default::default()
        };

        // 1. Purge stale sim batches; they can never match a later tick.
        let live = self.pending.split_off(&ts);
        report.stale_purged = self.pending.len();
        if report.stale_purged > 0 {
            debug!(
                timestamp = ts,
                purged = report.stale_purged,
                "purged stale simulation batches"
            );
        }
        self.pending = live;

        // 2. Claim the exactly-aligned batch, if present.
        let snapshot = self.pending.remove(&ts);
        report.snapshot_claimed = snapshot.is_some();

        // 3. Per-pair match.
        for sv in &msg.estimate.sv_est_voltages {
            report.pairs_seen += 1;
            let pair = sv.pair();
            if let Some(keep) = &self.pairs_of_interest {
                if !keep.contains(&pair) {
                    continue;
                }
            } else {
                store.register_pair(&pair);
            }

            // Timeline grows exactly once per tick, on the first buffered pair.
            // The very first tick of the run fixes offset 0.
            if report.pairs_accepted == 0 {
                let first = *self.first_timestamp.get_or_insert(ts);
                let offset = (ts - first) as f64;
                store.append_timeline(offset, paused);
                report.offset = Some(offset);
            }
            report.pairs_accepted += 1;
            store.append_sample(&pair, sv.v, sv.angle, paused);

            let mut matched = false;
            if let Some(snap) = &snapshot {
                if let Some(candidates) = self.map.candidates(&pair) {
                    if let Some((reading, sim_mag)) = first_with_magnitude(candidates, snap) {
                        let percent_diff = if sim_mag == 0.0 {
                            0.0
                        } else {
                            100.0 * (sv.v - sim_mag) / sim_mag
                        };
                        // No wraparound normalization on the angle difference.
                        let angle_diff = sv.angle - reading.angle.unwrap_or(0.0);
                        store.append_diffs(&pair, percent_diff, angle_diff, paused);
                        report.pairs_matched += 1;
                        matched = true;
                        report.outliers.extend(self.monitor.classify_matched(
                            &pair,
                            ts,
                            percent_diff,
                            angle_diff,
                        ));
                    }
                }
            }
            if !matched {
                report
                    .outliers
                    .extend(self.monitor.classify_unmatched(&pair, ts, sv.v));
            }
        }

        if report.pairs_accepted == 0 {
            warn!(timestamp = ts, "estimate tick had no matching pairs; nothing buffered");
        }
        Ok(report)
    }
}

/// First candidate present in the snapshot with a magnitude reading, scanned
/// in candidate order.
fn first_with_magnitude<'a>(
    candidates: &[SimMrid],
    snapshot: &'a HashMap<SimMrid, SimReading>,
) -> Option<(&'a SimReading, f64)> {
    candidates
        .iter()
        .find_map(|m| snapshot.get(m).and_then(|r| r.magnitude.map(|mag| (r, mag))))
}

/// Whole-batch validation, run before any mutation so a rejected tick leaves
/// every buffer in its pre-tick state.
fn validate_batch(msg: &EstimateMessage) -> Result<()> {
    for sv in &msg.estimate.sv_est_voltages {
        if sv.connectivity_node.is_empty() {
            return Err(GridscopeError::MalformedMessage {
                field: "ConnectivityNode",
            });
        }
        if sv.phase.is_empty() {
            return Err(GridscopeError::MalformedMessage { field: "phase" });
        }
        if !sv.v.is_finite() {
            return Err(GridscopeError::NonFinite {
                field: "v",
                value: sv.v,
            });
        }
        if !sv.angle.is_finite() {
            return Err(GridscopeError::NonFinite {
                field: "angle",
                value: sv.angle,
            });
        }
    }
    Ok(())
}
