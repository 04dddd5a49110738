//! One-time identifier mapping between the estimator and simulation namespaces.
//!
//! The two startup queries name nodes differently: the measurement index keys
//! by bus name and phase, the model query by connectivity-node name and mRID.
//! `build_identifier_map` joins them into `SePair -> candidate SimMRIDs`.
//! Partial overlap between the namespaces is normal; unmatched keys are
//! dropped and only counted.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::messages::{MeasurementRecord, NodeRecord, SePair, SimMrid};

/// Phase suffix used to form the intermediate bus-phase key.
fn phase_suffix(phases: &str) -> Option<&'static str> {
    match phases {
        "A" | "s1" => Some(".1"),
        "B" | "s2" => Some(".2"),
        "C" => Some(".3"),
        _ => None,
    }
}

/// Translate a numeric phase suffix back to its phase letter.
fn suffix_letter(suffix: &str) -> Option<&'static str> {
    match suffix {
        ".1" => Some("A"),
        ".2" => Some("B"),
        ".3" => Some("C"),
        _ => None,
    }
}

/// `SePair -> candidate SimMRIDs`, built once at startup, read-only after.
///
/// Candidate lists keep build-insertion order (deduplicated), so "first
/// candidate present in a snapshot" is deterministic. One pair may map to
/// several candidates; unmapped estimator pairs are legal and simply never
/// produce a difference series.
#[derive(Debug, Clone, Default)]
pub struct IdentifierMap {
    map: HashMap<SePair, Vec<SimMrid>>,
}

impl IdentifierMap {
    /// Build directly from `(pair, candidates)` entries. Intended for tests
    /// and for hosts that resolve identifiers through some other channel.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (SePair, Vec<SimMrid>)>,
    {
        Self {
            map: entries.into_iter().collect(),
        }
    }

    /// Candidate SimMRIDs for a pair, in build-insertion order.
    pub fn candidates(&self, pair: &SePair) -> Option<&[SimMrid]> {
        self.map.get(pair).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn pairs(&self) -> impl Iterator<Item = &SePair> {
        self.map.keys()
    }
}

/// Join the measurement index against the connectivity-node table.
///
/// Algorithm: uppercase the bus name and append a phase suffix to form a
/// bus-phase key; group candidate mRIDs per key; index the node table by
/// uppercased name; join case-insensitively on the bus portion and emit
/// `(cnid, phase letter) -> candidates`. Unmatched keys are expected
/// (current/power measurements, buses absent from the model query) and are
/// silently dropped. An empty result is reported, not raised.
pub fn build_identifier_map(
    measurements: &[MeasurementRecord],
    nodes: &[NodeRecord],
) -> IdentifierMap {
    let mut by_key: HashMap<String, Vec<SimMrid>> = HashMap::new();
    let mut skipped_phase = 0usize;
    for rec in measurements
        .iter()
        .filter(|r| r.measurement_type == "PNV")
    {
        match phase_suffix(&rec.phases) {
            Some(suffix) => {
                let key = format!("{}{}", rec.connectivity_node.to_uppercase(), suffix);
                let entry = by_key.entry(key).or_default();
                let mrid = SimMrid(rec.mrid.clone());
                if !entry.contains(&mrid) {
                    entry.push(mrid);
                }
            }
            None => skipped_phase += 1,
        }
    }

    let node_index: HashMap<String, &str> = nodes
        .iter()
        .map(|n| (n.cnname.to_uppercase(), n.cnid.as_str()))
        .collect();

    let mut map: HashMap<SePair, Vec<SimMrid>> = HashMap::new();
    let mut dropped = 0usize;
    for (key, mrids) in by_key {
        // The suffix was appended last, so the final dot always splits it off.
        let Some(dot) = key.rfind('.') else {
            dropped += 1;
            continue;
        };
        let (bus, suffix) = key.split_at(dot);
        let Some(letter) = suffix_letter(suffix) else {
            dropped += 1;
            continue;
        };
        match node_index.get(bus) {
            Some(cnid) => {
                map.insert(SePair::new(*cnid, letter), mrids);
            }
            None => {
                debug!(key = %key, "bus-phase key has no connectivity node; dropping");
                dropped += 1;
            }
        }
    }

    info!(
        mapped = map.len(),
        dropped, skipped_phase, "identifier map built"
    );
    IdentifierMap { map }
}
