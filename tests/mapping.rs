use gridscope::{build_identifier_map, MeasurementRecord, NodeRecord, SePair, SimMrid};

fn meas(mrid: &str, bus: &str, phases: &str, mtype: &str) -> MeasurementRecord {
    MeasurementRecord {
        mrid: mrid.to_string(),
        connectivity_node: bus.to_string(),
        phases: phases.to_string(),
        measurement_type: mtype.to_string(),
    }
}

fn node(cnid: &str, cnname: &str) -> NodeRecord {
    NodeRecord {
        cnid: cnid.to_string(),
        cnname: cnname.to_string(),
    }
}

#[test]
fn joins_bus_and_node_tables() {
    let map = build_identifier_map(
        &[meas("m1", "650", "A", "PNV")],
        &[node("id-650", "650")],
    );
    assert_eq!(map.len(), 1);
    let c = map.candidates(&SePair::new("id-650", "A")).unwrap();
    assert_eq!(c, &[SimMrid("m1".to_string())]);
}

#[test]
fn join_is_case_insensitive() {
    let map = build_identifier_map(
        &[meas("m1", "sourcebus", "B", "PNV")],
        &[node("id-sb", "SourceBus")],
    );
    assert!(map.candidates(&SePair::new("id-sb", "B")).is_some());
}

#[test]
fn secondary_phases_translate_to_letters() {
    // s1/s2 share the .1/.2 suffixes with A/B and come back as letters.
    let map = build_identifier_map(
        &[
            meas("m1", "tplx", "s1", "PNV"),
            meas("m2", "tplx", "s2", "PNV"),
        ],
        &[node("id-tplx", "TPLX")],
    );
    assert_eq!(
        map.candidates(&SePair::new("id-tplx", "A")).unwrap(),
        &[SimMrid("m1".to_string())]
    );
    assert_eq!(
        map.candidates(&SePair::new("id-tplx", "B")).unwrap(),
        &[SimMrid("m2".to_string())]
    );
}

#[test]
fn non_pnv_rows_are_ignored() {
    let map = build_identifier_map(
        &[
            meas("m1", "650", "A", "VA"),
            meas("m2", "650", "A", "Pos"),
        ],
        &[node("id-650", "650")],
    );
    assert!(map.is_empty());
}

#[test]
fn unmatched_buses_are_dropped_silently() {
    let map = build_identifier_map(
        &[meas("m1", "684", "C", "PNV")],
        &[node("id-650", "650")],
    );
    assert!(map.is_empty());
}

#[test]
fn candidates_share_a_bus_phase_and_dedup() {
    let map = build_identifier_map(
        &[
            meas("m1", "650", "A", "PNV"),
            meas("m2", "650", "A", "PNV"),
            meas("m1", "650", "A", "PNV"),
        ],
        &[node("id-650", "650")],
    );
    let c = map.candidates(&SePair::new("id-650", "A")).unwrap();
    assert_eq!(c.len(), 2);
    assert_eq!(c[0], SimMrid("m1".to_string()));
    assert_eq!(c[1], SimMrid("m2".to_string()));
}

#[test]
fn unknown_phase_codes_produce_no_key() {
    let map = build_identifier_map(
        &[meas("m1", "650", "none", "PNV")],
        &[node("id-650", "650")],
    );
    assert!(map.is_empty());
}

#[test]
fn empty_inputs_build_an_empty_map() {
    let map = build_identifier_map(&[], &[]);
    assert!(map.is_empty());
    assert_eq!(map.len(), 0);
}
