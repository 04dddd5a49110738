use gridscope::{
    default_band_table, Band, BandKind, BandSignal, BandTable, OutlierMonitor, SePair,
};

fn pair() -> SePair {
    SePair::new("cn-1", "A")
}

#[test]
fn default_table_flags_low_percent_diff() {
    let mut mon = OutlierMonitor::new("ieee13nodecktassets", default_band_table());
    let events = mon.classify_matched(&pair(), 10, -2.5, 0.0);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].signal, BandSignal::PercentDiff);
    assert_eq!(events[0].value, -2.5);

    // Inside the band: nothing.
    assert!(mon.classify_matched(&pair(), 13, -1.9, 0.0).is_empty());
}

#[test]
fn two_sided_model_flags_both_directions() {
    let mut mon = OutlierMonitor::new("ieee123", default_band_table());
    assert_eq!(mon.classify_matched(&pair(), 0, 3.5, 0.0).len(), 1);
    assert_eq!(mon.classify_matched(&pair(), 0, -2.5, 0.0).len(), 1);
    assert!(mon.classify_matched(&pair(), 0, 0.0, 0.0).is_empty());
}

#[test]
fn unknown_model_produces_no_classification() {
    let mut mon = OutlierMonitor::new("some-other-feeder", default_band_table());
    assert!(mon.classify_matched(&pair(), 0, -100.0, 100.0).is_empty());
    assert!(mon.classify_unmatched(&pair(), 0, 1.0e9).is_empty());
}

#[test]
fn magnitude_bands_apply_only_to_unmatched_observations() {
    let mut table = BandTable::default();
    table.models.insert(
        "m".to_string(),
        vec![Band {
            signal: BandSignal::Magnitude,
            kind: BandKind::Above { value: 1000.0 },
        }],
    );
    let mut mon = OutlierMonitor::new("m", table);
    assert_eq!(mon.classify_unmatched(&pair(), 0, 1500.0).len(), 1);
    // A matched observation never checks raw magnitude.
    assert!(mon.classify_matched(&pair(), 0, 1500.0, 1500.0).is_empty());
}

#[test]
fn band_kinds_are_strict_inequalities() {
    let above = BandKind::Above { value: 3.0 };
    assert!(!above.is_violated(3.0));
    assert!(above.is_violated(3.0001));
    let below = BandKind::Below { value: -2.0 };
    assert!(!below.is_violated(-2.0));
    assert!(below.is_violated(-2.0001));
}

#[test]
fn subscribers_receive_events() {
    let mut mon = OutlierMonitor::new("ieee123", default_band_table());
    let rx = mon.subscribe();
    mon.classify_matched(&pair(), 42, -5.0, 0.0);
    let event = rx.try_recv().unwrap();
    assert_eq!(event.timestamp, 42);
    assert_eq!(event.pair, pair());
}

#[test]
fn band_table_loads_from_yaml() {
    let text = r#"
models:
  my-feeder:
    - signal: percent_diff
      kind:
        below:
          value: -2.0
    - signal: angle_diff
      kind:
        above:
          value: 10.0
"#;
    let table = BandTable::from_yaml(text).unwrap();
    let bands = table.bands_for("my-feeder");
    assert_eq!(bands.len(), 2);
    assert_eq!(bands[0].signal, BandSignal::PercentDiff);
    assert_eq!(bands[0].kind, BandKind::Below { value: -2.0 });
    assert_eq!(bands[1].kind, BandKind::Above { value: 10.0 });
}
