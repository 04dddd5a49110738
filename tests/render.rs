use gridscope::{build_track_view, SePair, SeriesStore, Signal, TrackWindow};

fn seeded_store() -> (SeriesStore, SePair) {
    let pair = SePair::new("cn-1", "A");
    let mut store = SeriesStore::new();
    store.register_pair(&pair);
    for i in 0..11 {
        store.append_timeline((i * 10) as f64, false);
        store.append_sample(&pair, 100.0 + i as f64, 0.1 * i as f64, false);
        // Diffs only exist for the first 5 ticks.
        if i < 5 {
            store.append_diffs(&pair, -1.0 - i as f64 * 0.1, 0.5, false);
        }
    }
    (store, pair)
}

#[test]
fn empty_store_has_no_view() {
    let store = SeriesStore::new();
    assert!(build_track_view(&store, Signal::Magnitude, &TrackWindow::default()).is_none());
}

#[test]
fn show_all_covers_the_full_timeline() {
    let (store, pair) = seeded_store();
    let win = TrackWindow::default();
    let view = build_track_view(&store, Signal::Magnitude, &win).unwrap();
    assert_eq!(view.x_bounds, (0.0, 100.0));
    assert_eq!(view.lines.len(), 1);
    assert_eq!(view.lines[0].pair, pair);
    assert_eq!(view.lines[0].range, 0..11);
    // y bounds contain everything drawn (100..110 plus the 3% margin).
    assert!(view.y_bounds.0 <= 100.0 && view.y_bounds.1 >= 110.0);
    assert!((view.y_bounds.0 - (100.0 - 0.3)).abs() < 1e-9);
    assert!((view.y_bounds.1 - (110.0 + 0.3)).abs() < 1e-9);
}

#[test]
fn windowed_view_slices_the_timeline() {
    let (store, _) = seeded_store();
    let win = TrackWindow {
        show_all: false,
        zoom_width: 20.0,
        x_pan: 100.0,
        ..TrackWindow::default()
    };
    let view = build_track_view(&store, Signal::Magnitude, &win).unwrap();
    assert_eq!(view.x_bounds, (80.0, 100.0));
    assert_eq!(view.lines[0].range, 8..11);
}

#[test]
fn sparse_diff_series_clip_to_their_own_length() {
    let (store, _) = seeded_store();
    let view =
        build_track_view(&store, Signal::MagnitudeDiff, &TrackWindow::default()).unwrap();
    // 11 timeline entries but only 5 diff samples: the line stops early
    // instead of assuming equal length.
    assert_eq!(view.lines[0].range, 0..5);
}

#[test]
fn window_beyond_sparse_series_draws_nothing() {
    let (store, _) = seeded_store();
    let win = TrackWindow {
        show_all: false,
        zoom_width: 20.0,
        x_pan: 100.0,
        ..TrackWindow::default()
    };
    // Diff data ends at index 5 but the window starts at index 8.
    let view = build_track_view(&store, Signal::MagnitudeDiff, &win).unwrap();
    assert!(view.lines.is_empty());
    // No data drawn: the default 0..100 range (with margin) applies.
    assert_eq!(view.y_bounds, (-3.0, 103.0));
}

#[test]
fn y_window_controls_apply_per_track() {
    let (store, _) = seeded_store();
    let win = TrackWindow {
        y_zoom: 50.0,
        y_pan: 0.0,
        ..TrackWindow::default()
    };
    let view = build_track_view(&store, Signal::Magnitude, &win).unwrap();
    // Height 5 pinned at the bottom of [100, 110], with the 3% margin.
    assert!((view.y_bounds.0 - (100.0 - 0.15)).abs() < 1e-9);
    assert!((view.y_bounds.1 - (105.0 + 0.15)).abs() < 1e-9);
}
