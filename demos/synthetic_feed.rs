//! Feeds synthetic estimate and simulation batches into the live dashboard.
//!
//! A producer thread plays the role of the message bus: every tick it sends
//! one simulation batch and one estimate batch for a small feeder, with the
//! estimate drifting slowly away from the simulation so the difference
//! tracks (and the outlier reporting) have something to show. Every tenth
//! simulation batch is dropped to exercise the unmatched path.

use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use gridscope::{
    build_identifier_map, channel_dashboard, default_band_table, run_dashboard, DashboardConfig,
    DashboardController, Estimate, EstimateMessage, MeasurementRecord, NodeRecord, SimMrid,
    SimReading, SimulationMessage, SvEstVoltage,
};

fn measurement(mrid: &str, bus: &str, phase: &str) -> MeasurementRecord {
    MeasurementRecord {
        mrid: mrid.to_string(),
        connectivity_node: bus.to_string(),
        phases: phase.to_string(),
        measurement_type: "PNV".to_string(),
    }
}

// (mrid, estimator node, phase, base magnitude, base angle)
const FEED: [(&str, &str, &str, f64, f64); 4] = [
    ("meas-632-a", "cn-632", "A", 2401.8, 0.0),
    ("meas-632-b", "cn-632", "B", 2399.5, -120.0),
    ("meas-632-c", "cn-632", "C", 2402.2, 120.0),
    ("meas-671-a", "cn-671", "A", 2395.2, 0.0),
];

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // Startup queries, as the identifier-mapping RPCs would return them.
    let measurements = vec![
        measurement("meas-632-a", "632", "A"),
        measurement("meas-632-b", "632", "B"),
        measurement("meas-632-c", "632", "C"),
        measurement("meas-671-a", "671", "A"),
    ];
    let nodes = vec![
        NodeRecord {
            cnid: "cn-632".to_string(),
            cnname: "632".to_string(),
        },
        NodeRecord {
            cnid: "cn-671".to_string(),
            cnname: "671".to_string(),
        },
    ];
    let map = build_identifier_map(&measurements, &nodes);

    let (sink, rx) = channel_dashboard();
    let controller = DashboardController::new();
    let outlier_rx = controller.subscribe_outliers();
    thread::spawn(move || {
        for event in outlier_rx {
            tracing::warn!(
                pair = %event.pair,
                signal = ?event.signal,
                value = event.value,
                "outlier"
            );
        }
    });

    thread::spawn(move || {
        let mut ts: i64 = 0;
        let mut n: u64 = 0;
        loop {
            if n % 10 != 9 {
                let mut readings = HashMap::new();
                for (mrid, _, _, mag, ang) in FEED {
                    readings.insert(
                        SimMrid(mrid.to_string()),
                        SimReading {
                            magnitude: Some(mag + (ts as f64 * 0.01).sin()),
                            angle: Some(ang),
                        },
                    );
                }
                let _ = sink.send_simulation(SimulationMessage {
                    timestamp: ts,
                    measurements: readings,
                });
            }

            let drift = 1.0 + 0.025 * (ts as f64 * 0.002).sin();
            let voltages = FEED
                .iter()
                .map(|(_, node, phase, mag, ang)| SvEstVoltage {
                    connectivity_node: node.to_string(),
                    phase: phase.to_string(),
                    v: mag * drift,
                    angle: ang + 0.3,
                })
                .collect();
            if sink
                .send_estimate(EstimateMessage {
                    timestamp: ts,
                    estimate: Estimate {
                        sv_est_voltages: voltages,
                    },
                })
                .is_err()
            {
                break;
            }

            ts += 3;
            n += 1;
            thread::sleep(Duration::from_millis(300));
        }
    });

    let cfg = DashboardConfig {
        model: "ieee123".to_string(),
        bands: default_band_table(),
        controller: Some(controller),
        ..DashboardConfig::default()
    };
    run_dashboard(rx, map, cfg)
}
