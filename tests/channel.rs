use gridscope::{channel_dashboard, BusMessage, ControlEvent, GridscopeError, SimMrid, Signal};

#[test]
fn estimate_json_decodes_field_exact_payloads() {
    let (sink, rx) = channel_dashboard();
    sink.send_estimate_json(
        r#"{
            "timestamp": 10,
            "Estimate": {
                "SvEstVoltages": [
                    {"ConnectivityNode": "N1", "phase": "A", "v": 100.0, "angle": 5.0}
                ]
            }
        }"#,
    )
    .unwrap();

    match rx.try_recv().unwrap() {
        BusMessage::Estimate(msg) => {
            assert_eq!(msg.timestamp, 10);
            let sv = &msg.estimate.sv_est_voltages[0];
            assert_eq!(sv.connectivity_node, "N1");
            assert_eq!(sv.phase, "A");
            assert_eq!(sv.v, 100.0);
            assert_eq!(sv.angle, 5.0);
        }
        other => panic!("expected estimate, got {other:?}"),
    }
}

#[test]
fn simulation_json_decodes_measurement_map() {
    let (sink, rx) = channel_dashboard();
    sink.send_simulation_json(
        r#"{
            "timestamp": 10,
            "measurements": {
                "mridX": {"magnitude": 102.0, "angle": 6.0},
                "mridY": {"value": 1}
            }
        }"#,
    )
    .unwrap();

    match rx.try_recv().unwrap() {
        BusMessage::Simulation(msg) => {
            let x = &msg.measurements[&SimMrid("mridX".to_string())];
            assert_eq!(x.magnitude, Some(102.0));
            assert_eq!(x.angle, Some(6.0));
            // Non-voltage measurements decode with empty readings.
            let y = &msg.measurements[&SimMrid("mridY".to_string())];
            assert_eq!(y.magnitude, None);
        }
        other => panic!("expected simulation, got {other:?}"),
    }
}

#[test]
fn garbled_payload_is_a_decode_error() {
    let (sink, _rx) = channel_dashboard();
    let err = sink.send_estimate_json(r#"{"timestamp": 10}"#).unwrap_err();
    assert!(matches!(err, GridscopeError::Json(_)));
}

#[test]
fn closed_channel_surfaces_as_error() {
    let (sink, rx) = channel_dashboard();
    drop(rx);
    let err = sink
        .send_estimate_json(
            r#"{"timestamp": 0, "Estimate": {"SvEstVoltages": []}}"#,
        )
        .unwrap_err();
    assert!(matches!(err, GridscopeError::ChannelClosed));
}

#[test]
fn control_events_pass_through() {
    let (sink, rx) = channel_dashboard();
    sink.send_control(ControlEvent::ShowAll {
        track: Signal::Magnitude,
        show_all: false,
    })
    .unwrap();
    assert!(matches!(
        rx.try_recv().unwrap(),
        BusMessage::Control(ControlEvent::ShowAll {
            track: Signal::Magnitude,
            show_all: false,
        })
    ));
}
