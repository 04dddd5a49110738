//! Inbound-message channel feeding the dashboard's single consumer loop.
//!
//! Stream data and user-control events travel over one channel, so one
//! consumer activation at a time services everything and shared state never
//! needs locking. Transport adapters (message bus subscribers, test
//! drivers) clone a [`DashboardSink`] and push decoded messages in.

use std::sync::mpsc::{Receiver, SendError, Sender};

use crate::error::{GridscopeError, Result};
use crate::messages::{EstimateMessage, SimulationMessage};
use crate::store::Signal;

/// User-control events, applied by the consumer loop between ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    SetPaused(bool),
    TogglePause,
    /// Adjust the x window of one track.
    XWindow {
        track: Signal,
        zoom_width: f64,
        pan_percent: f64,
    },
    /// Adjust the y window of one track.
    YWindow {
        track: Signal,
        zoom_percent: f64,
        pan_percent: f64,
    },
    ShowAll {
        track: Signal,
        show_all: bool,
    },
}

/// Messages delivered to the consumer loop.
#[derive(Debug, Clone)]
pub enum BusMessage {
    Estimate(EstimateMessage),
    Simulation(SimulationMessage),
    Control(ControlEvent),
}

/// Cloneable sender handle for feeding the dashboard.
#[derive(Clone)]
pub struct DashboardSink {
    tx: Sender<BusMessage>,
}

impl DashboardSink {
    /// Forward one decoded estimate batch.
    pub fn send_estimate(
        &self,
        msg: EstimateMessage,
    ) -> std::result::Result<(), SendError<BusMessage>> {
        self.tx.send(BusMessage::Estimate(msg))
    }

    /// Forward one decoded simulation batch.
    pub fn send_simulation(
        &self,
        msg: SimulationMessage,
    ) -> std::result::Result<(), SendError<BusMessage>> {
        self.tx.send(BusMessage::Simulation(msg))
    }

    /// Forward one user-control event.
    pub fn send_control(
        &self,
        event: ControlEvent,
    ) -> std::result::Result<(), SendError<BusMessage>> {
        self.tx.send(BusMessage::Control(event))
    }

    /// Decode and forward a raw estimate payload as delivered by the bus.
    pub fn send_estimate_json(&self, payload: &str) -> Result<()> {
        let msg: EstimateMessage = serde_json::from_str(payload)?;
        self.send_estimate(msg)
            .map_err(|_| GridscopeError::ChannelClosed)
    }

    /// Decode and forward a raw simulation payload as delivered by the bus.
    pub fn send_simulation_json(&self, payload: &str) -> Result<()> {
        let msg: SimulationMessage = serde_json::from_str(payload)?;
        self.send_simulation(msg)
            .map_err(|_| GridscopeError::ChannelClosed)
    }
}

/// Create the channel pair: `(DashboardSink, Receiver<BusMessage>)`.
pub fn channel_dashboard() -> (DashboardSink, Receiver<BusMessage>) {
    let (tx, rx) = std::sync::mpsc::channel();
    (DashboardSink { tx }, rx)
}
