//! External control of the dashboard from non-UI code.
//!
//! The controller exposes lightweight request slots and a subscription
//! mechanism so host code can pause/resume the view, switch to show-all, and
//! observe tick reports and outlier events. Requests are applied by the
//! consumer loop once per frame.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};

use crate::correlate::TickReport;
use crate::outliers::OutlierEvent;

/// Controller handle; cheap to clone and share with host code.
#[derive(Clone)]
pub struct DashboardController {
    pub(crate) inner: Arc<Mutex<DashboardCtrlInner>>, // crate-visible for the app loop
}

pub(crate) struct DashboardCtrlInner {
    pub(crate) request_pause: Option<bool>,
    pub(crate) request_show_all: Option<bool>,
    pub(crate) tick_listeners: Vec<Sender<TickReport>>,
    pub(crate) outlier_listeners: Vec<Sender<OutlierEvent>>,
}

impl DashboardController {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(DashboardCtrlInner {
                request_pause: None,
                request_show_all: None,
                tick_listeners: Vec::new(),
                outlier_listeners: Vec::new(),
            })),
        }
    }

    /// Request pausing (`true`) or resuming (`false`) the view.
    pub fn request_pause(&self, paused: bool) {
        let mut inner = self.inner.lock().unwrap();
        inner.request_pause = Some(paused);
    }

    /// Request switching every track to show-all (or back to windowed).
    pub fn request_show_all(&self, show_all: bool) {
        let mut inner = self.inner.lock().unwrap();
        inner.request_show_all = Some(show_all);
    }

    /// Subscribe to per-tick reports.
    pub fn subscribe_ticks(&self) -> Receiver<TickReport> {
        let (tx, rx) = std::sync::mpsc::channel();
        let mut inner = self.inner.lock().unwrap();
        inner.tick_listeners.push(tx);
        rx
    }

    /// Subscribe to outlier events.
    pub fn subscribe_outliers(&self) -> Receiver<OutlierEvent> {
        let (tx, rx) = std::sync::mpsc::channel();
        let mut inner = self.inner.lock().unwrap();
        inner.outlier_listeners.push(tx);
        rx
    }

    /// Take pending requests: `(pause, show_all)`.
    pub(crate) fn take_requests(&self) -> (Option<bool>, Option<bool>) {
        let mut inner = self.inner.lock().unwrap();
        (inner.request_pause.take(), inner.request_show_all.take())
    }

    /// Publish one tick report (and its outliers) to subscribers.
    pub(crate) fn publish_tick(&self, report: &TickReport) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .tick_listeners
            .retain(|tx| tx.send(report.clone()).is_ok());
        inner
            .outlier_listeners
            .retain(|tx| report.outliers.iter().all(|e| tx.send(e.clone()).is_ok()));
    }
}

impl Default for DashboardController {
    fn default() -> Self {
        Self::new()
    }
}
