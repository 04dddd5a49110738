//! Dashboard application: the single consumer loop plus the egui/eframe UI
//! rendering four vertically stacked signal tracks.
//!
//! [`Dashboard`] is the UI-free core: it owns the correlator, the series
//! store and the per-track window state, and dispatches every inbound
//! message. [`DashboardApp`] wraps it in an eframe `App` that drains the
//! channel once per frame, applies controller requests, and draws each track
//! with the bounds the window calculator produced.

use std::sync::mpsc::Receiver;

use chrono::{DateTime, Local};
use eframe::egui;
use egui::Color32;
use egui_plot::{Legend, Line, Plot};
use tracing::warn;

use crate::channel::{BusMessage, ControlEvent};
use crate::config::DashboardConfig;
use crate::controllers::DashboardController;
use crate::correlate::{Correlator, TickReport};
use crate::mapping::IdentifierMap;
use crate::outliers::OutlierMonitor;
use crate::render::{build_track_view, TrackView, TrackWindow};
use crate::store::{SeriesStore, Signal};

// ─────────────────────────────────────────────────────────────────────────────
// Dashboard core (UI-free)
// ─────────────────────────────────────────────────────────────────────────────

/// Core dashboard state driven by the consumer loop. No UI types, so tests
/// drive it directly with [`BusMessage`]s.
pub struct Dashboard {
    correlator: Correlator,
    store: SeriesStore,
    windows: [TrackWindow; 4],
    paused: bool,
    last_report: Option<TickReport>,
}

impl Dashboard {
    pub fn new(correlator: Correlator, store: SeriesStore, track_defaults: TrackWindow) -> Self {
        Self {
            correlator,
            store,
            windows: [track_defaults; 4],
            paused: false,
            last_report: None,
        }
    }

    /// Dispatch one inbound message. Returns the tick report when the
    /// message was an estimate batch that processed cleanly.
    pub fn handle(&mut self, msg: BusMessage) -> Option<TickReport> {
        match msg {
            BusMessage::Estimate(est) => {
                // Pause flag sampled once, here, and used for the whole tick.
                let paused = self.paused;
                match self.correlator.process_estimate(&est, &mut self.store, paused) {
                    Ok(report) => {
                        self.last_report = Some(report.clone());
                        Some(report)
                    }
                    Err(e) => {
                        warn!(error = %e, "estimate tick rejected");
                        None
                    }
                }
            }
            BusMessage::Simulation(sim) => {
                self.correlator.ingest_simulation(sim);
                None
            }
            BusMessage::Control(event) => {
                self.apply_control(event);
                None
            }
        }
    }

    fn apply_control(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::SetPaused(paused) => self.set_paused(paused),
            ControlEvent::TogglePause => self.set_paused(!self.paused),
            ControlEvent::XWindow {
                track,
                zoom_width,
                pan_percent,
            } => {
                let win = self.window_mut(track);
                win.show_all = false;
                win.zoom_width = zoom_width;
                win.x_pan = pan_percent;
            }
            ControlEvent::YWindow {
                track,
                zoom_percent,
                pan_percent,
            } => {
                let win = self.window_mut(track);
                win.y_zoom = zoom_percent;
                win.y_pan = pan_percent;
            }
            ControlEvent::ShowAll { track, show_all } => {
                self.window_mut(track).show_all = show_all;
            }
        }
    }

    /// Toggle the pause state. The Paused -> Live transition merges the
    /// staged series back onto the primary ones, losslessly.
    pub fn set_paused(&mut self, paused: bool) {
        if self.paused && !paused {
            self.store.resume();
        }
        self.paused = paused;
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn store(&self) -> &SeriesStore {
        &self.store
    }

    pub fn correlator(&self) -> &Correlator {
        &self.correlator
    }

    pub fn last_report(&self) -> Option<&TickReport> {
        self.last_report.as_ref()
    }

    pub fn window(&self, track: Signal) -> &TrackWindow {
        &self.windows[track.index()]
    }

    pub fn window_mut(&mut self, track: Signal) -> &mut TrackWindow {
        &mut self.windows[track.index()]
    }

    /// Render instructions for one track under its current window state.
    pub fn track_view(&self, track: Signal) -> Option<TrackView> {
        build_track_view(&self.store, track, &self.windows[track.index()])
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// eframe app
// ─────────────────────────────────────────────────────────────────────────────

const PALETTE: [Color32; 10] = [
    Color32::from_rgb(0x1f, 0x77, 0xb4),
    Color32::from_rgb(0xff, 0x7f, 0x0e),
    Color32::from_rgb(0x2c, 0xa0, 0x2c),
    Color32::from_rgb(0xd6, 0x27, 0x28),
    Color32::from_rgb(0x94, 0x67, 0xbd),
    Color32::from_rgb(0x8c, 0x56, 0x4b),
    Color32::from_rgb(0xe3, 0x77, 0xc2),
    Color32::from_rgb(0x7f, 0x7f, 0x7f),
    Color32::from_rgb(0xbc, 0xbd, 0x22),
    Color32::from_rgb(0x17, 0xbe, 0xcf),
];

fn trace_color(idx: usize) -> Color32 {
    PALETTE[idx % PALETTE.len()]
}

fn plot_id(signal: Signal) -> &'static str {
    match signal {
        Signal::Magnitude => "track_magnitude",
        Signal::Angle => "track_angle",
        Signal::MagnitudeDiff => "track_mag_diff",
        Signal::AngleDiff => "track_angle_diff",
    }
}

/// The live dashboard window.
pub struct DashboardApp {
    rx: Receiver<BusMessage>,
    dashboard: Dashboard,
    controller: Option<DashboardController>,
    model: String,
    run_start: DateTime<Local>,
    show_legend: bool,
}

impl DashboardApp {
    pub fn new(rx: Receiver<BusMessage>, map: IdentifierMap, cfg: DashboardConfig) -> Self {
        let mut store = SeriesStore::new();
        let monitor = OutlierMonitor::new(cfg.model.clone(), cfg.bands.clone());
        let mut correlator = Correlator::new(map, monitor);
        if let Some(pairs) = cfg.pairs_of_interest.clone() {
            correlator = correlator.with_pairs_of_interest(pairs, &mut store);
        }
        Self {
            rx,
            dashboard: Dashboard::new(correlator, store, cfg.track_defaults),
            controller: cfg.controller.clone(),
            model: cfg.model,
            run_start: Local::now(),
            show_legend: true,
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// Drain the inbound channel and dispatch every message, publishing tick
    /// reports to controller subscribers.
    fn drain_and_dispatch(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            if let Some(report) = self.dashboard.handle(msg) {
                if let Some(ctrl) = &self.controller {
                    ctrl.publish_tick(&report);
                }
            }
        }
    }

    fn apply_controller_requests(&mut self) {
        if let Some(ctrl) = &self.controller {
            let (pause, show_all) = ctrl.take_requests();
            if let Some(p) = pause {
                self.dashboard.set_paused(p);
            }
            if let Some(s) = show_all {
                for signal in Signal::ALL {
                    self.dashboard.window_mut(signal).show_all = s;
                }
            }
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("dashboard_top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let pause_label = if self.dashboard.paused() {
                    "▶ Resume"
                } else {
                    "⏸ Pause"
                };
                if ui.button(pause_label).clicked() {
                    let paused = self.dashboard.paused();
                    self.dashboard.set_paused(!paused);
                }
                ui.checkbox(&mut self.show_legend, "Legend");
                if !self.model.is_empty() {
                    ui.separator();
                    ui.label(format!("model: {}", self.model));
                }
                if let Some(report) = self.dashboard.last_report() {
                    ui.separator();
                    ui.label(format!(
                        "t={}  pairs={}  matched={}  sim pending={}",
                        report.timestamp,
                        report.pairs_accepted,
                        report.pairs_matched,
                        self.dashboard.correlator().pending_len(),
                    ));
                    let outliers = report.outliers.len();
                    if outliers > 0 {
                        ui.separator();
                        ui.colored_label(Color32::LIGHT_RED, format!("{outliers} outliers"));
                    }
                }
            });
        });
    }

    fn render_track(&mut self, ui: &mut egui::Ui, signal: Signal, height: f32) {
        let win = self.dashboard.window_mut(signal);
        ui.horizontal(|ui| {
            ui.strong(signal.label());
            ui.checkbox(&mut win.show_all, "Show all");
            if !win.show_all {
                ui.add(
                    egui::Slider::new(&mut win.zoom_width, 1.0..=600.0)
                        .text("X width (s)"),
                );
                ui.add(egui::Slider::new(&mut win.x_pan, 0.0..=100.0).text("X pan"));
            }
            ui.add(egui::Slider::new(&mut win.y_zoom, 1.0..=100.0).text("Y zoom"));
            ui.add(egui::Slider::new(&mut win.y_pan, 0.0..=100.0).text("Y pan"));
        });

        let Some(view) = self.dashboard.track_view(signal) else {
            ui.weak("waiting for data...");
            return;
        };

        // Materialize the window slices before entering the plot closure.
        let timeline = self.dashboard.store().timeline();
        let pairs = self.dashboard.store().pairs();
        let mut lines: Vec<(String, Vec<[f64; 2]>, Color32)> = Vec::new();
        for line in &view.lines {
            let ys = self.dashboard.store().series(signal, &line.pair);
            let pts: Vec<[f64; 2]> = line
                .range
                .clone()
                .map(|i| [timeline[i], ys[i]])
                .collect();
            let color_idx = pairs
                .iter()
                .position(|p| p == &line.pair)
                .unwrap_or(lines.len());
            lines.push((line.pair.to_string(), pts, trace_color(color_idx)));
        }

        let run_start = self.run_start;
        let mut plot = Plot::new(plot_id(signal))
            .height(height)
            .allow_scroll(false)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_boxed_zoom(false)
            .x_axis_formatter(move |x, _range| {
                let dt = run_start + chrono::Duration::milliseconds((x.value * 1000.0) as i64);
                dt.format("%H:%M:%S").to_string()
            });
        if self.show_legend {
            plot = plot.legend(Legend::default());
        }
        plot.show(ui, |plot_ui| {
            if view.x_bounds.0 < view.x_bounds.1 {
                plot_ui.set_plot_bounds_x(view.x_bounds.0..=view.x_bounds.1);
            }
            if view.y_bounds.0 < view.y_bounds.1 {
                plot_ui.set_plot_bounds_y(view.y_bounds.0..=view.y_bounds.1);
            }
            for (name, pts, color) in lines {
                plot_ui.line(Line::new(&name, pts).color(color).width(1.5));
            }
        });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_and_dispatch();
        self.apply_controller_requests();
        self.render_top_bar(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            // Four stacked tracks; each control row eats a little height.
            let track_height = (ui.available_height() / 4.0 - 30.0).max(120.0);
            for signal in Signal::ALL {
                self.render_track(ui, signal, track_height);
            }
        });
        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}

/// Open the dashboard window and run the consumer loop until close.
pub fn run_dashboard(
    rx: Receiver<BusMessage>,
    map: IdentifierMap,
    cfg: DashboardConfig,
) -> eframe::Result<()> {
    let mut options = cfg.native_options.clone().unwrap_or_default();
    options.viewport = egui::ViewportBuilder::default().with_inner_size([1280.0, 960.0]);
    let title = cfg.title.clone().unwrap_or_else(|| {
        if cfg.model.is_empty() {
            "GridScope".to_string()
        } else {
            format!("GridScope ({})", cfg.model)
        }
    });
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(rx, map, cfg)))),
    )
}
