//! Native plot window for a [`Trajectory`].
//!
//! Stretch and swing are drawn against time in two stacked plots, the same
//! two views the simulation has always produced.

use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::Trajectory;

/// Configuration for rendering a trajectory.
///
/// Construct with [`ShowConfig::new`] and chain builder methods as needed.
///
/// # Example
///
/// ```ignore
/// plot::show(&trajectory, ShowConfig::new().title("h = 0.05").rates())?;
/// ```
pub struct ShowConfig {
    title: Option<String>,
    rates: bool,
}

impl ShowConfig {
    /// Creates a new `ShowConfig` with defaults: generic title, positions only.
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: None,
            rates: false,
        }
    }

    /// Sets the window title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Overlays stretch rate and swing rate on their plots.
    #[must_use]
    pub fn rates(mut self) -> Self {
        self.rates = true;
        self
    }
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Opens a blocking egui window displaying the trajectory.
///
/// Non-finite samples are left out of the curves. Blocks until the window
/// is closed by the user.
///
/// # Errors
///
/// Returns an error if the native window cannot be created.
pub fn show(trajectory: &Trajectory, config: ShowConfig) -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions::default();
    let title = config
        .title
        .unwrap_or_else(|| "Spring pendulum".to_owned());
    let panels = panels(trajectory, config.rates);

    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(TrajectoryApp { panels }))),
    )
}

/// One named curve.
struct Trace {
    name: &'static str,
    points: Vec<[f64; 2]>,
}

/// One plot area and its curves.
struct Panel {
    id: &'static str,
    heading: &'static str,
    traces: Vec<Trace>,
}

fn series(times: &[f64], values: &[f64]) -> Vec<[f64; 2]> {
    times
        .iter()
        .zip(values)
        .map(|(&t, &y)| [t, y])
        .filter(|p| p[0].is_finite() && p[1].is_finite())
        .collect()
}

fn panels(trajectory: &Trajectory, rates: bool) -> Vec<Panel> {
    let times = &trajectory.times;

    let mut stretch = vec![Trace {
        name: "Stretch",
        points: series(times, &trajectory.stretch),
    }];
    let mut swing = vec![Trace {
        name: "Swing",
        points: series(times, &trajectory.swing),
    }];

    if rates {
        stretch.push(Trace {
            name: "Stretch rate",
            points: series(times, &trajectory.stretch_rate),
        });
        swing.push(Trace {
            name: "Swing rate",
            points: series(times, &trajectory.swing_rate),
        });
    }

    vec![
        Panel {
            id: "stretch",
            heading: "Stretch vs. time",
            traces: stretch,
        },
        Panel {
            id: "swing",
            heading: "Swing vs. time",
            traces: swing,
        },
    ]
}

/// The egui [`eframe::App`] that renders the panels.
struct TrajectoryApp {
    panels: Vec<Panel>,
}

impl eframe::App for TrajectoryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            #[allow(clippy::cast_precision_loss)]
            let height = (ui.available_height() / self.panels.len() as f32 - 24.0).max(80.0);

            for panel in &self.panels {
                ui.label(panel.heading);
                Plot::new(panel.id)
                    .legend(Legend::default())
                    .height(height)
                    .x_axis_label("t")
                    .show(ui, |plot_ui| {
                        for trace in &panel.traces {
                            let points: PlotPoints = trace.points.iter().copied().collect();
                            plot_ui.line(Line::new(points).name(trace.name));
                        }
                    });
            }
        });
    }
}
