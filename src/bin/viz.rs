use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};

use reentry_sim::analysis::{compare, EntryRun};
use reentry_sim::dynamics::SimConfig;
use reentry_sim::model::EntryModel;
use reentry_sim::physics::gravity::STANDARD_GRAVITY;
use reentry_sim::vehicle::presets;

fn main() -> eframe::Result {
    let cases = [
        ("Ballistic capsule", presets::ballistic_capsule()),
        ("Lifting body", presets::lifting_body()),
    ];
    let runs = match compare(cases, &EntryModel::default(), &SimConfig::default()) {
        Ok(runs) => runs,
        Err(e) => {
            eprintln!("simulation failed: {}", e);
            std::process::exit(1);
        }
    };

    let app = EntryViz { runs };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Reentry Simulator", options, Box::new(|_| Ok(Box::new(app))))
}

struct EntryViz {
    runs: Vec<(String, EntryRun)>,
}

impl EntryViz {
    /// One series per run, at most ~2000 points each.
    fn series<F>(&self, f: F) -> Vec<(String, Vec<[f64; 2]>)>
    where
        F: Fn(&EntryRun, usize) -> Option<[f64; 2]>,
    {
        self.runs
            .iter()
            .map(|(name, run)| {
                let n = run.result.trajectory.len();
                let step = (n / 2000).max(1);
                (name.clone(), (0..n).step_by(step).filter_map(|i| f(run, i)).collect())
            })
            .collect()
    }
}

impl eframe::App for EntryViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.heading("Atmospheric Entry");
            for (name, run) in &self.runs {
                let s = &run.summary;
                ui.label(format!(
                    "{}: landing {:.0} s at {:.1} m/s  |  peak decel {:.1} g  |  peak q {:.2} MW/m^2  |  {}",
                    name,
                    s.flight_time,
                    s.final_velocity,
                    s.peak_deceleration_g,
                    s.peak_heat_flux.unwrap_or(0.0) / 1e6,
                    s.termination,
                ));
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_w = available.x / 2.0 - 8.0;
            let half_h = available.y / 2.0 - 8.0;

            ui.horizontal(|ui| {
                // Altitude vs velocity
                ui.vertical(|ui| {
                    ui.label("Altitude (km) vs velocity (km/s)");
                    let series = self.series(|run, i| {
                        let s = &run.result.trajectory[i];
                        Some([s.velocity() / 1000.0, s.altitude() / 1000.0])
                    });
                    Plot::new("altitude_velocity")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Velocity (km/s)")
                        .legend(Legend::default())
                        .show(ui, |plot_ui| {
                            for (name, points) in series {
                                plot_ui.line(Line::new(name, PlotPoints::from(points)));
                            }
                        });
                });

                // Deceleration vs time
                ui.vertical(|ui| {
                    ui.label("Deceleration (g)");
                    let series = self.series(|run, i| {
                        let t = run.result.trajectory[i].time;
                        Some([t, run.acceleration[i].abs() / STANDARD_GRAVITY])
                    });
                    Plot::new("deceleration")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .legend(Legend::default())
                        .show(ui, |plot_ui| {
                            for (name, points) in series {
                                plot_ui.line(Line::new(name, PlotPoints::from(points)));
                            }
                        });
                });
            });

            ui.horizontal(|ui| {
                // Heat flux vs time
                ui.vertical(|ui| {
                    ui.label("Heat flux (MW/m^2)");
                    let series = self.series(|run, i| {
                        let th = run.thermal.as_ref()?;
                        Some([run.result.trajectory[i].time, th.heat_flux[i] / 1e6])
                    });
                    Plot::new("heat_flux")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .legend(Legend::default())
                        .show(ui, |plot_ui| {
                            for (name, points) in series {
                                plot_ui.line(Line::new(name, PlotPoints::from(points)));
                            }
                        });
                });

                // Wall temperature vs time
                ui.vertical(|ui| {
                    ui.label("Wall temperature (K)");
                    let series = self.series(|run, i| {
                        let th = run.thermal.as_ref()?;
                        Some([run.result.trajectory[i].time, th.wall_temperature[i]])
                    });
                    Plot::new("wall_temperature")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .legend(Legend::default())
                        .show(ui, |plot_ui| {
                            for (name, points) in series {
                                plot_ui.line(Line::new(name, PlotPoints::from(points)));
                            }
                        });
                });
            });
        });
    }
}
