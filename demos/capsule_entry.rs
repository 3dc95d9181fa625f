use reentry_sim::analysis::run_entry;
use reentry_sim::dynamics::state::SimConfig;
use reentry_sim::io::csv;
use reentry_sim::io::format::format_with_prefix;
use reentry_sim::io::json::{self, RunReport};
use reentry_sim::model::EntryModel;
use reentry_sim::vehicle::presets;

fn main() {
    let capsule = presets::ballistic_capsule();
    let config = SimConfig::default();

    println!("Simulating ballistic capsule ...");
    let run = run_entry(&capsule, &EntryModel::default(), &config).expect("Simulation failed");

    let s = &run.summary;
    println!("{}", s.termination);
    println!("Peak deceleration: {:.1} g", s.peak_deceleration_g);
    if let (Some(q), Some(load)) = (s.peak_heat_flux, s.heat_load) {
        println!("Peak heat flux: {}", format_with_prefix(q, "W/m^2", 2));
        println!("Heat load: {}", format_with_prefix(load, "J/m^2", 2));
    }
    if let Some(eta) = s.energy_absorption_fraction {
        println!("Energy absorbed by the wall: {:.3} %", eta * 100.0);
    }

    csv::write_trajectory_file("capsule_trajectory.csv", &run).expect("Failed to write CSV");
    let report = RunReport { name: "ballistic capsule", vehicle: &capsule, summary: s };
    json::write_reports_file("capsule_summary.json", &[report]).expect("Failed to write JSON");

    println!("Exported: capsule_trajectory.csv, capsule_summary.json");
}
