use reentry_sim::analysis::sweep::{linspace, sweep_parallel, SweepParameter};
use reentry_sim::dynamics::state::SimConfig;
use reentry_sim::io::csv;
use reentry_sim::model::EntryModel;
use reentry_sim::vehicle::presets;

fn main() {
    let capsule = presets::ballistic_capsule();
    let model = EntryModel::default();
    let config = SimConfig::default();

    let betas = linspace(100.0, 1_000.0, 10);
    let result = sweep_parallel(&capsule, SweepParameter::BallisticCoefficient, &betas, &model, &config)
        .expect("Sweep failed");

    println!("{:>10} {:>14} {:>12} {:>10}", "beta", "q_max (MW/m2)", "Q (MJ/m2)", "n (g)");
    for i in 0..result.len() {
        println!(
            "{:>10.0} {:>14.3} {:>12.2} {:>10.2}",
            result.values[i],
            result.peak_heat_flux[i] / 1e6,
            result.heat_load[i] / 1e6,
            result.peak_deceleration[i] / 9.806_65
        );
    }

    csv::write_sweep_file("beta_sweep.csv", &result).expect("Failed to write CSV");
    println!("Exported: beta_sweep.csv");
}
