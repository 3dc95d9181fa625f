use reentry_sim::analysis::run_entry;
use reentry_sim::dynamics::state::SimConfig;
use reentry_sim::dynamics::LiftPolicy;
use reentry_sim::model::EntryModel;
use reentry_sim::vehicle::presets;

/// Fly the lifting body with raw and with faded-out lift near level flight.
fn main() {
    let body = presets::lifting_body();
    let config = SimConfig::default();

    println!("Lifting body, L/D = {:.2}", body.l_over_d);
    println!(
        "  {:<18} {:>10} {:>12} {:>12} {:>10}",
        "lift policy", "t (s)", "range (km)", "q (MW/m2)", "n (g)"
    );
    for lift in [LiftPolicy::Constant, LiftPolicy::SkipSuppression] {
        let model = EntryModel::default().with_lift(lift);
        let run = run_entry(&body, &model, &config).expect("Simulation failed");
        let s = &run.summary;
        println!(
            "  {:<18} {:>10.1} {:>12.1} {:>12.3} {:>10.2}",
            format!("{:?}", lift),
            s.flight_time,
            s.downrange / 1000.0,
            s.peak_heat_flux.unwrap_or(0.0) / 1e6,
            s.peak_deceleration_g
        );
    }
}
