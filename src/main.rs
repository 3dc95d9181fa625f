use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};

use reentry_sim::analysis::sweep::{linspace, sweep, sweep_parallel, SweepParameter, SweepResult};
use reentry_sim::analysis::{compare, run_entry, EntryRun};
use reentry_sim::dynamics::{LiftPolicy, SimConfig};
use reentry_sim::io::format::format_with_prefix;
use reentry_sim::io::json::RunReport;
use reentry_sim::io::{csv, json, load_vehicle};
use reentry_sim::model::EntryModel;
use reentry_sim::physics::gravity::STANDARD_GRAVITY;
use reentry_sim::physics::Atmosphere;
use reentry_sim::vehicle::{presets, Vehicle};

#[derive(Parser)]
#[command(author, version, about = "Atmospheric reentry simulator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fly one vehicle to the ground (ballistic capsule preset without a record)
    Run {
        /// Vehicle record (JSON)
        config: Option<PathBuf>,
        #[command(flatten)]
        solver: SolverArgs,
        /// Write the sampled trajectory to CSV
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Write the run summary to JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Re-run one vehicle over a range of initial angles or ballistic coefficients
    Sweep {
        /// Base vehicle record (JSON)
        config: PathBuf,
        /// `initial_angle` (deg) or `ballistic_coefficient` (kg/m^2)
        #[arg(long)]
        parameter: String,
        /// Explicit values, comma separated
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, conflicts_with = "from")]
        values: Vec<f64>,
        /// First value of an evenly spaced range
        #[arg(long, allow_negative_numbers = true, requires_all = ["to", "steps"])]
        from: Option<f64>,
        /// Last value of the range
        #[arg(long, allow_negative_numbers = true)]
        to: Option<f64>,
        /// Number of values in the range
        #[arg(long)]
        steps: Option<usize>,
        /// Spread the runs over all cores
        #[arg(long, default_value_t = false)]
        parallel: bool,
        #[command(flatten)]
        solver: SolverArgs,
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Fly several vehicles under the same model and tabulate them
    Compare {
        /// Vehicle records (JSON)
        #[arg(required = true)]
        configs: Vec<PathBuf>,
        #[command(flatten)]
        solver: SolverArgs,
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

#[derive(Args, Clone)]
struct SolverArgs {
    /// Horizon if the ground is never reached, s
    #[arg(long, default_value_t = 5_000.0)]
    t_max: f64,
    /// Largest integration step, s
    #[arg(long, default_value_t = 0.5)]
    max_step: f64,
    #[arg(long, default_value_t = 1e-8)]
    rtol: f64,
    #[arg(long, default_value_t = 1e-9)]
    atol: f64,
    /// Lift modulation
    #[arg(long, value_enum, default_value_t = LiftArg::SkipSuppression)]
    lift: LiftArg,
    /// Skip heat flux and wall temperature
    #[arg(long, default_value_t = false)]
    no_thermal: bool,
    /// Density model
    #[arg(long, value_enum, default_value_t = AtmosphereArg::Exponential)]
    atmosphere: AtmosphereArg,
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum LiftArg {
    Constant,
    SkipSuppression,
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum AtmosphereArg {
    Exponential,
    Standard1976,
}

impl SolverArgs {
    fn config(&self) -> SimConfig {
        SimConfig {
            t_max: self.t_max,
            max_step: self.max_step,
            rtol: self.rtol,
            atol: self.atol,
            ..SimConfig::default()
        }
    }

    fn model(&self) -> EntryModel {
        let lift = match self.lift {
            LiftArg::Constant => LiftPolicy::Constant,
            LiftArg::SkipSuppression => LiftPolicy::SkipSuppression,
        };
        let atmosphere = match self.atmosphere {
            AtmosphereArg::Exponential => Atmosphere::default(),
            AtmosphereArg::Standard1976 => Atmosphere::Standard1976,
        };
        let model = EntryModel::default().with_lift(lift).with_atmosphere(atmosphere);
        if self.no_thermal {
            model.without_thermal()
        } else {
            model
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run { config, solver, csv: csv_path, json: json_path } => {
            let (name, vehicle) = match &config {
                Some(path) => (case_name(path), load(path)?),
                None => ("ballistic capsule".to_string(), presets::ballistic_capsule()),
            };
            let run = run_entry(&vehicle, &solver.model(), &solver.config())?;
            print_run(&name, &run, &solver);

            if let Some(path) = csv_path {
                csv::write_trajectory_file(&path, &run)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("  Trajectory written to {}", path.display());
            }
            if let Some(path) = json_path {
                let report = RunReport { name: &name, vehicle: &vehicle, summary: &run.summary };
                json::write_reports_file(&path, &[report])
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("  Summary written to {}", path.display());
            }
        }

        Command::Sweep {
            config,
            parameter,
            values,
            from,
            to,
            steps,
            parallel,
            solver,
            csv: csv_path,
            json: json_path,
        } => {
            let parameter: SweepParameter = parameter.parse()?;
            let values = match (from, to, steps) {
                (Some(a), Some(b), Some(n)) => linspace(a, b, n),
                _ => values,
            };
            if values.is_empty() {
                bail!("no sweep values: pass --values or --from/--to/--steps");
            }

            let base = load(&config)?;
            let (model, sim) = (solver.model(), solver.config());
            let result = if parallel {
                sweep_parallel(&base, parameter, &values, &model, &sim)?
            } else {
                sweep(&base, parameter, &values, &model, &sim)?
            };
            print_sweep(&case_name(&config), &result);

            if let Some(path) = csv_path {
                csv::write_sweep_file(&path, &result)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("  Sweep written to {}", path.display());
            }
            if let Some(path) = json_path {
                json::write_sweep_file(&path, &result)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("  Sweep written to {}", path.display());
            }
        }

        Command::Compare { configs, solver, json: json_path } => {
            let mut cases = Vec::with_capacity(configs.len());
            for path in &configs {
                cases.push((case_name(path), load(path)?));
            }
            let runs = compare(
                cases.iter().map(|(n, v)| (n.as_str(), *v)),
                &solver.model(),
                &solver.config(),
            )?;
            print_comparison(&runs);

            if let Some(path) = json_path {
                let reports: Vec<RunReport> = runs
                    .iter()
                    .map(|(name, run)| RunReport { name, vehicle: &run.vehicle, summary: &run.summary })
                    .collect();
                json::write_reports_file(&path, &reports)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("  Summary written to {}", path.display());
            }
        }
    }

    Ok(())
}

fn load(path: &Path) -> anyhow::Result<Vehicle> {
    load_vehicle(path).with_context(|| format!("loading vehicle record {}", path.display()))
}

fn case_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().replace('_', " "))
        .unwrap_or_else(|| path.display().to_string())
}

fn opt(value: Option<f64>, unit: &str) -> String {
    value.map_or_else(|| "-".to_string(), |v| format_with_prefix(v, unit, 2))
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

fn print_run(name: &str, run: &EntryRun, solver: &SolverArgs) {
    let v = &run.vehicle;
    let s = &run.summary;

    println!();
    println!("====================================================================");
    println!("  REENTRY SIMULATION — {}", name);
    println!("====================================================================");
    println!();
    println!("  Vehicle Parameters");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Mass:          {:>8.1} kg    Ref. area:    {:>8.3} m^2",
        v.mass, v.reference_area
    );
    println!(
        "  Cd:            {:>8.3}       Cl:           {:>8.3}",
        v.drag_coefficient, v.lift_coefficient
    );
    println!(
        "  Beta:          {:>8.1} kg/m^2 L/D:         {:>8.3}",
        v.ballistic_coefficient, v.l_over_d
    );
    println!(
        "  Nose radius:   {:>8.3} m     Lift policy:  {:?}",
        v.nose_radius, solver.lift
    );
    println!(
        "  Entry:         {:>8.1} km    {:>7.0} m/s   gamma0 {:>6.2} deg",
        v.initial_altitude / 1000.0,
        v.initial_velocity,
        v.initial_angle
    );
    println!();

    println!("  Outcome");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  Status:        {} ({})", s.status, s.termination);
    println!(
        "  Flight time:   {:>8.1} s     Final speed:  {:>8.2} m/s",
        s.flight_time, s.final_velocity
    );
    println!(
        "  Max altitude:  {:>8.1} km    Downrange:    {:>8.1} km",
        s.max_altitude / 1000.0,
        s.downrange / 1000.0
    );
    println!();

    println!("  Loads and Heating");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Peak decel:    {:>8.1} m/s^2 ({:.1} g)",
        s.peak_deceleration, s.peak_deceleration_g
    );
    println!("  Peak heat flux:  {}", opt(s.peak_heat_flux, "W/m^2"));
    println!("  Heat load:       {}", opt(s.heat_load, "J/m^2"));
    println!("  Absorbed energy: {}", opt(s.absorbed_energy, "J"));
    println!(
        "  Peak wall temp:  {}",
        s.peak_wall_temperature.map_or_else(|| "-".to_string(), |t| format!("{:.0} K", t))
    );
    println!(
        "  Energy fraction: {}",
        s.energy_absorption_fraction
            .map_or_else(|| "-".to_string(), |e| format!("{:.3} %", e * 100.0))
    );
    println!();

    // -----------------------------------------------------------------------
    // Trajectory table (sampled)
    // -----------------------------------------------------------------------
    println!("  Trajectory");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>8}  {:>9}  {:>9}  {:>8}  {:>10}  {:>8}  {:>7}",
        "t (s)", "alt (km)", "vel (m/s)", "gamma", "q (MW/m2)", "T (K)", "decel g"
    );
    println!("  {}", "─".repeat(68));

    let trajectory = &run.result.trajectory;
    let sample_interval = (trajectory.len() / 30).max(1);
    for (i, st) in trajectory.iter().enumerate() {
        if i % sample_interval != 0 && i != trajectory.len() - 1 {
            continue;
        }
        let (q, t_wall) = match &run.thermal {
            Some(th) => (
                format!("{:.4}", th.heat_flux[i] / 1e6),
                format!("{:.0}", th.wall_temperature[i]),
            ),
            None => ("-".to_string(), "-".to_string()),
        };
        println!(
            "  {:>8.2}  {:>9.3}  {:>9.1}  {:>8.3}  {:>10}  {:>8}  {:>7.2}",
            st.time,
            st.altitude() / 1000.0,
            st.velocity(),
            st.flight_path_angle_deg(),
            q,
            t_wall,
            run.acceleration[i].abs() / STANDARD_GRAVITY
        );
    }

    println!();
    println!(
        "  Integrator: {} accepted / {} rejected steps, {} samples",
        s.accepted_steps,
        s.rejected_steps,
        trajectory.len()
    );
    println!("====================================================================");
    println!();
}

fn print_sweep(name: &str, result: &SweepResult) {
    println!();
    println!("====================================================================");
    println!("  PARAMETER SWEEP — {} over {}", name, result.parameter);
    println!("====================================================================");
    println!();
    println!(
        "  {:>14}  {:>14}  {:>14}  {:>12}",
        format!("{} ({})", short_name(result.parameter), result.parameter.unit()),
        "q_max (MW/m2)",
        "Q (MJ/m2)",
        "n_max (g)"
    );
    println!("  {}", "─".repeat(60));
    for i in 0..result.len() {
        println!(
            "  {:>14.3}  {:>14.4}  {:>14.3}  {:>12.2}",
            result.values[i],
            result.peak_heat_flux[i] / 1e6,
            result.heat_load[i] / 1e6,
            result.peak_deceleration[i] / STANDARD_GRAVITY
        );
    }
    println!("====================================================================");
    println!();
}

fn short_name(parameter: SweepParameter) -> &'static str {
    match parameter {
        SweepParameter::InitialAngle => "gamma0",
        SweepParameter::BallisticCoefficient => "beta",
    }
}

fn print_comparison(runs: &[(String, EntryRun)]) {
    println!();
    println!("====================================================================");
    println!("  ENTRY COMPARISON");
    println!("====================================================================");
    println!();
    println!(
        "  {:<20}  {:>8}  {:>9}  {:>10}  {:>9}  {:>7}",
        "case", "t (s)", "v_f (m/s)", "q (MW/m2)", "Q (MJ/m2)", "n (g)"
    );
    println!("  {}", "─".repeat(72));
    for (name, run) in runs {
        let s = &run.summary;
        println!(
            "  {:<20}  {:>8.1}  {:>9.2}  {:>10}  {:>9}  {:>7.2}",
            name,
            s.flight_time,
            s.final_velocity,
            s.peak_heat_flux.map_or_else(|| "-".into(), |q| format!("{:.4}", q / 1e6)),
            s.heat_load.map_or_else(|| "-".into(), |q| format!("{:.2}", q / 1e6)),
            s.peak_deceleration_g
        );
    }
    for (name, run) in runs {
        println!("  {}: {}", name, run.summary.termination);
    }
    println!("====================================================================");
    println!();
}
