pub mod sweep;

use std::f64::consts::FRAC_PI_2;

use serde::Serialize;

use crate::dynamics::eom::Eom;
use crate::dynamics::state::{SimConfig, State};
use crate::error::SimError;
use crate::model::EntryModel;
use crate::physics::gravity::STANDARD_GRAVITY;
use crate::physics::ThermalModel;
use crate::sim::runner::{simulate, SimResult};
use crate::vehicle::Vehicle;

// ---------------------------------------------------------------------------
// Acceleration
// ---------------------------------------------------------------------------

/// Tangential acceleration v' at every sample, from the same EOM that
/// produced the trajectory (no numerical differentiation).
pub fn acceleration_history(trajectory: &[State], eom: &Eom) -> Vec<f64> {
    trajectory
        .iter()
        .map(|s| eom.right_sides(s.time, &s.y)[0])
        .collect()
}

/// Largest absolute value, 0 for an empty series.
pub fn peak_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
}

/// Trapezoidal integral of `values` over `times`.
pub fn trapezoid(times: &[f64], values: &[f64]) -> f64 {
    times
        .windows(2)
        .zip(values.windows(2))
        .map(|(t, v)| 0.5 * (v[0] + v[1]) * (t[1] - t[0]))
        .sum()
}

// ---------------------------------------------------------------------------
// Heating
// ---------------------------------------------------------------------------

/// Heat flux (W/m^2) and wall temperature (K), one entry per trajectory sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThermalHistory {
    pub heat_flux: Vec<f64>,
    pub wall_temperature: Vec<f64>,
}

impl ThermalHistory {
    pub fn peak_heat_flux(&self) -> f64 {
        self.heat_flux.iter().copied().fold(0.0, f64::max)
    }

    pub fn peak_wall_temperature(&self) -> f64 {
        self.wall_temperature.iter().copied().fold(0.0, f64::max)
    }

    /// Integrated heat load, J/m^2
    pub fn heat_load(&self, times: &[f64]) -> f64 {
        trapezoid(times, &self.heat_flux)
    }
}

pub fn thermal_history(trajectory: &[State], thermal: &ThermalModel) -> ThermalHistory {
    let (heat_flux, wall_temperature) = trajectory
        .iter()
        .map(|s| {
            (
                thermal.heat_flux(s.altitude(), s.velocity()),
                thermal.wall_temperature(s.altitude(), s.velocity()),
            )
        })
        .unzip();
    ThermalHistory {
        heat_flux,
        wall_temperature,
    }
}

/// Total energy absorbed through the reference area, J
pub fn absorbed_energy(heat_load: f64, vehicle: &Vehicle) -> f64 {
    heat_load * vehicle.reference_area
}

/// Share of the initial kinetic energy that ends up in the wall.
///
/// The kinetic energy uses the mass implied by beta * Cd * A, not the
/// record's `mass` field.
pub fn energy_absorption_fraction(vehicle: &Vehicle, heat_load: f64) -> f64 {
    absorbed_energy(heat_load, vehicle) / vehicle.initial_kinetic_energy()
}

// ---------------------------------------------------------------------------
// Ground track
// ---------------------------------------------------------------------------

/// Planar path over a circular Earth.
///
/// theta is the polar angle of the vehicle, starting at the zenith (pi/2)
/// and decreasing as it flies downrange.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroundTrack {
    pub theta: Vec<f64>,     // rad
    pub x: Vec<f64>,         // m
    pub y: Vec<f64>,         // m
    pub downrange: Vec<f64>, // m, along the surface
}

impl GroundTrack {
    pub fn total_downrange(&self) -> f64 {
        self.downrange.last().copied().unwrap_or(0.0)
    }
}

/// Integrate theta' = -v cos(gamma) / (R + h) with the trapezoidal rule.
pub fn ground_track(trajectory: &[State], earth_radius: f64) -> GroundTrack {
    let theta_rate = |s: &State| -s.velocity() * s.gamma().cos() / (earth_radius + s.altitude());

    let mut track = GroundTrack::default();
    let mut theta = FRAC_PI_2;
    for (i, s) in trajectory.iter().enumerate() {
        if i > 0 {
            let prev = &trajectory[i - 1];
            theta += 0.5 * (theta_rate(s) + theta_rate(prev)) * (s.time - prev.time);
        }
        let r = earth_radius + s.altitude();
        track.theta.push(theta);
        track.x.push(r * theta.cos());
        track.y.push(r * theta.sin());
        track.downrange.push(earth_radius * (FRAC_PI_2 - theta));
    }
    track
}

// ---------------------------------------------------------------------------
// Single-run pipeline
// ---------------------------------------------------------------------------

/// Scalar results of one entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntrySummary {
    pub status: i32,
    pub termination: String,
    pub flight_time: f64,             // s
    pub final_velocity: f64,          // m/s
    pub final_altitude: f64,          // m
    pub max_altitude: f64,            // m
    pub downrange: f64,               // m
    pub peak_deceleration: f64,       // m/s^2
    pub peak_deceleration_g: f64,     // g0
    pub peak_heat_flux: Option<f64>,  // W/m^2
    pub heat_load: Option<f64>,       // J/m^2
    pub absorbed_energy: Option<f64>, // J
    pub peak_wall_temperature: Option<f64>, // K
    pub energy_absorption_fraction: Option<f64>,
    pub accepted_steps: u64,
    pub rejected_steps: u64,
}

/// Everything derived from one simulated entry.
#[derive(Debug, Clone)]
pub struct EntryRun {
    pub vehicle: Vehicle,
    pub result: SimResult,
    pub acceleration: Vec<f64>,
    pub thermal: Option<ThermalHistory>,
    pub track: GroundTrack,
    pub summary: EntrySummary,
}

impl EntryRun {
    pub fn times(&self) -> Vec<f64> {
        self.result.times()
    }
}

/// Simulate, check the status, then post-process the trajectory.
///
/// Runs that stop at the horizon are kept; solver failures are errors.
pub fn run_entry(vehicle: &Vehicle, model: &EntryModel, config: &SimConfig) -> Result<EntryRun, SimError> {
    let result = simulate(vehicle, model, config)?.into_checked()?;
    let last = result.last().copied().unwrap_or_else(|| vehicle.initial_state());
    let times = result.times();

    let eom = model.eom(vehicle);
    let acceleration = acceleration_history(&result.trajectory, &eom);
    let thermal = model
        .thermal_model(vehicle)
        .map(|t| thermal_history(&result.trajectory, &t));
    let track = ground_track(&result.trajectory, model.gravity.earth_radius);

    let peak_deceleration = peak_abs(&acceleration);
    let heat_load = thermal.as_ref().map(|th| th.heat_load(&times));
    let max_altitude = result
        .trajectory
        .iter()
        .map(|s| s.altitude())
        .fold(f64::NEG_INFINITY, f64::max);

    let summary = EntrySummary {
        status: result.status_code(),
        termination: result.message(),
        flight_time: last.time,
        final_velocity: last.velocity(),
        final_altitude: last.altitude(),
        max_altitude,
        downrange: track.total_downrange(),
        peak_deceleration,
        peak_deceleration_g: peak_deceleration / STANDARD_GRAVITY,
        peak_heat_flux: thermal.as_ref().map(ThermalHistory::peak_heat_flux),
        heat_load,
        absorbed_energy: heat_load.map(|q| absorbed_energy(q, vehicle)),
        peak_wall_temperature: thermal.as_ref().map(ThermalHistory::peak_wall_temperature),
        energy_absorption_fraction: heat_load.map(|q| energy_absorption_fraction(vehicle, q)),
        accepted_steps: result.stats.accepted,
        rejected_steps: result.stats.rejected,
    };

    Ok(EntryRun {
        vehicle: *vehicle,
        result,
        acceleration,
        thermal,
        track,
        summary,
    })
}

/// Run several named vehicles through the same model, in order.
pub fn compare<'a, I>(cases: I, model: &EntryModel, config: &SimConfig) -> Result<Vec<(String, EntryRun)>, SimError>
where
    I: IntoIterator<Item = (&'a str, Vehicle)>,
{
    cases
        .into_iter()
        .map(|(name, vehicle)| Ok((name.to_string(), run_entry(&vehicle, model, config)?)))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
