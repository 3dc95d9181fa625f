use nalgebra::Vector3;

use crate::error::SimError;
use crate::sim::integrator::StepSettings;

// ---------------------------------------------------------------------------
// Planar point-mass state: velocity, flight-path angle, altitude
// ---------------------------------------------------------------------------

/// Index of velocity in the state vector.
pub const V: usize = 0;
/// Index of the flight-path angle in the state vector.
pub const GAMMA: usize = 1;
/// Index of altitude in the state vector.
pub const H: usize = 2;

/// State angle (rad, positive below the horizon) for a record flight-path
/// angle in degrees, negative when descending.
pub fn gamma_from_flight_path_deg(angle_deg: f64) -> f64 {
    (-angle_deg).to_radians()
}

/// Record flight-path angle (deg, negative when descending) for a state angle.
pub fn flight_path_deg_from_gamma(gamma: f64) -> f64 {
    -gamma.to_degrees()
}

/// One recorded sample of the trajectory.
///
/// The stored angle is measured below the local horizontal, so h' = -v sin(gamma)
/// and a descending vehicle has gamma > 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State {
    pub time: f64,          // s
    pub y: Vector3<f64>,    // [v (m/s), gamma (rad), h (m)]
}

impl State {
    pub fn new(time: f64, v: f64, gamma: f64, h: f64) -> Self {
        Self {
            time,
            y: Vector3::new(v, gamma, h),
        }
    }

    pub fn velocity(&self) -> f64 {
        self.y[V]
    }

    /// Flight-path angle, rad
    pub fn gamma(&self) -> f64 {
        self.y[GAMMA]
    }

    /// Flight-path angle in the vehicle record convention, deg (negative descending)
    pub fn flight_path_angle_deg(&self) -> f64 {
        flight_path_deg_from_gamma(self.y[GAMMA])
    }

    pub fn altitude(&self) -> f64 {
        self.y[H]
    }
}

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

/// Numerical settings of one run.
///
/// The tolerances are tight because the state mixes quantities spanning many
/// orders of magnitude (km/s velocities, hundreds of km of altitude, radians).
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub t_max: f64,      // s, horizon if the ground is never reached
    pub max_step: f64,   // s
    pub min_step: f64,   // s
    pub first_step: f64, // s
    pub rtol: f64,
    pub atol: f64,
    pub max_steps: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        let step = StepSettings::default();
        Self {
            t_max: 5_000.0,
            max_step: step.max_step,
            min_step: step.min_step,
            first_step: step.first_step,
            rtol: step.rtol,
            atol: step.atol,
            max_steps: step.max_steps,
        }
    }
}

impl SimConfig {
    /// Integrator settings of this config (everything but the horizon).
    pub fn step_settings(&self) -> StepSettings {
        StepSettings {
            rtol: self.rtol,
            atol: self.atol,
            max_step: self.max_step,
            min_step: self.min_step,
            first_step: self.first_step,
            max_steps: self.max_steps,
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        let finite_positive = [
            ("t_max", self.t_max),
            ("max_step", self.max_step),
            ("min_step", self.min_step),
            ("first_step", self.first_step),
            ("atol", self.atol),
        ];
        for (name, value) in finite_positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(SimError::Settings(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }
        if !self.rtol.is_finite() || self.rtol < 0.0 {
            return Err(SimError::Settings(format!(
                "rtol must be non-negative and finite, got {}",
                self.rtol
            )));
        }
        if self.min_step > self.max_step {
            return Err(SimError::Settings(format!(
                "min_step {} exceeds max_step {}",
                self.min_step, self.max_step
            )));
        }
        if self.max_steps == 0 {
            return Err(SimError::Settings("max_steps must be at least 1".into()));
        }
        Ok(())
    }
}
