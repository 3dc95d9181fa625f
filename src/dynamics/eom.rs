use nalgebra::Vector3;

use crate::dynamics::state::{flight_path_deg_from_gamma, GAMMA, H, V};
use crate::physics::{Atmosphere, Gravity};
use crate::sim::integrator::OdeSystem;
use crate::vehicle::Vehicle;

// ---------------------------------------------------------------------------
// Lift modulation
// ---------------------------------------------------------------------------

/// Flight-path angle (deg) at or below which full lift is applied.
pub const FULL_LIFT_ANGLE_DEG: f64 = -5.0;

/// How the configured L/D enters the turning equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LiftPolicy {
    /// Use the vehicle's L/D unchanged.
    Constant,
    /// Scale L/D by `control_gain`, fading lift out between -5 deg and 0 deg.
    #[default]
    SkipSuppression,
}

/// Lift blend factor for a flight-path angle in degrees, negative descending.
///
/// 1 at or below -5 deg, 0 at or above 0 deg, linear in between.
pub fn control_gain(gamma_deg: f64) -> f64 {
    if gamma_deg <= FULL_LIFT_ANGLE_DEG {
        1.0
    } else if gamma_deg >= 0.0 {
        0.0
    } else {
        gamma_deg / FULL_LIFT_ANGLE_DEG
    }
}

// ---------------------------------------------------------------------------
// Equations of motion (3-state planar point mass)
// ---------------------------------------------------------------------------

/// Right-hand side of the entry equations for one vehicle.
///
///   v'     = -q/beta + g sin(gamma)
///   gamma' = ( -(q/beta) L/D_eff + cos(gamma) (g - v^2/(R+h)) ) / v
///   h'     = -v sin(gamma)
///
/// gamma is measured below the horizontal (positive while descending).
/// gamma' is singular at v = 0. That domain is exposed through
/// `OdeSystem::is_defined` so the driver stops instead of producing NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Eom {
    pub vehicle: Vehicle,
    pub atmosphere: Atmosphere,
    pub gravity: Gravity,
    pub lift: LiftPolicy,
}

impl Eom {
    pub fn new(vehicle: Vehicle, atmosphere: Atmosphere, gravity: Gravity, lift: LiftPolicy) -> Self {
        Self {
            vehicle,
            atmosphere,
            gravity,
            lift,
        }
    }

    /// Effective lift-to-drag ratio at state angle `gamma` (rad, positive below
    /// the horizon).
    pub fn effective_l_over_d(&self, gamma: f64) -> f64 {
        match self.lift {
            LiftPolicy::Constant => self.vehicle.l_over_d,
            LiftPolicy::SkipSuppression => {
                control_gain(flight_path_deg_from_gamma(gamma)) * self.vehicle.l_over_d
            }
        }
    }

    /// State derivative (v', gamma', h') at time `t`.
    pub fn right_sides(&self, _t: f64, y: &Vector3<f64>) -> Vector3<f64> {
        let (v, gamma, h) = (y[V], y[GAMMA], y[H]);

        let q = self.atmosphere.dynamic_pressure(v, h);
        let beta = self.vehicle.ballistic_coefficient;
        let g = self.gravity.acceleration(h);
        let l_over_d = self.effective_l_over_d(gamma);

        let (sin_g, cos_g) = gamma.sin_cos();
        let drag_decel = q / beta;

        let v_dot = -drag_decel + g * sin_g;
        let gamma_dot =
            (-drag_decel * l_over_d + cos_g * (g - v * v / (self.gravity.earth_radius + h))) / v;
        let h_dot = -v * sin_g;

        Vector3::new(v_dot, gamma_dot, h_dot)
    }
}

impl OdeSystem<3> for Eom {
    fn rhs(&self, t: f64, y: &Vector3<f64>) -> Vector3<f64> {
        self.right_sides(t, y)
    }

    fn is_defined(&self, _t: f64, y: &Vector3<f64>) -> bool {
        y[V] > 0.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
