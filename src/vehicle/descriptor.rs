use serde::{Deserialize, Serialize};

use crate::analysis::sweep::SweepParameter;
use crate::dynamics::state::{gamma_from_flight_path_deg, State};
use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Vehicle definition (one configuration record)
// ---------------------------------------------------------------------------

/// Aerodynamic, geometric and initial-condition parameters of an entry vehicle.
///
/// Field names match the configuration record one-to-one. The ballistic
/// coefficient and L/D are taken as given and held constant for a run; they
/// are not re-derived from the coefficients during integration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Vehicle {
    pub mass: f64,                  // kg
    pub reference_area: f64,        // m^2
    pub drag_coefficient: f64,      // -
    pub lift_coefficient: f64,      // -
    pub ballistic_coefficient: f64, // kg/m^2, nominally m / (Cd*A)
    #[serde(rename = "L_over_D")]
    pub l_over_d: f64,              // -
    pub initial_angle: f64,         // deg, flight-path angle, negative = descending
    pub initial_altitude: f64,      // m
    pub initial_velocity: f64,      // m/s
    pub nose_radius: f64,           // m
    pub emission_coefficient: f64,  // -
}

impl Vehicle {
    /// Ballistic coefficient derived from mass and drag: m / (Cd * A)
    pub fn compute_ballistic_coefficient(&self) -> f64 {
        self.mass / (self.drag_coefficient * self.reference_area)
    }

    /// Mass implied by the configured ballistic coefficient: beta * Cd * A
    pub fn derived_mass(&self) -> f64 {
        self.ballistic_coefficient * self.drag_coefficient * self.reference_area
    }

    /// Drag force for dynamic pressure q (Pa), N
    pub fn aerodynamic_drag(&self, q: f64) -> f64 {
        q * self.drag_coefficient * self.reference_area
    }

    /// Lift force for dynamic pressure q (Pa), N
    pub fn aerodynamic_lift(&self, q: f64) -> f64 {
        q * self.lift_coefficient * self.reference_area
    }

    /// L/D from the force coefficients (0 for a drag-free body).
    pub fn compute_l_over_d(&self) -> f64 {
        if self.drag_coefficient == 0.0 {
            0.0
        } else {
            self.lift_coefficient / self.drag_coefficient
        }
    }

    /// Initial kinetic energy using the mass implied by beta, J
    pub fn initial_kinetic_energy(&self) -> f64 {
        0.5 * self.derived_mass() * self.initial_velocity * self.initial_velocity
    }

    /// Entry state at t = 0.
    ///
    /// The record angle is in degrees and negative when descending; the state
    /// angle is in radians and positive below the horizon.
    pub fn initial_state(&self) -> State {
        State::new(
            0.0,
            self.initial_velocity,
            gamma_from_flight_path_deg(self.initial_angle),
            self.initial_altitude,
        )
    }

    /// Copy of this vehicle with one sweepable parameter replaced.
    pub fn with_parameter(&self, parameter: SweepParameter, value: f64) -> Vehicle {
        let mut v = *self;
        match parameter {
            SweepParameter::InitialAngle => v.initial_angle = value,
            SweepParameter::BallisticCoefficient => v.ballistic_coefficient = value,
        }
        v
    }

    /// Reject records that would make the model undefined.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("mass", self.mass),
            ("reference_area", self.reference_area),
            ("drag_coefficient", self.drag_coefficient),
            ("lift_coefficient", self.lift_coefficient),
            ("ballistic_coefficient", self.ballistic_coefficient),
            ("L_over_D", self.l_over_d),
            ("initial_angle", self.initial_angle),
            ("initial_altitude", self.initial_altitude),
            ("initial_velocity", self.initial_velocity),
            ("nose_radius", self.nose_radius),
            ("emission_coefficient", self.emission_coefficient),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(invalid(field, format!("{} is not finite", value)));
            }
        }

        let positive = [
            ("mass", self.mass),
            ("reference_area", self.reference_area),
            ("drag_coefficient", self.drag_coefficient),
            ("ballistic_coefficient", self.ballistic_coefficient),
            ("initial_velocity", self.initial_velocity),
            ("nose_radius", self.nose_radius),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(invalid(field, format!("must be positive, got {}", value)));
            }
        }

        if self.initial_altitude < 0.0 {
            return Err(invalid(
                "initial_altitude",
                format!("must not be below ground, got {}", self.initial_altitude),
            ));
        }
        if self.initial_angle.abs() >= 90.0 {
            return Err(invalid(
                "initial_angle",
                format!("must lie strictly within ±90 deg, got {}", self.initial_angle),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

// ---------------------------------------------------------------------------
// Vehicle builder
// ---------------------------------------------------------------------------

/// Fluent construction with capsule-like defaults.
///
/// `build` keeps the ballistic coefficient consistent with mass, Cd and area
/// unless one was set explicitly; likewise L/D follows Cl/Cd.
pub struct VehicleBuilder {
    mass: f64,
    reference_area: f64,
    drag_coefficient: f64,
    lift_coefficient: f64,
    ballistic_coefficient: Option<f64>,
    l_over_d: Option<f64>,
    initial_angle: f64,
    initial_altitude: f64,
    initial_velocity: f64,
    nose_radius: f64,
    emission_coefficient: f64,
}

impl Default for VehicleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl VehicleBuilder {
    pub fn new() -> Self {
        Self {
            mass: 2_500.0,
            reference_area: 3.8,
            drag_coefficient: 1.2,
            lift_coefficient: 0.0,
            ballistic_coefficient: None,
            l_over_d: None,
            initial_angle: -5.0,
            initial_altitude: 100_000.0,
            initial_velocity: 7_000.0,
            nose_radius: 1.0,
            emission_coefficient: 0.8,
        }
    }

    pub fn mass(mut self, v: f64) -> Self { self.mass = v; self }
    pub fn reference_area(mut self, v: f64) -> Self { self.reference_area = v; self }
    pub fn drag_coefficient(mut self, v: f64) -> Self { self.drag_coefficient = v; self }
    pub fn lift_coefficient(mut self, v: f64) -> Self { self.lift_coefficient = v; self }
    pub fn ballistic_coefficient(mut self, v: f64) -> Self { self.ballistic_coefficient = Some(v); self }
    pub fn l_over_d(mut self, v: f64) -> Self { self.l_over_d = Some(v); self }
    pub fn initial_angle(mut self, v: f64) -> Self { self.initial_angle = v; self }
    pub fn initial_altitude(mut self, v: f64) -> Self { self.initial_altitude = v; self }
    pub fn initial_velocity(mut self, v: f64) -> Self { self.initial_velocity = v; self }
    pub fn nose_radius(mut self, v: f64) -> Self { self.nose_radius = v; self }
    pub fn emission_coefficient(mut self, v: f64) -> Self { self.emission_coefficient = v; self }

    pub fn build(self) -> Vehicle {
        let mut vehicle = Vehicle {
            mass: self.mass,
            reference_area: self.reference_area,
            drag_coefficient: self.drag_coefficient,
            lift_coefficient: self.lift_coefficient,
            ballistic_coefficient: 0.0,
            l_over_d: 0.0,
            initial_angle: self.initial_angle,
            initial_altitude: self.initial_altitude,
            initial_velocity: self.initial_velocity,
            nose_radius: self.nose_radius,
            emission_coefficient: self.emission_coefficient,
        };
        vehicle.ballistic_coefficient = self
            .ballistic_coefficient
            .unwrap_or_else(|| vehicle.compute_ballistic_coefficient());
        vehicle.l_over_d = self.l_over_d.unwrap_or_else(|| vehicle.compute_l_over_d());
        vehicle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn builder_derives_beta_and_l_over_d() {
        let v = VehicleBuilder::new()
            .mass(1_000.0)
            .reference_area(2.0)
            .drag_coefficient(1.0)
            .lift_coefficient(0.3)
            .build();
        assert_relative_eq!(v.ballistic_coefficient, 500.0, max_relative = 1e-12);
        assert_relative_eq!(v.l_over_d, 0.3, max_relative = 1e-12);
        assert!(v.validate().is_ok());
    }

    #[test]
    fn explicit_beta_is_kept() {
        let v = VehicleBuilder::new().ballistic_coefficient(123.0).build();
        assert_eq!(v.ballistic_coefficient, 123.0);
        assert!((v.compute_ballistic_coefficient() - 123.0).abs() > 1.0);
    }

    #[test]
    fn derived_mass_inverts_beta() {
        let v = VehicleBuilder::new().build();
        assert_relative_eq!(v.derived_mass(), v.mass, max_relative = 1e-12);
    }

    #[test]
    fn forces_scale_with_dynamic_pressure() {
        let v = VehicleBuilder::new().lift_coefficient(0.4).build();
        assert_relative_eq!(v.aerodynamic_drag(1_000.0), 1_000.0 * 1.2 * 3.8, max_relative = 1e-12);
        assert_relative_eq!(v.aerodynamic_lift(1_000.0), 1_000.0 * 0.4 * 3.8, max_relative = 1e-12);
    }

    #[test]
    fn zero_drag_gives_zero_l_over_d() {
        let mut v = VehicleBuilder::new().build();
        v.drag_coefficient = 0.0;
        assert_eq!(v.compute_l_over_d(), 0.0);
    }

    #[test]
    fn initial_state_converts_record_angle() {
        let v = VehicleBuilder::new().initial_angle(-5.0).build();
        let s = v.initial_state();
        assert_eq!(s.time, 0.0);
        assert_eq!(s.velocity(), 7_000.0);
        assert_relative_eq!(s.gamma(), 5.0_f64.to_radians(), max_relative = 1e-12);
        assert_eq!(s.altitude(), 100_000.0);
    }

    #[test]
    fn with_parameter_overrides_one_field() {
        let base = VehicleBuilder::new().build();
        let steep = base.with_parameter(SweepParameter::InitialAngle, -12.0);
        assert_eq!(steep.initial_angle, -12.0);
        assert_eq!(steep.ballistic_coefficient, base.ballistic_coefficient);

        let heavy = base.with_parameter(SweepParameter::BallisticCoefficient, 900.0);
        assert_eq!(heavy.ballistic_coefficient, 900.0);
        assert_eq!(heavy.initial_angle, base.initial_angle);
    }

    #[test]
    fn validate_rejects_non_physical_values() {
        let mut v = VehicleBuilder::new().build();
        v.nose_radius = 0.0;
        match v.validate() {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "nose_radius"),
            other => panic!("expected invalid nose_radius, got {:?}", other),
        }

        let mut v = VehicleBuilder::new().build();
        v.initial_altitude = -1.0;
        assert!(v.validate().is_err());

        let mut v = VehicleBuilder::new().build();
        v.mass = f64::NAN;
        assert!(v.validate().is_err());
    }
}
