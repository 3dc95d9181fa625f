// ---------------------------------------------------------------------------
// Physical constants
// ---------------------------------------------------------------------------

pub const GRAVITATIONAL_CONSTANT: f64 = 6.674_30e-11; // m^3/(kg·s^2)
pub const EARTH_MASS: f64 = 5.972_2e24; // kg
pub const EARTH_RADIUS: f64 = 6_371_000.0; // mean Earth radius, m
pub const STANDARD_GRAVITY: f64 = 9.806_65; // m/s^2, used for g-load reporting

// ---------------------------------------------------------------------------
// Inverse-square gravity
// ---------------------------------------------------------------------------

/// Central body parameters for the inverse-square gravity model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gravity {
    pub gravitational_constant: f64, // m^3/(kg·s^2)
    pub earth_mass: f64,             // kg
    pub earth_radius: f64,           // m
}

impl Default for Gravity {
    fn default() -> Self {
        Self {
            gravitational_constant: GRAVITATIONAL_CONSTANT,
            earth_mass: EARTH_MASS,
            earth_radius: EARTH_RADIUS,
        }
    }
}

impl Gravity {
    /// Gravitational parameter G*M, m^3/s^2.
    pub fn mu(&self) -> f64 {
        self.gravitational_constant * self.earth_mass
    }

    /// g(h) = G*M / (R + h)^2 with h clamped to the surface.
    pub fn acceleration(&self, h: f64) -> f64 {
        let r = self.earth_radius + h.max(0.0);
        self.mu() / (r * r)
    }

    pub fn surface_acceleration(&self) -> f64 {
        self.acceleration(0.0)
    }
}
