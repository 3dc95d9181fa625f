use crate::physics::atmosphere::Atmosphere;

// ---------------------------------------------------------------------------
// Sutton-Graves heating and radiative equilibrium
// ---------------------------------------------------------------------------

/// Sutton-Graves constant for Earth entry, SI units
pub const SUTTON_GRAVES_K: f64 = 1.74e-4;
/// Stefan-Boltzmann constant, W/(m^2·K^4)
pub const STEFAN_BOLTZMANN: f64 = 5.670_374e-8;
/// Fixed surface emissivity; the record's emission coefficient is not used here.
pub const SURFACE_EMISSIVITY: f64 = 0.8;
/// Radiative background temperature (0 °C), K
pub const BACKGROUND_TEMPERATURE: f64 = 273.15;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalConstants {
    pub k_sg: f64,
    pub sigma: f64,
    pub emissivity: f64,
    pub background_temperature: f64, // K
}

impl Default for ThermalConstants {
    fn default() -> Self {
        Self {
            k_sg: SUTTON_GRAVES_K,
            sigma: STEFAN_BOLTZMANN,
            emissivity: SURFACE_EMISSIVITY,
            background_temperature: BACKGROUND_TEMPERATURE,
        }
    }
}

/// Stagnation-point heating of one vehicle in one atmosphere.
///
/// Stateless: every evaluation depends only on the instantaneous (h, v), so
/// a trajectory can be post-processed sample by sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalModel {
    pub constants: ThermalConstants,
    pub atmosphere: Atmosphere,
    pub nose_radius: f64, // m
}

impl ThermalModel {
    pub fn new(constants: ThermalConstants, atmosphere: Atmosphere, nose_radius: f64) -> Self {
        Self {
            constants,
            atmosphere,
            nose_radius,
        }
    }

    /// Override the surface emissivity used by the wall temperature.
    pub fn with_emissivity(mut self, emissivity: f64) -> Self {
        self.constants.emissivity = emissivity;
        self
    }

    /// Convective heat flux q = k_sg * sqrt(rho / R_n) * v^3, W/m^2.
    pub fn heat_flux(&self, h: f64, v: f64) -> f64 {
        let rho = self.atmosphere.density(h);
        self.constants.k_sg * (rho / self.nose_radius).sqrt() * v.powi(3)
    }

    /// Radiative-equilibrium wall temperature against the background, K.
    pub fn wall_temperature(&self, h: f64, v: f64) -> f64 {
        let c = &self.constants;
        (self.heat_flux(h, v) / (c.sigma * c.emissivity) + c.background_temperature.powi(4))
            .powf(0.25)
    }
}
