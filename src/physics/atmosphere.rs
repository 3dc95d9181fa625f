use crate::physics::gravity::STANDARD_GRAVITY;

// ---------------------------------------------------------------------------
// Atmosphere models
// ---------------------------------------------------------------------------

/// Sea-level density of the exponential model, kg/m^3
pub const RHO0: f64 = 1.2;
/// Exponential decay constant, 1/m (negative: density falls with altitude)
pub const DECAY: f64 = -1.244_268e-4;

/// Density model injected into the equations of motion and the thermal model.
///
/// Altitudes below ground are clamped to sea level; no variant ever rejects
/// an input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Atmosphere {
    /// rho = rho0 * exp(decay * h)
    Exponential { rho0: f64, decay: f64 },
    /// 1976 standard atmosphere, 7 layers to 86 km with an exponential tail.
    Standard1976,
}

impl Default for Atmosphere {
    fn default() -> Self {
        Atmosphere::Exponential {
            rho0: RHO0,
            decay: DECAY,
        }
    }
}

impl Atmosphere {
    /// Density at geometric altitude `h` (m), kg/m^3.
    pub fn density(&self, h: f64) -> f64 {
        let h = h.max(0.0);
        match *self {
            Atmosphere::Exponential { rho0, decay } => rho0 * (decay * h).exp(),
            Atmosphere::Standard1976 => standard_1976(h).density,
        }
    }

    /// Dynamic pressure q = 0.5 * rho(h) * v^2, Pa.
    pub fn dynamic_pressure(&self, v: f64, h: f64) -> f64 {
        0.5 * self.density(h) * v * v
    }

    /// Density scale height at sea level, m.
    pub fn scale_height(&self) -> f64 {
        match *self {
            Atmosphere::Exponential { decay, .. } => -1.0 / decay,
            Atmosphere::Standard1976 => R_AIR * T0 / STANDARD_GRAVITY,
        }
    }
}

// ---------------------------------------------------------------------------
// 1976 standard atmosphere
// ---------------------------------------------------------------------------

const R_AIR: f64 = 287.052_87; // J/(kg·K)
const T0: f64 = 288.15; // K
const P0: f64 = 101_325.0; // Pa

/// Layer base altitude (m), base temperature (K), lapse rate (K/m), base pressure (Pa).
const LAYERS: [(f64, f64, f64, f64); 7] = [
    (0.0, T0, -0.0065, P0),
    (11_000.0, 216.65, 0.0, 22_632.1),
    (20_000.0, 216.65, 0.001, 5_474.89),
    (32_000.0, 228.65, 0.0028, 868.019),
    (47_000.0, 270.65, 0.0, 110.906),
    (51_000.0, 270.65, -0.0028, 66.9389),
    (71_000.0, 214.65, -0.002, 3.956_42),
];

const TAIL_BASE: f64 = 86_000.0;
const TAIL_DECAY: f64 = 1.5e-4; // 1/m

/// Thermodynamic state of the standard atmosphere at one altitude.
#[derive(Debug, Clone, Copy)]
pub struct StandardState {
    pub density: f64,     // kg/m^3
    pub pressure: f64,    // Pa
    pub temperature: f64, // K
}

/// Evaluate the 1976 standard atmosphere at `h` (m), clamped to sea level.
///
/// Above 86 km the temperature is frozen at its 86 km value and pressure
/// decays exponentially from there, so the profile stays continuous.
pub fn standard_1976(h: f64) -> StandardState {
    let h = h.max(0.0);

    let (temperature, pressure) = if h >= TAIL_BASE {
        let (t, p) = layer_state(TAIL_BASE);
        (t, p * (-TAIL_DECAY * (h - TAIL_BASE)).exp())
    } else {
        layer_state(h)
    };

    StandardState {
        density: pressure / (R_AIR * temperature),
        pressure,
        temperature,
    }
}

/// Temperature and pressure inside the layer containing `h`.
fn layer_state(h: f64) -> (f64, f64) {
    let &(h_base, t_base, lapse, p_base) = LAYERS
        .iter()
        .rev()
        .find(|layer| h >= layer.0)
        .unwrap_or(&LAYERS[0]);
    let dh = h - h_base;
    if lapse == 0.0 {
        (t_base, p_base * (-STANDARD_GRAVITY * dh / (R_AIR * t_base)).exp())
    } else {
        let t = t_base + lapse * dh;
        (t, p_base * (t / t_base).powf(-STANDARD_GRAVITY / (lapse * R_AIR)))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
