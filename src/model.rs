use crate::dynamics::{Eom, LiftPolicy};
use crate::physics::{Atmosphere, Gravity, ThermalConstants, ThermalModel};
use crate::vehicle::Vehicle;

/// Environment and policy toggles shared by every run of a study.
///
/// One vehicle plus one model fully determines a trajectory. Thermal
/// post-processing is optional; `thermal: None` skips it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntryModel {
    pub atmosphere: Atmosphere,
    pub gravity: Gravity,
    pub lift: LiftPolicy,
    pub thermal: Option<ThermalConstants>,
}

impl Default for EntryModel {
    fn default() -> Self {
        Self {
            atmosphere: Atmosphere::default(),
            gravity: Gravity::default(),
            lift: LiftPolicy::default(),
            thermal: Some(ThermalConstants::default()),
        }
    }
}

impl EntryModel {
    pub fn with_lift(mut self, lift: LiftPolicy) -> Self {
        self.lift = lift;
        self
    }

    pub fn with_atmosphere(mut self, atmosphere: Atmosphere) -> Self {
        self.atmosphere = atmosphere;
        self
    }

    pub fn without_thermal(mut self) -> Self {
        self.thermal = None;
        self
    }

    /// Equations of motion of `vehicle` in this environment.
    pub fn eom(&self, vehicle: &Vehicle) -> Eom {
        Eom::new(*vehicle, self.atmosphere, self.gravity, self.lift)
    }

    pub fn thermal_model(&self, vehicle: &Vehicle) -> Option<ThermalModel> {
        self.thermal
            .map(|constants| ThermalModel::new(constants, self.atmosphere, vehicle.nose_radius))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::presets;

    #[test]
    fn eom_carries_the_model_environment() {
        let model = EntryModel::default()
            .with_lift(LiftPolicy::Constant)
            .with_atmosphere(Atmosphere::Standard1976);
        let vehicle = presets::lifting_body();
        let eom = model.eom(&vehicle);
        assert_eq!(eom.lift, LiftPolicy::Constant);
        assert_eq!(eom.atmosphere, Atmosphere::Standard1976);
        assert_eq!(eom.vehicle, vehicle);
    }

    #[test]
    fn thermal_model_uses_vehicle_nose() {
        let vehicle = presets::lifting_body();
        let thermal = EntryModel::default().thermal_model(&vehicle);
        assert_eq!(thermal.map(|t| t.nose_radius), Some(0.5));
        assert!(EntryModel::default().without_thermal().thermal_model(&vehicle).is_none());
    }
}
