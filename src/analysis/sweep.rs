use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::run_entry;
use crate::dynamics::state::SimConfig;
use crate::error::SimError;
use crate::model::EntryModel;
use crate::vehicle::Vehicle;

// ---------------------------------------------------------------------------
// Sweep parameter
// ---------------------------------------------------------------------------

/// Vehicle field a sweep varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepParameter {
    /// deg
    InitialAngle,
    /// kg/m^2
    BallisticCoefficient,
}

impl SweepParameter {
    pub fn name(&self) -> &'static str {
        match self {
            SweepParameter::InitialAngle => "initial_angle",
            SweepParameter::BallisticCoefficient => "ballistic_coefficient",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            SweepParameter::InitialAngle => "deg",
            SweepParameter::BallisticCoefficient => "kg/m^2",
        }
    }
}

impl fmt::Display for SweepParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SweepParameter {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "initial_angle" => Ok(SweepParameter::InitialAngle),
            "ballistic_coefficient" => Ok(SweepParameter::BallisticCoefficient),
            other => Err(SimError::UnknownParameter(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Sweep
// ---------------------------------------------------------------------------

/// Peak heat flux, heat load and peak deceleration per swept value.
///
/// All vectors are parallel to `values`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepResult {
    pub parameter: SweepParameter,
    pub values: Vec<f64>,
    pub peak_heat_flux: Vec<f64>,    // W/m^2
    pub heat_load: Vec<f64>,         // J/m^2
    pub peak_deceleration: Vec<f64>, // m/s^2
}

impl SweepResult {
    fn collect(parameter: SweepParameter, values: &[f64], points: Vec<SweepPoint>) -> Self {
        let mut result = SweepResult {
            parameter,
            values: values.to_vec(),
            peak_heat_flux: Vec::with_capacity(points.len()),
            heat_load: Vec::with_capacity(points.len()),
            peak_deceleration: Vec::with_capacity(points.len()),
        };
        for p in points {
            result.peak_heat_flux.push(p.peak_heat_flux);
            result.heat_load.push(p.heat_load);
            result.peak_deceleration.push(p.peak_deceleration);
        }
        result
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

struct SweepPoint {
    peak_heat_flux: f64,
    heat_load: f64,
    peak_deceleration: f64,
}

/// Sweeps always evaluate heating, even when the base model has it off.
fn with_thermal(model: &EntryModel) -> EntryModel {
    EntryModel {
        thermal: Some(model.thermal.unwrap_or_default()),
        ..*model
    }
}

fn sweep_point(
    base: &Vehicle,
    parameter: SweepParameter,
    value: f64,
    model: &EntryModel,
    config: &SimConfig,
) -> Result<SweepPoint, SimError> {
    let vehicle = base.with_parameter(parameter, value);
    let run = run_entry(&vehicle, model, config)?;
    let s = &run.summary;
    Ok(SweepPoint {
        peak_heat_flux: s.peak_heat_flux.unwrap_or(0.0),
        heat_load: s.heat_load.unwrap_or(0.0),
        peak_deceleration: s.peak_deceleration,
    })
}

/// Re-run the full pipeline once per value, in order.
pub fn sweep(
    base: &Vehicle,
    parameter: SweepParameter,
    values: &[f64],
    model: &EntryModel,
    config: &SimConfig,
) -> Result<SweepResult, SimError> {
    let model = with_thermal(model);
    let points = values
        .iter()
        .map(|&v| sweep_point(base, parameter, v, &model, config))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SweepResult::collect(parameter, values, points))
}

/// Same as `sweep`, with the independent runs spread over the rayon pool.
pub fn sweep_parallel(
    base: &Vehicle,
    parameter: SweepParameter,
    values: &[f64],
    model: &EntryModel,
    config: &SimConfig,
) -> Result<SweepResult, SimError> {
    let model = with_thermal(model);
    let points = values
        .par_iter()
        .map(|&v| sweep_point(base, parameter, v, &model, config))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SweepResult::collect(parameter, values, points))
}

/// `n` evenly spaced values from `start` to `stop` inclusive.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::presets;

    #[test]
    fn parses_known_parameters_only() {
        assert_eq!("initial_angle".parse::<SweepParameter>().unwrap(), SweepParameter::InitialAngle);
        assert_eq!(
            "ballistic_coefficient".parse::<SweepParameter>().unwrap(),
            SweepParameter::BallisticCoefficient
        );
        match "nose_radius".parse::<SweepParameter>() {
            Err(SimError::UnknownParameter(p)) => assert_eq!(p, "nose_radius"),
            other => panic!("expected unknown parameter, got {:?}", other),
        }
        assert_eq!(SweepParameter::InitialAngle.to_string(), "initial_angle");
    }

    #[test]
    fn linspace_hits_both_ends() {
        let v = linspace(-2.0, -8.0, 4);
        assert_eq!(v, vec![-2.0, -4.0, -6.0, -8.0]);
        assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn single_value_sweep_matches_single_run() {
        let base = presets::ballistic_capsule();
        let model = EntryModel::default();
        let config = SimConfig::default();

        let res = sweep(
            &base,
            SweepParameter::BallisticCoefficient,
            &[base.ballistic_coefficient],
            &model,
            &config,
        )
        .unwrap();
        let run = run_entry(&base, &model, &config).unwrap();

        assert_eq!(res.len(), 1);
        assert_eq!(res.peak_heat_flux[0], run.summary.peak_heat_flux.unwrap());
        assert_eq!(res.heat_load[0], run.summary.heat_load.unwrap());
        assert_eq!(res.peak_deceleration[0], run.summary.peak_deceleration);
    }

    #[test]
    fn parallel_sweep_equals_sequential() {
        let base = presets::ballistic_capsule();
        let values = [-3.0, -5.0, -7.0];
        let model = EntryModel::default();
        let config = SimConfig::default();

        let seq = sweep(&base, SweepParameter::InitialAngle, &values, &model, &config).unwrap();
        let par = sweep_parallel(&base, SweepParameter::InitialAngle, &values, &model, &config).unwrap();
        assert_eq!(seq, par);
        assert_eq!(seq.values, values.to_vec());
    }

    #[test]
    fn sweep_enables_heating() {
        let base = presets::ballistic_capsule();
        let model = EntryModel::default().without_thermal();
        let res = sweep(&base, SweepParameter::InitialAngle, &[-5.0], &model, &SimConfig::default()).unwrap();
        assert!(res.peak_heat_flux[0] > 0.0);
        assert!(res.heat_load[0] > 0.0);
    }

    #[test]
    fn failed_run_fails_the_sweep() {
        let base = presets::ballistic_capsule();
        let config = SimConfig { max_steps: 5, ..SimConfig::default() };
        let res = sweep(&base, SweepParameter::InitialAngle, &[-5.0], &EntryModel::default(), &config);
        assert!(matches!(res, Err(SimError::Failed(_))));
    }
}
