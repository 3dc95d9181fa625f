use nalgebra::Matrix3xX;

use super::event::{AltitudeCrossing, EventFunction};
use super::integrator::{Dopri5, OdeSystem, Outcome, Stats};
use crate::dynamics::state::{SimConfig, State};
use crate::error::SimError;
use crate::model::EntryModel;
use crate::vehicle::Vehicle;

// ---------------------------------------------------------------------------
// Termination status
// ---------------------------------------------------------------------------

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Termination {
    /// Altitude crossed zero from above.
    GroundImpact { time: f64, velocity: f64 },
    /// Horizon exhausted before impact (e.g. a skip that never came back).
    HorizonReached { t_max: f64 },
    /// Velocity reached zero; the flight-path angle rate is singular there.
    Singularity { time: f64 },
    /// The integrator could not meet its tolerances within its budget.
    NonConvergence { time: f64, reason: String },
}

impl Termination {
    /// 1 = ground impact, 0 = horizon reached, -1 = failure
    pub fn status_code(&self) -> i32 {
        match self {
            Termination::GroundImpact { .. } => 1,
            Termination::HorizonReached { .. } => 0,
            Termination::Singularity { .. } | Termination::NonConvergence { .. } => -1,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code() >= 0
    }

    pub fn message(&self) -> String {
        match self {
            Termination::GroundImpact { time, velocity } => format!(
                "ground impact at t = {:.3} s, v = {:.2} m/s",
                time, velocity
            ),
            Termination::HorizonReached { t_max } => {
                format!("no ground impact within {:.1} s", t_max)
            }
            Termination::Singularity { time } => {
                format!("velocity reached zero at t = {:.3} s", time)
            }
            Termination::NonConvergence { time, reason } => {
                format!("solver stopped at t = {:.3} s: {}", time, reason)
            }
        }
    }

    fn from_outcome(outcome: Outcome, last: Option<&State>, t_max: f64) -> Self {
        match outcome {
            Outcome::Event => Termination::GroundImpact {
                time: last.map_or(0.0, |s| s.time),
                velocity: last.map_or(0.0, |s| s.velocity()),
            },
            Outcome::HorizonReached => Termination::HorizonReached { t_max },
            Outcome::Undefined { t } => Termination::Singularity { time: t },
            Outcome::StepSizeTooSmall { t, h } => Termination::NonConvergence {
                time: t,
                reason: format!("step size {:.3e} s below minimum", h),
            },
            Outcome::MaxStepsExceeded { t } => Termination::NonConvergence {
                time: t,
                reason: "step budget exhausted".into(),
            },
            Outcome::NonFiniteState { t } => Termination::NonConvergence {
                time: t,
                reason: "state became non-finite".into(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Simulation result
// ---------------------------------------------------------------------------

/// Outcome of one run. The trajectory always starts with the initial state.
#[derive(Debug, Clone)]
pub struct SimResult {
    pub trajectory: Vec<State>,
    pub event_times: Vec<f64>,
    pub termination: Termination,
    pub stats: Stats,
}

impl SimResult {
    pub fn times(&self) -> Vec<f64> {
        self.trajectory.iter().map(|s| s.time).collect()
    }

    /// 3 x N state history, rows (v, gamma, h).
    pub fn state_matrix(&self) -> Matrix3xX<f64> {
        let columns: Vec<_> = self.trajectory.iter().map(|s| s.y).collect();
        Matrix3xX::from_columns(&columns)
    }

    pub fn last(&self) -> Option<&State> {
        self.trajectory.last()
    }

    pub fn status_code(&self) -> i32 {
        self.termination.status_code()
    }

    pub fn message(&self) -> String {
        self.termination.message()
    }

    pub fn is_success(&self) -> bool {
        self.termination.is_success()
    }

    pub fn landed(&self) -> bool {
        matches!(self.termination, Termination::GroundImpact { .. })
    }

    /// True when the trajectory stops at the last valid step of a failed run.
    pub fn is_partial(&self) -> bool {
        !self.termination.is_success()
    }

    /// Turn a failed run into an error; successful runs pass through.
    pub fn into_checked(self) -> Result<Self, SimError> {
        if !self.is_success() {
            return Err(SimError::Failed(self.termination));
        }
        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// Drivers
// ---------------------------------------------------------------------------

/// Integrate any 3-state system from `initial` until ground impact or the
/// horizon `config.t_max` (relative to the initial time).
pub fn simulate_with<S>(system: &S, initial: State, config: &SimConfig) -> Result<SimResult, SimError>
where
    S: OdeSystem<3> + ?Sized,
{
    config.validate()?;

    let ground = AltitudeCrossing::ground();
    let event_cfg = AltitudeCrossing::ground_config();
    let event: &dyn EventFunction<3> = &ground;

    let solver = Dopri5::new(config.step_settings());
    let t_end = initial.time + config.t_max;
    let sol = solver.integrate(system, initial.time, initial.y, t_end, Some((event, &event_cfg)));

    let trajectory: Vec<State> = sol
        .t
        .iter()
        .zip(sol.y.iter())
        .map(|(&time, &y)| State { time, y })
        .collect();
    let termination = Termination::from_outcome(sol.outcome, trajectory.last(), config.t_max);

    Ok(SimResult {
        trajectory,
        event_times: sol.t_events,
        termination,
        stats: sol.stats,
    })
}

/// Fly `vehicle` from its configured entry state through `model`.
pub fn simulate(vehicle: &Vehicle, model: &EntryModel, config: &SimConfig) -> Result<SimResult, SimError> {
    vehicle.validate()?;
    let eom = model.eom(vehicle);
    simulate_with(&eom, vehicle.initial_state(), config)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::LiftPolicy;
    use crate::vehicle::{presets, VehicleBuilder};
    use nalgebra::Vector3;

    #[test]
    fn capsule_reaches_the_ground() {
        let capsule = presets::ballistic_capsule();
        let config = SimConfig::default();
        let res = simulate(&capsule, &EntryModel::default(), &config).unwrap();

        assert!(res.landed(), "{}", res.message());
        assert_eq!(res.status_code(), 1);
        assert_eq!(res.event_times.len(), 1);

        let last = res.last().unwrap();
        assert!(last.altitude().abs() < 1e-3, "final altitude {}", last.altitude());
        assert!(last.velocity() < capsule.initial_velocity);
        assert!(last.time < config.t_max);
        assert_eq!(last.time, res.event_times[0]);
    }

    #[test]
    fn trajectory_is_time_ordered_and_above_ground() {
        let res = simulate(&presets::ballistic_capsule(), &EntryModel::default(), &SimConfig::default()).unwrap();
        assert!(res.trajectory.windows(2).all(|w| w[1].time > w[0].time));
        let n = res.trajectory.len();
        assert!(res.trajectory[..n - 1].iter().all(|s| s.altitude() > 0.0));
    }

    #[test]
    fn state_matrix_rows_are_v_gamma_h() {
        let res = simulate(&presets::ballistic_capsule(), &EntryModel::default(), &SimConfig::default()).unwrap();
        let m = res.state_matrix();
        assert_eq!(m.nrows(), 3);
        assert_eq!(m.ncols(), res.trajectory.len());
        assert_eq!(m[(0, 0)], 7_000.0);
        assert!((m[(1, 0)] - 5.0_f64.to_radians()).abs() < 1e-15);
        assert_eq!(m[(2, 0)], 100_000.0);
        assert_eq!(res.times().len(), m.ncols());
    }

    #[test]
    fn short_horizon_is_not_a_failure() {
        let config = SimConfig { t_max: 50.0, ..SimConfig::default() };
        let res = simulate(&presets::ballistic_capsule(), &EntryModel::default(), &config).unwrap();
        assert_eq!(res.termination, Termination::HorizonReached { t_max: 50.0 });
        assert_eq!(res.status_code(), 0);
        assert!(!res.is_partial());
        assert!(res.event_times.is_empty());
        assert_eq!(res.last().map(|s| s.time), Some(50.0));
        assert!(res.into_checked().is_ok());
    }

    /// Constant deceleration with no other dynamics: v reaches zero at t = 10.
    struct Braking;
    impl OdeSystem<3> for Braking {
        fn rhs(&self, _t: f64, _y: &Vector3<f64>) -> Vector3<f64> {
            Vector3::new(-100.0, 0.0, 0.0)
        }
        fn is_defined(&self, _t: f64, y: &Vector3<f64>) -> bool {
            y[0] > 0.0
        }
    }

    #[test]
    fn zero_velocity_is_a_singularity() {
        let res = simulate_with(&Braking, State::new(0.0, 1_000.0, 0.0, 5_000.0), &SimConfig::default()).unwrap();
        match &res.termination {
            Termination::Singularity { time } => assert!((time - 10.0).abs() < 1e-6),
            other => panic!("expected singularity, got {:?}", other),
        }
        assert!(res.is_partial());
        assert!(res.trajectory.iter().all(|s| s.velocity() > 0.0));
        assert!(matches!(res.into_checked(), Err(SimError::Failed(_))));
    }

    #[test]
    fn failure_at_the_initial_state_keeps_that_sample() {
        let res = simulate_with(&Braking, State::new(0.0, 0.0, 0.0, 5_000.0), &SimConfig::default()).unwrap();
        assert_eq!(res.termination, Termination::Singularity { time: 0.0 });
        assert_eq!(res.trajectory, vec![State::new(0.0, 0.0, 0.0, 5_000.0)]);
    }

    #[test]
    fn step_budget_is_non_convergence() {
        let config = SimConfig { max_steps: 20, ..SimConfig::default() };
        let res = simulate(&presets::ballistic_capsule(), &EntryModel::default(), &config).unwrap();
        assert!(matches!(res.termination, Termination::NonConvergence { .. }));
        assert_eq!(res.status_code(), -1);
        assert!(res.message().contains("step budget"));
    }

    #[test]
    fn invalid_inputs_fail_before_integration() {
        let mut vehicle = presets::ballistic_capsule();
        vehicle.ballistic_coefficient = -1.0;
        assert!(matches!(
            simulate(&vehicle, &EntryModel::default(), &SimConfig::default()),
            Err(SimError::Config(_))
        ));

        let config = SimConfig { rtol: -1.0, ..SimConfig::default() };
        assert!(matches!(
            simulate(&presets::ballistic_capsule(), &EntryModel::default(), &config),
            Err(SimError::Settings(_))
        ));
    }

    #[test]
    fn lifting_body_lands_under_both_lift_policies() {
        let body = presets::lifting_body();
        for lift in [LiftPolicy::Constant, LiftPolicy::SkipSuppression] {
            let model = EntryModel::default().with_lift(lift);
            let res = simulate(&body, &model, &SimConfig::default()).unwrap();
            assert!(res.landed(), "{:?}: {}", lift, res.message());
        }
    }

    #[test]
    fn steeper_descent_lands_sooner() {
        let model = EntryModel::default();
        let shallow = VehicleBuilder::new().initial_angle(-5.0).build();
        let steep = VehicleBuilder::new().initial_angle(-10.0).build();
        let t_shallow = simulate(&shallow, &model, &SimConfig::default()).unwrap().last().unwrap().time;
        let t_steep = simulate(&steep, &model, &SimConfig::default()).unwrap().last().unwrap().time;
        assert!(t_steep < t_shallow);
    }

    #[test]
    fn negative_entry_angle_descends_from_the_start() {
        let capsule = presets::ballistic_capsule();
        let res = simulate(&capsule, &EntryModel::default(), &SimConfig::default()).unwrap();
        assert!(res.trajectory[1].altitude() < capsule.initial_altitude);
        assert!(res.trajectory.iter().all(|s| s.altitude() <= capsule.initial_altitude));
        assert!(res.trajectory.iter().all(|s| s.flight_path_angle_deg() < 0.0));
    }

    #[test]
    fn skip_suppression_keeps_lift_while_descending() {
        let body = presets::lifting_body();
        let mut ballistic = body;
        ballistic.l_over_d = 0.0;
        let config = SimConfig::default();
        let land = |vehicle: &Vehicle, lift: LiftPolicy| {
            let res = simulate(vehicle, &EntryModel::default().with_lift(lift), &config).unwrap();
            assert!(res.landed(), "{:?}: {}", lift, res.message());
            res.last().unwrap().time
        };

        let t_ballistic = land(&ballistic, LiftPolicy::SkipSuppression);
        let t_suppressed = land(&body, LiftPolicy::SkipSuppression);
        let t_constant = land(&body, LiftPolicy::Constant);
        // Lift stretches the glide; fading it out near level flight shortens it.
        assert!(t_suppressed > t_ballistic + 100.0, "{} vs {}", t_suppressed, t_ballistic);
        assert!(t_constant > t_suppressed + 100.0, "{} vs {}", t_constant, t_suppressed);
    }

    #[test]
    fn descending_start_on_the_ground_is_an_impact() {
        let vehicle = VehicleBuilder::new().initial_altitude(0.0).initial_angle(-10.0).build();
        let res = simulate(&vehicle, &EntryModel::default(), &SimConfig::default()).unwrap();
        assert_eq!(
            res.termination,
            Termination::GroundImpact { time: 0.0, velocity: vehicle.initial_velocity }
        );
        assert_eq!(res.event_times, vec![0.0]);
        assert_eq!(res.trajectory.len(), 1);
    }
}
