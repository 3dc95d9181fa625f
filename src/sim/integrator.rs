use nalgebra::SVector;

use super::event::{
    departure_detected, sign_change_detected, BrentSolver, EventConfig, EventFunction, RootError,
};
use super::tableau::{A, B_ERR, C, ERROR_ORDER, STAGES};

// ---------------------------------------------------------------------------
// ODE system interface
// ---------------------------------------------------------------------------

/// First-order system y' = f(t, y) with an N-dimensional state.
pub trait OdeSystem<const N: usize> {
    fn rhs(&self, t: f64, y: &SVector<f64, N>) -> SVector<f64, N>;

    /// Whether f may be evaluated at (t, y). Stage states outside the domain
    /// reject the step instead of producing NaN.
    fn is_defined(&self, _t: f64, _y: &SVector<f64, N>) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// Settings, step control, statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct StepSettings {
    pub rtol: f64,
    pub atol: f64,
    pub max_step: f64,   // s
    pub min_step: f64,   // s
    pub first_step: f64, // s
    /// Budget of attempted steps (accepted + rejected).
    pub max_steps: u64,
}

impl Default for StepSettings {
    fn default() -> Self {
        Self {
            rtol: 1e-8,
            atol: 1e-9,
            max_step: 0.5,
            min_step: 1e-10,
            first_step: 1e-2,
            max_steps: 2_000_000,
        }
    }
}

/// Elementary (I) step-size controller: h_new = h * safety * err^(-1/(p+1)).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepController {
    pub safety: f64,
    pub min_factor: f64,
    pub max_factor: f64,
    pub exponent: f64,
}

impl Default for StepController {
    fn default() -> Self {
        Self {
            safety: 0.9,
            min_factor: 0.2,
            max_factor: 10.0,
            exponent: 1.0 / (ERROR_ORDER as f64 + 1.0),
        }
    }
}

impl StepController {
    /// Step scale factor for a scaled error norm (1.0 = exactly on tolerance).
    pub fn factor(&self, err: f64) -> f64 {
        if err == 0.0 {
            return self.max_factor;
        }
        if !err.is_finite() {
            return self.min_factor;
        }
        (self.safety * err.powf(-self.exponent)).clamp(self.min_factor, self.max_factor)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub accepted: u64,
    pub rejected: u64,
    pub evaluations: u64,
}

// ---------------------------------------------------------------------------
// Solution
// ---------------------------------------------------------------------------

/// Why integration stopped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// A terminal event fired; the last sample is the located event point.
    Event,
    HorizonReached,
    StepSizeTooSmall { t: f64, h: f64 },
    MaxStepsExceeded { t: f64 },
    /// The solution left the system's domain (`is_defined` turned false).
    Undefined { t: f64 },
    NonFiniteState { t: f64 },
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        !matches!(self, Outcome::Event | Outcome::HorizonReached)
    }
}

#[derive(Debug, Clone)]
pub struct Solution<const N: usize> {
    pub t: Vec<f64>,
    pub y: Vec<SVector<f64, N>>,
    pub t_events: Vec<f64>,
    pub y_events: Vec<SVector<f64, N>>,
    pub outcome: Outcome,
    pub stats: Stats,
}

impl<const N: usize> Solution<N> {
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    pub fn last(&self) -> Option<(f64, &SVector<f64, N>)> {
        self.t.last().copied().zip(self.y.last())
    }
}

// ---------------------------------------------------------------------------
// Dormand-Prince 5(4) integrator
// ---------------------------------------------------------------------------

/// Why a trial step failed before its error could be judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reject {
    Tolerance,
    NonFinite,
    Undefined,
}

struct Trial<const N: usize> {
    y_new: SVector<f64, N>,
    k_new: SVector<f64, N>,
    error: f64,
    reject: Option<Reject>,
}

/// Adaptive explicit Runge-Kutta integrator with FSAL and event location.
#[derive(Debug, Clone, Default)]
pub struct Dopri5 {
    pub settings: StepSettings,
    pub controller: StepController,
}

impl Dopri5 {
    pub fn new(settings: StepSettings) -> Self {
        Self {
            settings,
            controller: StepController::default(),
        }
    }

    /// One trial step of size h from (t, y) with k1 = f(t, y).
    fn step<S, const N: usize>(
        &self,
        sys: &S,
        t: f64,
        y: &SVector<f64, N>,
        k1: &SVector<f64, N>,
        h: f64,
        stats: &mut Stats,
    ) -> Trial<N>
    where
        S: OdeSystem<N> + ?Sized,
    {
        let mut k = [SVector::<f64, N>::zeros(); STAGES];
        k[0] = *k1;
        let mut y_stage = *y;

        for i in 1..STAGES {
            y_stage.copy_from(y);
            for j in 0..i {
                if A[i][j] != 0.0 {
                    y_stage += k[j] * (h * A[i][j]);
                }
            }
            let t_stage = t + C[i] * h;
            if !sys.is_defined(t_stage, &y_stage) {
                return Trial::failed(y_stage, Reject::Undefined);
            }
            k[i] = sys.rhs(t_stage, &y_stage);
            stats.evaluations += 1;
        }

        // Last stage input is the 5th-order solution (A[6] == B).
        let y_new = y_stage;
        let mut err = SVector::<f64, N>::zeros();
        for i in 0..STAGES {
            if B_ERR[i] != 0.0 {
                err += k[i] * (h * B_ERR[i]);
            }
        }

        let finite = y_new.iter().chain(err.iter()).chain(k[STAGES - 1].iter()).all(|x| x.is_finite());
        if !finite {
            return Trial::failed(y_new, Reject::NonFinite);
        }

        let error = (0..N)
            .map(|i| {
                let scale = self.settings.atol + self.settings.rtol * y[i].abs().max(y_new[i].abs());
                (err[i] / scale).abs()
            })
            .fold(0.0, f64::max);

        Trial {
            y_new,
            k_new: k[STAGES - 1],
            error,
            reject: if error <= 1.0 { None } else { Some(Reject::Tolerance) },
        }
    }

    /// Integrate from (t0, y0) to t_end, monitoring an optional event.
    ///
    /// Every accepted step is recorded. A terminal event stops integration at
    /// the located crossing, which becomes the last sample. Failures never
    /// panic: the samples up to the last accepted step are returned together
    /// with the failing `Outcome`.
    pub fn integrate<S, const N: usize>(
        &self,
        sys: &S,
        t0: f64,
        y0: SVector<f64, N>,
        t_end: f64,
        event: Option<(&dyn EventFunction<N>, &EventConfig)>,
    ) -> Solution<N>
    where
        S: OdeSystem<N> + ?Sized,
    {
        let s = &self.settings;
        let mut stats = Stats::default();
        let mut sol = Solution {
            t: vec![t0],
            y: vec![y0],
            t_events: Vec::new(),
            y_events: Vec::new(),
            outcome: Outcome::HorizonReached,
            stats,
        };

        if !sys.is_defined(t0, &y0) {
            sol.outcome = Outcome::Undefined { t: t0 };
            return sol;
        }
        let mut k1 = sys.rhs(t0, &y0);
        stats.evaluations += 1;
        if !k1.iter().all(|x| x.is_finite()) {
            sol.outcome = Outcome::NonFiniteState { t: t0 };
            sol.stats = stats;
            return sol;
        }

        let mut t = t0;
        let mut y = y0;
        let mut h = s.first_step.min(s.max_step);
        let mut g_old = event.map(|(f, _)| f.eval(t, &y));
        let mut last_rejected = false;

        let outcome = loop {
            let remaining = t_end - t;
            if remaining <= 0.0 {
                break Outcome::HorizonReached;
            }
            if stats.accepted + stats.rejected >= s.max_steps {
                break Outcome::MaxStepsExceeded { t };
            }

            h = h.min(s.max_step);
            // Land on the horizon exactly instead of leaving a sliver.
            let hits_end = h >= remaining * (1.0 - 1e-12);
            if hits_end {
                h = remaining;
            }

            let trial = self.step(sys, t, &y, &k1, h, &mut stats);

            if let Some(reason) = trial.reject {
                stats.rejected += 1;
                last_rejected = true;
                h *= self.controller.factor(trial.error).min(1.0);
                if h < s.min_step {
                    break match reason {
                        Reject::Tolerance => Outcome::StepSizeTooSmall { t, h },
                        Reject::NonFinite => Outcome::NonFiniteState { t },
                        Reject::Undefined => Outcome::Undefined { t },
                    };
                }
                continue;
            }

            stats.accepted += 1;
            let t_new = if hits_end { t_end } else { t + h };
            let y_new = trial.y_new;
            let k_new = trial.k_new;

            if let (Some((func, cfg)), Some(g_prev)) = (event, g_old) {
                let g_new = func.eval(t_new, &y_new);
                if stats.accepted == 1 && g_prev == 0.0 && departure_detected(g_new, cfg.direction) {
                    sol.t_events.push(t);
                    sol.y_events.push(y);
                    if cfg.terminal {
                        break Outcome::Event;
                    }
                } else if sign_change_detected(g_prev, g_new, cfg.direction) {
                    let (t_ev, y_ev) =
                        locate_event(func, cfg, t, &y, &k1, t_new, &y_new, &k_new, g_prev, g_new);
                    sol.t_events.push(t_ev);
                    sol.y_events.push(y_ev);
                    if cfg.terminal {
                        if t_ev > t {
                            sol.t.push(t_ev);
                            sol.y.push(y_ev);
                        }
                        break Outcome::Event;
                    }
                }
                g_old = Some(g_new);
            }

            sol.t.push(t_new);
            sol.y.push(y_new);
            t = t_new;
            y = y_new;
            k1 = k_new;

            let mut factor = self.controller.factor(trial.error);
            if last_rejected {
                factor = factor.min(1.0);
            }
            last_rejected = false;
            h *= factor;
        };

        sol.outcome = outcome;
        sol.stats = stats;
        sol
    }
}

impl<const N: usize> Trial<N> {
    fn failed(y_new: SVector<f64, N>, reason: Reject) -> Self {
        Self {
            y_new,
            k_new: SVector::zeros(),
            error: f64::INFINITY,
            reject: Some(reason),
        }
    }
}

// ---------------------------------------------------------------------------
// Dense output and event location
// ---------------------------------------------------------------------------

/// Cubic Hermite interpolant over one step, theta in [0, 1].
pub fn hermite<const N: usize>(
    theta: f64,
    h: f64,
    y0: &SVector<f64, N>,
    f0: &SVector<f64, N>,
    y1: &SVector<f64, N>,
    f1: &SVector<f64, N>,
) -> SVector<f64, N> {
    let t2 = theta * theta;
    let t3 = t2 * theta;
    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + theta;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;
    y0 * h00 + f0 * (h * h10) + y1 * h01 + f1 * (h * h11)
}

#[allow(clippy::too_many_arguments)]
fn locate_event<const N: usize>(
    func: &dyn EventFunction<N>,
    cfg: &EventConfig,
    t0: f64,
    y0: &SVector<f64, N>,
    f0: &SVector<f64, N>,
    t1: f64,
    y1: &SVector<f64, N>,
    f1: &SVector<f64, N>,
    g0: f64,
    g1: f64,
) -> (f64, SVector<f64, N>) {
    let h = t1 - t0;
    if g1 == 0.0 {
        return (t1, *y1);
    }
    let interp = |tau: f64| hermite((tau - t0) / h, h, y0, f0, y1, f1);
    let solver = BrentSolver::new(cfg.root_tol, cfg.max_iter);

    let t_ev = match solver.find_root(|tau| func.eval(tau, &interp(tau)), t0, t1, g0, g1) {
        Ok((root, _, _)) => root,
        Err(RootError::MaxIterations { best, .. }) => best,
        Err(RootError::NotBracketed { .. }) => t1,
    };
    (t_ev, interp(t_ev))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
