use nalgebra::SVector;

use crate::dynamics::state::H;

// ---------------------------------------------------------------------------
// Event functions
// ---------------------------------------------------------------------------

/// Scalar function g(t, y) monitored during integration; an event is a zero
/// crossing of g.
pub trait EventFunction<const N: usize> {
    fn eval(&self, t: f64, y: &SVector<f64, N>) -> f64;
}

/// Which zero crossings count as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventDirection {
    /// g goes from negative to positive
    Rising,
    /// g goes from positive to negative
    Falling,
    #[default]
    Any,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventConfig {
    pub direction: EventDirection,
    /// Stop integration at the event (otherwise record it and continue).
    pub terminal: bool,
    /// Bracket width at which root finding stops, s
    pub root_tol: f64,
    pub max_iter: usize,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            direction: EventDirection::Any,
            terminal: true,
            root_tol: 1e-12,
            max_iter: 60,
        }
    }
}

/// Crossing of a fixed altitude by a (v, gamma, h) state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AltitudeCrossing {
    pub altitude: f64, // m
}

impl AltitudeCrossing {
    pub fn ground() -> Self {
        Self { altitude: 0.0 }
    }

    /// Ground impact: terminal, only on a downward crossing.
    pub fn ground_config() -> EventConfig {
        EventConfig {
            direction: EventDirection::Falling,
            terminal: true,
            ..EventConfig::default()
        }
    }
}

impl EventFunction<3> for AltitudeCrossing {
    fn eval(&self, _t: f64, y: &SVector<f64, 3>) -> f64 {
        y[H] - self.altitude
    }
}

/// Check if g crossed zero between two accepted steps in the wanted direction.
///
/// Landing exactly on zero counts; leaving from exactly zero does not, so an
/// event is never reported twice.
pub fn sign_change_detected(g_old: f64, g_new: f64, direction: EventDirection) -> bool {
    if g_old * g_new > 0.0 || g_old == 0.0 {
        return false;
    }
    match direction {
        EventDirection::Rising => g_new >= 0.0 && g_old < 0.0,
        EventDirection::Falling => g_new <= 0.0 && g_old > 0.0,
        EventDirection::Any => true,
    }
}

/// Check if g moved off an initial zero in the wanted direction.
///
/// Only meaningful for the first step: a run that starts exactly on the
/// surface of the event and heads the configured way has the event at t0.
pub fn departure_detected(g_new: f64, direction: EventDirection) -> bool {
    match direction {
        EventDirection::Rising => g_new > 0.0,
        EventDirection::Falling => g_new < 0.0,
        EventDirection::Any => g_new != 0.0,
    }
}

// ---------------------------------------------------------------------------
// Brent root finding
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum RootError {
    NotBracketed { a: f64, b: f64, fa: f64, fb: f64 },
    MaxIterations { best: f64, f_best: f64 },
}

/// Brent's method: bisection safeguarded inverse quadratic / secant steps.
#[derive(Debug, Clone, Copy)]
pub struct BrentSolver {
    pub tol: f64,
    pub max_iter: usize,
}

impl BrentSolver {
    pub fn new(tol: f64, max_iter: usize) -> Self {
        Self { tol, max_iter }
    }

    /// Root of `f` in [a, b] given f(a) = fa and f(b) = fb of opposite sign.
    ///
    /// Returns the root, f at the root and the iteration count.
    pub fn find_root<F>(
        &self,
        mut f: F,
        mut a: f64,
        mut b: f64,
        mut fa: f64,
        mut fb: f64,
    ) -> Result<(f64, f64, usize), RootError>
    where
        F: FnMut(f64) -> f64,
    {
        if fa * fb > 0.0 {
            return Err(RootError::NotBracketed { a, b, fa, fb });
        }
        if fa == 0.0 {
            return Ok((a, fa, 0));
        }

        let mut c = a;
        let mut fc = fa;
        let mut bisected = true;
        let mut d = b - a;

        for iter in 0..self.max_iter {
            // b is always the best estimate
            if fa.abs() < fb.abs() {
                std::mem::swap(&mut a, &mut b);
                std::mem::swap(&mut fa, &mut fb);
            }
            if fb == 0.0 || (b - a).abs() <= self.tol {
                return Ok((b, fb, iter + 1));
            }

            let mut s = if fa != fc && fb != fc {
                a * fb * fc / ((fa - fb) * (fa - fc))
                    + b * fa * fc / ((fb - fa) * (fb - fc))
                    + c * fa * fb / ((fc - fa) * (fc - fb))
            } else {
                b - fb * (b - a) / (fb - fa)
            };

            let reject = (s - (3.0 * a + b) / 4.0) * (s - b) > 0.0
                || (bisected && (s - b).abs() >= (b - c).abs() / 2.0)
                || (!bisected && (s - b).abs() >= (c - d).abs() / 2.0)
                || (bisected && (b - c).abs() < self.tol)
                || (!bisected && (c - d).abs() < self.tol)
                || !s.is_finite();
            if reject {
                s = 0.5 * (a + b);
            }
            bisected = reject;

            let fs = f(s);
            d = c;
            c = b;
            fc = fb;

            if fa * fs < 0.0 {
                b = s;
                fb = fs;
            } else {
                a = s;
                fa = fs;
            }
        }

        let (best, f_best) = if fa.abs() < fb.abs() { (a, fa) } else { (b, fb) };
        Err(RootError::MaxIterations { best, f_best })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn falling_detects_only_downward_crossings() {
        assert!(sign_change_detected(10.0, -1.0, EventDirection::Falling));
        assert!(sign_change_detected(10.0, 0.0, EventDirection::Falling));
        assert!(!sign_change_detected(-1.0, 10.0, EventDirection::Falling));
        assert!(!sign_change_detected(5.0, 3.0, EventDirection::Falling));
    }

    #[test]
    fn rising_and_any() {
        assert!(sign_change_detected(-1.0, 2.0, EventDirection::Rising));
        assert!(!sign_change_detected(1.0, -2.0, EventDirection::Rising));
        assert!(sign_change_detected(1.0, -2.0, EventDirection::Any));
        assert!(sign_change_detected(-1.0, 2.0, EventDirection::Any));
    }

    #[test]
    fn leaving_zero_is_not_an_event() {
        assert!(!sign_change_detected(0.0, -1.0, EventDirection::Falling));
        assert!(!sign_change_detected(0.0, 1.0, EventDirection::Any));
    }

    #[test]
    fn departure_follows_direction() {
        assert!(departure_detected(-1.0, EventDirection::Falling));
        assert!(!departure_detected(1.0, EventDirection::Falling));
        assert!(departure_detected(1.0, EventDirection::Rising));
        assert!(departure_detected(-1.0, EventDirection::Any));
        assert!(!departure_detected(0.0, EventDirection::Any));
    }

    #[test]
    fn ground_event_reads_altitude() {
        let g = AltitudeCrossing::ground();
        assert_eq!(g.eval(0.0, &Vector3::new(7_000.0, 0.1, 1_234.0)), 1_234.0);
        let cfg = AltitudeCrossing::ground_config();
        assert_eq!(cfg.direction, EventDirection::Falling);
        assert!(cfg.terminal);
    }

    #[test]
    fn brent_finds_sqrt_two() {
        let solver = BrentSolver::new(1e-14, 100);
        let f = |x: f64| x * x - 2.0;
        let (root, _, iters) = solver.find_root(f, 0.0, 2.0, -2.0, 2.0).unwrap();
        assert!((root - 2.0_f64.sqrt()).abs() < 1e-12);
        assert!(iters < 50);
    }

    #[test]
    fn brent_handles_reversed_bracket() {
        let solver = BrentSolver::new(1e-13, 100);
        let (root, _, _) = solver
            .find_root(|x: f64| x.cos() - x, 1.0, 0.0, 1.0_f64.cos() - 1.0, 1.0)
            .unwrap();
        assert!((root.cos() - root).abs() < 1e-12);
    }

    #[test]
    fn brent_rejects_unbracketed_interval() {
        let solver = BrentSolver::new(1e-12, 50);
        let res = solver.find_root(|x: f64| x * x + 1.0, -1.0, 1.0, 2.0, 2.0);
        assert!(matches!(res, Err(RootError::NotBracketed { .. })));
    }
}
