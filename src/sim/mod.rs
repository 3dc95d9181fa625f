pub mod event;
pub mod integrator;
pub mod runner;
pub mod tableau;

pub use integrator::{Dopri5, OdeSystem, Outcome, Solution, StepSettings};
pub use runner::{simulate, simulate_with, SimResult, Termination};
