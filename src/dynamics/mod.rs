pub mod eom;
pub mod state;

pub use eom::{control_gain, Eom, LiftPolicy};
pub use state::{SimConfig, State};
