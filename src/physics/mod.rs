pub mod atmosphere;
pub mod gravity;
pub mod thermal;

pub use atmosphere::Atmosphere;
pub use gravity::Gravity;
pub use thermal::{ThermalConstants, ThermalModel};
