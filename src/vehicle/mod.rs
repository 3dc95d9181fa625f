pub mod descriptor;
pub mod presets;

pub use descriptor::{Vehicle, VehicleBuilder};
