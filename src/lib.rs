pub mod analysis;
pub mod dynamics;
pub mod error;
pub mod io;
pub mod model;
pub mod physics;
pub mod sim;
pub mod vehicle;

pub use analysis::sweep::{sweep, sweep_parallel, SweepParameter, SweepResult};
pub use analysis::{run_entry, EntryRun, EntrySummary};
pub use dynamics::{LiftPolicy, SimConfig, State};
pub use error::{ConfigError, SimError};
pub use model::EntryModel;
pub use sim::{simulate, SimResult, Termination};
pub use vehicle::{presets, Vehicle, VehicleBuilder};
