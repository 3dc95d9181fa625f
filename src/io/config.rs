use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::ConfigError;
use crate::vehicle::Vehicle;

// ---------------------------------------------------------------------------
// Vehicle records (flat JSON objects)
// ---------------------------------------------------------------------------

/// Parse and validate one vehicle record.
pub fn parse_vehicle(text: &str) -> Result<Vehicle, ConfigError> {
    let vehicle: Vehicle = serde_json::from_str(text)?;
    vehicle.validate()?;
    Ok(vehicle)
}

pub fn load_vehicle<P: AsRef<Path>>(path: P) -> Result<Vehicle, ConfigError> {
    let text = fs::read_to_string(path)?;
    parse_vehicle(&text)
}

pub fn write_vehicle<W: Write>(writer: &mut W, vehicle: &Vehicle) -> Result<(), ConfigError> {
    serde_json::to_writer_pretty(&mut *writer, vehicle)?;
    writeln!(writer)?;
    Ok(())
}

pub fn save_vehicle<P: AsRef<Path>>(path: P, vehicle: &Vehicle) -> Result<(), ConfigError> {
    let mut file = fs::File::create(path)?;
    write_vehicle(&mut file, vehicle)
}
