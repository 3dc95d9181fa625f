use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::analysis::sweep::SweepResult;
use crate::analysis::EntryRun;

/// Write one entry to CSV, one row per trajectory sample.
///
/// Columns: time, velocity, gamma_deg, altitude, downrange, acceleration,
///          heat_flux, wall_temperature
///
/// The thermal columns are left empty when the run had no thermal model.
pub fn write_trajectory<W: Write>(writer: &mut W, run: &EntryRun) -> io::Result<()> {
    writeln!(
        writer,
        "time_s,velocity_m_s,gamma_deg,altitude_m,downrange_m,acceleration_m_s2,\
         heat_flux_w_m2,wall_temperature_k"
    )?;

    for (i, s) in run.result.trajectory.iter().enumerate() {
        write!(
            writer,
            "{:.6},{:.6},{:.6},{:.4},{:.4},{:.6},",
            s.time,
            s.velocity(),
            s.flight_path_angle_deg(),
            s.altitude(),
            run.track.downrange[i],
            run.acceleration[i],
        )?;
        match &run.thermal {
            Some(th) => writeln!(writer, "{:.4},{:.4}", th.heat_flux[i], th.wall_temperature[i])?,
            None => writeln!(writer, ",")?,
        }
    }

    Ok(())
}

pub fn write_trajectory_file<P: AsRef<Path>>(path: P, run: &EntryRun) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_trajectory(&mut file, run)?;
    file.flush()
}

/// Write a parameter sweep, one row per swept value.
pub fn write_sweep<W: Write>(writer: &mut W, sweep: &SweepResult) -> io::Result<()> {
    writeln!(
        writer,
        "{},peak_heat_flux_w_m2,heat_load_j_m2,peak_deceleration_m_s2",
        sweep.parameter
    )?;
    for i in 0..sweep.len() {
        writeln!(
            writer,
            "{},{:.4},{:.4},{:.6}",
            sweep.values[i], sweep.peak_heat_flux[i], sweep.heat_load[i], sweep.peak_deceleration[i],
        )?;
    }
    Ok(())
}

pub fn write_sweep_file<P: AsRef<Path>>(path: P, sweep: &SweepResult) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_sweep(&mut file, sweep)?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::run_entry;
    use crate::analysis::sweep::SweepParameter;
    use crate::dynamics::state::SimConfig;
    use crate::model::EntryModel;
    use crate::vehicle::presets;

    fn short_run(model: EntryModel) -> EntryRun {
        let config = SimConfig { t_max: 20.0, ..SimConfig::default() };
        run_entry(&presets::ballistic_capsule(), &model, &config).unwrap()
    }

    #[test]
    fn trajectory_csv_has_header_and_rows() {
        let run = short_run(EntryModel::default());
        let mut buf = Vec::new();
        write_trajectory(&mut buf, &run).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("time_s,velocity_m_s,gamma_deg"));
        assert_eq!(lines.len(), run.result.trajectory.len() + 1);
        assert!(lines[1].starts_with("0.000000,7000.000000,-5.000000,100000.0000,"));
        assert!(lines.iter().all(|l| l.split(',').count() == 8));
    }

    #[test]
    fn thermal_columns_empty_without_model() {
        let run = short_run(EntryModel::default().without_thermal());
        let mut buf = Vec::new();
        write_trajectory(&mut buf, &run).unwrap();
        let output = String::from_utf8(buf).unwrap();
        assert!(output.lines().nth(1).unwrap().ends_with(",,"));
    }

    #[test]
    fn sweep_csv_names_the_parameter() {
        let sweep = SweepResult {
            parameter: SweepParameter::BallisticCoefficient,
            values: vec![200.0, 400.0],
            peak_heat_flux: vec![1.0e6, 1.5e6],
            heat_load: vec![6.0e7, 8.0e7],
            peak_deceleration: vec![120.0, 125.0],
        };
        let mut buf = Vec::new();
        write_sweep(&mut buf, &sweep).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ballistic_coefficient,"));
        assert_eq!(lines[1], "200,1000000.0000,60000000.0000,120.000000");
    }

    #[test]
    fn writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("traj.csv");
        write_trajectory_file(&path, &short_run(EntryModel::default())).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("time_s,"));
    }
}
