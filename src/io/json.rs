use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::analysis::sweep::SweepResult;
use crate::analysis::EntrySummary;
use crate::vehicle::Vehicle;

/// One named run as written to a JSON report.
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub name: &'a str,
    pub vehicle: &'a Vehicle,
    pub summary: &'a EntrySummary,
}

/// Write run reports as a pretty-printed JSON array.
pub fn write_reports<W: Write>(writer: &mut W, reports: &[RunReport<'_>]) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, reports)?;
    writeln!(writer).map_err(serde_json::Error::io)
}

pub fn write_reports_file<P: AsRef<Path>>(path: P, reports: &[RunReport<'_>]) -> serde_json::Result<()> {
    let file = File::create(path).map_err(serde_json::Error::io)?;
    let mut writer = BufWriter::new(file);
    write_reports(&mut writer, reports)?;
    writer.flush().map_err(serde_json::Error::io)
}

pub fn write_sweep<W: Write>(writer: &mut W, sweep: &SweepResult) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, sweep)?;
    writeln!(writer).map_err(serde_json::Error::io)
}

pub fn write_sweep_file<P: AsRef<Path>>(path: P, sweep: &SweepResult) -> serde_json::Result<()> {
    let file = File::create(path).map_err(serde_json::Error::io)?;
    let mut writer = BufWriter::new(file);
    write_sweep(&mut writer, sweep)?;
    writer.flush().map_err(serde_json::Error::io)
}
