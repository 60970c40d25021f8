use std::{fs, path::Path};

use super::MetricFault;

/// Read a thermal-zone pseudo-file and return degrees Celsius.
pub fn read_cpu_temp(path: impl AsRef<Path>) -> Result<f64, MetricFault> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .map_err(|e| MetricFault::SensorUnavailable(format!("{}: {e}", path.display())))?;
    parse_millidegrees(&raw)
}

/// The kernel reports thousandths of a degree, e.g. `48312\n`.
pub fn parse_millidegrees(raw: &str) -> Result<f64, MetricFault> {
    let trimmed = raw.trim();
    let milli: i64 = trimmed
        .parse()
        .map_err(|_| MetricFault::SensorParse(format!("'{trimmed}' is not an integer")))?;
    Ok(milli as f64 / 1000.0)
}
