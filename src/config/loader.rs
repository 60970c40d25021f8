use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{Error, Result};

use super::{Config, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};

pub fn load_or_default(explicit: Option<&str>) -> Result<Config> {
    let path = config_path(explicit);
    load_from_path(&path)
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    if !path.exists() {
        let cfg = Config::default();
        super::validate(&cfg)?;
        return Ok(cfg);
    }

    let raw = fs::read_to_string(path)?;
    parse(&raw)
}

pub fn parse(raw: &str) -> Result<Config> {
    let mut cfg = Config::default();

    for (idx, line) in raw.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let (key, value) = trimmed.split_once('=').ok_or_else(|| {
            Error::Config(format!("invalid config line {}: '{}'", idx + 1, line))
        })?;

        let line_no = idx + 1;
        let key = key.trim();
        let value = value.trim().trim_matches('"');
        match key {
            "i2c_bus" => cfg.i2c_bus = value.to_string(),
            "oled_addr" => {
                cfg.oled_addr = value.parse().map_err(|e: String| {
                    Error::Config(format!("invalid oled_addr on line {line_no}: {e}"))
                })?;
            }
            "caption" => cfg.caption = value.to_string(),
            "port_label" => {
                cfg.port_label = value.parse().map_err(|_| {
                    Error::Config(format!("invalid port_label on line {line_no}"))
                })?;
            }
            "scroll_speed_px" => {
                cfg.scroll_speed_px = value.parse().map_err(|_| {
                    Error::Config(format!("invalid scroll_speed_px on line {line_no}"))
                })?;
            }
            "frame_interval" => cfg.frame_interval = parse_duration(key, value, line_no)?,
            "cpu_sample_interval" => {
                cfg.cpu_sample_interval = parse_duration(key, value, line_no)?
            }
            "ip_probe_target" => cfg.ip_probe_target = value.to_string(),
            "thermal_zone" => cfg.thermal_zone = value.to_string(),
            "disk_mount" => cfg.disk_mount = value.to_string(),
            "log_syslog" => {
                cfg.log_syslog = value.parse().map_err(|_| {
                    Error::Config(format!("invalid log_syslog on line {line_no}"))
                })?;
            }
            other => {
                return Err(Error::Config(format!(
                    "unknown config key '{other}' on line {line_no}"
                )));
            }
        }
    }

    super::validate(&cfg)?;
    Ok(cfg)
}

fn parse_duration(key: &str, value: &str, line_no: usize) -> Result<Duration> {
    humantime::parse_duration(value)
        .map_err(|e| Error::Config(format!("invalid {key} on line {line_no}: {e}")))
}

fn config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }
    std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
