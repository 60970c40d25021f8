//! System metric probes and the per-frame snapshot they produce.
//!
//! Each probe returns a typed [`MetricFault`] on failure; [`Sampler`] turns
//! faults into the on-screen sentinels so a sample never fails as a whole.

use std::{fmt, net::SocketAddr, thread, time::Duration};

use serde::Serialize;
use sysinfo::System;

pub mod network;
pub mod storage;
pub mod thermal;

pub use network::probe_local_ip;
pub use storage::{disk_usage, DiskUsage};
pub use thermal::{parse_millidegrees, read_cpu_temp};

/// Shown in place of the address when no route is available.
pub const NO_NETWORK: &str = "No Network";

/// One reading of every monitored metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemSnapshot {
    pub ip_address: String,
    pub cpu_temp_celsius: f64,
    pub cpu_load_percent: f64,
    pub disk_used_bytes: u64,
    pub disk_total_bytes: u64,
}

impl SystemSnapshot {
    /// Snapshot with every field at its failure sentinel.
    pub fn unavailable() -> Self {
        Self {
            ip_address: NO_NETWORK.to_string(),
            cpu_temp_celsius: 0.0,
            cpu_load_percent: 0.0,
            disk_used_bytes: 0,
            disk_total_bytes: 0,
        }
    }
}

/// Why a single probe could not produce a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricFault {
    NoRoute(String),
    SensorUnavailable(String),
    SensorParse(String),
    MountNotFound(String),
}

impl fmt::Display for MetricFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricFault::NoRoute(msg) => write!(f, "no network route: {msg}"),
            MetricFault::SensorUnavailable(msg) => {
                write!(f, "temperature sensor unavailable: {msg}")
            }
            MetricFault::SensorParse(msg) => write!(f, "temperature sensor unreadable: {msg}"),
            MetricFault::MountNotFound(mount) => write!(f, "no filesystem mounted at {mount}"),
        }
    }
}

/// Anything that can hand the render loop a fresh snapshot.
pub trait MetricSource {
    fn sample(&mut self) -> SystemSnapshot;

    /// Faults hit by the most recent [`MetricSource::sample`] call.
    fn faults(&self) -> &[MetricFault] {
        &[]
    }
}

/// Where the sampler reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplerSettings {
    pub ip_probe_target: String,
    pub thermal_zone: String,
    pub disk_mount: String,
    pub cpu_sample_interval: Duration,
}

/// Reads live metrics from the host.
pub struct Sampler {
    settings: SamplerSettings,
    system: System,
    last_faults: Vec<MetricFault>,
}

impl Sampler {
    pub fn new(settings: SamplerSettings) -> Self {
        let mut system = System::new();
        system.refresh_cpu_usage();
        Self {
            settings,
            system,
            last_faults: Vec::new(),
        }
    }

    /// Blocks for the configured CPU sample interval.
    fn cpu_load_percent(&mut self) -> f64 {
        self.system.refresh_cpu_usage();
        thread::sleep(self.settings.cpu_sample_interval);
        self.system.refresh_cpu_usage();
        clamp_percent(self.system.global_cpu_usage() as f64)
    }
}

impl MetricSource for Sampler {
    fn sample(&mut self) -> SystemSnapshot {
        let mut faults = Vec::new();

        let ip_address = match resolve_target(&self.settings.ip_probe_target)
            .and_then(probe_local_ip)
        {
            Ok(ip) => ip.to_string(),
            Err(fault) => {
                faults.push(fault);
                NO_NETWORK.to_string()
            }
        };

        let cpu_temp_celsius = match read_cpu_temp(&self.settings.thermal_zone) {
            Ok(temp) => temp,
            Err(fault) => {
                faults.push(fault);
                0.0
            }
        };

        let cpu_load_percent = self.cpu_load_percent();

        let disk = match disk_usage(&self.settings.disk_mount) {
            Ok(disk) => disk,
            Err(fault) => {
                faults.push(fault);
                DiskUsage::default()
            }
        };

        self.last_faults = faults;
        SystemSnapshot {
            ip_address,
            cpu_temp_celsius,
            cpu_load_percent,
            disk_used_bytes: disk.used_bytes,
            disk_total_bytes: disk.total_bytes,
        }
    }

    fn faults(&self) -> &[MetricFault] {
        &self.last_faults
    }
}

fn resolve_target(raw: &str) -> Result<SocketAddr, MetricFault> {
    raw.parse()
        .map_err(|_| MetricFault::NoRoute(format!("invalid probe target '{raw}'")))
}

/// Clamp a load reading into [0, 100]; anything non-finite reads as idle.
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}
