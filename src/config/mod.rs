use crate::{Error, Result};
use std::{net::SocketAddr, path::Path, time::Duration};

pub mod loader;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/oledstat/config.toml";
pub const CONFIG_PATH_ENV: &str = "OLEDSTAT_CONFIG";
pub const DEFAULT_I2C_BUS: &str = "/dev/i2c-1";
pub const DEFAULT_OLED_ADDR: OledAddr = OledAddr::Auto;
pub const DEFAULT_CAPTION: &str = "oledstat is watching this board - ctrl-c or systemctl stop to quit";
pub const DEFAULT_PORT_LABEL: u16 = 8000;
pub const DEFAULT_SCROLL_SPEED_PX: i32 = 2;
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(100);
pub const DEFAULT_CPU_SAMPLE_INTERVAL: Duration = Duration::from_millis(100);
pub const DEFAULT_IP_PROBE_TARGET: &str = "8.8.8.8:80";
pub const DEFAULT_THERMAL_ZONE: &str = "/sys/class/thermal/thermal_zone0/temp";
pub const DEFAULT_DISK_MOUNT: &str = "/";

/// SSD1306 panels answer on 0x3c or 0x3d depending on the SA0 strap.
pub const OLED_ADDR_CANDIDATES: [u8; 2] = [0x3c, 0x3d];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OledAddr {
    Auto,
    Addr(u8),
}

impl std::str::FromStr for OledAddr {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        parse_oled_addr(s)
    }
}

impl std::fmt::Display for OledAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OledAddr::Auto => f.write_str("auto"),
            OledAddr::Addr(a) => write!(f, "{a:#04x}"),
        }
    }
}

/// Settings loaded from the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub i2c_bus: String,
    pub oled_addr: OledAddr,
    pub caption: String,
    pub port_label: u16,
    pub scroll_speed_px: i32,
    pub frame_interval: Duration,
    pub cpu_sample_interval: Duration,
    pub ip_probe_target: String,
    pub thermal_zone: String,
    pub disk_mount: String,
    pub log_syslog: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            i2c_bus: DEFAULT_I2C_BUS.to_string(),
            oled_addr: DEFAULT_OLED_ADDR,
            caption: DEFAULT_CAPTION.to_string(),
            port_label: DEFAULT_PORT_LABEL,
            scroll_speed_px: DEFAULT_SCROLL_SPEED_PX,
            frame_interval: DEFAULT_FRAME_INTERVAL,
            cpu_sample_interval: DEFAULT_CPU_SAMPLE_INTERVAL,
            ip_probe_target: DEFAULT_IP_PROBE_TARGET.to_string(),
            thermal_zone: DEFAULT_THERMAL_ZONE.to_string(),
            disk_mount: DEFAULT_DISK_MOUNT.to_string(),
            log_syslog: false,
        }
    }
}

impl Config {
    /// Load from `explicit`, else `$OLEDSTAT_CONFIG`, else the system path.
    pub fn load_or_default(explicit: Option<&str>) -> Result<Self> {
        loader::load_or_default(explicit)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        loader::load_from_path(path)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        loader::parse(raw)
    }
}

pub(crate) fn validate(cfg: &Config) -> Result<()> {
    if cfg.i2c_bus.trim().is_empty() {
        return Err(Error::Config("i2c_bus must not be empty".into()));
    }
    if cfg.scroll_speed_px < 1 {
        return Err(Error::Config(format!(
            "scroll_speed_px must be at least 1 (got {})",
            cfg.scroll_speed_px
        )));
    }
    if cfg.frame_interval.is_zero() {
        return Err(Error::Config("frame_interval must be greater than zero".into()));
    }
    if cfg.ip_probe_target.parse::<SocketAddr>().is_err() {
        return Err(Error::Config(format!(
            "ip_probe_target must be an ip:port pair (got '{}')",
            cfg.ip_probe_target
        )));
    }
    Ok(())
}

fn parse_oled_addr(raw: &str) -> std::result::Result<OledAddr, String> {
    if raw.eq_ignore_ascii_case("auto") {
        return Ok(OledAddr::Auto);
    }
    let value = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => raw.parse::<u8>(),
    }
    .map_err(|_| "expected 'auto' or a hex/decimal address (e.g., 0x3c)".to_string())?;
    if value > 0x7f {
        return Err(format!("{value:#04x} is not a 7-bit I2C address"));
    }
    Ok(OledAddr::Addr(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_addr_variants() {
        assert_eq!("auto".parse::<OledAddr>().unwrap(), OledAddr::Auto);
        assert_eq!("0x3d".parse::<OledAddr>().unwrap(), OledAddr::Addr(0x3d));
        assert_eq!("60".parse::<OledAddr>().unwrap(), OledAddr::Addr(0x3c));
        assert!("0x80".parse::<OledAddr>().is_err());
        assert!("nope".parse::<OledAddr>().is_err());
    }

    #[test]
    fn addr_display_round_trips() {
        let addr = OledAddr::Addr(0x3c);
        assert_eq!(addr.to_string(), "0x3c");
        assert_eq!(addr.to_string().parse::<OledAddr>().unwrap(), addr);
    }

    #[test]
    fn defaults_are_valid() {
        validate(&Config::default()).unwrap();
    }

    #[test]
    fn rejects_malformed_route_target() {
        for target in ["8.8.8.8", "dns.google:53", "8.8.8.8:http"] {
            let cfg = Config {
                ip_probe_target: target.into(),
                ..Config::default()
            };
            let err = validate(&cfg).unwrap_err();
            assert!(format!("{err}").contains("ip_probe_target"), "{target}");
        }
    }

    #[test]
    fn accepts_ipv6_route_target() {
        let cfg = Config {
            ip_probe_target: "[2001:4860:4860::8888]:53".into(),
            ..Config::default()
        };
        validate(&cfg).unwrap();
    }

    #[test]
    fn rejects_zero_frame_interval() {
        let cfg = Config {
            frame_interval: Duration::ZERO,
            ..Config::default()
        };
        assert!(validate(&cfg).is_err());
    }
}
