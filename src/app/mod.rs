use crate::{
    cli::RunOptions,
    config::{validate, Config, OledAddr},
    display::{DisplayDevice, OledDevice},
    metrics::{MetricSource, Sampler, SamplerSettings},
    Result,
};
use std::{str::FromStr, sync::atomic::AtomicBool, time::Duration};

mod lifecycle;
mod logger;
mod render_loop;

use lifecycle::create_shutdown_flag;
pub use logger::{LogLevel, Logger};
pub use render_loop::{run_render_loop, LoopSettings, RenderContext};

/// Config for the daemon: file values with CLI overrides applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub i2c_bus: String,
    pub oled_addr: OledAddr,
    pub caption: String,
    pub port_label: u16,
    pub scroll_speed_px: i32,
    pub frame_interval: Duration,
    pub max_frames: Option<u64>,
    pub sampler: SamplerSettings,
    pub log_level: LogLevel,
    pub log_file: Option<String>,
    pub log_syslog: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_sources(Config::default(), RunOptions::default())
    }
}

impl AppConfig {
    /// Merge without validating; see [`AppConfig::resolve`] for the checked path.
    pub fn from_sources(config: Config, opts: RunOptions) -> Self {
        Self::from_merged(with_overrides(config, &opts), opts)
    }

    /// Apply CLI overrides to the file config, then validate the merged values.
    pub fn resolve(config: Config, opts: RunOptions) -> Result<Self> {
        let merged = with_overrides(config, &opts);
        validate(&merged)?;
        Ok(Self::from_merged(merged, opts))
    }

    fn from_merged(config: Config, opts: RunOptions) -> Self {
        Self {
            i2c_bus: config.i2c_bus,
            oled_addr: config.oled_addr,
            caption: config.caption,
            port_label: config.port_label,
            scroll_speed_px: config.scroll_speed_px,
            frame_interval: config.frame_interval,
            max_frames: opts.frames,
            sampler: SamplerSettings {
                ip_probe_target: config.ip_probe_target,
                thermal_zone: config.thermal_zone,
                disk_mount: config.disk_mount,
                cpu_sample_interval: config.cpu_sample_interval,
            },
            log_level: opts
                .log_level
                .as_deref()
                .and_then(|s| LogLevel::from_str(s).ok())
                .unwrap_or_default(),
            log_file: opts.log_file,
            log_syslog: config.log_syslog,
        }
    }

    pub fn loop_settings(&self) -> LoopSettings {
        LoopSettings {
            frame_interval: self.frame_interval,
            max_frames: self.max_frames,
        }
    }

    pub fn render_context(&self) -> RenderContext {
        RenderContext::new(&self.caption, self.scroll_speed_px, self.port_label)
    }
}

fn with_overrides(mut config: Config, opts: &RunOptions) -> Config {
    if let Some(bus) = &opts.i2c_bus {
        config.i2c_bus = bus.clone();
    }
    if let Some(addr) = opts.oled_addr {
        config.oled_addr = addr;
    }
    if let Some(caption) = &opts.caption {
        config.caption = caption.clone();
    }
    if let Some(speed) = opts.scroll_speed_px {
        config.scroll_speed_px = speed;
    }
    if let Some(interval) = opts.frame_interval {
        config.frame_interval = interval;
    }
    config.log_syslog |= opts.syslog;
    config
}

pub struct App {
    config: AppConfig,
    logger: Logger,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let logger = Logger::new(config.log_level, config.log_file.clone(), config.log_syslog)?;
        Ok(Self { config, logger })
    }

    pub fn from_options(opts: RunOptions) -> Result<Self> {
        let cfg_file = Config::load_or_default(opts.config_path.as_deref())?;
        let merged = AppConfig::resolve(cfg_file, opts)?;
        Self::new(merged)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Entry point for the daemon: open the panel, then render until signalled.
    pub fn run(&self) -> Result<()> {
        let config = &self.config;
        self.logger.info(format!(
            "daemon start (bus={}, addr={}, frame_interval={}, scroll={}px/frame)",
            config.i2c_bus,
            config.oled_addr,
            humantime::format_duration(config.frame_interval),
            config.scroll_speed_px
        ));

        let running = create_shutdown_flag()?;
        let mut sampler = Sampler::new(config.sampler.clone());
        run_daemon(
            || OledDevice::open(&config.i2c_bus, config.oled_addr),
            &mut sampler,
            config,
            &self.logger,
            &running,
        )?;
        Ok(())
    }
}

/// Open the device with `open`, then drive the render loop.
///
/// A failed open is logged and returned before anything is sampled or flushed.
pub fn run_daemon<D, S, F>(
    open: F,
    source: &mut S,
    config: &AppConfig,
    logger: &Logger,
    running: &AtomicBool,
) -> Result<u64>
where
    D: DisplayDevice,
    S: MetricSource,
    F: FnOnce() -> Result<D>,
{
    let mut device = match open() {
        Ok(device) => device,
        Err(err) => {
            logger.error(format!("display init failed: {err}"));
            return Err(err);
        }
    };
    logger.debug("display initialized");

    let mut ctx = config.render_context();
    run_render_loop(
        &mut device,
        source,
        &mut ctx,
        config.loop_settings(),
        logger,
        running,
    )
}

/// Sample once and print the snapshot as JSON; never touches the display.
pub fn print_snapshot(opts: RunOptions) -> Result<()> {
    let cfg_file = Config::load_or_default(opts.config_path.as_deref())?;
    let config = AppConfig::resolve(cfg_file, opts)?;
    let mut sampler = Sampler::new(config.sampler);
    let snapshot = sampler.sample();
    let json = serde_json::to_string_pretty(&snapshot)
        .map_err(|e| crate::Error::Io(std::io::Error::other(e)))?;
    println!("{json}");
    for fault in sampler.faults() {
        eprintln!("warning: {fault}");
    }
    Ok(())
}
