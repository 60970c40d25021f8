use std::time::Duration;

use crate::{config::OledAddr, Error, Result};

/// Options for the `run` and `snapshot` commands; values are `None` when not provided on CLI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunOptions {
    pub config_path: Option<String>,
    pub i2c_bus: Option<String>,
    pub oled_addr: Option<OledAddr>,
    pub caption: Option<String>,
    pub scroll_speed_px: Option<i32>,
    pub frame_interval: Option<Duration>,
    pub frames: Option<u64>,
    pub log_level: Option<String>,
    pub log_file: Option<String>,
    pub syslog: bool,
}

/// Parsed command-line intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Box<RunOptions>),
    Snapshot(Box<RunOptions>),
    ShowHelp,
    ShowVersion,
}

impl Command {
    pub fn parse(args: &[String]) -> Result<Self> {
        let mut iter = args.iter();
        match iter.next().map(|s| s.as_str()) {
            None => Ok(Command::Run(Box::default())),
            Some("run") => Ok(Command::Run(Box::new(parse_run_options(&mut iter)?))),
            Some("snapshot") => Ok(Command::Snapshot(Box::new(parse_run_options(&mut iter)?))),
            Some("--help") | Some("-h") => Ok(Command::ShowHelp),
            Some("--version") | Some("-V") => Ok(Command::ShowVersion),
            Some(flag) if flag.starts_with('-') => {
                // No subcommand given: treat the whole argument list as `run` flags.
                let mut iter = args.iter();
                Ok(Command::Run(Box::new(parse_run_options(&mut iter)?)))
            }
            Some(cmd) => Err(Error::InvalidArgs(format!(
                "unknown command '{cmd}', try --help"
            ))),
        }
    }

    pub fn help() -> &'static str {
        concat!(
            "oledstat - system status on an SSD1306 I2C OLED\n",
            "\n",
            "USAGE:\n",
            "  oledstat [run] [OPTIONS]\n",
            "  oledstat snapshot [--config <path>]\n",
            "  oledstat --help\n",
            "  oledstat --version\n",
            "\n",
            "OPTIONS:\n",
            "  --config <path>            Config file (default: /etc/oledstat/config.toml)\n",
            "  --i2c-bus <path>           I2C bus device (default: /dev/i2c-1)\n",
            "  --oled-addr <auto|hex>     Panel address (default: auto, probes 0x3c then 0x3d)\n",
            "  --caption <text>           Caption shown on the bottom row\n",
            "  --scroll-speed <px>        Caption scroll speed in pixels per frame (default: 2)\n",
            "  --frame-interval <dur>     Delay between frames, e.g. 100ms (default: 100ms)\n",
            "  --frames <number>          Render this many frames and exit (testing helper)\n",
            "  --log-level <level>        error|warn|info|debug|trace (default: info)\n",
            "  --log-file <path>          Append log lines to this file\n",
            "  --syslog                   Also send log lines to syslog\n",
            "  -h, --help                 Show this help\n",
            "  -V, --version              Show version\n",
        )
    }

    pub fn print_help() {
        println!("{}", Self::help());
    }
}

fn parse_run_options(iter: &mut std::slice::Iter<String>) -> Result<RunOptions> {
    let mut opts = RunOptions::default();

    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--config" => {
                opts.config_path = Some(take_value(flag, iter)?);
            }
            "--i2c-bus" => {
                opts.i2c_bus = Some(take_value(flag, iter)?);
            }
            "--oled-addr" => {
                let raw = take_value(flag, iter)?;
                opts.oled_addr = Some(
                    raw.parse()
                        .map_err(|e: String| Error::InvalidArgs(format!("oled-addr: {e}")))?,
                );
            }
            "--caption" => {
                opts.caption = Some(take_value(flag, iter)?);
            }
            "--scroll-speed" => {
                let raw = take_value(flag, iter)?;
                let speed: i32 = raw.parse().map_err(|_| {
                    Error::InvalidArgs("scroll-speed must be a positive integer".to_string())
                })?;
                if speed < 1 {
                    return Err(Error::InvalidArgs(
                        "scroll-speed must be a positive integer".to_string(),
                    ));
                }
                opts.scroll_speed_px = Some(speed);
            }
            "--frame-interval" => {
                let raw = take_value(flag, iter)?;
                opts.frame_interval = Some(humantime::parse_duration(&raw).map_err(|e| {
                    Error::InvalidArgs(format!("frame-interval must be a duration: {e}"))
                })?);
            }
            "--frames" => {
                let raw = take_value(flag, iter)?;
                opts.frames = Some(raw.parse().map_err(|_| {
                    Error::InvalidArgs("frames must be a positive integer".to_string())
                })?);
            }
            "--log-level" => {
                opts.log_level = Some(take_value(flag, iter)?);
            }
            "--log-file" => {
                opts.log_file = Some(take_value(flag, iter)?);
            }
            "--syslog" => {
                opts.syslog = true;
            }
            other => {
                return Err(Error::InvalidArgs(format!(
                    "unknown flag '{other}', try --help"
                )));
            }
        }
    }

    Ok(opts)
}

fn take_value(flag: &str, iter: &mut std::slice::Iter<String>) -> Result<String> {
    iter.next()
        .cloned()
        .ok_or_else(|| Error::InvalidArgs(format!("expected a value after {flag}")))
}
