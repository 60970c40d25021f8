use std::io::Write;
use std::str::FromStr;
use std::sync::Mutex;
use std::time::SystemTime;

use syslog::{Facility, Formatter3164, LoggerBackend};

use crate::{Error, Result};

type SyslogWriter = syslog::Logger<LoggerBackend, Formatter3164>;

/// Log verbosity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    #[default]
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl FromStr for LogLevel {
    type Err = ();
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(()),
        }
    }
}

/// Stderr logger with levels, an optional append-only file and an optional syslog sink.
pub struct Logger {
    level: LogLevel,
    file: Option<std::fs::File>,
    syslog: Option<Mutex<SyslogWriter>>,
}

impl Logger {
    pub fn new(level: LogLevel, file_path: Option<String>, use_syslog: bool) -> Result<Self> {
        let env_level = std::env::var("OLEDSTAT_LOG_LEVEL")
            .ok()
            .and_then(|s| LogLevel::from_str(&s).ok());
        let effective_level = env_level.unwrap_or(level);

        let path = file_path.or_else(|| std::env::var("OLEDSTAT_LOG_PATH").ok());
        let file = match path {
            Some(p) => Some(
                std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&p)
                    .map_err(|e| Error::Io(std::io::Error::new(e.kind(), format!("{p}: {e}"))))?,
            ),
            None => None,
        };

        let syslog = if use_syslog {
            let formatter = Formatter3164 {
                facility: Facility::LOG_DAEMON,
                hostname: None,
                process: env!("CARGO_PKG_NAME").into(),
                pid: std::process::id(),
            };
            let writer = syslog::unix(formatter)
                .map_err(|e| Error::Io(std::io::Error::other(format!("syslog: {e}"))))?;
            Some(Mutex::new(writer))
        } else {
            None
        };

        Ok(Self {
            level: effective_level,
            file,
            syslog,
        })
    }

    /// Stderr only, at the given level; handy for tests and one-shot commands.
    pub fn stderr(level: LogLevel) -> Self {
        Self {
            level,
            file: None,
            syslog: None,
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn log(&self, level: LogLevel, msg: impl AsRef<str>) {
        if level > self.level {
            return;
        }
        let ts = humantime::format_rfc3339_seconds(SystemTime::now());
        let line = format!("[{ts}] [{level:?}] {}", msg.as_ref());
        eprintln!("{line}");
        if let Some(file) = self.file.as_ref() {
            if let Ok(mut clone) = file.try_clone() {
                let _ = writeln!(clone, "{line}");
            }
        }
        if let Some(syslog) = self.syslog.as_ref() {
            if let Ok(mut writer) = syslog.lock() {
                let msg = msg.as_ref();
                let _ = match level {
                    LogLevel::Error => writer.err(msg),
                    LogLevel::Warn => writer.warning(msg),
                    LogLevel::Info => writer.info(msg),
                    LogLevel::Debug | LogLevel::Trace => writer.debug(msg),
                };
            }
        }
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        self.log(LogLevel::Error, msg);
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        self.log(LogLevel::Warn, msg);
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        self.log(LogLevel::Info, msg);
    }

    pub fn debug(&self, msg: impl AsRef<str>) {
        self.log(LogLevel::Debug, msg);
    }

    pub fn trace(&self, msg: impl AsRef<str>) {
        self.log(LogLevel::Trace, msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_levels_case_insensitively() {
        assert_eq!(LogLevel::from_str("WARNING"), Ok(LogLevel::Warn));
        assert_eq!(LogLevel::from_str("trace"), Ok(LogLevel::Trace));
        assert!(LogLevel::from_str("loud").is_err());
    }

    #[test]
    fn file_sink_respects_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("oledstat.log");
        let logger = Logger::new(
            LogLevel::Info,
            Some(path.to_string_lossy().into_owned()),
            false,
        )
        .unwrap();
        logger.info("panel ready");
        logger.debug("frame 1 flushed");
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[Info] panel ready"));
        assert!(!contents.contains("frame 1 flushed"));
    }

    #[test]
    fn unwritable_log_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("oledstat.log");
        let result = Logger::new(
            LogLevel::Info,
            Some(path.to_string_lossy().into_owned()),
            false,
        );
        assert!(result.is_err());
    }
}
