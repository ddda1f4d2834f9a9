//! Stderr logging for the `inventory-tags-*` crates.
//!
//! Lines look like `[  0.012s DEBUG inventory_tags_print::compose] ...`.
//! Levels are set per target with a [`LogFilter`], e.g.
//! `warn,inventory_tags_print::label=debug` keeps everything quiet except
//! the label injector.

use std::io::Write;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LogFilterError {
    #[error("invalid log level {level:?} in directive {directive:?}")]
    InvalidLevel { directive: String, level: String },
    #[error("empty target in directive {0:?}")]
    EmptyTarget(String),
}

/// A default level plus per-target overrides.
///
/// A directive for `a::b` applies to target `a::b` and to every `a::b::*`;
/// the longest matching directive wins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogFilter {
    default: LevelFilter,
    targets: Vec<(String, LevelFilter)>,
}

impl LogFilter {
    pub fn new(default: LevelFilter) -> Self {
        Self {
            default,
            targets: Vec::new(),
        }
    }

    pub fn with_target(mut self, target: impl Into<String>, level: LevelFilter) -> Self {
        let target = target.into();
        self.targets.retain(|(t, _)| *t != target);
        self.targets.push((target, level));
        self
    }

    /// Level applied to records from `target`.
    pub fn level_for(&self, target: &str) -> LevelFilter {
        self.targets
            .iter()
            .filter(|(prefix, _)| {
                target
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
            })
            .max_by_key(|(prefix, _)| prefix.len())
            .map_or(self.default, |&(_, level)| level)
    }

    /// Most verbose level any target can reach.
    pub fn max_level(&self) -> LevelFilter {
        self.targets
            .iter()
            .map(|&(_, level)| level)
            .fold(self.default, Ord::max)
    }
}

impl FromStr for LogFilter {
    type Err = LogFilterError;

    /// Comma-separated directives: a bare level sets the default,
    /// `target=level` adds an override.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = |directive: &str, raw: &str| {
            raw.trim()
                .parse::<LevelFilter>()
                .map_err(|_| LogFilterError::InvalidLevel {
                    directive: directive.to_string(),
                    level: raw.trim().to_string(),
                })
        };

        let mut filter = LogFilter::new(LevelFilter::Info);
        for directive in s.split(',').map(str::trim).filter(|d| !d.is_empty()) {
            match directive.split_once('=') {
                Some((target, raw)) => {
                    let target = target.trim();
                    if target.is_empty() {
                        return Err(LogFilterError::EmptyTarget(directive.to_string()));
                    }
                    filter = filter.with_target(target, level(directive, raw)?);
                }
                None => filter.default = level(directive, directive)?,
            }
        }
        Ok(filter)
    }
}

struct StderrLogger {
    filter: LogFilter,
    started: Instant,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.filter.level_for(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let elapsed = self.started.elapsed().as_secs_f64();
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "[{:7.3}s {:>5} {}] {}",
            elapsed,
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Install the stderr logger. Only the first call has an effect.
pub fn init_with_filter(filter: LogFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let max = filter.max_level();
        let logger = LOGGER.get_or_init(|| StderrLogger {
            filter,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(max);
    }
    Ok(())
}

/// [`init_with_filter`] with one level for every target.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    init_with_filter(LogFilter::new(level))
}

/// Route spans and events to a `tracing-subscriber` formatter.
///
/// `RUST_LOG` selects levels (default `info`); `json` switches to one JSON
/// object per line.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE);
    let _ = if json {
        builder.json().flatten_event(true).finish().try_init()
    } else {
        builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}
