use std::fmt::{self, Display};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
        }
    }
}

/// Named verbosity presets, selectable from the config file or `--log`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LoggingPreset {
    #[default]
    Default,
    Verbose,
    Develop,
    Trace,
}

impl LoggingPreset {
    pub fn get_config(&self) -> LoggingConfig {
        match self {
            Self::Default => LoggingConfig {
                other: LogLevel::Warn,
                design: LogLevel::Warn,
                generator: LogLevel::Warn,
                export: LogLevel::Info,
                cli: LogLevel::Info,
            },
            Self::Verbose => LoggingConfig {
                other: LogLevel::Warn,
                design: LogLevel::Debug,
                generator: LogLevel::Info,
                export: LogLevel::Debug,
                cli: LogLevel::Debug,
            },
            Self::Develop => LoggingConfig {
                other: LogLevel::Debug,
                design: LogLevel::Trace,
                generator: LogLevel::Debug,
                export: LogLevel::Trace,
                cli: LogLevel::Trace,
            },
            Self::Trace => LoggingConfig {
                other: LogLevel::Trace,
                design: LogLevel::Trace,
                generator: LogLevel::Trace,
                export: LogLevel::Trace,
                cli: LogLevel::Trace,
            },
        }
    }
}

pub struct LoggingConfig {
    other: LogLevel,
    design: LogLevel,
    generator: LogLevel,
    export: LogLevel,
    cli: LogLevel,
}

impl LoggingConfig {
    pub fn directives(&self) -> String {
        [
            format!("sdt_design={}", self.design),
            format!("sdt_gen={}", self.generator),
            format!("sdt_export={}", self.export),
            format!("sdt={}", self.cli),
            self.other.to_string(),
        ]
        .join(",")
    }
}

impl From<LoggingConfig> for EnvFilter {
    fn from(config: LoggingConfig) -> Self {
        EnvFilter::new(config.directives())
    }
}

/// Installs the global subscriber on stderr. `RUST_LOG` wins over the preset.
pub fn init(preset: LoggingPreset) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| preset.get_config().into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_preset_keeps_generator_quiet() {
        let directives = LoggingPreset::Default.get_config().directives();
        assert!(directives.contains("sdt_gen=warn"));
        assert!(directives.contains("sdt_export=info"));
        assert!(directives.ends_with(",warn"));
    }

    #[test]
    fn trace_preset_traces_everything() {
        let directives = LoggingPreset::Trace.get_config().directives();
        assert_eq!(directives.matches("trace").count(), 5);
    }
}
