use std::{env, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use zipx_error::{ensure, StatusCode, ZipxResult};

/// Допустимые уровни логирования.
const LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Формат вывода событий.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

/// Конфигурация логирования.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Уровень по умолчанию (`trace`..`error` или `off`).
    pub level: String,
    pub format: LogFormat,
    pub with_target: bool,
    pub with_thread_ids: bool,
    pub with_line_numbers: bool,
    pub with_ansi: bool,
    /// Дополнительные директивы `EnvFilter`, например `zipx::pool=trace`.
    pub directives: Vec<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
            with_target: true,
            with_thread_ids: false,
            with_line_numbers: false,
            with_ansi: true,
            directives: Vec::new(),
        }
    }
}

impl LoggingConfig {
    /// Переопределения из окружения: `ZIPX_LOG_LEVEL`, `ZIPX_LOG_FORMAT`.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var("ZIPX_LOG_LEVEL") {
            self.level = level.to_ascii_lowercase();
        }

        if let Ok(format) = env::var("ZIPX_LOG_FORMAT") {
            match format.parse() {
                Ok(format) => self.format = format,
                Err(e) => eprintln!("Ignoring ZIPX_LOG_FORMAT: {e}"),
            }
        }
    }

    pub fn validate(&self) -> ZipxResult<()> {
        ensure!(
            LEVELS.contains(&self.level.as_str()),
            StatusCode::Config,
            "unknown log level '{}', expected one of {:?}",
            self.level,
            LEVELS
        );
        ensure!(
            self.directives.iter().all(|d| !d.trim().is_empty()),
            StatusCode::Config,
            "empty log directive"
        );
        Ok(())
    }

    /// Директива для `EnvFilter`: уровень и дополнительные директивы.
    pub fn build_filter_directive(&self) -> String {
        std::iter::once(self.level.as_str())
            .chain(self.directives.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let name = match self {
            Self::Compact => "compact",
            Self::Pretty => "pretty",
            Self::Json => "json",
        };
        f.write_str(name)
    }
}
