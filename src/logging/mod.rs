pub mod config;
mod filters;
mod formatter;

use std::io;

pub use config::{LogFormat, LoggingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zipx_error::{GenericError, ResultExt, StatusCode, ZipxResult};

/// Инициализация логирования с конфигурацией.
///
/// Устанавливает глобальный subscriber. Повторный вызов возвращает ошибку
/// `StatusCode::Config`, а не панику.
pub fn init_logging(mut config: LoggingConfig) -> ZipxResult<()> {
    config.apply_env_overrides();
    config.validate().context("validate logging config")?;

    let env_filter = filters::build_filter_from_config(&config);
    let console_layer = formatter::build_formatter_from_config(&config, io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .try_init()
        .map_err(|e| GenericError::new(StatusCode::Config, e.to_string()))
        .context("install global subscriber")?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_level = %config.level,
        format = %config.format,
        "Logging system initialized"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    /// Тест проверяет, что невалидная конфигурация отклоняется до установки
    /// subscriber, а повторная установка не паникует.
    #[test]
    #[serial]
    fn test_init_logging() {
        let bad = LoggingConfig {
            level: "loud".into(),
            ..Default::default()
        };
        let err = init_logging(bad).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::Config);
        assert_eq!(err.contexts()[0].message, "validate logging config");

        // Первый вызов может провалиться, если subscriber уже установлен
        // другим тестом этого бинарника; второй должен провалиться всегда.
        let _ = init_logging(LoggingConfig::default());
        let second = init_logging(LoggingConfig::default());
        let err = second.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::Config);
        assert_eq!(err.contexts()[0].message, "install global subscriber");
    }
}
