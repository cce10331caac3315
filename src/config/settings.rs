use config::{Config, ConfigError, Environment};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::info;
use zipx_error::{bail, ensure, GenericError, ResultExt, StatusCode, ZipxResult};

/// Максимальный уровень сжатия deflate.
pub const MAX_COMPRESSION_LEVEL: u32 = 9;

static SETTINGS: OnceCell<CodecSettings> = OnceCell::new();

/// Параметры слоя сжатия и пулов.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecSettings {
    /// Уровень deflate (0..=9) для Gzip и Zlib.
    pub compression_level: u32,
    /// Сколько свободных объектов хранит каждый пул.
    pub pool_max_idle: usize,
    /// Буферы с большей ёмкостью не возвращаются в пул.
    pub max_buffer_capacity: usize,
    /// Ёмкость только что созданного буфера.
    pub initial_buffer_capacity: usize,
}

impl Default for CodecSettings {
    fn default() -> Self {
        Self {
            compression_level: 6,
            pool_max_idle: 64,
            max_buffer_capacity: 1024 * 1024,
            initial_buffer_capacity: 4 * 1024,
        }
    }
}

impl CodecSettings {
    /// Загружает настройки: значения по умолчанию, затем переменные окружения
    /// с префиксом `ZIPX_` (например `ZIPX_COMPRESSION_LEVEL=9`).
    pub fn load() -> ZipxResult<Self> {
        let defaults = Self::default();

        let cfg = Config::builder()
            .set_default("compression_level", defaults.compression_level as i64)
            .and_then(|b| b.set_default("pool_max_idle", defaults.pool_max_idle as i64))
            .and_then(|b| b.set_default("max_buffer_capacity", defaults.max_buffer_capacity as i64))
            .and_then(|b| {
                b.set_default(
                    "initial_buffer_capacity",
                    defaults.initial_buffer_capacity as i64,
                )
            })
            .map_err(config_error)
            .context("register codec defaults")?
            .add_source(Environment::with_prefix("ZIPX").try_parsing(true))
            .build()
            .map_err(config_error)
            .context("read ZIPX_* environment")?;

        let settings: Self = cfg
            .try_deserialize()
            .map_err(config_error)
            .context("deserialize codec settings")?;
        settings.validate().context("validate codec settings")?;
        Ok(settings)
    }

    /// Проверяет согласованность параметров.
    pub fn validate(&self) -> ZipxResult<()> {
        ensure!(
            self.compression_level <= MAX_COMPRESSION_LEVEL,
            StatusCode::Config,
            "compression_level must be in 0..={}, got {}",
            MAX_COMPRESSION_LEVEL,
            self.compression_level
        );
        ensure!(
            self.pool_max_idle > 0,
            StatusCode::Config,
            "pool_max_idle must be positive"
        );
        ensure!(
            self.initial_buffer_capacity <= self.max_buffer_capacity,
            StatusCode::Config,
            "initial_buffer_capacity ({}) exceeds max_buffer_capacity ({})",
            self.initial_buffer_capacity,
            self.max_buffer_capacity
        );
        Ok(())
    }

    /// Уровень сжатия в виде, который понимает `flate2`.
    pub fn flate_level(&self) -> flate2::Compression {
        flate2::Compression::new(self.compression_level)
    }
}

/// Устанавливает глобальные настройки.
///
/// Вызывается один раз до первого использования кодеков: пулы создаются
/// лениво и читают настройки при создании.
pub fn init(settings: CodecSettings) -> ZipxResult<()> {
    settings.validate()?;

    if SETTINGS.set(settings).is_err() {
        bail!(
            StatusCode::InvalidArgs,
            "codec settings are already installed"
        );
    }

    info!(settings = ?SETTINGS.get(), "codec settings installed");
    Ok(())
}

/// Активные настройки (значения по умолчанию, если `init` не вызывался).
pub fn settings() -> &'static CodecSettings {
    SETTINGS.get_or_init(CodecSettings::default)
}

fn config_error(err: ConfigError) -> GenericError {
    GenericError::new(StatusCode::Config, err.to_string())
}
