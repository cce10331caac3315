/// Немедленно возвращает ошибку из функции с `ZipxResult`.
///
/// - `bail!(err)`: любая ошибка, реализующая `ErrorExt`;
/// - `bail!(code, "msg")`: `GenericError` с кодом и сообщением;
/// - `bail!(code, "fmt {}", arg)`: то же с форматированием.
///
/// ```ignore
/// use zipx_error::{bail, StatusCode};
///
/// fn check_level(level: u32) -> zipx_error::ZipxResult<()> {
///     if level > 9 {
///         bail!(StatusCode::Config, "compression level out of range: {}", level);
///     }
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($err:expr) => {
        return Err($crate::StackError::from($err))
    };
    ($code:expr, $msg:expr) => {
        return Err($crate::StackError::new(
            $crate::types::GenericError::new($code, $msg)
        ))
    };
    ($code:expr, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::StackError::new(
            $crate::types::GenericError::new($code, format!($fmt, $($arg)*))
        ))
    };
}

/// `bail!`, если условие ложно. Формы те же, что у `bail!`.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($rest:tt)+) => {
        if !($cond) {
            $crate::bail!($($rest)+);
        }
    };
}

/// Пояснения к ошибкам в `Result`.
pub trait ResultExt<T> {
    /// Переводит ошибку в `StackError` и добавляет пояснение.
    fn context<C>(
        self,
        ctx: C,
    ) -> Result<T, crate::StackError>
    where
        C: Into<String>;

    /// Как `context`, но текст строится только при ошибке.
    fn with_context<C, F>(
        self,
        f: F,
    ) -> Result<T, crate::StackError>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<crate::StackError>,
{
    #[track_caller]
    fn context<C>(
        self,
        ctx: C,
    ) -> Result<T, crate::StackError>
    where
        C: Into<String>,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(err.into().context(ctx)),
        }
    }

    #[track_caller]
    fn with_context<C, F>(
        self,
        f: F,
    ) -> Result<T, crate::StackError>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(err.into().context(f())),
        }
    }
}
