use std::{any::Any, error::Error};

use crate::StatusCode;

/// Общий интерфейс ошибок библиотеки (object-safe).
///
/// Любой тип, реализующий трейт, превращается в [`StackError`](crate::StackError)
/// через `?`.
pub trait ErrorExt: Error + Send + Sync + 'static {
    /// Статус ошибки. По умолчанию [`StatusCode::Internal`].
    fn status_code(&self) -> StatusCode {
        StatusCode::Internal
    }

    /// Для downcast к конкретному типу.
    fn as_any(&self) -> &dyn Any;
}
