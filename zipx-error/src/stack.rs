use std::{fmt, panic::Location, sync::Arc};

use crate::{ErrorExt, StatusCode};

/// Ошибка внешних слоёв (настройки, логирование, бенчмарки): исходная ошибка
/// плюс цепочка пояснений, добавленных по пути наверх.
#[derive(Clone)]
pub struct StackError {
    root: Arc<dyn ErrorExt>,
    frames: Vec<Frame>,
}

/// Одно пояснение и место, где оно добавлено.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub message: String,
    pub location: &'static Location<'static>,
}

impl StackError {
    pub fn new<E: ErrorExt>(err: E) -> Self {
        Self {
            root: Arc::new(err),
            frames: Vec::new(),
        }
    }

    /// Добавляет пояснение. Последнее добавленное считается самым внешним.
    #[track_caller]
    pub fn context(
        mut self,
        message: impl Into<String>,
    ) -> Self {
        self.frames.push(Frame {
            message: message.into(),
            location: Location::caller(),
        });
        self
    }

    /// Статус исходной ошибки; пояснения его не меняют.
    pub fn status_code(&self) -> StatusCode {
        self.root.status_code()
    }

    pub fn root(&self) -> &dyn ErrorExt {
        self.root.as_ref()
    }

    /// Пояснения от внутреннего к внешнему.
    pub fn contexts(&self) -> &[Frame] {
        &self.frames
    }

    pub fn downcast_ref<T: ErrorExt>(&self) -> Option<&T> {
        self.root.as_any().downcast_ref::<T>()
    }
}

impl fmt::Display for StackError {
    /// `внешнее: внутреннее: исходная ошибка`.
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        for frame in self.frames.iter().rev() {
            write!(f, "{}: ", frame.message)?;
        }
        write!(f, "{}", self.root)
    }
}

impl fmt::Debug for StackError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let mut out = f.debug_struct("StackError");
        out.field("status_code", &self.status_code())
            .field("root", &format_args!("{}", self.root));
        for frame in self.frames.iter().rev() {
            out.field(
                "context",
                &format_args!(
                    "{} at {}:{}",
                    frame.message,
                    frame.location.file(),
                    frame.location.line()
                ),
            );
        }
        out.finish()
    }
}

impl std::error::Error for StackError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.root.as_ref())
    }
}

impl<E: ErrorExt> From<E> for StackError {
    fn from(err: E) -> Self {
        StackError::new(err)
    }
}
