//! Пул переиспользуемых объектов для горячего пути сжатия.
//!
//! [`Pool`] хранит ограниченный список свободных объектов под
//! `parking_lot::Mutex`. Блокировка удерживается только на время `pop`/`push`,
//! сама работа с объектом идёт вне её.
//!
//! [`Pool::acquire`] возвращает RAII-guard [`Pooled`], который даёт
//! эксклюзивный доступ к объекту и возвращает его в пул в `Drop`, то есть на
//! любом пути выхода, включая `?` и раскрутку после паники. Перед возвратом
//! выполняется hook `reset`; если он вернул `false`, объект уничтожается.
//!
//! Пул никогда не отдаёт наружу ссылки на свои объекты дольше жизни guard'а,
//! поэтому вызывающий код обязан копировать результат из pooled-буфера.

use std::{
    fmt,
    ops::{Deref, DerefMut},
    sync::atomic::{AtomicU64, Ordering},
};

use parking_lot::Mutex;
use serde::Serialize;
use tracing::trace;

type Factory<T> = Box<dyn Fn() -> T + Send + Sync>;
type Reset<T> = Box<dyn Fn(&mut T) -> bool + Send + Sync>;

/// Ограниченный пул объектов.
pub struct Pool<T> {
    name: &'static str,
    idle: Mutex<Vec<T>>,
    factory: Factory<T>,
    reset: Reset<T>,
    max_idle: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    released: AtomicU64,
    discarded: AtomicU64,
}

/// Снимок счётчиков пула.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Выдачи из списка свободных объектов.
    pub hits: u64,
    /// Выдачи, потребовавшие создания нового объекта.
    pub misses: u64,
    /// Объекты, вернувшиеся в пул.
    pub released: u64,
    /// Объекты, уничтоженные при возврате (reset отказал или пул полон).
    pub discarded: u64,
    /// Текущее число свободных объектов.
    pub idle: usize,
}

/// Эксклюзивный доступ к объекту из пула.
///
/// Объект возвращается в пул при уничтожении guard'а.
pub struct Pooled<'a, T> {
    pool: &'a Pool<T>,
    item: Option<T>,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl<T> Pool<T> {
    /// Создаёт пул, который хранит не более `max_idle` свободных объектов.
    pub fn new<F>(
        name: &'static str,
        max_idle: usize,
        factory: F,
    ) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            name,
            idle: Mutex::new(Vec::with_capacity(max_idle)),
            factory: Box::new(factory),
            reset: Box::new(|_| true),
            max_idle,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            released: AtomicU64::new(0),
            discarded: AtomicU64::new(0),
        }
    }

    /// Задаёт hook, который готовит объект к повторному использованию.
    ///
    /// Возврат `false` означает, что объект нельзя переиспользовать.
    pub fn with_reset<R>(
        mut self,
        reset: R,
    ) -> Self
    where
        R: Fn(&mut T) -> bool + Send + Sync + 'static,
    {
        self.reset = Box::new(reset);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Берёт объект из пула или создаёт новый.
    pub fn acquire(&self) -> Pooled<'_, T> {
        let reused = self.idle.lock().pop();

        let item = match reused {
            Some(item) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                item
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                trace!(pool = self.name, "pool miss, creating new object");
                (self.factory)()
            }
        };

        Pooled {
            pool: self,
            item: Some(item),
        }
    }

    /// Текущие значения счётчиков.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            released: self.released.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
            idle: self.idle.lock().len(),
        }
    }

    /// Уничтожает все свободные объекты.
    pub fn clear(&self) {
        self.idle.lock().clear();
    }

    fn release(
        &self,
        mut item: T,
    ) {
        if !(self.reset)(&mut item) {
            self.discarded.fetch_add(1, Ordering::Relaxed);
            trace!(pool = self.name, "object rejected by reset hook");
            return;
        }

        let mut idle = self.idle.lock();
        if idle.len() < self.max_idle {
            idle.push(item);
            self.released.fetch_add(1, Ordering::Relaxed);
        } else {
            drop(idle);
            self.discarded.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl<T> Pooled<'_, T> {
    /// Забирает объект из-под управления пула.
    pub fn detach(mut self) -> T {
        self.item
            .take()
            .expect("pooled object is present until the guard is dropped")
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов
////////////////////////////////////////////////////////////////////////////////

impl<T> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.item
            .as_ref()
            .expect("pooled object is present until the guard is dropped")
    }
}

impl<T> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.item
            .as_mut()
            .expect("pooled object is present until the guard is dropped")
    }
}

impl<T> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        if let Some(item) = self.item.take() {
            self.pool.release(item);
        }
    }
}

impl<T> fmt::Debug for Pool<T> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Pool")
            .field("name", &self.name)
            .field("max_idle", &self.max_idle)
            .field("stats", &self.stats())
            .finish()
    }
}

impl<T: fmt::Debug> fmt::Debug for Pooled<'_, T> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Pooled")
            .field("pool", &self.pool.name)
            .field("item", &self.item)
            .finish()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
