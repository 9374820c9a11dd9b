//! Handlers - 名前付き handler の登録と dispatch
//!
//! throw する代わりに、エラー名ごとに登録した handler へ渡す経路です。
//!
//! # 設計
//! - 同名の再登録は置き換え（last-write-wins）
//! - 未登録の名前への dispatch は `RektError::HandlerNotFound`
//! - handler はコンテキストの Logger を受け取る（出力先は `set_logger` で一本化）

use std::collections::HashMap;

use tracing::Level;

use crate::domain::ErrorInstance;
use crate::error::RektError;
use crate::ports::Logger;
use crate::registry::ASSERT_ERROR;

/// A side-effect handler for a named error.
///
/// Closures taking `&ErrorInstance` are handlers; they ignore the logger.
pub trait ErrorHandler {
    fn handle(&self, err: &ErrorInstance, logger: &dyn Logger);
}

impl<F> ErrorHandler for F
where
    F: Fn(&ErrorInstance),
{
    fn handle(&self, err: &ErrorInstance, _logger: &dyn Logger) {
        self(err)
    }
}

/// Reports the error through the context logger. Registered for
/// `AssertError` by default.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingHandler;

impl ErrorHandler for LoggingHandler {
    fn handle(&self, err: &ErrorInstance, logger: &dyn Logger) {
        logger.log(Level::ERROR, &format!("unhandled error: {err}"));
    }
}

/// Registry of handlers (error name -> handler).
///
/// Registering a name again replaces the previous handler.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Box<dyn ErrorHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registry holding the default `AssertError` handler.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.set(ASSERT_ERROR, LoggingHandler);
        registry
    }

    /// Returns `true` if a previous handler was replaced.
    pub fn set(&mut self, name: impl Into<String>, handler: impl ErrorHandler + 'static) -> bool {
        self.handlers.insert(name.into(), Box::new(handler)).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&dyn ErrorHandler> {
        self.handlers.get(name).map(|h| h.as_ref())
    }

    /// Invoke the handler registered for `name`.
    pub fn dispatch(
        &self,
        name: &str,
        err: &ErrorInstance,
        logger: &dyn Logger,
    ) -> Result<(), RektError> {
        let handler = self
            .get(name)
            .ok_or_else(|| RektError::HandlerNotFound(name.to_string()))?;
        handler.handle(err, logger);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
