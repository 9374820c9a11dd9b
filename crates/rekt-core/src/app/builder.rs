//! RektBuilder - コンテキストの構築とワイヤリング
//!
//! # 起動時検証（Fail-fast）
//! - expect_errors() で期待される error 名を登録
//! - build() 時に「期待集合 ⊆ 登録済み集合」をチェック
//! - 不足があれば BuildError::MissingVariants を返す

use super::config::RektConfig;
use super::context::Rekt;
use crate::domain::ErrorSpec;
use crate::error::{ConfigError, RektError};
use crate::handlers::ErrorHandler;
use crate::ports::Logger;

/// RektBuilder は Rekt を構築
///
/// # 使用例
/// ```ignore
/// let rekt = RektBuilder::new()
///     .register_error(ErrorSpec::named("PaymentFailed").with_status(402))
///     .handler("PaymentFailed", |err: &ErrorInstance| eprintln!("{err}"))
///     .expect_errors(&["PaymentFailed", "NotFound"])
///     .build()?;
/// ```
#[derive(Default)]
pub struct RektBuilder {
    config: RektConfig,
    errors: Vec<ErrorSpec>,
    handlers: Vec<(String, Box<dyn ErrorHandler>)>,
    logger: Option<Box<dyn Logger>>,
    expected_errors: Option<Vec<String>>,
}

/// BuildError はコンテキスト構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error("invalid handler: {0}")]
    Handler(#[from] RektError),

    #[error("Missing errors: {0:?}. These errors were expected but not registered.")]
    MissingVariants(Vec<String>),
}

impl RektBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 設定を適用（`config.errors` は register_error() の分より先に登録）
    pub fn config(mut self, config: RektConfig) -> Self {
        self.config = config;
        self
    }

    pub fn register_error(mut self, spec: ErrorSpec) -> Self {
        self.errors.push(spec);
        self
    }

    pub fn handler(mut self, name: impl Into<String>, handler: impl ErrorHandler + 'static) -> Self {
        self.handlers.push((name.into(), Box::new(handler)));
        self
    }

    pub fn logger(mut self, logger: impl Logger + 'static) -> Self {
        self.logger = Some(Box::new(logger));
        self
    }

    pub fn expect_errors(mut self, names: &[&str]) -> Self {
        self.expected_errors = Some(names.iter().map(|name| name.to_string()).collect());
        self
    }

    pub fn build(self) -> Result<Rekt, BuildError> {
        let mut rekt = Rekt::from_config(self.config)?;
        if let Some(logger) = self.logger {
            rekt.set_logger(BoxedLogger(logger));
        }
        for spec in self.errors {
            rekt.register_error(spec)?;
        }
        for (name, handler) in self.handlers {
            rekt.set_handler(&name, BoxedHandler(handler))?;
        }

        if let Some(expected) = &self.expected_errors {
            let missing: Vec<String> = expected
                .iter()
                .filter(|name| !rekt.registry().contains(name))
                .cloned()
                .collect();
            if !missing.is_empty() {
                return Err(BuildError::MissingVariants(missing));
            }
        }
        Ok(rekt)
    }
}

struct BoxedLogger(Box<dyn Logger>);

impl Logger for BoxedLogger {
    fn log(&self, level: tracing::Level, message: &str) {
        self.0.log(level, message)
    }
}

struct BoxedHandler(Box<dyn ErrorHandler>);

impl ErrorHandler for BoxedHandler {
    fn handle(&self, err: &crate::domain::ErrorInstance, logger: &dyn Logger) {
        self.0.handle(err, logger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorInstance;
    use crate::registry::ASSERT_ERROR;

    #[test]
    fn test_build_success() {
        let rekt = RektBuilder::new()
            .register_error(ErrorSpec::named("PaymentFailed").with_status(402))
            .expect_errors(&["PaymentFailed", "NotFound", ASSERT_ERROR])
            .build();
        assert!(rekt.is_ok());
    }

    #[test]
    fn test_build_missing_variants() {
        let rekt = RektBuilder::new()
            .register_error(ErrorSpec::named("PaymentFailed"))
            .expect_errors(&["PaymentFailed", "Throttled"])
            .build();
        assert!(matches!(
            rekt,
            Err(BuildError::MissingVariants(missing)) if missing == vec!["Throttled".to_string()]
        ));
    }

    #[test]
    fn test_build_nameless_error() {
        let rekt = RektBuilder::new()
            .register_error(ErrorSpec::default().with_status(800))
            .build();
        assert!(matches!(rekt, Err(BuildError::Configuration(ConfigError::MissingName))));
    }

    #[test]
    fn test_build_wires_handlers_and_logger() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let handled = Rc::new(RefCell::new(0));
        let logged = Rc::new(RefCell::new(0));
        let (h, l) = (Rc::clone(&handled), Rc::clone(&logged));

        let rekt = RektBuilder::new()
            .handler("NotFound", move |_: &ErrorInstance| *h.borrow_mut() += 1)
            .logger(move |_: tracing::Level, _: &str| *l.borrow_mut() += 1)
            .build()
            .unwrap();

        let err = rekt.error("NotFound", "missing").unwrap();
        rekt.dispatch("NotFound", &err).unwrap();

        assert_eq!(*handled.borrow(), 1);
        assert!(*logged.borrow() >= 1);
    }

    #[test]
    fn test_build_empty_handler_name() {
        let rekt = RektBuilder::new().handler("", |_: &ErrorInstance| {}).build();
        assert!(matches!(rekt, Err(BuildError::Handler(RektError::Raised(_)))));
    }
}
