//! Rekt - エラー registry・handler・logger をまとめるコンテキスト
//!
//! モジュールレベルのシングルトンの代わりに、明示的なオブジェクトとして
//! 生成して参照で渡します。
//!
//! # スレッドモデル
//! - 同期・シングルスレッド前提（内部に lock はない）
//! - 複数スレッドから使う場合は、埋め込む側で保護すること

use tracing::Level;

use super::config::RektConfig;
use crate::assertion::{self, AssertOptions, Assertion};
use crate::domain::{Disposition, ErrorInstance, ErrorSpec, ErrorVariant};
use crate::error::{ConfigError, RektError};
use crate::handlers::{ErrorHandler, HandlerRegistry};
use crate::ports::{Logger, TracingLogger};
use crate::registry::ErrorRegistry;

pub struct Rekt {
    registry: ErrorRegistry,
    handlers: HandlerRegistry,
    logger: Box<dyn Logger>,
    default_message: String,
}

impl Rekt {
    /// 組み込み variant とデフォルト handler を持つコンテキストを作成
    pub fn new() -> Self {
        let config = RektConfig::default();
        Self::bootstrapped(&config)
    }

    fn bootstrapped(config: &RektConfig) -> Self {
        Self {
            registry: ErrorRegistry::with_policy(config.overwrite),
            handlers: HandlerRegistry::with_defaults(),
            logger: Box::new(TracingLogger),
            default_message: config.default_message.clone(),
        }
    }

    /// 設定からコンテキストを作成
    ///
    /// `config.errors` は組み込みの後に順番に登録されます。
    pub fn from_config(config: RektConfig) -> Result<Self, ConfigError> {
        let mut rekt = Self::bootstrapped(&config);
        for spec in config.errors {
            rekt.register_error(spec)?;
        }
        Ok(rekt)
    }

    pub fn registry(&self) -> &ErrorRegistry {
        &self.registry
    }

    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    pub fn default_message(&self) -> &str {
        &self.default_message
    }

    /// Write to the current diagnostic sink.
    pub fn log(&self, level: Level, message: &str) {
        self.logger.log(level, message);
    }

    pub fn set_logger(&mut self, logger: impl Logger + 'static) {
        self.logger = Box::new(logger);
    }

    /// variant を登録（同名は上書き、`OverwritePolicy::Reject` の場合はエラー）
    pub fn register_error(&mut self, spec: ErrorSpec) -> Result<(), ConfigError> {
        let name = spec.name.clone().unwrap_or_default();
        let replaced = self.registry.register(spec)?;
        if let Some(previous) = replaced.map(|variant| variant.status()) {
            let current = self.registry.get(&name).map(ErrorVariant::status).unwrap_or_default();
            self.log(
                Level::WARN,
                &format!("error `{name}` re-registered: status {previous} -> {current}"),
            );
        }
        Ok(())
    }

    pub fn variant(&self, name: &str) -> Option<&ErrorVariant> {
        self.registry.get(name)
    }

    /// Construct an instance of the variant registered under `name`.
    pub fn error(&self, name: &str, message: impl Into<String>) -> Result<ErrorInstance, RektError> {
        self.registry.construct(name, message)
    }

    /// Check `condition`; see [`crate::assertion`] for how failures resolve.
    pub fn assert(
        &self,
        condition: bool,
        options: AssertOptions<'_>,
    ) -> Result<Assertion, ErrorInstance> {
        let result = assertion::evaluate(&self.registry, &self.default_message, condition, options);
        match &result {
            Ok(Assertion::Passed) => {}
            Ok(Assertion::Handled) => self.log(Level::DEBUG, "assertion failed; handed to callback"),
            Err(err) => self.log(Level::DEBUG, &format!("assertion failed: {err}")),
        }
        result
    }

    /// handler を登録（同名は置き換え）
    ///
    /// 名前の検証は assertion engine 経由で行うため、空の名前は `AssertError` になります。
    pub fn set_handler(
        &mut self,
        name: &str,
        handler: impl ErrorHandler + 'static,
    ) -> Result<(), RektError> {
        self.assert(
            !name.trim().is_empty(),
            AssertOptions::message("handler name must be a non-empty string"),
        )?;
        if self.handlers.set(name, handler) {
            self.log(Level::DEBUG, &format!("handler for `{name}` replaced"));
        }
        Ok(())
    }

    /// 名前で handler を引いて呼び出す
    ///
    /// 戻り値はエラーの分類。プロセスを終了するかどうかは呼び出し側が決めます。
    pub fn dispatch(&self, name: &str, err: &ErrorInstance) -> Result<Disposition, RektError> {
        self.assert(
            !name.trim().is_empty(),
            AssertOptions::message("handler name must be a non-empty string"),
        )?;
        self.log(Level::DEBUG, &format!("dispatching `{}` to handler `{name}`", err.name()));
        self.handlers.dispatch(name, err, &*self.logger)?;
        Ok(Disposition::of(err))
    }

    /// Restore the built-in variants and default handlers.
    ///
    /// The logger and default message are kept.
    pub fn reset(&mut self) {
        self.registry.reset();
        self.handlers = HandlerRegistry::with_defaults();
        self.log(Level::INFO, "registry reset to built-ins");
    }
}

impl Default for Rekt {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ASSERT_ERROR, BUILTIN_VARIANTS, OverwritePolicy};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn capture_logs(rekt: &mut Rekt) -> Rc<RefCell<Vec<(Level, String)>>> {
        let logs = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&logs);
        rekt.set_logger(move |level: Level, message: &str| {
            sink.borrow_mut().push((level, message.to_string()))
        });
        logs
    }

    #[test]
    fn new_context_is_bootstrapped() {
        let rekt = Rekt::new();
        assert_eq!(rekt.registry().len(), BUILTIN_VARIANTS.len());
        assert!(rekt.handlers().contains(ASSERT_ERROR));
        assert_eq!(rekt.error("NotFound", "x").unwrap().status(), 404);
        assert_eq!(rekt.error("Conflict", "x").unwrap().status(), 409);
    }

    #[test]
    fn registered_error_round_trips() {
        let mut rekt = Rekt::new();
        rekt.register_error(ErrorSpec::named("TestError").with_status(800))
            .unwrap();

        let err = rekt.error("TestError", "Hello").unwrap();
        assert_eq!(err.name(), "TestError");
        assert_eq!(err.status(), 800);
        assert_eq!(err.message(), Some("Hello"));
    }

    #[test]
    fn overwrite_is_logged_and_last_write_wins() {
        let mut rekt = Rekt::new();
        let logs = capture_logs(&mut rekt);

        rekt.register_error(ErrorSpec::named("Quota").with_status(429)).unwrap();
        rekt.register_error(ErrorSpec::named("Quota").with_status(503)).unwrap();

        assert_eq!(rekt.error("Quota", "m").unwrap().status(), 503);
        let logs = logs.borrow();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].0, Level::WARN);
        assert!(logs[0].1.contains("429 -> 503"));
    }

    #[test]
    fn assert_true_has_no_side_effects() {
        let mut rekt = Rekt::new();
        let logs = capture_logs(&mut rekt);

        let result = rekt.assert(true, AssertOptions::new().part(1).part("ignored"));
        assert!(result.unwrap().passed());
        assert!(logs.borrow().is_empty());
    }

    #[test]
    fn assert_false_is_logged() {
        let mut rekt = Rekt::new();
        let logs = capture_logs(&mut rekt);

        let err = rekt.assert(false, AssertOptions::message("This is a test!")).unwrap_err();
        assert_eq!(err.message(), Some("This is a test!"));
        assert_eq!(logs.borrow()[0].0, Level::DEBUG);
    }

    #[test]
    fn dispatch_reports_disposition() {
        let mut rekt = Rekt::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        rekt.set_handler("NotFound", move |err: &ErrorInstance| {
            sink.borrow_mut().push(err.status())
        })
        .unwrap();

        let err = rekt.error("NotFound", "no user").unwrap();
        assert_eq!(rekt.dispatch("NotFound", &err).unwrap(), Disposition::Recoverable);

        let fatal = rekt.registry().assert_error("broken invariant");
        rekt.set_handler(ASSERT_ERROR, |_: &ErrorInstance| {}).unwrap();
        assert_eq!(rekt.dispatch(ASSERT_ERROR, &fatal).unwrap(), Disposition::Fatal);

        assert_eq!(*seen.borrow(), vec![404]);
    }

    #[test]
    fn blank_dispatch_name_fails_through_the_engine() {
        let mut rekt = Rekt::new();
        let ran = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&ran);
        rekt.set_handler("NotFound", move |_: &ErrorInstance| *flag.borrow_mut() = true)
            .unwrap();

        let err = rekt.error("NotFound", "no user").unwrap();
        for name in ["", "   "] {
            let result = rekt.dispatch(name, &err);
            assert!(matches!(
                result,
                Err(RektError::Raised(e)) if e.name() == ASSERT_ERROR
            ));
        }
        assert!(!*ran.borrow());
    }

    #[test]
    fn default_assert_handler_uses_installed_logger() {
        let mut rekt = Rekt::new();
        let logs = capture_logs(&mut rekt);

        let err = rekt.registry().assert_error("broken invariant");
        assert_eq!(rekt.dispatch(ASSERT_ERROR, &err).unwrap(), Disposition::Fatal);

        let logs = logs.borrow();
        assert!(logs.iter().any(|(level, message)| {
            *level == Level::ERROR && message.contains("AssertError (500): broken invariant")
        }));
    }

    #[test]
    fn dispatch_without_handler_fails() {
        let rekt = Rekt::new();
        let err = rekt.error("Conflict", "dup").unwrap();
        let result = rekt.dispatch("Conflict", &err);
        assert!(matches!(result, Err(RektError::HandlerNotFound(n)) if n == "Conflict"));
    }

    #[test]
    fn empty_handler_name_fails_through_the_engine() {
        let mut rekt = Rekt::new();
        let err = rekt.set_handler("", |_: &ErrorInstance| {}).unwrap_err();
        let inst = err.instance().unwrap();
        assert_eq!(inst.name(), ASSERT_ERROR);
        assert!(!rekt.handlers().contains(""));
    }

    #[test]
    fn from_config_applies_policy_and_errors() {
        let config = RektConfig {
            overwrite: OverwritePolicy::Reject,
            default_message: "invariant violated".into(),
            errors: vec![ErrorSpec::named("PaymentFailed").with_status(402)],
        };
        let mut rekt = Rekt::from_config(config).unwrap();

        assert_eq!(rekt.error("PaymentFailed", "card").unwrap().status(), 402);
        let err = rekt.assert(false, AssertOptions::new()).unwrap_err();
        assert_eq!(err.message(), Some("invariant violated"));
        assert!(matches!(
            rekt.register_error(ErrorSpec::named("PaymentFailed")),
            Err(ConfigError::DuplicateVariant(_))
        ));
    }

    #[test]
    fn from_config_rejects_nameless_errors() {
        let config = RektConfig {
            errors: vec![ErrorSpec::default().with_status(800)],
            ..RektConfig::default()
        };
        assert!(matches!(Rekt::from_config(config), Err(ConfigError::MissingName)));
    }

    #[test]
    fn reset_restores_builtins_and_default_handlers() {
        let mut rekt = Rekt::new();
        rekt.register_error(ErrorSpec::named("Extra")).unwrap();
        rekt.set_handler("Extra", |_: &ErrorInstance| {}).unwrap();

        rekt.reset();

        assert!(rekt.variant("Extra").is_none());
        assert!(!rekt.handlers().contains("Extra"));
        assert!(rekt.handlers().contains(ASSERT_ERROR));
        assert_eq!(rekt.registry().len(), BUILTIN_VARIANTS.len());
    }
}
