//! Logger port - 診断出力の抽象化
//!
//! コンテキストが持つ唯一の出力先です。`Rekt::set_logger` で差し替えられます。
//!
//! # 実装
//! - `TracingLogger`: デフォルト（`tracing` のマクロへ転送）
//! - `Fn(Level, &str)`: クロージャはそのまま Logger として使える

use tracing::Level;

/// Logger は診断メッセージを受け取る
pub trait Logger {
    fn log(&self, level: Level, message: &str);
}

impl<F> Logger for F
where
    F: Fn(Level, &str),
{
    fn log(&self, level: Level, message: &str) {
        self(level, message)
    }
}

/// Forwards to the `tracing` macros under the `rekt` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::ERROR => tracing::error!(target: "rekt", "{message}"),
            Level::WARN => tracing::warn!(target: "rekt", "{message}"),
            Level::INFO => tracing::info!(target: "rekt", "{message}"),
            Level::DEBUG => tracing::debug!(target: "rekt", "{message}"),
            _ => tracing::trace!(target: "rekt", "{message}"),
        }
    }
}
