//! rekt-core
//!
//! Named, status-coded errors and runtime assertions for request-handling code.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ErrorName, ErrorVariant, ErrorInstance, Disposition）
//! - **registry**: name -> variant のテーブル（組み込み HTTP エラー + AssertError）
//! - **assertion**: assertion engine（明示エラー > 合成メッセージ > デフォルト）
//! - **handlers**: 名前付き handler の登録と dispatch
//! - **ports**: Logger trait（デフォルトは tracing）
//! - **app**: Rekt コンテキスト、RektBuilder、RektConfig
//!
//! # Example
//! ```
//! use rekt_core::{AssertOptions, ErrorSpec, Rekt};
//!
//! let mut rekt = Rekt::new();
//! rekt.register_error(ErrorSpec::named("PaymentFailed").with_status(402)).unwrap();
//!
//! let err = rekt.assert(false, AssertOptions::new().part("card").part("declined")).unwrap_err();
//! assert_eq!(err.message(), Some("card declined"));
//! assert_eq!(rekt.error("PaymentFailed", "x").unwrap().status(), 402);
//! ```

pub mod app;
pub mod assertion;
pub mod domain;
pub mod error;
pub mod handlers;
mod macros;
pub mod ports;
pub mod registry;

pub use self::app::{BuildError, Rekt, RektBuilder, RektConfig};
pub use self::assertion::{AssertOptions, Assertion, MessagePart};
pub use self::domain::{Disposition, ErrorInstance, ErrorName, ErrorSpec, ErrorVariant, Reportable};
pub use self::error::{ConfigError, RektError};
pub use self::handlers::{ErrorHandler, HandlerRegistry, LoggingHandler};
pub use self::ports::{Logger, TracingLogger};
pub use self::registry::{ASSERT_ERROR, ErrorRegistry, OverwritePolicy};
