//! App - コンテキストの構築と公開 API
//!
//! # 主要コンポーネント
//! - **Rekt**: registry・handler・logger をまとめたコンテキスト
//! - **RektBuilder**: 構築と起動時検証
//! - **RektConfig**: JSON 設定

pub mod builder;
pub mod config;
pub mod context;

pub use self::builder::{BuildError, RektBuilder};
pub use self::config::RektConfig;
pub use self::context::Rekt;
