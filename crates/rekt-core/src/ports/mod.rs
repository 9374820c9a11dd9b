//! Ports - 外部コラボレーターへの抽象化レイヤー
//!
//! ライブラリ自身はログの出力先を決めません。
//! 出力先は `Logger` trait の実装として外から渡されます。

pub mod logger;

pub use self::logger::{Logger, TracingLogger};
