//! ErrorRegistry - エラー variant の登録と管理
//!
//! # 設計
//! - name -> ErrorVariant の HashMap（型を実行時に生成する代わりのタグ付きテーブル）
//! - 生成時に組み込みの variant（`AssertError` + HTTP 400–410）を登録済み
//! - 削除はしない（プロセス寿命の間、追加と上書きのみ）
//! - 同名の再登録はデフォルトで上書き（last-write-wins）。`OverwritePolicy::Reject` で拒否できる

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{DEFAULT_STATUS, ErrorInstance, ErrorSpec, ErrorVariant};
use crate::error::{ConfigError, RektError};

/// Name of the variant raised by failed assertions.
pub const ASSERT_ERROR: &str = "AssertError";

/// Bootstrap table, registered in this order.
pub const BUILTIN_VARIANTS: &[(&str, u16)] = &[
    (ASSERT_ERROR, 500),
    ("BadRequest", 400),
    ("Unauthorized", 401),
    ("PaymentRequired", 402),
    ("Forbidden", 403),
    ("NotFound", 404),
    ("MethodNotAllowed", 405),
    ("NotAcceptable", 406),
    ("ProxyAuthRequired", 407),
    ("ClientTimeout", 408),
    ("Conflict", 409),
    ("ResourceGone", 410),
];

/// What to do when a name is registered twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverwritePolicy {
    /// Last write wins.
    #[default]
    Replace,
    /// Fail with `ConfigError::DuplicateVariant`.
    Reject,
}

/// ErrorRegistry は name -> variant のテーブル
#[derive(Debug, Clone)]
pub struct ErrorRegistry {
    variants: HashMap<String, ErrorVariant>,
    policy: OverwritePolicy,
}

impl ErrorRegistry {
    /// 組み込み variant を登録済みの registry を作成
    pub fn new() -> Self {
        Self::with_policy(OverwritePolicy::default())
    }

    pub fn with_policy(policy: OverwritePolicy) -> Self {
        let mut registry = Self {
            variants: HashMap::new(),
            policy,
        };
        registry.bootstrap();
        registry
    }

    /// Built-ins bypass the overwrite policy.
    fn bootstrap(&mut self) {
        for &(name, status) in BUILTIN_VARIANTS {
            let variant = ErrorSpec::named(name).with_status(status).into_variant();
            debug_assert!(variant.is_ok(), "invalid built-in variant `{name}`");
            if let Ok(variant) = variant {
                self.variants.insert(name.to_string(), variant);
            }
        }
    }

    pub fn policy(&self) -> OverwritePolicy {
        self.policy
    }

    /// variant を登録
    ///
    /// 上書きした場合は以前の variant を返します。
    pub fn register(&mut self, spec: ErrorSpec) -> Result<Option<ErrorVariant>, ConfigError> {
        let variant = spec.into_variant()?;
        let key = variant.name().to_string();
        if self.policy == OverwritePolicy::Reject && self.variants.contains_key(&key) {
            return Err(ConfigError::DuplicateVariant(key));
        }
        Ok(self.variants.insert(key, variant))
    }

    pub fn get(&self, name: &str) -> Option<&ErrorVariant> {
        self.variants.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variants.contains_key(name)
    }

    /// Factory: build an instance of the variant registered under `name`.
    pub fn construct(
        &self,
        name: &str,
        message: impl Into<String>,
    ) -> Result<ErrorInstance, RektError> {
        self.get(name)
            .map(|variant| variant.instance(message))
            .ok_or_else(|| RektError::UnknownVariant(name.to_string()))
    }

    /// Build the assertion failure for `message`.
    ///
    /// `AssertError` is registered at bootstrap and never removed; the
    /// fallback keeps this infallible.
    pub fn assert_error(&self, message: impl Into<String>) -> ErrorInstance {
        match self.get(ASSERT_ERROR) {
            Some(variant) => variant.instance(message),
            None => ErrorInstance::new(ASSERT_ERROR, DEFAULT_STATUS, Some(message.into())),
        }
    }

    /// 登録済みの名前（ソート済み）
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.variants.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Drop every ad hoc variant and restore the built-ins.
    pub fn reset(&mut self) {
        self.variants.clear();
        self.bootstrap();
    }
}

impl Default for ErrorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
