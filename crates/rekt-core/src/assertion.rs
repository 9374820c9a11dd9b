//! Assertion engine.
//!
//! An assertion checks a condition and, on failure, resolves the error to
//! surface in this order:
//!
//! 1. an explicit error supplied by the caller, returned untouched (either
//!    `AssertOptions::error` or a realized `ErrorInstance` as the first part);
//! 2. an `AssertError` whose message joins the supplied message parts;
//! 3. an `AssertError` carrying the default message.
//!
//! The resolved error is handed to the `on_failure` callback when one is set,
//! otherwise it is returned as `Err`. An explicit error is always returned as
//! `Err`, even if a callback is present.

use std::error::Error as StdError;
use std::fmt::{self, Write as _};

use crate::domain::ErrorInstance;
use crate::registry::ErrorRegistry;

/// Message used when a failed assertion has no message parts.
pub const DEFAULT_MESSAGE: &str = "Assert Error";

/// Placeholder for an error whose `Display` implementation fails.
pub const CONVERSION_PLACEHOLDER: &str = "[Error converting to String]";

/// One piece of failure context.
pub enum MessagePart {
    Text(String),
    /// A realized error. Raised as is when it is the first part, rendered
    /// through `Display` otherwise.
    Instance(ErrorInstance),
    /// Rendered through `Display`.
    Error(Box<dyn StdError>),
    /// A value with no text form. Contributes nothing to the message.
    Opaque,
}

impl MessagePart {
    pub fn error(err: impl StdError + 'static) -> Self {
        MessagePart::Error(Box::new(err))
    }

    /// Text contributed to the failure message. Never fails.
    pub fn render(&self) -> Option<String> {
        match self {
            MessagePart::Text(text) => Some(text.clone()),
            MessagePart::Instance(err) => Some(display_or_placeholder(err)),
            MessagePart::Error(err) => Some(display_or_placeholder(err)),
            MessagePart::Opaque => None,
        }
    }
}

fn display_or_placeholder(value: &dyn fmt::Display) -> String {
    let mut out = String::new();
    match write!(out, "{value}") {
        Ok(()) => out,
        Err(_) => CONVERSION_PLACEHOLDER.to_string(),
    }
}

impl fmt::Debug for MessagePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessagePart::Text(text) => f.debug_tuple("Text").field(text).finish(),
            MessagePart::Instance(err) => f.debug_tuple("Instance").field(err).finish(),
            MessagePart::Error(err) => f.debug_tuple("Error").field(err).finish(),
            MessagePart::Opaque => f.write_str("Opaque"),
        }
    }
}

impl From<&str> for MessagePart {
    fn from(text: &str) -> Self {
        MessagePart::Text(text.to_string())
    }
}

impl From<String> for MessagePart {
    fn from(text: String) -> Self {
        MessagePart::Text(text)
    }
}

impl From<ErrorInstance> for MessagePart {
    fn from(err: ErrorInstance) -> Self {
        MessagePart::Instance(err)
    }
}

macro_rules! opaque_parts {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for MessagePart {
                fn from(_: $ty) -> Self {
                    MessagePart::Opaque
                }
            }
        )*
    };
}

opaque_parts!(bool, i32, i64, u16, u32, u64, usize, f64);

/// Failure context for a single assertion.
#[derive(Default)]
pub struct AssertOptions<'a> {
    error: Option<ErrorInstance>,
    parts: Vec<MessagePart>,
    on_failure: Option<Box<dyn FnOnce(ErrorInstance) + 'a>>,
}

impl<'a> AssertOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a single text part.
    pub fn message(text: impl Into<String>) -> Self {
        Self::new().part(text.into())
    }

    /// Error to return as is when the condition fails.
    pub fn error(mut self, err: ErrorInstance) -> Self {
        self.error = Some(err);
        self
    }

    pub fn part(mut self, part: impl Into<MessagePart>) -> Self {
        self.parts.push(part.into());
        self
    }

    pub fn parts<I, P>(mut self, parts: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<MessagePart>,
    {
        self.parts.extend(parts.into_iter().map(Into::into));
        self
    }

    /// Receive the synthesized error instead of getting it back as `Err`.
    pub fn on_failure(mut self, callback: impl FnOnce(ErrorInstance) + 'a) -> Self {
        self.on_failure = Some(Box::new(callback));
        self
    }
}

impl fmt::Debug for AssertOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssertOptions")
            .field("error", &self.error)
            .field("parts", &self.parts)
            .field("on_failure", &self.on_failure.is_some())
            .finish()
    }
}

/// Result of an assertion that did not return `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assertion {
    /// The condition held.
    Passed,
    /// The condition failed and the error went to the `on_failure` callback.
    Handled,
}

impl Assertion {
    pub fn passed(self) -> bool {
        self == Assertion::Passed
    }
}

/// Join the rendered parts with single spaces, or fall back to `default`.
pub fn synthesize_message(parts: &[MessagePart], default: &str) -> String {
    let rendered: Vec<String> = parts.iter().filter_map(MessagePart::render).collect();
    if rendered.is_empty() {
        default.to_string()
    } else {
        rendered.join(" ")
    }
}

/// Take the first part out when it is a realized error.
fn leading_instance(parts: &mut Vec<MessagePart>) -> Option<ErrorInstance> {
    if !matches!(parts.first(), Some(MessagePart::Instance(_))) {
        return None;
    }
    match parts.remove(0) {
        MessagePart::Instance(err) => Some(err),
        _ => None,
    }
}

/// Evaluate one assertion against `registry`.
pub fn evaluate(
    registry: &ErrorRegistry,
    default_message: &str,
    condition: bool,
    options: AssertOptions<'_>,
) -> Result<Assertion, ErrorInstance> {
    if condition {
        return Ok(Assertion::Passed);
    }

    let AssertOptions {
        error,
        mut parts,
        on_failure,
    } = options;

    if let Some(err) = error.or_else(|| leading_instance(&mut parts)) {
        return Err(err);
    }

    let err = registry.assert_error(synthesize_message(&parts, default_message));
    match on_failure {
        Some(callback) => {
            callback(err);
            Ok(Assertion::Handled)
        }
        None => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorSpec;
    use std::cell::RefCell;

    struct Unprintable;

    impl fmt::Debug for Unprintable {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("Unprintable")
        }
    }

    impl fmt::Display for Unprintable {
        fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    impl StdError for Unprintable {}

    fn check(condition: bool, options: AssertOptions<'_>) -> Result<Assertion, ErrorInstance> {
        evaluate(&ErrorRegistry::new(), DEFAULT_MESSAGE, condition, options)
    }

    #[test]
    fn true_condition_passes_regardless_of_context() {
        let called = RefCell::new(false);
        let options = AssertOptions::new()
            .part(42)
            .part(MessagePart::error(Unprintable))
            .on_failure(|_| *called.borrow_mut() = true);

        assert_eq!(check(true, options).unwrap(), Assertion::Passed);
        assert!(!*called.borrow());
    }

    #[test]
    fn bare_failure_uses_default_message() {
        let err = check(false, AssertOptions::new()).unwrap_err();
        assert_eq!(err.name(), "AssertError");
        assert_eq!(err.status(), 500);
        assert_eq!(err.message(), Some(DEFAULT_MESSAGE));
    }

    #[test]
    fn parts_are_space_joined_in_order() {
        let err = check(false, AssertOptions::new().part("a").part("b")).unwrap_err();
        assert_eq!(err.message(), Some("a b"));
    }

    #[test]
    fn opaque_parts_are_dropped() {
        let err = check(false, AssertOptions::new().part(7).part("only text")).unwrap_err();
        assert_eq!(err.message(), Some("only text"));

        let err = check(false, AssertOptions::new().part(3.5)).unwrap_err();
        assert_eq!(err.message(), Some(DEFAULT_MESSAGE));
    }

    #[test]
    fn errors_in_parts_are_rendered() {
        let registry = ErrorRegistry::new();
        let inner = registry.construct("NotFound", "user 7").unwrap();
        let err = check(false, AssertOptions::new().part("lookup failed:").part(inner)).unwrap_err();
        assert_eq!(err.message(), Some("lookup failed: NotFound (404): user 7"));
    }

    #[test]
    fn failing_display_becomes_placeholder() {
        let err = check(false, AssertOptions::new().part(MessagePart::error(Unprintable))).unwrap_err();
        assert_eq!(err.message(), Some(CONVERSION_PLACEHOLDER));
    }

    #[test]
    fn explicit_error_is_returned_unchanged() {
        let mut registry = ErrorRegistry::new();
        registry.register(ErrorSpec::named("Quota").with_status(429)).unwrap();
        let explicit = registry.construct("Quota", "slow down").unwrap();

        let err = evaluate(
            &registry,
            DEFAULT_MESSAGE,
            false,
            AssertOptions::new().error(explicit.clone()).part("ignored"),
        )
        .unwrap_err();
        assert_eq!(err, explicit);
    }

    #[test]
    fn leading_instance_is_returned_unchanged() {
        let existing = ErrorRegistry::new().construct("NotFound", "user 7").unwrap();
        let called = RefCell::new(false);
        let options = AssertOptions::new()
            .part(existing.clone())
            .part("ignored")
            .on_failure(|_| *called.borrow_mut() = true);

        assert_eq!(check(false, options).unwrap_err(), existing);
        assert!(!*called.borrow());
    }

    #[test]
    fn explicit_error_wins_over_callback() {
        let called = RefCell::new(false);
        let explicit = ErrorRegistry::new().construct("Conflict", "taken").unwrap();
        let options = AssertOptions::new()
            .error(explicit.clone())
            .on_failure(|_| *called.borrow_mut() = true);

        assert_eq!(check(false, options).unwrap_err(), explicit);
        assert!(!*called.borrow());
    }

    #[test]
    fn callback_receives_synthesized_error() {
        let received = RefCell::new(None);
        let options = AssertOptions::message("quota exceeded")
            .on_failure(|err| *received.borrow_mut() = Some(err));

        assert_eq!(check(false, options).unwrap(), Assertion::Handled);
        let err = received.into_inner().unwrap();
        assert_eq!(err.name(), "AssertError");
        assert_eq!(err.message(), Some("quota exceeded"));
    }

    #[test]
    fn custom_default_message() {
        let err = evaluate(&ErrorRegistry::new(), "invariant violated", false, AssertOptions::new())
            .unwrap_err();
        assert_eq!(err.message(), Some("invariant violated"));
    }
}
