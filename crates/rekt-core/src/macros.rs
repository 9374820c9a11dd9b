/// Variadic front end for [`Rekt::assert`](crate::Rekt::assert).
///
/// Every argument after the condition becomes a message part, so
/// `ensure!(rekt, ok, "user", id, "not found")` keeps the strings and drops
/// the number. A realized `ErrorInstance` in first position is returned as
/// is: `ensure!(rekt, found, rekt.error("NotFound", "user 7")?)` fails with
/// that 404, not an `AssertError`. Use [`AssertOptions`](crate::AssertOptions)
/// directly for an `on_failure` callback.
#[macro_export]
macro_rules! ensure {
    ($rekt:expr, $cond:expr $(,)?) => {
        $rekt.assert($cond, $crate::assertion::AssertOptions::new())
    };
    ($rekt:expr, $cond:expr, $($part:expr),+ $(,)?) => {
        $rekt.assert($cond, $crate::assertion::AssertOptions::new()$(.part($part))+)
    };
}
