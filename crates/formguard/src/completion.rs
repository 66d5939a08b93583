//! Callback completion surface
//!
//! `validate()` is async and returns a `Result`. Callers that prefer a
//! completion callback use the `validate_then` variants, which await the
//! same future and hand the result to [`notify`] before returning it. Both
//! surfaces therefore always observe the same outcome.

/// Hands a borrowed view of `result` to `callback`, then returns `result`.
pub fn notify<T, E, F>(result: Result<T, E>, callback: F) -> Result<T, E>
where
    F: FnOnce(Result<&T, &E>),
{
    callback(result.as_ref());
    result
}
