//! Error reporting shared by every module
//!
//! Errors that a user can fix (bad configuration, bad arguments) are reported
//! with their own message; anything else is reported with the operation that
//! failed, and the full error goes to the debug log.

/// Distinguishes user-correctable errors from system failures
///
/// When `is_user_actionable()` is true, `user_message()` must return
/// `Some(message)`; otherwise it returns `None`.
pub trait ContextualError: std::error::Error {
    fn is_user_actionable(&self) -> bool;

    fn user_message(&self) -> Option<&str>;
}

/// The line shown to the user for `error` raised while doing `operation_context`
pub fn fatal_message<E: ContextualError + ?Sized>(error: &E, operation_context: &str) -> String {
    match error.user_message() {
        Some(message) if error.is_user_actionable() => message.to_string(),
        _ => operation_context.to_string(),
    }
}

/// Log a fatal error: a `FATAL:` line at error level, the details at debug
pub fn log_error_with_context<E>(error: &E, operation_context: &str)
where
    E: ContextualError + std::fmt::Debug,
{
    log::error!("FATAL: {}", fatal_message(error, operation_context));
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}
