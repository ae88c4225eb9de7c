//! Global logging for the tokenizer/parser pipeline
//!
//! Observability only: the entry points report failures through their
//! return values and never rely on logging for control flow. When the
//! global logger has not been initialized, every logging call is a silent
//! no-op, so library consumers see no output unless they opt in.

pub mod codes;
pub mod events;
pub mod macros;
pub mod service;

use std::sync::{Arc, OnceLock};

// Re-export main types
pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

use crate::utils::Span;

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging to stderr at the given level
pub fn init_global_logging(min_level: LogLevel) -> Result<(), String> {
    let service = Arc::new(LoggingService::new(Arc::new(ConsoleLogger), min_level));
    init_global_logging_with_service(service)
}

/// Initialize with a custom service (primarily for tests and embedders)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())?;

    if let Some(service) = try_get_global_logger() {
        service.log_event(LogEvent::success(
            codes::success::LOGGING_READY,
            "Global logging initialized",
        ));
    }
    Ok(())
}

/// Check if global logging is initialized
pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

/// Safe access to the global logger
pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

// ============================================================================
// MACRO SUPPORT
// ============================================================================

fn emit(event: LogEvent) {
    if let Some(service) = try_get_global_logger() {
        service.log_event(event);
    }
}

fn with_context(mut event: LogEvent, context: Vec<(&str, String)>) -> LogEvent {
    for (key, value) in context {
        event = event.with_context(key, &value);
    }
    event
}

pub fn log_error_with_context(
    code: Code,
    message: &str,
    span: Option<Span>,
    context: Vec<(&str, String)>,
) {
    let mut event = LogEvent::error(code, message);
    if let Some(span) = span {
        event = event.with_span(span);
    }
    emit(with_context(event, context));
}

pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, String)>) {
    emit(with_context(LogEvent::success(code, message), context));
}

pub fn log_info_with_context(message: &str, context: Vec<(&str, String)>) {
    emit(with_context(LogEvent::info(message), context));
}

pub fn log_warning_with_context(message: &str, context: Vec<(&str, String)>) {
    emit(with_context(LogEvent::warning(message), context));
}

pub fn log_debug_with_context(message: &str, context: Vec<(&str, String)>) {
    emit(with_context(LogEvent::debug(message), context));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uninitialized_logging_is_a_noop() {
        // Must not panic even when no logger has been installed
        log_debug_with_context("quiet", vec![]);
        log_error_with_context(
            codes::syntax::UNEXPECTED_TOKEN,
            "quiet",
            None,
            vec![("k", "v".to_string())],
        );
    }
}
