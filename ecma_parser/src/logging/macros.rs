//! Logging macros accepting Display context values

/// Log an error event with code, optional span, and key/value context
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr) => {
        $crate::logging::log_error_with_context($code, $message, None, vec![])
    };

    ($code:expr, $message:expr, span = $span:expr) => {
        $crate::logging::log_error_with_context($code, $message, Some($span), vec![])
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        $crate::logging::log_error_with_context(
            $code,
            $message,
            None,
            vec![$(($key, format!("{}", $value))),+],
        )
    };

    ($code:expr, $message:expr, span = $span:expr, $($key:expr => $value:expr),+ $(,)?) => {
        $crate::logging::log_error_with_context(
            $code,
            $message,
            Some($span),
            vec![$(($key, format!("{}", $value))),+],
        )
    };
}

/// Log a success event with code and key/value context
#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr) => {
        $crate::logging::log_success_with_context($code, $message, vec![])
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        $crate::logging::log_success_with_context(
            $code,
            $message,
            vec![$(($key, format!("{}", $value))),+],
        )
    };
}

/// Log an informational message
#[macro_export]
macro_rules! log_info {
    ($message:expr) => {
        $crate::logging::log_info_with_context($message, vec![])
    };

    ($message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        $crate::logging::log_info_with_context(
            $message,
            vec![$(($key, format!("{}", $value))),+],
        )
    };
}

/// Log a warning message
#[macro_export]
macro_rules! log_warning {
    ($message:expr) => {
        $crate::logging::log_warning_with_context($message, vec![])
    };

    ($message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        $crate::logging::log_warning_with_context(
            $message,
            vec![$(($key, format!("{}", $value))),+],
        )
    };
}

/// Log a debug message
#[macro_export]
macro_rules! log_debug {
    ($message:expr) => {
        $crate::logging::log_debug_with_context($message, vec![])
    };

    ($message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        $crate::logging::log_debug_with_context(
            $message,
            vec![$(($key, format!("{}", $value))),+],
        )
    };
}
