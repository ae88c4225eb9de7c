//! Event types for the logging system

use super::codes::Code;
use crate::utils::Span;
use std::time::SystemTime;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// Core log event structure
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: SystemTime,
    pub level: LogLevel,
    pub code: Option<Code>,
    pub message: String,
    pub span: Option<Span>,
    pub context: Vec<(String, String)>,
}

impl LogEvent {
    fn new(level: LogLevel, code: Option<Code>, message: &str) -> Self {
        Self {
            timestamp: SystemTime::now(),
            level,
            code,
            message: message.to_string(),
            span: None,
            context: Vec::new(),
        }
    }

    /// Create a new error event
    pub fn error(code: Code, message: &str) -> Self {
        Self::new(LogLevel::Error, Some(code), message)
    }

    /// Create a new warning event
    pub fn warning(message: &str) -> Self {
        Self::new(LogLevel::Warning, None, message)
    }

    /// Create a new info event
    pub fn info(message: &str) -> Self {
        Self::new(LogLevel::Info, None, message)
    }

    /// Create a new debug event
    pub fn debug(message: &str) -> Self {
        Self::new(LogLevel::Debug, None, message)
    }

    /// Create a success event (reported at info level with a code)
    pub fn success(code: Code, message: &str) -> Self {
        Self::new(LogLevel::Info, Some(code), message)
    }

    /// Attach a source span
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Attach a context key/value pair
    pub fn with_context(mut self, key: &str, value: &str) -> Self {
        self.context.push((key.to_string(), value.to_string()));
        self
    }

    /// Human-readable single-line rendering
    pub fn format_line(&self) -> String {
        let mut line = format!("[{}]", self.level.as_str());
        if let Some(code) = self.code {
            line.push_str(&format!("[{}]", code));
        }
        line.push(' ');
        line.push_str(&self.message);
        if let Some(span) = self.span {
            line.push_str(&format!(" at {}", span));
        }
        for (key, value) in &self.context {
            line.push_str(&format!(" {}={}", key, value));
        }
        line
    }

    /// Structured JSON rendering
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::json!({
            "level": self.level.as_str(),
            "message": self.message,
        });

        if let Some(code) = self.code {
            json["code"] = serde_json::json!(code.as_str());
        }

        if let Some(span) = self.span {
            json["span"] = serde_json::json!({
                "start": { "line": span.start.line, "column": span.start.column },
                "end": { "line": span.end.line, "column": span.end.column },
                "offset": span.start.offset,
            });
        }

        if !self.context.is_empty() {
            json["context"] = serde_json::Value::Object(
                self.context
                    .iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                    .collect(),
            );
        }

        serde_json::to_string(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;
    use crate::utils::{Position, Span};

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Error < LogLevel::Warning);
        assert!(LogLevel::Info < LogLevel::Debug);
    }

    #[test]
    fn test_format_line() {
        let span = Span::new(Position::new(2, 1, 3), Position::new(4, 1, 5));
        let event = LogEvent::error(codes::syntax::UNEXPECTED_TOKEN, "Unexpected token var")
            .with_span(span)
            .with_context("found", "var");
        let line = event.format_line();
        assert!(line.contains("[ERROR]"));
        assert!(line.contains("[S001]"));
        assert!(line.contains("Unexpected token var"));
        assert!(line.contains("found=var"));
    }

    #[test]
    fn test_format_json() {
        let event = LogEvent::success(codes::success::TOKENIZATION_COMPLETE, "done")
            .with_context("token_count", "12");
        let json: serde_json::Value =
            serde_json::from_str(&event.format_json().unwrap()).unwrap();
        assert_eq!(json["code"], "P001");
        assert_eq!(json["context"]["token_count"], "12");
    }
}
