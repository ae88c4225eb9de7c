//! Logging service over pluggable logger backends

use super::events::{LogEvent, LogLevel};
use std::sync::{Arc, Mutex};

/// Simple logger backend trait
pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// Logger writing human-readable lines to stderr
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        eprintln!("{}", event.format_line());
    }
}

/// Logger writing structured JSON lines to stderr
pub struct StructuredLogger;

impl Logger for StructuredLogger {
    fn log(&self, event: &LogEvent) {
        if let Ok(json) = event.format_json() {
            eprintln!("{}", json);
        }
    }
}

/// In-memory logger for tests and embedding
pub struct MemoryLogger {
    events: Mutex<Vec<LogEvent>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of collected events
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Discard collected events
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl Default for MemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// Main logging service with level filtering
pub struct LoggingService {
    logger: Arc<dyn Logger>,
    min_level: LogLevel,
}

impl LoggingService {
    /// Create new logging service with the given backend and minimum level
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self { logger, min_level }
    }

    /// Console service at warning level, the quiet default
    pub fn console() -> Self {
        Self::new(Arc::new(ConsoleLogger), LogLevel::Warning)
    }

    /// Check if a level should be logged
    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    /// Log an event, applying the level filter
    pub fn log_event(&self, event: LogEvent) {
        if self.should_log(event.level) {
            self.logger.log(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_level_filtering() {
        let memory = Arc::new(MemoryLogger::new());
        let service = LoggingService::new(memory.clone(), LogLevel::Warning);

        service.log_event(LogEvent::debug("not recorded"));
        service.log_event(LogEvent::error(
            codes::syntax::UNEXPECTED_TOKEN,
            "recorded",
        ));

        let events = memory.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message, "recorded");
    }

    #[test]
    fn test_memory_logger_clear() {
        let memory = MemoryLogger::new();
        memory.log(&LogEvent::info("one"));
        assert_eq!(memory.events().len(), 1);
        memory.clear();
        assert!(memory.events().is_empty());
    }
}
