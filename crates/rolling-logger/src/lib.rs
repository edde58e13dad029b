//! Rolling Logger
//!
//! `tracing` subscriber for browser apps. Every formatted event is forwarded
//! to the devtools console and kept in a fixed-size circular buffer so the
//! page can show recent activity without opening devtools.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, OnceLock};

use tracing::{Level, Metadata, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;

static GLOBAL_BUFFER: OnceLock<LogBuffer> = OnceLock::new();

/// Circular buffer of formatted log lines, oldest first.
#[derive(Clone, Debug)]
pub struct LogBuffer {
    lines: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Append a line, evicting the oldest one when full
    pub fn push(&self, line: String) {
        let mut lines = match self.lines.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(guard) => guard.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().iter().cloned().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.lock().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Wall-clock timestamps in local time, e.g. `14:03:27.512`
struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%H:%M:%S%.3f"))
    }
}

/// Hands out one [`LineWriter`] per event
#[derive(Clone)]
struct ConsoleMakeWriter {
    buffer: LogBuffer,
}

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = LineWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LineWriter {
            buffer: self.buffer.clone(),
            level: Level::INFO,
            bytes: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        LineWriter {
            buffer: self.buffer.clone(),
            level: *meta.level(),
            bytes: Vec::new(),
        }
    }
}

/// Collects one formatted event and emits it on drop
struct LineWriter {
    buffer: LogBuffer,
    level: Level,
    bytes: Vec<u8>,
}

impl io::Write for LineWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for LineWriter {
    fn drop(&mut self) {
        if self.bytes.is_empty() {
            return;
        }
        let line = String::from_utf8_lossy(&self.bytes).trim_end().to_string();
        emit(self.level, &line);
        self.buffer.push(line);
    }
}

#[cfg(target_arch = "wasm32")]
fn emit(level: Level, line: &str) {
    use wasm_bindgen::JsValue;
    use web_sys::console;

    let value = JsValue::from_str(line);
    match level {
        Level::ERROR => console::error_1(&value),
        Level::WARN => console::warn_1(&value),
        Level::INFO => console::info_1(&value),
        _ => console::debug_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(_level: Level, line: &str) {
    eprintln!("{}", line);
}

/// Build the subscriber without installing it.
pub fn build_subscriber(buffer: LogBuffer, max_level: Level) -> impl Subscriber + Send + Sync {
    let layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_timer(LocalTime)
        .with_writer(ConsoleMakeWriter { buffer })
        .with_filter(LevelFilter::from_level(max_level));
    tracing_subscriber::registry().with(layer)
}

/// Install the global subscriber.
///
/// # Arguments
/// * `app_name` - Name recorded in the first log line
/// * `capacity` - Number of lines kept by [`recent_lines`]
/// * `max_level` - Most verbose level that is emitted
pub fn init_logger(app_name: &str, capacity: usize, max_level: Level) -> Result<LogBuffer, TryInitError> {
    let buffer = GLOBAL_BUFFER.get_or_init(|| LogBuffer::new(capacity)).clone();
    build_subscriber(buffer.clone(), max_level).try_init()?;
    tracing::info!(app = app_name, capacity = buffer.capacity(), "logger initialised");
    Ok(buffer)
}

/// Lines captured by the global logger, oldest first. Empty before `init_logger`.
pub fn recent_lines() -> Vec<String> {
    GLOBAL_BUFFER.get().map(LogBuffer::lines).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_evicts_oldest() {
        let buffer = LogBuffer::new(2);
        buffer.push("one".to_string());
        buffer.push("two".to_string());
        buffer.push("three".to_string());

        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.lines(), vec!["two".to_string(), "three".to_string()]);
    }

    #[test]
    fn test_zero_capacity_keeps_one_line() {
        let buffer = LogBuffer::new(0);
        buffer.push("a".to_string());
        buffer.push("b".to_string());
        assert_eq!(buffer.lines(), vec!["b".to_string()]);
    }

    #[test]
    fn test_events_are_captured() {
        let buffer = LogBuffer::new(10);
        let subscriber = build_subscriber(buffer.clone(), Level::INFO);

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(count = 3, "loaded items");
            tracing::debug!("filtered out");
        });

        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("INFO"));
        assert!(lines[0].contains("loaded items"));
        assert!(lines[0].contains("count=3"));
    }

    #[test]
    fn test_recent_lines_empty_before_init() {
        assert!(GLOBAL_BUFFER.get().is_none());
        assert!(recent_lines().is_empty());
    }
}
