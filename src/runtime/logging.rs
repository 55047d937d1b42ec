use crate::config::LoggingConfig;
use crate::dataverse::StepInvocation;
use crate::shared::errors::RuntimeError;
use crate::shared::serde_ext::parse_via_string;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "debug" | "trace" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err("level must be one of: debug, info, warn, error".to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        parse_via_string(deserializer, "log level", Self::parse)
    }
}

#[derive(Debug)]
enum SinkTarget {
    File { path: PathBuf, lock: Mutex<()> },
    Stderr,
    Memory(Mutex<Vec<Value>>),
}

/// Where log lines go. Cloning shares the target.
#[derive(Debug, Clone)]
pub struct LogSink {
    target: Arc<SinkTarget>,
}

impl LogSink {
    pub fn file(path: &Path) -> Result<Self, RuntimeError> {
        let open_error = |source| RuntimeError::OpenLog {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(open_error)?;
        }
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(open_error)?;
        Ok(Self {
            target: Arc::new(SinkTarget::File {
                path: path.to_path_buf(),
                lock: Mutex::new(()),
            }),
        })
    }

    pub fn stderr() -> Self {
        Self {
            target: Arc::new(SinkTarget::Stderr),
        }
    }

    pub fn memory() -> Self {
        Self {
            target: Arc::new(SinkTarget::Memory(Mutex::new(Vec::new()))),
        }
    }

    /// Entries captured by a memory sink; empty for other sinks.
    pub fn records(&self) -> Vec<Value> {
        match self.target.as_ref() {
            SinkTarget::Memory(lines) => lines.lock().map(|l| l.clone()).unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    fn write(&self, payload: Value) {
        match self.target.as_ref() {
            SinkTarget::Memory(lines) => {
                if let Ok(mut lines) = lines.lock() {
                    lines.push(payload);
                }
            }
            SinkTarget::Stderr => {
                if let Ok(line) = serde_json::to_string(&payload) {
                    eprintln!("{line}");
                }
            }
            SinkTarget::File { path, lock } => {
                let Ok(line) = serde_json::to_string(&payload) else {
                    return;
                };
                let _guard = lock.lock();
                let Ok(mut file) = fs::OpenOptions::new().create(true).append(true).open(path)
                else {
                    return;
                };
                let _ = writeln!(file, "{line}");
            }
        }
    }
}

/// Structured JSON-lines logger. Context fields (invocation id, dataset
/// pid) are attached to every entry written through a scoped copy.
#[derive(Debug, Clone)]
pub struct TaskLogger {
    sink: LogSink,
    min_level: LogLevel,
    context: Map<String, Value>,
}

impl TaskLogger {
    pub fn new(sink: LogSink, min_level: LogLevel) -> Self {
        Self {
            sink,
            min_level,
            context: Map::new(),
        }
    }

    pub fn from_config(config: &LoggingConfig) -> Result<Self, RuntimeError> {
        let sink = match &config.path {
            Some(path) => LogSink::file(path)?,
            None => LogSink::stderr(),
        };
        Ok(Self::new(sink, config.level))
    }

    pub fn with_field(&self, key: &str, value: impl Into<String>) -> Self {
        let mut scoped = self.clone();
        scoped
            .context
            .insert(key.to_string(), Value::String(value.into()));
        scoped
    }

    pub fn with_invocation(&self, invocation: &StepInvocation) -> Self {
        self.with_field("invocation_id", invocation.invocation_id.as_str())
            .with_field("global_id", invocation.global_id.as_str())
    }

    pub fn sink(&self) -> &LogSink {
        &self.sink
    }

    pub fn log(&self, level: LogLevel, event: &str, message: &str) {
        if level < self.min_level {
            return;
        }
        let mut payload = serde_json::json!({
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "level": level.as_str(),
            "event": event,
            "message": message,
        });
        if let Value::Object(fields) = &mut payload {
            for (key, value) in &self.context {
                fields.insert(key.clone(), value.clone());
            }
        }
        self.sink.write(payload);
    }

    pub fn debug(&self, event: &str, message: &str) {
        self.log(LogLevel::Debug, event, message);
    }

    pub fn info(&self, event: &str, message: &str) {
        self.log(LogLevel::Info, event, message);
    }

    pub fn warn(&self, event: &str, message: &str) {
        self.log(LogLevel::Warn, event, message);
    }

    pub fn error(&self, event: &str, message: &str) {
        self.log(LogLevel::Error, event, message);
    }
}
