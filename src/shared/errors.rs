#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("task queue is full (capacity {capacity})")]
    QueueFull { capacity: usize },
    #[error("task queue is shut down")]
    QueueClosed,
    #[error("failed to spawn worker thread {name}: {source}")]
    SpawnWorker {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read step invocation from {path}: {source}")]
    ReadInvocation {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid step invocation from {path}: {source}")]
    ParseInvocation {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to open log file {path}: {source}")]
    OpenLog {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
