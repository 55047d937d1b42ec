#[derive(Debug, thiserror::Error)]
pub enum DataverseError {
    #[error("dataverse returned HTTP {status} for {method} {url}: {message}")]
    Status {
        status: u16,
        method: &'static str,
        url: String,
        message: String,
    },
    #[error("dataverse request {method} {url} failed: {message}")]
    Transport {
        method: &'static str,
        url: String,
        message: String,
    },
    #[error("failed to encode request body for {url}: {message}")]
    Encode { url: String, message: String },
    #[error("failed to decode dataverse response from {url}: {message}")]
    Decode { url: String, message: String },
    #[error("dataset {global_id} did not report a `{lock_type}` lock after {checks} checks")]
    LockTimeout {
        global_id: String,
        lock_type: String,
        checks: u32,
    },
}

impl DataverseError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
