use crate::db::{Store, SystemLog};
use serde_json::Value;
use tracing::{error, info, warn};

/// Persists the outcome of catalog operations to `system_logs`.
///
/// Each entry carries the correlation id of the request that caused it, so a
/// stored log line can be matched against the tracing output.
#[derive(Clone)]
pub struct LogService {
    store: Store,
}

/// Severity stored with an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl LogService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Records one operation. Storage failures are logged and swallowed so
    /// they never turn a successful request into an error.
    pub async fn record(
        &self,
        event_type: &str,
        level: LogLevel,
        message: &str,
        details: Option<Value>,
        correlation_id: Option<&str>,
    ) {
        match level {
            LogLevel::Info => info!(event_type, correlation_id, "{message}"),
            LogLevel::Warn | LogLevel::Error => warn!(event_type, correlation_id, "{message}"),
        }

        let details = details.map(|d| d.to_string());
        if let Err(e) = self
            .store
            .add_log(
                event_type,
                level.as_str(),
                message,
                details,
                correlation_id.map(str::to_string),
            )
            .await
        {
            error!(error = %e, event_type, "Failed to save log");
        }
    }

    pub async fn info(
        &self,
        event_type: &str,
        message: &str,
        details: Option<Value>,
        correlation_id: Option<&str>,
    ) {
        self.record(event_type, LogLevel::Info, message, details, correlation_id)
            .await;
    }

    /// The most recently recorded operation.
    pub async fn latest(&self) -> anyhow::Result<Option<SystemLog>> {
        self.store.latest_log().await
    }
}
