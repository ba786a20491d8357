// crates/crudcheck-client/src/audit.rs
// ============================================================================
// Module: Lifecycle Logging
// Description: Structured events for test-data provisioning and teardown.
// Purpose: Emit JSON-line logs without hard dependencies on a logging stack.
// Dependencies: crudcheck-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Lifecycle events record every create, delete, and clear the harness
//! performs against the shared collection. Teardown failures are reported
//! here rather than returned, so they never mask a scenario's own failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use crudcheck_core::UserId;
use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Lifecycle action classification.
///
/// # Invariants
/// - Variants are stable for log labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleAction {
    /// Collection cleared.
    Clear,
    /// Resource created and tracked.
    Create,
    /// Resource creation failed.
    CreateFailed,
    /// Tracked resource deleted (or already gone).
    Delete,
    /// Tracked resource deletion failed.
    DeleteFailed,
    /// Scope released.
    Release,
}

/// Lifecycle event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LifecycleEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Action performed.
    pub action: LifecycleAction,
    /// Affected resource when applicable.
    pub user_id: Option<UserId>,
    /// HTTP status when an exchange completed.
    pub status: Option<u16>,
    /// Free-form detail.
    pub message: Option<String>,
}

impl LifecycleEvent {
    /// Creates an event stamped with the current time.
    #[must_use]
    pub fn new(action: LifecycleAction) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "crudcheck_lifecycle",
            timestamp_ms,
            action,
            user_id: None,
            status: None,
            message: None,
        }
    }

    /// Sets the affected resource.
    #[must_use]
    pub const fn with_user(mut self, id: UserId) -> Self {
        self.user_id = Some(id);
        self
    }

    /// Sets the observed status.
    #[must_use]
    pub const fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the detail message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Sink for lifecycle events.
pub trait LifecycleSink: Send + Sync {
    /// Record an event.
    fn record(&self, event: &LifecycleEvent);
}

/// Sink that logs JSON lines to stderr.
pub struct StderrLifecycleSink;

impl LifecycleSink for StderrLifecycleSink {
    fn record(&self, event: &LifecycleEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Sink that logs JSON lines to a file.
pub struct FileLifecycleSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileLifecycleSink {
    /// Opens the log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl LifecycleSink for FileLifecycleSink {
    fn record(&self, event: &LifecycleEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// Sink that drops every event.
pub struct NoopLifecycleSink;

impl LifecycleSink for NoopLifecycleSink {
    fn record(&self, _event: &LifecycleEvent) {}
}
