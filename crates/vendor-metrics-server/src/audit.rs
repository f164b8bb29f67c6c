// crates/vendor-metrics-server/src/audit.rs
// ============================================================================
// Module: API Audit Logging
// Description: Structured audit events for API requests and metric snapshots.
// Purpose: Emit JSON-line audit records to stderr, a file, or nowhere.
// Dependencies: vendor-metrics-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Audit events are serialized as single JSON lines. Three event kinds exist:
//! `http_request` for every API response, `performance_snapshot` for every
//! metric snapshot the service appends and `auth` for authentication
//! decisions. Token values never appear; only their fingerprint does.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;
use vendor_metrics_core::HistoricalPerformance;
use vendor_metrics_core::PerformanceMetrics;
use vendor_metrics_core::SnapshotTrigger;

use crate::auth::AuthContext;
use crate::auth::AuthError;
use crate::auth::RequestContext;

// ============================================================================
// SECTION: Events
// ============================================================================

/// HTTP request audit event.
#[derive(Debug, Clone, Serialize)]
pub struct RequestAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Request identifier when provided.
    pub request_id: Option<String>,
    /// Peer IP address when available.
    pub peer_ip: Option<String>,
    /// HTTP method.
    pub method: String,
    /// Request path.
    pub path: String,
    /// Response status code.
    pub status: u16,
    /// Request body size in bytes.
    pub request_bytes: usize,
    /// Response body size in bytes.
    pub response_bytes: usize,
}

/// Inputs required to construct a request audit event.
pub struct RequestAuditParams<'a> {
    /// Request context.
    pub context: &'a RequestContext,
    /// HTTP method.
    pub method: &'a str,
    /// Request path.
    pub path: &'a str,
    /// Response status code.
    pub status: u16,
    /// Request body size in bytes.
    pub request_bytes: usize,
    /// Response body size in bytes.
    pub response_bytes: usize,
}

impl RequestAuditEvent {
    /// Creates a request event stamped with the current time.
    #[must_use]
    pub fn new(params: &RequestAuditParams<'_>) -> Self {
        Self {
            event: "http_request",
            timestamp_ms: now_millis(),
            request_id: params.context.request_id.clone(),
            peer_ip: params.context.peer_ip.map(|ip| ip.to_string()),
            method: params.method.to_string(),
            path: params.path.to_string(),
            status: params.status,
            request_bytes: params.request_bytes,
            response_bytes: params.response_bytes,
        }
    }
}

/// Performance snapshot audit event.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Vendor code.
    pub vendor: String,
    /// Operation that produced the snapshot.
    pub trigger: SnapshotTrigger,
    /// Metrics captured by the snapshot.
    #[serde(flatten)]
    pub metrics: PerformanceMetrics,
}

impl SnapshotAuditEvent {
    /// Creates a snapshot event.
    #[must_use]
    pub fn new(snapshot: &HistoricalPerformance, trigger: SnapshotTrigger) -> Self {
        Self {
            event: "performance_snapshot",
            timestamp_ms: now_millis(),
            vendor: snapshot.vendor.to_string(),
            trigger,
            metrics: snapshot.metrics,
        }
    }
}

/// Authentication decision audit event.
#[derive(Debug, Clone, Serialize)]
pub struct AuthAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// `allow` or `deny`.
    pub decision: &'static str,
    /// Peer IP address when available.
    pub peer_ip: Option<String>,
    /// Authentication method label.
    pub auth_method: Option<&'static str>,
    /// Caller label.
    pub subject: Option<String>,
    /// SHA-256 fingerprint of the presented token.
    pub token_fingerprint: Option<String>,
    /// Denial reason.
    pub reason: Option<String>,
    /// Request identifier when provided.
    pub request_id: Option<String>,
}

impl AuthAuditEvent {
    /// Records an accepted request.
    #[must_use]
    pub fn allowed(ctx: &RequestContext, auth: &AuthContext) -> Self {
        Self {
            event: "auth",
            timestamp_ms: now_millis(),
            decision: "allow",
            peer_ip: ctx.peer_ip.map(|ip| ip.to_string()),
            auth_method: Some(auth.method.as_str()),
            subject: auth.subject.clone(),
            token_fingerprint: auth.token_fingerprint.clone(),
            reason: None,
            request_id: ctx.request_id.clone(),
        }
    }

    /// Records a rejected request.
    #[must_use]
    pub fn denied(ctx: &RequestContext, error: &AuthError) -> Self {
        Self {
            event: "auth",
            timestamp_ms: now_millis(),
            decision: "deny",
            peer_ip: ctx.peer_ip.map(|ip| ip.to_string()),
            auth_method: None,
            subject: None,
            token_fingerprint: None,
            reason: Some(error.reason().to_string()),
            request_id: ctx.request_id.clone(),
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Destination for audit events.
pub trait AuditSink: Send + Sync {
    /// Records an HTTP request event.
    fn record_request(&self, event: &RequestAuditEvent);

    /// Records a performance snapshot event.
    fn record_snapshot(&self, _event: &SnapshotAuditEvent) {}

    /// Records an authentication decision.
    fn record_auth(&self, _event: &AuthAuditEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record_request(&self, event: &RequestAuditEvent) {
        write_line(&mut io::stderr(), event);
    }

    fn record_snapshot(&self, event: &SnapshotAuditEvent) {
        write_line(&mut io::stderr(), event);
    }

    fn record_auth(&self, event: &AuthAuditEvent) {
        write_line(&mut io::stderr(), event);
    }
}

/// Audit sink that appends JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
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

    /// Writes one event under the file lock.
    fn append(&self, event: &impl Serialize) {
        if let Ok(mut file) = self.file.lock() {
            write_line(&mut *file, event);
            let _ = file.flush();
        }
    }
}

impl AuditSink for FileAuditSink {
    fn record_request(&self, event: &RequestAuditEvent) {
        self.append(event);
    }

    fn record_snapshot(&self, event: &SnapshotAuditEvent) {
        self.append(event);
    }

    fn record_auth(&self, event: &AuthAuditEvent) {
        self.append(event);
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record_request(&self, _event: &RequestAuditEvent) {}
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Serializes `event` as one line; failures are dropped.
fn write_line(writer: &mut impl Write, event: &impl Serialize) {
    if let Ok(payload) = serde_json::to_string(event) {
        let _ = writeln!(writer, "{payload}");
    }
}

/// Milliseconds since the unix epoch.
fn now_millis() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
