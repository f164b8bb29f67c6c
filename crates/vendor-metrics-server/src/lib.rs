// crates/vendor-metrics-server/src/lib.rs
// ============================================================================
// Module: Vendor Metrics Server Library
// Description: HTTP API surface for the vendor metrics service.
// Purpose: Expose the server, auth, audit, and handler building blocks.
// Dependencies: crate::{api, audit, auth, server}
// ============================================================================

//! ## Overview
//! REST endpoints for vendors and purchase orders under `/api`, guarded by
//! local-only or token authentication and audited as JSON lines.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod api;
pub mod audit;
pub mod auth;
pub mod server;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use api::ApiError;
pub use api::BANNER;
pub use audit::AuditSink;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use auth::ApiAuthz;
pub use auth::AuthError;
pub use auth::DefaultApiAuthz;
pub use auth::MAX_AUTH_HEADER_BYTES;
pub use auth::RequestContext;
pub use server::ServerError;
pub use server::VendorMetricsServer;
