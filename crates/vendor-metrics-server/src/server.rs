// crates/vendor-metrics-server/src/server.rs
// ============================================================================
// Module: HTTP Server
// Description: Axum server wiring for the vendor metrics API.
// Purpose: Build the store, auth, audit, and router from configuration.
// Dependencies: vendor-metrics-{config, core, store-sqlite}, axum, tokio
// ============================================================================

//! ## Overview
//! [`VendorMetricsServer`] turns a validated [`VendorMetricsConfig`] into a
//! running HTTP listener. All `/api` routes pass through one middleware that
//! authenticates the caller and writes the request audit event; `/` stays open.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::io::Write;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::body::HttpBody;
use axum::extract::ConnectInfo;
use axum::extract::DefaultBodyLimit;
use axum::extract::OriginalUri;
use axum::extract::Request;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::header::CONTENT_LENGTH;
use axum::middleware;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use thiserror::Error;
use tokio::net::TcpListener;
use vendor_metrics_config::ServerAuditConfig;
use vendor_metrics_config::ServerAuthMode;
use vendor_metrics_config::StoreConfig;
use vendor_metrics_config::StoreType;
use vendor_metrics_config::VendorMetricsConfig;
use vendor_metrics_core::InMemoryVendorStore;
use vendor_metrics_core::SharedVendorStore;
use vendor_metrics_core::VendorService;
use vendor_metrics_store_sqlite::SqliteVendorStore;

use crate::api;
use crate::api::ApiError;
use crate::api::ApiState;
use crate::audit::AuditSink;
use crate::audit::AuthAuditEvent;
use crate::audit::FileAuditSink;
use crate::audit::NoopAuditSink;
use crate::audit::RequestAuditEvent;
use crate::audit::RequestAuditParams;
use crate::audit::StderrAuditSink;
use crate::auth::DefaultApiAuthz;
use crate::auth::RequestContext;

// ============================================================================
// SECTION: Server
// ============================================================================

/// Header carrying a caller-supplied request identifier.
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Vendor metrics HTTP server.
pub struct VendorMetricsServer {
    /// Validated configuration.
    config: VendorMetricsConfig,
    /// Shared handler state.
    state: Arc<ApiState>,
}

impl VendorMetricsServer {
    /// Builds the server, opening the configured store.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when the config is invalid or the store or
    /// audit log cannot be opened.
    pub fn from_config(config: VendorMetricsConfig) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let store = build_store(&config.store)?;
        Self::with_service(config, VendorService::with_system_clock(store))
    }

    /// Builds the server around an existing service.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when the config is invalid or the audit log
    /// cannot be opened.
    pub fn with_service(
        config: VendorMetricsConfig,
        service: VendorService,
    ) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let audit = build_audit_sink(&config.server.audit)?;
        let authz = Arc::new(DefaultApiAuthz::from_config(config.server.auth.as_ref()));
        let state = Arc::new(ApiState {
            service,
            authz,
            audit,
            max_body_bytes: config.server.max_body_bytes,
        });
        emit_local_only_warning(&config);
        Ok(Self {
            config,
            state,
        })
    }

    /// Returns the router serving `/` and `/api`.
    #[must_use]
    pub fn router(&self) -> Router {
        build_router(Arc::clone(&self.state))
    }

    /// Binds the configured address and serves until the listener fails.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), ServerError> {
        let addr =
            self.config.server.bind_addr().map_err(|err| ServerError::Config(err.to_string()))?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|err| ServerError::Transport(format!("http bind failed: {err}")))?;
        self.serve_on(listener).await
    }

    /// Serves on an already bound listener.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Transport`] when serving fails.
    pub async fn serve_on(self, listener: TcpListener) -> Result<(), ServerError> {
        let app = self.router();
        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .map_err(|err| ServerError::Transport(format!("http server failed: {err}")))
    }
}

// ============================================================================
// SECTION: Router
// ============================================================================

/// Builds the application router.
fn build_router(state: Arc<ApiState>) -> Router {
    let api = Router::new()
        .route("/vendors", get(api::list_vendors).post(api::create_vendor))
        .route(
            "/vendors/{id}",
            get(api::get_vendor).put(api::update_vendor).delete(api::delete_vendor),
        )
        .route("/vendors/{id}/performance", get(api::vendor_performance))
        .route("/vendors/{id}/history", get(api::vendor_history))
        .route(
            "/purchase_orders",
            get(api::list_purchase_orders).post(api::create_purchase_order),
        )
        .route(
            "/purchase_orders/{id}",
            get(api::get_purchase_order)
                .put(api::update_purchase_order)
                .delete(api::delete_purchase_order),
        )
        .route("/purchase_orders/{id}/acknowledge", get(api::acknowledge_purchase_order))
        .route_layer(middleware::from_fn_with_state(Arc::clone(&state), guard));
    let body_limit = state.max_body_bytes;
    Router::new()
        .route("/", get(api::banner))
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Authenticates the caller and audits the request.
async fn guard(
    State(state): State<Arc<ApiState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    OriginalUri(uri): OriginalUri,
    request: Request,
    next: Next,
) -> Response {
    let context = request_context(peer, request.headers());
    let method = request.method().to_string();
    let path = uri.path().to_string();
    let request_bytes = content_length(request.headers());
    let response = match state.authz.authorize(&context) {
        Ok(auth) => {
            state.audit.record_auth(&AuthAuditEvent::allowed(&context, &auth));
            next.run(request).await
        }
        Err(err) => {
            state.audit.record_auth(&AuthAuditEvent::denied(&context, &err));
            ApiError::Unauthenticated(err).into_response()
        }
    };
    let response_bytes = response
        .body()
        .size_hint()
        .exact()
        .map_or(0, |size| usize::try_from(size).unwrap_or(usize::MAX));
    state.audit.record_request(&RequestAuditEvent::new(&RequestAuditParams {
        context: &context,
        method: &method,
        path: &path,
        status: response.status().as_u16(),
        request_bytes,
        response_bytes,
    }));
    response
}

/// Builds the auth context for an HTTP request.
fn request_context(peer: SocketAddr, headers: &HeaderMap) -> RequestContext {
    let auth_header =
        headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok()).map(str::to_string);
    let request_id =
        headers.get(REQUEST_ID_HEADER).and_then(|value| value.to_str().ok()).map(str::to_string);
    RequestContext::http(Some(peer.ip()), auth_header).with_request_id(request_id)
}

/// Declared request body size, zero when absent.
fn content_length(headers: &HeaderMap) -> usize {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
}

// ============================================================================
// SECTION: Builders
// ============================================================================

/// Opens the configured vendor store.
fn build_store(config: &StoreConfig) -> Result<SharedVendorStore, ServerError> {
    match config.store_type {
        StoreType::Memory => Ok(SharedVendorStore::from_store(InMemoryVendorStore::new())),
        StoreType::Sqlite => {
            let sqlite = config
                .sqlite_config()
                .ok_or_else(|| ServerError::Config("sqlite store requires path".to_string()))?;
            let store =
                SqliteVendorStore::new(&sqlite).map_err(|err| ServerError::Init(err.to_string()))?;
            Ok(SharedVendorStore::from_store(store))
        }
    }
}

/// Selects the audit sink from `[server.audit]`.
fn build_audit_sink(config: &ServerAuditConfig) -> Result<Arc<dyn AuditSink>, ServerError> {
    if !config.enabled {
        return Ok(Arc::new(NoopAuditSink));
    }
    match &config.path {
        Some(path) => {
            let sink = FileAuditSink::new(Path::new(path))
                .map_err(|err| ServerError::Init(format!("audit log open failed: {err}")))?;
            Ok(Arc::new(sink))
        }
        None => Ok(Arc::new(StderrAuditSink)),
    }
}

/// Warns on stderr when the API runs without token auth.
fn emit_local_only_warning(config: &VendorMetricsConfig) {
    if config.server.auth_mode() == ServerAuthMode::LocalOnly {
        let _ = writeln!(
            io::stderr(),
            "vendor-metrics: WARNING: server running in local-only mode without explicit auth; \
             configure server.auth to enable token access"
        );
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Server startup and transport errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration rejected.
    #[error("config error: {0}")]
    Config(String),
    /// Store or audit initialization failed.
    #[error("init error: {0}")]
    Init(String),
    /// Listener failure.
    #[error("transport error: {0}")]
    Transport(String),
}
