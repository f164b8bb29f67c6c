// crates/vendor-metrics-server/src/api.rs
// ============================================================================
// Module: REST API Handlers
// Description: JSON handlers for vendors, purchase orders, and metrics.
// Purpose: Translate HTTP requests into vendor service calls.
// Dependencies: vendor-metrics-core, axum, bytes, serde_json
// ============================================================================

//! ## Overview
//! Handlers parse untrusted request bodies into JSON objects, enforce required
//! fields at creation, run the matching [`VendorService`] operation on a
//! blocking context and map results onto status codes. Error bodies are always
//! `{"error": "<text>"}`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::Json;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::http::header::WWW_AUTHENTICATE;
use axum::response::IntoResponse;
use axum::response::Response;
use bytes::Bytes;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;
use vendor_metrics_core::Acknowledgement;
use vendor_metrics_core::LedgerError;
use vendor_metrics_core::PURCHASE_ORDER_REQUIRED_FIELDS;
use vendor_metrics_core::PoNumber;
use vendor_metrics_core::PurchaseOrder;
use vendor_metrics_core::PurchaseOrderPatch;
use vendor_metrics_core::SnapshotTrigger;
use vendor_metrics_core::StoreError;
use vendor_metrics_core::VENDOR_REQUIRED_FIELDS;
use vendor_metrics_core::Vendor;
use vendor_metrics_core::VendorCode;
use vendor_metrics_core::VendorPatch;
use vendor_metrics_core::VendorService;
use vendor_metrics_core::missing_fields;

use crate::audit::AuditSink;
use crate::audit::SnapshotAuditEvent;
use crate::auth::ApiAuthz;
use crate::auth::AuthError;

// ============================================================================
// SECTION: State
// ============================================================================

/// Banner served at `/`.
pub const BANNER: &str = "Vendor Management System with Performance Metrics";

/// Shared state for API handlers.
pub struct ApiState {
    /// Vendor service.
    pub service: VendorService,
    /// Request authenticator.
    pub authz: Arc<dyn ApiAuthz>,
    /// Audit sink.
    pub audit: Arc<dyn AuditSink>,
    /// Maximum allowed request body size.
    pub max_body_bytes: usize,
}

/// Shared handler state.
type SharedState = State<Arc<ApiState>>;

/// Raw request body, keeping extraction failures for JSON error mapping.
type RequestBody = Result<Bytes, BytesRejection>;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// API failures mapped onto HTTP status codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Malformed payload or rejected operation (400).
    BadRequest(String),
    /// Unknown identifier (404).
    NotFound(&'static str),
    /// Missing or invalid credentials (401).
    Unauthenticated(AuthError),
    /// Request body over the configured limit (413).
    PayloadTooLarge,
    /// Storage failure the caller cannot fix (500).
    Internal(String),
}

impl ApiError {
    /// Returns the HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error text sent to the caller.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::BadRequest(message) | Self::Internal(message) => message.clone(),
            Self::NotFound(message) => (*message).to_string(),
            Self::Unauthenticated(err) => err.to_string(),
            Self::PayloadTooLarge => "request body too large".to_string(),
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::VendorNotFound(_) => Self::NotFound("invalid vendor id"),
            LedgerError::PurchaseOrderNotFound(_) => Self::NotFound("invalid purchase order id"),
            LedgerError::Store(
                StoreError::Io(_) | StoreError::Corrupt(_) | StoreError::VersionMismatch(_),
            ) => Self::Internal(err.to_string()),
            LedgerError::UnknownVendor(_)
            | LedgerError::Invalid(_)
            | LedgerError::Conflict(_)
            | LedgerError::Store(_) => Self::BadRequest(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message() }));
        let mut response = (self.status(), body).into_response();
        if matches!(self, Self::Unauthenticated(_)) {
            response.headers_mut().insert(WWW_AUTHENTICATE, HeaderValue::from_static("Token"));
        }
        response
    }
}

/// Handler result.
type ApiResult = Result<Response, ApiError>;

// ============================================================================
// SECTION: Vendor Handlers
// ============================================================================

/// `GET /`
pub async fn banner() -> &'static str {
    BANNER
}

/// `GET /api/vendors`
pub async fn list_vendors(State(state): SharedState) -> ApiResult {
    let vendors = run_blocking(|| state.service.list_vendors())?;
    Ok(Json(vendors).into_response())
}

/// `POST /api/vendors`
pub async fn create_vendor(State(state): SharedState, body: RequestBody) -> ApiResult {
    let object = parse_object(&state, body)?;
    require_fields(&object, VENDOR_REQUIRED_FIELDS, "missing fields")?;
    let vendor: Vendor = decode(object)?;
    run_blocking(|| state.service.create_vendor(&vendor))?;
    Ok(message(StatusCode::CREATED, "vendor created"))
}

/// `GET /api/vendors/{id}`
pub async fn get_vendor(State(state): SharedState, Path(id): Path<String>) -> ApiResult {
    let code = VendorCode::new(id);
    let vendor = run_blocking(|| state.service.get_vendor(&code))?;
    Ok(Json(vendor).into_response())
}

/// `PUT /api/vendors/{id}`
pub async fn update_vendor(
    State(state): SharedState,
    Path(id): Path<String>,
    body: RequestBody,
) -> ApiResult {
    let patch: VendorPatch = decode(parse_object(&state, body)?)?;
    let code = VendorCode::new(id);
    run_blocking(|| state.service.update_vendor(&code, patch))?;
    Ok(message(StatusCode::OK, "vendor updated"))
}

/// `DELETE /api/vendors/{id}`
pub async fn delete_vendor(State(state): SharedState, Path(id): Path<String>) -> ApiResult {
    let code = VendorCode::new(id);
    run_blocking(|| state.service.delete_vendor(&code))?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// `GET /api/vendors/{id}/performance`
pub async fn vendor_performance(State(state): SharedState, Path(id): Path<String>) -> ApiResult {
    let code = VendorCode::new(id);
    let metrics = run_blocking(|| state.service.vendor_performance(&code))?;
    Ok(Json(metrics).into_response())
}

/// `GET /api/vendors/{id}/history`
pub async fn vendor_history(State(state): SharedState, Path(id): Path<String>) -> ApiResult {
    let code = VendorCode::new(id);
    let history = run_blocking(|| state.service.history(&code))?;
    Ok(Json(history).into_response())
}

// ============================================================================
// SECTION: Purchase Order Handlers
// ============================================================================

/// Query parameters for listing purchase orders.
#[derive(Debug, Default, Deserialize)]
pub struct PurchaseOrderQuery {
    /// Restrict the listing to one vendor; empty means no filter.
    #[serde(default)]
    pub vendor_id: Option<String>,
}

/// `GET /api/purchase_orders`
pub async fn list_purchase_orders(
    State(state): SharedState,
    Query(query): Query<PurchaseOrderQuery>,
) -> ApiResult {
    let vendor = query.vendor_id.filter(|id| !id.is_empty()).map(VendorCode::new);
    let orders = run_blocking(|| state.service.list_purchase_orders(vendor.as_ref()))?;
    Ok(Json(orders).into_response())
}

/// `POST /api/purchase_orders`
pub async fn create_purchase_order(State(state): SharedState, body: RequestBody) -> ApiResult {
    let object = parse_object(&state, body)?;
    require_fields(&object, PURCHASE_ORDER_REQUIRED_FIELDS, "Missing fields")?;
    let order: PurchaseOrder = decode(object)?;
    run_blocking(|| state.service.create_purchase_order(&order))?;
    Ok(message(StatusCode::CREATED, "purchase order created successfully"))
}

/// `GET /api/purchase_orders/{id}`
pub async fn get_purchase_order(State(state): SharedState, Path(id): Path<String>) -> ApiResult {
    let number = PoNumber::new(id);
    let order = run_blocking(|| state.service.get_purchase_order(&number))?;
    Ok(Json(order).into_response())
}

/// `PUT /api/purchase_orders/{id}`
pub async fn update_purchase_order(
    State(state): SharedState,
    Path(id): Path<String>,
    body: RequestBody,
) -> ApiResult {
    let patch: PurchaseOrderPatch = decode(parse_object(&state, body)?)?;
    let number = PoNumber::new(id);
    let update = run_blocking(|| state.service.update_purchase_order(&number, patch))?;
    let event = SnapshotAuditEvent::new(&update.snapshot, SnapshotTrigger::Update);
    state.audit.record_snapshot(&event);
    Ok(message(StatusCode::OK, "purchase order updated"))
}

/// `DELETE /api/purchase_orders/{id}`
pub async fn delete_purchase_order(
    State(state): SharedState,
    Path(id): Path<String>,
) -> ApiResult {
    let number = PoNumber::new(id);
    let removal = run_blocking(|| state.service.delete_purchase_order(&number))?;
    let event = SnapshotAuditEvent::new(&removal.snapshot, SnapshotTrigger::Delete);
    state.audit.record_snapshot(&event);
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// `GET /api/purchase_orders/{id}/acknowledge`
pub async fn acknowledge_purchase_order(
    State(state): SharedState,
    Path(id): Path<String>,
) -> ApiResult {
    let number = PoNumber::new(id);
    let outcome =
        run_blocking(|| state.service.acknowledge_purchase_order(&number)).map_err(|err| {
            match err {
                LedgerError::PurchaseOrderNotFound(_) => {
                    ApiError::NotFound("purchase order not found")
                }
                other => ApiError::from(other),
            }
        })?;
    match outcome {
        Acknowledgement::Acknowledged {
            snapshot, ..
        } => {
            let event = SnapshotAuditEvent::new(&snapshot, SnapshotTrigger::Acknowledge);
            state.audit.record_snapshot(&event);
            Ok(message(StatusCode::OK, "purchase order acknowledged"))
        }
        Acknowledgement::AlreadyAcknowledged {
            ..
        } => Ok(message(StatusCode::OK, "purchase order already acknowledged")),
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Runs synchronous store work, shifting to a blocking context when available.
pub fn run_blocking<T>(work: impl FnOnce() -> T) -> T {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == tokio::runtime::RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(work)
        }
        _ => work(),
    }
}

/// Parses a size-checked body into a JSON object.
///
/// Body extraction failures from the limit layer surface as JSON errors.
fn parse_object(state: &ApiState, body: RequestBody) -> Result<Map<String, Value>, ApiError> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::BadRequest(rejection.body_text())
        }
    })?;
    if body.len() > state.max_body_bytes {
        return Err(ApiError::PayloadTooLarge);
    }
    let value: Value = serde_json::from_slice(body.as_ref())
        .map_err(|err| ApiError::BadRequest(format!("invalid json: {err}")))?;
    match value {
        Value::Object(object) => Ok(object),
        _ => Err(ApiError::BadRequest("request body must be a JSON object".to_string())),
    }
}

/// Rejects objects lacking any of `required`, naming them in order.
fn require_fields(
    object: &Map<String, Value>,
    required: &[&'static str],
    label: &str,
) -> Result<(), ApiError> {
    let missing = missing_fields(object, required);
    if missing.is_empty() {
        return Ok(());
    }
    Err(ApiError::BadRequest(format!("{label}: {}", missing.join(", "))))
}

/// Decodes a JSON object into a typed record.
fn decode<T: DeserializeOwned>(object: Map<String, Value>) -> Result<T, ApiError> {
    serde_json::from_value(Value::Object(object))
        .map_err(|err| ApiError::BadRequest(err.to_string()))
}

/// Builds a `{"message": ...}` response.
fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
