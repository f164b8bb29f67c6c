// crates/vendor-metrics-server/src/auth.rs
// ============================================================================
// Module: API Authentication
// Description: Request authentication for the vendor metrics API.
// Purpose: Enforce local-only or token access before handlers run.
// Dependencies: vendor-metrics-config, sha2, subtle, thiserror
// ============================================================================

//! ## Overview
//! Every `/api` request passes through [`ApiAuthz`] before it reaches a
//! handler. Two modes are supported:
//! - `local_only`: loopback peers are accepted without credentials
//! - `token`: the `Authorization` header must carry a configured token as
//!   `Token <key>` or `Bearer <key>`
//!
//! Tokens are compared in constant time and only their SHA-256 fingerprint
//! ever leaves this module.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;
use std::net::IpAddr;

use sha2::Digest;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;
use vendor_metrics_config::ServerAuthConfig;
use vendor_metrics_config::ServerAuthMode;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum accepted size of the `Authorization` header.
pub const MAX_AUTH_HEADER_BYTES: usize = 8 * 1024;

/// Authorization schemes accepted in token mode.
const TOKEN_SCHEMES: [&str; 2] = ["token", "bearer"];

// ============================================================================
// SECTION: Request Context
// ============================================================================

/// Per-request inputs used for authentication and auditing.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Peer IP address when known.
    pub peer_ip: Option<IpAddr>,
    /// Raw `Authorization` header value.
    pub auth_header: Option<String>,
    /// Caller-supplied request identifier.
    pub request_id: Option<String>,
}

impl RequestContext {
    /// Builds a context for an HTTP request.
    #[must_use]
    pub const fn http(peer_ip: Option<IpAddr>, auth_header: Option<String>) -> Self {
        Self {
            peer_ip,
            auth_header,
            request_id: None,
        }
    }

    /// Attaches a request identifier.
    #[must_use]
    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }

    /// Returns true when the peer is a loopback address.
    #[must_use]
    pub fn peer_is_loopback(&self) -> bool {
        self.peer_ip.is_some_and(|ip| ip.is_loopback())
    }
}

// ============================================================================
// SECTION: Auth Context
// ============================================================================

/// How a request was authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    /// Loopback peer in local-only mode.
    Local,
    /// Configured API token.
    Token,
}

impl AuthMethod {
    /// Returns the audit label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Token => "token",
        }
    }
}

/// Authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Authentication method.
    pub method: AuthMethod,
    /// Caller label.
    pub subject: Option<String>,
    /// SHA-256 fingerprint of the presented token.
    pub token_fingerprint: Option<String>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Authentication failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Missing or invalid credentials.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),
}

impl AuthError {
    /// Returns the failure reason without the prefix.
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            Self::Unauthenticated(reason) => reason,
        }
    }
}

// ============================================================================
// SECTION: Authorizer
// ============================================================================

/// Authenticates API requests.
pub trait ApiAuthz: Send + Sync {
    /// Authenticates the request described by `ctx`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] when the request must be rejected.
    fn authorize(&self, ctx: &RequestContext) -> Result<AuthContext, AuthError>;
}

/// Authorizer driven by `[server.auth]`.
pub struct DefaultApiAuthz {
    /// Active mode.
    mode: ServerAuthMode,
    /// Accepted tokens.
    tokens: Vec<String>,
}

impl DefaultApiAuthz {
    /// Builds the authorizer from configuration; absent config means local-only.
    #[must_use]
    pub fn from_config(config: Option<&ServerAuthConfig>) -> Self {
        config.map_or(
            Self {
                mode: ServerAuthMode::LocalOnly,
                tokens: Vec::new(),
            },
            |auth| Self {
                mode: auth.mode,
                tokens: auth.tokens.clone(),
            },
        )
    }

    /// Returns the active mode.
    #[must_use]
    pub const fn mode(&self) -> ServerAuthMode {
        self.mode
    }

    /// Accepts loopback peers only.
    fn authorize_local_only(ctx: &RequestContext) -> Result<AuthContext, AuthError> {
        if !ctx.peer_is_loopback() {
            return Err(AuthError::Unauthenticated(
                "local-only mode requires loopback access".to_string(),
            ));
        }
        Ok(AuthContext {
            method: AuthMethod::Local,
            subject: Some("loopback".to_string()),
            token_fingerprint: None,
        })
    }

    /// Accepts requests carrying a configured token.
    fn authorize_token(&self, ctx: &RequestContext) -> Result<AuthContext, AuthError> {
        let token = parse_token_header(ctx.auth_header.as_deref())?;
        if !self.accepts(token) {
            return Err(AuthError::Unauthenticated("invalid token".to_string()));
        }
        Ok(AuthContext {
            method: AuthMethod::Token,
            subject: Some("token".to_string()),
            token_fingerprint: Some(token_fingerprint(token)),
        })
    }

    /// Checks `candidate` against every configured token.
    fn accepts(&self, candidate: &str) -> bool {
        self.tokens.iter().fold(false, |matched, token| {
            let equal: bool = token.as_bytes().ct_eq(candidate.as_bytes()).into();
            matched | equal
        })
    }
}

impl ApiAuthz for DefaultApiAuthz {
    fn authorize(&self, ctx: &RequestContext) -> Result<AuthContext, AuthError> {
        match self.mode {
            ServerAuthMode::LocalOnly => Self::authorize_local_only(ctx),
            ServerAuthMode::Token => self.authorize_token(ctx),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Extracts the token from `Token <key>` or `Bearer <key>`.
fn parse_token_header(auth_header: Option<&str>) -> Result<&str, AuthError> {
    let header = auth_header
        .ok_or_else(|| AuthError::Unauthenticated("missing authorization".to_string()))?;
    if header.len() > MAX_AUTH_HEADER_BYTES {
        return Err(AuthError::Unauthenticated("authorization header too large".to_string()));
    }
    let mut parts = header.trim().splitn(2, ' ');
    let scheme = parts.next().unwrap_or_default();
    let token = parts.next().unwrap_or_default().trim();
    let known_scheme = TOKEN_SCHEMES.iter().any(|known| scheme.eq_ignore_ascii_case(known));
    if !known_scheme || token.is_empty() {
        return Err(AuthError::Unauthenticated("invalid authorization header".to_string()));
    }
    Ok(token)
}

/// Hex-encoded SHA-256 digest of a token.
#[must_use]
pub fn token_fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    let mut encoded = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(encoded, "{byte:02x}");
    }
    encoded
}

// ============================================================================
// SECTION: Tests
// ============================================================================
