// crates/vendor-metrics-server/tests/common/mod.rs
// =============================================================================
// Module: Server Test Helpers
// Description: Spawns API servers on ephemeral ports and wraps HTTP calls.
// Purpose: Reduce duplication across vendor-metrics-server integration tests.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test helpers fail fast on setup errors."
)]

use reqwest::Client;
use reqwest::RequestBuilder;
use reqwest::StatusCode;
use serde_json::Value;
use serde_json::json;
use tokio::net::TcpListener;
use vendor_metrics_config::VendorMetricsConfig;
use vendor_metrics_server::VendorMetricsServer;

/// Running server plus a client pointed at it.
pub struct TestServer {
    /// Base URL such as `http://127.0.0.1:43121`.
    pub base_url: String,
    /// HTTP client.
    pub client: Client,
    /// Token sent as `Authorization: Token <key>` when set.
    pub token: Option<String>,
}

/// Parsed response: status plus JSON body (`Null` when empty).
pub struct Reply {
    /// HTTP status.
    pub status: StatusCode,
    /// Decoded body.
    pub body: Value,
}

impl TestServer {
    /// Builds an absolute URL for `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Attaches the configured token, if any.
    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.header("authorization", format!("Token {token}")),
            None => builder,
        }
    }

    /// Sends a GET request.
    pub async fn get(&self, path: &str) -> Reply {
        send(self.authorized(self.client.get(self.url(path)))).await
    }

    /// Sends a POST request with a JSON body.
    pub async fn post(&self, path: &str, body: &Value) -> Reply {
        send(self.authorized(self.client.post(self.url(path)).json(body))).await
    }

    /// Sends a PUT request with a JSON body.
    pub async fn put(&self, path: &str, body: &Value) -> Reply {
        send(self.authorized(self.client.put(self.url(path)).json(body))).await
    }

    /// Sends a DELETE request.
    pub async fn delete(&self, path: &str) -> Reply {
        send(self.authorized(self.client.delete(self.url(path)))).await
    }
}

/// Sends a request and decodes the reply.
pub async fn send(builder: RequestBuilder) -> Reply {
    let response = builder.send().await.unwrap();
    let status = response.status();
    let text = response.text().await.unwrap();
    let body = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };
    Reply {
        status,
        body,
    }
}

/// In-memory config with audit logging disabled.
pub fn memory_config() -> VendorMetricsConfig {
    toml::from_str("[server.audit]\nenabled = false\n").unwrap()
}

/// In-memory config requiring `token`.
pub fn token_config(token: &str) -> VendorMetricsConfig {
    let text = format!(
        "[server.auth]\nmode = \"token\"\ntokens = [\"{token}\"]\n\n\
         [server.audit]\nenabled = false\n"
    );
    toml::from_str(&text).unwrap()
}

/// Builds and spawns a server from `config`.
pub async fn spawn(config: VendorMetricsConfig) -> TestServer {
    spawn_server(VendorMetricsServer::from_config(config).unwrap()).await
}

/// Spawns an already built server on an ephemeral loopback port.
pub async fn spawn_server(server: VendorMetricsServer) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = server.serve_on(listener).await;
    });
    TestServer {
        base_url: format!("http://{addr}"),
        client: Client::new(),
        token: None,
    }
}

/// Vendor creation payload with every required field.
pub fn vendor_json(code: &str) -> Value {
    json!({
        "vendor_code": code,
        "name": format!("Vendor {code}"),
        "contact_details": format!("ops@{code}.test"),
        "address": "1 Main St",
        "on_time_delivery_rate": 0.5,
        "quality_rating_avg": 0.0,
        "average_response_time": 0.0,
        "fulfillment_rate": 0.0
    })
}

/// Pending purchase order payload issued at noon on 2024-05-06.
pub fn order_json(number: &str, vendor: &str) -> Value {
    json!({
        "po_number": number,
        "vendor": vendor,
        "order_date": "2024-05-06 12:00:00",
        "delivery_date": "2024-05-10",
        "items": { "widget": 3 },
        "quantity": 3,
        "status": "pending",
        "issue_date": "2024-05-06 12:00:00"
    })
}
