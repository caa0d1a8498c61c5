//! JSON-RPC client for Sui fullnodes.
//!
//! Implements [`ObjectClient`] over the fullnode read API:
//!
//! | Operation | Method |
//! |---|---|
//! | `get_object` | `sui_getObject` |
//! | `multi_get_objects` | `sui_multiGetObjects` |
//! | `get_owned_objects` | `suix_getOwnedObjects` |
//! | `get_dynamic_fields` | `suix_getDynamicFields` |
//!
//! HTTP is done with a blocking `ureq` agent on tokio's blocking pool.
//! Throttling responses (HTTP 429, or a JSON-RPC error mentioning rate limits)
//! are reported as [`RateLimitError`]; everything else is an `anyhow` error
//! with the method name attached. No retries happen here.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde_json::{json, Value};
use sui_kiosk_types::{env_var_or, Address, ObjectId, RateLimitError};

use crate::client::{ObjectClient, ObjectDataOptions, OwnedObjectsQuery, Page};
use crate::records::{DynamicFieldEntry, RawObjectRecord};

/// Fullnode JSON-RPC client bound to one endpoint.
#[derive(Clone)]
pub struct JsonRpcClient {
    endpoint: String,
    agent: ureq::Agent,
    next_id: Arc<AtomicU64>,
}

impl JsonRpcClient {
    /// Default request timeout in seconds (can be overridden by env).
    const DEFAULT_TIMEOUT_SECS: u64 = 30;
    /// Default connect timeout in seconds (can be overridden by env).
    const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

    fn default_timeouts() -> (Duration, Duration) {
        let timeout_secs = env_var_or("SUI_RPC_TIMEOUT_SECS", Self::DEFAULT_TIMEOUT_SECS);
        let connect_secs = env_var_or(
            "SUI_RPC_CONNECT_TIMEOUT_SECS",
            Self::DEFAULT_CONNECT_TIMEOUT_SECS,
        );
        (
            Duration::from_secs(timeout_secs),
            Duration::from_secs(connect_secs),
        )
    }

    fn build_agent(timeout: Duration, connect_timeout: Duration) -> ureq::Agent {
        ureq::AgentBuilder::new()
            .timeout(timeout)
            .timeout_connect(connect_timeout)
            .build()
    }

    /// Create a client with a custom endpoint.
    pub fn new(endpoint: &str) -> Self {
        let (timeout, connect_timeout) = Self::default_timeouts();
        Self::with_timeouts(endpoint, timeout, connect_timeout)
    }

    /// Create a client with explicit timeouts.
    pub fn with_timeouts(endpoint: &str, timeout: Duration, connect_timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            agent: Self::build_agent(timeout, connect_timeout),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Execute one JSON-RPC call and return its `result`.
    async fn call(&self, method: &'static str, params: Value) -> Result<Value> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": self.next_id.fetch_add(1, Ordering::Relaxed),
            "method": method,
            "params": params,
        });
        let agent = self.agent.clone();
        let endpoint = self.endpoint.clone();

        let response = tokio::task::spawn_blocking(move || post_json(&agent, &endpoint, &body))
            .await
            .context("JSON-RPC worker panicked")?
            .with_context(|| format!("{} request failed", method))?;

        extract_result(&self.endpoint, method, response)
    }
}

fn post_json(agent: &ureq::Agent, endpoint: &str, body: &Value) -> Result<Value> {
    match agent
        .post(endpoint)
        .set("Content-Type", "application/json")
        .send_json(body)
    {
        Ok(resp) => resp
            .into_json::<Value>()
            .map_err(|e| anyhow!("Failed to parse JSON-RPC response: {}", e)),
        Err(ureq::Error::Status(429, resp)) => Err(RateLimitError {
            endpoint: endpoint.to_string(),
            message: resp
                .into_string()
                .unwrap_or_else(|_| "429 Too Many Requests".to_string()),
        }
        .into()),
        Err(ureq::Error::Status(code, resp)) => {
            let text = resp.into_string().unwrap_or_default();
            Err(anyhow!("HTTP {}: {}", code, text.trim()))
        }
        Err(e) => Err(anyhow!("transport error: {}", e)),
    }
}

fn is_rate_limit_message(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("rate limit") || lower.contains("too many requests") || lower.contains("429")
}

/// Unwrap a JSON-RPC response envelope.
fn extract_result(endpoint: &str, method: &str, response: Value) -> Result<Value> {
    if let Some(error) = response.get("error").filter(|e| !e.is_null()) {
        let code = error.get("code").and_then(Value::as_i64).unwrap_or(0);
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        if is_rate_limit_message(&message) {
            return Err(RateLimitError {
                endpoint: endpoint.to_string(),
                message,
            }
            .into());
        }
        return Err(anyhow!("{} returned error {}: {}", method, code, message));
    }

    match response.get("result") {
        Some(result) => Ok(result.clone()),
        None => Err(anyhow!("{} response has no result", method)),
    }
}

/// Parse a `{ data: [...], nextCursor, hasNextPage }` page.
///
/// Fullnodes report the last item's cursor even on the final page, so the
/// cursor is only kept when `hasNextPage` is true.
fn parse_page<T>(result: &Value, parse: impl Fn(&Value) -> Option<T>) -> Page<T> {
    let data = result
        .get("data")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(&parse).collect())
        .unwrap_or_default();
    let has_next = result
        .get("hasNextPage")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let next_cursor = if has_next {
        match result.get("nextCursor") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        }
    } else {
        None
    };
    Page { data, next_cursor }
}

#[async_trait::async_trait]
impl ObjectClient for JsonRpcClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn get_object(
        &self,
        id: &ObjectId,
        options: ObjectDataOptions,
    ) -> Result<Option<RawObjectRecord>> {
        let result = self
            .call("sui_getObject", json!([id.as_str(), options.to_json()]))
            .await?;
        Ok(RawObjectRecord::from_json(&result))
    }

    async fn multi_get_objects(
        &self,
        ids: &[ObjectId],
        options: ObjectDataOptions,
    ) -> Result<Vec<RawObjectRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let id_list: Vec<&str> = ids.iter().map(ObjectId::as_str).collect();
        let result = self
            .call("sui_multiGetObjects", json!([id_list, options.to_json()]))
            .await?;
        let records = result
            .as_array()
            .ok_or_else(|| anyhow!("sui_multiGetObjects returned a non-array result"))?
            .iter()
            .filter_map(RawObjectRecord::from_json)
            .collect();
        Ok(records)
    }

    async fn get_owned_objects(
        &self,
        owner: &Address,
        query: &OwnedObjectsQuery,
        cursor: Option<String>,
        limit: usize,
    ) -> Result<Page<RawObjectRecord>> {
        let result = self
            .call(
                "suix_getOwnedObjects",
                json!([owner.as_str(), query.to_json(), cursor, limit]),
            )
            .await?;
        Ok(parse_page(&result, RawObjectRecord::from_json))
    }

    async fn get_dynamic_fields(
        &self,
        parent: &ObjectId,
        cursor: Option<String>,
        limit: usize,
    ) -> Result<Page<DynamicFieldEntry>> {
        let result = self
            .call(
                "suix_getDynamicFields",
                json!([parent.as_str(), cursor, limit]),
            )
            .await?;
        Ok(parse_page(&result, DynamicFieldEntry::from_json))
    }
}
