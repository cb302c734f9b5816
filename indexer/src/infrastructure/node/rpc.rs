//! JSON-RPC 2.0 transport shared by every node endpoint

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::{Duration, Instant};

use super::error::NodeClientError;
use crate::utils::logging;

/// JSON-RPC client bound to one endpoint of the node
#[derive(Debug, Clone)]
pub struct RpcClient {
    endpoint: String,
    client: Client,
}

impl RpcClient {
    /// Create a client for `endpoint` sharing the given HTTP client
    pub fn new(client: Client, endpoint: String) -> Self {
        Self { endpoint, client }
    }

    /// Build the HTTP client used by every endpoint
    pub fn http_client(timeout: Duration) -> Result<Client, NodeClientError> {
        Ok(Client::builder().timeout(timeout).build()?)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Call `method` and deserialize its result
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, NodeClientError> {
        let result = self.call_raw(method, params, None).await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Call `method` with a request timeout that overrides the client default
    pub async fn call_with_timeout<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
        timeout: Duration,
    ) -> Result<T, NodeClientError> {
        let result = self.call_raw(method, params, Some(timeout)).await?;
        Ok(serde_json::from_value(result)?)
    }

    async fn call_raw(
        &self,
        method: &str,
        params: Value,
        timeout: Option<Duration>,
    ) -> Result<Value, NodeClientError> {
        let request_body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params
        });

        let started = Instant::now();
        let mut request = self.client.post(&self.endpoint).json(&request_body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let result = Self::send(request).await;
        logging::log_debug(&format!(
            "rpc call method={} endpoint={} duration={:?}",
            method,
            self.endpoint,
            started.elapsed()
        ));

        if let Err(e) = &result {
            logging::log_error(&format!("rpc call failed method={}: {}", method, e));
        }
        result
    }

    async fn send(request: reqwest::RequestBuilder) -> Result<Value, NodeClientError> {
        let response = request.send().await?;
        let status = response.status();
        let response_json: Value = response.json().await.map_err(|e| {
            NodeClientError::ResponseError(format!("status {}: {}", status, e))
        })?;
        parse_response(response_json)
    }
}

/// Extract the result of a JSON-RPC response, turning error objects into errors
fn parse_response(response_json: Value) -> Result<Value, NodeClientError> {
    if let Some(error) = response_json.get("error").filter(|e| !e.is_null()) {
        let code = error.get("code").and_then(Value::as_i64).unwrap_or(0);
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        if message.contains("not found") {
            return Err(NodeClientError::NotFound(message));
        }
        return Err(NodeClientError::RpcError { code, message });
    }

    response_json
        .get("result")
        .cloned()
        .ok_or_else(|| NodeClientError::ResponseError("No result in response".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_is_extracted() {
        let value = parse_response(json!({"jsonrpc": "2.0", "id": 1, "result": {"height": "12"}}))
            .unwrap();
        assert_eq!(value["height"], "12");
    }

    #[test]
    fn error_objects_become_errors() {
        let err = parse_response(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": -32000, "message": "boom"}
        }))
        .unwrap_err();
        assert!(matches!(err, NodeClientError::RpcError { code: -32000, .. }));

        let missing = parse_response(json!({
            "error": {"code": -32000, "message": "transaction not found"}
        }))
        .unwrap_err();
        assert!(missing.is_not_found());
    }

    #[test]
    fn null_result_is_kept() {
        let value = parse_response(json!({"id": 1, "result": null, "error": null})).unwrap();
        assert!(value.is_null());
    }
}
