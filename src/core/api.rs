//! REST persistence layer.
//!
//! Every backend call is a POST whose JSON body carries the scope
//! identifiers plus, for upserts, the full merged record. Responses use the
//! `{ success, ... }` envelope; anything other than `success == true` is a
//! failure, and a 401 (or the envelope's session flag) means the session
//! was invalidated server-side.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::core::error::{ApiError, DEFAULT_PERSIST_ERROR};
use crate::core::session::Scope;
use crate::core::table::{JsonMap, MasterDataStore, OptionsSource, TableSpec};
use crate::core::table::debounce::WeightSink;

/// Hard cap on any single request. A timeout is the same retryable
/// failure as a server error and takes the same revert path.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct MutationEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(rename = "sessionExpired", default)]
    session_expired: bool,
}

/// Thin client over the backend REST contract.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(ApiClient { http, base_url })
    }

    async fn post(
        &self,
        path: &str,
        body: &Value,
        token: Option<&str>,
    ) -> Result<Value, ApiError> {
        debug!(path, "api request");
        let mut request = self.http.post(format!("{}{}", self.base_url, path)).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(transport_error)?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(ApiError::SessionInvalidated);
        }
        response.json().await.map_err(transport_error)
    }

    /// POST a list call, returning the row array under `plural_key`.
    pub async fn post_list(
        &self,
        path: &str,
        body: &Value,
        plural_key: &str,
        token: Option<&str>,
    ) -> Result<Vec<JsonMap>, ApiError> {
        let envelope = self.post(path, body, token).await?;
        check_envelope(&envelope)?;
        let rows = envelope
            .get(plural_key)
            .and_then(Value::as_array)
            .ok_or_else(|| {
                ApiError::network(format!("response is missing the {plural_key} list"))
            })?;
        Ok(rows
            .iter()
            .filter_map(Value::as_object)
            .cloned()
            .collect())
    }

    /// POST a mutation call, succeeding only on `success == true`.
    pub async fn post_mutation(
        &self,
        path: &str,
        body: &Value,
        token: Option<&str>,
    ) -> Result<(), ApiError> {
        let envelope = self.post(path, body, token).await?;
        let envelope: MutationEnvelope =
            serde_json::from_value(envelope).map_err(|e| ApiError::network(e.to_string()))?;
        if envelope.session_expired {
            return Err(ApiError::SessionInvalidated);
        }
        if envelope.success {
            return Ok(());
        }
        let message = envelope
            .error
            .or(envelope.message)
            .unwrap_or_else(|| DEFAULT_PERSIST_ERROR.to_string());
        Err(ApiError::Network { message })
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::network("request timed out")
    } else {
        ApiError::network(err.to_string())
    }
}

fn check_envelope(envelope: &Value) -> Result<(), ApiError> {
    if envelope.get("sessionExpired").and_then(Value::as_bool) == Some(true) {
        return Err(ApiError::SessionInvalidated);
    }
    if envelope.get("success").and_then(Value::as_bool) == Some(true) {
        return Ok(());
    }
    let message = envelope
        .get("error")
        .or_else(|| envelope.get("message"))
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_PERSIST_ERROR);
    Err(ApiError::network(message))
}

fn scope_body(scope: &Scope) -> JsonMap {
    match serde_json::to_value(scope) {
        Ok(Value::Object(map)) => map,
        _ => JsonMap::new(),
    }
}

/// `MasterDataStore` over the REST contract: scope fields and record
/// fields are merged flat into one request body.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: ApiClient,
    token: Option<String>,
}

impl HttpStore {
    pub fn new(client: ApiClient, token: Option<String>) -> Self {
        HttpStore { client, token }
    }

    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

impl MasterDataStore for HttpStore {
    async fn list(&self, spec: &TableSpec, scope: &Scope) -> Result<Vec<JsonMap>, ApiError> {
        let body = Value::Object(scope_body(scope));
        self.client
            .post_list(spec.list_path, &body, spec.plural_key, self.token())
            .await
    }

    async fn upsert(
        &self,
        spec: &TableSpec,
        scope: &Scope,
        record: &JsonMap,
    ) -> Result<(), ApiError> {
        let mut body = scope_body(scope);
        for (field, value) in record {
            body.insert(field.clone(), value.clone());
        }
        self.client
            .post_mutation(spec.upsert_path, &Value::Object(body), self.token())
            .await
    }

    async fn delete(&self, spec: &TableSpec, scope: &Scope, key: &str) -> Result<(), ApiError> {
        let path = spec.delete_path.ok_or_else(|| {
            ApiError::network(format!("{} rows cannot be deleted", spec.name))
        })?;
        let mut body = scope_body(scope);
        body.insert(spec.key_field.to_string(), Value::String(key.to_string()));
        self.client
            .post_mutation(path, &Value::Object(body), self.token())
            .await
    }

    async fn field_options(
        &self,
        source: OptionsSource,
        scope: &Scope,
    ) -> Result<Vec<String>, ApiError> {
        let (path, plural_key, value_field) = source.endpoint();
        let body = Value::Object(scope_body(scope));
        let rows = self
            .client
            .post_list(path, &body, plural_key, self.token())
            .await?;
        Ok(rows
            .iter()
            .filter_map(|row| row.get(value_field))
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect())
    }
}

/// Debounced unit-weight persistence over the same contract.
#[derive(Debug, Clone)]
pub struct UnitWeightApi {
    client: ApiClient,
    scope: Scope,
    token: Option<String>,
}

impl UnitWeightApi {
    pub fn new(client: ApiClient, scope: Scope, token: Option<String>) -> Self {
        UnitWeightApi {
            client,
            scope,
            token,
        }
    }
}

impl WeightSink for UnitWeightApi {
    async fn write(&self, key: &str, value: String) -> Result<(), ApiError> {
        let mut body = scope_body(&self.scope);
        body.insert("code".to_string(), Value::String(key.to_string()));
        body.insert("weight".to_string(), Value::String(value));
        self.client
            .post_mutation(
                "/unitweights/addorupdate",
                &Value::Object(body),
                self.token.as_deref(),
            )
            .await
    }
}
