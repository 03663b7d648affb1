use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An admin operation posted to the cluster control endpoint.
///
/// The control plane speaks a GraphQL-shaped protocol: a request is an
/// operation document plus a mapping of named variables, serialized as
/// `{ "query": ..., "variables": {...} }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminRequest {
    pub query: String,
    #[serde(default)]
    pub variables: serde_json::Map<String, Value>,
}

impl AdminRequest {
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: serde_json::Map::new(),
        }
    }

    /// Bind a named variable. Later bindings of the same name win.
    #[must_use]
    pub fn variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }
}

/// The control plane's response envelope: a data payload, a list of errors,
/// and optional extensions. A non-empty error list means the request failed
/// as a whole, whatever `data` contains.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Vec<AdminApiError>,
    #[serde(default)]
    pub extensions: Option<Value>,
}

impl AdminResponse {
    /// Extract the data payload, treating a non-empty error list as failure.
    ///
    /// A response with no errors and no data yields `Value::Null`; sparse
    /// responses are the status query's normal shape while a task is young.
    pub fn into_data(self) -> Result<Value, Vec<AdminApiError>> {
        if self.errors.is_empty() {
            Ok(self.data.unwrap_or(Value::Null))
        } else {
            Err(self.errors)
        }
    }
}

/// One entry of the response error list.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminApiError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub extensions: Option<Value>,
}

impl AdminApiError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            extensions: None,
        }
    }
}

impl fmt::Display for AdminApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
