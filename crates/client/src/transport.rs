//! The seam between the client and the network.

use serde::Serialize;
use serde_json::Value;

use crate::error::{ClientError, TransportError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl core::fmt::Display for Method {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        })
    }
}

/// A backend call, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Bearer token; filled in by the API client from the session.
    pub token: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            token: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ClientError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Append the fields of a flat struct as query parameters; `None` fields are skipped.
    pub fn query<Q: Serialize + ?Sized>(mut self, query: &Q) -> Result<Self, ClientError> {
        match serde_json::to_value(query)? {
            Value::Object(fields) => {
                for (key, value) in fields {
                    let value = match value {
                        Value::Null => continue,
                        Value::String(s) => s,
                        other => other.to_string(),
                    };
                    self.query.push((key, value));
                }
                Ok(self)
            }
            Value::Null => Ok(self),
            other => Err(ClientError::Decode(format!(
                "query must serialize to an object, got {other}"
            ))),
        }
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Raw backend answer: HTTP status plus the body, if it was JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Option<Value>,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    pub fn empty(status: u16) -> Self {
        Self { status, body: None }
    }
}

/// Sends requests to the backend.
///
/// Implementations only move bytes; envelope interpretation, session handling
/// and error mapping belong to [`ApiClient`](crate::ApiClient).
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinit_core::Status;
    use kinit_system::UserQuery;

    #[test]
    fn query_skips_absent_fields() {
        let query = UserQuery {
            status: Some(Status::Disabled),
            ..UserQuery::default()
        };
        let req = ApiRequest::get("/user/list").query(&query).unwrap();

        assert_eq!(req.query_value("page"), Some("1"));
        assert_eq!(req.query_value("pageSize"), Some("10"));
        assert_eq!(req.query_value("status"), Some("0"));
        assert_eq!(req.query_value("keyword"), None);
    }

    #[test]
    fn rejects_non_object_query() {
        assert!(ApiRequest::get("/x").query(&[1, 2]).is_err());
    }
}
