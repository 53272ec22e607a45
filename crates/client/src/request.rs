//! Request values passed between the pipeline stages.
//!
//! Everything here is immutable once built. Replaying a request produces a
//! new [`RequestContext`] instead of flipping a flag on a shared object.

use std::fmt;
use std::sync::Arc;

use pineapple_auth::SessionStore;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ClientError, ClientResult};

/// A call against the API, relative to the configured base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
    recover_auth: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            recover_auth: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> ClientResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// A 401 on this request means bad credentials, not an expired session:
    /// it is returned as is and never triggers a refresh.
    pub fn without_auth_recovery(mut self) -> Self {
        self.recover_auth = false;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn recovers_auth(&self) -> bool {
        self.recover_auth
    }
}

/// An [`ApiRequest`] plus its one-shot replay marker.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request: Arc<ApiRequest>,
    retried: bool,
}

impl RequestContext {
    pub fn new(request: ApiRequest) -> Self {
        Self {
            request: Arc::new(request),
            retried: false,
        }
    }

    pub fn request(&self) -> &ApiRequest {
        &self.request
    }

    pub fn retried(&self) -> bool {
        self.retried
    }

    /// The same request, marked as already replayed once.
    pub fn replay(&self) -> Self {
        Self {
            request: Arc::clone(&self.request),
            retried: true,
        }
    }
}

/// A request with the credential it will be sent with.
#[derive(Clone)]
pub struct PreparedRequest {
    request: Arc<ApiRequest>,
    bearer: Option<String>,
}

impl PreparedRequest {
    pub fn unauthenticated(request: ApiRequest) -> Self {
        Self {
            request: Arc::new(request),
            bearer: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_bearer(request: ApiRequest, bearer: Option<String>) -> Self {
        Self {
            request: Arc::new(request),
            bearer,
        }
    }

    pub fn request(&self) -> &ApiRequest {
        &self.request
    }

    pub fn bearer(&self) -> Option<&str> {
        self.bearer.as_deref()
    }
}

impl fmt::Debug for PreparedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedRequest")
            .field("method", self.request.method())
            .field("path", &self.request.path())
            .field("authenticated", &self.bearer.is_some())
            .finish()
    }
}

/// Reads the access token at send time. No token means the request goes out
/// unauthenticated.
pub fn attach_auth(context: &RequestContext, store: &SessionStore) -> PreparedRequest {
    PreparedRequest {
        request: Arc::clone(&context.request),
        bearer: store.access_token(),
    }
}

/// Status and body of an HTTP response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: StatusCode,
    body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn json<T: DeserializeOwned>(&self) -> ClientResult<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub fn into_error(self) -> ClientError {
        ClientError::from_response(self.status, &self.body)
    }

    /// `Ok` for 2xx, the server's error otherwise.
    pub fn into_result(self) -> ClientResult<Self> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(self.into_error())
        }
    }
}
