//! The shared request dispatcher.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use super::ApiError;
use super::middleware::{
    BearerAuth, ErrorLogging, RequestMiddleware, ResponseEvent, ResponseMiddleware, SessionExpiry,
};
use super::navigator::Navigator;
use crate::session::{SessionState, SessionStore};

/// Client for the admin REST backend.
///
/// Cheap to clone; clones share the connection pool and middleware chain.
#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<HttpClientInner>,
}

struct HttpClientInner {
    client: reqwest::Client,
    base_url: Url,
    request_middleware: Vec<Arc<dyn RequestMiddleware>>,
    response_middleware: Vec<Arc<dyn ResponseMiddleware>>,
}

/// Error body shape used by the backend: `{"message": "..."}`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Builds an [`HttpClient`] with an ordered middleware chain.
pub struct HttpClientBuilder {
    base_url: Url,
    request_middleware: Vec<Arc<dyn RequestMiddleware>>,
    response_middleware: Vec<Arc<dyn ResponseMiddleware>>,
}

impl HttpClientBuilder {
    /// Append a request middleware. Runs after those already registered.
    #[must_use]
    pub fn request_middleware(mut self, middleware: impl RequestMiddleware + 'static) -> Self {
        self.request_middleware.push(Arc::new(middleware));
        self
    }

    /// Append a response middleware. Runs after those already registered.
    #[must_use]
    pub fn response_middleware(mut self, middleware: impl ResponseMiddleware + 'static) -> Self {
        self.response_middleware.push(Arc::new(middleware));
        self
    }

    /// Register the standard session chain: bearer token injection, session
    /// expiry on 401, then error logging.
    #[must_use]
    pub fn session(
        self,
        store: &SessionStore,
        state: &SessionState,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        self.request_middleware(BearerAuth::new(store.clone()))
            .response_middleware(SessionExpiry::new(store.clone(), state.clone(), navigator))
            .response_middleware(ErrorLogging)
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client fails to build.
    pub fn build(self) -> Result<HttpClient, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to create HTTP client: {e}")))?;

        Ok(HttpClient {
            inner: Arc::new(HttpClientInner {
                client,
                base_url: self.base_url,
                request_middleware: self.request_middleware,
                response_middleware: self.response_middleware,
            }),
        })
    }
}

impl HttpClient {
    /// Start building a client for `base_url` with an empty middleware chain.
    #[must_use]
    pub const fn builder(base_url: Url) -> HttpClientBuilder {
        HttpClientBuilder {
            base_url,
            request_middleware: Vec::new(),
            response_middleware: Vec::new(),
        }
    }

    /// Client with the standard session chain.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client fails to build.
    pub fn with_session(
        base_url: Url,
        store: &SessionStore,
        state: &SessionState,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        Self::builder(base_url).session(store, state, navigator).build()
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Absolute URL for a backend path, with optional query pairs.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` if the result is not a valid URL.
    pub fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, ApiError> {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        let mut url = Url::parse(&format!("{base}/{path}"))
            .map_err(|e| ApiError::InvalidRequest(format!("{path}: {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<RequestBuilder, ApiError> {
        Ok(self.inner.client.request(method, self.url(path, query)?))
    }

    /// Run the middleware chain around one call.
    ///
    /// 2xx responses are returned as-is; anything else becomes an [`ApiError`]
    /// after response middleware has seen it.
    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let mut request = builder
            .build()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

        for middleware in &self.inner.request_middleware {
            middleware.on_request(&mut request);
        }

        let method = request.method().clone();
        let path = request.url().path().to_string();

        match self.inner.client.execute(request).await {
            Ok(response) => {
                let status = response.status();
                self.notify(&ResponseEvent::Status {
                    method,
                    path,
                    status,
                });
                if status.is_success() {
                    Ok(response)
                } else {
                    Err(error_from_response(response).await)
                }
            }
            Err(e) => {
                let reason = e.to_string();
                self.notify(&ResponseEvent::NoResponse {
                    method,
                    path,
                    reason: reason.clone(),
                });
                Err(ApiError::Network(reason))
            }
        }
    }

    fn notify(&self, event: &ResponseEvent) {
        for middleware in &self.inner.response_middleware {
            middleware.on_response(event);
        }
    }

    // =========================================================================
    // Typed helpers
    // =========================================================================

    /// GET a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the body does not decode as `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.get_json_with_query(path, &[]).await
    }

    /// GET a JSON body with query pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the body does not decode as `T`.
    pub async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::GET, path, query)?).await?;
        decode(response).await
    }

    /// POST a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the body does not decode as `T`.
    pub async fn post_json<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .send(self.request(Method::POST, path, &[])?.json(body))
            .await?;
        decode(response).await
    }

    /// PATCH a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the body does not decode as `T`.
    pub async fn patch_json<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .send(self.request(Method::PATCH, path, &[])?.json(body))
            .await?;
        decode(response).await
    }

    /// DELETE a resource. Any response body is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, path, &[])?).await?;
        Ok(())
    }

    /// POST without a body. Any response body is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    pub async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.request(Method::POST, path, &[])?).await?;
        Ok(())
    }

    /// POST a multipart form and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the body does not decode as `T`.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        let response = self
            .send(self.request(Method::POST, path, &[])?.multipart(form))
            .await?;
        decode(response).await
    }

    /// PATCH a multipart form and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the body does not decode as `T`.
    pub async fn patch_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        let response = self
            .send(self.request(Method::PATCH, path, &[])?.multipart(form))
            .await?;
        decode(response).await
    }

    /// GET a raw body, e.g. a spreadsheet download.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the body cannot be read.
    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.send(self.request(Method::GET, path, &[])?).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("request_middleware", &self.inner.request_middleware.len())
            .field("response_middleware", &self.inner.response_middleware.len())
            .finish()
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// Build the error for a non-2xx response, keeping the backend's `message`.
async fn error_from_response(response: Response) -> ApiError {
    let status = response.status();
    let message = response
        .json::<ErrorBody>()
        .await
        .unwrap_or_default()
        .message
        .filter(|m| !m.trim().is_empty());

    if status == reqwest::StatusCode::UNAUTHORIZED {
        ApiError::Unauthorized { message }
    } else {
        ApiError::Status { status, message }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpClient {
        HttpClient::builder(Url::parse(base).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_url_joins_paths() {
        let local = client("http://localhost:3000");
        assert_eq!(
            local.url("/admin/auth/login", &[]).unwrap().as_str(),
            "http://localhost:3000/admin/auth/login"
        );

        let nested = client("https://api.example.com/v1/");
        assert_eq!(
            nested.url("/admin/users", &[]).unwrap().as_str(),
            "https://api.example.com/v1/admin/users"
        );
    }

    #[test]
    fn test_url_encodes_query() {
        let local = client("http://localhost:3000");
        let url = local
            .url("/admin/pharmacies/search", &[("q", "cedar & sons")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/admin/pharmacies/search?q=cedar+%26+sons"
        );
    }

    #[test]
    fn test_builder_keeps_registration_order() {
        let client = HttpClient::builder(Url::parse("http://localhost:3000").unwrap())
            .request_middleware(|_: &mut reqwest::Request| {})
            .response_middleware(ErrorLogging)
            .response_middleware(|_: &ResponseEvent| {})
            .build()
            .unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains("request_middleware: 1"));
        assert!(debug.contains("response_middleware: 2"));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = client(&format!("http://127.0.0.1:{port}"));
        let err = client.get_json::<serde_json::Value>("/admin/users").await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }
}
