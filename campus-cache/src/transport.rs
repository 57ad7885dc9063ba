//! The transport seam.
//!
//! The caching core makes exactly one kind of outbound call, abstracted
//! behind [`HttpTransport`]. The surrounding application supplies the
//! implementation (base-URL resolution, auth headers, JSON parsing,
//! timeouts); tests supply mocks. The core owns no timeout or retry logic —
//! a hung transport call holds the in-flight slot for its key open until it
//! resolves or rejects.

use async_trait::async_trait;
use campus_core::{ApiResult, HttpMethod, QueryParams};
use serde_json::Value;

/// The single abstract network operation the cache core depends on.
///
/// Implementations must return `Ok` only for usable 2xx responses and a
/// cloneable [`ApiError`](campus_core::ApiError) otherwise; the core never
/// caches a rejected fetch.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform an HTTP request and return the parsed JSON body.
    async fn request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        params: Option<&QueryParams>,
        body: Option<&Value>,
    ) -> ApiResult<Value>;
}
