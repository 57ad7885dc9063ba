//! Campus test utilities.
//!
//! Shared test infrastructure for the Campus workspace:
//! - [`MockTransport`], a scriptable [`HttpTransport`] double
//! - Proptest generators for contexts, params, and endpoints

pub use campus_cache::HttpTransport;
pub use campus_core::{ApiError, ApiResult, HttpMethod, QueryParams, RequestContext, Role};

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

/// One request the mock observed, for call-shape assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: HttpMethod,
    pub endpoint: String,
    pub params: Option<QueryParams>,
    pub body: Option<Value>,
}

/// A scriptable transport double.
///
/// Responses are registered per `(method, endpoint)` route; unrouted requests
/// fall through to a configurable default. Every request is counted and
/// recorded, and an optional artificial latency keeps requests in flight long
/// enough for coalescing and cancellation tests to overlap them reliably.
pub struct MockTransport {
    routes: Mutex<HashMap<(HttpMethod, String), ApiResult<Value>>>,
    default_response: ApiResult<Value>,
    calls: AtomicUsize,
    recorded: Mutex<Vec<RecordedCall>>,
    latency: Duration,
}

impl MockTransport {
    /// A transport that answers every request with `value`.
    pub fn new(value: Value) -> Self {
        Self {
            routes: Mutex::new(HashMap::new()),
            default_response: Ok(value),
            calls: AtomicUsize::new(0),
            recorded: Mutex::new(Vec::new()),
            latency: Duration::ZERO,
        }
    }

    /// A transport that fails every request with `err`.
    pub fn failing(err: ApiError) -> Self {
        Self {
            routes: Mutex::new(HashMap::new()),
            default_response: Err(err),
            calls: AtomicUsize::new(0),
            recorded: Mutex::new(Vec::new()),
            latency: Duration::ZERO,
        }
    }

    /// Register a fixed response for one route.
    pub fn with_route(
        self,
        method: HttpMethod,
        endpoint: impl Into<String>,
        response: ApiResult<Value>,
    ) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert((method, endpoint.into()), response);
        self
    }

    /// Delay every response by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Replace the response for a route after construction. Lets a test
    /// change what the "server" returns between two fetches.
    pub fn set_route(
        &self,
        method: HttpMethod,
        endpoint: impl Into<String>,
        response: ApiResult<Value>,
    ) {
        self.routes
            .lock()
            .unwrap()
            .insert((method, endpoint.into()), response);
    }

    /// Total number of requests seen.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of requests seen for one route.
    pub fn calls_to(&self, method: HttpMethod, endpoint: &str) -> usize {
        self.recorded
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.method == method && call.endpoint == endpoint)
            .count()
    }

    /// Everything the mock has observed, in order.
    pub fn recorded(&self) -> Vec<RecordedCall> {
        self.recorded.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        params: Option<&QueryParams>,
        body: Option<&Value>,
    ) -> ApiResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.recorded.lock().unwrap().push(RecordedCall {
            method,
            endpoint: endpoint.to_string(),
            params: params.cloned(),
            body: body.cloned(),
        });
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let routed = self
            .routes
            .lock()
            .unwrap()
            .get(&(method, endpoint.to_string()))
            .cloned();
        routed.unwrap_or_else(|| self.default_response.clone())
    }
}

/// Proptest generators for Campus domain values.
pub mod generators {
    use super::*;
    use proptest::prelude::*;

    /// Identifier-shaped strings: what institute/class/user ids look like.
    pub fn arb_ident() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9_-]{1,16}"
    }

    /// Endpoint paths with one to three segments.
    pub fn arb_endpoint() -> impl Strategy<Value = String> {
        prop::collection::vec("[a-z][a-z0-9-]{0,11}", 1..=3)
            .prop_map(|segments| format!("/{}", segments.join("/")))
    }

    pub fn arb_role() -> impl Strategy<Value = Role> {
        prop_oneof![
            Just(Role::SystemAdmin),
            Just(Role::InstituteAdmin),
            Just(Role::Teacher),
            Just(Role::AttendanceMarker),
            Just(Role::Student),
            Just(Role::Parent),
        ]
    }

    pub fn arb_context() -> impl Strategy<Value = RequestContext> {
        (
            prop::option::of(arb_ident()),
            prop::option::of(arb_ident()),
            prop::option::of(arb_ident()),
            prop::option::of(arb_ident()),
            prop::option::of(arb_role()),
        )
            .prop_map(|(user, institute, class, subject, role)| RequestContext {
                user_id: user,
                institute_id: institute,
                class_id: class,
                subject_id: subject,
                role,
            })
    }

    pub fn arb_params() -> impl Strategy<Value = QueryParams> {
        prop::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..4)
            .prop_map(|map| map.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_routes_take_precedence_over_default() {
        let transport = MockTransport::new(json!("default")).with_route(
            HttpMethod::Get,
            "/students",
            Ok(json!("routed")),
        );

        let routed = transport
            .request(HttpMethod::Get, "/students", None, None)
            .await
            .unwrap();
        let fallthrough = transport
            .request(HttpMethod::Get, "/homework", None, None)
            .await
            .unwrap();

        assert_eq!(routed, json!("routed"));
        assert_eq!(fallthrough, json!("default"));
        assert_eq!(transport.calls(), 2);
        assert_eq!(transport.calls_to(HttpMethod::Get, "/students"), 1);
    }

    #[tokio::test]
    async fn test_records_call_shape() {
        let transport = MockTransport::new(json!(null));
        let params = QueryParams::new().with("page", 2);
        transport
            .request(HttpMethod::Post, "/students", Some(&params), Some(&json!({"name": "A"})))
            .await
            .unwrap();

        let recorded = transport.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].method, HttpMethod::Post);
        assert_eq!(recorded[0].endpoint, "/students");
        assert_eq!(recorded[0].params, Some(params));
        assert_eq!(recorded[0].body, Some(json!({"name": "A"})));
    }

    #[tokio::test]
    async fn test_failing_transport() {
        let transport = MockTransport::failing(ApiError::network("offline"));
        let err = transport
            .request(HttpMethod::Get, "/anything", None, None)
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::network("offline"));
    }
}
