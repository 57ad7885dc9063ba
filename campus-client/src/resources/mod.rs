//! Typed per-resource façades.
//!
//! Each façade binds one backend endpoint and the context it was constructed
//! under. Reads delegate to the fetch orchestrator with that fixed endpoint;
//! mutations go straight to the network and then invalidate the resource
//! family under the façade's context. The probes (`has_cache` /
//! `cached_only`) never touch the network and exist for optimistic UI
//! rendering.

pub mod classes;
pub mod exam_results;
pub mod homework;
pub mod sms;
pub mod students;

pub use classes::Classes;
pub use exam_results::{ExamResultQuery, ExamResults};
pub use homework::HomeworkFacade;
pub use sms::{Sms, SmsQuery};
pub use students::{StudentQuery, Students};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use campus_cache::{CachedClient, FetchOptions};
use campus_core::{ApiError, ApiResult, QueryParams, RequestContext};

/// Per-read options a façade forwards to the orchestrator. The context is
/// not part of this struct; it is fixed when the façade is constructed.
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    pub force_refresh: bool,
    pub ttl_minutes: Option<u32>,
    pub stale_while_revalidate: bool,
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn force_refresh(mut self) -> Self {
        self.force_refresh = true;
        self
    }

    pub fn with_ttl_minutes(mut self, minutes: u32) -> Self {
        self.ttl_minutes = Some(minutes);
        self
    }

    pub fn stale_while_revalidate(mut self) -> Self {
        self.stale_while_revalidate = true;
        self
    }

    fn into_fetch(self, context: &RequestContext) -> FetchOptions {
        FetchOptions {
            force_refresh: self.force_refresh,
            ttl_minutes: self.ttl_minutes,
            stale_while_revalidate: self.stale_while_revalidate,
            context: context.clone(),
        }
    }
}

/// The shared plumbing behind every façade: one endpoint, one context, one
/// cached client.
#[derive(Clone)]
pub(crate) struct Resource {
    api: CachedClient,
    endpoint: &'static str,
    context: RequestContext,
}

impl Resource {
    pub(crate) fn new(api: CachedClient, endpoint: &'static str, context: RequestContext) -> Self {
        Self {
            api,
            endpoint,
            context,
        }
    }

    fn item_endpoint(&self, id: Uuid) -> String {
        format!("{}/{}", self.endpoint, id)
    }

    pub(crate) async fn list<T: DeserializeOwned>(
        &self,
        params: QueryParams,
        options: ReadOptions,
    ) -> ApiResult<T> {
        self.api
            .get_as(
                self.endpoint,
                Some(params),
                options.into_fetch(&self.context),
            )
            .await
    }

    pub(crate) async fn get_item<T: DeserializeOwned>(
        &self,
        id: Uuid,
        options: ReadOptions,
    ) -> ApiResult<T> {
        self.api
            .get_as(
                &self.item_endpoint(id),
                None,
                options.into_fetch(&self.context),
            )
            .await
    }

    pub(crate) fn has_cache(&self, params: &QueryParams) -> bool {
        self.api
            .has_cache(self.endpoint, Some(params), &self.context)
    }

    /// The cached collection view, stale or fresh, without fetching.
    ///
    /// A cached value that no longer matches the expected shape is treated
    /// as a miss rather than an error; the caller falls back to a real
    /// fetch, which will overwrite the entry.
    pub(crate) fn cached_only<T: DeserializeOwned>(&self, params: &QueryParams) -> Option<T> {
        let value = self
            .api
            .get_cached_only(self.endpoint, Some(params), &self.context)?;
        match serde_json::from_value(value) {
            Ok(typed) => Some(typed),
            Err(err) => {
                warn!(endpoint = self.endpoint, %err, "cached value has unexpected shape");
                None
            }
        }
    }

    pub(crate) async fn create<T: DeserializeOwned>(
        &self,
        body: &impl Serialize,
    ) -> ApiResult<T> {
        let body = to_body(body)?;
        let value = self.api.post(self.endpoint, &body, &self.context).await?;
        from_value(value)
    }

    pub(crate) async fn update<T: DeserializeOwned>(
        &self,
        id: Uuid,
        body: &impl Serialize,
    ) -> ApiResult<T> {
        let body = to_body(body)?;
        let value = self
            .api
            .patch(&self.item_endpoint(id), &body, &self.context)
            .await?;
        from_value(value)
    }

    pub(crate) async fn delete(&self, id: Uuid) -> ApiResult<()> {
        self.api.delete(&self.item_endpoint(id), &self.context).await
    }
}

fn to_body(body: &impl Serialize) -> ApiResult<Value> {
    serde_json::to_value(body).map_err(|e| ApiError::decode(e.to_string()))
}

fn from_value<T: DeserializeOwned>(value: Value) -> ApiResult<T> {
    serde_json::from_value(value).map_err(|e| ApiError::decode(e.to_string()))
}
