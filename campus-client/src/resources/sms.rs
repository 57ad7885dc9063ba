//! SMS history façade.
//!
//! Sending messages is the only mutation; there is no update or delete.
//! A successful send still invalidates the cached history views so the UI's
//! next read shows the queued messages.

use uuid::Uuid;

use campus_cache::CachedClient;
use campus_core::{ApiResult, QueryParams, RequestContext};

use crate::resources::{ReadOptions, Resource};
use crate::types::{PageQuery, Paginated, SendSms, SmsMessage, SmsStatus};

const ENDPOINT: &str = "/sms";

#[derive(Debug, Clone, Default)]
pub struct SmsQuery {
    pub page: PageQuery,
    pub status: Option<SmsStatus>,
}

impl SmsQuery {
    pub fn params(&self) -> QueryParams {
        let mut params = self.page.params();
        let status = self.status.map(|s| match s {
            SmsStatus::Queued => "QUEUED",
            SmsStatus::Sent => "SENT",
            SmsStatus::Failed => "FAILED",
        });
        params.set_opt("status", status);
        params
    }
}

#[derive(Clone)]
pub struct Sms {
    resource: Resource,
}

impl Sms {
    pub fn new(api: CachedClient, context: RequestContext) -> Self {
        Self {
            resource: Resource::new(api, ENDPOINT, context),
        }
    }

    pub async fn history(
        &self,
        query: &SmsQuery,
        options: ReadOptions,
    ) -> ApiResult<Paginated<SmsMessage>> {
        self.resource.list(query.params(), options).await
    }

    pub async fn get(&self, id: Uuid, options: ReadOptions) -> ApiResult<SmsMessage> {
        self.resource.get_item(id, options).await
    }

    pub fn has_cache(&self, query: &SmsQuery) -> bool {
        self.resource.has_cache(&query.params())
    }

    pub fn cached_only(&self, query: &SmsQuery) -> Option<Paginated<SmsMessage>> {
        self.resource.cached_only(&query.params())
    }

    /// Queue messages for delivery and invalidate cached history.
    pub async fn send(&self, request: &SendSms) -> ApiResult<Vec<SmsMessage>> {
        self.resource.create(request).await
    }
}
