//! Institute-classes façade.

use uuid::Uuid;

use campus_cache::CachedClient;
use campus_core::{ApiResult, RequestContext};

use crate::resources::{ReadOptions, Resource};
use crate::types::{InstituteClass, NewInstituteClass, PageQuery, Paginated};

const ENDPOINT: &str = "/institute-classes";

#[derive(Clone)]
pub struct Classes {
    resource: Resource,
}

impl Classes {
    pub fn new(api: CachedClient, context: RequestContext) -> Self {
        Self {
            resource: Resource::new(api, ENDPOINT, context),
        }
    }

    pub async fn list(
        &self,
        query: &PageQuery,
        options: ReadOptions,
    ) -> ApiResult<Paginated<InstituteClass>> {
        self.resource.list(query.params(), options).await
    }

    pub async fn get(&self, id: Uuid, options: ReadOptions) -> ApiResult<InstituteClass> {
        self.resource.get_item(id, options).await
    }

    pub fn has_cache(&self, query: &PageQuery) -> bool {
        self.resource.has_cache(&query.params())
    }

    pub fn cached_only(&self, query: &PageQuery) -> Option<Paginated<InstituteClass>> {
        self.resource.cached_only(&query.params())
    }

    pub async fn create(&self, class: &NewInstituteClass) -> ApiResult<InstituteClass> {
        self.resource.create(class).await
    }

    pub async fn delete(&self, id: Uuid) -> ApiResult<()> {
        self.resource.delete(id).await
    }
}
