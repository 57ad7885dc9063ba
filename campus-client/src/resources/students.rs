//! Students façade.

use uuid::Uuid;

use campus_cache::CachedClient;
use campus_core::{ApiResult, QueryParams, RequestContext};

use crate::resources::{ReadOptions, Resource};
use crate::types::{NewStudent, PageQuery, Paginated, Student, UpdateStudent};

const ENDPOINT: &str = "/students";

/// List-endpoint parameters for students.
#[derive(Debug, Clone, Default)]
pub struct StudentQuery {
    pub page: PageQuery,
    /// Restrict to one class.
    pub class_id: Option<Uuid>,
}

impl StudentQuery {
    pub fn params(&self) -> QueryParams {
        let mut params = self.page.params();
        params.set_opt("classId", self.class_id.map(|id| id.to_string()));
        params
    }
}

#[derive(Clone)]
pub struct Students {
    resource: Resource,
}

impl Students {
    pub fn new(api: CachedClient, context: RequestContext) -> Self {
        Self {
            resource: Resource::new(api, ENDPOINT, context),
        }
    }

    pub async fn list(
        &self,
        query: &StudentQuery,
        options: ReadOptions,
    ) -> ApiResult<Paginated<Student>> {
        self.resource.list(query.params(), options).await
    }

    pub async fn get(&self, id: Uuid, options: ReadOptions) -> ApiResult<Student> {
        self.resource.get_item(id, options).await
    }

    pub fn has_cache(&self, query: &StudentQuery) -> bool {
        self.resource.has_cache(&query.params())
    }

    pub fn cached_only(&self, query: &StudentQuery) -> Option<Paginated<Student>> {
        self.resource.cached_only(&query.params())
    }

    pub async fn create(&self, student: &NewStudent) -> ApiResult<Student> {
        self.resource.create(student).await
    }

    pub async fn update(&self, id: Uuid, changes: &UpdateStudent) -> ApiResult<Student> {
        self.resource.update(id, changes).await
    }

    pub async fn delete(&self, id: Uuid) -> ApiResult<()> {
        self.resource.delete(id).await
    }
}
