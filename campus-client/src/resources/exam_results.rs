//! Exam-results façade.
//!
//! Exam results are the narrowest-scoped resource: façades are typically
//! constructed with institute, class, and subject all set, so a write here
//! invalidates only that class-and-subject slice of the cache.

use uuid::Uuid;

use campus_cache::CachedClient;
use campus_core::{ApiResult, QueryParams, RequestContext};

use crate::resources::{ReadOptions, Resource};
use crate::types::{ExamResult, NewExamResult, PageQuery, Paginated};

const ENDPOINT: &str = "/exam-results";

#[derive(Debug, Clone, Default)]
pub struct ExamResultQuery {
    pub page: PageQuery,
    pub exam_id: Option<Uuid>,
    pub student_id: Option<Uuid>,
}

impl ExamResultQuery {
    pub fn params(&self) -> QueryParams {
        let mut params = self.page.params();
        params
            .set_opt("examId", self.exam_id.map(|id| id.to_string()))
            .set_opt("studentId", self.student_id.map(|id| id.to_string()));
        params
    }
}

#[derive(Clone)]
pub struct ExamResults {
    resource: Resource,
}

impl ExamResults {
    pub fn new(api: CachedClient, context: RequestContext) -> Self {
        Self {
            resource: Resource::new(api, ENDPOINT, context),
        }
    }

    pub async fn list(
        &self,
        query: &ExamResultQuery,
        options: ReadOptions,
    ) -> ApiResult<Paginated<ExamResult>> {
        self.resource.list(query.params(), options).await
    }

    pub async fn get(&self, id: Uuid, options: ReadOptions) -> ApiResult<ExamResult> {
        self.resource.get_item(id, options).await
    }

    pub fn has_cache(&self, query: &ExamResultQuery) -> bool {
        self.resource.has_cache(&query.params())
    }

    pub fn cached_only(&self, query: &ExamResultQuery) -> Option<Paginated<ExamResult>> {
        self.resource.cached_only(&query.params())
    }

    pub async fn create(&self, result: &NewExamResult) -> ApiResult<ExamResult> {
        self.resource.create(result).await
    }

    pub async fn delete(&self, id: Uuid) -> ApiResult<()> {
        self.resource.delete(id).await
    }
}
