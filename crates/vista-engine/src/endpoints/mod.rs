//! Declarative read-only endpoints
//!
//! An endpoint names its entity and spec tree; the list and detail pipelines
//! do the rest. Every hook has a default, so concrete endpoints override only
//! what differs.

pub mod detail;
pub mod list;
pub mod stages;

use serde_json::{json, Value};
use stages::Preprocessor;
use vista_core::errors::ExError;
use vista_core::query::{PageWindow, Paginator, QueryParams, QuerySet, SortKey, DEFAULT_PER_PAGE};
use vista_core::repository::Repository;
use vista_core::spec::SpecTree;
use vista_core_types::RequestContext;

pub use detail::handle_detail;
pub use list::handle_list;

/// Header every response carries; the API is public and read-only.
pub const ALLOW_ORIGIN: (&str, &str) = ("Access-Control-Allow-Origin", "*");

/// One inbound request: its query parameters plus correlation ids.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub params: QueryParams,
    pub context: RequestContext,
}

impl ApiRequest {
    pub fn new(params: QueryParams) -> Self {
        Self {
            params,
            context: RequestContext::new(),
        }
    }

    pub fn with_context(mut self, context: RequestContext) -> Self {
        self.context = context;
        self
    }
}

/// Framework-agnostic response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl ApiResponse {
    /// 200 with the allow-all origin header.
    pub fn ok(body: Value) -> Self {
        Self::with_status(200, body)
    }

    fn with_status(status: u16, body: Value) -> Self {
        Self {
            status,
            headers: vec![(ALLOW_ORIGIN.0.to_string(), ALLOW_ORIGIN.1.to_string())],
            body,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A complete error response. Never accompanied by partial results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: u16,
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn body(&self) -> Value {
        json!({ "error": self.message, "code": self.code })
    }

    pub fn into_response(self) -> ApiResponse {
        let body = self.body();
        ApiResponse::with_status(self.status, body)
    }
}

impl From<ExError> for ApiError {
    fn from(err: ExError) -> Self {
        let message = if err.message().is_empty() {
            err.to_string()
        } else {
            err.message().to_string()
        };
        Self::new(err.http_status(), err.code(), message)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}: {}", self.status, self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// A paginated, filterable, sortable collection endpoint.
///
/// The pipeline calls, in order: `preprocessor`, `query_set`,
/// `adjust_filters` (via `filter`), `sort`, `paginate`.
pub trait ListEndpoint: Send + Sync {
    /// Name the endpoint is dispatched and logged under
    fn name(&self) -> &str;

    /// Entity queried
    fn entity(&self) -> &str;

    fn spec(&self) -> &SpecTree;

    fn per_page(&self) -> usize {
        DEFAULT_PER_PAGE
    }

    /// Fields used when the request has no `fields` parameter
    fn default_fields(&self) -> &[String] {
        &[]
    }

    fn preprocessor(&self) -> Preprocessor {
        Preprocessor::default()
    }

    fn query_set(&self, _request: &ApiRequest) -> QuerySet {
        QuerySet::new(self.entity())
    }

    /// Rewrite filter parameters before they reach the query set.
    ///
    /// # Errors
    /// Implementations may reject parameters.
    fn adjust_filters(&self, filters: QueryParams) -> Result<QueryParams, ExError> {
        Ok(filters)
    }

    /// # Errors
    /// Whatever `adjust_filters` rejects.
    fn filter(&self, qs: QuerySet, filters: QueryParams) -> Result<QuerySet, ExError> {
        let filters = self.adjust_filters(filters)?;
        Ok(qs.filter(filters.into_inner()))
    }

    fn sort(&self, qs: QuerySet, sort_by: &[SortKey]) -> QuerySet {
        if sort_by.is_empty() {
            qs
        } else {
            qs.order_by(sort_by.iter().cloned())
        }
    }

    /// Count the query set and resolve `page` against it.
    ///
    /// # Errors
    /// `EmptyPage` when `page` is out of range, storage failures.
    fn paginate(
        &self,
        repo: &dyn Repository,
        qs: &QuerySet,
        page: i64,
    ) -> Result<PageWindow, ExError> {
        let count = repo.count(qs)?;
        Ok(Paginator::new(self.per_page()).page(page, count)?)
    }
}

/// A single-object endpoint addressed by primary key.
pub trait DetailEndpoint: Send + Sync {
    fn name(&self) -> &str;

    fn entity(&self) -> &str;

    fn spec(&self) -> &SpecTree;

    fn default_fields(&self) -> &[String] {
        &[]
    }

    fn preprocessor(&self) -> Preprocessor {
        Preprocessor::default()
    }

    fn query_set(&self, _request: &ApiRequest) -> QuerySet {
        QuerySet::new(self.entity())
    }
}
