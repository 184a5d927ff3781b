//! Engine-level read-only query surface.
//!
//! `apply_api_query` is the single entry point for serving requests against
//! an open connection. It builds a fresh repository per call and always
//! returns a complete response, turning pipeline errors into error bodies.

use crate::catalog::Catalog;
use crate::endpoints::{ApiRequest, ApiResponse};
use rusqlite::Connection;
use vista_core::query::QueryParams;
use vista_core_types::RequestContext;
use vista_store::repo::SqliteRepo;
use vista_store::schema::Schema;

/// Read-only queries supported by the engine.
#[derive(Debug, Clone)]
pub enum ApiQuery {
    /// `GET /<endpoint>/?...`
    List {
        endpoint: String,
        params: QueryParams,
    },
    /// `GET /<endpoint>/<id>/?...`
    Detail {
        endpoint: String,
        id: String,
        params: QueryParams,
    },
}

impl ApiQuery {
    pub fn endpoint(&self) -> &str {
        match self {
            ApiQuery::List { endpoint, .. } | ApiQuery::Detail { endpoint, .. } => endpoint,
        }
    }
}

/// Outcome of a query together with the number of storage round trips it
/// took.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiQueryResult {
    pub response: ApiResponse,
    pub queries: usize,
}

pub fn apply_api_query(
    query: ApiQuery,
    conn: &Connection,
    schema: &Schema,
    catalog: &Catalog,
    context: RequestContext,
) -> ApiQueryResult {
    let repo = SqliteRepo::new(conn, schema);
    let outcome = match query {
        ApiQuery::List { endpoint, params } => {
            let request = ApiRequest::new(params).with_context(context);
            catalog.list(&endpoint, &repo, request)
        }
        ApiQuery::Detail {
            endpoint,
            id,
            params,
        } => {
            let request = ApiRequest::new(params).with_context(context);
            catalog.detail(&endpoint, &repo, request, &id)
        }
    };

    ApiQueryResult {
        response: outcome.unwrap_or_else(|err| err.into_response()),
        queries: repo.query_count(),
    }
}
