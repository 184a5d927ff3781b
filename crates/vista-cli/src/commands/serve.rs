//! HTTP server command
//!
//! Usage: vista serve [--host <HOST>] [--port <PORT>] [--db <PATH>]
//!
//! Routes: `GET /<endpoint>/` and `GET /<endpoint>/<id>/`. Optional
//! `x-request-id` and `x-trace-id` headers are carried into the logs.

use axum::extract::{Path as UrlPath, Query, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use clap::Args;
use rusqlite::Connection;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use vista_core_types::{RequestContext, RequestId, TraceId};
use vista_engine::{apply_api_query, ApiError, ApiQuery, ApiResponse, Catalog};
use vista_store::schema::{civic_schema, Schema};

const REQUEST_ID_HEADER: &str = "x-request-id";
const TRACE_ID_HEADER: &str = "x-trace-id";

#[derive(Debug, Args)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, default_value_t = 8000)]
    pub port: u16,
}

/// Listen address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl From<ServeArgs> for ServerConfig {
    fn from(args: ServeArgs) -> Self {
        Self {
            host: args.host,
            port: args.port,
        }
    }
}

/// SQLite connections are not shareable across threads, so requests take
/// turns on one connection from the blocking pool.
#[derive(Clone)]
struct AppState {
    conn: Arc<Mutex<Connection>>,
    schema: Arc<Schema>,
    catalog: Arc<Catalog>,
}

/// Execute serve command
pub fn execute(db: &Path, args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from(args);
    let conn = vista_store::db::open_ready(db)?;
    let state = AppState {
        conn: Arc::new(Mutex::new(conn)),
        schema: Arc::new(civic_schema()),
        catalog: Arc::new(Catalog::civic()?),
    };

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve(config, state))
}

async fn serve(config: ServerConfig, state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let endpoints = state.catalog.names().join(", ");
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.addr()).await?;
    tracing::info!(addr = config.addr().as_str(), endpoints = endpoints.as_str(), "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/:endpoint/", get(list))
        .route("/:endpoint/:id/", get(detail))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

async fn list(
    State(state): State<AppState>,
    UrlPath(endpoint): UrlPath<String>,
    Query(params): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let query = ApiQuery::List {
        endpoint,
        params: params.into_iter().collect(),
    };
    run(state, query, request_context(&headers)).await
}

async fn detail(
    State(state): State<AppState>,
    UrlPath((endpoint, id)): UrlPath<(String, String)>,
    Query(params): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let query = ApiQuery::Detail {
        endpoint,
        id,
        params: params.into_iter().collect(),
    };
    run(state, query, request_context(&headers)).await
}

fn header_str<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Correlation ids from `x-request-id` / `x-trace-id`; a fresh request id
/// when none is sent.
fn request_context(headers: &HeaderMap) -> RequestContext {
    let context = header_str(headers, REQUEST_ID_HEADER)
        .map(|id| RequestContext::with_request_id(RequestId::from_string(id.to_string())))
        .unwrap_or_default();
    match header_str(headers, TRACE_ID_HEADER) {
        Some(trace) => context.with_trace_id(TraceId::from_string(trace.to_string())),
        None => context,
    }
}

async fn run(state: AppState, query: ApiQuery, context: RequestContext) -> Response {
    let outcome = tokio::task::spawn_blocking(move || {
        let conn = state
            .conn
            .lock()
            .map_err(|_| ApiError::new(500, "ERR_INTERNAL", "Error: connection unavailable"))?;
        Ok::<_, ApiError>(
            apply_api_query(query, &conn, &state.schema, &state.catalog, context).response,
        )
    })
    .await;

    let response = match outcome {
        Ok(Ok(response)) => response,
        Ok(Err(err)) => err.into_response(),
        Err(join_err) => {
            tracing::error!(error = %join_err, "request task failed");
            ApiError::new(500, "ERR_INTERNAL", "Error: request failed").into_response()
        }
    };
    into_http(response)
}

fn into_http(response: ApiResponse) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut headers = HeaderMap::new();
    for (name, value) in &response.headers {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            headers.insert(name, value);
        }
    }
    (status, headers, Json(response.body)).into_response()
}
