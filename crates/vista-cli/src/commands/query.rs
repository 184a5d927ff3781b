//! One-shot query command
//!
//! Usage: vista query <ENDPOINT> [--id <PK>] [--param key=value]... [--explain]

use clap::Args;
use std::path::Path;
use vista_core::query::QueryParams;
use vista_core_types::RequestContext;
use vista_engine::{apply_api_query, ApiQuery, Catalog};
use vista_store::schema::civic_schema;

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Endpoint name (people, organizations, memberships)
    pub endpoint: String,

    /// Primary key; runs the detail endpoint instead of the list
    #[arg(long)]
    pub id: Option<String>,

    /// Query parameter, repeatable: --param fields=id,name --param page=2
    #[arg(long = "param", value_parser = parse_param)]
    pub params: Vec<(String, String)>,

    /// Report status and storage round trips on stderr
    #[arg(long)]
    pub explain: bool,
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got {:?}", raw))
}

/// Execute query command
///
/// Prints the response body as JSON. A non-200 response exits non-zero
/// after printing its error body.
pub fn execute(db: &Path, args: QueryArgs) -> Result<(), Box<dyn std::error::Error>> {
    let conn = vista_store::db::open_ready(db)?;
    let schema = civic_schema();
    let catalog = Catalog::civic()?;

    let params: QueryParams = args.params.into_iter().collect();
    let query = match args.id {
        Some(id) => ApiQuery::Detail {
            endpoint: args.endpoint,
            id,
            params,
        },
        None => ApiQuery::List {
            endpoint: args.endpoint,
            params,
        },
    };

    let result = apply_api_query(query, &conn, &schema, &catalog, RequestContext::new());
    println!("{}", serde_json::to_string_pretty(&result.response.body)?);

    if args.explain {
        eprintln!(
            "status={} queries={}",
            result.response.status, result.queries
        );
    }

    if result.response.status != 200 {
        return Err(format!("request failed with status {}", result.response.status).into());
    }
    Ok(())
}
