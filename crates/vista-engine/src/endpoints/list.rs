//! List pipeline: filter → sort → paginate → project → prefetch → serialize.

use super::{ApiError, ApiRequest, ApiResponse, ListEndpoint};
use serde_json::{json, Value};
use vista_core::errors::ExError;
use vista_core::query::ControlParams;
use vista_core::repository::Repository;
use vista_core::serialize::{RecordSerializer, Serializer};
use vista_core::spec::project;
use vista_core::{log_op_end, log_op_error, log_op_start};

/// Run the list pipeline for one request.
///
/// Response body: `{"meta": {count, page, per_page, max_page, total_count},
/// "results": [...]}` where `max_page` is the 1-based index of the last item
/// on this page within the whole result.
///
/// # Errors
/// - 400 for an invalid field path, page, filter or sort column
/// - 404 for a page out of range
/// - 500 for storage or configuration failures
pub fn handle_list<E>(
    endpoint: &E,
    repo: &dyn Repository,
    mut request: ApiRequest,
) -> Result<ApiResponse, ApiError>
where
    E: ListEndpoint + ?Sized,
{
    let request_id = request.context.request_id.to_string();
    let trace_id = request.context.trace_id.as_ref().map(|t| t.as_str().to_string());
    log_op_start!(
        "list",
        endpoint = endpoint.name(),
        request_id = request_id.as_str(),
        trace_id = trace_id.as_deref()
    );
    let start = std::time::Instant::now();

    let result = (|| -> Result<ApiResponse, ExError> {
        endpoint.preprocessor().run(&mut request)?;

        let qs = endpoint.query_set(&request);
        let mut params = std::mem::take(&mut request.params);
        let control = ControlParams::extract(&mut params, endpoint.default_fields())?;

        let qs = endpoint.filter(qs, params)?;
        let qs = endpoint.sort(qs, &control.sort_by);
        let window = endpoint.paginate(repo, &qs, control.page)?;

        let projection = project(endpoint.spec(), &control.fields)?;
        tracing::debug!(
            endpoint = endpoint.name(),
            page = window.number,
            prefetch_len = projection.prefetch.len(),
            "projection resolved"
        );
        let qs = qs.prefetch_related(projection.prefetch.iter().cloned());

        let records = repo.fetch(&qs, Some(window.slice()))?;
        let serializer = RecordSerializer::new(repo);
        let results = records
            .iter()
            .map(|record| serializer.serialize(record, &projection.spec))
            .collect::<Result<Vec<Value>, _>>()?;

        Ok(ApiResponse::ok(json!({
            "meta": {
                "count": results.len(),
                "page": window.number,
                "per_page": window.per_page,
                "max_page": window.end_index(),
                "total_count": window.count,
            },
            "results": results,
        })))
    })();

    let elapsed = start.elapsed().as_millis() as u64;
    match &result {
        Ok(response) => {
            log_op_end!(
                "list",
                duration_ms = elapsed,
                endpoint = endpoint.name(),
                request_id = request_id.as_str(),
                status = response.status
            );
        }
        Err(e) => {
            log_op_error!(
                "list",
                e.clone(),
                duration_ms = elapsed,
                endpoint = endpoint.name(),
                request_id = request_id.as_str()
            );
        }
    }
    result.map_err(ApiError::from)
}
