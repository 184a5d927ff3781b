//! Detail pipeline: project → prefetch → get → serialize.

use super::{ApiError, ApiRequest, ApiResponse, DetailEndpoint};
use vista_core::errors::ExError;
use vista_core::query::ControlParams;
use vista_core::repository::Repository;
use vista_core::serialize::{RecordSerializer, Serializer};
use vista_core::spec::project;
use vista_core::{log_op_end, log_op_error, log_op_start};

/// Run the detail pipeline for the object with primary key `pk`.
///
/// The body is the serialized object itself, without an envelope. Only
/// `fields` is read from the query parameters; anything else is ignored.
///
/// # Errors
/// - 400 for an invalid field path
/// - 404 when no object has that key
/// - 500 for storage or configuration failures
pub fn handle_detail<E>(
    endpoint: &E,
    repo: &dyn Repository,
    mut request: ApiRequest,
    pk: &str,
) -> Result<ApiResponse, ApiError>
where
    E: DetailEndpoint + ?Sized,
{
    let request_id = request.context.request_id.to_string();
    let trace_id = request.context.trace_id.as_ref().map(|t| t.as_str().to_string());
    log_op_start!(
        "detail",
        endpoint = endpoint.name(),
        request_id = request_id.as_str(),
        pk = pk,
        trace_id = trace_id.as_deref()
    );
    let start = std::time::Instant::now();

    let result = (|| -> Result<ApiResponse, ExError> {
        endpoint.preprocessor().run(&mut request)?;

        let fields = ControlParams::extract_fields(&mut request.params, endpoint.default_fields());
        let projection = project(endpoint.spec(), &fields)?;

        let qs = endpoint
            .query_set(&request)
            .prefetch_related(projection.prefetch.iter().cloned());
        let record = repo.get(&qs, pk)?;

        let body = RecordSerializer::new(repo).serialize(&record, &projection.spec)?;
        Ok(ApiResponse::ok(body))
    })();

    let elapsed = start.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => {
            log_op_end!(
                "detail",
                duration_ms = elapsed,
                endpoint = endpoint.name(),
                request_id = request_id.as_str()
            );
        }
        Err(e) => {
            log_op_error!(
                "detail",
                e.clone(),
                duration_ms = elapsed,
                endpoint = endpoint.name(),
                request_id = request_id.as_str()
            );
        }
    }
    result.map_err(ApiError::from)
}
