//! Vista Engine - endpoint orchestration
//!
//! Ties the projector and query layer in `vista-core` to the SQLite store:
//! declarative list/detail endpoints, the civic endpoint set, and a
//! dispatching catalog.

pub mod catalog;
pub mod civic;
pub mod endpoints;
pub mod query;

pub use catalog::Catalog;
pub use endpoints::{
    handle_detail, handle_list, ApiError, ApiRequest, ApiResponse, DetailEndpoint, ListEndpoint,
};
pub use query::{apply_api_query, ApiQuery, ApiQueryResult};
