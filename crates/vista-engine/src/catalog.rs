//! Endpoint registry
//!
//! Maps endpoint names to their list and detail implementations so callers
//! (the HTTP server, the CLI) can dispatch by path segment.

use crate::civic::{
    CivicSpecs, MembershipDetail, MembershipList, OrganizationDetail, OrganizationList,
    PeopleList, PersonDetail,
};
use crate::endpoints::{handle_detail, handle_list, ApiError, ApiRequest, ApiResponse};
use crate::endpoints::{DetailEndpoint, ListEndpoint};
use std::collections::BTreeMap;
use vista_core::errors::Result;
use vista_core::repository::Repository;

#[derive(Default)]
pub struct Catalog {
    lists: BTreeMap<String, Box<dyn ListEndpoint>>,
    details: BTreeMap<String, Box<dyn DetailEndpoint>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// People, organizations and memberships.
    ///
    /// # Errors
    /// Only if the civic spec tree is inconsistent.
    pub fn civic() -> Result<Self> {
        let specs = CivicSpecs::build()?;
        Ok(Self::new()
            .with_list(PeopleList::new(&specs)?)
            .with_detail(PersonDetail::new(&specs)?)
            .with_list(OrganizationList::new(&specs)?)
            .with_detail(OrganizationDetail::new(&specs)?)
            .with_list(MembershipList::new(&specs)?)
            .with_detail(MembershipDetail::new(&specs)?))
    }

    pub fn with_list(mut self, endpoint: impl ListEndpoint + 'static) -> Self {
        self.lists
            .insert(endpoint.name().to_string(), Box::new(endpoint));
        self
    }

    pub fn with_detail(mut self, endpoint: impl DetailEndpoint + 'static) -> Self {
        self.details
            .insert(endpoint.name().to_string(), Box::new(endpoint));
        self
    }

    /// Names with a list endpoint, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.lists.keys().map(String::as_str).collect()
    }

    /// # Errors
    /// 404 when no list endpoint has that name, otherwise whatever the
    /// pipeline reports.
    pub fn list(
        &self,
        name: &str,
        repo: &dyn Repository,
        request: ApiRequest,
    ) -> std::result::Result<ApiResponse, ApiError> {
        let endpoint = self.lists.get(name).ok_or_else(|| unknown_endpoint(name))?;
        handle_list(endpoint.as_ref(), repo, request)
    }

    /// # Errors
    /// 404 when no detail endpoint has that name, otherwise whatever the
    /// pipeline reports.
    pub fn detail(
        &self,
        name: &str,
        repo: &dyn Repository,
        request: ApiRequest,
        pk: &str,
    ) -> std::result::Result<ApiResponse, ApiError> {
        let endpoint = self
            .details
            .get(name)
            .ok_or_else(|| unknown_endpoint(name))?;
        handle_detail(endpoint.as_ref(), repo, request, pk)
    }
}

fn unknown_endpoint(name: &str) -> ApiError {
    ApiError::new(
        404,
        "ERR_NOT_FOUND",
        format!("Error: no endpoint named {}", name),
    )
}
