//! Request preprocessing stages
//!
//! Stages run in order before a handler sees the request and may rewrite
//! its parameters or reject it outright.

use super::ApiRequest;
use vista_core::errors::ExError;
use vista_core::query::strip_cache_buster;

pub trait RequestStage: Send + Sync {
    fn name(&self) -> &'static str;

    /// # Errors
    /// A stage may reject the request.
    fn apply(&self, request: &mut ApiRequest) -> Result<(), ExError>;
}

/// Drops the `_` parameter front-end widgets add to defeat HTTP caches, so
/// it never reaches filtering.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheBuster;

impl RequestStage for CacheBuster {
    fn name(&self) -> &'static str {
        "cache_buster"
    }

    fn apply(&self, request: &mut ApiRequest) -> Result<(), ExError> {
        if let Some(value) = strip_cache_buster(&mut request.params) {
            tracing::trace!(value = value.as_str(), "cache buster stripped");
        }
        Ok(())
    }
}

/// Ordered list of stages. The default runs [`CacheBuster`] only.
pub struct Preprocessor {
    stages: Vec<Box<dyn RequestStage>>,
}

impl Preprocessor {
    /// No stages at all.
    pub fn empty() -> Self {
        Self { stages: Vec::new() }
    }

    pub fn with_stage(mut self, stage: impl RequestStage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// # Errors
    /// The first stage that rejects the request.
    pub fn run(&self, request: &mut ApiRequest) -> Result<(), ExError> {
        for stage in &self.stages {
            stage.apply(request)?;
        }
        Ok(())
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::empty().with_stage(CacheBuster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vista_core::errors::ExErrorKind;
    use vista_core::query::QueryParams;

    struct RejectAll;

    impl RequestStage for RejectAll {
        fn name(&self) -> &'static str {
            "reject_all"
        }

        fn apply(&self, _request: &mut ApiRequest) -> Result<(), ExError> {
            Err(ExError::new(ExErrorKind::InvalidInput).with_message("no"))
        }
    }

    fn request(pairs: &[(&str, &str)]) -> ApiRequest {
        ApiRequest::new(pairs.iter().copied().collect::<QueryParams>())
    }

    #[test]
    fn test_default_strips_cache_buster() {
        let mut req = request(&[("_", "12345"), ("status", "active")]);
        Preprocessor::default().run(&mut req).unwrap();
        assert_eq!(req.params, request(&[("status", "active")]).params);
    }

    #[test]
    fn test_stages_run_in_order_and_stop_on_error() {
        let pre = Preprocessor::empty()
            .with_stage(RejectAll)
            .with_stage(CacheBuster);
        assert_eq!(pre.stage_names(), vec!["reject_all", "cache_buster"]);

        let mut req = request(&[("_", "1")]);
        assert!(pre.run(&mut req).is_err());
        assert!(req.params.contains("_"));
    }
}
