//! Expansion parameter extractor.
//!
//! Reads every occurrence of the configured expand query parameter (default
//! `expand`) from the request. The parameter may repeat and each value may
//! be a dotted compound path, so `?expand=flavor&expand=ice_cream.order`
//! yields two paths.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};

use gelato_serializer::{ExpandSet, RequestContext};

use crate::state::AppState;

/// Axum extractor for the requested field expansions.
///
/// Extraction never fails: an absent parameter simply means no expansions,
/// and malformed tokens are inert.
///
/// # Example
///
/// ```rust,ignore
/// use gelato_rest::extractors::ExpandParams;
///
/// async fn retrieve_handler(expand: ExpandParams) {
///     let context = expand.into_context();
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ExpandParams {
    expand: ExpandSet,
}

impl ExpandParams {
    /// The parsed expansion set.
    pub fn expand(&self) -> &ExpandSet {
        &self.expand
    }

    /// Builds the request context the serializer tree binds against.
    pub fn into_context(self) -> Arc<RequestContext> {
        Arc::new(RequestContext::new(self.expand))
    }

    /// Like [`ExpandParams::into_context`], but for partial writes (PATCH).
    pub fn into_partial_context(self) -> Arc<RequestContext> {
        Arc::new(RequestContext::new(self.expand).partial(true))
    }
}

impl FromRequestParts<AppState> for ExpandParams {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let param = state.config().expand_param.as_str();
        let values: Vec<String> = parts
            .uri
            .query()
            .map(|query| {
                url::form_urlencoded::parse(query.as_bytes())
                    .filter(|(key, _)| key == param)
                    .map(|(_, value)| value.into_owned())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            expand: ExpandSet::parse(values),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::resources::ResourceRegistry;
    use axum::http::Request;
    use gelato_store::MemoryStore;

    fn state() -> AppState {
        AppState::new(
            Arc::new(MemoryStore::new()),
            ServerConfig::for_testing(),
            ResourceRegistry::demo(),
        )
    }

    async fn extract(uri: &str, state: &AppState) -> ExpandParams {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        ExpandParams::from_request_parts(&mut parts, state)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_absent_parameter_means_no_expansion() {
        let params = extract("/scoops/1", &state()).await;
        assert!(params.expand().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_and_dotted_values() {
        let params = extract("/scoops/1?expand=flavor&expand=ice_cream.order", &state()).await;
        assert!(params.expand().requests("flavor", 0));
        assert!(params.expand().requests("ice_cream", 0));
        assert!(params.expand().requests("order", 1));
    }

    #[tokio::test]
    async fn test_other_parameters_are_ignored() {
        let params = extract("/scoops/1?page=2&expand=flavor", &state()).await;
        assert!(params.expand().requests("flavor", 0));
        assert!(!params.expand().requests("page", 0));
    }

    #[tokio::test]
    async fn test_configured_parameter_name() {
        let state = AppState::new(
            Arc::new(MemoryStore::new()),
            ServerConfig {
                expand_param: "_expand".to_string(),
                ..ServerConfig::for_testing()
            },
            ResourceRegistry::demo(),
        );
        let params = extract("/scoops/1?_expand=flavor&expand=ice_cream", &state).await;
        assert!(params.expand().requests("flavor", 0));
        assert!(!params.expand().requests("ice_cream", 0));
    }

    #[tokio::test]
    async fn test_partial_context_flag() {
        let params = extract("/scoops/1?expand=flavor", &state()).await;
        assert!(params.clone().into_partial_context().is_partial());
        assert!(!params.into_context().is_partial());
    }
}
