//! Request and binding context.
//!
//! Everything the expansion machinery knows about the current request lives
//! here: the parsed `expand` tokens ([`ExpandSet`]), the request-wide flags
//! ([`RequestContext`]), and the position of a field within the nested
//! object graph ([`BindingContext`]).

use std::sync::Arc;

/// The set of expansion paths requested by the client.
///
/// Built from every occurrence of the expand query parameter. Each value is
/// split on `.` into ordered path segments, so `expand=ice_cream.order`
/// yields the path `["ice_cream", "order"]`.
///
/// Malformed tokens (empty segments, trailing dots) are kept as-is: an empty
/// segment can never equal a field name, so such tokens are inert rather
/// than errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpandSet {
    paths: Vec<Vec<String>>,
}

impl ExpandSet {
    /// An empty set; nothing expands.
    pub fn none() -> Self {
        Self::default()
    }

    /// Parses raw parameter values into dotted paths.
    pub fn parse<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let paths = values
            .into_iter()
            .map(|value| value.as_ref().split('.').map(str::to_string).collect())
            .collect();
        Self { paths }
    }

    /// Returns true iff some path names `field` at exactly `position`.
    ///
    /// A path matches when it is longer than `position` and its segment at
    /// index `position` equals the field name. Segments beyond `position`
    /// only matter to deeper fields.
    pub fn requests(&self, field: &str, position: usize) -> bool {
        self.paths
            .iter()
            .any(|path| path.len() > position && path[position] == field)
    }

    /// Returns true if no effective expansion was requested: no path
    /// carries a non-empty segment. `?expand=` parses to a single empty
    /// segment and expands nothing.
    pub fn is_empty(&self) -> bool {
        self.paths.iter().flatten().all(|segment| segment.is_empty())
    }
}

/// Immutable per-request state shared by every field in a serializer tree.
///
/// Constructed once when the request is parsed and never mutated afterwards;
/// fields hold it through their [`BindingContext`].
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    expand: ExpandSet,
    partial: bool,
}

impl RequestContext {
    /// Context for a request with the given expansion set.
    pub fn new(expand: ExpandSet) -> Self {
        Self {
            expand,
            partial: false,
        }
    }

    /// Marks the request as a partial write (PATCH): fields missing from the
    /// input are skipped instead of defaulted or required. The flag applies
    /// at every nesting depth, matching how the root serializer governs
    /// partial validation for its whole tree.
    pub fn partial(mut self, partial: bool) -> Self {
        self.partial = partial;
        self
    }

    /// The requested expansions.
    pub fn expand(&self) -> &ExpandSet {
        &self.expand
    }

    /// Whether this is a partial write.
    pub fn is_partial(&self) -> bool {
        self.partial
    }
}

/// The position at which a field is being bound.
///
/// Depth is zero-based: a field directly on the root serializer is at depth
/// 0, a field inside that field's expanded serializer is at depth 1, and so
/// on. Rendering a collection reuses the same bound serializer for every
/// element, so applying a serializer in "many" mode never contributes a
/// depth increment - list and single-object serialization of the same field
/// produce identical expansion decisions.
#[derive(Debug, Clone)]
pub struct BindingContext {
    request: Option<Arc<RequestContext>>,
    depth: usize,
}

impl BindingContext {
    /// The root context for one request; direct fields bind at depth 0.
    pub fn root(request: Arc<RequestContext>) -> Self {
        Self {
            request: Some(request),
            depth: 0,
        }
    }

    /// A context with no request attached (introspection, schema
    /// generation). Every expansion decision under it is "not expanded".
    pub fn detached() -> Self {
        Self {
            request: None,
            depth: 0,
        }
    }

    /// The context one nesting level deeper, for binding the fields of an
    /// expanded serializer.
    pub fn child(&self) -> Self {
        Self {
            request: self.request.clone(),
            depth: self.depth + 1,
        }
    }

    /// The request context, if any.
    pub fn request(&self) -> Option<&Arc<RequestContext>> {
        self.request.as_ref()
    }

    /// The binding depth of fields bound under this context.
    pub fn position(&self) -> usize {
        self.depth
    }

    /// Whether the request is a partial write; false when detached.
    pub fn is_partial(&self) -> bool {
        self.request.as_ref().is_some_and(|req| req.is_partial())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_on_dots() {
        let set = ExpandSet::parse(["ice_cream.order"]);
        assert!(set.requests("ice_cream", 0));
        assert!(set.requests("order", 1));
        assert!(!set.requests("order", 0));
        assert!(!set.requests("ice_cream", 1));
    }

    #[test]
    fn test_parse_multiple_values() {
        let set = ExpandSet::parse(["flavor", "ice_cream"]);
        assert!(set.requests("flavor", 0));
        assert!(set.requests("ice_cream", 0));
        assert!(!set.requests("order", 0));
    }

    #[test]
    fn test_segments_beyond_position_do_not_match() {
        let set = ExpandSet::parse(["a.b.c"]);
        assert!(set.requests("b", 1));
        assert!(set.requests("c", 2));
        assert!(!set.requests("c", 3));
        assert!(!set.requests("b", 0));
    }

    #[test]
    fn test_malformed_tokens_are_inert() {
        let set = ExpandSet::parse(["ice_cream.", ".flavor", "a..b", ""]);
        assert!(set.requests("ice_cream", 0));
        assert!(set.requests("flavor", 1));
        assert!(set.requests("a", 0));
        assert!(set.requests("b", 2));
        // The empty segments never match anything.
        assert!(!set.requests("", usize::MAX));
    }

    #[test]
    fn test_empty_set_matches_nothing() {
        let set = ExpandSet::none();
        assert!(set.is_empty());
        assert!(!set.requests("flavor", 0));
    }

    #[test]
    fn test_blank_tokens_count_as_empty() {
        assert!(ExpandSet::parse([""]).is_empty());
        assert!(ExpandSet::parse([".", ".."]).is_empty());
        assert!(!ExpandSet::parse(["flavor."]).is_empty());
    }

    #[test]
    fn test_child_increments_depth() {
        let ctx = BindingContext::root(Arc::new(RequestContext::default()));
        assert_eq!(ctx.position(), 0);
        assert_eq!(ctx.child().position(), 1);
        assert_eq!(ctx.child().child().position(), 2);
    }

    #[test]
    fn test_detached_has_no_request() {
        let ctx = BindingContext::detached();
        assert!(ctx.request().is_none());
        assert!(!ctx.is_partial());
        assert!(ctx.child().request().is_none());
    }

    #[test]
    fn test_partial_propagates_to_children() {
        let request = Arc::new(RequestContext::new(ExpandSet::none()).partial(true));
        let ctx = BindingContext::root(request);
        assert!(ctx.is_partial());
        assert!(ctx.child().is_partial());
    }
}
