//! Deterministic cache-key composition.
//!
//! A [`CacheKey`] is semantically the tuple `(endpoint, normalized query
//! params, context dimensions)` rendered as a single string. Determinism
//! comes for free from the inputs: [`QueryParams`] is name-sorted by
//! construction and [`RequestContext::dimensions`] yields name-sorted pairs,
//! so two logically identical requests always collide to the same key and
//! any difference in a context dimension yields a different key.
//!
//! # String format
//!
//! ```text
//! endpoint \u{1F} ctx-pairs \u{1F} param-pairs
//! ```
//!
//! Segments are joined with the ASCII unit separator and pairs within a
//! segment (`name=value`) with the record separator. Neither control
//! character occurs in URL paths, identifiers, or role names, which keeps
//! the composition injective and makes the endpoint segment a scan prefix
//! for family matching.

use campus_core::{QueryParams, RequestContext};

/// Separator between the endpoint, context, and params segments.
const SEGMENT_SEPARATOR: char = '\u{1F}';

/// Separator between `name=value` pairs within a segment.
const PAIR_SEPARATOR: char = '\u{1E}';

/// An opaque, deterministic cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Compose a key from an endpoint, optional query parameters, and the
    /// request context.
    ///
    /// Absent parameters and absent context dimensions never reach the key;
    /// an empty `QueryParams` composes identically to `None`.
    pub fn compose(
        endpoint: &str,
        params: Option<&QueryParams>,
        context: &RequestContext,
    ) -> Self {
        debug_assert!(!endpoint.is_empty(), "endpoint must be a non-empty path");

        let ctx_segment = join_pairs(
            context
                .dimensions()
                .iter()
                .map(|(name, value)| (*name, value.clone())),
        );
        let param_segment = params
            .map(|p| join_pairs(p.pairs().map(|(name, value)| (name, value))))
            .unwrap_or_default();

        Self(format!(
            "{endpoint}{SEGMENT_SEPARATOR}{ctx_segment}{SEGMENT_SEPARATOR}{param_segment}"
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The endpoint segment of this key.
    pub fn endpoint(&self) -> &str {
        self.segments().0
    }

    /// True when this key belongs to the resource family mutated at
    /// `endpoint` under `context`.
    ///
    /// Family membership is a path-prefix relation in either direction:
    /// mutating `/students` covers the cached item view `/students/42`, and
    /// deleting `/students/42` covers every cached page of `/students`.
    /// Query parameters are deliberately ignored — a write can change the
    /// result set of any paginated or filtered view. The context check
    /// requires the key to carry every dimension present on the mutation
    /// with the same value, so a sibling class or institute is never purged.
    pub fn matches_family(&self, endpoint: &str, context: &RequestContext) -> bool {
        let (key_endpoint, ctx_segment, _) = self.segments();

        let family = endpoint.trim_end_matches('/');
        let key_endpoint = key_endpoint.trim_end_matches('/');
        let same_family = key_endpoint == family
            || key_endpoint
                .strip_prefix(family)
                .is_some_and(|rest| rest.starts_with('/'))
            || family
                .strip_prefix(key_endpoint)
                .is_some_and(|rest| rest.starts_with('/'));
        if !same_family {
            return false;
        }

        context.dimensions().iter().all(|(name, value)| {
            ctx_segment
                .split(PAIR_SEPARATOR)
                .filter_map(|pair| pair.split_once('='))
                .any(|(n, v)| n == *name && v == value)
        })
    }

    fn segments(&self) -> (&str, &str, &str) {
        let mut parts = self.0.splitn(3, SEGMENT_SEPARATOR);
        // compose() always writes three segments.
        let endpoint = parts.next().unwrap_or_default();
        let ctx = parts.next().unwrap_or_default();
        let params = parts.next().unwrap_or_default();
        (endpoint, ctx, params)
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn join_pairs<'a>(pairs: impl Iterator<Item = (&'a str, String)>) -> String {
    let mut out = String::new();
    for (name, value) in pairs {
        if !out.is_empty() {
            out.push(PAIR_SEPARATOR);
        }
        out.push_str(name);
        out.push('=');
        out.push_str(&value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::Role;

    fn params(entries: &[(&str, i64)]) -> QueryParams {
        entries.iter().map(|(n, v)| (*n, *v)).collect()
    }

    #[test]
    fn test_same_inputs_same_key() {
        let ctx = RequestContext::for_institute("I1").with_role(Role::Teacher);
        let a = CacheKey::compose("/students", Some(&params(&[("page", 1)])), &ctx);
        let b = CacheKey::compose("/students", Some(&params(&[("page", 1)])), &ctx);
        assert_eq!(a, b);
    }

    #[test]
    fn test_param_insertion_order_is_irrelevant() {
        let ctx = RequestContext::new();
        let a = CacheKey::compose(
            "/students",
            Some(&params(&[("page", 1), ("limit", 10)])),
            &ctx,
        );
        let b = CacheKey::compose(
            "/students",
            Some(&params(&[("limit", 10), ("page", 1)])),
            &ctx,
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_context_dimension_changes_key() {
        let p = params(&[("page", 1)]);
        let a = CacheKey::compose("/students", Some(&p), &RequestContext::for_institute("A"));
        let b = CacheKey::compose("/students", Some(&p), &RequestContext::for_institute("B"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_absent_params_equal_empty_params() {
        let ctx = RequestContext::for_institute("I1");
        let a = CacheKey::compose("/students", None, &ctx);
        let b = CacheKey::compose("/students", Some(&QueryParams::new()), &ctx);
        assert_eq!(a, b);
    }

    #[test]
    fn test_endpoint_accessor() {
        let key = CacheKey::compose("/exam-results", None, &RequestContext::new());
        assert_eq!(key.endpoint(), "/exam-results");
    }

    #[test]
    fn test_family_match_ignores_params() {
        let ctx = RequestContext::for_institute("I1");
        let key = CacheKey::compose(
            "/students",
            Some(&params(&[("page", 3), ("limit", 50)])),
            &ctx,
        );
        assert!(key.matches_family("/students", &ctx));
    }

    #[test]
    fn test_family_match_covers_sub_paths_both_directions() {
        let ctx = RequestContext::new();
        let item = CacheKey::compose("/students/42", None, &ctx);
        let list = CacheKey::compose("/students", None, &ctx);

        // Mutating the collection covers cached items and vice versa.
        assert!(item.matches_family("/students", &ctx));
        assert!(list.matches_family("/students/42", &ctx));
    }

    #[test]
    fn test_family_match_respects_path_boundaries() {
        let ctx = RequestContext::new();
        let key = CacheKey::compose("/students-archive", None, &ctx);
        assert!(!key.matches_family("/students", &ctx));
    }

    #[test]
    fn test_family_match_requires_context_superset() {
        let stored = RequestContext::for_institute("I1").with_class("C1");
        let key = CacheKey::compose("/homework", None, &stored);

        // Narrower or equal mutation context matches.
        assert!(key.matches_family("/homework", &RequestContext::for_institute("I1")));
        assert!(key.matches_family("/homework", &stored));

        // A different value for the same dimension does not.
        assert!(!key.matches_family("/homework", &RequestContext::for_institute("I2")));
        // A dimension the key never carried does not.
        assert!(!key.matches_family(
            "/homework",
            &RequestContext::for_institute("I1").with_subject("S1")
        ));
    }

    #[test]
    fn test_empty_context_mutation_matches_all_contexts() {
        let key = CacheKey::compose(
            "/students",
            None,
            &RequestContext::for_institute("I1"),
        );
        assert!(key.matches_family("/students", &RequestContext::new()));
    }
}
