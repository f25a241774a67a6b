//! Structured tracing for filter compilation and evaluation.
//!
//! Everything here is compiled behind the `tracing` feature and turns into empty inline functions
//! without it.

use crate::ListKind;

#[cfg(feature = "tracing")]
const FILTER_TARGET: &str = "patternfilter::filter";

/// A filter finished compiling.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_filter_compiled(allowed: usize, excluded: usize) {
    tracing::debug!(
        target: FILTER_TARGET,
        allowed = allowed,
        excluded = excluded,
        "filter_compiled"
    );
}

#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_filter_compiled(_allowed: usize, _excluded: usize) {}

/// A named token was replaced by `count` patterns.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_token_expanded(token: &str, count: usize) {
    tracing::debug!(
        target: FILTER_TARGET,
        token = %token,
        count = count,
        "token_expanded"
    );
}

#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_token_expanded(_token: &str, _count: usize) {}

/// Compilation stopped at an invalid pattern.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_pattern_rejected(list: ListKind, pattern: &str, error: &crate::ParseError) {
    tracing::warn!(
        target: FILTER_TARGET,
        list = %list,
        pattern = %pattern,
        error = %error,
        "pattern_rejected"
    );
}

#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_pattern_rejected(_list: ListKind, _pattern: &str, _error: &crate::ParseError) {}

/// Final decision for a path. `matched` is the allowed pattern that matched, if any.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_filter_decision(
    path: &str,
    allowed: bool,
    excluded: bool,
    matched: Option<&str>,
) {
    tracing::trace!(
        target: FILTER_TARGET,
        path = %path,
        allowed = allowed,
        excluded = excluded,
        matched = ?matched,
        "filter_decision"
    );
}

#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_filter_decision(
    _path: &str,
    _allowed: bool,
    _excluded: bool,
    _matched: Option<&str>,
) {
}
