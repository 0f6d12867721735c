//! Near-viewport visibility predicate
//!
//! The single pure decision at the heart of lazy activation: does an
//! element's vertical extent overlap the viewport window once that window
//! has been expanded by the configured threshold? Everything stateful
//! (hidden-element exclusion, one-shot activation, settle delays) lives in
//! [`crate::loader`]; this module only answers the geometric question.

use crate::geometry::ElementBounds;
use crate::geometry::Viewport;

/// Returns true when `bounds` overlaps the threshold-expanded viewport.
///
/// The tested window is `[scroll_top - threshold, scroll_top + height +
/// threshold]` and both edge comparisons are inclusive: an element whose
/// bottom sits exactly on the expanded top edge, or whose top sits exactly
/// on the expanded bottom edge, still matches.
///
/// Hidden elements are not this function's concern; callers exclude them
/// before asking.
///
/// # Examples
///
/// ```
/// use lazyload::{is_near, ElementBounds, Viewport};
///
/// let viewport = Viewport::new(0.0, 500.0);
/// assert!(is_near(ElementBounds::new(590.0, 650.0), viewport, 100.0));
/// assert!(!is_near(ElementBounds::new(601.0, 660.0), viewport, 100.0));
/// ```
pub fn is_near(bounds: ElementBounds, viewport: Viewport, threshold: f32) -> bool {
  bounds.bottom >= viewport.scroll_top - threshold
    && bounds.top <= viewport.bottom() + threshold
}
