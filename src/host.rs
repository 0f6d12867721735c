//! Host document capability interface
//!
//! The engine never touches a rendering layer directly. Everything it needs
//! from the surrounding document (geometry queries, attribute access,
//! mutations, and the settle-delay clock) goes through the narrow
//! [`DocumentHost`] trait, so any rendering layer or test double can
//! satisfy it.
//!
//! Query methods are infallible and must read live state on every call; the
//! engine deliberately caches nothing, since scroll position and element
//! geometry can change between scans. Mutation methods are fallible and
//! their errors propagate unmodified out of the engine.

use std::time::Duration;

use crate::error::Result;
use crate::geometry::ElementBounds;
use crate::geometry::Viewport;
use crate::loader::SettleBatchId;

/// Capabilities the engine requires from the surrounding document layer.
pub trait DocumentHost {
  /// Opaque handle to one document node.
  ///
  /// Handles are cloned freely (into delayed batches and callback
  /// invocations), so hosts should make cloning cheap, e.g. an id or a
  /// reference-counted node.
  type Element: Clone;

  /// Current scroll offset and visible height.
  fn viewport(&self) -> Viewport;

  /// Vertical extent of an element in document coordinates.
  fn bounds(&self, element: &Self::Element) -> ElementBounds;

  /// Whether the element is hidden per the host's rendering rules
  /// (zero size, explicit hidden styling, detached subtree).
  ///
  /// Hidden elements never match the visibility filter, whatever their
  /// position.
  fn is_hidden(&self, element: &Self::Element) -> bool;

  /// Whether the display reports a device pixel ratio greater than 1.
  fn is_high_density(&self) -> bool;

  /// Value of a single attribute, if present.
  fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

  /// The element's full attribute bag, in the host's enumeration order.
  ///
  /// Only consulted in tag-substitution mode, where every attribute is
  /// copied onto the replacement element in this order.
  fn attributes(&self, element: &Self::Element) -> Vec<(String, String)>;

  /// Write a single attribute value on an element.
  fn set_attribute(&mut self, element: &Self::Element, name: &str, value: &str) -> Result<()>;

  /// Build a new element of `tag`, copy `attributes` onto it, and swap it
  /// into `element`'s position in the document.
  ///
  /// Returns the handle of the new element; the original handle becomes
  /// detached. The engine removes the loading-indicator class from the
  /// returned handle afterwards.
  fn replace_element(
    &mut self,
    element: &Self::Element,
    tag: &str,
    attributes: &[(String, String)],
  ) -> Result<Self::Element>;

  /// Remove one class token from an element's class list.
  fn remove_class(&mut self, element: &Self::Element, class: &str) -> Result<()>;

  /// Ask the host to invoke [`crate::LazyLoader::settle`] with `batch`
  /// once `delay` has elapsed.
  ///
  /// Called only when a positive settle delay is configured. Each call
  /// carries a distinct batch id; the host owns only the clock, never the
  /// batch contents, and outstanding timers from different scans need no
  /// coordination.
  fn schedule_settle(&mut self, delay: Duration, batch: SettleBatchId);
}
