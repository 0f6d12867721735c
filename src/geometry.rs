//! Vertical geometry types for viewport proximity tracking
//!
//! This module provides the two geometric inputs to the visibility filter:
//! an element's vertical extent in document coordinates and the current
//! viewport window. All units are CSS pixels.
//!
//! # Coordinate System
//!
//! Document coordinates have their origin at the top of the document, with
//! positive Y extending downward. An element's `top` is its offset from the
//! document top, not from the viewport; scrolling does not move it.
//!
//! Only the vertical axis is modeled. Proximity tracking assumes vertical
//! scrolling and performs no horizontal check.

use std::fmt;

/// The vertical extent of one element in document coordinates
///
/// # Examples
///
/// ```
/// use lazyload::ElementBounds;
///
/// let bounds = ElementBounds::new(590.0, 650.0);
/// assert_eq!(bounds.top, 590.0);
/// assert_eq!(bounds.bottom, 650.0);
/// assert_eq!(bounds.height(), 60.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementBounds {
  /// Offset of the element's top edge from the document top
  pub top: f32,
  /// Offset of the element's bottom edge from the document top
  pub bottom: f32,
}

impl ElementBounds {
  /// Creates bounds from top and bottom document offsets
  pub const fn new(top: f32, bottom: f32) -> Self {
    Self { top, bottom }
  }

  /// Creates bounds from a top offset and a height
  ///
  /// # Examples
  ///
  /// ```
  /// use lazyload::ElementBounds;
  ///
  /// let bounds = ElementBounds::from_top_height(100.0, 50.0);
  /// assert_eq!(bounds.bottom, 150.0);
  /// ```
  pub const fn from_top_height(top: f32, height: f32) -> Self {
    Self {
      top,
      bottom: top + height,
    }
  }

  /// Height of the element
  pub fn height(&self) -> f32 {
    self.bottom - self.top
  }
}

impl fmt::Display for ElementBounds {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[{}, {}]", self.top, self.bottom)
  }
}

/// The currently visible scroll window
///
/// Read fresh from the host at the start of every scan; the window can
/// change between scans, so it is never cached.
///
/// # Examples
///
/// ```
/// use lazyload::Viewport;
///
/// let viewport = Viewport::new(200.0, 500.0);
/// assert_eq!(viewport.scroll_top, 200.0);
/// assert_eq!(viewport.bottom(), 700.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
  /// Current scroll offset from the document top
  pub scroll_top: f32,
  /// Height of the visible window
  pub height: f32,
}

impl Viewport {
  /// A viewport of zero height at the document top
  pub const ZERO: Self = Self {
    scroll_top: 0.0,
    height: 0.0,
  };

  /// Creates a viewport from a scroll offset and visible height
  pub const fn new(scroll_top: f32, height: f32) -> Self {
    Self { scroll_top, height }
  }

  /// Document offset of the bottom edge of the visible window
  pub fn bottom(&self) -> f32 {
    self.scroll_top + self.height
  }
}

impl fmt::Display for Viewport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[{}, {}]", self.scroll_top, self.bottom())
  }
}
