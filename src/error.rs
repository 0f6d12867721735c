//! Error types for lazy activation
//!
//! The activation engine itself never fails: a missing deferred-source
//! attribute is a silent no-op activation and malformed configuration is
//! not validated. The only failure path is a host mutation call (attribute
//! write, element replacement, class removal) rejecting the request; such
//! errors propagate unmodified out of [`crate::LazyLoader::scan`] and
//! [`crate::LazyLoader::settle`].
//!
//! All errors use the `thiserror` crate for minimal boilerplate and proper
//! error trait implementations.

use thiserror::Error;

/// Result type alias for lazy activation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type
#[derive(Error, Debug)]
pub enum Error {
  /// A host document mutation was rejected or failed
  #[error("Host error: {0}")]
  Host(#[from] HostError),

  /// Generic error for miscellaneous issues
  #[error("{0}")]
  Other(String),
}

/// Errors reported by the host document layer
///
/// Hosts construct these from whatever their rendering layer surfaces; the
/// engine never inspects them, it only forwards them to the caller.
#[derive(Error, Debug, Clone)]
pub enum HostError {
  /// The element handle no longer refers to a live document node
  #[error("Element is detached from the document")]
  DetachedElement,

  /// The replacement tag was rejected by the document layer
  #[error("Invalid replacement tag: {tag}")]
  InvalidTag { tag: String },

  /// Any other host-side mutation failure
  #[error("Mutation failed: {message}")]
  MutationFailed { message: String },
}
