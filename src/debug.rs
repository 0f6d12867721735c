//! Runtime debug toggles sourced from `LAZYLOAD_*` environment variables
//!
//! Values are captured once (via [`RuntimeToggles::from_env`]) and then
//! reused for the lifetime of the process. Callers can also construct
//! instances manually from a map to override environment-derived behavior
//! when embedding the library.
//!
//! Recognized toggles:
//! - `LAZYLOAD_TRACE_SCAN`: emit a trace line per scan/settle outcome.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Parsed runtime debug toggles.
#[derive(Debug, Clone, Default)]
pub struct RuntimeToggles {
  raw: HashMap<String, String>,
}

impl RuntimeToggles {
  /// Parse all `LAZYLOAD_*` environment variables into a toggle map.
  pub fn from_env() -> Self {
    let raw = std::env::vars()
      .filter(|(k, _)| k.starts_with("LAZYLOAD_"))
      .collect::<HashMap<_, _>>();
    Self { raw }
  }

  /// Construct a toggle set from a provided map of key/value pairs.
  pub fn from_map(raw: HashMap<String, String>) -> Self {
    Self { raw }
  }

  /// Returns the raw string value for a toggle, if set.
  pub fn get(&self, key: &str) -> Option<&str> {
    self.raw.get(key).map(String::as_str)
  }

  /// Returns true when the toggle is present and truthy (`!= 0`/`false`/`off`).
  pub fn truthy(&self, key: &str) -> bool {
    self
      .get(key)
      .map(|v| {
        !["0", "false", "off"]
          .iter()
          .any(|lit| v.eq_ignore_ascii_case(lit))
      })
      .unwrap_or(false)
  }

  /// Parse a toggle as `u64`, returning `None` when unset or unparseable.
  pub fn u64(&self, key: &str) -> Option<u64> {
    self.get(key).and_then(|v| v.trim().parse::<u64>().ok())
  }
}

static RUNTIME_TOGGLES: OnceLock<RuntimeToggles> = OnceLock::new();

/// Process-wide toggles, parsed from the environment on first use.
pub fn runtime_toggles() -> &'static RuntimeToggles {
  RUNTIME_TOGGLES.get_or_init(RuntimeToggles::from_env)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn toggles(pairs: &[(&str, &str)]) -> RuntimeToggles {
    RuntimeToggles::from_map(
      pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect(),
    )
  }

  #[test]
  fn truthy_rejects_falsy_literals() {
    let t = toggles(&[
      ("LAZYLOAD_A", "1"),
      ("LAZYLOAD_B", "0"),
      ("LAZYLOAD_C", "off"),
      ("LAZYLOAD_D", "FALSE"),
      ("LAZYLOAD_E", "yes"),
    ]);
    assert!(t.truthy("LAZYLOAD_A"));
    assert!(!t.truthy("LAZYLOAD_B"));
    assert!(!t.truthy("LAZYLOAD_C"));
    assert!(!t.truthy("LAZYLOAD_D"));
    assert!(t.truthy("LAZYLOAD_E"));
    assert!(!t.truthy("LAZYLOAD_MISSING"));
  }

  #[test]
  fn u64_parses_trimmed_values() {
    let t = toggles(&[("LAZYLOAD_N", " 250 "), ("LAZYLOAD_BAD", "abc")]);
    assert_eq!(t.u64("LAZYLOAD_N"), Some(250));
    assert_eq!(t.u64("LAZYLOAD_BAD"), None);
    assert_eq!(t.u64("LAZYLOAD_MISSING"), None);
  }
}
