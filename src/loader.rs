//! Lazy activation engine
//!
//! [`LazyLoader`] owns the shrinking pool of not-yet-activated elements and
//! drives each one through `pending → (matched) → [delay-wait] → activated`
//! as the viewport approaches it. Scans are triggered externally (scroll,
//! resize, manual lookup) and run synchronously to completion; the only
//! asynchronous suspension point is the optional settle delay, during which
//! a matched batch waits out fast scroll-throughs before being re-checked
//! and activated.
//!
//! Activation happens at most once per element and is one of:
//! - [`LoadMode::CopySource`]: copy the deferred source attribute (or its
//!   high-density variant) into the live `src` attribute;
//! - [`LoadMode::ReplaceElement`]: swap the placeholder for a freshly built
//!   element of the configured tag, carrying over every attribute.

use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::debug::runtime_toggles;
use crate::error::Result;
use crate::host::DocumentHost;
use crate::visibility::is_near;

/// Attribute holding an element's deferred source value.
pub const DEFERRED_SRC_ATTR: &str = "data-src";

/// Attribute holding the high-density source variant.
pub const DEFERRED_SRC_RETINA_ATTR: &str = "data-src-retina";

/// Live source attribute written on activation.
pub const LIVE_SRC_ATTR: &str = "src";

/// How a matched element is activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadMode {
  /// Copy the deferred source attribute into the live `src` attribute.
  CopySource,

  /// Replace the placeholder with a new element of the configured tag,
  /// copying all attributes across.
  ReplaceElement,
}

impl Default for LoadMode {
  fn default() -> Self {
    Self::CopySource
  }
}

/// Configuration for a [`LazyLoader`], fixed at construction.
///
/// Missing fields deserialize to their defaults, so embedders can supply
/// partial configuration. Values are not validated; a negative threshold
/// shrinks the match window instead of growing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LazyLoadOptions {
  /// Pixel margin added above and below the viewport when matching.
  pub threshold: f32,
  /// Tag for the replacement element in [`LoadMode::ReplaceElement`].
  pub replace_tag: String,
  /// How long a matched element must stay near the viewport before it is
  /// activated. Zero activates immediately with no re-check.
  pub delay: Duration,
  /// Activation mode.
  pub mode: LoadMode,
  /// Class token removed from the replacement element on substitution.
  pub loading_class: String,
}

impl Default for LazyLoadOptions {
  fn default() -> Self {
    Self {
      threshold: 1000.0,
      replace_tag: "iframe".to_string(),
      delay: Duration::ZERO,
      mode: LoadMode::CopySource,
      loading_class: "loading".to_string(),
    }
  }
}

impl LazyLoadOptions {
  /// Creates options with the default values.
  pub fn new() -> Self {
    Self::default()
  }

  /// Sets the match threshold in pixels.
  pub fn with_threshold(mut self, threshold: f32) -> Self {
    self.threshold = threshold;
    self
  }

  /// Sets the replacement tag used in [`LoadMode::ReplaceElement`].
  pub fn with_replace_tag(mut self, tag: impl Into<String>) -> Self {
    self.replace_tag = tag.into();
    self
  }

  /// Sets the settle delay.
  pub fn with_delay(mut self, delay: Duration) -> Self {
    self.delay = delay;
    self
  }

  /// Sets the activation mode.
  pub fn with_mode(mut self, mode: LoadMode) -> Self {
    self.mode = mode;
    self
  }

  /// Sets the loading-indicator class removed on substitution.
  pub fn with_loading_class(mut self, class: impl Into<String>) -> Self {
    self.loading_class = class.into();
    self
  }
}

/// External signals that trigger a scan.
///
/// Each maps 1:1 to one [`LazyLoader::scan`]; no signal carries payload
/// beyond "a scan should happen now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanTrigger {
  /// The viewport scrolled.
  Scrolled,
  /// The viewport was resized.
  Resized,
  /// A manual re-check was requested.
  Lookup,
}

/// Identifier of one delayed activation batch.
///
/// Handed to [`DocumentHost::schedule_settle`] when a scan defers matched
/// elements; the host passes it back to [`LazyLoader::settle`] once the
/// delay has elapsed. Ids are never reused within one loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SettleBatchId(u64);

/// What one scan or settle pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOutcome {
  /// Elements that passed the visibility filter this pass.
  pub matched: usize,
  /// Elements activated this pass.
  pub activated: usize,
  /// Elements parked in a delayed batch this pass.
  pub deferred: usize,
  /// Elements still awaiting activation after this pass.
  pub remaining: usize,
}

/// Cumulative counters for introspection and tests.
#[derive(Debug, Default, Clone)]
pub struct ScanDiagnostics {
  pub scans: usize,
  pub matched: usize,
  pub activations: usize,
  pub deferred_batches: usize,
  pub settles: usize,
  pub scroll_scans: usize,
  pub resize_scans: usize,
  pub lookup_scans: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
  /// Awaiting a future scan.
  Pending,
  /// Matched and parked in a delayed batch.
  InFlight,
  /// Consumed; never touched again.
  Activated,
}

#[derive(Debug)]
struct Slot<E> {
  element: E,
  state: SlotState,
}

/// Viewport-aware lazy activation of deferred document elements.
///
/// Seed the loader with the candidate elements, then invoke [`scan`] from
/// every scroll/resize/lookup signal (typically once immediately after
/// construction as well, to activate elements already near the viewport).
///
/// # Example
///
/// ```rust,ignore
/// use lazyload::{LazyLoader, LazyLoadOptions, ScanTrigger};
///
/// let mut loader = LazyLoader::new(document.deferred_images(), LazyLoadOptions::new())
///   .with_callback(|el| println!("activated {el:?}"));
///
/// loader.scan(&mut host)?;
/// // ...on every scroll event:
/// loader.notify(&mut host, ScanTrigger::Scrolled)?;
/// ```
///
/// [`scan`]: LazyLoader::scan
pub struct LazyLoader<H: DocumentHost> {
  slots: Vec<Slot<H::Element>>,
  batches: Vec<(SettleBatchId, Vec<usize>)>,
  next_batch_id: u64,
  activated: usize,
  options: LazyLoadOptions,
  callback: Option<Box<dyn FnMut(&H::Element)>>,
  diagnostics: ScanDiagnostics,
}

impl<H: DocumentHost> LazyLoader<H> {
  /// Seeds the loader with the candidate elements, in declaration order.
  ///
  /// That order is preserved: within one scan, elements are filtered and
  /// activated in the order given here.
  pub fn new(elements: impl IntoIterator<Item = H::Element>, options: LazyLoadOptions) -> Self {
    Self {
      slots: elements
        .into_iter()
        .map(|element| Slot {
          element,
          state: SlotState::Pending,
        })
        .collect(),
      batches: Vec::new(),
      next_batch_id: 0,
      activated: 0,
      options,
      callback: None,
      diagnostics: ScanDiagnostics::default(),
    }
  }

  /// Attaches a callback invoked once per activated element.
  ///
  /// In [`LoadMode::ReplaceElement`] the callback receives the *original*
  /// (pre-substitution) handle, which is detached from the document by the
  /// time it is invoked.
  pub fn with_callback(mut self, callback: impl FnMut(&H::Element) + 'static) -> Self {
    self.callback = Some(Box::new(callback));
    self
  }

  /// The configuration this loader was built with.
  pub fn options(&self) -> &LazyLoadOptions {
    &self.options
  }

  /// Number of elements not yet activated (pending plus in-flight).
  ///
  /// Never increases; decreases only when elements activate.
  pub fn remaining(&self) -> usize {
    self.slots.len() - self.activated
  }

  /// Cumulative scan/activation counters.
  pub fn diagnostics(&self) -> &ScanDiagnostics {
    &self.diagnostics
  }

  /// Maps an external signal to a scan.
  pub fn notify(&mut self, host: &mut H, trigger: ScanTrigger) -> Result<ScanOutcome> {
    match trigger {
      ScanTrigger::Scrolled => self.diagnostics.scroll_scans += 1,
      ScanTrigger::Resized => self.diagnostics.resize_scans += 1,
      ScanTrigger::Lookup => self.diagnostics.lookup_scans += 1,
    }
    self.scan(host)
  }

  /// Runs one scan: filter every pending element against the current
  /// viewport, then activate matches (or park them in a delayed batch when
  /// a settle delay is configured).
  ///
  /// Safe to call repeatedly; a no-op once every element has activated.
  /// Host mutation failures propagate unmodified; elements whose
  /// activation did not complete stay pending.
  pub fn scan(&mut self, host: &mut H) -> Result<ScanOutcome> {
    self.diagnostics.scans += 1;
    if self.remaining() == 0 {
      return Ok(ScanOutcome::default());
    }

    // Geometry is read fresh on every scan; it can change between scans.
    let viewport = host.viewport();
    let threshold = self.options.threshold;
    let matched = self
      .slots
      .iter()
      .enumerate()
      .filter(|(_, slot)| slot.state == SlotState::Pending)
      .filter(|(_, slot)| !host.is_hidden(&slot.element))
      .filter(|(_, slot)| is_near(host.bounds(&slot.element), viewport, threshold))
      .map(|(idx, _)| idx)
      .collect::<Vec<_>>();
    self.diagnostics.matched += matched.len();

    let matched_count = matched.len();
    let mut activated = 0;
    let mut deferred = 0;
    if !matched.is_empty() {
      if self.options.delay.is_zero() {
        for &idx in &matched {
          if self.activate(host, idx)? {
            activated += 1;
          }
        }
      } else {
        deferred = matched_count;
        self.defer_batch(host, matched);
      }
    }

    let outcome = ScanOutcome {
      matched: matched_count,
      activated,
      deferred,
      remaining: self.remaining(),
    };
    self.trace("scan", &outcome);
    Ok(outcome)
  }

  /// Re-checks a delayed batch once its settle delay has elapsed.
  ///
  /// Each batch member is re-filtered against the current viewport (hidden
  /// check included): members still near activate, the rest return to
  /// pending for future scans. Unknown or already-settled ids are a no-op,
  /// so uncoordinated timers from overlapping scans are harmless.
  pub fn settle(&mut self, host: &mut H, batch: SettleBatchId) -> Result<ScanOutcome> {
    self.diagnostics.settles += 1;
    let Some(pos) = self.batches.iter().position(|(id, _)| *id == batch) else {
      let outcome = ScanOutcome {
        remaining: self.remaining(),
        ..ScanOutcome::default()
      };
      return Ok(outcome);
    };
    let (_, members) = self.batches.swap_remove(pos);

    let viewport = host.viewport();
    let threshold = self.options.threshold;
    let mut activated = 0;
    let mut matched = 0;
    for (batch_pos, &idx) in members.iter().enumerate() {
      let element = self.slots[idx].element.clone();
      let still_near =
        !host.is_hidden(&element) && is_near(host.bounds(&element), viewport, threshold);
      if still_near {
        matched += 1;
        match self.activate(host, idx) {
          Ok(true) => activated += 1,
          Ok(false) => {}
          Err(err) => {
            // The failed member and everything after it go back to pending
            // rather than staying stranded in a consumed batch.
            for &rest in &members[batch_pos..] {
              if self.slots[rest].state == SlotState::InFlight {
                self.slots[rest].state = SlotState::Pending;
              }
            }
            return Err(err);
          }
        }
      } else {
        // Scrolled away (or hidden) during the wait; must be re-matched.
        self.slots[idx].state = SlotState::Pending;
      }
    }

    let outcome = ScanOutcome {
      matched,
      activated,
      deferred: 0,
      remaining: self.remaining(),
    };
    self.trace("settle", &outcome);
    Ok(outcome)
  }

  /// Parks `members` in a new delayed batch and hands the host its id.
  fn defer_batch(&mut self, host: &mut H, members: Vec<usize>) {
    for &idx in &members {
      self.slots[idx].state = SlotState::InFlight;
    }
    let id = SettleBatchId(self.next_batch_id);
    self.next_batch_id += 1;
    self.batches.push((id, members));
    self.diagnostics.deferred_batches += 1;
    host.schedule_settle(self.options.delay, id);
  }

  /// Activates one slot. Returns false if it was already consumed.
  ///
  /// Marking the slot activated and removing it from the pending pool are
  /// the same single state assignment, performed only after the host
  /// mutations succeed.
  fn activate(&mut self, host: &mut H, idx: usize) -> Result<bool> {
    // One-shot guard: never mutate an element twice, however a scan path
    // reached it.
    if self.slots[idx].state == SlotState::Activated {
      return Ok(false);
    }
    let element = self.slots[idx].element.clone();
    match self.options.mode {
      LoadMode::CopySource => {
        if let Some(source) = self.resolve_source(host, &element) {
          host.set_attribute(&element, LIVE_SRC_ATTR, &source)?;
          self.consume(idx);
          if let Some(callback) = self.callback.as_mut() {
            callback(&element);
          }
        } else {
          // No deferred source: consume with no write, so the element is
          // not re-scanned forever. The callback is not invoked.
          self.consume(idx);
        }
      }
      LoadMode::ReplaceElement => {
        let attributes = host.attributes(&element);
        let replacement =
          host.replace_element(&element, &self.options.replace_tag, &attributes)?;
        host.remove_class(&replacement, &self.options.loading_class)?;
        self.consume(idx);
        if let Some(callback) = self.callback.as_mut() {
          // The callback receives the original, now detached, handle.
          callback(&element);
        }
      }
    }
    Ok(true)
  }

  /// Picks the source value for [`LoadMode::CopySource`].
  ///
  /// High-density displays prefer the retina variant, falling back to the
  /// plain attribute when the variant is absent or empty. Empty values are
  /// treated as absent throughout.
  fn resolve_source(&self, host: &H, element: &H::Element) -> Option<String> {
    fn non_empty(value: Option<String>) -> Option<String> {
      value.filter(|v| !v.is_empty())
    }
    if host.is_high_density() {
      non_empty(host.attribute(element, DEFERRED_SRC_RETINA_ATTR))
        .or_else(|| non_empty(host.attribute(element, DEFERRED_SRC_ATTR)))
    } else {
      non_empty(host.attribute(element, DEFERRED_SRC_ATTR))
    }
  }

  fn consume(&mut self, idx: usize) {
    self.slots[idx].state = SlotState::Activated;
    self.activated += 1;
    self.diagnostics.activations += 1;
  }

  fn trace(&self, pass: &str, outcome: &ScanOutcome) {
    if runtime_toggles().truthy("LAZYLOAD_TRACE_SCAN") {
      eprintln!(
        "[{pass}] matched={} activated={} deferred={} remaining={}",
        outcome.matched, outcome.activated, outcome.deferred, outcome.remaining
      );
    }
  }
}
