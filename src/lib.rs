pub mod debug;
pub mod error;
pub mod geometry;
pub mod host;
pub mod loader;
pub mod visibility;

pub use error::{Error, HostError, Result};
pub use geometry::{ElementBounds, Viewport};
pub use host::DocumentHost;
pub use loader::{
  LazyLoadOptions, LazyLoader, LoadMode, ScanDiagnostics, ScanOutcome, ScanTrigger, SettleBatchId,
};
pub use visibility::is_near;
