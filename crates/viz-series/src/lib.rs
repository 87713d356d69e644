//! # viz-series
//!
//! The data pipeline behind the widgets: transforms the raw statistics
//! payload into labeled, share-annotated series, reduces each period to
//! summary values, and regroups hovered points for the tooltip.

pub mod reduce;
pub mod tooltip;
pub mod transform;

pub use reduce::*;
pub use tooltip::*;
pub use transform::*;

use thiserror::Error;
use viz_core::PathError;

/// Failure while deriving series from a payload. The whole derivation is
/// atomic: callers keep their previous state when they get one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("unknown dimension {0:?}")]
    UnknownDimension(String),
    #[error("invalid key {key:?}")]
    InvalidKey {
        key: String,
        #[source]
        source: PathError,
    },
}
