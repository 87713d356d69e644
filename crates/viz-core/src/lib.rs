//! # viz-core
//!
//! Core domain types for the time-series visualization suite: value trees,
//! dimension catalogs, period arithmetic, formatting and color assignment.
//! Implements Strategy pattern for reduction and period labeling.

pub mod catalog;
pub mod colors;
pub mod format;
pub mod stats;
pub mod time;
pub mod value;
pub mod view;

pub use catalog::*;
pub use stats::*;
pub use time::*;
pub use value::*;
pub use view::*;
