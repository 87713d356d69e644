//! # viz-components
//!
//! Leptos widgets for the statistics view suite: the summary table, the
//! view controls, the dimension selectors and the tooltip, all reading one
//! [`viz_state::VizState`] from context.

pub mod badges;
pub mod data_viz;
pub mod selectors;
pub mod summary_table;
pub mod toolbar;
pub mod tooltip_panel;

pub use badges::*;
pub use data_viz::*;
pub use selectors::*;
pub use summary_table::*;
pub use toolbar::*;
pub use tooltip_panel::*;
