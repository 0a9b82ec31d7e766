//! Human-readable rendering of simulation results.

pub mod chart;
pub mod text;

pub use chart::{lease_chart, CHART_WIDTH};
pub use text::{event_summary, timeline, warning_list};
