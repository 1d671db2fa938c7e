//! Charts module - Chart rendering

mod plotter;

pub use plotter::{ChartPlotter, NamedSeries, ACCENT_COLOR, MISSING_COLOR, PALETTE};
