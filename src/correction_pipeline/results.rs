//! Result assembly module
//!
//! Read-only views over sampled data and a fitted model: the per-pixel table and the
//! predicted-versus-observed plot series.

mod plot;
mod table;


pub use plot::{PALETTE, PlotData, PlotSeries, REFERENCE_LINE};
pub use table::{ResultRow, ResultTable};
