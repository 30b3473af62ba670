//! # Portfolio Report
//!
//! Turns the filtered balances and positions of each account into the
//! printed summary.
//!
//! ## Public API
//!
//! - `AccountReport`: the per-account data the renderers consume.
//! - `render_account` / `render_header` / `render_footer`: the text report.
//! - `render_json`: the machine-readable alternative.
//! - `format`: number, P&L and leverage formatting helpers.

pub mod format;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use format::{format_leverage, format_number, format_pnl};
pub use report::{
    render_account, render_footer, render_header, render_json, AccountReport, COMPLETION_MARKER,
    NO_DATA, TITLE,
};
