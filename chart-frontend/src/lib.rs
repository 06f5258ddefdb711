//! Interactive OHLC chart for backtest results: candlesticks, optional
//! moving-average overlays, crosshair readouts, an edge indicator and
//! clickable trade markers, drawn on a 2D canvas.
//!
//! The crate is split so the geometry (`plan`) is platform-neutral; only the
//! canvas layer talks to the browser.

pub mod plan;

#[cfg(target_arch = "wasm32")]
mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::ChartHandle;

pub use plan::{
    format_ohlc, format_period_label, format_price_label, hover, is_up, marker_for, marker_hit,
    plan_frame, y_domain, ChartFrame, ChartOptions, EdgeIndicator, FramePlan, MarkerDescriptor,
    OverlayToggles, PlotCandle, PlotMarker, ViewRange,
};
