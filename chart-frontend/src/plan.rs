//! Frame planning: turning a normalized point series plus view/toggle state
//! into plot-space geometry. Everything in this module is plain data and
//! plain math so it runs (and is tested) off the rendering environment.

use backtest_core::{NormalizedPoint, Period, TradeEvent};

/// Presentation parameters. The fractions that place markers and pad the
/// price domain are configuration, not constants baked into draw code.
#[derive(Debug, Clone)]
pub struct ChartOptions {
    /// Trade markers sit at `low * marker_low_fraction`, below the bar.
    pub marker_low_fraction: f64,
    /// Price domain is `[min(low) * y_pad_low, max(high) * y_pad_high]`.
    pub y_pad_low: f64,
    pub y_pad_high: f64,
    /// Extra bars of horizontal padding at each end of the full view.
    pub x_edge_pad: f64,
    /// Fraction of a slot a candle body occupies, and its pixel bounds.
    pub bar_fill: f64,
    pub min_bar_px: f64,
    pub max_bar_px: f64,
    /// Smallest number of bars a zoom may narrow the view to.
    pub min_visible_bars: f64,
    pub marker_px: f64,
    pub up_color: String,
    pub down_color: String,
    pub entry_color: String,
    pub exit_color: String,
    pub sma10_color: String,
    pub sma20_color: String,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            marker_low_fraction: 0.85,
            y_pad_low: 0.9,
            y_pad_high: 1.1,
            x_edge_pad: 0.5,
            bar_fill: 0.7,
            min_bar_px: 2.0,
            max_bar_px: 14.0,
            min_visible_bars: 4.0,
            marker_px: 8.0,
            up_color: "#22c55e".into(),
            down_color: "#ef4444".into(),
            entry_color: "#22c55e".into(),
            exit_color: "#ef4444".into(),
            sma10_color: "#3b82f6".into(),
            sma20_color: "#eab308".into(),
        }
    }
}

/// Which moving-average overlays are drawn. Both start visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayToggles {
    pub show_sma10: bool,
    pub show_sma20: bool,
}

impl Default for OverlayToggles {
    fn default() -> Self {
        Self {
            show_sma10: true,
            show_sma20: true,
        }
    }
}

impl OverlayToggles {
    pub fn toggle_sma10(&mut self) -> bool {
        self.show_sma10 = !self.show_sma10;
        self.show_sma10
    }

    pub fn toggle_sma20(&mut self) -> bool {
        self.show_sma20 = !self.show_sma20;
        self.show_sma20
    }
}

/// Visible window over display-index space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewRange {
    pub start: f64,
    pub end: f64,
}

impl ViewRange {
    /// Full-series view: `0..n-1` plus edge padding.
    pub fn full(len: usize, edge_pad: f64) -> Self {
        let pad = edge_pad.max(0.0);
        if len == 0 {
            return Self {
                start: -pad,
                end: pad.max(1.0),
            };
        }
        Self {
            start: -pad,
            end: (len - 1) as f64 + pad,
        }
    }

    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    pub fn index_to_x(&self, index: f64, width: f64) -> f64 {
        let span = self.span();
        if span <= 0.0 || width <= 0.0 {
            return 0.0;
        }
        (index - self.start) / span * width
    }

    pub fn x_to_index(&self, x: f64, width: f64) -> f64 {
        let span = self.span();
        if span <= 0.0 || width <= 0.0 {
            return self.start;
        }
        self.start + (x / width).clamp(0.0, 1.0) * span
    }

    /// Shift the window by a pixel delta (drag pan).
    pub fn pan_pixels(&mut self, dx: f64, width: f64) {
        let span = self.span();
        if span <= 0.0 || width <= 0.0 {
            return;
        }
        let delta = dx * span / width;
        self.start -= delta;
        self.end -= delta;
    }

    /// Scale the window about the bar under the cursor.
    pub fn zoom_at(&mut self, x: f64, factor: f64, width: f64, min_span: f64) {
        if factor <= 0.0 {
            return;
        }
        let span = self.span();
        if span <= 0.0 || width <= 0.0 {
            return;
        }
        let anchor = self.x_to_index(x, width);
        let new_span = (span * factor).max(min_span.max(1e-6));
        let ratio = ((anchor - self.start) / span).clamp(0.0, 1.0);
        self.start = anchor - new_span * ratio;
        self.end = self.start + new_span;
    }
}

/// One candle in pixel space, plus the raw values the tooltip needs.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotCandle {
    pub display_index: usize,
    pub source_period: Period,
    pub x: f64,
    pub half_w: f64,
    pub y_open: f64,
    pub y_close: f64,
    pub y_high: f64,
    pub y_low: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub up: bool,
}

/// A trade marker before projection: price/index space only.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerDescriptor {
    pub display_index: usize,
    pub source_period: Period,
    /// Price coordinate of the triangle apex.
    pub price: f64,
    pub entry: bool,
    pub tooltip: String,
    pub trade: TradeEvent,
}

/// A trade marker in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotMarker {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub entry: bool,
    pub tooltip: String,
    pub trade: TradeEvent,
    pub source_period: Period,
}

/// Latest-close tag pinned to the right edge of the pane.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeIndicator {
    pub y: f64,
    pub close: f64,
    pub up: bool,
}

/// Everything a backend needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartFrame {
    pub candles: Vec<PlotCandle>,
    pub sma10: Vec<(f64, f64)>,
    pub sma20: Vec<(f64, f64)>,
    pub markers: Vec<PlotMarker>,
    pub edge: Option<EdgeIndicator>,
    pub y_min: f64,
    pub y_max: f64,
    pub price_ticks: Vec<f64>,
    /// (x, source period) pairs for the x-axis labels.
    pub index_ticks: Vec<(f64, Period)>,
}

/// Outcome of planning: either a drawable frame or the explicit no-data
/// state the renderer turns into a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum FramePlan {
    NoData,
    Chart(ChartFrame),
}

/// Candle direction: a non-negative close-minus-open counts as up. The same
/// decision colors body, wick and edge indicator.
pub fn is_up(open: f64, close: f64) -> bool {
    close - open >= 0.0
}

/// Derive the marker for a point, if it carries a trade.
pub fn marker_for(point: &NormalizedPoint, opts: &ChartOptions) -> Option<MarkerDescriptor> {
    let trade = point.trade.as_ref()?;
    Some(MarkerDescriptor {
        display_index: point.display_index,
        source_period: point.source_period,
        price: point.low * opts.marker_low_fraction,
        entry: trade.action.is_entry(),
        tooltip: format!(
            "{} @ {:.2}\nReturn: {:.2}%",
            trade.trade_type, trade.price, trade.return_pct
        ),
        trade: trade.clone(),
    })
}

/// x-axis readout under the cursor.
pub fn format_period_label(period: Period) -> String {
    format!("Period {period}")
}

/// y-axis readout under the cursor.
pub fn format_price_label(price: f64) -> String {
    format!("{price:.2}")
}

/// OHLC summary for the bar under the cursor.
pub fn format_ohlc(candle: &PlotCandle) -> String {
    format!(
        "O:{:.2} H:{:.2} L:{:.2} C:{:.2}",
        candle.open, candle.high, candle.low, candle.close
    )
}

fn visible_bounds(len: usize, view: &ViewRange) -> Option<(usize, usize)> {
    if len == 0 {
        return None;
    }
    let first = view.start.ceil().max(0.0) as usize;
    let last = view.end.floor().min((len - 1) as f64);
    if last < 0.0 || first as f64 > last {
        return None;
    }
    Some((first, last as usize))
}

/// Price domain over the visible slice, padded per the options.
pub fn y_domain(points: &[NormalizedPoint], opts: &ChartOptions) -> Option<(f64, f64)> {
    let mut min_low = f64::MAX;
    let mut max_high = f64::MIN;
    for p in points {
        min_low = min_low.min(p.low);
        max_high = max_high.max(p.high);
    }
    if !min_low.is_finite() || !max_high.is_finite() {
        return None;
    }
    Some((min_low * opts.y_pad_low, max_high * opts.y_pad_high))
}

/// Build the geometry for one frame. Returns `NoData` when there is nothing
/// drawable: an empty series, a view scrolled past the data, or a degenerate
/// price domain.
pub fn plan_frame(
    points: &[NormalizedPoint],
    view: &ViewRange,
    opts: &ChartOptions,
    toggles: &OverlayToggles,
    width: f64,
    height: f64,
) -> FramePlan {
    if points.is_empty() || width <= 0.0 || height <= 0.0 {
        return FramePlan::NoData;
    }
    let Some((first, last)) = visible_bounds(points.len(), view) else {
        return FramePlan::NoData;
    };
    let visible = &points[first..=last];
    let Some((y_min, y_max)) = y_domain(visible, opts) else {
        return FramePlan::NoData;
    };

    let y_range = (y_max - y_min).max(1e-9);
    let price_to_y = |price: f64| height - (price - y_min) / y_range * height;
    let index_to_x = |index: usize| view.index_to_x(index as f64, width);

    let slot = width / view.span().max(1.0);
    let half_w = (slot * opts.bar_fill * 0.5).clamp(opts.min_bar_px * 0.5, opts.max_bar_px * 0.5);

    let mut candles = Vec::with_capacity(visible.len());
    let mut sma10 = Vec::new();
    let mut sma20 = Vec::new();
    let mut markers = Vec::new();

    for point in visible {
        let x = index_to_x(point.display_index);
        candles.push(PlotCandle {
            display_index: point.display_index,
            source_period: point.source_period,
            x,
            half_w,
            y_open: price_to_y(point.open),
            y_close: price_to_y(point.close),
            y_high: price_to_y(point.high),
            y_low: price_to_y(point.low),
            open: point.open,
            high: point.high,
            low: point.low,
            close: point.close,
            up: is_up(point.open, point.close),
        });

        // Overlay lines only span points where the source value exists;
        // absent cells leave gaps instead of dragging the line to zero.
        if toggles.show_sma10 {
            if let Some(v) = point.sma10 {
                sma10.push((x, price_to_y(v)));
            }
        }
        if toggles.show_sma20 {
            if let Some(v) = point.sma20 {
                sma20.push((x, price_to_y(v)));
            }
        }

        if let Some(m) = marker_for(point, opts) {
            markers.push(PlotMarker {
                x,
                y: price_to_y(m.price),
                size: opts.marker_px,
                entry: m.entry,
                tooltip: m.tooltip,
                trade: m.trade,
                source_period: m.source_period,
            });
        }
    }

    let edge = candles.last().map(|c| EdgeIndicator {
        y: c.y_close,
        close: c.close,
        up: c.up,
    });

    let price_ticks = (0..5)
        .map(|i| y_min + y_range * i as f64 / 4.0)
        .collect();
    let tick_step = (visible.len() / 6).max(1);
    let index_ticks = visible
        .iter()
        .step_by(tick_step)
        .map(|p| (index_to_x(p.display_index), p.source_period))
        .collect();

    FramePlan::Chart(ChartFrame {
        candles,
        sma10,
        sma20,
        markers,
        edge,
        y_min,
        y_max,
        price_ticks,
        index_ticks,
    })
}

/// Nearest bar to a pixel x, for the OHLC tooltip and coordinate readouts.
pub fn hover<'a>(frame: &'a ChartFrame, x: f64) -> Option<&'a PlotCandle> {
    frame
        .candles
        .iter()
        .min_by(|a, b| {
            (a.x - x)
                .abs()
                .partial_cmp(&(b.x - x).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// First marker whose triangle bounding box contains the pixel point.
pub fn marker_hit<'a>(frame: &'a ChartFrame, x: f64, y: f64) -> Option<&'a PlotMarker> {
    frame.markers.iter().find(|m| {
        (x - m.x).abs() <= m.size && y >= m.y - 1.0 && y <= m.y + m.size + 1.0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use backtest_core::{normalize, RawSeriesPayload};
    use serde_json::json;

    fn points_from(value: serde_json::Value) -> Vec<backtest_core::NormalizedPoint> {
        let payload: RawSeriesPayload = serde_json::from_value(value).unwrap();
        normalize(&payload)
    }

    fn sample_points() -> Vec<backtest_core::NormalizedPoint> {
        points_from(json!({
            "Open":  { "0": 100, "1": 105, "2": 101 },
            "High":  { "0": 110, "1": 108, "2": 106 },
            "Low":   { "0": 95,  "1": 100, "2": 98 },
            "Close": { "0": 102, "1": 103, "2": 104 },
            "SMA_10": { "1": 101.5, "2": 102.0 },
            "trades": [{
                "period": 1, "action": 1, "price": 105,
                "return": 0.03, "return_pct": 3, "trade_type": "BUY"
            }]
        }))
    }

    fn plan(points: &[backtest_core::NormalizedPoint]) -> FramePlan {
        let opts = ChartOptions::default();
        let view = ViewRange::full(points.len(), opts.x_edge_pad);
        plan_frame(points, &view, &opts, &OverlayToggles::default(), 800.0, 400.0)
    }

    #[test]
    fn empty_series_plans_no_data() {
        assert_eq!(plan(&[]), FramePlan::NoData);
    }

    #[test]
    fn y_domain_pads_low_and_high() {
        let points = sample_points();
        let (lo, hi) = y_domain(&points, &ChartOptions::default()).unwrap();
        assert_eq!(lo, 95.0 * 0.9);
        assert_eq!(hi, 110.0 * 1.1);
    }

    #[test]
    fn frame_has_one_candle_per_visible_point() {
        let points = sample_points();
        let FramePlan::Chart(frame) = plan(&points) else {
            panic!("expected a drawable frame");
        };
        assert_eq!(frame.candles.len(), 3);
        // x positions strictly increase with display index
        assert!(frame.candles.windows(2).all(|w| w[0].x < w[1].x));
    }

    #[test]
    fn candle_direction_follows_close_minus_open() {
        assert!(is_up(100.0, 102.0));
        assert!(is_up(100.0, 100.0));
        assert!(!is_up(105.0, 103.0));

        let points = sample_points();
        let FramePlan::Chart(frame) = plan(&points) else {
            panic!("expected a drawable frame");
        };
        assert!(!frame.candles[1].up); // close 103 < open 105
        assert!(frame.candles[2].up);
    }

    #[test]
    fn overlay_line_skips_absent_values() {
        let points = sample_points();
        let FramePlan::Chart(frame) = plan(&points) else {
            panic!("expected a drawable frame");
        };
        // SMA_10 has no cell for period 0: two line points, not three,
        // and none of them at the zero-price pixel row.
        assert_eq!(frame.sma10.len(), 2);
        assert!(frame.sma20.is_empty());
    }

    #[test]
    fn toggled_off_overlay_plans_nothing() {
        let points = sample_points();
        let opts = ChartOptions::default();
        let view = ViewRange::full(points.len(), opts.x_edge_pad);
        let toggles = OverlayToggles {
            show_sma10: false,
            show_sma20: true,
        };
        let FramePlan::Chart(frame) =
            plan_frame(&points, &view, &opts, &toggles, 800.0, 400.0)
        else {
            panic!("expected a drawable frame");
        };
        assert!(frame.sma10.is_empty());
    }

    #[test]
    fn double_toggle_is_identity() {
        let mut toggles = OverlayToggles::default();
        assert!(toggles.show_sma10);
        toggles.toggle_sma10();
        toggles.toggle_sma10();
        assert!(toggles.show_sma10);
        assert!(toggles.show_sma20);
    }

    #[test]
    fn marker_sits_below_the_low_and_keeps_trade_detail() {
        let points = sample_points();
        let marker = marker_for(&points[1], &ChartOptions::default()).unwrap();
        assert_eq!(marker.price, 100.0 * 0.85);
        assert!(marker.entry);
        assert_eq!(marker.source_period, 1);
        assert_eq!(marker.tooltip, "BUY @ 105.00\nReturn: 3.00%");
        assert_eq!(marker.trade.trade_type, "BUY");

        assert!(marker_for(&points[0], &ChartOptions::default()).is_none());
    }

    #[test]
    fn marker_fraction_is_configurable() {
        let points = sample_points();
        let opts = ChartOptions {
            marker_low_fraction: 0.5,
            ..ChartOptions::default()
        };
        let marker = marker_for(&points[1], &opts).unwrap();
        assert_eq!(marker.price, 50.0);
    }

    #[test]
    fn frame_carries_one_marker_per_traded_point() {
        let points = sample_points();
        let FramePlan::Chart(frame) = plan(&points) else {
            panic!("expected a drawable frame");
        };
        assert_eq!(frame.markers.len(), 1);
        let marker = &frame.markers[0];
        assert_eq!(marker.source_period, 1);
        // apex is below the bar's low pixel (larger y = lower on screen)
        assert!(marker.y > frame.candles[1].y_low);
    }

    #[test]
    fn edge_indicator_tracks_last_visible_close() {
        let points = sample_points();
        let FramePlan::Chart(frame) = plan(&points) else {
            panic!("expected a drawable frame");
        };
        let edge = frame.edge.unwrap();
        assert_eq!(edge.close, 104.0);
        assert!(edge.up);
    }

    #[test]
    fn hover_picks_the_nearest_bar() {
        let points = sample_points();
        let FramePlan::Chart(frame) = plan(&points) else {
            panic!("expected a drawable frame");
        };
        let near_last = frame.candles[2].x - 1.0;
        assert_eq!(hover(&frame, near_last).unwrap().display_index, 2);
        assert_eq!(hover(&frame, 0.0).unwrap().display_index, 0);
    }

    #[test]
    fn marker_hit_requires_the_triangle_box() {
        let points = sample_points();
        let FramePlan::Chart(frame) = plan(&points) else {
            panic!("expected a drawable frame");
        };
        let m = frame.markers[0].clone();
        assert!(marker_hit(&frame, m.x, m.y + 2.0).is_some());
        assert!(marker_hit(&frame, m.x + m.size * 3.0, m.y).is_none());
    }

    #[test]
    fn readout_formats() {
        assert_eq!(format_period_label(42), "Period 42");
        assert_eq!(format_price_label(101.2345), "101.23");
    }

    #[test]
    fn view_zoom_and_pan_round_trip() {
        let mut view = ViewRange::full(100, 0.5);
        let span = view.span();
        view.zoom_at(400.0, 0.5, 800.0, 4.0);
        assert!((view.span() - span * 0.5).abs() < 1e-9);

        let start = view.start;
        view.pan_pixels(80.0, 800.0);
        assert!(view.start < start);

        // x/index mapping is consistent
        let x = view.index_to_x(10.0, 800.0);
        assert!((view.x_to_index(x, 800.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn zoom_respects_min_span() {
        let mut view = ViewRange::full(10, 0.5);
        for _ in 0..50 {
            view.zoom_at(400.0, 0.5, 800.0, 4.0);
        }
        assert!(view.span() >= 4.0);
    }

    #[test]
    fn view_scrolled_past_data_plans_no_data() {
        let points = sample_points();
        let opts = ChartOptions::default();
        let view = ViewRange {
            start: 50.0,
            end: 60.0,
        };
        let plan = plan_frame(&points, &view, &opts, &OverlayToggles::default(), 800.0, 400.0);
        assert_eq!(plan, FramePlan::NoData);
    }
}
