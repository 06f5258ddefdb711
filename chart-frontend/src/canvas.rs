use std::cell::RefCell;
use std::rc::Rc;

use backtest_core::{normalize, NormalizedPoint, Period, RawSeriesPayload};
use js_sys::{Array, Function};
use serde::Serialize;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use crate::plan::{
    self, format_ohlc, format_period_label, format_price_label, ChartFrame, ChartOptions,
    FramePlan, OverlayToggles, PlotCandle, PlotMarker, ViewRange,
};

const BACKGROUND: &str = "#0c111a";
const GRID: &str = "#1b2836";
const LABEL: &str = "#d5e0ef";
const LABEL_BOX: &str = "#0f1724";
const CROSSHAIR: &str = "#8ab4ff";
const MARKER_OUTLINE: &str = "#ffffff";
const FONT: &str = "12px 'Inter', sans-serif";

trait RendererBackend {
    fn begin_frame(&mut self, width: f64, height: f64, ratio: f64, clear_color: &str);
    fn draw_candles(&mut self, candles: &[PlotCandle], color_up: &str, color_down: &str);
    fn draw_polyline(&mut self, points: &[(f64, f64)], color: &str, width: f64);
    fn draw_segments(&mut self, segments: &[(f64, f64, f64, f64)], color: &str, width: f64);
    fn draw_markers(&mut self, markers: &[PlotMarker], color_entry: &str, color_exit: &str);
}

struct CanvasBackend {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasBackend {
    fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
        Self { canvas, ctx }
    }
}

impl RendererBackend for CanvasBackend {
    fn begin_frame(&mut self, width: f64, height: f64, ratio: f64, clear_color: &str) {
        // Resizing the backing store resets context state, so the DPR scale
        // is re-applied here every frame.
        self.canvas.set_width((width * ratio).max(1.0) as u32);
        self.canvas.set_height((height * ratio).max(1.0) as u32);
        let _ = self.ctx.scale(ratio, ratio);
        self.ctx.set_fill_style_str(clear_color);
        self.ctx.fill_rect(0.0, 0.0, width, height);
    }

    fn draw_candles(&mut self, candles: &[PlotCandle], color_up: &str, color_down: &str) {
        let ctx = &self.ctx;
        for c in candles {
            let color = if c.up { color_up } else { color_down };
            ctx.set_stroke_style_str(color);
            ctx.set_fill_style_str(color);
            ctx.begin_path();
            ctx.move_to(c.x, c.y_high);
            ctx.line_to(c.x, c.y_low);
            ctx.stroke();

            let body_top = c.y_open.min(c.y_close);
            let body_bottom = c.y_open.max(c.y_close);
            let body_h = (body_bottom - body_top).max(1.0);
            ctx.fill_rect(c.x - c.half_w, body_top, c.half_w * 2.0, body_h);
        }
    }

    fn draw_polyline(&mut self, points: &[(f64, f64)], color: &str, width: f64) {
        if points.len() < 2 {
            return;
        }
        let ctx = &self.ctx;
        ctx.set_stroke_style_str(color);
        ctx.set_line_width(width);
        ctx.begin_path();
        ctx.move_to(points[0].0, points[0].1);
        for p in points.iter().skip(1) {
            ctx.line_to(p.0, p.1);
        }
        ctx.stroke();
    }

    fn draw_segments(&mut self, segments: &[(f64, f64, f64, f64)], color: &str, width: f64) {
        if segments.is_empty() {
            return;
        }
        let ctx = &self.ctx;
        ctx.set_stroke_style_str(color);
        ctx.set_line_width(width);
        for (x1, y1, x2, y2) in segments {
            ctx.begin_path();
            ctx.move_to(*x1, *y1);
            ctx.line_to(*x2, *y2);
            ctx.stroke();
        }
    }

    fn draw_markers(&mut self, markers: &[PlotMarker], color_entry: &str, color_exit: &str) {
        let ctx = &self.ctx;
        for m in markers {
            let color = if m.entry { color_entry } else { color_exit };
            ctx.set_fill_style_str(color);
            ctx.set_stroke_style_str(MARKER_OUTLINE);
            ctx.set_line_width(1.0);
            ctx.begin_path();
            ctx.move_to(m.x, m.y);
            ctx.line_to(m.x - m.size, m.y + m.size);
            ctx.line_to(m.x + m.size, m.y + m.size);
            ctx.close_path();
            ctx.fill();
            ctx.stroke();
        }
    }
}

// --- events -----------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum ChartEvent {
    TradeSelected {
        period: Period,
        price: f64,
        return_pct: f64,
        trade_type: String,
    },
    CrosshairMove {
        x: f64,
        y: f64,
        price: f64,
    },
    ViewChanged {
        start: f64,
        end: f64,
    },
}

struct EventSubscription {
    id: u32,
    callback: Function,
}

// --- chart ------------------------------------------------------------------

struct Chart {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    backend: Box<dyn RendererBackend>,

    points: Vec<NormalizedPoint>,
    opts: ChartOptions,
    toggles: OverlayToggles,
    view: ViewRange,

    width: f64,
    height: f64,
    ratio: f64,

    is_dragging: bool,
    last_pointer_x: f64,
    crosshair: Option<(f64, f64)>,

    // Frame geometry from the last render, kept for hit tests.
    last_frame: Option<ChartFrame>,

    dirty: bool,
    destroyed: bool,
}

impl Chart {
    fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
        let width = canvas.width() as f64;
        let height = canvas.height() as f64;
        let backend = Box::new(CanvasBackend::new(canvas.clone(), ctx.clone()));
        let opts = ChartOptions::default();
        let view = ViewRange::full(0, opts.x_edge_pad);
        Self {
            canvas,
            ctx,
            backend,
            points: Vec::new(),
            opts,
            toggles: OverlayToggles::default(),
            view,
            width,
            height,
            ratio: 1.0,
            is_dragging: false,
            last_pointer_x: 0.0,
            crosshair: None,
            last_frame: None,
            dirty: true,
            destroyed: false,
        }
    }

    /// Swap in a freshly normalized series. The view resets to the full
    /// range; overlay toggles survive payload changes.
    fn set_series(&mut self, points: Vec<NormalizedPoint>) {
        self.points = points;
        self.view = ViewRange::full(self.points.len(), self.opts.x_edge_pad);
        self.crosshair = None;
        self.dirty = true;
    }

    fn resize(&mut self, width: f64, height: f64, ratio: f64) {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
        self.ratio = ratio.max(0.1);
        self.dirty = true;
    }

    fn reset_view(&mut self) {
        self.view = ViewRange::full(self.points.len(), self.opts.x_edge_pad);
        self.dirty = true;
    }

    fn toggle_sma10(&mut self) -> bool {
        self.dirty = true;
        self.toggles.toggle_sma10()
    }

    fn toggle_sma20(&mut self) -> bool {
        self.dirty = true;
        self.toggles.toggle_sma20()
    }

    // --- interaction ---------------------------------------------------------

    fn on_mouse_down(&mut self, x: f64, _y: f64) {
        self.is_dragging = true;
        self.last_pointer_x = x;
    }

    fn on_mouse_move(&mut self, x: f64, y: f64) {
        self.crosshair = Some((x, y));
        if self.is_dragging {
            let dx = x - self.last_pointer_x;
            self.view.pan_pixels(dx, self.width);
            self.last_pointer_x = x;
        }
        self.dirty = true;
    }

    fn on_mouse_up(&mut self) {
        self.is_dragging = false;
    }

    fn on_wheel(&mut self, delta_y: f64, x: f64) {
        let factor = if delta_y < 0.0 { 0.9 } else { 1.1 };
        self.view
            .zoom_at(x, factor, self.width, self.opts.min_visible_bars);
        self.dirty = true;
    }

    fn marker_at(&self, x: f64, y: f64) -> Option<PlotMarker> {
        self.last_frame
            .as_ref()
            .and_then(|frame| plan::marker_hit(frame, x, y))
            .cloned()
    }

    // --- render path ---------------------------------------------------------

    fn frame(&mut self) {
        if self.destroyed || !self.dirty {
            return;
        }
        self.render();
        self.dirty = false;
    }

    /// Render boundary: a failure inside the draw path is logged and
    /// replaced with the error placeholder, never propagated.
    fn render(&mut self) {
        if let Err(err) = self.try_render() {
            console::error_1(&err);
            self.draw_placeholder("Error rendering chart");
        }
    }

    fn try_render(&mut self) -> Result<(), JsValue> {
        let frame_plan = plan::plan_frame(
            &self.points,
            &self.view,
            &self.opts,
            &self.toggles,
            self.width,
            self.height,
        );
        match frame_plan {
            FramePlan::NoData => {
                self.last_frame = None;
                self.draw_placeholder("No data available for chart");
            }
            FramePlan::Chart(frame) => {
                self.draw_frame(&frame)?;
                self.last_frame = Some(frame);
            }
        }
        Ok(())
    }

    fn draw_placeholder(&mut self, message: &str) {
        self.backend
            .begin_frame(self.width, self.height, self.ratio, BACKGROUND);
        let ctx = &self.ctx;
        ctx.set_fill_style_str(LABEL);
        ctx.set_font(FONT);
        ctx.set_text_align("center");
        ctx.fill_text(message, self.width * 0.5, self.height * 0.5)
            .ok();
        ctx.set_text_align("left");
    }

    fn draw_frame(&mut self, frame: &ChartFrame) -> Result<(), JsValue> {
        self.backend
            .begin_frame(self.width, self.height, self.ratio, BACKGROUND);

        let mut grid: Vec<(f64, f64, f64, f64)> = Vec::new();
        let y_range = (frame.y_max - frame.y_min).max(1e-9);
        for p in &frame.price_ticks {
            let y = self.height - (p - frame.y_min) / y_range * self.height;
            grid.push((0.0, y, self.width, y));
        }
        for (x, _) in &frame.index_ticks {
            grid.push((*x, 0.0, *x, self.height));
        }
        self.backend.draw_segments(&grid, GRID, 1.0);

        self.backend
            .draw_candles(&frame.candles, &self.opts.up_color, &self.opts.down_color);
        self.backend
            .draw_polyline(&frame.sma10, &self.opts.sma10_color, 1.0);
        self.backend
            .draw_polyline(&frame.sma20, &self.opts.sma20_color, 1.0);
        self.backend
            .draw_markers(&frame.markers, &self.opts.entry_color, &self.opts.exit_color);

        self.draw_axis_labels(frame);
        self.draw_edge_indicator(frame);
        self.draw_crosshair(frame)?;
        Ok(())
    }

    fn draw_axis_labels(&self, frame: &ChartFrame) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(LABEL);
        ctx.set_font(FONT);
        let y_range = (frame.y_max - frame.y_min).max(1e-9);
        for p in &frame.price_ticks {
            let y = self.height - (p - frame.y_min) / y_range * self.height;
            ctx.fill_text(&format_price_label(*p), self.width - 52.0, y - 2.0)
                .ok();
        }
        for (x, period) in &frame.index_ticks {
            ctx.fill_text(&period.to_string(), x - 6.0, self.height - 4.0)
                .ok();
        }
    }

    fn draw_edge_indicator(&self, frame: &ChartFrame) {
        let Some(edge) = &frame.edge else {
            return;
        };
        let ctx = &self.ctx;
        let color = if edge.up {
            &self.opts.up_color
        } else {
            &self.opts.down_color
        };
        let label = format_price_label(edge.close);
        let box_w = label.len() as f64 * 7.0 + 10.0;
        ctx.set_fill_style_str(color);
        ctx.fill_rect(self.width - box_w, edge.y - 10.0, box_w, 20.0);
        ctx.set_fill_style_str(LABEL_BOX);
        ctx.set_font(FONT);
        ctx.fill_text(&label, self.width - box_w + 4.0, edge.y + 4.0)
            .ok();
    }

    fn draw_crosshair(&self, frame: &ChartFrame) -> Result<(), JsValue> {
        let Some((x, y)) = self.crosshair else {
            return Ok(());
        };
        let ctx = &self.ctx;
        ctx.set_stroke_style_str(CROSSHAIR);
        ctx.set_line_width(1.0);
        ctx.set_line_dash(&Array::of2(
            &JsValue::from_f64(4.0),
            &JsValue::from_f64(4.0),
        ))?;
        ctx.begin_path();
        ctx.move_to(x, 0.0);
        ctx.line_to(x, self.height);
        ctx.move_to(0.0, y);
        ctx.line_to(self.width, y);
        ctx.stroke();
        ctx.set_line_dash(&Array::new())?;

        let hovered = plan::hover(frame, x);

        // y readout: price at the cursor row, 2-decimal.
        let y_range = (frame.y_max - frame.y_min).max(1e-9);
        let price = frame.y_min + (self.height - y) / self.height * y_range;
        let price_label = format_price_label(price);
        let price_box = price_label.len() as f64 * 7.0 + 10.0;
        ctx.set_fill_style_str(LABEL_BOX);
        ctx.fill_rect(self.width - price_box, y - 10.0, price_box, 20.0);
        ctx.set_fill_style_str(LABEL);
        ctx.set_font(FONT);
        ctx.fill_text(&price_label, self.width - price_box + 4.0, y + 4.0)
            .ok();

        // x readout: the hovered bar's period label.
        if let Some(candle) = hovered {
            let label = format_period_label(candle.source_period);
            let box_w = label.len() as f64 * 6.5 + 10.0;
            ctx.set_fill_style_str(LABEL_BOX);
            ctx.fill_rect(x - box_w * 0.5, self.height - 24.0, box_w, 20.0);
            ctx.set_fill_style_str(LABEL);
            ctx.fill_text(&label, x - box_w * 0.5 + 4.0, self.height - 10.0)
                .ok();

            let info = format_ohlc(candle);
            let info_w = info.len() as f64 * 6.5 + 12.0;
            ctx.set_fill_style_str(LABEL_BOX);
            ctx.fill_rect(8.0, 8.0, info_w, 20.0);
            ctx.set_fill_style_str(LABEL);
            ctx.fill_text(&info, 12.0, 22.0).ok();
        }

        // Marker tooltip when the cursor rests on a trade triangle.
        if let Some(marker) = plan::marker_hit(frame, x, y) {
            let lines: Vec<&str> = marker.tooltip.lines().collect();
            let widest = lines.iter().map(|l| l.len()).max().unwrap_or(0);
            let box_w = widest as f64 * 6.5 + 12.0;
            let box_h = lines.len() as f64 * 16.0 + 8.0;
            let bx = (x + 12.0).min(self.width - box_w - 4.0);
            let by = (y - box_h - 6.0).max(4.0);
            ctx.set_fill_style_str(LABEL_BOX);
            ctx.fill_rect(bx, by, box_w, box_h);
            ctx.set_fill_style_str(LABEL);
            for (i, line) in lines.iter().enumerate() {
                ctx.fill_text(line, bx + 6.0, by + 16.0 + i as f64 * 16.0)
                    .ok();
            }
        }
        Ok(())
    }
}

// --- handle wiring ----------------------------------------------------------

struct ChartHandleInner {
    chart: Chart,
    next_event_id: u32,
    subscribers: Vec<EventSubscription>,
}

impl ChartHandleInner {
    fn dispatch_event(&self, event: &ChartEvent) {
        if self.subscribers.is_empty() {
            return;
        }
        if let Ok(json) = serde_json::to_string(event) {
            let val = JsValue::from_str(&json);
            for sub in &self.subscribers {
                let _ = sub.callback.call1(&JsValue::NULL, &val);
            }
        }
    }

    fn add_subscription(&mut self, cb: Function) -> u32 {
        let id = self.next_event_id;
        self.next_event_id = self.next_event_id.wrapping_add(1);
        self.subscribers
            .push(EventSubscription { id, callback: cb });
        id
    }

    fn remove_subscription(&mut self, id: u32) {
        if let Some(idx) = self.subscribers.iter().position(|s| s.id == id) {
            self.subscribers.remove(idx);
        }
    }
}

/// Fit the canvas to its layouted size, picking up the device pixel ratio.
fn resize_canvas_to_parent(inner: &Rc<RefCell<ChartHandleInner>>) {
    let canvas = { inner.borrow().chart.canvas.clone() };
    let rect = canvas.get_bounding_client_rect();
    let ratio = web_sys::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(1.0);
    inner
        .borrow_mut()
        .chart
        .resize(rect.width().max(1.0), rect.height().max(1.0), ratio);
}

fn setup_mouse_events(inner_rc: &Rc<RefCell<ChartHandleInner>>) -> Result<(), JsValue> {
    let canvas = inner_rc.borrow().chart.canvas.clone();

    // mousedown: marker hit wins over drag start.
    {
        let inner_rc = inner_rc.clone();
        let canvas_clone = canvas.clone();
        let closure = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |event: MouseEvent| {
            event.prevent_default();
            let rect = canvas_clone.get_bounding_client_rect();
            let x = event.client_x() as f64 - rect.left();
            let y = event.client_y() as f64 - rect.top();

            let hit = { inner_rc.borrow().chart.marker_at(x, y) };
            if let Some(marker) = hit {
                let inner = inner_rc.borrow();
                inner.dispatch_event(&ChartEvent::TradeSelected {
                    period: marker.source_period,
                    price: marker.trade.price,
                    return_pct: marker.trade.return_pct,
                    trade_type: marker.trade.trade_type.clone(),
                });
                return;
            }
            inner_rc.borrow_mut().chart.on_mouse_down(x, y);
        }));
        canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // mousemove
    {
        let inner_rc = inner_rc.clone();
        let canvas_clone = canvas.clone();
        let closure = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |event: MouseEvent| {
            event.prevent_default();
            let rect = canvas_clone.get_bounding_client_rect();
            let x = event.client_x() as f64 - rect.left();
            let y = event.client_y() as f64 - rect.top();

            let (price, dragging) = {
                let mut inner = inner_rc.borrow_mut();
                inner.chart.on_mouse_move(x, y);
                let price = inner.chart.last_frame.as_ref().map(|f| {
                    let range = (f.y_max - f.y_min).max(1e-9);
                    f.y_min + (inner.chart.height - y) / inner.chart.height * range
                });
                (price, inner.chart.is_dragging)
            };

            let inner = inner_rc.borrow();
            if let Some(price) = price {
                inner.dispatch_event(&ChartEvent::CrosshairMove { x, y, price });
            }
            if dragging {
                let view = inner.chart.view;
                inner.dispatch_event(&ChartEvent::ViewChanged {
                    start: view.start,
                    end: view.end,
                });
            }
        }));
        canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // mouseup (window-level so drags can end off-canvas)
    {
        let inner_rc = inner_rc.clone();
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let closure = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |_event: MouseEvent| {
            inner_rc.borrow_mut().chart.on_mouse_up();
        }));
        window.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // wheel zoom
    {
        let inner_rc = inner_rc.clone();
        let canvas_clone = canvas.clone();
        let opts = web_sys::AddEventListenerOptions::new();
        opts.set_passive(true);
        let closure = Closure::<dyn FnMut(WheelEvent)>::wrap(Box::new(move |event: WheelEvent| {
            let rect = canvas_clone.get_bounding_client_rect();
            let x = event.client_x() as f64 - rect.left();
            let mut inner = inner_rc.borrow_mut();
            inner.chart.on_wheel(event.delta_y(), x);
            let view = inner.chart.view;
            inner.dispatch_event(&ChartEvent::ViewChanged {
                start: view.start,
                end: view.end,
            });
        }));
        canvas.add_event_listener_with_callback_and_add_event_listener_options(
            "wheel",
            closure.as_ref().unchecked_ref(),
            &opts,
        )?;
        closure.forget();
    }

    Ok(())
}

fn start_render_loop(inner_rc: Rc<RefCell<ChartHandleInner>>) {
    let f = Rc::new(RefCell::new(None::<Closure<dyn FnMut(f64)>>));
    let g = f.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |_timestamp: f64| {
        let mut should_continue = true;
        {
            let mut inner = inner_rc.borrow_mut();
            if inner.chart.destroyed {
                should_continue = false;
            } else {
                inner.chart.frame();
            }
        }

        if should_continue {
            if let Some(window) = web_sys::window() {
                if let Some(cb) = f.borrow().as_ref() {
                    let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
                }
            }
        }
    }) as Box<dyn FnMut(f64)>));

    if let Some(window) = web_sys::window() {
        if let Some(cb) = g.borrow().as_ref() {
            let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }
}

/// Public chart handle for the application shell.
#[wasm_bindgen]
pub struct ChartHandle {
    inner: Rc<RefCell<ChartHandleInner>>,
}

#[wasm_bindgen]
impl ChartHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<ChartHandle, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let element = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str("canvas not found"))?;

        let canvas: HtmlCanvasElement = element
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str("element is not a canvas"))?;

        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let chart = Chart::new(canvas, context);
        let inner = Rc::new(RefCell::new(ChartHandleInner {
            chart,
            next_event_id: 1,
            subscribers: Vec::new(),
        }));

        resize_canvas_to_parent(&inner);
        {
            let inner_clone = inner.clone();
            let resize_cb = Closure::<dyn FnMut()>::wrap(Box::new(move || {
                resize_canvas_to_parent(&inner_clone);
            }));
            window
                .add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref())?;
            resize_cb.forget();
        }
        {
            // One extra pass on the next frame to catch initial layout.
            let inner_clone = inner.clone();
            let raf = Closure::<dyn FnMut(f64)>::wrap(Box::new(move |_| {
                resize_canvas_to_parent(&inner_clone);
            }));
            window
                .request_animation_frame(raf.as_ref().unchecked_ref())
                .map_err(|_| JsValue::from_str("failed to schedule resize"))?;
            raf.forget();
        }

        setup_mouse_events(&inner)?;
        start_render_loop(inner.clone());

        Ok(ChartHandle { inner })
    }

    /// Feed a raw backtest payload. Malformed JSON and empty datasets are
    /// reported to the console and leave the chart in the no-data state.
    pub fn set_payload(&self, json: &str) {
        let points = match RawSeriesPayload::from_json(json) {
            Ok(payload) => {
                let points = normalize(&payload);
                if points.is_empty() {
                    console::warn_1(&JsValue::from_str(
                        "backtest payload produced no drawable points",
                    ));
                }
                points
            }
            Err(err) => {
                console::warn_1(&JsValue::from_str(&format!(
                    "ignoring malformed backtest payload: {err}"
                )));
                Vec::new()
            }
        };
        self.inner.borrow_mut().chart.set_series(points);
    }

    /// Explicit layout from the sizing collaborator: CSS pixel width/height
    /// plus device pixel ratio.
    pub fn set_view_size(&self, width: f64, height: f64, ratio: f64) {
        self.inner.borrow_mut().chart.resize(width, height, ratio);
    }

    pub fn reset_view(&self) {
        self.inner.borrow_mut().chart.reset_view();
    }

    /// Flip the 10-period overlay; returns the new visibility.
    pub fn toggle_sma10(&self) -> bool {
        self.inner.borrow_mut().chart.toggle_sma10()
    }

    /// Flip the 20-period overlay; returns the new visibility.
    pub fn toggle_sma20(&self) -> bool {
        self.inner.borrow_mut().chart.toggle_sma20()
    }

    pub fn sma10_visible(&self) -> bool {
        self.inner.borrow().chart.toggles.show_sma10
    }

    pub fn sma20_visible(&self) -> bool {
        self.inner.borrow().chart.toggles.show_sma20
    }

    /// Subscribe to chart events (trade selection, crosshair, view changes).
    /// The callback receives a JSON string payload.
    pub fn subscribe_events(&self, callback: &Function) -> u32 {
        self.inner.borrow_mut().add_subscription(callback.clone())
    }

    pub fn unsubscribe_events(&self, id: u32) {
        self.inner.borrow_mut().remove_subscription(id);
    }

    pub fn destroy(&self) {
        self.inner.borrow_mut().chart.destroyed = true;
    }
}
