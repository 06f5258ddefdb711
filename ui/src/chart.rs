use std::rc::Rc;

use chart_frontend::ChartHandle;
use gloo_timers::future::TimeoutFuture;
use leptos::*;
use serde::Deserialize;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

use crate::state::use_backtest_ctx;

/// Chart events arrive as JSON; this mirrors the chart crate's event shape.
#[derive(Deserialize)]
#[serde(tag = "type")]
enum ChartEventPayload {
    TradeSelected {
        period: i64,
        price: f64,
        return_pct: f64,
        trade_type: String,
    },
    CrosshairMove {
        #[allow(dead_code)]
        x: f64,
        #[allow(dead_code)]
        y: f64,
        #[allow(dead_code)]
        price: f64,
    },
    ViewChanged {
        #[allow(dead_code)]
        start: f64,
        #[allow(dead_code)]
        end: f64,
    },
}

#[derive(Clone, Debug, PartialEq)]
struct TradeDetail {
    period: i64,
    price: f64,
    return_pct: f64,
    trade_type: String,
}

/// Chart pane: total-return header, overlay toggles, the canvas itself and
/// an inline detail panel for clicked trade markers.
#[component]
pub fn ChartPanel() -> impl IntoView {
    let backtest = use_backtest_ctx();
    let total_return = backtest.total_return;
    let metrics = backtest.metrics;
    let payload_json = backtest.payload_json;

    let handle = create_rw_signal::<Option<Rc<ChartHandle>>>(None);
    let trade_detail = create_rw_signal::<Option<TradeDetail>>(None);
    let sma10_on = create_rw_signal(true);
    let sma20_on = create_rw_signal(true);

    spawn_local(async move {
        // Defer until the canvas is in the DOM.
        TimeoutFuture::new(0).await;
        match ChartHandle::new("backtest-chart-canvas") {
            Ok(h) => {
                let callback = Closure::<dyn FnMut(JsValue)>::wrap(Box::new(move |val: JsValue| {
                    let Some(txt) = val.as_string() else {
                        return;
                    };
                    if let Ok(ChartEventPayload::TradeSelected {
                        period,
                        price,
                        return_pct,
                        trade_type,
                    }) = serde_json::from_str::<ChartEventPayload>(&txt)
                    {
                        trade_detail.set(Some(TradeDetail {
                            period,
                            price,
                            return_pct,
                            trade_type,
                        }));
                    }
                }));
                h.subscribe_events(callback.as_ref().unchecked_ref());
                callback.forget();

                if let Some(json) = payload_json.get_untracked() {
                    h.set_payload(&json);
                }
                handle.set(Some(Rc::new(h)));
            }
            Err(err) => {
                web_sys::console::error_1(&err);
            }
        }
    });

    // Each new backtest payload replaces the series wholesale; toggle state
    // lives in the chart and survives the swap.
    create_effect(move |_| {
        let json = payload_json.get();
        if let (Some(h), Some(json)) = (handle.get(), json) {
            h.set_payload(&json);
        }
    });

    on_cleanup(move || {
        if let Some(h) = handle.get_untracked() {
            h.destroy();
        }
    });

    let return_class = move || {
        if total_return.get().unwrap_or(0.0) >= 0.0 {
            "summary-value positive"
        } else {
            "summary-value negative"
        }
    };

    view! {
        <div class="chart-panel">
            <div class="chart-header">
                <div class="summary-block">
                    <div class="summary-label">"Total Return"</div>
                    <div class=return_class>
                        {move || match total_return.get() {
                            Some(r) => format!("{:.2}%", r * 100.0),
                            None => "--".to_string(),
                        }}
                    </div>
                </div>
                {move || {
                    metrics
                        .get()
                        .map(|m| {
                            view! {
                                <div class="metrics-strip">
                                    <span class="chip">{format!("{} trades", m.total_trades)}</span>
                                    <span class="chip">
                                        {format!("win rate {:.0}%", m.win_rate * 100.0)}
                                    </span>
                                    <span class="chip">
                                        {format!("profit factor {:.2}", m.profit_factor)}
                                    </span>
                                </div>
                            }
                        })
                }}
                <div class="chart-controls">
                    <button
                        class=move || {
                            if sma10_on.get() { "toggle toggle-sma10 active" } else { "toggle" }
                        }
                        on:click=move |_| {
                            if let Some(h) = handle.get() {
                                sma10_on.set(h.toggle_sma10());
                            }
                        }
                    >
                        "SMA 10"
                    </button>
                    <button
                        class=move || {
                            if sma20_on.get() { "toggle toggle-sma20 active" } else { "toggle" }
                        }
                        on:click=move |_| {
                            if let Some(h) = handle.get() {
                                sma20_on.set(h.toggle_sma20());
                            }
                        }
                    >
                        "SMA 20"
                    </button>
                    <button
                        class="toggle"
                        on:click=move |_| {
                            if let Some(h) = handle.get() {
                                h.reset_view();
                            }
                        }
                    >
                        "Reset view"
                    </button>
                </div>
            </div>
            <canvas id="backtest-chart-canvas" class="chart-canvas"></canvas>
            {move || {
                trade_detail
                    .get()
                    .map(|t| {
                        view! {
                            <div class="trade-detail">
                                <div class="trade-detail-title">{t.trade_type.clone()}</div>
                                <div class="trade-detail-row">"Period: " {t.period}</div>
                                <div class="trade-detail-row">
                                    "Price: " {format!("{:.2}", t.price)}
                                </div>
                                <div class="trade-detail-row">
                                    "Return: " {format!("{:.2}%", t.return_pct)}
                                </div>
                                <button on:click=move |_| trade_detail.set(None)>"Close"</button>
                            </div>
                        }
                    })
            }}
        </div>
    }
}
