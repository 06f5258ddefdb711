use leptos::*;
use leptos_meta::*;

#[cfg(target_arch = "wasm32")]
use crate::backtest::{run_backtest, submit_script, RunStatus};
#[cfg(target_arch = "wasm32")]
use crate::theme::GLOBAL_CSS;
#[cfg(target_arch = "wasm32")]
use crate::chart::ChartPanel;
#[cfg(target_arch = "wasm32")]
use crate::chat::ChatPanel;
#[cfg(target_arch = "wasm32")]
use crate::split::SplitDivider;
#[cfg(target_arch = "wasm32")]
use crate::state::{provide_app_ctx, provide_backtest_ctx};
#[cfg(target_arch = "wasm32")]
use backtest_core::normalize;
#[cfg(target_arch = "wasm32")]
use js_sys::Reflect;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen_futures::spawn_local;

#[cfg(target_arch = "wasm32")]
fn read_global(key: &str) -> Option<String> {
    Reflect::get(&js_sys::global(), &JsValue::from_str(key))
        .ok()
        .and_then(|v| v.as_string())
}

fn api_base_default() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        read_global("STRATLAB_API_BASE").unwrap_or_else(|| "http://localhost:5000/api".to_string())
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        "/api".to_string()
    }
}

fn ws_base_default() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        read_global("STRATLAB_WS_BASE").unwrap_or_else(|| "ws://localhost:5000/api/ws".to_string())
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        "/api/ws".to_string()
    }
}

#[cfg(target_arch = "wasm32")]
const ASSETS: &[&str] = &["BTC-USD", "ETH-USD", "SPY", "AAPL"];

#[cfg(not(target_arch = "wasm32"))]
#[component]
pub fn App() -> impl IntoView {
    let _ = (api_base_default(), ws_base_default());
    view! { <div>"UI available in browser build."</div> }
}

#[cfg(target_arch = "wasm32")]
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let app_ctx = provide_app_ctx(api_base_default(), ws_base_default());
    let backtest = provide_backtest_ctx();

    let api_base = app_ctx.api_base;
    let status = backtest.status;
    let status_note = backtest.status_note;
    let script = backtest.script;
    let asset = backtest.asset;
    let payload_json = backtest.payload_json;
    let total_return = backtest.total_return;
    let metrics = backtest.metrics;

    let run = move || {
        let Some(script_body) = script.get_untracked() else {
            status.set(RunStatus::Failed);
            status_note.set("No strategy script yet - ask the assistant for one".into());
            return;
        };
        let api = api_base.get_untracked();
        let asset_name = asset.get_untracked();
        status.set(RunStatus::Running);
        status_note.set(format!("Backtesting {asset_name}..."));
        spawn_local(async move {
            match run_backtest(&api, &script_body, &asset_name).await {
                Ok(result) => {
                    let points = normalize(&result.payload);
                    let trades = points.iter().filter(|p| p.trade.is_some()).count();
                    total_return.set(result.payload.total_return);
                    metrics.set(result.payload.metrics);
                    payload_json.set(Some(result.raw_json));
                    status.set(RunStatus::Completed);
                    status_note.set(format!(
                        "Backtest complete ({} bars, {} trades)",
                        points.len(),
                        trades
                    ));
                }
                Err(err) => {
                    status.set(RunStatus::Failed);
                    status_note.set(err.to_string());
                }
            }
        });
    };

    let submit = move |_| {
        let Some(script_body) = script.get_untracked() else {
            status_note.set("Nothing to submit yet".into());
            return;
        };
        let api = api_base.get_untracked();
        let asset_name = asset.get_untracked();
        status_note.set("Submitting strategy...".into());
        spawn_local(async move {
            match submit_script(&api, &script_body, &asset_name).await {
                Ok(()) => status_note.set("Strategy submitted".into()),
                Err(err) => status_note.set(err.to_string()),
            }
        });
    };

    let split_ratio = create_rw_signal(0.42);
    let container = create_node_ref::<html::Div>();

    view! {
        <Style>{GLOBAL_CSS}</Style>
        <Title text="Strategy Lab"/>
        <div class="app-root">
            <div class="app-header">
                <span class="app-title">"Strategy Lab"</span>
                <span class=move || format!("chip {}", status.get().tone_class())>
                    {move || status.get().label()}
                </span>
                <span class="status-note">{move || status_note.get()}</span>
                <div class="spacer"></div>
                // Switching assets re-runs the current script against the
                // new series.
                <select on:change=move |ev| {
                    asset.set(event_target_value(&ev));
                    if script.get_untracked().is_some() {
                        run();
                    }
                }>
                    {ASSETS
                        .iter()
                        .map(|a| {
                            view! {
                                <option value={*a} selected=move || asset.get() == *a>
                                    {*a}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
                <button
                    class="primary"
                    disabled=move || script.get().is_none()
                    on:click=move |_| run()
                >
                    "Run backtest"
                </button>
                <button disabled=move || script.get().is_none() on:click=submit>
                    "Submit"
                </button>
            </div>
            <div class="split-container" node_ref=container>
                <div
                    class="chat-pane"
                    style=move || format!("width: {:.2}%;", split_ratio.get() * 100.0)
                >
                    <ChatPanel/>
                </div>
                <SplitDivider ratio=split_ratio container=container/>
                <ChartPanel/>
            </div>
        </div>
    }
}
