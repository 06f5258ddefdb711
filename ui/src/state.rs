use backtest_core::BacktestMetrics;
use leptos::*;

use crate::backtest::RunStatus;

/// Endpoint configuration shared through context.
#[derive(Clone)]
pub struct AppCtx {
    pub api_base: RwSignal<String>,
    pub ws_base: RwSignal<String>,
}

/// Everything downstream of a backtest response: the raw payload JSON for
/// the chart, the summary figures for the header, and run status for the
/// controls. A new response replaces all of it at once.
#[derive(Clone)]
pub struct BacktestCtx {
    pub payload_json: RwSignal<Option<String>>,
    pub total_return: RwSignal<Option<f64>>,
    pub metrics: RwSignal<Option<BacktestMetrics>>,
    pub status: RwSignal<RunStatus>,
    pub status_note: RwSignal<String>,
    /// Latest strategy script extracted from the conversation.
    pub script: RwSignal<Option<String>>,
    pub asset: RwSignal<String>,
}

pub fn provide_app_ctx(api_base: String, ws_base: String) -> AppCtx {
    let ctx = AppCtx {
        api_base: create_rw_signal(api_base),
        ws_base: create_rw_signal(ws_base),
    };
    provide_context(ctx.clone());
    ctx
}

pub fn provide_backtest_ctx() -> BacktestCtx {
    let ctx = BacktestCtx {
        payload_json: create_rw_signal(None),
        total_return: create_rw_signal(None),
        metrics: create_rw_signal(None),
        status: create_rw_signal(RunStatus::Idle),
        status_note: create_rw_signal(String::new()),
        script: create_rw_signal(None),
        asset: create_rw_signal("BTC-USD".to_string()),
    };
    provide_context(ctx.clone());
    ctx
}

pub fn use_app_ctx() -> AppCtx {
    use_context::<AppCtx>().expect("AppCtx not provided")
}

pub fn use_backtest_ctx() -> BacktestCtx {
    use_context::<BacktestCtx>().expect("BacktestCtx not provided")
}
