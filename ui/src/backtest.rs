use thiserror::Error;

#[cfg(target_arch = "wasm32")]
use backtest_core::RawSeriesPayload;
#[cfg(target_arch = "wasm32")]
use gloo_net::http::Request;
#[cfg(target_arch = "wasm32")]
use serde::Serialize;

/// Lifecycle of the current backtest request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    Idle,
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RunStatus::Idle => "Idle",
            RunStatus::Running => "Running",
            RunStatus::Completed => "Completed",
            RunStatus::Failed => "Failed",
        }
    }

    pub fn tone_class(&self) -> &'static str {
        match self {
            RunStatus::Idle => "status-muted",
            RunStatus::Running => "status-warn",
            RunStatus::Completed => "status-good",
            RunStatus::Failed => "status-bad",
        }
    }
}

/// Transport-level failures surfaced to the user as a message string. The
/// chart never sees these; it only receives a payload or nothing.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("request error: {0}")]
    Request(String),
    #[error("backtest service returned status {0}")]
    Status(u16),
    #[error("malformed backtest response: {0}")]
    Decode(String),
}

/// A successful backtest response: the decoded payload for summary figures
/// plus the raw JSON handed verbatim to the chart handle.
#[cfg(target_arch = "wasm32")]
pub struct BacktestRun {
    pub payload: RawSeriesPayload,
    pub raw_json: String,
}

#[cfg(target_arch = "wasm32")]
#[derive(Serialize)]
struct ScriptPayload<'a> {
    script: &'a str,
    asset: &'a str,
}

#[cfg(target_arch = "wasm32")]
pub async fn run_backtest(
    api_base: &str,
    script: &str,
    asset: &str,
) -> Result<BacktestRun, SubmitError> {
    let url = format!("{}/backtest", api_base.trim_end_matches('/'));
    let request = Request::post(&url)
        .json(&ScriptPayload { script, asset })
        .map_err(|e| SubmitError::Request(e.to_string()))?;
    let response = request
        .send()
        .await
        .map_err(|e| SubmitError::Request(e.to_string()))?;
    if !response.ok() {
        return Err(SubmitError::Status(response.status()));
    }
    let raw_json = response
        .text()
        .await
        .map_err(|e| SubmitError::Request(e.to_string()))?;
    let payload =
        RawSeriesPayload::from_json(&raw_json).map_err(|e| SubmitError::Decode(e.to_string()))?;
    Ok(BacktestRun { payload, raw_json })
}

/// Publish the script to the platform. Fire-and-report; no payload comes
/// back from this endpoint.
#[cfg(target_arch = "wasm32")]
pub async fn submit_script(api_base: &str, script: &str, asset: &str) -> Result<(), SubmitError> {
    let url = format!("{}/submit", api_base.trim_end_matches('/'));
    let request = Request::post(&url)
        .json(&ScriptPayload { script, asset })
        .map_err(|e| SubmitError::Request(e.to_string()))?;
    let response = request
        .send()
        .await
        .map_err(|e| SubmitError::Request(e.to_string()))?;
    if !response.ok() {
        return Err(SubmitError::Status(response.status()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_and_tones() {
        assert_eq!(RunStatus::Running.label(), "Running");
        assert_eq!(RunStatus::Failed.tone_class(), "status-bad");
        assert_eq!(RunStatus::Idle.tone_class(), "status-muted");
    }

    #[test]
    fn submit_error_messages_read_as_status_lines() {
        assert_eq!(
            SubmitError::Status(502).to_string(),
            "backtest service returned status 502"
        );
        assert!(SubmitError::Request("timeout".into())
            .to_string()
            .contains("timeout"));
    }
}
