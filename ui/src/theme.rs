pub const GLOBAL_CSS: &str = r#"
:root {
  --bg: #05090f;
  --bg-elev-1: #0b111a;
  --panel: #0d1520;
  --border: rgba(255, 255, 255, 0.08);
  --border-strong: rgba(255, 255, 255, 0.16);
  --text: #e6edf7;
  --text-dim: #b7c6d9;
  --text-muted: #7f8ba0;
  --accent: #5cb0ff;
  --positive: #22c55e;
  --negative: #ef4444;
  --warning: #f7c843;
  --sma10: #3b82f6;
  --sma20: #eab308;
  --radius: 10px;
  --space-1: 4px;
  --space-2: 8px;
  --space-3: 12px;
  --space-4: 16px;
  --font-body: "Inter", "SF Pro Text", system-ui, -apple-system, sans-serif;
  --font-mono: "JetBrains Mono", "SFMono-Regular", ui-monospace, monospace;
}

* { box-sizing: border-box; }
html, body {
  padding: 0;
  margin: 0;
  height: 100%;
  background: var(--bg);
  color: var(--text);
  font-family: var(--font-body);
  font-size: 14px;
}

.app-root {
  display: flex;
  flex-direction: column;
  height: 100vh;
}

.app-header {
  display: flex;
  align-items: center;
  gap: var(--space-3);
  padding: var(--space-2) var(--space-4);
  border-bottom: 1px solid var(--border);
  background: var(--bg-elev-1);
}
.app-title {
  font-weight: 600;
  letter-spacing: 0.02em;
}
.app-header .spacer { flex: 1; }
.app-header select {
  background: var(--panel);
  color: var(--text);
  border: 1px solid var(--border-strong);
  border-radius: var(--radius);
  padding: 4px 8px;
}

.status-note {
  color: var(--text-muted);
  font-size: 12px;
  max-width: 380px;
  overflow: hidden;
  text-overflow: ellipsis;
  white-space: nowrap;
}

.chip {
  border: 1px solid var(--border-strong);
  border-radius: 999px;
  padding: 2px 10px;
  font-size: 12px;
  color: var(--text-dim);
}
.status-good { color: var(--positive); border-color: var(--positive); }
.status-warn { color: var(--warning); border-color: var(--warning); }
.status-bad { color: var(--negative); border-color: var(--negative); }
.status-muted { color: var(--text-muted); }

button {
  background: var(--panel);
  color: var(--text);
  border: 1px solid var(--border-strong);
  border-radius: var(--radius);
  padding: 6px 12px;
  cursor: pointer;
}
button:hover { border-color: var(--accent); }
button.primary { background: var(--accent); color: #04121f; border: none; }

.split-container {
  display: flex;
  flex: 1;
  min-height: 0;
}
.split-divider {
  width: 6px;
  cursor: col-resize;
  background: var(--border);
}
.split-divider:hover { background: var(--accent); }

.chat-pane {
  display: flex;
  min-width: 0;
}
.chat-panel {
  display: flex;
  flex-direction: column;
  flex: 1;
  min-width: 0;
  border-right: 1px solid var(--border);
}
.chat-header {
  display: flex;
  align-items: center;
  justify-content: space-between;
  padding: var(--space-2) var(--space-3);
  border-bottom: 1px solid var(--border);
}
.section-label {
  font-size: 12px;
  text-transform: uppercase;
  letter-spacing: 0.08em;
  color: var(--text-muted);
}
.chat-messages {
  flex: 1;
  overflow-y: auto;
  padding: var(--space-3);
  display: flex;
  flex-direction: column;
  gap: var(--space-2);
}
.msg {
  border-radius: var(--radius);
  padding: var(--space-2) var(--space-3);
  max-width: 92%;
  white-space: pre-wrap;
  word-break: break-word;
}
.msg-user {
  align-self: flex-end;
  background: #14304a;
}
.msg-assistant {
  align-self: flex-start;
  background: var(--panel);
  border: 1px solid var(--border);
}
.msg-notice {
  align-self: center;
  color: var(--warning);
  font-size: 12px;
}
.code-block {
  margin: 0;
  font-family: var(--font-mono);
  font-size: 12px;
  overflow-x: auto;
}
.chat-input-row {
  display: flex;
  gap: var(--space-2);
  padding: var(--space-2) var(--space-3);
  border-top: 1px solid var(--border);
}
.chat-input-row input {
  flex: 1;
  background: var(--bg);
  color: var(--text);
  border: 1px solid var(--border-strong);
  border-radius: var(--radius);
  padding: 8px 10px;
}

.chart-panel {
  display: flex;
  flex-direction: column;
  flex: 1;
  min-width: 0;
  position: relative;
}
.chart-header {
  display: flex;
  align-items: center;
  gap: var(--space-4);
  padding: var(--space-2) var(--space-3);
  border-bottom: 1px solid var(--border);
  background: var(--bg-elev-1);
  flex-wrap: wrap;
}
.summary-label {
  font-size: 12px;
  color: var(--text-muted);
}
.summary-value {
  font-size: 22px;
  font-weight: 700;
}
.summary-value.positive { color: var(--positive); }
.summary-value.negative { color: var(--negative); }
.metrics-strip {
  display: flex;
  gap: var(--space-2);
}
.chart-controls {
  display: flex;
  gap: var(--space-2);
  margin-left: auto;
}
.toggle { opacity: 0.6; }
.toggle.active { opacity: 1.0; }
.toggle-sma10.active { border-color: var(--sma10); color: var(--sma10); }
.toggle-sma20.active { border-color: var(--sma20); color: var(--sma20); }

.chart-canvas {
  flex: 1;
  width: 100%;
  min-height: 0;
  display: block;
}

.trade-detail {
  position: absolute;
  right: var(--space-3);
  bottom: var(--space-3);
  background: var(--panel);
  border: 1px solid var(--border-strong);
  border-radius: var(--radius);
  padding: var(--space-3);
  display: flex;
  flex-direction: column;
  gap: var(--space-1);
  min-width: 180px;
}
.trade-detail-title {
  font-weight: 600;
  margin-bottom: var(--space-1);
}
.trade-detail-row {
  font-size: 13px;
  color: var(--text-dim);
}
"#;
