use leptos::*;

#[cfg(target_arch = "wasm32")]
use crate::state::{use_app_ctx, use_backtest_ctx};
#[cfg(target_arch = "wasm32")]
use futures_util::stream::SplitSink;
#[cfg(target_arch = "wasm32")]
use futures_util::{SinkExt, StreamExt};
#[cfg(target_arch = "wasm32")]
use gloo_net::websocket::{futures::WebSocket, Message as WsMessage};
#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen_futures::spawn_local;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
    /// Connection/transport notices rendered inline in the transcript.
    Notice,
}

impl Role {
    pub fn css_class(&self) -> &'static str {
        match self {
            Role::User => "msg msg-user",
            Role::Assistant => "msg msg-assistant",
            Role::Notice => "msg msg-notice",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub id: u32,
    pub role: Role,
    pub body: String,
}

/// Pull the last fenced code block out of an assistant reply. The opening
/// fence may carry an info string ("```python"); it is not part of the
/// script.
pub fn extract_code_block(text: &str) -> Option<String> {
    let mut blocks = Vec::new();
    let mut current: Option<String> = None;
    for line in text.lines() {
        if line.trim_start().starts_with("```") {
            match current.take() {
                Some(block) => blocks.push(block),
                None => current = Some(String::new()),
            }
            continue;
        }
        if let Some(block) = current.as_mut() {
            block.push_str(line);
            block.push('\n');
        }
    }
    blocks.pop().map(|b| b.trim_end().to_string())
}

#[cfg(target_arch = "wasm32")]
fn push_message(
    messages: RwSignal<Vec<ChatMessage>>,
    next_id: RwSignal<u32>,
    role: Role,
    body: String,
) {
    let id = next_id.get_untracked();
    next_id.set(id + 1);
    messages.update(|m| m.push(ChatMessage { id, role, body }));
}

#[cfg(target_arch = "wasm32")]
type WsSink = Rc<RefCell<Option<SplitSink<WebSocket, WsMessage>>>>;

/// Strategy chat over the real-time channel. Assistant replies that carry a
/// code block become the current script for the backtest controls.
#[cfg(target_arch = "wasm32")]
#[component]
pub fn ChatPanel() -> impl IntoView {
    let app_ctx = use_app_ctx();
    let backtest = use_backtest_ctx();

    let messages = create_rw_signal::<Vec<ChatMessage>>(Vec::new());
    let next_id = create_rw_signal(0u32);
    let draft = create_rw_signal(String::new());
    let connected = create_rw_signal(false);

    let sink: WsSink = Rc::new(RefCell::new(None));

    {
        let sink = sink.clone();
        let ws_base = app_ctx.ws_base.get_untracked();
        let script = backtest.script;
        spawn_local(async move {
            let ws = match WebSocket::open(&ws_base) {
                Ok(ws) => ws,
                Err(err) => {
                    push_message(
                        messages,
                        next_id,
                        Role::Notice,
                        format!("Channel unavailable: {err}"),
                    );
                    return;
                }
            };
            let (write, mut read) = ws.split();
            *sink.borrow_mut() = Some(write);
            connected.set(true);

            while let Some(msg) = read.next().await {
                match msg {
                    Ok(WsMessage::Text(text)) => {
                        if let Some(code) = extract_code_block(&text) {
                            script.set(Some(code));
                        }
                        push_message(messages, next_id, Role::Assistant, text);
                    }
                    Ok(WsMessage::Bytes(_)) => {}
                    Err(err) => {
                        push_message(
                            messages,
                            next_id,
                            Role::Notice,
                            format!("Channel error: {err}"),
                        );
                        break;
                    }
                }
            }
            connected.set(false);
            sink.borrow_mut().take();
        });
    }

    let send = {
        let sink = sink.clone();
        move || {
            let text = draft.get_untracked();
            if text.trim().is_empty() {
                return;
            }
            draft.set(String::new());
            push_message(messages, next_id, Role::User, text.clone());

            // Take the sink for the duration of the send so a slow socket
            // cannot be borrowed twice.
            let sink = sink.clone();
            spawn_local(async move {
                let taken = sink.borrow_mut().take();
                match taken {
                    Some(mut write) => {
                        if write.send(WsMessage::Text(text)).await.is_ok() {
                            *sink.borrow_mut() = Some(write);
                        } else {
                            connected.set(false);
                            push_message(
                                messages,
                                next_id,
                                Role::Notice,
                                "Channel closed while sending; message not delivered".into(),
                            );
                        }
                    }
                    None => {
                        push_message(
                            messages,
                            next_id,
                            Role::Notice,
                            "Not connected to the strategy channel".into(),
                        );
                    }
                }
            });
        }
    };

    let send_click = send.clone();

    view! {
        <div class="chat-panel">
            <div class="chat-header">
                <span class="section-label">Strategy chat</span>
                <span class=move || {
                    if connected.get() { "chip status-good" } else { "chip status-muted" }
                }>
                    {move || if connected.get() { "online" } else { "offline" }}
                </span>
            </div>
            <div class="chat-messages">
                {move || {
                    messages
                        .get()
                        .into_iter()
                        .map(|m| {
                            let class = m.role.css_class();
                            let is_code = extract_code_block(&m.body).is_some();
                            view! {
                                <div class=class>
                                    {if is_code {
                                        view! { <pre class="code-block">{m.body.clone()}</pre> }
                                            .into_view()
                                    } else {
                                        view! { <span>{m.body.clone()}</span> }.into_view()
                                    }}
                                </div>
                            }
                        })
                        .collect_view()
                }}
            </div>
            <div class="chat-input-row">
                <input
                    type="text"
                    placeholder="Describe your trading strategy..."
                    prop:value=move || draft.get()
                    on:input=move |ev| draft.set(event_target_value(&ev))
                    on:keydown=move |ev| {
                        if ev.key() == "Enter" {
                            send();
                        }
                    }
                />
                <button on:click=move |_| send_click()>Send</button>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_the_last_fenced_block() {
        let text = "Here you go:\n```python\nscore_5 = 1\n```\nand a fix:\n```python\nscore_5 = -1\n```";
        assert_eq!(extract_code_block(text).unwrap(), "score_5 = -1");
    }

    #[test]
    fn info_string_is_not_part_of_the_script() {
        let text = "```python\nx = 1\ny = 2\n```";
        assert_eq!(extract_code_block(text).unwrap(), "x = 1\ny = 2");
    }

    #[test]
    fn prose_without_fences_yields_nothing() {
        assert_eq!(extract_code_block("could you clarify the strategy?"), None);
        assert_eq!(extract_code_block(""), None);
    }

    #[test]
    fn unterminated_fence_is_ignored() {
        assert_eq!(extract_code_block("```python\nx = 1"), None);
    }
}
