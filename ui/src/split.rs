use leptos::ev;
use leptos::*;

/// Drag handle between the chat and chart panes. Updates the ratio signal
/// while the pointer is down; nothing is persisted.
#[component]
pub fn SplitDivider(ratio: RwSignal<f64>, container: NodeRef<html::Div>) -> impl IntoView {
    let dragging = create_rw_signal(false);

    let move_handle = window_event_listener(ev::mousemove, move |ev| {
        if !dragging.get_untracked() {
            return;
        }
        if let Some(el) = container.get_untracked() {
            let rect = el.get_bounding_client_rect();
            if rect.width() > 0.0 {
                let rel = (ev.client_x() as f64 - rect.left()) / rect.width();
                ratio.set(rel.clamp(0.2, 0.8));
            }
        }
    });
    let up_handle = window_event_listener(ev::mouseup, move |_| {
        dragging.set(false);
    });
    on_cleanup(move || {
        move_handle.remove();
        up_handle.remove();
    });

    view! {
        <div
            class="split-divider"
            on:mousedown=move |ev| {
                ev.prevent_default();
                dragging.set(true);
            }
        ></div>
    }
}
