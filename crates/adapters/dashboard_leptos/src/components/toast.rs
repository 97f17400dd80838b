//! Single-slot toast: a new message replaces the one on screen.

use feederdash_domain::toast::{TOAST_DURATION, Toast};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Reactive context for showing toasts.
#[derive(Clone, Copy)]
pub struct ToastProvider {
    current: RwSignal<Option<(u32, Toast)>>,
    next_id: RwSignal<u32>,
}

impl ToastProvider {
    fn new() -> Self {
        Self {
            current: RwSignal::new(None),
            next_id: RwSignal::new(0),
        }
    }

    /// Show `toast`, replacing any visible one. It hides after
    /// [`TOAST_DURATION`] unless a newer toast took its place.
    pub fn show(&self, toast: Toast) {
        let id = self.next_id.get_untracked();
        self.next_id.set(id.wrapping_add(1));
        self.current.set(Some((id, toast)));

        let current = self.current;
        let delay = u32::try_from(TOAST_DURATION.as_millis()).unwrap_or(u32::MAX);
        spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(delay).await;
            let still_shown = current
                .with_untracked(|shown| matches!(shown, Some((shown_id, _)) if *shown_id == id));
            if still_shown {
                current.set(None);
            }
        });
    }
}

/// Access the toast provider from Leptos context.
///
/// Must be called within a component tree that has a [`ToastContainer`] ancestor.
pub fn use_toasts() -> ToastProvider {
    use_context::<ToastProvider>().expect("ToastProvider not found in context")
}

/// Provides toast context and renders the toast slot.
#[component]
pub fn ToastContainer(children: Children) -> impl IntoView {
    let provider = ToastProvider::new();
    provide_context(provider);
    let current = provider.current;

    view! {
        {children()}
        {move || {
            current
                .get()
                .map(|(_, toast)| {
                    view! { <div class=toast.css_class()>{toast.text}</div> }
                })
        }}
    }
}
