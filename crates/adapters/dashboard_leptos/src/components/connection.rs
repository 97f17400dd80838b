use leptos::prelude::*;

use crate::state::use_dashboard;

/// Dot and label reflecting the last poll.
#[component]
pub fn ConnectionIndicator() -> impl IntoView {
    let view = use_dashboard().view;
    let state = move || view.with(|view| view.connection);

    view! {
        <div class="connection">
            <span class=move || state().css_class()></span>
            <span class="connection-label">{move || state().label()}</span>
        </div>
    }
}
