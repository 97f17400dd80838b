//! Camera panel: live frame, placeholder fallback and photo capture.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::state::use_dashboard;

#[component]
pub fn CameraPanel() -> impl IntoView {
    let state = use_dashboard();
    let view = state.view;
    let src = move || view.with(|view| view.camera.src().to_string());

    let on_error = {
        let state = state.clone();
        move |_| state.camera_failed()
    };
    let on_load = {
        let state = state.clone();
        move |_| state.camera_loaded()
    };
    let on_refresh = {
        let state = state.clone();
        move |_| state.refresh_camera()
    };
    let on_capture = move |_| {
        let state = state.clone();
        spawn_local(async move { state.capture_photo().await });
    };

    view! {
        <section class="card camera">
            <h2>"Camera"</h2>
            <img alt="Feeder camera" src=src on:error=on_error on:load=on_load/>
            <div class="actions">
                <button on:click=on_refresh>"Refresh"</button>
                <button on:click=on_capture>"Take photo"</button>
            </div>
        </section>
    }
}
