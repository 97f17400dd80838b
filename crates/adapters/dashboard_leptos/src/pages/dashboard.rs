use feederdash_domain::command::Command;
use feederdash_domain::view::DashboardView;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::{
    AdvancedForm, CameraPanel, ConnectionIndicator, ScheduleForm, StatCard, use_toasts,
};
use crate::state::{DashboardState, use_dashboard};

fn field(view: RwSignal<DashboardView>, read: fn(&DashboardView) -> &String) -> Signal<String> {
    Signal::derive(move || view.with(|view| read(view).clone()))
}

#[component]
fn CommandButton(
    #[prop(into)] label: String,
    command: Command,
    enabled: Signal<bool>,
) -> impl IntoView {
    let state = use_dashboard();
    let on_click = move |_| {
        let state = state.clone();
        spawn_local(async move { state.run_command(command).await });
    };

    view! {
        <button disabled=move || !enabled.get() on:click=on_click>
            {label}
        </button>
    }
}

#[component]
fn FeedingCard() -> impl IntoView {
    let view = use_dashboard().view;
    let width = move || view.with(|view| view.progress_width.clone());

    view! {
        <section class="card">
            <h2>"Feeding"</h2>
            <StatCard label="State" value=field(view, |v| &v.feeding_state)/>
            <StatCard label="Compartment" value=field(view, |v| &v.compartment)/>
            <div class="progress">
                <div class="progress-fill" style:width=width></div>
            </div>
            <span class="progress-text">
                {move || view.with(|view| view.progress_text.clone())}
            </span>
            <div class="actions">
                <CommandButton
                    label="Feed now"
                    command=Command::FeedNow
                    enabled=Signal::derive(move || view.with(|view| view.feed_now_enabled))
                />
                <CommandButton
                    label="Cancel"
                    command=Command::CancelFeeding
                    enabled=Signal::derive(move || view.with(|view| view.cancel_enabled))
                />
            </div>
        </section>
    }
}

#[component]
fn SensorsCard() -> impl IntoView {
    let view = use_dashboard().view;

    view! {
        <section class="card">
            <h2>"Sensors"</h2>
            <StatCard label="Temperature" value=field(view, |v| &v.temperature)/>
            <StatCard label="Humidity" value=field(view, |v| &v.humidity)/>
            <StatCard label="Presence" value=field(view, |v| &v.presence)/>
        </section>
    }
}

#[component]
fn ScheduleCard() -> impl IntoView {
    let view = use_dashboard().view;

    view! {
        <section class="card">
            <h2>"Today"</h2>
            <StatCard label="Next feeding" value=field(view, |v| &v.next_feeding)/>
            <StatCard label="Feedings" value=field(view, |v| &v.feedings_today)/>
            <CommandButton
                label="Reset counter"
                command=Command::ResetDaily
                enabled=Signal::from(true)
            />
        </section>
    }
}

#[component]
fn SystemCard() -> impl IntoView {
    let view = use_dashboard().view;

    view! {
        <section class="card">
            <h2>"System"</h2>
            <StatCard label="WiFi" value=field(view, |v| &v.wifi)/>
            <StatCard label="Free heap" value=field(view, |v| &v.free_heap)/>
            <StatCard label="Uptime" value=field(view, |v| &v.uptime)/>
            <CommandButton label="Reboot" command=Command::Reboot enabled=Signal::from(true)/>
        </section>
    }
}

/// The single page of the dashboard.
///
/// Owns the [`DashboardState`]: starts polling, loads the configuration and
/// the first camera frame on mount, and stops polling when unmounted.
#[component]
pub fn Dashboard() -> impl IntoView {
    let state = DashboardState::new(use_toasts());
    provide_context(state.clone());

    state.start_polling();
    state.refresh_camera();
    {
        let state = state.clone();
        spawn_local(async move { state.load_configuration().await });
    }
    on_cleanup({
        let state = state.clone();
        move || state.stop_polling()
    });

    let view = state.view;

    view! {
        <header>
            <h1>"Pet feeder"</h1>
            <ConnectionIndicator/>
        </header>
        <div class="grid">
            <FeedingCard/>
            <SensorsCard/>
            <ScheduleCard/>
            <SystemCard/>
            <CameraPanel/>
            <ScheduleForm/>
            <AdvancedForm/>
        </div>
        <footer>
            "Last update: "
            {move || view.with(|view| view.last_update.clone())}
        </footer>
    }
}
