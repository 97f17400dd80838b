//! The two independently saved configuration groups.

use feederdash_domain::config::ConfigForm;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::state::use_dashboard;

/// A checkbox bound to one boolean field of the form.
#[component]
fn Toggle(
    #[prop(into)] label: String,
    form: RwSignal<ConfigForm>,
    get: fn(&ConfigForm) -> bool,
    set: fn(&mut ConfigForm, bool),
) -> impl IntoView {
    view! {
        <label class="toggle">
            <input
                type="checkbox"
                prop:checked=move || form.with(get)
                on:change=move |ev| {
                    let checked = event_target_checked(&ev);
                    form.update(|form| set(form, checked));
                }
            />
            {label}
        </label>
    }
}

/// A numeric input bound to one text field of the form. The text is kept
/// as typed; it is parsed when the group is saved.
#[component]
fn NumberField(
    #[prop(into)] label: String,
    form: RwSignal<ConfigForm>,
    get: fn(&ConfigForm) -> String,
    set: fn(&mut ConfigForm, String),
) -> impl IntoView {
    view! {
        <label class="number">
            {label}
            <input
                type="number"
                min="1"
                prop:value=move || form.with(get)
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    form.update(|form| set(form, value));
                }
            />
        </label>
    }
}

#[component]
pub fn ScheduleForm() -> impl IntoView {
    let state = use_dashboard();
    let form = state.form;
    let on_save = move |_| {
        let state = state.clone();
        spawn_local(async move { state.save_schedule().await });
    };

    view! {
        <section class="card">
            <h2>"Schedule"</h2>
            <Toggle
                label="Automatic feeding"
                form=form
                get=|form| form.auto_enabled
                set=|form, on| form.auto_enabled = on
            />
            <NumberField
                label="Interval (hours)"
                form=form
                get=|form| form.feeding_interval.clone()
                set=|form, text| form.feeding_interval = text
            />
            <NumberField
                label="Portions per day"
                form=form
                get=|form| form.portions_per_day.clone()
                set=|form, text| form.portions_per_day = text
            />
            <button on:click=on_save>"Save schedule"</button>
        </section>
    }
}

#[component]
pub fn AdvancedForm() -> impl IntoView {
    let state = use_dashboard();
    let form = state.form;
    let on_save = move |_| {
        let state = state.clone();
        spawn_local(async move { state.save_advanced().await });
    };

    view! {
        <section class="card">
            <h2>"Advanced"</h2>
            <Toggle
                label="Require presence"
                form=form
                get=|form| form.require_presence
                set=|form, on| form.require_presence = on
            />
            <Toggle
                label="Sound before meal"
                form=form
                get=|form| form.play_sound
                set=|form, on| form.play_sound = on
            />
            <Toggle
                label="Temperature alerts"
                form=form
                get=|form| form.temp_alerts
                set=|form, on| form.temp_alerts = on
            />
            <Toggle
                label="Humidity alerts"
                form=form
                get=|form| form.humidity_alerts
                set=|form, on| form.humidity_alerts = on
            />
            <button on:click=on_save>"Save advanced"</button>
        </section>
    }
}
