//! # feederdash-dashboard
//!
//! Browser front-end for the pet feeder, rendered client-side with Leptos.
//! It is served by the feeder and talks to it over origin-relative paths.

use leptos::prelude::*;
use leptos_router::{
    components::{Route, Router, Routes},
    path,
};

pub mod api;
mod components;
mod pages;
mod state;

use components::ToastContainer;
use pages::{Dashboard, NotFound};

/// Root application component.
#[component]
pub fn App() -> impl IntoView {
    view! {
        <ToastContainer>
            <Router>
                <main>
                    <Routes fallback=|| view! { <NotFound/> }>
                        <Route path=path!("/") view=Dashboard/>
                    </Routes>
                </main>
            </Router>
        </ToastContainer>
    }
}
