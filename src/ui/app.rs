//! Main application entry point for the UI.

use crate::diagram::DiagramController;
use crate::io::{autoconnect_and_reload, fetch_diagram};
use crate::state::AppState;
use dioxus::prelude::*;
use std::sync::Arc;
use tracing::{error, info};

use super::diagram::DiagramView;
use super::sidebar::Sidebar;

/// Progress of the snapshot load.
#[derive(Debug, Clone, PartialEq)]
enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

#[allow(non_snake_case)]
pub fn App() -> Element {
    let state_arc = use_context::<Arc<AppState>>();

    let mut controller = use_signal(DiagramController::new);
    let mut load_state = use_signal(|| LoadState::Loading);
    // Bumped to throw the diagram away and load it again.
    let mut generation = use_signal(|| 0u32);
    let mut autoconnecting = use_signal(|| false);

    let state_load = state_arc.clone();
    use_effect(move || {
        let generation = generation();
        let state = state_load.clone();
        load_state.set(LoadState::Loading);
        spawn(async move {
            info!("Loading connection state (generation {})", generation);
            match fetch_diagram(state.backend()).await {
                Ok((fresh, _report)) => {
                    controller.set(fresh);
                    load_state.set(LoadState::Ready);
                }
                Err(e) => {
                    error!("Failed to load connection state: {}", e);
                    load_state.set(LoadState::Failed(e.to_string()));
                }
            }
        });
    });

    // Apply what the backend made of each connect/disconnect.
    let state_sync = state_arc.clone();
    use_future(move || {
        let state = state_sync.clone();
        async move {
            let Some(mut outcomes) = state.take_sync_outcomes() else {
                return;
            };
            while let Some(outcome) = outcomes.recv().await {
                controller.write().reconcile(&outcome);
            }
        }
    });

    let state_auto = state_arc.clone();
    let on_autoconnect = move |_: ()| {
        let state = state_auto.clone();
        autoconnecting.set(true);
        spawn(async move {
            match autoconnect_and_reload(state.backend()).await {
                Ok((fresh, _report)) => {
                    controller.set(fresh);
                    load_state.set(LoadState::Ready);
                }
                Err(e) => {
                    error!("Autoconnect failed: {}", e);
                    controller.write().report_error(format!("Autoconnect failed: {}", e));
                }
            }
            autoconnecting.set(false);
        });
    };

    let busy = autoconnecting() || load_state() == LoadState::Loading;

    let content = match load_state() {
        LoadState::Loading => rsx! {
            div {
                class: "h-full flex flex-col items-center justify-center text-slate-400",
                div { class: "text-4xl mb-6 animate-pulse", "⏳" }
                h3 { class: "text-lg font-medium text-slate-200", "Loading connections..." }
            }
        },
        LoadState::Failed(message) => rsx! {
            div {
                class: "h-full flex flex-col items-center justify-center text-slate-400",
                h3 { class: "text-lg font-medium text-rose-300 mb-2", "Could not load the connection state" }
                p { class: "text-sm max-w-md text-center text-slate-400 mb-6 break-words", "{message}" }
                button {
                    class: "px-4 py-2 rounded-xl bg-slate-800 border border-slate-700 text-slate-200 hover:bg-slate-700",
                    onclick: move |_| generation += 1,
                    "Retry"
                }
            }
        },
        LoadState::Ready => rsx! {
            DiagramView { controller }
        },
    };

    rsx! {
        document::Stylesheet { href: asset!("/assets/custom.css") }
        script { src: "https://cdn.tailwindcss.com" }

        div {
            class: "flex h-screen w-full bg-slate-900 text-slate-100 font-sans overflow-hidden selection:bg-lime-500 selection:text-white",

            div {
                class: "flex-1 relative overflow-hidden",
                {content}
            }

            Sidebar {
                controller,
                busy,
                on_autoconnect,
            }
        }
    }
}
