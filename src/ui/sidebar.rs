//! Side panel: autoconnect, error banner and the hovered node's properties.

use crate::diagram::{DiagramController, PanelLine};
use dioxus::prelude::*;

#[allow(non_snake_case)]
#[component]
pub fn Sidebar(
    controller: Signal<DiagramController>,
    busy: bool,
    on_autoconnect: EventHandler<()>,
) -> Element {
    let mut controller = controller;
    let panel = controller.read().panel();
    let error = controller.read().last_error().map(str::to_string);
    let counts = {
        let ctrl = controller.read();
        (ctrl.canvas().nodes().len(), ctrl.canvas().connections().len())
    };

    rsx! {
        div {
            class: "w-80 flex-shrink-0 flex flex-col glass-strong border-l border-slate-800 z-20",

            div {
                class: "p-8 pb-4",
                h1 {
                    class: "text-2xl font-bold tracking-tight gradient-text-hero",
                    "Connections"
                }
                p {
                    class: "text-xs text-slate-400 font-medium ml-1",
                    "{counts.0} COMPONENTS • {counts.1} LINKS"
                }
            }

            div {
                class: "px-8 py-4",
                button {
                    id: "autoconnect",
                    class: "w-full p-4 rounded-2xl flex items-center justify-center gap-2 transition-all duration-200 border bg-lime-500/10 border-lime-500/50 text-lime-400 hover:bg-lime-500/20 disabled:opacity-50 disabled:cursor-not-allowed",
                    disabled: busy,
                    onclick: move |_| on_autoconnect.call(()),
                    span { class: "text-sm font-bold", "Autoconnect" }
                }
            }

            if let Some(message) = error {
                div {
                    class: "mx-8 p-4 rounded-xl bg-rose-500/10 border border-rose-500/30 space-y-2",
                    p { class: "text-sm text-rose-300 break-words", "{message}" }
                    button {
                        class: "text-xs text-rose-400 hover:text-rose-200",
                        onclick: move |_| controller.write().dismiss_error(),
                        "Dismiss"
                    }
                }
            }

            div {
                id: "properties",
                class: "flex-1 overflow-y-auto px-8 py-4 space-y-1",
                if let Some(panel) = panel {
                    h2 {
                        id: "componentname",
                        class: "text-lg font-bold text-white mb-2 break-words",
                        "{panel.title}"
                    }
                    for line in panel.lines {
                        {panel_line(line)}
                    }
                } else {
                    p {
                        class: "text-sm text-slate-500 italic",
                        "Hover a component to see its properties."
                    }
                }
            }
        }
    }
}

fn panel_line(line: PanelLine) -> Element {
    match line {
        PanelLine::Text(text) => rsx! {
            p { class: "text-xs text-slate-300 break-words", "{text}" }
        },
        PanelLine::Separator => rsx! {
            br {}
        },
    }
}
