//! The diagram canvas: nodes, port handles and the links between them.

use crate::diagram::layout::{self, NODE_HEIGHT, NODE_WIDTH, Point};
use crate::diagram::{CONNECTOR_STYLE, DiagramController, HANDLE_STYLE, NodeView};
use crate::model::{ConnectionPair, PortKey};
use crate::state::AppState;
use dioxus::prelude::*;
use std::sync::Arc;
use tracing::{debug, warn};

/// What is drawn for one port handle.
#[derive(Clone, Debug, PartialEq)]
struct HandleView {
    key: PortKey,
    label: String,
    center: Point,
    stroke: &'static str,
    interactive: bool,
}

/// Pointer gesture in progress on the canvas.
#[derive(Clone, Debug, Default, PartialEq)]
struct Gesture {
    /// Node being moved and the pointer position it was last moved to.
    node: Option<(String, Point)>,
    /// Pointer position while a link is being dragged.
    link: Option<Point>,
}

impl Gesture {
    fn grab_node(&mut self, id: String, at: Point) {
        self.node = Some((id, at));
    }

    fn start_link(&mut self, at: Point) {
        self.link = Some(at);
    }

    /// Follows the pointer. Returns the node to move and by how much.
    fn move_to(&mut self, p: Point) -> Option<(String, f64, f64)> {
        if self.link.is_some() {
            self.link = Some(p);
        }
        let (id, last) = self.node.as_mut()?;
        let delta = (id.clone(), p.x - last.x, p.y - last.y);
        *last = p;
        Some(delta)
    }

    /// The button went up, wherever that happened.
    fn release(&mut self) {
        self.node = None;
        self.link = None;
    }
}

#[allow(non_snake_case)]
#[component]
pub fn DiagramView(controller: Signal<DiagramController>) -> Element {
    let mut controller = controller;
    let state_arc = use_context::<Arc<AppState>>();

    let mut gesture = use_signal(Gesture::default);

    let (nodes, handles, links, pending) = {
        let ctrl = controller.read();
        let canvas = ctrl.canvas();

        let nodes: Vec<NodeView> = canvas.nodes().to_vec();
        let handles: Vec<HandleView> = canvas
            .handles()
            .iter()
            .filter_map(|h| {
                let (center, _) = canvas.anchor_of(&h.key)?;
                Some(HandleView {
                    key: h.key.clone(),
                    label: h.label.clone(),
                    center,
                    stroke: h.stroke(),
                    interactive: h.is_interactive(),
                })
            })
            .collect();
        let links: Vec<(ConnectionPair, String)> = canvas
            .connections()
            .iter()
            .filter_map(|c| canvas.connection_path(c).map(|d| (c.clone(), d)))
            .collect();
        let pending = ctrl
            .active_drag()
            .and_then(|drag| canvas.anchor_of(drag.source()))
            .zip(gesture.read().link)
            .map(|((from, face), to)| layout::pending_path(from, face, to));

        (nodes, handles, links, pending)
    };

    let mut finish_gesture = move || {
        gesture.write().release();
        if controller.read().active_drag().is_some() {
            controller.write().on_drag_stop();
        }
    };

    let link_stroke = CONNECTOR_STYLE.stroke;
    let link_width = CONNECTOR_STYLE.line_width;

    rsx! {
        div {
            id: "graph",
            class: "absolute inset-0 overflow-hidden select-none",
            onmousemove: move |e| {
                let p = e.page_coordinates();
                let p = Point::new(p.x, p.y);
                let moved = gesture.write().move_to(p);
                if let Some((id, dx, dy)) = moved {
                    controller.write().move_node(&id, dx, dy);
                }
            },
            onmouseup: move |_| finish_gesture(),
            onmouseleave: move |_| finish_gesture(),

            svg {
                style: "position: absolute; top: 0; left: 0; width: 100%; height: 100%; pointer-events: none;",
                for (pair, d) in links {
                    path {
                        key: "{pair}",
                        d: "{d}",
                        fill: "none",
                        stroke: "{link_stroke}",
                        stroke_width: "{link_width}",
                        style: "pointer-events: stroke; cursor: pointer;",
                        onclick: {
                            let sync = state_arc.sync.clone();
                            let pair = pair.clone();
                            move |e: MouseEvent| {
                                e.stop_propagation();
                                let detached = controller
                                    .write()
                                    .on_connection_detached(&pair.source, Some(&pair.target));
                                if let Some(command) = detached {
                                    sync.dispatch(controller.read().epoch(), command);
                                }
                            }
                        },
                    }
                }
                if let Some(d) = pending {
                    path {
                        d: "{d}",
                        fill: "none",
                        stroke: "{link_stroke}",
                        stroke_width: "{link_width}",
                        stroke_dasharray: "6 4",
                    }
                }
            }

            for node in nodes {
                NodeCard {
                    key: "{node.id}",
                    node: node.clone(),
                    on_hover: move |id: String| controller.write().hover(&id),
                    on_grab: move |(id, at): (String, Point)| gesture.write().grab_node(id, at),
                }
            }

            for handle in handles {
                PortDot {
                    key: "{handle.key}",
                    handle: handle.clone(),
                    on_drag_start: move |(key, at): (PortKey, Point)| {
                        if let Err(e) = controller.write().before_drag(&key) {
                            warn!("Cannot drag from {}: {}", key, e);
                            return;
                        }
                        gesture.write().start_link(at);
                    },
                    on_drop: {
                        let sync = state_arc.sync.clone();
                        move |key: PortKey| {
                            // The dot swallows the mouseup, so the canvas never sees it.
                            gesture.write().release();
                            if controller.read().active_drag().is_none() {
                                return;
                            }
                            let formed = controller.write().on_connection(&key);
                            match formed {
                                Ok(command) => {
                                    sync.dispatch(controller.read().epoch(), command);
                                }
                                Err(e) => debug!("Drop on {} ignored: {}", key, e),
                            }
                            controller.write().on_drag_stop();
                        }
                    },
                }
            }
        }
    }
}

#[allow(non_snake_case)]
#[component]
fn NodeCard(
    node: NodeView,
    on_hover: EventHandler<String>,
    on_grab: EventHandler<(String, Point)>,
) -> Element {
    let left = node.position.x;
    let top = node.position.y;
    let css = node.css();
    let id = node.id.clone();
    let grab_id = node.id.clone();

    rsx! {
        div {
            id: "{node.id}",
            class: "node absolute flex flex-col items-center justify-center rounded-xl border border-slate-600 bg-slate-800 shadow-lg cursor-grab text-center px-2",
            style: "left: {left}px; top: {top}px; width: {NODE_WIDTH}px; height: {NODE_HEIGHT}px; {css}",
            onmouseenter: move |_| on_hover.call(id.clone()),
            onmousedown: move |e| {
                e.stop_propagation();
                let p = e.page_coordinates();
                on_grab.call((grab_id.clone(), Point::new(p.x, p.y)));
            },
            p { class: "small text-[10px] text-slate-400 truncate w-full", "{node.ident.package}" }
            p { class: "text-sm font-bold text-slate-100 truncate w-full", "{node.ident.name}" }
            p { class: "small text-[10px] text-slate-400 truncate w-full", "{node.ident.unique_id}" }
        }
    }
}

#[allow(non_snake_case)]
#[component]
fn PortDot(
    handle: HandleView,
    on_drag_start: EventHandler<(PortKey, Point)>,
    on_drop: EventHandler<PortKey>,
) -> Element {
    let radius = HANDLE_STYLE.radius;
    let size = radius * 2.0;
    let left = handle.center.x - radius;
    let top = handle.center.y - radius;
    let fill = HANDLE_STYLE.fill;
    let border = HANDLE_STYLE.line_width;
    let stroke = handle.stroke;
    let opacity = if handle.interactive { "1" } else { "0.35" };
    let cursor = if handle.interactive { "crosshair" } else { "not-allowed" };
    let drag_key = handle.key.clone();
    let drop_key = handle.key.clone();
    let interactive = handle.interactive;
    let label_left = handle.center.x + radius + 2.0;

    rsx! {
        div {
            class: "absolute rounded-full z-10",
            title: "{handle.key}",
            style: "left: {left}px; top: {top}px; width: {size}px; height: {size}px; background: {fill}; border: {border}px solid {stroke}; opacity: {opacity}; cursor: {cursor};",
            onmousedown: move |e| {
                e.stop_propagation();
                if !interactive {
                    return;
                }
                let p = e.page_coordinates();
                on_drag_start.call((drag_key.clone(), Point::new(p.x, p.y)));
            },
            onmouseup: move |e| {
                e.stop_propagation();
                on_drop.call(drop_key.clone());
            },
        }
        span {
            class: "absolute text-[10px] font-mono text-lime-300 pointer-events-none z-10",
            style: "left: {label_left}px; top: {top}px;",
            "{handle.label}"
        }
    }
}
