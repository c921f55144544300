//! Render state of the diagram: nodes, port handles and drawn links.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::model::{ConnectionPair, Endpoint, EndpointIdent, OrderedMap, PortKey};

use super::error::DiagramError;
use super::handle::{Capacity, PortHandle};
use super::layout::{self, Face, Point};

/// One rendered endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeView {
    pub id: String,
    pub ident: EndpointIdent,
    pub properties: OrderedMap,
    pub style: OrderedMap,
    /// Handle keys in port order.
    pub ports: Vec<PortKey>,
    pub position: Point,
    pub draggable: bool,
}

impl NodeView {
    /// Inline CSS built from the endpoint style, applied in document order.
    pub fn css(&self) -> String {
        self.style
            .iter()
            .filter(|(key, _)| *key != "left" && *key != "top")
            .map(|(key, value)| format!("{}: {};", key, value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Default)]
pub struct Canvas {
    nodes: Vec<NodeView>,
    node_index: HashMap<String, usize>,
    handles: Vec<PortHandle>,
    handle_index: HashMap<PortKey, usize>,
    connections: Vec<ConnectionPair>,
    batch_depth: u32,
    dirty: bool,
    revision: u64,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node for `endpoint` with one handle per port.
    ///
    /// Returns `false` and leaves the canvas untouched when a node with the
    /// same id is already present.
    pub fn add_node(&mut self, endpoint: &Endpoint) -> bool {
        if self.node_index.contains_key(&endpoint.id) {
            debug!("Node {} already rendered, skipping", endpoint.id);
            return false;
        }

        let slot = self.nodes.len();
        let mut node = NodeView {
            id: endpoint.id.clone(),
            ident: EndpointIdent::parse(&endpoint.id),
            properties: endpoint.properties.clone(),
            style: endpoint.style.clone(),
            ports: Vec::with_capacity(endpoint.ports.len()),
            position: layout::initial_position(&endpoint.style, slot),
            draggable: true,
        };

        for port in &endpoint.ports {
            let key = port.key(&endpoint.id);
            if self.handle_index.contains_key(&key) {
                warn!("Duplicate port {} on endpoint {}, ignoring", port.id, endpoint.id);
                continue;
            }

            self.handle_index.insert(key.clone(), self.handles.len());
            self.handles.push(PortHandle::new(
                key.clone(),
                &endpoint.id,
                &port.id,
                Capacity::from_multiple(port.is_multiple),
                port.potential_connections.clone(),
            ));
            node.ports.push(key);
        }

        self.node_index.insert(endpoint.id.clone(), slot);
        self.nodes.push(node);
        self.touch();
        true
    }

    pub fn node(&self, id: &str) -> Option<&NodeView> {
        self.node_index.get(id).map(|&ix| &self.nodes[ix])
    }

    pub fn nodes(&self) -> &[NodeView] {
        &self.nodes
    }

    pub fn handle(&self, key: &PortKey) -> Option<&PortHandle> {
        self.handle_index.get(key).map(|&ix| &self.handles[ix])
    }

    pub fn handle_mut(&mut self, key: &PortKey) -> Option<&mut PortHandle> {
        self.handle_index.get(key).map(|&ix| &mut self.handles[ix])
    }

    pub fn handles(&self) -> &[PortHandle] {
        &self.handles
    }

    /// Mutable access for drag styling; call inside [`Canvas::batch`].
    pub(super) fn handles_mut(&mut self) -> impl Iterator<Item = &mut PortHandle> {
        self.dirty = true;
        self.handles.iter_mut()
    }

    pub fn connections(&self) -> &[ConnectionPair] {
        &self.connections
    }

    pub fn connection_count(&self, key: &PortKey) -> usize {
        self.connections.iter().filter(|c| c.touches(key)).count()
    }

    pub fn is_connected(&self, a: &PortKey, b: &PortKey) -> bool {
        self.connections.iter().any(|c| c.joins(a, b))
    }

    /// Draws a link between two registered handles, honoring their capacity.
    pub fn connect(&mut self, pair: ConnectionPair) -> Result<(), DiagramError> {
        let source = self
            .handle(&pair.source)
            .ok_or_else(|| DiagramError::UnknownPort(pair.source.clone()))?;
        let target = self
            .handle(&pair.target)
            .ok_or_else(|| DiagramError::UnknownPort(pair.target.clone()))?;

        if pair.source == pair.target {
            return Err(DiagramError::SelfConnection(pair.source));
        }
        if self.is_connected(&pair.source, &pair.target) {
            return Err(DiagramError::AlreadyConnected(pair));
        }
        if !source.capacity.admits(self.connection_count(&source.key)) {
            return Err(DiagramError::PortFull(pair.source));
        }
        if !target.capacity.admits(self.connection_count(&target.key)) {
            return Err(DiagramError::PortFull(pair.target));
        }

        self.connections.push(pair);
        self.touch();
        Ok(())
    }

    /// Removes the link joining the two ends of `pair`, in either direction.
    pub fn detach(&mut self, pair: &ConnectionPair) -> Option<ConnectionPair> {
        let ix = self
            .connections
            .iter()
            .position(|c| c.joins(&pair.source, &pair.target))?;
        let removed = self.connections.remove(ix);
        self.touch();
        Some(removed)
    }

    pub fn move_node(&mut self, id: &str, dx: f64, dy: f64) {
        let Some(&ix) = self.node_index.get(id) else {
            return;
        };
        let node = &mut self.nodes[ix];
        if !node.draggable {
            return;
        }
        node.position = node.position.offset(dx, dy);
        self.touch();
    }

    /// Where a handle sits and which face it leaves from.
    pub fn anchor_of(&self, key: &PortKey) -> Option<(Point, Face)> {
        let handle = self.handle(key)?;
        let node = self.node(&handle.endpoint_id)?;
        let index = node.ports.iter().position(|k| k == key)?;

        let face = self
            .connections
            .iter()
            .find_map(|c| c.peer_of(key))
            .and_then(|peer| self.handle(peer))
            .and_then(|peer| self.node(&peer.endpoint_id))
            .map(|peer_node| layout::facing(node.position, peer_node.position))
            .unwrap_or(Face::Bottom);

        Some((
            layout::anchor(node.position, face, index, node.ports.len()),
            face,
        ))
    }

    /// SVG path of a drawn link.
    pub fn connection_path(&self, pair: &ConnectionPair) -> Option<String> {
        let (from, from_face) = self.anchor_of(&pair.source)?;
        let (to, to_face) = self.anchor_of(&pair.target)?;
        Some(layout::connector_path(from, from_face, to, to_face))
    }

    /// Runs `f` with redraw notifications held back until it returns.
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.batch_depth += 1;
        let result = f(self);
        self.batch_depth -= 1;
        if self.batch_depth == 0 && self.dirty {
            self.dirty = false;
            self.revision += 1;
        }
        result
    }

    /// Bumped once per visible change, or once per outermost batch.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        if self.batch_depth > 0 {
            self.dirty = true;
        } else {
            self.revision += 1;
        }
    }
}
