//! Node placement and connector geometry.
//!
//! Handles float on the top or bottom face of their node, whichever faces the
//! node they are linked to; links are cubic beziers leaving each face along
//! its normal.

use crate::model::OrderedMap;

use super::handle::CONNECTOR_STYLE;

pub const NODE_WIDTH: f64 = 180.0;
pub const NODE_HEIGHT: f64 = 96.0;

const GRID_COLUMNS: usize = 4;
const GRID_SPACING_X: f64 = 260.0;
const GRID_SPACING_Y: f64 = 220.0;
const GRID_MARGIN: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Top,
    Bottom,
}

impl Face {
    fn normal_y(self) -> f64 {
        match self {
            Face::Top => -1.0,
            Face::Bottom => 1.0,
        }
    }
}

/// Reads a CSS length such as `120px` or `120`.
pub fn parse_px(value: &str) -> Option<f64> {
    let value = value.trim();
    value.strip_suffix("px").unwrap_or(value).trim().parse().ok()
}

/// Top-left corner of a freshly added node.
///
/// `left`/`top` from the endpoint style win; otherwise the node takes the
/// grid cell of its insertion slot.
pub fn initial_position(style: &OrderedMap, slot: usize) -> Point {
    let column = slot % GRID_COLUMNS;
    let row = slot / GRID_COLUMNS;
    let grid = Point::new(
        GRID_MARGIN + column as f64 * GRID_SPACING_X,
        GRID_MARGIN + row as f64 * GRID_SPACING_Y,
    );

    Point::new(
        style.get("left").and_then(parse_px).unwrap_or(grid.x),
        style.get("top").and_then(parse_px).unwrap_or(grid.y),
    )
}

fn center(node: Point) -> Point {
    node.offset(NODE_WIDTH / 2.0, NODE_HEIGHT / 2.0)
}

/// The face of `node` turned towards `peer`.
pub fn facing(node: Point, peer: Point) -> Face {
    if center(peer).y < center(node).y {
        Face::Top
    } else {
        Face::Bottom
    }
}

/// Position of the `index`-th of `count` handles spread along a face.
pub fn anchor(node: Point, face: Face, index: usize, count: usize) -> Point {
    let x = node.x + NODE_WIDTH * (index + 1) as f64 / (count + 1) as f64;
    let y = match face {
        Face::Top => node.y,
        Face::Bottom => node.y + NODE_HEIGHT,
    };
    Point::new(x, y)
}

/// SVG path data for a link between two anchors.
pub fn connector_path(from: Point, from_face: Face, to: Point, to_face: Face) -> String {
    let gap = CONNECTOR_STYLE.gap;
    let curve = CONNECTOR_STYLE.curviness;

    let start = from.offset(0.0, from_face.normal_y() * gap);
    let end = to.offset(0.0, to_face.normal_y() * gap);
    let c1 = start.offset(0.0, from_face.normal_y() * curve);
    let c2 = end.offset(0.0, to_face.normal_y() * curve);

    format!(
        "M {:.1} {:.1} C {:.1} {:.1}, {:.1} {:.1}, {:.1} {:.1}",
        start.x, start.y, c1.x, c1.y, c2.x, c2.y, end.x, end.y
    )
}

/// Path for a link still being dragged towards the pointer.
pub fn pending_path(from: Point, from_face: Face, pointer: Point) -> String {
    let to_face = if pointer.y < from.y { Face::Bottom } else { Face::Top };
    let start = from.offset(0.0, from_face.normal_y() * CONNECTOR_STYLE.gap);
    let c1 = start.offset(0.0, from_face.normal_y() * CONNECTOR_STYLE.curviness);
    let c2 = pointer.offset(0.0, to_face.normal_y() * CONNECTOR_STYLE.curviness);

    format!(
        "M {:.1} {:.1} C {:.1} {:.1}, {:.1} {:.1}, {:.1} {:.1}",
        start.x, start.y, c1.x, c1.y, c2.x, c2.y, pointer.x, pointer.y
    )
}
