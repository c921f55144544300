//! Content of the side panel shown while hovering a node.

use super::canvas::NodeView;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelLine {
    Text(String),
    Separator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertiesPanel {
    pub title: String,
    pub lines: Vec<PanelLine>,
}

impl PropertiesPanel {
    pub fn for_node(node: &NodeView) -> Self {
        let mut lines = vec![
            PanelLine::Text(format!("Package: {}", node.ident.package)),
            PanelLine::Text(format!("Unique ID: {}", node.ident.unique_id)),
            PanelLine::Separator,
        ];
        lines.extend(
            node.properties
                .values()
                .map(|value| PanelLine::Text(value.to_string())),
        );

        Self {
            title: node.ident.name.clone(),
            lines,
        }
    }
}
