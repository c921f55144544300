//! Port handles: the connectable dots attached to each node.

use crate::model::PortKey;

/// Color shared by handles and connector lines.
pub const PORT_COLOR: &str = "rgb(122,193,3)";
/// Stroke applied by the [`HandleType::Disabled`] type.
pub const DISABLED_STROKE: &str = "red";

/// How a handle is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleStyle {
    pub fill: &'static str,
    pub stroke: &'static str,
    pub radius: f64,
    pub line_width: f64,
}

pub const HANDLE_STYLE: HandleStyle = HandleStyle {
    fill: PORT_COLOR,
    stroke: PORT_COLOR,
    radius: 15.0,
    line_width: 3.0,
};

/// How connection lines between handles are drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorStyle {
    pub stroke: &'static str,
    pub line_width: f64,
    /// Bezier control point distance from the anchor.
    pub curviness: f64,
    /// Space left between the handle edge and the line end.
    pub gap: f64,
}

pub const CONNECTOR_STYLE: ConnectorStyle = ConnectorStyle {
    stroke: PORT_COLOR,
    line_width: 3.0,
    curviness: 50.0,
    gap: 10.0,
};

/// Named style overlays that can be stacked on a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleType {
    /// Red outline; the handle does not accept drops.
    Disabled,
}

/// How many links a port takes part in at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    Single,
    Unlimited,
}

impl Capacity {
    pub fn from_multiple(is_multiple: bool) -> Self {
        if is_multiple {
            Capacity::Unlimited
        } else {
            Capacity::Single
        }
    }

    pub fn admits(&self, current: usize) -> bool {
        match self {
            Capacity::Single => current < 1,
            Capacity::Unlimited => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortHandle {
    pub key: PortKey,
    pub endpoint_id: String,
    /// Port id, drawn next to the dot.
    pub label: String,
    pub capacity: Capacity,
    pub potential_targets: Vec<PortKey>,
    enabled: bool,
    types: Vec<HandleType>,
}

impl PortHandle {
    pub fn new(
        key: PortKey,
        endpoint_id: &str,
        label: &str,
        capacity: Capacity,
        potential_targets: Vec<PortKey>,
    ) -> Self {
        Self {
            key,
            endpoint_id: endpoint_id.to_string(),
            label: label.to_string(),
            capacity,
            potential_targets,
            enabled: true,
            types: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn add_type(&mut self, ty: HandleType) {
        if !self.types.contains(&ty) {
            self.types.push(ty);
        }
    }

    pub fn clear_types(&mut self) {
        self.types.clear();
    }

    pub fn has_type(&self, ty: HandleType) -> bool {
        self.types.contains(&ty)
    }

    /// Whether the handle currently reacts to drags and drops.
    pub fn is_interactive(&self) -> bool {
        self.enabled && !self.has_type(HandleType::Disabled)
    }

    pub fn stroke(&self) -> &'static str {
        if self.has_type(HandleType::Disabled) {
            DISABLED_STROKE
        } else {
            HANDLE_STYLE.stroke
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle() -> PortHandle {
        PortHandle::new(PortKey::from("a:out"), "a", "out", Capacity::Single, Vec::new())
    }

    #[test]
    fn test_disabled_type_overrides_stroke() {
        let mut h = handle();
        assert_eq!(h.stroke(), PORT_COLOR);

        h.add_type(HandleType::Disabled);
        assert_eq!(h.stroke(), DISABLED_STROKE);
        assert!(!h.is_interactive());

        h.clear_types();
        assert!(h.is_interactive());
    }

    #[test]
    fn test_capacity() {
        assert!(Capacity::Single.admits(0));
        assert!(!Capacity::Single.admits(1));
        assert!(Capacity::Unlimited.admits(100));
        assert_eq!(Capacity::from_multiple(true), Capacity::Unlimited);
    }
}
