//! The connection drag in progress.
//!
//! Starting a drag from a handle greys out every handle that is not a valid
//! drop target for it. The returned [`DragContext`] owns that state until the
//! gesture ends and [`DragContext::end`] restores all handles.

use tracing::debug;

use crate::model::PortKey;

use super::canvas::Canvas;
use super::error::DiagramError;
use super::handle::HandleType;

#[derive(Debug, Clone, PartialEq)]
pub struct DragContext {
    source: PortKey,
    targets: Vec<PortKey>,
}

impl DragContext {
    pub fn begin(canvas: &mut Canvas, source: &PortKey) -> Result<Self, DiagramError> {
        let targets = canvas
            .handle(source)
            .ok_or_else(|| DiagramError::UnknownPort(source.clone()))?
            .potential_targets
            .clone();

        canvas.batch(|canvas| {
            for handle in canvas.handles_mut() {
                handle.set_enabled(false);
                handle.add_type(HandleType::Disabled);
            }

            if let Some(handle) = canvas.handle_mut(source) {
                handle.set_enabled(true);
                handle.clear_types();
            }

            for target in &targets {
                match canvas.handle_mut(target) {
                    Some(handle) => {
                        handle.set_enabled(true);
                        handle.clear_types();
                    }
                    None => debug!("Potential target {} of {} is not on the canvas", target, source),
                }
            }
        });

        debug!("Drag started from {} with {} potential targets", source, targets.len());

        Ok(Self {
            source: source.clone(),
            targets,
        })
    }

    pub fn source(&self) -> &PortKey {
        &self.source
    }

    /// Whether a drop on `key` may form a link.
    pub fn accepts(&self, key: &PortKey) -> bool {
        self.targets.contains(key)
    }

    pub fn end(self, canvas: &mut Canvas) {
        canvas.batch(|canvas| {
            for handle in canvas.handles_mut() {
                handle.set_enabled(true);
                handle.clear_types();
            }
        });
        debug!("Drag from {} ended", self.source);
    }
}
