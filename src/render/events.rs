//! The event-driven boundary of the render engine: UI events in, render
//! commands out. Both sides are plain serde values so any presentation layer
//! can sit on the other end.

use crate::core::NavigationIntent;
use crate::render::frame::RenderFrame;
use crate::render::layout::{Bounds, LayoutAlgorithm, Positions};
use crate::render::state::{Highlight, VisibilityMask};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum UiEvent {
    Hover {
        #[serde(rename = "nodeId", default)]
        node_id: Option<String>,
    },
    Select {
        #[serde(rename = "nodeId")]
        node_id: String,
    },
    SetLayout {
        layout: LayoutAlgorithm,
    },
    SetCollapse {
        collapsed: bool,
    },
    ToggleCollapse,
    Fit,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RenderCommand {
    /// Drop everything drawn and draw this frame.
    Rebuild { frame: RenderFrame },
    Positions {
        layout: LayoutAlgorithm,
        positions: Positions,
    },
    Visibility(VisibilityMask),
    Highlight(Highlight),
    Stats { text: String },
    Navigate(NavigationIntent),
    Fit { bounds: Bounds },
    ResetView,
}
