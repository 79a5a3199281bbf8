use serde::{Deserialize, Serialize};

use crate::element::{Element, RawElement};
use crate::types::{CanvasId, SessionId};

/// Client-to-server events. All of them are one-way; the only replies are
/// whatever the engine chooses to broadcast.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    #[serde(rename_all = "camelCase")]
    JoinCanvas { canvas_id: CanvasId },
    #[serde(rename_all = "camelCase")]
    DrawingProgress {
        canvas_id: CanvasId,
        element: RawElement,
    },
    #[serde(rename_all = "camelCase")]
    DrawingCommit {
        canvas_id: CanvasId,
        element: RawElement,
    },
}

/// Server-to-client events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Authoritative full replace of the receiver's committed sequence.
    CanvasSync { elements: Vec<Element> },
    /// Another member's live preview. Best effort, at most once, no
    /// ordering guarantee relative to commits.
    #[serde(rename_all = "camelCase")]
    DrawingProgress {
        user_id: SessionId,
        element: Element,
    },
}
