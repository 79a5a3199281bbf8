use serde::{Deserialize, Serialize};

/// Transport-assigned identifier of one websocket connection. Used as the
/// author tag on live-preview relays; never conflated with the REST-layer
/// account id.
pub type SessionId = u64;

pub type CanvasId = uuid::Uuid;

/// Account identifier from the (external) authentication layer.
pub type UserId = String;

/// Sequence position of an element in the authoring client's local list at
/// creation time. Not globally unique across clients.
pub type ElementId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl std::default::Default for Color {
    fn default() -> Self {
        Self { r: 0, g: 0, b: 0 }
    }
}
