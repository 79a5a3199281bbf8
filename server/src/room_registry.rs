use std::collections::HashMap;

use system::{CanvasId, Element, SessionId};

/// One live canvas: the authoritative committed sequence and the sessions
/// currently viewing it.
pub struct Room {
    committed: Vec<Element>,
    members: Vec<SessionId>,
}

impl Room {
    fn new(committed: Vec<Element>) -> Self {
        Self {
            committed,
            members: Vec::new(),
        }
    }

    pub fn committed(&self) -> &[Element] {
        &self.committed
    }

    pub fn members(&self) -> &[SessionId] {
        &self.members
    }
}

/// Every live room, keyed by canvas id. All mutation happens on the engine
/// task, which keeps appends for one canvas strictly ordered. Rooms are
/// created lazily and live for the rest of the process - there is no
/// eviction.
pub struct RoomRegistry {
    rooms: HashMap<CanvasId, Room>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: HashMap::new(),
        }
    }

    pub fn contains(&self, canvas_id: &CanvasId) -> bool {
        self.rooms.contains_key(canvas_id)
    }

    /// Insert a room seeded with `elements` unless one already exists.
    pub fn create(&mut self, canvas_id: CanvasId, elements: Vec<Element>) -> &mut Room {
        self.rooms
            .entry(canvas_id)
            .or_insert_with(|| Room::new(elements))
    }

    pub fn get_or_create(&mut self, canvas_id: CanvasId) -> &mut Room {
        self.create(canvas_id, Vec::new())
    }

    /// The sole mutator of authoritative state: append one element and
    /// return the full resulting sequence.
    pub fn append_committed(&mut self, canvas_id: CanvasId, element: Element) -> &[Element] {
        let room = self.get_or_create(canvas_id);
        room.committed.push(element);
        &room.committed
    }

    /// Read-only copy of the committed sequence; empty when the room was
    /// never created.
    pub fn snapshot(&self, canvas_id: &CanvasId) -> Vec<Element> {
        self.rooms
            .get(canvas_id)
            .map(|room| room.committed.clone())
            .unwrap_or_default()
    }

    /// Idempotent membership add; a session may be in any number of rooms.
    pub fn join(&mut self, canvas_id: CanvasId, session_id: SessionId) {
        let room = self.get_or_create(canvas_id);
        if !room.members.contains(&session_id) {
            room.members.push(session_id);
            log::info!("session {} joined canvas {}", session_id, canvas_id);
        }
    }

    pub fn members(&self, canvas_id: &CanvasId) -> &[SessionId] {
        self.rooms
            .get(canvas_id)
            .map(|room| room.members.as_slice())
            .unwrap_or(&[])
    }

    /// Drop the session from every member list. The room and its committed
    /// sequence stay, even with nobody left in it.
    pub fn leave_all(&mut self, session_id: &SessionId) {
        for room in self.rooms.values_mut() {
            room.members.retain(|member| member != session_id);
        }
    }
}
