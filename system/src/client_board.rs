use std::collections::HashMap;

use crate::element::Element;
use crate::message::ServerEvent;
use crate::types::SessionId;

/// Snapshots kept for undo/redo before the oldest is dropped.
const HISTORY_LIMIT: usize = 64;

/// Client-side board state: the committed sequence (replaced wholesale on
/// every authoritative sync), a bounded local undo/redo history, other
/// members' live previews, and the stroke currently being drawn.
pub struct ClientBoard {
    committed: Vec<Element>,
    history: Vec<Vec<Element>>,
    index: usize,
    previews: HashMap<SessionId, Element>,
    active: Option<Element>,
}

impl ClientBoard {
    /// `initial` is whatever snapshot the page loaded - usually the
    /// persisted one, superseded by the first canvas-sync after joining.
    pub fn new(initial: Vec<Element>) -> Self {
        Self {
            history: vec![initial.clone()],
            committed: initial,
            index: 0,
            previews: HashMap::new(),
            active: None,
        }
    }

    /// Merge a server event. A sync replaces the committed sequence and
    /// retires every preview whose element is now committed; the local
    /// history and the own in-progress stroke are untouched.
    pub fn handle_event(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::CanvasSync { elements } => {
                self.previews.retain(|_, preview| !elements.contains(preview));
                self.committed = elements;
            }
            ServerEvent::DrawingProgress { user_id, element } => {
                self.previews.insert(user_id, element);
            }
        }
    }

    pub fn begin_stroke(&mut self, element: Element) {
        self.active = Some(element);
    }

    /// Replace the stroke in flight. The caller emits the same element as
    /// drawing-progress, throttled at the source.
    pub fn update_stroke(&mut self, element: Element) {
        self.active = Some(element);
    }

    /// Complete the stroke: append it to the local committed view, push an
    /// undo snapshot, and hand the element back for a drawing-commit.
    pub fn finish_stroke(&mut self) -> Option<Element> {
        let element = self.active.take()?;
        self.committed.push(element.clone());
        self.push_history();
        Some(element)
    }

    fn push_history(&mut self) {
        self.history.truncate(self.index + 1);
        self.history.push(self.committed.clone());
        if self.history.len() > HISTORY_LIMIT {
            self.history.remove(0);
        }
        self.index = self.history.len() - 1;
    }

    /// Purely local. Nothing is emitted; the next authoritative sync from
    /// any member's commit overwrites the result.
    pub fn undo(&mut self) {
        if self.index > 0 {
            self.index -= 1;
            self.committed = self.history[self.index].clone();
        }
    }

    pub fn redo(&mut self) {
        if self.index + 1 < self.history.len() {
            self.index += 1;
            self.committed = self.history[self.index].clone();
        }
    }

    pub fn committed(&self) -> &[Element] {
        &self.committed
    }

    pub fn previews(&self) -> &HashMap<SessionId, Element> {
        &self.previews
    }

    pub fn active(&self) -> Option<&Element> {
        self.active.as_ref()
    }

    /// Draw order: committed elements first, then live previews, then the
    /// own in-progress stroke on top. Previews never enter undo history.
    pub fn render_elements(&self) -> Vec<&Element> {
        self.committed
            .iter()
            .chain(self.previews.values())
            .chain(self.active.iter())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Shape, Style};

    fn rectangle(id: u64) -> Element {
        Element {
            id,
            shape: Shape::Rectangle {
                x1: 0.0,
                y1: 0.0,
                x2: 10.0,
                y2: 10.0,
            },
            style: Style::default(),
        }
    }

    fn sync(elements: Vec<Element>) -> ServerEvent {
        ServerEvent::CanvasSync { elements }
    }

    #[test]
    fn a_sync_replaces_committed_and_keeps_the_active_stroke() {
        let mut board = ClientBoard::new(vec![rectangle(0)]);
        board.begin_stroke(rectangle(1));

        board.handle_event(sync(vec![rectangle(2), rectangle(3)]));

        assert_eq!(board.committed().len(), 2);
        assert_eq!(board.committed()[0].id, 2);
        assert_eq!(board.active().map(|el| el.id), Some(1));
    }

    #[test]
    fn previews_track_the_latest_element_per_author() {
        let mut board = ClientBoard::new(Vec::new());

        board.handle_event(ServerEvent::DrawingProgress {
            user_id: 1,
            element: rectangle(0),
        });
        board.handle_event(ServerEvent::DrawingProgress {
            user_id: 1,
            element: rectangle(5),
        });
        board.handle_event(ServerEvent::DrawingProgress {
            user_id: 2,
            element: rectangle(9),
        });

        assert_eq!(board.previews().len(), 2);
        assert_eq!(board.previews().get(&1).map(|el| el.id), Some(5));
    }

    #[test]
    fn a_sync_retires_the_preview_of_a_committed_element() {
        let mut board = ClientBoard::new(Vec::new());
        let element = rectangle(4);

        board.handle_event(ServerEvent::DrawingProgress {
            user_id: 1,
            element: element.clone(),
        });
        board.handle_event(ServerEvent::DrawingProgress {
            user_id: 2,
            element: rectangle(8),
        });
        board.handle_event(sync(vec![element]));

        assert!(board.previews().get(&1).is_none());
        assert_eq!(board.previews().get(&2).map(|el| el.id), Some(8));
    }

    #[test]
    fn finishing_a_stroke_commits_locally_and_returns_the_element() {
        let mut board = ClientBoard::new(Vec::new());
        board.begin_stroke(rectangle(0));
        board.update_stroke(rectangle(0));

        let committed = board.finish_stroke().expect("a stroke was in flight");

        assert_eq!(committed.id, 0);
        assert_eq!(board.committed().len(), 1);
        assert!(board.active().is_none());
        assert!(board.finish_stroke().is_none());
    }

    #[test]
    fn undo_and_redo_walk_the_local_history_without_network_effects() {
        let mut board = ClientBoard::new(Vec::new());

        board.begin_stroke(rectangle(0));
        board.finish_stroke();
        board.begin_stroke(rectangle(1));
        board.finish_stroke();

        board.undo();
        assert_eq!(board.committed().len(), 1);
        board.undo();
        assert_eq!(board.committed().len(), 0);
        board.undo();
        assert_eq!(board.committed().len(), 0);

        board.redo();
        assert_eq!(board.committed().len(), 1);
        board.redo();
        assert_eq!(board.committed().len(), 2);
        board.redo();
        assert_eq!(board.committed().len(), 2);
    }

    #[test]
    fn a_local_undo_is_clobbered_by_the_next_authoritative_sync() {
        let mut board = ClientBoard::new(Vec::new());
        board.begin_stroke(rectangle(0));
        board.finish_stroke();

        board.undo();
        assert!(board.committed().is_empty());

        board.handle_event(sync(vec![rectangle(0), rectangle(1)]));
        assert_eq!(board.committed().len(), 2);
    }

    #[test]
    fn a_new_stroke_truncates_the_redo_branch() {
        let mut board = ClientBoard::new(Vec::new());
        board.begin_stroke(rectangle(0));
        board.finish_stroke();
        board.undo();

        board.begin_stroke(rectangle(1));
        board.finish_stroke();

        board.redo();
        assert_eq!(board.committed().len(), 1);
        assert_eq!(board.committed()[0].id, 1);
    }

    #[test]
    fn history_is_bounded() {
        let mut board = ClientBoard::new(Vec::new());
        for id in 0..(HISTORY_LIMIT as u64 + 10) {
            board.begin_stroke(rectangle(id));
            board.finish_stroke();
        }

        assert_eq!(board.history.len(), HISTORY_LIMIT);

        for _ in 0..(HISTORY_LIMIT * 2) {
            board.undo();
        }
        // The oldest snapshots were dropped, so undo bottoms out above zero.
        assert_eq!(board.committed().len(), 11);
    }

    #[test]
    fn previews_render_after_committed_and_before_the_active_stroke() {
        let mut board = ClientBoard::new(vec![rectangle(0)]);
        board.handle_event(ServerEvent::DrawingProgress {
            user_id: 1,
            element: rectangle(7),
        });
        board.begin_stroke(rectangle(3));

        let order: Vec<u64> = board.render_elements().iter().map(|el| el.id).collect();
        assert_eq!(order, vec![0, 7, 3]);
    }
}
