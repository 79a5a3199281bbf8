use std::num::Wrapping;

use tokio::sync::mpsc::{channel, Sender};

use system::{CanvasId, ClientEvent, ServerEvent, SessionId};

use crate::canvas_store::CanvasStore;
use crate::connection::{ConnectionCommand, ConnectionEvent};
use crate::connection_tx_storage::ConnectionTxStorage;
use crate::room_registry::RoomRegistry;

pub type ServerTx = Sender<ConnectionCommand>;

/// The sync protocol engine. One instance runs on one tokio task and owns
/// every room and every egress channel; commands arrive over a single mpsc
/// channel, which is what serializes commits per canvas.
struct Server {
    session_id_source: Wrapping<SessionId>,
    rooms: RoomRegistry,
    connections: ConnectionTxStorage,
    store: CanvasStore,
}

impl Server {
    fn new(store: CanvasStore) -> Self {
        Self {
            session_id_source: Wrapping(0),
            rooms: RoomRegistry::new(),
            connections: ConnectionTxStorage::new(),
            store,
        }
    }

    fn next_session_id(&mut self) -> SessionId {
        self.session_id_source += Wrapping(1);
        self.session_id_source.0
    }

    async fn handle_connection_command(&mut self, command: ConnectionCommand) {
        match command {
            ConnectionCommand::Connect { tx } => {
                let session_id = self.next_session_id();
                self.connections.insert(session_id, tx);
                self.connections
                    .send(&session_id, ConnectionEvent::Connected { session_id })
                    .await;
            }
            ConnectionCommand::Disconnect { from } => {
                self.rooms.leave_all(&from);
                self.connections.remove(&from);
                log::info!("session {} disconnected", from);
            }
            ConnectionCommand::ClientEvent { from, event } => {
                self.handle_client_event(from, event).await;
            }
        }
    }

    async fn handle_client_event(&mut self, from: SessionId, event: ClientEvent) {
        match event {
            ClientEvent::JoinCanvas { canvas_id } => {
                self.ensure_room(&canvas_id).await;
                self.rooms.join(canvas_id, from);
                let elements = self.rooms.snapshot(&canvas_id);
                // Authoritative replace, delivered to the joiner only.
                self.connections
                    .send(
                        &from,
                        ConnectionEvent::Event(ServerEvent::CanvasSync { elements }),
                    )
                    .await;
            }
            ClientEvent::DrawingProgress { canvas_id, element } => {
                let element = match element.into_element() {
                    Some(element) => element,
                    None => {
                        log::debug!("dropping progress element without a recognized type");
                        return;
                    }
                };
                // Stateless relay: nothing is stored, the sender is
                // excluded.
                self.broadcast(
                    &canvas_id,
                    ServerEvent::DrawingProgress {
                        user_id: from,
                        element,
                    },
                    Some(from),
                )
                .await;
            }
            ClientEvent::DrawingCommit { canvas_id, element } => {
                let element = match element.into_element() {
                    Some(element) => element,
                    None => {
                        log::debug!("dropping commit element without a recognized type");
                        return;
                    }
                };
                self.ensure_room(&canvas_id).await;
                let elements = self.rooms.append_committed(canvas_id, element).to_vec();
                self.broadcast(&canvas_id, ServerEvent::CanvasSync { elements }, None)
                    .await;
            }
        }
    }

    /// Lazily create the room, seeded from the persisted snapshot when one
    /// exists. Once a room is live, its in-memory sequence is the
    /// authority; the file is only read again after a restart.
    async fn ensure_room(&mut self, canvas_id: &CanvasId) {
        if self.rooms.contains(canvas_id) {
            return;
        }
        let elements = match self.store.read_elements(canvas_id).await {
            Ok(elements) => elements,
            Err(_) => Vec::new(),
        };
        self.rooms.create(*canvas_id, elements);
    }

    async fn broadcast(
        &mut self,
        canvas_id: &CanvasId,
        event: ServerEvent,
        without: Option<SessionId>,
    ) {
        let members: Vec<SessionId> = self.rooms.members(canvas_id).to_vec();
        for member in members {
            if without.map_or(true, |excluded| excluded != member) {
                self.connections
                    .send(&member, ConnectionEvent::Event(event.clone()))
                    .await;
            }
        }
    }
}

pub fn spawn_server(store: CanvasStore) -> ServerTx {
    let (srv_tx, mut srv_rx) = channel::<ConnectionCommand>(16);

    tokio::spawn(async move {
        let mut server = Server::new(store);

        while let Some(command) = srv_rx.recv().await {
            server.handle_connection_command(command).await;
        }
    });

    srv_tx
}
