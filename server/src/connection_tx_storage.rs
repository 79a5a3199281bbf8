use std::collections::HashMap;

use system::SessionId;

use crate::connection::ConnectionEvent;

pub type ConnectionTx = tokio::sync::mpsc::Sender<ConnectionEvent>;

/// Egress channel per live connection, keyed by session id.
pub struct ConnectionTxStorage {
    connection_txs: HashMap<SessionId, ConnectionTx>,
}

impl ConnectionTxStorage {
    pub fn new() -> Self {
        Self {
            connection_txs: HashMap::new(),
        }
    }

    pub fn insert(&mut self, session_id: SessionId, tx: ConnectionTx) {
        self.connection_txs.insert(session_id, tx);
    }

    /// Best effort: a session that is gone is skipped, so a disconnected
    /// peer never receives another message.
    pub async fn send(&mut self, to: &SessionId, message: ConnectionEvent) {
        if let Some(tx) = self.connection_txs.get_mut(to) {
            if tx.send(message).await.is_err() {
                log::warn!("egress channel of session {} is closed, dropping", to);
            }
        } else {
            log::debug!("no egress channel for session {}", to);
        }
    }

    pub fn remove(&mut self, session_id: &SessionId) -> Option<ConnectionTx> {
        self.connection_txs.remove(session_id)
    }
}
