pub mod canvas_store;
pub mod connection;
mod connection_tx_storage;
pub mod handlers;
mod room_registry;
pub mod server;
