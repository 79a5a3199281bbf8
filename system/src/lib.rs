mod client_board;
mod element;
mod message;
mod throttle;
mod types;

pub use client_board::*;
pub use element::*;
pub use message::*;
pub use throttle::*;
pub use types::*;

pub extern crate euclid;
pub extern crate serde;
pub extern crate serde_json;
pub extern crate uuid;
