//! Rosbridge session management and wire protocol for Roverview.
//!
//! This crate provides the foundation for talking to a rosbridge server:
//! the JSON wire-protocol types, a pure connection-lifecycle state machine,
//! and the async WebSocket driver that executes it.

mod connection;
mod error;
mod message;
mod protocol;
mod session;

pub use connection::{BridgeConnection, ConnectionConfig, ConnectionEvent, ConnectionHandle};
pub use error::BridgeError;
pub use message::BridgeMessage;
pub use protocol::{ClientOp, ServerOp, StatusLevel};
pub use session::{LinkAction, LinkEvent, LinkState, LinkStateMachine};
