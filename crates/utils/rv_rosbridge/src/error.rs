//! Error types for the bridge connection.

use thiserror::Error;

/// Errors returned synchronously to callers of the connection API.
///
/// Transport failures never appear here: they fold into the `Disconnected`
/// status transition and the reconnect loop. What remains are caller
/// ordering bugs, which must not be swallowed.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Publish attempted on a topic with no registered publisher.
    #[error("no publisher registered for topic `{0}`")]
    NotAdvertised(String),

    /// Publish attempted while the link is down.
    #[error("not connected to the bridge")]
    NotConnected,

    /// The driver task is gone (shutdown already completed).
    #[error("connection driver has shut down")]
    ChannelClosed,
}
