//! Error types for the cycling-power-ble crate.

use thiserror::Error;

/// The main error type for this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// Radio transport rejected a command at submission time.
    #[error("Transport error: {context}")]
    Transport {
        /// Description of the rejected command.
        context: String,
    },

    /// No advertisement matching the target name was seen before the scan timeout.
    #[error("Target not found: {name}")]
    TargetNotFound {
        /// The advertised name that was searched for.
        name: String,
    },

    /// The peripheral did not confirm the connection before the connect timeout.
    #[error("Connection failed: {reason}")]
    ConnectFailed {
        /// Description of why the connection failed.
        reason: String,
    },

    /// Service discovery did not report the Cycling Power service in time.
    #[error("Service not found: {uuid}")]
    ServiceNotFound {
        /// The UUID of the service that was not found.
        uuid: String,
    },

    /// Characteristic discovery did not report the measurement characteristic in time.
    #[error("Characteristic not found: {uuid}")]
    CharacteristicNotFound {
        /// The UUID of the characteristic that was not found.
        uuid: String,
    },

    /// The notification-enable write was rejected by the transport.
    #[error("Subscription failed: {reason}")]
    SubscriptionFailed {
        /// Description of why the subscription write was rejected.
        reason: String,
    },

    /// Operation requires a connection but the peripheral is not connected.
    #[error("Not connected")]
    NotConnected,

    /// Invalid data was received from the peripheral.
    #[error("Invalid data received: {context}")]
    InvalidData {
        /// Description of what was invalid about the data.
        context: String,
    },
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
