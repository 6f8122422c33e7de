//! Radio transport abstraction.
//!
//! The platform BLE stack is modeled as a command API plus an event sink.
//! Commands are submitted asynchronously and complete out of band through
//! [`TransportEvent`]s delivered to the registered [`EventSink`]; a command
//! returning `Err` is a submission-level rejection, not a completion result.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::error::Result;

/// A 48-bit Bluetooth device address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Address(pub [u8; 6]);

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

/// Address kind as reported alongside advertising packets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AddressKind {
    /// Public device address.
    #[default]
    Public,
    /// Random device address.
    Random,
}

/// An asynchronous event delivered by the radio stack.
///
/// Events carry the identity of the connection (and attribute, where
/// applicable) they belong to; correlation against the active session is the
/// receiver's job.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// An advertisement was observed while scanning.
    ScanResult {
        /// Address kind of the advertiser.
        address_kind: AddressKind,
        /// Address of the advertiser.
        address: Address,
        /// Raw advertisement payload (AD structures).
        adv_data: Vec<u8>,
    },
    /// A connection to a peripheral completed.
    Connected {
        /// Handle assigned to the new connection.
        connection_handle: u16,
        /// Address kind of the peer.
        address_kind: AddressKind,
        /// Address of the peer.
        address: Address,
    },
    /// A connection was terminated.
    Disconnected {
        /// Handle of the terminated connection.
        connection_handle: u16,
    },
    /// Service discovery reported one service.
    ServiceResult {
        /// Connection the result belongs to.
        connection_handle: u16,
        /// First attribute handle of the service.
        start_handle: u16,
        /// Last attribute handle of the service.
        end_handle: u16,
        /// UUID of the service.
        uuid: Uuid,
    },
    /// Characteristic discovery reported one characteristic.
    CharacteristicResult {
        /// Connection the result belongs to.
        connection_handle: u16,
        /// Handle of the characteristic declaration.
        declaration_handle: u16,
        /// Handle of the characteristic value attribute.
        value_handle: u16,
        /// UUID of the characteristic.
        uuid: Uuid,
    },
    /// Descriptor discovery reported one descriptor.
    DescriptorResult {
        /// Connection the result belongs to.
        connection_handle: u16,
        /// Handle of the descriptor attribute.
        handle: u16,
        /// UUID of the descriptor.
        uuid: Uuid,
    },
    /// The peripheral pushed a characteristic value.
    Notification {
        /// Connection the notification belongs to.
        connection_handle: u16,
        /// Value handle of the notifying characteristic.
        value_handle: u16,
        /// Notification payload.
        data: Vec<u8>,
    },
}

/// Callback receiving every transport event.
///
/// Invoked from the transport's own delivery context, which may be
/// interrupt-like; implementations must do only bounded, non-blocking work.
pub type EventSink = Arc<dyn Fn(TransportEvent) + Send + Sync>;

/// Command interface of the platform BLE stack.
///
/// Implementations submit radio operations and report their completion
/// through the sink registered with [`set_event_sink`](Self::set_event_sink).
#[async_trait]
pub trait RadioTransport: Send + Sync {
    /// Register the callback that receives all transport events.
    ///
    /// Replacing the sink discards the previous registration.
    fn set_event_sink(&self, sink: EventSink);

    /// Start a time-boxed scan with the given window and interval.
    async fn scan(&self, window: Duration, interval: Duration, duration: Duration) -> Result<()>;

    /// Stop an in-progress scan.
    async fn stop_scan(&self) -> Result<()>;

    /// Initiate a connection to the given peer.
    async fn connect(&self, address_kind: AddressKind, address: Address) -> Result<()>;

    /// Discover all primary services on a connection.
    async fn discover_services(&self, connection_handle: u16) -> Result<()>;

    /// Discover characteristics within an attribute handle range.
    async fn discover_characteristics(
        &self,
        connection_handle: u16,
        start_handle: u16,
        end_handle: u16,
    ) -> Result<()>;

    /// Discover descriptors within an attribute handle range.
    async fn discover_descriptors(
        &self,
        connection_handle: u16,
        start_handle: u16,
        end_handle: u16,
    ) -> Result<()>;

    /// Write a value to an attribute.
    async fn write_attribute(
        &self,
        connection_handle: u16,
        handle: u16,
        value: &[u8],
        with_response: bool,
    ) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_display() {
        let addr = Address([0xAA, 0xBB, 0x0C, 0x1D, 0x2E, 0x3F]);
        assert_eq!(addr.to_string(), "AA:BB:0C:1D:2E:3F");
    }

    #[test]
    fn test_transport_event_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<TransportEvent>();
    }
}
