//! BLE communication module.
//!
//! This module provides the transport abstraction, session state, and
//! event correlation used to talk to a Cycling Power peripheral.

pub mod advertising;
pub mod correlator;
pub mod session;
pub mod transport;
pub mod uuids;

pub use advertising::decode_local_name;
pub use correlator::EventCorrelator;
pub use session::ConnectionSession;
pub use transport::{Address, AddressKind, EventSink, RadioTransport, TransportEvent};
pub use uuids::*;
