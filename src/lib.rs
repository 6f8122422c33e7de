// Allow unusual byte groupings for UUIDs which have standard format
#![allow(clippy::unusual_byte_groupings)]

//! # cycling-power-ble
//!
//! A Rust library for receiving live wattage from Bluetooth Low Energy
//! Cycling Power peripherals (smart trainers and power meters).
//!
//! The crate drives the full central-side pipeline against a
//! [`RadioTransport`] implementation: scan for the named trainer, connect,
//! discover the Cycling Power service (0x1818) and its measurement
//! characteristic (0x2A63), enable notifications through the CCCD, then
//! decode each notification into a signed wattage handed to a registered
//! callback.
//!
//! ## Features
//!
//! - **Name-filtered scanning**: match the trainer by its advertised name
//! - **Bounded discovery**: every phase has its own configurable timeout
//! - **Stale-event rejection**: events from abandoned attempts cannot
//!   corrupt the active session
//! - **CCCD fallback**: peripherals that hide their descriptors still get
//!   subscribed via the conventional `value_handle + 1` layout
//! - **Backpressure by dropping**: a slow consumer loses samples instead of
//!   stalling the radio stack
//! - **Power zones**: map wattage to percent-of-FTP training zone colors
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cycling_power_ble::{ClientConfig, PowerMeterClient, RadioTransport, Result};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! async fn run(transport: Arc<impl RadioTransport>) -> Result<()> {
//!     let client = PowerMeterClient::new(transport, ClientConfig::default());
//!     client.set_power_callback(|watts| println!("{watts} W"));
//!
//!     // Retry until the trainer is awake and advertising
//!     while client.scan_and_connect("KICKR CORE 5D21").await.is_err() {
//!         tokio::time::sleep(Duration::from_secs(5)).await;
//!     }
//!
//!     // Watch for mid-session disconnects and reconnect
//!     loop {
//!         if !client.is_connected() {
//!             let _ = client.scan_and_connect("KICKR CORE 5D21").await;
//!         }
//!         tokio::time::sleep(Duration::from_secs(1)).await;
//!     }
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for config and zone types

// Public modules
pub mod ble;
pub mod client;
pub mod config;
pub mod error;
pub mod protocol;
pub mod zones;

// Re-exports for convenience
pub use client::{PowerCallback, PowerMeterClient};
pub use config::ClientConfig;
pub use error::{Error, Result};

// Re-export commonly used types from submodules
pub use ble::session::ConnectionSession;
pub use ble::transport::{Address, AddressKind, EventSink, RadioTransport, TransportEvent};
pub use ble::uuids::{CCCD_UUID, CYCLING_POWER_MEASUREMENT_UUID, CYCLING_POWER_SERVICE_UUID};
pub use protocol::PowerMeasurement;
pub use zones::{Rgb, ZoneBand, ZoneTable};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_exports() {
        // Verify that key types are exported
        let _ = std::any::TypeId::of::<Error>();
        let _ = std::any::TypeId::of::<ClientConfig>();
        let _ = std::any::TypeId::of::<ConnectionSession>();
        let _ = std::any::TypeId::of::<TransportEvent>();
        let _ = std::any::TypeId::of::<PowerMeasurement>();
        let _ = std::any::TypeId::of::<ZoneTable>();
    }

    #[test]
    fn test_zone_color_for_decoded_power() {
        let table = ZoneTable::default();
        let measurement = PowerMeasurement::parse(&[0x00, 0x00, 0xE8, 0x00]).unwrap();
        assert_eq!(
            table.color_for_power(measurement.instantaneous_power),
            Rgb::new(255, 255, 0)
        );
    }
}
