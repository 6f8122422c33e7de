//! Client configuration.
//!
//! Discovery duration varies by peripheral, so every phase timeout is
//! individually tunable. Defaults carry the reference values used against
//! Wahoo KICKR-class trainers.

use std::time::Duration;

/// Tunable parameters for a [`PowerMeterClient`](crate::PowerMeterClient).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClientConfig {
    /// Maximum wait for a matching advertisement.
    pub scan_timeout: Duration,
    /// Maximum wait for the connect event after issuing a connection.
    pub connect_timeout: Duration,
    /// Maximum wait for the service discovery result.
    pub service_timeout: Duration,
    /// Maximum wait for the characteristic discovery result.
    pub characteristic_timeout: Duration,
    /// Maximum wait for the descriptor discovery result before the CCCD
    /// fallback kicks in.
    pub descriptor_timeout: Duration,
    /// Sleep increment of the bounded poll loops.
    pub poll_interval: Duration,
    /// Scan window passed to the transport.
    pub scan_window: Duration,
    /// Scan interval passed to the transport.
    pub scan_interval: Duration,
    /// Scan duration passed to the transport.
    pub scan_duration: Duration,
    /// Capacity of the deferred sample queue; samples are dropped when full.
    pub sample_queue_capacity: usize,
}

impl ClientConfig {
    /// Default scan timeout (10 seconds).
    pub const DEFAULT_SCAN_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default connect timeout (5 seconds).
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
    /// Default discovery timeout for services and characteristics (5 seconds).
    pub const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(5);
    /// Default descriptor discovery timeout (3 seconds).
    pub const DEFAULT_DESCRIPTOR_TIMEOUT: Duration = Duration::from_secs(3);
    /// Default poll increment (100 milliseconds).
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            scan_timeout: Self::DEFAULT_SCAN_TIMEOUT,
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
            service_timeout: Self::DEFAULT_DISCOVERY_TIMEOUT,
            characteristic_timeout: Self::DEFAULT_DISCOVERY_TIMEOUT,
            descriptor_timeout: Self::DEFAULT_DESCRIPTOR_TIMEOUT,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            scan_window: Duration::from_millis(30),
            scan_interval: Duration::from_millis(30),
            scan_duration: Duration::from_secs(10),
            sample_queue_capacity: 32,
        }
    }
}
