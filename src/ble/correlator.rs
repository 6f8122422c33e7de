//! Transport event correlation.
//!
//! Routes every raw transport event to the session field currently
//! expecting it and silently discards all others. Runs in the transport's
//! delivery context, so all work here is bounded and non-blocking; decoded
//! power samples are handed off through a bounded queue and dropped when
//! the consumer falls behind.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info, trace, warn};

use crate::ble::advertising::decode_local_name;
use crate::ble::session::ConnectionSession;
use crate::ble::transport::{Address, AddressKind, TransportEvent};
use crate::ble::uuids::{is_cycling_power_service, is_power_measurement_characteristic, CCCD_UUID};
use crate::protocol::PowerMeasurement;

/// Demultiplexes transport events against one [`ConnectionSession`].
pub struct EventCorrelator {
    session: Arc<ConnectionSession>,
    sample_tx: mpsc::Sender<i16>,
}

impl EventCorrelator {
    /// Create a correlator feeding decoded samples into `sample_tx`.
    pub(crate) fn new(session: Arc<ConnectionSession>, sample_tx: mpsc::Sender<i16>) -> Self {
        Self { session, sample_tx }
    }

    /// Apply one transport event to the session.
    ///
    /// Events whose address, connection handle, or attribute UUID does not
    /// match what the session currently expects are discarded.
    pub fn handle_event(&self, event: TransportEvent) {
        match event {
            TransportEvent::ScanResult {
                address_kind,
                address,
                adv_data,
            } => self.on_scan_result(address_kind, address, &adv_data),

            TransportEvent::Connected {
                connection_handle,
                address_kind,
                address,
            } => {
                if self.session.on_connected(connection_handle, address_kind, address) {
                    info!("Connected to {} (handle {:#06x})", address, connection_handle);
                } else {
                    trace!("Ignoring connect event for non-target peer {}", address);
                }
            }

            TransportEvent::Disconnected { connection_handle } => {
                if self.session.on_disconnected(connection_handle) {
                    info!("Disconnected (handle {:#06x})", connection_handle);
                } else {
                    trace!(
                        "Ignoring disconnect for stale handle {:#06x}",
                        connection_handle
                    );
                }
            }

            TransportEvent::ServiceResult {
                connection_handle,
                start_handle,
                end_handle,
                uuid,
            } => {
                if is_cycling_power_service(&uuid)
                    && self
                        .session
                        .on_service_result(connection_handle, start_handle, end_handle)
                {
                    debug!(
                        "Cycling Power service at handles {:#06x}..{:#06x}",
                        start_handle, end_handle
                    );
                }
            }

            TransportEvent::CharacteristicResult {
                connection_handle,
                value_handle,
                uuid,
                ..
            } => {
                if is_power_measurement_characteristic(&uuid)
                    && self
                        .session
                        .on_characteristic_result(connection_handle, value_handle)
                {
                    debug!("Power measurement characteristic at handle {:#06x}", value_handle);
                }
            }

            TransportEvent::DescriptorResult {
                connection_handle,
                handle,
                uuid,
            } => {
                if uuid == CCCD_UUID
                    && self.session.on_descriptor_result(connection_handle, handle)
                {
                    debug!("CCCD at handle {:#06x}", handle);
                }
            }

            TransportEvent::Notification {
                connection_handle,
                value_handle,
                data,
            } => self.on_notification(connection_handle, value_handle, &data),
        }
    }

    /// Match an advertisement against the armed scan target.
    fn on_scan_result(&self, kind: AddressKind, address: Address, adv_data: &[u8]) {
        let Some(target) = self.session.scan_target() else {
            return;
        };

        match decode_local_name(adv_data) {
            Some(name) if name == target => {
                if self.session.capture_target(kind, address) {
                    info!("Found target \"{}\" at {}", name, address);
                }
            }
            _ => {}
        }
    }

    /// Decode a correlated notification and enqueue the sample.
    fn on_notification(&self, connection_handle: u16, value_handle: u16, data: &[u8]) {
        if !self.session.matches_notification(connection_handle, value_handle) {
            trace!(
                "Ignoring notification for handle {:#06x} on connection {:#06x}",
                value_handle,
                connection_handle
            );
            return;
        }

        match PowerMeasurement::parse(data) {
            Ok(measurement) => match self.sample_tx.try_send(measurement.instantaneous_power) {
                Ok(()) => {}
                Err(TrySendError::Full(watts)) => {
                    // Consumer is behind; favor radio responsiveness over completeness
                    warn!("Sample queue full, dropping {} W", watts);
                }
                Err(TrySendError::Closed(_)) => {
                    trace!("Sample queue closed, dropping notification");
                }
            },
            Err(e) => {
                // A malformed notification must never stop the stream
                warn!("Failed to decode power measurement: {}", e);
            }
        }
    }
}
