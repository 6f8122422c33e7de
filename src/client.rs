//! Power meter client.
//!
//! Drives the scan, connect, GATT discovery, and subscription sequence
//! against a [`RadioTransport`], then streams decoded wattage samples to a
//! registered callback. Each phase issues one transport command and waits,
//! in bounded sleep increments, for the event correlator to populate the
//! session field that phase expects.

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::ble::correlator::EventCorrelator;
use crate::ble::session::ConnectionSession;
use crate::ble::transport::{EventSink, RadioTransport};
use crate::ble::uuids::{CYCLING_POWER_MEASUREMENT_UUID, CYCLING_POWER_SERVICE_UUID};
use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// Callback receiving decoded power samples, in watts.
pub type PowerCallback = Box<dyn Fn(i16) + Send + Sync>;

/// CCCD value enabling notifications (0x0001 little-endian).
const ENABLE_NOTIFICATIONS: [u8; 2] = [0x01, 0x00];

/// BLE central client for a single Cycling Power peripheral.
///
/// Owns the [`ConnectionSession`] for the current attempt and registers the
/// event correlator as the transport's event sink, so all session state is
/// scoped to this instance; independent clients do not interfere.
pub struct PowerMeterClient<T: RadioTransport> {
    /// The platform radio stack.
    transport: Arc<T>,
    /// Session record for the current connection attempt.
    session: Arc<ConnectionSession>,
    /// Phase timeouts and scan parameters.
    config: ClientConfig,
    /// The sole registered consumer of decoded samples.
    power_callback: Arc<RwLock<Option<PowerCallback>>>,
    /// Handle to the sample drain task.
    drain_handle: RwLock<Option<tokio::task::JoinHandle<()>>>,
}

impl<T: RadioTransport> PowerMeterClient<T> {
    /// Create a client bound to a transport.
    ///
    /// Registers this client's correlator as the transport's event sink and
    /// spawns the sample drain task; must be called within a Tokio runtime.
    pub fn new(transport: Arc<T>, config: ClientConfig) -> Self {
        let session = Arc::new(ConnectionSession::new());
        let (sample_tx, sample_rx) = mpsc::channel(config.sample_queue_capacity);

        let correlator = EventCorrelator::new(session.clone(), sample_tx);
        let sink: EventSink = Arc::new(move |event| correlator.handle_event(event));
        transport.set_event_sink(sink);

        let power_callback: Arc<RwLock<Option<PowerCallback>>> = Arc::new(RwLock::new(None));
        let drain_handle = Self::spawn_sample_drain(sample_rx, power_callback.clone());

        Self {
            transport,
            session,
            config,
            power_callback,
            drain_handle: RwLock::new(Some(drain_handle)),
        }
    }

    /// Register the consumer of decoded power samples.
    ///
    /// Replacing the callback discards the previous registration. The
    /// callback runs on the drain task, never in the transport's event
    /// delivery context.
    pub fn set_power_callback<F>(&self, callback: F)
    where
        F: Fn(i16) + Send + Sync + 'static,
    {
        *self.power_callback.write() = Some(Box::new(callback));
    }

    /// Whether a correlated connect event has been seen without a matching
    /// disconnect. Safe to call from any context.
    pub fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    /// Scan for the named peripheral and drive the full pipeline through
    /// subscription.
    ///
    /// Always starts from a fresh session, so the call is idempotent and no
    /// event from a prior attempt can leak into this one. Performs no
    /// internal retries; callers retry uniformly on any error.
    pub async fn scan_and_connect(&self, target_name: &str) -> Result<()> {
        self.session.reset();
        self.session.arm_scan(target_name);

        info!("Scanning for \"{}\"...", target_name);
        self.transport
            .scan(
                self.config.scan_window,
                self.config.scan_interval,
                self.config.scan_duration,
            )
            .await?;

        let Some((kind, address)) = self
            .wait_for(self.config.scan_timeout, || self.session.target_address())
            .await
        else {
            let _ = self.transport.stop_scan().await;
            return Err(Error::TargetNotFound {
                name: target_name.to_owned(),
            });
        };

        if let Err(e) = self.transport.stop_scan().await {
            debug!("Failed to stop scan after match: {}", e);
        }

        info!("Target found at {}. Connecting...", address);
        self.transport.connect(kind, address).await?;

        if self
            .wait_for(self.config.connect_timeout, || {
                self.session.is_connected().then_some(())
            })
            .await
            .is_none()
        {
            return Err(Error::ConnectFailed {
                reason: format!(
                    "no connect event within {:?}",
                    self.config.connect_timeout
                ),
            });
        }
        let conn = self.session.connection_handle().ok_or(Error::NotConnected)?;

        info!("Discovering services...");
        self.transport.discover_services(conn).await?;
        let Some((start_handle, end_handle)) = self
            .wait_for(self.config.service_timeout, || self.session.service_range())
            .await
        else {
            return Err(Error::ServiceNotFound {
                uuid: CYCLING_POWER_SERVICE_UUID.to_string(),
            });
        };

        info!("Discovering characteristics...");
        self.transport
            .discover_characteristics(conn, start_handle, end_handle)
            .await?;
        let Some(value_handle) = self
            .wait_for(self.config.characteristic_timeout, || {
                self.session.value_handle()
            })
            .await
        else {
            return Err(Error::CharacteristicNotFound {
                uuid: CYCLING_POWER_MEASUREMENT_UUID.to_string(),
            });
        };

        info!("Discovering descriptors...");
        self.transport
            .discover_descriptors(conn, value_handle, end_handle)
            .await?;
        let cccd_handle = match self
            .wait_for(self.config.descriptor_timeout, || {
                self.session.cccd_handle()
            })
            .await
        {
            Some(handle) => handle,
            None => {
                // The CCCD commonly sits right after the value attribute;
                // unverified convention, best effort
                let fallback = value_handle + 1;
                warn!("CCCD not found, falling back to handle {:#06x}", fallback);
                self.session.set_cccd_handle(fallback);
                fallback
            }
        };

        debug!(
            "Subscribing on value handle {:#06x} via CCCD {:#06x}",
            value_handle, cccd_handle
        );
        self.transport
            .write_attribute(conn, cccd_handle, &ENABLE_NOTIFICATIONS, true)
            .await
            .map_err(|e| Error::SubscriptionFailed {
                reason: e.to_string(),
            })?;

        info!("Subscribed to power notifications from \"{}\"", target_name);
        Ok(())
    }

    /// Poll `field` in fixed sleep increments until it yields a value or the
    /// deadline passes.
    async fn wait_for<V>(&self, timeout: Duration, field: impl Fn() -> Option<V>) -> Option<V> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(value) = field() {
                return Some(value);
            }
            if Instant::now() >= deadline {
                return None;
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }

    /// Spawn the task that forwards queued samples to the registered
    /// callback, outside the transport's event delivery context.
    fn spawn_sample_drain(
        mut sample_rx: mpsc::Receiver<i16>,
        callback: Arc<RwLock<Option<PowerCallback>>>,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(watts) = sample_rx.recv().await {
                if let Some(cb) = callback.read().as_ref() {
                    cb(watts);
                }
            }
            debug!("Sample drain task ended");
        })
    }
}

impl<T: RadioTransport> Drop for PowerMeterClient<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.drain_handle.write().take() {
            handle.abort();
        }
    }
}
