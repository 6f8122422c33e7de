//! Connection session state.
//!
//! One [`ConnectionSession`] records everything discovered during a single
//! connection attempt. It is mutated only by the event correlator in
//! response to transport events and read (or reset) by the discovery state
//! machine, possibly from a different execution context.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::ble::transport::{Address, AddressKind};

/// Handle-bearing fields of a session, guarded together.
#[derive(Debug, Default)]
struct SessionFields {
    /// Armed one-shot scan matcher: the advertised name being searched for.
    scan_target: Option<String>,
    /// Identity of the peripheral being pursued, captured from a scan match.
    target: Option<(AddressKind, Address)>,
    /// Connection handle assigned by the transport.
    connection_handle: Option<u16>,
    /// Attribute handle range of the Cycling Power service.
    service_range: Option<(u16, u16)>,
    /// Value handle of the power measurement characteristic.
    value_handle: Option<u16>,
    /// Handle of the client characteristic configuration descriptor.
    cccd_handle: Option<u16>,
}

/// Mutable record of one connection attempt.
///
/// Every mutator enforces identity correlation: an event is applied only if
/// its address or connection handle matches the session's current target, so
/// stray events from an abandoned attempt cannot populate a fresh session.
#[derive(Debug, Default)]
pub struct ConnectionSession {
    connected: AtomicBool,
    inner: RwLock<SessionFields>,
}

impl ConnectionSession {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear every field back to the empty state.
    ///
    /// Called at the start of every connection attempt; afterwards no event
    /// correlated to a prior attempt can match this session.
    pub fn reset(&self) {
        let mut inner = self.inner.write();
        *inner = SessionFields::default();
        self.connected.store(false, Ordering::SeqCst);
    }

    /// Arm the one-shot scan matcher with a target name.
    pub(crate) fn arm_scan(&self, target_name: &str) {
        self.inner.write().scan_target = Some(target_name.to_owned());
    }

    /// The currently armed scan target name, if any.
    pub(crate) fn scan_target(&self) -> Option<String> {
        self.inner.read().scan_target.clone()
    }

    /// Capture the target identity from a matching scan result.
    ///
    /// Fire-once: the scan matcher is cleared so further advertisements are
    /// ignored. Returns false if no matcher was armed.
    pub(crate) fn capture_target(&self, kind: AddressKind, address: Address) -> bool {
        let mut inner = self.inner.write();
        if inner.scan_target.is_none() {
            return false;
        }
        inner.scan_target = None;
        inner.target = Some((kind, address));
        true
    }

    /// Identity of the peripheral being pursued.
    pub fn target_address(&self) -> Option<(AddressKind, Address)> {
        self.inner.read().target
    }

    /// Apply a connect event. Accepted only if the peer matches the target.
    pub(crate) fn on_connected(&self, handle: u16, kind: AddressKind, address: Address) -> bool {
        let mut inner = self.inner.write();
        if inner.target != Some((kind, address)) {
            return false;
        }
        inner.connection_handle = Some(handle);
        self.connected.store(true, Ordering::SeqCst);
        true
    }

    /// Apply a disconnect event. Accepted only for the current handle.
    ///
    /// Clears the connection handle and the connected flag; discovered
    /// attribute handles are left intact.
    pub(crate) fn on_disconnected(&self, handle: u16) -> bool {
        let mut inner = self.inner.write();
        if inner.connection_handle != Some(handle) {
            return false;
        }
        inner.connection_handle = None;
        self.connected.store(false, Ordering::SeqCst);
        true
    }

    /// Record the service handle range for a correlated service result.
    pub(crate) fn on_service_result(&self, handle: u16, start: u16, end: u16) -> bool {
        let mut inner = self.inner.write();
        if inner.connection_handle != Some(handle) {
            return false;
        }
        inner.service_range = Some((start, end));
        true
    }

    /// Record the value handle for a correlated characteristic result.
    pub(crate) fn on_characteristic_result(&self, handle: u16, value_handle: u16) -> bool {
        let mut inner = self.inner.write();
        if inner.connection_handle != Some(handle) {
            return false;
        }
        inner.value_handle = Some(value_handle);
        true
    }

    /// Record the CCCD handle for a correlated descriptor result.
    pub(crate) fn on_descriptor_result(&self, handle: u16, descriptor_handle: u16) -> bool {
        let mut inner = self.inner.write();
        if inner.connection_handle != Some(handle) {
            return false;
        }
        inner.cccd_handle = Some(descriptor_handle);
        true
    }

    /// Set the CCCD handle directly (descriptor-discovery fallback).
    pub(crate) fn set_cccd_handle(&self, handle: u16) {
        self.inner.write().cccd_handle = Some(handle);
    }

    /// Check whether a notification belongs to this session's subscription.
    pub(crate) fn matches_notification(&self, handle: u16, value_handle: u16) -> bool {
        let inner = self.inner.read();
        inner.connection_handle == Some(handle) && inner.value_handle == Some(value_handle)
    }

    /// The transport-assigned connection handle, if connected.
    pub fn connection_handle(&self) -> Option<u16> {
        self.inner.read().connection_handle
    }

    /// The discovered service handle range.
    pub fn service_range(&self) -> Option<(u16, u16)> {
        self.inner.read().service_range
    }

    /// The discovered measurement value handle.
    pub fn value_handle(&self) -> Option<u16> {
        self.inner.read().value_handle
    }

    /// The CCCD handle, discovered or synthesized.
    pub fn cccd_handle(&self) -> Option<u16> {
        self.inner.read().cccd_handle
    }

    /// Whether a correlated connect event has been seen without a matching
    /// disconnect. Plain atomic read, safe from any context.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
