//! BLE Service, Characteristic, and Descriptor UUIDs.
//!
//! Contains all UUID constants used for Cycling Power communication.

use uuid::Uuid;

// Cycling Power Service (Standard BLE, assigned number 0x1818)
/// Standard BLE Cycling Power Service UUID.
pub const CYCLING_POWER_SERVICE_UUID: Uuid =
    Uuid::from_u128(0x0000_1818_0000_1000_8000_00805f9b34fb);
/// Cycling Power Measurement characteristic UUID (Notify).
pub const CYCLING_POWER_MEASUREMENT_UUID: Uuid =
    Uuid::from_u128(0x0000_2a63_0000_1000_8000_00805f9b34fb);

// Descriptors
/// Client Characteristic Configuration Descriptor UUID.
pub const CCCD_UUID: Uuid = Uuid::from_u128(0x0000_2902_0000_1000_8000_00805f9b34fb);

/// Check if a service UUID is the Cycling Power service.
pub fn is_cycling_power_service(uuid: &Uuid) -> bool {
    *uuid == CYCLING_POWER_SERVICE_UUID
}

/// Check if a characteristic UUID is the Cycling Power Measurement characteristic.
pub fn is_power_measurement_characteristic(uuid: &Uuid) -> bool {
    *uuid == CYCLING_POWER_MEASUREMENT_UUID
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_format() {
        // Verify UUIDs are properly formatted
        let service = CYCLING_POWER_SERVICE_UUID.to_string();
        assert!(service.contains("1818"));

        let measurement = CYCLING_POWER_MEASUREMENT_UUID.to_string();
        assert!(measurement.contains("2a63"));

        let cccd = CCCD_UUID.to_string();
        assert!(cccd.contains("2902"));
    }

    #[test]
    fn test_is_cycling_power_service() {
        assert!(is_cycling_power_service(&CYCLING_POWER_SERVICE_UUID));
        assert!(!is_cycling_power_service(&CCCD_UUID));
    }

    #[test]
    fn test_is_power_measurement_characteristic() {
        assert!(is_power_measurement_characteristic(
            &CYCLING_POWER_MEASUREMENT_UUID
        ));
        assert!(!is_power_measurement_characteristic(
            &CYCLING_POWER_SERVICE_UUID
        ));
    }
}
