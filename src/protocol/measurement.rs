//! Cycling Power Measurement parsing.
//!
//! Parses notifications from the Cycling Power Measurement characteristic.

use crate::error::{Error, Result};

/// Parsed Cycling Power Measurement notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerMeasurement {
    /// Flags field describing which optional fields are present.
    pub flags: u16,
    /// Instantaneous power in watts.
    pub instantaneous_power: i16,
}

impl PowerMeasurement {
    /// Minimum size of measurement data (flags plus instantaneous power).
    const MIN_SIZE: usize = 4;

    /// Parse a measurement from notification data.
    ///
    /// Per the GATT Cycling Power Measurement characteristic (0x2A63), the
    /// mandatory prefix of the packet is:
    /// - Bytes 0-1: Flags (uint16 little-endian)
    /// - Bytes 2-3: Instantaneous Power (sint16 little-endian, watts)
    ///
    /// Optional fields follow depending on the flags; none are needed here.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < Self::MIN_SIZE {
            return Err(Error::InvalidData {
                context: format!(
                    "Measurement data too short: {} bytes (need at least {})",
                    data.len(),
                    Self::MIN_SIZE
                ),
            });
        }

        let flags = u16::from_le_bytes([data[0], data[1]]);
        let instantaneous_power = i16::from_le_bytes([data[2], data[3]]);

        Ok(Self {
            flags,
            instantaneous_power,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_positive_power() {
        let measurement = PowerMeasurement::parse(&[0x00, 0x00, 0xE8, 0x00]).unwrap();
        assert_eq!(measurement.instantaneous_power, 232);
        assert_eq!(measurement.flags, 0);
    }

    #[test]
    fn test_parse_negative_power() {
        let measurement = PowerMeasurement::parse(&[0x00, 0x00, 0x38, 0xFF]).unwrap();
        assert_eq!(measurement.instantaneous_power, -200);
    }

    #[test]
    fn test_parse_flags() {
        let measurement = PowerMeasurement::parse(&[0x34, 0x12, 0x00, 0x00]).unwrap();
        assert_eq!(measurement.flags, 0x1234);
        assert_eq!(measurement.instantaneous_power, 0);
    }

    #[test]
    fn test_parse_ignores_optional_fields() {
        // Trailing optional fields beyond the mandatory prefix are accepted
        let measurement =
            PowerMeasurement::parse(&[0x20, 0x00, 0x2C, 0x01, 0xAA, 0xBB, 0xCC, 0xDD]).unwrap();
        assert_eq!(measurement.instantaneous_power, 300);
    }

    #[test]
    fn test_parse_too_short() {
        assert!(PowerMeasurement::parse(&[]).is_err());
        assert!(PowerMeasurement::parse(&[0x00]).is_err());
        assert!(PowerMeasurement::parse(&[0x00, 0x00, 0xE8]).is_err());
    }
}
