//! Power zone mapping.
//!
//! Maps wattage to a training zone color as a percentage of the rider's
//! Functional Threshold Power. Pure lookup logic; rendering the resulting
//! color is the consumer's concern.

/// An RGB color, 0-255 per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// All channels off.
    pub const OFF: Rgb = Rgb { r: 0, g: 0, b: 0 };

    /// Create a color from channel values.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// One band of the zone table: a percent-of-FTP range and its color.
///
/// The range is half-open, `min_percent <= p < max_percent`; the last band
/// of a table is treated as open-ended upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneBand {
    /// Lower bound of the band, in percent of FTP.
    pub min_percent: u16,
    /// Upper bound of the band, in percent of FTP.
    pub max_percent: u16,
    /// Color shown while riding in this band.
    pub color: Rgb,
}

impl ZoneBand {
    /// Create a band.
    pub const fn new(min_percent: u16, max_percent: u16, color: Rgb) -> Self {
        Self {
            min_percent,
            max_percent,
            color,
        }
    }
}

/// Reference six-zone table: Recovery, Endurance, Tempo, Threshold,
/// VO2 Max, Anaerobic.
pub const REFERENCE_ZONES: [ZoneBand; 6] = [
    ZoneBand::new(0, 60, Rgb::new(255, 255, 255)),
    ZoneBand::new(60, 76, Rgb::new(0, 0, 255)),
    ZoneBand::new(76, 90, Rgb::new(0, 255, 0)),
    ZoneBand::new(90, 105, Rgb::new(255, 255, 0)),
    ZoneBand::new(105, 119, Rgb::new(255, 165, 0)),
    ZoneBand::new(119, 999, Rgb::new(255, 0, 0)),
];

/// Percent-of-FTP zone table for a given rider.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneTable {
    ftp: u16,
    bands: Vec<ZoneBand>,
}

impl ZoneTable {
    /// Default Functional Threshold Power, in watts.
    pub const DEFAULT_FTP: u16 = 250;

    /// Create a table from custom bands.
    pub fn new(ftp: u16, bands: Vec<ZoneBand>) -> Self {
        Self { ftp, bands }
    }

    /// Create the reference table for a rider's FTP.
    pub fn with_ftp(ftp: u16) -> Self {
        Self::new(ftp, REFERENCE_ZONES.to_vec())
    }

    /// The rider's FTP in watts.
    pub fn ftp(&self) -> u16 {
        self.ftp
    }

    /// The configured bands.
    pub fn bands(&self) -> &[ZoneBand] {
        &self.bands
    }

    /// Find the band a wattage falls in.
    ///
    /// Power at or above the last band's lower bound maps to the last band;
    /// power below every band (negative wattage) maps to none.
    pub fn zone_for_power(&self, watts: i16) -> Option<&ZoneBand> {
        let percent = f64::from(watts) / f64::from(self.ftp) * 100.0;

        for band in &self.bands {
            if f64::from(band.min_percent) <= percent && percent < f64::from(band.max_percent) {
                return Some(band);
            }
        }

        match self.bands.last() {
            Some(last) if percent >= f64::from(last.min_percent) => Some(last),
            _ => None,
        }
    }

    /// The color for a wattage; [`Rgb::OFF`] when no band matches.
    pub fn color_for_power(&self, watts: i16) -> Rgb {
        self.zone_for_power(watts).map_or(Rgb::OFF, |band| band.color)
    }
}

impl Default for ZoneTable {
    fn default() -> Self {
        Self::with_ftp(Self::DEFAULT_FTP)
    }
}
