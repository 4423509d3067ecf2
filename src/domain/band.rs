use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Flood depth classification as published by the flood data producer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepthBand {
    Upto0_15,
    From0_15To0_30,
    From0_30To0_60,
    From0_60To0_90,
    From0_90To1_20,
    Over1_20,
}

impl DepthBand {
    pub const ALL: [DepthBand; 6] = [
        DepthBand::Upto0_15,
        DepthBand::From0_15To0_30,
        DepthBand::From0_30To0_60,
        DepthBand::From0_60To0_90,
        DepthBand::From0_90To1_20,
        DepthBand::Over1_20,
    ];

    /// Exact label used in the flood layer's depth attribute
    pub fn label(self) -> &'static str {
        match self {
            DepthBand::Upto0_15 => "0.00 - 0.15",
            DepthBand::From0_15To0_30 => "0.15 - 0.30",
            DepthBand::From0_30To0_60 => "0.30 - 0.60",
            DepthBand::From0_60To0_90 => "0.60 - 0.90",
            DepthBand::From0_90To1_20 => "0.90 - 1.20",
            DepthBand::Over1_20 => "> 1.20",
        }
    }

    /// Representative depth in meters
    pub fn default_depth(self) -> f64 {
        match self {
            DepthBand::Upto0_15 => 0.15,
            DepthBand::From0_15To0_30 => 0.3,
            DepthBand::From0_30To0_60 => 0.6,
            DepthBand::From0_60To0_90 => 0.9,
            DepthBand::From0_90To1_20 => 1.2,
            DepthBand::Over1_20 => 1.5,
        }
    }
}

impl FromStr for DepthBand {
    type Err = Error;

    /// Exact match only: no trimming, no case folding.
    fn from_str(label: &str) -> Result<Self, Self::Err> {
        DepthBand::ALL
            .into_iter()
            .find(|band| band.label() == label)
            .ok_or_else(|| Error::unknown_band(label))
    }
}

impl fmt::Display for DepthBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Depth assigned to each band, built once per run and handed to the join
#[derive(Debug, Clone, PartialEq)]
pub struct DepthBandTable {
    depths: [f64; 6],
}

impl Default for DepthBandTable {
    fn default() -> Self {
        Self {
            depths: DepthBand::ALL.map(DepthBand::default_depth),
        }
    }
}

impl DepthBandTable {
    /// Build a table from the defaults plus per-label overrides.
    ///
    /// Override keys must be exact band labels.
    pub fn with_overrides(overrides: &HashMap<String, f64>) -> Result<Self, Error> {
        let mut table = Self::default();
        for (label, &depth) in overrides {
            let band: DepthBand = label.parse()?;
            if !depth.is_finite() || depth < 0.0 {
                return Err(Error::Config(format!(
                    "depth for band {label:?} must be a non-negative number, got {depth}"
                )));
            }
            table.set_depth(band, depth);
        }
        Ok(table)
    }

    pub fn set_depth(&mut self, band: DepthBand, depth: f64) {
        self.depths[band as usize] = depth;
    }

    pub fn depth(&self, band: DepthBand) -> f64 {
        self.depths[band as usize]
    }

    /// Resolve a raw label to its depth
    pub fn lookup(&self, label: &str) -> Result<f64, Error> {
        let band: DepthBand = label.parse()?;
        Ok(self.depth(band))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_reference_labels() {
        let table = DepthBandTable::default();
        assert_eq!(table.lookup("0.00 - 0.15").unwrap(), 0.15);
        assert_eq!(table.lookup("0.15 - 0.30").unwrap(), 0.3);
        assert_eq!(table.lookup("0.30 - 0.60").unwrap(), 0.6);
        assert_eq!(table.lookup("0.60 - 0.90").unwrap(), 0.9);
        assert_eq!(table.lookup("0.90 - 1.20").unwrap(), 1.2);
        assert_eq!(table.lookup("> 1.20").unwrap(), 1.5);
    }

    #[test]
    fn test_lookup_rejects_unknown_labels() {
        let table = DepthBandTable::default();
        for label in ["", "0.00-0.15", " > 1.20", "> 1.2", "0.00 - 0.15 ", "none"] {
            match table.lookup(label) {
                Err(Error::UnknownBand { label: l, .. }) => assert_eq!(l, label),
                other => panic!("expected UnknownBand for {label:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_label_round_trips_through_parse() {
        for band in DepthBand::ALL {
            assert_eq!(band.label().parse::<DepthBand>().unwrap(), band);
        }
    }

    #[test]
    fn test_overrides() {
        let mut overrides = HashMap::new();
        overrides.insert("> 1.20".to_string(), 2.0);
        let table = DepthBandTable::with_overrides(&overrides).unwrap();
        assert_eq!(table.depth(DepthBand::Over1_20), 2.0);
        assert_eq!(table.depth(DepthBand::Upto0_15), 0.15);
    }

    #[test]
    fn test_override_unknown_label_fails() {
        let mut overrides = HashMap::new();
        overrides.insert("deep".to_string(), 2.0);
        assert!(matches!(
            DepthBandTable::with_overrides(&overrides),
            Err(Error::UnknownBand { .. })
        ));
    }

    #[test]
    fn test_override_negative_depth_fails() {
        let mut overrides = HashMap::new();
        overrides.insert("0.00 - 0.15".to_string(), -1.0);
        assert!(matches!(
            DepthBandTable::with_overrides(&overrides),
            Err(Error::Config(_))
        ));
    }
}
