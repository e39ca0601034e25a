use crate::error::ConfigError;

/// Tuning for the matrix-edge search of each decode attempt
///
/// Factors are fractions of the well size; one value is shared read-only by
/// every task of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodeOptions {
    /// Smallest expected symbol edge, as a fraction of the well's short side
    pub min_edge_factor: f64,
    /// Largest expected symbol edge, as a fraction of the well's long side
    pub max_edge_factor: f64,
    /// Distance between scan lines, as a fraction of the well's long side
    pub scan_gap_factor: f64,
    /// Allowed deviation from a right angle, in degrees
    pub square_deviation: u32,
    /// Minimum edge strength (0-100)
    pub edge_threshold: u32,
    /// Maximum error corrections accepted per symbol
    pub max_corrections: u32,
    /// Scale divisor of the first attempt
    pub shrink: u32,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            min_edge_factor: 0.15,
            max_edge_factor: 0.3,
            scan_gap_factor: 0.1,
            square_deviation: 10,
            edge_threshold: 5,
            max_corrections: 10,
            shrink: 1,
        }
    }
}

impl DecodeOptions {
    /// Check factor ranges and the initial scale.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let factors = [
            ("min_edge_factor", self.min_edge_factor),
            ("max_edge_factor", self.max_edge_factor),
            ("scan_gap_factor", self.scan_gap_factor),
        ];
        for (name, value) in factors {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::FactorOutOfRange { name, value });
            }
        }
        if self.min_edge_factor > self.max_edge_factor {
            return Err(ConfigError::EdgeFactorsInverted {
                min: self.min_edge_factor,
                max: self.max_edge_factor,
            });
        }
        if self.shrink == 0 {
            return Err(ConfigError::ZeroShrink);
        }
        Ok(())
    }
}
