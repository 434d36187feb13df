use super::{format_number, parse_number, Converter, DEFAULT_PRECISION};
use crate::Result;

/// Converts angles in radians to degrees in text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AngleConverter {
    pub precision: usize,
}

impl Default for AngleConverter {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
        }
    }
}

impl Converter for AngleConverter {
    type Value = f64;

    fn convert(&self, radians: &f64) -> Result<String> {
        format_number(radians.to_degrees(), self.precision)
    }

    fn convert_back(&self, text: &str) -> Result<f64> {
        // A trailing degree sign is accepted
        let text = text.trim().trim_end_matches('°');
        parse_number(text).map(f64::to_radians)
    }
}
