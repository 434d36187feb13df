use super::{format_number, parse_number, Converter, DEFAULT_PRECISION};
use crate::Result;

/// Converts `f64` values with a fixed number of decimal digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberConverter {
    pub precision: usize,
}

impl Default for NumberConverter {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
        }
    }
}

impl Converter for NumberConverter {
    type Value = f64;

    fn convert(&self, value: &f64) -> Result<String> {
        format_number(*value, self.precision)
    }

    fn convert_back(&self, text: &str) -> Result<f64> {
        parse_number(text)
    }
}
