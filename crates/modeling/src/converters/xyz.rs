use glam::DVec3;

use super::{format_numbers, parse_numbers, Converter, DEFAULT_PRECISION};
use crate::Result;

/// Converts points and vectors to `"x,y,z"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XyzConverter {
    pub precision: usize,
}

impl Default for XyzConverter {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
        }
    }
}

impl Converter for XyzConverter {
    type Value = DVec3;

    fn convert(&self, value: &DVec3) -> Result<String> {
        format_numbers(&value.to_array(), self.precision)
    }

    fn convert_back(&self, text: &str) -> Result<DVec3> {
        parse_numbers::<3>(text).map(DVec3::from_array)
    }
}
