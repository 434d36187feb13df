use glam::{DQuat, EulerRot};

use super::{format_numbers, parse_numbers, Converter, DEFAULT_PRECISION};
use crate::Result;

/// Converts rotations to Euler angles `"rx,ry,rz"` in degrees, applied in XYZ order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrientationConverter {
    pub precision: usize,
}

impl Default for OrientationConverter {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
        }
    }
}

impl Converter for OrientationConverter {
    type Value = DQuat;

    fn convert(&self, value: &DQuat) -> Result<String> {
        let (x, y, z) = value.to_euler(EulerRot::XYZ);
        format_numbers(
            &[x.to_degrees(), y.to_degrees(), z.to_degrees()],
            self.precision,
        )
    }

    fn convert_back(&self, text: &str) -> Result<DQuat> {
        let [x, y, z] = parse_numbers::<3>(text)?;
        Ok(DQuat::from_euler(
            EulerRot::XYZ,
            x.to_radians(),
            y.to_radians(),
            z.to_radians(),
        ))
    }
}
