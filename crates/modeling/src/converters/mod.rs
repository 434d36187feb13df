//! Text representations of modeling values.
//!
//! Converters are stateless. Numbers are written with a fixed precision, and `convert_back` of
//! the output of `convert` reproduces the value up to that precision.

mod angle;
mod color;
mod number;
mod orientation;
mod xyz;

pub use angle::AngleConverter;
pub use color::ColorConverter;
pub use number::NumberConverter;
pub use orientation::OrientationConverter;
pub use xyz::XyzConverter;

use crate::{ModelingError, Result};

/// Number of decimal digits written by default.
pub const DEFAULT_PRECISION: usize = 6;

/// Converts a value to text and back.
pub trait Converter {
    type Value;

    /// # Errors
    ///
    /// Returns [`ModelingError::Parse`] if the value has no text representation.
    fn convert(&self, value: &Self::Value) -> Result<String>;

    /// # Errors
    ///
    /// Returns [`ModelingError::Parse`] if `text` is malformed.
    fn convert_back(&self, text: &str) -> Result<Self::Value>;
}

fn format_number(value: f64, precision: usize) -> Result<String> {
    if !value.is_finite() {
        return Err(ModelingError::parse(
            &value.to_string(),
            "the number is not finite",
        ));
    }
    let text = format!("{value:.precision$}");
    // Avoid "-0.000000"
    if text.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        return Ok(text.trim_start_matches('-').to_string());
    }
    Ok(text)
}

fn parse_number(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(_) => Err(ModelingError::parse(text, "the number is not finite")),
        Err(err) => Err(ModelingError::parse(text, err.to_string())),
    }
}

/// Parses exactly `N` comma separated numbers.
fn parse_numbers<const N: usize>(text: &str) -> Result<[f64; N]> {
    let parts: Vec<&str> = text.split(',').collect();
    if parts.len() != N {
        return Err(ModelingError::parse(
            text,
            format!("expected {N} numbers, got {}", parts.len()),
        ));
    }
    let mut numbers = [0.0; N];
    for (number, part) in numbers.iter_mut().zip(parts) {
        *number = parse_number(part).map_err(|_| {
            ModelingError::parse(text, format!("{:?} is not a number", part.trim()))
        })?;
    }
    Ok(numbers)
}

fn format_numbers(values: &[f64], precision: usize) -> Result<String> {
    let parts = values
        .iter()
        .map(|&v| format_number(v, precision))
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join(","))
}
