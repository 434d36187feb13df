use super::Converter;
use crate::{ModelingError, Result};

/// Converts RGB colors to `"#rrggbb"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorConverter;

impl Converter for ColorConverter {
    type Value = [u8; 3];

    fn convert(&self, [r, g, b]: &[u8; 3]) -> Result<String> {
        Ok(format!("#{r:02x}{g:02x}{b:02x}"))
    }

    fn convert_back(&self, text: &str) -> Result<[u8; 3]> {
        let hex = text
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| ModelingError::parse(text, "a color starts with '#'"))?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ModelingError::parse(text, "expected 6 hex digits"));
        }
        let mut rgb = [0; 3];
        for (i, channel) in rgb.iter_mut().enumerate() {
            *channel = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
                .map_err(|err| ModelingError::parse(text, err.to_string()))?;
        }
        Ok(rgb)
    }
}
