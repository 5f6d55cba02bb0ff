//! Decimal text to scaled-integer conversion.
//!
//! A price such as `"1.50"` is stored as the pair `(150, 2)`: an integer
//! magnitude plus the number of digits that followed the decimal point in
//! the source text. The precision is a property of the text, so `"1.50"`
//! and `"1.5"` convert to different pairs even though they denote the same
//! number.

use crate::domain::error::ConversionError;

/// A decimal value held as `magnitude / 10^places`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScaledDecimal {
    pub magnitude: i64,
    pub places: u32,
}

impl ScaledDecimal {
    pub const ZERO: ScaledDecimal = ScaledDecimal {
        magnitude: 0,
        places: 0,
    };

    pub fn new(magnitude: i64, places: u32) -> Self {
        Self { magnitude, places }
    }
}

/// Convert decimal text into a [`ScaledDecimal`].
///
/// Accepts an optional sign, integer digits, and an optional fractional
/// part (`"5."` and `".5"` are both valid). Exponents and special values
/// such as `inf` are rejected.
pub fn convert(text: &str) -> Result<ScaledDecimal, ConversionError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ConversionError::Empty);
    }

    let places = fractional_places(trimmed).ok_or_else(|| ConversionError::Malformed {
        text: trimmed.to_string(),
    })?;

    let value: f64 = trimmed.parse().map_err(|_| ConversionError::Malformed {
        text: trimmed.to_string(),
    })?;

    let out_of_range = || ConversionError::OutOfRange {
        text: trimmed.to_string(),
    };
    let exponent = i32::try_from(places).map_err(|_| out_of_range())?;
    // Past 308 places 10^p overflows to infinity and 0 * inf is NaN.
    if value == 0.0 {
        return Ok(ScaledDecimal {
            magnitude: 0,
            places: exponent as u32,
        });
    }
    let scaled = (value * 10f64.powi(exponent)).round();
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range.
    if !scaled.is_finite() || scaled >= i64::MAX as f64 || scaled < i64::MIN as f64 {
        return Err(out_of_range());
    }

    Ok(ScaledDecimal {
        magnitude: scaled as i64,
        places: exponent as u32,
    })
}

/// Like [`convert`], but logs a warning and yields [`ScaledDecimal::ZERO`]
/// when the text cannot be converted.
pub fn convert_or_zero(text: &str) -> ScaledDecimal {
    convert(text).unwrap_or_else(|e| {
        tracing::warn!(input = text, error = %e, "numeric conversion failed, using 0");
        ScaledDecimal::ZERO
    })
}

/// Count of digits after the decimal point, or `None` if `text` is not a
/// plain decimal numeral.
fn fractional_places(text: &str) -> Option<usize> {
    let unsigned = text
        .strip_prefix('-')
        .or_else(|| text.strip_prefix('+'))
        .unwrap_or(text);

    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) {
        return None;
    }
    let frac_len = match frac_part {
        Some(f) if all_digits(f) => f.len(),
        Some(_) => return None,
        None => 0,
    };
    if int_part.is_empty() && frac_len == 0 {
        return None;
    }
    Some(frac_len)
}
