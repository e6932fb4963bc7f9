//! Value transforms applied to raw field input

use super::field::FieldValue;

/// Result of running a transform over raw input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transformed {
    /// Normalized value to store
    Value(FieldValue),
    /// Input is not (yet) parseable; store it verbatim so the user can keep typing
    PassThrough,
}

/// Pure normalization of raw field input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueTransform {
    #[default]
    Identity,
    /// Strip surrounding whitespace
    Trim,
    /// Parse as an integer without bounds
    Integer,
    /// Parse as an integer and clamp into `[min, max]`
    ClampInt { min: i64, max: i64 },
}

impl ValueTransform {
    pub fn clamp(min: i64, max: i64) -> Self {
        ValueTransform::ClampInt { min, max }
    }

    pub fn transform(&self, raw: &str) -> Transformed {
        match self {
            ValueTransform::Identity => Transformed::PassThrough,
            ValueTransform::Trim => Transformed::Value(FieldValue::Text(raw.trim().to_string())),
            ValueTransform::Integer => match parse_int(raw) {
                Some(n) => Transformed::Value(FieldValue::Int(n)),
                None => Transformed::PassThrough,
            },
            ValueTransform::ClampInt { min, max } => match parse_int(raw) {
                Some(n) => Transformed::Value(FieldValue::Int(clamp(n, *min, *max))),
                None => Transformed::PassThrough,
            },
        }
    }

    /// Transform `raw` into the value to store
    pub fn apply(&self, raw: &str) -> FieldValue {
        match self.transform(raw) {
            Transformed::Value(value) => value,
            Transformed::PassThrough => FieldValue::Text(raw.to_string()),
        }
    }
}

/// Leading-integer parse: `"10"` and `"10min"` give 10, `""` and `"abc"` give nothing.
fn parse_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let digits_end = trimmed
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    let number = &trimmed[..digits_end];
    if number.is_empty() || number == "-" || number == "+" {
        return None;
    }
    match number.parse::<i64>() {
        Ok(n) => Some(n),
        // too many digits for i64; saturate in the direction of the sign
        Err(_) if number.starts_with('-') => Some(i64::MIN),
        Err(_) => Some(i64::MAX),
    }
}

/// Clamp without panicking when the bounds are inverted
fn clamp(value: i64, min: i64, max: i64) -> i64 {
    if min > max {
        return min;
    }
    value.clamp(min, max)
}
