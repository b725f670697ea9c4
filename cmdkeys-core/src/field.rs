//! Numeric field validation and sizing.

use thiserror::Error;

use crate::layout::TextMeasure;

/// Why a delay field's text was rejected.
///
/// Never propagated past the field: it only selects the error colour.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TicksError {
    #[error("empty input")]
    Empty,
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("'{0}' is negative")]
    Negative(String),
    #[error("'{0}' is too large")]
    Overflow(String),
}

/// Parse trimmed `input` as a non-negative tick count
pub fn parse_ticks(input: &str) -> Result<u32, TicksError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(TicksError::Empty);
    }
    match trimmed.parse::<i64>() {
        Ok(n) if n < 0 => Err(TicksError::Negative(trimmed.to_string())),
        Ok(n) => u32::try_from(n).map_err(|_| TicksError::Overflow(trimmed.to_string())),
        Err(_) => {
            let digits = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                if trimmed.starts_with('-') {
                    Err(TicksError::Negative(trimmed.to_string()))
                } else {
                    Err(TicksError::Overflow(trimmed.to_string()))
                }
            } else {
                Err(TicksError::NotANumber(trimmed.to_string()))
            }
        }
    }
}

/// Width a field needs to show `text` plus its cursor pad, never below `min`
pub fn fitted_width(text: &str, pad: &str, min: i32, margin: i32, measure: &dyn TextMeasure) -> i32 {
    min.max(measure.width(text) + measure.width(pad) + margin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::UnicodeMeasure;

    #[test]
    fn test_parse_valid() {
        assert_eq!(parse_ticks("0"), Ok(0));
        assert_eq!(parse_ticks(" 42 "), Ok(42));
        assert_eq!(parse_ticks("+7"), Ok(7));
        assert_eq!(parse_ticks("-0"), Ok(0));
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(parse_ticks(""), Err(TicksError::Empty));
        assert_eq!(parse_ticks("   "), Err(TicksError::Empty));
        assert_eq!(parse_ticks("-3"), Err(TicksError::Negative("-3".into())));
        assert_eq!(parse_ticks("1a"), Err(TicksError::NotANumber("1a".into())));
        assert_eq!(parse_ticks("1.5"), Err(TicksError::NotANumber("1.5".into())));
        assert_eq!(
            parse_ticks("99999999999"),
            Err(TicksError::Overflow("99999999999".into()))
        );
        assert!(matches!(
            parse_ticks("-99999999999999999999999"),
            Err(TicksError::Negative(_))
        ));
    }

    #[test]
    fn test_fitted_width() {
        let m = UnicodeMeasure;
        assert_eq!(fitted_width("5", "_", 4, 2, &m), 4);
        assert_eq!(fitted_width("12345", "_", 4, 2, &m), 8);
    }
}
