use serde::Serialize;
use std::fmt;
use std::ops::Add;

/// A numeric value as it appeared in the report.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(f) => f,
        }
    }
}

impl Default for Number {
    fn default() -> Self {
        Number::Int(0)
    }
}

/// Integers stay exact; mixing with a float or overflowing promotes to float.
impl Add for Number {
    type Output = Number;

    fn add(self, rhs: Number) -> Number {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => match a.checked_add(b) {
                Some(sum) => Number::Int(sum),
                None => Number::Float(a as f64 + b as f64),
            },
            (a, b) => Number::Float(a.as_f64() + b.as_f64()),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{n}"),
            // Keep the decimal point so the value reads back as a float.
            Number::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
            Number::Float(v) => write!(f, "{v}"),
        }
    }
}

/// A single normalized record value.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Int(i64),
    Float(f64),
    Str(String),
}

impl Cell {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Numeric view of the cell. Text counts by its leading number, so values
    /// the cleaner kept as text (`-50`, `150000 Gs`) still count in sums.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Cell::Int(n) => Some(Number::Int(*n)),
            Cell::Float(f) => Some(Number::Float(*f)),
            Cell::Str(s) => leading_number(s).map(Number::Float),
            Cell::Null => None,
        }
    }

    /// Text used for display, searching and exact-match filters. Null is empty.
    pub fn to_text(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Int(n) => Number::Int(*n).to_string(),
            Cell::Float(f) => Number::Float(*f).to_string(),
            Cell::Str(s) => s.clone(),
        }
    }
}

/// Coerces one raw field into a typed cell.
///
/// Empty and `N/A` become null, one pair of surrounding quotes is stripped,
/// digit-only strings become integers and `digits.digits` becomes a float.
/// Anything else, including signed or grouped numbers, stays text.
pub fn clean_value(raw: &str) -> Cell {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "N/A" {
        return Cell::Null;
    }

    let value = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed)
        .trim();
    if value.is_empty() || value == "N/A" {
        return Cell::Null;
    }

    if is_digits(value) {
        // Digit runs too long for i64 fall through to float, then text.
        if let Ok(n) = value.parse::<i64>() {
            return Cell::Int(n);
        }
    }

    if let Some((whole, frac)) = value.split_once('.') {
        if is_digits(whole) && is_digits(frac) {
            if let Ok(f) = value.parse::<f64>() {
                return Cell::Float(f);
            }
        }
    }

    if is_digits(value) {
        if let Ok(f) = value.parse::<f64>() {
            return Cell::Float(f);
        }
    }

    Cell::Str(value.to_string())
}

/// Reads the longest numeric prefix of `s`: optional sign, digits with an
/// optional fraction, and an optional exponent. `1.000.000` reads as `1`.
fn leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if mantissa_digits > 0 || frac_end > end + 1 {
            mantissa_digits += frac_end - end - 1;
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    s[..end].parse::<f64>().ok().filter(|f| f.is_finite())
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nulls() {
        assert_eq!(clean_value(""), Cell::Null);
        assert_eq!(clean_value("   "), Cell::Null);
        assert_eq!(clean_value("N/A"), Cell::Null);
        assert_eq!(clean_value("\"\""), Cell::Null);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(clean_value("42"), Cell::Int(42));
        assert_eq!(clean_value("007"), Cell::Int(7));
        assert_eq!(clean_value("150000.50"), Cell::Float(150000.5));
        assert_eq!(clean_value("\"12\""), Cell::Int(12));
    }

    #[test]
    fn test_non_numeric_stays_text() {
        assert_eq!(clean_value("-5"), Cell::Str("-5".into()));
        assert_eq!(clean_value("1,000"), Cell::Str("1,000".into()));
        assert_eq!(clean_value("1e3"), Cell::Str("1e3".into()));
        assert_eq!(clean_value(".5"), Cell::Str(".5".into()));
        assert_eq!(clean_value("2024-03-01"), Cell::Str("2024-03-01".into()));
        assert_eq!(clean_value(" Sí "), Cell::Str("Sí".into()));
    }

    #[test]
    fn test_number_add() {
        assert_eq!(Number::Int(2) + Number::Int(3), Number::Int(5));
        assert_eq!(Number::Int(2) + Number::Float(0.5), Number::Float(2.5));
        assert_eq!(Number::Int(i64::MAX) + Number::Int(1), Number::Float(i64::MAX as f64 + 1.0));
    }

    #[test]
    fn test_float_display_keeps_point() {
        assert_eq!(Cell::Float(100.0).to_text(), "100.0");
        assert_eq!(clean_value(&Cell::Float(100.0).to_text()), Cell::Float(100.0));
        assert_eq!(Cell::Float(12.25).to_text(), "12.25");
    }

    #[test]
    fn test_as_number() {
        assert_eq!(Cell::Int(5).as_number(), Some(Number::Int(5)));
        assert_eq!(Cell::Str("-50".into()).as_number(), Some(Number::Float(-50.0)));
        assert_eq!(Cell::Str("abc".into()).as_number(), None);
        assert_eq!(Cell::Str("150000 Gs".into()).as_number(), Some(Number::Float(150000.0)));
        assert_eq!(Cell::Str(" 12.5%".into()).as_number(), Some(Number::Float(12.5)));
        assert_eq!(Cell::Str("1.000.000".into()).as_number(), Some(Number::Float(1.0)));
        assert_eq!(Cell::Str("+.5".into()).as_number(), Some(Number::Float(0.5)));
        assert_eq!(Cell::Str("2e3 noches".into()).as_number(), Some(Number::Float(2000.0)));
        assert_eq!(Cell::Str("3e".into()).as_number(), Some(Number::Float(3.0)));
        assert_eq!(Cell::Str("₲ 1.000".into()).as_number(), None);
        assert_eq!(Cell::Str("-".into()).as_number(), None);
        assert_eq!(Cell::Str(".".into()).as_number(), None);
        assert_eq!(Cell::Null.as_number(), None);
    }
}
