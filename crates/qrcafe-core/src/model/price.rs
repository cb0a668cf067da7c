// Prices travel as decimals on the wire and are held in minor units here so
// arithmetic and comparison stay exact.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Amount in minor currency units (cents).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Round a wire decimal to the nearest minor unit.
    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    pub fn from_decimal(value: f64) -> Self {
        Self((value * 100.0).round() as i64)
    }

    /// Parse user input such as `"3.50"` or `"4"`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (whole, frac) = raw.split_once('.').unwrap_or((raw, ""));
        if whole.is_empty() || frac.len() > 2 || !frac.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let whole: i64 = whole.parse().ok()?;
        if whole < 0 {
            return None;
        }
        let cents: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().ok()? * 10,
            _ => frac.parse().ok()?,
        };
        whole.checked_mul(100)?.checked_add(cents).map(Self)
    }

    pub const fn minor(self) -> i64 {
        self.0
    }

    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn to_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn decimal_round_trip_is_exact_for_cents() {
        assert_eq!(Price::from_decimal(3.5).minor(), 350);
        assert_eq!(Price::from_decimal(0.1 + 0.2).minor(), 30);
        assert_eq!(Price::from_minor(1999).to_string(), "19.99");
    }

    #[test]
    fn parses_user_input() {
        assert_eq!(Price::parse("4").unwrap().minor(), 400);
        assert_eq!(Price::parse("3.5").unwrap().minor(), 350);
        assert_eq!(Price::parse(" 12.05 ").unwrap().minor(), 1205);
        assert!(Price::parse("1.234").is_none());
        assert!(Price::parse("-2").is_none());
        assert!(Price::parse("abc").is_none());
        assert!(Price::parse(".5").is_none());
    }

    #[test]
    fn negative_display() {
        assert_eq!(Price::from_minor(-205).to_string(), "-2.05");
    }
}
