use std::fmt::Display;

use crate::config::TallyErrors;

/// A percentage between 0 and 100 with exactly two decimals.
///
/// It is stored as a whole number of hundredths of a percent: `6000` is
/// displayed as `60.00`. Conversions from fractions always truncate toward
/// zero, so a result is never displayed higher than it is.
#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
pub struct Percentage(u32);

impl Percentage {
    pub const ZERO: Percentage = Percentage(0);
    pub const FULL: Percentage = Percentage(10_000);

    /// Converts a fraction in [0, 1] to a percentage, truncated at the
    /// hundredths of a percent.
    ///
    /// The truncation works on the decimal digits of the fraction and not on
    /// its binary value: `0.57` becomes `57.00`, even though `0.57 * 100.0`
    /// evaluates to `56.99999999999999` in floating point.
    pub fn from_fraction(fraction: f64) -> Result<Percentage, TallyErrors> {
        if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
            return Err(TallyErrors::InvalidFraction(fraction));
        }
        // Also catches -0.0, which would print with a sign.
        if fraction == 0.0 {
            return Ok(Percentage::ZERO);
        }
        // Shortest representation that reads back to the same value.
        // Display never switches to the exponent notation.
        let repr = fraction.to_string();
        let (whole, decimals) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
        let whole: u32 = whole
            .parse()
            .map_err(|_| TallyErrors::InvalidFraction(fraction))?;
        let mut digits = decimals.chars();
        let mut hundredths = whole * 10_000;
        for scale in [1000, 100, 10, 1] {
            let d = digits.next().and_then(|c| c.to_digit(10)).unwrap_or(0);
            hundredths += d * scale;
        }
        Ok(Percentage(hundredths))
    }

    pub fn hundredths(&self) -> u32 {
        self.0
    }
}

impl Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Renders a fraction in [0, 1] as a percentage truncated to two decimals.
///
/// ```
/// use weighted_tally::format_percentage;
///
/// assert_eq!(format_percentage(0.12345)?, "12.34");
/// assert_eq!(format_percentage(1.0)?, "100.00");
/// assert!(format_percentage(1.1).is_err());
/// # Ok::<(), weighted_tally::TallyErrors>(())
/// ```
pub fn format_percentage(fraction: f64) -> Result<String, TallyErrors> {
    Percentage::from_fraction(fraction).map(|p| p.to_string())
}
