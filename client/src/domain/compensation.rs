//! Vacancy compensation and its display form.

use std::fmt;

/// Placeholder rendered when a vacancy carries no usable compensation.
pub const COMPENSATION_PLACEHOLDER: &str = "—";

const MAX_FRACTION_DIGITS: usize = 3;

/// Compensation offered by a vacancy.
///
/// A textual range always takes precedence over a numeric amount; the two are
/// never displayed together.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Compensation {
    /// Free-text range such as `"$3.000.000 - $4.000.000"`.
    Range(String),
    /// Numeric point value.
    Amount(f64),
    /// Nothing usable was supplied.
    #[default]
    Unspecified,
}

impl Compensation {
    /// Resolve compensation from the raw wire fields.
    ///
    /// Blank ranges are ignored and non-finite amounts are treated as absent.
    pub fn from_parts(range: Option<String>, amount: Option<f64>) -> Self {
        if let Some(range) = range.filter(|r| !r.trim().is_empty()) {
            return Self::Range(range);
        }
        match amount {
            Some(value) if value.is_finite() => Self::Amount(value),
            _ => Self::Unspecified,
        }
    }
}

impl fmt::Display for Compensation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Range(range) => f.write_str(range),
            Self::Amount(value) => write!(f, "${}", group_thousands(*value)),
            Self::Unspecified => f.write_str(COMPENSATION_PLACEHOLDER),
        }
    }
}

/// Render `value` with `,` thousands separators and at most three fraction
/// digits, trailing zeros trimmed.
fn group_thousands(value: f64) -> String {
    let rendered = format!("{:.*}", MAX_FRACTION_DIGITS, value.abs());
    let (whole, fraction) = rendered
        .split_once('.')
        .unwrap_or((rendered.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let is_zero = whole.chars().all(|c| c == '0') && fraction.is_empty();
    let sign = if value.is_sign_negative() && !is_zero {
        "-"
    } else {
        ""
    };
    if fraction.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{fraction}")
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1_500_000.0, "$1,500,000")]
    #[case(0.0, "$0")]
    #[case(999.0, "$999")]
    #[case(1_000.0, "$1,000")]
    #[case(1_234.5, "$1,234.5")]
    #[case(2_500.125, "$2,500.125")]
    #[case(3.14159, "$3.142")]
    #[case(-1_500.0, "$-1,500")]
    #[case(-0.0001, "$0")]
    fn formats_amounts_with_grouping(#[case] amount: f64, #[case] expected: &str) {
        assert_eq!(Compensation::Amount(amount).to_string(), expected);
    }

    #[test]
    fn textual_range_wins_over_amount() {
        let compensation = Compensation::from_parts(Some("3M - 4M COP".to_owned()), Some(1.0));
        assert_eq!(compensation.to_string(), "3M - 4M COP");
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some("   ".to_owned()), None)]
    #[case(None, Some(f64::NAN))]
    #[case(None, Some(f64::INFINITY))]
    fn unusable_parts_render_the_placeholder(
        #[case] range: Option<String>,
        #[case] amount: Option<f64>,
    ) {
        let compensation = Compensation::from_parts(range, amount);
        assert_eq!(compensation, Compensation::Unspecified);
        assert_eq!(compensation.to_string(), COMPENSATION_PLACEHOLDER);
    }

    #[test]
    fn blank_range_falls_back_to_amount() {
        let compensation = Compensation::from_parts(Some(String::new()), Some(42_000.0));
        assert_eq!(compensation.to_string(), "$42,000");
    }
}
