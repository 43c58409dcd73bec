use std::fmt;
use std::sync::Arc;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

pub type ValueFormatterFn = Arc<dyn Fn(f64) -> String + Send + Sync + 'static>;

/// Text emitted when a value cannot be represented.
pub const UNAVAILABLE_VALUE: &str = "N/D";

/// Locale used for grouping/decimal separators and currency placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NumberLocale {
    #[default]
    EnUs,
    EsEs,
}

impl NumberLocale {
    fn separators(self) -> (char, char) {
        match self {
            Self::EnUs => (',', '.'),
            Self::EsEs => ('.', ','),
        }
    }
}

/// Converts a numeric value into display text.
///
/// Formatting never fails: non-finite or out-of-range values produce
/// [`UNAVAILABLE_VALUE`].
#[derive(Clone)]
pub enum Formatter {
    /// At most `max_fraction_digits` decimals, trailing zeros trimmed.
    Decimal {
        max_fraction_digits: u8,
        locale: NumberLocale,
    },
    /// Input is already on the 0-100 scale.
    Percent {
        max_fraction_digits: u8,
        locale: NumberLocale,
    },
    /// Two fixed decimals with the locale's currency symbol.
    Currency { locale: NumberLocale },
    /// Decimal text followed by a constant suffix.
    Suffix {
        max_fraction_digits: u8,
        suffix: String,
        locale: NumberLocale,
    },
    Custom(ValueFormatterFn),
}

impl Formatter {
    #[must_use]
    pub fn decimal(max_fraction_digits: u8) -> Self {
        Self::Decimal {
            max_fraction_digits,
            locale: NumberLocale::EnUs,
        }
    }

    #[must_use]
    pub fn percent() -> Self {
        Self::Percent {
            max_fraction_digits: 2,
            locale: NumberLocale::EnUs,
        }
    }

    #[must_use]
    pub fn currency(locale: NumberLocale) -> Self {
        Self::Currency { locale }
    }

    #[must_use]
    pub fn suffix(max_fraction_digits: u8, suffix: impl Into<String>) -> Self {
        Self::Suffix {
            max_fraction_digits,
            suffix: suffix.into(),
            locale: NumberLocale::EnUs,
        }
    }

    #[must_use]
    pub fn custom(formatter: impl Fn(f64) -> String + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(formatter))
    }

    /// Returns a copy using `locale` for separators. Custom formatters are unchanged.
    #[must_use]
    pub fn with_locale(self, locale: NumberLocale) -> Self {
        match self {
            Self::Decimal {
                max_fraction_digits,
                ..
            } => Self::Decimal {
                max_fraction_digits,
                locale,
            },
            Self::Percent {
                max_fraction_digits,
                ..
            } => Self::Percent {
                max_fraction_digits,
                locale,
            },
            Self::Currency { .. } => Self::Currency { locale },
            Self::Suffix {
                max_fraction_digits,
                suffix,
                ..
            } => Self::Suffix {
                max_fraction_digits,
                suffix,
                locale,
            },
            Self::Custom(formatter) => Self::Custom(formatter),
        }
    }

    #[must_use]
    pub fn format(&self, value: f64) -> String {
        match self {
            Self::Decimal {
                max_fraction_digits,
                locale,
            } => format_decimal(value, *max_fraction_digits, false, *locale)
                .unwrap_or_else(unavailable),
            Self::Percent {
                max_fraction_digits,
                locale,
            } => format_decimal(value, *max_fraction_digits, false, *locale)
                .map(|text| match locale {
                    NumberLocale::EnUs => format!("{text}%"),
                    NumberLocale::EsEs => format!("{text} %"),
                })
                .unwrap_or_else(unavailable),
            Self::Currency { locale } => format_decimal(value.abs(), 2, true, *locale)
                .map(|text| {
                    let sign = if value < 0.0 { "-" } else { "" };
                    match locale {
                        NumberLocale::EnUs => format!("{sign}${text}"),
                        NumberLocale::EsEs => format!("{sign}{text} €"),
                    }
                })
                .unwrap_or_else(unavailable),
            Self::Suffix {
                max_fraction_digits,
                suffix,
                locale,
            } => format_decimal(value, *max_fraction_digits, false, *locale)
                .map(|text| format!("{text}{suffix}"))
                .unwrap_or_else(unavailable),
            Self::Custom(formatter) => {
                if value.is_finite() {
                    formatter(value)
                } else {
                    unavailable()
                }
            }
        }
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::decimal(2)
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decimal {
                max_fraction_digits,
                locale,
            } => f
                .debug_struct("Decimal")
                .field("max_fraction_digits", max_fraction_digits)
                .field("locale", locale)
                .finish(),
            Self::Percent {
                max_fraction_digits,
                locale,
            } => f
                .debug_struct("Percent")
                .field("max_fraction_digits", max_fraction_digits)
                .field("locale", locale)
                .finish(),
            Self::Currency { locale } => {
                f.debug_struct("Currency").field("locale", locale).finish()
            }
            Self::Suffix {
                max_fraction_digits,
                suffix,
                locale,
            } => f
                .debug_struct("Suffix")
                .field("max_fraction_digits", max_fraction_digits)
                .field("suffix", suffix)
                .field("locale", locale)
                .finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

fn unavailable() -> String {
    UNAVAILABLE_VALUE.to_owned()
}

fn format_decimal(
    value: f64,
    fraction_digits: u8,
    keep_trailing_zeros: bool,
    locale: NumberLocale,
) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    let decimal = Decimal::from_f64(value)?;
    let mut rounded = decimal.round_dp_with_strategy(
        u32::from(fraction_digits),
        RoundingStrategy::MidpointAwayFromZero,
    );
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    if keep_trailing_zeros {
        rounded.rescale(u32::from(fraction_digits));
    } else {
        rounded = rounded.normalize();
    }

    let raw = rounded.to_string();
    let (negative, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.as_str()),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let (group_separator, decimal_separator) = locale.separators();
    let mut text = String::with_capacity(raw.len() + integer.len() / 3 + 1);
    if negative {
        text.push('-');
    }
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            text.push(group_separator);
        }
        text.push(digit);
    }
    if let Some(fraction) = fraction {
        text.push(decimal_separator);
        text.push_str(fraction);
    }
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::{Formatter, NumberLocale, UNAVAILABLE_VALUE};

    #[test]
    fn decimal_trims_trailing_zeros_and_groups_thousands() {
        let formatter = Formatter::decimal(2);
        assert_eq!(formatter.format(51.666_666), "51.67");
        assert_eq!(formatter.format(70.0), "70");
        assert_eq!(formatter.format(1_234_567.5), "1,234,567.5");
        assert_eq!(formatter.format(-0.001), "0");
    }

    #[test]
    fn non_finite_values_fall_back_to_placeholder() {
        assert_eq!(Formatter::decimal(2).format(f64::NAN), UNAVAILABLE_VALUE);
        assert_eq!(Formatter::percent().format(f64::INFINITY), UNAVAILABLE_VALUE);
        assert_eq!(
            Formatter::custom(|v| v.to_string()).format(f64::NEG_INFINITY),
            UNAVAILABLE_VALUE
        );
    }

    #[test]
    fn spanish_locale_swaps_separators() {
        let formatter = Formatter::decimal(1).with_locale(NumberLocale::EsEs);
        assert_eq!(formatter.format(1234.56), "1.234,6");
    }
}
