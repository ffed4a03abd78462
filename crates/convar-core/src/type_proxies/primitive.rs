//! Built-in proxies for primitive types, strings and date/times

use super::TypeProxy;
use crate::format::FormatProvider;
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use rust_decimal::Decimal;
use std::marker::PhantomData;
use std::str::FromStr;

/// Accepts `true`/`false` in any case, formats lowercase
#[derive(Debug, Default, Clone, Copy)]
pub struct BoolTypeProxy;

impl TypeProxy<bool> for BoolTypeProxy {
    fn try_parse(&self, text: &str, _provider: &FormatProvider) -> Option<bool> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("true") {
            Some(true)
        } else if text.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }

    fn format(&self, value: &bool, _provider: &FormatProvider) -> String {
        value.to_string()
    }

    fn equals(&self, a: &bool, b: &bool) -> bool {
        a == b
    }
}

/// Requires exactly one character
#[derive(Debug, Default, Clone, Copy)]
pub struct CharTypeProxy;

impl TypeProxy<char> for CharTypeProxy {
    fn try_parse(&self, text: &str, _provider: &FormatProvider) -> Option<char> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }

    fn format(&self, value: &char, _provider: &FormatProvider) -> String {
        value.to_string()
    }

    fn equals(&self, a: &char, b: &char) -> bool {
        a == b
    }
}

/// Signed and unsigned integers, parsed after trimming
#[derive(Debug, Clone, Copy)]
pub struct IntegerTypeProxy<T>(PhantomData<fn() -> T>);

impl<T> Default for IntegerTypeProxy<T> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

macro_rules! integer_type_proxy {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl TypeProxy<$ty> for IntegerTypeProxy<$ty> {
                fn try_parse(&self, text: &str, _provider: &FormatProvider) -> Option<$ty> {
                    <$ty>::from_str(text.trim()).ok()
                }

                fn format(&self, value: &$ty, _provider: &FormatProvider) -> String {
                    value.to_string()
                }

                fn equals(&self, a: &$ty, b: &$ty) -> bool {
                    a == b
                }
            }
        )+
    };
}

integer_type_proxy!(i8, i16, i32, i64, u8, u16, u32, u64);

/// Floating point numbers in the provider's number format
///
/// NaN compares equal to NaN so that assigning NaN twice is not a change.
#[derive(Debug, Clone, Copy)]
pub struct FloatTypeProxy<T>(PhantomData<fn() -> T>);

impl<T> Default for FloatTypeProxy<T> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

macro_rules! float_type_proxy {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl TypeProxy<$ty> for FloatTypeProxy<$ty> {
                fn try_parse(&self, text: &str, provider: &FormatProvider) -> Option<$ty> {
                    <$ty>::from_str(&provider.normalize_number(text)).ok()
                }

                fn format(&self, value: &$ty, provider: &FormatProvider) -> String {
                    provider.localize_number(value.to_string())
                }

                fn equals(&self, a: &$ty, b: &$ty) -> bool {
                    a == b || (a.is_nan() && b.is_nan())
                }
            }
        )+
    };
}

float_type_proxy!(f32, f64);

/// Fixed-point decimals in the provider's number format
///
/// Accepts a sign, group separators and the decimal separator. The scale of
/// the input is kept; `1.0` and `1.00` still compare equal.
#[derive(Debug, Default, Clone, Copy)]
pub struct DecimalTypeProxy;

impl TypeProxy<Decimal> for DecimalTypeProxy {
    fn try_parse(&self, text: &str, provider: &FormatProvider) -> Option<Decimal> {
        Decimal::from_str(&provider.normalize_number(text)).ok()
    }

    fn format(&self, value: &Decimal, provider: &FormatProvider) -> String {
        provider.localize_number(value.to_string())
    }

    fn equals(&self, a: &Decimal, b: &Decimal) -> bool {
        a == b
    }
}

/// Accepts any text verbatim
#[derive(Debug, Default, Clone, Copy)]
pub struct StringTypeProxy;

impl TypeProxy<String> for StringTypeProxy {
    fn try_parse(&self, text: &str, _provider: &FormatProvider) -> Option<String> {
        Some(text.to_string())
    }

    fn format(&self, value: &String, _provider: &FormatProvider) -> String {
        value.clone()
    }

    fn equals(&self, a: &String, b: &String) -> bool {
        a == b
    }
}

const DATE_TIME_FALLBACK_FORMATS: [&str; 3] =
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// Date/times without an offset, in the provider's format
#[derive(Debug, Default, Clone, Copy)]
pub struct NaiveDateTimeTypeProxy;

impl TypeProxy<NaiveDateTime> for NaiveDateTimeTypeProxy {
    fn try_parse(&self, text: &str, provider: &FormatProvider) -> Option<NaiveDateTime> {
        let text = text.trim();
        std::iter::once(provider.date_time_format.as_str())
            .chain(DATE_TIME_FALLBACK_FORMATS)
            .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
    }

    fn format(&self, value: &NaiveDateTime, provider: &FormatProvider) -> String {
        value.format(&provider.date_time_format).to_string()
    }

    fn equals(&self, a: &NaiveDateTime, b: &NaiveDateTime) -> bool {
        a == b
    }
}

/// Date/times with a UTC offset, as RFC 3339
#[derive(Debug, Default, Clone, Copy)]
pub struct DateTimeOffsetTypeProxy;

impl TypeProxy<DateTime<FixedOffset>> for DateTimeOffsetTypeProxy {
    fn try_parse(&self, text: &str, _provider: &FormatProvider) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(text.trim()).ok()
    }

    fn format(&self, value: &DateTime<FixedOffset>, _provider: &FormatProvider) -> String {
        value.to_rfc3339()
    }

    fn equals(&self, a: &DateTime<FixedOffset>, b: &DateTime<FixedOffset>) -> bool {
        a == b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> FormatProvider {
        FormatProvider::default()
    }

    #[test]
    fn test_bool_is_case_insensitive() {
        let proxy = BoolTypeProxy;
        assert_eq!(proxy.try_parse("TRUE", &provider()), Some(true));
        assert_eq!(proxy.try_parse(" False ", &provider()), Some(false));
        assert_eq!(proxy.try_parse("1", &provider()), None);
        assert_eq!(proxy.format(&true, &provider()), "true");
    }

    #[test]
    fn test_char_requires_exactly_one() {
        let proxy = CharTypeProxy;
        assert_eq!(proxy.try_parse("x", &provider()), Some('x'));
        assert_eq!(proxy.try_parse("", &provider()), None);
        assert_eq!(proxy.try_parse("xy", &provider()), None);
    }

    #[test]
    fn test_integer_range_and_sign() {
        let proxy = IntegerTypeProxy::<u8>::default();
        assert_eq!(proxy.try_parse(" 255 ", &provider()), Some(255));
        assert_eq!(proxy.try_parse("256", &provider()), None);
        assert_eq!(proxy.try_parse("-1", &provider()), None);

        let proxy = IntegerTypeProxy::<i32>::default();
        assert_eq!(proxy.try_parse("-42", &provider()), Some(-42));
        assert_eq!(proxy.try_parse("+7", &provider()), Some(7));
        assert_eq!(proxy.try_parse("4.5", &provider()), None);
    }

    #[test]
    fn test_float_parsing_forms() {
        let proxy = FloatTypeProxy::<f64>::default();
        assert_eq!(proxy.try_parse("1,000.5", &provider()), Some(1000.5));
        assert_eq!(proxy.try_parse("1e3", &provider()), Some(1000.0));
        assert_eq!(proxy.try_parse("inf", &provider()), Some(f64::INFINITY));
        assert!(proxy.try_parse("NaN", &provider()).is_some_and(f64::is_nan));
        assert_eq!(proxy.try_parse("abc", &provider()), None);
    }

    #[test]
    fn test_float_nan_equals_nan() {
        let proxy = FloatTypeProxy::<f32>::default();
        assert!(proxy.equals(&f32::NAN, &f32::NAN));
        assert!(!proxy.equals(&f32::NAN, &0.0));
        assert!(proxy.equals(&800.0, &800.0));
    }

    #[test]
    fn test_decimal_keeps_scale_and_culture() {
        let proxy = DecimalTypeProxy;
        let value = proxy.try_parse("-1,234.50", &provider()).unwrap();
        assert_eq!(value, Decimal::new(-123450, 2));
        assert_eq!(proxy.format(&value, &provider()), "-1234.50");
        assert_eq!(proxy.try_parse("abc", &provider()), None);

        let comma = FormatProvider {
            decimal_separator: ',',
            group_separator: Some('.'),
            ..provider()
        };
        assert_eq!(proxy.format(&Decimal::new(25, 2), &comma), "0,25");
        assert_eq!(proxy.try_parse("0,25", &comma), Some(Decimal::new(25, 2)));
    }

    #[test]
    fn test_string_accepts_anything() {
        let proxy = StringTypeProxy;
        assert_eq!(
            proxy.try_parse("  spaced ; text ", &provider()),
            Some("  spaced ; text ".to_string())
        );
    }

    #[test]
    fn test_naive_date_time_fallback_format() {
        let proxy = NaiveDateTimeTypeProxy;
        let parsed = proxy.try_parse("2024-02-29 13:45", &provider()).unwrap();
        assert_eq!(proxy.format(&parsed, &provider()), "2024-02-29T13:45:00");
    }

    #[test]
    fn test_offset_date_time_rfc3339() {
        let proxy = DateTimeOffsetTypeProxy;
        let parsed = proxy
            .try_parse("2024-02-29T13:45:00+02:00", &provider())
            .unwrap();
        assert_eq!(proxy.format(&parsed, &provider()), "2024-02-29T13:45:00+02:00");
        assert_eq!(proxy.try_parse("yesterday", &provider()), None);
    }
}
