//! Number rendering with JavaScript semantics.
//!
//! Translations are shared with JavaScript front ends, so numbers must print the
//! way `String(n)`, `toFixed` and `toExponential` print them there.

use std::num::FpCategory;

use serde_json::Number;

/// JavaScript `String(value)` for a number.
#[must_use]
pub fn to_js_string(value: f64) -> String {
    match value.classify() {
        FpCategory::Nan => return "NaN".to_string(),
        FpCategory::Zero => return "0".to_string(),
        FpCategory::Infinite => {
            return if value.is_sign_negative() { "-Infinity" } else { "Infinity" }.to_string();
        }
        FpCategory::Normal | FpCategory::Subnormal => {}
    }

    let scientific = format!("{:e}", value.abs());
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return value.to_string();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return value.to_string();
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let k = digits.len() as i32;
    let n = exponent + 1;

    let body = if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k).unsigned_abs() as usize))
    } else if 0 < n && n <= 21 {
        let (int_part, frac_part) = digits.split_at(n.unsigned_abs() as usize);
        format!("{int_part}.{frac_part}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat(n.unsigned_abs() as usize))
    } else {
        let (first, rest) = digits.split_at(1);
        let fraction = if rest.is_empty() { String::new() } else { format!(".{rest}") };
        format!("{first}{fraction}{}", exponent_suffix(n - 1))
    };

    if value.is_sign_negative() { format!("-{body}") } else { body }
}

/// JavaScript `value.toFixed(precision)`.
///
/// Rounds the exact binary value, and exact ties go to the larger magnitude.
#[must_use]
pub fn to_fixed(value: f64, precision: usize) -> String {
    if !value.is_finite() || value.abs() >= 1e21 {
        return to_js_string(value);
    }
    let (int_part, frac_part) = exact_decimal(value.abs());
    let (digits, carried) =
        round_half_up(&format!("{int_part}{frac_part}"), int_part.len() + precision);
    let (int_digits, frac_digits) = digits.split_at(int_part.len() + usize::from(carried));

    let sign = if value < 0.0 { "-" } else { "" };
    if frac_digits.is_empty() {
        format!("{sign}{int_digits}")
    } else {
        format!("{sign}{int_digits}.{frac_digits}")
    }
}

/// JavaScript `value.toExponential(precision)`; shortest digits when `None`.
#[must_use]
pub fn to_exponential(value: f64, precision: Option<usize>) -> String {
    if !value.is_finite() {
        return to_js_string(value);
    }
    let Some(precision) = precision else {
        let rendered = format!("{:e}", positive_zero(value));
        return match rendered.split_once('e') {
            Some((mantissa, exponent)) => match exponent.parse::<i32>() {
                Ok(exponent) => format!("{mantissa}{}", exponent_suffix(exponent)),
                Err(_) => rendered,
            },
            None => rendered,
        };
    };

    let (int_part, frac_part) = exact_decimal(value.abs());
    let digits = format!("{int_part}{frac_part}");
    let Some(first) = digits.find(|c: char| c != '0') else {
        return format!("{}{}", with_point("0", &"0".repeat(precision)), exponent_suffix(0));
    };
    let (rounded, carried) = round_half_up(digits.get(first..).unwrap_or_default(), precision + 1);
    let (lead, rest) = rounded.split_at(1);
    let rest = rest.get(..precision).unwrap_or(rest);

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let exponent = int_part.len() as i32 - 1 - first as i32 + i32::from(carried);
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{}{}", with_point(lead, rest), exponent_suffix(exponent))
}

/// JavaScript `parseInt(value, 10)`, which goes through `String(value)`.
///
/// Large and tiny floats therefore keep only their leading digits
/// (`1e21` becomes `1`). Returns `NaN` when no digit leads the string.
#[must_use]
pub fn parse_int(number: &Number) -> String {
    if number.is_i64() || number.is_u64() {
        return number.to_string();
    }
    let text = to_js_string(number.as_f64().unwrap_or(f64::NAN));
    let (negative, unsigned) =
        text.strip_prefix('-').map_or((false, text.as_str()), |rest| (true, rest));
    let digits: String = unsigned.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return "NaN".to_string();
    }
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else if negative {
        format!("-{trimmed}")
    } else {
        trimmed.to_string()
    }
}

/// Digit alphabets accepted by [`to_radix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Radix {
    Binary,
    Octal,
    Hex,
}

impl Radix {
    /// Bits per digit.
    const fn bits(self) -> usize {
        match self {
            Self::Binary => 1,
            Self::Octal => 3,
            Self::Hex => 4,
        }
    }
}

/// `value.toString(radix)` for the integer part, sign kept in front.
///
/// Exact for every float: `1e300` prints all of its digits.
#[must_use]
pub fn to_radix(number: &Number, radix: Radix) -> String {
    let integer = IntegerPart::of(number);
    let digits = if integer.shift == 0 {
        let magnitude = integer.magnitude;
        match radix {
            Radix::Binary => format!("{magnitude:b}"),
            Radix::Octal => format!("{magnitude:o}"),
            Radix::Hex => format!("{magnitude:x}"),
        }
    } else {
        let bits = format!("{:b}{}", integer.magnitude, "0".repeat(integer.shift));
        regroup_bits(&bits, radix.bits())
    };
    if integer.negative { format!("-{digits}") } else { digits }
}

/// `value >>> 0`
#[must_use]
pub fn to_uint32(number: &Number) -> u32 {
    u32::try_from(IntegerPart::of(number).wrapping(32)).unwrap_or_default()
}

/// `String.fromCharCode(value)`. Lone surrogates become U+FFFD.
#[must_use]
pub fn from_char_code(number: &Number) -> char {
    u32::try_from(IntegerPart::of(number).wrapping(16))
        .ok()
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Integer part of a number, truncated toward zero: `magnitude << shift`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct IntegerPart {
    /// Below zero and not zero
    negative: bool,
    /// Significant bits
    magnitude: u128,
    /// Zero bits after `magnitude`; non-zero only for floats of `2^53` and up
    shift: usize,
}

impl IntegerPart {
    /// Splits `number` without losing bits, reading floats from their encoding.
    fn of(number: &Number) -> Self {
        if let Some(value) = number.as_i64() {
            return Self {
                negative: value < 0,
                magnitude: u128::from(value.unsigned_abs()),
                shift: 0,
            };
        }
        if let Some(value) = number.as_u64() {
            return Self { negative: false, magnitude: u128::from(value), shift: 0 };
        }

        let value = number.as_f64().unwrap_or_default();
        let bits = value.abs().to_bits();
        let biased_exponent = bits >> 52;
        if biased_exponent < 1023 {
            return Self { negative: false, magnitude: 0, shift: 0 };
        }
        let significand = u128::from((bits & ((1 << 52) - 1)) | (1 << 52));
        // value = significand * 2^(biased_exponent - 1075)
        let (magnitude, shift) = if biased_exponent >= 1075 {
            (significand, usize::try_from(biased_exponent - 1075).unwrap_or_default())
        } else {
            (significand >> (1075 - biased_exponent), 0)
        };
        Self { negative: value < 0.0, magnitude, shift }
    }

    /// Value modulo `2^bits` as a non-negative integer, for `bits` up to 64.
    const fn wrapping(self, bits: usize) -> u128 {
        let modulus = 1_u128 << bits;
        let low = if self.shift >= bits { 0 } else { (self.magnitude << self.shift) % modulus };
        if self.negative { (modulus - low) % modulus } else { low }
    }
}

/// Re-reads a binary digit string in groups of `group` bits (3 for octal, 4 for hex).
fn regroup_bits(bits: &str, group: usize) -> String {
    let padding = (group - bits.len() % group) % group;
    let padded: Vec<u32> = std::iter::repeat_n(0, padding)
        .chain(bits.chars().map(|bit| u32::from(bit == '1')))
        .collect();
    padded
        .chunks(group)
        .filter_map(|chunk| char::from_digit(chunk.iter().fold(0, |acc, bit| acc * 2 + bit), 16))
        .collect()
}

/// Fraction digits that hold any `f64` exactly; the smallest subnormal needs 1074.
const EXACT_FRACTION_DIGITS: usize = 1100;

/// Exact decimal expansion of a finite, non-negative value as integer and fraction digits.
fn exact_decimal(value: f64) -> (String, String) {
    let text = format!("{value:.EXACT_FRACTION_DIGITS$}");
    match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part.to_string(), frac_part.to_string()),
        None => (text, String::new()),
    }
}

/// Keeps the first `keep` digits, rounding up when the next digit is 5 or more.
///
/// `digits` must be the exact expansion, so a `5` there means at least half.
/// Returns `true` alongside when the carry added a leading digit (`99` to `100`).
fn round_half_up(digits: &str, keep: usize) -> (String, bool) {
    let mut kept: Vec<char> = digits.chars().take(keep).collect();
    kept.resize(keep, '0');
    if !digits.chars().nth(keep).is_some_and(|next| next >= '5') {
        return (kept.into_iter().collect(), false);
    }
    for digit in kept.iter_mut().rev() {
        if *digit == '9' {
            *digit = '0';
        } else {
            *digit = digit.to_digit(10).and_then(|d| char::from_digit(d + 1, 10)).unwrap_or('0');
            return (kept.into_iter().collect(), false);
        }
    }
    kept.insert(0, '1');
    (kept.into_iter().collect(), true)
}

/// `lead.rest`, or just `lead` when `rest` is empty.
fn with_point(lead: &str, rest: &str) -> String {
    if rest.is_empty() { lead.to_string() } else { format!("{lead}.{rest}") }
}

/// `e+N` / `e-N`
fn exponent_suffix(exponent: i32) -> String {
    if exponent < 0 { format!("e{exponent}") } else { format!("e+{exponent}") }
}

/// Maps `-0.0` to `0.0`; JavaScript never prints the sign of a zero.
fn positive_zero(value: f64) -> f64 {
    if value.classify() == FpCategory::Zero { 0.0 } else { value }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    fn number(value: f64) -> Number {
        Number::from_f64(value).unwrap()
    }

    #[rstest]
    #[case(0.0, "0")]
    #[case(-0.0, "0")]
    #[case(1.0, "1")]
    #[case(3.14159, "3.14159")]
    #[case(-2.5, "-2.5")]
    #[case(123_456_789.0, "123456789")]
    #[case(1e21, "1e+21")]
    #[case(1.5e21, "1.5e+21")]
    #[case(1e20, "100000000000000000000")]
    #[case(0.000_001, "0.000001")]
    #[case(1e-7, "1e-7")]
    #[case(-1.25e-9, "-1.25e-9")]
    #[case(0.1, "0.1")]
    fn js_string(#[case] value: f64, #[case] expected: &str) {
        assert_that!(to_js_string(value), eq(expected));
    }

    #[rstest]
    #[case(3.14159, 3, "3.142")]
    #[case(2.0, 2, "2.00")]
    #[case(-0.0, 1, "0.0")]
    #[case(-1.005, 0, "-1")]
    #[case(1e21, 2, "1e+21")]
    #[case::tie_to_larger(2.5, 0, "3")]
    #[case::half(0.5, 0, "1")]
    #[case::quarter(0.25, 1, "0.3")]
    #[case::eighth(0.125, 2, "0.13")]
    #[case::tie_after_integer(1.125, 2, "1.13")]
    #[case::percentage(97.25, 1, "97.3")]
    #[case::negative_tie(-2.5, 0, "-3")]
    #[case::below_tie_in_binary(0.95, 1, "0.9")]
    #[case::carry_into_new_digit(9.96, 1, "10.0")]
    #[case::tiny_negative(-0.0001, 2, "-0.00")]
    fn fixed(#[case] value: f64, #[case] precision: usize, #[case] expected: &str) {
        assert_that!(to_fixed(value, precision), eq(expected));
    }

    #[rstest]
    #[case(12345.0, None, "1.2345e+4")]
    #[case(3.14159, Some(2), "3.14e+0")]
    #[case(0.00015, Some(1), "1.5e-4")]
    #[case(0.0, None, "0e+0")]
    #[case(-42.0, Some(0), "-4e+1")]
    #[case::tie_to_larger(1.25, Some(1), "1.3e+0")]
    #[case::carry_into_exponent(9.5, Some(0), "1e+1")]
    #[case::zero_with_precision(-0.0, Some(2), "0.00e+0")]
    #[case::subnormal(5e-324, Some(1), "4.9e-324")]
    #[case::large(1e300, Some(3), "1.000e+300")]
    fn exponential(#[case] value: f64, #[case] precision: Option<usize>, #[case] expected: &str) {
        assert_that!(to_exponential(value, precision), eq(expected));
    }

    #[rstest]
    #[case(number(42.9), "42")]
    #[case(number(-42.9), "-42")]
    #[case(number(-0.5), "0")]
    #[case(number(1e21), "1")]
    #[case(Number::from(-7), "-7")]
    #[case(Number::from(u64::MAX), "18446744073709551615")]
    fn parse_int_cases(#[case] value: Number, #[case] expected: &str) {
        assert_that!(parse_int(&value), eq(expected));
    }

    #[rstest]
    #[case(Number::from(255), Radix::Hex, "ff")]
    #[case(Number::from(-255), Radix::Hex, "-ff")]
    #[case(Number::from(5), Radix::Binary, "101")]
    #[case(Number::from(8), Radix::Octal, "10")]
    #[case(number(10.75), Radix::Binary, "1010")]
    #[case(number(-0.5), Radix::Hex, "0")]
    #[case(number(9_007_199_254_740_992.0), Radix::Hex, "20000000000000")]
    fn radix_cases(#[case] value: Number, #[case] radix: Radix, #[case] expected: &str) {
        assert_that!(to_radix(&value, radix), eq(expected));
    }

    /// 2^128 is past `i128`, so these go through the shifted form.
    #[rstest]
    #[case(Radix::Binary, 128, "1")]
    #[case(Radix::Octal, 42, "4")]
    #[case(Radix::Hex, 32, "1")]
    fn radix_past_i128(#[case] radix: Radix, #[case] zeros: usize, #[case] lead: &str) {
        let expected = format!("{lead}{}", "0".repeat(zeros));

        assert_that!(to_radix(&number(3.402_823_669_209_385e38), radix), eq(&expected));
        assert_that!(
            to_radix(&number(-3.402_823_669_209_385e38), radix),
            eq(&format!("-{expected}"))
        );
    }

    #[rstest]
    #[case(Number::from(-1), 4_294_967_295)]
    #[case(Number::from(42), 42)]
    #[case(Number::from(4_294_967_296_u64), 0)]
    #[case(number(-1.9), 4_294_967_295)]
    #[case(number(4_294_967_297.5), 1)]
    #[case(number(1e300), 0)]
    #[case(number(-1e300), 0)]
    fn uint32(#[case] value: Number, #[case] expected: u32) {
        assert_that!(to_uint32(&value), eq(expected));
    }

    #[rstest]
    #[case(Number::from(65), 'A')]
    #[case(Number::from(0x1_0041), 'A')]
    #[case(Number::from(0xD800), char::REPLACEMENT_CHARACTER)]
    #[case(Number::from(233), 'é')]
    #[case(number(65_601.0), 'A')]
    #[case(number(1e300), '\0')]
    fn char_code(#[case] value: Number, #[case] expected: char) {
        assert_that!(from_char_code(&value), eq(expected));
    }
}
