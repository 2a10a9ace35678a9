//! Rendering of parsed instructions against an argument list.

use serde_json::Value;

use super::error::FormatError;
use super::number::{
    self,
    Radix,
};
use super::types::{
    Argument,
    Conversion,
    FormatInstruction,
    PathSegment,
    Placeholder,
};

/// Renders `instructions` with `args`.
///
/// Implicit placeholders consume arguments left to right, `%N$` reads argument
/// `N` without moving that cursor, and named paths start from the argument
/// under the cursor. The first failing placeholder aborts the render.
///
/// # Errors
/// - [`FormatError::MissingArgument`] when a placeholder refers past `args`
/// - [`FormatError::MissingProperty`] when a named-path step does not exist
/// - [`FormatError::TypeMismatch`] when a numeric conversion gets a non-number
pub fn format(instructions: &[FormatInstruction], args: &[Value]) -> Result<String, FormatError> {
    let mut output = String::new();
    let mut cursor = 0;

    for instruction in instructions {
        match instruction {
            FormatInstruction::Literal(text) => output.push_str(text),
            FormatInstruction::Placeholder(placeholder) => {
                let value = resolve(&placeholder.argument, args, &mut cursor)?;
                let converted = convert(placeholder, value)?;
                write_padded(&mut output, placeholder, &converted);
            }
        }
    }

    Ok(output)
}

/// A converted value before padding.
struct Converted {
    /// Rendered text, without the `+` sign
    text: String,
    /// Whether the value counts as `>= 0` for the sign flag
    non_negative: bool,
}

/// Picks the argument a placeholder refers to.
fn resolve<'a>(
    argument: &Argument,
    args: &'a [Value],
    cursor: &mut usize,
) -> Result<&'a Value, FormatError> {
    match argument {
        Argument::Next => {
            let value = args.get(*cursor).ok_or(FormatError::MissingArgument { index: *cursor + 1 })?;
            *cursor += 1;
            Ok(value)
        }
        Argument::Index(index) => index
            .checked_sub(1)
            .and_then(|position| args.get(position))
            .ok_or(FormatError::MissingArgument { index: *index }),
        Argument::Path(segments) => {
            let mut value =
                args.get(*cursor).ok_or(FormatError::MissingArgument { index: *cursor + 1 })?;
            for segment in segments {
                value = step(value, segment).ok_or_else(|| FormatError::MissingProperty {
                    property: segment.to_string(),
                })?;
            }
            Ok(value)
        }
    }
}

/// One named-path step.
fn step<'a>(value: &'a Value, segment: &PathSegment) -> Option<&'a Value> {
    match (value, segment) {
        (Value::Object(map), PathSegment::Key(key)) => map.get(key),
        (Value::Object(map), PathSegment::Index(index)) => map.get(&index.to_string()),
        (Value::Array(items), PathSegment::Index(index)) => items.get(*index),
        _ => None,
    }
}

/// Applies the conversion and precision, leaving sign and padding to [`write_padded`].
fn convert(placeholder: &Placeholder, value: &Value) -> Result<Converted, FormatError> {
    let conversion = placeholder.conversion;

    let numeric = match value {
        Value::Number(numeric) => numeric,
        _ if conversion.is_numeric() => {
            return Err(FormatError::TypeMismatch {
                conversion: conversion.code(),
                found: type_name(value),
            });
        }
        _ => {
            let text = truncate_chars(to_js_string(value), placeholder.precision);
            return Ok(Converted { text, non_negative: false });
        }
    };

    let text = match conversion {
        Conversion::Binary => number::to_radix(numeric, Radix::Binary),
        Conversion::Char => number::from_char_code(numeric).to_string(),
        Conversion::Decimal => number::parse_int(numeric),
        Conversion::Exponential => {
            number::to_exponential(numeric.as_f64().unwrap_or(f64::NAN), placeholder.precision)
        }
        Conversion::Fixed => {
            let value = numeric.as_f64().unwrap_or(f64::NAN);
            placeholder.precision.map_or_else(
                || number_to_js_string(numeric),
                |precision| number::to_fixed(value, precision),
            )
        }
        Conversion::Octal => number::to_radix(numeric, Radix::Octal),
        Conversion::String => {
            truncate_chars(number_to_js_string(numeric), placeholder.precision)
        }
        Conversion::Unsigned => number::to_uint32(numeric).to_string(),
        Conversion::LowerHex => number::to_radix(numeric, Radix::Hex),
        Conversion::UpperHex => number::to_radix(numeric, Radix::Hex).to_uppercase(),
    };

    let non_negative = !text.starts_with('-') && text != "NaN";
    Ok(Converted { text, non_negative })
}

/// Adds the sign and pads to the width.
fn write_padded(output: &mut String, placeholder: &Placeholder, converted: &Converted) {
    let mut text = String::with_capacity(converted.text.len() + 1);
    if placeholder.sign && placeholder.conversion.is_signed() && converted.non_negative {
        text.push('+');
    }
    text.push_str(&converted.text);

    let pad_len = placeholder.width.unwrap_or(0).saturating_sub(text.chars().count());
    let pad: String = std::iter::repeat_n(placeholder.pad_char(), pad_len).collect();

    if placeholder.left_align {
        output.push_str(&text);
        output.push_str(&pad);
    } else {
        output.push_str(&pad);
        output.push_str(&text);
    }
}

/// Keeps at most `precision` characters.
fn truncate_chars(text: String, precision: Option<usize>) -> String {
    match precision {
        Some(max) if text.chars().count() > max => text.chars().take(max).collect(),
        _ => text,
    }
}

/// JavaScript `String(n)` for a JSON number; integers keep every digit.
fn number_to_js_string(number: &serde_json::Number) -> String {
    if number.is_i64() || number.is_u64() {
        number.to_string()
    } else {
        number::to_js_string(number.as_f64().unwrap_or(f64::NAN))
    }
}

/// JavaScript `String(value)`.
fn to_js_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number_to_js_string(number),
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| if item.is_null() { String::new() } else { to_js_string(item) })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// JavaScript-flavoured type name used in error messages.
pub(crate) const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
