use crate::error::{ParseError, Result};
use crate::optmap::TypeKind;
use crate::value::Value;

/// Coerce a raw token for the flag typed as `origin`.
pub fn coerce(raw: &str, kind: &TypeKind, origin: &str) -> Result<Value> {
    match kind {
        TypeKind::String => Ok(Value::Str(raw.to_string())),
        TypeKind::Number => parse_float_prefix(raw)
            .map(Value::Number)
            .ok_or_else(|| ParseError::invalid_value(origin, kind, raw)),
        TypeKind::Integer => parse_int_prefix(raw)
            .map(Value::Integer)
            .ok_or_else(|| ParseError::invalid_value(origin, kind, raw)),
        TypeKind::Switch => Err(ParseError::invalid_value(origin, kind, raw)),
        TypeKind::Custom(coercer) => {
            coercer
                .call(raw, origin)
                .map_err(|inner| ParseError::InvalidValue {
                    option: origin.to_string(),
                    ty: coercer.label().to_string(),
                    value: Some(raw.to_string()),
                    inner: Some(inner),
                })
        }
        TypeKind::Unknown(name) => Err(ParseError::UndefinedType {
            option: origin.to_string(),
            ty: Some(name.clone()),
        }),
    }
}

fn digits_end(s: &str, radix: u32) -> usize {
    s.find(|c: char| !c.is_digit(radix)).unwrap_or(s.len())
}

fn split_sign(s: &str) -> (bool, &str) {
    if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else {
        (false, s.strip_prefix('+').unwrap_or(s))
    }
}

/// Parse the longest leading decimal literal, ignoring trailing garbage.
///
/// `"1.23"`, `"1.5kg"`, `" .5"`, `"1e3"` and `"-Infinity"` all parse;
/// a string with no leading digits does not.
pub fn parse_float_prefix(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let (negative, body) = split_sign(s);
    if body.starts_with("Infinity") {
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_len = digits_end(body, 10);
    let mut end = int_len;
    let mut frac_len = 0;
    if body[end..].starts_with('.') {
        frac_len = digits_end(&body[end + 1..], 10);
        end += 1 + frac_len;
    }
    if int_len == 0 && frac_len == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows.
    let rest = &body[end..];
    if rest.starts_with(['e', 'E']) {
        let (_, exp_body) = split_sign(&rest[1..]);
        let exp_digits = digits_end(exp_body, 10);
        if exp_digits > 0 {
            end += rest.len() - exp_body.len() + exp_digits;
        }
    }

    let n: f64 = body[..end].parse().ok()?;
    Some(if negative { -n } else { n })
}

/// Parse the leading integer, ignoring trailing garbage.
///
/// A `0x`/`0X` prefix selects hexadecimal. Values outside the `i64`
/// range are rejected.
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, body) = split_sign(s);
    let (radix, digits) = match body
        .strip_prefix("0x")
        .or_else(|| body.strip_prefix("0X"))
    {
        Some(hex) => (16, hex),
        None => (10, body),
    };
    let end = digits_end(digits, radix);
    if end == 0 {
        return None;
    }
    let magnitude = i128::from_str_radix(&digits[..end], radix).ok()?;
    let n = if negative { -magnitude } else { magnitude };
    i64::try_from(n).ok()
}
