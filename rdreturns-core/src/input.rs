//! Numeric text-field coercion
//!
//! Field edits arrive as text. Anything that does not start with a number
//! becomes zero; trailing garbage after a valid leading number is ignored.
//! Coercion never fails.

/// Parse a text field into a parameter value
///
/// - leading whitespace is skipped
/// - the longest leading decimal literal is taken
///   (`[+-]digits[.digits][e[+-]digits]` or `[+-]Infinity`)
/// - no leading number, or a zero of either sign, gives `0.0`
pub fn parse_numeric_input(text: &str) -> f64 {
    let value = leading_number(text.trim_start()).unwrap_or(0.0);
    if value == 0.0 || value.is_nan() {
        0.0
    } else {
        value
    }
}

fn leading_number(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut pos = 0;
    let mut negative = false;

    if let Some(&sign) = bytes.first() {
        if sign == b'+' || sign == b'-' {
            negative = sign == b'-';
            pos = 1;
        }
    }

    if s[pos..].starts_with("Infinity") {
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_start = pos;
    pos = skip_digits(bytes, pos);
    let int_digits = pos - int_start;

    let mut frac_digits = 0;
    if bytes.get(pos) == Some(&b'.') {
        let frac_start = pos + 1;
        let frac_end = skip_digits(bytes, frac_start);
        frac_digits = frac_end - frac_start;
        if int_digits > 0 || frac_digits > 0 {
            pos = frac_end;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }
    let mantissa_end = pos;

    // Exponent only counts when at least one digit follows
    if matches!(bytes.get(pos), Some(b'e') | Some(b'E')) {
        let mut exp_pos = pos + 1;
        if matches!(bytes.get(exp_pos), Some(b'+') | Some(b'-')) {
            exp_pos += 1;
        }
        let exp_end = skip_digits(bytes, exp_pos);
        if exp_end > exp_pos {
            pos = exp_end;
        }
    }

    let mut literal = String::with_capacity(pos + 2);
    if negative {
        literal.push('-');
    }
    let mantissa = &s[int_start..mantissa_end];
    if int_digits == 0 {
        literal.push('0');
    }
    literal.push_str(mantissa);
    if mantissa.ends_with('.') {
        literal.push('0');
    }
    literal.push_str(&s[mantissa_end..pos]);

    literal.parse::<f64>().ok()
}

fn skip_digits(bytes: &[u8], mut pos: usize) -> usize {
    while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
        pos += 1;
    }
    pos
}
