//! Lenient text-to-number parsing.
//!
//! Every numeric field in the log is typed by hand, so parsing is forgiving:
//! leading whitespace is skipped, the longest numeric prefix is taken and
//! trailing text is ignored (`"300 kcal"` reads as 300). Text with no
//! numeric prefix reads as nothing.

/// Parse the leading integer of `text`.
///
/// Returns `None` when no digits follow the optional sign. Values beyond the
/// `i64` range saturate.
pub fn parse_int(text: &str) -> Option<i64> {
    let s = text.trim_start();
    let (negative, digits) = split_sign(s);

    let run = digit_run(digits);
    if run == 0 {
        return None;
    }

    let magnitude = digits[..run].bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });

    Some(if negative { -magnitude } else { magnitude })
}

/// Parse the leading real number of `text`.
///
/// Accepts an optional sign, digits, an optional fractional part and an
/// optional exponent. `".5"` and `"5."` are both accepted.
pub fn parse_real(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_digits = digit_run(&s[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digit_run(&s[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it.
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits = digit_run(&s[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a calorie amount: an integer, where anything invalid or negative
/// counts as zero.
pub fn parse_calories(text: &str) -> u32 {
    match parse_int(text) {
        Some(v) if v > 0 => u32::try_from(v).unwrap_or(u32::MAX),
        _ => 0,
    }
}

/// Parse a required positive integer (e.g. age); `None` if missing or `<= 0`.
pub fn parse_positive_int(text: &str) -> Option<u32> {
    parse_int(text)
        .filter(|v| *v > 0)
        .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
}

/// Parse a required positive real (e.g. height, weight); `None` if missing or `<= 0`.
pub fn parse_positive_real(text: &str) -> Option<f64> {
    parse_real(text).filter(|v| *v > 0.0)
}

fn split_sign(s: &str) -> (bool, &str) {
    if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = s.strip_prefix('+') {
        (false, rest)
    } else {
        (false, s)
    }
}

fn digit_run(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}
