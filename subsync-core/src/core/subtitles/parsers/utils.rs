/// The number of microseconds in a second.
pub const MICROS_PER_SECOND: i64 = 1_000_000;

/// Convert the given hours, minutes and seconds into seconds.
/// It returns [None] when the result doesn't fit.
pub fn hms_to_seconds(hours: i64, minutes: i64, seconds: i64) -> Option<i64> {
    hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)
}

/// Convert the given hours, minutes and seconds into microseconds.
/// It returns [None] when the result doesn't fit.
pub fn hms_to_micros(hours: i64, minutes: i64, seconds: i64) -> Option<i64> {
    hms_to_seconds(hours, minutes, seconds)?.checked_mul(MICROS_PER_SECOND)
}

/// Convert the given hours, minutes, seconds and fraction into microseconds,
/// the fraction being expressed in units of `fraction_unit` microseconds.
/// It returns [None] when the result doesn't fit.
pub fn hmsf_to_micros(
    hours: i64,
    minutes: i64,
    seconds: i64,
    fraction: i64,
    fraction_unit: i64,
) -> Option<i64> {
    hms_to_micros(hours, minutes, seconds)?.checked_add(fraction.checked_mul(fraction_unit)?)
}

/// Parse the given regex capture as an integer, falling back to `0` when it's absent or invalid.
pub fn parse_int(value: Option<regex::Match>) -> i64 {
    value.map(|e| atoi(e.as_str())).unwrap_or(0)
}

/// Parse the leading integer of the given value, ignoring leading whitespace.
/// It returns `0` when the value doesn't start with an integer.
pub fn atoi(value: &str) -> i64 {
    let value = value.trim_start();
    let (negative, digits) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let result = digits[..end].parse::<i64>().unwrap_or(0);

    if negative {
        -result
    } else {
        result
    }
}

/// Parse the leading floating point number of the given value, ignoring leading whitespace.
/// It returns the parsed number together with the unparsed remainder of the value,
/// or [None] when the value doesn't start with a number.
pub fn parse_float_prefix(value: &str) -> Option<(f64, &str)> {
    let value = value.trim_start();
    let bytes = value.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut has_digits = end > digits_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let fraction_start = end + 1;
        let mut fraction_end = fraction_start;
        while fraction_end < bytes.len() && bytes[fraction_end].is_ascii_digit() {
            fraction_end += 1;
        }
        if has_digits || fraction_end > fraction_start {
            has_digits = true;
            end = fraction_end;
        }
    }

    if !has_digits {
        return None;
    }

    value[..end].parse::<f64>().ok().map(|e| (e, &value[end..]))
}

/// Find the byte offset of the needle within the haystack, ignoring ASCII case.
pub fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .to_ascii_lowercase()
        .find(needle.to_ascii_lowercase().as_str())
}

/// Verify if the haystack contains the needle, ignoring ASCII case.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    find_ignore_case(haystack, needle).is_some()
}

/// Replace the `|` line separators by a newline.
pub fn replace_pipes(text: &str) -> String {
    text.replace('|', "\n")
}
