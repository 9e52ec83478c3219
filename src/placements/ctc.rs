//! Free-text compensation parsing.
//!
//! CTC figures arrive as strings like `"12.5 LPA"`, `"10-14 LPA"`, or
//! `"50k/month"`. The parser pulls out the first contiguous numeral run
//! and nothing more: a range collapses to its lower bound and units are
//! ignored, so `"50k/month"` reads as 50. Known limitation, kept for
//! compatibility with the roster data already in circulation.

/// Extract the leading `digits[.digits]` run as lakhs per annum.
pub fn extract_lakhs(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let start = bytes.iter().position(|byte| byte.is_ascii_digit())?;

    let mut end = start;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end < bytes.len()
        && bytes[end] == b'.'
        && bytes.get(end + 1).is_some_and(|byte| byte.is_ascii_digit())
    {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }

    text[start..end].parse().ok()
}

/// Lenient variant used by the eligibility rule: an absent or
/// numeral-free string counts as zero, never an error. That zero feeds
/// straight into the threshold comparison, so a malformed CTC silently
/// leaves a student eligible to keep sitting.
pub fn parse_lakhs(text: &str) -> f64 {
    extract_lakhs(text).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_plain_decimal_figures() {
        assert_eq!(parse_lakhs("12.5 LPA"), 12.5);
        assert_eq!(parse_lakhs("7.53 LPA"), 7.53);
        assert_eq!(parse_lakhs("6 LPA"), 6.0);
    }

    #[test]
    fn ranges_collapse_to_the_lower_bound() {
        assert_eq!(parse_lakhs("10-14 LPA"), 10.0);
    }

    #[test]
    fn missing_numerals_read_as_zero() {
        assert_eq!(parse_lakhs(""), 0.0);
        assert_eq!(parse_lakhs("best in industry"), 0.0);
    }

    #[test]
    fn units_are_not_interpreted() {
        assert_eq!(parse_lakhs("50k/month"), 50.0);
    }

    #[test]
    fn leading_text_is_skipped() {
        assert_eq!(parse_lakhs("upto 8.4 LPA"), 8.4);
        assert_eq!(extract_lakhs("Rs. 3.5L"), Some(3.5));
    }

    #[test]
    fn trailing_dot_without_digits_stops_the_scan() {
        assert_eq!(extract_lakhs("12. LPA"), Some(12.0));
        assert_eq!(extract_lakhs("no offer"), None);
    }
}
