//! Marketplace pages format numbers inconsistently: "1.403", "#2,501",
//! "50.000" and plain "731" all appear in the same listing. Every extractor
//! goes through these helpers instead of carrying its own strip-and-parse
//! block. Two failure policies exist and callers pick one deliberately:
//! parse-or-default (reviews, total counts) and parse-or-absent (rank).

/// Parse an integer token after stripping `#`, locale thousands separators
/// and stray whitespace. Returns None unless at least one digit remains and
/// nothing but digits remain.
pub fn parse_separated_int(token: &str) -> Option<u64> {
    let cleaned: String = token
        .trim()
        .chars()
        .filter(|c| !matches!(c, '#' | '.' | ',' | '\u{a0}' | ' '))
        .collect();

    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    cleaned.parse().ok()
}

/// Parse-or-default policy: absence of the field is a valid signal meaning
/// zero, e.g. a listing with no reviews yet.
pub fn count_or_zero(text: Option<&str>) -> u64 {
    text.and_then(parse_separated_int).unwrap_or(0)
}

/// Digits of the first whitespace token, separators stripped. Used for the
/// "1-16 di oltre 50.000 risultati per ..." style banner where only the
/// leading numeric run matters. Unparsable banners count as zero.
pub fn leading_count(text: &str) -> u64 {
    let first_token = match text.split_whitespace().next() {
        Some(t) => t,
        None => return 0,
    };

    let digits: String = first_token.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

/// Parse-or-absent policy for the rank cell: token before the first space,
/// `#` and separators stripped. "#1.403 in Libri" parses to 1403; anything
/// non-numeric yields None, never a sentinel value.
pub fn rank_token(text: &str) -> Option<u64> {
    text.trim()
        .split(' ')
        .next()
        .and_then(parse_separated_int)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_thousand_separated_values() {
        assert_eq!(parse_separated_int("1.403"), Some(1403));
        assert_eq!(parse_separated_int("2,501"), Some(2501));
        assert_eq!(parse_separated_int("#1.403"), Some(1403));
        assert_eq!(parse_separated_int("731"), Some(731));
    }

    #[test]
    fn rejects_non_numeric_tokens() {
        assert_eq!(parse_separated_int(""), None);
        assert_eq!(parse_separated_int("n/a"), None);
        assert_eq!(parse_separated_int("12a4"), None);
        assert_eq!(parse_separated_int("#"), None);
    }

    #[test]
    fn count_or_zero_defaults_on_absence() {
        assert_eq!(count_or_zero(None), 0);
        assert_eq!(count_or_zero(Some("garbage")), 0);
        assert_eq!(count_or_zero(Some("1.204")), 1204);
    }

    #[test]
    fn leading_count_takes_first_token_digits() {
        assert_eq!(leading_count("50.000 risultati per \"gatti\""), 50000);
        assert_eq!(leading_count("1-16 di oltre 4.000 risultati"), 116);
        assert_eq!(leading_count("risultati per"), 0);
        assert_eq!(leading_count(""), 0);
    }

    #[test]
    fn rank_token_takes_text_before_first_space() {
        assert_eq!(rank_token("#1.403 in Libri"), Some(1403));
        assert_eq!(rank_token("#12 in Romanzi"), Some(12));
        assert_eq!(rank_token("n. 5 in Libri"), None);
        assert_eq!(rank_token(""), None);
    }
}
