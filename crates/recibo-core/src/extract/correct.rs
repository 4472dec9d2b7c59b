//! Shared value correction helpers used by the cascades.

/// Strip thousands separators from a numeric string.
pub fn strip_thousands(s: &str) -> String {
    s.replace(',', "")
}

/// Collapse whitespace runs to single spaces and trim.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Fix letter-for-digit OCR confusions in an account number.
///
/// The leading position is the most commonly misread: a `Z` there is a `2`.
/// `ZIDP`, `ZI`, `I` and `O` follow the same lookalike map.
pub fn correct_account_confusions(raw: &str) -> String {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    let compact = match compact.strip_prefix('Z') {
        Some(rest) => format!("2{rest}"),
        None => compact,
    };

    compact
        .replace("ZIDP", "21DP")
        .replace("ZI", "21")
        .replace('I', "1")
        .replace('O', "0")
}

/// Normalize an OCR day token: letter O in either case reads as zero.
pub fn normalize_day(day: &str) -> String {
    day.replace(['O', 'o'], "0")
}

/// Zero-pad a day token to two digits.
pub fn pad_day(day: &str) -> String {
    if day.len() < 2 {
        format!("0{day}")
    } else {
        day.to_string()
    }
}

/// First three letters of a month token, uppercased.
pub fn month_abbrev(month: &str) -> String {
    month.chars().take(3).collect::<String>().to_uppercase()
}

/// Title-case an all-caps string, uppercasing after every non-letter.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;

    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strip_thousands() {
        assert_eq!(strip_thousands("1,234"), "1234");
        assert_eq!(strip_thousands("82,108"), "82108");
        assert_eq!(strip_thousands("271.00"), "271.00");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  JUAN   PEREZ \n LOPEZ "), "JUAN PEREZ LOPEZ");
    }

    #[test]
    fn test_account_leading_z_becomes_two() {
        assert_eq!(correct_account_confusions("Z1DP85D036"), "21DP85D036");
    }

    #[test]
    fn test_account_lookalike_map() {
        assert_eq!(correct_account_confusions("ZIDP85DO36"), "21DP85D036");
        assert_eq!(correct_account_confusions("A1 IO 22"), "A11022");
    }

    #[test]
    fn test_normalize_day() {
        assert_eq!(normalize_day("O5"), "05");
        assert_eq!(normalize_day("1o"), "10");
        assert_eq!(normalize_day("15"), "15");
    }

    #[test]
    fn test_pad_day() {
        assert_eq!(pad_day("5"), "05");
        assert_eq!(pad_day("15"), "15");
    }

    #[test]
    fn test_month_abbrev() {
        assert_eq!(month_abbrev("ENERO"), "ENE");
        assert_eq!(month_abbrev("dic"), "DIC");
        assert_eq!(month_abbrev("AGOS"), "AGO");
    }

    #[test]
    fn test_title_case_handles_punctuation_boundaries() {
        assert_eq!(title_case("AV. JUAREZ-NORTE 12"), "Av. Juarez-Norte 12");
        assert_eq!(title_case("MARIA DEL CARMEN"), "Maria Del Carmen");
    }
}
