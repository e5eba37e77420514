//! Decoding of indexer size notation (`512K`, `750M`, `2.50G`).

use super::SizeParseError;

/// Bytes in a binary kilobyte.
pub const KIBIBYTE: f64 = 1024.0;
/// Bytes in a binary megabyte.
pub const MEBIBYTE: f64 = KIBIBYTE * 1024.0;
/// Bytes in a binary gigabyte.
pub const GIBIBYTE: f64 = MEBIBYTE * 1024.0;

/// Decodes a size such as `2.50G` into a byte count.
///
/// The last character is the unit (`K`, `M` or `G`, binary multiples) and
/// everything before it is a decimal number. The product is truncated toward
/// zero.
///
/// # Errors
///
/// Returns [`SizeParseError::Empty`] for blank input,
/// [`SizeParseError::InvalidNumber`] when the prefix is not a finite
/// non-negative number, and [`SizeParseError::UnknownUnit`] for any other unit.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn parse_file_size(text: &str) -> Result<i64, SizeParseError> {
    let text = text.trim();
    let mut chars = text.chars();
    let Some(unit) = chars.next_back() else {
        return Err(SizeParseError::Empty);
    };
    let number = chars.as_str();

    let invalid = || SizeParseError::InvalidNumber {
        value: text.to_string(),
    };
    let value: f64 = number.parse().map_err(|_| invalid())?;

    let multiplier = match unit {
        'G' => GIBIBYTE,
        'M' => MEBIBYTE,
        'K' => KIBIBYTE,
        other => return Err(SizeParseError::UnknownUnit { unit: other }),
    };

    let bytes = value * multiplier;
    if !bytes.is_finite() || bytes < 0.0 || bytes >= i64::MAX as f64 {
        return Err(invalid());
    }

    Ok(bytes as i64)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_size_gigabytes_fractional() {
        assert_eq!(parse_file_size("2.5G").unwrap(), 2_684_354_560);
        assert_eq!(parse_file_size("2.50G").unwrap(), 2_684_354_560);
    }

    #[test]
    fn test_parse_file_size_megabytes() {
        assert_eq!(parse_file_size("750M").unwrap(), 750 * 1024 * 1024);
    }

    #[test]
    fn test_parse_file_size_kilobytes() {
        assert_eq!(parse_file_size("512K").unwrap(), 512 * 1024);
    }

    #[test]
    fn test_parse_file_size_truncates() {
        // 1.5K = 1536 exactly, 0.001K = 1.024 -> 1
        assert_eq!(parse_file_size("1.5K").unwrap(), 1536);
        assert_eq!(parse_file_size("0.001K").unwrap(), 1);
    }

    #[test]
    fn test_parse_file_size_surrounding_whitespace() {
        assert_eq!(parse_file_size("  4M \n").unwrap(), 4 * 1024 * 1024);
    }

    #[test]
    fn test_parse_file_size_empty_is_error() {
        assert_eq!(parse_file_size(""), Err(SizeParseError::Empty));
        assert_eq!(parse_file_size("   "), Err(SizeParseError::Empty));
    }

    #[test]
    fn test_parse_file_size_unknown_unit() {
        assert_eq!(
            parse_file_size("10X"),
            Err(SizeParseError::UnknownUnit { unit: 'X' })
        );
        // Units are case-sensitive
        assert_eq!(
            parse_file_size("10k"),
            Err(SizeParseError::UnknownUnit { unit: 'k' })
        );
    }

    #[test]
    fn test_parse_file_size_bad_number() {
        assert!(matches!(
            parse_file_size("abcG"),
            Err(SizeParseError::InvalidNumber { .. })
        ));
        // Unit alone leaves an empty numeric prefix
        assert!(matches!(
            parse_file_size("G"),
            Err(SizeParseError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_parse_file_size_rejects_negative_and_non_finite() {
        assert!(matches!(
            parse_file_size("-1M"),
            Err(SizeParseError::InvalidNumber { .. })
        ));
        assert!(matches!(
            parse_file_size("infG"),
            Err(SizeParseError::InvalidNumber { .. })
        ));
        assert!(matches!(
            parse_file_size("NaNK"),
            Err(SizeParseError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_parse_file_size_non_ascii_unit_does_not_panic() {
        assert_eq!(
            parse_file_size("5é"),
            Err(SizeParseError::UnknownUnit { unit: 'é' })
        );
    }
}
