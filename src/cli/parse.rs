//! Value parsers for command-line arguments.
//!
//! Each returns `Result<_, String>` so clap reports failures as usage errors.

use fontbind_config::{CharmapEncoding, LoadFlagName};

/// Inclusive range of character codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeRange {
    pub first: u32,
    pub last: u32,
}

impl CodeRange {
    /// Printable ASCII, space through tilde.
    pub const PRINTABLE_ASCII: CodeRange = CodeRange {
        first: 0x20,
        last: 0x7E,
    };
}

/// Parse a character code.
///
/// A single character stands for itself; otherwise `U+XXXX` and `0xXX` are
/// hexadecimal and bare digits are decimal. `5` is the digit five (code 53),
/// `53` is code 53.
pub fn parse_code(s: &str) -> Result<u32, String> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(c as u32);
    }

    let s = s.trim();
    let hex = s
        .strip_prefix("U+")
        .or_else(|| s.strip_prefix("u+"))
        .or_else(|| s.strip_prefix("0x"))
        .or_else(|| s.strip_prefix("0X"));
    let parsed = match hex {
        Some(digits) => u32::from_str_radix(digits, 16),
        None => s.parse::<u32>(),
    };
    parsed.map_err(|_| format!("'{s}' is not a character, U+XXXX, 0xXX or decimal code"))
}

/// Parse `A-B` into an inclusive range. A lone code is a one-code range.
///
/// The separator is the first `-` after the first character, so `--/` is
/// the range from `-` to `/`.
pub fn parse_range(s: &str) -> Result<CodeRange, String> {
    let split = s.char_indices().skip(1).find(|&(_, c)| c == '-');
    let (first, last) = match split {
        Some((at, _)) => (parse_code(&s[..at])?, parse_code(&s[at + 1..])?),
        None => {
            let code = parse_code(s)?;
            (code, code)
        }
    };
    if first > last {
        return Err(format!("range start {first} is after range end {last}"));
    }
    Ok(CodeRange { first, last })
}

/// Parse one load flag name.
pub fn parse_flag(s: &str) -> Result<LoadFlagName, String> {
    LoadFlagName::from_name(s).ok_or_else(|| format!("unknown load flag '{s}'"))
}

/// Parse a charmap encoding name.
pub fn parse_charmap(s: &str) -> Result<CharmapEncoding, String> {
    CharmapEncoding::from_name(s).ok_or_else(|| {
        let known: Vec<&str> = CharmapEncoding::all().iter().map(|e| e.name()).collect();
        format!("unknown encoding '{s}' (expected one of: {})", known.join(", "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_code_forms() {
        assert_eq!(parse_code("A"), Ok(65));
        assert_eq!(parse_code("5"), Ok(53));
        assert_eq!(parse_code("é"), Ok(0xE9));
        assert_eq!(parse_code("U+20AC"), Ok(0x20AC));
        assert_eq!(parse_code("u+41"), Ok(0x41));
        assert_eq!(parse_code("0x7e"), Ok(0x7E));
        assert_eq!(parse_code("65"), Ok(65));
        assert!(parse_code("AB").is_err());
        assert!(parse_code("").is_err());
    }

    #[test]
    fn test_parse_range_forms() {
        assert_eq!(parse_range("A-Z"), Ok(CodeRange { first: 65, last: 90 }));
        assert_eq!(
            parse_range("U+0020-U+007E"),
            Ok(CodeRange::PRINTABLE_ASCII)
        );
        assert_eq!(parse_range("0-255"), Ok(CodeRange { first: 0, last: 255 }));
        assert_eq!(parse_range("--/"), Ok(CodeRange { first: 45, last: 47 }));
        assert_eq!(parse_range("x"), Ok(CodeRange { first: 120, last: 120 }));
    }

    #[test]
    fn test_parse_range_rejects_reversed() {
        let err = parse_range("Z-A").unwrap_err();
        assert!(err.contains("after range end"));
    }

    #[test]
    fn test_parse_flag_and_charmap() {
        assert_eq!(parse_flag("target-mono"), Ok(LoadFlagName::TargetMono));
        assert!(parse_flag("sharpen").is_err());
        assert_eq!(parse_charmap("apple_roman"), Ok(CharmapEncoding::AppleRoman));
        assert!(parse_charmap("ebcdic").unwrap_err().contains("unicode"));
    }
}
