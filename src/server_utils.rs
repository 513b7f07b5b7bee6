pub const DEFAULT_PORT: u16 = 8080;

pub fn resolve_port(raw: Option<&str>) -> u16 {
    raw.and_then(|value| value.trim().parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// `None` means the caller should seed from entropy.
pub fn parse_seed(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
}

pub fn parse_level(raw: Option<&str>) -> u8 {
    raw.and_then(|value| value.trim().parse::<u8>().ok())
        .unwrap_or(0)
}

pub fn parse_flag(raw: Option<&str>) -> bool {
    match raw {
        None => false,
        Some(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_falls_back_to_default() {
        assert_eq!(resolve_port(None), DEFAULT_PORT);
        assert_eq!(resolve_port(Some("abc")), DEFAULT_PORT);
        assert_eq!(resolve_port(Some("70000")), DEFAULT_PORT);
        assert_eq!(resolve_port(Some(" 3000 ")), 3000);
    }

    #[test]
    fn seed_parsing_is_lenient_for_invalid_values() {
        assert_eq!(parse_seed(Some("42")), Some(42));
        assert_eq!(parse_seed(Some("-1")), None);
        assert_eq!(parse_seed(Some("")), None);
        assert_eq!(parse_seed(None), None);
    }

    #[test]
    fn level_defaults_to_zero() {
        assert_eq!(parse_level(None), 0);
        assert_eq!(parse_level(Some("3")), 3);
        assert_eq!(parse_level(Some("300")), 0);
    }

    #[test]
    fn flag_accepts_common_truthy_spellings() {
        assert!(parse_flag(Some("1")));
        assert!(parse_flag(Some(" TRUE ")));
        assert!(parse_flag(Some("on")));
        assert!(!parse_flag(Some("0")));
        assert!(!parse_flag(Some("")));
        assert!(!parse_flag(None));
    }
}
