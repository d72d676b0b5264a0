use crate::types::CookieRecord;

/// Parse a raw `name=value; other=value` cookie string into records for a
/// domain. Each piece is split on the first `=` only, so values may themselves
/// contain `=`. A piece with no `=` becomes a record with an empty value.
pub fn parse_cookie_header(raw: &str, domain: &str) -> Vec<CookieRecord> {
    raw.split(';')
        .map(|piece| {
            let piece = piece.trim();
            match piece.split_once('=') {
                Some((name, value)) => CookieRecord::new(name, value, domain),
                None => CookieRecord::new(piece, "", domain),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_pairs() {
        let records = parse_cookie_header("sid=1;theme=dark", "a.example");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "sid");
        assert_eq!(records[0].value, "1");
        assert_eq!(records[1].name, "theme");
        assert_eq!(records[1].value, "dark");
    }

    #[test]
    fn test_value_keeps_further_equals() {
        let records = parse_cookie_header("a=1; b=2=x", "a.example");
        assert_eq!(records[0].name, "a");
        assert_eq!(records[0].value, "1");
        assert_eq!(records[1].name, "b");
        assert_eq!(records[1].value, "2=x");
    }

    #[test]
    fn test_piece_without_equals_gets_empty_value() {
        let records = parse_cookie_header("flag; sid=1", "a.example");
        assert_eq!(records[0].name, "flag");
        assert_eq!(records[0].value, "");
        assert_eq!(records[1].name, "sid");
    }

    #[test]
    fn test_records_carry_domain_and_defaults() {
        let records = parse_cookie_header("sid=1", "a.example");
        let r = &records[0];
        assert_eq!(r.domain, "a.example");
        assert_eq!(r.path, "/");
        assert!(!r.http_only);
        assert!(r.secure);
    }
}
