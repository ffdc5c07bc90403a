//! PostgREST query-string helpers
//!
//! Filter values are always double-quoted so identifiers containing reserved
//! characters (`,` `.` `(` `)` `:`) cannot change the shape of a filter.

use ssb_domain::{Pair, SubstanceId};

/// Quote a filter value, escaping backslashes and double quotes
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// `in.("a","b",...)` filter over identifiers
pub fn in_filter(ids: &[SubstanceId]) -> String {
    let values: Vec<String> = ids.iter().map(|id| quote(id.as_str())).collect();
    format!("in.({})", values.join(","))
}

/// `or` filter matching any of the canonical pairs
///
/// Produces `(and(a_substance_id.eq."A",b_substance_id.eq."B"),...)`.
pub fn pairs_filter(pairs: &[Pair]) -> String {
    let conditions: Vec<String> = pairs
        .iter()
        .map(|pair| {
            format!(
                "and(a_substance_id.eq.{},b_substance_id.eq.{})",
                quote(pair.a().as_str()),
                quote(pair.b().as_str())
            )
        })
        .collect();
    format!("({})", conditions.join(","))
}

/// Parse the total from a `Content-Range` header (`0-24/573` or `*/573`)
///
/// Returns `None` when the total is unknown (`*`) or the header is malformed.
pub fn parse_content_range_total(header: &str) -> Option<u64> {
    let (_, total) = header.trim().rsplit_once('/')?;
    total.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_plain() {
        assert_eq!(quote("S_GINKGO"), "\"S_GINKGO\"");
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote(r#"a"b"#), r#""a\"b""#);
        assert_eq!(quote(r"a\b"), r#""a\\b""#);
        assert_eq!(quote("a,b.c(d)"), "\"a,b.c(d)\"");
    }

    #[test]
    fn test_in_filter() {
        let ids = vec![SubstanceId::from("D_WARFARIN"), SubstanceId::from("S_GINKGO")];
        assert_eq!(in_filter(&ids), r#"in.("D_WARFARIN","S_GINKGO")"#);
    }

    #[test]
    fn test_pairs_filter() {
        let pairs = vec![
            Pair::new("S_GINKGO", "D_WARFARIN").unwrap(),
            Pair::new("S_FISH_OIL", "D_WARFARIN").unwrap(),
        ];
        assert_eq!(
            pairs_filter(&pairs),
            concat!(
                r#"(and(a_substance_id.eq."D_WARFARIN",b_substance_id.eq."S_GINKGO"),"#,
                r#"and(a_substance_id.eq."D_WARFARIN",b_substance_id.eq."S_FISH_OIL"))"#
            )
        );
    }

    #[test]
    fn test_content_range() {
        assert_eq!(parse_content_range_total("0-0/573"), Some(573));
        assert_eq!(parse_content_range_total("*/12"), Some(12));
        assert_eq!(parse_content_range_total("0-24/*"), None);
        assert_eq!(parse_content_range_total("garbage"), None);
    }
}
