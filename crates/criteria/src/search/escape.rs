//! Value encoders for the query-string syntax, distances and term sets.

use crate::error::{CriteriaError, CriteriaResult};
use crate::types::{CriteriaValue, Distance};

/// Characters with syntactic meaning in the engine's query-string language.
const RESERVED: &[char] = &[
    '\\', '+', '-', '!', '(', ')', ':', '^', '[', ']', '"', '{', '}', '~', '*', '?', '|', '&', '/',
];

/// Escapes every reserved query-string character with a backslash.
///
/// Escaping is not idempotent: escaping already-escaped text escapes the
/// backslashes again. Callers must escape raw input exactly once.
///
/// ```
/// use helios_criteria::search::escape;
///
/// assert_eq!(escape("a+b"), r"a\+b");
/// assert_eq!(escape("(1:2)"), r"\(1\:2\)");
/// ```
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if RESERVED.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Renders a distance as engine distance text, e.g. `"12.5km"`.
///
/// Fails with `UnsupportedOperator` for units the engine has no code for.
pub fn distance_to_text(distance: &Distance) -> CriteriaResult<String> {
    let unit = distance.unit.code()?;
    Ok(format!("{}{}", distance.value, unit))
}

/// Converts sequence elements to their term form, keeping nulls as null terms.
///
/// `field` and `operator` only label the error raised for elements that have
/// no scalar text form.
pub fn to_term_list(
    field: &str,
    operator: &str,
    values: &[CriteriaValue],
) -> CriteriaResult<Vec<Option<String>>> {
    values
        .iter()
        .map(|value| match value {
            CriteriaValue::Null => Ok(None),
            other => other.to_text().map(Some).ok_or_else(|| {
                CriteriaError::invalid_argument(
                    field,
                    operator,
                    format!("cannot use a {} as a term", other.kind()),
                )
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DistanceUnit;

    #[test]
    fn test_escape_reserved() {
        assert_eq!(escape("a+b"), r"a\+b");
        assert_eq!(escape(r#"say "hi"!"#), r#"say \"hi\"\!"#);
        assert_eq!(escape("a/b|c&d"), r"a\/b\|c\&d");
        assert_eq!(escape("plain text"), "plain text");
        assert_eq!(escape(""), "");
    }

    #[test]
    fn test_escape_twice_double_escapes() {
        assert_eq!(escape(&escape("a+b")), r"a\\\+b");
    }

    #[test]
    fn test_escape_multibyte() {
        assert_eq!(escape("grüße*"), r"grüße\*");
    }

    #[test]
    fn test_distance_to_text() {
        assert_eq!(distance_to_text(&Distance::km(12.5)).unwrap(), "12.5km");
        assert_eq!(distance_to_text(&Distance::miles(3.0)).unwrap(), "3mi");
        let err = distance_to_text(&Distance::new(1.0, DistanceUnit::Neutral)).unwrap_err();
        assert!(matches!(err, CriteriaError::UnsupportedOperator { .. }));
    }

    #[test]
    fn test_term_list_keeps_nulls() {
        let values = vec![
            CriteriaValue::from("a"),
            CriteriaValue::Null,
            CriteriaValue::from(7),
        ];
        let terms = to_term_list("tags", "IN", &values).unwrap();
        assert_eq!(
            terms,
            vec![Some("a".to_string()), None, Some("7".to_string())]
        );
    }

    #[test]
    fn test_term_list_rejects_structured_values() {
        let values = vec![CriteriaValue::from(vec!["nested"])];
        let err = to_term_list("tags", "IN", &values).unwrap_err();
        assert_eq!(err.field(), Some("tags"));
    }
}
