/// Replacements applied one after another, in this order.
///
/// The ampersand pass runs last, so the `&` of entities produced by the earlier
/// passes is escaped again (`<` becomes `&amp;lt;`).
const REPLACEMENTS: [(&str, &str); 5] = [
    ("<", "&lt;"),
    (">", "&gt;"),
    ("\"", "&quot;"),
    ("'", "&#x27;"),
    ("&", "&amp;"),
];

/// Escapes HTML-significant characters in free text.
pub fn sanitize(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }
    REPLACEMENTS
        .iter()
        .fold(input.to_string(), |text, (from, to)| text.replace(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_input_unchanged() {
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(sanitize("Laptop Stand"), "Laptop Stand");
    }

    #[test]
    fn test_replacements_are_sequential() {
        assert_eq!(sanitize("<b>"), "&amp;lt;b&amp;gt;");
        assert_eq!(sanitize("Tom & Jerry"), "Tom &amp; Jerry");
        assert_eq!(sanitize("\"it's\""), "&amp;quot;it&amp;#x27;s&amp;quot;");
    }

    proptest! {
        #[test]
        fn prop_no_raw_markup_survives(input in ".*[<>\"'&].*") {
            let output = sanitize(&input);
            prop_assert!(!output.contains(['<', '>', '"', '\'']));
            prop_assert!(output.len() >= input.len());
        }
    }
}
