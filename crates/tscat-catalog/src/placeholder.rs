//! `%NAME%` placeholder tokens.
//!
//! Hosts substitute placeholders after lookup, so a translation must carry
//! every token of its source verbatim. A token is `%`, one or more ASCII
//! alphanumerics or underscores, then `%`.

/// Byte ranges of every token in `text`, in order.
fn token_spans(text: &str) -> Vec<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }
        let name_len = bytes[i + 1..]
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
            .count();
        let close = i + 1 + name_len;
        if name_len > 0 && bytes.get(close) == Some(&b'%') {
            spans.push((i, close + 1));
            i = close + 1;
        } else {
            // The `%` may open the next token.
            i = close.max(i + 1);
        }
    }
    spans
}

/// Every `%NAME%` token in `text`, in order of appearance.
///
/// ```
/// use tscat_catalog::placeholders;
///
/// assert_eq!(
///     placeholders("%ZOOM% and %URL% will be replaced"),
///     vec!["%ZOOM%", "%URL%"]
/// );
/// ```
#[must_use]
pub fn placeholders(text: &str) -> Vec<&str> {
    token_spans(text)
        .into_iter()
        .map(|(start, end)| &text[start..end])
        .collect()
}

/// Tokens of `source` that do not appear in `translation`, deduplicated.
#[must_use]
pub fn missing_placeholders<'a>(source: &'a str, translation: &str) -> Vec<&'a str> {
    let present = placeholders(translation);
    let mut missing: Vec<&str> = Vec::new();
    for token in placeholders(source) {
        if !present.contains(&token) && !missing.contains(&token) {
            missing.push(token);
        }
    }
    missing
}

/// Single-pass `%NAME%` substitution. Unmatched tokens are left as-is.
///
/// `args` are `(NAME, value)` pairs without the surrounding `%`.
#[must_use]
pub fn substitute(template: &str, args: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut last = 0;
    for (start, end) in token_spans(template) {
        result.push_str(&template[last..start]);
        let name = &template[start + 1..end - 1];
        match args.iter().find(|&&(n, _)| n == name) {
            Some(&(_, value)) => result.push_str(value),
            None => result.push_str(&template[start..end]),
        }
        last = end;
    }
    result.push_str(&template[last..]);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const BROWSER_HELP: &str = "This is the command that will be used to show the web browser. \
        Use 'Internal' to use the built in web browser'. %ZOOM% and %URL% will be \
        replaced with the zoom level and URL list.";

    #[test]
    fn finds_tokens_in_order() {
        assert_eq!(placeholders(BROWSER_HELP), vec!["%ZOOM%", "%URL%"]);
    }

    #[test]
    fn plain_text_has_no_tokens() {
        assert!(placeholders("Loading...").is_empty());
        assert!(placeholders("").is_empty());
    }

    #[test]
    fn lone_and_empty_percent_are_not_tokens() {
        assert!(placeholders("100% sure").is_empty());
        assert!(placeholders("%%").is_empty());
        assert!(placeholders("50%-75%").is_empty());
        assert!(placeholders("% URL %").is_empty());
    }

    #[test]
    fn percent_can_start_next_token() {
        assert_eq!(placeholders("50% %URL%"), vec!["%URL%"]);
        assert_eq!(placeholders("%a b%URL%"), vec!["%URL%"]);
    }

    #[test]
    fn adjacent_tokens() {
        assert_eq!(placeholders("%A%%B%"), vec!["%A%", "%B%"]);
    }

    #[test]
    fn non_ascii_text_around_tokens() {
        assert_eq!(placeholders("Nagyítás: %ZOOM%×"), vec!["%ZOOM%"]);
    }

    #[test]
    fn missing_reports_absent_tokens() {
        assert_eq!(
            missing_placeholders("%ZOOM% and %URL%", "csak %URL%"),
            vec!["%ZOOM%"]
        );
        assert!(missing_placeholders("%ZOOM% and %URL%", "%URL%, %ZOOM%").is_empty());
    }

    #[test]
    fn missing_is_deduplicated() {
        assert_eq!(missing_placeholders("%URL% %URL%", ""), vec!["%URL%"]);
    }

    #[test]
    fn substitute_known_tokens() {
        assert_eq!(
            substitute(
                "browser -z %ZOOM% %URL%",
                &[("ZOOM", "1.4"), ("URL", "http://example.org")]
            ),
            "browser -z 1.4 http://example.org"
        );
    }

    #[test]
    fn substitute_leaves_unknown_tokens() {
        assert_eq!(substitute("%ZOOM% %URL%", &[("URL", "x")]), "%ZOOM% x");
        assert_eq!(substitute("100% done", &[("done", "x")]), "100% done");
    }

    #[test]
    fn substitute_is_single_pass() {
        assert_eq!(substitute("%A%", &[("A", "%B%"), ("B", "x")]), "%B%");
    }

    #[test]
    fn substitute_repeated_token() {
        assert_eq!(substitute("%X% and %X%", &[("X", "A")]), "A and A");
    }
}
